use soroban_sdk::{contracttype, Address, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    FavorBuyer,
    FavorSeller,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EscrowState {
    AwaitingDeposits,
    DepositsComplete,
    PaymentComplete,
    ArbitrationRequested,
    Closed,
    Resolved(Resolution),
}

impl EscrowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EscrowState::Closed | EscrowState::Resolved(_))
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Escrow {
    pub buyer: Address,
    pub seller: Address,
    pub arbitrator: Address,
    pub token: Address,
    pub buyer_deposit_paid: bool,
    pub seller_deposit_paid: bool,
    pub price_paid: bool,
    pub balance: i128,
    pub arbitration_called: bool,
    pub arbitration_called_by: Option<Address>,
    pub state: EscrowState,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArbitrationMessage {
    pub sender: Address,
    pub content: String,
}

#[contracttype]
#[derive(Debug, Eq, PartialEq)]
pub enum DataKey {
    Escrow,
    Messages,
}
