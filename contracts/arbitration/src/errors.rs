use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidParticipants = 3,
    Unauthorized = 4,
    WrongAmount = 5,
    InvalidState = 6,
    TransferFailed = 7,
}
