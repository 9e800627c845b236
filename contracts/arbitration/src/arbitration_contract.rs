use crate::entities::*;
use crate::errors::*;
use soroban_sdk::{contract, contractimpl, log, symbol_short, token, Address, Env, String, Vec};

// 7-decimal token units: 0.5 per party up front, 1.0 for the product itself.
pub const DEPOSIT_AMOUNT: i128 = 5_000_000;
pub const PRODUCT_PRICE: i128 = 10_000_000;

#[contract]
pub struct ArbitrationContract;

#[contractimpl]
impl ArbitrationContract {
    pub fn initialize(
        env: Env,
        buyer: Address,
        seller: Address,
        arbitrator: Address,
        token: Address,
    ) -> Result<(), Error> {
        if env.storage().persistent().has(&DataKey::Escrow) {
            return Err(Error::AlreadyInitialized);
        }
        if buyer == seller || buyer == arbitrator || seller == arbitrator {
            return Err(Error::InvalidParticipants);
        }
        if buyer == token || seller == token || arbitrator == token {
            return Err(Error::InvalidParticipants);
        }

        let escrow = Escrow {
            buyer: buyer.clone(),
            seller: seller.clone(),
            arbitrator: arbitrator.clone(),
            token,
            buyer_deposit_paid: false,
            seller_deposit_paid: false,
            price_paid: false,
            balance: 0,
            arbitration_called: false,
            arbitration_called_by: None,
            state: EscrowState::AwaitingDeposits,
        };
        env.storage().persistent().set(&DataKey::Escrow, &escrow);
        env.storage()
            .persistent()
            .set(&DataKey::Messages, &Vec::<ArbitrationMessage>::new(&env));

        env.events().publish(
            (symbol_short!("created"),),
            (buyer, seller, arbitrator, EscrowState::AwaitingDeposits),
        );
        Ok(())
    }

    pub fn deposit_as_buyer(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        let mut escrow = Self::load(&env)?;
        if from != escrow.buyer {
            return Err(Error::Unauthorized);
        }
        if escrow.state != EscrowState::AwaitingDeposits || escrow.buyer_deposit_paid {
            return Err(Error::InvalidState);
        }
        if amount != DEPOSIT_AMOUNT {
            return Err(Error::WrongAmount);
        }

        let token_client = token::Client::new(&env, &escrow.token);
        token_client.transfer(&from, &env.current_contract_address(), &amount);

        escrow.buyer_deposit_paid = true;
        escrow.balance += amount;
        if escrow.seller_deposit_paid {
            escrow.state = EscrowState::DepositsComplete;
        }
        env.storage().persistent().set(&DataKey::Escrow, &escrow);

        env.events()
            .publish((symbol_short!("deposit"), from), (amount, escrow.state));
        Ok(())
    }

    pub fn deposit_as_seller(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        let mut escrow = Self::load(&env)?;
        if from != escrow.seller {
            return Err(Error::Unauthorized);
        }
        if escrow.state != EscrowState::AwaitingDeposits || escrow.seller_deposit_paid {
            return Err(Error::InvalidState);
        }
        if amount != DEPOSIT_AMOUNT {
            return Err(Error::WrongAmount);
        }

        let token_client = token::Client::new(&env, &escrow.token);
        token_client.transfer(&from, &env.current_contract_address(), &amount);

        escrow.seller_deposit_paid = true;
        escrow.balance += amount;
        if escrow.buyer_deposit_paid {
            escrow.state = EscrowState::DepositsComplete;
        }
        env.storage().persistent().set(&DataKey::Escrow, &escrow);

        env.events()
            .publish((symbol_short!("deposit"), from), (amount, escrow.state));
        Ok(())
    }

    pub fn pay_product_price(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        from.require_auth();
        let mut escrow = Self::load(&env)?;
        if from != escrow.buyer {
            return Err(Error::Unauthorized);
        }
        if escrow.state != EscrowState::DepositsComplete || escrow.price_paid {
            return Err(Error::InvalidState);
        }
        if amount != PRODUCT_PRICE {
            return Err(Error::WrongAmount);
        }

        let token_client = token::Client::new(&env, &escrow.token);
        token_client.transfer(&from, &env.current_contract_address(), &amount);

        escrow.price_paid = true;
        escrow.balance += amount;
        escrow.state = EscrowState::PaymentComplete;
        env.storage().persistent().set(&DataKey::Escrow, &escrow);

        env.events().publish(
            (symbol_short!("price"), from),
            (amount, EscrowState::PaymentComplete),
        );
        Ok(())
    }

    pub fn close(env: Env, from: Address) -> Result<(), Error> {
        from.require_auth();
        let mut escrow = Self::load(&env)?;
        if from != escrow.buyer {
            return Err(Error::Unauthorized);
        }
        if escrow.state != EscrowState::PaymentComplete || escrow.arbitration_called {
            return Err(Error::InvalidState);
        }

        // Commit the terminal state before paying out, so a re-entrant
        // invocation finds the escrow already closed.
        let held = escrow.balance;
        escrow.state = EscrowState::Closed;
        escrow.balance = 0;
        env.storage().persistent().set(&DataKey::Escrow, &escrow);

        let token_client = token::Client::new(&env, &escrow.token);
        let contract = env.current_contract_address();
        let payouts = [
            (escrow.buyer.clone(), DEPOSIT_AMOUNT),
            (escrow.seller.clone(), DEPOSIT_AMOUNT + PRODUCT_PRICE),
        ];
        for (to, amount) in payouts.iter() {
            if token_client.try_transfer(&contract, to, amount).is_err() {
                log!(&env, "close payout of {} failed, reverting", amount);
                escrow.state = EscrowState::PaymentComplete;
                escrow.balance = held;
                env.storage().persistent().set(&DataKey::Escrow, &escrow);
                return Err(Error::TransferFailed);
            }
        }

        env.events()
            .publish((symbol_short!("closed"), from), (held, EscrowState::Closed));
        Ok(())
    }

    pub fn call_arbiter(env: Env, from: Address, message: String) -> Result<(), Error> {
        from.require_auth();
        let mut escrow = Self::load(&env)?;
        if from != escrow.buyer && from != escrow.seller {
            return Err(Error::Unauthorized);
        }
        match escrow.state {
            EscrowState::PaymentComplete | EscrowState::ArbitrationRequested => {}
            _ => return Err(Error::InvalidState),
        }

        if !escrow.arbitration_called {
            escrow.arbitration_called = true;
            escrow.arbitration_called_by = Some(from.clone());
            escrow.state = EscrowState::ArbitrationRequested;
        }

        let mut messages: Vec<ArbitrationMessage> = env
            .storage()
            .persistent()
            .get(&DataKey::Messages)
            .unwrap_or_else(|| Vec::new(&env));
        messages.push_back(ArbitrationMessage {
            sender: from.clone(),
            content: message,
        });
        env.storage().persistent().set(&DataKey::Messages, &messages);
        env.storage().persistent().set(&DataKey::Escrow, &escrow);

        env.events().publish(
            (symbol_short!("arb_call"), from),
            (messages.len(), EscrowState::ArbitrationRequested),
        );
        Ok(())
    }

    pub fn resolve_in_favor_of_seller(env: Env, from: Address) -> Result<(), Error> {
        Self::resolve(env, from, Resolution::FavorSeller)
    }

    pub fn resolve_in_favor_of_buyer(env: Env, from: Address) -> Result<(), Error> {
        Self::resolve(env, from, Resolution::FavorBuyer)
    }

    fn resolve(env: Env, from: Address, outcome: Resolution) -> Result<(), Error> {
        from.require_auth();
        let mut escrow = Self::load(&env)?;
        if from != escrow.arbitrator {
            return Err(Error::Unauthorized);
        }
        if escrow.state != EscrowState::ArbitrationRequested {
            return Err(Error::InvalidState);
        }

        let winner = match outcome {
            Resolution::FavorBuyer => escrow.buyer.clone(),
            Resolution::FavorSeller => escrow.seller.clone(),
        };

        // Same sequencing as close: terminal state first, payout second.
        let held = escrow.balance;
        escrow.state = EscrowState::Resolved(outcome.clone());
        escrow.balance = 0;
        env.storage().persistent().set(&DataKey::Escrow, &escrow);

        let token_client = token::Client::new(&env, &escrow.token);
        if token_client
            .try_transfer(&env.current_contract_address(), &winner, &held)
            .is_err()
        {
            log!(&env, "resolution payout of {} failed, reverting", held);
            escrow.state = EscrowState::ArbitrationRequested;
            escrow.balance = held;
            env.storage().persistent().set(&DataKey::Escrow, &escrow);
            return Err(Error::TransferFailed);
        }

        env.events().publish(
            (symbol_short!("resolved"), from),
            (winner, held, EscrowState::Resolved(outcome)),
        );
        Ok(())
    }

    pub fn get_buyer(env: Env) -> Result<Address, Error> {
        Ok(Self::load(&env)?.buyer)
    }

    pub fn get_seller(env: Env) -> Result<Address, Error> {
        Ok(Self::load(&env)?.seller)
    }

    pub fn get_arbitrator(env: Env) -> Result<Address, Error> {
        Ok(Self::load(&env)?.arbitrator)
    }

    pub fn get_state(env: Env) -> Result<EscrowState, Error> {
        Ok(Self::load(&env)?.state)
    }

    pub fn get_balance(env: Env) -> Result<i128, Error> {
        Ok(Self::load(&env)?.balance)
    }

    pub fn is_arbitration_called(env: Env) -> Result<bool, Error> {
        Ok(Self::load(&env)?.arbitration_called)
    }

    pub fn get_arbitration_caller(env: Env) -> Result<Option<Address>, Error> {
        Ok(Self::load(&env)?.arbitration_called_by)
    }

    pub fn get_arbitration_messages(env: Env) -> Result<Vec<ArbitrationMessage>, Error> {
        Self::load(&env)?;
        Ok(env
            .storage()
            .persistent()
            .get(&DataKey::Messages)
            .unwrap_or_else(|| Vec::new(&env)))
    }

    fn load(env: &Env) -> Result<Escrow, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Escrow)
            .ok_or(Error::NotInitialized)
    }
}
