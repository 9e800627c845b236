#![no_std]

mod arbitration_contract;
mod entities;
mod errors;

pub use crate::arbitration_contract::*;
pub use crate::entities::*;
pub use crate::errors::*;
