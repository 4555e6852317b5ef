//! Chart of accounts and posting validation.
//!
//! This module implements the account tree and the validation rules a
//! candidate journal must pass before posting:
//! - Account existence and active status
//! - Currency consistency against the journal currency
//! - Control-account protection (no direct postings)
//! - Advisory normal-balance findings
//! - Account type rules used by the posting engine

pub mod error;
pub mod types;
pub mod validator;

#[cfg(test)]
mod validator_props;

pub use error::CoaError;
pub use types::{
    Account, AccountIndex, AccountSubtype, AccountType, Classification, NormalBalance,
};
pub use validator::{CoaValidator, NormalBalanceFinding};
