//! Currency ledger.

pub mod ledger;

pub use crate::data::CurrencyKind;
pub use ledger::{CurrencyChanged, CurrencyLedger};
