use crate::core::events::Observers;
use crate::data::CurrencyKind;
use std::collections::BTreeMap;
use tracing::warn;

/// Emitted after every successful balance change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyChanged {
    pub kind: CurrencyKind,
    pub amount: i64,
}

/// Currency balances. Every spend and earn goes through [`CurrencyLedger::change`].
///
/// Balances are never negative; a change that would take a balance below
/// zero is rejected without touching state or notifying observers.
#[derive(Debug, Default)]
pub struct CurrencyLedger {
    balances: BTreeMap<CurrencyKind, i64>,
    pub observers: Observers<CurrencyChanged>,
}

impl CurrencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance, 0 for a currency never touched.
    pub fn amount(&self, kind: CurrencyKind) -> i64 {
        self.balances.get(&kind).copied().unwrap_or(0)
    }

    pub fn can_afford(&self, kind: CurrencyKind, cost: i64) -> bool {
        self.amount(kind) >= cost
    }

    /// Adds `delta` (negative to spend). Returns false and changes nothing
    /// if the balance would drop below zero or overflow.
    pub fn change(&mut self, kind: CurrencyKind, delta: i64) -> bool {
        let current = self.amount(kind);
        let new_amount = match current.checked_add(delta) {
            Some(v) if v >= 0 => v,
            _ => {
                warn!(
                    ?kind,
                    current,
                    requested = delta,
                    "currency change rejected: insufficient balance"
                );
                return false;
            }
        };

        self.balances.insert(kind, new_amount);
        self.observers.emit(&CurrencyChanged {
            kind,
            amount: new_amount,
        });
        true
    }

    /// Restores a balance from a save. Negative values are corrupt and become 0.
    pub fn set_amount(&mut self, kind: CurrencyKind, amount: i64) {
        let amount = if amount < 0 {
            warn!(?kind, amount, "negative balance in save, resetting to 0");
            0
        } else {
            amount
        };
        self.balances.insert(kind, amount);
        self.observers.emit(&CurrencyChanged { kind, amount });
    }

    /// All balances, including untouched currencies at 0.
    pub fn balances(&self) -> BTreeMap<CurrencyKind, i64> {
        CurrencyKind::ALL
            .iter()
            .map(|&kind| (kind, self.amount(kind)))
            .collect()
    }
}
