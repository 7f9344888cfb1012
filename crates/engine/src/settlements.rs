//! Greedy settlement of net balances.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::balances::Balance;

/// Balances closer to zero than this are considered settled.
///
/// Splitting by the receiver count leaves floating-point residue, this
/// absorbs it.
pub const BALANCE_EPSILON: f64 = 0.01;

/// A single payment instruction: `from` pays `amount` to `to`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Reduces balances to an ordered list of transfers.
///
/// Each step pairs the largest debtor with the largest creditor and moves
/// the smaller of the two amounts, which zeroes at least one of them. The
/// loop therefore emits at most `n - 1` transfers. Equal balances keep
/// their input order (the sort is stable), so the output is deterministic.
///
/// ```rust
/// use engine::{Balance, calculate_settlements};
///
/// let balances = vec![
///     Balance { name: "A".into(), balance: -30.0 },
///     Balance { name: "B".into(), balance: 10.0 },
///     Balance { name: "C".into(), balance: 20.0 },
/// ];
/// let plan = calculate_settlements(&balances);
/// assert_eq!(plan.len(), 2);
/// assert_eq!((plan[0].to.as_str(), plan[0].amount), ("C", 20.0));
/// assert_eq!((plan[1].to.as_str(), plan[1].amount), ("B", 10.0));
/// ```
pub fn calculate_settlements(summary: &[Balance]) -> Vec<Settlement> {
    let mut balances: Vec<Balance> = summary.to_vec();
    let mut result = Vec::new();

    loop {
        balances.sort_by(|a, b| a.balance.partial_cmp(&b.balance).unwrap_or(Ordering::Equal));
        let (Some(debtor), Some(creditor)) = (balances.first(), balances.last()) else {
            break;
        };
        if debtor.balance > -BALANCE_EPSILON || creditor.balance < BALANCE_EPSILON {
            break;
        }

        let amount = (-debtor.balance).min(creditor.balance);
        result.push(Settlement {
            from: debtor.name.clone(),
            to: creditor.name.clone(),
            amount,
        });

        let last = balances.len() - 1;
        balances[0].balance += amount;
        balances[last].balance -= amount;
    }

    result
}
