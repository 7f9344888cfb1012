//! Net balances per participant.

use serde::{Deserialize, Serialize};

use crate::session::ExpenseRow;

/// A participant's net position: positive is owed money, negative owes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub name: String,
    pub balance: f64,
}

/// Computes one [`Balance`] per participant, in participant order.
///
/// For every row with a payer and an amount, the payer is credited the full
/// amount and each receiver is debited an equal share. Rows without an
/// amount, and rows nobody received, leave every balance untouched. Names
/// that are not in `participants` are ignored.
pub fn build_summary(participants: &[String], rows: &[ExpenseRow]) -> Vec<Balance> {
    let mut summary: Vec<Balance> = participants
        .iter()
        .map(|name| Balance {
            name: name.clone(),
            balance: 0.0,
        })
        .collect();

    for row in rows {
        let Some(amount) = row.amount else {
            continue;
        };
        if row.who_paid.is_empty() {
            continue;
        }
        let receivers = row.receivers();
        if receivers == 0 {
            continue;
        }
        let share = amount / receivers as f64;

        for entry in &mut summary {
            if entry.name == row.who_paid {
                entry.balance += amount;
            }
            if row.who_received.get(&entry.name).copied().unwrap_or(false) {
                entry.balance -= share;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use crate::Session;

    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    fn session(list: &[&str]) -> Session {
        let mut session = Session::new();
        for name in list {
            session.add_participant(name);
        }
        session
    }

    #[test]
    fn payer_is_credited_and_receivers_split() {
        let mut session = session(&["A", "B", "C"]);
        let id = session.add_row();
        session.set_payer(id, "A");
        session.set_amount(id, Some(30.0));
        session.set_all_received(id, true);

        let summary = build_summary(session.participants(), session.rows());
        assert_eq!(
            summary,
            vec![
                Balance { name: "A".to_string(), balance: 20.0 },
                Balance { name: "B".to_string(), balance: -10.0 },
                Balance { name: "C".to_string(), balance: -10.0 },
            ]
        );
    }

    #[test]
    fn missing_amount_payer_or_receivers_contribute_nothing() {
        let mut session = session(&["A", "B"]);
        let no_amount = session.add_row();
        session.set_payer(no_amount, "A");
        session.set_all_received(no_amount, true);

        let no_receivers = session.add_row();
        session.set_payer(no_receivers, "A");
        session.set_amount(no_receivers, Some(50.0));

        let no_payer = session.add_row();
        session.set_amount(no_payer, Some(12.0));
        session.set_all_received(no_payer, true);

        let summary = build_summary(session.participants(), session.rows());
        assert!(summary.iter().all(|b| b.balance == 0.0));
    }

    #[test]
    fn summary_sums_to_zero() {
        let mut session = session(&["A", "B", "C"]);
        for (payer, amount) in [("A", 10.0), ("B", 7.0), ("C", 3.33)] {
            let id = session.add_row();
            session.set_payer(id, payer);
            session.set_amount(id, Some(amount));
            session.set_all_received(id, true);
        }
        let total: f64 = build_summary(session.participants(), session.rows())
            .iter()
            .map(|b| b.balance)
            .sum();
        assert!(total.abs() < 1e-9);
    }

    #[test]
    fn no_participants_means_empty_summary() {
        assert!(build_summary(&names(&[]), &[]).is_empty());
    }
}
