use crate::balance::compute_balances;
use crate::schemas::{Expense, PersonBalance, Settlement, Transaction};

/// Balances closer to zero than this are considered settled.
pub const SETTLED_TOLERANCE: f64 = 1.0;

pub fn compute_transactions(expenses: &[Expense]) -> Vec<Transaction> {
    simplify_balances(&compute_balances(expenses))
}

pub fn settle(expenses: &[Expense]) -> Settlement {
    let balances = compute_balances(expenses);
    let transactions = simplify_balances(&balances);
    Settlement {
        balances,
        transactions,
    }
}

// Greedy matching: the largest debt pays the largest credit until one of
// them is settled. Not guaranteed minimal, but deterministic for a given
// balance order since both sorts are stable.
pub fn simplify_balances(balances: &[PersonBalance]) -> Vec<Transaction> {
    // NaN compares false on both sides and joins neither list
    let (mut debtors, mut creditors): (Vec<PersonBalance>, Vec<PersonBalance>) = balances
        .iter()
        .filter(|b| b.balance < 0.0 || b.balance > 0.0)
        .partition(|b| b.balance < 0.0);

    debtors.sort_by(|a, b| a.balance.total_cmp(&b.balance));
    creditors.sort_by(|a, b| b.balance.total_cmp(&a.balance));

    let mut transactions = Vec::new();
    let mut debtor_index = 0;
    let mut creditor_index = 0;

    while debtor_index < debtors.len() && creditor_index < creditors.len() {
        let debtor = &mut debtors[debtor_index];
        let creditor = &mut creditors[creditor_index];

        let amount = debtor.balance.abs().min(creditor.balance);
        // inf - inf would leave both balances NaN and neither cursor could move
        if !amount.is_finite() {
            debtor_index += 1;
            creditor_index += 1;
            continue;
        }
        if amount > 0.0 {
            let rounded = amount.round();
            if rounded > 0.0 {
                transactions.push(Transaction {
                    from: debtor.person,
                    to: creditor.person,
                    amount: rounded as u64,
                });
            }
            // Unrounded so the rounding error doesn't carry into the next match
            debtor.balance += amount;
            creditor.balance -= amount;
        }

        if debtor.balance.abs() < SETTLED_TOLERANCE {
            debtor_index += 1;
        }
        if creditor.balance < SETTLED_TOLERANCE {
            creditor_index += 1;
        }
    }
    transactions
}
