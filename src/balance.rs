use crate::schemas::{Expense, Person, PersonBalance};
use crate::split::resolve_shares;

/// Net balance of everyone mentioned by `expenses`, recomputed from scratch.
///
/// People appear in the order they are first mentioned (payer before
/// participants), people never mentioned are left out.
pub fn compute_balances(expenses: &[Expense]) -> Vec<PersonBalance> {
    let mut balances: Vec<PersonBalance> = Vec::new();
    for expense in expenses {
        adjust(&mut balances, expense.paid_by, expense.amount);
        for share in resolve_shares(expense) {
            adjust(&mut balances, share.person, -share.amount);
        }
    }
    balances
}

/// Sum of all balances, zero (within float drift) for well formed input.
pub fn net_total(balances: &[PersonBalance]) -> f64 {
    balances.iter().map(|b| b.balance).sum()
}

fn adjust(balances: &mut Vec<PersonBalance>, person: Person, amount: f64) {
    match balances.iter_mut().find(|b| b.person == person) {
        Some(entry) => entry.balance += amount,
        None => balances.push(PersonBalance {
            person,
            balance: amount,
        }),
    }
}
