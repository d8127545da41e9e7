use crate::schemas::{Expense, PersonExpense};

/// Returns what each participant of `expense` owes towards it.
///
/// Equal splits divide the amount without rounding; any remainder is left for
/// the settlement to absorb when it rounds the final transfers. Custom splits
/// are taken as they are, validation happens before an expense is stored.
pub fn resolve_shares(expense: &Expense) -> Vec<PersonExpense> {
    if expense.split_equally {
        let share = expense.amount / expense.participants.len() as f64;
        expense
            .participants
            .iter()
            .map(|&person| PersonExpense {
                person,
                amount: share,
            })
            .collect()
    } else {
        expense.individual_expenses.clone()
    }
}
