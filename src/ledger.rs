use crate::error::AppError;
use crate::exchange::settle;
use crate::schemas::{Expense, ExpenseDraft, ExpenseId, Settlement};
use crate::store::ExpenseRepository;
use crate::validation::validate_draft;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

struct Snapshot {
    expenses: Vec<Expense>,
    settlement: Settlement,
}

/// Keeps the expense list in a repository together with the settlement
/// computed from it. Every change reloads the full list and replaces the
/// cached settlement, nothing is patched incrementally.
pub struct ExpenseLedger {
    repository: Box<dyn ExpenseRepository>,
    snapshot: RwLock<Snapshot>,
}

impl ExpenseLedger {
    pub async fn load(repository: Box<dyn ExpenseRepository>) -> Result<Self, AppError> {
        let expenses = repository.list().await?;
        let settlement = settle(&expenses);
        info!(expenses = expenses.len(), "loaded expenses");
        Ok(Self {
            repository,
            snapshot: RwLock::new(Snapshot {
                expenses,
                settlement,
            }),
        })
    }

    pub async fn expenses(&self) -> Vec<Expense> {
        self.snapshot.read().await.expenses.clone()
    }

    pub async fn settlement(&self) -> Settlement {
        self.snapshot.read().await.settlement.clone()
    }

    pub async fn add_expense(&self, draft: ExpenseDraft) -> Result<Expense, AppError> {
        let draft = validate_draft(draft)?;
        let expense = Expense::from_draft(ExpenseId::new(), Utc::now(), draft);

        let mut snapshot = self.snapshot.write().await;
        self.repository.insert(expense.clone()).await?;
        self.recompute(&mut snapshot).await?;

        info!(name = %expense.name, amount = expense.amount, "expense added");
        Ok(expense)
    }

    /// The id and creation date of the stored expense are kept.
    pub async fn update_expense(
        &self,
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Expense, AppError> {
        let draft = validate_draft(draft)?;

        let mut snapshot = self.snapshot.write().await;
        let date = snapshot
            .expenses
            .iter()
            .find(|expense| expense.id == id)
            .map(|expense| expense.date)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        let expense = Expense::from_draft(id, date, draft);
        self.repository.replace(expense.clone()).await?;
        self.recompute(&mut snapshot).await?;

        info!(name = %expense.name, amount = expense.amount, "expense updated");
        Ok(expense)
    }

    pub async fn delete_expense(&self, id: ExpenseId) -> Result<Expense, AppError> {
        let mut snapshot = self.snapshot.write().await;
        let expense = self.repository.delete(id).await?;
        self.recompute(&mut snapshot).await?;

        info!(name = %expense.name, amount = expense.amount, "expense deleted");
        Ok(expense)
    }

    async fn recompute(&self, snapshot: &mut Snapshot) -> Result<(), AppError> {
        let expenses = self.repository.list().await?;
        snapshot.settlement = settle(&expenses);
        snapshot.expenses = expenses;
        debug!(
            balances = snapshot.settlement.balances.len(),
            transactions = snapshot.settlement.transactions.len(),
            "settlement recomputed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Person, PersonBalance, PersonExpense, Transaction};
    use crate::store::InMemoryExpenseRepository;

    async fn empty_ledger() -> ExpenseLedger {
        ExpenseLedger::load(Box::new(InMemoryExpenseRepository::default()))
            .await
            .unwrap()
    }

    fn dinner() -> ExpenseDraft {
        ExpenseDraft {
            name: "Dinner".to_string(),
            amount: 300.0,
            paid_by: Person::Trung,
            participants: vec![Person::Trung, Person::Vu, Person::Truong],
            split_equally: true,
            individual_expenses: vec![],
        }
    }

    #[actix_web::test]
    async fn adding_an_expense_recomputes_the_settlement() {
        let ledger = empty_ledger().await;
        let expense = ledger.add_expense(dinner()).await.unwrap();

        assert_eq!(expense.individual_expenses.len(), 3);
        assert_eq!(ledger.expenses().await, vec![expense]);
        assert_eq!(
            ledger.settlement().await.transactions,
            vec![
                Transaction {
                    from: Person::Vu,
                    to: Person::Trung,
                    amount: 100
                },
                Transaction {
                    from: Person::Truong,
                    to: Person::Trung,
                    amount: 100
                },
            ]
        );
    }

    #[actix_web::test]
    async fn invalid_drafts_never_reach_the_repository() {
        let ledger = empty_ledger().await;
        let mut draft = dinner();
        draft.participants.clear();
        assert!(matches!(
            ledger.add_expense(draft).await,
            Err(AppError::Validation(_))
        ));
        assert!(ledger.expenses().await.is_empty());
    }

    #[actix_web::test]
    async fn updating_keeps_id_and_date() {
        let ledger = empty_ledger().await;
        let created = ledger.add_expense(dinner()).await.unwrap();

        let mut draft = dinner();
        draft.amount = 100.0;
        draft.participants = vec![Person::Trung, Person::Vu];
        draft.split_equally = false;
        draft.individual_expenses = vec![
            PersonExpense {
                person: Person::Trung,
                amount: 40.0,
            },
            PersonExpense {
                person: Person::Vu,
                amount: 60.0,
            },
        ];
        let updated = ledger.update_expense(created.id, draft).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.date, created.date);
        assert_eq!(
            ledger.settlement().await.balances,
            vec![
                PersonBalance {
                    person: Person::Trung,
                    balance: 60.0
                },
                PersonBalance {
                    person: Person::Vu,
                    balance: -60.0
                },
            ]
        );
    }

    #[actix_web::test]
    async fn updating_an_unknown_expense_fails() {
        let ledger = empty_ledger().await;
        assert!(matches!(
            ledger.update_expense(ExpenseId::new(), dinner()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[actix_web::test]
    async fn deleting_the_last_expense_clears_the_settlement() {
        let ledger = empty_ledger().await;
        let created = ledger.add_expense(dinner()).await.unwrap();
        let deleted = ledger.delete_expense(created.id).await.unwrap();

        assert_eq!(deleted, created);
        assert_eq!(ledger.settlement().await, Settlement::default());
    }

    #[actix_web::test]
    async fn loading_computes_the_settlement_of_stored_expenses() {
        let stored = Expense::from_draft(ExpenseId::new(), Utc::now(), dinner());
        let ledger = ExpenseLedger::load(Box::new(InMemoryExpenseRepository::with_expenses(
            vec![stored],
        )))
        .await
        .unwrap();
        assert_eq!(ledger.settlement().await.transactions.len(), 2);
    }
}
