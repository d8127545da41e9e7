use crate::error::AppError;
use crate::schemas::{Expense, ExpenseId};
use async_trait::async_trait;
use bson::doc;
use futures::TryStreamExt;
use mongodb::{Client, Collection, Database};
use tokio::sync::RwLock;

/// Where expenses are kept. The list is the only state that is persisted,
/// balances and transactions are always derived from it.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Every expense, oldest first.
    async fn list(&self) -> Result<Vec<Expense>, AppError>;

    async fn insert(&self, expense: Expense) -> Result<(), AppError>;

    /// Fails with `NotFound` if no expense has the same id.
    async fn replace(&self, expense: Expense) -> Result<(), AppError>;

    async fn delete(&self, id: ExpenseId) -> Result<Expense, AppError>;
}

pub struct MongoExpenseRepository {
    expenses: Collection<Expense>,
}

impl MongoExpenseRepository {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(&client.database(database)))
    }

    pub fn new(database: &Database) -> Self {
        Self {
            expenses: database.collection("Expenses"),
        }
    }
}

#[async_trait]
impl ExpenseRepository for MongoExpenseRepository {
    async fn list(&self) -> Result<Vec<Expense>, AppError> {
        let cursor = self.expenses.find(None, None).await?;
        let mut expenses: Vec<Expense> = cursor.try_collect().await?;
        expenses.sort_by_key(|expense| expense.date);
        Ok(expenses)
    }

    async fn insert(&self, expense: Expense) -> Result<(), AppError> {
        self.expenses.insert_one(expense, None).await?;
        Ok(())
    }

    async fn replace(&self, expense: Expense) -> Result<(), AppError> {
        let result = self
            .expenses
            .replace_one(doc! { "id": expense.id.to_string() }, &expense, None)
            .await?;
        if result.matched_count == 0 {
            return Err(AppError::NotFound(expense.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> Result<Expense, AppError> {
        self.expenses
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .await?
            .ok_or_else(|| AppError::NotFound(id.to_string()))
    }
}

#[derive(Default)]
pub struct InMemoryExpenseRepository {
    expenses: RwLock<Vec<Expense>>,
}

impl InMemoryExpenseRepository {
    pub fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: RwLock::new(expenses),
        }
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryExpenseRepository {
    async fn list(&self) -> Result<Vec<Expense>, AppError> {
        let mut expenses = self.expenses.read().await.clone();
        // Stable, so expenses created at the same instant keep insertion order
        expenses.sort_by_key(|expense| expense.date);
        Ok(expenses)
    }

    async fn insert(&self, expense: Expense) -> Result<(), AppError> {
        self.expenses.write().await.push(expense);
        Ok(())
    }

    async fn replace(&self, expense: Expense) -> Result<(), AppError> {
        let mut expenses = self.expenses.write().await;
        match expenses.iter_mut().find(|stored| stored.id == expense.id) {
            Some(stored) => {
                *stored = expense;
                Ok(())
            }
            None => Err(AppError::NotFound(expense.id.to_string())),
        }
    }

    async fn delete(&self, id: ExpenseId) -> Result<Expense, AppError> {
        let mut expenses = self.expenses.write().await;
        let position = expenses
            .iter()
            .position(|stored| stored.id == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        Ok(expenses.remove(position))
    }
}
