use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// The closed group of people who can pay for or share an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Person {
    Trung,
    #[serde(rename = "Vũ")]
    Vu,
    #[serde(rename = "Trường")]
    Truong,
    Quang,
    #[serde(rename = "Ngọc")]
    Ngoc,
    #[serde(rename = "Nguyên")]
    Nguyen,
    Minh,
    Giang,
    #[serde(rename = "Mạnh")]
    Manh,
    #[serde(rename = "Hiếu")]
    Hieu,
    #[serde(rename = "Liên")]
    Lien,
}

impl Person {
    pub const ALL: [Person; 11] = [
        Person::Trung,
        Person::Vu,
        Person::Truong,
        Person::Quang,
        Person::Ngoc,
        Person::Nguyen,
        Person::Minh,
        Person::Giang,
        Person::Manh,
        Person::Hieu,
        Person::Lien,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Person::Trung => "Trung",
            Person::Vu => "Vũ",
            Person::Truong => "Trường",
            Person::Quang => "Quang",
            Person::Ngoc => "Ngọc",
            Person::Nguyen => "Nguyên",
            Person::Minh => "Minh",
            Person::Giang => "Giang",
            Person::Manh => "Mạnh",
            Person::Hieu => "Hiếu",
            Person::Lien => "Liên",
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown person: {0}")]
pub struct UnknownPerson(pub String);

impl FromStr for Person {
    type Err = UnknownPerson;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Person::ALL
            .into_iter()
            .find(|person| person.name() == s.trim())
            .ok_or_else(|| UnknownPerson(s.to_string()))
    }
}

/// Stored as the hyphenated uuid string so JSON and BSON documents agree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl TryFrom<String> for ExpenseId {
    type Error = uuid::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExpenseId> for String {
    fn from(id: ExpenseId) -> Self {
        id.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct PersonExpense {
    pub person: Person,
    pub amount: f64,
}

/// What a user submits when creating or editing an expense.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: f64,
    pub paid_by: Person,
    pub participants: Vec<Person>,
    #[serde(default = "split_equally_default")]
    pub split_equally: bool,
    #[serde(default)]
    pub individual_expenses: Vec<PersonExpense>,
}

fn split_equally_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    pub amount: f64,
    pub paid_by: Person,
    pub participants: Vec<Person>,
    pub split_equally: bool,
    // Only authoritative when split_equally is false
    pub individual_expenses: Vec<PersonExpense>,
    pub date: DateTime<Utc>,
}

impl Expense {
    pub fn from_draft(id: ExpenseId, date: DateTime<Utc>, draft: ExpenseDraft) -> Self {
        Expense {
            id,
            name: draft.name,
            amount: draft.amount,
            paid_by: draft.paid_by,
            participants: draft.participants,
            split_equally: draft.split_equally,
            individual_expenses: draft.individual_expenses,
            date,
        }
    }
}

/// Positive: the person is owed money. Negative: the person owes money.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct PersonBalance {
    pub person: Person,
    pub balance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transaction {
    pub from: Person,
    pub to: Person,
    pub amount: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Settlement {
    pub balances: Vec<PersonBalance>,
    pub transactions: Vec<Transaction>,
}
