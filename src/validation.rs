use crate::schemas::{ExpenseDraft, Person, PersonExpense};
use std::collections::HashSet;
use thiserror::Error;

/// How far a custom split may drift from the expense amount.
pub const SPLIT_TOLERANCE: f64 = 1.0;

/// Largest accepted amount. Far below the point where f64 stops holding
/// whole currency units exactly, so balances can't overflow.
pub const MAX_AMOUNT: f64 = 1e15;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("expense name must not be empty")]
    EmptyName,
    #[error("amount must be greater than 0, got {0}")]
    NonPositiveAmount(f64),
    #[error("amount must not exceed {max}, got {amount}")]
    AmountTooLarge { amount: f64, max: f64 },
    #[error("choose at least one participant")]
    NoParticipants,
    #[error("{0} is listed as a participant more than once")]
    DuplicateParticipant(Person),
    #[error("{0} participates but has no individual amount")]
    MissingShare(Person),
    #[error("{0} has an individual amount but does not participate")]
    UnexpectedShare(Person),
    #[error("{0} has more than one individual amount")]
    DuplicateShare(Person),
    #[error("individual amount for {person} is invalid: {amount}")]
    InvalidShare { person: Person, amount: f64 },
    #[error("individual amounts add up to {total}, expected {amount}")]
    ShareTotalMismatch { total: f64, amount: f64 },
}

/// Every problem found with a draft, in the order they were checked.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks a draft before it may become an expense.
///
/// Equal-split drafts get their individual amounts rebuilt from the amount
/// and participants, so what is stored always matches what the settlement
/// will compute.
pub fn validate_draft(mut draft: ExpenseDraft) -> Result<ExpenseDraft, ValidationErrors> {
    let mut errors = Vec::new();

    if draft.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if !(draft.amount.is_finite() && draft.amount > 0.0) {
        errors.push(ValidationError::NonPositiveAmount(draft.amount));
    } else if draft.amount > MAX_AMOUNT {
        errors.push(ValidationError::AmountTooLarge {
            amount: draft.amount,
            max: MAX_AMOUNT,
        });
    }
    if draft.participants.is_empty() {
        errors.push(ValidationError::NoParticipants);
    }

    let mut seen = HashSet::new();
    for &person in &draft.participants {
        if !seen.insert(person) {
            errors.push(ValidationError::DuplicateParticipant(person));
        }
    }

    if !draft.split_equally {
        check_individual_expenses(&draft, &mut errors);
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    if draft.split_equally {
        let share = draft.amount / draft.participants.len() as f64;
        draft.individual_expenses = draft
            .participants
            .iter()
            .map(|&person| PersonExpense {
                person,
                amount: share,
            })
            .collect();
    }
    Ok(draft)
}

fn check_individual_expenses(draft: &ExpenseDraft, errors: &mut Vec<ValidationError>) {
    let participants: HashSet<Person> = draft.participants.iter().copied().collect();
    let mut covered = HashSet::new();

    for share in &draft.individual_expenses {
        if !participants.contains(&share.person) {
            errors.push(ValidationError::UnexpectedShare(share.person));
        } else if !covered.insert(share.person) {
            errors.push(ValidationError::DuplicateShare(share.person));
        }
        if !(share.amount.is_finite() && share.amount >= 0.0) {
            errors.push(ValidationError::InvalidShare {
                person: share.person,
                amount: share.amount,
            });
        }
    }

    let mut missing = HashSet::new();
    for &person in &draft.participants {
        if !covered.contains(&person) && missing.insert(person) {
            errors.push(ValidationError::MissingShare(person));
        }
    }

    let total: f64 = draft.individual_expenses.iter().map(|s| s.amount).sum();
    if (total - draft.amount).abs() > SPLIT_TOLERANCE {
        errors.push(ValidationError::ShareTotalMismatch {
            total,
            amount: draft.amount,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(amount: f64, participants: Vec<Person>) -> ExpenseDraft {
        ExpenseDraft {
            name: "Karaoke".to_string(),
            amount,
            paid_by: Person::Trung,
            participants,
            split_equally: true,
            individual_expenses: vec![],
        }
    }

    fn share(person: Person, amount: f64) -> PersonExpense {
        PersonExpense { person, amount }
    }

    #[test]
    fn equal_split_rebuilds_individual_expenses() {
        let mut input = draft(90.0, vec![Person::Trung, Person::Vu, Person::Minh]);
        input.individual_expenses = vec![share(Person::Lien, 5.0)];
        let valid = validate_draft(input).unwrap();
        assert_eq!(
            valid.individual_expenses,
            vec![
                share(Person::Trung, 30.0),
                share(Person::Vu, 30.0),
                share(Person::Minh, 30.0),
            ]
        );
    }

    #[test]
    fn collects_every_basic_violation() {
        let mut input = draft(0.0, vec![]);
        input.name = "   ".to_string();
        let errors = validate_draft(input).unwrap_err();
        assert_eq!(
            errors.0,
            vec![
                ValidationError::EmptyName,
                ValidationError::NonPositiveAmount(0.0),
                ValidationError::NoParticipants,
            ]
        );
    }

    #[test]
    fn rejects_duplicate_participants() {
        let errors = validate_draft(draft(10.0, vec![Person::Vu, Person::Vu])).unwrap_err();
        assert_eq!(errors.0, vec![ValidationError::DuplicateParticipant(Person::Vu)]);
    }

    #[test]
    fn rejects_nan_amount() {
        let errors = validate_draft(draft(f64::NAN, vec![Person::Vu])).unwrap_err();
        assert!(matches!(errors.0[0], ValidationError::NonPositiveAmount(_)));
    }

    #[test]
    fn rejects_amounts_that_could_overflow_balances() {
        let errors = validate_draft(draft(1.7e308, vec![Person::Vu])).unwrap_err();
        assert_eq!(
            errors.0,
            vec![ValidationError::AmountTooLarge {
                amount: 1.7e308,
                max: MAX_AMOUNT
            }]
        );
        assert!(validate_draft(draft(MAX_AMOUNT, vec![Person::Vu])).is_ok());
    }

    #[test]
    fn custom_split_within_tolerance_is_kept_verbatim() {
        let mut input = draft(100.0, vec![Person::Trung, Person::Vu]);
        input.split_equally = false;
        input.individual_expenses = vec![share(Person::Trung, 40.0), share(Person::Vu, 60.5)];
        let valid = validate_draft(input.clone()).unwrap();
        assert_eq!(valid, input);
    }

    #[test]
    fn custom_split_must_cover_participants_exactly() {
        let mut input = draft(100.0, vec![Person::Trung, Person::Vu]);
        input.split_equally = false;
        input.individual_expenses = vec![
            share(Person::Trung, 50.0),
            share(Person::Trung, 25.0),
            share(Person::Quang, 25.0),
        ];
        let errors = validate_draft(input).unwrap_err();
        assert_eq!(
            errors.0,
            vec![
                ValidationError::DuplicateShare(Person::Trung),
                ValidationError::UnexpectedShare(Person::Quang),
                ValidationError::MissingShare(Person::Vu),
            ]
        );
    }

    #[test]
    fn custom_split_total_must_match_amount() {
        let mut input = draft(100.0, vec![Person::Trung, Person::Vu]);
        input.split_equally = false;
        input.individual_expenses = vec![share(Person::Trung, 40.0), share(Person::Vu, 58.0)];
        let errors = validate_draft(input).unwrap_err();
        assert_eq!(
            errors.0,
            vec![ValidationError::ShareTotalMismatch {
                total: 98.0,
                amount: 100.0
            }]
        );
        assert_eq!(
            errors.to_string(),
            "individual amounts add up to 98, expected 100"
        );
    }

    #[test]
    fn negative_share_is_invalid() {
        let mut input = draft(10.0, vec![Person::Trung, Person::Vu]);
        input.split_equally = false;
        input.individual_expenses = vec![share(Person::Trung, 15.0), share(Person::Vu, -5.0)];
        let errors = validate_draft(input).unwrap_err();
        assert_eq!(
            errors.0,
            vec![ValidationError::InvalidShare {
                person: Person::Vu,
                amount: -5.0
            }]
        );
    }
}
