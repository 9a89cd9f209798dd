use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::job::{CATEGORIES, EMPLOYMENT_TYPES, EXPERIENCE_LEVELS, WORK_PLACES};
use crate::utils::time::parse_form_date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidation {
    Valid,
    Invalid(Vec<FieldError>),
}

impl DraftValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, DraftValidation::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            DraftValidation::Valid => &[],
            DraftValidation::Invalid(errors) => errors,
        }
    }
}

pub fn validate<T: Validate>(val: &T) -> DraftValidation {
    match val.validate() {
        Ok(()) => DraftValidation::Valid,
        Err(errors) => DraftValidation::Invalid(flatten(&errors)),
    }
}

fn flatten(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut flat: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |err| FieldError {
                field: field.clone(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string()),
            })
        })
        .collect();
    flat.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    flat
}

fn one_of(value: &str, options: &[&str], code: &'static str) -> Result<(), ValidationError> {
    if value.is_empty() || options.contains(&value) {
        return Ok(());
    }
    let mut err = ValidationError::new(code);
    err.message = Some(format!("must be one of: {}", options.join(", ")).into());
    Err(err)
}

pub fn validate_employment_type(value: &str) -> Result<(), ValidationError> {
    one_of(value, EMPLOYMENT_TYPES, "employment_type")
}

pub fn validate_category(value: &str) -> Result<(), ValidationError> {
    one_of(value, CATEGORIES, "category")
}

pub fn validate_work_place(value: &str) -> Result<(), ValidationError> {
    one_of(value, WORK_PLACES, "work_place")
}

pub fn validate_experience_level(value: &str) -> Result<(), ValidationError> {
    one_of(value, EXPERIENCE_LEVELS, "experience_level")
}

pub fn validate_expiration_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_form_date(value).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("expiration_date");
    err.message = Some("must be a date formatted as YYYY-MM-DD".into());
    Err(err)
}

pub fn validate_salary(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().any(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    let mut err = ValidationError::new("salary");
    err.message = Some("must contain an amount".into());
    Err(err)
}
