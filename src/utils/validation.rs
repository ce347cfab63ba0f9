use std::collections::BTreeMap;

use validator::{Validate, ValidationErrors};

use crate::errors::AppError;

pub const EMAIL_DOMAIN_MESSAGE: &str = "please provide email provided by company domain!";

/// Structural validation. Failures become a 400 carrying one message per broken rule.
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload
        .validate()
        .map_err(|err| AppError::BadRequest(validation_messages(&err)))
}

fn validation_messages(err: &ValidationErrors) -> Vec<String> {
    // field_errors is a HashMap; sort so responses are stable
    let mut fields: Vec<_> = err.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect()
}

/// The email's domain must be `<company>.com`, ignoring ASCII case.
pub fn email_matches_company(email: &str, company: &str) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) => domain.eq_ignore_ascii_case(&format!("{}.com", company)),
        None => false,
    }
}

/// Domain check, run only after `validate_payload` passed. Produces a 422 keyed by field.
pub fn check_email_domain(email: Option<&str>, company: Option<&str>) -> Result<(), AppError> {
    let (Some(email), Some(company)) = (email, company) else {
        return Ok(());
    };

    if email_matches_company(email, company) {
        return Ok(());
    }

    let mut field_errors = BTreeMap::new();
    field_errors.insert("email".to_string(), vec![EMAIL_DOMAIN_MESSAGE.to_string()]);
    Err(AppError::UnprocessableEntity(field_errors))
}
