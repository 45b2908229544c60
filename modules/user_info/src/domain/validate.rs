use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::contract::model::{UserInfo, UserInfoPatch};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_PHONE_LEN: usize = 15;
pub const MAX_ADDRESS_LEN: usize = 255;

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}

/// Validate a record against every constraint the backend enforces, collecting
/// all field errors rather than stopping at the first.
pub fn validate_user_info(entity: &UserInfo) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    required(&mut errors, "userId", &entity.user_id, MAX_NAME_LEN);
    required(&mut errors, "firstname", &entity.firstname, MAX_NAME_LEN);
    required(&mut errors, "lastname", &entity.lastname, MAX_NAME_LEN);
    required(&mut errors, "alias", &entity.alias, MAX_NAME_LEN);

    if entity.email.trim().is_empty() {
        errors.push(FieldError {
            field: "email",
            message: "is required".to_string(),
        });
    } else {
        check_email(&mut errors, &entity.email);
    }

    optional_max_len(&mut errors, "phone", entity.phone.as_deref(), MAX_PHONE_LEN);
    optional_max_len(
        &mut errors,
        "addressLine1",
        entity.address_line_1.as_deref(),
        MAX_ADDRESS_LEN,
    );
    optional_max_len(
        &mut errors,
        "addressLine2",
        entity.address_line_2.as_deref(),
        MAX_ADDRESS_LEN,
    );
    optional_max_len(&mut errors, "city", entity.city.as_deref(), MAX_NAME_LEN);
    optional_max_len(
        &mut errors,
        "country",
        entity.country.as_deref(),
        MAX_NAME_LEN,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate only the fields present in a patch.
pub fn validate_user_info_patch(patch: &UserInfoPatch) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if let Some(ref user_id) = patch.user_id {
        required(&mut errors, "userId", user_id, MAX_NAME_LEN);
    }
    if let Some(ref firstname) = patch.firstname {
        required(&mut errors, "firstname", firstname, MAX_NAME_LEN);
    }
    if let Some(ref lastname) = patch.lastname {
        required(&mut errors, "lastname", lastname, MAX_NAME_LEN);
    }
    if let Some(ref alias) = patch.alias {
        required(&mut errors, "alias", alias, MAX_NAME_LEN);
    }
    if let Some(ref email) = patch.email {
        check_email(&mut errors, email);
    }
    optional_max_len(&mut errors, "phone", patch.phone.as_deref(), MAX_PHONE_LEN);
    optional_max_len(
        &mut errors,
        "addressLine1",
        patch.address_line_1.as_deref(),
        MAX_ADDRESS_LEN,
    );
    optional_max_len(
        &mut errors,
        "addressLine2",
        patch.address_line_2.as_deref(),
        MAX_ADDRESS_LEN,
    );
    optional_max_len(&mut errors, "city", patch.city.as_deref(), MAX_NAME_LEN);
    optional_max_len(
        &mut errors,
        "country",
        patch.country.as_deref(),
        MAX_NAME_LEN,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn required(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    if value.trim().is_empty() {
        errors.push(FieldError {
            field,
            message: "is required".to_string(),
        });
    } else {
        max_len(errors, field, value, max);
    }
}

fn optional_max_len(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value {
        max_len(errors, field, value, max);
    }
}

fn max_len(errors: &mut Vec<FieldError>, field: &'static str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errors.push(FieldError {
            field,
            message: format!("is too long: {len} characters (max: {max})"),
        });
    }
}

fn check_email(errors: &mut Vec<FieldError>, email: &str) {
    if email.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError {
            field: "email",
            message: format!("is too long (max: {MAX_NAME_LEN})"),
        });
    }
    if !email_pattern().is_match(email) {
        errors.push(FieldError {
            field: "email",
            message: "does not match local@domain.tld".to_string(),
        });
    }
}
