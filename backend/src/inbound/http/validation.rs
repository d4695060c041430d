//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes `invalid_request` with
//! `details.field` naming the offending JSON field and `details.code` a
//! stable machine-readable reason.

use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::domain::{
    ContactValidationError, CredentialsValidationError, Error, ExperienceId,
    ExperienceValidationError, WizardError,
};

/// Invalid-request error pointing at `field`.
pub(crate) fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn parse_experience_id(raw: &str) -> Result<ExperienceId, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("id must be a valid UUID").with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_uuid",
        }))
    })
}

pub(crate) fn experience_validation_error(err: ExperienceValidationError) -> Error {
    let (field, code) = match &err {
        ExperienceValidationError::EmptyField { field } => (*field, "empty_field"),
        ExperienceValidationError::RatingOutOfRange { .. } => ("rating", "rating_out_of_range"),
        ExperienceValidationError::ZeroGuests => ("guests", "zero_guests"),
        ExperienceValidationError::UnknownStatus { .. } => ("status", "unknown_status"),
    };
    field_error(field, code, err.to_string())
}

pub(crate) fn credentials_validation_error(err: CredentialsValidationError) -> Error {
    let code = match err {
        CredentialsValidationError::InvalidEmail => "invalid_email",
        CredentialsValidationError::EmptyPassword => "empty_password",
        CredentialsValidationError::PasswordMismatch => "password_mismatch",
        CredentialsValidationError::PasswordTooShort { .. } => "password_too_short",
        CredentialsValidationError::InvalidDisplayName => "invalid_display_name",
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn contact_validation_error(err: ContactValidationError) -> Error {
    let code = match err {
        ContactValidationError::EmptyName => "empty_name",
        ContactValidationError::InvalidEmail => "invalid_email",
        ContactValidationError::EmptyMessage => "empty_message",
    };
    field_error(err.field(), code, err.to_string())
}

pub(crate) fn wizard_error(err: WizardError) -> Error {
    let code = match &err {
        WizardError::EmptyLocation => "empty_location",
        WizardError::MissingDate => "missing_date",
        WizardError::MissingTime => "missing_time",
        WizardError::DateUnavailable { .. } => "date_unavailable",
        WizardError::MissingGroupType => "missing_group_type",
        WizardError::MissingVibe => "missing_vibe",
        WizardError::UnknownOption(_) => "unknown_option",
        WizardError::NotOnStep { .. } | WizardError::AtFirstStep => "invalid_step",
    };
    let message = err.to_string();
    match err.field() {
        Some(field) => field_error(field, code, message),
        None => Error::invalid_request(message).with_details(json!({ "code": code })),
    }
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in PATCH bodies. Use with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ErrorCode;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case(ExperienceValidationError::EmptyField { field: "restaurant" }, "restaurant", "empty_field")]
    #[case(ExperienceValidationError::RatingOutOfRange { value: 9 }, "rating", "rating_out_of_range")]
    #[case(ExperienceValidationError::ZeroGuests, "guests", "zero_guests")]
    fn experience_errors_name_their_field(
        #[case] err: ExperienceValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = experience_validation_error(err);
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some(field));
        assert_eq!(detail(&error, "code"), Some(code));
    }

    #[rstest]
    fn password_mismatch_keeps_the_form_message() {
        let error = credentials_validation_error(CredentialsValidationError::PasswordMismatch);
        assert_eq!(error.message(), "Passwords do not match");
        assert_eq!(detail(&error, "code"), Some("password_mismatch"));
    }

    #[rstest]
    fn malformed_ids_are_reported_with_their_value() {
        let error = parse_experience_id("nope").expect_err("not a uuid");
        assert_eq!(detail(&error, "value"), Some("nope"));
        assert_eq!(detail(&error, "code"), Some("invalid_uuid"));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"notes":null}"#, Some(None))]
    #[case(r#"{"notes":"hi"}"#, Some(Some("hi".to_owned())))]
    fn double_option_separates_absent_from_null(
        #[case] body: &str,
        #[case] expected: Option<Option<String>>,
    ) {
        let patch: Patch = serde_json::from_str(body).expect("valid patch");
        assert_eq!(patch.notes, expected);
    }
}
