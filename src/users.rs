//! User Records
//!
//! TigerStyle: Explicit record types, field validation, identifier generation.
//!
//! A [`User`] is only ever constructed by the store. Callers describe what
//! they want with [`UserCreateInput`] and [`UserUpdateInput`], and the
//! validators here decide whether each field is acceptable.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::store::UserStoreError;

// =============================================================================
// TigerStyle Constants
// =============================================================================

/// Minimum accepted age (inclusive)
pub const USER_AGE_MIN: i64 = 0;

/// Maximum accepted age (inclusive)
pub const USER_AGE_MAX: i64 = 120;

/// Length of the random part of a generated identifier
pub const USER_ID_RANDOM_CHARS: usize = 11;

/// Shape of an acceptable email: `local@domain.tld`, no whitespace
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(EMAIL_PATTERN)
        .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
});

pub(crate) const MSG_REQUIRED_FIELDS: &str = "Name, email, and age are required fields";
pub(crate) const MSG_NAME_BLANK: &str = "Name must not be empty";
pub(crate) const MSG_AGE_RANGE: &str = "Age must be between 0 and 120";
pub(crate) const MSG_EMAIL_FORMAT: &str = "Invalid email format";

// =============================================================================
// Types
// =============================================================================

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier assigned by the store
    pub id: String,
    /// Display name (never blank)
    pub name: String,
    /// Email address, unique across live records
    pub email: String,
    /// Age in years, 0 to 120
    pub age: u8,
    /// Set once at creation
    #[serde(with = "timestamp_millis")]
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update
    #[serde(with = "timestamp_millis")]
    pub updated_at: DateTime<Utc>,
}

/// RFC 3339 with exactly three fractional digits and a `Z` suffix.
mod timestamp_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

/// `null` and absent both read as an empty string, which validation then
/// reports as a missing required field.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Fields accepted when creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreateInput {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub email: String,
    /// Optional so that a missing age can be reported as a validation error
    #[serde(default)]
    pub age: Option<i64>,
}

impl UserCreateInput {
    /// Convenience constructor for a fully populated input.
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: Some(age),
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdateInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
}

impl UserUpdateInput {
    /// Update only the name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Update only the email.
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Update only the age.
    pub fn age(age: i64) -> Self {
        Self {
            age: Some(age),
            ..Self::default()
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Check the email shape. Case and surrounding text are taken literally.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Range-check an age and narrow it to the stored width.
pub fn validate_age(age: i64) -> Result<u8, UserStoreError> {
    if !(USER_AGE_MIN..=USER_AGE_MAX).contains(&age) {
        return Err(UserStoreError::Validation(MSG_AGE_RANGE.to_string()));
    }
    u8::try_from(age).map_err(|_| UserStoreError::Validation(MSG_AGE_RANGE.to_string()))
}

pub(crate) fn validate_email(email: &str) -> Result<(), UserStoreError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(UserStoreError::Validation(MSG_EMAIL_FORMAT.to_string()))
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), UserStoreError> {
    if name.trim().is_empty() {
        return Err(UserStoreError::Validation(MSG_NAME_BLANK.to_string()));
    }
    Ok(())
}

/// Field checks for a create request, in reporting order: required fields,
/// age range, email format. Returns the narrowed age.
pub(crate) fn validate_create(input: &UserCreateInput) -> Result<u8, UserStoreError> {
    let age = match input.age {
        Some(age) if !input.name.trim().is_empty() && !input.email.is_empty() => age,
        _ => return Err(UserStoreError::Validation(MSG_REQUIRED_FIELDS.to_string())),
    };
    let age = validate_age(age)?;
    validate_email(&input.email)?;
    Ok(age)
}

/// Field checks for an update request. Only supplied fields are checked:
/// name, email format, then age range. Returns the narrowed age if supplied.
pub(crate) fn validate_update(input: &UserUpdateInput) -> Result<Option<u8>, UserStoreError> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    input.age.map(validate_age).transpose()
}

// =============================================================================
// Identifiers
// =============================================================================

/// Generate a fresh identifier: base-36 milliseconds plus a random suffix.
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(USER_ID_RANDOM_CHARS)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("{}{}", to_base36(millis), suffix)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, SimClock};

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("john@example"));
        assert!(!is_valid_email("john example@test.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("john@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        assert_eq!(validate_age(0).unwrap(), 0);
        assert_eq!(validate_age(120).unwrap(), 120);
        assert!(matches!(validate_age(-1), Err(UserStoreError::Validation(_))));
        assert!(matches!(validate_age(121), Err(UserStoreError::Validation(_))));
    }

    #[test]
    fn test_create_reports_missing_fields_first() {
        let input = UserCreateInput {
            name: "   ".to_string(),
            email: "not-an-email".to_string(),
            age: Some(500),
        };
        let err = validate_create(&input).unwrap_err();
        assert_eq!(err.to_string(), MSG_REQUIRED_FIELDS);

        let missing_age = UserCreateInput {
            age: None,
            ..UserCreateInput::new("Ann", "ann@example.com", 1)
        };
        assert_eq!(
            validate_create(&missing_age).unwrap_err().to_string(),
            MSG_REQUIRED_FIELDS
        );
    }

    #[test]
    fn test_create_checks_age_before_email() {
        let input = UserCreateInput::new("Ann", "bad", 200);
        assert_eq!(validate_create(&input).unwrap_err().to_string(), MSG_AGE_RANGE);

        let input = UserCreateInput::new("Ann", "bad", 20);
        assert_eq!(validate_create(&input).unwrap_err().to_string(), MSG_EMAIL_FORMAT);
    }

    #[test]
    fn test_update_only_checks_supplied_fields() {
        assert_eq!(validate_update(&UserUpdateInput::default()).unwrap(), None);
        assert_eq!(validate_update(&UserUpdateInput::age(31)).unwrap(), Some(31));
        assert!(validate_update(&UserUpdateInput::email("nope")).is_err());
        assert!(validate_update(&UserUpdateInput::name(" ")).is_err());
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let now = SimClock::new().now();
        let a = generate_id(now);
        let b = generate_id(now);

        assert!(a.starts_with(&to_base36(1_704_067_200_000)));
        assert_eq!(a.len(), b.len());
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let now = SimClock::new().now();
        let user = User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            age: 28,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["createdAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["updatedAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["age"], 28);

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_create_input_reads_null_as_missing() {
        let input: UserCreateInput =
            serde_json::from_str(r#"{"name": null, "email": null, "age": 20}"#).unwrap();

        assert_eq!(input.name, "");
        assert_eq!(input.email, "");
        assert_eq!(
            validate_create(&input).unwrap_err().to_string(),
            MSG_REQUIRED_FIELDS
        );
    }
}
