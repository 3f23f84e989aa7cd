//! User account entity and the inputs that create or change it.

use serde::Deserialize;

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

const MIN_PASSWORD_LEN: usize = 8;
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;

/// A persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub stripe_customer_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Name used in greetings; falls back to "User" like the welcome email expects.
    pub fn greeting_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or("User")
    }
}

/// Registration input, validated but not yet hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Registration {
    /// Checks email, username and password shape.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_username(&self.username)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::invalid_format(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}

/// Everything the repository needs to insert a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewUser {
    /// Builds a regular (non-admin) account from a validated registration.
    pub fn from_registration(registration: Registration, password_hash: String) -> Self {
        Self {
            email: normalize_email(&registration.email),
            username: registration.username.trim().to_string(),
            full_name: registration.full_name.filter(|n| !n.trim().is_empty()),
            password_hash,
            is_admin: false,
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.full_name.is_none()
            && self.is_active.is_none()
    }

    /// Applies the present fields to `user` and bumps `updated_at`.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(email) = &self.email {
            user.email = normalize_email(email);
        }
        if let Some(username) = &self.username {
            user.username = username.trim().to_string();
        }
        if let Some(full_name) = &self.full_name {
            user.full_name = Some(full_name.clone()).filter(|n| !n.trim().is_empty());
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Timestamp::now();
    }
}

/// Lower-cases and trims an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::invalid_format("email", "missing @ symbol"));
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') || domain.ends_with('.') {
        return Err(ValidationError::invalid_format("email", "not a valid address"));
    }
    Ok(())
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::empty_field("username"));
    }
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(ValidationError::out_of_range(
            "username",
            MIN_USERNAME_LEN as i64,
            MAX_USERNAME_LEN as i64,
            len as i64,
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ValidationError::invalid_format(
            "username",
            "only letters, digits, '_', '-' and '.' are allowed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            email: "Alice@Example.com ".to_string(),
            username: "alice".to_string(),
            password: "correct-horse".to_string(),
            full_name: Some("Alice Doe".to_string()),
        }
    }

    fn user() -> User {
        User {
            id: UserId::new(1).unwrap(),
            email: "alice@example.com".to_string(),
            username: "alice".to_string(),
            full_name: None,
            password_hash: "hash".to_string(),
            is_active: true,
            is_admin: false,
            stripe_customer_id: None,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(registration().validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let reg = Registration {
            password: "short".to_string(),
            ..registration()
        };
        assert!(matches!(
            reg.validate(),
            Err(ValidationError::InvalidFormat { field, .. }) if field == "password"
        ));
    }

    #[test]
    fn bad_emails_are_rejected() {
        for email in ["", "no-at-sign", "@example.com", "a@b", "a@b@c.com", "a@example."] {
            assert!(validate_email(email).is_err(), "accepted {email:?}");
        }
        assert!(validate_email("a@example.com").is_ok());
    }

    #[test]
    fn username_length_is_bounded() {
        let reg = Registration {
            username: "ab".to_string(),
            ..registration()
        };
        assert!(matches!(reg.validate(), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn new_user_normalizes_email_and_drops_blank_name() {
        let reg = Registration {
            full_name: Some("  ".to_string()),
            ..registration()
        };
        let new_user = NewUser::from_registration(reg, "hash".to_string());
        assert_eq!(new_user.email, "alice@example.com");
        assert_eq!(new_user.full_name, None);
        assert!(!new_user.is_admin);
    }

    #[test]
    fn update_applies_only_present_fields() {
        let mut u = user();
        let update = UserUpdate {
            full_name: Some("Alice Smith".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut u);
        assert_eq!(u.full_name.as_deref(), Some("Alice Smith"));
        assert_eq!(u.username, "alice");
        assert!(u.is_active);
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(UserUpdate::default().is_empty());
        assert!(!UserUpdate {
            is_active: Some(false),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn greeting_name_falls_back_to_user() {
        assert_eq!(user().greeting_name(), "User");
    }
}
