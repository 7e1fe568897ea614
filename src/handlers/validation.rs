//! Form validation
//!
//! Checks run in a fixed order and stop at the first failure.

use thiserror::Error;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Values read from the login form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Values read from the registration form
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

/// First failed check of a form
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your first and last name")]
    MissingName,

    #[error("Please enter your email address")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a password")]
    MissingPassword,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please accept the Terms of Service and Privacy Policy")]
    TermsNotAccepted,
}

/// Loose email shape check: an `@` and a `.` somewhere.
pub fn looks_like_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

pub fn validate_login(form: &LoginForm) -> Result<(), ValidationError> {
    let email = form.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !looks_like_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if form.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

pub fn validate_registration(form: &RegistrationForm) -> Result<(), ValidationError> {
    if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let email = form.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !looks_like_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if form.password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if !form.accept_terms {
        return Err(ValidationError::TermsNotAccepted);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_registration() -> RegistrationForm {
        RegistrationForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: "engine1".into(),
            confirm_password: "engine1".into(),
            accept_terms: true,
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert_eq!(validate_registration(&valid_registration()), Ok(()));
    }

    #[test]
    fn test_mismatch_reported_alone() {
        let form = RegistrationForm {
            confirm_password: "engine2".into(),
            ..valid_registration()
        };
        let err = validate_registration(&form).unwrap_err();
        assert_eq!(err, ValidationError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_length_checked_before_mismatch() {
        let form = RegistrationForm {
            password: "short".into(),
            confirm_password: "different".into(),
            ..valid_registration()
        };
        assert_eq!(
            validate_registration(&form),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn test_registration_check_order() {
        let empty = RegistrationForm::default();
        assert_eq!(validate_registration(&empty), Err(ValidationError::MissingName));

        let form = RegistrationForm {
            last_name: "   ".into(),
            ..valid_registration()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::MissingName));

        let form = RegistrationForm {
            email: String::new(),
            password: String::new(),
            ..valid_registration()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::MissingEmail));

        let form = RegistrationForm {
            email: "ada-at-example".into(),
            ..valid_registration()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::InvalidEmail));

        let form = RegistrationForm {
            password: String::new(),
            accept_terms: false,
            ..valid_registration()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::MissingPassword));

        let form = RegistrationForm {
            accept_terms: false,
            ..valid_registration()
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::TermsNotAccepted));
    }

    #[test]
    fn test_login_checks() {
        let form = LoginForm {
            email: " ada@example.com ".into(),
            password: "x".into(),
            remember_me: false,
        };
        assert_eq!(validate_login(&form), Ok(()));

        let form = LoginForm {
            email: "ada@example".into(),
            password: "x".into(),
            remember_me: false,
        };
        assert_eq!(validate_login(&form), Err(ValidationError::InvalidEmail));

        let form = LoginForm {
            email: "ada@example.com".into(),
            ..Default::default()
        };
        assert_eq!(validate_login(&form), Err(ValidationError::MissingPassword));
    }
}
