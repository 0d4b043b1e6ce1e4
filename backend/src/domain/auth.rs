//! Authentication primitives: sign-in credentials and sign-up passwords.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Minimum accepted password length at sign-up.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or malformed.
    InvalidEmail(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(inner) => write!(f, "{inner}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated sign-in credentials used by the login use-case.
///
/// ## Invariants
/// - `email` satisfies [`Email`] validation.
/// - `password` is non-empty but otherwise untouched so credential
///   comparisons are never surprising.
#[derive(Debug, Clone)]
pub struct SignInCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email).map_err(CredentialsValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the account lookup.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Error returned when a sign-up password fails the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password shorter than [`PASSWORD_MIN`] characters.
    TooShort { min: usize },
}

impl fmt::Display for PasswordPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for PasswordPolicyError {}

/// A raw sign-up password that satisfied the length policy.
///
/// Held in a zeroising buffer; the only consumer is the hashing port.
#[derive(Debug, Clone)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate and construct a [`PlainPassword`] from raw input.
    pub fn new(password: impl Into<String>) -> Result<Self, PasswordPolicyError> {
        let password = password.into();
        if password.chars().count() < PASSWORD_MIN {
            return Err(PasswordPolicyError::TooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(password)))
    }

    /// Borrow the raw password for hashing.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw")]
    #[case("not-an-address", "pw")]
    fn credentials_reject_bad_email(#[case] email: &str, #[case] password: &str) {
        let err = SignInCredentials::try_from_parts(email, password)
            .expect_err("invalid email must fail");
        assert!(matches!(err, CredentialsValidationError::InvalidEmail(_)));
    }

    #[test]
    fn credentials_reject_empty_password() {
        let err = SignInCredentials::try_from_parts("ada@example.com", "")
            .expect_err("empty password must fail");
        assert_eq!(err, CredentialsValidationError::EmptyPassword);
    }

    #[test]
    fn credentials_preserve_password_whitespace() {
        let creds = SignInCredentials::try_from_parts("ada@example.com", " secret ")
            .expect("valid credentials");
        assert_eq!(creds.password(), " secret ");
        assert_eq!(creds.email().as_ref(), "ada@example.com");
    }

    #[rstest]
    #[case("")]
    #[case("1234567")]
    fn short_passwords_fail_the_policy(#[case] input: &str) {
        let err = PlainPassword::new(input).expect_err("short password must fail");
        assert_eq!(err, PasswordPolicyError::TooShort { min: PASSWORD_MIN });
    }

    #[test]
    fn minimum_length_password_is_accepted() {
        let password = PlainPassword::new("12345678").expect("valid password");
        assert_eq!(password.expose(), "12345678");
    }
}
