//! User aggregate and its validated components.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::ids::UserId;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmptyFullname,
    FullnameTooLong { max: usize },
    EmptyPasswordHash,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like an address"),
            Self::EmptyFullname => write!(f, "fullname must not be empty"),
            Self::FullnameTooLong { max } => {
                write!(f, "fullname must be at most {max} characters")
            }
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for a fullname.
pub const FULLNAME_MAX: usize = 120;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Intentionally loose; the mail system is the authority on deliverability.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address, trimmed and lowercased for lookups.
///
/// ## Invariants
/// - Non-empty once trimmed.
/// - Matches the loose `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from raw input.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Human readable name for the account holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fullname(String);

impl Fullname {
    /// Validate and construct a [`Fullname`] from raw input.
    pub fn new(fullname: impl Into<String>) -> Result<Self, UserValidationError> {
        let fullname = fullname.into();
        let trimmed = fullname.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyFullname);
        }
        if trimmed.chars().count() > FULLNAME_MAX {
            return Err(UserValidationError::FullnameTooLong { max: FULLNAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Fullname {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Opaque password hash produced by the hashing port.
///
/// The `Debug` representation is redacted so hashes never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Borrow the encoded hash for verification or storage.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Application user.
///
/// ## Invariants
/// - `email` is unique across users (enforced by the repository).
/// - Mutations go through the explicit `with_*` constructors so services and
///   adapters always exchange fully validated values.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: Email,
    fullname: Fullname,
    blocked: bool,
    is_admin: bool,
    password_hash: PasswordHash,
}

impl User {
    /// Build a new unprivileged, unblocked [`User`] from validated components.
    #[must_use]
    pub fn new(id: UserId, email: Email, fullname: Fullname, password_hash: PasswordHash) -> Self {
        Self {
            id,
            email,
            fullname,
            blocked: false,
            is_admin: false,
            password_hash,
        }
    }

    /// Reconstruct a persisted [`User`] including its flags.
    #[must_use]
    pub fn from_parts(
        id: UserId,
        email: Email,
        fullname: Fullname,
        blocked: bool,
        is_admin: bool,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            email,
            fullname,
            blocked,
            is_admin,
            password_hash,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Email address used for sign-in.
    #[must_use]
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name shown to other users.
    #[must_use]
    pub fn fullname(&self) -> &Fullname {
        &self.fullname
    }

    /// Whether the account is blocked from signing in.
    #[must_use]
    pub fn blocked(&self) -> bool {
        self.blocked
    }

    /// Whether the account holds administrator privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Stored password hash.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Copy of this user with the blocked flag replaced.
    #[must_use]
    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    /// Copy of this user with the admin flag replaced.
    #[must_use]
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("not-an-address", UserValidationError::InvalidEmail)]
    #[case("two@@example.com", UserValidationError::InvalidEmail)]
    #[case("missing@tld", UserValidationError::InvalidEmail)]
    fn email_rejects_invalid_input(#[case] input: &str, #[case] expected: UserValidationError) {
        let err = Email::new(input).expect_err("invalid email must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("Ada@Example.COM", "ada@example.com")]
    #[case("  ada@example.com  ", "ada@example.com")]
    fn email_normalises_case_and_whitespace(#[case] input: &str, #[case] expected: &str) {
        let email = Email::new(input).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn fullname_rejects_blank(#[case] input: &str) {
        let err = Fullname::new(input).expect_err("blank fullname must fail");
        assert_eq!(err, UserValidationError::EmptyFullname);
    }

    #[test]
    fn fullname_rejects_excessive_length() {
        let err = Fullname::new("x".repeat(FULLNAME_MAX + 1)).expect_err("too long");
        assert_eq!(err, UserValidationError::FullnameTooLong { max: FULLNAME_MAX });
    }

    #[test]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$10$abcdefg").expect("valid hash");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[test]
    fn new_users_start_unblocked_and_unprivileged() {
        let user = User::new(
            UserId::random(),
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Lovelace").expect("valid fullname"),
            PasswordHash::new("$2b$10$abcdefg").expect("valid hash"),
        );
        assert!(!user.blocked());
        assert!(!user.is_admin());
    }

    #[test]
    fn flag_constructors_replace_only_their_flag() {
        let user = User::new(
            UserId::random(),
            Email::new("ada@example.com").expect("valid email"),
            Fullname::new("Ada Lovelace").expect("valid fullname"),
            PasswordHash::new("$2b$10$abcdefg").expect("valid hash"),
        );
        let blocked = user.clone().with_blocked(true);
        assert!(blocked.blocked());
        assert!(!blocked.is_admin());
        let admin = user.with_admin(true);
        assert!(admin.is_admin());
        assert!(!admin.blocked());
    }
}
