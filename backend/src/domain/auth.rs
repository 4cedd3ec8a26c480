//! Authentication primitives: credentials, password hashes and the
//! field-level validation envelope returned by account operations.
//!
//! Inbound adapters hand raw strings to these constructors; the domain decides
//! which failures are field errors and which are infrastructure errors.

use std::fmt;

use zeroize::Zeroizing;

use super::User;

/// Minimum number of characters a username or password must exceed.
pub const CREDENTIAL_MIN_EXCLUSIVE: usize = 2;

/// Field name used for username errors.
pub const USERNAME_FIELD: &str = "username";
/// Field name used for password errors.
pub const PASSWORD_FIELD: &str = "password";

const TOO_SHORT_MESSAGE: &str = "length must be greater than 2";
const USERNAME_TAKEN_MESSAGE: &str = "username already taken";
const UNKNOWN_USERNAME_MESSAGE: &str = "that username doesn't exist";
const INCORRECT_PASSWORD_MESSAGE: &str = "incorrect password";

/// Plaintext password held only for the duration of a request.
///
/// The buffer is zeroed on drop and `Debug` never prints the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap caller-supplied text without altering whitespace.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Borrow the plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// PHC-formatted password hash as produced by a [`PasswordHasher`].
///
/// [`PasswordHasher`]: crate::domain::ports::PasswordHasher
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash read from storage or produced by a hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Validation failure tied to one named input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: String,
    message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The username is already registered.
    pub fn username_taken() -> Self {
        Self::new(USERNAME_FIELD, USERNAME_TAKEN_MESSAGE)
    }

    /// No account exists for the supplied username.
    pub fn unknown_username() -> Self {
        Self::new(USERNAME_FIELD, UNKNOWN_USERNAME_MESSAGE)
    }

    /// The password does not match the stored hash.
    pub fn incorrect_password() -> Self {
        Self::new(PASSWORD_FIELD, INCORRECT_PASSWORD_MESSAGE)
    }

    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Human-readable explanation.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Outcome of a register or login attempt.
///
/// Errors and a user are mutually exclusive; the error list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserResponse {
    /// The attempt was rejected for the listed reasons.
    Errors(Vec<FieldError>),
    /// The attempt succeeded and the session now belongs to this user.
    User(User),
}

impl UserResponse {
    /// Reject with a single field error.
    pub fn rejected(error: FieldError) -> Self {
        Self::Errors(vec![error])
    }

    /// Field errors, when the attempt was rejected.
    pub fn errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::Errors(errors) => Some(errors.as_slice()),
            Self::User(_) => None,
        }
    }

    /// Authenticated user, when the attempt succeeded.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Errors(_) => None,
            Self::User(user) => Some(user),
        }
    }
}

/// Domain error returned when registration input is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Username had too few characters.
    #[error("username length must be greater than 2")]
    UsernameTooShort,
    /// Password had too few characters.
    #[error("password length must be greater than 2")]
    PasswordTooShort,
}

impl From<CredentialsValidationError> for FieldError {
    fn from(value: CredentialsValidationError) -> Self {
        match value {
            CredentialsValidationError::UsernameTooShort => {
                Self::new(USERNAME_FIELD, TOO_SHORT_MESSAGE)
            }
            CredentialsValidationError::PasswordTooShort => {
                Self::new(PASSWORD_FIELD, TOO_SHORT_MESSAGE)
            }
        }
    }
}

/// Username/password pair as submitted by a client.
///
/// ## Invariants
/// - Values are kept verbatim: no trimming or case folding, so lookups match
///   exactly what the user registered with.
/// - [`Credentials::validate_for_registration`] checks the username first and
///   stops at the first failure.
///
/// # Examples
/// ```
/// use accounts::domain::{Credentials, CredentialsValidationError};
///
/// let creds = Credentials::new("ab", "secret");
/// assert_eq!(
///     creds.validate_for_registration(),
///     Err(CredentialsValidationError::UsernameTooShort)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Password,
}

impl Credentials {
    /// Capture raw credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Password::new(password),
        }
    }

    /// Username as submitted.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as submitted.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Check the length rules that apply when creating an account.
    pub fn validate_for_registration(&self) -> Result<(), CredentialsValidationError> {
        if self.username.chars().count() <= CREDENTIAL_MIN_EXCLUSIVE {
            return Err(CredentialsValidationError::UsernameTooShort);
        }
        if self.password.char_len() <= CREDENTIAL_MIN_EXCLUSIVE {
            return Err(CredentialsValidationError::PasswordTooShort);
        }
        Ok(())
    }
}
