use serde::{Deserialize, Serialize};

/// Minimum length the backend enforces for usernames and passwords
const MIN_CREDENTIAL_LENGTH: usize = 6;

/// Login request body for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login response body
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
}

/// Registration request body for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl RegisterRequest {
    /// Check the fields against the rules the backend enforces, so obvious
    /// mistakes surface before a request is sent.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.is_empty() || self.password.is_empty() || self.email.is_empty() {
            return Err("Username, password and email are all required");
        }
        if self.username.len() < MIN_CREDENTIAL_LENGTH {
            return Err("Username must be at least 6 characters");
        }
        if self.password.len() < MIN_CREDENTIAL_LENGTH {
            return Err("Password must be at least 6 characters");
        }
        if !is_valid_email(&self.email) {
            return Err("Email address does not look valid");
        }
        Ok(())
    }
}

/// Lightweight email shape check: one '@' with a non-empty local part and a
/// dotted domain. The backend performs the authoritative validation.
fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
