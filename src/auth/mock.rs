//! Mock login
//!
//! A single hard-coded account checked against the configured credentials.
//! Issued tokens are opaque and are not checked by any route.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};

/// Credentials accepted by the mock login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockAuthConfig {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

impl Default for MockAuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

/// Login request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUser {
    pub username: String,
}

/// Checks login requests against the configured account
#[derive(Debug, Clone, Default)]
pub struct MockAuthenticator {
    config: MockAuthConfig,
}

impl MockAuthenticator {
    pub fn new(config: MockAuthConfig) -> Self {
        Self { config }
    }

    pub fn login(&self, request: &LoginRequest) -> AuthResult<LoginResponse> {
        let username = request
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::MissingCredentials("username"))?;
        let password = request
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::MissingCredentials("password"))?;

        // Evaluate both comparisons so timing does not reveal which failed
        let user_ok = constant_time_str_eq(username, &self.config.username);
        let pass_ok = constant_time_str_eq(password, &self.config.password);
        if !(user_ok & pass_ok) {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(LoginResponse {
            access_token: Uuid::new_v4().simple().to_string(),
            token_type: "Bearer".to_string(),
            user: LoginUser {
                username: username.to_string(),
            },
        })
    }
}

fn constant_time_str_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_login_success() {
        let auth = MockAuthenticator::default();

        let response = auth.login(&request("admin", "admin")).unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.user.username, "admin");
        assert_eq!(response.access_token.len(), 32);
    }

    #[test]
    fn test_login_wrong_password() {
        let auth = MockAuthenticator::new(MockAuthConfig {
            username: "demo".to_string(),
            password: "s3cret".to_string(),
        });

        assert_eq!(
            auth.login(&request("demo", "nope")).unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth.login(&request("admin", "s3cret")).unwrap_err(),
            AuthError::InvalidCredentials
        );
    }

    #[test]
    fn test_login_missing_fields() {
        let auth = MockAuthenticator::default();

        let missing = LoginRequest {
            username: Some("admin".to_string()),
            password: None,
        };
        assert_eq!(
            auth.login(&missing).unwrap_err(),
            AuthError::MissingCredentials("password")
        );
        assert_eq!(
            auth.login(&LoginRequest::default()).unwrap_err(),
            AuthError::MissingCredentials("username")
        );
    }
}
