//! PIN sign-in with transparent sign-up.
//!
//! The provider only speaks email/password, so the PIN is mapped onto
//! an internal address and used as the password. A credential rejection
//! for a well-formed PIN means the account does not exist yet, and the
//! flow creates it on the spot, including the users row and the initial
//! encrypted learning record.

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use hanzi_store::LearningStore;
use regex_lite::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};

const INTERNAL_EMAIL_DOMAIN: &str = "hanzi-learning.internal";

static PIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("PIN pattern is valid"));

/// Returns true when `pin` is exactly 8 ASCII digits.
pub fn is_valid_pin(pin: &str) -> bool {
    PIN_RE.is_match(pin)
}

/// Internal provider email synthesized from a PIN.
pub fn login_email(pin: &str) -> String {
    format!("pin_{pin}@{INTERNAL_EMAIL_DOMAIN}")
}

/// An established identity-provider session.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    /// Bearer token for follow-up calls. Absent when the provider
    /// defers the first sign-in after sign-up.
    pub access_token: Option<String>,
    /// True when this PIN was seen for the first time and a fresh
    /// account was provisioned.
    pub newly_registered: bool,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: String,
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: ProviderUser,
}

#[derive(Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    user: Option<ProviderUser>,
}

/// Error body shape varies across provider endpoints.
#[derive(Default, Deserialize)]
struct ProviderError {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

impl ProviderError {
    fn message(self) -> String {
        self.error_description
            .or(self.msg)
            .or(self.error)
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

fn is_invalid_credentials(message: &str) -> bool {
    message.to_ascii_lowercase().contains("invalid login credentials")
}

/// Authenticates users by 8-digit PIN.
pub struct PinAuthenticator {
    client: Client,
    config: AuthConfig,
    store: Arc<LearningStore>,
}

impl PinAuthenticator {
    pub fn new(config: AuthConfig, store: Arc<LearningStore>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            config,
            store,
        }
    }

    /// Signs the PIN in, registering it first if the provider has never
    /// seen it.
    pub async fn authenticate(&self, pin: &str) -> AuthResult<AuthSession> {
        if !is_valid_pin(pin) {
            return Err(AuthError::InvalidPin);
        }
        let email = login_email(pin);

        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.config.api_base_url
        );
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "email": email, "password": pin }))
            .send()
            .await?;

        if resp.status().is_success() {
            let token: TokenResponse = resp.json().await?;
            self.store
                .ensure_user(&token.user.id, token.user.email.as_deref(), pin)
                .await?;
            debug!("signed in existing user {}", token.user.id);
            return Ok(AuthSession {
                user_id: token.user.id,
                email,
                access_token: Some(token.access_token),
                newly_registered: false,
            });
        }

        let status = resp.status();
        let message = resp
            .json::<ProviderError>()
            .await
            .unwrap_or_default()
            .message();
        if !is_invalid_credentials(&message) {
            return Err(AuthError::Provider(format!("{status}: {message}")));
        }

        self.sign_up(pin, &email).await
    }

    async fn sign_up(&self, pin: &str, email: &str) -> AuthResult<AuthSession> {
        let url = format!("{}/auth/v1/signup", self.config.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "email": email, "password": pin }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<ProviderError>()
                .await
                .unwrap_or_default()
                .message();
            return Err(AuthError::Provider(format!(
                "sign-up failed ({status}): {message}"
            )));
        }

        let signup: SignUpResponse = resp.json().await?;
        let user = signup
            .user
            .ok_or_else(|| AuthError::Provider("sign-up returned no user".to_string()))?;

        self.store
            .ensure_user(&user.id, user.email.as_deref(), pin)
            .await?;
        self.store.create_initial(&user.id, pin).await?;
        info!("provisioned new user {}", user.id);

        Ok(AuthSession {
            user_id: user.id,
            email: email.to_string(),
            access_token: signup.access_token,
            newly_registered: true,
        })
    }
}
