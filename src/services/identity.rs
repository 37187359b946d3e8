// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password sign-in against Firebase Authentication.
//!
//! Only used to establish who the user is. Sessions after that are carried
//! by our own JWT (see `middleware::auth`).

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider error codes that mean "wrong email or password".
const CREDENTIAL_ERRORS: &[&str] = &[
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_PASSWORD",
    "EMAIL_NOT_FOUND",
    "INVALID_EMAIL",
    "USER_DISABLED",
];

/// Identity established by a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInUser {
    /// Stable provider user ID
    pub uid: String,
    pub email: String,
}

/// Fixed account used by the offline identity mode.
#[derive(Debug, Clone)]
pub struct StaticAccount {
    pub email: String,
    pub password: String,
    pub uid: String,
}

#[derive(Clone)]
enum IdentityMode {
    Firebase {
        http: reqwest::Client,
        base_url: String,
        api_key: String,
    },
    Static(Vec<StaticAccount>),
}

/// Sign-in client for the external authentication provider.
#[derive(Clone)]
pub struct IdentityService {
    mode: IdentityMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Deserialize)]
struct ProviderError {
    message: String,
}

impl IdentityService {
    /// Create a client for Firebase Authentication.
    ///
    /// For local development with the emulator, set FIREBASE_AUTH_EMULATOR_HOST.
    pub fn new(api_key: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            Err(_) => IDENTITY_TOOLKIT_URL.to_string(),
        };

        Ok(Self {
            mode: IdentityMode::Firebase {
                http,
                base_url,
                api_key: api_key.to_string(),
            },
        })
    }

    /// Create an offline client that only knows the given accounts.
    ///
    /// This is intended for deterministic local/integration tests.
    pub fn new_with_static_accounts(accounts: Vec<StaticAccount>) -> Self {
        Self {
            mode: IdentityMode::Static(accounts),
        }
    }

    /// Verify email and password, returning the user's identity.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedInUser, AppError> {
        match &self.mode {
            IdentityMode::Static(accounts) => accounts
                .iter()
                .find(|a| a.email.eq_ignore_ascii_case(email) && a.password == password)
                .map(|a| SignedInUser {
                    uid: a.uid.clone(),
                    email: a.email.clone(),
                })
                .ok_or(AppError::InvalidCredentials),
            IdentityMode::Firebase {
                http,
                base_url,
                api_key,
            } => {
                let url = format!("{}/accounts:signInWithPassword", base_url);
                let response = http
                    .post(&url)
                    .query(&[("key", api_key.as_str())])
                    .json(&SignInRequest {
                        email,
                        password,
                        return_secure_token: true,
                    })
                    .send()
                    .await
                    .map_err(|e| AppError::AuthProvider(e.to_string()))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(classify_provider_error(status.as_u16(), &body));
                }

                let signed_in: SignInResponse = response
                    .json()
                    .await
                    .map_err(|e| AppError::AuthProvider(format!("JSON parse error: {}", e)))?;

                Ok(SignedInUser {
                    uid: signed_in.local_id,
                    email: signed_in.email.unwrap_or_else(|| email.to_string()),
                })
            }
        }
    }
}

/// Map a failed provider response onto an application error.
fn classify_provider_error(status: u16, body: &str) -> AppError {
    let code = serde_json::from_str::<ProviderErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_default();

    // Messages look like "INVALID_PASSWORD" or "TOO_MANY_ATTEMPTS_TRY_LATER : ...".
    let code = code.split(':').next().unwrap_or("").trim();

    if status == 400 && CREDENTIAL_ERRORS.contains(&code) {
        return AppError::InvalidCredentials;
    }

    tracing::warn!(status, code, "Auth provider rejected sign-in");
    AppError::AuthProvider(format!("HTTP {}: {}", status, code))
}
