// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password session routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE, SESSION_TTL_SECS};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Login form body.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub uid: String,
    pub email: String,
    /// Session token, also set as an HttpOnly cookie
    pub token: String,
}

/// Sign in with the identity provider and start a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    let email = request.email.trim();
    if email.is_empty() || request.password.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Please enter both email and password".to_string(),
        ));
    }

    let user = state
        .identity
        .sign_in(email, &request.password)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::InvalidCredentials) {
                tracing::info!("Login rejected: invalid credentials");
            }
        })?;

    let token = create_jwt(&user.uid, Some(&user.email), &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    tracing::info!(uid = %user.uid, "Login successful, session issued");

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!is_local_origin(&state.config.frontend_url))
        .max_age(time::Duration::seconds(SESSION_TTL_SECS as i64));

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            uid: user.uid,
            email: user.email,
            token,
        }),
    ))
}

/// End the session by clearing the cookie.
///
/// JWTs are stateless; a copied bearer token stays valid until it expires.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// Plain-HTTP development origins cannot receive `Secure` cookies.
fn is_local_origin(url: &str) -> bool {
    url.starts_with("http://localhost") || url.starts_with("http://127.0.0.1")
}
