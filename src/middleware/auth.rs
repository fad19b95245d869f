use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::Role;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Identity attached to every authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: Role,
    pub email: Option<String>,
    pub name: Option<String>,
    pub token: String,
    pub expires_at: usize,
}

impl CurrentUser {
    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::Forbidden(format!("Only {} accounts can do this", role)))
        }
    }
}

/// Tokens revoked by sign-out, kept until they would have expired anyway.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    revoked: Arc<Mutex<HashMap<String, usize>>>,
}

impl SessionRegistry {
    pub fn revoke(&self, token: &str, expires_at: usize) {
        let now = chrono::Utc::now().timestamp().max(0) as usize;
        let mut guard = self.revoked.lock().expect("session registry mutex poisoned");
        guard.retain(|_, exp| *exp > now);
        guard.insert(token.to_string(), expires_at);
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked
            .lock()
            .expect("session registry mutex poisoned")
            .contains_key(token)
    }
}

pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    role: Role,
    ttl: chrono::Duration,
    email: Option<String>,
    name: Option<String>,
) -> Result<String> {
    let exp = (chrono::Utc::now() + ttl).timestamp().max(0) as usize;
    let claims = Claims {
        sub: user_id,
        exp,
        role,
        email,
        name,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}

fn reject(code: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": code }))).into_response()
}

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return reject("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return reject("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return reject("unsupported_scheme");
    };

    let Some(claims) = decode_token(&state.settings.jwt_secret, token) else {
        return reject("invalid_token");
    };
    if state.sessions.is_revoked(token) {
        return reject("signed_out");
    }

    let user = CurrentUser {
        id: claims.sub,
        role: claims.role,
        email: claims.email,
        name: claims.name,
        token: token.to_string(),
        expires_at: claims.exp,
    };
    tracing::debug!(user_id = %user.id, role = %user.role, "authenticated request");
    req.extensions_mut().insert(user);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_decodes_with_same_secret() {
        let id = Uuid::new_v4();
        let token = issue_token(
            "secret",
            id,
            Role::Employer,
            chrono::Duration::hours(1),
            Some("hr@safari.co.ke".into()),
            None,
        )
        .unwrap();

        let claims = decode_token("secret", &token).expect("valid token");
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Employer);
        assert!(decode_token("other", &token).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(
            "secret",
            Uuid::new_v4(),
            Role::JobSeeker,
            chrono::Duration::hours(-2),
            None,
            None,
        )
        .unwrap();
        assert!(decode_token("secret", &token).is_none());
    }

    #[test]
    fn revoked_tokens_are_remembered_until_expiry() {
        let sessions = SessionRegistry::default();
        let future = (chrono::Utc::now().timestamp() + 3600) as usize;
        sessions.revoke("abc", future);
        assert!(sessions.is_revoked("abc"));
        assert!(!sessions.is_revoked("def"));

        sessions.revoke("stale", 1);
        sessions.revoke("fresh", future);
        assert!(!sessions.is_revoked("stale"));
    }
}
