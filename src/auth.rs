use crate::{now, AppState, Error, Result};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use entity::admin;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("{0}")]
    Invalid(&'static str),
    #[error("account approval is pending")]
    NotApproved,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JwtToken {
    // issued at
    pub iat: i64,
    // expiration
    pub exp: i64,
    // data
    pub admin_id: i32,
    /// refresh tokens can only mint new tokens
    #[serde(default)]
    pub refresh: bool,
}

impl JwtToken {
    pub fn from_str(token: &str, secret: &[u8]) -> Result<Self, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        Ok(
            jsonwebtoken::decode::<JwtToken>(
                token,
                &DecodingKey::from_secret(secret),
                &validation,
            )?
            .claims,
        )
    }

    pub fn generate(
        admin_id: i32,
        expiry: usize,
        refresh: bool,
        secret: &[u8],
    ) -> Result<String, AuthError> {
        let now = now() as i64;
        let payload = JwtToken {
            iat: now,
            exp: now + expiry as i64,
            admin_id,
            refresh,
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &payload,
            &EncodingKey::from_secret(secret),
        )?)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Message(format!("password hash failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// any logged in admin account, pending ones included
#[derive(Debug)]
pub struct AuthedAdmin {
    pub admin: admin::Model,
}

impl AuthedAdmin {
    pub async fn from_token(token: &str, state: &AppState) -> Result<Self, Error> {
        let token = JwtToken::from_str(token, state.setting.auth.secret.as_bytes())?;
        if token.refresh {
            return Err(AuthError::Invalid("refresh token not accepted here").into());
        }
        // a token for a deleted account is just a bad token
        let admin = match state.service.get_admin_by_id(token.admin_id).await {
            Ok(admin) => admin,
            Err(Error::NotFound(_)) => return Err(Error::Unauthorized),
            Err(e) => return Err(e),
        };
        Ok(Self { admin })
    }
}

impl FromRequest for AuthedAdmin {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<AuthedAdmin>>>>;

    fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if let Some(state) = req.app_data::<web::Data<AppState>>() {
                if let Some(auth) = req.headers().get(AUTHORIZATION) {
                    if let Ok(auth) = auth.to_str() {
                        if auth.starts_with("bearer") || auth.starts_with("Bearer") {
                            let token = auth[6..auth.len()].trim();
                            return AuthedAdmin::from_token(token, state).await;
                        }
                    }
                }
            }
            Err(AuthError::Invalid("missing auth token").into())
        })
    }
}

/// approved accounts only, everything that touches records requires this
#[derive(Debug)]
pub struct ApprovedAdmin {
    pub admin: admin::Model,
}

impl TryFrom<AuthedAdmin> for ApprovedAdmin {
    type Error = Error;

    fn try_from(authed: AuthedAdmin) -> Result<Self, Error> {
        if authed.admin.status == admin::Status::Approved {
            Ok(Self {
                admin: authed.admin,
            })
        } else {
            Err(AuthError::NotApproved.into())
        }
    }
}

impl FromRequest for ApprovedAdmin {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<ApprovedAdmin>>>>;

    fn from_request(req: &HttpRequest, pl: &mut Payload) -> Self::Future {
        let fut = AuthedAdmin::from_request(req, pl);
        Box::pin(async move { fut.await?.try_into() })
    }
}
