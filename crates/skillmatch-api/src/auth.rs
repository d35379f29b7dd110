use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use skillmatch_db::{InsertOutcome, timestamp};
use skillmatch_types::Role;
use skillmatch_types::api::{
    Claims, LoginRequest, MessageResponse, RegisterRequest, SessionResponse, UserSummary,
};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{SESSION_COOKIE, Session};
use crate::state::{AppState, AuthConfig, with_db};
use crate::validation::validate_registration;

/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload.map_err(ApiError::unprocessable_body)?;
    let role = validate_registration(&req).map_err(ApiError::Unprocessable)?;

    let email = req.email.trim().to_string();
    let name = req.name.trim().to_string();

    // Check if email is taken
    let lookup = email.clone();
    if with_db(&state, move |db| db.get_user_by_email(&lookup)).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password = req.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(ApiError::internal)??;

    let user_id = Uuid::new_v4();
    let (uid, n, e) = (user_id.to_string(), name.clone(), email.clone());
    let created_at = timestamp(chrono::Utc::now());
    let outcome =
        with_db(&state, move |db| db.create_user(&uid, &n, &e, &password_hash, role, &created_at)).await?;

    // Lost a race with a concurrent registration for the same email
    if outcome == InsertOutcome::Duplicate {
        return Err(ApiError::conflict("User already exists"));
    }

    info!("Registered {} as {}", user_id, role);
    Ok((
        StatusCode::CREATED,
        Json(UserSummary {
            id: user_id,
            email,
            name,
            role,
        }),
    ))
}

/// POST /api/auth/login verifies credentials and sets the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<UserSummary>)> {
    let Json(req) = payload.map_err(|_| invalid_credentials())?;

    let email = req.email.trim().to_string();
    let user = with_db(&state, move |db| db.get_user_by_email(&email))
        .await?
        .ok_or_else(invalid_credentials)?;

    let stored_hash = user.password.clone();
    let password = req.password;
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(ApiError::internal)??;
    if !verified {
        warn!("Failed login for user {}", user.id);
        return Err(invalid_credentials());
    }

    let user_id: Uuid = user.id.parse().map_err(ApiError::internal)?;
    let role: Role = user.role.parse().map_err(ApiError::internal)?;

    let summary = UserSummary {
        id: user_id,
        email: user.email,
        name: user.name,
        role,
    };
    let token = create_token(&state.auth, &summary).map_err(ApiError::Internal)?;

    Ok((jar.add(session_cookie(&state.auth, token)), Json(summary)))
}

/// POST /api/auth/logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (
        jar,
        Json(MessageResponse {
            message: "Signed out".into(),
        }),
    )
}

/// GET /api/auth/session: the caller as the session token describes them.
pub async fn session(Extension(session): Extension<Session>) -> Json<SessionResponse> {
    Json(SessionResponse {
        redirect: session.role.landing_path().to_string(),
        user: UserSummary {
            id: session.user_id,
            email: session.email,
            name: session.name,
            role: session.role,
        },
    })
}

pub fn create_token(config: &AuthConfig, user: &UserSummary) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        exp: (chrono::Utc::now() + chrono::Duration::days(config.session_days)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .build()
}

/// Argon2id with a fresh random salt.
fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(ApiError::internal)
}

fn verify_password(password: &str, stored: &str) -> ApiResult<bool> {
    let parsed_hash = PasswordHash::new(stored).map_err(ApiError::internal)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::decode_token;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".into(),
            session_days: 30,
            secure_cookies: false,
        }
    }

    #[test]
    fn token_round_trips_role_claim() {
        let user = UserSummary {
            id: Uuid::new_v4(),
            email: "rita@example.com".into(),
            name: "Rita".into(),
            role: Role::Recruiter,
        };
        let token = create_token(&config(), &user).unwrap();
        let claims = decode_token("test-secret", &token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Recruiter);
        assert!(decode_token("other-secret", &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut cfg = config();
        cfg.session_days = -2;
        let user = UserSummary {
            id: Uuid::new_v4(),
            email: "c@example.com".into(),
            name: "Cleo".into(),
            role: Role::Candidate,
        };
        let token = create_token(&cfg, &user).unwrap();
        assert!(decode_token("test-secret", &token).is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn cookie_is_http_only() {
        let cookie = session_cookie(&config(), "tok".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
