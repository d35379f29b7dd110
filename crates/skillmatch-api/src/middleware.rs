use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use skillmatch_types::Role;
use skillmatch_types::api::Claims;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Name of the HTTP-only cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "skillmatch.session-token";

/// The authenticated caller, decoded from the session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Session {
    /// Handlers call this before touching data: the middleware only
    /// establishes who the caller is, not what they may do.
    pub fn require(&self, role: Role) -> ApiResult<()> {
        if self.role == role {
            return Ok(());
        }
        let message = match role {
            Role::Candidate => "Forbidden: Only candidates can access this endpoint",
            Role::Recruiter => "Forbidden: Only recruiters can access this endpoint",
            Role::Admin => "Forbidden: Only administrators can access this endpoint",
        };
        Err(ApiError::forbidden(message))
    }
}

impl From<Claims> for Session {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Authenticate the request from the session cookie (or a bearer token for
/// non-browser clients) and expose the caller as `Extension<Session>`.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        })
        .ok_or_else(ApiError::unauthorized)?;

    let claims = decode_token(&state.auth.jwt_secret, &token)?;

    req.extensions_mut().insert(Session::from(claims));
    Ok(next.run(req).await)
}

pub fn decode_token(secret: &str, token: &str) -> ApiResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::unauthorized())?;

    Ok(token_data.claims)
}
