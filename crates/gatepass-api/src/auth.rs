use axum::{Json, extract::State};
use jsonwebtoken::{EncodingKey, Header, encode};

use gatepass_types::api::{Claims, LoginRequest, LoginResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// Admin token lifetime.
const TOKEN_TTL_HOURS: i64 = 12;

/// POST /auth/login — check the configured admin credentials and issue a
/// bearer token. There is no server-side session; logout is the client
/// discarding its token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.username != state.admin.username || req.password != state.admin.password {
        return Err(ApiError::Unauthorized);
    }

    let token = create_token(&state.jwt_secret)?;
    Ok(Json(LoginResponse { token }))
}

pub fn create_token(secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: "admin".to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("failed to sign token: {e}")))
}
