use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims shared between the REST middleware and the WebSocket upgrade
/// check. Canonical definition lives here in gatepass-types to eliminate
/// duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

// -- Review actions --

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
