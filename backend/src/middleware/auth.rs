//! Authentication middleware
//!
//! Session token authentication. The token is read from the
//! `Authorization: Bearer` header or, for browser requests, from the session
//! cookie set at login.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use shared::models::SessionUser;

use crate::error::{ErrorDetail, ErrorResponse};
use crate::services::auth::SessionCodec;
use crate::AppState;

/// Name of the HttpOnly cookie carrying the session token
pub const SESSION_COOKIE: &str = "sapi_session";

/// Authenticated user information extracted from the session token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: SessionUser,
}

impl AuthUser {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Authentication middleware that validates session tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer {
        Some(TypedHeader(Authorization(bearer))) => bearer.token().to_string(),
        None => match jar.get(SESSION_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return unauthorized_response("Missing session token"),
        },
    };

    let codec = SessionCodec::from_config(&state.config);
    let user = match codec.verify(&token) {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!("Rejected session token: {}", e);
            return unauthorized_response("Invalid or expired session");
        }
    };

    request.extensions_mut().insert(AuthUser { user });

    next.run(request).await
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message_en: message.to_string(),
            message_id: "Silakan login terlebih dahulu".to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message_en: "Authentication required".to_string(),
                        message_id: "Silakan login terlebih dahulu".to_string(),
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}
