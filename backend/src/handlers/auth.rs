//! Authentication handlers

use axum::{extract::State, Form, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use shared::forms::LoginForm;
use shared::models::SessionUser;
use shared::types::ActionState;

use crate::error::{AppError, AppResult};
use crate::middleware::{CurrentUser, SESSION_COOKIE};
use crate::services::auth::SessionToken;
use crate::services::AuthService;
use crate::AppState;

/// Login endpoint handler. The token is returned in the body and as an
/// HttpOnly cookie for the browser.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<(CookieJar, Json<SessionToken>)> {
    form.check().map_err(AppError::invalid_form)?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let session = auth_service.login(form.username.trim(), &form.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(session)))
}

/// Logout endpoint handler
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ActionState>) {
    let mut cookie = Cookie::build((SESSION_COOKIE, "")).path("/").http_only(true).build();
    cookie.make_removal();
    (jar.add(cookie), Json(ActionState::message("Berhasil logout.")))
}

/// Current session
pub async fn session(CurrentUser(auth): CurrentUser) -> Json<SessionUser> {
    Json(auth.user)
}
