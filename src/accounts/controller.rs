use axum::{
    extract::{FromRequestParts, State},
    http::{header, HeaderMap, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use crate::accounts::command::login_cmd::{LoginCommand, LoginCommandRequest};
use crate::accounts::command::logout_cmd::{LogoutCommand, LogoutCommandRequest};
use crate::accounts::command::signup_cmd::{SignupCommand, SignupCommandRequest};
use crate::accounts::domain::AccountService;
use crate::accounts::dto::{LoginForm, SignupForm};
use crate::accounts::factory;
use crate::core::command::Command;
use crate::core::controller::{AppState, HOME_PATH, json_to_server_error, ServerError};
use crate::core::domain::Identity;
use crate::core::library::{LibraryError, Role};

pub(crate) const SESSION_COOKIE: &str = "session_id";

async fn build_service(state: &AppState) -> Result<Box<dyn AccountService>, ServerError> {
    Ok(factory::create_account_service(&state.config, state.store).await?)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers.get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// reads the session token from a bearer Authorization header or the session cookie
pub(crate) fn session_token(headers: &HeaderMap, cookies: &Cookies) -> Option<String> {
    bearer_token(headers).or_else(|| {
        cookies.get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

fn session_cookie(session_id: String, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session_id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::hours(ttl_hours))
        .finish()
}

async fn request_cookies(parts: &mut Parts, state: &AppState) -> Result<Cookies, ServerError> {
    Cookies::from_request_parts(parts, state).await
        .map_err(|(status, message)| ServerError::new(status, message))
}

fn redirect_to(location: &str) -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, location.to_string())]).into_response()
}

// Every handler that names Identity in its arguments requires a live session; a missing or
// expired one sends the caller to the login page.
#[axum::async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookies = request_cookies(parts, state).await?;
        let token = session_token(&parts.headers, &cookies).ok_or_else(ServerError::login_required)?;
        let svc = build_service(state).await?;
        match svc.resolve(token.as_str()).await {
            Ok(identity) => Ok(identity),
            Err(LibraryError::Unauthenticated { .. }) => Err(ServerError::login_required()),
            Err(err) => Err(ServerError::from(err)),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SignupPage {
    pub form: SignupForm,
    pub roles: Vec<Role>,
}

pub(crate) async fn signup_page() -> Json<SignupPage> {
    Json(SignupPage {
        form: SignupForm::default(),
        roles: vec![Role::User, Role::Staff],
    })
}

pub(crate) async fn signup(
    State(state): State<AppState>,
    cookies: Cookies,
    json: Json<Value>) -> Result<Response, ServerError> {
    let form: SignupForm = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(&state).await?;
    let res = SignupCommand::new(svc).execute(SignupCommandRequest { form }).await?;
    cookies.add(session_cookie(res.session.session_id.to_string(), state.config.session_ttl_hours));
    Ok(Json(res).into_response())
}

pub(crate) async fn login_page(identity: Option<Identity>) -> Response {
    match identity {
        Some(_) => redirect_to(HOME_PATH),
        None => Json(LoginForm::default()).into_response(),
    }
}

pub(crate) async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    json: Json<Value>) -> Result<Response, ServerError> {
    let form: LoginForm = serde_json::from_value(json.0).map_err(json_to_server_error)?;
    let svc = build_service(&state).await?;
    let res = LoginCommand::new(svc).execute(LoginCommandRequest { form }).await?;
    cookies.add(session_cookie(res.session.session_id.to_string(), state.config.session_ttl_hours));
    Ok(Json(res).into_response())
}

pub(crate) async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap) -> Result<Response, ServerError> {
    let svc = build_service(&state).await?;
    let req = LogoutCommandRequest { session_id: session_token(&headers, &cookies) };
    let res = LogoutCommand::new(svc).execute(req).await?;
    cookies.remove(Cookie::build(SESSION_COOKIE, "").path("/").finish());
    Ok(Json(res).into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};
    use tower_cookies::cookie::SameSite;
    use crate::accounts::controller::{bearer_token, session_cookie, SESSION_COOKIE};

    #[tokio::test]
    async fn test_should_read_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(Some("abc123".to_string()), bearer_token(&headers));
    }

    #[tokio::test]
    async fn test_should_ignore_missing_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(None, bearer_token(&headers));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(None, bearer_token(&headers));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(None, bearer_token(&headers));
    }

    #[tokio::test]
    async fn test_should_build_session_cookie() {
        let cookie = session_cookie("xyz789".to_string(), 24);
        assert_eq!(SESSION_COOKIE, cookie.name());
        assert_eq!("xyz789", cookie.value());
        assert_eq!(Some("/"), cookie.path());
        assert_eq!(Some(true), cookie.http_only());
        assert_eq!(Some(SameSite::Lax), cookie.same_site());
        assert_eq!(Some(24 * 3600), cookie.max_age().map(|d| d.whole_seconds()));
    }
}
