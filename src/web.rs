use axum::{
    body::HttpBody,
    routing::{get, post},
    BoxError, Router,
};
use tower_cookies::CookieManagerLayer;
use crate::accounts::controller::{login, login_page, logout, signup, signup_page};
use crate::catalog::controller::{add_book, confirm_remove_book, edit_book_form, find_book_by_id, new_book_form,
                                 remove_book, search_books, update_book};
use crate::categories::controller::{add_category, list_categories, remove_category};
use crate::core::controller::AppState;
use crate::dashboard::controller::staff_dashboard;
use crate::ledger::controller::{issue_book, my_books, return_book};

pub fn build_router<B>(state: AppState) -> Router<(), B>
where
    B: HttpBody + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    Router::new()
        .route("/", get(search_books))
        .route("/books/add/", get(new_book_form).post(add_book))
        .route("/books/:book_id/", get(find_book_by_id))
        .route("/books/:book_id/edit/", get(edit_book_form).post(update_book))
        .route("/books/:book_id/delete/", get(confirm_remove_book).post(remove_book))
        .route("/books/:book_id/issue/", post(issue_book))
        .route("/transactions/:transaction_id/return/", post(return_book))
        .route("/my-books/", get(my_books))
        .route("/staff-dashboard/", get(staff_dashboard))
        .route("/categories/", get(list_categories).post(add_category))
        .route("/categories/:category_id/delete/", post(remove_category))
        .route("/signup/", get(signup_page).post(signup))
        .route("/login/", get(login_page).post(login))
        .route("/logout/", get(logout).post(logout))
        .layer(CookieManagerLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;
    use crate::core::controller::AppState;
    use crate::core::repository::RepositoryStore;
    use crate::web::build_router;

    fn app() -> Router {
        build_router(AppState::new("test", RepositoryStore::InMemory))
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("session_id={}", token));
        }
        match body {
            Some(body) => builder.header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())).expect("should build request"),
            None => builder.body(Body::empty()).expect("should build request"),
        }
    }

    async fn send(req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let (status, location, _, body) = send_with_cookie(req).await;
        (status, location, body)
    }

    async fn send_with_cookie(req: Request<Body>) -> (StatusCode, Option<String>, Option<String>, Value) {
        let res = app().oneshot(req).await.expect("should respond");
        let cookie = res.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).map(str::to_string);
        let status = res.status();
        let location = res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(str::to_string);
        let bytes = hyper::body::to_bytes(res.into_body()).await.expect("should read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, location, cookie, body)
    }

    async fn signup(role: &str) -> String {
        let username = format!("web_{}", Uuid::new_v4().simple());
        let (status, _, body) = send(request(Method::POST, "/signup/", None, Some(json!({
            "username": username, "password1": "s3cret-pass", "password2": "s3cret-pass", "role": role,
        })))).await;
        assert_eq!(StatusCode::OK, status);
        body["session"]["session_id"].as_str().expect("should return session").to_string()
    }

    #[tokio::test]
    async fn test_should_redirect_anonymous_to_login() {
        let (status, location, _) = send(request(Method::GET, "/", None, None)).await;
        assert_eq!(StatusCode::SEE_OTHER, status);
        assert_eq!(Some("/login/".to_string()), location);
        let (status, _, _) = send(request(Method::GET, "/", Some("bogus"), None)).await;
        assert_eq!(StatusCode::SEE_OTHER, status);
    }

    #[tokio::test]
    async fn test_should_deny_reader_adding_book() {
        let token = signup("USER").await;
        let title = format!("Denied {}", Uuid::new_v4());
        let (status, _, body) = send(request(Method::POST, "/books/add/", Some(token.as_str()),
                                             Some(json!({"title": title, "authors": "Nobody"})))).await;
        assert_eq!(StatusCode::FORBIDDEN, status);
        assert_eq!("error", body["notice"]["level"]);

        let (status, _, body) = send(request(Method::GET, format!("/?q={}", &title[7..]).as_str(), Some(token.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(0, body["books"].as_array().map(Vec::len).unwrap_or_default());
    }

    #[tokio::test]
    async fn test_should_issue_and_return_over_http() {
        let staff = signup("STAFF").await;
        let reader = signup("USER").await;
        let other = signup("USER").await;
        let (status, _, body) = send(request(Method::POST, "/books/add/", Some(staff.as_str()), Some(json!({
            "title": format!("Http {}", Uuid::new_v4()), "authors": "Someone", "total_quantity": 1,
        })))).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("/staff-dashboard/", body["redirect"]);
        let book_id = body["book"]["book_id"].as_str().expect("should return book").to_string();

        let (status, _, body) = send(request(Method::POST, format!("/books/{}/issue/", book_id).as_str(),
                                             Some(reader.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("/my-books/", body["redirect"]);
        let transaction_id = body["transaction"]["transaction_id"].as_str().expect("should return transaction").to_string();

        let (status, _, body) = send(request(Method::POST, format!("/books/{}/issue/", book_id).as_str(),
                                             Some(other.as_str()), None)).await;
        assert_eq!(StatusCode::CONFLICT, status);
        assert_eq!("/", body["redirect"]);

        let return_uri = format!("/transactions/{}/return/", transaction_id);
        let (status, _, _) = send(request(Method::POST, return_uri.as_str(), Some(other.as_str()), None)).await;
        assert_eq!(StatusCode::NOT_FOUND, status);
        let (status, _, body) = send(request(Method::POST, return_uri.as_str(), Some(reader.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("success", body["notice"]["level"]);
        let (_, _, body) = send(request(Method::POST, return_uri.as_str(), Some(reader.as_str()), None)).await;
        assert_eq!("info", body["notice"]["level"]);

        let (status, _, body) = send(request(Method::GET, format!("/books/{}/", book_id).as_str(), Some(reader.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!(1, body["book"]["available_quantity"]);

        let (status, _, _) = send(request(Method::GET, "/staff-dashboard/", Some(reader.as_str()), None)).await;
        assert_eq!(StatusCode::FORBIDDEN, status);
        let (status, _, _) = send(request(Method::GET, "/staff-dashboard/", Some(staff.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
    }

    #[tokio::test]
    async fn test_should_report_field_errors() {
        let staff = signup("STAFF").await;
        let (status, _, body) = send(request(Method::POST, "/books/add/", Some(staff.as_str()),
                                             Some(json!({"title": "", "authors": "Someone"})))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("This field is required.", body["errors"]["title"]);
    }

    #[tokio::test]
    async fn test_should_login_and_logout() {
        let username = format!("web_{}", Uuid::new_v4().simple());
        let (status, _, _) = send(request(Method::POST, "/signup/", None, Some(json!({
            "username": username, "password1": "s3cret-pass", "password2": "s3cret-pass",
        })))).await;
        assert_eq!(StatusCode::OK, status);

        let (status, _, body) = send(request(Method::POST, "/login/", None,
                                             Some(json!({"username": username, "password": "wrong-pass"})))).await;
        assert_eq!(StatusCode::BAD_REQUEST, status);
        assert_eq!("Invalid username or password.", body["notice"]["message"]);

        let (status, _, body) = send(request(Method::POST, "/login/", None,
                                             Some(json!({"username": username, "password": "s3cret-pass"})))).await;
        assert_eq!(StatusCode::OK, status);
        let token = body["session"]["session_id"].as_str().expect("should return session").to_string();

        let (status, location, _) = send(request(Method::GET, "/login/", Some(token.as_str()), None)).await;
        assert_eq!(StatusCode::SEE_OTHER, status);
        assert_eq!(Some("/".to_string()), location);

        let (status, _, body) = send(request(Method::POST, "/logout/", Some(token.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
        assert_eq!("/login/", body["redirect"]);
        let (status, _, _) = send(request(Method::GET, "/my-books/", Some(token.as_str()), None)).await;
        assert_eq!(StatusCode::SEE_OTHER, status);
    }

    #[tokio::test]
    async fn test_should_set_and_clear_session_cookie() {
        let username = format!("web_{}", Uuid::new_v4().simple());
        let (status, _, cookie, body) = send_with_cookie(request(Method::POST, "/signup/", None, Some(json!({
            "username": username, "password1": "s3cret-pass", "password2": "s3cret-pass",
        })))).await;
        assert_eq!(StatusCode::OK, status);
        let token = body["session"]["session_id"].as_str().expect("should return session").to_string();
        let cookie = cookie.expect("should set session cookie");
        assert!(cookie.starts_with(format!("session_id={}", token).as_str()));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));

        let bearer = Request::builder().method(Method::GET).uri("/my-books/")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty()).expect("should build request");
        let (status, _, _) = send(bearer).await;
        assert_eq!(StatusCode::OK, status);

        let (status, _, cookie, _) = send_with_cookie(request(Method::POST, "/logout/", Some(token.as_str()), None)).await;
        assert_eq!(StatusCode::OK, status);
        let cookie = cookie.expect("should clear session cookie");
        assert!(cookie.starts_with("session_id=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
