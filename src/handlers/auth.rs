use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;

use super::{to_login, NoticeQuery};
use crate::db::queries;
use crate::models::{ClinicUser, Registration};
use crate::services::accounts::{self, LoginError, LoginForm, SignupError, SignupForm};
use crate::state::AppState;
use crate::views;

pub async fn home() -> Html<String> {
    Html(views::auth::home().into_string())
}

// GET|POST /signup
pub async fn signup_page() -> Html<String> {
    Html(views::auth::signup(None).into_string())
}

fn signup_failed(err: SignupError) -> Response {
    Html(views::auth::signup(Some(&err.to_string())).into_string()).into_response()
}

pub async fn signup(State(state): State<Arc<AppState>>, Form(form): Form<SignupForm>) -> Response {
    let valid = match accounts::validate_signup(&form) {
        Ok(v) => v,
        Err(e) => return signup_failed(e),
    };

    let hash = match accounts::hash_password(&valid.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "failed to hash password");
            return signup_failed(SignupError::Server);
        }
    };

    let created = match state.db() {
        Ok(conn) => accounts::create_account(&conn, &valid, hash),
        Err(e) => {
            tracing::error!(error = %e, "account store unavailable");
            Err(SignupError::Server)
        }
    };
    if let Err(e) = created {
        tracing::info!(user = %valid.name, reason = %e, "signup rejected");
        return signup_failed(e);
    }

    let registration = Registration {
        user_name: valid.name.clone(),
        display_name: valid.display_name.clone(),
        phone: valid.phone.clone(),
    };
    if let Err(e) = state.api.register_user(&registration).await {
        // The local record is kept.
        tracing::error!(user = %valid.name, error = %e, "failed to register user with appointment API");
        return signup_failed(SignupError::Server);
    }

    tracing::info!(user = %valid.name, "account created");
    Redirect::to("/login").into_response()
}

pub async fn login_page() -> Html<String> {
    Html(views::auth::login(None).into_string())
}

fn login_failed(err: LoginError) -> Response {
    Html(views::auth::login(Some(&err.to_string())).into_string()).into_response()
}

pub async fn login(State(state): State<Arc<AppState>>, Form(form): Form<LoginForm>) -> Response {
    if form.name.trim().is_empty() || form.password.is_empty() {
        return login_failed(LoginError::MissingFields);
    }

    if accounts::is_admin(&state.config, &form) {
        tracing::info!(user = %form.name, "admin login");
        return Redirect::to("/admin/dashboard").into_response();
    }

    let name = form.name.trim().to_lowercase();
    let found = match state.db() {
        Ok(conn) => queries::find_user(&conn, &name),
        Err(e) => {
            tracing::error!(error = %e, "account store unavailable");
            return login_failed(LoginError::Server);
        }
    };
    let found = match found {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(user = %name, error = %e, "failed to look up user");
            return login_failed(LoginError::Server);
        }
    };

    match accounts::check_credentials(found, &form.password) {
        Ok(user) => {
            tracing::info!(user = %user.name, "user login");
            Redirect::to(&user_home(&user)).into_response()
        }
        Err(e) => {
            tracing::info!(user = %name, reason = %e, "login rejected");
            login_failed(e)
        }
    }
}

fn user_home(user: &ClinicUser) -> String {
    views::link(
        "/user/available",
        &[("userName", user.name.as_str()), ("phone", user.phone.as_str())],
    )
}

// GET /connect-telegram
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub async fn connect_telegram(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    let name = query.name.as_deref().filter(|v| !v.is_empty());
    let phone = query.phone.as_deref().filter(|v| !v.is_empty());

    let notice = notice.notice();
    match (name, phone) {
        (Some(name), Some(phone)) => Html(
            views::auth::connect_telegram(
                name,
                phone,
                state.config.telegram_bot_url.as_deref(),
                notice.as_ref(),
            )
            .into_string(),
        )
        .into_response(),
        _ => to_login().into_response(),
    }
}

// GET /check-telegram
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub user: Option<String>,
}

pub async fn check_telegram(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CheckQuery>,
) -> Json<serde_json::Value> {
    let Some(name) = query.user.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        return Json(serde_json::json!({ "linked": false }));
    };
    Json(serde_json::json!({ "linked": telegram_linked(&state, name).await }))
}

/// The local flag first, then the API. A positive API answer is remembered locally.
async fn telegram_linked(state: &AppState, name: &str) -> bool {
    let local = match state.db() {
        Ok(conn) => queries::find_user_ci(&conn, name),
        Err(e) => Err(e.into()),
    };
    match local {
        Ok(Some(user)) if user.telegram_linked => return true,
        Ok(_) => {}
        Err(e) => tracing::warn!(user = %name, error = %e, "failed to read local telegram flag"),
    }

    let remote = match state.api.get_user(name).await {
        Ok(user) => user.is_some_and(|u| u.telegram_linked),
        Err(e) => {
            tracing::warn!(user = %name, error = %e, "failed to fetch user from appointment API");
            return false;
        }
    };

    if remote {
        let saved = match state.db() {
            Ok(conn) => queries::set_telegram_linked(&conn, name, true),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = saved {
            tracing::warn!(user = %name, error = %e, "failed to persist telegram link");
        } else {
            tracing::info!(user = %name, "telegram linked");
        }
    }
    remote
}
