use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/", get(handlers::auth::home))
        .route(
            "/signup",
            get(handlers::auth::signup_page).post(handlers::auth::signup),
        )
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route("/connect-telegram", get(handlers::auth::connect_telegram))
        .route("/check-telegram", get(handlers::auth::check_telegram))
        .route("/user/available", get(handlers::user::available))
        .route("/user/booked", get(handlers::user::booked))
        .route("/user/doctors", get(handlers::user::doctors))
        .route("/user/times", get(handlers::user::times))
        .route("/user/book/:id", post(handlers::user::book))
        .route("/user/past", get(handlers::user::past))
        .route("/user/loyalty", get(handlers::user::loyalty))
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route(
            "/admin/appointments/:id/status",
            post(handlers::admin::set_status),
        )
        .route(
            "/admin/add-block",
            get(handlers::admin::add_block_page).post(handlers::admin::add_block),
        )
        .route("/admin/slots/:id/delete", post(handlers::admin::delete_slot))
        .route("/admin/booked", get(handlers::admin::booked))
        .route(
            "/admin/baseline",
            get(handlers::admin::baseline_page).post(handlers::admin::save_baseline),
        )
        .route("/admin/performance", get(handlers::admin::performance))
        .route("/admin/set-category", post(handlers::admin::set_category))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
