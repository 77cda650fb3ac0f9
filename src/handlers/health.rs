use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::db::queries;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, AppError> {
    let users = {
        let conn = state.db()?;
        queries::count_users(&conn)?
    };
    Ok(Json(serde_json::json!({ "status": "ok", "users": users })))
}
