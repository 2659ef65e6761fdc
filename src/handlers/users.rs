//! User handlers

use axum::{extract::State, Json};

use crate::models::{User, UserInfo};
use crate::{AppResult, AppState};

/// List registered users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserInfo>>> {
    let users = User::list(&state.pool).await?;
    Ok(Json(users.iter().map(User::to_info).collect()))
}
