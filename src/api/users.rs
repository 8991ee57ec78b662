//! User directory endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::user::{UserDetail, UserSummary},
};

use super::CurrentUser;

/// List users visible to the caller
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<UserSummary>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    CurrentUser(current_user): CurrentUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = state.services.users.list_users(&current_user).await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

/// Get user details, including borrowed books
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = UserDetail),
        (status = 404, description = "User not found or not visible to the caller")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    CurrentUser(current_user): CurrentUser,
    Path(id): Path<i32>,
) -> AppResult<Json<UserDetail>> {
    let user = state.services.users.get_user(id, &current_user).await?;
    Ok(Json(user))
}
