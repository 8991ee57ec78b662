//! Authentication endpoints

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppResult;

/// Login form body
#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Bearer token response
#[derive(Serialize, ToSchema)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

/// Authenticate with username and password, returning a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Token issued", body = Token),
        (status = 401, description = "Incorrect username or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Json<Token>> {
    let user = state
        .services
        .users
        .authenticate(&form.username, &form.password)
        .await?;

    let access_token = state.services.users.create_token(&user)?;

    Ok(Json(Token {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
