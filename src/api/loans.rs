//! Loan ledger endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, UpdateLoan},
};

use super::CurrentUser;

/// Create a new loan.
///
/// Preconditions run here, before the ledger mutates anything: the book must
/// exist with a copy available, and creating a loan for another user requires
/// admin rights.
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = CreateLoan,
    responses(
        (status = 201, description = "Loan created", body = Loan),
        (status = 400, description = "No available copies"),
        (status = 403, description = "Creating a loan for another user without admin rights"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_loan(
    State(state): State<crate::AppState>,
    CurrentUser(current_user): CurrentUser,
    Json(data): Json<CreateLoan>,
) -> AppResult<(StatusCode, Json<Loan>)> {
    let book = state.services.catalog.get_book(data.book_id).await?;

    if book.available_copies < 1 {
        return Err(AppError::BadRequest("No available copies".to_string()));
    }

    if current_user.id != data.user_id && !current_user.is_admin() {
        return Err(AppError::Authorization(
            "Only admins can create loans on behalf of other readers".to_string(),
        ));
    }

    let loan = state
        .services
        .loans
        .create_loan(&book, data.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(loan)))
}

/// Mark a loan returned.
///
/// No role restriction; any active authenticated user may close any loan.
#[utoipa::path(
    patch,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = UpdateLoan,
    responses(
        (status = 200, description = "Loan updated", body = Loan),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn update_loan(
    State(state): State<crate::AppState>,
    _user: CurrentUser,
    Json(data): Json<UpdateLoan>,
) -> AppResult<Json<Loan>> {
    let loan = state.services.loans.return_loan(data).await?;
    Ok(Json(loan))
}
