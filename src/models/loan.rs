//! Loan model and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan period applied to every new loan
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Loan model from database
///
/// A loan is OPEN while `returned_at` is null and CLOSED once it is set;
/// CLOSED is terminal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub book_id: i32,
    pub user_id: i32,
    pub loaned_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn is_outstanding(&self) -> bool {
        self.returned_at.is_none()
    }
}

/// Compute the due date for a loan starting at `loaned_at`
pub fn due_date(loaned_at: DateTime<Utc>) -> DateTime<Utc> {
    loaned_at + Duration::days(LOAN_PERIOD_DAYS)
}

/// Create loan request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub book_id: i32,
    pub user_id: i32,
}

/// Update loan request (marks the loan returned)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoan {
    pub id: i32,
    pub returned_at: DateTime<Utc>,
}
