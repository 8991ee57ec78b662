//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::loan::{due_date, Loan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Insert a new loan, open and due in two weeks
    pub async fn create(&self, book_id: i32, user_id: i32) -> AppResult<Loan> {
        let now = Utc::now();

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (book_id, user_id, loaned_at, due_date, returned_at)
            VALUES ($1, $2, $3, $4, NULL)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(now)
        .bind(due_date(now))
        .fetch_one(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Set `returned_at` on an open loan.
    ///
    /// `returned_at` is write-once: a loan that is already closed yields a
    /// Conflict rather than being overwritten.
    pub async fn mark_returned(
        &self,
        id: i32,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Loan> {
        let updated = sqlx::query_as::<_, Loan>(
            "UPDATE loans SET returned_at = $2 WHERE id = $1 AND returned_at IS NULL RETURNING *",
        )
        .bind(id)
        .bind(returned_at)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(loan) => Ok(loan),
            None => {
                // Distinguish a missing loan from one that was already closed
                let loan = self.get_by_id(id).await?;
                debug_assert!(loan.returned_at.is_some());
                Err(AppError::Conflict("Loan already returned".to_string()))
            }
        }
    }
}
