//! Loan ledger service
//!
//! Loans are the source of truth for checkout state. `Book.available_copies`
//! and the user's borrow list are projections maintained eagerly on every
//! transition. The propagation steps are separate persistence operations and
//! are not wrapped in one transaction; a failure between steps leaves the
//! projections inconsistent and callers must not assume atomicity.

use crate::{
    error::AppResult,
    models::{
        book::Book,
        loan::{Loan, UpdateLoan},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a loan against `book` for `user_id`.
    ///
    /// Preconditions (book exists, a copy is available, caller is permitted)
    /// are checked at the handler boundary before this runs. After the loan
    /// is inserted, availability is decremented and the book is appended to
    /// the user's borrow list.
    pub async fn create_loan(&self, book: &Book, user_id: i32) -> AppResult<Loan> {
        let loan = self.repository.loans.create(book.id, user_id).await?;

        self.repository
            .books
            .update_availability(book.id, book.available_copies - 1)
            .await?;

        if let Some(user) = self.repository.users.find_by_id(user_id).await? {
            let mut book_ids: Vec<i32> = self
                .repository
                .users
                .get_borrowed_books(user.id)
                .await?
                .iter()
                .map(|b| b.id)
                .collect();
            book_ids.push(book.id);
            self.repository
                .users
                .replace_borrowed_books(user.id, &book_ids)
                .await?;
        }

        Ok(loan)
    }

    /// Close a loan by setting its return timestamp.
    ///
    /// Availability is incremented only when the book still exists; a
    /// concurrently removed book is skipped, never an error. The user's
    /// borrow list keeps the book after return.
    pub async fn return_loan(&self, data: UpdateLoan) -> AppResult<Loan> {
        let loan = self
            .repository
            .loans
            .mark_returned(data.id, data.returned_at)
            .await?;

        if let Some(book) = self.repository.books.find_by_id(loan.book_id).await? {
            self.repository
                .books
                .update_availability(book.id, book.available_copies + 1)
                .await?;
        }

        Ok(loan)
    }
}
