//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        book::Book,
        user::{Role, User},
    },
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get user by username (primary authentication lookup, no visibility filter)
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check if a username is already taken
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// List users whose role is in `roles`
    pub async fn list_by_roles(&self, roles: &[Role]) -> AppResult<Vec<User>> {
        let role_names: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = ANY($1) ORDER BY id",
        )
        .bind(&role_names)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Insert a new user with an already-hashed password
    pub async fn create(
        &self,
        username: &str,
        hashed_password: &str,
        is_active: bool,
        is_superuser: bool,
        role: Role,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, hashed_password, is_active, is_superuser, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(hashed_password)
        .bind(is_active)
        .bind(is_superuser)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Books currently on a user's borrow list
    pub async fn get_borrowed_books(&self, user_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.*
            FROM books b
            JOIN user_books ub ON ub.book_id = b.id
            WHERE ub.user_id = $1
            ORDER BY b.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Wholesale replace of a user's borrow list
    pub async fn replace_borrowed_books(&self, user_id: i32, book_ids: &[i32]) -> AppResult<()> {
        sqlx::query("DELETE FROM user_books WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        for book_id in book_ids {
            sqlx::query("INSERT INTO user_books (user_id, book_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(book_id)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}
