//! User directory and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::Algorithm;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Claims, CreateUser, Role, User, UserDetail},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password.
    ///
    /// Unknown username and wrong password collapse into the same error so
    /// the response shape does not reveal which one failed.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .repository
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| {
                AppError::Authentication("Incorrect username or password".to_string())
            })?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Incorrect username or password".to_string(),
            ));
        }

        Ok(user)
    }

    /// Create a signed bearer token for a user
    pub fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.username.clone(),
            iat: now,
            exp: now + self.config.token_expire_minutes * 60,
        };

        claims
            .create_token(&self.config.jwt_secret, self.algorithm()?)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn algorithm(&self) -> AppResult<Algorithm> {
        self.config.jwt_algorithm.parse().map_err(|_| {
            AppError::Internal(format!(
                "Unsupported JWT algorithm: {}",
                self.config.jwt_algorithm
            ))
        })
    }

    /// List users visible to the caller.
    ///
    /// Readers are always listed; admin accounts appear only when the caller
    /// is an admin. This is a query-time visibility filter, not a rejection.
    pub async fn list_users(&self, caller: &User) -> AppResult<Vec<User>> {
        let mut roles = vec![Role::Reader];
        if caller.is_admin() {
            roles.push(Role::Admin);
        }
        self.repository.users.list_by_roles(&roles).await
    }

    /// Get a user with the borrow list eagerly loaded.
    ///
    /// An admin target looked up by a non-admin caller behaves as not found;
    /// hidden accounts are indistinguishable from missing ones.
    pub async fn get_user(&self, id: i32, caller: &User) -> AppResult<UserDetail> {
        let hidden = || AppError::NotFound(format!("User with id {} not found", id));

        let user = self
            .repository
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(hidden)?;

        if user.role == Role::Admin && !caller.is_admin() {
            return Err(hidden());
        }

        let borrowed_books = self.repository.users.get_borrowed_books(user.id).await?;

        Ok(UserDetail {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            role: user.role,
            borrowed_books,
        })
    }

    /// Get a user by username, with no visibility filter
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.repository.users.find_by_username(username).await
    }

    /// Create a new user with a freshly hashed password
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.username_exists(&user.username).await? {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }

        let hashed_password = self.hash_password(&user.password)?;
        self.repository
            .users
            .create(
                &user.username,
                &hashed_password,
                user.is_active,
                user.is_superuser,
                user.role,
            )
            .await
    }

    /// Seed the initial admin account from configuration if it does not exist
    pub async fn seed_initial_admin(&self) -> AppResult<()> {
        let username = self.config.first_admin_username.clone();
        if self.get_by_username(&username).await?.is_some() {
            return Ok(());
        }

        tracing::info!("Seeding initial admin account '{}'", username);
        self.create_user(CreateUser {
            username,
            password: self.config.first_admin_password.clone(),
            is_active: true,
            is_superuser: true,
            role: Role::Admin,
        })
        .await?;

        Ok(())
    }

    /// Seed demo reader accounts used for local development and testing
    pub async fn seed_demo_readers(&self) -> AppResult<()> {
        for username in ["alice", "bob"] {
            if self.get_by_username(username).await?.is_some() {
                continue;
            }
            self.create_user(CreateUser {
                username: username.to_string(),
                password: "books".to_string(),
                is_active: true,
                is_superuser: false,
                role: Role::Reader,
            })
            .await?;
        }
        Ok(())
    }

    /// Verify a password against a user's stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.hashed_password)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
