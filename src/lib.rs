//! Libris Library Loan Management System
//!
//! A Rust backend for tracking books, readers, and loans, providing a REST
//! JSON API with bearer-token authentication and role-based authorization.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
