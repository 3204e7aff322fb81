//! # CourseDeck TUI
//!
//! A terminal client for browsing a REST course catalogue.
//!
//! ## Features
//! - Home feed: categories, popular / recommended / inspiring courses, top teachers
//! - Search by title or category with a price filter
//! - Category and teacher course lists loaded a page at a time
//! - Course detail with a lesson accordion and reviews
//! - Login, session restore and saved courses
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod messages;
pub mod models;
pub mod network;
pub mod paging;
pub mod resource;
pub mod screens;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::Config;
pub use error::ApiError;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{Category, Course, Lesson, Section, User};
pub use network::{ApiClient, NetworkActor};
pub use paging::PagedList;
pub use session::Session;
