//! Sync Client
//!
//! REST bindings and the push channel, organized by concern.

mod client;
mod http;
mod push;
pub mod socket_io;

use async_trait::async_trait;

use crate::error::TodoResult;
use crate::models::{CreateTodo, Todo, UpdateTodo};

/// Request/response half of the sync client
///
/// Futures are `!Send`: everything runs on the browser event loop.
#[async_trait(?Send)]
pub trait TodoApi {
    /// Full current list
    async fn fetch_all(&self) -> TodoResult<Vec<Todo>>;

    /// Create a todo; the server assigns its id
    async fn create(&self, request: &CreateTodo) -> TodoResult<Todo>;

    /// Partial update, returns the stored todo
    async fn update(&self, id: &str, request: &UpdateTodo) -> TodoResult<Todo>;

    async fn delete(&self, id: &str) -> TodoResult<()>;
}

// Re-export all public items
pub use client::SyncClient;
pub use http::HttpApi;
pub use push::*;
