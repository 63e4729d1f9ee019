//! A to-do list store persisted as a single JSON document.
//!
//! The document holds an ordered sequence of named lists, each with a
//! category, a description and an ordered sequence of tasks. See
//! [`store::TodoStore`] for the operations.

pub mod cli;
pub mod config;
pub mod models;
pub mod storage;
pub mod store;

pub use models::{Task, TodoDocument, TodoList, ValidationError};
pub use store::{ErrorKind, StoreError, TodoStore};
