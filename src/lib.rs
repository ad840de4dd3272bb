// Library exports for the server binary and integration tests
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;
pub mod visual;

pub use crate::config::LedgerConfig;
pub use crate::error::{LedgerError, Result};
pub use crate::handlers::ThoughtLedger;
pub use crate::models::*;
pub use crate::repository::{MemoryThoughtStore, ThoughtStorage};
pub use crate::service::ThoughtLedgerService;
