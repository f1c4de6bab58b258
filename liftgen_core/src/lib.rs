#![forbid(unsafe_code)]

//! Core domain model and business logic for liftgen.
//!
//! This crate provides:
//! - Domain types (muscle groups, exercises, generated workouts)
//! - The default exercise library and duration policy
//! - AI response parsing and duration balancing
//! - Persistence (template store, CSV export, config)

pub mod types;
pub mod error;
pub mod library;
pub mod policy;
pub mod estimator;
pub mod parser;
pub mod balancer;
pub mod fallback;
pub mod request;
pub mod engine;
pub mod template_store;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use library::{default_library, Library};
pub use policy::duration_config;
pub use estimator::estimate;
pub use parser::parse_response;
pub use balancer::balance;
pub use fallback::{fallback, quick_build};
pub use request::GenerationRequest;
pub use engine::generate;
pub use template_store::{TemplateSink, TemplateStore};
pub use export::export_csv;
pub use config::Config;
