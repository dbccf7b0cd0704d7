//! AI tutoring backend.
//!
//! Thin client for an OpenAI-compatible chat completion API plus a
//! quota-gated service layer: every user gets a fixed number of model
//! calls per day, counted and logged through the data store before any
//! response reaches the caller.

pub mod chat;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use chat::{ChatClient, ChatMessage, ChatOutput};
pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use service::AiService;
