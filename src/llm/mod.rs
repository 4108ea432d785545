//! LLM client for document analysis.

mod client;

pub use client::{LlmClient, LlmConfig, LlmError};
