#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(clippy::pedantic, clippy::unwrap_used)]

//! Three-step reasoning over an OpenAI-compatible chat-completion API.
//!
//! A question is first rewritten into an optimized prompt, then a reasoning
//! trace is generated for that prompt, and finally the original question is
//! answered with the trace as context.
//!
//! ```no_run
//! use reason_ox::{Pipeline, ReasoningClient};
//!
//! # async fn demo() -> Result<(), reason_ox::ReasonOxError> {
//! let client = ReasoningClient::from_env()?;
//! let answer = Pipeline::new(&client).run("Why is the sky blue?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompts;

pub use client::ReasoningClient;
pub use config::{ClientConfig, GenerationOptions};
pub use error::{ErrorKind, ReasonOxError};
pub use pipeline::{Pipeline, Stage};
pub use reason_ox_common::{
    ChatRequest, ChatResponse, Message, MessageRole, RetryPolicy,
};
