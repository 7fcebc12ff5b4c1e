#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Shared HTTP client abstractions for reason-ox
//!
//! This crate holds the pieces every chat-completion call goes through: the
//! OpenAI wire format, a JSON request builder with authentication and default
//! headers, the common error type and a reusable retry policy with exponential
//! backoff.

pub mod error;
pub mod openai_format;
pub mod request_builder;
pub mod retry;

pub use error::CommonRequestError;
pub use openai_format::*;
pub use request_builder::{AuthMethod, RequestBuilder, RequestConfig};
pub use retry::{RetryError, RetryPolicy, RetryableError};
