//! Core types for the GuruSDK CLI.
//!
//! This module holds the error foundation used throughout the codebase:
//! - **Strongly-typed errors** ([`SdkError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with actionable suggestions
//! - **Stable exit codes** ([`SdkError::exit_code`]) consumed by the Unity
//!   editor integration and CI jobs driving the tool
//!
//! Every operation that can fail returns a [`Result`] carrying an [`SdkError`]
//! (or an [`anyhow::Error`] wrapping one at the CLI orchestration level). Use
//! [`user_friendly_error`] at the process boundary to turn whatever bubbled up
//! into a colored, suggestion-bearing message.

pub mod error;

pub use error::{ErrorContext, SdkError, user_friendly_error};
