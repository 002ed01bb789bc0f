//! Core types shared across the pipeline.
//!
//! Currently this is the error system; see [`error`].

pub mod error;

pub use error::{ErrorContext, TapwatchError, user_friendly_error};
