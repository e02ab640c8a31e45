//! Core types shared by every stage of the render pipeline.
//!
//! # Error Management
//!
//! The pipeline distinguishes two families of problems:
//! - **Fatal errors** ([`RenderError`]) abort the render of the current document and bubble
//!   unchanged to the caller. They are logged once where they happen.
//! - **Diagnostics** ([`Diagnostic`]) are non-fatal. They are logged as warnings and also
//!   collected in a [`DiagnosticCollector`] so callers can decide how to surface them.
//!
//! For the command line, [`user_friendly_error`] turns any [`anyhow::Error`] into an
//! [`ErrorContext`] with details and a suggestion.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrender::core::{RenderError, user_friendly_error};
//!
//! let error = RenderError::NoConverterAvailable {
//!     document: "about.txt".to_string(),
//!     extname: ".txt".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

pub mod diagnostics;
pub mod error;

pub use diagnostics::{Diagnostic, DiagnosticCollector};
pub use error::{ErrorContext, RenderError, user_friendly_error};
