//! Error and diagnostic system for the class description reader.
//!
//! Problems found while reading a class description file are reported as
//! [`Diagnostic`]s carrying an [`ErrorCode`], a message, labelled source
//! spans and optional help. The reader keeps going after a recoverable problem
//! so that one run reports every broken class at once; the diagnostics are
//! returned together as a [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use umlsync_parser::{Span, error::{Diagnostic, ErrorCode}};
//! let diag = Diagnostic::error("class `Player` is defined multiple times")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(120..160), "duplicate definition")
//!     .with_secondary_label(Span::new(10..50), "first defined here")
//!     .with_help("class names must be unique within one file");
//! ```

mod diagnostic;
mod error_code;
mod parse_error;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
