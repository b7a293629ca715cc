//! Error codes for the reader diagnostics.
//!
//! - `E1xx` - XML structure errors
//! - `E2xx` - Model errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // XML Structure Errors (E1xx)
    // =========================================================================
    /// Malformed XML.
    ///
    /// The file is not well-formed XML and could not be read at all.
    E100,

    /// Missing class name.
    ///
    /// A `Class` element has no `n` attribute, or the attribute is empty.
    E101,

    // =========================================================================
    // Model Errors (E2xx)
    // =========================================================================
    /// Duplicate class.
    ///
    /// Two `Class` elements share the same name. Names are the identity of
    /// classes in the diagram and must be unique.
    E200,
}

impl ErrorCode {
    /// Returns the code as written in reports, e.g. `E101`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E200 => "E200",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
