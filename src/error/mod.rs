//! Error handling for the tokenizer, parser, validator and executor.
//!
//! Every fallible path in this crate returns [`Result`]. Errors carry a
//! tagged [`ErrorKind`] plus an optional [`Span`] (byte offset into the
//! original statement text) so a host can point a caret at the failure.
//! The error object itself is never logged by the core; see the `engine`
//! module for the separate, opt-in diagnostic trace.

use std::fmt;

/// A span in the source code, represented as byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span from start and end offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span for a single position.
    pub fn point(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    /// Create an empty span at a position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Get the length of this span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if this span is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// The sub-reason for an [`ErrorKind::ConstraintViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstraintKind {
    #[error("value is NULL but the column is NOT NULL")]
    NotNullViolation,
    #[error("duplicate value for the primary key")]
    PrimaryKeyDuplicate,
    #[error("value does not match the column's declared type")]
    TypeMismatch,
    #[error("table is protected and cannot be modified")]
    ProtectedTable,
    #[error("a table with this name already exists")]
    DuplicateTable,
    #[error("a column with this name already exists")]
    DuplicateColumn,
    #[error("number of supplied values does not match the number of columns")]
    ColumnCountMismatch,
}

/// The kind of error that occurred, tagged per the engine's error contract.
///
/// A host should match on the variant, not the rendered message; the message
/// carries a short remediation hint but is not a stable API.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("syntax error: {0}")]
    SyntaxError(String),

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("ambiguous column '{column}' (present in {tables:?}); qualify it with a table name")]
    AmbiguousColumn { column: String, tables: Vec<String> },

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("invalid literal: {0}")]
    InvalidLiteral(String),

    #[error("constraint violation on column '{column}': {reason}")]
    ConstraintViolation {
        reason: ConstraintKind,
        column: String,
    },

    /// An invariant was violated internally. Never expected in practice;
    /// exists so the public API never unwinds a raw panic across the crate
    /// boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

/// An error with source location information.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The kind of error.
    pub kind: ErrorKind,
    /// The source span where the error occurred, if known.
    span: Option<Span>,
    /// Optional context message.
    context: Option<String>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            span: None,
            context: None,
        }
    }

    /// Create a new error with source location.
    pub fn with_span(kind: ErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
            context: None,
        }
    }

    /// Add context to this error.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Get the span of this error, if any.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    // Convenience constructors for common errors ------------------------

    pub fn syntax(msg: impl Into<String>, pos: usize) -> Self {
        Self::with_span(ErrorKind::SyntaxError(msg.into()), Span::point(pos))
    }

    pub fn unknown_table(name: impl Into<String>, pos: usize) -> Self {
        Self::with_span(ErrorKind::UnknownTable(name.into()), Span::point(pos))
    }

    pub fn unknown_column(name: impl Into<String>, pos: usize) -> Self {
        Self::with_span(ErrorKind::UnknownColumn(name.into()), Span::point(pos))
    }

    pub fn ambiguous_column(name: impl Into<String>, tables: Vec<String>, pos: usize) -> Self {
        Self::with_span(
            ErrorKind::AmbiguousColumn {
                column: name.into(),
                tables,
            },
            Span::point(pos),
        )
    }

    pub fn unsupported(feature: impl Into<String>, pos: usize) -> Self {
        Self::with_span(
            ErrorKind::UnsupportedFeature(feature.into()),
            Span::point(pos),
        )
    }

    pub fn invalid_literal(msg: impl Into<String>, pos: usize) -> Self {
        Self::with_span(ErrorKind::InvalidLiteral(msg.into()), Span::point(pos))
    }

    pub fn constraint(reason: ConstraintKind, column: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConstraintViolation {
            reason,
            column: column.into(),
        })
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(msg.into()))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref ctx) = self.context {
            write!(f, " ({})", ctx)?;
        }
        if let Some(span) = self.span {
            write!(f, " at position {}", span.start)?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// A specialized Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
