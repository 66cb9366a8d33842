//! The single error type used across the engine.

mod context;
mod kind;

pub use context::{Context, FilePosition};
pub use kind::ErrorKind;

/// The one error type returned by every fallible operation in this crate.
///
/// Mirrors the closed error taxonomy of the system: a `kind`, a short description,
/// an optional longer one, a list of suggestions, and optional source-text context
/// for errors that originate from parsing mzML, protein lists, or SWATH window files.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Error {
    /// Whether this is a recoverable warning or a hard error.
    pub warning: bool,
    kind: ErrorKind,
    short_description: String,
    long_description: Option<String>,
    suggestions: Vec<String>,
    context: Context,
}

impl Error {
    /// Build a hard error of the given kind.
    pub fn new(kind: ErrorKind, short_description: impl Into<String>, context: Context) -> Self {
        Self {
            warning: false,
            kind,
            short_description: short_description.into(),
            long_description: None,
            suggestions: Vec::new(),
            context,
        }
    }

    /// Build a warning: a condition that is logged but does not stop the operation.
    pub fn warning(kind: ErrorKind, short_description: impl Into<String>, context: Context) -> Self {
        Self {
            warning: true,
            kind,
            short_description: short_description.into(),
            long_description: None,
            suggestions: Vec::new(),
            context,
        }
    }

    /// Attach a longer explanation.
    #[must_use]
    pub fn with_long_description(mut self, description: impl Into<String>) -> Self {
        self.long_description = Some(description.into());
        self
    }

    /// Attach one or more suggestions for fixing the error.
    #[must_use]
    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = String>) -> Self {
        self.suggestions.extend(suggestions);
        self
    }

    /// The kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The context (file/line position) this error was raised at, if any.
    pub const fn context(&self) -> &Context {
        &self.context
    }

    pub(crate) fn overwrite_line_number(&mut self, line: usize) {
        self.context.overwrite_line_number(line);
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {}",
            if self.warning { "warning" } else { "error" },
            self.short_description
        )?;
        if let Some(long) = &self.long_description {
            writeln!(f, "{long}")?;
        }
        write!(f, "{}", self.context)?;
        for suggestion in &self.suggestions {
            writeln!(f, "  suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for Error {}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, Error>;
