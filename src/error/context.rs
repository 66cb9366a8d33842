//! Source-text context attached to errors, rendered rustc-style.

/// A position inside a piece of source text (an mzML file, a protein list, a SWATH
/// window file, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilePosition {
    /// Name of the file (or other source) this position is in.
    pub file: String,
    /// Zero-based line index.
    pub line_index: usize,
    /// Zero-based column index.
    pub column: usize,
}

impl FilePosition {
    /// Create a new file position.
    pub fn new(file: impl Into<String>, line_index: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line_index,
            column,
        }
    }
}

/// The context a diagnostic is raised in: nothing, a single line, or a highlighted
/// range within a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Context {
    /// No context available.
    #[default]
    None,
    /// A single full line of source text, with no specific highlighted range.
    FullLine {
        /// Position of the line.
        position: FilePosition,
        /// The full line of text.
        line: String,
    },
    /// A highlighted sub-range within a line.
    Range {
        /// Position of the start of the range.
        position: FilePosition,
        /// The full line of text the range is within.
        line: String,
        /// Length of the highlighted range, in characters, starting at `position.column`.
        length: usize,
    },
}

impl Context {
    /// No context.
    pub const fn none() -> Self {
        Self::None
    }

    /// An entire line of text, unhighlighted.
    pub fn full_line(position: FilePosition, line: impl Into<String>) -> Self {
        Self::FullLine {
            position,
            line: line.into(),
        }
    }

    /// A highlighted range within a line.
    pub fn range(position: FilePosition, line: impl Into<String>, length: usize) -> Self {
        Self::Range {
            position,
            line: line.into(),
            length,
        }
    }

    pub(crate) fn overwrite_line_number(&mut self, new_line: usize) {
        match self {
            Self::None => {}
            Self::FullLine { position, .. } | Self::Range { position, .. } => {
                position.line_index = new_line;
            }
        }
    }
}

const MAX_COLS: usize = 95;

fn truncate(line: &str) -> String {
    if line.chars().count() > MAX_COLS {
        let mut s: String = line.chars().take(MAX_COLS).collect();
        s.push('…');
        s
    } else {
        line.to_string()
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::FullLine { position, line } => {
                let margin = (position.line_index + 1).to_string().len();
                writeln!(f, "{:margin$} ╷", "", margin = margin)?;
                writeln!(
                    f,
                    "{} │ {}",
                    position.line_index + 1,
                    truncate(line)
                )?;
                writeln!(f, "{:margin$} ╵ {}", "", position.file, margin = margin)
            }
            Self::Range {
                position,
                line,
                length,
            } => {
                let margin = (position.line_index + 1).to_string().len();
                writeln!(f, "{:margin$} ╷", "", margin = margin)?;
                writeln!(f, "{} │ {}", position.line_index + 1, truncate(line))?;
                writeln!(
                    f,
                    "{:margin$} │ {}{}",
                    "",
                    " ".repeat(position.column),
                    "‾".repeat((*length).max(1)),
                    margin = margin
                )?;
                writeln!(f, "{:margin$} ╵ {}", "", position.file, margin = margin)
            }
        }
    }
}
