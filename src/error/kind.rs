/// The closed set of error kinds the engine can raise.
///
/// Propagation policy: I/O and parse errors propagate to the top-level caller.
/// `UnableToFit` is recovered locally (the affected feature is marked with
/// `quality = -1.0` and skipped). `Postcondition` violations are always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested file does not exist.
    FileNotFound,
    /// The file exists but could not be opened for reading.
    FileNotReadable,
    /// A file could not be created at the requested path.
    UnableToCreateFile,
    /// Malformed input; carries source position when known.
    ParseError,
    /// A parameter or precondition was violated.
    IllegalArgument,
    /// A value fell outside its documented range.
    InvalidValue,
    /// An iterator was used before being initialized.
    InvalidIterator,
    /// A required meta value was absent.
    MissingInformation,
    /// An internal invariant was violated (unique-id collision, lost sort order).
    Postcondition,
    /// A numerical fit diverged.
    UnableToFit,
    /// The requested operation is not supported for this concrete type.
    NotImplemented,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FileNotFound => "file not found",
            Self::FileNotReadable => "file not readable",
            Self::UnableToCreateFile => "unable to create file",
            Self::ParseError => "parse error",
            Self::IllegalArgument => "illegal argument",
            Self::InvalidValue => "invalid value",
            Self::InvalidIterator => "invalid iterator",
            Self::MissingInformation => "missing information",
            Self::Postcondition => "postcondition violated",
            Self::UnableToFit => "unable to fit",
            Self::NotImplemented => "not implemented",
        };
        f.write_str(name)
    }
}
