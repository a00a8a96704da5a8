#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a {codec} level: {reason}")]
    FormatMismatch { codec: &'static str, reason: String },

    #[error("unable to determine level file format: {path}")]
    UnknownFormat { path: String },

    #[error("unexpected end of data")]
    UnexpectedEof,

    #[error("invalid tile stream: {0}")]
    BitStream(String),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors that only mean "this codec does not fit the file"; the loader
    /// moves on to the next codec when it sees one.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(
            self,
            Error::FormatMismatch { .. } | Error::UnexpectedEof | Error::BitStream(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
