use thiserror::Error;

pub type Result<T> = std::result::Result<T, AbifError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbifError {
    /// Signature mismatch, truncated header or a directory that does not fit
    /// in the buffer. Aborts the whole parse.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    #[error("{field}: out of range (off={offset}, len={len}, buffer_len={buffer_len})")]
    OutOfBounds {
        field: &'static str,
        offset: usize,
        len: usize,
        buffer_len: usize,
    },

    #[error("{tag}: unsupported element type {element_type}")]
    UnsupportedElementType { tag: String, element_type: u16 },

    #[error("no tag present for {0}")]
    EmptyRequiredField(&'static str),
}

impl AbifError {
    #[inline]
    pub fn malformed(msg: impl Into<String>) -> Self {
        AbifError::MalformedContainer(msg.into())
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, AbifError::MalformedContainer(_))
    }
}
