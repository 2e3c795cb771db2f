//! Error taxonomy for construction, encoding, and decoding.

/// Everything that can go wrong building or running an [`crate::Encoding`].
///
/// Each variant corresponds to one of the failure modes a caller needs to
/// distinguish: a malformed rank table is not the same problem as an unknown
/// token id at decode time, even though both are "just" an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum TokenizerError {
    #[error("invalid pat_str: {0}")]
    InvalidPatStr(String),

    #[error("invalid mergeable ranks: {0}")]
    InvalidMergeableRanks(String),

    #[error("invalid special tokens: {0}")]
    InvalidSpecialTokens(String),

    #[error("invalid special token matching mode: {0}")]
    InvalidSpecialTokenMatching(String),

    #[error("invalid special token regex: {0}")]
    InvalidSpecialRegex(String),

    #[error("special splitter produced a trigger not present in the special token map: {0:?}")]
    UnknownSpecialToken(String),

    #[error("no rank entry for merged bytes: {0:?}")]
    MissingRank(Vec<u8>),

    #[error("invalid token id: {0}")]
    InvalidTokenId(usize),

    #[error("unknown token id: {0}")]
    UnknownTokenId(usize),

    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("unknown model: {0}")]
    UnknownModel(String),

    #[error("rank table loader failed: {0}")]
    Loader(String),
}

pub type Result<T> = std::result::Result<T, TokenizerError>;
