/*!
Error types shared by the decoders, the encoders and the item mutators.
*/

use thiserror::Error;

/// The reason an input was rejected as malformed CBOR.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malformed {
    /// Minor values 28, 29 and 30 are reserved for every major type.
    #[error("Reserved minor-type value {0}")]
    ReservedMinor(u8),

    /// The indefinite length marker was used with a major type that has no indefinite form.
    #[error("Indefinite length marker used with major type {0}")]
    InvalidIndefinite(u8),

    #[error("Text string is not valid UTF-8")]
    InvalidUtf8,

    /// A length argument does not fit in the platform `usize`.
    #[error("Length {0} does not fit in memory")]
    LengthOverflow(u64),

    #[error("Indefinite length string contains an indefinite length chunk")]
    NestedChunk,

    #[error("Indefinite length string contains a chunk of a different type")]
    ChunkKind,

    #[error("Break with no open indefinite length item")]
    UnexpectedBreak,

    #[error("Map has a key with no value")]
    PartialMap,

    #[error("Tag with no following value")]
    TagWithoutValue,

    /// Only reported when decoding in strict mode.
    #[error("Argument is not encoded in the shortest form")]
    NonCanonical,

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),
}

/// The crate-wide error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input ended early, `required` more bytes are needed before retrying.
    #[error("Not enough data for encoded value, {required} more bytes required")]
    NotEnoughData { required: usize },

    #[error("Malformed CBOR: {0}")]
    Malformed(#[from] Malformed),

    /// An allocation failed, or the configured allocation budget is spent.
    #[error("Memory exhausted")]
    MemoryExhausted,

    #[error("Maximum nesting depth of {0} exceeded")]
    DepthExceeded(usize),

    #[error("Definite length container is already full")]
    ContainerFull,

    #[error("Index {0} is out of bounds")]
    IndexOutOfBounds(usize),

    #[error("Chunks cannot be added to a definite length string")]
    DefiniteString,

    #[error("Chunk is not the same string type")]
    ChunkKind,

    #[error("Chunk is an indefinite length string")]
    NestedChunk,

    /// Items are only mutable while they have a single owner.
    #[error("Item has more than one owner")]
    Shared,

    #[error("Invalid simple value {0}")]
    InvalidSimpleValue(u8),

    #[error("Incorrect type, expected {0}")]
    IncorrectType(&'static str),

    /// The encoded length of an item does not fit in `usize`.
    #[error("Encoded item is too large")]
    TooLarge,
}
