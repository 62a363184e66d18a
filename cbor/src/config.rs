/*!
Decoder configuration knobs.
*/

/// The default maximum nesting depth of containers and tags.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Limits and policy applied when decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Containers and tags nested deeper than this fail with [`Error::DepthExceeded`](crate::Error::DepthExceeded).
    pub max_depth: usize,

    /// Total number of bytes a single decode may allocate, `None` for no limit.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none")
    )]
    pub max_alloc: Option<usize>,

    /// Reject arguments that are not in their shortest form, the unassigned
    /// simple values 0 to 19, and two-byte simple values below 32.
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "<&bool as core::ops::Not>::not")
    )]
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_alloc: None,
            strict: false,
        }
    }
}

impl Config {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_alloc(mut self, max_alloc: usize) -> Self {
        self.max_alloc = Some(max_alloc);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
