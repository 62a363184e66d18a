/*!
CBOR sequences (RFC 8742): zero or more items concatenated without framing.
*/

use super::*;

/// Iterates over the items of a CBOR sequence.
///
/// Each call to `next` decodes one item with [`load`].  After the first
/// error the iterator is exhausted.
pub struct Sequence<'a> {
    data: &'a [u8],
    config: Config,
    offset: usize,
    failed: bool,
}

impl<'a> Sequence<'a> {
    pub fn new(data: &'a [u8], config: Config) -> Self {
        Self {
            data,
            config,
            offset: 0,
            failed: false,
        }
    }

    /// The offset of the first byte not yet decoded.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Iterator for Sequence<'_> {
    type Item = Result<Item, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }

        match load(&self.data[self.offset..], &self.config) {
            Ok((item, len)) => {
                self.offset += len;
                Some(Ok(item))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl core::iter::FusedIterator for Sequence<'_> {}
