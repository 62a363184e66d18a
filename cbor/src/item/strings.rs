use super::*;

/// The content of a byte or text string.
#[derive(Debug)]
pub enum Str<T> {
    /// A single contiguous buffer with its length in the header.
    Definite(T),
    /// Definite length chunks of the same string type, closed by a break.
    Chunked(Vec<Item>),
}

impl<T> Str<T> {
    pub fn is_definite(&self) -> bool {
        matches!(self, Self::Definite(_))
    }

    pub fn chunks(&self) -> Option<&[Item]> {
        match self {
            Self::Definite(_) => None,
            Self::Chunked(chunks) => Some(chunks),
        }
    }

    pub fn definite(&self) -> Option<&T> {
        match self {
            Self::Definite(data) => Some(data),
            Self::Chunked(_) => None,
        }
    }
}

impl<T: Clone + PartialEq> Str<T> {
    pub(super) fn rebuild(&self, children: Vec<Item>) -> Self {
        match self {
            Self::Definite(data) => Self::Definite(data.clone()),
            Self::Chunked(_) => Self::Chunked(children),
        }
    }

    pub(super) fn shallow_eq<'a>(
        &'a self,
        other: &'a Self,
        stack: &mut Vec<(&'a Item, &'a Item)>,
    ) -> bool {
        match (self, other) {
            (Self::Definite(a), Self::Definite(b)) => a == b,
            (Self::Chunked(a), Self::Chunked(b)) if a.len() == b.len() => {
                stack.extend(a.iter().zip(b.iter()));
                true
            }
            _ => false,
        }
    }
}

impl Item {
    /// A definite length byte string.
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::from_value(Value::Bytes(Str::Definite(data.into())))
    }

    /// A definite length text string.
    pub fn text(data: impl Into<String>) -> Self {
        Self::from_value(Value::Text(Str::Definite(data.into())))
    }

    /// A definite length text string, checking that `data` is valid UTF-8.
    pub fn text_from_utf8(data: Vec<u8>) -> Result<Self, Error> {
        String::from_utf8(data)
            .map(Self::text)
            .map_err(|_| Malformed::InvalidUtf8.into())
    }

    /// An empty indefinite length byte string.
    pub fn indefinite_bytes() -> Self {
        Self::from_value(Value::Bytes(Str::Chunked(Vec::new())))
    }

    /// An empty indefinite length text string.
    pub fn indefinite_text() -> Self {
        Self::from_value(Value::Text(Str::Chunked(Vec::new())))
    }

    /// The bytes of a definite length byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.value() {
            Value::Bytes(Str::Definite(data)) => Some(data),
            _ => None,
        }
    }

    /// The text of a definite length text string.
    pub fn as_str(&self) -> Option<&str> {
        match self.value() {
            Value::Text(Str::Definite(data)) => Some(data),
            _ => None,
        }
    }

    /// The chunks of an indefinite length string.
    pub fn chunks(&self) -> Option<&[Item]> {
        match self.value() {
            Value::Bytes(s) => s.chunks(),
            Value::Text(s) => s.chunks(),
            _ => None,
        }
    }

    /// The total length in bytes of a string, summed over all chunks.
    pub fn string_len(&self) -> Option<usize> {
        match self.value() {
            Value::Bytes(Str::Definite(data)) => Some(data.len()),
            Value::Text(Str::Definite(data)) => Some(data.len()),
            Value::Bytes(Str::Chunked(chunks)) | Value::Text(Str::Chunked(chunks)) => chunks
                .iter()
                .try_fold(0usize, |n, c| n.checked_add(c.string_len()?)),
            _ => None,
        }
    }

    /// The number of Unicode scalar values in a text string.
    pub fn codepoint_count(&self) -> Option<usize> {
        match self.value() {
            Value::Text(Str::Definite(data)) => Some(data.chars().count()),
            Value::Text(Str::Chunked(chunks)) => chunks
                .iter()
                .try_fold(0usize, |n, c| n.checked_add(c.codepoint_count()?)),
            _ => None,
        }
    }

    /// Append a chunk to an indefinite length string.
    ///
    /// The chunk must be a definite length string of the same type.
    pub fn add_chunk(&mut self, chunk: Item) -> Result<(), Error> {
        let kind = self.kind();
        let chunks = match self.value_mut()? {
            Value::Bytes(Str::Chunked(chunks)) | Value::Text(Str::Chunked(chunks)) => chunks,
            Value::Bytes(_) | Value::Text(_) => return Err(Error::DefiniteString),
            _ => return Err(Error::IncorrectType("string")),
        };
        if chunk.kind() != kind {
            return Err(Error::ChunkKind);
        }
        if !chunk.is_definite() {
            return Err(Error::NestedChunk);
        }
        chunks.try_reserve(1).map_err(|_| Error::MemoryExhausted)?;
        chunks.push(chunk);
        Ok(())
    }

    /// Concatenate the chunks of a string into a new definite length string.
    ///
    /// A definite length string is copied as is.
    pub fn flatten(&self) -> Result<Item, Error> {
        let len = self.string_len().ok_or(Error::IncorrectType("string"))?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::MemoryExhausted)?;

        match self.value() {
            Value::Bytes(Str::Definite(b)) => data.extend_from_slice(b),
            Value::Text(Str::Definite(t)) => data.extend_from_slice(t.as_bytes()),
            Value::Bytes(Str::Chunked(chunks)) | Value::Text(Str::Chunked(chunks)) => {
                for chunk in chunks {
                    match chunk.value() {
                        Value::Bytes(Str::Definite(b)) => data.extend_from_slice(b),
                        Value::Text(Str::Definite(t)) => data.extend_from_slice(t.as_bytes()),
                        _ => return Err(Error::NestedChunk),
                    }
                }
            }
            _ => return Err(Error::IncorrectType("string")),
        }

        match self.kind() {
            Kind::Text => Item::text_from_utf8(data),
            _ => Ok(Item::bytes(data)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chunk_rules() {
        let mut s = Item::indefinite_text();
        assert!(s.add_chunk(Item::text("a")).is_ok());
        assert_eq!(s.add_chunk(Item::bytes([1u8])), Err(Error::ChunkKind));
        assert_eq!(s.add_chunk(Item::indefinite_text()), Err(Error::NestedChunk));
        assert_eq!(s.add_chunk(Item::uint(1)), Err(Error::ChunkKind));
        assert_eq!(s.chunks().map(<[Item]>::len), Some(1));

        let mut d = Item::text("abc");
        assert_eq!(d.add_chunk(Item::text("d")), Err(Error::DefiniteString));
        assert_eq!(
            Item::uint(1).add_chunk(Item::text("d")),
            Err(Error::IncorrectType("string"))
        );
    }

    #[test]
    fn flatten() {
        let mut s = Item::indefinite_bytes();
        s.add_chunk(Item::bytes([1u8, 2])).unwrap();
        s.add_chunk(Item::bytes(Vec::new())).unwrap();
        s.add_chunk(Item::bytes([3u8])).unwrap();
        assert_eq!(s.string_len(), Some(3));

        let flat = s.flatten().unwrap();
        assert!(flat.is_definite());
        assert_eq!(flat.as_bytes(), Some(&[1u8, 2, 3][..]));

        assert_eq!(Item::text("xyz").flatten().unwrap(), Item::text("xyz"));
        assert!(Item::indefinite_text().flatten().unwrap().as_str() == Some(""));
        assert!(Item::uint(0).flatten().is_err());
    }

    #[test]
    fn codepoints() {
        let mut s = Item::indefinite_text();
        s.add_chunk(Item::text("\u{00fc}")).unwrap();
        s.add_chunk(Item::text("\u{6c34}a")).unwrap();
        assert_eq!(s.codepoint_count(), Some(3));
        assert_eq!(s.string_len(), Some(6));
        assert_eq!(Item::bytes([0u8]).codepoint_count(), None);
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(
            Item::text_from_utf8(vec![0xff]),
            Err(Error::Malformed(Malformed::InvalidUtf8))
        );
    }
}
