use super::*;

/// One key/value entry of a map.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Item,
    pub value: Item,
}

/// The content of a map item.
///
/// Pairs are kept in insertion order, and duplicate keys are kept as they are.
#[derive(Debug, Default)]
pub struct Map {
    pairs: Vec<Pair>,
    size: Option<usize>,
}

impl Map {
    pub(crate) fn new(size: Option<usize>) -> Self {
        Self {
            pairs: Vec::new(),
            size,
        }
    }

    pub(crate) fn from_parts(pairs: Vec<Pair>, size: Option<usize>) -> Self {
        Self { pairs, size }
    }

    pub(super) fn into_pairs(self) -> Vec<Pair> {
        self.pairs
    }

    pub fn is_definite(&self) -> bool {
        self.size.is_some()
    }

    /// The declared number of pairs of a definite length map.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.size.is_some_and(|size| self.pairs.len() >= size)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Pair> {
        self.pairs.iter()
    }

    pub fn as_slice(&self) -> &[Pair] {
        &self.pairs
    }

    /// The value of the first pair whose key is structurally equal to `key`.
    pub fn find(&self, key: &Item) -> Option<&Item> {
        self.pairs.iter().find(|p| &p.key == key).map(|p| &p.value)
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a Pair;
    type IntoIter = core::slice::Iter<'a, Pair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Item {
    /// A new empty map, definite with `size` pairs or indefinite if `None`.
    pub fn map(size: Option<usize>) -> Self {
        Self::from_value(Value::Map(Map::new(size)))
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self.value() {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Append a key/value pair to a map.
    ///
    /// Fails with [`Error::ContainerFull`] if the map is definite and
    /// already holds its declared number of pairs.  Keys are not checked for
    /// uniqueness.  On failure the map is unchanged.
    pub fn add_pair(&mut self, key: Item, value: Item) -> Result<(), Error> {
        let Value::Map(map) = self.value_mut()? else {
            return Err(Error::IncorrectType("map"));
        };
        if map.is_full() {
            return Err(Error::ContainerFull);
        }
        map.pairs
            .try_reserve(1)
            .map_err(|_| Error::MemoryExhausted)?;
        map.pairs.push(Pair { key, value });
        Ok(())
    }
}
