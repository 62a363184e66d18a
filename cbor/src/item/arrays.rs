use super::*;

/// The content of an array item.
#[derive(Debug, Default)]
pub struct Array {
    items: Vec<Item>,
    size: Option<usize>,
}

impl Array {
    /// `size` is the final element count of a definite length array, or
    /// `None` for an indefinite length array.
    pub(crate) fn new(size: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            size,
        }
    }

    /// An array holding `items`, with the declared `size` of a definite
    /// length array.
    pub(crate) fn from_parts(items: Vec<Item>, size: Option<usize>) -> Self {
        Self { items, size }
    }

    pub(super) fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn is_definite(&self) -> bool {
        self.size.is_some()
    }

    /// The declared size of a definite length array.
    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.size.is_some_and(|size| self.items.len() >= size)
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    fn push(&mut self, item: Item) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::ContainerFull);
        }
        self.items
            .try_reserve(1)
            .map_err(|_| Error::MemoryExhausted)?;
        self.items.push(item);
        Ok(())
    }

    fn set(&mut self, index: usize, item: Item) -> Result<Item, Error> {
        let slot = self
            .items
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds(index))?;
        Ok(core::mem::replace(slot, item))
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Item;
    type IntoIter = core::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Item {
    /// A new empty array, definite with `size` elements or indefinite if `None`.
    pub fn array(size: Option<usize>) -> Self {
        Self::from_value(Value::Array(Array::new(size)))
    }

    /// A complete definite length array.
    pub fn array_from(items: impl IntoIterator<Item = Item>) -> Self {
        let items: Vec<Item> = items.into_iter().collect();
        let size = Some(items.len());
        Self::from_value(Value::Array(Array::from_parts(items, size)))
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self.value() {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    fn array_mut(&mut self) -> Result<&mut Array, Error> {
        match self.value_mut()? {
            Value::Array(a) => Ok(a),
            _ => Err(Error::IncorrectType("array")),
        }
    }

    /// Append `item` to an array.
    ///
    /// Fails with [`Error::ContainerFull`] if the array is definite and
    /// already holds its declared number of elements.  On failure the array
    /// is unchanged.
    pub fn push(&mut self, item: Item) -> Result<(), Error> {
        self.array_mut()?.push(item)
    }

    /// Replace the element at `index`, returning the previous element.
    pub fn set(&mut self, index: usize, item: Item) -> Result<Item, Error> {
        self.array_mut()?.set(index, item)
    }

    /// The element at `index` of an array.
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.as_array()?.get(index)
    }

    /// The number of elements of an array, or pairs of a map.
    pub fn len(&self) -> Option<usize> {
        match self.value() {
            Value::Array(a) => Some(a.len()),
            Value::Map(m) => Some(m.len()),
            _ => None,
        }
    }
}
