use super::*;

/// A tag number and the single item it annotates.
#[derive(Debug)]
pub struct Tag {
    number: u64,
    item: Item,
}

impl Tag {
    pub(crate) fn new(number: u64, item: Item) -> Self {
        Self { number, item }
    }

    pub(super) fn into_item(self) -> Item {
        self.item
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn item(&self) -> &Item {
        &self.item
    }
}

impl Item {
    /// Tag `item` with `number`, taking ownership of `item`.
    pub fn tag(number: u64, item: Item) -> Self {
        Self::from_value(Value::Tag(Tag::new(number, item)))
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self.value() {
            Value::Tag(t) => Some(t),
            _ => None,
        }
    }

    pub fn tag_number(&self) -> Option<u64> {
        self.as_tag().map(Tag::number)
    }

    pub fn tagged_item(&self) -> Option<&Item> {
        self.as_tag().map(Tag::item)
    }

    /// Replace the tagged item, returning the previous one.
    pub fn set_tagged_item(&mut self, item: Item) -> Result<Item, Error> {
        match self.value_mut()? {
            Value::Tag(t) => Ok(core::mem::replace(&mut t.item, item)),
            _ => Err(Error::IncorrectType("tag")),
        }
    }
}
