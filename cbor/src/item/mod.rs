/*!
The reference-counted item tree.

An [`Item`] is a cheap handle to one CBOR data item.  Cloning an item (or
calling [`Item::share`]) adds an owner; dropping a handle removes one, and the
item is destroyed, releasing its children, when the last owner goes away.
Reference counts are atomic, so a finished tree may be shared read-only
between threads.

Items are only mutable while they have exactly one owner: every mutator
returns [`Error::Shared`] otherwise.  A tree that has been shared is
therefore immutable for as long as it is shared.
*/

use super::*;

mod arrays;
mod display;
mod floats;
mod ints;
mod maps;
mod strings;
mod tags;

#[cfg(test)]
mod tests;

pub use arrays::Array;
pub use floats::FloatCtrl;
pub use ints::{Int, Width};
pub use maps::{Map, Pair};
pub use strings::Str;
pub use tags::Tag;

/// The major kind of an [`Item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Uint,
    NegInt,
    Bytes,
    Text,
    Array,
    Map,
    Tag,
    FloatCtrl,
}

impl Kind {
    /// The CBOR major type of this kind.
    pub fn major(self) -> u8 {
        match self {
            Self::Uint => 0,
            Self::NegInt => 1,
            Self::Bytes => 2,
            Self::Text => 3,
            Self::Array => 4,
            Self::Map => 5,
            Self::Tag => 6,
            Self::FloatCtrl => 7,
        }
    }
}

/// The payload of an [`Item`].
#[derive(Debug)]
pub enum Value {
    Uint(Int),
    /// The stored value `v` represents the integer `-1 - v`.
    NegInt(Int),
    Bytes(Str<Vec<u8>>),
    Text(Str<String>),
    Array(Array),
    Map(Map),
    Tag(Tag),
    FloatCtrl(FloatCtrl),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Uint(_) => Kind::Uint,
            Self::NegInt(_) => Kind::NegInt,
            Self::Bytes(_) => Kind::Bytes,
            Self::Text(_) => Kind::Text,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
            Self::Tag(_) => Kind::Tag,
            Self::FloatCtrl(_) => Kind::FloatCtrl,
        }
    }

    fn has_children(&self) -> bool {
        match self {
            Self::Bytes(s) => s.chunks().is_some_and(|c| !c.is_empty()),
            Self::Text(s) => s.chunks().is_some_and(|c| !c.is_empty()),
            Self::Array(a) => !a.is_empty(),
            Self::Map(m) => !m.is_empty(),
            Self::Tag(_) => true,
            _ => false,
        }
    }

    /// The direct children, in encoding order.
    fn children(&self) -> Vec<&Item> {
        match self {
            Self::Bytes(s) => s.chunks().map(|c| c.iter().collect()).unwrap_or_default(),
            Self::Text(s) => s.chunks().map(|c| c.iter().collect()).unwrap_or_default(),
            Self::Array(a) => a.iter().collect(),
            Self::Map(m) => m.iter().flat_map(|p| [&p.key, &p.value]).collect(),
            Self::Tag(t) => vec![t.item()],
            _ => Vec::new(),
        }
    }

    /// Move every child into `stack`, leaving `self` childless.
    fn take_children(&mut self, stack: &mut Vec<Item>) {
        match core::mem::replace(self, Value::FloatCtrl(FloatCtrl::Undefined)) {
            Value::Bytes(Str::Chunked(chunks)) | Value::Text(Str::Chunked(chunks)) => {
                stack.extend(chunks)
            }
            Value::Array(a) => stack.extend(a.into_items()),
            Value::Map(m) => {
                for pair in m.into_pairs() {
                    stack.push(pair.key);
                    stack.push(pair.value);
                }
            }
            Value::Tag(t) => stack.push(t.into_item()),
            leaf => *self = leaf,
        }
    }

    /// A copy of `self` with its children replaced by `children`, which must
    /// be in the order returned by [`Value::children`].
    fn rebuild(&self, mut children: Vec<Item>) -> Value {
        match self {
            Self::Uint(i) => Self::Uint(*i),
            Self::NegInt(i) => Self::NegInt(*i),
            Self::Bytes(s) => Self::Bytes(s.rebuild(children)),
            Self::Text(s) => Self::Text(s.rebuild(children)),
            Self::Array(a) => Self::Array(Array::from_parts(children, a.size())),
            Self::Map(m) => {
                let mut pairs = Vec::with_capacity(children.len() / 2);
                let mut children = children.into_iter();
                while let (Some(key), Some(value)) = (children.next(), children.next()) {
                    pairs.push(Pair { key, value });
                }
                Self::Map(Map::from_parts(pairs, m.size()))
            }
            Self::Tag(t) => match children.pop() {
                Some(item) => Self::Tag(Tag::new(t.number(), item)),
                None => Self::Tag(Tag::new(t.number(), t.item().share())),
            },
            Self::FloatCtrl(f) => Self::FloatCtrl(*f),
        }
    }

    /// Compare everything but the children, queueing child pairs on `stack`.
    fn shallow_eq<'a>(&'a self, other: &'a Self, stack: &mut Vec<(&'a Item, &'a Item)>) -> bool {
        match (self, other) {
            (Self::Uint(a), Self::Uint(b)) | (Self::NegInt(a), Self::NegInt(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a.shallow_eq(b, stack),
            (Self::Text(a), Self::Text(b)) => a.shallow_eq(b, stack),
            (Self::Array(a), Self::Array(b)) => {
                if a.is_definite() != b.is_definite() || a.len() != b.len() {
                    return false;
                }
                stack.extend(a.iter().zip(b.iter()));
                true
            }
            (Self::Map(a), Self::Map(b)) => {
                if a.is_definite() != b.is_definite() || a.len() != b.len() {
                    return false;
                }
                for (a, b) in a.iter().zip(b.iter()) {
                    stack.push((&a.key, &b.key));
                    stack.push((&a.value, &b.value));
                }
                true
            }
            (Self::Tag(a), Self::Tag(b)) => {
                if a.number() != b.number() {
                    return false;
                }
                stack.push((a.item(), b.item()));
                true
            }
            (Self::FloatCtrl(a), Self::FloatCtrl(b)) => a.bitwise_eq(b),
            _ => false,
        }
    }
}

/// A shared handle to a CBOR data item.
#[derive(Clone)]
pub struct Item(Arc<Value>);

impl Item {
    pub(crate) fn from_value(value: Value) -> Self {
        Self(Arc::new(value))
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Mutable access to the payload, only while `self` is the sole owner.
    pub(crate) fn value_mut(&mut self) -> Result<&mut Value, Error> {
        Arc::get_mut(&mut self.0).ok_or(Error::Shared)
    }

    pub fn kind(&self) -> Kind {
        self.0.kind()
    }

    /// Add an owner, the equivalent of incrementing the reference count.
    pub fn share(&self) -> Self {
        self.clone()
    }

    /// The number of handles currently referring to this item.
    pub fn refcount(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub fn is_shared(&self) -> bool {
        self.refcount() > 1
    }

    /// Whether `self` and `other` are handles to the same item.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the item is a definite length string or container.  Scalars
    /// and tags are always definite.
    pub fn is_definite(&self) -> bool {
        match self.value() {
            Value::Bytes(s) => s.is_definite(),
            Value::Text(s) => s.is_definite(),
            Value::Array(a) => a.is_definite(),
            Value::Map(m) => m.is_definite(),
            _ => true,
        }
    }

    /// An independent copy of the whole tree, sharing nothing with `self`.
    pub fn deep_copy(&self) -> Self {
        enum Work<'a> {
            Visit(&'a Item),
            Build(&'a Item, usize),
        }

        let mut work = vec![Work::Visit(self)];
        let mut done: Vec<Item> = Vec::new();
        while let Some(next) = work.pop() {
            match next {
                Work::Visit(item) => {
                    let children = item.value().children();
                    work.push(Work::Build(item, children.len()));
                    work.extend(children.into_iter().rev().map(Work::Visit));
                }
                Work::Build(item, count) => {
                    let children = done.split_off(done.len() - count);
                    done.push(Item::from_value(item.value().rebuild(children)));
                }
            }
        }
        done.pop().unwrap_or_else(|| self.share())
    }
}

impl Drop for Item {
    fn drop(&mut self) {
        // Release deep trees iteratively rather than recursing through Arc drops
        let Some(value) = Arc::get_mut(&mut self.0) else {
            return;
        };
        if !value.has_children() {
            return;
        }

        let mut stack = Vec::new();
        value.take_children(&mut stack);
        while let Some(mut item) = stack.pop() {
            if let Some(value) = Arc::get_mut(&mut item.0) {
                value.take_children(&mut stack);
            }
        }
    }
}

/// Structural equality: kinds, values, widths, definite flags and children
/// are compared, reference counts are not.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if !a.ptr_eq(b) && !a.value().shallow_eq(b.value(), &mut stack) {
                return false;
            }
        }
        true
    }
}

impl core::fmt::Debug for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Item({self})")
    }
}
