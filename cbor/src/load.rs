/*!
Tree-building decoder.

[`load`] drives the [`stream`] token decoder over a complete buffer and
assembles the tokens into an [`Item`] tree.  Open containers, tags and
indefinite length strings are kept on an explicit stack of frames, so deeply
nested input cannot overflow the native call stack; the stack is bounded by
[`Config::max_depth`].

Decoding is all-or-nothing: on any error every partially built item is
released and no tree is returned.
*/

use super::*;
use budget::reserve;
use core::mem::size_of;
use half::f16;
use stream::{Callbacks, Status};

/// Accounted size of one item node, the payload plus the reference counts.
const NODE_SIZE: usize = size_of::<Value>() + 2 * size_of::<usize>();

enum Frame {
    Array {
        items: Vec<Item>,
        size: Option<usize>,
    },
    Map {
        pairs: Vec<Pair>,
        key: Option<Item>,
        size: Option<usize>,
    },
    Tag(u64),
    Bytes(Vec<Item>),
    Text(Vec<Item>),
}

struct Builder<'a> {
    allocator: &'a mut dyn Allocator,
    max_depth: usize,
    frames: Vec<Frame>,
    /// Bytes of input from the current token on, an upper bound on the
    /// number of elements a container can still receive.
    remaining: usize,
    root: Option<Item>,
    error: Option<Error>,
}

impl<'a> Builder<'a> {
    fn new(allocator: &'a mut dyn Allocator, max_depth: usize) -> Self {
        Self {
            allocator,
            max_depth,
            frames: Vec::new(),
            remaining: 0,
            root: None,
            error: None,
        }
    }

    fn node(&mut self, value: Value) -> Result<Item, Error> {
        self.allocator.allocate(NODE_SIZE)?;
        Ok(Item::from_value(value))
    }

    /// Tokens inside an indefinite length string must be definite strings of
    /// the same kind.
    fn check_chunk(&self, kind: Kind, indefinite: bool) -> Result<(), Error> {
        let expected = match self.frames.last() {
            Some(Frame::Bytes(_)) => Kind::Bytes,
            Some(Frame::Text(_)) => Kind::Text,
            _ => return Ok(()),
        };
        if kind != expected {
            Err(Malformed::ChunkKind.into())
        } else if indefinite {
            Err(Malformed::NestedChunk.into())
        } else {
            Ok(())
        }
    }

    fn push_frame(&mut self, frame: Frame) -> Result<(), Error> {
        if self.frames.len() >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        reserve(self.allocator, &mut self.frames, 1)?;
        self.frames.push(frame);
        Ok(())
    }

    fn scalar(&mut self, kind: Kind, value: Value) -> Result<(), Error> {
        self.check_chunk(kind, false)?;
        let item = self.node(value)?;
        self.attach(item)
    }

    /// Add a finished item to the innermost open frame, completing and
    /// attaching every frame it fills.
    fn attach(&mut self, mut item: Item) -> Result<(), Error> {
        loop {
            let allocator = &mut *self.allocator;
            let complete = match self.frames.last_mut() {
                None => {
                    self.root = Some(item);
                    return Ok(());
                }
                Some(Frame::Tag(number)) => {
                    let number = *number;
                    self.frames.pop();
                    item = self.node(Value::Tag(Tag::new(number, item)))?;
                    continue;
                }
                Some(Frame::Array { items, size }) => {
                    reserve(allocator, items, 1)?;
                    items.push(item);
                    *size == Some(items.len())
                }
                Some(Frame::Map { pairs, key, size }) => match key.take() {
                    None => {
                        *key = Some(item);
                        false
                    }
                    Some(key) => {
                        reserve(allocator, pairs, 1)?;
                        pairs.push(Pair { key, value: item });
                        *size == Some(pairs.len())
                    }
                },
                Some(Frame::Bytes(chunks) | Frame::Text(chunks)) => {
                    reserve(allocator, chunks, 1)?;
                    chunks.push(item);
                    false
                }
            };
            if !complete {
                return Ok(());
            }

            let Some(frame) = self.frames.pop() else {
                return Ok(());
            };
            item = self.finish(frame)?;
        }
    }

    /// Turn a completed frame into its item.
    fn finish(&mut self, frame: Frame) -> Result<Item, Error> {
        let value = match frame {
            Frame::Array { items, size } => {
                Value::Array(Array::from_parts(items, size))
            }
            Frame::Map { pairs, key, size } => {
                if key.is_some() {
                    return Err(Malformed::PartialMap.into());
                }
                Value::Map(Map::from_parts(pairs, size))
            }
            Frame::Bytes(chunks) => Value::Bytes(Str::Chunked(chunks)),
            Frame::Text(chunks) => Value::Text(Str::Chunked(chunks)),
            Frame::Tag(_) => return Err(Malformed::TagWithoutValue.into()),
        };
        self.node(value)
    }

    fn start_array(&mut self, size: Option<usize>) -> Result<(), Error> {
        self.check_chunk(Kind::Array, size.is_none())?;
        if self.frames.len() >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        if size == Some(0) {
            let item = self.node(Value::Array(Array::new(Some(0))))?;
            return self.attach(item);
        }

        let mut items = Vec::new();
        if let Some(size) = size {
            reserve(self.allocator, &mut items, size.min(self.remaining))?;
        }
        self.push_frame(Frame::Array { items, size })
    }

    fn start_map(&mut self, size: Option<usize>) -> Result<(), Error> {
        self.check_chunk(Kind::Map, size.is_none())?;
        if self.frames.len() >= self.max_depth {
            return Err(Error::DepthExceeded(self.max_depth));
        }
        if size == Some(0) {
            let item = self.node(Value::Map(Map::new(Some(0))))?;
            return self.attach(item);
        }

        let mut pairs = Vec::new();
        if let Some(size) = size {
            reserve(self.allocator, &mut pairs, size.min(self.remaining / 2))?;
        }
        self.push_frame(Frame::Map {
            pairs,
            key: None,
            size,
        })
    }

    fn start_string(&mut self, kind: Kind) -> Result<(), Error> {
        self.check_chunk(kind, true)?;
        self.push_frame(match kind {
            Kind::Bytes => Frame::Bytes(Vec::new()),
            _ => Frame::Text(Vec::new()),
        })
    }

    fn bytes_item(&mut self, data: &[u8]) -> Result<(), Error> {
        self.check_chunk(Kind::Bytes, false)?;
        self.allocator.allocate(data.len())?;
        let mut v = Vec::new();
        v.try_reserve_exact(data.len())
            .map_err(|_| Error::MemoryExhausted)?;
        v.extend_from_slice(data);
        let item = self.node(Value::Bytes(Str::Definite(v)))?;
        self.attach(item)
    }

    fn text_item(&mut self, data: &str) -> Result<(), Error> {
        self.check_chunk(Kind::Text, false)?;
        self.allocator.allocate(data.len())?;
        let mut s = String::new();
        s.try_reserve_exact(data.len())
            .map_err(|_| Error::MemoryExhausted)?;
        s.push_str(data);
        let item = self.node(Value::Text(Str::Definite(s)))?;
        self.attach(item)
    }

    fn tag_item(&mut self, number: u64) -> Result<(), Error> {
        self.check_chunk(Kind::Tag, false)?;
        self.push_frame(Frame::Tag(number))
    }

    fn close(&mut self) -> Result<(), Error> {
        let indefinite = match self.frames.last() {
            Some(Frame::Array { size, .. } | Frame::Map { size, .. }) => size.is_none(),
            Some(Frame::Bytes(_) | Frame::Text(_)) => true,
            Some(Frame::Tag(_)) => return Err(Malformed::TagWithoutValue.into()),
            None => false,
        };
        let Some(frame) = self.frames.pop().filter(|_| indefinite) else {
            return Err(Malformed::UnexpectedBreak.into());
        };
        let item = self.finish(frame)?;
        self.attach(item)
    }

    fn record(&mut self, result: Result<(), Error>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }
}

impl Callbacks for Builder<'_> {
    fn uint(&mut self, value: u64, width: Width) {
        let r = self.scalar(Kind::Uint, Value::Uint(Int::new_unchecked(value, width)));
        self.record(r)
    }

    fn negint(&mut self, value: u64, width: Width) {
        let r = self.scalar(Kind::NegInt, Value::NegInt(Int::new_unchecked(value, width)));
        self.record(r)
    }

    fn bytes(&mut self, data: &[u8]) {
        let r = self.bytes_item(data);
        self.record(r)
    }

    fn bytes_start(&mut self) {
        let r = self.start_string(Kind::Bytes);
        self.record(r)
    }

    fn text(&mut self, data: &str) {
        let r = self.text_item(data);
        self.record(r)
    }

    fn text_start(&mut self) {
        let r = self.start_string(Kind::Text);
        self.record(r)
    }

    fn array_start(&mut self, count: usize) {
        let r = self.start_array(Some(count));
        self.record(r)
    }

    fn indef_array_start(&mut self) {
        let r = self.start_array(None);
        self.record(r)
    }

    fn map_start(&mut self, count: usize) {
        let r = self.start_map(Some(count));
        self.record(r)
    }

    fn indef_map_start(&mut self) {
        let r = self.start_map(None);
        self.record(r)
    }

    fn tag(&mut self, number: u64) {
        let r = self.tag_item(number);
        self.record(r)
    }

    fn half(&mut self, value: f16) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Half(value)));
        self.record(r)
    }

    fn single(&mut self, value: f32) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Single(value)));
        self.record(r)
    }

    fn double(&mut self, value: f64) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Double(value)));
        self.record(r)
    }

    fn boolean(&mut self, value: bool) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Bool(value)));
        self.record(r)
    }

    fn null(&mut self) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Null));
        self.record(r)
    }

    fn undefined(&mut self) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Undefined));
        self.record(r)
    }

    fn simple(&mut self, value: u8) {
        let r = self.scalar(Kind::FloatCtrl, Value::FloatCtrl(FloatCtrl::Simple(value)));
        self.record(r)
    }

    fn indef_break(&mut self) {
        let r = self.close();
        self.record(r)
    }
}

fn log_failure(e: &Error, offset: usize) {
    match e {
        Error::Malformed(reason) => trace!("Malformed CBOR at offset {offset}: {reason}"),
        Error::DepthExceeded(_) | Error::MemoryExhausted => {
            debug!("Decode stopped at offset {offset}: {e}")
        }
        _ => {}
    }
}

/// Decode one complete item from the start of `data`.
///
/// Returns the item and the number of bytes it occupied; any bytes after it
/// are left for the caller, see [`Sequence`].
pub fn load(data: &[u8], config: &Config) -> Result<(Item, usize), Error> {
    let mut budget = Budget::new(config.max_alloc);
    load_with(data, config, &mut budget)
}

/// As [`load`], consulting `allocator` before every allocation instead of
/// enforcing [`Config::max_alloc`].
pub fn load_with(
    data: &[u8],
    config: &Config,
    allocator: &mut dyn Allocator,
) -> Result<(Item, usize), Error> {
    let mut builder = Builder::new(allocator, config.max_depth);
    let mut offset = 0;
    loop {
        let input = data.get(offset..).unwrap_or_default();
        builder.remaining = input.len();
        let r = stream::decode_with(input, config.strict, &mut builder);
        match r.status {
            Status::Finished => {}
            Status::NotEnoughData => {
                return Err(Error::NotEnoughData {
                    required: r.required,
                });
            }
            Status::Error(reason) => {
                let e = Error::Malformed(reason);
                log_failure(&e, offset);
                return Err(e);
            }
        }

        if let Some(e) = builder.error.take() {
            log_failure(&e, offset);
            return Err(e);
        }

        offset += r.read;
        if let Some(root) = builder.root.take() {
            return Ok((root, offset));
        }
    }
}
