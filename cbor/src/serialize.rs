/*!
Serialization of whole item trees.

A single iterative walk drives every output mode, so the sizing pass and the
writing passes always agree byte for byte:

- [`serialized_size`] counts the bytes without writing anything,
- [`serialize`] writes into a caller-supplied buffer, returning 0 if it is too small,
- [`serialize_alloc`] sizes first, then writes into an exactly allocated `Vec`.

Containers are written depth first, children in insertion order, map keys
immediately followed by their values.  Definite and indefinite forms are
written exactly as stored.
*/

use super::*;
use encode::*;

/// Destination of the serialization walk.
pub(crate) trait Sink {
    type Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

struct SizeSink(usize);

impl Sink for SizeSink {
    type Error = Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        self.0 = self.0.checked_add(data.len()).ok_or(Error::TooLarge)?;
        Ok(())
    }
}

struct SliceSink<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl Sink for SliceSink<'_> {
    type Error = Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        let end = self
            .offset
            .checked_add(data.len())
            .filter(|end| *end <= self.buffer.len())
            .ok_or(Error::TooLarge)?;
        self.buffer[self.offset..end].copy_from_slice(data);
        self.offset = end;
        Ok(())
    }
}

enum Step<'a> {
    Item(&'a Item),
    Break,
}

fn header<S: Sink + ?Sized>(
    sink: &mut S,
    f: impl FnOnce(&mut [u8]) -> usize,
) -> Result<(), S::Error> {
    let mut scratch = [0u8; MAX_HEADER_LEN];
    let len = f(&mut scratch);
    sink.write(&scratch[..len])
}

pub(crate) fn walk<S: Sink + ?Sized>(root: &Item, sink: &mut S) -> Result<(), S::Error> {
    let mut stack = vec![Step::Item(root)];
    while let Some(step) = stack.pop() {
        let item = match step {
            Step::Break => {
                sink.write(&[BREAK])?;
                continue;
            }
            Step::Item(item) => item,
        };

        match item.value() {
            Value::Uint(i) => header(sink, |b| {
                emit_uint_width(0, i.value(), i.width(), b)
            })?,
            Value::NegInt(i) => header(sink, |b| {
                emit_uint_width(1, i.value(), i.width(), b)
            })?,
            Value::Bytes(Str::Definite(data)) => {
                header(sink, |b| encode_bytes_start(data.len(), b))?;
                sink.write(data)?;
            }
            Value::Bytes(Str::Chunked(chunks)) => {
                header(sink, encode_indef_bytes_start)?;
                stack.push(Step::Break);
                stack.extend(chunks.iter().rev().map(Step::Item));
            }
            Value::Text(Str::Definite(data)) => {
                header(sink, |b| encode_text_start(data.len(), b))?;
                sink.write(data.as_bytes())?;
            }
            Value::Text(Str::Chunked(chunks)) => {
                header(sink, encode_indef_text_start)?;
                stack.push(Step::Break);
                stack.extend(chunks.iter().rev().map(Step::Item));
            }
            Value::Array(a) => {
                if a.is_definite() {
                    header(sink, |b| encode_array_start(a.len(), b))?;
                } else {
                    header(sink, encode_indef_array_start)?;
                    stack.push(Step::Break);
                }
                stack.extend(a.iter().rev().map(Step::Item));
            }
            Value::Map(m) => {
                if m.is_definite() {
                    header(sink, |b| encode_map_start(m.len(), b))?;
                } else {
                    header(sink, encode_indef_map_start)?;
                    stack.push(Step::Break);
                }
                for pair in m.iter().rev() {
                    stack.push(Step::Item(&pair.value));
                    stack.push(Step::Item(&pair.key));
                }
            }
            Value::Tag(t) => {
                header(sink, |b| encode_tag(t.number(), b))?;
                stack.push(Step::Item(t.item()));
            }
            Value::FloatCtrl(fc) => header(sink, |b| match fc {
                FloatCtrl::Bool(v) => encode_bool(*v, b),
                FloatCtrl::Null => encode_null(b),
                FloatCtrl::Undefined => encode_undef(b),
                FloatCtrl::Simple(v) => encode_simple(*v, b),
                FloatCtrl::Half(v) => encode_f16(*v, b),
                FloatCtrl::Single(v) => encode_single(*v, b),
                FloatCtrl::Double(v) => encode_double(*v, b),
            })?,
        }
    }
    Ok(())
}

/// The exact number of bytes [`serialize`] writes for `item`.
///
/// Fails with [`Error::TooLarge`] if the size overflows `usize`.
pub fn serialized_size(item: &Item) -> Result<usize, Error> {
    let mut sink = SizeSink(0);
    walk(item, &mut sink)?;
    Ok(sink.0)
}

/// Serialize `item` into `buffer`, returning the number of bytes written, or
/// 0 if `buffer` is too small.  After a 0 return the content of `buffer` is
/// unspecified.
pub fn serialize(item: &Item, buffer: &mut [u8]) -> usize {
    let mut sink = SliceSink { buffer, offset: 0 };
    match walk(item, &mut sink) {
        Ok(()) => sink.offset,
        Err(_) => 0,
    }
}

/// Serialize `item` into a newly allocated buffer of exactly the right size.
pub fn serialize_alloc(item: &Item) -> Result<Vec<u8>, Error> {
    let size = serialized_size(item)?;
    let mut encoder = encoder::Encoder::with_capacity(size)?;
    let Ok(()) = walk(item, &mut encoder);
    debug_assert_eq!(encoder.offset(), size);
    Ok(encoder.build())
}
