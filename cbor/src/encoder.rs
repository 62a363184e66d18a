/*!
A growable encoder for building CBOR directly, without an item tree.

[`Encoder`] appends headers and values to a `Vec<u8>`; types implementing
[`ToCbor`] know how to emit themselves.  [`Item`] implements [`ToCbor`], so
whole trees can be mixed with hand-written headers.
*/

use super::*;
use core::convert::Infallible;
use encode::*;

pub trait ToCbor {
    fn to_cbor(&self, encoder: &mut Encoder);
}

#[derive(Debug, Default)]
pub struct Encoder {
    data: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// An encoder with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| Error::MemoryExhausted)?;
        Ok(Self { data })
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    fn emit_header(&mut self, f: impl FnOnce(&mut [u8]) -> usize) {
        let mut scratch = [0u8; MAX_HEADER_LEN];
        let len = f(&mut scratch);
        self.data.extend_from_slice(&scratch[..len]);
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) {
        self.data.extend_from_slice(data)
    }

    pub fn emit<T>(&mut self, value: &T)
    where
        T: ToCbor + ?Sized,
    {
        value.to_cbor(self)
    }

    /// Emit `value` preceded by a header for each tag in `tags`, outermost first.
    pub fn emit_tagged<T, I>(&mut self, value: &T, tags: I)
    where
        T: ToCbor + ?Sized,
        I: IntoIterator<Item = u64>,
    {
        for tag in tags {
            self.emit_tag(tag);
        }
        self.emit(value)
    }

    pub fn emit_tag(&mut self, number: u64) {
        self.emit_header(|b| encode_tag(number, b))
    }

    /// A byte string header, `None` for the indefinite form.
    pub fn emit_bytes_start(&mut self, len: Option<usize>) {
        match len {
            Some(len) => self.emit_header(|b| encode_bytes_start(len, b)),
            None => self.emit_header(encode_indef_bytes_start),
        }
    }

    /// A text string header, `None` for the indefinite form.
    pub fn emit_text_start(&mut self, len: Option<usize>) {
        match len {
            Some(len) => self.emit_header(|b| encode_text_start(len, b)),
            None => self.emit_header(encode_indef_text_start),
        }
    }

    /// An array header, `None` for the indefinite form.
    pub fn emit_array_start(&mut self, count: Option<usize>) {
        match count {
            Some(count) => self.emit_header(|b| encode_array_start(count, b)),
            None => self.emit_header(encode_indef_array_start),
        }
    }

    /// A map header counting pairs, `None` for the indefinite form.
    pub fn emit_map_start(&mut self, count: Option<usize>) {
        match count {
            Some(count) => self.emit_header(|b| encode_map_start(count, b)),
            None => self.emit_header(encode_indef_map_start),
        }
    }

    pub fn emit_break(&mut self) {
        self.data.push(BREAK)
    }

    /// A simple value.  24 to 31 are rejected.
    pub fn emit_simple(&mut self, value: u8) -> Result<(), Error> {
        match value {
            24..=31 => Err(Error::InvalidSimpleValue(value)),
            _ => {
                self.emit_header(|b| encode_simple(value, b));
                Ok(())
            }
        }
    }
}

impl serialize::Sink for Encoder {
    type Error = Infallible;

    fn write(&mut self, data: &[u8]) -> Result<(), Infallible> {
        self.data.extend_from_slice(data);
        Ok(())
    }
}

impl ToCbor for Item {
    fn to_cbor(&self, encoder: &mut Encoder) {
        let Ok(()) = serialize::walk(self, encoder);
    }
}

macro_rules! impl_uint_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    encoder.emit_header(|b| encode_uint(*self as u64, b))
                }
            }
        )*
    };
}

impl_uint_to_cbor!(u8, u16, u32, u64, usize);

macro_rules! impl_int_to_cbor {
    ($($ty:ty),*) => {
        $(
            impl ToCbor for $ty {
                fn to_cbor(&self, encoder: &mut Encoder) {
                    let value = *self as i64;
                    if value >= 0 {
                        encoder.emit_header(|b| encode_uint(value as u64, b))
                    } else {
                        encoder.emit_header(|b| encode_negint(!(value as u64), b))
                    }
                }
            }
        )*
    };
}

impl_int_to_cbor!(i8, i16, i32, i64, isize);

impl ToCbor for f64 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        Item::float(*self).to_cbor(encoder)
    }
}

impl ToCbor for f32 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        Item::float(*self as f64).to_cbor(encoder)
    }
}

impl ToCbor for half::f16 {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(|b| encode_f16(*self, b))
    }
}

impl ToCbor for bool {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_header(|b| encode_bool(*self, b))
    }
}

impl ToCbor for str {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_text_start(Some(self.len()));
        encoder.emit_raw_slice(self.as_bytes())
    }
}

impl ToCbor for String {
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_str().to_cbor(encoder)
    }
}

/// Byte strings, distinct from `[u8]` which would otherwise be ambiguous with an array.
pub struct Bytes<'a>(pub &'a [u8]);

impl ToCbor for Bytes<'_> {
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_bytes_start(Some(self.0.len()));
        encoder.emit_raw_slice(self.0)
    }
}

impl<T> ToCbor for [T]
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        encoder.emit_array_start(Some(self.len()));
        for value in self {
            value.to_cbor(encoder);
        }
    }
}

impl<T> ToCbor for Vec<T>
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<T, const N: usize> ToCbor for [T; N]
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        self.as_slice().to_cbor(encoder)
    }
}

impl<T> ToCbor for Option<T>
where
    T: ToCbor,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => value.to_cbor(encoder),
            None => encoder.emit_header(encode_undef),
        }
    }
}

impl<T> ToCbor for &T
where
    T: ToCbor + ?Sized,
{
    fn to_cbor(&self, encoder: &mut Encoder) {
        (**self).to_cbor(encoder)
    }
}

/// Encode `value` into a new buffer.
pub fn emit<T>(value: &T) -> Vec<u8>
where
    T: ToCbor + ?Sized,
{
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}

/// Encode `value`, preceded by `tags`, into a new buffer.
pub fn emit_tagged<T, I>(value: &T, tags: I) -> Vec<u8>
where
    T: ToCbor + ?Sized,
    I: IntoIterator<Item = u64>,
{
    let mut e = Encoder::new();
    e.emit_tagged(value, tags);
    e.build()
}
