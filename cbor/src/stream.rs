/*!
A streaming, callback driven token decoder.

[`decode`] recognizes exactly one token at the start of its input and reports
it to a [`Callbacks`] implementation.  A token is a complete scalar (an
integer, a float, a simple value, or a definite length string header together
with its payload), or the header of a container, a tag or an indefinite length
string.  The elements of containers are separate tokens, decoded by calling
[`decode`] again on the rest of the input.

This layer never allocates, never recurses and keeps no state between calls,
so it is safe to run directly on untrusted input.  Structural rules that need
context, such as a break with no open indefinite length item, are enforced by
the caller; the tree building [`load`](crate::load) does so.

If the input ends part way through a token, [`Status::NotEnoughData`] is
returned together with the number of additional bytes required; the caller
should retry with a buffer starting at the same offset and extended by at
least that many bytes.
*/

use super::*;
use half::f16;

/// The outcome of one [`decode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// A complete token was decoded and reported.
    Finished,
    /// The input ends part way through a token, nothing was reported.
    NotEnoughData,
    /// The input is not well-formed CBOR, nothing was reported.
    Error(Malformed),
}

/// The result of one [`decode`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeResult {
    pub status: Status,
    /// Bytes consumed, 0 unless the status is [`Status::Finished`].
    pub read: usize,
    /// Additional bytes required, 0 unless the status is [`Status::NotEnoughData`].
    pub required: usize,
}

impl DecodeResult {
    fn finished(read: usize) -> Self {
        Self {
            status: Status::Finished,
            read,
            required: 0,
        }
    }

    fn short(required: usize) -> Self {
        Self {
            status: Status::NotEnoughData,
            read: 0,
            required,
        }
    }

    fn malformed(reason: Malformed) -> Self {
        Self {
            status: Status::Error(reason),
            read: 0,
            required: 0,
        }
    }

    /// Convert to a `Result`, the `Ok` value being the bytes consumed.
    pub fn into_result(self) -> Result<usize, Error> {
        match self.status {
            Status::Finished => Ok(self.read),
            Status::NotEnoughData => Err(Error::NotEnoughData {
                required: self.required,
            }),
            Status::Error(reason) => Err(reason.into()),
        }
    }
}

/// Receives the tokens recognized by [`decode`].
///
/// Every method does nothing by default, so implementations only override
/// the events they care about.
#[allow(unused_variables)]
pub trait Callbacks {
    /// An unsigned integer, with the width of its encoding.
    fn uint(&mut self, value: u64, width: Width) {}

    /// The negative integer `-1 - value`, with the width of its encoding.
    fn negint(&mut self, value: u64, width: Width) {}

    /// A complete definite length byte string.
    fn bytes(&mut self, data: &[u8]) {}

    /// The start of an indefinite length byte string.
    fn bytes_start(&mut self) {}

    /// A complete definite length text string, already checked to be UTF-8.
    fn text(&mut self, data: &str) {}

    /// The start of an indefinite length text string.
    fn text_start(&mut self) {}

    /// The start of an array of `count` elements.
    fn array_start(&mut self, count: usize) {}

    fn indef_array_start(&mut self) {}

    /// The start of a map of `count` pairs.
    fn map_start(&mut self, count: usize) {}

    fn indef_map_start(&mut self) {}

    /// A tag; the tagged item is the next complete item.
    fn tag(&mut self, number: u64) {}

    fn half(&mut self, value: f16) {}

    fn single(&mut self, value: f32) {}

    fn double(&mut self, value: f64) {}

    fn boolean(&mut self, value: bool) {}

    fn null(&mut self) {}

    fn undefined(&mut self) {}

    /// A simple value without a dedicated callback.
    fn simple(&mut self, value: u8) {}

    /// The break that closes an indefinite length item.
    fn indef_break(&mut self) {}
}

enum Argument {
    Value(u64, Width),
    Indefinite,
}

enum Stop {
    Short(usize),
    Malformed(Malformed),
}

impl From<Malformed> for Stop {
    fn from(reason: Malformed) -> Self {
        Self::Malformed(reason)
    }
}

fn fixed<const N: usize>(data: &[u8]) -> Result<[u8; N], Stop> {
    match data.get(1..=N) {
        Some(bytes) => {
            let mut out = [0u8; N];
            out.copy_from_slice(bytes);
            Ok(out)
        }
        None => Err(Stop::Short(N + 1 - data.len())),
    }
}

/// Read the argument following the initial byte, returning it with the
/// header length.
fn argument(data: &[u8], minor: u8, strict: bool) -> Result<(Argument, usize), Stop> {
    let (value, width, len) = match minor {
        0..=23 => (minor as u64, Width::W8, 1),
        24 => (u8::from_be_bytes(fixed(data)?) as u64, Width::W8, 2),
        25 => (u16::from_be_bytes(fixed(data)?) as u64, Width::W16, 3),
        26 => (u32::from_be_bytes(fixed(data)?) as u64, Width::W32, 5),
        27 => (u64::from_be_bytes(fixed(data)?), Width::W64, 9),
        31 => return Ok((Argument::Indefinite, 1)),
        _ => return Err(Malformed::ReservedMinor(minor).into()),
    };

    if strict {
        let shortest = match width {
            Width::W8 => minor < 24 || value >= 24,
            Width::W16 => value > Width::W8.max_value(),
            Width::W32 => value > Width::W16.max_value(),
            Width::W64 => value > Width::W32.max_value(),
        };
        if !shortest {
            return Err(Malformed::NonCanonical.into());
        }
    }
    Ok((Argument::Value(value, width), len))
}

/// The payload of a definite length string, and the total token length.
fn payload(data: &[u8], header: usize, len: u64) -> Result<(&[u8], usize), Stop> {
    let end = usize::try_from(len)
        .ok()
        .and_then(|len| len.checked_add(header))
        .ok_or(Malformed::LengthOverflow(len))?;
    match data.get(header..end) {
        Some(payload) => Ok((payload, end)),
        None => Err(Stop::Short(end - data.len())),
    }
}

fn count(value: u64) -> Result<usize, Stop> {
    usize::try_from(value).map_err(|_| Malformed::LengthOverflow(value).into())
}

fn simple<C>(value: u8, callbacks: &mut C)
where
    C: Callbacks + ?Sized,
{
    match value {
        20 => callbacks.boolean(false),
        21 => callbacks.boolean(true),
        22 => callbacks.null(),
        23 => callbacks.undefined(),
        _ => callbacks.simple(value),
    }
}

fn token<C>(data: &[u8], strict: bool, callbacks: &mut C) -> Result<usize, Stop>
where
    C: Callbacks + ?Sized,
{
    let Some(&initial) = data.first() else {
        return Err(Stop::Short(1));
    };
    let (major, minor) = (initial >> 5, initial & 0x1F);

    if major == 7 {
        return match minor {
            0..=19 if strict => Err(Malformed::InvalidSimpleValue(minor).into()),
            0..=23 => {
                simple(minor, callbacks);
                Ok(1)
            }
            24 => {
                let [value] = fixed::<1>(data)?;
                if value < 32 && (strict || value >= 24) {
                    return Err(Malformed::InvalidSimpleValue(value).into());
                }
                simple(value, callbacks);
                Ok(2)
            }
            25 => {
                callbacks.half(f16::from_be_bytes(fixed(data)?));
                Ok(3)
            }
            26 => {
                callbacks.single(f32::from_be_bytes(fixed(data)?));
                Ok(5)
            }
            27 => {
                callbacks.double(f64::from_be_bytes(fixed(data)?));
                Ok(9)
            }
            31 => {
                callbacks.indef_break();
                Ok(1)
            }
            _ => Err(Malformed::ReservedMinor(minor).into()),
        };
    }

    let (argument, header) = argument(data, minor, strict)?;
    match (major, argument) {
        (0, Argument::Value(v, w)) => callbacks.uint(v, w),
        (1, Argument::Value(v, w)) => callbacks.negint(v, w),
        (2, Argument::Value(len, _)) => {
            let (payload, end) = payload(data, header, len)?;
            callbacks.bytes(payload);
            return Ok(end);
        }
        (2, Argument::Indefinite) => callbacks.bytes_start(),
        (3, Argument::Value(len, _)) => {
            let (payload, end) = payload(data, header, len)?;
            let text = core::str::from_utf8(payload).map_err(|_| Malformed::InvalidUtf8)?;
            callbacks.text(text);
            return Ok(end);
        }
        (3, Argument::Indefinite) => callbacks.text_start(),
        (4, Argument::Value(n, _)) => callbacks.array_start(count(n)?),
        (4, Argument::Indefinite) => callbacks.indef_array_start(),
        (5, Argument::Value(n, _)) => callbacks.map_start(count(n)?),
        (5, Argument::Indefinite) => callbacks.indef_map_start(),
        (6, Argument::Value(n, _)) => callbacks.tag(n),
        (major, Argument::Indefinite) => {
            return Err(Malformed::InvalidIndefinite(major).into());
        }
        // Major type 7 is handled above
        (_, Argument::Value(..)) => return Err(Malformed::ReservedMinor(minor).into()),
    }
    Ok(header)
}

/// Decode one token from the start of `data`, accepting any well-formed
/// encoding of an argument.
pub fn decode<C>(data: &[u8], callbacks: &mut C) -> DecodeResult
where
    C: Callbacks + ?Sized,
{
    decode_with(data, false, callbacks)
}

/// Decode one token from the start of `data`.  With `strict` set, arguments
/// not encoded in their shortest form, the unassigned one-byte simple values
/// 0 to 19, and two-byte simple values below 32 are rejected.
pub fn decode_with<C>(data: &[u8], strict: bool, callbacks: &mut C) -> DecodeResult
where
    C: Callbacks + ?Sized,
{
    match token(data, strict, callbacks) {
        Ok(read) => DecodeResult::finished(read),
        Err(Stop::Short(required)) => DecodeResult::short(required),
        Err(Stop::Malformed(reason)) => DecodeResult::malformed(reason),
    }
}
