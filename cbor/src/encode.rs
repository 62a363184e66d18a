/*!
Low-level header and scalar encoders.

Each function writes exactly one CBOR header or scalar to the start of
`buffer` and returns the number of bytes written.  If `buffer` is too small,
nothing is written and 0 is returned, so the caller can retry with a larger
buffer.  None of these functions allocate.

The `*_start` encoders emit only the header of a string or container: string
payloads, container elements and tagged items are written separately by the
caller.
*/

use half::f16;

/// The "break" stop code that closes an indefinite length item.
pub const BREAK: u8 = 0xFF;

/// The longest header: an initial byte and an 8-byte argument.
pub const MAX_HEADER_LEN: usize = 9;

const INDEFINITE: u8 = 31;

fn emit(buffer: &mut [u8], initial: u8, argument: &[u8]) -> usize {
    let len = 1 + argument.len();
    if buffer.len() < len {
        return 0;
    }
    buffer[0] = initial;
    buffer[1..len].copy_from_slice(argument);
    len
}

fn emit_u8(major: u8, value: u8, buffer: &mut [u8]) -> usize {
    if value < 24 {
        emit(buffer, (major << 5) | value, &[])
    } else {
        emit(buffer, (major << 5) | 24, &[value])
    }
}

fn emit_u16(major: u8, value: u16, buffer: &mut [u8]) -> usize {
    emit(buffer, (major << 5) | 25, &value.to_be_bytes())
}

fn emit_u32(major: u8, value: u32, buffer: &mut [u8]) -> usize {
    emit(buffer, (major << 5) | 26, &value.to_be_bytes())
}

fn emit_u64(major: u8, value: u64, buffer: &mut [u8]) -> usize {
    emit(buffer, (major << 5) | 27, &value.to_be_bytes())
}

/// Emit the shortest header for `major` with argument `value`.
pub(crate) fn emit_uint_minor(major: u8, value: u64, buffer: &mut [u8]) -> usize {
    if value <= u8::MAX as u64 {
        emit_u8(major, value as u8, buffer)
    } else if value <= u16::MAX as u64 {
        emit_u16(major, value as u16, buffer)
    } else if value <= u32::MAX as u64 {
        emit_u32(major, value as u32, buffer)
    } else {
        emit_u64(major, value, buffer)
    }
}

/// Emit a header for `major` with argument `value` at width class `width`.
pub(crate) fn emit_uint_width(
    major: u8,
    value: u64,
    width: crate::Width,
    buffer: &mut [u8],
) -> usize {
    match width {
        crate::Width::W8 => emit_u8(major, value as u8, buffer),
        crate::Width::W16 => emit_u16(major, value as u16, buffer),
        crate::Width::W32 => emit_u32(major, value as u32, buffer),
        crate::Width::W64 => emit_u64(major, value, buffer),
    }
}

/// An unsigned integer in its shortest form.
pub fn encode_uint(value: u64, buffer: &mut [u8]) -> usize {
    emit_uint_minor(0, value, buffer)
}

/// An unsigned integer in the immediate or one-byte form.
pub fn encode_uint8(value: u8, buffer: &mut [u8]) -> usize {
    emit_u8(0, value, buffer)
}

/// An unsigned integer always using a 2-byte argument.
pub fn encode_uint16(value: u16, buffer: &mut [u8]) -> usize {
    emit_u16(0, value, buffer)
}

/// An unsigned integer always using a 4-byte argument.
pub fn encode_uint32(value: u32, buffer: &mut [u8]) -> usize {
    emit_u32(0, value, buffer)
}

/// An unsigned integer always using an 8-byte argument.
pub fn encode_uint64(value: u64, buffer: &mut [u8]) -> usize {
    emit_u64(0, value, buffer)
}

/// The negative integer `-1 - value` in its shortest form.
pub fn encode_negint(value: u64, buffer: &mut [u8]) -> usize {
    emit_uint_minor(1, value, buffer)
}

pub fn encode_negint8(value: u8, buffer: &mut [u8]) -> usize {
    emit_u8(1, value, buffer)
}

pub fn encode_negint16(value: u16, buffer: &mut [u8]) -> usize {
    emit_u16(1, value, buffer)
}

pub fn encode_negint32(value: u32, buffer: &mut [u8]) -> usize {
    emit_u32(1, value, buffer)
}

pub fn encode_negint64(value: u64, buffer: &mut [u8]) -> usize {
    emit_u64(1, value, buffer)
}

pub fn encode_bytes_start(len: usize, buffer: &mut [u8]) -> usize {
    emit_uint_minor(2, len as u64, buffer)
}

pub fn encode_indef_bytes_start(buffer: &mut [u8]) -> usize {
    emit(buffer, (2 << 5) | INDEFINITE, &[])
}

pub fn encode_text_start(len: usize, buffer: &mut [u8]) -> usize {
    emit_uint_minor(3, len as u64, buffer)
}

pub fn encode_indef_text_start(buffer: &mut [u8]) -> usize {
    emit(buffer, (3 << 5) | INDEFINITE, &[])
}

pub fn encode_array_start(len: usize, buffer: &mut [u8]) -> usize {
    emit_uint_minor(4, len as u64, buffer)
}

pub fn encode_indef_array_start(buffer: &mut [u8]) -> usize {
    emit(buffer, (4 << 5) | INDEFINITE, &[])
}

/// A map header; `len` counts pairs, not keys and values.
pub fn encode_map_start(len: usize, buffer: &mut [u8]) -> usize {
    emit_uint_minor(5, len as u64, buffer)
}

pub fn encode_indef_map_start(buffer: &mut [u8]) -> usize {
    emit(buffer, (5 << 5) | INDEFINITE, &[])
}

/// A tag header; the tagged item must be encoded immediately after.
pub fn encode_tag(number: u64, buffer: &mut [u8]) -> usize {
    emit_uint_minor(6, number, buffer)
}

/// A half precision float, converting `value` with round-to-nearest-even.
pub fn encode_half(value: f32, buffer: &mut [u8]) -> usize {
    encode_f16(f16::from_f32(value), buffer)
}

pub(crate) fn encode_f16(value: f16, buffer: &mut [u8]) -> usize {
    emit(buffer, (7 << 5) | 25, &value.to_be_bytes())
}

pub fn encode_single(value: f32, buffer: &mut [u8]) -> usize {
    emit(buffer, (7 << 5) | 26, &value.to_be_bytes())
}

pub fn encode_double(value: f64, buffer: &mut [u8]) -> usize {
    emit(buffer, (7 << 5) | 27, &value.to_be_bytes())
}

pub fn encode_bool(value: bool, buffer: &mut [u8]) -> usize {
    emit(buffer, (7 << 5) | if value { 21 } else { 20 }, &[])
}

pub fn encode_null(buffer: &mut [u8]) -> usize {
    emit(buffer, (7 << 5) | 22, &[])
}

pub fn encode_undef(buffer: &mut [u8]) -> usize {
    emit(buffer, (7 << 5) | 23, &[])
}

/// A simple value.  24 to 31 are reserved, nothing is written and 0 is returned.
pub fn encode_simple(value: u8, buffer: &mut [u8]) -> usize {
    match value {
        24..=31 => 0,
        _ => emit_u8(7, value, buffer),
    }
}

pub fn encode_break(buffer: &mut [u8]) -> usize {
    emit(buffer, BREAK, &[])
}
