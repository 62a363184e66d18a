/*!
CBOR Diagnostic Notation (RFC 8949 §8) rendering of items.

Indefinite length items are marked with `_`, e.g. `[_ 1, 2]` and
`(_ "a", "b")`.
*/

use super::*;
use core::fmt::{self, Display, Formatter, Write};

fn write_text(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04x}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

fn write_bytes(f: &mut Formatter<'_>, b: &[u8]) -> fmt::Result {
    f.write_str("h'")?;
    for byte in b {
        write!(f, "{byte:02x}")?;
    }
    f.write_char('\'')
}

fn write_float(f: &mut Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        write!(f, "{v:?}")
    }
}

fn write_chunks(f: &mut Formatter<'_>, chunks: &[Item], empty: &str) -> fmt::Result {
    if chunks.is_empty() {
        return f.write_str(empty);
    }
    f.write_str("(_ ")?;
    for (i, chunk) in chunks.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{chunk}")?;
    }
    f.write_char(')')
}

impl Display for FloatCtrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
            Self::Simple(v) => write!(f, "simple({v})"),
            Self::Half(v) => write_float(f, v.to_f64()),
            Self::Single(v) => write_float(f, *v as f64),
            Self::Double(v) => write_float(f, *v),
        }
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.value() {
            Value::Uint(i) => write!(f, "{}", i.value()),
            Value::NegInt(i) => write!(f, "{}", -1 - i.value() as i128),
            Value::Bytes(Str::Definite(b)) => write_bytes(f, b),
            Value::Bytes(Str::Chunked(chunks)) => write_chunks(f, chunks, "''_"),
            Value::Text(Str::Definite(s)) => write_text(f, s),
            Value::Text(Str::Chunked(chunks)) => write_chunks(f, chunks, "\"\"_"),
            Value::Array(a) => {
                f.write_str(if a.is_definite() { "[" } else { "[_ " })?;
                for (i, item) in a.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Value::Map(m) => {
                f.write_str(if m.is_definite() { "{" } else { "{_ " })?;
                for (i, pair) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", pair.key, pair.value)?;
                }
                f.write_char('}')
            }
            Value::Tag(t) => write!(f, "{}({})", t.number(), t.item()),
            Value::FloatCtrl(fc) => write!(f, "{fc}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn diagnostic() {
        let mut key = Item::indefinite_text();
        key.add_chunk(Item::text("a")).unwrap();
        key.add_chunk(Item::text("b")).unwrap();

        let mut m = Item::map(Some(1));
        m.add_pair(key, Item::map(Some(0))).unwrap();
        assert_eq!(m.to_string(), r#"{(_ "a", "b"): {}}"#);

        let mut a = Item::array(None);
        a.push(Item::int(-10)).unwrap();
        a.push(Item::bytes([0xdeu8, 0xad])).unwrap();
        a.push(Item::tag(24, Item::indefinite_bytes())).unwrap();
        a.push(Item::half(1.5)).unwrap();
        a.push(Item::simple(16).unwrap()).unwrap();
        assert_eq!(a.to_string(), "[_ -10, h'dead', 24(''_), 1.5, simple(16)]");

        assert_eq!(Item::double(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Item::text("a\"b").to_string(), r#""a\"b""#);
    }
}
