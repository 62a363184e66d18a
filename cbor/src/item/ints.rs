use super::*;

/// The width class of an integer: how many bytes its argument uses on the wire.
///
/// [`Width::W8`] covers both the immediate form (values 0 to 23) and the
/// one-byte form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// The narrowest width that can hold `value`.
    pub fn for_value(value: u64) -> Self {
        if value <= u8::MAX as u64 {
            Self::W8
        } else if value <= u16::MAX as u64 {
            Self::W16
        } else if value <= u32::MAX as u64 {
            Self::W32
        } else {
            Self::W64
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::W8 => 1,
            Self::W16 => 2,
            Self::W32 => 4,
            Self::W64 => 8,
        }
    }

    pub(crate) fn max_value(self) -> u64 {
        match self {
            Self::W8 => u8::MAX as u64,
            Self::W16 => u16::MAX as u64,
            Self::W32 => u32::MAX as u64,
            Self::W64 => u64::MAX,
        }
    }
}

/// An integer argument together with its width class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Int {
    width: Width,
    value: u64,
}

impl Int {
    /// Fails with [`Error::TooLarge`] if `value` does not fit in `width`.
    pub fn new(value: u64, width: Width) -> Result<Self, Error> {
        if value > width.max_value() {
            return Err(Error::TooLarge);
        }
        Ok(Self { width, value })
    }

    pub(crate) fn new_unchecked(value: u64, width: Width) -> Self {
        Self { width, value }
    }

    pub fn shortest(value: u64) -> Self {
        Self {
            width: Width::for_value(value),
            value,
        }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

macro_rules! impl_width_constructors {
    ($(($uint:ident, $negint:ident, $ty:ty, $width:expr)),*) => {
        $(
            /// An unsigned integer that always encodes at this width.
            pub fn $uint(value: $ty) -> Self {
                Self::from_value(Value::Uint(Int::new_unchecked(value as u64, $width)))
            }

            /// A negative integer `-1 - value` that always encodes at this width.
            pub fn $negint(value: $ty) -> Self {
                Self::from_value(Value::NegInt(Int::new_unchecked(value as u64, $width)))
            }
        )*
    };
}

impl Item {
    impl_width_constructors!(
        (uint8, negint8, u8, Width::W8),
        (uint16, negint16, u16, Width::W16),
        (uint32, negint32, u32, Width::W32),
        (uint64, negint64, u64, Width::W64)
    );

    /// An unsigned integer using the narrowest width.
    pub fn uint(value: u64) -> Self {
        Self::from_value(Value::Uint(Int::shortest(value)))
    }

    /// The negative integer `-1 - value`, using the narrowest width.
    pub fn negint(value: u64) -> Self {
        Self::from_value(Value::NegInt(Int::shortest(value)))
    }

    pub fn int(value: i64) -> Self {
        if value >= 0 {
            Self::uint(value as u64)
        } else {
            Self::negint(!(value as u64))
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self.value(), Value::Uint(_) | Value::NegInt(_))
    }

    /// The wire argument and width of an unsigned or negative integer.
    pub fn as_int(&self) -> Option<Int> {
        match self.value() {
            Value::Uint(i) | Value::NegInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.value() {
            Value::Uint(i) => Some(i.value()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// The integer value, covering the full range `-2^64 ..= 2^64 - 1`.
    pub fn as_i128(&self) -> Option<i128> {
        match self.value() {
            Value::Uint(i) => Some(i.value() as i128),
            Value::NegInt(i) => Some(-1 - i.value() as i128),
            _ => None,
        }
    }

    /// Replace the value of an integer item, keeping its sign and width.
    pub fn set_int(&mut self, value: u64) -> Result<(), Error> {
        match self.value_mut()? {
            Value::Uint(i) | Value::NegInt(i) => {
                *i = Int::new(value, i.width())?;
                Ok(())
            }
            _ => Err(Error::IncorrectType("integer")),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(Width::for_value(0), Width::W8);
        assert_eq!(Width::for_value(255), Width::W8);
        assert_eq!(Width::for_value(256), Width::W16);
        assert_eq!(Width::for_value(65536), Width::W32);
        assert_eq!(Width::for_value(1 << 32), Width::W64);
        assert!(Int::new(256, Width::W8).is_err());
    }

    #[test]
    fn signed() {
        assert_eq!(Item::int(-1).as_int(), Some(Int::shortest(0)));
        assert_eq!(Item::int(-1000).as_i64(), Some(-1000));
        assert_eq!(Item::int(i64::MIN).as_i64(), Some(i64::MIN));
        assert_eq!(Item::negint64(u64::MAX).as_i128(), Some(-18446744073709551616));
        assert_eq!(Item::negint64(u64::MAX).as_i64(), None);
        assert_eq!(Item::uint16(5).as_int().map(|i| i.width()), Some(Width::W16));
    }

    #[test]
    fn set_int_keeps_width() {
        let mut i = Item::uint8(1);
        assert!(i.set_int(200).is_ok());
        assert_eq!(i.as_u64(), Some(200));
        assert_eq!(i.set_int(300), Err(Error::TooLarge));

        let shared = i.share();
        assert_eq!(i.set_int(2), Err(Error::Shared));
        drop(shared);
        assert!(i.set_int(2).is_ok());
    }
}
