use super::*;
use half::f16;

/// The content of a major type 7 item: floats, booleans, null, undefined and
/// the other simple values.
#[derive(Debug, Clone, Copy)]
pub enum FloatCtrl {
    Bool(bool),
    Null,
    Undefined,
    /// A simple value without a dedicated meaning: 0 to 19, or 32 to 255.
    Simple(u8),
    Half(f16),
    Single(f32),
    Double(f64),
}

impl FloatCtrl {
    /// Map a simple value to its variant.  24 to 31 are not valid simple values.
    pub fn from_simple(value: u8) -> Result<Self, Error> {
        match value {
            20 => Ok(Self::Bool(false)),
            21 => Ok(Self::Bool(true)),
            22 => Ok(Self::Null),
            23 => Ok(Self::Undefined),
            24..=31 => Err(Error::InvalidSimpleValue(value)),
            _ => Ok(Self::Simple(value)),
        }
    }

    /// The simple value number, for everything but floats.
    pub fn simple_value(&self) -> Option<u8> {
        match self {
            Self::Bool(false) => Some(20),
            Self::Bool(true) => Some(21),
            Self::Null => Some(22),
            Self::Undefined => Some(23),
            Self::Simple(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Half(_) | Self::Single(_) | Self::Double(_))
    }

    /// The value of a float of any precision, widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Half(f) => Some(f.to_f64()),
            Self::Single(f) => Some(*f as f64),
            Self::Double(f) => Some(*f),
            _ => None,
        }
    }

    /// Floats compare by precision and bit pattern, so NaNs round-trip as equal.
    pub(super) fn bitwise_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Half(a), Self::Half(b)) => a.to_bits() == b.to_bits(),
            (Self::Single(a), Self::Single(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Simple(a), Self::Simple(b)) => a == b,
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            _ => false,
        }
    }
}

fn lossless_float_coerce<T>(value: f64) -> Option<T>
where
    T: num_traits::FromPrimitive + Into<f64> + Copy,
{
    match <T as num_traits::FromPrimitive>::from_f64(value) {
        Some(f) if <T as Into<f64>>::into(f) == value => Some(f),
        _ => None,
    }
}

impl Item {
    fn float_ctrl(value: FloatCtrl) -> Self {
        Self::from_value(Value::FloatCtrl(value))
    }

    pub fn bool(value: bool) -> Self {
        Self::float_ctrl(FloatCtrl::Bool(value))
    }

    pub fn null() -> Self {
        Self::float_ctrl(FloatCtrl::Null)
    }

    pub fn undefined() -> Self {
        Self::float_ctrl(FloatCtrl::Undefined)
    }

    /// A simple value; 20 to 23 become the matching boolean, null or undefined item.
    pub fn simple(value: u8) -> Result<Self, Error> {
        FloatCtrl::from_simple(value).map(Self::float_ctrl)
    }

    /// A half precision float, rounding `value` to the nearest binary16 value.
    pub fn half(value: f32) -> Self {
        Self::float_ctrl(FloatCtrl::Half(f16::from_f32(value)))
    }

    pub fn single(value: f32) -> Self {
        Self::float_ctrl(FloatCtrl::Single(value))
    }

    pub fn double(value: f64) -> Self {
        Self::float_ctrl(FloatCtrl::Double(value))
    }

    /// The narrowest float that represents `value` exactly.
    pub fn float(value: f64) -> Self {
        if let Some(f) = lossless_float_coerce::<f16>(value) {
            Self::float_ctrl(FloatCtrl::Half(f))
        } else if let Some(f) = lossless_float_coerce::<f32>(value) {
            Self::float_ctrl(FloatCtrl::Single(f))
        } else if value.is_nan() {
            Self::float_ctrl(FloatCtrl::Half(f16::NAN))
        } else {
            Self::float_ctrl(FloatCtrl::Double(value))
        }
    }

    pub fn as_float_ctrl(&self) -> Option<&FloatCtrl> {
        match self.value() {
            Value::FloatCtrl(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        self.as_float_ctrl().is_some_and(FloatCtrl::is_float)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_float_ctrl()?.as_f64()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.as_float_ctrl()? {
            FloatCtrl::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.as_float_ctrl(), Some(FloatCtrl::Null))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self.as_float_ctrl(), Some(FloatCtrl::Undefined))
    }
}
