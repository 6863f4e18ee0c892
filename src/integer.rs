use std::cmp;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};

use num_traits::NumCast;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum IntPriv {
    /// Always non-less than zero. Routed to the unsigned column.
    PosInt(u64),
    /// Always less than zero. Routed to the signed column.
    NegInt(i64),
}

/// Represents a tile attribute integer, whether signed or unsigned.
///
/// The codec stores non-negative integers in the unsigned column and negative integers
/// in the signed column, so the distinction is kept all the way up in the value model. A
/// `Value` containing an integer can be constructed using the `From` trait.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Integer {
    n: IntPriv,
}

impl Integer {
    /// Minimum possible integer that can be represented. Equivalent to `i64::MIN`.
    pub fn min_value() -> Integer {
        Integer {
            n: IntPriv::NegInt(i64::MIN),
        }
    }

    /// Maximum possible integer that can be represented. Equivalent to `u64::MAX`.
    pub fn max_value() -> Integer {
        Integer {
            n: IntPriv::PosInt(u64::MAX),
        }
    }

    /// Returns `true` if the integer is below zero.
    #[inline]
    pub fn is_negative(&self) -> bool {
        matches!(self.n, IntPriv::NegInt(..))
    }

    /// Returns `true` if the integer can be represented as `i64`.
    #[inline]
    pub fn is_i64(&self) -> bool {
        match self.n {
            IntPriv::PosInt(n) => n <= i64::MAX as u64,
            IntPriv::NegInt(..) => true,
        }
    }

    /// Returns `true` if the integer can be represented as `u64`.
    #[inline]
    pub fn is_u64(&self) -> bool {
        match self.n {
            IntPriv::PosInt(..) => true,
            IntPriv::NegInt(..) => false,
        }
    }

    /// Returns the integer represented as `i64` if possible, or else `None`.
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            IntPriv::PosInt(n) => NumCast::from(n),
            IntPriv::NegInt(n) => Some(n),
        }
    }

    /// Returns the integer represented as `u64` if possible, or else `None`.
    #[inline]
    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            IntPriv::PosInt(n) => Some(n),
            IntPriv::NegInt(n) => NumCast::from(n),
        }
    }

    /// Returns the integer represented as `f64` if possible, or else `None`.
    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        match self.n {
            IntPriv::PosInt(n) => NumCast::from(n),
            IntPriv::NegInt(n) => NumCast::from(n),
        }
    }
}

pub(crate) fn get_int_internal(val: &Integer) -> IntPriv {
    val.n
}

impl std::default::Default for Integer {
    fn default() -> Self {
        Self {
            n: IntPriv::PosInt(0),
        }
    }
}

impl cmp::Ord for Integer {
    fn cmp(&self, other: &Integer) -> Ordering {
        match (self.n, other.n) {
            (IntPriv::NegInt(lhs), IntPriv::NegInt(ref rhs)) => lhs.cmp(rhs),
            (IntPriv::NegInt(_), IntPriv::PosInt(_)) => Ordering::Less,
            (IntPriv::PosInt(_), IntPriv::NegInt(_)) => Ordering::Greater,
            (IntPriv::PosInt(lhs), IntPriv::PosInt(ref rhs)) => lhs.cmp(rhs),
        }
    }
}

impl cmp::PartialOrd for Integer {
    fn partial_cmp(&self, other: &Integer) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Debug for Integer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        Debug::fmt(&self.n, fmt)
    }
}

impl Display for Integer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self.n {
            IntPriv::PosInt(v) => Display::fmt(&v, fmt),
            IntPriv::NegInt(v) => Display::fmt(&v, fmt),
        }
    }
}

macro_rules! impl_from_unsigned {
    ($t: ty) => {
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                Integer {
                    n: IntPriv::PosInt(n as u64),
                }
            }
        }
    };
}

macro_rules! impl_from_signed {
    ($t: ty) => {
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                if n < 0 {
                    Integer {
                        n: IntPriv::NegInt(n as i64),
                    }
                } else {
                    Integer {
                        n: IntPriv::PosInt(n as u64),
                    }
                }
            }
        }
    };
}

impl_from_unsigned!(u8);
impl_from_unsigned!(u16);
impl_from_unsigned!(u32);
impl_from_unsigned!(u64);
impl_from_unsigned!(usize);
impl_from_signed!(i8);
impl_from_signed!(i16);
impl_from_signed!(i32);
impl_from_signed!(i64);
impl_from_signed!(isize);

use std::convert::TryFrom;

macro_rules! impl_try_from {
    ($t: ty) => {
        impl TryFrom<Integer> for $t {
            type Error = Integer;
            fn try_from(v: Integer) -> Result<Self, Self::Error> {
                match v.n {
                    IntPriv::PosInt(n) => TryFrom::try_from(n).map_err(|_| v),
                    IntPriv::NegInt(n) => TryFrom::try_from(n).map_err(|_| v),
                }
            }
        }
    };
}

impl_try_from!(u8);
impl_try_from!(u16);
impl_try_from!(u32);
impl_try_from!(u64);
impl_try_from!(usize);
impl_try_from!(i8);
impl_try_from!(i16);
impl_try_from!(i32);
impl_try_from!(i64);
impl_try_from!(isize);

use serde::{
    de::{Deserialize, Deserializer},
    ser::{Serialize, Serializer},
};

impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.n {
            IntPriv::PosInt(v) => serializer.serialize_u64(v),
            IntPriv::NegInt(v) => serializer.serialize_i64(v),
        }
    }
}

impl<'de> Deserialize<'de> for Integer {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IntVisitor;
        impl<'de> serde::de::Visitor<'de> for IntVisitor {
            type Value = Integer;

            fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
                write!(fmt, "an integer")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Integer::from(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Integer::from(v))
            }
        }

        deserializer.deserialize_any(IntVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_split() {
        assert!(!Integer::from(0u8).is_negative());
        assert!(!Integer::from(3i64).is_negative());
        assert!(Integer::from(-3i64).is_negative());
        // A non-negative i64 lands on the unsigned side.
        assert!(Integer::from(3i64).is_u64());
        assert!(!Integer::from(-3i64).is_u64());
    }

    #[test]
    fn conversions() {
        let x = Integer::from(u64::MAX);
        assert_eq!(x.as_u64(), Some(u64::MAX));
        assert_eq!(x.as_i64(), None);
        assert!(i64::try_from(x).is_err());

        let x = Integer::from(i64::MIN);
        assert_eq!(x.as_i64(), Some(i64::MIN));
        assert_eq!(x.as_u64(), None);
        assert!(u64::try_from(x).is_err());

        let x = Integer::from(7u16);
        assert_eq!(u8::try_from(x), Ok(7u8));
        assert_eq!(x.as_f64(), Some(7.0));
    }

    #[test]
    fn ordering() {
        let mut v = [
            Integer::from(10u64),
            Integer::from(-4i64),
            Integer::max_value(),
            Integer::min_value(),
            Integer::from(0u64),
        ];
        v.sort();
        assert_eq!(
            v,
            [
                Integer::min_value(),
                Integer::from(-4i64),
                Integer::from(0u64),
                Integer::from(10u64),
                Integer::max_value(),
            ]
        );
    }
}
