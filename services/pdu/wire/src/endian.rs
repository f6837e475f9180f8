//! Conversion between host byte order and wire byte order.
//!
//! Header nodes keep multi-byte fields in wire (big-endian) order and convert
//! on every accessor, so these helpers are called exactly once per boundary
//! crossing.

/// Fixed-width unsigned integers that can be byte-swapped
pub trait EndianInt: Copy {
    /// Convert from host order to big-endian
    fn to_be(self) -> Self;
    /// Convert from big-endian to host order
    fn from_be(self) -> Self;
    /// Convert from host order to little-endian
    fn to_le(self) -> Self;
    /// Convert from little-endian to host order
    fn from_le(self) -> Self;
}

macro_rules! impl_endian_int {
    ($($ty:ty),*) => {
        $(
            impl EndianInt for $ty {
                #[inline]
                fn to_be(self) -> Self {
                    <$ty>::to_be(self)
                }

                #[inline]
                fn from_be(self) -> Self {
                    <$ty>::from_be(self)
                }

                #[inline]
                fn to_le(self) -> Self {
                    <$ty>::to_le(self)
                }

                #[inline]
                fn from_le(self) -> Self {
                    <$ty>::from_le(self)
                }
            }
        )*
    };
}

impl_endian_int!(u16, u32, u64);

/// Host order to wire order
#[inline]
pub fn host_to_be<T: EndianInt>(value: T) -> T {
    value.to_be()
}

/// Wire order to host order
#[inline]
pub fn be_to_host<T: EndianInt>(value: T) -> T {
    T::from_be(value)
}

/// Host order to little-endian
#[inline]
pub fn host_to_le<T: EndianInt>(value: T) -> T {
    value.to_le()
}

/// Little-endian to host order
#[inline]
pub fn le_to_host<T: EndianInt>(value: T) -> T {
    T::from_le(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_be_layout_in_memory() {
        let wire = host_to_be(0x0800u16);
        assert_eq!(wire.to_ne_bytes(), [0x08, 0x00]);
    }

    #[test]
    fn test_le_layout_in_memory() {
        let wire = host_to_le(0x1234_5678u32);
        assert_eq!(wire.to_ne_bytes(), [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_u64_roundtrip() {
        let value = 0x0102_0304_0506_0708u64;
        assert_eq!(be_to_host(host_to_be(value)), value);
        assert_eq!(le_to_host(host_to_le(value)), value);
    }

    #[test]
    fn test_every_u16_roundtrips() {
        for value in 0..=u16::MAX {
            assert_eq!(be_to_host(host_to_be(value)), value);
        }
    }
}
