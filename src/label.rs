//! Element types accepted as bin labels and as output order indices.

/// An integer usable as a bin label.
pub trait BinLabel: Copy {
    /// The bucket this label selects, `None` if it is negative or doesn't fit `usize`.
    fn bucket(self) -> Option<usize>;

    /// Lossless value for error reports.
    fn widen(self) -> i128;
}

/// An integer type the computed permutation can be written as.
pub trait OrderIndex: Copy {
    /// Largest item index representable by `Self`.
    const MAX_INDEX: usize;

    /// Callers guarantee `index <= Self::MAX_INDEX`.
    fn from_index(index: usize) -> Self;
}

macro_rules! impl_bin_label {
    ($($t:ty),*) => {
        $(
            impl BinLabel for $t {
                #[inline]
                fn bucket(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                #[inline]
                fn widen(self) -> i128 {
                    self as i128
                }
            }
        )*
    };
}

impl_bin_label!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_order_index {
    ($($t:ty),*) => {
        $(
            impl OrderIndex for $t {
                // Saturates to usize::MAX when the type is wider than usize.
                const MAX_INDEX: usize = if (<$t>::MAX as u128) > (usize::MAX as u128) {
                    usize::MAX
                } else {
                    <$t>::MAX as usize
                };

                #[inline]
                fn from_index(index: usize) -> Self {
                    debug_assert!(index <= Self::MAX_INDEX);
                    index as $t
                }
            }
        )*
    };
}

impl_order_index!(u8, u16, u32, u64, usize, i32, i64);
