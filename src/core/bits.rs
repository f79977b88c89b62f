//! Packed bit groups
//!
//! Several record fields share one storage word, the way the consumer declares
//! them as C bit-fields. Each such word is modelled as a `#[repr(transparent)]`
//! value type generated by [`bit_group!`], with one getter and one `set_*`
//! setter per logical field. The raw word never leaves the type.
//!
//! Bits are allocated from the least-significant end of the word, in
//! declaration order. Setters truncate the value to the field width.

/// One logical field inside a packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    pub name: &'static str,
    pub shift: u32,
    pub width: u32,
}

impl BitField {
    /// Mask of the field, already shifted into place.
    pub const fn mask(&self) -> u64 {
        low_mask(self.width) << self.shift
    }
}

/// Values that can be stored in a bit field.
pub trait BitValue: Copy {
    fn into_bits(self) -> u64;
    fn from_bits(bits: u64) -> Self;
}

impl BitValue for bool {
    #[inline]
    fn into_bits(self) -> u64 {
        self as u64
    }

    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits != 0
    }
}

macro_rules! impl_bit_value {
    ($($ty:ty),*) => {
        $(
            impl BitValue for $ty {
                #[inline]
                fn into_bits(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn from_bits(bits: u64) -> Self {
                    bits as $ty
                }
            }
        )*
    };
}

impl_bit_value!(u8, u16, u32);

#[inline]
const fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Read `width` bits starting at `shift`.
#[inline]
pub const fn extract(word: u64, shift: u32, width: u32) -> u64 {
    (word >> shift) & low_mask(width)
}

/// Replace `width` bits starting at `shift` with the low bits of `value`.
#[inline]
pub const fn insert(word: u64, shift: u32, width: u32, value: u64) -> u64 {
    let mask = low_mask(width) << shift;
    (word & !mask) | ((value << shift) & mask)
}

/// Compile-time layout check: fields are contiguous from bit 0, in order, and
/// together with the spare bits they fill the storage word exactly.
pub const fn assert_layout(storage_bits: u32, spare: u32, fields: &[BitField]) {
    let mut next = 0;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].width == 0 {
            panic!("bit field has zero width");
        }
        if fields[i].shift != next {
            panic!("bit fields are not contiguous");
        }
        next += fields[i].width;
        i += 1;
    }
    if next + spare != storage_bits {
        panic!("bit group does not fill its storage word");
    }
}

/// Declares a packed bit group.
///
/// ```ignore
/// bit_group! {
///     /// doc
///     pub struct Example(u32, spare = 4) {
///         /// doc
///         kind, set_kind: u8 = 0, 4;
///         flag, set_flag: bool = 4, 1;
///         ...
///     }
/// }
/// ```
macro_rules! bit_group {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($word:ty $(, spare = $spare:literal)?) {
            $(
                $(#[$fmeta:meta])*
                $get:ident, $set:ident: $ty:ty = $shift:literal, $width:literal;
            )*
        }
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
        pub struct $name($word);

        impl $name {
            /// Name, bit offset and width of every logical field, in storage order.
            pub const FIELDS: &'static [$crate::core::bits::BitField] = &[
                $(
                    $crate::core::bits::BitField {
                        name: stringify!($get),
                        shift: $shift,
                        width: $width,
                    },
                )*
            ];

            /// Number of unused high bits in the storage word.
            pub const SPARE_BITS: u32 = 0 $(+ $spare)?;

            $(
                $(#[$fmeta])*
                #[inline]
                pub fn $get(&self) -> $ty {
                    <$ty as $crate::core::bits::BitValue>::from_bits(
                        $crate::core::bits::extract(self.0 as u64, $shift, $width),
                    )
                }

                #[inline]
                pub fn $set(&mut self, value: $ty) {
                    self.0 = $crate::core::bits::insert(
                        self.0 as u64,
                        $shift,
                        $width,
                        <$ty as $crate::core::bits::BitValue>::into_bits(value),
                    ) as $word;
                }
            )*

            /// Sets every field to its maximum value one at a time on a zeroed
            /// group and reports (field, resulting word, value read back).
            #[cfg(test)]
            pub(crate) fn probe_fields() -> Vec<(&'static str, u64, u64)> {
                vec![
                    $({
                        let mut group = Self::default();
                        group.$set(<$ty as $crate::core::bits::BitValue>::from_bits(u64::MAX));
                        (
                            stringify!($get),
                            group.0 as u64,
                            <$ty as $crate::core::bits::BitValue>::into_bits(group.$get()),
                        )
                    },)*
                ]
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($get), &self.$get()))*
                    .finish()
            }
        }

        const _: () = $crate::core::bits::assert_layout(
            <$word>::BITS,
            $name::SPARE_BITS,
            $name::FIELDS,
        );
    };
}

pub(crate) use bit_group;

/// Checks the output of a generated `probe_fields` against its `FIELDS` table:
/// every field must own exactly its declared bits and read back its maximum.
#[cfg(test)]
pub(crate) fn assert_fields_isolated(fields: &[BitField], probes: &[(&'static str, u64, u64)]) {
    assert_eq!(fields.len(), probes.len());
    for (field, (name, word, readback)) in fields.iter().zip(probes) {
        assert_eq!(field.name, *name);
        assert_eq!(
            *word,
            field.mask(),
            "{} should occupy bits {}..{}",
            field.name,
            field.shift,
            field.shift + field.width
        );
        assert_eq!(*readback, low_mask(field.width), "{} read back", field.name);
    }
}
