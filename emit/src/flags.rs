use std::ops::{BitOr, BitOrAssign};

/// Output dialect and verbosity options, combined as a bitmask. The
/// `*_VALUE` hints only select validation-rule key families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u32);

impl Flags {
    pub const NONE: Flags = Flags(0);
    /// Suppress indentation, used when embedding rendered text inline.
    pub const NO_INDENT: Flags = Flags(0x01);
    /// Emit `#line`-style source-position comments.
    pub const LINE_COMMENTS: Flags = Flags(0x02);
    /// Emit an XML DTD approximation instead of notation.
    pub const PRINT_XML_DTD: Flags = Flags(0x04);
    /// Append debug constraint explanations to each member.
    pub const PRINT_CONSTRAINTS: Flags = Flags(0x08);
    /// Append Information-Object table and specialization dumps.
    pub const PRINT_CLASS_MATRIX: Flags = Flags(0x10);
    /// Run the Protobuf schema-builder pipeline instead of notation.
    pub const PRINT_PROTOBUF: Flags = Flags(0x20);
    /// Bounds apply to a string value (`min_len`/`max_len`).
    pub const STRING_VALUE: Flags = Flags(0x40);
    /// Bounds apply to a bytes value (`min_bytes`/`max_bytes`).
    pub const BYTES_VALUE: Flags = Flags(0x80);
    /// Bounds apply to an int32 value (MAX renders as the int32 maximum).
    pub const INT32_VALUE: Flags = Flags(0x100);

    pub fn has(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}
