//! The 32-bit fixed-attribute word of an object.

use crate::constants::ObjectClass;

/*
Fixed attribute layout

  bits  0..=3   container index
  bits  4..=6   object class (CKO_*)
  bits  7..=23  boolean capability flags, one bit per [`FixedFlag`]
  bits 24..=31  unused
*/

const CONTAINER_MASK: u32 = 0x0000_000f;
const CLASS_SHIFT: u32 = 4;
const CLASS_MASK: u32 = 0x0000_0070;

/// Boolean capability flags, discriminant is the bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FixedFlag {
    Token = 7,
    Private = 8,
    Modifiable = 9,
    Derive = 10,
    Local = 11,
    Encrypt = 12,
    Decrypt = 13,
    Wrap = 14,
    Unwrap = 15,
    Sign = 16,
    SignRecover = 17,
    Verify = 18,
    VerifyRecover = 19,
    Sensitive = 20,
    AlwaysSensitive = 21,
    Extractable = 22,
    NeverExtractable = 23,
}

impl FixedFlag {
    pub const ALL: [FixedFlag; 17] = [
        FixedFlag::Token,
        FixedFlag::Private,
        FixedFlag::Modifiable,
        FixedFlag::Derive,
        FixedFlag::Local,
        FixedFlag::Encrypt,
        FixedFlag::Decrypt,
        FixedFlag::Wrap,
        FixedFlag::Unwrap,
        FixedFlag::Sign,
        FixedFlag::SignRecover,
        FixedFlag::Verify,
        FixedFlag::VerifyRecover,
        FixedFlag::Sensitive,
        FixedFlag::AlwaysSensitive,
        FixedFlag::Extractable,
        FixedFlag::NeverExtractable,
    ];

    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FixedAttributes(u32);

impl FixedAttributes {
    pub const fn from_bits(bits: u32) -> Self {
        FixedAttributes(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, flag: FixedFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn insert(&mut self, flag: FixedFlag) {
        self.0 |= flag.bit();
    }

    #[must_use]
    pub const fn with(self, flag: FixedFlag) -> Self {
        FixedAttributes(self.0 | flag.bit())
    }

    pub fn flags(self) -> impl Iterator<Item = FixedFlag> {
        FixedFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }

    pub fn object_class(self) -> ObjectClass {
        ObjectClass::from((self.0 & CLASS_MASK) >> CLASS_SHIFT)
    }

    pub fn set_object_class(&mut self, class: ObjectClass) {
        self.0 = (self.0 & !CLASS_MASK) | (u32::from(class.bits()) << CLASS_SHIFT);
    }

    /// Container index as stored on the wire. Only the low four bits survive.
    pub const fn container(self) -> u8 {
        (self.0 & CONTAINER_MASK) as u8
    }

    pub fn set_container(&mut self, index: u32) {
        self.0 = (self.0 & !CONTAINER_MASK) | (index & CONTAINER_MASK);
    }
}

impl From<u32> for FixedAttributes {
    fn from(bits: u32) -> Self {
        FixedAttributes(bits)
    }
}

impl From<FixedAttributes> for u32 {
    fn from(fixed: FixedAttributes) -> Self {
        fixed.0
    }
}
