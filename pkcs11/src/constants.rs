//! PKCS#11 attribute, object class and key type constants.
//!
//! Only the attributes a token object directory actually carries are
//! modelled. [`Attribute`] is a closed set; [`Attribute::from_id`] maps a raw
//! CKA_* value onto it through [`ATTRIBUTES`], and [`Attribute::role`] decides
//! how card data for that attribute is folded into an object.

pub const CKA_CLASS: u32 = 0x0000;
pub const CKA_TOKEN: u32 = 0x0001;
pub const CKA_PRIVATE: u32 = 0x0002;
pub const CKA_LABEL: u32 = 0x0003;
pub const CKA_VALUE: u32 = 0x0011;
pub const CKA_CERTIFICATE_TYPE: u32 = 0x0080;
pub const CKA_KEY_TYPE: u32 = 0x0100;
pub const CKA_SUBJECT: u32 = 0x0101;
pub const CKA_ID: u32 = 0x0102;
pub const CKA_SENSITIVE: u32 = 0x0103;
pub const CKA_ENCRYPT: u32 = 0x0104;
pub const CKA_DECRYPT: u32 = 0x0105;
pub const CKA_WRAP: u32 = 0x0106;
pub const CKA_UNWRAP: u32 = 0x0107;
pub const CKA_SIGN: u32 = 0x0108;
pub const CKA_SIGN_RECOVER: u32 = 0x0109;
pub const CKA_VERIFY: u32 = 0x010a;
pub const CKA_VERIFY_RECOVER: u32 = 0x010b;
pub const CKA_DERIVE: u32 = 0x010c;
pub const CKA_MODULUS: u32 = 0x0120;
pub const CKA_PUBLIC_EXPONENT: u32 = 0x0122;
pub const CKA_EXTRACTABLE: u32 = 0x0162;
pub const CKA_LOCAL: u32 = 0x0163;
pub const CKA_NEVER_EXTRACTABLE: u32 = 0x0164;
pub const CKA_ALWAYS_SENSITIVE: u32 = 0x0165;
pub const CKA_MODIFIABLE: u32 = 0x0170;
pub const CKA_EC_PARAMS: u32 = 0x0180;
pub const CKA_EC_POINT: u32 = 0x0181;

pub const CKO_DATA: u32 = 0;
pub const CKO_CERTIFICATE: u32 = 1;
pub const CKO_PUBLIC_KEY: u32 = 2;
pub const CKO_PRIVATE_KEY: u32 = 3;
pub const CKO_SECRET_KEY: u32 = 4;

pub const CKK_RSA: u32 = 0;
pub const CKK_EC: u32 = 3;

use crate::fixed::FixedFlag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Class,
    Token,
    Private,
    Label,
    Value,
    CertificateType,
    KeyType,
    Subject,
    Id,
    Sensitive,
    Encrypt,
    Decrypt,
    Wrap,
    Unwrap,
    Sign,
    SignRecover,
    Verify,
    VerifyRecover,
    Derive,
    Modulus,
    PublicExponent,
    Extractable,
    Local,
    NeverExtractable,
    AlwaysSensitive,
    Modifiable,
    EcParams,
    EcPoint,
}

/// Every known attribute, sorted by CKA_* value for binary search.
pub static ATTRIBUTES: [(u32, Attribute); 28] = [
    (CKA_CLASS, Attribute::Class),
    (CKA_TOKEN, Attribute::Token),
    (CKA_PRIVATE, Attribute::Private),
    (CKA_LABEL, Attribute::Label),
    (CKA_VALUE, Attribute::Value),
    (CKA_CERTIFICATE_TYPE, Attribute::CertificateType),
    (CKA_KEY_TYPE, Attribute::KeyType),
    (CKA_SUBJECT, Attribute::Subject),
    (CKA_ID, Attribute::Id),
    (CKA_SENSITIVE, Attribute::Sensitive),
    (CKA_ENCRYPT, Attribute::Encrypt),
    (CKA_DECRYPT, Attribute::Decrypt),
    (CKA_WRAP, Attribute::Wrap),
    (CKA_UNWRAP, Attribute::Unwrap),
    (CKA_SIGN, Attribute::Sign),
    (CKA_SIGN_RECOVER, Attribute::SignRecover),
    (CKA_VERIFY, Attribute::Verify),
    (CKA_VERIFY_RECOVER, Attribute::VerifyRecover),
    (CKA_DERIVE, Attribute::Derive),
    (CKA_MODULUS, Attribute::Modulus),
    (CKA_PUBLIC_EXPONENT, Attribute::PublicExponent),
    (CKA_EXTRACTABLE, Attribute::Extractable),
    (CKA_LOCAL, Attribute::Local),
    (CKA_NEVER_EXTRACTABLE, Attribute::NeverExtractable),
    (CKA_ALWAYS_SENSITIVE, Attribute::AlwaysSensitive),
    (CKA_MODIFIABLE, Attribute::Modifiable),
    (CKA_EC_PARAMS, Attribute::EcParams),
    (CKA_EC_POINT, Attribute::EcPoint),
];

/// How card data for an attribute is folded into an [`crate::ObjectSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Nonzero first payload byte sets the flag in the fixed attributes
    Flag(FixedFlag),
    /// 4-byte object class, stored in the fixed attributes
    Class,
    /// Kept verbatim as a String attribute
    RetainString,
    /// Kept as a 4-byte Integer attribute
    RetainInteger,
    /// Consumed and dropped
    Skip,
}

impl Attribute {
    pub fn from_id(id: u32) -> Option<Attribute> {
        ATTRIBUTES
            .binary_search_by_key(&id, |(id, _)| *id)
            .ok()
            .map(|i| ATTRIBUTES[i].1)
    }

    pub const fn id(self) -> u32 {
        match self {
            Attribute::Class => CKA_CLASS,
            Attribute::Token => CKA_TOKEN,
            Attribute::Private => CKA_PRIVATE,
            Attribute::Label => CKA_LABEL,
            Attribute::Value => CKA_VALUE,
            Attribute::CertificateType => CKA_CERTIFICATE_TYPE,
            Attribute::KeyType => CKA_KEY_TYPE,
            Attribute::Subject => CKA_SUBJECT,
            Attribute::Id => CKA_ID,
            Attribute::Sensitive => CKA_SENSITIVE,
            Attribute::Encrypt => CKA_ENCRYPT,
            Attribute::Decrypt => CKA_DECRYPT,
            Attribute::Wrap => CKA_WRAP,
            Attribute::Unwrap => CKA_UNWRAP,
            Attribute::Sign => CKA_SIGN,
            Attribute::SignRecover => CKA_SIGN_RECOVER,
            Attribute::Verify => CKA_VERIFY,
            Attribute::VerifyRecover => CKA_VERIFY_RECOVER,
            Attribute::Derive => CKA_DERIVE,
            Attribute::Modulus => CKA_MODULUS,
            Attribute::PublicExponent => CKA_PUBLIC_EXPONENT,
            Attribute::Extractable => CKA_EXTRACTABLE,
            Attribute::Local => CKA_LOCAL,
            Attribute::NeverExtractable => CKA_NEVER_EXTRACTABLE,
            Attribute::AlwaysSensitive => CKA_ALWAYS_SENSITIVE,
            Attribute::Modifiable => CKA_MODIFIABLE,
            Attribute::EcParams => CKA_EC_PARAMS,
            Attribute::EcPoint => CKA_EC_POINT,
        }
    }

    pub const fn role(self) -> Role {
        match self {
            Attribute::Token => Role::Flag(FixedFlag::Token),
            Attribute::Private => Role::Flag(FixedFlag::Private),
            Attribute::Modifiable => Role::Flag(FixedFlag::Modifiable),
            Attribute::Derive => Role::Flag(FixedFlag::Derive),
            Attribute::Local => Role::Flag(FixedFlag::Local),
            Attribute::Encrypt => Role::Flag(FixedFlag::Encrypt),
            Attribute::Decrypt => Role::Flag(FixedFlag::Decrypt),
            Attribute::Wrap => Role::Flag(FixedFlag::Wrap),
            Attribute::Unwrap => Role::Flag(FixedFlag::Unwrap),
            Attribute::Sign => Role::Flag(FixedFlag::Sign),
            Attribute::SignRecover => Role::Flag(FixedFlag::SignRecover),
            Attribute::Verify => Role::Flag(FixedFlag::Verify),
            Attribute::VerifyRecover => Role::Flag(FixedFlag::VerifyRecover),
            Attribute::Sensitive => Role::Flag(FixedFlag::Sensitive),
            Attribute::AlwaysSensitive => Role::Flag(FixedFlag::AlwaysSensitive),
            Attribute::Extractable => Role::Flag(FixedFlag::Extractable),
            Attribute::NeverExtractable => Role::Flag(FixedFlag::NeverExtractable),
            Attribute::Class => Role::Class,
            Attribute::Label | Attribute::EcParams | Attribute::EcPoint => Role::RetainString,
            Attribute::KeyType => Role::RetainInteger,
            Attribute::Subject
            | Attribute::Modulus
            | Attribute::Id
            | Attribute::PublicExponent
            | Attribute::CertificateType
            | Attribute::Value => Role::Skip,
        }
    }
}

/// Object class as stored in bits 4..=6 of the fixed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Data,
    Certificate,
    PublicKey,
    PrivateKey,
    SecretKey,
    Other(u8),
}

impl ObjectClass {
    /// The 3-bit value kept in the fixed attributes.
    pub fn bits(self) -> u8 {
        match self {
            ObjectClass::Data => CKO_DATA as u8,
            ObjectClass::Certificate => CKO_CERTIFICATE as u8,
            ObjectClass::PublicKey => CKO_PUBLIC_KEY as u8,
            ObjectClass::PrivateKey => CKO_PRIVATE_KEY as u8,
            ObjectClass::SecretKey => CKO_SECRET_KEY as u8,
            ObjectClass::Other(v) => v & 0x07,
        }
    }
}

impl From<u32> for ObjectClass {
    fn from(value: u32) -> Self {
        match value & 0x07 {
            CKO_DATA => ObjectClass::Data,
            CKO_CERTIFICATE => ObjectClass::Certificate,
            CKO_PUBLIC_KEY => ObjectClass::PublicKey,
            CKO_PRIVATE_KEY => ObjectClass::PrivateKey,
            CKO_SECRET_KEY => ObjectClass::SecretKey,
            other => ObjectClass::Other(other as u8),
        }
    }
}
