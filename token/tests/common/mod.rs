//! Hand-assembled token blobs, built byte by byte so the tests do not lean on
//! the encoder under test.

#![allow(dead_code)]

use pkcs11::{AttributeSpec, ObjectSpec};
use token::TokenObjectStore;

pub const CUID: [u8; 10] = [0x40, 0x90, 0x62, 0x12, 0x34, 0x56, 0x78, 0x9a, 0xbc, 0xde];

pub const TOKEN: u32 = 0x0000_0080;
pub const PRIVATE: u32 = 0x0000_0100;
pub const SIGN: u32 = 0x0001_0000;
pub const CLASS_CERTIFICATE: u32 = 1 << 4;
pub const CLASS_PUBLIC_KEY: u32 = 2 << 4;
pub const CLASS_PRIVATE_KEY: u32 = 3 << 4;

pub fn object_id(type_char: char, index_char: char) -> u32 {
    ((type_char as u32) << 24) | ((index_char as u32) << 16)
}

pub fn string_attr(attribute_id: u32, value: &[u8]) -> Vec<u8> {
    let mut out = attribute_id.to_be_bytes().to_vec();
    out.push(0);
    out.extend_from_slice(&(value.len() as u16).to_be_bytes());
    out.extend_from_slice(value);
    out
}

pub fn integer_attr(attribute_id: u32, value: u32) -> Vec<u8> {
    let mut out = attribute_id.to_be_bytes().to_vec();
    out.push(1);
    out.extend_from_slice(&value.to_be_bytes());
    out
}

pub fn bool_attr(attribute_id: u32, value: bool) -> Vec<u8> {
    let mut out = attribute_id.to_be_bytes().to_vec();
    out.push(if value { 3 } else { 2 });
    out
}

pub fn raw_attr(attribute_id: u32, tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = attribute_id.to_be_bytes().to_vec();
    out.push(tag);
    out.extend_from_slice(payload);
    out
}

pub fn object(id: u32, fixed: u32, attributes: &[Vec<u8>]) -> Vec<u8> {
    let mut out = id.to_be_bytes().to_vec();
    out.extend_from_slice(&fixed.to_be_bytes());
    out.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for attribute in attributes {
        out.extend_from_slice(attribute);
    }
    out
}

pub fn payload(token_name: &[u8], declared: u16, objects: &[Vec<u8>]) -> Vec<u8> {
    let mut out = ((token_name.len() + 5) as u16).to_be_bytes().to_vec();
    out.extend_from_slice(&declared.to_be_bytes());
    out.push(token_name.len() as u8);
    out.extend_from_slice(token_name);
    for object in objects {
        out.extend_from_slice(object);
    }
    out
}

/// Header at position 0 followed by `data`.
pub fn blob(compression: u16, data: &[u8]) -> Vec<u8> {
    blob_at(0, compression, data)
}

/// `prefix` filler bytes, the header, then `data`. The data offset is absolute.
pub fn blob_at(prefix: usize, compression: u16, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0xee; prefix];
    out.extend_from_slice(&[0x01, 0x00, 0x00, 0x05]);
    out.extend_from_slice(&CUID);
    out.extend_from_slice(&compression.to_be_bytes());
    out.extend_from_slice(&(data.len() as u16).to_be_bytes());
    out.extend_from_slice(&((prefix + 20) as u16).to_be_bytes());
    out.extend_from_slice(data);
    out
}

pub fn compressed_blob(data: &[u8]) -> Vec<u8> {
    blob(1, &fdeflate::compress_to_vec(data))
}

/// `(objectId, fixedAttributes, attributes sorted by id)` per object, sorted by id.
pub fn summary(store: &TokenObjectStore) -> Vec<(u32, u32, Vec<AttributeSpec>)> {
    let mut out: Vec<_> = store.objects().iter().map(object_summary).collect();
    out.sort_by_key(|(id, _, _)| *id);
    out
}

fn object_summary(spec: &ObjectSpec) -> (u32, u32, Vec<AttributeSpec>) {
    let mut attributes = spec.attributes().to_vec();
    attributes.sort_by_key(|a| a.attribute_id());
    (
        spec.object_id().raw(),
        spec.fixed_attributes().bits(),
        attributes,
    )
}

pub fn attr_ids(store: &TokenObjectStore) -> Vec<String> {
    store.objects().iter().map(ObjectSpec::attr_id).collect()
}
