//! Action descriptor records
//!
//! In-process form of the host's automation parameter record, plus the
//! big-endian binary layout hosts use when they hand a record over as a
//! blob. Only the value kinds this plug-in reads or writes are modelled;
//! other items are carried as raw bytes so a record with extra entries
//! still parses.

use super::error::HostError;
use crate::fourcc::FourCc;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// Descriptor layout version written by every current host
pub const DESCRIPTOR_VERSION: u32 = 16;

pub const TYPE_ENUM: FourCc = FourCc::new(b"enum");
pub const TYPE_BOOL: FourCc = FourCc::new(b"bool");
pub const TYPE_LONG: FourCc = FourCc::new(b"long");
pub const TYPE_ALIAS: FourCc = FourCc::new(b"alis");
const TYPE_DOUBLE: FourCc = FourCc::new(b"doub");
const TYPE_DOUBLE_ALT: FourCc = FourCc::new(b"Doub");
const TYPE_UNIT_FLOAT: FourCc = FourCc::new(b"UntF");
const TYPE_LARGE_INT: FourCc = FourCc::new(b"comp");
const TYPE_LARGE_INT_ALT: FourCc = FourCc::new(b"Comp");
const TYPE_TEXT: FourCc = FourCc::new(b"TEXT");
const TYPE_RAW_DATA: FourCc = FourCc::new(b"tdta");
const TYPE_CLASS: FourCc = FourCc::new(b"type");
const TYPE_GLOBAL_CLASS: FourCc = FourCc::new(b"GlbC");
const TYPE_OBJECT: FourCc = FourCc::new(b"Objc");
const TYPE_GLOBAL_OBJECT: FourCc = FourCc::new(b"GlbO");
const TYPE_LIST: FourCc = FourCc::new(b"VlLs");
const TYPE_REFERENCE: FourCc = FourCc::new(b"obj ");

/// Class id used for records this plug-in writes
pub const CLASS_EXR_OPTIONS: FourCc = FourCc::new(b"eXop");

/// Descriptor value types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorValue {
    Enum { type_id: FourCc, value: FourCc },
    Boolean(bool),
    Integer(i32),
    Alias(String),
    /// Any other value, payload kept verbatim
    Raw { type_id: FourCc, bytes: Vec<u8> },
}

impl DescriptorValue {
    /// Type id this value is tagged with on the wire
    pub fn type_id(&self) -> FourCc {
        match self {
            DescriptorValue::Enum { .. } => TYPE_ENUM,
            DescriptorValue::Boolean(_) => TYPE_BOOL,
            DescriptorValue::Integer(_) => TYPE_LONG,
            DescriptorValue::Alias(_) => TYPE_ALIAS,
            DescriptorValue::Raw { type_id, .. } => *type_id,
        }
    }
}

/// Ordered key/value record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionDescriptor {
    pub class_id: FourCc,
    items: Vec<(FourCc, DescriptorValue)>,
    /// Items keyed by a string id instead of a four-character code
    named: Vec<(String, DescriptorValue)>,
}

impl ActionDescriptor {
    pub fn new(class_id: FourCc) -> Self {
        Self {
            class_id,
            items: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Append an item. Keys keep insertion order; a repeated key replaces
    /// the earlier value in place.
    pub fn put(&mut self, key: FourCc, value: DescriptorValue) {
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.items.push((key, value)),
        }
    }

    pub fn with(mut self, key: FourCc, value: DescriptorValue) -> Self {
        self.put(key, value);
        self
    }

    /// Same as [`put`](Self::put) for a string id
    pub fn put_named(&mut self, name: &str, value: DescriptorValue) {
        match self.named.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.named.push((name.to_owned(), value)),
        }
    }

    pub fn with_named(mut self, name: &str, value: DescriptorValue) -> Self {
        self.put_named(name, value);
        self
    }

    pub fn get(&self, key: FourCc) -> Option<&DescriptorValue> {
        self.items.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_named(&self, name: &str) -> Option<&DescriptorValue> {
        self.named.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = FourCc> + '_ {
        self.items.iter().map(|(k, _)| *k)
    }

    /// Items with four-character keys, the only ones the plug-in reads
    pub fn items(&self) -> &[(FourCc, DescriptorValue)] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.named.is_empty()
    }

    /// Parse a serialized record
    pub fn parse(data: &[u8]) -> Result<Self, HostError> {
        let mut cursor = Cursor::new(data);
        let descriptor = parse_descriptor(&mut cursor)?;
        if (cursor.position() as usize) != data.len() {
            tracing::warn!(
                "Descriptor has {} trailing bytes",
                data.len() - cursor.position() as usize
            );
        }
        Ok(descriptor)
    }

    /// Serialize using the host layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_descriptor(&mut buf, self);
        buf
    }
}

/// Item key: a four-character code, or a string id for longer names
enum ItemKey {
    Code(FourCc),
    Name(String),
}

/// A zero length prefix means a 4-byte code follows; otherwise the key is
/// `len` bytes of text. Four bytes of text are the same as a code.
fn read_key(cursor: &mut Cursor<&[u8]>) -> Result<ItemKey, HostError> {
    let len = cursor.read_u32::<BigEndian>()? as usize;
    if len == 0 {
        return read_type(cursor).map(ItemKey::Code);
    }

    ensure_remaining(cursor, len)?;
    let mut key = vec![0u8; len];
    cursor.read_exact(&mut key)?;
    match <[u8; 4]>::try_from(key.as_slice()) {
        Ok(code) => Ok(ItemKey::Code(FourCc::new(&code))),
        Err(_) => Ok(ItemKey::Name(String::from_utf8_lossy(&key).into_owned())),
    }
}

fn read_type(cursor: &mut Cursor<&[u8]>) -> Result<FourCc, HostError> {
    let mut code = [0u8; 4];
    cursor.read_exact(&mut code)?;
    Ok(FourCc::new(&code))
}

fn ensure_remaining(cursor: &Cursor<&[u8]>, len: usize) -> Result<(), HostError> {
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(HostError::BAD_PARAMETER);
    }
    Ok(())
}

fn skip(cursor: &mut Cursor<&[u8]>, len: usize) -> Result<(), HostError> {
    ensure_remaining(cursor, len)?;
    cursor.set_position(cursor.position() + len as u64);
    Ok(())
}

/// UCS-2 string with a character count prefix
fn read_unicode_string(cursor: &mut Cursor<&[u8]>) -> Result<String, HostError> {
    let len = cursor.read_u32::<BigEndian>()?;
    let mut utf16 = Vec::with_capacity(len.min(1024) as usize);
    for _ in 0..len {
        utf16.push(cursor.read_u16::<BigEndian>()?);
    }
    if let Some(&0) = utf16.last() {
        utf16.pop();
    }
    String::from_utf16(&utf16).map_err(|_| HostError::BAD_PARAMETER)
}

fn parse_descriptor(cursor: &mut Cursor<&[u8]>) -> Result<ActionDescriptor, HostError> {
    let version = cursor.read_u32::<BigEndian>()?;
    if version != DESCRIPTOR_VERSION {
        tracing::debug!("Unknown descriptor version: {}", version);
        return Err(HostError::BAD_PARAMETER);
    }

    let _name = read_unicode_string(cursor)?;
    let class_id = match read_key(cursor)? {
        ItemKey::Code(code) => code,
        ItemKey::Name(name) => {
            tracing::debug!("Descriptor class is a string id {:?}", name);
            FourCc::NULL
        }
    };

    let count = cursor.read_u32::<BigEndian>()?;
    let mut descriptor = ActionDescriptor::new(class_id);

    for _ in 0..count {
        let key = read_key(cursor)?;
        let value_type = read_type(cursor)?;
        let value = parse_value(cursor, value_type)?;
        match key {
            ItemKey::Code(code) => descriptor.put(code, value),
            ItemKey::Name(name) => descriptor.put_named(&name, value),
        }
    }

    Ok(descriptor)
}

fn parse_value(cursor: &mut Cursor<&[u8]>, value_type: FourCc) -> Result<DescriptorValue, HostError> {
    let start = cursor.position() as usize;

    match value_type {
        TYPE_ENUM => {
            if let (ItemKey::Code(type_id), ItemKey::Code(value)) =
                (read_key(cursor)?, read_key(cursor)?)
            {
                return Ok(DescriptorValue::Enum { type_id, value });
            }
        }
        TYPE_BOOL => return Ok(DescriptorValue::Boolean(cursor.read_u8()? != 0)),
        TYPE_LONG => return Ok(DescriptorValue::Integer(cursor.read_i32::<BigEndian>()?)),
        TYPE_ALIAS => {
            let len = cursor.read_u32::<BigEndian>()? as usize;
            ensure_remaining(cursor, len)?;
            let mut data = vec![0u8; len];
            cursor.read_exact(&mut data)?;
            return String::from_utf8(data)
                .map(DescriptorValue::Alias)
                .map_err(|_| HostError::BAD_PARAMETER);
        }
        other => skip_value(cursor, other)?,
    }

    // Enums with string ids land here too.
    let end = cursor.position() as usize;
    Ok(DescriptorValue::Raw {
        type_id: value_type,
        bytes: cursor.get_ref()[start..end].to_vec(),
    })
}

/// Step over a value the plug-in does not model. Only a type whose size
/// cannot be known is an error.
fn skip_value(cursor: &mut Cursor<&[u8]>, value_type: FourCc) -> Result<(), HostError> {
    match value_type {
        TYPE_BOOL => skip(cursor, 1),
        TYPE_LONG => skip(cursor, 4),
        TYPE_DOUBLE | TYPE_DOUBLE_ALT | TYPE_LARGE_INT | TYPE_LARGE_INT_ALT => skip(cursor, 8),
        TYPE_UNIT_FLOAT => skip(cursor, 12),
        TYPE_TEXT => read_unicode_string(cursor).map(|_| ()),
        TYPE_ALIAS | TYPE_RAW_DATA => {
            let len = cursor.read_u32::<BigEndian>()? as usize;
            skip(cursor, len)
        }
        TYPE_ENUM => {
            read_key(cursor)?;
            read_key(cursor).map(|_| ())
        }
        TYPE_CLASS | TYPE_GLOBAL_CLASS => {
            read_unicode_string(cursor)?;
            read_key(cursor).map(|_| ())
        }
        TYPE_OBJECT | TYPE_GLOBAL_OBJECT => {
            // Nested descriptor, no version field
            read_unicode_string(cursor)?;
            read_key(cursor)?;
            let count = cursor.read_u32::<BigEndian>()?;
            for _ in 0..count {
                read_key(cursor)?;
                let item_type = read_type(cursor)?;
                skip_value(cursor, item_type)?;
            }
            Ok(())
        }
        TYPE_LIST => {
            let count = cursor.read_u32::<BigEndian>()?;
            for _ in 0..count {
                let item_type = read_type(cursor)?;
                skip_value(cursor, item_type)?;
            }
            Ok(())
        }
        TYPE_REFERENCE => skip_reference(cursor),
        other => {
            tracing::debug!("Unknown descriptor value type: {}", other);
            Err(HostError::BAD_PARAMETER)
        }
    }
}

fn skip_reference(cursor: &mut Cursor<&[u8]>) -> Result<(), HostError> {
    let count = cursor.read_u32::<BigEndian>()?;
    for _ in 0..count {
        let form = read_type(cursor)?;
        match &form.to_bytes() {
            b"Idnt" | b"indx" => skip(cursor, 4)?,
            b"Clss" => {
                read_unicode_string(cursor)?;
                read_key(cursor)?;
            }
            b"prop" => {
                read_unicode_string(cursor)?;
                read_key(cursor)?;
                read_key(cursor)?;
            }
            b"Enmr" => {
                read_unicode_string(cursor)?;
                read_key(cursor)?;
                read_key(cursor)?;
                read_key(cursor)?;
            }
            b"rele" => {
                read_unicode_string(cursor)?;
                read_key(cursor)?;
                skip(cursor, 4)?;
            }
            b"name" => {
                read_unicode_string(cursor)?;
                read_key(cursor)?;
                read_unicode_string(cursor)?;
            }
            _ => {
                tracing::debug!("Unknown reference form: {}", form);
                return Err(HostError::BAD_PARAMETER);
            }
        }
    }
    Ok(())
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn write_key(buf: &mut Vec<u8>, key: FourCc) {
    write_u32(buf, 0);
    buf.extend_from_slice(&key.to_bytes());
}

fn write_name_key(buf: &mut Vec<u8>, name: &str) {
    write_u32(buf, name.len() as u32);
    buf.extend_from_slice(name.as_bytes());
}

fn write_value(buf: &mut Vec<u8>, value: &DescriptorValue) {
    buf.extend_from_slice(&value.type_id().to_bytes());
    match value {
        DescriptorValue::Enum { type_id, value } => {
            write_key(buf, *type_id);
            write_key(buf, *value);
        }
        DescriptorValue::Boolean(b) => buf.push(u8::from(*b)),
        DescriptorValue::Integer(i) => buf.extend_from_slice(&i.to_be_bytes()),
        DescriptorValue::Alias(path) => {
            write_u32(buf, path.len() as u32);
            buf.extend_from_slice(path.as_bytes());
        }
        DescriptorValue::Raw { bytes, .. } => buf.extend_from_slice(bytes),
    }
}

fn write_descriptor(buf: &mut Vec<u8>, descriptor: &ActionDescriptor) {
    write_u32(buf, DESCRIPTOR_VERSION);
    // Empty name: just the terminator
    write_u32(buf, 1);
    buf.extend_from_slice(&[0, 0]);
    write_key(buf, descriptor.class_id);
    write_u32(buf, descriptor.len() as u32);

    for (key, value) in &descriptor.items {
        write_key(buf, *key);
        write_value(buf, value);
    }
    for (name, value) in &descriptor.named {
        write_name_key(buf, name);
        write_value(buf, value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> ActionDescriptor {
        ActionDescriptor::new(CLASS_EXR_OPTIONS)
            .with(FourCc::new(b"In  "), DescriptorValue::Alias("C:\\out.exr".into()))
            .with(
                FourCc::new(b"eXcm"),
                DescriptorValue::Enum {
                    type_id: FourCc::new(b"eXct"),
                    value: FourCc::new(b"eXc8"),
                },
            )
            .with(FourCc::new(b"eXfl"), DescriptorValue::Boolean(true))
            .with(FourCc::new(b"cnt "), DescriptorValue::Integer(-3))
    }

    #[test]
    fn test_binary_layout_header() {
        let bytes = ActionDescriptor::new(CLASS_EXR_OPTIONS).to_bytes();
        assert_eq!(&bytes[0..4], &16u32.to_be_bytes());
        // name length 1, terminator
        assert_eq!(&bytes[4..8], &1u32.to_be_bytes());
        assert_eq!(&bytes[8..10], &[0, 0]);
        // short key form
        assert_eq!(&bytes[10..14], &0u32.to_be_bytes());
        assert_eq!(&bytes[14..18], b"eXop");
        assert_eq!(&bytes[18..22], &0u32.to_be_bytes());
        assert_eq!(bytes.len(), 22);
    }

    #[test]
    fn test_parse_preserves_order_and_values() {
        let original = sample();
        let parsed = ActionDescriptor::parse(&original.to_bytes()).unwrap();
        assert_eq!(parsed, original);
        let keys: Vec<_> = parsed.keys().collect();
        assert_eq!(keys[0], FourCc::new(b"In  "));
        assert_eq!(keys[3], FourCc::new(b"cnt "));
    }

    #[test]
    fn test_put_replaces_existing_key() {
        let mut d = ActionDescriptor::new(CLASS_EXR_OPTIONS);
        d.put(FourCc::new(b"eXfl"), DescriptorValue::Boolean(true));
        d.put(FourCc::new(b"eXhd"), DescriptorValue::Boolean(true));
        d.put(FourCc::new(b"eXfl"), DescriptorValue::Boolean(false));
        assert_eq!(d.len(), 2);
        assert_eq!(
            d.get(FourCc::new(b"eXfl")),
            Some(&DescriptorValue::Boolean(false))
        );
    }

    fn push_code_key(bytes: &mut Vec<u8>, code: &[u8; 4]) {
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(code);
    }

    /// Header of a record with `count` items, no items yet
    fn record_header(count: u32) -> Vec<u8> {
        let mut bytes = ActionDescriptor::new(CLASS_EXR_OPTIONS).to_bytes();
        let count_at = bytes.len() - 4;
        bytes[count_at..].copy_from_slice(&count.to_be_bytes());
        bytes
    }

    #[test]
    fn test_unmodelled_types_are_kept_raw() {
        let mut bytes = record_header(3);
        push_code_key(&mut bytes, b"Xdbl");
        bytes.extend_from_slice(b"doub");
        bytes.extend_from_slice(&1.5f64.to_be_bytes());
        push_code_key(&mut bytes, b"Xtxt");
        bytes.extend_from_slice(b"TEXT");
        bytes.extend_from_slice(&3u32.to_be_bytes());
        bytes.extend_from_slice(&[0, b'h', 0, b'i', 0, 0]);
        push_code_key(&mut bytes, b"eXfl");
        bytes.extend_from_slice(b"bool");
        bytes.push(1);

        let parsed = ActionDescriptor::parse(&bytes).unwrap();

        assert_eq!(parsed.len(), 3);
        assert_eq!(
            parsed.get(FourCc::new(b"Xdbl")),
            Some(&DescriptorValue::Raw {
                type_id: FourCc::new(b"doub"),
                bytes: 1.5f64.to_be_bytes().to_vec(),
            })
        );
        assert_eq!(
            parsed.get(FourCc::new(b"eXfl")),
            Some(&DescriptorValue::Boolean(true))
        );
        // raw payloads are written back unchanged
        assert_eq!(parsed.to_bytes(), bytes);
    }

    #[test]
    fn test_string_keys_are_kept_aside() {
        let mut bytes = record_header(2);
        bytes.extend_from_slice(&12u32.to_be_bytes());
        bytes.extend_from_slice(b"someStringID");
        bytes.extend_from_slice(b"bool");
        bytes.push(1);
        push_code_key(&mut bytes, b"eXhd");
        bytes.extend_from_slice(b"bool");
        bytes.push(1);

        let parsed = ActionDescriptor::parse(&bytes).unwrap();

        assert_eq!(parsed.items().len(), 1);
        assert_eq!(
            parsed.get_named("someStringID"),
            Some(&DescriptorValue::Boolean(true))
        );
        assert_eq!(
            parsed.get(FourCc::new(b"eXhd")),
            Some(&DescriptorValue::Boolean(true))
        );
        let reparsed = ActionDescriptor::parse(&parsed.to_bytes()).unwrap();
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn test_nested_object_and_list_are_skipped() {
        let mut bytes = record_header(2);
        push_code_key(&mut bytes, b"Xobj");
        bytes.extend_from_slice(b"Objc");
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0]);
        push_code_key(&mut bytes, b"Clr ");
        bytes.extend_from_slice(&1u32.to_be_bytes());
        push_code_key(&mut bytes, b"Rd  ");
        bytes.extend_from_slice(b"VlLs");
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(b"long");
        bytes.extend_from_slice(&7i32.to_be_bytes());
        bytes.extend_from_slice(b"UntF");
        bytes.extend_from_slice(b"#Prc");
        bytes.extend_from_slice(&50.0f64.to_be_bytes());
        push_code_key(&mut bytes, b"eXfl");
        bytes.extend_from_slice(b"bool");
        bytes.push(0);

        let parsed = ActionDescriptor::parse(&bytes).unwrap();

        assert_eq!(parsed.get(FourCc::new(b"Xobj")).unwrap().type_id(), FourCc::new(b"Objc"));
        assert_eq!(
            parsed.get(FourCc::new(b"eXfl")),
            Some(&DescriptorValue::Boolean(false))
        );
    }

    #[test]
    fn test_unsizable_value_type_is_rejected() {
        let mut bytes = record_header(1);
        push_code_key(&mut bytes, b"eXfl");
        bytes.extend_from_slice(b"zzzz");
        bytes.extend_from_slice(&[1, 2, 3, 4]);

        assert_eq!(
            ActionDescriptor::parse(&bytes),
            Err(HostError::BAD_PARAMETER)
        );
    }

    #[test]
    fn test_oversized_key_length_is_rejected() {
        let mut bytes = record_header(1);
        bytes.extend_from_slice(&u32::MAX.to_be_bytes());
        bytes.extend_from_slice(b"bool");

        assert_eq!(
            ActionDescriptor::parse(&bytes),
            Err(HostError::BAD_PARAMETER)
        );
    }

    #[test]
    fn test_bad_version_and_truncation() {
        let mut bytes = sample().to_bytes();
        assert_eq!(
            ActionDescriptor::parse(&bytes[..bytes.len() - 2]),
            Err(HostError::BAD_PARAMETER)
        );
        bytes[3] = 15;
        assert_eq!(
            ActionDescriptor::parse(&bytes),
            Err(HostError::BAD_PARAMETER)
        );
    }
}
