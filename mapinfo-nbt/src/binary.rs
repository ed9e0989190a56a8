//! Binary NBT codec
//!
//! # Layout
//!
//! ```text
//! named tag := kind:u8 name:string payload     (kind 0 has no name/payload)
//! string    := len:u16 utf8[len]
//! list      := elem_kind:u8 len:i32 payload[len]
//! compound  := named tag* 0x00
//! arrays    := len:i32 elem[len]                (i8, i32 or i64 elements)
//! ```
//!
//! Bedrock stores every multi-byte value little-endian, Java big-endian.
//! Files may additionally be gzip-compressed.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::compound::CompoundTag;
use crate::error::{Error, Result};
use crate::reader::BinaryReader;
use crate::tag::{Tag, TagKind};
use crate::writer::BinaryWriter;

/// Default nesting limit, matching the game's own decoder
pub const DEFAULT_MAX_DEPTH: usize = 512;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Flavor {
    /// Bedrock Edition (level data, item user data)
    #[default]
    LittleEndian,
    /// Java Edition
    BigEndian,
}

/// A root compound together with its (usually empty) name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamedCompound {
    pub name: String,
    pub compound: CompoundTag,
}

/// Inflate gzip input, pass anything else through untouched
pub fn decompress_if_gzip(data: &[u8]) -> Result<std::borrow::Cow<'_, [u8]>> {
    if data.starts_with(&GZIP_MAGIC) {
        let mut decoder = GzDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(std::borrow::Cow::Owned(out))
    } else {
        Ok(std::borrow::Cow::Borrowed(data))
    }
}

/// Decode a complete root compound. Trailing bytes are rejected.
pub fn read_root(data: &[u8], flavor: Flavor) -> Result<NamedCompound> {
    read_root_with_depth(data, flavor, DEFAULT_MAX_DEPTH)
}

pub fn read_root_with_depth(data: &[u8], flavor: Flavor, max_depth: usize) -> Result<NamedCompound> {
    let data = decompress_if_gzip(data)?;
    let mut reader = NbtReader::new(&data, flavor, max_depth);
    let root = reader.read_root()?;
    let trailing = reader.inner.remaining();
    if trailing > 0 {
        return Err(Error::TrailingData(trailing));
    }
    Ok(root)
}

pub fn write_root(root: &NamedCompound, flavor: Flavor) -> Result<Vec<u8>> {
    let mut writer = NbtWriter::new(flavor);
    writer.write_named(&root.name, TagKind::Compound)?;
    writer.write_compound(&root.compound)?;
    Ok(writer.inner.into_vec())
}

struct NbtReader<'a> {
    inner: BinaryReader<'a>,
    flavor: Flavor,
    max_depth: usize,
    depth: usize,
}

impl<'a> NbtReader<'a> {
    fn new(data: &'a [u8], flavor: Flavor, max_depth: usize) -> Self {
        Self {
            inner: BinaryReader::new(data),
            flavor,
            max_depth,
            depth: 0,
        }
    }

    fn read_i16(&mut self) -> Result<i16> {
        match self.flavor {
            Flavor::LittleEndian => self.inner.read_i16_le(),
            Flavor::BigEndian => self.inner.read_i16_be(),
        }
    }

    fn read_u16(&mut self) -> Result<u16> {
        match self.flavor {
            Flavor::LittleEndian => self.inner.read_u16_le(),
            Flavor::BigEndian => self.inner.read_u16_be(),
        }
    }

    fn read_i32(&mut self) -> Result<i32> {
        match self.flavor {
            Flavor::LittleEndian => self.inner.read_i32_le(),
            Flavor::BigEndian => self.inner.read_i32_be(),
        }
    }

    fn read_i64(&mut self) -> Result<i64> {
        match self.flavor {
            Flavor::LittleEndian => self.inner.read_i64_le(),
            Flavor::BigEndian => self.inner.read_i64_be(),
        }
    }

    fn read_f32(&mut self) -> Result<f32> {
        match self.flavor {
            Flavor::LittleEndian => self.inner.read_f32_le(),
            Flavor::BigEndian => self.inner.read_f32_be(),
        }
    }

    fn read_f64(&mut self) -> Result<f64> {
        match self.flavor {
            Flavor::LittleEndian => self.inner.read_f64_le(),
            Flavor::BigEndian => self.inner.read_f64_be(),
        }
    }

    fn read_kind(&mut self) -> Result<TagKind> {
        let v = self.inner.read_u8()?;
        TagKind::from_u8(v).ok_or(Error::InvalidTagKind(v))
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        self.inner.read_string_with_len(len)
    }

    fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(Error::NegativeLength(len));
        }
        let len = len as usize;
        // Every element takes at least one byte, so a length past the end
        // of input is truncated data rather than a huge allocation.
        if len > self.inner.remaining() {
            return Err(Error::UnexpectedEof);
        }
        Ok(len)
    }

    fn read_root(&mut self) -> Result<NamedCompound> {
        let kind = self.read_kind()?;
        if kind != TagKind::Compound {
            return Err(Error::RootNotCompound(kind));
        }
        let name = self.read_string()?;
        let compound = self.read_compound()?;
        Ok(NamedCompound { name, compound })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::DepthLimit { max: self.max_depth });
        }
        Ok(())
    }

    fn read_compound(&mut self) -> Result<CompoundTag> {
        self.enter()?;
        let mut compound = CompoundTag::new();
        loop {
            let kind = self.read_kind()?;
            if kind == TagKind::End {
                break;
            }
            let name = self.read_string()?;
            let tag = self.read_payload(kind)?;
            compound.insert(name, tag);
        }
        self.depth -= 1;
        Ok(compound)
    }

    fn read_payload(&mut self, kind: TagKind) -> Result<Tag> {
        Ok(match kind {
            TagKind::End => return Err(Error::InvalidTagKind(0)),
            TagKind::Byte => Tag::Byte(self.inner.read_i8()?),
            TagKind::Short => Tag::Short(self.read_i16()?),
            TagKind::Int => Tag::Int(self.read_i32()?),
            TagKind::Long => Tag::Long(self.read_i64()?),
            TagKind::Float => Tag::Float(self.read_f32()?),
            TagKind::Double => Tag::Double(self.read_f64()?),
            TagKind::ByteArray => {
                let len = self.read_len()?;
                let bytes = self.inner.read_bytes(len)?;
                Tag::ByteArray(bytes.iter().map(|&b| b as i8).collect())
            }
            TagKind::String => Tag::String(self.read_string()?),
            TagKind::List => {
                let elem = self.read_kind()?;
                let len = self.read_len()?;
                if elem == TagKind::End && len > 0 {
                    return Err(Error::InvalidTagKind(0));
                }
                self.enter()?;
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.read_payload(elem)?);
                }
                self.depth -= 1;
                Tag::List(items)
            }
            TagKind::Compound => Tag::Compound(self.read_compound()?),
            TagKind::IntArray => {
                let len = self.read_len()?;
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(self.read_i32()?);
                }
                Tag::IntArray(values)
            }
            TagKind::LongArray => {
                let len = self.read_len()?;
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(self.read_i64()?);
                }
                Tag::LongArray(values)
            }
        })
    }
}

struct NbtWriter {
    inner: BinaryWriter,
    flavor: Flavor,
}

impl NbtWriter {
    fn new(flavor: Flavor) -> Self {
        Self {
            inner: BinaryWriter::new(),
            flavor,
        }
    }

    fn write_u16(&mut self, v: u16) {
        match self.flavor {
            Flavor::LittleEndian => self.inner.write_u16_le(v),
            Flavor::BigEndian => self.inner.write_u16_be(v),
        }
    }

    fn write_i16(&mut self, v: i16) {
        match self.flavor {
            Flavor::LittleEndian => self.inner.write_i16_le(v),
            Flavor::BigEndian => self.inner.write_i16_be(v),
        }
    }

    fn write_i32(&mut self, v: i32) {
        match self.flavor {
            Flavor::LittleEndian => self.inner.write_i32_le(v),
            Flavor::BigEndian => self.inner.write_i32_be(v),
        }
    }

    fn write_i64(&mut self, v: i64) {
        match self.flavor {
            Flavor::LittleEndian => self.inner.write_i64_le(v),
            Flavor::BigEndian => self.inner.write_i64_be(v),
        }
    }

    fn write_f32(&mut self, v: f32) {
        match self.flavor {
            Flavor::LittleEndian => self.inner.write_f32_le(v),
            Flavor::BigEndian => self.inner.write_f32_be(v),
        }
    }

    fn write_f64(&mut self, v: f64) {
        match self.flavor {
            Flavor::LittleEndian => self.inner.write_f64_le(v),
            Flavor::BigEndian => self.inner.write_f64_be(v),
        }
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let len = s.len();
        if len > u16::MAX as usize {
            return Err(Error::StringTooLong { len, max: u16::MAX as usize });
        }
        self.write_u16(len as u16);
        self.inner.write_bytes(s.as_bytes());
        Ok(())
    }

    fn write_len(&mut self, len: usize) {
        self.write_i32(len as i32);
    }

    fn write_named(&mut self, name: &str, kind: TagKind) -> Result<()> {
        self.inner.write_u8(kind as u8);
        self.write_string(name)
    }

    fn write_compound(&mut self, compound: &CompoundTag) -> Result<()> {
        for (name, tag) in compound.iter() {
            self.write_named(name, tag.kind())?;
            self.write_payload(tag)?;
        }
        self.inner.write_u8(TagKind::End as u8);
        Ok(())
    }

    fn write_payload(&mut self, tag: &Tag) -> Result<()> {
        match tag {
            Tag::Byte(v) => self.inner.write_i8(*v),
            Tag::Short(v) => self.write_i16(*v),
            Tag::Int(v) => self.write_i32(*v),
            Tag::Long(v) => self.write_i64(*v),
            Tag::Float(v) => self.write_f32(*v),
            Tag::Double(v) => self.write_f64(*v),
            Tag::ByteArray(values) => {
                self.write_len(values.len());
                for v in values {
                    self.inner.write_i8(*v);
                }
            }
            Tag::String(s) => self.write_string(s)?,
            Tag::List(items) => {
                let elem = items.first().map_or(TagKind::End, Tag::kind);
                if let Some(bad) = items.iter().find(|t| t.kind() != elem) {
                    return Err(Error::HeterogeneousList {
                        expected: elem,
                        found: bad.kind(),
                    });
                }
                self.inner.write_u8(elem as u8);
                self.write_len(items.len());
                for item in items {
                    self.write_payload(item)?;
                }
            }
            Tag::Compound(c) => self.write_compound(c)?,
            Tag::IntArray(values) => {
                self.write_len(values.len());
                for v in values {
                    self.write_i32(*v);
                }
            }
            Tag::LongArray(values) => {
                self.write_len(values.len());
                for v in values {
                    self.write_i64(*v);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::*;

    fn map_item_tag() -> CompoundTag {
        CompoundTag::new()
            .with("map_uuid", -4294967295i64)
            .with("map_is_scaling", 0i8)
            .with("map_name_index", 3i32)
    }

    #[test]
    fn test_read_hand_encoded_le() {
        // {map_uuid: 42L} with an empty root name
        let mut data = vec![0x0a, 0x00, 0x00];
        data.extend_from_slice(&[0x04, 0x08, 0x00]);
        data.extend_from_slice(b"map_uuid");
        data.extend_from_slice(&42i64.to_le_bytes());
        data.push(0x00);

        let root = read_root(&data, Flavor::LittleEndian).unwrap();
        assert_eq!(root.name, "");
        assert_eq!(root.compound.get_as::<i64>("map_uuid"), Ok(42));
    }

    #[test]
    fn test_flavors_differ_on_wire() {
        let root = NamedCompound { name: String::new(), compound: map_item_tag() };
        let le = write_root(&root, Flavor::LittleEndian).unwrap();
        let be = write_root(&root, Flavor::BigEndian).unwrap();
        assert_ne!(le, be);
        assert_eq!(read_root(&le, Flavor::LittleEndian).unwrap(), root);
        assert_eq!(read_root(&be, Flavor::BigEndian).unwrap(), root);
    }

    #[test]
    fn test_nested_structures_survive() {
        let inner = CompoundTag::new()
            .with("colors", Tag::ByteArray(vec![1, -2, 3]))
            .with("decorations", Tag::List(vec![
                Tag::Compound(CompoundTag::new().with("rot", 8i32)),
                Tag::Compound(CompoundTag::new().with("rot", 12i32)),
            ]))
            .with("empty", Tag::List(vec![]))
            .with("ints", Tag::IntArray(vec![i32::MIN, 0, i32::MAX]))
            .with("longs", Tag::LongArray(vec![i64::MIN]))
            .with("f", 1.5f32)
            .with("d", -0.25f64)
            .with("s", 300i16);
        let root = NamedCompound {
            name: "root".into(),
            compound: CompoundTag::new().with("data", inner),
        };
        let bytes = write_root(&root, Flavor::LittleEndian).unwrap();
        assert_eq!(read_root(&bytes, Flavor::LittleEndian).unwrap(), root);
    }

    #[test]
    fn test_gzip_input() {
        let root = NamedCompound { name: String::new(), compound: map_item_tag() };
        let raw = write_root(&root, Flavor::BigEndian).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        let gz = encoder.finish().unwrap();

        assert_eq!(read_root(&gz, Flavor::BigEndian).unwrap(), root);
    }

    #[test]
    fn test_root_must_be_compound() {
        let data = [0x03, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        assert!(matches!(
            read_root(&data, Flavor::LittleEndian),
            Err(Error::RootNotCompound(TagKind::Int))
        ));
    }

    #[test]
    fn test_truncated_input() {
        let root = NamedCompound { name: String::new(), compound: map_item_tag() };
        let bytes = write_root(&root, Flavor::LittleEndian).unwrap();
        for cut in 0..bytes.len() {
            assert!(read_root(&bytes[..cut], Flavor::LittleEndian).is_err());
        }
    }

    #[test]
    fn test_trailing_data() {
        let root = NamedCompound::default();
        let mut bytes = write_root(&root, Flavor::LittleEndian).unwrap();
        bytes.push(0xAA);
        assert!(matches!(
            read_root(&bytes, Flavor::LittleEndian),
            Err(Error::TrailingData(1))
        ));
    }

    #[test]
    fn test_unknown_kind() {
        let data = [0x0a, 0x00, 0x00, 0x0d, 0x00, 0x00];
        assert!(matches!(
            read_root(&data, Flavor::LittleEndian),
            Err(Error::InvalidTagKind(13))
        ));
    }

    #[test]
    fn test_negative_array_length() {
        let mut data = vec![0x0a, 0x00, 0x00, 0x0b, 0x01, 0x00, b'a'];
        data.extend_from_slice(&(-1i32).to_le_bytes());
        assert!(matches!(
            read_root(&data, Flavor::LittleEndian),
            Err(Error::NegativeLength(-1))
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut compound = CompoundTag::new();
        for _ in 0..10 {
            compound = CompoundTag::new().with("n", compound);
        }
        let root = NamedCompound { name: String::new(), compound };
        let bytes = write_root(&root, Flavor::LittleEndian).unwrap();

        assert!(read_root_with_depth(&bytes, Flavor::LittleEndian, 11).is_ok());
        assert!(matches!(
            read_root_with_depth(&bytes, Flavor::LittleEndian, 5),
            Err(Error::DepthLimit { max: 5 })
        ));
    }

    #[test]
    fn test_heterogeneous_list_rejected() {
        let root = NamedCompound {
            name: String::new(),
            compound: CompoundTag::new().with("l", Tag::List(vec![Tag::Int(1), Tag::Long(2)])),
        };
        assert!(matches!(
            write_root(&root, Flavor::LittleEndian),
            Err(Error::HeterogeneousList { expected: TagKind::Int, found: TagKind::Long })
        ));
    }
}
