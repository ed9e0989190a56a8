use std::fmt;

use crate::compound::CompoundTag;

/// Tag kind identifiers as they appear on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::End),
            1 => Some(Self::Byte),
            2 => Some(Self::Short),
            3 => Some(Self::Int),
            4 => Some(Self::Long),
            5 => Some(Self::Float),
            6 => Some(Self::Double),
            7 => Some(Self::ByteArray),
            8 => Some(Self::String),
            9 => Some(Self::List),
            10 => Some(Self::Compound),
            11 => Some(Self::IntArray),
            12 => Some(Self::LongArray),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::End => "TAG_End",
            Self::Byte => "TAG_Byte",
            Self::Short => "TAG_Short",
            Self::Int => "TAG_Int",
            Self::Long => "TAG_Long",
            Self::Float => "TAG_Float",
            Self::Double => "TAG_Double",
            Self::ByteArray => "TAG_Byte_Array",
            Self::String => "TAG_String",
            Self::List => "TAG_List",
            Self::Compound => "TAG_Compound",
            Self::IntArray => "TAG_Int_Array",
            Self::LongArray => "TAG_Long_Array",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single tag value. Every variant carries exactly one kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    /// Homogeneous list. An empty list has no element kind.
    List(Vec<Tag>),
    Compound(CompoundTag),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Self::Byte(_) => TagKind::Byte,
            Self::Short(_) => TagKind::Short,
            Self::Int(_) => TagKind::Int,
            Self::Long(_) => TagKind::Long,
            Self::Float(_) => TagKind::Float,
            Self::Double(_) => TagKind::Double,
            Self::ByteArray(_) => TagKind::ByteArray,
            Self::String(_) => TagKind::String,
            Self::List(_) => TagKind::List,
            Self::Compound(_) => TagKind::Compound,
            Self::IntArray(_) => TagKind::IntArray,
            Self::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Element kind of a list, `End` for an empty list, `None` for non-lists
    pub fn list_kind(&self) -> Option<TagKind> {
        match self {
            Self::List(items) => Some(items.first().map_or(TagKind::End, Tag::kind)),
            _ => None,
        }
    }

    /// Typed view of this tag. Never coerces between kinds.
    pub fn get<'a, T: FromTag<'a>>(&'a self) -> Option<T> {
        T::from_tag(self)
    }
}

/// Types that can be extracted from exactly one [`TagKind`]
pub trait FromTag<'a>: Sized {
    const KIND: TagKind;

    fn from_tag(tag: &'a Tag) -> Option<Self>;
}

macro_rules! from_tag_copy {
    ($ty:ty, $variant:ident) => {
        impl FromTag<'_> for $ty {
            const KIND: TagKind = TagKind::$variant;

            fn from_tag(tag: &Tag) -> Option<Self> {
                match tag {
                    Tag::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

macro_rules! from_tag_ref {
    ($ty:ty, $variant:ident) => {
        impl<'a> FromTag<'a> for &'a $ty {
            const KIND: TagKind = TagKind::$variant;

            fn from_tag(tag: &'a Tag) -> Option<Self> {
                match tag {
                    Tag::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

from_tag_copy!(i8, Byte);
from_tag_copy!(i16, Short);
from_tag_copy!(i32, Int);
from_tag_copy!(i64, Long);
from_tag_copy!(f32, Float);
from_tag_copy!(f64, Double);

from_tag_ref!(str, String);
from_tag_ref!(CompoundTag, Compound);
from_tag_ref!([Tag], List);
from_tag_ref!([i8], ByteArray);
from_tag_ref!([i32], IntArray);
from_tag_ref!([i64], LongArray);

/// Byte tags double as booleans; any nonzero value is `true`.
impl FromTag<'_> for bool {
    const KIND: TagKind = TagKind::Byte;

    fn from_tag(tag: &Tag) -> Option<Self> {
        match tag {
            Tag::Byte(v) => Some(*v != 0),
            _ => None,
        }
    }
}

impl From<i8> for Tag {
    fn from(v: i8) -> Self {
        Tag::Byte(v)
    }
}

impl From<bool> for Tag {
    fn from(v: bool) -> Self {
        Tag::Byte(v as i8)
    }
}

impl From<i16> for Tag {
    fn from(v: i16) -> Self {
        Tag::Short(v)
    }
}

impl From<i32> for Tag {
    fn from(v: i32) -> Self {
        Tag::Int(v)
    }
}

impl From<i64> for Tag {
    fn from(v: i64) -> Self {
        Tag::Long(v)
    }
}

impl From<f32> for Tag {
    fn from(v: f32) -> Self {
        Tag::Float(v)
    }
}

impl From<f64> for Tag {
    fn from(v: f64) -> Self {
        Tag::Double(v)
    }
}

impl From<&str> for Tag {
    fn from(v: &str) -> Self {
        Tag::String(v.to_owned())
    }
}

impl From<String> for Tag {
    fn from(v: String) -> Self {
        Tag::String(v)
    }
}

impl From<CompoundTag> for Tag {
    fn from(v: CompoundTag) -> Self {
        Tag::Compound(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_ids_roundtrip() {
        for id in 0..=12u8 {
            let kind = TagKind::from_u8(id).unwrap();
            assert_eq!(kind as u8, id);
        }
        assert_eq!(TagKind::from_u8(13), None);
    }

    #[test]
    fn test_typed_get_never_coerces() {
        let tag = Tag::Int(7);
        assert_eq!(tag.get::<i32>(), Some(7));
        assert_eq!(tag.get::<i64>(), None);
        assert_eq!(tag.get::<i16>(), None);
        assert_eq!(tag.get::<bool>(), None);
        assert_eq!(tag.get::<&str>(), None);
    }

    #[test]
    fn test_byte_as_bool() {
        assert_eq!(Tag::Byte(0).get::<bool>(), Some(false));
        assert_eq!(Tag::Byte(1).get::<bool>(), Some(true));
        assert_eq!(Tag::Byte(-3).get::<bool>(), Some(true));
        assert_eq!(Tag::Short(1).get::<bool>(), None);
    }

    #[test]
    fn test_list_kind() {
        assert_eq!(Tag::List(vec![]).list_kind(), Some(TagKind::End));
        assert_eq!(Tag::List(vec![Tag::Int(1)]).list_kind(), Some(TagKind::Int));
        assert_eq!(Tag::Int(1).list_kind(), None);
    }
}
