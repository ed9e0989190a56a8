use indexmap::IndexMap;

use crate::error::TagError;
use crate::tag::{FromTag, Tag, TagKind};

/// A string-keyed record of tags.
///
/// Keys keep their insertion (wire) order so a decode/encode cycle is
/// byte-stable; [`crate::snbt`] sorts them when producing text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundTag {
    entries: IndexMap<String, Tag>,
}

impl CompoundTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// True only if `key` is present and holds a tag of `kind`
    pub fn contains_kind(&self, key: &str, kind: TagKind) -> bool {
        self.entries.get(key).is_some_and(|t| t.kind() == kind)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    /// Typed extraction. Absence and kind mismatch are both reported, never
    /// papered over with a default.
    pub fn get_as<'a, T: FromTag<'a>>(&'a self, key: &str) -> Result<T, TagError> {
        let tag = self.entries.get(key).ok_or_else(|| TagError::NotFound {
            key: key.to_owned(),
        })?;
        T::from_tag(tag).ok_or_else(|| TagError::WrongType {
            key: key.to_owned(),
            expected: T::KIND,
            found: tag.kind(),
        })
    }

    /// Like [`get_as`](Self::get_as) but folds absence into `None`.
    /// A present tag of the wrong kind is still an error.
    pub fn get_opt<'a, T: FromTag<'a>>(&'a self, key: &str) -> Result<Option<T>, TagError> {
        match self.get_as(key) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, tag: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(key.into(), tag.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, tag: impl Into<Tag>) -> Self {
        self.insert(key, tag);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.shift_remove(key)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries ordered by key
    pub fn sorted(&self) -> Vec<(&str, &Tag)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<(String, Tag)> for CompoundTag {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Presence check over a possibly absent record
pub fn has_key(record: Option<&CompoundTag>, key: &str) -> bool {
    record.is_some_and(|r| r.contains(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CompoundTag {
        CompoundTag::new()
            .with("map_uuid", 42i64)
            .with("map_is_scaling", 1i8)
            .with("map_name_index", 7i32)
            .with("label", "north")
    }

    #[test]
    fn test_has_key() {
        let record = sample();
        assert!(has_key(Some(&record), "map_uuid"));
        assert!(!has_key(Some(&record), "missing"));
        assert!(!has_key(None, "map_uuid"));
    }

    #[test]
    fn test_missing_key_fails_for_every_kind() {
        let record = sample();
        let key = "absent";
        assert!(record.get_as::<i8>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<bool>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<i16>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<i32>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<i64>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<f32>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<f64>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<&str>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<&CompoundTag>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<&[Tag]>(key).unwrap_err().is_not_found());
        assert!(record.get_as::<&[i32]>(key).unwrap_err().is_not_found());
    }

    #[test]
    fn test_matching_kind_returns_value() {
        let record = sample();
        assert_eq!(record.get_as::<i64>("map_uuid"), Ok(42));
        assert_eq!(record.get_as::<bool>("map_is_scaling"), Ok(true));
        assert_eq!(record.get_as::<i8>("map_is_scaling"), Ok(1));
        assert_eq!(record.get_as::<i32>("map_name_index"), Ok(7));
        assert_eq!(record.get_as::<&str>("label"), Ok("north"));
    }

    #[test]
    fn test_mismatched_kind_is_wrong_type() {
        let record = sample();
        assert_eq!(
            record.get_as::<i32>("map_uuid"),
            Err(TagError::WrongType {
                key: "map_uuid".into(),
                expected: TagKind::Int,
                found: TagKind::Long,
            })
        );
        assert!(matches!(
            record.get_as::<i64>("map_name_index"),
            Err(TagError::WrongType { found: TagKind::Int, .. })
        ));
        assert!(matches!(
            record.get_as::<bool>("label"),
            Err(TagError::WrongType { expected: TagKind::Byte, .. })
        ));
    }

    #[test]
    fn test_get_opt() {
        let record = sample();
        assert_eq!(record.get_opt::<i32>("map_name_index"), Ok(Some(7)));
        assert_eq!(record.get_opt::<i32>("absent"), Ok(None));
        assert!(record.get_opt::<i32>("map_uuid").is_err());
    }

    #[test]
    fn test_contains_kind() {
        let record = sample();
        assert!(record.contains_kind("map_uuid", TagKind::Long));
        assert!(!record.contains_kind("map_uuid", TagKind::Int));
        assert!(!record.contains_kind("absent", TagKind::Long));
    }

    #[test]
    fn test_sorted_and_insertion_order() {
        let record = CompoundTag::new().with("b", 1i32).with("a", 2i32);
        let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        let keys: Vec<_> = record.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_remove() {
        let mut record = sample();
        assert_eq!(record.remove("label"), Some(Tag::String("north".into())));
        assert!(!record.contains("label"));
        assert_eq!(record.len(), 3);
    }
}
