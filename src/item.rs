//! Item identity and descriptive attributes.
//!
//! An [`ItemRecord`] describes one media file. Two records are the same item
//! when their filenames match; every other field is descriptive and may be
//! refreshed once tags are read.

use crate::error::RecordError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable opaque identifier for one media item.
///
/// Keys order lexicographically; every ranking in the crate uses that order
/// as its tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ItemKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw tag data as handed over by a tag reader.
///
/// Duration is the undecoded decimal value in seconds; the catalog rounds it
/// up when it builds a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub composer: Option<String>,
    pub genre: Option<String>,
    pub date: Option<String>,
    pub comment: Option<String>,
    pub duration: Option<f64>,
}

/// Descriptive attributes of one media item.
///
/// Immutable after construction: build a new record with [`ItemRecord::with_tags`]
/// when tags become available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    title: String,
    artist: String,
    album: String,
    composer: String,
    genre: String,
    date: String,
    comment: String,
    /// Whole seconds; `None` while unknown or not yet loaded.
    duration: Option<u32>,
    filename: String,
}

impl ItemRecord {
    /// Minimal record carrying only the filename.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingFilename`] if `filename` is empty.
    pub fn new(filename: impl Into<String>) -> Result<Self, RecordError> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(RecordError::MissingFilename);
        }

        Ok(Self {
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            composer: String::new(),
            genre: String::new(),
            date: String::new(),
            comment: String::new(),
            duration: None,
            filename,
        })
    }

    /// Fully populated record for the same file.
    ///
    /// Missing tag fields become empty strings and the decimal duration is
    /// rounded up to whole seconds.
    #[must_use]
    pub fn with_tags(&self, tags: MediaTags) -> Self {
        Self {
            title: tags.title.unwrap_or_default(),
            artist: tags.artist.unwrap_or_default(),
            album: tags.album.unwrap_or_default(),
            composer: tags.composer.unwrap_or_default(),
            genre: tags.genre.unwrap_or_default(),
            date: tags.date.unwrap_or_default(),
            comment: tags.comment.unwrap_or_default(),
            duration: tags.duration.and_then(ceil_seconds),
            filename: self.filename.clone(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn composer(&self) -> &str {
        &self.composer
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// Round a decimal duration up to whole seconds. Negative, NaN and
/// out-of-range values count as unknown.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ceil_seconds(raw: f64) -> Option<u32> {
    if !raw.is_finite() || raw < 0.0 || raw > f64::from(u32::MAX) {
        return None;
    }
    Some(raw.ceil() as u32)
}

impl PartialEq for ItemRecord {
    fn eq(&self, other: &Self) -> bool {
        self.filename == other.filename
    }
}

impl Eq for ItemRecord {}

impl Hash for ItemRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.filename.hash(state);
    }
}

impl fmt::Display for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.artist, self.title, self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_requires_filename() {
        assert_eq!(ItemRecord::new(""), Err(RecordError::MissingFilename));
        assert_eq!(ItemRecord::new("   "), Err(RecordError::MissingFilename));
        assert!(ItemRecord::new("a/b.mp3").is_ok());
    }

    #[test]
    fn test_new_record_is_bare() {
        let record = ItemRecord::new("song.mp3").unwrap();
        assert_eq!(record.filename(), "song.mp3");
        assert_eq!(record.title(), "");
        assert_eq!(record.comment(), "");
        assert_eq!(record.duration(), None);
    }

    #[test]
    fn test_equality_is_by_filename() {
        let bare = ItemRecord::new("song.mp3").unwrap();
        let tagged = bare.with_tags(MediaTags {
            title: Some("Title".to_string()),
            artist: Some("Artist".to_string()),
            ..MediaTags::default()
        });
        let other = ItemRecord::new("other.mp3").unwrap();

        assert_eq!(bare, tagged);
        assert_ne!(bare, other);
    }

    #[test]
    fn test_with_tags_rounds_duration_up() {
        let record = ItemRecord::new("song.mp3").unwrap();

        let tagged = record.with_tags(MediaTags {
            duration: Some(181.2),
            ..MediaTags::default()
        });
        assert_eq!(tagged.duration(), Some(182));

        let exact = record.with_tags(MediaTags {
            duration: Some(60.0),
            ..MediaTags::default()
        });
        assert_eq!(exact.duration(), Some(60));

        let broken = record.with_tags(MediaTags {
            duration: Some(f64::NAN),
            ..MediaTags::default()
        });
        assert_eq!(broken.duration(), None);
    }

    #[test]
    fn test_with_tags_fills_missing_fields_with_empty_text() {
        let record = ItemRecord::new("song.mp3").unwrap().with_tags(MediaTags {
            genre: Some("Jazz".to_string()),
            ..MediaTags::default()
        });

        assert_eq!(record.genre(), "Jazz");
        assert_eq!(record.album(), "");
        assert_eq!(record.filename(), "song.mp3");
    }

    #[test]
    fn test_keys_order_lexicographically() {
        let mut keys = vec![ItemKey::from("c"), ItemKey::from("a"), ItemKey::from("b")];
        keys.sort();
        assert_eq!(keys, vec![ItemKey::from("a"), ItemKey::from("b"), ItemKey::from("c")]);
        assert_eq!(ItemKey::from("a").to_string(), "a");
    }
}
