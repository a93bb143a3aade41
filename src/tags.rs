//! Tag extraction.
//!
//! The catalog only needs a [`TagReader`]; [`Id3TagReader`] is the reader the
//! binary uses. Tests substitute their own readers.

use crate::error::TagError;
use crate::item::MediaTags;
use id3::frame::Content;
use id3::{ErrorKind, Tag, TagLike};
use log::{debug, trace};
use std::path::Path;

/// Source of tag data for a resolved media path.
pub trait TagReader {
    /// Read the tags of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Unreadable`] when the file cannot be read or its tag
    /// block is corrupt.
    fn read_tags(&self, path: &Path) -> Result<MediaTags, TagError>;
}

/// Reads ID3v2 tags.
///
/// A file without any tag block is not an error: it yields empty tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct Id3TagReader;

impl TagReader for Id3TagReader {
    fn read_tags(&self, path: &Path) -> Result<MediaTags, TagError> {
        let tag = match Tag::read_from_path(path) {
            Ok(tag) => tag,
            Err(err) if matches!(err.kind, ErrorKind::NoTag) => {
                debug!("No ID3 tag in {}", path.display());
                return Ok(MediaTags::default());
            }
            Err(err) => {
                return Err(TagError::Unreadable {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                })
            }
        };

        let tags = tags_from_id3(&tag);
        trace!("Read tags from {}: {tags:?}", path.display());
        Ok(tags)
    }
}

fn tags_from_id3(tag: &Tag) -> MediaTags {
    // TLEN is milliseconds.
    let duration = text_frame(tag, "TLEN")
        .and_then(|s| s.trim().parse::<f64>().ok())
        .map(|ms| ms / 1000.0);

    MediaTags {
        title: tag.title().map(str::to_owned),
        artist: tag.artist().map(str::to_owned),
        album: tag.album().map(str::to_owned),
        composer: text_frame(tag, "TCOM"),
        genre: tag.genre().map(str::to_owned),
        date: text_frame(tag, "TDRC").or_else(|| text_frame(tag, "TYER")),
        comment: first_comment(tag),
        duration,
    }
}

fn text_frame(tag: &Tag, id: &str) -> Option<String> {
    match tag.get(id)?.content() {
        Content::Text(s) => Some(s.clone()),
        _ => None,
    }
}

fn first_comment(tag: &Tag) -> Option<String> {
    tag.frames()
        .filter(|frame| frame.id() == "COMM")
        .find_map(|frame| match frame.content() {
            Content::Comment(c) => Some(c.text.clone()),
            _ => None,
        })
}
