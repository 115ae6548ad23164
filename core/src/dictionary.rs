//! Binary lexicon store for `.glide` dictionary files.
//!
//! Format (little-endian throughout): a fixed 32-byte header (magic "GLID",
//! version, flags, entry count, language tag) followed by packed entries
//! `word_len:u8 · word:[u8] · frequency:u32 · flags:u8`.
//!
//! Public API:
//! - `DictEntry` / `DictHeader` - parsed entry and header metadata
//! - `Dictionary` - load from file or memory, start/end-letter queries,
//!   case-insensitive exact lookup
//!
//! A successful load replaces all prior content; a failed load leaves the
//! store empty. Queries on an unloaded store return empty results rather
//! than errors.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

/// Magic bytes of `.glide` files: ASCII "GLID".
pub const DICT_MAGIC: u32 = 0x474C_4944;
/// Current dictionary format version.
pub const DICT_VERSION: u16 = 1;
/// Fixed header size in bytes.
pub const DICT_HEADER_SIZE: usize = 32;
/// Maximum word length in UTF-8 bytes.
pub const MAX_WORD_LENGTH: usize = 64;
/// Maximum language tag length that fits in the fixed header.
pub const MAX_LANGUAGE_TAG_LENGTH: usize = 18;

/// Entry flag: word is a proper noun.
pub const FLAG_PROPER_NOUN: u8 = 0x01;
/// Entry flag: word is profanity; hosts may filter.
pub const FLAG_PROFANITY: u8 = 0x02;

/// Header flag bit 0: entries were written in sorted order.
pub const HEADER_FLAG_SORTED: u16 = 0x01;

/// Parsed dictionary header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictHeader {
    pub magic: u32,
    pub version: u16,
    pub flags: u16,
    pub entry_count: u32,
    pub language_tag: String,
}

/// A single word entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictEntry {
    pub word: String,
    pub frequency: u32,
    pub flags: u8,
}

impl DictEntry {
    pub fn new<T: Into<String>>(word: T, frequency: u32, flags: u8) -> Self {
        DictEntry {
            word: word.into(),
            frequency,
            flags,
        }
    }
}

/// In-memory dictionary store.
///
/// Read-only after a successful load. Entry references handed out by the
/// query methods stay valid until the next `load`/`unload`.
#[derive(Debug, Default)]
pub struct Dictionary {
    entries: Vec<DictEntry>,
    header: DictHeader,
    max_frequency: u32,
    loaded: bool,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary file, replacing any prior content.
    ///
    /// On failure the store is left empty and the error distinguishes a
    /// missing file from corrupt or version-mismatched data.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.unload();
        let path = path.as_ref();
        let data = fs::read(path).map_err(|e| match e.kind() {
            IoErrorKind::NotFound | IoErrorKind::PermissionDenied => {
                Error::DictNotFound(format!("{}: {}", path.display(), e))
            }
            _ => Error::DictCorrupt(format!("failed to read {}: {}", path.display(), e)),
        })?;
        self.load_from_memory(&data)
    }

    /// Load a dictionary from an in-memory buffer, replacing prior content.
    pub fn load_from_memory(&mut self, data: &[u8]) -> Result<(), Error> {
        self.unload();
        let (header, entries, max_frequency) = parse(data)?;
        tracing::debug!(
            entries = entries.len(),
            language = %header.language_tag,
            max_frequency,
            "dictionary loaded"
        );
        self.header = header;
        self.entries = entries;
        self.max_frequency = max_frequency;
        self.loaded = true;
        Ok(())
    }

    /// Drop all content; queries return empty afterwards.
    pub fn unload(&mut self) {
        *self = Self::default();
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn header(&self) -> &DictHeader {
        &self.header
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Largest frequency across loaded entries; 0 when unloaded.
    pub fn max_frequency(&self) -> u32 {
        self.max_frequency
    }

    pub fn all_entries(&self) -> &[DictEntry] {
        if self.loaded {
            &self.entries
        } else {
            &[]
        }
    }

    /// Entries whose first byte, lowercased, equals `first`.
    pub fn entries_starting_with(&self, first: u8) -> Vec<&DictEntry> {
        let first = first.to_ascii_lowercase();
        self.all_entries()
            .iter()
            .filter(|e| {
                e.word
                    .as_bytes()
                    .first()
                    .is_some_and(|b| b.to_ascii_lowercase() == first)
            })
            .collect()
    }

    /// Entries whose first and last bytes, lowercased, equal `first`/`last`.
    pub fn entries_with_start_end(&self, first: u8, last: u8) -> Vec<&DictEntry> {
        let first = first.to_ascii_lowercase();
        let last = last.to_ascii_lowercase();
        self.all_entries()
            .iter()
            .filter(|e| {
                let bytes = e.word.as_bytes();
                bytes.first().is_some_and(|b| b.to_ascii_lowercase() == first)
                    && bytes.last().is_some_and(|b| b.to_ascii_lowercase() == last)
            })
            .collect()
    }

    /// ASCII case-insensitive exact match.
    pub fn lookup(&self, word: &str) -> Option<&DictEntry> {
        if word.is_empty() {
            return None;
        }
        self.all_entries()
            .iter()
            .find(|e| e.word.eq_ignore_ascii_case(word))
    }
}

fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn parse(data: &[u8]) -> Result<(DictHeader, Vec<DictEntry>, u32), Error> {
    if data.len() < DICT_HEADER_SIZE {
        return Err(Error::DictCorrupt("buffer too small for header".into()));
    }

    let mut header = DictHeader {
        magic: read_u32_le(data, 0),
        version: read_u16_le(data, 4),
        flags: read_u16_le(data, 6),
        entry_count: read_u32_le(data, 8),
        language_tag: String::new(),
    };

    let lang_len = read_u16_le(data, 12) as usize;
    if lang_len > 0 && 14 + lang_len <= DICT_HEADER_SIZE {
        header.language_tag = std::str::from_utf8(&data[14..14 + lang_len])
            .unwrap_or("")
            .to_string();
    }

    if header.magic != DICT_MAGIC {
        return Err(Error::DictCorrupt("invalid magic bytes".into()));
    }
    if header.version != DICT_VERSION {
        return Err(Error::DictVersionMismatch(header.version));
    }

    // A valid entry takes at least 6 bytes, so this bounds the allocation
    // even for a hostile entry_count.
    let mut entries =
        Vec::with_capacity((header.entry_count as usize).min(data.len() / 6));
    let mut max_frequency = 0u32;
    let mut pos = DICT_HEADER_SIZE;

    for i in 0..header.entry_count {
        if pos >= data.len() {
            return Err(Error::DictCorrupt(format!(
                "unexpected end of data at entry {i}"
            )));
        }
        let word_len = data[pos] as usize;
        pos += 1;
        if word_len > MAX_WORD_LENGTH {
            return Err(Error::DictCorrupt(format!(
                "entry {i} word length {word_len} exceeds maximum"
            )));
        }
        if pos + word_len + 5 > data.len() {
            return Err(Error::DictCorrupt(format!("truncated entry {i}")));
        }
        let word = std::str::from_utf8(&data[pos..pos + word_len])
            .map_err(|_| Error::DictCorrupt(format!("entry {i} is not valid UTF-8")))?
            .to_string();
        pos += word_len;
        let frequency = read_u32_le(data, pos);
        pos += 4;
        let flags = data[pos];
        pos += 1;

        max_frequency = max_frequency.max(frequency);
        entries.push(DictEntry {
            word,
            frequency,
            flags,
        });
    }

    Ok((header, entries, max_frequency))
}
