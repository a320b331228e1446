use std::{borrow::Cow, fmt};

use hashbrown::HashMap;
use log::debug;

use crate::{
    abif::utilities::{
        Header,
        reader::{Reader, slice_at},
    },
    error::{AbifError, Result},
};

pub const DIR_ENTRY_SIZE: usize = 28;

/// `(tag name, tag number)`, e.g. `DATA9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagKey {
    pub name: [u8; 4],
    pub number: u32,
}

impl TagKey {
    #[inline]
    pub const fn new(name: &[u8; 4], number: u32) -> Self {
        Self {
            name: *name,
            number,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", String::from_utf8_lossy(&self.name), self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryData {
    /// Payload lives elsewhere in the file.
    Offset(u32),
    /// Payload of at most 4 bytes stored in the offset field itself.
    Inline([u8; 4]),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub tag_name: [u8; 4],
    pub tag_number: u32,
    pub element_type: u16,
    pub element_size: u16,
    pub element_count: u32,
    pub data_size: u32,
    pub data: EntryData,
    pub data_handle: u32,
}

impl DirectoryEntry {
    #[inline]
    pub fn key(&self) -> TagKey {
        TagKey {
            name: self.tag_name,
            number: self.tag_number,
        }
    }

    #[inline]
    pub fn tag_name_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.tag_name)
    }
}

/// Decodes one 28-byte record at the reader's position.
pub fn parse_directory_entry(r: &mut Reader<'_>) -> Result<DirectoryEntry> {
    let tag_name = r.read_arr::<4>("tag_name")?;
    let tag_number = r.read_u32_be("tag_number")?;
    let element_type = r.read_u16_be("element_type")?;
    let element_size = r.read_u16_be("element_size")?;
    let element_count = r.read_u32_be("element_count")?;
    let data_size = r.read_u32_be("data_size")?;
    let raw_data = r.read_arr::<4>("data_offset")?;
    let data_handle = r.read_u32_be("data_handle")?;

    let data = if data_size <= 4 {
        EntryData::Inline(raw_data)
    } else {
        EntryData::Offset(u32::from_be_bytes(raw_data))
    };

    Ok(DirectoryEntry {
        tag_name,
        tag_number,
        element_type,
        element_size,
        element_count,
        data_size,
        data,
        data_handle,
    })
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Vec<DirectoryEntry>,
    index: HashMap<TagKey, usize>,
}

impl Directory {
    /// Later records shadow earlier ones with the same key.
    pub fn from_entries(entries: Vec<DirectoryEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            index.insert(e.key(), i);
        }
        Self { entries, index }
    }

    #[inline]
    pub fn get(&self, key: TagKey) -> Option<&DirectoryEntry> {
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    #[inline]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn parse_directory(bytes: &[u8], header: &Header) -> Result<Directory> {
    let root = &header.root;

    let mut count = root.element_count as usize;
    let count_by_size = root.data_size as usize / DIR_ENTRY_SIZE;
    if count > count_by_size {
        debug!(
            "directory: root declares {count} entries but data_size={} holds {count_by_size}",
            root.data_size
        );
        count = count_by_size;
    }

    let off = match root.data {
        EntryData::Offset(off) => off as usize,
        EntryData::Inline(_) => return Ok(Directory::default()),
    };

    let len = count
        .checked_mul(DIR_ENTRY_SIZE)
        .ok_or_else(|| AbifError::malformed("directory: size overflow"))?;
    let raw = slice_at(bytes, off, len, "directory")
        .map_err(|e| AbifError::malformed(format!("directory outside buffer: {e}")))?;

    let mut r = Reader::new(raw);
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let entry = parse_directory_entry(&mut r).map_err(|e| {
            AbifError::malformed(format!("directory record {i} truncated: {e}"))
        })?;
        entries.push(entry);
    }

    debug!("directory: {} entries at offset {off}", entries.len());

    Ok(Directory::from_entries(entries))
}
