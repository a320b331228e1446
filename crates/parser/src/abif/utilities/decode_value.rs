use log::{debug, warn};

use crate::{
    abif::utilities::{
        parse_directory::{DirectoryEntry, EntryData},
        reader::{Reader, slice_at},
    },
    error::{AbifError, Result},
};

/// ABIF element types this decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Byte,
    Char,
    Word,
    Short,
    Long,
    PString,
    CString,
}

impl ElementType {
    #[inline]
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(ElementType::Byte),
            2 => Some(ElementType::Char),
            3 => Some(ElementType::Word),
            4 => Some(ElementType::Short),
            5 => Some(ElementType::Long),
            18 => Some(ElementType::PString),
            19 => Some(ElementType::CString),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> u16 {
        match self {
            ElementType::Byte => 1,
            ElementType::Char => 2,
            ElementType::Word => 3,
            ElementType::Short => 4,
            ElementType::Long => 5,
            ElementType::PString => 18,
            ElementType::CString => 19,
        }
    }

    /// Bytes per element for the integer types, `None` for byte strings.
    #[inline]
    pub fn int_width(self) -> Option<usize> {
        match self {
            ElementType::Word | ElementType::Short => Some(2),
            ElementType::Long => Some(4),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DecodedValue {
    Integers(Vec<i32>),
    Bytes(Vec<u8>),
    #[default]
    Empty,
}

impl DecodedValue {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            DecodedValue::Integers(v) => v.len(),
            DecodedValue::Bytes(v) => v.len(),
            DecodedValue::Empty => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte strings widen to one integer per byte (0..=255).
    pub fn into_integers(self) -> Vec<i32> {
        match self {
            DecodedValue::Integers(v) => v,
            DecodedValue::Bytes(v) => v.into_iter().map(i32::from).collect(),
            DecodedValue::Empty => Vec::new(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            DecodedValue::Bytes(v) => v,
            DecodedValue::Integers(_) | DecodedValue::Empty => Vec::new(),
        }
    }
}

/// Decodes a tag's payload, degrading to `Empty` when the tag cannot be read.
pub fn decode_value(bytes: &[u8], entry: &DirectoryEntry) -> DecodedValue {
    match try_decode_value(bytes, entry) {
        Ok(v) => v,
        Err(e @ AbifError::UnsupportedElementType { .. }) => {
            debug!("{e}");
            DecodedValue::Empty
        }
        Err(e) => {
            warn!("{}: skipping unreadable tag: {e}", entry.key());
            DecodedValue::Empty
        }
    }
}

pub fn try_decode_value(bytes: &[u8], entry: &DirectoryEntry) -> Result<DecodedValue> {
    let element_type = ElementType::from_code(entry.element_type).ok_or_else(|| {
        AbifError::UnsupportedElementType {
            tag: entry.key().to_string(),
            element_type: entry.element_type,
        }
    })?;

    let raw = payload(bytes, entry)?;
    let count = entry.element_count as usize;

    let value = match element_type {
        ElementType::Word | ElementType::Short | ElementType::Long => {
            DecodedValue::Integers(read_integers(raw, count, element_type)?)
        }
        ElementType::Byte | ElementType::Char => {
            DecodedValue::Bytes(raw[..count.min(raw.len())].to_vec())
        }
        ElementType::PString => DecodedValue::Bytes(read_pstring(raw)?.to_vec()),
        ElementType::CString => {
            let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            DecodedValue::Bytes(raw[..end].to_vec())
        }
    };

    Ok(value)
}

/// Inline payloads come from the entry itself, everything else from `bytes`.
#[inline]
pub fn payload<'a>(bytes: &'a [u8], entry: &'a DirectoryEntry) -> Result<&'a [u8]> {
    match &entry.data {
        EntryData::Inline(raw) => Ok(&raw[..(entry.data_size as usize).min(raw.len())]),
        EntryData::Offset(off) => {
            slice_at(bytes, *off as usize, entry.data_size as usize, "payload")
        }
    }
}

#[inline]
fn read_integers(raw: &[u8], count: usize, element_type: ElementType) -> Result<Vec<i32>> {
    let Some(width) = element_type.int_width() else {
        return Ok(Vec::new());
    };
    let n = count.min(raw.len() / width);

    let mut r = Reader::new(raw);
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let v = match element_type {
            ElementType::Word => i32::from(r.read_u16_be("word")?),
            ElementType::Short => i32::from(r.read_i16_be("short")?),
            _ => r.read_i32_be("long")?,
        };
        out.push(v);
    }
    Ok(out)
}

#[inline]
fn read_pstring(raw: &[u8]) -> Result<&[u8]> {
    if raw.is_empty() {
        return Ok(raw);
    }
    let mut r = Reader::new(raw);
    let n = r.read_u8("pstring_len")? as usize;
    let available = raw.len() - r.pos();
    r.read_bytes(n.min(available), "pstring")
}
