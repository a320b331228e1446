use crate::{
    abif::utilities::{
        parse_directory::{DirectoryEntry, parse_directory_entry},
        reader::Reader,
    },
    error::{AbifError, Result},
};

pub const SIGNATURE: [u8; 4] = *b"ABIF";
pub const ROOT_ENTRY_OFFSET: usize = 6;
/// Signature, version and the root directory entry.
pub const HEADER_SIZE: usize = ROOT_ENTRY_OFFSET + 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub signature: [u8; 4],
    pub version: u16,
    pub root: DirectoryEntry,
}

pub fn parse_header(bytes: &[u8]) -> Result<Header> {
    let Some(signature) = bytes.get(..4) else {
        return Err(AbifError::malformed("header: file too small for signature"));
    };
    if signature != SIGNATURE {
        return Err(AbifError::malformed(format!(
            "header: invalid signature {:?} (expected \"ABIF\")",
            String::from_utf8_lossy(signature)
        )));
    }
    if bytes.len() < HEADER_SIZE {
        return Err(AbifError::malformed(format!(
            "header: file too small (need {HEADER_SIZE} bytes, have {})",
            bytes.len()
        )));
    }

    let mut r = Reader::new(&bytes[..HEADER_SIZE]);
    read_header(&mut r).map_err(|e| AbifError::malformed(format!("header: {e}")))
}

#[inline]
fn read_header(r: &mut Reader<'_>) -> Result<Header> {
    let signature = r.read_arr::<4>("signature")?;
    let version = r.read_u16_be("version")?;
    let root = parse_directory_entry(r)?;

    Ok(Header {
        signature,
        version,
        root,
    })
}
