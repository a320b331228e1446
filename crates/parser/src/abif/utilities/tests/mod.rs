mod parse_directory;

use crate::abif::utilities::parse_directory::DIR_ENTRY_SIZE;

pub(super) const HEADER_LEN: usize = 128;
pub(super) const VERSION: u16 = 101;

pub(super) struct RawTag<'a> {
    name: &'a [u8; 4],
    number: u32,
    element_type: u16,
    element_size: u16,
    element_count: u32,
    payload: &'a [u8],
}

pub(super) fn tag<'a>(
    name: &'a [u8; 4],
    number: u32,
    element_type: u16,
    element_size: u16,
    element_count: u32,
    payload: &'a [u8],
) -> RawTag<'a> {
    RawTag {
        name,
        number,
        element_type,
        element_size,
        element_count,
        payload,
    }
}

/// Lays out a minimal container: 128-byte header, payloads, then the directory.
pub(super) fn container(tags: &[RawTag<'_>]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut records = Vec::with_capacity(tags.len() * DIR_ENTRY_SIZE);

    for t in tags {
        let payload = t.payload;
        let field = if payload.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..payload.len()].copy_from_slice(payload);
            inline
        } else {
            let off = (HEADER_LEN + data.len()) as u32;
            data.extend_from_slice(payload);
            off.to_be_bytes()
        };
        records.extend(record(
            t.name,
            t.number,
            t.element_type,
            t.element_size,
            t.element_count,
            payload.len() as u32,
            field,
        ));
    }

    let dir_off = (HEADER_LEN + data.len()) as u32;

    let mut out = Vec::with_capacity(dir_off as usize + records.len());
    out.extend_from_slice(b"ABIF");
    out.extend_from_slice(&VERSION.to_be_bytes());
    out.extend(record(
        b"tdir",
        1,
        1023,
        DIR_ENTRY_SIZE as u16,
        tags.len() as u32,
        records.len() as u32,
        dir_off.to_be_bytes(),
    ));
    out.resize(HEADER_LEN, 0);
    out.extend_from_slice(&data);
    out.extend_from_slice(&records);
    out
}

pub(super) fn record(
    name: &[u8; 4],
    number: u32,
    element_type: u16,
    element_size: u16,
    element_count: u32,
    data_size: u32,
    field: [u8; 4],
) -> Vec<u8> {
    let mut r = Vec::with_capacity(DIR_ENTRY_SIZE);
    r.extend_from_slice(name);
    r.extend_from_slice(&number.to_be_bytes());
    r.extend_from_slice(&element_type.to_be_bytes());
    r.extend_from_slice(&element_size.to_be_bytes());
    r.extend_from_slice(&element_count.to_be_bytes());
    r.extend_from_slice(&data_size.to_be_bytes());
    r.extend_from_slice(&field);
    r.extend_from_slice(&0u32.to_be_bytes());
    r
}

pub(super) fn shorts(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}
