use super::{HEADER_LEN, container, shorts, tag};
use crate::{
    abif::utilities::{
        Directory, DirectoryEntry, EntryData, TagKey, parse_directory, parse_header,
    },
    error::AbifError,
};

fn directory(bytes: &[u8]) -> Result<Directory, AbifError> {
    let header = parse_header(bytes)?;
    parse_directory(bytes, &header)
}

#[test]
fn enumerates_entries_in_order() {
    let trace = shorts(&[1, 2, 3, 4, 5]);
    let bytes = container(&[
        tag(b"DATA", 9, 4, 2, 5, &trace),
        tag(b"PBAS", 1, 2, 1, 3, b"ACG"),
        tag(b"SMPL", 1, 18, 1, 6, b"\x05well1"),
    ]);
    let dir = directory(&bytes).expect("parse_directory failed");

    assert_eq!(dir.len(), 3);
    let keys: Vec<String> = dir.entries().iter().map(|e| e.key().to_string()).collect();
    assert_eq!(keys, ["DATA9", "PBAS1", "SMPL1"]);

    let data9 = dir.get(TagKey::new(b"DATA", 9)).expect("DATA9");
    assert_eq!(data9.element_type, 4);
    assert_eq!(data9.element_size, 2);
    assert_eq!(data9.element_count, 5);
    assert_eq!(data9.data_size, 10);
    assert_eq!(data9.data, EntryData::Offset(HEADER_LEN as u32));
    assert_eq!(data9.tag_name_str(), "DATA");

    assert!(dir.get(TagKey::new(b"DATA", 1)).is_none());
}

#[test]
fn small_payloads_are_inline() {
    let bytes = container(&[
        tag(b"PBAS", 1, 2, 1, 3, b"ACG"),
        tag(b"PCON", 1, 2, 1, 4, b"\x0a\x14\x1e\x28"),
    ]);
    let dir = directory(&bytes).unwrap();

    let pbas = dir.get(TagKey::new(b"PBAS", 1)).unwrap();
    assert_eq!(pbas.data, EntryData::Inline([b'A', b'C', b'G', 0]));

    let pcon = dir.get(TagKey::new(b"PCON", 1)).unwrap();
    assert_eq!(pcon.data, EntryData::Inline([10, 20, 30, 40]));
}

#[test]
fn directory_past_end_is_malformed() {
    let trace = shorts(&[7; 8]);
    let mut bytes = container(&[
        tag(b"DATA", 1, 4, 2, 8, &trace),
        tag(b"PBAS", 1, 2, 1, 2, b"AC"),
    ]);
    bytes.truncate(bytes.len() - 10);

    let err = directory(&bytes).unwrap_err();
    assert!(matches!(err, AbifError::MalformedContainer(_)), "{err:?}");
}

#[test]
fn directory_offset_past_end_is_malformed() {
    let mut bytes = container(&[tag(b"PBAS", 1, 2, 1, 2, b"AC")]);
    // root entry starts at 6, its data offset field at +20
    bytes[26..30].copy_from_slice(&u32::MAX.to_be_bytes());

    assert!(matches!(
        directory(&bytes),
        Err(AbifError::MalformedContainer(_))
    ));
}

#[test]
fn entry_count_is_clamped_to_data_size() {
    let mut bytes = container(&[
        tag(b"PBAS", 1, 2, 1, 2, b"AC"),
        tag(b"PBAS", 2, 2, 1, 2, b"GT"),
    ]);
    // root element_count lives at 6 + 12
    bytes[18..22].copy_from_slice(&50u32.to_be_bytes());

    let dir = directory(&bytes).expect("clamped directory");
    assert_eq!(dir.len(), 2);
}

#[test]
fn empty_directory() {
    let dir = directory(&container(&[])).unwrap();
    assert!(dir.is_empty());
}

#[test]
fn later_duplicate_shadows_earlier() {
    let entry = |count: u32| DirectoryEntry {
        tag_name: *b"PLOC",
        tag_number: 2,
        element_type: 4,
        element_size: 2,
        element_count: count,
        data_size: count * 2,
        data: EntryData::Inline([0; 4]),
        data_handle: 0,
    };
    let dir = Directory::from_entries(vec![entry(1), entry(2)]);

    assert_eq!(dir.len(), 2);
    assert_eq!(dir.get(TagKey::new(b"PLOC", 2)).unwrap().element_count, 2);
}
