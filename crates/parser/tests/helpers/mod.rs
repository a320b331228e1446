pub mod container;

use std::{fs, path::PathBuf};

pub fn read_bytes(path: &str) -> Vec<u8> {
    let full = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path);
    fs::read(&full).unwrap_or_else(|e| panic!("cannot read {:?}: {}", full, e))
}

/// G, A, T, C = 120, 118, 120, 120 points, 40 calls and positions, no PCON.
/// `data/ab1/tiny_3730.ab1` holds the same container.
#[allow(dead_code)]
pub fn scenario_3730() -> container::AbifBuilder {
    let ramp = |base: i16, n: i16| -> Vec<i16> { (0..n).map(|i| base + i).collect() };

    container::AbifBuilder::new()
        .shorts(b"DATA", 1, &[-1; 50])
        .shorts(b"DATA", 2, &[-1; 50])
        .shorts(b"DATA", 3, &[-1; 50])
        .shorts(b"DATA", 4, &[-1; 50])
        .shorts(b"DATA", 9, &ramp(0, 120))
        .shorts(b"DATA", 10, &ramp(1000, 118))
        .shorts(b"DATA", 11, &ramp(2000, 120))
        .shorts(b"DATA", 12, &ramp(3000, 120))
        .chars(b"PBAS", 1, &b"acgt".repeat(10))
        .chars(b"PBAS", 2, &b"ACGT".repeat(10))
        .shorts(b"PLOC", 2, &(0..40).map(|i| i * 3 + 1).collect::<Vec<i16>>())
        .pstring(b"SMPL", 1, b"tiny")
        .chars(b"MODL", 1, b"3730")
}
