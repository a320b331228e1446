use log::{debug, info};

use crate::{
    abif::{
        structs::ParseResult,
        utilities::{
            Directory, Header, TraceField,
            assemble::assemble,
            normalize::{normalize_base_calls, normalize_channels},
            parse_directory, parse_header, resolve,
        },
    },
    error::Result,
};

/// Decodes a complete AB1 file into trace channels and base calls.
///
/// Only a bad signature or a directory that does not fit the buffer fails the
/// parse. Missing or unreadable tags degrade to empty arrays and default
/// qualities, so any file with a valid header and directory yields a result.
pub fn parse_ab1(bytes: &[u8], filename: Option<&str>) -> Result<ParseResult> {
    let (header, directory) = read_directory(bytes)?;
    debug!(
        "ABIF version {} with {} directory entries",
        header.version,
        directory.len()
    );

    let channels = normalize_channels(
        TraceField::CHANNELS.map(|field| resolve(&directory, bytes, field).into_integers()),
    );

    let symbols = resolve(&directory, bytes, TraceField::BaseCalls).into_bytes();
    let positions = resolve(&directory, bytes, TraceField::BasePositions).into_integers();
    let qualities = resolve(&directory, bytes, TraceField::BaseQualities).into_integers();
    let calls = normalize_base_calls(&symbols, positions, qualities);

    info!(
        "{}: {} bases, trace length {}",
        filename.unwrap_or("<unnamed>"),
        calls.len(),
        channels.length
    );

    Ok(assemble(filename, channels, &calls))
}

pub fn read_directory(bytes: &[u8]) -> Result<(Header, Directory)> {
    let header = parse_header(bytes)?;
    let directory = parse_directory(bytes, &header)?;
    Ok((header, directory))
}
