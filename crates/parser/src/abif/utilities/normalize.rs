use crate::abif::structs::{BaseCalls, TraceChannels};

/// Flat fallback for missing or short quality arrays. Not a calibrated value.
pub const DEFAULT_QUALITY: i32 = 30;

/// Cuts G, A, T, C to the shortest non-empty channel. Empty channels stay empty.
pub fn normalize_channels(channels: [Vec<i32>; 4]) -> TraceChannels {
    let length = channels
        .iter()
        .map(Vec::len)
        .filter(|&n| n > 0)
        .min()
        .unwrap_or(0);

    let [mut g, mut a, mut t, mut c] = channels;
    for ch in [&mut g, &mut a, &mut t, &mut c] {
        ch.truncate(length);
    }

    TraceChannels { g, a, t, c, length }
}

/// Keeps ASCII letters only, upper-cased. IUPAC ambiguity codes survive.
#[inline]
pub fn filter_base_symbols(raw: &[u8]) -> Vec<u8> {
    raw.iter()
        .filter(|b| b.is_ascii_alphabetic())
        .map(u8::to_ascii_uppercase)
        .collect()
}

/// Quality data shorter than the call count is dropped wholesale, not padded.
pub fn normalize_base_calls(
    raw_symbols: &[u8],
    mut positions: Vec<i32>,
    mut qualities: Vec<i32>,
) -> BaseCalls {
    let mut symbols = filter_base_symbols(raw_symbols);
    let n_base = symbols.len().min(positions.len());

    symbols.truncate(n_base);
    positions.truncate(n_base);

    if qualities.len() >= n_base {
        qualities.truncate(n_base);
    } else {
        qualities = vec![DEFAULT_QUALITY; n_base];
    }

    BaseCalls {
        symbols,
        positions,
        qualities,
    }
}
