use std::fmt::Write;

use crate::abif::structs::{
    BaseCalls, CHANNEL_LABELS, ParseResult, PeakData, Summary, TraceChannels,
};

pub const BASE_TABLE_HEADER: &str = "base_symbol\tbase_location\tbase_quality";
pub const DEFAULT_FILENAME: &str = "uploaded.ab1";

/// Tab-separated rows under [`BASE_TABLE_HEADER`], newline-joined, no trailing newline.
pub fn base_table(calls: &BaseCalls) -> String {
    let mut out = String::with_capacity(BASE_TABLE_HEADER.len() + calls.len() * 12);
    out.push_str(BASE_TABLE_HEADER);

    for ((&symbol, position), quality) in calls
        .symbols
        .iter()
        .zip(&calls.positions)
        .zip(&calls.qualities)
    {
        let _ = write!(out, "\n{}\t{position}\t{quality}", symbol as char);
    }
    out
}

pub fn assemble(filename: Option<&str>, channels: TraceChannels, calls: &BaseCalls) -> ParseResult {
    let summary = Summary {
        filename: filename.unwrap_or(DEFAULT_FILENAME).to_string(),
        base_count: calls.len(),
        trace_length: channels.length,
    };

    let peak_data = PeakData {
        length: channels.length,
        channels: CHANNEL_LABELS.iter().map(|s| s.to_string()).collect(),
        g: channels.g,
        a: channels.a,
        t: channels.t,
        c: channels.c,
    };

    ParseResult {
        summary: vec![summary],
        base_data: base_table(calls),
        peak_data,
    }
}
