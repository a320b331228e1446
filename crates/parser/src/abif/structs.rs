use serde::{Deserialize, Serialize};

pub const CHANNEL_LABELS: [&str; 4] = ["G", "A", "T", "C"];

/// Four intensity channels cut to a common length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceChannels {
    pub g: Vec<i32>,
    pub a: Vec<i32>,
    pub t: Vec<i32>,
    pub c: Vec<i32>,
    pub length: usize,
}

/// Parallel per-base arrays of equal length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BaseCalls {
    pub symbols: Vec<u8>,
    pub positions: Vec<i32>,
    pub qualities: Vec<i32>,
}

impl BaseCalls {
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// JSON envelope handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParseResult {
    pub summary: Vec<Summary>,
    #[serde(rename = "baseData")]
    pub base_data: String,
    #[serde(rename = "peakData")]
    pub peak_data: PeakData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Summary {
    #[serde(rename = "file name")]
    pub filename: String,
    #[serde(rename = "base count")]
    pub base_count: usize,
    #[serde(rename = "trace length")]
    pub trace_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PeakData {
    pub length: usize,
    pub channels: Vec<String>,
    #[serde(rename = "G")]
    pub g: Vec<i32>,
    #[serde(rename = "A")]
    pub a: Vec<i32>,
    #[serde(rename = "T")]
    pub t: Vec<i32>,
    #[serde(rename = "C")]
    pub c: Vec<i32>,
}
