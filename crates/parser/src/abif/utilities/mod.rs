pub mod assemble;
pub mod decode_value;
pub mod normalize;
pub mod parse_directory;
pub mod parse_header;
pub mod reader;
pub mod resolve_tag;

pub use decode_value::{DecodedValue, ElementType, decode_value};
pub use parse_directory::{Directory, DirectoryEntry, EntryData, TagKey, parse_directory};
pub use parse_header::{Header, parse_header};
pub use resolve_tag::{TraceField, resolve};

#[cfg(test)]
mod tests;
