pub mod abif;
pub use abif::{
    parse_ab1, read_directory,
    structs::*,
    utilities::{
        DecodedValue, Directory, DirectoryEntry, ElementType, EntryData, Header, TagKey,
    },
};
pub mod error;
pub use error::{AbifError, Result};
