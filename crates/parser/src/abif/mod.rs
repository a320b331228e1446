pub mod decode;
pub use decode::{parse_ab1, read_directory};
pub mod structs;
pub mod utilities;

