//! Byte-level input navigation shared by the parsers

pub mod cursor;

pub use cursor::Cursor;
