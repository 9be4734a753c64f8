//! Translating between a [`Header`](crate::schema::Header) and its textual
//! representation.
//!
//! # Notes on the format
//!
//! - The PLY format description says "The header is a series of
//!   carriage-return terminated lines", but basically all files in the wild
//!   use `'\n'`. We write `'\n'` and accept `"\r\n"` when reading.
//! - Comments may appear anywhere between `ply` and `end_header`, including
//!   before the `format` line. They are always written directly after the
//!   `format` line.

mod parse;
mod write;


pub(crate) use self::{
    parse::read_header,
    write::write_header,
};
