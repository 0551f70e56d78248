//! Positional little-endian codec for fixed-layout flash records.
//!
//! The on-flash format has no field tagging: every field sits at the byte
//! offset implied by declaration order and its fixed width. These cursors
//! keep encode and decode in lockstep with that layout.

mod macros;
mod reader;
mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;
