#[macro_use]
extern crate lazy_static;

pub mod charset;
pub mod config;
pub mod connections;
pub mod dictionary;
pub mod disassembler;
pub mod error;
pub mod game;
pub mod header;
pub mod instruction;
pub mod listing;
pub mod machine;
pub mod object;
pub mod opcode_tables;
pub mod source;
pub mod text;
pub mod tokens;

#[cfg(test)]
mod test_utils;

/*
Layout of a small new-format game, ZX Spectrum (base 8400h)
        8400    header (34 bytes)
        8422    tokens (optional)
                vocabulary
                message and text lookup tables, texts
                connections
                initial locations, object names, attributes
                extended attributes (new format only)
                process tables and condact lists
*/
