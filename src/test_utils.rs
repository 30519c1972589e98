// Test utilities for assembling synthetic DDB images without a real game file
use crate::dictionary::WordType;
use crate::header::{NEW_HEADER_LEN, OLD_HEADER_LEN};
use crate::source::ByteOrder;

/// Header pointer slots in file order
pub const TOKENS: usize = 0;
pub const PROCESSES: usize = 1;
pub const OBJECTS: usize = 2;
pub const LOCATIONS: usize = 3;
pub const USER_MESSAGES: usize = 4;
pub const SYSTEM_MESSAGES: usize = 5;
pub const CONNECTIONS: usize = 6;
pub const VOCABULARY: usize = 7;
pub const INITIAL_LOCATIONS: usize = 8;
pub const OBJECT_NAMES: usize = 9;
pub const OBJECT_ATTRS: usize = 10;
pub const EXTENDED_ATTRS: usize = 11;

pub struct DdbImage {
    pub bytes: Vec<u8>,
    order: ByteOrder,
    base: u16,
    extended: bool,
}

impl DdbImage {
    pub fn new(version: u8, machine_byte: u8, order: ByteOrder, base: u16, extended: bool) -> Self {
        let len = if extended { NEW_HEADER_LEN } else { OLD_HEADER_LEN };
        let mut bytes = vec![0u8; len];
        bytes[0] = version;
        bytes[1] = machine_byte;
        bytes[2] = 0x5F;
        DdbImage {
            bytes,
            order,
            base,
            extended,
        }
    }

    /// Machine address the next appended byte will land at
    pub fn addr(&self) -> u16 {
        self.bytes.len() as u16 + self.base
    }

    pub fn word(&self, value: u16) -> [u8; 2] {
        match self.order {
            ByteOrder::Big => value.to_be_bytes(),
            ByteOrder::Little => value.to_le_bytes(),
        }
    }

    pub fn append(&mut self, data: &[u8]) -> u16 {
        let at = self.addr();
        self.bytes.extend_from_slice(data);
        at
    }

    pub fn append_words(&mut self, words: &[u16]) -> u16 {
        let at = self.addr();
        for &w in words {
            let bytes = self.word(w);
            self.bytes.extend_from_slice(&bytes);
        }
        at
    }

    /// Counts: 0 objects, 1 locations, 2 user messages, 3 system messages, 4 processes
    pub fn set_count(&mut self, index: usize, value: u8) {
        self.bytes[3 + index] = value;
    }

    pub fn set_pointer(&mut self, slot: usize, value: u16) {
        let at = 8 + slot * 2;
        let bytes = self.word(value);
        self.bytes[at..at + 2].copy_from_slice(&bytes);
    }

    /// Write the file length field and hand back the image
    pub fn finish(mut self) -> Vec<u8> {
        let length = self.addr();
        let at = if self.extended { 32 } else { 30 };
        let bytes = self.word(length);
        self.bytes[at..at + 2].copy_from_slice(&bytes);
        self.bytes
    }
}

/// Encode host text as a DAAD message, terminator included
pub fn encode_text(text: &str) -> Vec<u8> {
    text.bytes()
        .map(|b| 255 - b)
        .chain(std::iter::once(0xF5))
        .collect()
}

/// One 7-byte vocabulary record; `word` is padded to five characters
pub fn vocab_entry(word: &str, id: u8, word_type: WordType) -> Vec<u8> {
    let mut padded: Vec<u8> = word.bytes().take(5).collect();
    padded.resize(5, b' ');
    let mut out: Vec<u8> = padded.into_iter().map(|b| 255 - b).collect();
    out.push(id);
    out.push(word_type as u8);
    out
}

/// A complete game: one object, one location, no messages, no processes
pub fn minimal_game(version: u8, machine_byte: u8, order: ByteOrder, base: u16, extended: bool) -> Vec<u8> {
    let mut img = DdbImage::new(version, machine_byte, order, base, extended);

    let mut vocab = vocab_entry("NORTH", 2, WordType::Noun);
    vocab.extend(vocab_entry("LAMP", 50, WordType::Noun));
    vocab.extend(vocab_entry("BRASS", 3, WordType::Adjective));
    vocab.push(0);
    let vocab_addr = img.append(&vocab);

    let obj_text = img.append(&encode_text("A brass lamp"));
    let loc_text = img.append(&encode_text("A dark room"));
    let obj_lookup = img.append_words(&[obj_text]);
    let loc_lookup = img.append_words(&[loc_text]);

    let exits = img.append(&[2, 0, 0xFF]);
    let con_lookup = img.append_words(&[exits]);

    let initial = img.append(&[254]);
    let names = img.append(&[50, 3]);
    let attrs = img.append(&[0xC5]);

    img.set_count(0, 1);
    img.set_count(1, 1);
    img.set_pointer(PROCESSES, vocab_addr);
    img.set_pointer(OBJECTS, obj_lookup);
    img.set_pointer(LOCATIONS, loc_lookup);
    img.set_pointer(USER_MESSAGES, vocab_addr);
    img.set_pointer(SYSTEM_MESSAGES, vocab_addr);
    img.set_pointer(CONNECTIONS, con_lookup);
    img.set_pointer(VOCABULARY, vocab_addr);
    img.set_pointer(INITIAL_LOCATIONS, initial);
    img.set_pointer(OBJECT_NAMES, names);
    img.set_pointer(OBJECT_ATTRS, attrs);
    if extended {
        let ext = img.append_words(&[0x8001]);
        img.set_pointer(EXTENDED_ATTRS, ext);
    }
    img.finish()
}
