use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use log::debug;

use crate::dictionary::{Vocabulary, WordRef};
use crate::error::DecodeError;
use crate::header::Header;
use crate::source::ByteSource;

/// Ends the exit list of a location
pub const END_OF_EXITS: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq)]
pub struct Exit {
    pub direction: WordRef,
    pub destination: u8,
}

impl Display for Exit {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{} {}", self.direction, self.destination)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionRecord {
    pub location: usize,
    pub exits: Vec<Exit>,
}

/// Exits for every location, read through the connections lookup table
pub fn load_connections(
    src: &mut ByteSource,
    header: &Header,
    vocab: &Vocabulary,
) -> Result<Vec<ConnectionRecord>, DecodeError> {
    let lookup = header.offsets.connections_lookup;
    let base = header.base_address;
    let mut records = Vec::with_capacity(header.num_locations as usize);

    for location in 0..header.num_locations as usize {
        let address = src.word_at(lookup + 2 * location, header.byte_order)?;
        let offset = address
            .checked_sub(base)
            .ok_or(DecodeError::BadPointer { address, base })?;
        src.seek(offset as usize);

        let mut exits = Vec::new();
        loop {
            let direction = src.next_byte()?;
            if direction == END_OF_EXITS {
                break;
            }
            let destination = src.next_byte()?;
            exits.push(Exit {
                direction: vocab.direction(direction),
                destination,
            });
        }
        debug!("location {}: {} exits", location, exits.len());
        records.push(ConnectionRecord { location, exits });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::WordType;
    use crate::source::ByteOrder;
    use crate::test_utils::{minimal_game, vocab_entry, DdbImage, CONNECTIONS, VOCABULARY};

    #[test]
    fn test_minimal_game_exit() {
        let bytes = minimal_game(2, 0x10, ByteOrder::Big, 0x8400, true);
        let mut src = ByteSource::new(&bytes, 0).unwrap();
        let header = Header::decode(&src).unwrap();
        let vocab = Vocabulary::load(&mut src, header.offsets.vocabulary).unwrap();
        let records = load_connections(&mut src, &header, &vocab).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].exits.len(), 1);
        assert_eq!(records[0].exits[0].to_string(), "NORTH 0");
    }

    #[test]
    fn test_exits_resolve_against_verbs_then_low_nouns() {
        let mut img = DdbImage::new(2, 0x00, ByteOrder::Big, 0, true);
        let mut vocab = vocab_entry("SOUTH", 3, WordType::Verb);
        vocab.extend(vocab_entry("EAST", 4, WordType::Noun));
        vocab.extend(vocab_entry("TORCH", 30, WordType::Noun));
        vocab.push(0);
        let vocab_addr = img.append(&vocab);
        let first = img.append(&[3, 1, 4, 1, 0xFF]);
        let second = img.append(&[30, 0, 0xFF]);
        let lookup = img.append_words(&[first, second]);
        img.set_count(1, 2);
        img.set_pointer(VOCABULARY, vocab_addr);
        img.set_pointer(CONNECTIONS, lookup);
        let bytes = img.finish();

        let mut src = ByteSource::new(&bytes, 0).unwrap();
        let header = Header::decode(&src).unwrap();
        let vocab = Vocabulary::load(&mut src, header.offsets.vocabulary).unwrap();
        let records = load_connections(&mut src, &header, &vocab).unwrap();

        let first: Vec<String> = records[0].exits.iter().map(|e| e.to_string()).collect();
        assert_eq!(first, ["SOUTH 1", "EAST_ 1"]);
        // id 30 is a noun but too high to be a direction
        assert!(records[1].exits[0].direction.is_missing());
        assert_eq!(records[1].exits[0].to_string(), "_ 0");
    }

    #[test]
    fn test_lookup_below_base() {
        let mut img = DdbImage::new(2, 0x10, ByteOrder::Big, 0x8400, true);
        let vocab_addr = img.append(&[0]);
        let lookup = img.append_words(&[0x0010]);
        img.set_count(1, 1);
        for slot in 1..=11 {
            img.set_pointer(slot, vocab_addr);
        }
        img.set_pointer(CONNECTIONS, lookup);
        let bytes = img.finish();

        let mut src = ByteSource::new(&bytes, 0).unwrap();
        let header = Header::decode(&src).unwrap();
        let vocab = Vocabulary::default();
        assert_eq!(
            load_connections(&mut src, &header, &vocab).unwrap_err(),
            DecodeError::BadPointer {
                address: 0x0010,
                base: 0x8400
            }
        );
    }
}
