use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use bitreader::{BitReader, BitReaderError};
use bitvec::prelude::*;
use log::debug;

use crate::dictionary::{Vocabulary, WordRef, WordType, WILDCARD, WILDCARD_ID};
use crate::error::DecodeError;
use crate::header::Header;
use crate::source::ByteSource;

pub const NOT_CREATED: u8 = 252;
pub const WORN: u8 = 253;
pub const CARRIED: u8 = 254;
pub const HERE: u8 = 255;

/// Where an object starts the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialLocation {
    NotCreated,
    Worn,
    Carried,
    Here,
    At(u8),
}

impl From<u8> for InitialLocation {
    fn from(b: u8) -> Self {
        match b {
            NOT_CREATED => InitialLocation::NotCreated,
            WORN => InitialLocation::Worn,
            CARRIED => InitialLocation::Carried,
            HERE => InitialLocation::Here,
            n => InitialLocation::At(n),
        }
    }
}

impl Display for InitialLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            InitialLocation::NotCreated => write!(f, "{}", WILDCARD),
            InitialLocation::Worn => write!(f, "WORN"),
            InitialLocation::Carried => write!(f, "CARRIED"),
            InitialLocation::Here => write!(f, "HERE"),
            InitialLocation::At(n) => write!(f, "{}", n),
        }
    }
}

/// The packed attribute byte: worn (bit 7), container (bit 6), weight (bits 0-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub weight: u8,
    pub is_container: bool,
    pub is_wearable: bool,
}

impl Attributes {
    pub fn from_byte(byte: u8) -> Result<Attributes, BitReaderError> {
        let bytes = [byte];
        let mut br = BitReader::new(&bytes);
        let is_wearable = br.read_u8(1)? == 1;
        let is_container = br.read_u8(1)? == 1;
        let weight = br.read_u8(6)?;
        Ok(Attributes {
            weight,
            is_container,
            is_wearable,
        })
    }
}

fn attribute_error(offset: usize, e: BitReaderError) -> DecodeError {
    DecodeError::BadAttributes {
        offset,
        reason: e.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    pub index: usize,
    pub initial_location: InitialLocation,
    pub weight: u8,
    pub is_container: bool,
    pub is_wearable: bool,
    /// Only games in the new format carry these
    pub extended_attributes: Option<u16>,
    pub noun: WordRef,
    pub adjective: WordRef,
}

impl ObjectRecord {
    /// The 16 extended attribute bits, highest first
    pub fn extended_flags(&self) -> Option<[bool; 16]> {
        self.extended_attributes.map(|word| {
            let mut flags = [false; 16];
            for (flag, bit) in flags.iter_mut().zip(word.view_bits::<Msb0>().iter().by_vals()) {
                *flag = bit;
            }
            flags
        })
    }
}

fn flag(set: bool) -> &'static str {
    if set {
        "Y"
    } else {
        WILDCARD
    }
}

impl Display for ObjectRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(
            f,
            "/{} {} {} {} {}",
            self.index,
            self.initial_location,
            self.weight,
            flag(self.is_container),
            flag(self.is_wearable)
        )?;
        let flags = self.extended_flags().unwrap_or([false; 16]);
        for set in flags {
            write!(f, " {}", flag(set))?;
        }
        write!(f, " {} {}", self.noun, self.adjective)
    }
}

/// A name id of 255 means the object has none and is never looked up
fn object_word(vocab: &Vocabulary, word_type: WordType, id: u8) -> WordRef {
    if id == WILDCARD_ID {
        WordRef::none()
    } else {
        vocab.resolve(word_type, id)
    }
}

pub fn load_objects(
    src: &ByteSource,
    header: &Header,
    vocab: &Vocabulary,
) -> Result<Vec<ObjectRecord>, DecodeError> {
    let offsets = &header.offsets;
    let mut objects = Vec::with_capacity(header.num_objects as usize);

    for index in 0..header.num_objects as usize {
        let initial_location = InitialLocation::from(src.byte_at(offsets.initial_locations + index)?);

        let attr_offset = offsets.object_attrs + index;
        let attrs = Attributes::from_byte(src.byte_at(attr_offset)?)
            .map_err(|e| attribute_error(attr_offset, e))?;

        let extended_attributes = match offsets.extended_attrs {
            Some(ext) => Some(src.word_at(ext + 2 * index, header.byte_order)?),
            None => None,
        };

        let names = offsets.object_names + 2 * index;
        let noun = object_word(vocab, WordType::Noun, src.byte_at(names)?);
        let adjective = object_word(vocab, WordType::Adjective, src.byte_at(names + 1)?);

        objects.push(ObjectRecord {
            index,
            initial_location,
            weight: attrs.weight,
            is_container: attrs.is_container,
            is_wearable: attrs.is_wearable,
            extended_attributes,
            noun,
            adjective,
        });
    }
    debug!("Loaded {} objects", objects.len());
    Ok(objects)
}
