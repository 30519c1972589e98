use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::charset::{daad_to_host, host_to_string};
use crate::error::DecodeError;
use crate::source::ByteSource;

/// Placeholder for "any word" and for words the vocabulary lacks
pub const WILDCARD: &str = "_";
/// Id reserved for the wildcard in every word type
pub const WILDCARD_ID: u8 = 255;
/// Directions may live in the noun table only below this id
pub const DIRECTION_NOUN_LIMIT: u8 = 20;

pub const WORD_LEN: usize = 5;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordType {
    Verb = 0,
    Adverb = 1,
    Noun = 2,
    Adjective = 3,
    Preposition = 4,
    Conjunction = 5,
    Pronoun = 6,
}

impl WordType {
    pub const ALL: [WordType; 7] = [
        WordType::Verb,
        WordType::Adverb,
        WordType::Noun,
        WordType::Adjective,
        WordType::Preposition,
        WordType::Conjunction,
        WordType::Pronoun,
    ];

    pub fn from_u8(b: u8) -> Option<WordType> {
        WordType::ALL.get(b as usize).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            WordType::Verb => "verb",
            WordType::Adverb => "adverb",
            WordType::Noun => "noun",
            WordType::Adjective => "adjective",
            WordType::Preposition => "preposition",
            WordType::Conjunction => "conjunction",
            WordType::Pronoun => "pronoun",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VocabularyEntry {
    pub word: String,
    pub id: u8,
    pub word_type: WordType,
}

/// A word id together with the word it resolved to, if any
#[derive(Debug, Clone, PartialEq)]
pub struct WordRef {
    pub id: u8,
    pub word: Option<String>,
}

impl WordRef {
    pub fn none() -> WordRef {
        WordRef {
            id: WILDCARD_ID,
            word: Some(WILDCARD.to_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.word.is_none()
    }
}

impl Display for WordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.word.as_deref().unwrap_or(WILDCARD))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    /// Every record in file order, duplicates included
    pub entries: Vec<VocabularyEntry>,
    /// Lookup by type and id, last record wins
    words: IndexMap<(WordType, u8), String>,
}

impl Vocabulary {
    /// Read the vocabulary list at `offset`, ending at a zero byte
    pub fn load(src: &mut ByteSource, offset: usize) -> Result<Vocabulary, DecodeError> {
        let mut vocab = Vocabulary::default();
        src.seek(offset);
        loop {
            let first = src.next_byte()?;
            if first == 0 {
                break;
            }
            let mut raw = [first; WORD_LEN];
            for b in raw.iter_mut().skip(1) {
                *b = src.next_byte()?;
            }
            let host: Vec<u8> = raw.iter().map(|&c| daad_to_host(c)).collect();
            let word = host_to_string(&host).replace(' ', "_");
            let id = src.next_byte()?;
            let type_byte = src.next_byte()?;
            match WordType::from_u8(type_byte) {
                Some(word_type) => vocab.insert(VocabularyEntry { word, id, word_type }),
                None => warn!("Skipping word {} ({}) with unknown type {}", word, id, type_byte),
            }
        }
        for word_type in WordType::ALL {
            vocab
                .words
                .insert((word_type, WILDCARD_ID), WILDCARD.to_string());
        }
        debug!("Vocabulary: {} words", vocab.entries.len());
        Ok(vocab)
    }

    /// Later records with the same type and id replace earlier ones
    pub fn insert(&mut self, entry: VocabularyEntry) {
        self.words
            .insert((entry.word_type, entry.id), entry.word.clone());
        self.entries.push(entry);
    }

    pub fn word(&self, word_type: WordType, id: u8) -> Option<&str> {
        self.words.get(&(word_type, id)).map(|s| s.as_str())
    }

    pub fn resolve(&self, word_type: WordType, id: u8) -> WordRef {
        let word = self.word(word_type, id).map(str::to_string);
        if word.is_none() {
            debug!("No {} with id {}", word_type.name(), id);
        }
        WordRef { id, word }
    }

    /// Verbs first; some compilers put directions in the low noun ids
    pub fn direction(&self, id: u8) -> WordRef {
        let word = self
            .word(WordType::Verb, id)
            .or_else(|| {
                if id < DIRECTION_NOUN_LIMIT {
                    self.word(WordType::Noun, id)
                } else {
                    None
                }
            })
            .map(str::to_string);
        if word.is_none() {
            debug!("No direction word with id {}", id);
        }
        WordRef { id, word }
    }
}
