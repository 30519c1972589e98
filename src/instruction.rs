use std::fmt::{Display, Error, Formatter};

use log::trace;

use crate::dictionary::{Vocabulary, WordRef};
use crate::error::DecodeError;
use crate::opcode_tables::{param_word_type, CondactTable};
use crate::source::ByteSource;

/// Bit 7 of the opcode byte marks the first parameter as indirect
pub const INDIRECT_FLAG: u8 = 0x80;

/// A condact parameter as it should be shown
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(u8),
    /// Flag number holding the real value
    Indirect(u8),
    Word(WordRef),
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Operand::Value(v) => write!(f, "{}", v),
            Operand::Indirect(v) => write!(f, "[{}]", v),
            Operand::Word(w) => write!(f, "{}", w),
        }
    }
}

/// A decoded condact
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// File offset of the opcode byte
    pub offset: usize,
    /// Code with the indirection bit removed
    pub opcode: u8,
    pub indirect: bool,
    pub mnemonic: &'static str,
    /// Raw parameter bytes, exactly as many as the condact's arity
    pub params: Vec<u8>,
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Decode the condact at the current position. The caller has already
    /// checked the opcode byte is not the end-of-list marker.
    pub fn decode(
        src: &mut ByteSource,
        table: &CondactTable,
        vocab: &Vocabulary,
    ) -> Result<Instruction, DecodeError> {
        let offset = src.position();
        let byte = src.next_byte()?;
        let indirect = byte & INDIRECT_FLAG != 0;
        let opcode = byte & !INDIRECT_FLAG;
        let condact = table
            .get(opcode)
            .ok_or(DecodeError::UnknownOpcode { opcode, offset })?;

        let mut params = Vec::with_capacity(condact.arity as usize);
        for _ in 0..condact.arity {
            params.push(src.next_byte()?);
        }

        let operands = params
            .iter()
            .enumerate()
            .map(|(i, &value)| match param_word_type(opcode, i) {
                Some(word_type) => Operand::Word(vocab.resolve(word_type, value)),
                None if indirect && i == 0 => Operand::Indirect(value),
                None => Operand::Value(value),
            })
            .collect();

        trace!("{:#06x}: {} {:?}", offset, condact.name, params);
        Ok(Instruction {
            offset,
            opcode,
            indirect,
            mnemonic: condact.name,
            params,
            operands,
        })
    }

    pub fn raw_bytes(&self) -> Vec<u8> {
        let first = if self.indirect {
            self.opcode | INDIRECT_FLAG
        } else {
            self.opcode
        };
        std::iter::once(first)
            .chain(self.params.iter().copied())
            .collect()
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.mnemonic)?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{VocabularyEntry, WordType};

    fn vocab() -> Vocabulary {
        let mut v = Vocabulary::default();
        v.insert(VocabularyEntry {
            word: "BRASS".to_string(),
            id: 3,
            word_type: WordType::Adjective,
        });
        v.insert(VocabularyEntry {
            word: "GET__".to_string(),
            id: 20,
            word_type: WordType::Verb,
        });
        v.insert(VocabularyEntry {
            word: "LAMP_".to_string(),
            id: 50,
            word_type: WordType::Noun,
        });
        v
    }

    fn decode(bytes: &[u8], legacy: bool) -> (Instruction, usize) {
        let mut src = ByteSource::new(bytes, 0).unwrap();
        let table = CondactTable::for_format(legacy);
        let ins = Instruction::decode(&mut src, &table, &vocab()).unwrap();
        (ins, src.position())
    }

    #[test]
    fn test_arity_two_consumes_terminator_values() {
        let (ins, pos) = decode(&[13, 0xFF, 0xFF, 0xFF], false);
        assert_eq!(ins.mnemonic, "EQ");
        assert_eq!(ins.params, [0xFF, 0xFF]);
        assert_eq!(pos, 3);
        assert_eq!(ins.to_string(), "EQ 255 255");
    }

    #[test]
    fn test_indirect_flag() {
        let (ins, pos) = decode(&[0x90, 3], false);
        assert_eq!(ins.opcode, 16);
        assert!(ins.indirect);
        assert_eq!(pos, 2);
        // word parameters render as words even when indirect
        assert_eq!(ins.to_string(), "ADJECT1 BRASS");
        assert_eq!(ins.raw_bytes(), [0x90, 3]);
    }

    #[test]
    fn test_indirect_first_parameter_only() {
        let (ins, _) = decode(&[0x80 | 46, 7, 9], false);
        assert_eq!(ins.mnemonic, "PLACE");
        assert_eq!(ins.operands, [Operand::Indirect(7), Operand::Value(9)]);
        assert_eq!(ins.to_string(), "PLACE [7] 9");
    }

    #[test]
    fn test_synonym_words() {
        let (ins, _) = decode(&[36, 20, 50], false);
        assert_eq!(ins.to_string(), "SYNONYM GET__ LAMP_");
        let (ins, _) = decode(&[36, 255, 99], false);
        assert_eq!(ins.to_string(), "SYNONYM _ _");
        assert!(matches!(&ins.operands[1], Operand::Word(w) if w.is_missing()));
    }

    #[test]
    fn test_legacy_table() {
        let (ins, pos) = decode(&[56, 1, 2], true);
        assert_eq!(ins.to_string(), "COPYOF 1 2");
        assert_eq!(pos, 3);
        let (ins, pos) = decode(&[56, 1, 2], false);
        assert_eq!(ins.to_string(), "SETCO 1");
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_truncated_parameters() {
        let mut src = ByteSource::new(&[13, 1], 0).unwrap();
        let table = CondactTable::for_format(false);
        assert_eq!(
            Instruction::decode(&mut src, &table, &vocab()).unwrap_err(),
            DecodeError::OutOfBounds { offset: 2, len: 2 }
        );
    }
}
