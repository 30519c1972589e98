use log::{debug, warn};

use crate::dictionary::{Vocabulary, WordRef, WordType, WILDCARD_ID};
use crate::error::DecodeError;
use crate::header::Header;
use crate::instruction::Instruction;
use crate::opcode_tables::CondactTable;
use crate::source::{ByteOrder, ByteSource};

/// Ends a condact list
pub const END_OF_CONDACTS: u8 = 0xFF;
/// A verb byte of zero ends a process table
pub const END_OF_PROCESS: u8 = 0;
/// verb, noun, condact list pointer
pub const ENTRY_SIZE: usize = 4;

/// One verb/noun line of a process table with its condacts
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessEntry {
    /// File offset of the 4-byte entry
    pub offset: usize,
    pub verb: WordRef,
    pub noun: WordRef,
    pub condacts_offset: usize,
    pub condacts: Vec<Instruction>,
    /// The list ended on a terminal condact with no 0xFF after it
    pub synthesized_terminator: bool,
    /// Why the rest of the condact list was abandoned
    pub error: Option<DecodeError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub index: usize,
    /// File offset of the process table
    pub offset: Option<usize>,
    pub entries: Vec<ProcessEntry>,
    /// Why the rest of the process table was abandoned
    pub error: Option<DecodeError>,
}

struct CondactList {
    condacts: Vec<Instruction>,
    synthesized_terminator: bool,
    error: Option<DecodeError>,
}

pub struct Disassembler<'a> {
    table: CondactTable,
    vocab: &'a Vocabulary,
    quirk_terminators: &'a [u8],
    byte_order: ByteOrder,
    base: u16,
    process_list: usize,
    num_processes: u8,
}

impl<'a> Disassembler<'a> {
    pub fn new(header: &Header, vocab: &'a Vocabulary, quirk_terminators: &'a [u8]) -> Self {
        let table = CondactTable::for_format(header.is_old_format);
        if table.is_legacy() {
            debug!("Old format: condacts 56-59 are the COPY family");
        }
        Disassembler {
            table,
            vocab,
            quirk_terminators,
            byte_order: header.byte_order,
            base: header.base_address,
            process_list: header.offsets.process_list,
            num_processes: header.num_processes,
        }
    }

    /// Every process in the game. Errors stay inside the process they hit.
    pub fn disassemble_all(&self, src: &mut ByteSource) -> Vec<Process> {
        (0..self.num_processes as usize)
            .map(|index| self.disassemble_process(src, index))
            .collect()
    }

    pub fn disassemble_process(&self, src: &mut ByteSource, index: usize) -> Process {
        let mut process = Process {
            index,
            offset: None,
            entries: Vec::new(),
            error: None,
        };

        let table = match self.pointer(src, self.process_list + 2 * index) {
            Ok(t) => t,
            Err(e) => {
                warn!("Process {}: {}", index, e);
                process.error = Some(e);
                return process;
            }
        };
        process.offset = Some(table);

        for k in 0.. {
            match self.read_entry(src, table + ENTRY_SIZE * k) {
                Ok(Some(entry)) => process.entries.push(entry),
                Ok(None) => break,
                Err(e) => {
                    warn!("Process {} entry {}: {}", index, k, e);
                    process.error = Some(e);
                    break;
                }
            }
        }
        debug!("Process {}: {} entries", index, process.entries.len());
        process
    }

    fn pointer(&self, src: &ByteSource, at: usize) -> Result<usize, DecodeError> {
        let address = src.word_at(at, self.byte_order)?;
        address
            .checked_sub(self.base)
            .map(|a| a as usize)
            .ok_or(DecodeError::BadPointer {
                address,
                base: self.base,
            })
    }

    fn read_entry(&self, src: &mut ByteSource, offset: usize) -> Result<Option<ProcessEntry>, DecodeError> {
        let verb_id = src.byte_at(offset)?;
        if verb_id == END_OF_PROCESS {
            return Ok(None);
        }
        let noun_id = src.byte_at(offset + 1)?;
        let condacts_offset = self.pointer(src, offset + 2)?;

        let verb = if verb_id == WILDCARD_ID {
            WordRef::none()
        } else {
            self.vocab.direction(verb_id)
        };
        let noun = if noun_id == WILDCARD_ID {
            WordRef::none()
        } else {
            self.vocab.resolve(WordType::Noun, noun_id)
        };

        let list = self.disassemble_condacts(src, condacts_offset);
        Ok(Some(ProcessEntry {
            offset,
            verb,
            noun,
            condacts_offset,
            condacts: list.condacts,
            synthesized_terminator: list.synthesized_terminator,
            error: list.error,
        }))
    }

    fn disassemble_condacts(&self, src: &mut ByteSource, offset: usize) -> CondactList {
        let mut list = CondactList {
            condacts: Vec::new(),
            synthesized_terminator: false,
            error: None,
        };
        src.seek(offset);

        loop {
            match src.peek_byte() {
                Ok(END_OF_CONDACTS) => {
                    src.skip(1);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    list.error = Some(e);
                    break;
                }
            }
            let ins = match Instruction::decode(src, &self.table, self.vocab) {
                Ok(ins) => ins,
                Err(e) => {
                    warn!("Condact list at {:#06x} abandoned: {}", offset, e);
                    list.error = Some(e);
                    break;
                }
            };
            let terminal = self.quirk_terminators.contains(&ins.opcode);
            list.condacts.push(ins);
            if terminal && src.peek_byte().ok() != Some(END_OF_CONDACTS) {
                // next byte belongs to whatever follows; leave it unread
                debug!(
                    "No terminator after {} at {:#06x}, assuming one",
                    list.condacts[list.condacts.len() - 1].mnemonic,
                    src.position()
                );
                list.synthesized_terminator = true;
                break;
            }
        }
        list
    }
}
