//! Source listing of a decoded game in `.SCE` or `.DSF` syntax
//!
//! Sections always come in the same order: `/CTL`, `/TOK` (compressed games
//! only), `/VOC`, `/STX`, `/MTX`, `/OTX`, `/LTX`, `/CON`, `/OBJ`, then one
//! `/PRO n` per process. DSF listings are closed by `/END`, SCE listings by
//! a comment rule.

use std::fmt::{Display, Error, Formatter};

use crate::disassembler::{Process, ProcessEntry};
use crate::game::GameFile;
use crate::text::{Message, TextStyle};

const RULE: &str = ";---------------------------------------------------------------------------";

pub struct Listing<'a> {
    game: &'a GameFile,
    style: TextStyle,
    verbose: bool,
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

impl<'a> Listing<'a> {
    pub fn new(game: &'a GameFile, style: TextStyle, verbose: bool) -> Self {
        Listing {
            game,
            style,
            verbose,
        }
    }

    fn messages(&self, f: &mut Formatter<'_>, marker: &str, messages: &[Message]) -> Result<(), Error> {
        writeln!(f, "{}", marker)?;
        for (i, msg) in messages.iter().enumerate() {
            if self.verbose {
                writeln!(f, "; {:04X}h: {}", msg.offset, hex(&msg.raw))?;
            }
            match self.style {
                TextStyle::Sce => {
                    writeln!(f, "/{}", i)?;
                    writeln!(f, "{}", msg.text)?;
                }
                TextStyle::Dsf => writeln!(f, "/{} \"{}\"", i, msg.text)?,
            }
        }
        Ok(())
    }

    fn entry(&self, f: &mut Formatter<'_>, entry: &ProcessEntry) -> Result<(), Error> {
        writeln!(f)?;
        if self.verbose {
            writeln!(
                f,
                "; entry {:04X}h, condacts {:04X}h",
                entry.offset, entry.condacts_offset
            )?;
        }
        writeln!(f, "{} {}", entry.verb, entry.noun)?;
        for condact in &entry.condacts {
            if self.verbose {
                writeln!(f, "; {:04X}h: {}", condact.offset, hex(&condact.raw_bytes()))?;
            }
            writeln!(f, " {}", condact)?;
        }
        if self.verbose && entry.synthesized_terminator {
            writeln!(f, "; no terminator in file")?;
        }
        if let Some(e) = &entry.error {
            writeln!(f, ";ERROR: {}", e)?;
        }
        Ok(())
    }

    fn process(&self, f: &mut Formatter<'_>, process: &Process) -> Result<(), Error> {
        writeln!(f, "/PRO {}", process.index)?;
        if self.verbose {
            if let Some(offset) = process.offset {
                writeln!(f, "; {:04X}h", offset)?;
            }
        }
        for entry in &process.entries {
            self.entry(f, entry)?;
        }
        if let Some(e) = &process.error {
            writeln!(f, ";ERROR: {}", e)?;
        }
        Ok(())
    }
}

impl<'a> Display for Listing<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let game = self.game;
        write!(f, "{}", game.header)?;
        writeln!(f, ";")?;

        writeln!(f, "/CTL")?;
        writeln!(f, "_")?;

        if let Some(tokens) = &game.tokens {
            writeln!(f, "/TOK")?;
            for token in tokens.iter() {
                writeln!(f, "{}", token)?;
            }
        }

        writeln!(f, "/VOC")?;
        for entry in &game.vocabulary.entries {
            writeln!(f, "{}\t\t{}\t\t{}", entry.word, entry.id, entry.word_type.name())?;
        }

        self.messages(f, "/STX", &game.system_messages)?;
        self.messages(f, "/MTX", &game.user_messages)?;
        self.messages(f, "/OTX", &game.object_texts)?;
        self.messages(f, "/LTX", &game.location_texts)?;

        writeln!(f, "/CON")?;
        for record in &game.connections {
            writeln!(f, "/{}", record.location)?;
            for exit in &record.exits {
                writeln!(f, "{}", exit)?;
            }
        }

        writeln!(f, "/OBJ")?;
        for object in &game.objects {
            writeln!(f, "{}", object)?;
        }

        for process in &game.processes {
            self.process(f, process)?;
        }

        match self.style {
            TextStyle::Sce => {
                writeln!(f)?;
                writeln!(f, "{}", RULE)
            }
            TextStyle::Dsf => writeln!(f, "/END"),
        }
    }
}
