use std::collections::HashMap;
use std::fmt::{Display, Error, Formatter};

use crate::source::ByteOrder;

/// Machines a DDB file can be compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Pc,
    Zx,
    C64,
    Cpc,
    Msx,
    St,
    Amiga,
    Pcw,
    Msx2,
}

lazy_static! {
    /// Load address of the DDB in each machine's memory. Section pointers
    /// are stored as machine addresses and rebased with this.
    static ref BASE_ADDRESSES: HashMap<Target, u16> = {
        let mut m = HashMap::new();
        m.insert(Target::Pc, 0);
        m.insert(Target::Zx, 0x8400);
        m.insert(Target::Msx, 0x0100);
        m.insert(Target::Cpc, 0x2880);
        m.insert(Target::Pcw, 0x7080);
        m.insert(Target::C64, 0x3880);
        m
    };
}

impl Target {
    /// Machine id from the high nibble of the machine/language byte
    pub fn from_machine_id(id: u8) -> Option<Target> {
        match id {
            0 => Some(Target::Pc),
            1 => Some(Target::Zx),
            2 => Some(Target::C64),
            3 => Some(Target::Cpc),
            4 => Some(Target::Msx),
            5 => Some(Target::St),
            6 => Some(Target::Amiga),
            7 => Some(Target::Pcw),
            8 => Some(Target::Msx2),
            _ => None,
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Target::Pc => "PC",
            Target::Zx => "ZX",
            Target::C64 => "C64",
            Target::Cpc => "CPC",
            Target::Msx => "MSX",
            Target::St => "ST",
            Target::Amiga => "AMIGA",
            Target::Pcw => "PCW",
            Target::Msx2 => "MSX2",
        }
    }

    pub fn base_address(&self) -> u16 {
        BASE_ADDRESSES.get(self).copied().unwrap_or(0)
    }

    /// Only the 68000 machines store words little-endian
    pub fn byte_order(&self) -> ByteOrder {
        match self {
            Target::St | Target::Amiga => ByteOrder::Little,
            _ => ByteOrder::Big,
        }
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.short_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Spanish,
    Unknown(u8),
}

impl Language {
    pub fn from_id(id: u8) -> Language {
        match id {
            0 => Language::English,
            1 => Language::Spanish,
            n => Language::Unknown(n),
        }
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Language::English => write!(f, "English"),
            Language::Spanish => write!(f, "Spanish"),
            Language::Unknown(n) => write!(f, "unknown ({})", n),
        }
    }
}
