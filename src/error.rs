// Decoder Error Handling

use std::fmt;
use std::io;

/// Header fields inconsistent with the file. Always fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    TooShort { len: usize, needed: usize },
    OffsetBeyondFile { offset: usize, len: usize },
    LengthMismatch { declared: u16, base: u16, actual: usize },
    PointerBelowBase { field: &'static str, address: u16, base: u16 },
}

/// Problems found while walking the body of the file.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    OutOfBounds { offset: usize, len: usize },
    UnknownOpcode { opcode: u8, offset: usize },
    BadPointer { address: u16, base: u16 },
    BadAttributes { offset: usize, reason: String },
}

#[derive(Debug)]
pub enum DdbError {
    Format(FormatError),
    Decode(DecodeError),
    Io(io::Error),
    Config(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FormatError::TooShort { len, needed } => {
                write!(f, "file too short for a DDB header: {} bytes, need {}", len, needed)
            }
            FormatError::OffsetBeyondFile { offset, len } => {
                write!(f, "start offset {} is beyond the end of a {} byte file", offset, len)
            }
            FormatError::LengthMismatch {
                declared,
                base,
                actual,
            } => write!(
                f,
                "invalid DAAD header: declared length {:#06x} (base {:#06x}) does not match file size {}",
                declared, base, actual
            ),
            FormatError::PointerBelowBase {
                field,
                address,
                base,
            } => write!(
                f,
                "invalid DAAD header: {} pointer {:#06x} is below base address {:#06x}",
                field, address, base
            ),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::OutOfBounds { offset, len } => {
                write!(f, "read at offset {:#06x} past end of data ({} bytes)", offset, len)
            }
            DecodeError::UnknownOpcode { opcode, offset } => {
                write!(f, "unknown condact code: {} at {:#06x}", opcode, offset)
            }
            DecodeError::BadPointer { address, base } => {
                write!(f, "pointer {:#06x} is below base address {:#06x}", address, base)
            }
            DecodeError::BadAttributes { offset, reason } => {
                write!(f, "object attributes at {:#06x}: {}", offset, reason)
            }
        }
    }
}

impl fmt::Display for DdbError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DdbError::Format(e) => write!(f, "{}", e),
            DdbError::Decode(e) => write!(f, "decode error: {}", e),
            DdbError::Io(e) => write!(f, "IO error: {}", e),
            DdbError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

impl std::error::Error for DecodeError {}

impl std::error::Error for DdbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DdbError::Format(e) => Some(e),
            DdbError::Decode(e) => Some(e),
            DdbError::Io(e) => Some(e),
            DdbError::Config(_) => None,
        }
    }
}

impl From<FormatError> for DdbError {
    fn from(e: FormatError) -> Self {
        DdbError::Format(e)
    }
}

impl From<DecodeError> for DdbError {
    fn from(e: DecodeError) -> Self {
        DdbError::Decode(e)
    }
}

impl From<io::Error> for DdbError {
    fn from(e: io::Error) -> Self {
        DdbError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, DdbError>;
