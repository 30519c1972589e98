use std::fmt::Display;
use std::fmt::Error;
use std::fmt::Formatter;

use log::{debug, info, warn};

use crate::error::{DecodeError, FormatError};
use crate::machine::{Language, Target};
use crate::source::{ByteOrder, ByteSource};

/// Header of a game without extended attributes; file length at offset 30
pub const OLD_HEADER_LEN: usize = 32;
/// Header with the extended attribute pointer at 30 and file length at 32
pub const NEW_HEADER_LEN: usize = 34;

/// Offsets of a big-endian file length the old-format heuristic tries, in order
const LENGTH_TRIALS: [usize; 2] = [32, 30];

/// Section pointers in header order. Instantiated with the raw machine
/// addresses (`u16`) and with rebased file offsets (`usize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sections<T> {
    pub tokens: Option<T>,
    pub process_list: T,
    pub objects_lookup: T,
    pub locations_lookup: T,
    pub user_msg_lookup: T,
    pub sys_msg_lookup: T,
    pub connections_lookup: T,
    pub vocabulary: T,
    pub initial_locations: T,
    pub object_names: T,
    pub object_attrs: T,
    pub extended_attrs: Option<T>,
}

impl Sections<u16> {
    fn rebase(&self, base: u16) -> Result<Sections<usize>, FormatError> {
        let at = |field: &'static str, address: u16| -> Result<usize, FormatError> {
            address
                .checked_sub(base)
                .map(|a| a as usize)
                .ok_or(FormatError::PointerBelowBase {
                    field,
                    address,
                    base,
                })
        };
        Ok(Sections {
            // zero means the game is not compressed
            tokens: match self.tokens {
                Some(t) => Some(at("tokens", t)?),
                None => None,
            },
            process_list: at("process list", self.process_list)?,
            objects_lookup: at("objects lookup", self.objects_lookup)?,
            locations_lookup: at("locations lookup", self.locations_lookup)?,
            user_msg_lookup: at("user messages lookup", self.user_msg_lookup)?,
            sys_msg_lookup: at("system messages lookup", self.sys_msg_lookup)?,
            connections_lookup: at("connections lookup", self.connections_lookup)?,
            vocabulary: at("vocabulary", self.vocabulary)?,
            initial_locations: at("initial locations", self.initial_locations)?,
            object_names: at("object names", self.object_names)?,
            object_attrs: at("object attributes", self.object_attrs)?,
            extended_attrs: match self.extended_attrs {
                Some(e) => Some(at("extended attributes", e)?),
                None => None,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct Header {
    pub version: u8,
    pub machine_byte: u8,
    /// Bytes 1-2 as a word; old games carry no machine byte
    pub signature: u16,
    pub target: Target,
    pub language: Language,
    pub base_address: u16,
    pub byte_order: ByteOrder,
    pub num_objects: u8,
    pub num_locations: u8,
    pub num_user_messages: u8,
    pub num_system_messages: u8,
    pub num_processes: u8,
    /// Pointers exactly as stored in the file
    pub addresses: Sections<u16>,
    /// Pointers as offsets into the DDB data
    pub offsets: Sections<usize>,
    pub file_length: u16,
    pub is_old_format: bool,
}

impl Header {
    pub fn decode(src: &ByteSource) -> Result<Header, FormatError> {
        let actual = src.len();
        let short = |_: DecodeError| FormatError::TooShort {
            len: actual,
            needed: OLD_HEADER_LEN,
        };
        if actual < OLD_HEADER_LEN {
            return Err(FormatError::TooShort {
                len: actual,
                needed: OLD_HEADER_LEN,
            });
        }

        let version = src.byte_at(0).map_err(short)?;
        let machine_byte = src.byte_at(1).map_err(short)?;

        let (target, byte_order) = if version >= 2 {
            let target = match Target::from_machine_id(machine_byte >> 4) {
                Some(t) => t,
                None => {
                    warn!(
                        "Unknown machine id {} in byte {:#04x}, assuming PC",
                        machine_byte >> 4,
                        machine_byte
                    );
                    Target::Pc
                }
            };
            (target, target.byte_order())
        } else {
            (Target::Pc, detect_old_byte_order(src))
        };
        let language = Language::from_id(machine_byte & 0x0F);
        let base = target.base_address();
        info!(
            "DAAD version {}, target {}, {:?} endian, base {:#06x}",
            version, target, byte_order, base
        );

        let word = |offset: usize| src.word_at(offset, byte_order).map_err(short);

        let signature = word(1)?;
        let tokens = word(8)?;
        let mut addresses = Sections {
            tokens: if tokens == 0 { None } else { Some(tokens) },
            process_list: word(10)?,
            objects_lookup: word(12)?,
            locations_lookup: word(14)?,
            user_msg_lookup: word(16)?,
            sys_msg_lookup: word(18)?,
            connections_lookup: word(20)?,
            vocabulary: word(22)?,
            initial_locations: word(24)?,
            object_names: word(26)?,
            object_attrs: word(28)?,
            extended_attrs: None,
        };

        // If offset 30 already holds the file length there are no extended attributes
        let at_30 = word(30)?;
        let is_old_format = (at_30 as usize).checked_sub(base as usize) == Some(actual);
        let file_length = if is_old_format {
            debug!("File length found at offset 30, old format");
            at_30
        } else {
            addresses.extended_attrs = Some(at_30);
            src.word_at(32, byte_order)
                .map_err(|_| FormatError::TooShort {
                    len: actual,
                    needed: NEW_HEADER_LEN,
                })?
        };

        if (file_length as usize).checked_sub(base as usize) != Some(actual) {
            return Err(FormatError::LengthMismatch {
                declared: file_length,
                base,
                actual,
            });
        }

        let offsets = addresses.rebase(base)?;

        Ok(Header {
            version,
            machine_byte,
            signature,
            target,
            language,
            base_address: base,
            byte_order,
            num_objects: src.byte_at(3).map_err(short)?,
            num_locations: src.byte_at(4).map_err(short)?,
            num_user_messages: src.byte_at(5).map_err(short)?,
            num_system_messages: src.byte_at(6).map_err(short)?,
            num_processes: src.byte_at(7).map_err(short)?,
            addresses,
            offsets,
            file_length,
            is_old_format,
        })
    }

    pub fn is_little_endian(&self) -> bool {
        self.byte_order == ByteOrder::Little
    }

    pub fn is_compressed(&self) -> bool {
        self.offsets.tokens.is_some()
    }
}

/// Old games have no machine byte: accept the first interpretation whose
/// length field matches the real file size, otherwise assume little-endian.
fn detect_old_byte_order(src: &ByteSource) -> ByteOrder {
    let actual = src.len();
    for offset in LENGTH_TRIALS {
        match src.word_at(offset, ByteOrder::Big) {
            Ok(len) if len as usize == actual => {
                debug!("Length {} at offset {} matches as big endian", len, offset);
                return ByteOrder::Big;
            }
            Ok(len) => debug!(
                "Length {} at offset {} does not match file size {}",
                len, offset, actual
            ),
            Err(e) => debug!("No length at offset {}: {}", offset, e),
        }
    }
    ByteOrder::Little
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let a = &self.addresses;
        writeln!(f, ";---------------------------------------------------------------------------")?;
        writeln!(f, "; Version   : {}", self.version)?;
        if self.version >= 2 {
            writeln!(f, "; Machine   : {} ({})", self.target, self.language)?;
        } else {
            writeln!(f, "; Signature : {:04X}h", self.signature)?;
        }
        writeln!(
            f,
            "; Data      : {}",
            if self.is_little_endian() { "Little-endian" } else { "Big-endian" }
        )?;
        writeln!(f, "; Format    : {}", if self.is_old_format { "old" } else { "new" })?;
        writeln!(f, "; Objects   : {}", self.num_objects)?;
        writeln!(f, "; Locations : {}", self.num_locations)?;
        writeln!(f, "; Usr Mess  : {}", self.num_user_messages)?;
        writeln!(f, "; Sys Mess  : {}", self.num_system_messages)?;
        writeln!(f, "; Processes : {}", self.num_processes)?;
        writeln!(f, ";---------------------------------------------------------------------------")?;
        writeln!(f, "; Base addr      : {:04X}h", self.base_address)?;
        writeln!(f, "; Tokens addr    : {:04X}h", a.tokens.unwrap_or(0))?;
        writeln!(f, "; Procs addr     : {:04X}h", a.process_list)?;
        writeln!(f, "; Objs addr      : {:04X}h", a.objects_lookup)?;
        writeln!(f, "; Locs addr      : {:04X}h", a.locations_lookup)?;
        writeln!(f, "; UsrMsg addr    : {:04X}h", a.user_msg_lookup)?;
        writeln!(f, "; SysMsg addr    : {:04X}h", a.sys_msg_lookup)?;
        writeln!(f, "; Connex addr    : {:04X}h", a.connections_lookup)?;
        writeln!(f, "; Vocabu addr    : {:04X}h", a.vocabulary)?;
        writeln!(f, "; InitAt addr    : {:04X}h", a.initial_locations)?;
        writeln!(f, "; ObjName addr   : {:04X}h", a.object_names)?;
        writeln!(f, "; Weight/CW addr : {:04X}h", a.object_attrs)?;
        if let Some(ext) = a.extended_attrs {
            writeln!(f, "; Extra attr addr: {:04X}h", ext)?;
        }
        writeln!(
            f,
            "; File length    : {:04X}h ({})",
            self.file_length, self.file_length
        )?;
        writeln!(f, ";---------------------------------------------------------------------------")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{minimal_game, DdbImage, TOKENS};

    fn decode(bytes: &[u8]) -> Result<Header, FormatError> {
        let src = ByteSource::new(bytes, 0).unwrap();
        Header::decode(&src)
    }

    #[test]
    fn test_new_format_big_endian_zx() {
        let bytes = minimal_game(2, 0x11, ByteOrder::Big, 0x8400, true);
        let header = decode(&bytes).unwrap();
        assert_eq!(header.target, Target::Zx);
        assert_eq!(header.language, Language::Spanish);
        assert_eq!(header.byte_order, ByteOrder::Big);
        assert_eq!(header.base_address, 0x8400);
        assert!(!header.is_old_format);
        assert_eq!(header.file_length as usize - 0x8400, bytes.len());
        assert_eq!(header.num_objects, 1);
        assert_eq!(header.num_locations, 1);
        assert_eq!(header.num_processes, 0);
        assert_eq!(
            header.offsets.vocabulary,
            header.addresses.vocabulary as usize - 0x8400
        );
        assert!(header.offsets.extended_attrs.is_some());
        assert!(!header.is_compressed());
    }

    #[test]
    fn test_new_format_atari_is_little_endian() {
        let bytes = minimal_game(2, 0x50, ByteOrder::Little, 0, true);
        let header = decode(&bytes).unwrap();
        assert_eq!(header.target, Target::St);
        assert!(header.is_little_endian());
        assert!(!header.is_old_format);
    }

    #[test]
    fn test_old_format_length_at_30_is_big_endian() {
        let bytes = minimal_game(1, 0x01, ByteOrder::Big, 0, false);
        let src = ByteSource::new(&bytes, 0).unwrap();
        assert_ne!(src.word_at(32, ByteOrder::Big).unwrap() as usize, bytes.len());
        let header = decode(&bytes).unwrap();
        assert_eq!(header.byte_order, ByteOrder::Big);
        assert!(header.is_old_format);
        assert_eq!(header.offsets.extended_attrs, None);
    }

    #[test]
    fn test_old_format_no_match_is_little_endian() {
        let bytes = minimal_game(1, 0x01, ByteOrder::Little, 0, false);
        let header = decode(&bytes).unwrap();
        assert_eq!(header.byte_order, ByteOrder::Little);
        assert!(header.is_old_format);
    }

    #[test]
    fn test_old_version_with_extended_attributes() {
        let bytes = minimal_game(1, 0x01, ByteOrder::Big, 0, true);
        let header = decode(&bytes).unwrap();
        assert_eq!(header.byte_order, ByteOrder::Big);
        assert!(!header.is_old_format);
    }

    #[test]
    fn test_declared_length_beyond_file() {
        let mut bytes = minimal_game(2, 0x00, ByteOrder::Big, 0, true);
        bytes.pop();
        match decode(&bytes) {
            Err(FormatError::LengthMismatch { declared, actual, .. }) => {
                assert_eq!(declared as usize, actual + 1);
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_bytes_are_rejected() {
        let mut bytes = minimal_game(2, 0x10, ByteOrder::Big, 0x8400, true);
        bytes.push(0);
        match decode(&bytes) {
            Err(FormatError::LengthMismatch { declared, base, actual }) => {
                assert_eq!(base, 0x8400);
                assert_eq!(declared as usize - 0x8400 + 1, actual);
            }
            other => panic!("expected length mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_declared_length_without_base_is_rejected() {
        // a ZX file whose length field forgot the 0x8400 load address
        let mut bytes = minimal_game(2, 0x00, ByteOrder::Big, 0, true);
        bytes[1] = 0x10;
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::LengthMismatch { base: 0x8400, .. })
        ));
    }

    #[test]
    fn test_too_short() {
        let bytes = vec![2u8; 10];
        assert_eq!(
            decode(&bytes).unwrap_err(),
            FormatError::TooShort { len: 10, needed: OLD_HEADER_LEN }
        );
    }

    #[test]
    fn test_pointer_below_base() {
        let mut img = DdbImage::new(2, 0x10, ByteOrder::Big, 0x8400, true);
        let tokens = img.append(&[0]);
        img.set_pointer(TOKENS, tokens);
        // every other pointer left at 0 lies below the ZX base
        let bytes = img.finish();
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::PointerBelowBase { field: "process list", .. })
        ));
    }

    #[test]
    fn test_display_banner() {
        let bytes = minimal_game(2, 0x11, ByteOrder::Big, 0x8400, true);
        let text = decode(&bytes).unwrap().to_string();
        assert!(text.contains("; Machine   : ZX (Spanish)"));
        assert!(text.contains("Big-endian"));
        assert!(text.contains("; Extra attr addr:"));
    }
}
