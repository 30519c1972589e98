use log::{debug, info};

use crate::config::DecodeOptions;
use crate::connections::{load_connections, ConnectionRecord};
use crate::dictionary::Vocabulary;
use crate::disassembler::{Disassembler, Process};
use crate::error::Result;
use crate::header::Header;
use crate::object::{load_objects, ObjectRecord};
use crate::source::ByteSource;
use crate::text::{decode_messages, Message, TextDecoder};
use crate::tokens::TokenTable;

/// GameFile holds every section of one DDB, decoded in a single pass
#[derive(Debug, Clone)]
pub struct GameFile {
    pub header: Header,
    pub tokens: Option<TokenTable>,
    pub vocabulary: Vocabulary,
    pub system_messages: Vec<Message>,
    pub user_messages: Vec<Message>,
    pub object_texts: Vec<Message>,
    pub location_texts: Vec<Message>,
    pub connections: Vec<ConnectionRecord>,
    pub objects: Vec<ObjectRecord>,
    pub processes: Vec<Process>,
}

struct Texts {
    system: Vec<Message>,
    user: Vec<Message>,
    objects: Vec<Message>,
    locations: Vec<Message>,
}

impl GameFile {
    /// Decode only the header, skipping `options.offset` bytes of container data
    pub fn decode_header(bytes: &[u8], options: &DecodeOptions) -> Result<Header> {
        let src = ByteSource::new(bytes, options.offset)?;
        Ok(Header::decode(&src)?)
    }

    /// Decode the whole file. Header and table errors are fatal; problems in
    /// a process are recorded on the process and decoding carries on.
    pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<GameFile> {
        let mut src = ByteSource::new(bytes, options.offset)?;
        let header = Header::decode(&src)?;
        let offsets = &header.offsets;

        let tokens = match offsets.tokens {
            Some(at) => Some(TokenTable::load(&mut src, at)?),
            None => None,
        };
        let vocabulary = Vocabulary::load(&mut src, offsets.vocabulary)?;

        let texts = {
            let decoder = TextDecoder::new(tokens.as_ref(), options.style);
            let mut section = |lookup: usize, count: u8| {
                decode_messages(
                    &mut src,
                    &decoder,
                    lookup,
                    count,
                    header.byte_order,
                    header.base_address,
                )
            };
            Texts {
                system: section(offsets.sys_msg_lookup, header.num_system_messages)?,
                user: section(offsets.user_msg_lookup, header.num_user_messages)?,
                objects: section(offsets.objects_lookup, header.num_objects)?,
                locations: section(offsets.locations_lookup, header.num_locations)?,
            }
        };
        debug!(
            "Messages: {} system, {} user, {} objects, {} locations",
            texts.system.len(),
            texts.user.len(),
            texts.objects.len(),
            texts.locations.len()
        );

        let connections = load_connections(&mut src, &header, &vocabulary)?;
        let objects = load_objects(&src, &header, &vocabulary)?;

        let processes = Disassembler::new(&header, &vocabulary, &options.quirk_terminators)
            .disassemble_all(&mut src);
        let damaged = processes
            .iter()
            .filter(|p| p.error.is_some() || p.entries.iter().any(|e| e.error.is_some()))
            .count();
        info!("Decoded {} processes, {} with errors", processes.len(), damaged);

        Ok(GameFile {
            header,
            tokens,
            vocabulary,
            system_messages: texts.system,
            user_messages: texts.user,
            object_texts: texts.objects,
            location_texts: texts.locations,
            connections,
            objects,
            processes,
        })
    }
}
