use log::{debug, trace};

use crate::charset::{host_to_string, token_to_host};
use crate::error::DecodeError;
use crate::source::ByteSource;

pub const MAX_TOKENS: usize = 128;

/// The compression dictionary. Tokens are kept as translated host bytes
/// with spaces still written as `_`.
#[derive(Debug, Clone, Default)]
pub struct TokenTable {
    tokens: Vec<Vec<u8>>,
}

impl TokenTable {
    /// Read the table the header points at. The byte at `offset` itself is
    /// a marker and is skipped.
    pub fn load(src: &mut ByteSource, offset: usize) -> Result<TokenTable, DecodeError> {
        src.seek(offset + 1);
        let mut tokens = Vec::with_capacity(MAX_TOKENS);
        let mut current = Vec::new();
        while tokens.len() < MAX_TOKENS {
            let c = src.next_byte()?;
            if c == 0 {
                debug!("Token table ends early after {} tokens", tokens.len());
                break;
            }
            current.push(token_to_host(c));
            if c & 0x80 != 0 {
                trace!("token {}: {:?}", tokens.len(), host_to_string(&current));
                tokens.push(std::mem::take(&mut current));
            }
        }
        debug!("Loaded {} tokens", tokens.len());
        Ok(TokenTable { tokens })
    }

    pub fn from_tokens(tokens: Vec<Vec<u8>>) -> TokenTable {
        TokenTable { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token as listed in a `/TOK` section, spaces shown as `_`
    pub fn listing_text(&self, id: usize) -> Option<String> {
        self.tokens.get(id).map(|t| host_to_string(t))
    }

    /// Host bytes spliced into message text, with `_` turned back into spaces
    pub fn expansion(&self, id: usize) -> Option<Vec<u8>> {
        self.tokens.get(id).map(|t| {
            t.iter()
                .map(|&b| if b == b'_' { b' ' } else { b })
                .collect()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.tokens.iter().map(|t| host_to_string(t))
    }
}

/// Token id selected by a compressed text byte below 128
pub fn token_id(c: u8) -> usize {
    ((c ^ 0xFF) - 128) as usize
}
