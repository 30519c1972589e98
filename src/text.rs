use log::{debug, trace};
use serde::Deserialize;

use crate::charset::{daad_to_host, host_to_string, NEWLINE, TEXT_TERMINATOR};
use crate::error::DecodeError;
use crate::source::{ByteOrder, ByteSource};
use crate::tokens::{token_id, TokenTable};

/// Source dialect the text is prepared for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    /// Classic `.SCE` listing: one message per line block
    #[default]
    Sce,
    /// `.DSF` dialect: every message is a quoted string literal
    Dsf,
}

/// A decoded message and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub offset: usize,
    pub text: String,
    /// Raw bytes including the terminator
    pub raw: Vec<u8>,
}

const CARRIAGE_RETURN: u8 = 0x0D;

/// Escape directive for a translated control code
fn control_escape(h: u8) -> Option<&'static [u8]> {
    match h {
        0x0C => Some(b"\\k"),
        0x0E => Some(b"\\g"),
        0x0F => Some(b"\\t"),
        0x0B => Some(b"\\b"),
        0x7F => Some(b"\\f"),
        _ => None,
    }
}

pub struct TextDecoder<'a> {
    tokens: Option<&'a TokenTable>,
    style: TextStyle,
}

impl<'a> TextDecoder<'a> {
    pub fn new(tokens: Option<&'a TokenTable>, style: TextStyle) -> Self {
        TextDecoder { tokens, style }
    }

    /// Decode the message starting at `offset`. The source is left just
    /// past the terminator.
    pub fn decode_at(&self, src: &mut ByteSource, offset: usize) -> Result<Message, DecodeError> {
        src.seek(offset);
        let mut raw = Vec::new();
        let mut host: Vec<u8> = Vec::new();

        loop {
            let c = src.next_byte()?;
            raw.push(c);
            // the terminator is a raw value; token text may contain newlines
            if c == TEXT_TERMINATOR {
                break;
            }
            match self.tokens {
                Some(tokens) if c < 0x80 => {
                    let id = token_id(c);
                    match tokens.expansion(id) {
                        Some(expansion) => host.extend_from_slice(&expansion),
                        None => debug!("Message at {:#06x} uses missing token {}", offset, id),
                    }
                }
                _ => {
                    let h = daad_to_host(c);
                    match control_escape(h) {
                        Some(escape) => host.extend_from_slice(escape),
                        None => host.push(h),
                    }
                }
            }
        }

        let text = self.finish(&host);
        trace!("message at {:#06x}: {:?}", offset, text);
        Ok(Message { offset, text, raw })
    }

    /// Make the text safe for the chosen dialect
    fn finish(&self, host: &[u8]) -> String {
        let mut out = Vec::with_capacity(host.len());
        for &h in host {
            match (h, self.style) {
                (CARRIAGE_RETURN, _) => out.extend_from_slice(b"\\n"),
                (NEWLINE, TextStyle::Dsf) => out.extend_from_slice(b"\\n"),
                (b'"', TextStyle::Dsf) => out.extend_from_slice(b"\\\""),
                _ => out.push(h),
            }
        }
        host_to_string(&out)
    }
}

/// Decode `count` messages through the pointer table at `lookup`
pub fn decode_messages(
    src: &mut ByteSource,
    decoder: &TextDecoder,
    lookup: usize,
    count: u8,
    order: ByteOrder,
    base: u16,
) -> Result<Vec<Message>, DecodeError> {
    let mut messages = Vec::with_capacity(count as usize);
    for i in 0..count as usize {
        let address = src.word_at(lookup + 2 * i, order)?;
        let offset = address
            .checked_sub(base)
            .ok_or(DecodeError::BadPointer { address, base })?;
        messages.push(decoder.decode_at(src, offset as usize)?);
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::encode_text;

    fn decode(bytes: &[u8], tokens: Option<&TokenTable>, style: TextStyle) -> Message {
        let mut src = ByteSource::new(bytes, 0).unwrap();
        TextDecoder::new(tokens, style).decode_at(&mut src, 0).unwrap()
    }

    fn one_char_tokens() -> TokenTable {
        let tokens = (0..128u8).map(|i| vec![b'0' + (i % 64)]).collect();
        TokenTable::from_tokens(tokens)
    }

    #[test]
    fn test_plain_message() {
        let bytes = encode_text("You are in a cave.");
        let msg = decode(&bytes, None, TextStyle::Sce);
        assert_eq!(msg.text, "You are in a cave.");
        assert_eq!(msg.raw.len(), bytes.len());
    }

    #[test]
    fn test_leaves_source_after_terminator() {
        let mut bytes = encode_text("ab");
        bytes.extend(encode_text("cd"));
        let mut src = ByteSource::new(&bytes, 0).unwrap();
        let decoder = TextDecoder::new(None, TextStyle::Sce);
        decoder.decode_at(&mut src, 0).unwrap();
        assert_eq!(src.position(), 3);
        let pos = src.position();
        assert_eq!(decoder.decode_at(&mut src, pos).unwrap().text, "cd");
    }

    #[test]
    fn test_token_references_concatenate() {
        let tokens = one_char_tokens();
        let ids = [5usize, 17, 63, 1, 100];
        let mut bytes: Vec<u8> = ids.iter().map(|&id| 127 - id as u8).collect();
        bytes.push(TEXT_TERMINATOR);
        let msg = decode(&bytes, Some(&tokens), TextStyle::Sce);
        let expected: String = ids.iter().map(|&id| (b'0' + (id % 64) as u8) as char).collect();
        assert_eq!(msg.text, expected);
    }

    #[test]
    fn test_token_underscore_becomes_space() {
        let tokens = TokenTable::from_tokens(vec![vec![], b"the_".to_vec()]);
        let mut bytes = vec![127 - 1];
        bytes.extend(encode_text("end"));
        let msg = decode(&bytes, Some(&tokens), TextStyle::Sce);
        assert_eq!(msg.text, "the end");
    }

    #[test]
    fn test_newline_inside_token_does_not_terminate() {
        let tokens = TokenTable::from_tokens(vec![vec![], vec![b'a', NEWLINE, b'b']]);
        let mut bytes = vec![127 - 1];
        bytes.extend(encode_text("tail"));
        let msg = decode(&bytes, Some(&tokens), TextStyle::Sce);
        assert_eq!(msg.text, "a\nbtail");
        assert_eq!(msg.raw.len(), 6);
    }

    #[test]
    fn test_control_codes_escaped() {
        let bytes = [255 - 0x0C, 255 - b'x', 255 - 0x0E, 255 - 0x0F, 255 - 0x0B, 255 - 0x7F, TEXT_TERMINATOR];
        let msg = decode(&bytes, Some(&TokenTable::default()), TextStyle::Sce);
        assert_eq!(msg.text, "\\kx\\g\\t\\b\\f");
    }

    #[test]
    fn test_carriage_return_and_quotes() {
        let mut bytes = vec![255 - b'"', 255 - b'a', 255 - 0x0D, 255 - b'b', 255 - b'"'];
        bytes.push(TEXT_TERMINATOR);
        let sce = decode(&bytes, None, TextStyle::Sce);
        assert_eq!(sce.text, "\"a\\nb\"");
        let dsf = decode(&bytes, None, TextStyle::Dsf);
        assert_eq!(dsf.text, "\\\"a\\nb\\\"");
    }

    #[test]
    fn test_dsf_folds_token_newlines() {
        let tokens = TokenTable::from_tokens(vec![vec![], vec![b'a', NEWLINE]]);
        let bytes = [127 - 1, TEXT_TERMINATOR];
        let msg = decode(&bytes, Some(&tokens), TextStyle::Dsf);
        assert_eq!(msg.text, "a\\n");
    }

    #[test]
    fn test_unterminated_message() {
        let bytes = [255 - b'a', 255 - b'b'];
        let mut src = ByteSource::new(&bytes, 0).unwrap();
        let err = TextDecoder::new(None, TextStyle::Sce)
            .decode_at(&mut src, 0)
            .unwrap_err();
        assert_eq!(err, DecodeError::OutOfBounds { offset: 2, len: 2 });
    }

    #[test]
    fn test_decode_messages_from_lookup() {
        let mut bytes = vec![0u8; 4];
        let first = bytes.len() as u16 + 0x100;
        bytes.extend(encode_text("one"));
        let second = bytes.len() as u16 + 0x100;
        bytes.extend(encode_text("two"));
        bytes[0..2].copy_from_slice(&first.to_le_bytes());
        bytes[2..4].copy_from_slice(&second.to_le_bytes());
        let mut src = ByteSource::new(&bytes, 0).unwrap();
        let decoder = TextDecoder::new(None, TextStyle::Sce);
        let messages = decode_messages(&mut src, &decoder, 0, 2, ByteOrder::Little, 0x100).unwrap();
        let texts: Vec<_> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["one", "two"]);
        assert_eq!(messages[1].offset, second as usize - 0x100);
    }
}
