//! Decoder options, optionally read from a TOML file
//!
//! ```toml
//! style = "dsf"
//! verbose = true
//! offset = 128
//! quirk_terminators = [22, 23]
//! ```

use std::fs;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{DdbError, Result};
use crate::opcode_tables::DEFAULT_QUIRK_TERMINATORS;
use crate::text::TextStyle;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    pub style: TextStyle,
    /// Annotate messages and condacts with offsets and raw bytes
    pub verbose: bool,
    /// Bytes of container data before the DDB starts
    pub offset: usize,
    pub header_only: bool,
    /// Condacts a compiler may leave without the trailing 0xFF
    pub quirk_terminators: Vec<u8>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            style: TextStyle::Sce,
            verbose: false,
            offset: 0,
            header_only: false,
            quirk_terminators: DEFAULT_QUIRK_TERMINATORS.to_vec(),
        }
    }
}

impl DecodeOptions {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DecodeOptions> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        debug!("Read options from {}", path.display());
        Self::from_toml(&contents)
            .map_err(|e| DdbError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(contents: &str) -> Result<DecodeOptions> {
        toml::from_str(contents).map_err(|e| DdbError::Config(e.to_string()))
    }
}
