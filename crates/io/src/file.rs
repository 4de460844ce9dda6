//! Loading and saving controller config files.
//!
//! Files are read as UTF-8 when valid, otherwise as Windows-1252 (the usual
//! encoding of files exported from controllers). A file is written back in
//! the encoding it was read with, including a leading UTF-8 byte order mark.

use std::io::Read;
use std::path::Path;

use robocfg_engine::LineStore;
use serde::Serialize;

use crate::error::IoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "windows-1252")]
    Windows1252,
}

impl TextEncoding {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Windows1252 => "windows-1252",
        }
    }
}

/// A config file held in memory as lines plus the encoding to save it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub lines: LineStore,
    pub encoding: TextEncoding,
    /// The file started with a UTF-8 BOM. It is kept out of `lines` so the
    /// first line still matches record grammars.
    pub bom: bool,
}

const BOM: char = '\u{feff}';

impl ConfigFile {
    /// Decode raw bytes: UTF-8 first, Windows-1252 on failure.
    pub fn decode(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => {
                let body = text.strip_prefix(BOM);
                Self {
                    lines: LineStore::parse(body.unwrap_or(&text)),
                    encoding: TextEncoding::Utf8,
                    bom: body.is_some(),
                }
            }
            Err(e) => {
                let bytes = e.into_bytes();
                let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
                Self { lines: LineStore::parse(&decoded), encoding: TextEncoding::Windows1252, bom: false }
            }
        }
    }

    /// Encode in the original encoding. `None` if a character has no
    /// representation in it.
    pub fn encode(&self) -> Option<Vec<u8>> {
        let text = self.lines.render();
        match self.encoding {
            TextEncoding::Utf8 if self.bom => Some(format!("{BOM}{text}").into_bytes()),
            TextEncoding::Utf8 => Some(text.into_bytes()),
            TextEncoding::Windows1252 => {
                let (encoded, _, had_errors) = encoding_rs::WINDOWS_1252.encode(&text);
                if had_errors {
                    None
                } else {
                    Some(encoded.into_owned())
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, IoError> {
        let read_err = |e: std::io::Error| IoError::Read { path: path.to_path_buf(), message: e.to_string() };
        let mut file = std::fs::File::open(path).map_err(read_err)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(read_err)?;

        let loaded = Self::decode(bytes);
        log::debug!(
            "loaded {} ({} lines, {})",
            path.display(),
            loaded.lines.len(),
            loaded.encoding.label()
        );
        Ok(loaded)
    }

    pub fn save(&self, path: &Path) -> Result<(), IoError> {
        let bytes = self
            .encode()
            .ok_or_else(|| IoError::Unencodable { path: path.to_path_buf(), encoding: self.encoding.label() })?;
        std::fs::write(path, &bytes)
            .map_err(|e| IoError::Write { path: path.to_path_buf(), message: e.to_string() })?;
        log::debug!("wrote {} ({} bytes, {})", path.display(), bytes.len(), self.encoding.label());
        Ok(())
    }
}
