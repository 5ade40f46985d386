use std::str::FromStr;

use mgmesh::io::{FileEncoding, FileFormat};


/// The encoding the user asked for on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingRequest {
    Ascii,
    Binary,
    BinaryBigEndian,
    BinaryLittleEndian,
}

impl EncodingRequest {
    /// Returns the actual encoding for the given format or `None` if the
    /// format does not support the requested encoding.
    pub fn encoding_for(self, format: FileFormat) -> Option<FileEncoding> {
        match (self, format) {
            (EncodingRequest::Ascii, FileFormat::Stl) => Some(FileEncoding::Ascii),
            (EncodingRequest::Ascii, FileFormat::Obj) => Some(FileEncoding::Ascii),
            (EncodingRequest::Ascii, FileFormat::Duff) => None,

            // STL is always little endian.
            (EncodingRequest::Binary, FileFormat::Stl) => Some(FileEncoding::BinaryLittleEndian),
            (EncodingRequest::Binary, FileFormat::Duff) => Some(FileEncoding::binary_native()),
            (EncodingRequest::BinaryBigEndian, FileFormat::Duff) => {
                Some(FileEncoding::BinaryBigEndian)
            }
            (EncodingRequest::BinaryLittleEndian, FileFormat::Stl)
            | (EncodingRequest::BinaryLittleEndian, FileFormat::Duff) => {
                Some(FileEncoding::BinaryLittleEndian)
            }

            _ => None,
        }
    }
}

impl FromStr for EncodingRequest {
    type Err = String;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        match src {
            "ascii" => Ok(EncodingRequest::Ascii),
            "binary" => Ok(EncodingRequest::Binary),
            "bbe" => Ok(EncodingRequest::BinaryBigEndian),
            "ble" => Ok(EncodingRequest::BinaryLittleEndian),
            other => Err(format!(
                "'{}' is not a valid encoding (valid: 'ascii', 'binary', 'bbe', 'ble')",
                other,
            )),
        }
    }
}

/// The encoding used when the user didn't request one.
pub fn default_encoding(format: FileFormat) -> FileEncoding {
    match format {
        FileFormat::Stl => FileEncoding::BinaryLittleEndian,
        FileFormat::Obj => FileEncoding::Ascii,
        FileFormat::Duff => FileEncoding::binary_native(),
    }
}
