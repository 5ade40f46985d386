//! Writing STL files.
//!
//! STL is a very simple format, which only supports triangular faces and
//! face normals. There are two encodings: ASCII and binary. Binary files
//! are always little endian.
//!
//! Only writing is supported.

use std::{
    convert::TryFrom,
    io::Write,
};

use crate::{
    io::{finish, Error, ErrorKind, FileEncoding, FileFormat, MeshWriter},
    report::Reporter,
    Mesh,
};

mod write;

#[cfg(test)]
mod tests;

pub use self::write::{
    Config, Writer, BINARY_HEADER_LEN, DEFAULT_PRECISION, DEFAULT_SOLID_NAME,
};


/// The encoding of an STL file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Binary,
}

impl From<Encoding> for FileEncoding {
    fn from(src: Encoding) -> Self {
        match src {
            Encoding::Ascii => FileEncoding::Ascii,
            Encoding::Binary => FileEncoding::BinaryLittleEndian,
        }
    }
}

impl TryFrom<FileEncoding> for Encoding {
    type Error = Error;

    fn try_from(src: FileEncoding) -> Result<Self, Self::Error> {
        match src {
            FileEncoding::Ascii => Ok(Encoding::Ascii),
            FileEncoding::BinaryLittleEndian => Ok(Encoding::Binary),
            FileEncoding::BinaryBigEndian => {
                Err(Error::new(ErrorKind::UnsupportedEncoding(src)).in_format(FileFormat::Stl))
            }
        }
    }
}

/// Writes `mesh` as STL file with the given config. Failures (including
/// cancellation) are logged through `reporter` before they are returned.
pub fn write(
    mesh: &Mesh,
    config: &Config,
    dst: &mut dyn Write,
    reporter: &mut dyn Reporter,
) -> Result<(), Error> {
    let result = config.write_to(mesh, dst, &mut *reporter);
    finish(result, FileFormat::Stl, reporter)
}

pub(crate) fn writer_for(encoding: FileEncoding, name: &str) -> Result<Box<dyn MeshWriter>, Error> {
    let encoding = Encoding::try_from(encoding)?;
    Ok(Box::new(Config::new(encoding).with_solid_name(name)))
}
