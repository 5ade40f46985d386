//! Reading and writing Duff surface files.
//!
//! Duff is a simple binary surface format: a fixed [`Header`] of
//! [`HEADER_LEN`] bytes, followed (at offset `hdr_size`) by all face records
//! and then all vertex records.
//!
//! The byte order of a file is selected by its first byte: if it is `'F'`
//! the file is little endian, otherwise big endian. The two valid magic
//! values are [`MAGIC_LE`] and [`MAGIC_BE`]; anything else is rejected.
//!
//! Header layout (offsets in bytes, all numbers in the file's byte order):
//!
//! | offset | size    | content                                         |
//! | ------ | ------- | ----------------------------------------------- |
//! | 0      | 8       | magic                                           |
//! | 8      | 4       | version (`i32`)                                 |
//! | 12     | 10 × 4  | `hdr_size`, `md_offset`, `pd_offset`, `n_faces`, `n_nodes`, `n_strips`, `strip_size`, `normals`, `uv_start`, `vc_offset` (`i32`) |
//! | 52     | 1       | precision (`i8`, 32 or 64)                      |
//! | 53     | 3       | padding                                         |
//! | 56     | 16 × 8  | orientation, row-major (`f64`)                  |
//! | 184    | 12      | reserved                                        |

use std::io::{Read, Write};

use crate::{
    io::{finish, stream::ByteOrder, Error, ErrorKind, FileEncoding, FileFormat, MeshWriter},
    report::Reporter,
    Mesh,
};

mod header;
mod read;
mod write;


pub use self::{
    header::{
        byte_order_of, is_file_start, magic_for, read_header,
        Header, Precision, HEADER_LEN, MAGIC_BE, MAGIC_LE,
    },
    read::Reader,
    write::{Config, Writer, DEFAULT_VERSION},
};


/// Reads a complete Duff file from `src`. Failures are logged through
/// `reporter` before they are returned.
pub fn read(src: &mut dyn Read, reporter: &mut dyn Reporter) -> Result<Mesh, Error> {
    let result = Reader::new(src).and_then(|r| r.read(&mut *reporter));
    finish(result, FileFormat::Duff, reporter)
}

/// Writes `mesh` as Duff file with the given config. Failures are logged
/// through `reporter` before they are returned.
pub fn write(
    mesh: &Mesh,
    config: &Config,
    dst: &mut dyn Write,
    reporter: &mut dyn Reporter,
) -> Result<(), Error> {
    let result = config.write_to(mesh, dst, &mut *reporter);
    finish(result, FileFormat::Duff, reporter)
}

pub(crate) fn writer_for(encoding: FileEncoding, _name: &str) -> Result<Box<dyn MeshWriter>, Error> {
    let order = match encoding {
        FileEncoding::BinaryBigEndian => ByteOrder::BigEndian,
        FileEncoding::BinaryLittleEndian => ByteOrder::LittleEndian,
        FileEncoding::Ascii => return Err(ErrorKind::UnsupportedEncoding(encoding).into()),
    };

    Ok(Box::new(Config::new(order)))
}
