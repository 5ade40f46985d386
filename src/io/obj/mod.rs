//! Reading and writing Wavefront OBJ files (triangle meshes only).

use std::io::{BufReader, Read, Write};

use crate::{
    io::{finish, Error, ErrorKind, FileEncoding, FileFormat, MeshWriter},
    report::Reporter,
    Mesh,
};

mod read;
mod write;


pub use self::{
    read::{Reader, ReadResults},
    write::{Config, Writer, DEFAULT_PRECISION},
};


/// Reads an OBJ file from `src`, returning the mesh and the number of
/// skipped non-triangular faces. Failures are logged through `reporter`
/// before they are returned.
pub fn read_results(src: &mut dyn Read, reporter: &mut dyn Reporter) -> Result<ReadResults, Error> {
    let result = Reader::new(BufReader::new(src)).read(&mut *reporter);
    finish(result, FileFormat::Obj, reporter)
}

/// Like [`read_results`], but only returns the mesh.
pub fn read(src: &mut dyn Read, reporter: &mut dyn Reporter) -> Result<Mesh, Error> {
    read_results(src, reporter).map(|r| r.mesh)
}

/// Writes `mesh` as OBJ file. Failures are logged through `reporter` before
/// they are returned.
pub fn write(
    mesh: &Mesh,
    config: &Config,
    dst: &mut dyn Write,
    reporter: &mut dyn Reporter,
) -> Result<(), Error> {
    let result = config.write_to(mesh, dst, &mut *reporter);
    finish(result, FileFormat::Obj, reporter)
}

pub(crate) fn writer_for(encoding: FileEncoding, _name: &str) -> Result<Box<dyn MeshWriter>, Error> {
    match encoding {
        FileEncoding::Ascii => Ok(Box::new(Config::new())),
        other => Err(ErrorKind::UnsupportedEncoding(other).into()),
    }
}
