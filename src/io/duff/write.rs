use std::{
    convert::TryFrom,
    io::{self, Write},
};

use crate::{
    io::{
        check_cancelled,
        stream::{ByteOrder, OrderedWriter},
        Error, FileFormat, MeshWriter,
    },
    report::Reporter,
    Mesh,
};
use super::{Header, Precision};


/// The version written into new files.
pub const DEFAULT_VERSION: i32 = 1;


// ===============================================================================================
// ===== Duff Config
// ===============================================================================================

/// Used to configure and create a [`Writer`].
#[derive(Clone, Debug)]
pub struct Config {
    byte_order: ByteOrder,
    version: i32,
    precision: Precision,
}

impl Config {
    /// Creates a config for files in the given byte order, with 32 bit vertex
    /// coordinates.
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            version: DEFAULT_VERSION,
            precision: Precision::Single,
        }
    }

    pub fn big_endian() -> Self {
        Self::new(ByteOrder::BigEndian)
    }

    pub fn little_endian() -> Self {
        Self::new(ByteOrder::LittleEndian)
    }

    pub fn with_version(self, version: i32) -> Self {
        Self { version, .. self }
    }

    pub fn with_precision(self, precision: Precision) -> Self {
        Self { precision, .. self }
    }

    /// Creates a [`Writer`] with `self` as config.
    pub fn into_writer<W: io::Write>(self, writer: W) -> Writer<W> {
        Writer::new(self, writer)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::big_endian()
    }
}

impl MeshWriter for Config {
    fn format(&self) -> FileFormat {
        FileFormat::Duff
    }

    fn write_to(
        &self,
        mesh: &Mesh,
        writer: &mut dyn Write,
        reporter: &mut dyn Reporter,
    ) -> Result<(), Error> {
        self.clone().into_writer(writer).write(mesh, reporter)
    }
}


// ===============================================================================================
// ===== Duff Writer
// ===============================================================================================

/// Writes a mesh as Duff file: header, then all faces, then all vertices.
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    config: Config,
    writer: W,
}

impl<W: io::Write> Writer<W> {
    pub fn new(config: Config, writer: W) -> Self {
        Self { config, writer }
    }

    pub fn write(self, mesh: &Mesh, reporter: &mut dyn Reporter) -> Result<(), Error> {
        mesh.validate()?;

        let count = |n: usize, what: &str| {
            i32::try_from(n).map_err(|_| {
                Error::invalid_data(format!("too many {} for a Duff file: {}", what, n))
            })
        };
        let n_faces = count(mesh.num_faces(), "faces")?;
        let n_nodes = count(mesh.num_vertices(), "vertices")?;

        let config = self.config;
        let header = Header::new(config.byte_order, config.version, config.precision, n_faces, n_nodes);
        let mut w = OrderedWriter::new(self.writer, config.byte_order);
        header.write_to(&mut w)?;

        let total = (mesh.num_faces() + mesh.num_vertices()) as u64;
        reporter.set_bounds(0, total);
        let mut done = 0;

        for face in mesh.faces() {
            check_cancelled(reporter)?;
            for v in &face.vertices() {
                // Fits, since `validate` made sure it's smaller than `n_nodes`.
                w.write_i32(v.idx() as i32)?;
            }
            done += 1;
            reporter.update(done);
        }

        for p in mesh.vertices() {
            check_cancelled(reporter)?;
            match config.precision {
                Precision::Single => {
                    w.write_f32(p.x as f32)?;
                    w.write_f32(p.y as f32)?;
                    w.write_f32(p.z as f32)?;
                }
                Precision::Double => {
                    w.write_f64(p.x)?;
                    w.write_f64(p.y)?;
                    w.write_f64(p.z)?;
                }
            }
            done += 1;
            reporter.update(done);
        }

        w.flush()
    }
}
