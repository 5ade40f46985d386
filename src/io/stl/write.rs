use std::{
    convert::TryFrom,
    io::{self, Write},
};

use byteorder::{ByteOrder as _, LittleEndian};

use crate::{
    io::{
        check_cancelled,
        stream::{ByteOrder, OrderedWriter},
        Error, FileFormat, MeshWriter,
    },
    normals::triangle_normal,
    report::Reporter,
    Mesh,
};
use super::Encoding;


// ----------------------------------------------------------------------------

/// The solid name used when the user didn't specify one.
pub const DEFAULT_SOLID_NAME: &str = "mesh";

/// Number of decimal places of ASCII numbers if not configured otherwise.
pub const DEFAULT_PRECISION: usize = 5;

/// Every binary header starts with this, followed by a space and the solid
/// name.
const HEADER_PREFIX: &str = "Generated by mgmesh:";

/// Size of the binary header in bytes.
pub const BINARY_HEADER_LEN: usize = 80;

/// Size of one triangle record in a binary file.
const TRI_SIZE: usize = 4 * 3 * 4 + 2;


// ===============================================================================================
// ===== STL Config
// ===============================================================================================

/// Used to configure and create a [`Writer`].
///
/// This is used to configure basic settings for the file to be written. You
/// can use the [`Config::into_writer`] method to create a [`Writer`] or pass
/// the config to anything expecting a [`MeshWriter`].
#[derive(Clone, Debug)]
pub struct Config {
    solid_name: String,
    encoding: Encoding,
    precision: usize,
}

impl Config {
    /// Creates a new builder instance from the given encoding. For
    /// convenience, you can use [`Config::binary()`] or [`Config::ascii()`]
    /// directly.
    pub fn new(encoding: Encoding) -> Self {
        Self {
            solid_name: DEFAULT_SOLID_NAME.into(),
            encoding,
            precision: DEFAULT_PRECISION,
        }
    }

    /// Creates a new builder instance for a binary STL file.
    pub fn binary() -> Self {
        Self::new(Encoding::Binary)
    }

    /// Creates a new builder instance for an ASCII STL file.
    pub fn ascii() -> Self {
        Self::new(Encoding::Ascii)
    }

    /// Sets the solid name for this file.
    ///
    /// Non-ASCII characters are replaced by `?`. In binary files the name is
    /// part of the 80 byte header and is cut off if it doesn't fit.
    pub fn with_solid_name(self, name: impl Into<String>) -> Self {
        let solid_name = name.into()
            .chars()
            .map(|c| if c.is_ascii() { c } else { '?' })
            .collect();

        Self {
            solid_name,
            .. self
        }
    }

    /// Sets the number of decimal places of numbers in ASCII files. Has no
    /// effect on binary files.
    pub fn with_precision(self, precision: usize) -> Self {
        Self {
            precision,
            .. self
        }
    }

    pub fn solid_name(&self) -> &str {
        &self.solid_name
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Creates a [`Writer`] with `self` as config.
    pub fn into_writer<W: io::Write>(self, writer: W) -> Writer<W> {
        Writer::new(self, writer)
    }
}

impl MeshWriter for Config {
    fn format(&self) -> FileFormat {
        FileFormat::Stl
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
// ===== STL Writer
// ===============================================================================================

/// A writer able to write binary and ASCII STL files.
///
/// The face normals are always computed from the current vertex positions
/// while writing.
#[derive(Debug)]
pub struct Writer<W: io::Write> {
    config: Config,
    writer: W,
}

impl<W: io::Write> Writer<W> {
    /// Creates a new STL writer with the given STL config which will write to
    /// the given `io::Write` instance.
    pub fn new(config: Config, writer: W) -> Self {
        Self { config, writer }
    }

    /// Writes the whole mesh.
    ///
    /// The mesh is validated first; an invalid mesh results in an error
    /// before anything is written. Before each triangle, `reporter` is asked
    /// whether the operation was cancelled. If so, writing stops immediately
    /// and [`ErrorKind::Cancelled`][crate::io::ErrorKind::Cancelled] is
    /// returned.
    pub fn write(self, mesh: &Mesh, reporter: &mut dyn Reporter) -> Result<(), Error> {
        mesh.validate()?;
        reporter.set_bounds(0, mesh.num_faces() as u64);

        if self.config.encoding == Encoding::Ascii {
            self.write_ascii(mesh, reporter)
        } else {
            self.write_binary(mesh, reporter)
        }
    }

    #[inline(never)]
    fn write_binary(self, mesh: &Mesh, reporter: &mut dyn Reporter) -> Result<(), Error> {
        let num_triangles = u32::try_from(mesh.num_faces()).map_err(|_| {
            Error::invalid_data(format!("too many faces for binary STL: {}", mesh.num_faces()))
        })?;

        let mut w = OrderedWriter::new(self.writer, ByteOrder::LittleEndian);

        // First, the 80 bytes header. It must not begin with "solid".
        w.write_bytes(&binary_header(&self.config.solid_name))?;

        // Next, number of triangles
        w.write_u32(num_triangles)?;

        let mut buf = [0; TRI_SIZE];
        for (i, f) in mesh.face_indices().enumerate() {
            check_cancelled(reporter)?;

            let triangle = mesh.face_triangle(f);
            let normal = triangle_normal(&triangle);

            LittleEndian::write_f32(&mut buf[00..04], normal.x as f32);
            LittleEndian::write_f32(&mut buf[04..08], normal.y as f32);
            LittleEndian::write_f32(&mut buf[08..12], normal.z as f32);

            for (j, p) in triangle.iter().enumerate() {
                let start = 12 + j * 12;
                LittleEndian::write_f32(&mut buf[start + 0..start + 4], p.x as f32);
                LittleEndian::write_f32(&mut buf[start + 4..start + 8], p.y as f32);
                LittleEndian::write_f32(&mut buf[start + 8..start + 12], p.z as f32);
            }

            // The "attribute byte count" is always 0: most software does not
            // understand anything else.
            LittleEndian::write_u16(&mut buf[48..50], 0);

            w.write_bytes(&buf)?;
            reporter.update(i as u64 + 1);
        }

        w.flush()
    }

    #[inline(never)]
    fn write_ascii(self, mesh: &Mesh, reporter: &mut dyn Reporter) -> Result<(), Error> {
        let config = self.config;
        let prec = config.precision;
        let mut w = self.writer;

        writeln!(w, "solid {}", config.solid_name)?;

        for (i, f) in mesh.face_indices().enumerate() {
            check_cancelled(reporter)?;

            let triangle = mesh.face_triangle(f);
            let n = triangle_normal(&triangle);

            // Write face normal
            write!(w, "  facet normal ")?;
            write_ascii_vector(&mut w, [n.x, n.y, n.z], prec)?;
            writeln!(w)?;

            // Write all vertex positions
            writeln!(w, "    outer loop")?;
            for p in &triangle {
                write!(w, "      vertex ")?;
                write_ascii_vector(&mut w, [p.x, p.y, p.z], prec)?;
                writeln!(w)?;
            }

            writeln!(w, "    endloop")?;
            writeln!(w, "  endfacet")?;

            reporter.update(i as u64 + 1);
        }

        writeln!(w, "endsolid {}", config.solid_name)?;
        w.flush()?;

        Ok(())
    }
}


// ===============================================================================================
// ===== Helper functions
// ===============================================================================================

/// Returns the 80 byte header of a binary file: the application prefix and
/// the solid name, cut off or padded with spaces.
fn binary_header(solid_name: &str) -> [u8; BINARY_HEADER_LEN] {
    let signature = format!("{} {}", HEADER_PREFIX, solid_name);
    let len = signature.len().min(BINARY_HEADER_LEN);

    let mut header = [b' '; BINARY_HEADER_LEN];
    header[..len].copy_from_slice(&signature.as_bytes()[..len]);
    header
}

/// Writes the three values separated by ' ', each with `prec` decimal places.
fn write_ascii_vector(w: &mut impl Write, [x, y, z]: [f64; 3], prec: usize) -> Result<(), io::Error> {
    // Negative zero would show up as "-0.00000".
    let clean = |v: f64| if v == 0.0 { 0.0 } else { v };

    write!(w, "{:.*} {:.*} {:.*}", prec, clean(x), prec, clean(y), prec, clean(z))
}
