use std::io::{self, Write};

use crate::{
    io::{check_cancelled, Error, FileFormat, MeshWriter},
    normals::face_normals,
    report::Reporter,
    Mesh,
};


/// Number of decimal places if not configured otherwise.
pub const DEFAULT_PRECISION: usize = 6;


/// Used to configure and create a [`Writer`].
#[derive(Clone, Debug)]
pub struct Config {
    precision: usize,
    comments: bool,
}

impl Config {
    pub fn new() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            comments: true,
        }
    }

    /// Sets the number of decimal places of all numbers.
    pub fn with_precision(self, precision: usize) -> Self {
        Self { precision, .. self }
    }

    /// Whether to write a comment header with the application name and the
    /// element counts. Enabled by default.
    pub fn with_comments(self, comments: bool) -> Self {
        Self { comments, .. self }
    }

    /// Creates a [`Writer`] with `self` as config.
    pub fn into_writer<W: io::Write>(self, writer: W) -> Writer<W> {
        Writer::new(self, writer)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshWriter for Config {
    fn format(&self) -> FileFormat {
        FileFormat::Obj
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

/// Writes OBJ files.
///
/// The output contains one `v` line per vertex, one `vn` line per face (the
/// face normal, computed from the current vertex positions) and one `f` line
/// per face. Each face references its own normal: `f a//i b//i c//i`.
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

        let prec = self.config.precision;
        let mut w = self.writer;

        reporter.set_bounds(0, (mesh.num_vertices() + mesh.num_faces()) as u64);
        let mut done = 0;

        if self.config.comments {
            writeln!(w, "# Generated by mgmesh")?;
            writeln!(w, "# {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces())?;
        }

        for p in mesh.vertices() {
            check_cancelled(reporter)?;
            writeln!(w, "v {:.*} {:.*} {:.*}", prec, p.x, prec, p.y, prec, p.z)?;
            done += 1;
            reporter.update(done);
        }

        for n in face_normals(mesh) {
            // Negative zero would show up as "-0.000000".
            let clean = |v: f64| if v == 0.0 { 0.0 } else { v };
            writeln!(w, "vn {:.*} {:.*} {:.*}", prec, clean(n.x), prec, clean(n.y), prec, clean(n.z))?;
        }

        for (i, face) in mesh.faces().iter().enumerate() {
            check_cancelled(reporter)?;

            let [a, b, c] = face.vertices();
            let n = i + 1;
            writeln!(w, "f {}//{} {}//{} {}//{}", a.idx() + 1, n, b.idx() + 1, n, c.idx() + 1, n)?;

            done += 1;
            reporter.update(done);
        }

        w.flush()?;
        Ok(())
    }
}
