use std::io::BufRead;

use cgmath::Point3;

use crate::{
    handle::VertexIndex,
    io::{check_cancelled, parse::{Line, LineReader}, Error},
    report::Reporter,
    Mesh,
};


/// The result of reading an OBJ file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadResults {
    pub mesh: Mesh,

    /// Number of faces that were skipped because they don't have exactly
    /// three vertices.
    pub skipped_faces: usize,
}

/// A reader for OBJ files.
///
/// Only geometric vertices (`v`) and triangular faces (`f`) are retained.
/// Texture coordinates, normals, groups, materials and everything else are
/// ignored. Faces with more or fewer than three vertices are skipped and
/// reported as a single warning after the whole file has been read.
#[derive(Debug)]
pub struct Reader<R: BufRead> {
    lines: LineReader<R>,
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }

    /// Reads the whole file.
    ///
    /// Progress is reported in bytes. Since the total size is unknown, the
    /// reporter is set to indeterminate while reading.
    pub fn read(mut self, reporter: &mut dyn Reporter) -> Result<ReadResults, Error> {
        let mut mesh = Mesh::new();
        let mut skipped_faces = 0;

        reporter.set_indeterminate(true);

        loop {
            check_cancelled(reporter)?;

            let line = match self.lines.next_line()? {
                Some(line) => line,
                None => break,
            };

            match line.keyword() {
                "v" => {
                    let [x, y, z] = line.parse_args::<f64, 3>()?;
                    mesh.add_vertex(Point3::new(x, y, z));
                }
                "f" => {
                    if line.args().count() != 3 {
                        skipped_faces += 1;
                    } else {
                        let mut face = [VertexIndex::new(0); 3];
                        for (v, token) in face.iter_mut().zip(line.args()) {
                            *v = vertex_ref(&line, token, mesh.num_vertices())?;
                        }
                        mesh.add_face(face);
                    }
                }
                other => tracing::trace!("ignoring OBJ line with keyword '{}'", other),
            }

            reporter.update(self.lines.bytes_read());
        }

        reporter.set_indeterminate(false);

        if skipped_faces > 0 {
            reporter.warn(&format!("OBJ: {} non-triangular faces skipped", skipped_faces));
        }

        mesh.finalize()?;
        tracing::debug!(
            "read OBJ file: {} vertices, {} faces, {} skipped",
            mesh.num_vertices(),
            mesh.num_faces(),
            skipped_faces,
        );

        Ok(ReadResults { mesh, skipped_faces })
    }
}

/// Parses one vertex reference of a face (`v`, `v/vt`, `v//vn` or
/// `v/vt/vn`) and returns the 0-based vertex index.
///
/// Positive indices are 1-based, negative ones are relative to the number of
/// vertices read so far (`-1` is the last vertex).
fn vertex_ref(line: &Line<'_>, token: &str, num_vertices: usize) -> Result<VertexIndex, Error> {
    let raw = token.split('/').next().unwrap_or(token);
    let idx: i64 = line.parse(raw)?;

    let zero_based = match idx {
        0 => return Err(line.error("vertex index 0 is invalid (indices are 1-based)")),
        idx if idx > 0 => idx - 1,
        idx => num_vertices as i64 + idx,
    };

    if zero_based < 0 || zero_based > u32::max_value() as i64 {
        return Err(line.error(format!("vertex index {} is out of range", idx)));
    }

    Ok(VertexIndex::new(zero_based as u32))
}
