use std::io::Read;

use cgmath::Point3;

use crate::{
    handle::VertexIndex,
    io::{
        check_cancelled,
        stream::{ByteOrder, OrderedReader},
        Error,
    },
    report::Reporter,
    Mesh,
};
use super::{Header, Precision};

/// Upper bound for the number of records reserved up front.
const MAX_PREALLOC: u64 = 1 << 16;

/// A reader for Duff files.
///
/// Creating the reader parses the header; [`Reader::read`] then streams the
/// body. The body consists of `n_faces` face records (three `i32` vertex
/// indices each) followed by `n_nodes` vertex records (three floats each,
/// 32 or 64 bit depending on the header's precision).
///
/// Node attached data and the header's orientation are not supported: a
/// warning is reported if a file has either, and the vertex positions are
/// returned untransformed. Use [`Mesh::transform`] with
/// [`Header::transform_matrix`] to apply the orientation explicitly.
#[derive(Debug)]
pub struct Reader<R: Read> {
    stream: OrderedReader<R>,
    header: Header,
}

impl<R: Read> Reader<R> {
    /// Parses the header from `reader` and returns a reader positioned
    /// directly behind it.
    pub fn new(reader: R) -> Result<Self, Error> {
        let mut stream = OrderedReader::new(reader, ByteOrder::BigEndian);
        let header = Header::read_from(&mut stream)?;

        Ok(Self { stream, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Reads the body and returns the finished mesh.
    ///
    /// Polls `reporter` for cancellation between records. A body that is
    /// shorter than the header announces results in
    /// [`ErrorKind::UnexpectedEof`][crate::io::ErrorKind::UnexpectedEof].
    pub fn read(self, reporter: &mut dyn Reporter) -> Result<Mesh, Error> {
        let Self { mut stream, header } = self;

        if !header.has_identity_transform() {
            reporter.warn("Duff: orientation in header is not applied to the vertex positions");
        }
        if header.pd_offset != 0 {
            reporter.warn("Duff: node attached data is not supported and was ignored");
        }

        // The body starts at `hdr_size`, which might be larger than the fixed
        // header we already consumed.
        stream.skip(header.hdr_size as u64 - stream.offset())?;

        let n_faces = header.n_faces as u64;
        let n_nodes = header.n_nodes as u64;
        reporter.set_bounds(0, n_faces + n_nodes);

        // The counts are untrusted; the body may be much shorter than claimed.
        let mut mesh = Mesh::with_capacity(
            n_nodes.min(MAX_PREALLOC) as usize,
            n_faces.min(MAX_PREALLOC) as usize,
        );

        for i in 0..n_faces {
            check_cancelled(reporter)?;

            let mut face = [VertexIndex::new(0); 3];
            for v in &mut face {
                let idx = stream.read_i32()?;
                if idx < 0 {
                    return Err(Error::invalid_data(
                        format!("face {} references negative vertex index {}", i, idx)
                    ));
                }
                *v = VertexIndex::new(idx as u32);
            }
            mesh.add_face(face);

            reporter.update(i + 1);
        }

        for i in 0..n_nodes {
            check_cancelled(reporter)?;

            let pos = match header.precision {
                Precision::Single => Point3::new(
                    stream.read_f32()? as f64,
                    stream.read_f32()? as f64,
                    stream.read_f32()? as f64,
                ),
                Precision::Double => Point3::new(
                    stream.read_f64()?,
                    stream.read_f64()?,
                    stream.read_f64()?,
                ),
            };
            mesh.add_vertex(pos);

            reporter.update(n_faces + i + 1);
        }

        mesh.finalize()?;
        tracing::debug!(
            "read Duff body: {} faces, {} vertices ({} bytes)",
            mesh.num_faces(),
            mesh.num_vertices(),
            stream.offset(),
        );

        Ok(mesh)
    }
}
