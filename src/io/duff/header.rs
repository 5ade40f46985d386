use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

use cgmath::{Matrix, Matrix4};
use static_assertions::const_assert_eq;

use crate::io::{
    stream::{ByteOrder, OrderedReader, OrderedWriter},
    Error, ErrorKind, FileFormat,
};


/// Magic bytes of a big endian Duff file.
pub const MAGIC_BE: [u8; 8] = *b"DUFFSURF";

/// Magic bytes of a little endian Duff file: the big endian magic with its
/// bytes reversed, so the first byte is `'F'`.
pub const MAGIC_LE: [u8; 8] = *b"FRUSFFUD";

/// Size of the fixed header in bytes. The body of a file never starts before
/// this offset.
pub const HEADER_LEN: usize = 8  // magic
    + 4                          // version
    + 10 * 4                     // counts and offsets
    + 1 + 3                      // precision + padding
    + 16 * 8                     // orientation
    + 12;                        // reserved

const_assert_eq!(HEADER_LEN, 196);

const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 1.0, 0.0,
    0.0, 0.0, 0.0, 1.0,
];

/// Returns the byte order selected by the first magic byte: `'F'` means
/// little endian, everything else big endian.
pub fn byte_order_of(magic: &[u8; 8]) -> ByteOrder {
    if magic[0] == b'F' {
        ByteOrder::LittleEndian
    } else {
        ByteOrder::BigEndian
    }
}

/// Returns the magic bytes for the given byte order.
pub fn magic_for(order: ByteOrder) -> [u8; 8] {
    match order {
        ByteOrder::BigEndian => MAGIC_BE,
        ByteOrder::LittleEndian => MAGIC_LE,
    }
}

/// Floating point precision of the vertex records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// 32 bit floats.
    Single,
    /// 64 bit floats.
    Double,
}

impl Precision {
    fn from_raw(raw: i8) -> Result<Self, Error> {
        match raw {
            32 => Ok(Precision::Single),
            64 => Ok(Precision::Double),
            other => Err(Error::invalid_header(
                format!("precision must be 32 or 64, but is {}", other)
            )),
        }
    }

    fn to_raw(self) -> i8 {
        match self {
            Precision::Single => 32,
            Precision::Double => 64,
        }
    }

    /// Size of one coordinate in bytes.
    pub fn size(self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }
}

/// The fixed size header at the start of every Duff file.
///
/// All counts and offsets are stored as signed 32 bit integers in the file.
/// Negative counts are rejected while parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub magic: [u8; 8],

    /// Byte order of everything after the magic bytes. Derived from
    /// `magic[0]`.
    pub byte_order: ByteOrder,

    pub version: i32,

    /// Offset of the first face record from the start of the file.
    pub hdr_size: i32,
    pub md_offset: i32,

    /// Offset of node attached data. `0` means there is none.
    pub pd_offset: i32,
    pub n_faces: i32,
    pub n_nodes: i32,
    pub n_strips: i32,
    pub strip_size: i32,
    pub normals: i32,
    pub uv_start: i32,
    pub vc_offset: i32,
    pub precision: Precision,

    /// Affine transform, 16 values in row-major order.
    pub orientation: [f64; 16],
}

impl Header {
    /// Creates a header for a file with the given number of faces and nodes.
    /// All other offsets are zero and the orientation is the identity.
    pub fn new(
        byte_order: ByteOrder,
        version: i32,
        precision: Precision,
        n_faces: i32,
        n_nodes: i32,
    ) -> Self {
        Self {
            magic: magic_for(byte_order),
            byte_order,
            version,
            hdr_size: HEADER_LEN as i32,
            md_offset: 0,
            pd_offset: 0,
            n_faces,
            n_nodes,
            n_strips: 0,
            strip_size: 0,
            normals: 0,
            uv_start: 0,
            vc_offset: 0,
            precision,
            orientation: IDENTITY,
        }
    }

    /// Parses the header from the start of `r`.
    ///
    /// The first magic byte selects the byte order of `r` for everything
    /// that follows, including the body. The magic bytes must match the
    /// selected byte order exactly.
    pub fn read_from<R: Read>(r: &mut OrderedReader<R>) -> Result<Self, Error> {
        let magic = r.read_bytes::<8>()?;
        let byte_order = byte_order_of(&magic);
        if magic != magic_for(byte_order) {
            return Err(ErrorKind::InvalidMagic(magic).into());
        }
        r.set_byte_order(byte_order);

        let version = r.read_i32()?;
        let mut counts = [0i32; 10];
        for c in &mut counts {
            *c = r.read_i32()?;
        }
        let [
            hdr_size, md_offset, pd_offset, n_faces, n_nodes,
            n_strips, strip_size, normals, uv_start, vc_offset,
        ] = counts;

        let precision = Precision::from_raw(r.read_i8()?)?;
        r.read_bytes::<3>()?;

        let mut orientation = [0.0; 16];
        for v in &mut orientation {
            *v = r.read_f64()?;
        }
        r.read_bytes::<12>()?;

        if hdr_size < HEADER_LEN as i32 {
            return Err(Error::invalid_header(
                format!("header size {} is smaller than {} bytes", hdr_size, HEADER_LEN)
            ));
        }
        if n_faces < 0 || n_nodes < 0 {
            return Err(Error::invalid_header(
                format!("negative element count ({} faces, {} nodes)", n_faces, n_nodes)
            ));
        }

        tracing::debug!(
            "parsed Duff header: {:?}, version {}, {} faces, {} nodes",
            byte_order,
            version,
            n_faces,
            n_nodes,
        );

        Ok(Self {
            magic,
            byte_order,
            version,
            hdr_size,
            md_offset,
            pd_offset,
            n_faces,
            n_nodes,
            n_strips,
            strip_size,
            normals,
            uv_start,
            vc_offset,
            precision,
            orientation,
        })
    }

    /// Writes the header in its own byte order. Exactly [`HEADER_LEN`] bytes
    /// are written.
    pub fn write_to<W: Write>(&self, w: &mut OrderedWriter<W>) -> Result<(), Error> {
        w.set_byte_order(self.byte_order);
        w.write_bytes(&self.magic)?;
        w.write_i32(self.version)?;
        for &c in &[
            self.hdr_size, self.md_offset, self.pd_offset, self.n_faces, self.n_nodes,
            self.n_strips, self.strip_size, self.normals, self.uv_start, self.vc_offset,
        ] {
            w.write_i32(c)?;
        }
        w.write_i8(self.precision.to_raw())?;
        w.write_bytes(&[0; 3])?;
        for &v in &self.orientation {
            w.write_f64(v)?;
        }
        w.write_bytes(&[0; 12])?;

        Ok(())
    }

    /// Returns the orientation as matrix.
    pub fn transform_matrix(&self) -> Matrix4<f64> {
        let o = &self.orientation;
        let rows = [
            [o[0], o[1], o[2], o[3]],
            [o[4], o[5], o[6], o[7]],
            [o[8], o[9], o[10], o[11]],
            [o[12], o[13], o[14], o[15]],
        ];

        // `From<[[_; 4]; 4]>` interprets the inner arrays as columns.
        Matrix4::from(rows).transpose()
    }

    pub fn has_identity_transform(&self) -> bool {
        self.orientation == IDENTITY
    }
}

/// Returns `true` if `data` starts with the magic bytes of either byte order.
pub fn is_file_start(data: &[u8]) -> bool {
    data.len() >= 8 && (data[..8] == MAGIC_BE || data[..8] == MAGIC_LE)
}

/// Opens the file at `path` and parses its header. Only the header is read.
pub fn read_header(path: impl AsRef<Path>) -> Result<Header, Error> {
    let result = (|| -> Result<Header, Error> {
        let file = BufReader::new(File::open(path)?);
        Header::read_from(&mut OrderedReader::new(file, ByteOrder::BigEndian))
    })();

    result.map_err(|e| e.in_format(FileFormat::Duff))
}
