use std::convert::TryInto;

use byteorder::{ByteOrder, LittleEndian};
use cgmath::Point3;

use crate::{handle::VertexIndex, report::Reporter, Mesh};


/// Panics with a readable comparison of `actual` and the golden file
/// `filename`. The actual bytes are saved next to the system's temporary
/// files so they can be inspected or promoted to a new golden file.
pub(crate) fn file_failure(actual: &[u8], expected: &[u8], filename: &str) {
    let dump = failure_dump_path(filename);
    let saved = match std::fs::write(&dump, actual) {
        Ok(()) => format!("saved to '{}'", dump.display()),
        Err(e) => format!("could not be saved: {}", e),
    };

    let first_diff = actual.iter()
        .zip(expected)
        .position(|(a, e)| a != e)
        .unwrap_or_else(|| actual.len().min(expected.len()));

    panic!(
        "output differs from '{}' at byte {} (expected {} bytes, got {}; actual output {})\n\
            --- expected\n{}\n--- actual\n{}",
        filename,
        first_diff,
        expected.len(),
        actual.len(),
        saved,
        show_bytes(expected),
        show_bytes(actual),
    );
}

fn failure_dump_path(filename: &str) -> std::path::PathBuf {
    let name = filename.replace(|c: char| !c.is_ascii_alphanumeric() && c != '.', "_");
    std::env::temp_dir().join(format!("mgmesh-actual-{}", name))
}

/// Text is shown as is, everything else as hex rows of 16 bytes.
fn show_bytes(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(s) if !data.contains(&0) => s.to_owned(),
        _ => data.chunks(16)
            .map(|row| row.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

macro_rules! assert_eq_file {
    ($actual:expr, $filename:expr) => {
        let actual = $actual as &[u8];
        let expected = include_bytes!(concat!("test_files/", $filename)) as &[u8];
        if actual != expected {
            crate::test_utils::file_failure(actual, expected, $filename);
        }
    }
}

macro_rules! assert_close {
    ($left:expr, $right:expr) => {
        assert_close!($left, $right, 1e-6)
    };
    ($left:expr, $right:expr, $eps:expr) => {{
        let (left, right) = ($left as f64, $right as f64);
        if (left - right).abs() > $eps {
            panic!(
                "assertion failed: `{} ≈ {}` (left: {}, right: {})",
                stringify!($left),
                stringify!($right),
                left,
                right,
            );
        }
    }};
}


// ===========================================================================
// ===== Sample meshes
// ===========================================================================

/// The triangle (0, 0, 0), (1, 0, 0), (0, 1, 0) with normal (0, 0, 1).
pub(crate) fn single_triangle() -> Mesh {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let b = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    let c = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    mesh.add_face([a, b, c]);
    mesh
}

/// A closed tetrahedron with all faces pointing outwards.
pub(crate) fn tetrahedron() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));

    let v = VertexIndex::new;
    mesh.add_face([v(0), v(2), v(1)]);
    mesh.add_face([v(0), v(1), v(3)]);
    mesh.add_face([v(0), v(3), v(2)]);
    mesh.add_face([v(1), v(2), v(3)]);
    mesh
}

/// A flat strip of `n` triangles, useful whenever a mesh with many faces is
/// needed.
pub(crate) fn strip(n: u32) -> Mesh {
    let mut mesh = Mesh::new();
    for i in 0..n + 2 {
        mesh.add_vertex(Point3::new((i / 2) as f64, (i % 2) as f64, 0.0));
    }
    for i in 0..n {
        let v = VertexIndex::new;
        if i % 2 == 0 {
            mesh.add_face([v(i), v(i + 2), v(i + 1)]);
        } else {
            mesh.add_face([v(i), v(i + 1), v(i + 2)]);
        }
    }
    mesh
}


// ===========================================================================
// ===== Reporter
// ===========================================================================

/// Records everything it is told. Cancels once an update with a position of
/// at least `cancel_at` has been reported.
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub indeterminate: Vec<bool>,
    pub bounds: Option<(u64, u64)>,
    pub updates: Vec<u64>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub cancel_at: Option<u64>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_after(k: u64) -> Self {
        Self {
            cancel_at: Some(k),
            .. Self::default()
        }
    }

    pub fn last_update(&self) -> Option<u64> {
        self.updates.last().copied()
    }
}

impl Reporter for RecordingReporter {
    fn set_indeterminate(&mut self, indeterminate: bool) {
        self.indeterminate.push(indeterminate);
    }

    fn set_bounds(&mut self, min: u64, max: u64) {
        self.bounds = Some((min, max));
    }

    fn update(&mut self, position: u64) {
        self.updates.push(position);
    }

    fn is_cancelled(&self) -> bool {
        match (self.cancel_at, self.last_update()) {
            (Some(k), Some(pos)) => pos >= k,
            (Some(0), None) => true,
            _ => false,
        }
    }

    fn warn(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }
}


// ===========================================================================
// ===== Binary STL decoding
// ===========================================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StlTriangle {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
    pub attribute_byte_count: u16,
}

/// Minimal binary STL reader used to check the output of the writer.
/// Returns the 80 byte header and all triangles. Panics on malformed data.
pub(crate) fn decode_binary_stl(data: &[u8]) -> ([u8; 80], Vec<StlTriangle>) {
    assert!(data.len() >= 84, "binary STL shorter than 84 bytes");

    let header: [u8; 80] = data[..80].try_into().unwrap();
    let count = LittleEndian::read_u32(&data[80..84]) as usize;
    assert_eq!(data.len(), 84 + 50 * count, "file size does not match triangle count");

    let vec3 = |buf: &[u8]| [
        LittleEndian::read_f32(&buf[0..4]),
        LittleEndian::read_f32(&buf[4..8]),
        LittleEndian::read_f32(&buf[8..12]),
    ];

    let triangles = data[84..].chunks(50).map(|buf| {
        StlTriangle {
            normal: vec3(&buf[0..12]),
            vertices: [vec3(&buf[12..24]), vec3(&buf[24..36]), vec3(&buf[36..48])],
            attribute_byte_count: LittleEndian::read_u16(&buf[48..50]),
        }
    }).collect();

    (header, triangles)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "output differs from 'golden.stl' at byte 2")]
    fn file_failure_names_first_difference() {
        file_failure(b"abXd", b"abcd", "golden.stl");
    }

    #[test]
    fn failure_dump_goes_to_temp_dir() {
        let path = failure_dump_path("sub/dir file.stl");
        assert!(path.starts_with(std::env::temp_dir()));
        assert_eq!(path.file_name().unwrap(), "mgmesh-actual-sub_dir_file.stl");
    }

    #[test]
    fn binary_data_is_shown_as_hex() {
        assert_eq!(show_bytes(b"solid x"), "solid x");
        assert_eq!(show_bytes(&[0, 255, 16]), "00 ff 10");
    }
}
