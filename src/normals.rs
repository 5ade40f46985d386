//! Computing face and vertex normals from the current vertex positions.
//!
//! Normals are never cached: every writer in this crate calls into this
//! module while serializing, so a moved vertex is always reflected in the
//! output.

use cgmath::{prelude::*, Point3, Vector3};

use crate::{handle::FaceIndex, Mesh};


/// Calculates the normal of the triangle defined by the three positions in
/// CCW order: `normalize(cross(b - a, c - a))`.
///
/// Degenerate triangles (zero area) result in the zero vector instead of
/// `NaN` components.
pub fn triangle_normal([a, b, c]: &[Point3<f64>; 3]) -> Vector3<f64> {
    let cross = (*b - *a).cross(*c - *a);
    if cross.magnitude2() == 0.0 {
        Vector3::zero()
    } else {
        cross.normalize()
    }
}

/// Returns the normal of the given face. Panics if the face or one of its
/// vertices doesn't exist.
pub fn face_normal(mesh: &Mesh, face: FaceIndex) -> Vector3<f64> {
    triangle_normal(&mesh.face_triangle(face))
}

/// Returns the normals of all faces, in face order.
pub fn face_normals(mesh: &Mesh) -> Vec<Vector3<f64>> {
    mesh.face_indices().map(|f| face_normal(mesh, f)).collect()
}

/// Returns one normal per vertex, in vertex order.
///
/// Each vertex normal is the normalized sum of the normals of all faces
/// adjacent to the vertex. Vertices without adjacent faces get the zero
/// vector.
pub fn vertex_normals(mesh: &Mesh) -> Vec<Vector3<f64>> {
    let mut sums = vec![Vector3::zero(); mesh.num_vertices()];
    for f in mesh.face_indices() {
        let normal = face_normal(mesh, f);
        for v in &mesh.faces()[f.to_usize()].vertices() {
            sums[v.to_usize()] += normal;
        }
    }

    for n in &mut sums {
        if n.magnitude2() != 0.0 {
            *n = n.normalize();
        }
    }

    sums
}
