use cgmath::{Matrix4, Point3, Transform};
use failure::Fail;

use crate::handle::{FaceIndex, VertexIndex};


/// A triangular face: three vertex indices in CCW order (when looking at the
/// face from the outside).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    pub a: VertexIndex,
    pub b: VertexIndex,
    pub c: VertexIndex,
}

impl Face {
    pub fn new(a: VertexIndex, b: VertexIndex, c: VertexIndex) -> Self {
        Self { a, b, c }
    }

    /// Returns the three vertex indices as array `[a, b, c]`.
    pub fn vertices(&self) -> [VertexIndex; 3] {
        [self.a, self.b, self.c]
    }
}

impl From<[VertexIndex; 3]> for Face {
    fn from([a, b, c]: [VertexIndex; 3]) -> Self {
        Self { a, b, c }
    }
}

/// Violation of the mesh invariant: a face references a vertex that does not
/// exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Fail)]
#[fail(
    display = "face {} references vertex {}, but the mesh only has {} vertices",
    face, vertex, num_vertices
)]
pub struct MeshError {
    pub face: FaceIndex,
    pub vertex: VertexIndex,
    pub num_vertices: usize,
}

/// Axis aligned bounding box of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

/// An indexed triangle mesh.
///
/// Vertices and faces are stored in insertion order: the n-th added vertex
/// has the index `n`, same for faces. Faces may reference vertices that are
/// added later; the invariant that every face index is valid is only checked
/// by [`Mesh::validate`] and [`Mesh::finalize`]. All codecs in this crate
/// call one of those before touching the geometry.
///
/// Normals are never stored. Use the functions in [`normals`][crate::normals]
/// to compute them from the current vertex positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3<f64>>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Returns an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an empty mesh with space for the given number of elements.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
        }
    }

    pub fn reserve(&mut self, additional_vertices: usize, additional_faces: usize) {
        self.vertices.reserve(additional_vertices);
        self.faces.reserve(additional_faces);
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Returns `true` if the mesh has neither vertices nor faces.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexIndex {
        let idx = VertexIndex::from_usize(self.vertices.len());
        self.vertices.push(position);
        idx
    }

    /// Appends a face and returns its index. The vertex indices are not
    /// checked here.
    pub fn add_face(&mut self, vertices: [VertexIndex; 3]) -> FaceIndex {
        let idx = FaceIndex::from_usize(self.faces.len());
        self.faces.push(vertices.into());
        idx
    }

    /// Returns the position of the given vertex or `None` if it doesn't exist.
    pub fn vertex(&self, v: VertexIndex) -> Option<Point3<f64>> {
        self.vertices.get(v.to_usize()).copied()
    }

    /// Moves the given vertex. Panics if the vertex doesn't exist.
    pub fn set_vertex(&mut self, v: VertexIndex, position: Point3<f64>) {
        self.vertices[v.to_usize()] = position;
    }

    /// Returns the given face or `None` if it doesn't exist.
    pub fn face(&self, f: FaceIndex) -> Option<Face> {
        self.faces.get(f.to_usize()).copied()
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_indices(&self) -> impl Iterator<Item = VertexIndex> {
        (0..self.vertices.len()).map(VertexIndex::from_usize)
    }

    pub fn face_indices(&self) -> impl Iterator<Item = FaceIndex> {
        (0..self.faces.len()).map(FaceIndex::from_usize)
    }

    /// Returns the positions of the three corners of the given face.
    ///
    /// Panics if the face doesn't exist or references a non-existent vertex.
    pub fn face_triangle(&self, f: FaceIndex) -> [Point3<f64>; 3] {
        let face = self.faces[f.to_usize()];
        [
            self.vertices[face.a.to_usize()],
            self.vertices[face.b.to_usize()],
            self.vertices[face.c.to_usize()],
        ]
    }

    /// Checks that every face only references existing vertices. Returns the
    /// first violation.
    pub fn validate(&self) -> Result<(), MeshError> {
        let num_vertices = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if let Some(&vertex) = face.vertices().iter().find(|v| v.to_usize() >= num_vertices) {
                return Err(MeshError {
                    face: FaceIndex::from_usize(i),
                    vertex,
                    num_vertices,
                });
            }
        }

        Ok(())
    }

    /// Marks the end of incremental construction: validates the mesh and
    /// releases excess capacity.
    pub fn finalize(&mut self) -> Result<(), MeshError> {
        self.validate()?;
        self.vertices.shrink_to_fit();
        self.faces.shrink_to_fit();
        Ok(())
    }

    /// Removes all vertices and faces.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
    }

    /// Applies the affine transformation `m` to every vertex position.
    pub fn transform(&mut self, m: &Matrix4<f64>) {
        for p in &mut self.vertices {
            *p = m.transform_point(*p);
        }
    }

    /// Appends all vertices and faces of `other` to this mesh. The face
    /// indices of `other` are shifted accordingly.
    pub fn append(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        let shift = |v: VertexIndex| VertexIndex::from_usize(v.to_usize() + offset);

        self.reserve(other.vertices.len(), other.faces.len());
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(other.faces.iter().map(|f| Face::new(shift(f.a), shift(f.b), shift(f.c))));
    }

    /// Concatenates all given meshes into one.
    pub fn merge<'a>(meshes: impl IntoIterator<Item = &'a Mesh>) -> Mesh {
        let mut out = Mesh::new();
        for mesh in meshes {
            out.append(mesh);
        }
        out
    }

    /// Returns the bounding box of all vertices, or `None` if there are no
    /// vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = *self.vertices.first()?;
        let bb = self.vertices[1..].iter().fold(
            BoundingBox { min: first, max: first },
            |bb, p| BoundingBox {
                min: Point3::new(bb.min.x.min(p.x), bb.min.y.min(p.y), bb.min.z.min(p.z)),
                max: Point3::new(bb.max.x.max(p.x), bb.max.y.max(p.y), bb.max.z.max(p.z)),
            },
        );

        Some(bb)
    }
}
