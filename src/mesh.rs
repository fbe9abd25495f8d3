use crate::{
    error::{PolygonizeError, Result},
    types::{Point, Triangle, Value, Vector},
};

/// Mesh data produced by the polygonizer.
///
/// Vertices are stored flat: every triangle owns three consecutive vertices, so
/// `indices` is simply `0, 1, 2, 3, ...`. Neighbouring triangles meet at identical
/// positions but never share a vertex record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneratedMesh {
    /// Flat list of vertex positions: `[[x, y, z], ...]`
    pub vertices: Vec<[Value; 3]>,

    /// Per-vertex unit normals, parallel to `vertices`.
    pub normals: Vec<[Value; 3]>,

    /// Triangle corner indices into `vertices`, three per triangle.
    ///
    /// Being `u32`, they cap a mesh at `u32::MAX + 1` vertices.
    pub indices: Vec<u32>,
}

impl GeneratedMesh {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Appends a triangle with three fresh vertices.
    ///
    /// Returns [`PolygonizeError::MeshTooLarge`] and leaves the mesh untouched if the
    /// new vertices could not be addressed by a `u32` index.
    pub fn push_triangle(&mut self, triangle: &Triangle) -> Result<()> {
        let first = vertex_index(self.vertices.len())?;
        vertex_index(self.vertices.len() + 2)?;

        for (k, (p, n)) in triangle.positions.iter().zip(&triangle.normals).enumerate() {
            self.indices.push(first + k as u32);
            self.vertices.push([p.x, p.y, p.z]);
            self.normals.push([n.x, n.y, n.z]);
        }
        Ok(())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex count of every face, which is always 3.
    ///
    /// Hosts that build polygon meshes from counts plus a flat index list can pass this
    /// straight through.
    pub fn polygon_counts(&self) -> Vec<u32> {
        vec![3; self.triangle_count()]
    }

    /// Returns the three vertex positions of triangle `tri`.
    pub fn tri_coords(&self, tri: usize) -> [Point; 3] {
        let corner = |k: usize| Point::from(self.vertices[self.indices[tri * 3 + k] as usize]);
        [corner(0), corner(1), corner(2)]
    }

    /// Computes the face normal for triangle `tri` from its winding.
    ///
    /// Returns the zero vector if the triangle is degenerate.
    pub fn face_normal(&self, tri: usize) -> Vector {
        let [a, b, c] = self.tri_coords(tri);
        let cross = (b - a).cross(&(c - b));

        let nrm = cross.norm();
        if nrm == 0.0 {
            Vector::zeros()
        } else {
            cross / nrm
        }
    }

    /// Checks the buffer invariants: parallel vertex and normal buffers, whole triangles,
    /// indices in range and finite data.
    pub fn is_well_formed(&self) -> bool {
        self.vertices.len() == self.normals.len()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < self.vertices.len())
            && self
                .vertices
                .iter()
                .chain(&self.normals)
                .flatten()
                .all(|c| c.is_finite())
    }
}

fn vertex_index(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| PolygonizeError::MeshTooLarge { vertices: len })
}
