//! Metaball polygonizer.
//!
//! Turns a set of point generators into a triangle mesh of the surface where their
//! summed field equals a threshold, using Marching Cubes over a regular grid.
//!
//! ```rust,ignore
//! use blobify::{Bounds, polygonize, types::{Point, Vector}};
//!
//! let generators = [Point::new(-0.5, 0.0, 0.0), Point::new(0.5, 0.0, 0.0)];
//! let bounds = Bounds::from_size(Vector::new(4.0, 4.0, 4.0));
//! let mesh = polygonize(&generators, 2.0, 0.1, &bounds)?;
//! ```

pub mod error;
pub mod field;
pub mod grid;
pub mod interp;
pub mod mesh;
pub mod params;
pub mod polygonize;
pub mod tables;
pub mod triangulate;
pub mod types;

pub use error::{PolygonizeError, Result};
pub use grid::Bounds;
pub use mesh::GeneratedMesh;
pub use params::PolygonizeParams;
pub use polygonize::{polygonize, polygonize_with, triangles};
