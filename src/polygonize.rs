use crate::{
    error::Result,
    grid::{Bounds, GridWalker, SamplingCube},
    mesh::GeneratedMesh,
    params::PolygonizeParams,
    triangulate::triangulate,
    types::{Point, Triangle, Value},
};

/// Polygonizes the metaball field of `generators` at `threshold`.
///
/// The field is sampled on a grid of `cell_size` cubes covering `bounds`. Returns a
/// [`GeneratedMesh`] with one fresh vertex per triangle corner, sequential indices and
/// unit normals from the field gradient.
///
/// ```text
/// Per cube (x-major, then y, then z):
/// 1. SamplingCube::sample  →  8 corner positions + 8 field values
/// 2. cube_state            →  256-entry lookup key
/// 3. EDGE_TABLE[state]     →  bitmask of crossed edges
/// 4. edge_crossings        →  up to 12 interpolated points
/// 5. TRI_TABLE[state]      →  up to 5 triangles, normals from the field gradient
/// ```
///
/// Fails with [`InvalidParameter`](crate::PolygonizeError::InvalidParameter) before
/// sampling anything if `cell_size`, `bounds` or `threshold` is unusable. An empty
/// `generators` slice is not an error; it yields an empty mesh for any positive threshold.
pub fn polygonize(
    generators: &[Point],
    threshold: Value,
    cell_size: Value,
    bounds: &Bounds,
) -> Result<GeneratedMesh> {
    polygonize_with(
        generators,
        &PolygonizeParams {
            threshold,
            cell_size,
            bounds: *bounds,
        },
    )
}

/// Like [`polygonize`], taking its parameters from a [`PolygonizeParams`].
#[tracing::instrument(skip_all, name = "blobify::polygonize")]
pub fn polygonize_with(generators: &[Point], params: &PolygonizeParams) -> Result<GeneratedMesh> {
    params.validate()?;
    for (name, value) in params.soft_range_warnings() {
        log::warn!("{name} = {value} is outside its recommended range");
    }

    let walker = GridWalker::new(&params.bounds, params.cell_size)?;
    let [size_x, size_y, size_z] = walker.dims();
    log::debug!(
        "polygonizing {} generators over {size_x}x{size_y}x{size_z} cubes",
        generators.len()
    );

    let mut mesh = GeneratedMesh::new_empty();
    for index in walker {
        let cube = SamplingCube::sample(generators, &params.bounds, params.cell_size, index);
        triangulate(&cube, generators, params.threshold, |tri| {
            mesh.push_triangle(&tri)
        })?;
    }

    log::debug!("generated {} triangles", mesh.triangle_count());
    Ok(mesh)
}

/// Lazily yields triangles cube by cube, in the same order [`polygonize`] stores them.
///
/// Parameters are validated up front. A cube whose table lookup fails yields its
/// [`InternalConsistency`](crate::PolygonizeError::InternalConsistency) error in place of
/// its triangles.
pub fn triangles<'a>(
    generators: &'a [Point],
    threshold: Value,
    cell_size: Value,
    bounds: &Bounds,
) -> Result<impl Iterator<Item = Result<Triangle>> + use<'a>> {
    let params = PolygonizeParams {
        threshold,
        cell_size,
        bounds: *bounds,
    };
    params.validate()?;
    let walker = GridWalker::new(&params.bounds, params.cell_size)?;

    Ok(walker.flat_map(move |index| {
        let cube = SamplingCube::sample(generators, &params.bounds, params.cell_size, index);
        let mut batch: Vec<Result<Triangle>> = Vec::new();
        let pushed = triangulate(&cube, generators, params.threshold, |tri| {
            batch.push(Ok(tri));
            Ok(())
        });
        match pushed {
            Ok(()) => batch,
            Err(err) => vec![Err(err)],
        }
    }))
}
