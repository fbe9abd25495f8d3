use crate::{
    error::{PolygonizeError, Result},
    field,
    grid::SamplingCube,
    interp::{find_t, interpolate_points},
    tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE},
    types::{Point, Triangle, Value},
};

/// Computes the marching cubes state bitmask for a cube.
///
/// Each of the 8 corners maps to one bit. A bit is set when the corner's value
/// is **at or above** the threshold (i.e. "inside" the blob):
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// state bits:   [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 inside?
/// ```
#[inline]
pub fn cube_state(values: &[Value; 8], threshold: Value) -> u8 {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v >= threshold)
        .fold(0u8, |state, (i, _)| state | (1 << i))
}

/// Interpolates the surface crossing along each edge set in `edges_mask`.
///
/// `edges_mask` is a 12-bit field from `EDGE_TABLE`; edges whose bit is clear stay `None`.
#[inline]
pub fn edge_crossings(
    edges_mask: u16,
    cube: &SamplingCube,
    threshold: Value,
) -> [Option<Point>; 12] {
    let mut crossings: [Option<Point>; 12] = [None; 12];

    for (i, &[a, b]) in EDGE_CORNERS.iter().enumerate() {
        if (edges_mask & (1 << i)) == 0 {
            continue;
        }
        let t = find_t(cube.values[a], cube.values[b], threshold);
        crossings[i] = Some(interpolate_points(&cube.corners[a], &cube.corners[b], t));
    }

    crossings
}

/// Triangulates one cube and hands each triangle to `emit`.
///
/// `TRI_TABLE[state]` contains edge indices in groups of three, terminated by `-1`:
/// ```text
/// TRI_TABLE[state] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
///                     \___tri0__/   \___tri1__/
/// ```
/// Every triple is emitted as `(e0, e2, e1)` so the face normal points out of the solid,
/// matching the per-vertex normals taken from the field gradient.
///
/// Returns [`PolygonizeError::InternalConsistency`] if the table names an edge that is
/// not crossed in this configuration. Errors from `emit` stop the cube and are passed on.
pub fn triangulate<F>(
    cube: &SamplingCube,
    generators: &[Point],
    threshold: Value,
    mut emit: F,
) -> Result<()>
where
    F: FnMut(Triangle) -> Result<()>,
{
    let state = cube_state(&cube.values, threshold);
    let edges_mask = EDGE_TABLE[state as usize];
    if edges_mask == 0 {
        return Ok(());
    }

    let crossings = edge_crossings(edges_mask, cube, threshold);
    let row = &TRI_TABLE[state as usize];
    let len = row.iter().position(|&e| e == -1).unwrap_or(row.len());

    for tri in row[..len].chunks(3) {
        let [e0, e1, e2] = tri else {
            return Err(PolygonizeError::InternalConsistency {
                state,
                edge: tri[tri.len() - 1],
            });
        };
        let positions = [
            crossing(&crossings, state, *e0)?,
            crossing(&crossings, state, *e2)?,
            crossing(&crossings, state, *e1)?,
        ];
        let normals = positions.map(|p| field::normal(&p, generators));
        emit(Triangle { positions, normals })?;
    }

    Ok(())
}

fn crossing(crossings: &[Option<Point>; 12], state: u8, edge: i8) -> Result<Point> {
    usize::try_from(edge)
        .ok()
        .and_then(|e| crossings.get(e).copied().flatten())
        .ok_or(PolygonizeError::InternalConsistency { state, edge })
}
