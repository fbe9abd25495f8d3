use crate::{
    error::{PolygonizeError, Result},
    field,
    tables::CORNER_OFFSETS,
    types::{Point, Value, Vector},
};

/// Axis-aligned box that the polygonizer samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Returns a box of size `dims` centered on `center`.
    ///
    /// ```text
    ///  min = center - dims/2
    ///  max = center + dims/2
    /// ```
    pub fn centered(center: Point, dims: Vector) -> Self {
        let half = dims / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Returns a box of size `dims` centered on the origin.
    pub fn from_size(dims: Vector) -> Self {
        Self::centered(Point::origin(), dims)
    }

    /// Width, height and depth of the box.
    pub fn extent(&self) -> Vector {
        self.max - self.min
    }

    /// Fails with [`PolygonizeError::InvalidParameter`] unless every extent is finite and positive.
    pub fn validate(&self) -> Result<()> {
        let extent = self.extent();
        for (name, value) in [("width", extent.x), ("height", extent.y), ("depth", extent.z)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PolygonizeError::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Enumerates the cells of a regular grid of cubes tiling a [`Bounds`].
///
/// Each axis holds `ceil(extent / cell_size)` cells, starting at `bounds.min`; the last
/// cell on an axis may stick out past `bounds.max`. Cells are yielded x-major, then y,
/// then z, so repeated walks visit them in the same order.
#[derive(Clone, Debug)]
pub struct GridWalker {
    dims: [usize; 3],
    count: usize,
    next: usize,
}

impl GridWalker {
    /// Returns [`PolygonizeError::InvalidParameter`] if `cell_size` is not a positive
    /// finite number, `bounds` is degenerate, or the grid has more cubes than fit in a
    /// `usize`.
    pub fn new(bounds: &Bounds, cell_size: Value) -> Result<Self> {
        validate_cell_size(cell_size)?;
        bounds.validate()?;

        let extent = bounds.extent();
        let too_fine = PolygonizeError::InvalidParameter {
            name: "cell_size",
            value: cell_size,
        };
        let dims = [
            cells_along(extent.x, cell_size).ok_or(too_fine.clone())?,
            cells_along(extent.y, cell_size).ok_or(too_fine.clone())?,
            cells_along(extent.z, cell_size).ok_or(too_fine.clone())?,
        ];
        let count = dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .ok_or(too_fine)?;

        Ok(Self {
            dims,
            count,
            next: 0,
        })
    }

    /// Number of cells along X, Y and Z.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    pub fn cube_count(&self) -> usize {
        self.count
    }
}

impl Iterator for GridWalker {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }
        let [_, size_y, size_z] = self.dims;
        let i = self.next;
        self.next += 1;
        Some([i / (size_y * size_z), (i / size_z) % size_y, i % size_z])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridWalker {}

pub(crate) fn validate_cell_size(cell_size: Value) -> Result<()> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(PolygonizeError::InvalidParameter {
            name: "cell_size",
            value: cell_size,
        });
    }
    Ok(())
}

/// `None` when the ratio is not finite or does not fit in a `usize`.
fn cells_along(extent: Value, cell_size: Value) -> Option<usize> {
    let cells = (extent / cell_size).ceil().max(1.0);
    if !cells.is_finite() || cells >= usize::MAX as Value {
        return None;
    }
    Some(cells as usize)
}

/// One grid cell with its corner positions and their cached field values.
///
/// Corners follow the ordering documented in [`crate::tables`].
#[derive(Clone, Copy, Debug)]
pub struct SamplingCube {
    pub corners: [Point; 8],
    pub values: [Value; 8],
}

impl SamplingCube {
    /// Samples the field at the 8 corners of cell `index`.
    ///
    /// Corner positions are computed from integer grid coordinates, so a corner shared by
    /// neighbouring cells has the same position and value in each of them.
    pub fn sample(
        generators: &[Point],
        bounds: &Bounds,
        cell_size: Value,
        index: [usize; 3],
    ) -> Self {
        let corners = CORNER_OFFSETS.map(|offset| {
            Point::new(
                bounds.min.x + (index[0] + offset[0]) as Value * cell_size,
                bounds.min.y + (index[1] + offset[1]) as Value * cell_size,
                bounds.min.z + (index[2] + offset[2]) as Value * cell_size,
            )
        });
        let values = corners.map(|corner| field::value(&corner, generators));
        Self { corners, values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> Bounds {
        Bounds::new(Point::origin(), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn centered_bounds() {
        let b = Bounds::from_size(Vector::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Point::new(-1.0, -2.0, -3.0));
        assert_eq!(b.max, Point::new(1.0, 2.0, 3.0));
        assert_eq!(b.extent(), Vector::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn cube_count_rounds_up() {
        let b = Bounds::new(Point::origin(), Point::new(1.0, 2.0, 3.0));
        let walker = GridWalker::new(&b, 0.5).unwrap();
        assert_eq!(walker.dims(), [2, 4, 6]);
        assert_eq!(walker.cube_count(), 48);

        let b = Bounds::new(Point::origin(), Point::new(1.2, 0.25, 1.0));
        let walker = GridWalker::new(&b, 0.5).unwrap();
        assert_eq!(walker.dims(), [3, 1, 2]);
        assert_eq!(walker.count(), 6);
    }

    #[test]
    fn walks_x_major_then_y_then_z() {
        let b = Bounds::new(Point::origin(), Point::new(2.0, 2.0, 2.0));
        let cells: Vec<[usize; 3]> = GridWalker::new(&b, 1.0).unwrap().collect();
        assert_eq!(
            cells,
            vec![
                [0, 0, 0],
                [0, 0, 1],
                [0, 1, 0],
                [0, 1, 1],
                [1, 0, 0],
                [1, 0, 1],
                [1, 1, 0],
                [1, 1, 1],
            ]
        );
    }

    #[test]
    fn rejects_bad_cell_size() {
        for cell_size in [0.0, -0.5, Value::NAN, Value::INFINITY] {
            let err = GridWalker::new(&unit_cube(), cell_size).unwrap_err();
            assert!(matches!(
                err,
                PolygonizeError::InvalidParameter { name: "cell_size", .. }
            ));
        }
    }

    #[test]
    fn rejects_grids_too_large_to_count() {
        let b = Bounds::from_size(Vector::new(100.0, 100.0, 100.0));
        // 1e9 cells per axis fit a usize, but not their product.
        assert_eq!(
            GridWalker::new(&b, 1e-7).unwrap_err(),
            PolygonizeError::InvalidParameter {
                name: "cell_size",
                value: 1e-7
            }
        );
        // A subnormal cell size makes the per-axis ratio infinite.
        let subnormal = Value::from_bits(1);
        assert!(matches!(
            GridWalker::new(&b, subnormal),
            Err(PolygonizeError::InvalidParameter { name: "cell_size", .. })
        ));
    }

    #[test]
    fn large_grids_count_without_walking() {
        let b = Bounds::new(Point::origin(), Point::new(1000.0, 1000.0, 1.0));
        let walker = GridWalker::new(&b, 0.5).unwrap();
        assert_eq!(walker.dims(), [2000, 2000, 2]);
        assert_eq!(walker.cube_count(), 8_000_000);
        assert_eq!(walker.len(), 8_000_000);
    }

    #[test]
    fn rejects_flat_bounds() {
        let b = Bounds::new(Point::origin(), Point::new(1.0, 0.0, 1.0));
        assert_eq!(
            GridWalker::new(&b, 0.5).unwrap_err(),
            PolygonizeError::InvalidParameter {
                name: "height",
                value: 0.0
            }
        );
        let b = Bounds::new(Point::origin(), Point::new(1.0, 1.0, -1.0));
        assert!(GridWalker::new(&b, 0.5).is_err());
    }

    #[test]
    fn samples_corners_and_values() {
        let generators = [Point::origin()];
        let cube = SamplingCube::sample(&generators, &unit_cube(), 0.5, [1, 0, 1]);
        assert_eq!(cube.corners[0], Point::new(0.5, 0.0, 0.5));
        assert_eq!(cube.corners[6], Point::new(1.0, 0.5, 1.0));
        for (corner, value) in cube.corners.iter().zip(cube.values) {
            assert_relative_eq!(value, field::value(corner, &generators));
        }
    }

    #[test]
    fn neighbouring_cubes_share_corner_bits() {
        let generators = [Point::new(0.3, 0.7, 0.1)];
        let b = Bounds::new(Point::new(-0.3, -0.3, -0.3), Point::new(1.0, 1.0, 1.0));
        let left = SamplingCube::sample(&generators, &b, 0.1, [3, 4, 5]);
        let right = SamplingCube::sample(&generators, &b, 0.1, [4, 4, 5]);
        assert_eq!(left.corners[1], right.corners[0]);
        assert_eq!(left.values[1].to_bits(), right.values[0].to_bits());
        assert_eq!(left.corners[6], right.corners[7]);
    }
}
