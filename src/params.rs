use crate::{
    error::{PolygonizeError, Result},
    grid::{Bounds, validate_cell_size},
    types::{Value, Vector},
};

/// Recommended threshold range for user-facing controls.
pub const THRESHOLD_SOFT_RANGE: [Value; 2] = [0.0, 25.0];

/// Recommended cell size range for user-facing controls.
pub const CELL_SIZE_SOFT_RANGE: [Value; 2] = [0.05, 10.0];

/// Recommended range for each bounds extent.
pub const BOUNDS_SOFT_RANGE: [Value; 2] = [0.1, 100.0];

/// Parameters for one polygonization.
///
/// ```rust,ignore
/// let params = PolygonizeParams::default()
///     .with_threshold(4.0)
///     .with_cell_size(0.05)
///     .with_bounds_size(8.0, 4.0, 4.0);
/// let mesh = polygonize_with(&generators, &params)?;
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonizeParams {
    /// Iso-surface threshold; field values ≥ threshold are "inside". Default: `10.0`.
    pub threshold: Value,
    /// Edge length of each sampling cube. Default: `0.1`.
    pub cell_size: Value,
    /// Region to polygonize. Default: a 5×5×5 box centered on the origin.
    pub bounds: Bounds,
}

impl Default for PolygonizeParams {
    fn default() -> Self {
        Self {
            threshold: 10.0,
            cell_size: 0.1,
            bounds: Bounds::from_size(Vector::new(5.0, 5.0, 5.0)),
        }
    }
}

impl PolygonizeParams {
    pub fn with_threshold(mut self, threshold: Value) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_cell_size(mut self, cell_size: Value) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Uses a `width × height × depth` box centered on the origin.
    pub fn with_bounds_size(mut self, width: Value, height: Value, depth: Value) -> Self {
        self.bounds = Bounds::from_size(Vector::new(width, height, depth));
        self
    }

    /// Rejects parameters the polygonizer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.threshold.is_nan() {
            return Err(PolygonizeError::InvalidParameter {
                name: "threshold",
                value: self.threshold,
            });
        }
        validate_cell_size(self.cell_size)?;
        self.bounds.validate()
    }

    /// Names and values of parameters outside their soft range.
    ///
    /// These are legal, just unusual enough to be worth a log line.
    pub fn soft_range_warnings(&self) -> Vec<(&'static str, Value)> {
        let extent = self.bounds.extent();
        [
            ("threshold", self.threshold, THRESHOLD_SOFT_RANGE),
            ("cell_size", self.cell_size, CELL_SIZE_SOFT_RANGE),
            ("width", extent.x, BOUNDS_SOFT_RANGE),
            ("height", extent.y, BOUNDS_SOFT_RANGE),
            ("depth", extent.z, BOUNDS_SOFT_RANGE),
        ]
        .into_iter()
        .filter(|(_, value, [lo, hi])| value < lo || value > hi)
        .map(|(name, value, _)| (name, value))
        .collect()
    }
}
