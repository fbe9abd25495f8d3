use std::collections::HashMap;

use approx::assert_relative_eq;
use blobify::{
    Bounds, GeneratedMesh, PolygonizeError, PolygonizeParams,
    field::{FALLBACK_NORMAL, FIELD_EPSILON},
    polygonize, polygonize_with,
    types::{Point, Value, Vector},
};

fn cube_bounds(half_extent: Value) -> Bounds {
    Bounds::from_size(Vector::repeat(2.0 * half_extent))
}

fn sphere(threshold: Value, cell_size: Value) -> GeneratedMesh {
    polygonize(&[Point::origin()], threshold, cell_size, &cube_bounds(2.0)).unwrap()
}

fn radius_for(threshold: Value) -> Value {
    (1.0 / threshold - FIELD_EPSILON).sqrt()
}

fn distances(mesh: &GeneratedMesh) -> Vec<Value> {
    mesh.vertices
        .iter()
        .map(|&v| Point::from(v).coords.norm())
        .collect()
}

fn mean(values: &[Value]) -> Value {
    values.iter().sum::<Value>() / values.len() as Value
}

fn max_deviation(mesh: &GeneratedMesh, radius: Value) -> Value {
    distances(mesh)
        .into_iter()
        .map(|d| (d - radius).abs())
        .fold(0.0, Value::max)
}

fn assert_well_formed(mesh: &GeneratedMesh) {
    assert_eq!(mesh.indices.len() % 3, 0);
    assert_eq!(mesh.vertices.len(), mesh.normals.len());
    assert_eq!(mesh.vertices.len(), mesh.indices.len());
    assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    for &n in &mesh.normals {
        let n = Vector::from(n);
        assert!(n == FALLBACK_NORMAL || (n.norm() - 1.0).abs() < 1e-4, "{n:?}");
    }
    assert!(mesh.is_well_formed());
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let generators = [
        Point::new(-0.4, 0.1, 0.0),
        Point::new(0.5, -0.2, 0.3),
        Point::new(0.0, 0.6, -0.4),
    ];
    let bounds = cube_bounds(1.5);
    let a = polygonize(&generators, 3.0, 0.1, &bounds).unwrap();
    let b = polygonize(&generators, 3.0, 0.1, &bounds).unwrap();

    let bits = |mesh: &GeneratedMesh| -> Vec<u32> {
        mesh.vertices
            .iter()
            .chain(&mesh.normals)
            .flatten()
            .map(|c| c.to_bits())
            .collect()
    };
    assert!(!a.is_empty());
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.indices, b.indices);
}

#[test]
fn outputs_are_well_formed() {
    let cases: [(&[Point], Value, Value); 4] = [
        (&[Point::origin()], 1.0, 0.1),
        (&[Point::new(-0.6, 0.0, 0.0), Point::new(0.6, 0.0, 0.0)], 1.5, 0.15),
        (&[Point::new(0.3, 0.3, 0.3), Point::new(-0.2, 0.5, 0.1)], 6.0, 0.07),
        // Generator sits exactly on a grid corner.
        (&[Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0)], 0.8, 0.25),
    ];
    for (generators, threshold, cell_size) in cases {
        let mesh = polygonize(generators, threshold, cell_size, &cube_bounds(2.0)).unwrap();
        assert!(!mesh.is_empty());
        assert_well_formed(&mesh);
    }
}

#[test]
fn no_generators_gives_empty_mesh() {
    let unit_cube = Bounds::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
    let mesh = polygonize(&[], 1.0, 0.5, &unit_cube).unwrap();
    assert!(mesh.vertices.is_empty());
    assert!(mesh.normals.is_empty());
    assert!(mesh.indices.is_empty());
}

#[test]
fn single_generator_makes_a_sphere() {
    let mesh = sphere(1.0, 0.1);
    let radius = radius_for(1.0);
    assert!(mesh.triangle_count() > 1000);
    assert_well_formed(&mesh);

    assert!(max_deviation(&mesh, radius) < 0.02);
    assert_relative_eq!(mean(&distances(&mesh)), radius, epsilon = 0.005);
}

#[test]
fn sphere_is_closed_with_consistent_winding() {
    let mesh = sphere(1.0, 0.1);
    let key = |i: u32| mesh.vertices[i as usize].map(Value::to_bits);

    // Every directed edge must appear once, and its reverse once.
    let mut edges: HashMap<([u32; 3], [u32; 3]), usize> = HashMap::new();
    for tri in mesh.indices.chunks(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            *edges.entry((key(a), key(b))).or_default() += 1;
        }
    }
    for (&(a, b), &count) in &edges {
        assert_eq!(count, 1);
        assert_eq!(edges.get(&(b, a)), Some(&1));
    }
}

#[test]
fn faces_point_outward() {
    let mesh = sphere(1.0, 0.1);
    for tri in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.tri_coords(tri);
        let centroid = (a.coords + b.coords + c.coords) / 3.0;
        // Slivers are too small for their winding to be measured reliably.
        if (b - a).cross(&(c - a)).norm() > 1e-8 {
            let face = mesh.face_normal(tri);
            assert!(face.dot(&centroid) > 0.0, "triangle {tri} faces inward");
        }

        for k in 0..3 {
            let n = Vector::from(mesh.normals[tri * 3 + k]);
            assert!(n.dot(&(centroid / centroid.norm())) > 0.9);
        }
    }
}

#[test]
fn raising_threshold_shrinks_the_shell() {
    let radii: Vec<Value> = [0.5, 1.0, 2.0, 4.0]
        .into_iter()
        .map(|threshold| mean(&distances(&sphere(threshold, 0.1))))
        .collect();
    for pair in radii.windows(2) {
        assert!(pair[1] < pair[0], "{radii:?}");
    }
}

#[test]
fn finer_cells_converge() {
    let radius = radius_for(1.0);
    let coarse = sphere(1.0, 0.2);
    let fine = sphere(1.0, 0.1);
    assert!(fine.triangle_count() > coarse.triangle_count());
    assert!(max_deviation(&fine, radius) < max_deviation(&coarse, radius));
}

#[test]
fn nearby_generators_merge() {
    let generators = [Point::new(-0.6, 0.0, 0.0), Point::new(0.6, 0.0, 0.0)];
    let near_midplane = |mesh: &GeneratedMesh| mesh.vertices.iter().any(|v| v[0].abs() < 0.1);

    let merged = polygonize(&generators, 1.5, 0.1, &cube_bounds(2.0)).unwrap();
    let separate = polygonize(&generators, 10.0, 0.1, &cube_bounds(2.0)).unwrap();
    assert!(near_midplane(&merged));
    assert!(!separate.is_empty());
    assert!(!near_midplane(&separate));
}

#[test]
fn surface_cut_by_bounds_stays_inside() {
    let bounds = Bounds::new(Point::new(-2.0, -2.0, 0.0), Point::new(2.0, 2.0, 2.0));
    let mesh = polygonize(&[Point::origin()], 1.0, 0.1, &bounds).unwrap();
    assert_well_formed(&mesh);
    assert!(mesh.vertices.iter().all(|v| v[2] >= 0.0));
}

#[test]
fn invalid_cell_size_is_rejected() {
    for cell_size in [0.0, -0.1] {
        let err = polygonize(&[Point::origin()], 1.0, cell_size, &cube_bounds(1.0)).unwrap_err();
        assert_eq!(
            err,
            PolygonizeError::InvalidParameter {
                name: "cell_size",
                value: cell_size
            }
        );
    }
}

#[test]
fn uncountably_fine_grid_is_rejected() {
    let err = polygonize(&[], 1.0, 1e-7, &cube_bounds(50.0)).unwrap_err();
    assert_eq!(
        err,
        PolygonizeError::InvalidParameter {
            name: "cell_size",
            value: 1e-7
        }
    );
}

#[test]
fn invalid_bounds_and_threshold_are_rejected() {
    let flat = Bounds::new(Point::origin(), Point::new(1.0, 1.0, 0.0));
    assert!(matches!(
        polygonize(&[Point::origin()], 1.0, 0.1, &flat),
        Err(PolygonizeError::InvalidParameter { name: "depth", .. })
    ));
    assert!(matches!(
        polygonize(&[Point::origin()], Value::NAN, 0.1, &cube_bounds(1.0)),
        Err(PolygonizeError::InvalidParameter { name: "threshold", .. })
    ));
}

#[test]
fn params_entry_point_matches_positional() {
    let generators = [Point::new(0.2, 0.0, -0.1), Point::new(-0.3, 0.2, 0.0)];
    let params = PolygonizeParams::default()
        .with_threshold(3.0)
        .with_cell_size(0.2)
        .with_bounds_size(3.0, 3.0, 3.0);
    let a = polygonize_with(&generators, &params).unwrap();
    let b = polygonize(&generators, 3.0, 0.2, &params.bounds).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.polygon_counts().len(), a.triangle_count());
}
