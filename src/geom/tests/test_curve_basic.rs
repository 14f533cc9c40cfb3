use crate::geom::{
    Curve3, CurveError, Line3, NurbsCurve3, Point3, divide_curve_by_count,
    tessellate_curve_uniform,
};

fn assert_close(actual: Point3, expected: Point3, tol: f64) {
    assert!(
        actual.distance_to(expected) <= tol,
        "expected {expected:?}, got {actual:?}"
    );
}

fn zigzag() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 0.5),
        Point3::new(3.0, 1.0, 0.0),
        Point3::new(4.0, 0.0, -0.5),
    ]
}

#[test]
fn tessellate_curve_preserves_endpoints() {
    let line = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
    let pts = tessellate_curve_uniform(&line, 10);
    assert_eq!(pts.first().copied(), Some(line.start));
    assert_eq!(pts.last().copied(), Some(line.end));
    assert_eq!(pts.len(), 11);
}

#[test]
fn divide_line_by_count_is_evenly_spaced() {
    let line = Line3::new(Point3::new(-2.0, 0.0, 0.0), Point3::new(8.0, 0.0, 0.0));
    let division = divide_curve_by_count(&line, 5);

    assert_eq!(division.points.len(), 6);
    assert_eq!(division.parameters.len(), 6);
    for (i, point) in division.points.iter().enumerate() {
        assert_close(*point, Point3::new(-2.0 + 2.0 * i as f64, 0.0, 0.0), 1e-12);
    }
    assert_eq!(division.parameters, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
}

#[test]
fn divide_zero_length_line_repeats_the_point() {
    let at = Point3::new(3.0, 0.0, 0.0);
    let line = Line3::new(at, at);
    let division = divide_curve_by_count(&line, 4);

    assert_eq!(division.points.len(), 5);
    assert!(division.points.iter().all(|p| *p == at));
}

#[test]
fn divide_nurbs_uses_equal_parameter_steps() {
    let curve = NurbsCurve3::interpolate_through_points(
        &[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ],
        3,
    )
    .expect("quadratic interpolation");

    let division = divide_curve_by_count(&curve, 4);
    assert_eq!(division.points.len(), 5);
    assert_eq!(division.parameters, vec![0.0, 0.25, 0.5, 0.75, 1.0]);

    assert_eq!(division.points[0], Point3::new(0.0, 0.0, 0.0));
    assert_eq!(division.points[4], Point3::new(2.0, 0.0, 0.0));
    // The arch is symmetric, so the middle parameter lands on its apex.
    assert_close(division.points[2], Point3::new(1.0, 1.0, 0.0), 1e-9);
}

#[test]
fn interpolation_passes_through_every_point() {
    let points = zigzag();
    let curve = NurbsCurve3::interpolate_through_points(&points, 3).expect("cubic interpolation");
    let params = NurbsCurve3::interpolation_parameters(&points);

    assert_eq!(curve.degree, 3);
    assert_eq!(curve.control_points.len(), points.len());
    assert_eq!(curve.knots.len(), points.len() + 4);

    for (point, t) in points.iter().zip(&params) {
        assert_close(curve.point_at(*t), *point, 1e-9);
    }
}

#[test]
fn interpolation_with_two_points_is_linear() {
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(2.0, 2.0, 0.0);
    let curve = NurbsCurve3::interpolate_through_points(&[a, b], 3).expect("linear");

    assert_eq!(curve.degree, 1);
    assert_eq!(curve.point_at(0.5), Point3::new(1.0, 1.0, 0.0));
}

#[test]
fn interpolation_degree_is_clamped_to_point_count() {
    let points = &zigzag()[..3];
    let curve = NurbsCurve3::interpolate_through_points(points, 3).expect("clamped degree");
    assert_eq!(curve.degree, 2);
}

#[test]
fn interpolation_rejects_degenerate_input() {
    assert_eq!(
        NurbsCurve3::interpolate_through_points(&[Point3::ORIGIN], 3),
        Err(CurveError::TooFewPoints(1))
    );

    let mut points = zigzag();
    points[2].z = f64::NAN;
    assert_eq!(
        NurbsCurve3::interpolate_through_points(&points, 3),
        Err(CurveError::NonFinitePoint { index: 2 })
    );
}

#[test]
fn chord_parameters_fall_back_to_uniform_for_repeated_points() {
    let chord = NurbsCurve3::interpolation_parameters(&[
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(4.0, 0.0, 0.0),
    ]);
    assert_eq!(chord, vec![0.0, 0.25, 1.0]);

    let repeated = NurbsCurve3::interpolation_parameters(&[
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    ]);
    assert_eq!(repeated, vec![0.0, 0.5, 1.0]);
}

#[test]
fn nurbs_constructor_validates_knots() {
    let control = vec![Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)];
    assert_eq!(
        NurbsCurve3::new(1, control.clone(), vec![0.0, 1.0]),
        Err(CurveError::KnotCount {
            expected: 4,
            found: 2
        })
    );
    assert_eq!(
        NurbsCurve3::new(1, control.clone(), vec![0.0, 1.0, 0.0, 1.0]),
        Err(CurveError::UnsortedKnots)
    );
    assert!(matches!(
        NurbsCurve3::new(2, control, vec![0.0; 5]),
        Err(CurveError::InvalidDegree { degree: 2, .. })
    ));
}
