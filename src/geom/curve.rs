use super::core::{Point3, Tolerance};

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }
}

/// Failure modes of curve construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    #[error("interpolation requires at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("curve point {index} is not finite")]
    NonFinitePoint { index: usize },
    #[error("nurbs curve degree must be >= 1 and < control point count ({control_points}), got {degree}")]
    InvalidDegree { degree: usize, control_points: usize },
    #[error("nurbs curve knot length must be {expected}, got {found}")]
    KnotCount { expected: usize, found: usize },
    #[error("nurbs curve knots must be non-decreasing")]
    UnsortedKnots,
    #[error("singular matrix in interpolation system")]
    SingularSystem,
}

// ============================================================================
// Line
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        self.start.lerp(self.end, t)
    }
}

// ============================================================================
// NURBS
// ============================================================================

/// Non-rational clamped B-spline curve.
#[derive(Debug, Clone, PartialEq)]
pub struct NurbsCurve3 {
    pub degree: usize,
    pub control_points: Vec<Point3>,
    pub knots: Vec<f64>,
}

impl NurbsCurve3 {
    pub fn new(
        degree: usize,
        control_points: Vec<Point3>,
        knots: Vec<f64>,
    ) -> Result<Self, CurveError> {
        if control_points.len() < 2 {
            return Err(CurveError::TooFewPoints(control_points.len()));
        }
        if degree == 0 || degree >= control_points.len() {
            return Err(CurveError::InvalidDegree {
                degree,
                control_points: control_points.len(),
            });
        }

        let expected = control_points.len() + degree + 1;
        if knots.len() != expected {
            return Err(CurveError::KnotCount {
                expected,
                found: knots.len(),
            });
        }

        if !is_non_decreasing(&knots) {
            return Err(CurveError::UnsortedKnots);
        }

        Ok(Self {
            degree,
            control_points,
            knots,
        })
    }

    /// Creates a B-spline curve that passes exactly through the given points.
    ///
    /// Uses chord-length parameterization (see [`interpolation_parameters`]),
    /// an averaged knot vector and a global interpolation solve.
    ///
    /// # Arguments
    /// * `points` - Points to interpolate through (at least 2 required).
    /// * `degree` - Desired curve degree, clamped to `[1, points.len() - 1]`.
    ///
    /// # Example
    /// ```ignore
    /// use ghx_sincurve::geom::{NurbsCurve3, Point3};
    ///
    /// let points = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    ///     Point3::new(3.0, 1.0, 0.0),
    /// ];
    /// let curve = NurbsCurve3::interpolate_through_points(&points, 3)?;
    /// ```
    ///
    /// [`interpolation_parameters`]: NurbsCurve3::interpolation_parameters
    pub fn interpolate_through_points(points: &[Point3], degree: usize) -> Result<Self, CurveError> {
        let n = points.len();
        if n < 2 {
            return Err(CurveError::TooFewPoints(n));
        }
        if let Some(index) = points.iter().position(|point| !point.is_finite()) {
            return Err(CurveError::NonFinitePoint { index });
        }

        if n == 2 {
            return Self::new(1, points.to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
        }

        let p = degree.clamp(1, n - 1);
        let params = Self::interpolation_parameters(points);
        let knots = averaging_knot_vector(&params, p);
        let control_points = solve_interpolation_system(points, &params, &knots, p)?;

        Self::new(p, control_points, knots)
    }

    /// Parameter values at which [`interpolate_through_points`] places each point.
    ///
    /// Chord-length parameters normalised to `[0, 1]`. When two consecutive
    /// points coincide the chord lengths cannot separate them, so uniform
    /// parameters are used instead.
    ///
    /// [`interpolate_through_points`]: NurbsCurve3::interpolate_through_points
    #[must_use]
    pub fn interpolation_parameters(points: &[Point3]) -> Vec<f64> {
        match points.len() {
            0 => return Vec::new(),
            1 => return vec![0.0],
            _ => {}
        }

        let chords: Vec<f64> = points
            .windows(2)
            .map(|pair| pair[1].distance_to(pair[0]))
            .collect();

        if chords
            .iter()
            .any(|chord| Tolerance::ZERO_LENGTH.is_zero_length(*chord))
        {
            let last = (points.len() - 1) as f64;
            return (0..points.len()).map(|i| i as f64 / last).collect();
        }

        let total: f64 = chords.iter().sum();
        let mut params = Vec::with_capacity(points.len());
        params.push(0.0);
        let mut cumulative = 0.0;
        for chord in &chords {
            cumulative += chord;
            params.push(cumulative / total);
        }
        // Pin the end exactly; the running sum may land a few ulps short.
        if let Some(last) = params.last_mut() {
            *last = 1.0;
        }
        params
    }
}

impl Curve3 for NurbsCurve3 {
    fn point_at(&self, t: f64) -> Point3 {
        let p = self.degree;
        let (a, b) = self.domain();
        let u = t.clamp(a, b);

        let n = self.control_points.len() - 1;
        let span = find_span(n, p, u, &self.knots);

        let mut d: Vec<Point3> = (0..=p).map(|j| self.control_points[span - p + j]).collect();
        de_boor(&mut d, span, p, u, &self.knots);
        d[p]
    }

    fn domain(&self) -> (f64, f64) {
        (self.knots[self.degree], self.knots[self.control_points.len()])
    }
}

/// Computes the knot vector using the averaging method.
///
/// For a degree-p B-spline interpolating n points with parameters t_0 ... t_{n-1},
/// the interior knots are:
///   u_{j+p} = (t_j + ... + t_{j+p-1}) / p  for j = 1, ..., n-p-1
fn averaging_knot_vector(params: &[f64], degree: usize) -> Vec<f64> {
    let n = params.len();
    let p = degree;

    let mut knots = Vec::with_capacity(n + p + 1);
    knots.extend(std::iter::repeat(0.0).take(p + 1));

    let interior_count = n.saturating_sub(p + 1);
    for j in 1..=interior_count {
        let sum: f64 = params[j..j + p].iter().sum();
        knots.push(sum / p as f64);
    }

    knots.extend(std::iter::repeat(1.0).take(p + 1));
    knots
}

/// Solves the global interpolation system for the control points.
///
/// Row `i` of the coefficient matrix holds the `p + 1` non-zero basis
/// functions at `params[i]`; each coordinate is solved separately.
fn solve_interpolation_system(
    data_points: &[Point3],
    params: &[f64],
    knots: &[f64],
    degree: usize,
) -> Result<Vec<Point3>, CurveError> {
    let n = data_points.len();
    let p = degree;

    let mut matrix = vec![vec![0.0; n]; n];
    for (row, &t) in matrix.iter_mut().zip(params) {
        let span = find_span(n - 1, p, t, knots);
        let basis = basis_functions(span, t, p, knots);
        for (j, value) in basis.into_iter().enumerate() {
            row[span - p + j] = value;
        }
    }

    let xs: Vec<f64> = data_points.iter().map(|pt| pt.x).collect();
    let ys: Vec<f64> = data_points.iter().map(|pt| pt.y).collect();
    let zs: Vec<f64> = data_points.iter().map(|pt| pt.z).collect();

    let cx = solve_linear_system(&matrix, &xs)?;
    let cy = solve_linear_system(&matrix, &ys)?;
    let cz = solve_linear_system(&matrix, &zs)?;

    Ok((0..n).map(|i| Point3::new(cx[i], cy[i], cz[i])).collect())
}

/// Non-vanishing basis functions N_{span-p,p}(u) ... N_{span,p}(u).
fn basis_functions(span: usize, u: f64, p: usize, knots: &[f64]) -> Vec<f64> {
    let mut values = vec![0.0; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    values[0] = 1.0;

    for j in 1..=p {
        left[j] = u - knots[span + 1 - j];
        right[j] = knots[span + j] - u;
        let mut saved = 0.0;
        for r in 0..j {
            let denom = right[r + 1] + left[j - r];
            let temp = if denom == 0.0 { 0.0 } else { values[r] / denom };
            values[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        values[j] = saved;
    }

    values
}

/// Solves a dense linear system Ax = b using Gaussian elimination with partial pivoting.
fn solve_linear_system(matrix: &[Vec<f64>], rhs: &[f64]) -> Result<Vec<f64>, CurveError> {
    let n = matrix.len();
    let mut aug: Vec<Vec<f64>> = matrix
        .iter()
        .zip(rhs)
        .map(|(row, &b)| {
            let mut r = row.clone();
            r.push(b);
            r
        })
        .collect();

    for k in 0..n {
        let mut max_row = k;
        let mut max_val = aug[k][k].abs();
        for (i, row) in aug.iter().enumerate().skip(k + 1) {
            if row[k].abs() > max_val {
                max_val = row[k].abs();
                max_row = i;
            }
        }

        if max_val < Tolerance::PIVOT.eps {
            return Err(CurveError::SingularSystem);
        }
        aug.swap(k, max_row);

        let pivot_row = aug[k].clone();
        for row in aug.iter_mut().skip(k + 1) {
            let factor = row[k] / pivot_row[k];
            if factor == 0.0 {
                continue;
            }
            for j in k..=n {
                row[j] -= factor * pivot_row[j];
            }
        }
    }

    let mut result = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = aug[i][n];
        for j in (i + 1)..n {
            sum -= aug[i][j] * result[j];
        }
        result[i] = sum / aug[i][i];
    }

    Ok(result)
}

fn is_non_decreasing(knots: &[f64]) -> bool {
    knots.windows(2).all(|w| w[0] <= w[1])
}

fn find_span(n: usize, p: usize, u: f64, knots: &[f64]) -> usize {
    if u >= knots[n + 1] {
        return n;
    }
    if u <= knots[p] {
        return p;
    }

    let mut low = p;
    let mut high = n + 1;
    let mut mid = (low + high) / 2;
    while u < knots[mid] || u >= knots[mid + 1] {
        if u < knots[mid] {
            high = mid;
        } else {
            low = mid;
        }
        mid = (low + high) / 2;
    }
    mid
}

fn de_boor(d: &mut [Point3], span: usize, p: usize, u: f64, knots: &[f64]) {
    for r in 1..=p {
        for j in (r..=p).rev() {
            let i = span - p + j;
            let denom = knots[i + p + 1 - r] - knots[i];
            let alpha = if denom == 0.0 { 0.0 } else { (u - knots[i]) / denom };
            d[j] = d[j - 1].lerp(d[j], alpha);
        }
    }
}

// ============================================================================
// Curve Division and Sampling Utilities
// ============================================================================

/// Result of dividing a curve.
#[derive(Debug, Clone)]
pub struct CurveDivisionResult {
    /// Points at each division.
    pub points: Vec<Point3>,
    /// Parameter values at each division.
    pub parameters: Vec<f64>,
}

/// Divides the curve domain into `count` equal parameter steps.
///
/// The result holds `count + 1` division points, both endpoints included.
/// On a [`Line3`] the steps are also equal in length. A `count` of zero is
/// treated as one segment; callers that must reject it check before dividing.
#[must_use]
pub fn divide_curve_by_count<C: Curve3>(curve: &C, count: usize) -> CurveDivisionResult {
    let count = count.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;

    let parameters: Vec<f64> = (0..=count)
        .map(|i| t0 + span * (i as f64 / count as f64))
        .collect();
    let points = parameters.iter().map(|&t| curve.point_at(t)).collect();

    CurveDivisionResult { points, parameters }
}

/// Samples `steps + 1` points at uniform parameter steps, for display.
#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    divide_curve_by_count(curve, steps).points
}
