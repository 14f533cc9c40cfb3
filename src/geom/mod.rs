mod core;
mod curve;
mod sine;

pub use core::{Point3, Tolerance, Vec3};
pub use curve::{
    Curve3, CurveDivisionResult, CurveError, Line3, NurbsCurve3, divide_curve_by_count,
    tessellate_curve_uniform,
};
pub use sine::{
    DEFAULT_DEGREE, DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT, START_AFTER_END_MESSAGE, SineCurve,
    SineCurveError, SineCurveOptions, build_sine_curve, build_sine_curve_with,
};

#[cfg(test)]
mod tests;
