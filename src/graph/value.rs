//! Basis Value-enum waarin componentwaarden en -resultaten worden
//! opgeslagen.

use core::fmt;

use serde::Serialize;

/// Beschikbare waardetypes binnen de evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Een enkele numerieke waarde.
    Number(f64),
    /// Een 3D-punt.
    Point([f64; 3]),
    /// Een vloeiende curve (niet-rationele NURBS).
    Curve(CurveValue),
    /// Een lijst van waarden.
    List(Vec<Value>),
}

impl Value {
    /// Geeft de variantnaam terug. Wordt gebruikt in foutmeldingen.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Point(_) => ValueKind::Point,
            Self::Curve(_) => ValueKind::Curve,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Verwacht een `Number` en retourneert de f64-waarde.
    pub fn expect_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(value) => Ok(*value),
            _ => Err(ValueError::type_mismatch("Number", self.kind())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Point([x, y, z]) => write!(f, "{{{x}, {y}, {z}}}"),
            Self::Curve(curve) => write!(
                f,
                "Curve (graad {}, {} controlepunten)",
                curve.degree,
                curve.control_points.len()
            ),
            Self::List(values) => write!(f, "List ({} items)", values.len()),
        }
    }
}

/// Serialiseerbare beschrijving van een geïnterpoleerde curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveValue {
    pub degree: usize,
    pub control_points: Vec<[f64; 3]>,
    pub knots: Vec<f64>,
    /// De punten waar de curve exact doorheen loopt, in volgorde.
    pub samples: Vec<[f64; 3]>,
}

/// Typefout voor wanneer een `Value` naar het verkeerde type wordt
/// geconverteerd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    expected: &'static str,
    found: ValueKind,
}

impl ValueError {
    #[must_use]
    pub fn type_mismatch(expected: &'static str, found: ValueKind) -> Self {
        Self { expected, found }
    }

    /// Hulptoegang voor tests en foutafhandeling.
    #[must_use]
    pub fn expected(&self) -> &'static str {
        self.expected
    }

    #[must_use]
    pub fn found(&self) -> ValueKind {
        self.found
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "verwachtte type `{}` maar kreeg `{}`",
            self.expected, self.found
        )
    }
}

impl std::error::Error for ValueError {}

/// Beschrijft het soort `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Number,
    Point,
    Curve,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "Number",
            Self::Point => "Point",
            Self::Curve => "Curve",
            Self::List => "List",
        };
        f.write_str(name)
    }
}
