//! Implementatie van het "Sine Curve" component.
//!
//! Leest een start- en eind-X, verdeelt de basislijn langs de X-as en laat een
//! kubische curve door de sinusvormig opgetilde verdeelpunten lopen. Het
//! rekenwerk zit in `geom::build_sine_curve_with`; dit component vertaalt
//! alleen pinnen, meta en meldingen.

use crate::geom::{
    DEFAULT_SAMPLE_COUNT, MAX_SAMPLE_COUNT, START_AFTER_END_MESSAGE, SineCurve, SineCurveError,
    SineCurveOptions, build_sine_curve_with,
};
use crate::graph::node::{MetaLookupExt, MetaMap, MetaValue};
use crate::graph::value::{CurveValue, Value};

use super::{
    Component, ComponentError, DataAccess, ParamAccess, ParamDescriptor, ParamKind,
    RuntimeMessageLevel,
};

/// Meta-sleutel waarmee het aantal segmenten overschreven kan worden.
pub const META_COUNT: &str = "Count";
/// Meta-sleutel voor de uitslag langs Z.
pub const META_AMPLITUDE: &str = "Amplitude";
/// Meta-sleutel voor het aantal sinusperiodes tussen S en E.
pub const META_PERIODS: &str = "Periods";
/// Meta-sleutel voor de gevraagde graad van de curve.
pub const META_DEGREE: &str = "Degree";

const DEGREE_LIMIT: i64 = 11;

const INPUT_START: usize = 0;
const INPUT_END: usize = 1;
const OUTPUT_CURVE: usize = 0;

const INPUT_PARAMS: &[ParamDescriptor] = &[
    ParamDescriptor {
        name: "Start",
        nickname: "S",
        description: "X coordinate of Start Point",
        kind: ParamKind::Number,
        access: ParamAccess::Item,
        default: Some(0.0),
    },
    ParamDescriptor {
        name: "End",
        nickname: "E",
        description: "X coordinate of End Point",
        kind: ParamKind::Number,
        access: ParamAccess::Item,
        default: Some(10.0),
    },
];

const OUTPUT_PARAMS: &[ParamDescriptor] = &[ParamDescriptor {
    name: "Sin Curve",
    nickname: "S",
    description: "Output Sin Curve",
    kind: ParamKind::Curve,
    access: ParamAccess::Item,
    default: None,
}];

/// Beschikbare componentvarianten binnen de curve-sine module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    SineCurve,
}

/// Registratiegegevens voor de componentregistry.
#[derive(Debug, Clone, Copy)]
pub struct Registration {
    pub guids: &'static [&'static str],
    pub names: &'static [&'static str],
    pub kind: ComponentKind,
}

/// Volledige lijst met componentregistraties.
pub const REGISTRATIONS: &[Registration] = &[Registration {
    guids: &["{460cb157-91ba-4435-9417-ac5fe2628245}"],
    names: &["Sine Curve", "SinCrv"],
    kind: ComponentKind::SineCurve,
}];

impl Component for ComponentKind {
    fn solve_instance(&self, access: &mut dyn DataAccess, meta: &MetaMap) -> Result<(), ComponentError> {
        match self {
            Self::SineCurve => solve_sine_curve(access, meta),
        }
    }
}

impl ComponentKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SineCurve => "Sine Curve",
        }
    }

    #[must_use]
    pub fn input_params(&self) -> &'static [ParamDescriptor] {
        match self {
            Self::SineCurve => INPUT_PARAMS,
        }
    }

    #[must_use]
    pub fn output_params(&self) -> &'static [ParamDescriptor] {
        match self {
            Self::SineCurve => OUTPUT_PARAMS,
        }
    }
}

fn solve_sine_curve(access: &mut dyn DataAccess, meta: &MetaMap) -> Result<(), ComponentError> {
    // Lege pinnen leveren geen curve en ook geen foutmelding.
    let Some(start) = access.get_number(INPUT_START)? else {
        return Ok(());
    };
    let Some(end) = access.get_number(INPUT_END)? else {
        return Ok(());
    };

    if start > end {
        access.add_runtime_message(RuntimeMessageLevel::Error, START_AFTER_END_MESSAGE);
        return Ok(());
    }

    let options = match curve_options(meta) {
        Ok(options) => options,
        Err(message) => {
            access.add_runtime_message(RuntimeMessageLevel::Error, &message);
            return Ok(());
        }
    };

    match build_sine_curve_with(start, end, &options) {
        Ok(sine) => {
            log::debug!(
                "Sine Curve: {} samples van x={start} tot x={end}",
                sine.sample_count()
            );
            access.set_data(OUTPUT_CURVE, Value::Curve(curve_value(&sine)));
        }
        Err(
            err @ (SineCurveError::StartAfterEnd { .. }
            | SineCurveError::InvalidCount(_)
            | SineCurveError::CountTooLarge { .. }
            | SineCurveError::SpanOverflow { .. }),
        ) => {
            access.add_runtime_message(RuntimeMessageLevel::Error, &err.to_string());
        }
        Err(err) => {
            log::warn!("Sine Curve kon niet worden opgebouwd: {err}");
            access.add_runtime_message(RuntimeMessageLevel::Error, &err.to_string());
        }
    }

    Ok(())
}

/// Curve-instellingen uit de meta; ontbrekende sleutels houden hun standaardwaarde.
fn curve_options(meta: &MetaMap) -> Result<SineCurveOptions, String> {
    let defaults = SineCurveOptions::default();
    Ok(SineCurveOptions {
        count: sample_count(meta)?,
        amplitude: meta_number(meta, META_AMPLITUDE)?.unwrap_or(defaults.amplitude),
        periods: meta_number(meta, META_PERIODS)?.unwrap_or(defaults.periods),
        degree: curve_degree(meta)?.unwrap_or(defaults.degree),
    })
}

/// Aantal segmenten uit de meta, of de standaardwaarde.
fn sample_count(meta: &MetaMap) -> Result<usize, String> {
    let Some(value) = meta.get_normalized(META_COUNT) else {
        return Ok(DEFAULT_SAMPLE_COUNT);
    };

    match value.as_integer() {
        Some(count) if count < 1 => Err(format!("Count moet minstens 1 zijn, kreeg {count}")),
        Some(count) => match usize::try_from(count) {
            Ok(count) if count <= MAX_SAMPLE_COUNT => Ok(count),
            _ => Err(format!(
                "Count mag hoogstens {MAX_SAMPLE_COUNT} zijn, kreeg {count}"
            )),
        },
        None => Err(format!("Count moet een geheel getal zijn, kreeg {}", describe(value))),
    }
}

fn curve_degree(meta: &MetaMap) -> Result<Option<usize>, String> {
    let Some(value) = meta.get_normalized(META_DEGREE) else {
        return Ok(None);
    };

    match value.as_integer() {
        Some(degree @ 1..=DEGREE_LIMIT) => Ok(usize::try_from(degree).ok()),
        Some(degree) => Err(format!(
            "Degree moet tussen 1 en {DEGREE_LIMIT} liggen, kreeg {degree}"
        )),
        None => Err(format!("Degree moet een geheel getal zijn, kreeg {}", describe(value))),
    }
}

fn meta_number(meta: &MetaMap, key: &str) -> Result<Option<f64>, String> {
    let Some(value) = meta.get_normalized(key) else {
        return Ok(None);
    };

    let number = match value {
        MetaValue::Number(n) => Some(*n),
        #[allow(clippy::cast_precision_loss)]
        MetaValue::Integer(i) => Some(*i as f64),
        MetaValue::List(items) if items.len() == 1 => match &items[0] {
            MetaValue::Number(n) => Some(*n),
            #[allow(clippy::cast_precision_loss)]
            MetaValue::Integer(i) => Some(*i as f64),
            _ => None,
        },
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(format!("{key} moet een eindig getal zijn, kreeg {}", describe(value))),
    }
}

fn describe(value: &MetaValue) -> String {
    match value {
        MetaValue::Number(n) => n.to_string(),
        MetaValue::Integer(i) => i.to_string(),
        MetaValue::Boolean(b) => b.to_string(),
        MetaValue::Text(t) => format!("'{t}'"),
        MetaValue::List(items) => format!("lijst met {} items", items.len()),
    }
}

fn curve_value(sine: &SineCurve) -> CurveValue {
    CurveValue {
        degree: sine.curve.degree,
        control_points: sine.curve.control_points.iter().map(|p| p.to_array()).collect(),
        knots: sine.curve.knots.clone(),
        samples: sine.samples.iter().map(|p| p.to_array()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::{Component, ComponentKind, META_AMPLITUDE, META_COUNT, META_DEGREE, META_PERIODS};
    use crate::components::{RuntimeMessageLevel, SolveContext};
    use crate::graph::node::{MetaMap, MetaValue};
    use crate::graph::value::{CurveValue, Value};

    fn solve(inputs: &[Value], meta: &MetaMap) -> crate::components::Solution {
        let kind = ComponentKind::SineCurve;
        let mut context = SolveContext::new(inputs, kind.input_params(), kind.output_params());
        kind.solve_instance(&mut context, meta).expect("solve succeeds");
        context.into_solution()
    }

    fn curve_output(solution: &crate::components::Solution) -> &CurveValue {
        match solution.output("S") {
            Some(Value::Curve(curve)) => curve,
            other => panic!("expected curve output, got {other:?}"),
        }
    }

    #[test]
    fn builds_curve_through_eleven_samples() {
        let solution = solve(&[Value::Number(0.0), Value::Number(10.0)], &MetaMap::new());

        assert!(solution.messages.is_empty());
        let curve = curve_output(&solution);
        assert_eq!(curve.degree, 3);
        assert_eq!(curve.samples.len(), 11);
        assert_eq!(curve.control_points.len(), 11);
        assert_eq!(curve.knots.len(), 15);

        let peak = curve.samples[2];
        assert!((peak[0] - 2.0).abs() < 1e-12);
        assert!((peak[2] - (0.4 * PI).sin()).abs() < 1e-12);
    }

    #[test]
    fn empty_inputs_use_registered_defaults() {
        let solution = solve(&[], &MetaMap::new());
        let curve = curve_output(&solution);

        assert_eq!(curve.samples.first().map(|p| p[0]), Some(0.0));
        assert_eq!(curve.samples.last().map(|p| p[0]), Some(10.0));
    }

    #[test]
    fn reversed_inputs_report_error_without_output() {
        let solution = solve(&[Value::Number(10.0), Value::Number(0.0)], &MetaMap::new());

        assert!(solution.outputs.is_empty());
        assert_eq!(solution.messages.len(), 1);
        assert_eq!(solution.messages[0].level, RuntimeMessageLevel::Error);
        assert_eq!(solution.messages[0].text, "E must be bigger than S");
    }

    #[test]
    fn meta_count_overrides_default() {
        let mut meta = MetaMap::new();
        meta.insert(META_COUNT.to_owned(), MetaValue::Integer(4));

        let solution = solve(&[Value::Number(0.0), Value::Number(4.0)], &meta);
        let curve = curve_output(&solution);
        assert_eq!(curve.samples.len(), 5);
        assert!((curve.samples[1][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_count_is_reported() {
        let mut meta = MetaMap::new();
        meta.insert("count".to_owned(), MetaValue::Integer(0));

        let solution = solve(&[Value::Number(0.0), Value::Number(4.0)], &meta);
        assert!(solution.outputs.is_empty());
        assert!(solution.has_errors());
        assert!(solution.messages[0].text.contains("minstens 1"));
    }

    #[test]
    fn fractional_count_is_reported() {
        let mut meta = MetaMap::new();
        meta.insert(META_COUNT.to_owned(), MetaValue::Number(2.5));

        let solution = solve(&[Value::Number(0.0), Value::Number(4.0)], &meta);
        assert!(solution.outputs.is_empty());
        assert!(solution.messages[0].text.contains("2.5"));
    }

    #[test]
    fn oversized_count_is_reported_without_solving() {
        let mut meta = MetaMap::new();
        meta.insert(META_COUNT.to_owned(), MetaValue::Integer(100_000));

        let solution = solve(&[Value::Number(0.0), Value::Number(4.0)], &meta);
        assert!(solution.outputs.is_empty());
        assert_eq!(solution.messages.len(), 1);
        assert_eq!(solution.messages[0].level, RuntimeMessageLevel::Error);
        assert!(solution.messages[0].text.contains("hoogstens 1000"));
    }

    #[test]
    fn meta_shapes_the_wave() {
        let mut meta = MetaMap::new();
        meta.insert(META_COUNT.to_owned(), MetaValue::Integer(8));
        meta.insert(META_AMPLITUDE.to_owned(), MetaValue::Number(2.5));
        meta.insert(META_PERIODS.to_owned(), MetaValue::Integer(2));
        meta.insert(META_DEGREE.to_owned(), MetaValue::Integer(1));

        let solution = solve(&[Value::Number(0.0), Value::Number(8.0)], &meta);
        let curve = curve_output(&solution);
        assert_eq!(curve.degree, 1);
        assert_eq!(curve.samples.len(), 9);
        assert!((curve.samples[1][2] - 2.5).abs() < 1e-12);
        assert!((curve.samples[3][2] + 2.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_shape_meta_is_reported() {
        let mut meta = MetaMap::new();
        meta.insert(META_DEGREE.to_owned(), MetaValue::Integer(0));
        let solution = solve(&[Value::Number(0.0), Value::Number(4.0)], &meta);
        assert!(solution.outputs.is_empty());
        assert!(solution.messages[0].text.starts_with("Degree"));

        let mut meta = MetaMap::new();
        meta.insert("amplitude".to_owned(), MetaValue::Text("hoog".to_owned()));
        let solution = solve(&[Value::Number(0.0), Value::Number(4.0)], &meta);
        assert!(solution.outputs.is_empty());
        assert!(solution.messages[0].text.contains("'hoog'"));
    }

    #[test]
    fn overflowing_baseline_is_reported() {
        let solution = solve(&[Value::Number(-1e308), Value::Number(1e308)], &MetaMap::new());
        assert!(solution.outputs.is_empty());
        assert!(solution.has_errors());
        assert!(solution.messages[0].text.contains("too large"));
    }

    #[test]
    fn non_finite_input_is_reported() {
        let solution = solve(&[Value::Number(f64::NAN), Value::Number(4.0)], &MetaMap::new());
        assert!(solution.outputs.is_empty());
        assert!(solution.has_errors());
    }

    #[test]
    fn wrong_input_type_is_a_component_error() {
        let kind = ComponentKind::SineCurve;
        let inputs = [Value::Point([0.0, 0.0, 0.0]), Value::Number(1.0)];
        let mut context = SolveContext::new(&inputs, kind.input_params(), kind.output_params());
        let err = kind.solve_instance(&mut context, &MetaMap::new()).unwrap_err();
        assert!(err.message().contains("Number"));
    }
}
