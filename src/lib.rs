#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod components;
pub mod geom;
pub mod graph;

use std::fmt;

use components::{ComponentError, ComponentKind, ComponentRegistry, RuntimeMessage, Solution, curve_sine};
use geom::{NurbsCurve3, Point3, tessellate_curve_uniform};
use graph::node::Node;
use graph::value::{CurveValue, Value};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Aantal segmenten waarmee een curve voor weergave wordt bemonsterd.
const DISPLAY_SEGMENTS: usize = 64;

/// Fouten die de engine naar de host teruggeeft.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("onbekend component `{0}`")]
    UnknownComponent(String),
    #[error("onbekende inputpin `{0}`")]
    UnknownPin(String),
    #[error("inputwaarde moet een eindig getal zijn")]
    NonFiniteValue,
    #[error("component is nog niet geëvalueerd")]
    NotEvaluated,
    #[error("ongeldige curve in resultaat: {0}")]
    InvalidCurve(#[from] geom::CurveError),
    #[error("component `{component}` faalde: {source}")]
    ComponentFailed {
        component: &'static str,
        source: ComponentError,
    },
}

#[derive(Debug, Serialize)]
struct ParamExport {
    name: &'static str,
    nickname: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
}

/// Renderbare geometrie zoals die naar de host gaat.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum GeometryItem {
    Point { coordinates: [f64; 3] },
    Polyline { points: Vec<[f64; 3]> },
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    registry: ComponentRegistry,
    kind: ComponentKind,
    node: Node,
    last_solution: Option<Solution>,
    result_dirty: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Engine {
        let kind = ComponentKind::CurveSine(curve_sine::ComponentKind::SineCurve);
        let mut node = Node::with_guid(curve_sine::REGISTRATIONS[0].guids[0]);
        node.name = Some(kind.name().to_owned());

        Engine {
            initialized: true,
            registry: ComponentRegistry::default(),
            kind,
            node,
            last_solution: None,
            result_dirty: true,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Kies het component op GUID, naam of nickname, zoals een opgeslagen
    /// document ernaar verwijst.
    #[wasm_bindgen]
    pub fn load_component(&mut self, reference: &str) -> Result<(), JsValue> {
        self.select_component(reference).map_err(to_js_error)
    }

    /// Haal de inputparameters op voor UI-generatie.
    #[wasm_bindgen]
    pub fn get_params(&self) -> Result<JsValue, JsValue> {
        let params: Vec<ParamExport> = self
            .kind
            .input_params()
            .iter()
            .map(|param| ParamExport {
                name: param.name,
                nickname: param.nickname,
                description: param.description,
                default: param.default,
                value: self
                    .node
                    .input(param.nickname)
                    .and_then(|value| value.expect_number().ok()),
            })
            .collect();

        serde_wasm_bindgen::to_value(&params).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Stel een numerieke input in op basis van pinnickname of -naam.
    #[wasm_bindgen]
    pub fn set_input(&mut self, pin: &str, value: f64) -> Result<(), JsValue> {
        self.update_input_value(pin, Value::Number(value))
            .map_err(to_js_error)
    }

    /// Overschrijf het aantal segmenten van de basislijn.
    #[wasm_bindgen]
    pub fn set_count(&mut self, count: u32) {
        self.node
            .insert_meta(curve_sine::META_COUNT, i64::from(count));
        self.result_dirty = true;
    }

    /// Overschrijf de uitslag van de sinus langs Z.
    #[wasm_bindgen]
    pub fn set_amplitude(&mut self, amplitude: f64) -> Result<(), JsValue> {
        self.update_meta_number(curve_sine::META_AMPLITUDE, amplitude)
            .map_err(to_js_error)
    }

    /// Overschrijf het aantal sinusperiodes tussen S en E.
    #[wasm_bindgen]
    pub fn set_periods(&mut self, periods: f64) -> Result<(), JsValue> {
        self.update_meta_number(curve_sine::META_PERIODS, periods)
            .map_err(to_js_error)
    }

    /// Overschrijf de gevraagde graad van de curve.
    #[wasm_bindgen]
    pub fn set_degree(&mut self, degree: u32) {
        self.node
            .insert_meta(curve_sine::META_DEGREE, i64::from(degree));
        self.result_dirty = true;
    }

    /// Evalueer het component met de huidige inputs.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        self.solve().map(|_| ()).map_err(to_js_error)
    }

    /// Haalt de geometrie van de laatste evaluatie op.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        let items = self.geometry().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&items).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Haalt de runtime-meldingen van de laatste evaluatie op.
    #[wasm_bindgen]
    pub fn get_messages(&self) -> Result<JsValue, JsValue> {
        let solution = self.solution().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&solution.messages)
            .map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Engine {
    /// Kies het component dat de engine oplost.
    pub fn select_component(&mut self, reference: &str) -> Result<(), EngineError> {
        let trimmed = reference.trim();
        let kind = self
            .registry
            .resolve(Some(trimmed), Some(trimmed), Some(trimmed))
            .ok_or_else(|| EngineError::UnknownComponent(trimmed.to_owned()))?;

        if kind != self.kind {
            self.node.inputs.clear();
        }
        self.kind = kind;
        self.node.name = Some(kind.name().to_owned());
        self.result_dirty = true;
        Ok(())
    }

    /// Zet een inputwaarde. De pin mag op nickname of volledige naam worden opgegeven.
    pub fn update_input_value(&mut self, pin: &str, value: Value) -> Result<(), EngineError> {
        if let Value::Number(number) = value {
            if !number.is_finite() {
                return Err(EngineError::NonFiniteValue);
            }
        }

        let wanted = pin.trim();
        let param = self
            .kind
            .input_params()
            .iter()
            .find(|param| {
                param.nickname == wanted || param.name.eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| EngineError::UnknownPin(wanted.to_owned()))?;

        self.node.set_input(param.nickname, value);
        self.result_dirty = true;
        Ok(())
    }

    /// Zet een numerieke meta-instelling van het component.
    pub fn update_meta_number(&mut self, key: &str, value: f64) -> Result<(), EngineError> {
        if !value.is_finite() {
            return Err(EngineError::NonFiniteValue);
        }
        self.node.insert_meta(key, value);
        self.result_dirty = true;
        Ok(())
    }

    /// Los het component op als de inputs sinds de vorige keer veranderd zijn.
    pub fn solve(&mut self) -> Result<&Solution, EngineError> {
        if self.result_dirty || self.last_solution.is_none() {
            let inputs = self.collect_inputs();
            let solution = self
                .kind
                .evaluate(&inputs, &self.node.meta)
                .map_err(|source| EngineError::ComponentFailed {
                    component: self.kind.name(),
                    source,
                })?;

            debug_log!(
                "{} opgelost: {} outputs, {} meldingen",
                self.kind.name(),
                solution.outputs.len(),
                solution.messages.len()
            );
            for message in &solution.messages {
                log::debug!("{}: {message}", self.kind.name());
            }

            self.node.replace_outputs(solution.outputs.clone());
            self.last_solution = Some(solution);
            self.result_dirty = false;
        }

        self.solution()
    }

    /// Het resultaat van de laatste evaluatie.
    pub fn solution(&self) -> Result<&Solution, EngineError> {
        if self.result_dirty {
            return Err(EngineError::NotEvaluated);
        }
        self.last_solution.as_ref().ok_or(EngineError::NotEvaluated)
    }

    /// Meldingen van de laatste evaluatie; leeg zolang het resultaat verouderd is.
    #[must_use]
    pub fn messages(&self) -> &[RuntimeMessage] {
        self.solution()
            .map_or(&[][..], |solution| solution.messages.as_slice())
    }

    /// Zet de outputs van de laatste evaluatie om naar renderbare geometrie.
    pub fn geometry(&self) -> Result<Vec<GeometryItem>, EngineError> {
        let solution = self.solution()?;
        let mut items = Vec::new();
        for value in solution.outputs.values() {
            append_geometry_value(value, &mut items)?;
        }
        Ok(items)
    }

    /// Inputs in pinvolgorde; lege pinnen vallen terug op hun standaardwaarde.
    fn collect_inputs(&self) -> Vec<Value> {
        let mut inputs = Vec::new();
        for param in self.kind.input_params() {
            match self.node.input(param.nickname) {
                Some(value) => inputs.push(value.clone()),
                None => match param.default {
                    Some(default) => inputs.push(Value::Number(default)),
                    None => break,
                },
            }
        }
        inputs
    }
}

fn append_geometry_value(value: &Value, items: &mut Vec<GeometryItem>) -> Result<(), EngineError> {
    match value {
        Value::Point(point) => items.push(GeometryItem::Point {
            coordinates: *point,
        }),
        Value::Curve(curve) => {
            items.push(GeometryItem::Polyline {
                points: tessellate_curve_value(curve)?,
            });
            items.extend(
                curve
                    .samples
                    .iter()
                    .map(|sample| GeometryItem::Point {
                        coordinates: *sample,
                    }),
            );
        }
        Value::List(values) => {
            for entry in values {
                append_geometry_value(entry, items)?;
            }
        }
        Value::Number(_) => {}
    }
    Ok(())
}

fn tessellate_curve_value(curve: &CurveValue) -> Result<Vec<[f64; 3]>, EngineError> {
    let nurbs = NurbsCurve3::new(
        curve.degree,
        curve.control_points.iter().copied().map(Point3::from).collect(),
        curve.knots.clone(),
    )?;
    Ok(tessellate_curve_uniform(&nurbs, DISPLAY_SEGMENTS)
        .into_iter()
        .map(Point3::to_array)
        .collect())
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
