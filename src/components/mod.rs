//! Component registry en evaluatie-logica.
//!
//! Componenten praten niet rechtstreeks met de host: ze lezen inputs en
//! schrijven outputs via [`DataAccess`] en melden validatieproblemen als
//! [`RuntimeMessage`]. [`SolveContext`] is de implementatie die de engine
//! gebruikt; een andere host kan zijn eigen shim aanbieden.

use std::collections::HashMap;
use std::fmt;

use crate::graph::node::MetaMap;
use crate::graph::value::{Value, ValueError};

pub mod coerce;
pub mod curve_sine;

/// Output-map van een component: pinnickname → waarde.
pub type OutputMap = std::collections::BTreeMap<String, Value>;

/// Fouttype voor component-evaluaties.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// Een generieke fout met een bericht.
    Message(String),
    /// Een input had het verkeerde type.
    Type(ValueError),
}

impl ComponentError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ComponentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(s) => f.write_str(s),
            Self::Type(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ComponentError {}

impl From<ValueError> for ComponentError {
    fn from(err: ValueError) -> Self {
        Self::Type(err)
    }
}

/// Ernst van een runtime-melding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
pub enum RuntimeMessageLevel {
    Remark,
    Warning,
    Error,
}

/// Niet-fatale melding die een component tijdens het oplossen achterlaat.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RuntimeMessage {
    pub level: RuntimeMessageLevel,
    pub text: String,
}

impl fmt::Display for RuntimeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.text)
    }
}

/// Resultaat van één oplosronde: outputs plus eventuele meldingen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Solution {
    pub outputs: OutputMap,
    pub messages: Vec<RuntimeMessage>,
}

impl Solution {
    #[must_use]
    pub fn output(&self, pin: &str) -> Option<&Value> {
        self.outputs.get(pin)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|message| message.level == RuntimeMessageLevel::Error)
    }
}

/// Resultaat van een component-executie.
pub type ComponentResult = Result<Solution, ComponentError>;

/// Hoe een parameter zijn data aanlevert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamAccess {
    Item,
    List,
}

/// Soort data dat over een pin loopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Number,
    Curve,
}

/// Registratie van een input- of outputpin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    pub name: &'static str,
    pub nickname: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub access: ParamAccess,
    /// Waarde die gebruikt wordt wanneer de pin leeg is.
    pub default: Option<f64>,
}

/// Toegang tot inputs en outputs tijdens het oplossen van een component.
pub trait DataAccess {
    /// Leest een numerieke input. `Ok(None)` betekent dat de pin geen data heeft.
    fn get_number(&self, index: usize) -> Result<Option<f64>, ComponentError>;

    /// Schrijft een waarde naar outputpin `index`.
    fn set_data(&mut self, index: usize, value: Value);

    /// Voegt een niet-fatale melding toe.
    fn add_runtime_message(&mut self, level: RuntimeMessageLevel, text: &str);
}

/// Trait die alle componentimplementaties dienen te implementeren.
pub trait Component {
    /// Lost het component één keer op. Validatieproblemen worden als
    /// runtime-melding gerapporteerd; een `Err` is voor onbruikbare inputs.
    fn solve_instance(&self, access: &mut dyn DataAccess, meta: &MetaMap) -> Result<(), ComponentError>;
}

/// `DataAccess` over een slice met inputwaarden in pinvolgorde.
#[derive(Debug)]
pub struct SolveContext<'a> {
    inputs: &'a [Value],
    input_params: &'static [ParamDescriptor],
    output_params: &'static [ParamDescriptor],
    solution: Solution,
}

impl<'a> SolveContext<'a> {
    #[must_use]
    pub fn new(
        inputs: &'a [Value],
        input_params: &'static [ParamDescriptor],
        output_params: &'static [ParamDescriptor],
    ) -> Self {
        Self {
            inputs,
            input_params,
            output_params,
            solution: Solution::default(),
        }
    }

    #[must_use]
    pub fn into_solution(self) -> Solution {
        self.solution
    }
}

impl DataAccess for SolveContext<'_> {
    fn get_number(&self, index: usize) -> Result<Option<f64>, ComponentError> {
        if let Some(value) = self.inputs.get(index) {
            return coerce::coerce_number(value).map(Some);
        }
        Ok(self.input_params.get(index).and_then(|param| param.default))
    }

    fn set_data(&mut self, index: usize, value: Value) {
        match self.output_params.get(index) {
            Some(param) => {
                self.solution.outputs.insert(param.nickname.to_owned(), value);
            }
            None => {
                log::warn!("outputpin {index} bestaat niet; waarde genegeerd");
                self.add_runtime_message(
                    RuntimeMessageLevel::Warning,
                    &format!("outputpin {index} bestaat niet"),
                );
            }
        }
    }

    fn add_runtime_message(&mut self, level: RuntimeMessageLevel, text: &str) {
        self.solution.messages.push(RuntimeMessage {
            level,
            text: text.to_owned(),
        });
    }
}

/// Beschikbare componenttypen binnen de registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    CurveSine(curve_sine::ComponentKind),
}

impl ComponentKind {
    pub fn evaluate(&self, inputs: &[Value], meta: &MetaMap) -> ComponentResult {
        let mut context = SolveContext::new(inputs, self.input_params(), self.output_params());
        match self {
            Self::CurveSine(component) => component.solve_instance(&mut context, meta)?,
        }
        Ok(context.into_solution())
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CurveSine(component) => component.name(),
        }
    }

    #[must_use]
    pub fn input_params(&self) -> &'static [ParamDescriptor] {
        match self {
            Self::CurveSine(component) => component.input_params(),
        }
    }

    #[must_use]
    pub fn output_params(&self) -> &'static [ParamDescriptor] {
        match self {
            Self::CurveSine(component) => component.output_params(),
        }
    }
}

/// Registry die componentimplementaties opzoekt op GUID of naam.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    by_guid: HashMap<String, ComponentKind>,
    by_name: HashMap<String, ComponentKind>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let mut registry = Self::new();

        for registration in curve_sine::REGISTRATIONS {
            let kind = ComponentKind::CurveSine(registration.kind);
            for guid in registration.guids {
                registry.register_guid(guid, kind);
            }
            registry.register_names(registration.names, kind);
        }

        registry
    }
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_guid: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn register_guid(&mut self, guid: impl AsRef<str>, kind: ComponentKind) {
        let key = normalize_guid(guid.as_ref());
        self.by_guid.insert(key, kind);
    }

    pub fn register_names(&mut self, names: &[&str], kind: ComponentKind) {
        for name in names {
            let key = normalize_name(name);
            self.by_name.insert(key, kind);
        }
    }

    #[must_use]
    pub fn resolve(
        &self,
        guid: Option<&str>,
        name: Option<&str>,
        nickname: Option<&str>,
    ) -> Option<ComponentKind> {
        if let Some(component) = guid.and_then(|guid| self.by_guid.get(&normalize_guid(guid))) {
            return Some(*component);
        }

        [name, nickname]
            .into_iter()
            .flatten()
            .find_map(|name| self.by_name.get(&normalize_name(name)).copied())
    }
}

fn normalize_guid(guid: &str) -> String {
    guid.trim()
        .trim_matches(|c| c == '{' || c == '}')
        .to_lowercase()
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
