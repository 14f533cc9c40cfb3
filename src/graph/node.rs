//! Definitie van een componentinstantie (node) met pinnen en meta-informatie.

use std::collections::BTreeMap;

use super::value::Value;

/// Waarde die meta-informatie over een node beschrijft (bv. het aantal samples).
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Number(f64),
    Integer(i64),
    Boolean(bool),
    Text(String),
    List(Vec<MetaValue>),
}

impl MetaValue {
    /// Geeft de waarde als geheel getal terug wanneer dat verliesvrij kan.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            #[allow(clippy::cast_possible_truncation)]
            Self::Number(value) if value.is_finite() && value.fract() == 0.0 => Some(*value as i64),
            Self::List(list) if list.len() == 1 => list[0].as_integer(),
            _ => None,
        }
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Alias voor een verzameling meta-informatie.
pub type MetaMap = BTreeMap<String, MetaValue>;

/// Hulpfuncties voor case-insensitieve meta-opzoekingen.
pub trait MetaLookupExt {
    /// Zoek een meta-item op zonder hoofdlettergevoeligheid.
    fn get_normalized(&self, key: &str) -> Option<&MetaValue>;
}

impl MetaLookupExt for MetaMap {
    fn get_normalized(&self, key: &str) -> Option<&MetaValue> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }

        let lower = key.to_ascii_lowercase();
        if lower != key {
            if let Some(value) = self.get(&lower) {
                return Some(value);
            }
        }

        None
    }
}

/// Een componentinstantie zoals de host die aanlevert.
#[derive(Debug, Clone, Default)]
pub struct Node {
    /// Het type component (GUID) dat deze node representeert.
    pub guid: Option<String>,
    /// Volledige naam van het component.
    pub name: Option<String>,
    /// Nickname/afkorting indien beschikbaar.
    pub nickname: Option<String>,
    /// Ingangswaarden, per pinnickname.
    pub inputs: BTreeMap<String, Value>,
    /// Uitgangswaarden, per pinnickname.
    pub outputs: BTreeMap<String, Value>,
    /// Verdere metadata zoals het aantal samples.
    pub meta: MetaMap,
}

impl Node {
    /// Maak een node aan voor een component-GUID.
    #[must_use]
    pub fn with_guid(guid: impl Into<String>) -> Self {
        Self {
            guid: Some(guid.into()),
            ..Self::default()
        }
    }

    /// Sla een input-waarde op.
    pub fn set_input<S: Into<String>>(&mut self, pin: S, value: Value) {
        self.inputs.insert(pin.into(), value);
    }

    /// Haal een verwijzing naar een input op.
    pub fn input(&self, pin: &str) -> Option<&Value> {
        self.inputs.get(pin)
    }

    /// Vervang alle outputs door het resultaat van een nieuwe evaluatie.
    pub fn replace_outputs(&mut self, outputs: BTreeMap<String, Value>) {
        self.outputs = outputs;
    }

    /// Haal een output op.
    pub fn output(&self, pin: &str) -> Option<&Value> {
        self.outputs.get(pin)
    }

    /// Bewaar meta-informatie bij de node.
    pub fn insert_meta<S: Into<String>, V: Into<MetaValue>>(&mut self, key: S, value: V) {
        let key_string = key.into();
        let value = value.into();

        self.meta.insert(key_string.clone(), value.clone());

        let lower = key_string.to_ascii_lowercase();
        if lower != key_string {
            self.meta.insert(lower, value);
        }
    }

    /// Haal een meta-item op.
    pub fn meta(&self, key: &str) -> Option<&MetaValue> {
        self.meta.get_normalized(key)
    }
}
