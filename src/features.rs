//! Request features
//!
//! [`RiskInput`] is the accident-context record accepted by
//! `/predict_risk`. Its field order is the column order of the feature
//! row handed to the model, so fields must not be reordered.

use crate::ModelError;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Feature column names, in the order the model was trained on.
pub const FEATURE_COLUMNS: [&str; 9] = [
    "light_conditions",
    "weather_conditions",
    "road_surface_conditions",
    "road_type",
    "speed_limit",
    "urban_or_rural_area",
    "junction_detail",
    "number_of_vehicles",
    "number_of_casualties",
];

/// Per-column defaults; `None` marks a required field.
const FIELD_DEFAULTS: [Option<i64>; 9] = [
    None,
    None,
    None,
    Some(1),
    Some(30),
    Some(1),
    Some(0),
    Some(1),
    Some(1),
];

/// Accident context submitted for scoring.
///
/// Documented ranges are informational only; nothing enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskInput {
    /// Lighting condition code (1-5)
    pub light_conditions: i64,
    /// Weather condition code (1-7)
    pub weather_conditions: i64,
    /// Road surface condition code (1-7)
    pub road_surface_conditions: i64,
    /// Road type code
    #[serde(default = "default_one")]
    pub road_type: i64,
    /// Speed limit in mph
    #[serde(default = "default_speed_limit")]
    pub speed_limit: i64,
    /// Urban (1) or Rural (2) area
    #[serde(default = "default_one")]
    pub urban_or_rural_area: i64,
    /// Junction detail code
    #[serde(default)]
    pub junction_detail: i64,
    /// Number of vehicles involved
    #[serde(default = "default_one")]
    pub number_of_vehicles: i64,
    /// Number of casualties
    #[serde(default = "default_one")]
    pub number_of_casualties: i64,
}

fn default_one() -> i64 {
    1
}

fn default_speed_limit() -> i64 {
    30
}

impl RiskInput {
    /// Input with the three required fields set and every other field
    /// at its default.
    pub fn new(light_conditions: i64, weather_conditions: i64, road_surface_conditions: i64) -> Self {
        Self {
            light_conditions,
            weather_conditions,
            road_surface_conditions,
            road_type: default_one(),
            speed_limit: default_speed_limit(),
            urban_or_rural_area: default_one(),
            junction_detail: 0,
            number_of_vehicles: default_one(),
            number_of_casualties: default_one(),
        }
    }

    /// Parse and validate a raw request body.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, ValidationErrors> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            ValidationErrors::single(FieldError::body(format!("JSON decode error: {}", e), "json_invalid"))
        })?;
        Self::from_value(&value)
    }

    /// Validate a JSON value, collecting every offending field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let object = value.as_object().ok_or_else(|| {
            ValidationErrors::single(FieldError::body(
                "Input should be a valid dictionary or object to extract fields from",
                "model_attributes_type",
            ))
        })?;

        let mut values = [0i64; 9];
        let mut errors = Vec::new();
        for (i, (name, default)) in FEATURE_COLUMNS.iter().zip(FIELD_DEFAULTS).enumerate() {
            match field_value(object, name, default) {
                Ok(v) => values[i] = v,
                Err(e) => errors.push(e),
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        let [
            light_conditions,
            weather_conditions,
            road_surface_conditions,
            road_type,
            speed_limit,
            urban_or_rural_area,
            junction_detail,
            number_of_vehicles,
            number_of_casualties,
        ] = values;
        Ok(Self {
            light_conditions,
            weather_conditions,
            road_surface_conditions,
            road_type,
            speed_limit,
            urban_or_rural_area,
            junction_detail,
            number_of_vehicles,
            number_of_casualties,
        })
    }

    /// Values in [`FEATURE_COLUMNS`] order.
    pub fn to_vector(&self) -> [i64; 9] {
        [
            self.light_conditions,
            self.weather_conditions,
            self.road_surface_conditions,
            self.road_type,
            self.speed_limit,
            self.urban_or_rural_area,
            self.junction_detail,
            self.number_of_vehicles,
            self.number_of_casualties,
        ]
    }

    /// Single-row feature table for the model.
    pub fn to_feature_row(&self) -> FeatureRow {
        FeatureRow {
            columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            values: Array1::from_iter(self.to_vector().into_iter().map(|v| v as f32))
                .insert_axis(Axis(0)),
        }
    }
}

fn field_value(object: &Map<String, Value>, name: &str, default: Option<i64>) -> Result<i64, FieldError> {
    match (object.get(name), default) {
        (Some(value), _) => coerce_int(value).map_err(|e| FieldError::field(name, e.msg(), e.kind())),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(FieldError::field(name, "Field required", "missing")),
    }
}

/// Why a value could not be read as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IntError {
    /// Not a number, string or bool
    Type,
    /// A float with a fractional part
    Fraction,
    /// A string that is not an integer
    Parsing,
    /// Outside the signed 64-bit range
    Size,
}

impl IntError {
    fn msg(self) -> &'static str {
        match self {
            IntError::Type => "Input should be a valid integer",
            IntError::Fraction => "Input should be a valid integer, got a number with a fractional part",
            IntError::Parsing => "Input should be a valid integer, unable to parse string as an integer",
            IntError::Size => "Input should be a valid integer, unable to parse number as an integer",
        }
    }

    fn kind(self) -> &'static str {
        match self {
            IntError::Type => "int_type",
            IntError::Fraction => "int_from_float",
            IntError::Parsing => "int_parsing",
            IntError::Size => "int_parsing_size",
        }
    }
}

/// Lenient integer coercion: integral numbers, integer strings (a
/// trailing `.0`, `.00`, ... is allowed) and bools.
fn coerce_int(value: &Value) -> Result<i64, IntError> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(i),
            (None, Some(f)) if f.is_finite() && f.fract() != 0.0 => Err(IntError::Fraction),
            (None, Some(f)) if f >= i64::MIN as f64 && f < i64::MAX as f64 => Ok(f as i64),
            _ => Err(IntError::Size),
        },
        Value::String(s) => parse_int_str(s.trim()).ok_or(IntError::Parsing),
        Value::Bool(b) => Ok(i64::from(*b)),
        _ => Err(IntError::Type),
    }
}

fn parse_int_str(s: &str) -> Option<i64> {
    if let Ok(i) = s.parse() {
        return Some(i);
    }
    let (whole, fraction) = s.split_once('.')?;
    if fraction.chars().all(|c| c == '0') {
        whole.parse().ok()
    } else {
        None
    }
}

/// A single validation failure, shaped like FastAPI's error entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Location, e.g. `["body", "light_conditions"]`
    pub loc: Vec<String>,
    /// Human readable message
    pub msg: String,
    /// Error kind, e.g. `missing`
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    fn field(name: &str, msg: &str, kind: &str) -> Self {
        Self {
            loc: vec!["body".into(), name.into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    fn body(msg: impl Into<String>, kind: &str) -> Self {
        Self {
            loc: vec!["body".into()],
            msg: msg.into(),
            kind: kind.into(),
        }
    }

    /// Field name, if the error points at one.
    pub fn field_name(&self) -> Option<&str> {
        self.loc.get(1).map(String::as_str)
    }
}

/// Every field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid request: {}", describe(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn single(error: FieldError) -> Self {
        Self(vec![error])
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().filter_map(FieldError::field_name).collect()
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.loc.join("."), e.msg))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Single-row feature table with named columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    columns: Vec<String>,
    values: Array2<f32>,
}

impl FeatureRow {
    /// Build a row from parallel column names and values.
    pub fn new(columns: Vec<String>, values: Vec<f32>) -> Result<Self, ModelError> {
        if columns.len() != values.len() {
            return Err(ModelError::Invalid(format!(
                "{} column names for {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self {
            columns,
            values: Array1::from(values).insert_axis(Axis(0)),
        })
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The row's values
    pub fn values(&self) -> ArrayView1<'_, f32> {
        self.values.row(0)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.values.ncols()
    }
}

impl fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .columns
            .iter()
            .zip(self.values().iter())
            .map(|(c, v)| format!("{}={}", c, v))
            .collect();
        write!(f, "[{}]", cells.join(", "))
    }
}
