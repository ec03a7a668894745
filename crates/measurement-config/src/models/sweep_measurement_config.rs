//! Configuration records for sweep measurements.

use indexmap::IndexMap;
use measurement_config_expression::{Expression, ExpressionError, Operand};
use measurement_config_quantity::{Frequency, NumericArray, Time, ValueArray};

use crate::model;
use crate::model::{Field, ValidationError};
use crate::pointer::FieldPath;
use crate::schema::{RichKind, TypeSchema};
use crate::value::ModelValue;

/// A pulse command argument: a literal, or a name evaluated against the
/// sequence variables.
#[derive(Debug, Clone, PartialEq)]
pub enum PulseArgument {
    Name(String),
    Number(f64),
}

impl Field for PulseArgument {
    fn to_model_value(&self) -> ModelValue {
        match self {
            Self::Name(name) => ModelValue::Str(name.clone()),
            Self::Number(v) => ModelValue::Float(*v),
        }
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Str(name) => Ok(Self::Name(name)),
            ModelValue::Float(v) => Ok(Self::Number(v)),
            ModelValue::Int(v) => Ok(Self::Number(v as f64)),
            other => Err(ValidationError::type_mismatch(path, "string or number", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Union(vec![TypeSchema::String, TypeSchema::Number])
    }
}

impl From<&str> for PulseArgument {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<f64> for PulseArgument {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

/// Sweep values: a quantity array, a bare numeric array, or a plain list.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueArrayLike {
    Quantity(ValueArray),
    Numeric(NumericArray),
    List(Vec<ModelValue>),
}

impl Field for ValueArrayLike {
    fn to_model_value(&self) -> ModelValue {
        match self {
            Self::Quantity(v) => v.to_model_value(),
            Self::Numeric(v) => v.to_model_value(),
            Self::List(items) => ModelValue::Seq(items.clone()),
        }
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Quantity(q) if q.is_array() => {
                ValueArray::from_model_value(ModelValue::Quantity(q), path).map(Self::Quantity)
            }
            ModelValue::Array(a) => Ok(Self::Numeric(a)),
            ModelValue::Seq(items) => Ok(Self::List(items)),
            other => Err(ValidationError::type_mismatch(
                path,
                "quantity array, numeric array or list",
                &other,
            )),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Union(vec![
            TypeSchema::rich("ValueArray", RichKind::QuantityArray),
            TypeSchema::rich("NumericArray", RichKind::NumericArray),
            TypeSchema::Array(Box::new(TypeSchema::Any)),
        ])
    }
}

impl From<Vec<f64>> for ValueArrayLike {
    fn from(values: Vec<f64>) -> Self {
        Self::List(values.into_iter().map(ModelValue::Float).collect())
    }
}

impl From<ValueArray> for ValueArrayLike {
    fn from(v: ValueArray) -> Self {
        Self::Quantity(v)
    }
}

/// What a sweep axis varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepCategory {
    FrequencyShift,
    SequenceVariable,
}

impl SweepCategory {
    pub const ALL: [SweepCategory; 2] = [SweepCategory::FrequencyShift, SweepCategory::SequenceVariable];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FrequencyShift => "frequency_shift",
            Self::SequenceVariable => "sequence_variable",
        }
    }
}

impl Field for SweepCategory {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Str(self.as_str().to_string())
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Str(s) => Self::ALL
                .into_iter()
                .find(|c| c.as_str() == s)
                .ok_or_else(|| {
                    ValidationError::invalid(
                        path,
                        format_args!("`{s}` is not one of frequency_shift, sequence_variable"),
                    )
                }),
            other => Err(ValidationError::type_mismatch(path, "string", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Enum(Self::ALL.iter().map(|c| c.as_str()).collect())
    }
}

model! {
    /// Pulse command used in parametric sequences.
    pub struct ParametricSequencePulseCommand {
        pub name: String,
        pub channel_list: Vec<String>,
        pub argument_list: Vec<PulseArgument>,
    }
}

impl ParametricSequencePulseCommand {
    /// Evaluates every argument; names are parsed as expressions over
    /// `params`.
    pub fn resolve_arguments(
        &self,
        params: &IndexMap<String, Operand>,
    ) -> Result<Vec<Operand>, ExpressionError> {
        self.argument_list
            .iter()
            .map(|arg| match arg {
                PulseArgument::Number(v) => Ok(Operand::Real(*v)),
                PulseArgument::Name(source) => Expression::new(source)?.resolve(params),
            })
            .collect()
    }
}

model! {
    /// Sequence configuration with variable parameters.
    pub struct ParametricSequenceConfig {
        pub delta_time: Time,
        pub variable_list: Vec<String>,
        pub command_list: Vec<ParametricSequencePulseCommand>,
    }
}

model! {
    pub struct FrequencyConfig {
        pub channel_to_frequency: IndexMap<String, Frequency>,
        pub channel_to_frequency_reference: IndexMap<String, String>,
        pub channel_to_frequency_shift: IndexMap<String, Frequency>,
        pub keep_oscillator_relative_phase: bool,
    }
}

model! {
    pub struct DataAcquisitionConfig {
        pub shot_count: i64,
        pub shot_repetition_margin: Time,
        pub data_acquisition_duration: Time,
        pub data_acquisition_delay: Time,
        pub data_acquisition_timeout: Time,
        pub flag_average_waveform: bool,
        pub flag_average_shots: bool,
        pub delta_time: Time,
        pub channel_to_averaging_time: IndexMap<String, Time>,
        pub channel_to_averaging_window: IndexMap<String, ValueArrayLike>,
    }
}

model! {
    /// Definition of one sweep dimension.
    pub struct ParameterSweepContent {
        pub category: SweepCategory,
        pub sweep_target: Vec<String>,
        pub value_list: ValueArrayLike,
    }
}

model! {
    /// Sweep contents by key, and the axes that group them.
    pub struct ParameterSweepConfig {
        pub sweep_content_list: IndexMap<String, ParameterSweepContent>,
        pub sweep_axis: Vec<Vec<String>>,
    }
}

model! {
    /// Top-level configuration for sweep measurements.
    pub struct SweepMeasurementConfig {
        pub channel_list: Vec<String>,
        pub sequence: ParametricSequenceConfig,
        pub frequency: FrequencyConfig,
        pub data_acquisition: DataAcquisitionConfig,
        pub sweep_parameter: ParameterSweepConfig,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Model;
    use serde_json::json;

    #[test]
    fn pulse_arguments_accept_names_and_numbers() {
        let node = json!({"name": "pulse", "channel_list": ["q0"], "argument_list": ["amp", 0.5, 2]});
        let cmd = ParametricSequencePulseCommand::from_dict(&node).unwrap();
        assert_eq!(
            cmd.argument_list,
            vec![
                PulseArgument::Name("amp".into()),
                PulseArgument::Number(0.5),
                PulseArgument::Number(2.0)
            ]
        );

        let mut params = IndexMap::new();
        params.insert("amp".to_string(), Operand::Real(0.25));
        assert_eq!(
            cmd.resolve_arguments(&params).unwrap(),
            vec![Operand::Real(0.25), Operand::Real(0.5), Operand::Real(2.0)]
        );
        assert_eq!(
            cmd.resolve_arguments(&IndexMap::new()),
            Err(ExpressionError::MissingSymbol("amp".into()))
        );
    }

    #[test]
    fn category_is_a_closed_set() {
        let node = json!({"category": "amplitude", "sweep_target": [], "value_list": []});
        let err = ParameterSweepContent::from_dict(&node).unwrap_err();
        assert!(err.to_string().contains("/category"), "{err}");
    }
}
