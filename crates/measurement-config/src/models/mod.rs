//! Measurement configuration and result records.

mod sweep_measurement_config;
mod sweep_measurement_result;

pub use sweep_measurement_config::{
    DataAcquisitionConfig, FrequencyConfig, ParameterSweepConfig, ParameterSweepContent,
    ParametricSequenceConfig, ParametricSequencePulseCommand, PulseArgument, SweepCategory,
    SweepMeasurementConfig, ValueArrayLike,
};
pub use sweep_measurement_result::SweepMeasurementResult;
