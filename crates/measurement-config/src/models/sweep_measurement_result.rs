//! Result record for sweep measurements.

use indexmap::IndexMap;
use measurement_config_quantity::NumericArray;

use crate::model;
use crate::value::ModelValue;

model! {
    /// Measured data with the keys that label its axes.
    pub struct SweepMeasurementResult {
        pub metadata: IndexMap<String, ModelValue>,
        pub data: NumericArray,
        pub data_shape: Vec<usize>,
        pub sweep_key_list: Vec<String>,
        pub data_key_list: Vec<String>,
    }
}

impl SweepMeasurementResult {
    /// Whether `data_shape` agrees with the shape of `data`.
    pub fn shape_matches(&self) -> bool {
        self.data.shape() == self.data_shape.as_slice()
    }
}
