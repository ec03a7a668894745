//! Wire tags: the reserved key, the namespaces and the class registries.

use measurement_config_quantity::DType;

/// Reserved key carrying the tag of a rich leaf.
pub const TYPE_KEY: &str = "__type__";

/// Legacy array class name accepted on decode.
pub const LEGACY_ARRAY_CLASS: &str = "ndarray";

pub const COMPLEX_CLASS: &str = "complex";
pub const COMPLEX_REAL_KEY: &str = "real";
pub const COMPLEX_IMAG_KEY: &str = "imag";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Numeric,
    Quantity,
    Scalar,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Numeric, Namespace::Quantity, Namespace::Scalar];

    pub fn name(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Quantity => "quantity",
            Self::Scalar => "scalar",
        }
    }

    /// Builds `<namespace>.<class>`.
    pub fn tag(self, class: &str) -> String {
        format!("{}.{class}", self.name())
    }

    /// Splits a tag into a known namespace and its class name.
    pub fn split(tag: &str) -> Option<(Namespace, &str)> {
        let (prefix, class) = tag.split_once('.')?;
        Self::ALL
            .into_iter()
            .find(|ns| ns.name() == prefix)
            .map(|ns| (ns, class))
    }
}

/// A resolved `numeric.*` class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericClass {
    Scalar(DType),
    Array(DType),
    /// `ndarray`: dtype follows from the payload branch.
    LegacyArray,
}

impl NumericClass {
    pub fn from_name(name: &str) -> Option<Self> {
        if name == LEGACY_ARRAY_CLASS {
            return Some(Self::LegacyArray);
        }
        DType::from_name(name)
            .map(Self::Scalar)
            .or_else(|| DType::from_array_class_name(name).map(Self::Array))
    }
}
