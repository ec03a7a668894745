use std::io;
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use measurement_config::codec::{
    classify, decode, decode_value, encode, Advisory, CodecError, ValueKind,
};
use measurement_config::ModelValue;
use measurement_config_quantity::{
    units, Complex, FrequencyArray, NdArray, NumericArray, NumericScalar, Quantity, Time, Value,
    ValueArray,
};
use proptest::prelude::*;
use serde_json::{json, Value as Json};
use tracing_subscriber::fmt::MakeWriter;

fn through_text(node: &Json) -> Json {
    serde_json::from_str(&serde_json::to_string(node).unwrap()).unwrap()
}

fn round_trip(value: &ModelValue) -> ModelValue {
    decode_value(&through_text(&encode(value).unwrap())).unwrap()
}

#[test]
fn float_array_scenario() {
    let array = ModelValue::Array(NumericArray::Float64(NdArray::from_vec(vec![1.0, 2.0, 3.0])));
    let encoded = encode(&array).unwrap();
    assert_eq!(
        encoded,
        json!({
            "reals": {"values": [1.0, 2.0, 3.0]},
            "shape": [3],
            "__type__": "numeric.Float64Array",
        })
    );
    assert_eq!(decode_value(&encoded).unwrap(), array);
}

#[test]
fn complex_scenario() {
    let z = ModelValue::Complex(Complex::new(3.0, 4.0));
    let encoded = encode(&z).unwrap();
    assert_eq!(encoded, json!({"real": 3.0, "imag": 4.0, "__type__": "scalar.complex"}));
    assert_eq!(decode_value(&encoded).unwrap(), z);
}

#[test]
fn unknown_namespace_is_kept_with_an_advisory() {
    let node = json!({"__type__": "unknown.Foo", "x": 1});
    let decoded = decode(&node).unwrap();
    let mut expected = IndexMap::new();
    expected.insert("__type__".to_string(), ModelValue::Str("unknown.Foo".into()));
    expected.insert("x".to_string(), ModelValue::Int(1));
    assert_eq!(decoded.value, ModelValue::Map(expected));
    assert_eq!(
        decoded.advisories,
        vec![Advisory::UnknownTag {
            path: String::new(),
            tag: "unknown.Foo".into()
        }]
    );
}

#[test]
fn unknown_numeric_class_is_named() {
    let node = json!({"__type__": "numeric.Bogus"});
    let err = decode(&node).unwrap_err();
    assert_eq!(err, CodecError::UnknownNumericClass("Bogus".into()));
    assert_eq!(err.to_string(), "unknown numeric class: Bogus");
}

#[test]
fn unknown_quantity_class_is_named() {
    let node = json!({"__type__": "quantity.Mass", "real_value": 1.0});
    assert_eq!(
        decode(&node),
        Err(CodecError::UnknownQuantityClass("Mass".into()))
    );
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn unknown_namespace_is_logged_at_warn() {
    let captured = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(captured.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let node = json!({"outer": {"__type__": "unknown.Foo"}});
    tracing::subscriber::with_default(subscriber, || decode_value(&node).unwrap());

    let log = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(log.contains("WARN"), "{log}");
    assert!(log.contains("unknown.Foo"), "{log}");
    assert!(log.contains("/outer"), "{log}");
}

#[test]
fn rich_kind_matrix() {
    let cases: Vec<(ModelValue, ValueKind, &str)> = vec![
        (
            NumericArray::Int32(NdArray::new(vec![2, 2], vec![1, 2, 3, 4]).unwrap()).into(),
            ValueKind::NumericArray,
            "numeric.Int32Array",
        ),
        (
            NumericArray::Complex128(NdArray::from_vec(vec![Complex::new(0.0, 1.0)])).into(),
            ValueKind::NumericArray,
            "numeric.Complex128Array",
        ),
        (
            NumericScalar::Float32(0.1).into(),
            ValueKind::NumericScalar,
            "numeric.float32",
        ),
        (
            NumericScalar::Int64(-7).into(),
            ValueKind::NumericScalar,
            "numeric.int64",
        ),
        (
            NumericScalar::Complex128(Complex::new(1.0, -1.0)).into(),
            ValueKind::NumericScalar,
            "numeric.complex128",
        ),
        (
            Complex::new(-0.5, 2.0).into(),
            ValueKind::ComplexNumber,
            "scalar.complex",
        ),
        (
            Value::from_unit_str(5.0, "GHz").unwrap().into(),
            ValueKind::PhysicalQuantity,
            "quantity.Value",
        ),
        (
            Time::new(4.0, units::ns()).unwrap().into(),
            ValueKind::PhysicalQuantity,
            "quantity.Time",
        ),
        (
            ValueArray::from_unit_str(vec![1.0, 2.0], "mV").unwrap().into(),
            ValueKind::PhysicalQuantityArray,
            "quantity.ValueArray",
        ),
        (
            FrequencyArray::new(vec![4.0, 5.0], units::ghz()).unwrap().into(),
            ValueKind::PhysicalQuantityArray,
            "quantity.FrequencyArray",
        ),
    ];
    for (value, kind, tag) in cases {
        assert_eq!(classify(&value), kind, "{tag}");
        let encoded = encode(&value).unwrap();
        assert_eq!(encoded["__type__"], json!(tag));
        let prefix = tag.split('.').next().unwrap();
        assert_eq!(Some(prefix), kind.namespace().map(|ns| ns.name()));
        assert_eq!(round_trip(&value), value, "{tag}");
    }
}

#[test]
fn legacy_ndarray_tag_picks_dtype_from_payload() {
    let node = json!({"reals": {"values": [1.5]}, "shape": [1], "__type__": "numeric.ndarray"});
    assert_eq!(
        decode_value(&node).unwrap(),
        ModelValue::Array(NumericArray::Float64(NdArray::from_vec(vec![1.5])))
    );
    let node = json!({
        "complexes": {"values": [{"real": 1.0, "imaginary": 2.0}]},
        "shape": [1],
        "__type__": "numeric.ndarray",
    });
    assert_eq!(
        decode_value(&node).unwrap(),
        ModelValue::Array(NumericArray::Complex128(NdArray::from_vec(vec![Complex::new(1.0, 2.0)])))
    );
}

#[test]
fn lossy_numeric_payload_is_rejected() {
    let node = json!({"real_value": 1.5, "__type__": "numeric.int32"});
    match decode(&node) {
        Err(CodecError::InvalidPayload { tag, path, .. }) => {
            assert_eq!(tag, "numeric.int32");
            assert_eq!(path, "");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn malformed_payload_matrix() {
    let second = |numerator: &str| {
        json!({"unit": "SECOND", "exponent": {"numerator": numerator, "denominator": "1"}})
    };
    let cases = [
        (
            "both scalar branches",
            json!({"real_value": 1.0, "complex_value": {"real": 1.0},
                   "__type__": "quantity.Value"}),
        ),
        ("no scalar branch", json!({"units": [], "__type__": "quantity.Value"})),
        (
            "both array branches",
            json!({"reals": {}, "complexes": {}, "shape": [0],
                   "__type__": "numeric.Float64Array"}),
        ),
        ("no array branch", json!({"shape": [1], "__type__": "numeric.Float64Array"})),
        (
            "unknown unit",
            json!({"units": [{"unit": "PARSEC"}], "real_value": 1.0,
                   "__type__": "quantity.Value"}),
        ),
        (
            "unknown scale",
            json!({"units": [{"unit": "SECOND", "scale": "HUGE"}], "real_value": 1.0,
                   "__type__": "quantity.Time"}),
        ),
        (
            "zero denominator",
            json!({"units": [{"unit": "SECOND",
                              "exponent": {"numerator": "1", "denominator": "0"}}],
                   "real_value": 1.0, "__type__": "quantity.Value"}),
        ),
        (
            "shape and length disagree",
            json!({"reals": {"values": [1.0, 2.0]}, "shape": [3],
                   "__type__": "numeric.Float64Array"}),
        ),
        (
            "shape product overflows",
            json!({"reals": {}, "shape": [65536, 65536, 65536, 65536],
                   "__type__": "numeric.Float64Array"}),
        ),
        (
            "minimum exponent",
            json!({"units": [second("-9223372036854775808")], "real_value": 1.0,
                   "__type__": "quantity.Value"}),
        ),
        (
            "merged exponents overflow",
            json!({"units": [second("9223372036854775807"), second("9223372036854775807")],
                   "real_value": 1.0, "__type__": "quantity.Value"}),
        ),
        (
            "unknown record field",
            json!({"real_value": 1.0, "extra": true, "__type__": "numeric.float64"}),
        ),
    ];
    for (name, node) in cases {
        match decode(&json!({"payload": node})) {
            Err(CodecError::InvalidPayload { path, .. }) => assert_eq!(path, "/payload", "{name}"),
            other => panic!("{name}: unexpected {other:?}"),
        }
    }
}

#[test]
fn decode_does_not_touch_the_input() {
    let node = json!({"a": [{"real": 1.0, "imag": 0.0, "__type__": "scalar.complex"}]});
    let before = node.clone();
    decode(&node).unwrap();
    assert_eq!(node, before);
}

#[test]
fn quantities_keep_unit_identity() {
    let q = Quantity::from(Value::from_unit_str(2.5, "us").unwrap());
    match round_trip(&q.clone().into()) {
        ModelValue::Quantity(back) => {
            assert_eq!(back.unit(), q.unit());
            assert_eq!(back, q);
        }
        other => panic!("unexpected {other:?}"),
    }
}

fn leaf() -> impl Strategy<Value = ModelValue> {
    prop_oneof![
        Just(ModelValue::Null),
        any::<bool>().prop_map(ModelValue::Bool),
        any::<i64>().prop_map(ModelValue::Int),
        (-1e15f64..1e15).prop_map(ModelValue::Float),
        "[a-z0-9 ]{0,8}".prop_map(ModelValue::Str),
        (-1e6f64..1e6, -1e6f64..1e6).prop_map(|(re, im)| ModelValue::Complex(Complex::new(re, im))),
        (-(1i64 << 53)..(1i64 << 53)).prop_map(|v| ModelValue::Numeric(NumericScalar::Int64(v))),
        any::<f32>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| ModelValue::Numeric(NumericScalar::Float32(v))),
        proptest::collection::vec(-1e9f64..1e9, 0..6)
            .prop_map(|v| ModelValue::Array(NumericArray::Float64(NdArray::from_vec(v)))),
        (-1e9f64..1e9).prop_map(|v| ModelValue::Quantity(Value::new(v, units::mhz()).into())),
    ]
}

fn tree() -> impl Strategy<Value = ModelValue> {
    leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..6).prop_map(ModelValue::Seq),
            proptest::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| ModelValue::Map(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn trees_round_trip_through_text(value in tree()) {
        prop_assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn every_tag_has_exactly_one_known_prefix(value in leaf()) {
        let encoded = encode(&value).unwrap();
        if let Some(tag) = encoded.get("__type__").and_then(Json::as_str) {
            let prefixes = ["numeric.", "quantity.", "scalar."];
            prop_assert_eq!(prefixes.iter().filter(|p| tag.starts_with(*p)).count(), 1);
        }
    }

    #[test]
    fn numeric_arrays_of_any_shape(
        (shape, data) in proptest::collection::vec(0usize..4, 0..4).prop_flat_map(|shape| {
            let n = shape.iter().product::<usize>();
            (Just(shape), proptest::collection::vec(any::<i32>(), n))
        })
    ) {
        let value = ModelValue::Array(NumericArray::Int32(NdArray::new(shape, data).unwrap()));
        prop_assert_eq!(round_trip(&value), value);
    }
}
