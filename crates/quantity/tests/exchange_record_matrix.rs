use measurement_config_quantity::{
    units, ArrayData, Complex, Frequency, NdArray, Quantity, QuantityClass, QuantityError, Time,
    Unit, Value, ValueArray,
};
use proptest::prelude::*;
use serde_json::{json, Value as Json};

fn through_text(map: serde_json::Map<String, Json>) -> serde_json::Map<String, Json> {
    let text = serde_json::to_string(&Json::Object(map)).unwrap();
    match serde_json::from_str(&text).unwrap() {
        Json::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn quantity_record_matrix() {
    let cases: Vec<Quantity> = vec![
        Value::from_unit_str(5.0, "GHz").unwrap().into(),
        Value::dimensionless(Complex::new(0.5, -0.25)).into(),
        Time::new(12.5, units::ns()).unwrap().into(),
        Frequency::new(0.1, units::ghz()).unwrap().into(),
        ValueArray::from_unit_str(vec![1.0, 2.0, 3.0], "ns").unwrap().into(),
        ValueArray::new(
            NdArray::new(vec![1, 2], vec![Complex::new(1.0, 2.0), Complex::new(3.0, 4.0)]).unwrap(),
            Unit::parse("V").unwrap(),
        )
        .into(),
    ];
    for case in cases {
        let map = through_text(case.to_json().unwrap());
        let back = Quantity::from_json(case.class(), map).unwrap();
        assert_eq!(back, case);
    }
}

#[test]
fn non_finite_values_survive_text() {
    let v = Value::dimensionless(f64::NEG_INFINITY);
    let map = v.to_json().unwrap();
    assert_eq!(map["real_value"], json!("-Infinity"));
    assert_eq!(Value::from_json(through_text(map)).unwrap(), v);

    let nan = ValueArray::dimensionless(vec![f64::NAN]);
    let back = ValueArray::from_json(through_text(nan.to_json().unwrap())).unwrap();
    match back.values() {
        ArrayData::Real(a) => assert!(a.as_slice()[0].is_nan()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn empty_array_keeps_its_branch() {
    let empty = ValueArray::dimensionless(Vec::<f64>::new());
    let map = empty.to_json().unwrap();
    assert_eq!(Json::Object(map.clone()), json!({"reals": {}, "shape": [0]}));
    assert_eq!(ValueArray::from_json(map).unwrap(), empty);
}

#[test]
fn unknown_fields_are_rejected() {
    let Json::Object(map) = json!({"real_value": 1.0, "extra": true}) else {
        unreachable!()
    };
    assert!(matches!(
        Value::from_json(map),
        Err(QuantityError::InvalidRecord(_))
    ));
}

#[test]
fn class_registry_round_trip() {
    for class in QuantityClass::ALL {
        assert_eq!(QuantityClass::from_name(class.name()), Some(class));
    }
}

proptest! {
    #[test]
    fn real_values_are_bit_identical(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let value = Value::new(v, units::mhz());
        let back = Value::from_json(through_text(value.to_json().unwrap())).unwrap();
        prop_assert_eq!(back.value().as_real().map(f64::to_bits), Some(v.to_bits()));
        prop_assert_eq!(back.unit(), value.unit());
    }

    #[test]
    fn arrays_keep_shape_and_bits(
        (rows, cols, data) in (1usize..4, 1usize..4).prop_flat_map(|(r, c)| {
            (Just(r), Just(c), proptest::collection::vec(-1e12f64..1e12, r * c))
        })
    ) {
        let array = ValueArray::new(NdArray::new(vec![rows, cols], data).unwrap(), units::us());
        let back = ValueArray::from_json(through_text(array.to_json().unwrap())).unwrap();
        prop_assert_eq!(back, array);
    }
}
