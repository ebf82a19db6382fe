/// Numeric codec tests.
///
/// Covers how each source type is stored (width, sign, decimal flag) and which
/// reads succeed or fail against the stored value.
use canopy_core::{Node, Number, TreeError, Width};

fn stored(node: &Node) -> Number {
    *node.number().expect("numeric node")
}

// ============================================================================
// Write policy
// ============================================================================

#[test]
fn integers_keep_source_width() {
    assert_eq!(Node::of(1u8).unwrap().width().unwrap(), 1);
    assert_eq!(Node::of(1i16).unwrap().width().unwrap(), 2);
    assert_eq!(Node::of(1u32).unwrap().width().unwrap(), 4);
    assert_eq!(Node::of(1i64).unwrap().width().unwrap(), 8);
    assert_eq!(Node::of(1usize).unwrap().width().unwrap(), 8);
}

#[test]
fn negative_flag_follows_value() {
    let neg = Node::of(-5i32).unwrap();
    assert!(neg.is_negative());
    assert!(!neg.has_decimal());
    assert_eq!(
        stored(&neg),
        Number::NegInt {
            value: -5,
            width: Width::Four
        }
    );

    let pos = Node::of(5i32).unwrap();
    assert!(!pos.is_negative());
    assert_eq!(
        stored(&pos),
        Number::PosInt {
            value: 5,
            width: Width::Four
        }
    );
}

#[test]
fn integral_float_is_stored_as_integer() {
    let node = Node::of(25.0f32).unwrap();
    assert!(!node.has_decimal());
    assert_eq!(node.width().unwrap(), 4);
    assert_eq!(node.read::<i32>().unwrap(), 25);

    let negative = Node::of(-3.0f64).unwrap();
    assert!(!negative.has_decimal());
    assert!(negative.is_negative());
    assert_eq!(negative.read::<i64>().unwrap(), -3);
}

#[test]
fn large_integral_float_uses_eight_bytes() {
    let node = Node::of(1e12f64).unwrap();
    assert!(!node.has_decimal());
    assert_eq!(node.width().unwrap(), 8);
    assert_eq!(node.read::<i64>().unwrap(), 1_000_000_000_000);
}

#[test]
fn fractional_floats_keep_precision_class() {
    let single = Node::of(2.5f32).unwrap();
    assert!(single.has_decimal());
    assert_eq!(single.width().unwrap(), 4);
    assert_eq!(stored(&single), Number::Float32(2.5));

    let double = Node::of(2.5f64).unwrap();
    assert!(double.has_decimal());
    assert_eq!(double.width().unwrap(), 8);
    assert_eq!(stored(&double), Number::Float64(2.5));
}

#[test]
fn non_finite_floats_stay_decimal() {
    let inf = Node::of(f64::INFINITY).unwrap();
    assert!(inf.has_decimal());
    assert_eq!(inf.read::<f64>().unwrap(), f64::INFINITY);

    let nan = Node::of(f32::NAN).unwrap();
    assert!(nan.has_decimal());
    assert!(nan.read::<f32>().unwrap().is_nan());
}

#[test]
fn negative_decimal_is_negative() {
    let node = Node::of(-0.5f64).unwrap();
    assert!(node.is_negative());
    assert!(node.has_decimal());
}

// ============================================================================
// Read policy: successes
// ============================================================================

#[test]
fn read_into_equal_or_wider_types() {
    let node = Node::of(200u8).unwrap();
    assert_eq!(node.read::<u8>().unwrap(), 200);
    assert_eq!(node.read::<u16>().unwrap(), 200);
    assert_eq!(node.read::<i32>().unwrap(), 200);
    assert_eq!(node.read::<u64>().unwrap(), 200);

    let neg = Node::of(-100i8).unwrap();
    assert_eq!(neg.read::<i8>().unwrap(), -100);
    assert_eq!(neg.read::<i64>().unwrap(), -100);
}

#[test]
fn non_negative_signed_reads_as_unsigned() {
    let node = Node::of(7i32).unwrap();
    assert_eq!(node.read::<u32>().unwrap(), 7);
}

#[test]
fn integers_always_read_as_floats() {
    let node = Node::of(u64::MAX).unwrap();
    assert_eq!(node.read::<f64>().unwrap(), u64::MAX as f64);
    assert_eq!(node.read::<f32>().unwrap(), u64::MAX as f32);

    let neg = Node::of(-9i16).unwrap();
    assert_eq!(neg.read::<f32>().unwrap(), -9.0);
}

#[test]
fn single_precision_reads_as_double() {
    let node = Node::of(0.25f32).unwrap();
    assert_eq!(node.read::<f64>().unwrap(), 0.25);
}

#[test]
fn double_within_f32_range_reads_as_single() {
    let node = Node::of(0.1f64).unwrap();
    assert_eq!(node.read::<f32>().unwrap(), 0.1f32);
}

#[test]
fn booleans_read_as_zero_or_one() {
    assert_eq!(Node::of(true).unwrap().read::<u8>().unwrap(), 1);
    assert_eq!(Node::of(false).unwrap().read::<i64>().unwrap(), 0);
    assert_eq!(Node::of(true).unwrap().read::<f64>().unwrap(), 1.0);
}

// ============================================================================
// Read policy: failures
// ============================================================================

#[test]
fn negative_into_unsigned_fails() {
    let node = Node::of(-1i32).unwrap();
    let err = node.read::<u32>().unwrap_err();
    assert!(matches!(err, TreeError::InvalidCast { target: "u32", .. }));
    assert!(matches!(node.read::<u64>(), Err(TreeError::InvalidCast { .. })));
    assert!(matches!(node.read::<usize>(), Err(TreeError::InvalidCast { .. })));

    // A one-byte negative fits every width, so only the sign can reject it.
    let byte = Node::of(-1i8).unwrap();
    assert!(matches!(byte.read::<u8>(), Err(TreeError::InvalidCast { target: "u8", .. })));
    assert!(matches!(byte.read::<u16>(), Err(TreeError::InvalidCast { target: "u16", .. })));
    assert!(matches!(byte.read::<u32>(), Err(TreeError::InvalidCast { .. })));
    assert!(matches!(byte.read::<u64>(), Err(TreeError::InvalidCast { .. })));
    assert!(matches!(byte.read::<usize>(), Err(TreeError::InvalidCast { .. })));
    assert_eq!(byte.read::<i8>().unwrap(), -1);
}

#[test]
fn decimal_into_integer_fails() {
    let node = Node::of(3.7f64).unwrap();
    let err = node.read::<i32>().unwrap_err();
    match err {
        TreeError::DecimalToIntegerLoss { value, target } => {
            assert_eq!(value, 3.7);
            assert_eq!(target, "i32");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(matches!(
        Node::of(-1.5f32).unwrap().read::<i64>(),
        Err(TreeError::DecimalToIntegerLoss { .. })
    ));
}

#[test]
fn wider_stored_width_fails() {
    let node = Node::of(1u32).unwrap();
    assert!(matches!(node.read::<u16>(), Err(TreeError::InvalidCast { .. })));
    assert!(matches!(node.read::<u8>(), Err(TreeError::InvalidCast { .. })));

    let long = Node::of(5i64).unwrap();
    assert!(matches!(long.read::<i32>(), Err(TreeError::InvalidCast { .. })));
}

#[test]
fn unsigned_above_signed_max_fails() {
    let node = Node::of(i32::MAX as u32 + 1).unwrap();
    assert!(matches!(node.read::<i32>(), Err(TreeError::InvalidCast { .. })));
    assert_eq!(node.read::<i64>().unwrap(), i32::MAX as i64 + 1);
}

#[test]
fn double_beyond_f32_range_fails() {
    // Integral, but too large for any integer width, so it stays decimal.
    let node = Node::of(1e300f64).unwrap();
    assert!(node.has_decimal());
    assert!(matches!(
        node.read::<f32>(),
        Err(TreeError::InvalidCast { target: "f32", .. })
    ));
    assert_eq!(node.read::<f64>().unwrap(), 1e300);
}

#[test]
fn number_into_bool_fails() {
    let err = Node::of(1u8).unwrap().read::<bool>().unwrap_err();
    assert!(matches!(err, TreeError::TypeMismatch { .. }));
}

#[test]
fn string_is_not_a_number() {
    let node = Node::of("42").unwrap();
    assert!(matches!(node.read::<i32>(), Err(TreeError::TypeMismatch { .. })));
    assert!(matches!(node.read::<f64>(), Err(TreeError::TypeMismatch { .. })));
}

#[test]
fn containers_are_not_scalars() {
    let mut node = Node::new();
    node.push(1).unwrap();
    assert!(matches!(node.read::<i32>(), Err(TreeError::TypeMismatch { .. })));
    assert!(matches!(node.read::<String>(), Err(TreeError::TypeMismatch { .. })));
    assert!(matches!(
        Node::new().read::<bool>(),
        Err(TreeError::TypeMismatch { .. })
    ));
}

#[test]
fn optional_reads() {
    assert_eq!(Node::new().read::<Option<i32>>().unwrap(), None);
    assert_eq!(Node::of(4).unwrap().read::<Option<i32>>().unwrap(), Some(4));
    assert!(Node::of("x").unwrap().read::<Option<i32>>().is_err());
}

#[test]
fn number_display() {
    assert_eq!(stored(&Node::of(-12i8).unwrap()).to_string(), "-12");
    assert_eq!(stored(&Node::of(1.5f32).unwrap()).to_string(), "1.5");
}

// ============================================================================
// Hand-built numbers
// ============================================================================

#[test]
fn constructors_check_the_width() {
    assert_eq!(
        Number::from_unsigned(255, Width::One).unwrap(),
        Number::PosInt {
            value: 255,
            width: Width::One
        }
    );
    assert_eq!(
        Number::from_signed(-128, Width::One).unwrap(),
        Number::NegInt {
            value: -128,
            width: Width::One
        }
    );
    assert_eq!(
        Number::from_signed(127, Width::One).unwrap(),
        Number::PosInt {
            value: 127,
            width: Width::One
        }
    );

    assert!(matches!(
        Number::from_unsigned(300, Width::One),
        Err(TreeError::InvalidCast { .. })
    ));
    assert!(matches!(
        Number::from_signed(-300, Width::One),
        Err(TreeError::InvalidCast { .. })
    ));
    assert!(matches!(
        Number::from_signed(128, Width::One),
        Err(TreeError::InvalidCast { .. })
    ));
    assert!(matches!(
        Number::from_unsigned(u64::from(u32::MAX) + 1, Width::Four),
        Err(TreeError::InvalidCast { .. })
    ));
    assert!(Number::from_unsigned(u64::MAX, Width::Eight).is_ok());
    assert!(Number::from_signed(i64::MIN, Width::Eight).is_ok());
}

#[test]
fn overflowing_variants_are_rejected_on_write() {
    let too_big = Number::PosInt {
        value: 300,
        width: Width::One,
    };
    assert!(matches!(too_big.validate(), Err(TreeError::InvalidCast { .. })));
    assert!(matches!(Node::of(too_big), Err(TreeError::InvalidCast { .. })));

    let too_small = Number::NegInt {
        value: -300,
        width: Width::One,
    };
    assert!(matches!(Node::of(too_small), Err(TreeError::InvalidCast { .. })));

    let not_negative = Number::NegInt {
        value: 3,
        width: Width::Four,
    };
    assert!(matches!(Node::of(not_negative), Err(TreeError::InvalidCast { .. })));

    let mut node = Node::of("replaced").unwrap();
    assert!(node.set(too_big).is_err());
    assert!(node.is_null());
}

#[test]
fn overflowing_variants_do_not_serialize() {
    let too_big = Number::PosInt {
        value: 300,
        width: Width::One,
    };
    assert!(serde_json::to_string(&too_big).is_err());

    let too_small = Number::NegInt {
        value: -300,
        width: Width::Two,
    };
    assert_eq!(serde_json::to_string(&too_small).unwrap(), "-300");

    let wrapped = Number::NegInt {
        value: -300,
        width: Width::One,
    };
    assert!(serde_json::to_string(&wrapped).is_err());
}

#[test]
fn serde_and_json_adapter_agree_on_checked_numbers() {
    use canopy_core::{Format, JsonFormat};

    for number in [
        Number::from_unsigned(200, Width::One).unwrap(),
        Number::from_signed(-128, Width::One).unwrap(),
        Number::from_signed(-40_000, Width::Four).unwrap(),
        Number::from_unsigned(u64::MAX, Width::Eight).unwrap(),
    ] {
        let node = Node::of(number).unwrap();
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            JsonFormat::new().save_string(&node).unwrap()
        );
    }
}
