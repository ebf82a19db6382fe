/// Property-based tests for the numeric codec and the format adapters.
///
/// Uses `proptest` to check that:
/// - every integer and finite float reads back exactly as written
/// - integers and decimals survive JSON, YAML and BSON
/// - strings survive YAML even though YAML scalars are classified on import
/// - JSON import/export is stable after one pass
///
/// Floats fed through text formats are "simple" (an integer mantissa over a
/// power of ten) so the text form is short and parses back exactly.
use proptest::prelude::*;
use serde_json::{Map, Number as JsonNumber, Value};

use canopy_core::format::classify::parse_boolean;
use canopy_core::{BsonFormat, Format, JsonFormat, Node, YamlFormat};

// ============================================================================
// Strategies
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z_][a-zA-Z0-9_-]{0,15}").unwrap()
}

/// Strings YAML must hand back as strings: not numeric and not a boolean spelling.
fn arb_word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9 _-]{0,15}")
        .unwrap()
        .prop_filter("must not read back as another kind", |s| {
            parse_boolean(s).is_none() && !matches!(s.as_str(), "null" | "Null" | "NULL")
        })
}

fn arb_simple_float() -> impl Strategy<Value = f64> {
    (-100_000_000i64..100_000_000i64, 1u32..5u32)
        .prop_map(|(mantissa, decimals)| mantissa as f64 / 10f64.powi(decimals as i32))
}

fn arb_json_primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 :,.\\-]{0,20}".prop_map(Value::String),
        any::<i64>().prop_map(|n| Value::Number(JsonNumber::from(n))),
        any::<u64>().prop_map(|n| Value::Number(JsonNumber::from(n))),
        arb_simple_float().prop_filter_map("finite", |f| JsonNumber::from_f64(f).map(Value::Number)),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
    ]
}

fn arb_json_value(depth: u32) -> BoxedStrategy<Value> {
    if depth == 0 {
        return arb_json_primitive().boxed();
    }
    prop_oneof![
        4 => arb_json_primitive(),
        2 => prop::collection::vec((arb_key(), arb_json_value(depth - 1)), 0..5).prop_map(|pairs| {
            let mut map = Map::new();
            for (k, v) in pairs {
                map.insert(k, v);
            }
            Value::Object(map)
        }),
        2 => prop::collection::vec(arb_json_value(depth - 1), 0..5).prop_map(Value::Array),
    ]
    .boxed()
}

fn finite_f64() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

fn finite_f32() -> impl Strategy<Value = f32> {
    any::<f32>().prop_filter("finite", |v| v.is_finite())
}

/// `{"v": value}`, since BSON needs a mapping at the root.
fn wrap<V: canopy_core::ToNode>(value: V) -> Node {
    let mut node = Node::new();
    node.entry("v").unwrap().set(value).unwrap();
    node
}

// ============================================================================
// Codec properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn signed_integers_read_back(v in any::<i64>()) {
        prop_assert_eq!(Node::of(v).unwrap().read::<i64>().unwrap(), v);
    }

    #[test]
    fn unsigned_integers_read_back(v in any::<u64>()) {
        prop_assert_eq!(Node::of(v).unwrap().read::<u64>().unwrap(), v);
    }

    #[test]
    fn small_integers_keep_width(v in any::<i16>()) {
        let node = Node::of(v).unwrap();
        prop_assert_eq!(node.width().unwrap(), 2);
        prop_assert_eq!(node.is_negative(), v < 0);
        prop_assert_eq!(node.read::<i16>().unwrap(), v);
    }

    #[test]
    fn doubles_read_back(v in finite_f64()) {
        let node = Node::of(v).unwrap();
        if v.fract() != 0.0 {
            prop_assert!(node.has_decimal());
        }
        prop_assert_eq!(node.read::<f64>().unwrap(), v);
    }

    #[test]
    fn singles_read_back(v in finite_f32()) {
        prop_assert_eq!(Node::of(v).unwrap().read::<f32>().unwrap(), v);
    }

    #[test]
    fn integral_floats_read_as_integers(v in -1_000_000i32..1_000_000i32) {
        let node = Node::of(v as f64).unwrap();
        prop_assert!(!node.has_decimal());
        prop_assert_eq!(node.width().unwrap(), 4);
        prop_assert_eq!(node.read::<i32>().unwrap(), v);
    }
}

// ============================================================================
// Adapter properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn integers_survive_json(v in any::<i64>(), u in any::<u64>()) {
        let json = JsonFormat::new();
        let back = json.load_str(&json.save_string(&wrap(v)).unwrap()).unwrap();
        prop_assert_eq!(back["v"].read::<i64>().unwrap(), v);
        let back = json.load_str(&json.save_string(&wrap(u)).unwrap()).unwrap();
        prop_assert_eq!(back["v"].read::<u64>().unwrap(), u);
    }

    #[test]
    fn integers_survive_yaml(v in any::<i64>(), u in any::<u64>()) {
        let back = YamlFormat.load_str(&YamlFormat.save_string(&wrap(v)).unwrap()).unwrap();
        prop_assert_eq!(back["v"].read::<i64>().unwrap(), v);
        let back = YamlFormat.load_str(&YamlFormat.save_string(&wrap(u)).unwrap()).unwrap();
        prop_assert_eq!(back["v"].read::<u64>().unwrap(), u);
    }

    #[test]
    fn signed_integers_survive_bson(v in any::<i64>()) {
        let back = BsonFormat.load_bytes(&BsonFormat.save_bytes(&wrap(v)).unwrap()).unwrap();
        prop_assert_eq!(back["v"].read::<i64>().unwrap(), v);
    }

    #[test]
    fn decimals_survive_every_format(v in arb_simple_float()) {
        let node = wrap(v);
        let json = JsonFormat::new();
        let from_json = json.load_str(&json.save_string(&node).unwrap()).unwrap();
        let from_yaml = YamlFormat.load_str(&YamlFormat.save_string(&node).unwrap()).unwrap();
        let from_bson = BsonFormat.load_bytes(&BsonFormat.save_bytes(&node).unwrap()).unwrap();
        prop_assert_eq!(from_json["v"].read::<f64>().unwrap(), v);
        prop_assert_eq!(from_yaml["v"].read::<f64>().unwrap(), v);
        prop_assert_eq!(from_bson["v"].read::<f64>().unwrap(), v);
    }

    #[test]
    fn singles_survive_bson(v in finite_f32().prop_filter("fits i64", |v| v.abs() < 1e18)) {
        let back = BsonFormat.load_bytes(&BsonFormat.save_bytes(&wrap(v)).unwrap()).unwrap();
        prop_assert_eq!(back["v"].read::<f32>().unwrap(), v);
    }

    #[test]
    fn words_survive_yaml(words in prop::collection::vec(arb_word(), 1..6)) {
        let mut node = Node::new();
        for word in &words {
            node.push(word).unwrap();
        }
        let back = YamlFormat.load_str(&YamlFormat.save_string(&node).unwrap()).unwrap();
        let read: Vec<String> = back.iter().map(|n| n.read().unwrap()).collect();
        prop_assert_eq!(read, words);
    }

    #[test]
    fn json_reexport_is_stable(value in arb_json_value(3)) {
        let json = JsonFormat::new();
        let text = serde_json::to_string(&value).unwrap();
        let first = json.save_string(&json.load_str(&text).unwrap()).unwrap();
        let second = json.save_string(&json.load_str(&first).unwrap()).unwrap();
        prop_assert_eq!(&first, &second, "input: {}", text);
    }

    #[test]
    fn json_without_decimals_is_unchanged(value in arb_json_value(3)) {
        fn has_decimal(v: &Value) -> bool {
            match v {
                Value::Number(n) => n.is_f64(),
                Value::Array(items) => items.iter().any(has_decimal),
                Value::Object(map) => map.values().any(has_decimal),
                _ => false,
            }
        }
        prop_assume!(!has_decimal(&value));
        let json = JsonFormat::new();
        let node = json.load_str(&serde_json::to_string(&value).unwrap()).unwrap();
        let back: Value = serde_json::from_str(&json.save_string(&node).unwrap()).unwrap();
        prop_assert_eq!(back, value);
    }
}
