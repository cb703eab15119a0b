#![cfg(test)]

use asn2proto::render::{constraint_to_string, range_rule, value_to_string, RuleKind};
use asn2proto::resolve::{ModuleResolver, RangeClass, Resolve, Visibility};
use asn2proto::Flags;
use asn2proto_ast::{Asn, Constraint, SyntaxKind, Value};

#[test]
fn test_range_separators() {
    let closed = Constraint::range(Value::Integer(1), Value::Integer(10));
    assert_eq!(constraint_to_string(&closed), "1..10");

    let lo_open = Constraint::Range {
        start:   Value::Integer(1),
        stop:    Some(Value::Integer(10)),
        lo_open: true,
        hi_open: false,
    };
    assert_eq!(constraint_to_string(&lo_open), "1<..10");

    let both_open = Constraint::Range {
        start:   Value::Min,
        stop:    Some(Value::Max),
        lo_open: true,
        hi_open: true,
    };
    assert_eq!(constraint_to_string(&both_open), "MIN<..<MAX");
}

#[test]
fn test_set_operators() {
    let union = Constraint::Union(vec![
        Constraint::single(Value::Integer(1)),
        Constraint::single(Value::Integer(2)),
    ]);
    assert_eq!(constraint_to_string(&union), "1 | 2");

    let intersection = Constraint::Intersection(vec![
        Constraint::single(Value::Integer(1)),
        Constraint::single(Value::Integer(2)),
    ]);
    assert_eq!(constraint_to_string(&intersection), "1 ^ 2");

    // Each set element gets its own parentheses
    let set = Constraint::Set(vec![
        Constraint::range(Value::Integer(0), Value::Integer(7)),
        Constraint::Size(Box::new(Constraint::range(
            Value::Integer(1),
            Value::Integer(4),
        ))),
    ]);
    assert_eq!(constraint_to_string(&set), "(0..7) (SIZE(1..4))");

    let all_except = Constraint::AllExcept(Box::new(Constraint::single(Value::Integer(5))));
    assert_eq!(constraint_to_string(&all_except), "ALL EXCEPT 5");
}

#[test]
fn test_string_quote_doubling() {
    let v = Value::string("He said \"hi\"");
    assert_eq!(value_to_string(&v), "\"He said \"\"hi\"\"\"");

    let plain = Value::string("plain");
    assert_eq!(value_to_string(&plain), "\"plain\"");
}

#[test]
fn test_bit_vectors() {
    // 12 bits is not a whole number of octets: binary form
    let bits = Value::Bits { data: vec![0xAB, 0xC0], len: 12 };
    assert_eq!(value_to_string(&bits), "'101010111100'B");

    // 16 bits: hex form
    let octets = Value::Bits { data: vec![0xAB, 0xCD], len: 16 };
    assert_eq!(value_to_string(&octets), "'ABCD'H");
}

#[test]
fn test_tuple_and_quadruple() {
    assert_eq!(value_to_string(&Value::Tuple(0x4A)), "{4, 10}");
    assert_eq!(value_to_string(&Value::Quadruple(0x01020304)), "{1, 2, 3, 4}");
}

#[test]
fn test_validation_rule_bounds() {
    let asn = Asn::default();
    let res = ModuleResolver::new(&asn);
    let ct = Constraint::range(Value::Integer(1), Value::Integer(10));
    let info = res
        .constraint_range("t", SyntaxKind::Integer, Some(&ct), RangeClass::Value, Visibility::All)
        .expect("constraint_range failed");
    assert_eq!(range_rule(&info, RuleKind::Numeric).as_deref(), Some("gte: 1, lte: 10"));
    assert_eq!(
        range_rule(&info, RuleKind::Chars).as_deref(),
        Some("min_len: 1, max_len: 10")
    );

    // MIN/MAX edges contribute no key
    let unbounded = Constraint::range(Value::Min, Value::Integer(10));
    let info = res
        .constraint_range(
            "t",
            SyntaxKind::Integer,
            Some(&unbounded),
            RangeClass::Value,
            Visibility::All,
        )
        .expect("constraint_range failed");
    assert_eq!(range_rule(&info, RuleKind::Numeric).as_deref(), Some("lte: 10"));
}

#[test]
fn test_rule_kind_from_flags() {
    assert_eq!(RuleKind::from_flags(Flags::STRING_VALUE), RuleKind::Chars);
    assert_eq!(RuleKind::from_flags(Flags::BYTES_VALUE), RuleKind::Bytes);
    assert_eq!(RuleKind::from_flags(Flags::INT32_VALUE), RuleKind::Numeric);
    assert_eq!(RuleKind::from_flags(Flags::NONE), RuleKind::Numeric);
}

#[test]
fn test_size_constraint_range() {
    let asn = Asn::default();
    let res = ModuleResolver::new(&asn);
    let ct = Constraint::Size(Box::new(Constraint::range(
        Value::Integer(1),
        Value::Integer(32),
    )));
    let info = res
        .constraint_range("t", SyntaxKind::OctetString, Some(&ct), RangeClass::Size, Visibility::All)
        .expect("constraint_range failed");
    assert_eq!(
        range_rule(&info, RuleKind::Bytes).as_deref(),
        Some("min_bytes: 1, max_bytes: 32")
    );
    // The same SIZE subtree is invisible to a value-range query
    assert!(res
        .constraint_range("t", SyntaxKind::OctetString, Some(&ct), RangeClass::Value, Visibility::All)
        .is_none());
}

#[test]
fn test_with_components_presence() {
    use asn2proto_ast::{ComponentConstraint, Presence};
    let ct = Constraint::WithComponents(vec![
        ComponentConstraint {
            constraint: Constraint::single(Value::reference("alpha")),
            presence:   Presence::Present,
        },
        ComponentConstraint {
            constraint: Constraint::single(Value::reference("beta")),
            presence:   Presence::Absent,
        },
    ]);
    assert_eq!(
        constraint_to_string(&ct),
        "WITH COMPONENTS { alpha PRESENT, beta ABSENT }"
    );
}
