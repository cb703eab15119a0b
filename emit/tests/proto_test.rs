#![cfg(test)]

use asn2proto::proto_builder::build_module;
use asn2proto::proto_dedup::dedup_nested;
use asn2proto::proto_model::{ProtoField, ProtoMessage, ProtoModule};
use asn2proto::proto_output::{derive_package, emit_module};
use asn2proto::{print_asn, EmitError, Flags, ModuleResolver};
use asn2proto_ast::{
    Asn, Constraint, Import, IocCell, IocRow, IocTable, MetaKind, Module, Ref, Specialization,
    SyntaxKind, TypeExpr, Value,
};

fn resolver(asn: &Asn) -> ModuleResolver<'_> {
    ModuleResolver::new(asn)
}

fn single_module(member: TypeExpr) -> Asn {
    let mut module = Module::new("Test-Module", "test-module.asn1");
    module.members.push(member);
    Asn::new(vec![module])
}

#[test]
fn test_sequence_to_message() {
    let mut foo = TypeExpr::named("Foo", MetaKind::Type, SyntaxKind::Sequence);
    foo.members.push(TypeExpr::named("a", MetaKind::Type, SyntaxKind::Integer));
    foo.members.push(TypeExpr::named("b", MetaKind::Type, SyntaxKind::Boolean));
    let asn = single_module(foo);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    assert_eq!(schema.messages.len(), 1);
    let msg = &schema.messages[0];
    assert_eq!(msg.name, "Foo");
    assert_eq!(msg.fields.len(), 2);
    assert_eq!(msg.fields[0].type_name, "int32");
    assert_eq!(msg.fields[1].type_name, "bool");

    let text = emit_module(&schema);
    assert!(text.contains("message Foo {\n    int32 a = 1;\n    bool b = 2;\n};\n"));
}

#[test]
fn test_choice_to_oneof() {
    let mut bar = TypeExpr::named("Bar", MetaKind::Type, SyntaxKind::Choice);
    bar.members.push(TypeExpr::named("x", MetaKind::Type, SyntaxKind::Integer));
    bar.members.push(TypeExpr::named("y", MetaKind::Type, SyntaxKind::Boolean));
    let asn = single_module(bar);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let msg = &schema.messages[0];
    assert!(msg.fields.is_empty());
    assert_eq!(msg.oneofs.len(), 1);
    assert_eq!(msg.oneofs[0].fields.len(), 2);

    // oneof members are numbered independently from 1
    let text = emit_module(&schema);
    assert!(text.contains("oneof bar {\n        int32 x = 1;\n        bool y = 2;\n    }\n"));
}

#[test]
fn test_enum_zero_synthesis() {
    let mut color = TypeExpr::named("Color", MetaKind::Type, SyntaxKind::Enumerated);
    let mut red = TypeExpr::named("red", MetaKind::Value, SyntaxKind::EnumValue);
    red.value = Some(Value::Integer(1));
    // no explicit index: assigned at emission time
    let green = TypeExpr::named("green", MetaKind::Value, SyntaxKind::EnumValue);
    color.members.push(red);
    color.members.push(green);
    let asn = single_module(color);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    assert_eq!(schema.enums.len(), 1);
    assert_eq!(schema.enums[0].entries[0].index, 1);
    assert_eq!(schema.enums[0].entries[1].index, -1);

    let text = emit_module(&schema);
    assert!(text.contains("enum Color {\n"));
    assert!(text.contains("    COLOR_UNDEFINED = 0; // auto generated\n"));
    assert!(text.contains("    COLOR_RED = 1;\n"));
    // index 0 is taken by the synthetic entry, so the unindexed member
    // gets 2, never a second 0
    assert!(text.contains("    COLOR_GREEN = 2;\n"));
}

#[test]
fn test_enum_with_explicit_zero_gets_no_synthetic_entry() {
    let mut state = TypeExpr::named("State", MetaKind::Type, SyntaxKind::Enumerated);
    let mut idle = TypeExpr::named("idle", MetaKind::Value, SyntaxKind::EnumValue);
    idle.value = Some(Value::Integer(0));
    state.members.push(idle);
    let asn = single_module(state);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let text = emit_module(&schema);
    assert!(!text.contains("_UNDEFINED"));
    assert!(text.contains("    STATE_IDLE = 0;\n"));
}

#[test]
fn test_integer_constant() {
    let mut answer = TypeExpr::named("answer", MetaKind::Value, SyntaxKind::Integer);
    answer.value = Some(Value::Integer(42));
    let asn = single_module(answer);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let msg = &schema.messages[0];
    assert!(msg.is_constant);
    assert_eq!(msg.fields[0].rule.as_deref(), Some("int32.const = 42"));

    let text = emit_module(&schema);
    assert!(text.contains("    int32 value = 1 [(validate.v1.rules).int32.const = 42];\n"));
}

#[test]
fn test_string_constant_escaping() {
    let mut greeting = TypeExpr::named("greeting", MetaKind::Value, SyntaxKind::Reference);
    greeting.reference = Some(Ref::new("PrintableString"));
    greeting.value = Some(Value::string("say \"hi\""));
    let asn = single_module(greeting);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    assert_eq!(
        schema.messages[0].fields[0].rule.as_deref(),
        Some("string.const = \"say \\\"hi\\\"\"")
    );
}

#[test]
fn test_integer_range_rule() {
    let mut age = TypeExpr::named("Age", MetaKind::Type, SyntaxKind::Integer);
    age.constraints = Some(Constraint::range(Value::Integer(1), Value::Integer(10)));
    let asn = single_module(age);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    assert_eq!(
        schema.messages[0].fields[0].rule.as_deref(),
        Some("int32 = {gte: 1, lte: 10}")
    );

    let text = emit_module(&schema);
    assert!(text.contains("[(validate.v1.rules).int32 = {gte: 1, lte: 10}]"));
}

#[test]
fn test_integer_value_set() {
    let mut vals = TypeExpr::named("Allowed", MetaKind::ValueSet, SyntaxKind::Integer);
    vals.constraints = Some(Constraint::Union(vec![
        Constraint::single(Value::Integer(1)),
        Constraint::single(Value::Integer(2)),
        Constraint::single(Value::Integer(8)),
    ]));
    let asn = single_module(vals);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    assert_eq!(
        schema.messages[0].fields[0].rule.as_deref(),
        Some("int32 = {in: [1, 2, 8]}")
    );
}

#[test]
fn test_nested_sequence_of_field() {
    let mut parent = TypeExpr::named("Container", MetaKind::Type, SyntaxKind::Sequence);
    let mut items = TypeExpr::named("items", MetaKind::Type, SyntaxKind::SequenceOf);
    let mut element = TypeExpr::new(MetaKind::Type, SyntaxKind::Reference);
    element.reference = Some(Ref::new("Item"));
    items.members.push(element);
    parent.members.push(items);
    let asn = single_module(parent);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let field = &schema.messages[0].fields[0];
    assert!(field.repeated);
    assert_eq!(field.type_name, "Item");

    let text = emit_module(&schema);
    assert!(text.contains("    repeated Item items = 1;\n"));
}

#[test]
fn test_sequence_of_without_reference_element_fails() {
    let mut parent = TypeExpr::named("Container", MetaKind::Type, SyntaxKind::Sequence);
    let mut items = TypeExpr::named("items", MetaKind::Type, SyntaxKind::SequenceOf);
    items.members.push(TypeExpr::new(MetaKind::Type, SyntaxKind::Integer));
    parent.members.push(items);
    let asn = single_module(parent);
    let res = resolver(&asn);

    match build_module(&asn.modules[0], &res) {
        Err(EmitError::BadElementType(name)) => assert_eq!(name, "items"),
        other => panic!("expected BadElementType, got {:?}", other.map(|m| m.name)),
    }
}

#[test]
fn test_unmapped_member_fails() {
    let odd = TypeExpr::named("W", MetaKind::ObjectField, SyntaxKind::Parameter);
    let asn = single_module(odd);
    let res = resolver(&asn);

    match build_module(&asn.modules[0], &res) {
        Err(EmitError::Unmapped { identifier, .. }) => assert_eq!(identifier, "W"),
        other => panic!("expected Unmapped, got {:?}", other.map(|m| m.name)),
    }
}

#[test]
fn test_specialization_expansion() {
    let mut proto_ie = TypeExpr::named("ProtocolIE", MetaKind::Type, SyntaxKind::Sequence);
    proto_ie.members.push(TypeExpr::named("id", MetaKind::Type, SyntaxKind::Integer));

    let mut parameterized = TypeExpr::named("Wrapper", MetaKind::Type, SyntaxKind::Sequence);
    parameterized.specializations.push(Specialization {
        rhs_args: vec![TypeExpr::new(MetaKind::Type, SyntaxKind::Integer)],
        expr:     proto_ie.clone(),
    });
    parameterized.specializations.push(Specialization {
        rhs_args: vec![TypeExpr::new(MetaKind::Type, SyntaxKind::Boolean)],
        expr:     proto_ie,
    });
    let asn = single_module(parameterized);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    // never the parameterized node itself, one message per instantiation
    let names: Vec<&str> = schema.messages.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["Wrapper001", "Wrapper002"]);
}

#[test]
fn test_column_extractor_multi_row() {
    let mut ies = TypeExpr::named("ProtocolIEs", MetaKind::Value, SyntaxKind::Reference);
    ies.reference = Some(Ref::new("PROC-CLASS"));
    let mut id_value = TypeExpr::new(MetaKind::Value, SyntaxKind::Integer);
    id_value.value = Some(Value::Integer(7));
    let mut id_value2 = TypeExpr::new(MetaKind::Value, SyntaxKind::Integer);
    id_value2.value = Some(Value::Integer(9));
    ies.ioc_table = Some(IocTable {
        rows:       vec![
            IocRow {
                cells: vec![
                    IocCell {
                        field:      "&id".to_string(),
                        field_type: Some("INTEGER".to_string()),
                        value:      Some(id_value),
                    },
                    IocCell {
                        field:      "&Payload".to_string(),
                        field_type: Some("Payload".to_string()),
                        value:      None,
                    },
                ],
            },
            IocRow {
                cells: vec![
                    IocCell {
                        field:      "&id".to_string(),
                        field_type: Some("INTEGER".to_string()),
                        value:      Some(id_value2),
                    },
                    IocCell {
                        field:      "&Payload".to_string(),
                        field_type: Some("Payload".to_string()),
                        value:      None,
                    },
                ],
            },
        ],
        extensible: false,
    });
    let asn = single_module(ies);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let msg = &schema.messages[0];
    assert_eq!(msg.nested.len(), 2);
    assert_eq!(msg.nested[0].name, "ProtocolIes001");
    assert_eq!(msg.nested[1].name, "ProtocolIes002");
    // the &id discriminant names the instance fields
    assert_eq!(msg.fields[0].name, "PROC-CLASS7");
    assert_eq!(msg.fields[1].name, "PROC-CLASS9");
    assert_eq!(msg.nested[0].fields[0].rule.as_deref(), Some("int32.const = 7"));
    assert_eq!(msg.nested[0].fields[1].type_name, "Payload");
}

#[test]
fn test_column_extractor_single_row_inlines() {
    let mut obj = TypeExpr::named("TheObject", MetaKind::Value, SyntaxKind::Reference);
    obj.reference = Some(Ref::new("A-CLASS"));
    let mut id_value = TypeExpr::new(MetaKind::Value, SyntaxKind::Integer);
    id_value.value = Some(Value::Integer(3));
    obj.ioc_table = Some(IocTable {
        rows:       vec![IocRow {
            cells: vec![IocCell {
                field:      "&id".to_string(),
                field_type: Some("INTEGER".to_string()),
                value:      Some(id_value),
            }],
        }],
        extensible: false,
    });
    let asn = single_module(obj);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let msg = &schema.messages[0];
    assert!(msg.nested.is_empty());
    assert_eq!(msg.fields[0].rule.as_deref(), Some("int32.const = 3"));
}

#[test]
fn test_dedup_nested_messages() {
    let mut schema = ProtoModule::new("M", "m.asn1");
    let mut item = ProtoMessage::new("Item");
    item.fields.push(ProtoField::new("id", "int32"));
    schema.messages.push(item);

    let mut boxed = ProtoMessage::new("Box");
    let mut nested = ProtoMessage::new("BoxItem");
    nested.fields.push(ProtoField::new("id", "int32"));
    boxed.nested.push(nested);
    boxed.fields.push(ProtoField::new("content", "BoxItem"));
    schema.messages.push(boxed);

    dedup_nested(&mut schema);
    let boxed = &schema.messages[1];
    assert!(boxed.nested.is_empty());
    // the referencing entry becomes a direct reference: type and name
    assert_eq!(boxed.fields[0].type_name, "Item");
    assert_eq!(boxed.fields[0].name, "Item");

    let text = emit_module(&schema);
    assert!(text.contains("message Box {\n    Item item = 1;\n};\n"));
}

#[test]
fn test_dedup_keeps_unique_nested() {
    let mut schema = ProtoModule::new("M", "m.asn1");
    let mut boxed = ProtoMessage::new("Box");
    let mut nested = ProtoMessage::new("BoxItem");
    nested.fields.push(ProtoField::new("weight", "int32"));
    boxed.nested.push(nested);
    boxed.fields.push(ProtoField::new("content", "BoxItem"));
    schema.messages.push(boxed);

    dedup_nested(&mut schema);
    assert_eq!(schema.messages[0].nested.len(), 1);
    assert_eq!(schema.messages[0].fields[0].type_name, "BoxItem");
}

#[test]
fn test_package_derivation() {
    assert_eq!(derive_package("test-module.asn1"), "test_module");
    assert_eq!(derive_package("api/sm-policy.asn1"), "api.sm_policy");
    // relative hops drop the same number of leading segments
    assert_eq!(derive_package("../../mod/3GPP-TS.asn1"), "pkg3_gpp_ts");
}

#[test]
fn test_emitted_header() {
    let foo = TypeExpr::named("Foo", MetaKind::Type, SyntaxKind::Sequence);
    let asn = single_module(foo);
    let res = resolver(&asn);
    let text = print_asn(&asn, &res, Flags::PRINT_PROTOBUF).expect("print_asn failed");

    assert!(text.contains("////////////////////// test_module.proto //////////////////////\n"));
    assert!(text.contains("// Protobuf generated from /test-module.asn1 by asn2proto\n"));
    assert!(text.contains("\nsyntax = \"proto3\";\n"));
    assert!(text.contains("package test_module.v1;\n"));
    assert!(text.contains("option go_package = \"test_module/v1/test_module\";\n"));
    assert!(text.contains("import \"validate/v1/validate.proto\";\n"));
}

#[test]
fn test_import_lines_carry_package_prefix() {
    let mut module = Module::new("Test-Module", "api/test-module.asn1");
    module.imports.push(Import { from_module: "Other-Module".to_string(), oid: None });
    module.members.push(TypeExpr::named("Foo", MetaKind::Type, SyntaxKind::Sequence));
    let asn = Asn::new(vec![module]);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    let text = emit_module(&schema);
    // imported modules share this module's package root
    assert!(text.contains("import \"api/test_module/v1/other_module.proto\";\n"));
}

#[test]
fn test_extensible_enum_note() {
    let mut color = TypeExpr::named("Color", MetaKind::Type, SyntaxKind::Enumerated);
    let mut red = TypeExpr::named("red", MetaKind::Value, SyntaxKind::EnumValue);
    red.value = Some(Value::Integer(0));
    color.members.push(red);
    color.members.push(TypeExpr::extension_marker());
    let asn = single_module(color);
    let res = resolver(&asn);

    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");
    assert!(schema.enums[0].extensible);

    let text = emit_module(&schema);
    assert!(text.contains("    COLOR_RED = 0;\n    // Extensible\n};\n"));
}

#[test]
fn test_serializable_model() {
    let mut foo = TypeExpr::named("Foo", MetaKind::Type, SyntaxKind::Sequence);
    foo.members.push(TypeExpr::named("a", MetaKind::Type, SyntaxKind::Integer));
    let asn = single_module(foo);
    let res = resolver(&asn);
    let schema = build_module(&asn.modules[0], &res).expect("build_module failed");

    let json = serde_json::to_value(&schema).expect("serialize failed");
    assert_eq!(json["messages"][0]["name"], "Foo");
    assert_eq!(json["messages"][0]["fields"][0]["type_name"], "int32");
}
