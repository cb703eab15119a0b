//! ASN.1 tree → Protobuf schema model translation. One module member can
//! contribute zero or more messages and enums; parameterized members
//! contribute one message per concrete specialization and are never
//! emitted themselves.

use std::collections::VecDeque;

use crate::error::EmitError;
use crate::naming::{to_pascal_case, to_snake_case, SnakeCase};
use crate::printer;
use crate::proto_model::{
    ProtoEnum, ProtoEnumEntry, ProtoField, ProtoImport, ProtoMessage, ProtoModule, ProtoOneof,
};
use crate::render::{self, RuleKind};
use crate::resolve::{RangeClass, Resolve, Visibility};
use asn2proto_ast::{Constraint, IocCell, IocRow, MetaKind, Module, SyntaxKind, TypeExpr, Value};

/// Class fields whose bound value is the conventional discriminant of a
/// table row; rows keyed by one of these get a readable instance name.
const USUAL_CLASS_IDENTIFIERS: [&str; 2] = ["&id", "&procedureCode"];

pub fn build_module(module: &Module, res: &dyn Resolve) -> Result<ProtoModule, EmitError> {
    let mut out = ProtoModule::new(&module.name, &module.source_file);
    out.oid = module.oid.as_ref().map(printer::oid_to_string);
    for import in &module.imports {
        out.imports.push(ProtoImport {
            path: format!(
                "{}.proto",
                to_snake_case(&import.from_module, SnakeCase::Lower)
            ),
            oid:  import.oid.as_ref().map(printer::oid_to_string),
        });
    }
    for member in &module.members {
        build_member(module, member, res, &mut out)?;
    }
    Ok(out)
}

/// Translates one top-level member. Specialization expansion runs through
/// an explicit worklist so the no-parameterized-output invariant is
/// enforced in exactly one place.
pub fn build_member(
    module: &Module,
    member: &TypeExpr,
    res: &dyn Resolve,
    out: &mut ProtoModule,
) -> Result<(), EmitError> {
    let mut work: VecDeque<TypeExpr> = VecDeque::new();
    work.push_back(member.clone());
    while let Some(node) = work.pop_front() {
        if !node.specializations.is_empty() {
            let base = node.identifier.clone().unwrap_or_default();
            for (i, spec) in node.specializations.iter().enumerate() {
                let mut inst = spec.expr.clone();
                inst.identifier = Some(format!("{}{:03}", base, i + 1));
                inst.specializations.clear();
                work.push_back(inst);
            }
            continue;
        }
        translate(module, &node, res, out)?;
    }
    Ok(())
}

fn translate(
    module: &Module,
    expr: &TypeExpr,
    res: &dyn Resolve,
    out: &mut ProtoModule,
) -> Result<(), EmitError> {
    let name = expr.identifier.clone().unwrap_or_default();
    match (expr.meta_kind, expr.syntax_kind) {
        (_, SyntaxKind::Enumerated) => {
            out.enums.push(build_enum(module, expr));
            Ok(())
        }
        (MetaKind::Value, SyntaxKind::Integer) => match &expr.value {
            Some(Value::Integer(n)) => {
                out.messages.push(int_constant(module, expr, &name, *n));
                Ok(())
            }
            _ => unmapped(expr, &name),
        },
        (MetaKind::Value | MetaKind::Object, SyntaxKind::Reference) => {
            if expr.ioc_table.is_some() {
                extract_columns(module, expr, &name, out);
                return Ok(());
            }
            match &expr.value {
                Some(Value::Str(s)) => {
                    out.messages.push(string_constant(module, expr, &name, s));
                    Ok(())
                }
                Some(Value::Integer(n)) => {
                    out.messages.push(int_constant(module, expr, &name, *n));
                    Ok(())
                }
                _ => unmapped(expr, &name),
            }
        }
        (MetaKind::ValueSet, _) if expr.ioc_table.is_some() => {
            extract_columns(module, expr, &name, out);
            Ok(())
        }
        (MetaKind::ValueSet, SyntaxKind::Integer) => {
            out.messages.push(int_value_set(module, expr, &name));
            Ok(())
        }
        (
            _,
            SyntaxKind::Sequence
            | SyntaxKind::Set
            | SyntaxKind::SequenceOf
            | SyntaxKind::SetOf
            | SyntaxKind::Choice,
        ) => {
            let msg = build_struct(module, expr, &name, res, out)?;
            out.messages.push(msg);
            Ok(())
        }
        (_, SyntaxKind::ClassDef) => Ok(()),
        (MetaKind::Type, SyntaxKind::Integer) => {
            let mut msg = scalar_message(module, expr, &name);
            let mut field = ProtoField::new("value", "int32");
            field.rule = bounds_rule(res, &name, expr, RangeClass::Value, RuleKind::Numeric, "int32");
            msg.fields.push(field);
            out.messages.push(msg);
            Ok(())
        }
        (MetaKind::Type, SyntaxKind::Ia5String | SyntaxKind::BmpString) => {
            let mut msg = scalar_message(module, expr, &name);
            let mut field = ProtoField::new("value", "string");
            field.rule = bounds_rule(res, &name, expr, RangeClass::Size, RuleKind::Chars, "string");
            msg.fields.push(field);
            out.messages.push(msg);
            Ok(())
        }
        (MetaKind::Type, SyntaxKind::Boolean) => {
            let mut msg = scalar_message(module, expr, &name);
            msg.fields.push(ProtoField::new("value", "bool"));
            out.messages.push(msg);
            Ok(())
        }
        (MetaKind::Type | MetaKind::TypeRef, SyntaxKind::Reference) => {
            out.messages.push(type_alias(module, expr, &name, res));
            Ok(())
        }
        (MetaKind::Type, kind) if kind.keyword().is_some() => {
            tracing::debug!(identifier = %name, syntax = ?kind, "scalar kind has no mapping, dropped");
            Ok(())
        }
        _ => unmapped(expr, &name),
    }
}

fn unmapped(expr: &TypeExpr, name: &str) -> Result<(), EmitError> {
    tracing::error!(
        identifier = %name,
        meta = ?expr.meta_kind,
        syntax = ?expr.syntax_kind,
        "no protobuf mapping"
    );
    Err(EmitError::Unmapped {
        identifier: name.to_string(),
        meta:       expr.meta_kind,
        syntax:     expr.syntax_kind,
    })
}

fn source_basename(module: &Module) -> &str {
    module
        .source_file
        .rsplit('/')
        .next()
        .unwrap_or(module.source_file.as_str())
}

fn source_comment(module: &Module, expr: &TypeExpr, name: &str) -> String {
    format!("{} from {}:{}", name, source_basename(module), expr.lineno)
}

fn build_enum(module: &Module, expr: &TypeExpr) -> ProtoEnum {
    let name = expr.identifier.clone().unwrap_or_default();
    let mut pe = ProtoEnum {
        name: to_pascal_case(&name),
        ..ProtoEnum::default()
    };
    pe.comments.push(source_comment(module, expr, &name));
    for member in &expr.members {
        match member.syntax_kind {
            SyntaxKind::Extensible => pe.extensible = true,
            SyntaxKind::EnumValue => {
                let index = match &member.value {
                    Some(Value::Integer(n)) if *n >= 0 => *n as i32,
                    _ => -1,
                };
                let entry_name = member.identifier.clone().unwrap_or_default();
                pe.entries.push(ProtoEnumEntry::new(&entry_name, index));
            }
            _ => {}
        }
    }
    pe
}

fn constant_message(module: &Module, expr: &TypeExpr, name: &str) -> ProtoMessage {
    let mut msg = ProtoMessage::new(&to_pascal_case(name));
    msg.is_constant = true;
    msg.comments.push(source_comment(module, expr, name));
    msg
}

fn int_constant(module: &Module, expr: &TypeExpr, name: &str, n: i64) -> ProtoMessage {
    let mut msg = constant_message(module, expr, name);
    let mut field = ProtoField::new("value", "int32");
    field.rule = Some(format!("int32.const = {}", n));
    msg.fields.push(field);
    msg
}

fn string_constant(module: &Module, expr: &TypeExpr, name: &str, text: &str) -> ProtoMessage {
    let mut msg = constant_message(module, expr, name);
    let mut field = ProtoField::new("value", "string");
    field.rule = Some(format!("string.const = \"{}\"", text.replace('"', "\\\"")));
    msg.fields.push(field);
    msg
}

fn int_value_set(module: &Module, expr: &TypeExpr, name: &str) -> ProtoMessage {
    let mut msg = ProtoMessage::new(&to_pascal_case(name));
    msg.comments.push(source_comment(module, expr, name));
    let mut field = ProtoField::new("value", "int32");
    let mut values = Vec::new();
    if let Some(ct) = &expr.constraints {
        collect_ints(ct, &mut values);
    }
    if let Some(Value::ValueSet(ct)) = &expr.value {
        collect_ints(ct, &mut values);
    }
    if !values.is_empty() {
        let list: Vec<String> = values.iter().map(|n| n.to_string()).collect();
        field.rule = Some(format!("int32 = {{in: [{}]}}", list.join(", ")));
    }
    msg.fields.push(field);
    msg
}

fn collect_ints(ct: &Constraint, out: &mut Vec<i64>) {
    match ct {
        Constraint::Value { value: Value::Integer(n), .. } => out.push(*n),
        Constraint::Union(els)
        | Constraint::Intersection(els)
        | Constraint::CommaList(els)
        | Constraint::Set(els) => {
            for el in els {
                collect_ints(el, out);
            }
        }
        _ => {}
    }
}

fn scalar_message(module: &Module, expr: &TypeExpr, name: &str) -> ProtoMessage {
    let mut msg = ProtoMessage::new(&to_pascal_case(name));
    msg.comments.push(source_comment(module, expr, name));
    msg
}

fn bounds_rule(
    res: &dyn Resolve,
    name: &str,
    expr: &TypeExpr,
    class: RangeClass,
    kind: RuleKind,
    proto_type: &str,
) -> Option<String> {
    let info = res.constraint_range(
        name,
        expr.syntax_kind,
        expr.constraints.as_ref(),
        class,
        Visibility::All,
    )?;
    let body = render::range_rule(&info, kind)?;
    Some(format!("{} = {{{}}}", proto_type, body))
}

/// A plain type alias becomes a single-field message typed by the terminal
/// type's name. When the terminal is parameterized, the field picks the
/// matching specialization's indexed name.
fn type_alias(module: &Module, expr: &TypeExpr, name: &str, res: &dyn Resolve) -> ProtoMessage {
    let mut msg = ProtoMessage::new(&to_pascal_case(name));
    msg.comments.push(source_comment(module, expr, name));
    let base = expr
        .reference
        .as_ref()
        .and_then(|r| r.leaf())
        .unwrap_or("")
        .to_string();
    let mut type_name = base.clone();
    if !expr.rhs_pspecs.is_empty() {
        if let Some(terminal) = res.terminal_type(expr) {
            let pos = terminal
                .specializations
                .iter()
                .position(|s| s.rhs_args == expr.rhs_pspecs);
            if let Some(pos) = pos {
                type_name = format!("{}{:03}", base, pos + 1);
            }
        }
    }
    msg.fields.push(ProtoField::new("value", &type_name));
    msg
}

fn build_struct(
    module: &Module,
    expr: &TypeExpr,
    name: &str,
    res: &dyn Resolve,
    out: &mut ProtoModule,
) -> Result<ProtoMessage, EmitError> {
    let mut msg = ProtoMessage::new(&to_pascal_case(name));
    msg.comments.push(source_comment(module, expr, name));
    if let Some(params) = &expr.lhs_params {
        for p in &params.params {
            match &p.governor {
                Some(gov) => msg.params.push(format!("{}:{}", gov, p.argument)),
                None => msg.params.push(p.argument.clone()),
            }
        }
    }
    match expr.syntax_kind {
        SyntaxKind::Choice => {
            let mut oneof = ProtoOneof { name: name.to_string(), fields: Vec::new() };
            let mut scratch = Vec::new();
            process_children(module, expr, res, out, &mut msg, false, &mut scratch)?;
            oneof.fields = scratch;
            msg.oneofs.push(oneof);
        }
        SyntaxKind::SequenceOf | SyntaxKind::SetOf => {
            let mut fields = Vec::new();
            process_children(module, expr, res, out, &mut msg, true, &mut fields)?;
            msg.fields = fields;
        }
        _ => {
            let mut fields = Vec::new();
            process_children(module, expr, res, out, &mut msg, false, &mut fields)?;
            msg.fields = fields;
        }
    }
    Ok(msg)
}

/// Maps each member of a constructed type to a field, appending inline
/// definitions to the parent's nested list.
#[allow(clippy::too_many_arguments)]
fn process_children(
    module: &Module,
    parent: &TypeExpr,
    res: &dyn Resolve,
    out: &mut ProtoModule,
    msg: &mut ProtoMessage,
    repeated: bool,
    fields: &mut Vec<ProtoField>,
) -> Result<(), EmitError> {
    for member in &parent.members {
        let field_name = member.identifier.clone().unwrap_or_else(|| "value".to_string());
        match member.syntax_kind {
            SyntaxKind::Extensible => {
                let parent_name = parent.identifier.as_deref().unwrap_or("<anonymous>");
                out.comments
                    .push(format!("{} has extension marker", parent_name));
            }
            SyntaxKind::EnumValue => {}
            SyntaxKind::Boolean => {
                push_field(fields, &field_name, "bool", repeated, None);
            }
            SyntaxKind::BitString => {
                push_field(fields, &field_name, "BitString", repeated, None);
            }
            SyntaxKind::ObjectIdentifier | SyntaxKind::RelativeOid => {
                push_field(fields, &field_name, "BasicOid", repeated, None);
            }
            SyntaxKind::Integer => {
                let rule = bounds_rule(
                    res,
                    &field_name,
                    member,
                    RangeClass::Value,
                    RuleKind::Numeric,
                    "int32",
                );
                push_field(fields, &field_name, "int32", repeated, rule);
            }
            SyntaxKind::Real => {
                push_field(fields, &field_name, "float", repeated, None);
            }
            SyntaxKind::OctetString => {
                let rule = bounds_rule(
                    res,
                    &field_name,
                    member,
                    RangeClass::Size,
                    RuleKind::Bytes,
                    "bytes",
                );
                push_field(fields, &field_name, "bytes", repeated, rule);
            }
            SyntaxKind::Utf8String
            | SyntaxKind::TeletexString
            | SyntaxKind::Ia5String
            | SyntaxKind::BmpString
            | SyntaxKind::PrintableString
            | SyntaxKind::VisibleString
            | SyntaxKind::NumericString
            | SyntaxKind::GeneralString
            | SyntaxKind::GraphicString
            | SyntaxKind::UniversalString
            | SyntaxKind::Iso646String => {
                let rule = bounds_rule(
                    res,
                    &field_name,
                    member,
                    RangeClass::Size,
                    RuleKind::Chars,
                    "string",
                );
                push_field(fields, &field_name, "string", repeated, rule);
            }
            SyntaxKind::SequenceOf | SyntaxKind::SetOf => {
                // The element must be a terminal type reference; inline
                // element definitions are not expanded here.
                let element = member.members.first().and_then(|el| {
                    el.reference.as_ref().and_then(|r| r.leaf()).map(|s| s.to_string())
                });
                match element {
                    Some(type_name) => {
                        push_field(fields, &field_name, &type_name, true, None);
                    }
                    None => return Err(EmitError::BadElementType(field_name)),
                }
            }
            SyntaxKind::Reference => {
                let type_name = match cross_reference_name(member) {
                    Some(name) => name,
                    None => member
                        .reference
                        .as_ref()
                        .map(|r| r.to_string())
                        .ok_or_else(|| EmitError::UnresolvedReference(field_name.clone()))?,
                };
                push_field(fields, &field_name, &type_name, repeated, None);
            }
            SyntaxKind::Sequence | SyntaxKind::Set | SyntaxKind::Choice => {
                let nested_name = to_pascal_case(&field_name);
                let nested = build_struct(module, member, &nested_name, res, out)?;
                push_field(fields, &field_name, &nested.name, repeated, None);
                msg.nested.push(nested);
            }
            kind => {
                tracing::warn!(
                    field = %field_name,
                    syntax = ?kind,
                    "member kind has no field mapping, skipped"
                );
            }
        }
    }
    Ok(())
}

fn push_field(
    fields: &mut Vec<ProtoField>,
    name: &str,
    type_name: &str,
    repeated: bool,
    rule: Option<String>,
) {
    let mut field = ProtoField::new(name, type_name);
    field.repeated = repeated;
    field.rule = rule;
    fields.push(field);
}

/// A class-table cross-reference constraint (`{ObjectSet}{@field}`) names
/// the referenced object set; the first referenced name wins.
fn cross_reference_name(member: &TypeExpr) -> Option<String> {
    fn find(ct: &Constraint) -> Option<String> {
        match ct {
            Constraint::CrossReference(els) => els.iter().find_map(find).or_else(|| {
                els.first().and_then(|el| match el {
                    Constraint::Value { value: Value::Reference(r), .. } => {
                        r.leaf().map(|s| s.to_string())
                    }
                    _ => None,
                })
            }),
            Constraint::Value { value: Value::Reference(r), .. } => {
                r.leaf().map(|s| s.to_string())
            }
            Constraint::Set(els) | Constraint::CommaList(els) => els.iter().find_map(find),
            _ => None,
        }
    }
    match member.constraints.as_ref()? {
        ct @ (Constraint::CrossReference(_) | Constraint::Set(_)) => {
            if contains_cross_reference(ct) {
                find(ct)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn contains_cross_reference(ct: &Constraint) -> bool {
    match ct {
        Constraint::CrossReference(_) => true,
        Constraint::Set(els) | Constraint::CommaList(els) => {
            els.iter().any(contains_cross_reference)
        }
        _ => false,
    }
}

/// Flattens an Information Object table. Multi-row tables become one
/// nested message per row plus an instance field each; a single-row table
/// contributes its columns directly.
fn extract_columns(module: &Module, expr: &TypeExpr, name: &str, out: &mut ProtoModule) {
    let table = match &expr.ioc_table {
        Some(table) => table,
        None => return,
    };
    let mut msg = ProtoMessage::new(&to_pascal_case(name));
    msg.comments.push(source_comment(module, expr, name));
    if table.rows.len() > 1 {
        for (i, row) in table.rows.iter().enumerate() {
            let sub_name = format!("{}{:03}", to_pascal_case(name), i + 1);
            let mut sub = ProtoMessage::new(&sub_name);
            for cell in &row.cells {
                sub.fields.push(cell_field(cell));
            }
            let field_name = instance_name(expr, row, i);
            msg.nested.push(sub);
            msg.fields.push(ProtoField::new(&field_name, &sub_name));
        }
    } else if let Some(row) = table.rows.first() {
        for cell in &row.cells {
            msg.fields.push(cell_field(cell));
        }
    }
    if table.extensible {
        out.comments.push(format!("{} has extension marker", name));
    }
    out.messages.push(msg);
}

fn instance_name(expr: &TypeExpr, row: &IocRow, index: usize) -> String {
    for cell in &row.cells {
        if !USUAL_CLASS_IDENTIFIERS.contains(&cell.field.as_str()) {
            continue;
        }
        let bound = match &cell.value {
            Some(v) => v,
            None => continue,
        };
        let discriminant = match &bound.value {
            Some(value) => render::value_to_string(value),
            None => bound.identifier.clone().unwrap_or_default(),
        };
        let class = expr
            .reference
            .as_ref()
            .and_then(|r| r.leaf())
            .or(expr.identifier.as_deref())
            .unwrap_or("instance");
        return format!("{}{}", class, discriminant);
    }
    format!("instance{:03}", index + 1)
}

fn cell_field(cell: &IocCell) -> ProtoField {
    if let Some(bound) = &cell.value {
        match &bound.value {
            Some(Value::Integer(n)) => {
                let mut field = ProtoField::new(&cell.field, "int32");
                field.rule = Some(format!("int32.const = {}", n));
                return field;
            }
            Some(Value::Str(s)) | Some(Value::Unparsed(s)) => {
                let mut field = ProtoField::new(&cell.field, "string");
                field.rule = Some(format!("string.const = \"{}\"", s.replace('"', "\\\"")));
                return field;
            }
            Some(Value::Reference(r)) => {
                let type_name = r.leaf().unwrap_or("").to_string();
                return ProtoField::new(&cell.field, &type_name);
            }
            _ => {}
        }
        if bound.syntax_kind == SyntaxKind::Reference {
            if let Some(leaf) = bound.reference.as_ref().and_then(|r| r.leaf()) {
                return ProtoField::new(&cell.field, leaf);
            }
        }
        if let Some(id) = &bound.identifier {
            return ProtoField::new(&cell.field, id);
        }
    }
    let declared = cell.field_type.as_deref().unwrap_or("");
    let type_name = match declared {
        "INTEGER" => "int32",
        "REAL" => "float",
        other => other,
    };
    ProtoField::new(&cell.field, type_name)
}
