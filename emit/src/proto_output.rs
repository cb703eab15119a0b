//! Serializes a finished `ProtoModule` to Protobuf3 text: banner comments,
//! package/go_package derivation from the source path, imports, enums with
//! a synthesized zero entry, and messages with validation-rule annotations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::naming::{to_pascal_case, to_snake_case, SnakeCase};
use crate::proto_model::{ProtoEnum, ProtoMessage, ProtoModule};

lazy_static! {
    static ref STARTS_LOWER: Regex = Regex::new("^[a-z]").unwrap();
    static ref LEADING_REL: Regex = Regex::new(r"^(?:\.\./)+").unwrap();
}

const PROTO_SCALAR_TYPES: [&str; 15] = [
    "double", "float", "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32",
    "fixed64", "sfixed32", "sfixed64", "bool", "string", "bytes",
];

/// Strips leading `../` runs and the same number of following path
/// segments, so a build-relative path yields a stable package root.
fn remove_rel_path(path: &str) -> String {
    let rest = LEADING_REL.replace(path, "");
    let hops = (path.len() - rest.len()) / 3;
    let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty() && *s != ".").collect();
    let drop = hops.min(segments.len().saturating_sub(1));
    segments.drain(0..drop);
    segments.join("/")
}

/// Derives the proto package from the module's source path: one package
/// segment per path segment, each snake-cased, `pkg`-prefixed when the
/// result does not start with a lowercase letter.
pub fn derive_package(source_file: &str) -> String {
    let stripped = remove_rel_path(source_file);
    let mut segments: Vec<String> = stripped
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect();
    // The file extension goes before case normalization turns dots into
    // underscores.
    if let Some(last) = segments.last_mut() {
        if let Some(dot) = last.rfind('.') {
            last.truncate(dot);
        }
    }
    let mut pkg = segments
        .iter()
        .map(|seg| to_snake_case(seg, SnakeCase::Lower))
        .collect::<Vec<_>>()
        .join(".");
    if !STARTS_LOWER.is_match(&pkg) {
        pkg = format!("pkg{}", pkg);
    }
    pkg
}

pub fn emit_module(module: &ProtoModule) -> String {
    let mut out = String::new();
    for comment in &module.comments {
        out.push_str(&format!("// {}\n", comment));
    }
    let file_stem = to_snake_case(&module.name, SnakeCase::Lower);
    out.push_str(&format!(
        "////////////////////// {}.proto //////////////////////\n",
        file_stem
    ));
    let basename = module
        .source_file
        .rsplit('/')
        .next()
        .unwrap_or(module.source_file.as_str());
    out.push_str(&format!("// Protobuf generated from /{} by asn2proto\n", basename));
    match &module.oid {
        Some(oid) => out.push_str(&format!("// {} {}\n", module.name, oid)),
        None => out.push_str(&format!("// {}\n", module.name)),
    }
    out.push_str("\nsyntax = \"proto3\";\n\n");

    let pkg = derive_package(&module.source_file);
    let pkg_path = pkg.replace('.', "/");
    out.push_str(&format!("package {}.v1;\n", pkg));
    out.push_str(&format!("option go_package = \"{}/v1/{}\";\n\n", pkg_path, file_stem));

    // Imported modules live under the same package root as this one.
    for import in &module.imports {
        out.push_str(&format!("import \"{}/v1/{}\";", pkg_path, import.path));
        if let Some(oid) = &import.oid {
            out.push_str(&format!(" // {}", oid));
        }
        out.push('\n');
    }
    out.push_str("import \"validate/v1/validate.proto\";\n\n");

    for pe in &module.enums {
        emit_enum(&mut out, pe);
    }
    for msg in &module.messages {
        emit_message(&mut out, msg, 0);
    }
    out
}

fn emit_enum(out: &mut String, pe: &ProtoEnum) {
    for comment in &pe.comments {
        out.push_str(&format!("// {}\n", comment));
    }
    let prefix = to_snake_case(&pe.name, SnakeCase::Upper);
    out.push_str(&format!("enum {} {{\n", to_pascal_case(&pe.name)));

    let mut used: Vec<i32> = pe
        .entries
        .iter()
        .filter(|e| e.index >= 0)
        .map(|e| e.index)
        .collect();
    if !used.contains(&0) {
        out.push_str(&format!("    {}_UNDEFINED = 0; // auto generated\n", prefix));
        used.push(0);
    }
    let mut next = 0;
    for entry in &pe.entries {
        let index = if entry.index >= 0 {
            entry.index
        } else {
            while used.contains(&next) {
                next += 1;
            }
            used.push(next);
            next
        };
        out.push_str(&format!(
            "    {}_{} = {};",
            prefix,
            to_snake_case(&entry.name, SnakeCase::Upper),
            index
        ));
        if let Some(comment) = &entry.comment {
            out.push_str(&format!(" // {}", comment));
        }
        out.push('\n');
    }
    if pe.extensible {
        out.push_str("    // Extensible\n");
    }
    out.push_str("};\n\n");
}

fn field_type_text(type_name: &str) -> String {
    if PROTO_SCALAR_TYPES.contains(&type_name) {
        type_name.to_string()
    } else {
        to_pascal_case(type_name)
    }
}

fn emit_field(
    out: &mut String,
    field: &crate::proto_model::ProtoField,
    number: u32,
    indent: &str,
) {
    out.push_str(indent);
    if field.repeated {
        out.push_str("repeated ");
    }
    out.push_str(&field_type_text(&field.type_name));
    out.push(' ');
    out.push_str(&to_snake_case(&field.name, SnakeCase::Lower));
    out.push_str(&format!(" = {}", number));
    if let Some(rule) = &field.rule {
        out.push_str(&format!(" [(validate.v1.rules).{}]", rule));
    }
    out.push(';');
    if let Some(comment) = &field.comment {
        out.push_str(&format!(" // {}", comment));
    }
    out.push('\n');
}

fn emit_message(out: &mut String, msg: &ProtoMessage, level: usize) {
    let indent = "    ".repeat(level);
    for comment in &msg.comments {
        out.push_str(&format!("{}// {}\n", indent, comment));
    }
    for param in &msg.params {
        out.push_str(&format!("{}// param: {}\n", indent, param));
    }
    out.push_str(&format!("{}message {} {{\n", indent, to_pascal_case(&msg.name)));

    // Locally defined types come first so fields can refer to them.
    for nested in &msg.nested {
        emit_message(out, nested, level + 1);
    }

    let field_indent = format!("{}    ", indent);
    for (i, field) in msg.fields.iter().enumerate() {
        emit_field(out, field, (i + 1) as u32, &field_indent);
    }
    for oneof in &msg.oneofs {
        out.push_str(&format!(
            "{}oneof {} {{\n",
            field_indent,
            to_snake_case(&oneof.name, SnakeCase::Lower)
        ));
        let oneof_indent = format!("{}    ", field_indent);
        for (i, field) in oneof.fields.iter().enumerate() {
            emit_field(out, field, (i + 1) as u32, &oneof_indent);
        }
        out.push_str(&format!("{}}}\n", field_indent));
    }
    out.push_str(&format!("{}}};\n\n", indent));
}
