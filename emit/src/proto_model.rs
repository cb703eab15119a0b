//! Intermediate Protobuf schema model. Built from the ASN.1 tree, then
//! deduplicated and finally serialized to `.proto` text. The model is
//! `serde`-serializable so callers can dump it for inspection.

use serde::Serialize;

/// One `.proto` file worth of definitions, derived from one module.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProtoModule {
    pub name:        String,
    /// Source path the module came from; drives package derivation.
    pub source_file: String,
    pub oid:         Option<String>,
    /// Free-form comment lines placed at the top of the file.
    pub comments:    Vec<String>,
    pub imports:     Vec<ProtoImport>,
    pub enums:       Vec<ProtoEnum>,
    pub messages:    Vec<ProtoMessage>,
}

impl ProtoModule {
    pub fn new(name: &str, source_file: &str) -> Self {
        ProtoModule {
            name: name.to_string(),
            source_file: source_file.to_string(),
            ..ProtoModule::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtoImport {
    pub path: String,
    pub oid:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProtoMessage {
    pub name:     String,
    pub fields:   Vec<ProtoField>,
    pub oneofs:   Vec<ProtoOneof>,
    /// Messages defined inside this one; fields refer to them by name.
    pub nested:   Vec<ProtoMessage>,
    /// Unexpanded formal parameters, kept as comment text.
    pub params:   Vec<String>,
    pub comments: Vec<String>,
    /// A single-field message encoding a constant declaration.
    pub is_constant: bool,
}

impl ProtoMessage {
    pub fn new(name: &str) -> Self {
        ProtoMessage { name: name.to_string(), ..ProtoMessage::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProtoField {
    pub name:      String,
    pub type_name: String,
    pub repeated:  bool,
    /// Validation rule body, e.g. `int32 = {gte: 1, lte: 10}`.
    pub rule:      Option<String>,
    pub comment:   Option<String>,
}

impl ProtoField {
    pub fn new(name: &str, type_name: &str) -> Self {
        ProtoField {
            name: name.to_string(),
            type_name: type_name.to_string(),
            ..ProtoField::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProtoOneof {
    pub name:   String,
    pub fields: Vec<ProtoField>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProtoEnum {
    pub name:       String,
    pub entries:    Vec<ProtoEnumEntry>,
    pub comments:   Vec<String>,
    pub extensible: bool,
}

/// An entry with index -1 had no explicit value in the source; the emitter
/// assigns it the next free index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtoEnumEntry {
    pub name:    String,
    pub index:   i32,
    pub comment: Option<String>,
}

impl ProtoEnumEntry {
    pub fn new(name: &str, index: i32) -> Self {
        ProtoEnumEntry { name: name.to_string(), index, comment: None }
    }
}
