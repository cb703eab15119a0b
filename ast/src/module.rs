use crate::expr::TypeExpr;

/// A set of parsed modules, the root of the input tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Asn {
    pub modules: Vec<Module>,
}

impl Asn {
    pub fn new(modules: Vec<Module>) -> Self {
        Asn { modules }
    }
}

/// One ASN.1 module: its header, imports and top-level members.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name:        String,
    /// Path of the source file the module was parsed from, as given to the
    /// parser. Drives the `package` / `go_package` derivation in the
    /// Protobuf emitter.
    pub source_file: String,
    pub oid:         Option<Oid>,
    pub flags:       ModuleFlags,
    pub imports:     Vec<Import>,
    pub members:     Vec<TypeExpr>,
}

impl Module {
    pub fn new(name: &str, source_file: &str) -> Self {
        Module {
            name:        name.to_string(),
            source_file: source_file.to_string(),
            oid:         None,
            flags:       ModuleFlags::default(),
            imports:     Vec::new(),
            members:     Vec::new(),
        }
    }
}

/// Module-header options (`DEFINITIONS ... TAGS ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleFlags {
    pub tag_instructions:      bool,
    pub xer_instructions:      bool,
    pub explicit_tags:         bool,
    pub implicit_tags:         bool,
    pub automatic_tags:        bool,
    pub extensibility_implied: bool,
}

/// An IMPORTS entry, reduced to what the emitters need: the module the
/// symbols come from and its OID, if one was declared.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub from_module: String,
    pub oid:         Option<Oid>,
}

/// An OBJECT IDENTIFIER literal, e.g. `{ iso(1) standard(0) 9571 }`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Oid {
    pub arcs: Vec<OidArc>,
}

/// One arc of an OID: a name, a number, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct OidArc {
    pub name:   Option<String>,
    pub number: Option<i64>,
}

impl OidArc {
    pub fn named(name: &str, number: i64) -> Self {
        OidArc { name: Some(name.to_string()), number: Some(number) }
    }

    pub fn number(number: i64) -> Self {
        OidArc { name: None, number: Some(number) }
    }
}
