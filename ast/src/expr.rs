use crate::constraint::Constraint;
use crate::value::Value;
use std::fmt;

/// What kind of declaration a `TypeExpr` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Type,
    TypeRef,
    Value,
    ValueSet,
    Object,
    ObjectClass,
    ObjectField,
}

/// Which class field a `SyntaxKind::ClassField` node declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassFieldKind {
    TypeField,
    FixedTypeValueField,
    VariableTypeValueField,
    FixedTypeValueSetField,
    ObjectField,
    ObjectSetField,
}

/// The concrete ASN.1 construct a `TypeExpr` denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Boolean,
    Null,
    Integer,
    Real,
    Enumerated,
    BitString,
    OctetString,
    ObjectIdentifier,
    RelativeOid,
    External,
    EmbeddedPdv,
    CharacterString,
    Any,
    UtcTime,
    GeneralizedTime,
    ObjectDescriptor,
    NumericString,
    PrintableString,
    VisibleString,
    Ia5String,
    Utf8String,
    BmpString,
    TeletexString,
    UniversalString,
    GeneralString,
    GraphicString,
    Iso646String,
    Sequence,
    SequenceOf,
    Set,
    SetOf,
    Choice,
    /// A reference to another type or value; the target is in `reference`.
    Reference,
    /// The `...` extension marker (identifier carries the literal `...`).
    Extensible,
    ComponentsOf,
    /// A named value inside ENUMERATED / INTEGER (an enumeration entry).
    EnumValue,
    ClassDef,
    ValueSet,
    /// A formal parameter placeholder inside a parameterized definition.
    Parameter,
    ClassField(ClassFieldKind),
}

impl SyntaxKind {
    /// The canonical keyword printed for this construct, when it has one.
    /// Kinds that print nothing (references, class fields, markers) and the
    /// ones with special printing rules (SET OF / SEQUENCE OF) return None.
    pub fn keyword(self) -> Option<&'static str> {
        use SyntaxKind::*;
        Some(match self {
            Boolean => "BOOLEAN",
            Null => "NULL",
            Integer => "INTEGER",
            Real => "REAL",
            Enumerated => "ENUMERATED",
            BitString => "BIT STRING",
            OctetString => "OCTET STRING",
            ObjectIdentifier => "OBJECT IDENTIFIER",
            RelativeOid => "RELATIVE-OID",
            External => "EXTERNAL",
            EmbeddedPdv => "EMBEDDED PDV",
            CharacterString => "CHARACTER STRING",
            Any => "ANY",
            UtcTime => "UTCTime",
            GeneralizedTime => "GeneralizedTime",
            ObjectDescriptor => "ObjectDescriptor",
            NumericString => "NumericString",
            PrintableString => "PrintableString",
            VisibleString => "VisibleString",
            Ia5String => "IA5String",
            Utf8String => "UTF8String",
            BmpString => "BMPString",
            TeletexString => "TeletexString",
            UniversalString => "UniversalString",
            GeneralString => "GeneralString",
            GraphicString => "GraphicString",
            Iso646String => "ISO646String",
            Sequence => "SEQUENCE",
            Set => "SET",
            Choice => "CHOICE",
            _ => return None,
        })
    }

    /// SEQUENCE / SET / CHOICE and their OF forms.
    pub fn is_constructed(self) -> bool {
        matches!(
            self,
            SyntaxKind::Sequence
                | SyntaxKind::SequenceOf
                | SyntaxKind::Set
                | SyntaxKind::SetOf
                | SyntaxKind::Choice
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

/// An explicit tag, e.g. `[APPLICATION 5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class:  TagClass,
    pub number: i64,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            TagClass::Universal => write!(f, "[UNIVERSAL {}]", self.number),
            TagClass::Application => write!(f, "[APPLICATION {}]", self.number),
            TagClass::ContextSpecific => write!(f, "[{}]", self.number),
            TagClass::Private => write!(f, "[PRIVATE {}]", self.number),
        }
    }
}

/// Presence marker bits. OPTIONAL implies INDIRECT, DEFAULT implies
/// OPTIONAL, matching the lattice the upstream semantic pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerFlags(pub u8);

impl MarkerFlags {
    pub const NONE: MarkerFlags = MarkerFlags(0);
    pub const INDIRECT: MarkerFlags = MarkerFlags(0x01);
    pub const OPTIONAL: MarkerFlags = MarkerFlags(0x02 | 0x01);
    pub const DEFAULT: MarkerFlags = MarkerFlags(0x04 | 0x02 | 0x01);

    pub fn contains(self, other: MarkerFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// OPTIONAL / DEFAULT / represent-as-pointer marker on a member.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Marker {
    pub flags:         MarkerFlags,
    pub default_value: Option<Value>,
}

impl Marker {
    pub fn optional() -> Self {
        Marker { flags: MarkerFlags::OPTIONAL, default_value: None }
    }

    pub fn with_default(value: Value) -> Self {
        Marker { flags: MarkerFlags::DEFAULT, default_value: Some(value) }
    }
}

/// A (possibly dotted) reference path, e.g. `Module.Type`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ref {
    pub components: Vec<String>,
}

impl Ref {
    pub fn new(name: &str) -> Self {
        Ref { components: vec![name.to_string()] }
    }

    pub fn dotted(components: &[&str]) -> Self {
        Ref { components: components.iter().map(|c| c.to_string()).collect() }
    }

    /// The final component, the name actually being referenced.
    pub fn leaf(&self) -> Option<&str> {
        self.components.last().map(|s| s.as_str())
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("."))
    }
}

/// A formal parameter: optional governor reference plus argument name.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub governor: Option<Ref>,
    pub argument: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamList {
    pub params: Vec<Param>,
}

/// A concrete instantiation of a parameterized definition: the actual
/// arguments and the fully substituted clone of the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Specialization {
    pub rhs_args: Vec<TypeExpr>,
    pub expr:     TypeExpr,
}

/// One chunk of a WITH SYNTAX block.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxChunk {
    Literal(String),
    Whitespace(String),
    Field(String),
    OptionalGroup(WithSyntax),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WithSyntax {
    pub chunks: Vec<SyntaxChunk>,
}

/// One cell of an Information Object table: the column's field identifier
/// (e.g. `&id`), the column's declared type identifier (e.g. `INTEGER`),
/// and the bound value, when the row binds one.
#[derive(Debug, Clone, PartialEq)]
pub struct IocCell {
    pub field:      String,
    pub field_type: Option<String>,
    pub value:      Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IocRow {
    pub cells: Vec<IocCell>,
}

/// The flattened row/column table computed for an Information Object Set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IocTable {
    pub rows:       Vec<IocRow>,
    pub extensible: bool,
}

/// A node in the type/value tree. Which fields are populated depends on
/// `meta_kind` / `syntax_kind`; the tree is read-only for the emitters.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub identifier:      Option<String>,
    pub meta_kind:       MetaKind,
    pub syntax_kind:     SyntaxKind,
    pub tag:             Option<Tag>,
    pub constraints:     Option<Constraint>,
    pub reference:       Option<Ref>,
    pub value:           Option<Value>,
    pub members:         Vec<TypeExpr>,
    pub marker:          Marker,
    pub lhs_params:      Option<ParamList>,
    pub rhs_pspecs:      Vec<TypeExpr>,
    pub specializations: Vec<Specialization>,
    pub ioc_table:       Option<IocTable>,
    pub with_syntax:     Option<WithSyntax>,
    pub unique:          bool,
    pub lineno:          u32,
}

impl TypeExpr {
    pub fn new(meta_kind: MetaKind, syntax_kind: SyntaxKind) -> Self {
        TypeExpr {
            identifier:      None,
            meta_kind,
            syntax_kind,
            tag:             None,
            constraints:     None,
            reference:       None,
            value:           None,
            members:         Vec::new(),
            marker:          Marker::default(),
            lhs_params:      None,
            rhs_pspecs:      Vec::new(),
            specializations: Vec::new(),
            ioc_table:       None,
            with_syntax:     None,
            unique:          false,
            lineno:          0,
        }
    }

    pub fn named(name: &str, meta_kind: MetaKind, syntax_kind: SyntaxKind) -> Self {
        let mut expr = TypeExpr::new(meta_kind, syntax_kind);
        expr.identifier = Some(name.to_string());
        expr
    }

    /// The `...` extension marker member.
    pub fn extension_marker() -> Self {
        TypeExpr::named("...", MetaKind::Type, SyntaxKind::Extensible)
    }
}
