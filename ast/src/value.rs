use crate::constraint::Constraint;
use crate::expr::{Ref, TypeExpr};

/// A literal or referenced value, as produced by the upstream parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value at all; renders as nothing.
    None,
    Null,
    Real(f64),
    /// A nested type used in value position (e.g. inside CONTAINING).
    Type(Box<TypeExpr>),
    Integer(i64),
    Min,
    Max,
    False,
    True,
    /// Two nibbles packed into one byte, `{column, row}`.
    Tuple(u8),
    /// Four bytes packed into a word, `{g1, g2, g3, g4}`.
    Quadruple(u32),
    /// A quoted character string literal.
    Str(String),
    /// A raw token carried through without interpretation.
    Unparsed(String),
    /// A bit vector; `len` is the length in bits, data is MSB-first.
    Bits { data: Vec<u8>, len: usize },
    Reference(Ref),
    ValueSet(Box<Constraint>),
    /// A CHOICE-tagged value, `identifier: value`.
    Choice { identifier: String, value: Box<Value> },
}

impl Value {
    pub fn reference(name: &str) -> Self {
        Value::Reference(Ref::new(name))
    }

    pub fn string(text: &str) -> Self {
        Value::Str(text.to_string())
    }
}
