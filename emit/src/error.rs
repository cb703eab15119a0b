use asn2proto_ast::{MetaKind, SyntaxKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    /// An ASN.1 construct with no defined Protobuf mapping. The caller
    /// decides whether to skip the member, skip the module, or abort.
    #[error("no protobuf mapping for {identifier} (meta {meta:?}, syntax {syntax:?})")]
    Unmapped {
        identifier: String,
        meta:       MetaKind,
        syntax:     SyntaxKind,
    },

    #[error("unresolved reference {0}")]
    UnresolvedReference(String),

    /// A SEQUENCE OF member whose element is not a terminal type reference.
    #[error("element of {0} is not a type reference")]
    BadElementType(String),
}
