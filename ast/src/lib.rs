//! asn2proto-ast
//!
//! The immutable input tree that the emitters walk. The tree is produced by
//! an upstream parser and semantic pass; this crate only defines its shape:
//!
//!  1) `Asn` / `Module` — a parsed compilation unit with its header OID,
//!     tagging mode and imports,
//!  2) `TypeExpr` — one node of the type/value tree,
//!  3) `Constraint` — a constraint expression tree,
//!  4) `Value` — a literal or referenced value.
//!
//! Ordering of `TypeExpr::members` is semantically significant: member order
//! is field order in every output dialect.

pub mod constraint;
pub mod expr;
pub mod module;
pub mod value;

pub use constraint::{ComponentConstraint, Constraint, Presence};
pub use expr::{
    ClassFieldKind, IocCell, IocRow, IocTable, Marker, MarkerFlags, MetaKind, Param, ParamList,
    Ref, Specialization, SyntaxChunk, SyntaxKind, Tag, TagClass, TypeExpr, WithSyntax,
};
pub use module::{Asn, Import, Module, ModuleFlags, Oid, OidArc};
pub use value::Value;
