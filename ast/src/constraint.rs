use crate::expr::TypeExpr;
use crate::value::Value;

/// Presence qualifier attached to a WITH COMPONENTS element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    #[default]
    Default,
    Present,
    Absent,
    Optional,
}

/// One element of a WITH COMPONENTS list.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConstraint {
    pub constraint: Constraint,
    pub presence:   Presence,
}

/// A constraint expression tree. Non-terminal kinds own their children in
/// source order; rendering walks the tree depth-first.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// A single value element, with an optional chained subconstraint.
    Value { value: Value, sub: Option<Box<Constraint>> },
    /// A contained-subtype element (`INCLUDES`-style), same shape as Value.
    Subtype { value: Value, sub: Option<Box<Constraint>> },
    /// `lower..upper` with the four open/closed endpoint combinations.
    /// A missing `stop` leaves the upper bound unstated.
    Range {
        start:   Value,
        stop:    Option<Value>,
        lo_open: bool,
        hi_open: bool,
    },
    /// The `...` extension marker.
    Extension,
    Size(Box<Constraint>),
    From(Box<Constraint>),
    WithComponent(Box<Constraint>),
    WithComponents(Vec<ComponentConstraint>),
    /// `CONSTRAINED BY { ... }`; the payload is carried unparsed.
    ConstrainedBy(String),
    Containing(Box<TypeExpr>),
    Pattern(Value),
    /// Children joined by ` | `.
    Union(Vec<Constraint>),
    /// Children joined by ` ^ `.
    Intersection(Vec<Constraint>),
    /// Children joined by ` EXCEPT `.
    Except(Vec<Constraint>),
    /// Children joined by `,`.
    CommaList(Vec<Constraint>),
    /// A parenthesized constraint set: each child printed in its own parens.
    Set(Vec<Constraint>),
    /// A class-table cross-reference: each child printed inside braces.
    CrossReference(Vec<Constraint>),
    AllExcept(Box<Constraint>),
}

impl Constraint {
    /// Convenience for the common closed range.
    pub fn range(start: Value, stop: Value) -> Self {
        Constraint::Range { start, stop: Some(stop), lo_open: false, hi_open: false }
    }

    pub fn single(value: Value) -> Self {
        Constraint::Value { value, sub: None }
    }
}
