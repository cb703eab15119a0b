//! The seam between the emitters and the upstream semantic pass: terminal
//! type resolution and combined constraint-range computation. The emitters
//! only ever consume this trait; `ModuleResolver` is a basic module-walking
//! implementation good enough for self-contained use and tests.

use asn2proto_ast::{Asn, Constraint, SyntaxKind, TypeExpr, Value};

/// Which facet of a constraint a range computation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeClass {
    Value,
    Size,
    From,
}

/// Visibility filter applied to the computed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    All,
    OerVisible,
    PerVisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdge {
    Min,
    Max,
    Value(i64),
}

/// A computed constraint range: either a single `left..right` span or a
/// union of element spans.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeInfo {
    pub left:            RangeEdge,
    pub right:           RangeEdge,
    pub lo_open:         bool,
    pub hi_open:         bool,
    pub elements:        Vec<RangeInfo>,
    pub extensible:      bool,
    pub empty:           bool,
    pub incompatible:    bool,
    pub not_oer_visible: bool,
    pub not_per_visible: bool,
}

impl RangeInfo {
    fn span(left: RangeEdge, right: RangeEdge) -> Self {
        RangeInfo {
            left,
            right,
            lo_open:         false,
            hi_open:         false,
            elements:        Vec::new(),
            extensible:      false,
            empty:           false,
            incompatible:    false,
            not_oer_visible: false,
            not_per_visible: false,
        }
    }
}

pub trait Resolve {
    /// Follow a chain of type references to the terminal type. `None` means
    /// the reference could not be resolved; callers treat this as a
    /// recoverable per-node condition.
    fn terminal_type<'a>(&'a self, expr: &TypeExpr) -> Option<&'a TypeExpr>;

    /// Compute the combined range a constraint imposes on `class`, filtered
    /// by `visibility`. `None` means the constraint has no such facet.
    fn constraint_range(
        &self,
        debug_name: &str,
        syntax: SyntaxKind,
        constraint: Option<&Constraint>,
        class: RangeClass,
        visibility: Visibility,
    ) -> Option<RangeInfo>;
}

/// Resolves references by scanning the top-level members of every module.
pub struct ModuleResolver<'a> {
    asn: &'a Asn,
}

impl<'a> ModuleResolver<'a> {
    pub fn new(asn: &'a Asn) -> Self {
        ModuleResolver { asn }
    }

    fn lookup(&self, name: &str) -> Option<&'a TypeExpr> {
        self.asn
            .modules
            .iter()
            .flat_map(|m| m.members.iter())
            .find(|e| e.identifier.as_deref() == Some(name))
    }
}

impl Resolve for ModuleResolver<'_> {
    fn terminal_type<'a>(&'a self, expr: &TypeExpr) -> Option<&'a TypeExpr> {
        let name = expr.reference.as_ref()?.leaf()?;
        let mut cur = self.lookup(name)?;
        // Reference chains in legal input are short; the hop limit only
        // guards against cyclic aliases in malformed trees.
        for _ in 0..64 {
            if cur.syntax_kind != SyntaxKind::Reference {
                return Some(cur);
            }
            let next = cur.reference.as_ref()?.leaf()?;
            cur = self.lookup(next)?;
        }
        None
    }

    fn constraint_range(
        &self,
        _debug_name: &str,
        _syntax: SyntaxKind,
        constraint: Option<&Constraint>,
        class: RangeClass,
        _visibility: Visibility,
    ) -> Option<RangeInfo> {
        let ct = constraint?;
        let mut spans = Vec::new();
        let mut extensible = false;
        collect_spans(ct, class, false, &mut spans, &mut extensible);
        match spans.len() {
            0 => None,
            1 => {
                let mut r = spans.remove(0);
                r.extensible = extensible;
                Some(r)
            }
            _ => {
                let mut r = RangeInfo::span(RangeEdge::Min, RangeEdge::Max);
                r.elements = spans;
                r.extensible = extensible;
                Some(r)
            }
        }
    }
}

fn edge(value: &Value) -> Option<RangeEdge> {
    match value {
        Value::Min => Some(RangeEdge::Min),
        Value::Max => Some(RangeEdge::Max),
        Value::Integer(n) => Some(RangeEdge::Value(*n)),
        _ => None,
    }
}

/// Gather the value spans belonging to `class`. `in_target` is true once
/// the walk has entered the constraint region the class selects (the whole
/// tree for value ranges, the SIZE subtree for size ranges).
fn collect_spans(
    ct: &Constraint,
    class: RangeClass,
    in_target: bool,
    spans: &mut Vec<RangeInfo>,
    extensible: &mut bool,
) {
    let in_target = in_target || class == RangeClass::Value;
    match ct {
        Constraint::Set(els)
        | Constraint::Union(els)
        | Constraint::Intersection(els)
        | Constraint::CommaList(els) => {
            for el in els {
                collect_spans(el, class, in_target, spans, extensible);
            }
        }
        Constraint::Size(inner) => {
            if class == RangeClass::Size {
                collect_value_spans(inner, spans, extensible);
            }
        }
        Constraint::From(inner) => {
            if class == RangeClass::From {
                collect_value_spans(inner, spans, extensible);
            }
        }
        Constraint::Extension => *extensible = true,
        Constraint::Range { start, stop, lo_open, hi_open }
            if in_target && class == RangeClass::Value =>
        {
            if let Some(left) = edge(start) {
                let right = stop.as_ref().and_then(edge).unwrap_or(RangeEdge::Max);
                let mut span = RangeInfo::span(left, right);
                span.lo_open = *lo_open;
                span.hi_open = *hi_open;
                spans.push(span);
            }
        }
        Constraint::Value { value, .. } if in_target && class == RangeClass::Value => {
            if let Some(e) = edge(value) {
                spans.push(RangeInfo::span(e, e));
            }
        }
        _ => {}
    }
}

/// Inside a SIZE/FROM subtree every range counts, whatever the class.
fn collect_value_spans(ct: &Constraint, spans: &mut Vec<RangeInfo>, extensible: &mut bool) {
    match ct {
        Constraint::Set(els)
        | Constraint::Union(els)
        | Constraint::Intersection(els)
        | Constraint::CommaList(els) => {
            for el in els {
                collect_value_spans(el, spans, extensible);
            }
        }
        Constraint::Extension => *extensible = true,
        Constraint::Range { start, stop, lo_open, hi_open } => {
            if let Some(left) = edge(start) {
                let right = stop.as_ref().and_then(edge).unwrap_or(RangeEdge::Max);
                let mut span = RangeInfo::span(left, right);
                span.lo_open = *lo_open;
                span.hi_open = *hi_open;
                spans.push(span);
            }
        }
        Constraint::Value { value, .. } => {
            if let Some(e) = edge(value) {
                spans.push(RangeInfo::span(e, e));
            }
        }
        _ => {}
    }
}
