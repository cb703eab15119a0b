//! Value and constraint rendering, shared by the notation printer and the
//! Protobuf validation-rule generator. The same tree walk serves both; the
//! dialect only changes how MIN/MAX and bound keywords come out.

use crate::flags::Flags;
use crate::printer::Ctx;
use crate::resolve::{RangeEdge, RangeInfo};
use asn2proto_ast::{ComponentConstraint, Constraint, Presence, Value};

/// Which family of validation-rule keys bounds translate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Numeric,
    Chars,
    Bytes,
    Items,
}

impl RuleKind {
    /// Selects the key family from the `*_VALUE` flag hints; numeric when
    /// no hint is set.
    pub fn from_flags(flags: Flags) -> RuleKind {
        if flags.has(Flags::STRING_VALUE) {
            RuleKind::Chars
        } else if flags.has(Flags::BYTES_VALUE) {
            RuleKind::Bytes
        } else {
            RuleKind::Numeric
        }
    }

    /// Key for a lower bound. Open bounds use the strict comparison keys
    /// whatever the kind.
    pub fn lower_key(self, open: bool) -> &'static str {
        if open {
            return "gt";
        }
        match self {
            RuleKind::Numeric => "gte",
            RuleKind::Chars => "min_len",
            RuleKind::Bytes => "min_bytes",
            RuleKind::Items => "min_items",
        }
    }

    pub fn upper_key(self, open: bool) -> &'static str {
        if open {
            return "lt";
        }
        match self {
            RuleKind::Numeric => "lte",
            RuleKind::Chars => "max_len",
            RuleKind::Bytes => "max_bytes",
            RuleKind::Items => "max_items",
        }
    }
}

/// How values print: ASN.1 notation, or the validation-rule dialect where
/// MIN and MAX become concrete int32 bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Notation,
    Rule,
}

pub fn render_value(ctx: &mut Ctx, value: &Value, dialect: Dialect) {
    match value {
        Value::None => {}
        Value::Null => ctx.push("NULL"),
        Value::Real(r) => ctx.push(&format!("{:.6}", r)),
        Value::Type(expr) => crate::printer::print_expr(ctx, expr, 0),
        Value::Integer(n) => ctx.push(&n.to_string()),
        Value::Min => ctx.push(if dialect == Dialect::Rule { "0" } else { "MIN" }),
        Value::Max => {
            ctx.push(if dialect == Dialect::Rule { "2147483647" } else { "MAX" })
        }
        Value::False => ctx.push("FALSE"),
        Value::True => ctx.push("TRUE"),
        Value::Tuple(v) => ctx.push(&format!("{{{}, {}}}", v >> 4, v & 0x0f)),
        Value::Quadruple(v) => ctx.push(&format!(
            "{{{}, {}, {}, {}}}",
            (v >> 24) & 0xff,
            (v >> 16) & 0xff,
            (v >> 8) & 0xff,
            v & 0xff
        )),
        Value::Str(s) => {
            ctx.push("\"");
            ctx.push(&s.replace('"', "\"\""));
            ctx.push("\"");
        }
        Value::Unparsed(s) => ctx.push(s),
        Value::Bits { data, len } => render_bits(ctx, data, *len),
        Value::Reference(r) => ctx.push(&r.to_string()),
        Value::ValueSet(ct) => render_constraint(ctx, ct, dialect),
        Value::Choice { identifier, value } => {
            ctx.push(identifier);
            ctx.push(": ");
            render_value(ctx, value, dialect);
        }
    }
}

/// Bit strings whose length is a whole number of octets print as 'HH..'H,
/// the rest bit by bit as '010..'B.
fn render_bits(ctx: &mut Ctx, data: &[u8], len: usize) {
    ctx.push("'");
    if len % 8 == 0 {
        for byte in &data[..len / 8] {
            ctx.push(&format!("{:02X}", byte));
        }
        ctx.push("'H");
    } else {
        for i in 0..len {
            let bit = (data[i / 8] >> (7 - i % 8)) & 1;
            ctx.push(if bit != 0 { "1" } else { "0" });
        }
        ctx.push("'B");
    }
}

fn range_separator(lo_open: bool, hi_open: bool) -> &'static str {
    match (lo_open, hi_open) {
        (false, false) => "..",
        (true, false) => "<..",
        (false, true) => "..<",
        (true, true) => "<..<",
    }
}

/// Renders a constraint subtree without surrounding parentheses; the call
/// site decides whether the context requires them.
pub fn render_constraint(ctx: &mut Ctx, ct: &Constraint, dialect: Dialect) {
    match ct {
        Constraint::Value { value, sub } | Constraint::Subtype { value, sub } => {
            render_value(ctx, value, dialect);
            if let Some(sub) = sub {
                ctx.push("(");
                render_constraint(ctx, sub, dialect);
                ctx.push(")");
            }
        }
        Constraint::Range { start, stop, lo_open, hi_open } => {
            render_value(ctx, start, dialect);
            ctx.push(range_separator(*lo_open, *hi_open));
            if let Some(stop) = stop {
                render_value(ctx, stop, dialect);
            }
        }
        Constraint::Extension => ctx.push("..."),
        Constraint::Size(inner) => {
            ctx.push("SIZE(");
            render_constraint(ctx, inner, dialect);
            ctx.push(")");
        }
        Constraint::From(inner) => {
            ctx.push("FROM(");
            render_constraint(ctx, inner, dialect);
            ctx.push(")");
        }
        Constraint::WithComponent(inner) => {
            ctx.push("WITH COMPONENT (");
            render_constraint(ctx, inner, dialect);
            ctx.push(")");
        }
        Constraint::WithComponents(comps) => {
            ctx.push("WITH COMPONENTS {");
            for (i, comp) in comps.iter().enumerate() {
                if i > 0 {
                    ctx.push(",");
                }
                ctx.push(" ");
                render_component(ctx, comp, dialect);
            }
            ctx.push(" }");
        }
        Constraint::ConstrainedBy(text) => {
            ctx.push("CONSTRAINED BY {");
            ctx.push(text);
            ctx.push("}");
        }
        Constraint::Containing(expr) => {
            ctx.push("CONTAINING ");
            crate::printer::print_expr(ctx, expr, 0);
        }
        Constraint::Pattern(value) => {
            ctx.push("PATTERN ");
            render_value(ctx, value, dialect);
        }
        Constraint::Union(els) => render_joined(ctx, els, " | ", dialect),
        Constraint::Intersection(els) => render_joined(ctx, els, " ^ ", dialect),
        Constraint::Except(els) => render_joined(ctx, els, " EXCEPT ", dialect),
        Constraint::CommaList(els) => render_joined(ctx, els, ",", dialect),
        Constraint::Set(els) => {
            for (i, el) in els.iter().enumerate() {
                if i > 0 {
                    ctx.push(" ");
                }
                ctx.push("(");
                render_constraint(ctx, el, dialect);
                ctx.push(")");
            }
        }
        Constraint::CrossReference(els) => {
            for el in els {
                ctx.push("{");
                render_constraint(ctx, el, dialect);
                ctx.push("}");
            }
        }
        Constraint::AllExcept(inner) => {
            ctx.push("ALL EXCEPT ");
            render_constraint(ctx, inner, dialect);
        }
    }
}

fn render_joined(ctx: &mut Ctx, els: &[Constraint], sep: &str, dialect: Dialect) {
    for (i, el) in els.iter().enumerate() {
        if i > 0 {
            ctx.push(sep);
        }
        render_constraint(ctx, el, dialect);
    }
}

fn render_component(ctx: &mut Ctx, comp: &ComponentConstraint, dialect: Dialect) {
    render_constraint(ctx, &comp.constraint, dialect);
    match comp.presence {
        Presence::Default => {}
        Presence::Present => ctx.push(" PRESENT"),
        Presence::Absent => ctx.push(" ABSENT"),
        Presence::Optional => ctx.push(" OPTIONAL"),
    }
}

/// Translates a computed range into validation-rule text, e.g.
/// `gte: 1, lte: 10`. Unbounded edges contribute nothing; a fully
/// unbounded range yields `None`.
pub fn range_rule(info: &RangeInfo, kind: RuleKind) -> Option<String> {
    let mut parts = Vec::new();
    if let RangeEdge::Value(n) = info.left {
        parts.push(format!("{}: {}", kind.lower_key(info.lo_open), n));
    }
    if let RangeEdge::Value(n) = info.right {
        parts.push(format!("{}: {}", kind.upper_key(info.hi_open), n));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Renders a value standalone, without a surrounding print context.
pub fn value_to_string(value: &Value) -> String {
    let mut ctx = Ctx::new(Flags::NO_INDENT);
    render_value(&mut ctx, value, Dialect::Notation);
    ctx.into_string()
}

pub fn constraint_to_string(ct: &Constraint) -> String {
    let mut ctx = Ctx::new(Flags::NO_INDENT);
    render_constraint(&mut ctx, ct, Dialect::Notation);
    ctx.into_string()
}
