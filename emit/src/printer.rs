//! Canonical ASN.1 notation printing. `Ctx` owns the output buffer and the
//! one piece of shared state the printers need: whether the last emitted
//! token already provides separation from the next one.

use crate::flags::Flags;
use crate::render::{self, Dialect};
use crate::resolve::{RangeClass, RangeEdge, RangeInfo, Resolve, Visibility};
use asn2proto_ast::{
    MarkerFlags, MetaKind, Module, Oid, SyntaxChunk, SyntaxKind, TypeExpr, WithSyntax,
};

/// Whitespace state between tokens. `Have` means the buffer already ends in
/// something that separates tokens; `Need` means it does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Space {
    Need,
    Have,
}

pub struct Ctx<'a> {
    out:   String,
    pub(crate) flags: Flags,
    pub(crate) res:   Option<&'a dyn Resolve>,
    space: Space,
}

impl<'a> Ctx<'a> {
    pub fn new(flags: Flags) -> Self {
        Ctx { out: String::new(), flags, res: None, space: Space::Need }
    }

    pub fn with_resolver(flags: Flags, res: &'a dyn Resolve) -> Self {
        Ctx { out: String::new(), flags, res: Some(res), space: Space::Need }
    }

    /// Appends text verbatim. Any non-empty append leaves the state at
    /// `Need`; separation is requested explicitly via `ensure_space`.
    pub fn push(&mut self, s: &str) {
        if !s.is_empty() {
            self.out.push_str(s);
            self.space = Space::Need;
        }
    }

    /// Emits a single space unless the buffer already ends in separation.
    pub fn ensure_space(&mut self) {
        if self.space != Space::Have {
            self.out.push(' ');
        }
        self.space = Space::Have;
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn indent(&mut self, level: usize) {
        if !self.flags.has(Flags::NO_INDENT) {
            for _ in 0..level {
                self.push("    ");
            }
        }
    }
}

const OID_WRAP_COLUMN: usize = 72;

pub fn print_oid(ctx: &mut Ctx, oid: &Oid) {
    let mut accum = 0usize;
    ctx.push("{");
    for arc in &oid.arcs {
        let text = match (&arc.name, arc.number) {
            (Some(name), Some(number)) => format!("{}({})", name, number),
            (Some(name), None) => name.clone(),
            (None, Some(number)) => number.to_string(),
            (None, None) => continue,
        };
        if accum + text.len() > OID_WRAP_COLUMN {
            ctx.push("\n\t");
            accum = 8;
        }
        ctx.push(" ");
        ctx.push(&text);
        accum += text.len() + 1;
    }
    ctx.push(" }");
}

pub fn oid_to_string(oid: &Oid) -> String {
    let mut ctx = Ctx::new(Flags::NO_INDENT);
    print_oid(&mut ctx, oid);
    ctx.into_string()
}

pub fn print_module(ctx: &mut Ctx, module: &Module) {
    ctx.push(&module.name);
    if let Some(oid) = &module.oid {
        ctx.push(" ");
        print_oid(ctx, oid);
    }
    ctx.push(" DEFINITIONS");
    let mf = module.flags;
    if mf.tag_instructions {
        ctx.push(" TAG INSTRUCTIONS");
    }
    if mf.xer_instructions {
        ctx.push(" XER INSTRUCTIONS");
    }
    if mf.explicit_tags {
        ctx.push(" EXPLICIT TAGS");
    }
    if mf.implicit_tags {
        ctx.push(" IMPLICIT TAGS");
    }
    if mf.automatic_tags {
        ctx.push(" AUTOMATIC TAGS");
    }
    if mf.extensibility_implied {
        ctx.push(" EXTENSIBILITY IMPLIED");
    }
    ctx.push(" ::=\nBEGIN\n\n");
    for member in &module.members {
        print_expr(ctx, member, 0);
        // Constraint explanations already close their own line.
        if ctx.flags.has(Flags::PRINT_CONSTRAINTS) {
            ctx.push("\n");
        } else {
            ctx.push("\n\n");
        }
    }
    ctx.push("END\n");
}

pub fn print_expr(ctx: &mut Ctx, expr: &TypeExpr, level: usize) {
    print_expr_inner(ctx, expr, level, true);
}

fn print_expr_inner(ctx: &mut Ctx, expr: &TypeExpr, level: usize, own_line: bool) {
    let saved = ctx.space;
    ctx.space = Space::Need;

    if own_line {
        if ctx.flags.has(Flags::LINE_COMMENTS) {
            ctx.indent(level);
            ctx.push(&format!("-- #line {}\n", expr.lineno));
        }
        // The represent-as-pointer directive survives round trips as a
        // magic comment.
        if expr.marker.flags.contains(MarkerFlags::INDIRECT)
            && !expr.marker.flags.contains(MarkerFlags::OPTIONAL)
        {
            ctx.indent(level);
            ctx.push("--<ASN1C.RepresentAsPointer>--\n");
        }
        ctx.indent(level);
    }

    // A value reference used in value position prints as the bare
    // reference, not as `identifier reference`.
    let suppress_id = level > 0
        && expr.meta_kind == MetaKind::Value
        && expr.syntax_kind == SyntaxKind::Reference;
    let mut printed_id = false;
    if let Some(id) = &expr.identifier {
        if !suppress_id {
            ctx.push(id);
            printed_id = true;
        }
    }

    if let Some(params) = &expr.lhs_params {
        ctx.push("{");
        for (i, p) in params.params.iter().enumerate() {
            if i > 0 {
                ctx.push(", ");
            }
            if let Some(gov) = &p.governor {
                ctx.push(&gov.to_string());
                ctx.push(":");
            }
            ctx.push(&p.argument);
        }
        ctx.push("}");
    }

    // Value and value-set declarations get their `::=` next to the value;
    // their identifiers (and extension markers) also take no column tab.
    let assignable = !matches!(expr.meta_kind, MetaKind::Value | MetaKind::ValueSet)
        && expr.syntax_kind != SyntaxKind::Extensible;
    if printed_id && assignable {
        if level == 0 {
            ctx.push(" ::=");
        } else if !ctx.flags.has(Flags::NO_INDENT) {
            ctx.push("\t");
        }
    }

    if let Some(tag) = &expr.tag {
        ctx.ensure_space();
        ctx.push(&tag.to_string());
    }

    let mut seq_of = false;
    match expr.syntax_kind {
        SyntaxKind::Extensible => {
            // The identifier is the literal `...`; an exception spec
            // follows it as `!value`.
            if let Some(v) = &expr.value {
                ctx.push("!");
                render::render_value(ctx, v, Dialect::Notation);
            }
        }
        SyntaxKind::ComponentsOf => {
            ctx.ensure_space();
            ctx.push("COMPONENTS OF");
            seq_of = true;
        }
        SyntaxKind::ClassDef => {
            ctx.ensure_space();
            ctx.push("CLASS");
        }
        SyntaxKind::SetOf | SyntaxKind::SequenceOf => {
            ctx.ensure_space();
            ctx.push(if expr.syntax_kind == SyntaxKind::SetOf { "SET" } else { "SEQUENCE" });
            if let Some(ct) = &expr.constraints {
                ctx.ensure_space();
                ctx.push("(");
                render::render_constraint(ctx, ct, Dialect::Notation);
                ctx.push(")");
            }
            ctx.ensure_space();
            ctx.push("OF");
            seq_of = true;
        }
        kind => {
            if let Some(kw) = kind.keyword() {
                ctx.ensure_space();
                ctx.push(kw);
            }
        }
    }

    if let Some(r) = &expr.reference {
        ctx.ensure_space();
        ctx.push(&r.to_string());
    }

    if !expr.rhs_pspecs.is_empty() {
        ctx.push("{");
        for (i, p) in expr.rhs_pspecs.iter().enumerate() {
            if i > 0 {
                ctx.push(", ");
            }
            print_expr_inner(ctx, p, level, false);
        }
        ctx.push("}");
    }

    if !expr.members.is_empty() {
        if seq_of {
            print_expr_inner(ctx, &expr.members[0], level, false);
        } else {
            ctx.push(" {\n");
            let last = expr.members.len() - 1;
            for (i, member) in expr.members.iter().enumerate() {
                print_expr_inner(ctx, member, level + 1, true);
                if member.marker.flags.contains(MarkerFlags::DEFAULT) {
                    ctx.push(" DEFAULT");
                    if let Some(v) = &member.marker.default_value {
                        ctx.push(" ");
                        render::render_value(ctx, v, Dialect::Notation);
                    }
                } else if member.marker.flags.contains(MarkerFlags::OPTIONAL) {
                    ctx.push(" OPTIONAL");
                }
                ctx.push(if i == last { "\n" } else { ",\n" });
            }
            ctx.indent(level);
            ctx.push("}");
        }
    }

    if !seq_of {
        if let Some(ct) = &expr.constraints {
            if expr.meta_kind == MetaKind::ValueSet
                || expr.syntax_kind == SyntaxKind::ValueSet
            {
                ctx.push(if level == 0 { " ::= {" } else { " {" });
                render::render_constraint(ctx, ct, Dialect::Notation);
                ctx.push("}");
            } else {
                ctx.ensure_space();
                ctx.push("(");
                render::render_constraint(ctx, ct, Dialect::Notation);
                ctx.push(")");
            }
        }
    }

    if expr.unique {
        ctx.push(" UNIQUE");
    }

    if let Some(ws) = &expr.with_syntax {
        ctx.push(" WITH SYNTAX {");
        print_with_syntax(ctx, ws);
        ctx.push("}");
    }

    if expr.syntax_kind != SyntaxKind::Extensible {
        if let Some(v) = &expr.value {
            if expr.syntax_kind == SyntaxKind::EnumValue {
                ctx.push("(");
                render::render_value(ctx, v, Dialect::Notation);
                ctx.push(")");
            } else if level == 0 {
                ctx.push(" ::= ");
                render::render_value(ctx, v, Dialect::Notation);
            } else {
                ctx.ensure_space();
                render::render_value(ctx, v, Dialect::Notation);
            }
        }
    }

    if level == 0 && ctx.flags.has(Flags::PRINT_CONSTRAINTS) {
        print_constraint_explains(ctx, expr);
    }
    if level == 0 && ctx.flags.has(Flags::PRINT_CLASS_MATRIX) {
        print_class_matrix(ctx, expr);
    }

    ctx.space = saved;
}

fn print_with_syntax(ctx: &mut Ctx, ws: &WithSyntax) {
    for chunk in &ws.chunks {
        match chunk {
            SyntaxChunk::Literal(text)
            | SyntaxChunk::Whitespace(text)
            | SyntaxChunk::Field(text) => ctx.push(text),
            SyntaxChunk::OptionalGroup(inner) => {
                ctx.push("[");
                print_with_syntax(ctx, inner);
                ctx.push("]");
            }
        }
    }
}

fn edge_text(edge: RangeEdge) -> String {
    match edge {
        RangeEdge::Min => "MIN".to_string(),
        RangeEdge::Max => "MAX".to_string(),
        RangeEdge::Value(n) => n.to_string(),
    }
}

fn range_text(info: &RangeInfo) -> String {
    if !info.elements.is_empty() {
        let parts: Vec<String> = info.elements.iter().map(range_text).collect();
        let mut text = parts.join(" | ");
        if info.extensible {
            text.push_str(", ...");
        }
        return text;
    }
    let mut text = if info.left == info.right {
        edge_text(info.left)
    } else {
        format!("{}..{}", edge_text(info.left), edge_text(info.right))
    };
    if info.extensible {
        text.push_str(", ...");
    }
    text
}

fn print_constraint_explains(ctx: &mut Ctx, expr: &TypeExpr) {
    if let Some(ct) = &expr.constraints {
        ctx.push("\n-- Combined constraint: ");
        render::render_constraint(ctx, ct, Dialect::Notation);
    }
    let res = match ctx.res {
        Some(res) => res,
        None => {
            ctx.push("\n");
            return;
        }
    };
    let name = expr.identifier.as_deref().unwrap_or("<anonymous>");
    let views = [
        ("Practical constraints", Visibility::All),
        ("OER-visible constraints", Visibility::OerVisible),
        ("PER-visible constraints", Visibility::PerVisible),
    ];
    for (label, vis) in views {
        let range = res.constraint_range(
            name,
            expr.syntax_kind,
            expr.constraints.as_ref(),
            RangeClass::Value,
            vis,
        );
        match range {
            Some(info) => {
                ctx.push(&format!("\n-- {} ({}): ", label, name));
                ctx.push(&range_text(&info));
            }
            None => ctx.push(&format!("\n-- {} ({}): empty", label, name)),
        }
    }
    ctx.push("\n");
}

fn print_class_matrix(ctx: &mut Ctx, expr: &TypeExpr) {
    if let Some(table) = &expr.ioc_table {
        let n = table.rows.len();
        ctx.push(&format!(
            "\n-- Information object set has {} entr{}:\n",
            n,
            if n == 1 { "y" } else { "ies" }
        ));
        for row in &table.rows {
            ctx.push("--");
            for cell in &row.cells {
                ctx.push(" ");
                match &cell.value {
                    Some(v) => print_expr_inner(ctx, v, 0, false),
                    None => ctx.push("<no entry>"),
                }
            }
            ctx.push("\n");
        }
    }
    if !expr.specializations.is_empty() {
        ctx.push(&format!(
            "\n-- Specializations list has {} entries:\n",
            expr.specializations.len()
        ));
        for spec in &expr.specializations {
            ctx.push("-- {");
            for (i, arg) in spec.rhs_args.iter().enumerate() {
                if i > 0 {
                    ctx.push(", ");
                }
                print_expr_inner(ctx, arg, 0, false);
            }
            ctx.push("}\n");
        }
    }
}
