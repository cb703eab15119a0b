//! XML DTD approximation of a set of modules. Every named type and every
//! named member becomes an `<!ELEMENT ...>` declaration; the content model
//! is derived from the (resolved) type structure.

use crate::printer::Ctx;
use asn2proto_ast::{Asn, MetaKind, Module, SyntaxKind, TypeExpr};

pub fn print_dtd(ctx: &mut Ctx, asn: &Asn) {
    ctx.push("<!-- XML DTD generated by asn2proto -->\n\n");
    for module in &asn.modules {
        print_module_dtd(ctx, module);
    }
    // Referenced by every BOOLEAN content model.
    ctx.push("<!ELEMENT true EMPTY>\n");
    ctx.push("<!ELEMENT false EMPTY>\n");
}

fn print_module_dtd(ctx: &mut Ctx, module: &Module) {
    ctx.push("<!-- ASN.1 module\n");
    ctx.push(&format!("  \"{}\"\n", module.name));
    ctx.push(&format!("  found in \"{}\"\n", module.source_file));
    ctx.push("-->\n\n");
    for member in &module.members {
        if !is_dtd_type(member) {
            continue;
        }
        dtd_expr(ctx, member);
        ctx.push("\n");
    }
}

fn is_dtd_type(expr: &TypeExpr) -> bool {
    if expr.identifier.is_none() {
        return false;
    }
    if !matches!(expr.meta_kind, MetaKind::Type | MetaKind::TypeRef) {
        return false;
    }
    !matches!(
        expr.syntax_kind,
        SyntaxKind::Extensible
            | SyntaxKind::ClassDef
            | SyntaxKind::ValueSet
            | SyntaxKind::Parameter
            | SyntaxKind::ClassField(_)
    )
}

/// Types whose children form an alternative list rather than an ordered
/// group.
fn is_unordered(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Choice
            | SyntaxKind::SequenceOf
            | SyntaxKind::SetOf
            | SyntaxKind::Set
            | SyntaxKind::Integer
            | SyntaxKind::Enumerated
    )
}

fn entry_name(member: &TypeExpr) -> Option<String> {
    if let Some(id) = &member.identifier {
        return Some(id.clone());
    }
    if let Some(r) = &member.reference {
        return r.leaf().map(|s| s.to_string());
    }
    member.syntax_kind.keyword().map(|kw| kw.to_string())
}

fn dtd_expr(ctx: &mut Ctx, expr: &TypeExpr) {
    let name = match &expr.identifier {
        Some(id) => id.clone(),
        None => return,
    };
    ctx.push("<!ELEMENT ");
    ctx.push(&name);

    // A reference is declared with the content model of its terminal
    // type; the terminal's own children are declared where the terminal
    // itself is.
    let mut target = expr;
    let mut declare_children = true;
    if expr.syntax_kind == SyntaxKind::Reference {
        match ctx.res.and_then(|res| res.terminal_type(expr)) {
            Some(t) => {
                target = t;
                declare_children = false;
            }
            None => {
                ctx.push(" (ANY)>\n");
                return;
            }
        }
    }

    if target.members.is_empty() {
        ctx.push(leaf_content(target.syntax_kind));
        ctx.push(">\n");
        return;
    }

    // SET / CHOICE / INTEGER / ENUMERATED entries carry no occurrence
    // suffix; the other kinds take `*` (OF forms) or `?` (markers).
    let suffixed = !matches!(
        target.syntax_kind,
        SyntaxKind::Set | SyntaxKind::Choice | SyntaxKind::Integer | SyntaxKind::Enumerated
    );
    let unordered = is_unordered(target.syntax_kind);
    let sep = if unordered { "|" } else { ", " };
    ctx.push(" (");
    let mut first = true;
    let mut extensible = false;
    for member in &target.members {
        if member.syntax_kind == SyntaxKind::Extensible {
            extensible = true;
            continue;
        }
        let text = match entry_name(member) {
            Some(n) => n,
            None => continue,
        };
        if !first {
            ctx.push(sep);
        }
        first = false;
        ctx.push(&text);
        if suffixed {
            if unordered {
                ctx.push("*");
            } else if !member.marker.flags.is_empty() {
                ctx.push("?");
            }
        }
    }
    if extensible {
        ctx.push(sep);
        ctx.push("ANY");
        if suffixed {
            ctx.push("*");
        }
    }
    ctx.push(")");
    if target.syntax_kind == SyntaxKind::Set {
        ctx.push("*");
    }
    ctx.push(">\n");

    if declare_children {
        for member in &target.members {
            if member.syntax_kind == SyntaxKind::Extensible {
                continue;
            }
            if member.identifier.is_none() {
                continue;
            }
            if member.syntax_kind == SyntaxKind::EnumValue {
                ctx.push("<!ELEMENT ");
                ctx.push(member.identifier.as_deref().unwrap_or(""));
                ctx.push(" EMPTY>\n");
            } else {
                dtd_expr(ctx, member);
            }
        }
    }
}

/// Content model for a childless type. Character-data kinds map to
/// `(#PCDATA)`; everything else (REAL, ENUMERATED, UTF8String, ...) may
/// legally contain XML elements and defaults to `ANY`.
fn leaf_content(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        Boolean => " (true|false)",
        Null | EnumValue | Sequence | SequenceOf | Set | SetOf | Choice => " EMPTY",
        Any => " ANY",
        BitString | OctetString | ObjectIdentifier | RelativeOid | Integer | UtcTime
        | GeneralizedTime | NumericString | PrintableString | VisibleString | Iso646String => {
            " (#PCDATA)"
        }
        _ => " ANY",
    }
}
