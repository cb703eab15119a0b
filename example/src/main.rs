use clap::{Parser, ValueEnum};

use asn2proto::proto_builder::build_module;
use asn2proto::proto_dedup::dedup_nested;
use asn2proto::{print_asn, EmitError, Flags, ModuleResolver};
use asn2proto_ast::{
    Asn, Constraint, Marker, MetaKind, Module, Oid, OidArc, Ref, SyntaxKind, TypeExpr, Value,
};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dialect {
    Asn1,
    Dtd,
    Proto,
}

#[derive(Parser)]
#[command(name = "asn2proto-example")]
#[command(about = "Render a built-in sample module in each output dialect", long_about = None)]
struct Cli {
    /// Output dialect
    #[arg(long, value_enum, default_value = "asn1")]
    dialect: Dialect,

    /// Append debug constraint explanations to each member
    #[arg(long)]
    constraints: bool,

    /// Append Information-Object table and specialization dumps
    #[arg(long)]
    class_matrix: bool,

    /// Emit #line source-position comments
    #[arg(long)]
    line_comments: bool,

    /// Dump the intermediate Protobuf schema model as pretty JSON
    #[arg(long)]
    model_json: bool,
}

/// A sample module exercising most constructs: an enum, a constrained
/// scalar, a sequence, a choice, a sequence-of and a constant.
fn sample() -> Asn {
    let mut module = Module::new("Sample-Protocol", "sample-protocol.asn1");
    module.oid = Some(Oid {
        arcs: vec![OidArc::named("iso", 1), OidArc::named("standard", 0), OidArc::number(9571)],
    });

    let mut color = TypeExpr::named("Color", MetaKind::Type, SyntaxKind::Enumerated);
    for (name, index) in [("red", 0), ("green", 1), ("blue", 2)] {
        let mut entry = TypeExpr::named(name, MetaKind::Value, SyntaxKind::EnumValue);
        entry.value = Some(Value::Integer(index));
        color.members.push(entry);
    }
    module.members.push(color);

    let mut priority = TypeExpr::named("Priority", MetaKind::Type, SyntaxKind::Integer);
    priority.constraints = Some(Constraint::range(Value::Integer(0), Value::Integer(255)));
    module.members.push(priority);

    let mut header = TypeExpr::named("PduHeader", MetaKind::Type, SyntaxKind::Sequence);
    let mut id = TypeExpr::named("id", MetaKind::Type, SyntaxKind::Integer);
    id.constraints = Some(Constraint::range(Value::Integer(0), Value::Integer(65535)));
    header.members.push(id);
    let mut urgent = TypeExpr::named("urgent", MetaKind::Type, SyntaxKind::Boolean);
    urgent.marker = Marker::optional();
    header.members.push(urgent);
    let mut label = TypeExpr::named("label", MetaKind::Type, SyntaxKind::Utf8String);
    label.constraints = Some(Constraint::Size(Box::new(Constraint::range(
        Value::Integer(1),
        Value::Integer(32),
    ))));
    header.members.push(label);
    module.members.push(header);

    let mut payload = TypeExpr::named("Payload", MetaKind::Type, SyntaxKind::Choice);
    payload.members.push(TypeExpr::named("raw", MetaKind::Type, SyntaxKind::OctetString));
    let mut text = TypeExpr::named("text", MetaKind::Type, SyntaxKind::Utf8String);
    text.constraints = Some(Constraint::Size(Box::new(Constraint::range(
        Value::Integer(0),
        Value::Integer(1024),
    ))));
    payload.members.push(text);
    module.members.push(payload);

    let mut list = TypeExpr::named("PduList", MetaKind::Type, SyntaxKind::Sequence);
    let mut items = TypeExpr::named("items", MetaKind::Type, SyntaxKind::SequenceOf);
    let mut element = TypeExpr::new(MetaKind::Type, SyntaxKind::Reference);
    element.reference = Some(Ref::new("PduHeader"));
    items.members.push(element);
    list.members.push(items);
    module.members.push(list);

    let mut max_pdus = TypeExpr::named("maxPdus", MetaKind::Value, SyntaxKind::Integer);
    max_pdus.value = Some(Value::Integer(64));
    module.members.push(max_pdus);

    Asn::new(vec![module])
}

fn main() -> Result<(), EmitError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let asn = sample();
    let res = ModuleResolver::new(&asn);

    if cli.model_json {
        for module in &asn.modules {
            let mut schema = build_module(module, &res)?;
            dedup_nested(&mut schema);
            let json = serde_json::to_string_pretty(&schema).expect("serialize failed");
            println!("{}", json);
        }
        return Ok(());
    }

    let mut flags = match cli.dialect {
        Dialect::Asn1 => Flags::NONE,
        Dialect::Dtd => Flags::PRINT_XML_DTD,
        Dialect::Proto => Flags::PRINT_PROTOBUF,
    };
    if cli.constraints {
        flags |= Flags::PRINT_CONSTRAINTS;
    }
    if cli.class_matrix {
        flags |= Flags::PRINT_CLASS_MATRIX;
    }
    if cli.line_comments {
        flags |= Flags::LINE_COMMENTS;
    }

    print!("{}", print_asn(&asn, &res, flags)?);
    Ok(())
}
