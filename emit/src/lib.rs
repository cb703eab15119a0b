//! Emitters for a parsed ASN.1 module tree: canonical notation, an XML DTD
//! approximation, and Protobuf3 schemas annotated with validation rules.
//!
//! The input tree (`asn2proto_ast`) is read-only; reference resolution and
//! constraint-range computation are consumed through the [`Resolve`] trait.
//! [`print_asn`] is the top-level dispatch over the output dialects.

pub mod dtd;
pub mod error;
pub mod flags;
pub mod naming;
pub mod printer;
pub mod proto_builder;
pub mod proto_dedup;
pub mod proto_model;
pub mod proto_output;
pub mod render;
pub mod resolve;

pub use error::EmitError;
pub use flags::Flags;
pub use printer::Ctx;
pub use resolve::{ModuleResolver, Resolve};

use asn2proto_ast::Asn;

/// Renders the whole tree in the dialect the flags select.
pub fn print_asn(asn: &Asn, res: &dyn Resolve, flags: Flags) -> Result<String, EmitError> {
    if flags.has(Flags::PRINT_PROTOBUF) {
        let mut out = String::new();
        for module in &asn.modules {
            let mut schema = proto_builder::build_module(module, res)?;
            proto_dedup::dedup_nested(&mut schema);
            out.push_str(&proto_output::emit_module(&schema));
        }
        return Ok(out);
    }
    let mut ctx = Ctx::with_resolver(flags, res);
    if flags.has(Flags::PRINT_XML_DTD) {
        dtd::print_dtd(&mut ctx, asn);
    } else {
        for module in &asn.modules {
            printer::print_module(&mut ctx, module);
        }
    }
    Ok(ctx.into_string())
}
