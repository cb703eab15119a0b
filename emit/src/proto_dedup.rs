//! Structural deduplication of nested messages. A nested message whose
//! field list matches a top-level message is dropped and every field that
//! referenced it is retargeted at the top-level one.

use crate::naming::{to_snake_case, SnakeCase};
use crate::proto_model::{ProtoMessage, ProtoModule};

pub type SignatureFn = fn(&ProtoMessage) -> String;

/// Canonical structural signature: the ordered (type, normalized name,
/// ordinal, rule) tuples of the field list. Messages with the same
/// signature carry the same wire shape.
pub fn message_signature(msg: &ProtoMessage) -> String {
    let mut sig = String::new();
    for (i, field) in msg.fields.iter().enumerate() {
        sig.push_str(&field.type_name);
        sig.push('|');
        sig.push_str(&to_snake_case(&field.name, SnakeCase::Lower));
        sig.push('|');
        sig.push_str(&(i + 1).to_string());
        sig.push('|');
        if let Some(rule) = &field.rule {
            sig.push_str(rule);
        }
        sig.push(';');
    }
    for oneof in &msg.oneofs {
        sig.push_str("oneof{");
        for (i, field) in oneof.fields.iter().enumerate() {
            sig.push_str(&field.type_name);
            sig.push('|');
            sig.push_str(&to_snake_case(&field.name, SnakeCase::Lower));
            sig.push('|');
            sig.push_str(&(i + 1).to_string());
            sig.push(';');
        }
        sig.push('}');
    }
    sig
}

pub fn dedup_nested(module: &mut ProtoModule) {
    dedup_nested_with(module, message_signature);
}

/// The signature function is pluggable so the string comparison can be
/// swapped for a structural hash if module sizes ever warrant it.
pub fn dedup_nested_with(module: &mut ProtoModule, sig: SignatureFn) {
    let top: Vec<(String, String)> = module
        .messages
        .iter()
        .map(|m| (m.name.clone(), sig(m)))
        .collect();
    for msg in &mut module.messages {
        let mut kept = Vec::new();
        for nested in std::mem::take(&mut msg.nested) {
            // A fieldless nested message would match every fieldless
            // top-level message; leave those alone.
            let nested_sig = sig(&nested);
            let canonical = if nested.fields.is_empty() && nested.oneofs.is_empty() {
                None
            } else {
                top.iter()
                    .find(|(name, s)| *s == nested_sig && *name != msg.name)
                    .map(|(name, _)| name.clone())
            };
            match canonical {
                Some(name) => {
                    // The referencing entry becomes a direct reference to
                    // the canonical message: both its type and its name.
                    for field in &mut msg.fields {
                        if field.type_name == nested.name {
                            field.type_name = name.clone();
                            field.name = name.clone();
                        }
                    }
                    for oneof in &mut msg.oneofs {
                        for field in &mut oneof.fields {
                            if field.type_name == nested.name {
                                field.type_name = name.clone();
                                field.name = name.clone();
                            }
                        }
                    }
                }
                None => kept.push(nested),
            }
        }
        msg.nested = kept;
    }
}
