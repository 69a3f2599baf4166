//! Prints a [`Schema`] as type-language text.

use std::fmt::Write;

use serde_json::Value;

use super::Schema;

pub(super) fn print_schema(schema: &Schema) -> String {
    let mut out = String::new();

    if schema.query_type != "Query" {
        let _ = writeln!(out, "schema {{\n  query: {}\n}}\n", schema.query_type);
    }

    for (i, ty) in schema.types.values().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(description) = &ty.description {
            print_description(&mut out, description, "");
        }
        let _ = writeln!(out, "type {} {{", ty.name);
        for field in ty.fields() {
            if let Some(description) = &field.description {
                print_description(&mut out, description, "  ");
            }
            let _ = write!(out, "  {}", field.name);
            if !field.args.is_empty() {
                let args: Vec<String> = field
                    .args
                    .iter()
                    .map(|arg| match &arg.default_value {
                        Some(default) => format!("{}: {} = {}", arg.name, arg.ty, print_value(default)),
                        None => format!("{}: {}", arg.name, arg.ty),
                    })
                    .collect();
                let _ = write!(out, "({})", args.join(", "));
            }
            let _ = writeln!(out, ": {}", field.ty);
        }
        out.push_str("}\n");
    }

    out
}

fn print_description(out: &mut String, description: &str, indent: &str) {
    if description.contains('\n') {
        let _ = writeln!(out, "{}\"\"\"", indent);
        for line in description.lines() {
            let _ = writeln!(out, "{}{}", indent, line);
        }
        let _ = writeln!(out, "{}\"\"\"", indent);
    } else {
        let _ = writeln!(out, "{}{}", indent, Value::String(description.to_string()));
    }
}

/// GraphQL literal syntax: like JSON, but object keys are bare names.
fn print_value(value: &Value) -> String {
    match value {
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(print_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(k, v)| format!("{}: {}", k, print_value(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        other => other.to_string(),
    }
}
