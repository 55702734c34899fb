//! JSON to AON encoding.

use crate::{
    error::{Error, Result},
    schema::{self, FieldType, Schema, Schemas},
};
use serde_json::{Map, Value};

/// Encodes a JSON value as an AON document with the root schema `root`.
pub fn encode(value: &Value, root: &str) -> Result<String> {
    if !schema::is_valid_root_name(root) {
        return Err(Error::InvalidRootName(root.to_owned()));
    }

    let (rows, is_list) = match value {
        Value::Object(object) => (vec![object], false),
        Value::Array(items) if items.is_empty() => return Err(Error::EmptyDocument),
        Value::Array(items) => (object_rows(items, root)?, true),
        _ => return Err(Error::InvalidRoot),
    };

    let schemas = Schemas::infer(&rows, root)?;
    let root_schema = schemas
        .get(root)
        .ok_or_else(|| Error::RootSchemaNotFound(root.to_owned()))?;

    let mut out = String::new();
    out.push_str("!aon\n");
    if is_list {
        out.push_str(&format!("count:[{}]\n", rows.len()));
    } else {
        out.push_str(&format!("count:{}\n", rows.len()));
    }

    out.push_str("schemas:{\n");
    for (name, schema) in schemas.iter() {
        out.push_str(&format!("  {}:{}\n", name, schema));
    }
    out.push_str("}\n");

    out.push_str("data:\n");
    for row in &rows {
        write_fields(&mut out, row, root_schema, &schemas)?;
        out.push('\n');
    }
    out.push_str("end\n");

    Ok(out)
}

fn object_rows<'a>(items: &'a [Value], root: &str) -> Result<Vec<&'a Map<String, Value>>> {
    if !items.iter().any(Value::is_object) {
        return Err(Error::RootSchemaNotFound(root.to_owned()));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.as_object().ok_or(Error::NonObjectRow(i + 1)))
        .collect()
}

fn write_fields(
    out: &mut String,
    object: &Map<String, Value>,
    schema: &Schema,
    schemas: &Schemas,
) -> Result<()> {
    for (i, field) in schema.fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, object.get(&field.name), &field.ty, schemas)?;
    }
    Ok(())
}

fn write_value(
    out: &mut String,
    value: Option<&Value>,
    ty: &FieldType,
    schemas: &Schemas,
) -> Result<()> {
    match (value, ty) {
        (None, _) | (Some(Value::Null), _) => out.push('_'),
        (Some(Value::Object(object)), FieldType::Schema(name)) => match schemas.get(name) {
            Some(schema) => {
                out.push('(');
                write_fields(out, object, schema, schemas)?;
                out.push(')');
            }
            None => out.push('_'),
        },
        (Some(Value::Array(items)), FieldType::List(inner)) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(" ; ");
                }
                write_value(out, Some(item), inner, schemas)?;
            }
            out.push(']');
        }
        (Some(value), ty) => write_scalar(out, value, ty)?,
    }
    Ok(())
}

fn write_scalar(out: &mut String, value: &Value, ty: &FieldType) -> Result<()> {
    match value {
        Value::Bool(value) => out.push_str(if *value { "true" } else { "false" }),
        Value::Number(value) => out.push_str(&value.to_string()),
        Value::String(value) if *ty == FieldType::String && is_bare(value) => out.push_str(value),
        Value::String(value) => out.push_str(&serde_json::to_string(value)?),
        Value::Null | Value::Array(_) | Value::Object(_) => out.push('_'),
    }
    Ok(())
}

/// Digit-only strings (zip codes, document numbers) are written unquoted in
/// string fields.
fn is_bare(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
