//! AON schemas and schema inference from JSON rows.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::{
    collections::{HashSet, VecDeque},
    fmt::{self, Display, Formatter},
};

/// Type names that can never be used as schema names.
const PRIMITIVES: [&str; 4] = ["null", "boolean", "number", "string"];

/// The declared type of a schema field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Null,
    Boolean,
    Number,
    String,
    /// A nested object described by the named schema.
    Schema(String),
    List(Box<FieldType>),
}

impl FieldType {
    /// Parses a type as written in a schema definition. Any name that is not
    /// a primitive or a list refers to a schema.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s {
            "null" => Self::Null,
            "boolean" => Self::Boolean,
            "number" => Self::Number,
            "string" => Self::String,
            _ => match s.strip_prefix("list<").and_then(|rest| rest.strip_suffix('>')) {
                Some(inner) => Self::List(Box::new(Self::parse(inner))),
                None => Self::Schema(s.to_owned()),
            },
        }
    }

    /// Returns the primitive type of a non-null scalar.
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(_) => Some(Self::Boolean),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::String),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean => f.write_str("boolean"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Schema(name) => f.write_str(name),
            Self::List(inner) => write!(f, "list<{}>", inner),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}

/// An ordered list of fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Display for Schema {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str("(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", field.name, field.ty)?;
        }
        f.write_str(")")
    }
}

/// All schemas of a document. The first one is the root schema.
#[derive(Clone, Debug, Default)]
pub struct Schemas {
    schemas: IndexMap<String, Schema>,
}

impl Schemas {
    /// Infers the schemas describing `rows`, with the root schema named
    /// `root` and sub-schemas in breadth-first discovery order.
    pub fn infer(rows: &[&Map<String, Value>], root: &str) -> Result<Self> {
        let mut names = PRIMITIVES
            .iter()
            .map(|name| name.to_string())
            .collect::<HashSet<_>>();
        names.insert(root.to_owned());

        let mut schemas = IndexMap::new();
        let mut pending = VecDeque::from(vec![(root.to_owned(), rows.to_vec())]);
        while let Some((name, objects)) = pending.pop_front() {
            let mut columns = IndexMap::<&str, Vec<&Value>>::new();
            for &object in &objects {
                for (key, value) in object {
                    columns.entry(key.as_str()).or_default().push(value);
                }
            }

            let mut fields = Vec::with_capacity(columns.len());
            for (field, values) in columns {
                if !is_valid_field_name(field) {
                    return Err(Error::UnsupportedFieldName(field.to_owned()));
                }
                let ty = infer_field(&name, field, &values, &mut names, &mut pending)?;
                fields.push(Field {
                    name: field.to_owned(),
                    ty,
                });
            }

            let schema = Schema { fields };
            log::trace!("inferred schema {}:{}", name, schema);
            schemas.insert(name, schema);
        }

        Ok(Self { schemas })
    }

    pub fn insert(&mut self, name: String, schema: Schema) {
        self.schemas.insert(name, schema);
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(name)
    }

    /// Returns the root schema and its name.
    pub fn root(&self) -> Option<(&str, &Schema)> {
        self.schemas
            .get_index(0)
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }
}

/// Returns whether `name` can be used as a root schema name.
pub fn is_valid_root_name(name: &str) -> bool {
    !name.is_empty()
        && !PRIMITIVES.contains(&name)
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn is_valid_field_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || ":,;()[]<>\"".contains(c))
}

type Pending<'a> = VecDeque<(String, Vec<&'a Map<String, Value>>)>;

fn infer_field<'a>(
    parent: &str,
    field: &str,
    values: &[&'a Value],
    names: &mut HashSet<String>,
    pending: &mut Pending<'a>,
) -> Result<FieldType> {
    let objects = values
        .iter()
        .filter_map(|&value| value.as_object())
        .collect::<Vec<_>>();
    let has_lists = values.iter().any(|value| value.is_array());
    if !objects.is_empty() && has_lists {
        return Err(Error::MixedField(field.to_owned()));
    }
    if !objects.is_empty() {
        let name = reserve_name(names, parent, field);
        pending.push_back((name.clone(), objects));
        return Ok(FieldType::Schema(name));
    }

    if has_lists {
        let items = values
            .iter()
            .filter_map(|&value| value.as_array())
            .flatten()
            .collect::<Vec<_>>();
        if items.iter().any(|item| item.is_array()) {
            return Err(Error::NestedList(field.to_owned()));
        }
        let objects = items
            .iter()
            .filter_map(|&item| item.as_object())
            .collect::<Vec<_>>();
        if !objects.is_empty() {
            let name = reserve_name(names, parent, field);
            pending.push_back((name.clone(), objects));
            return Ok(FieldType::List(Box::new(FieldType::Schema(name))));
        }

        let inner = scalar_type(items).unwrap_or(FieldType::String);
        return Ok(FieldType::List(Box::new(inner)));
    }

    Ok(scalar_type(values.iter().copied()).unwrap_or(FieldType::Null))
}

/// Returns the type of a column of scalars. Digit-only strings are written
/// bare in string columns, so a column mixing strings with other scalars
/// takes the first non-string type and keeps its strings quoted.
fn scalar_type<'v>(values: impl IntoIterator<Item = &'v Value>) -> Option<FieldType> {
    let mut types = values.into_iter().filter_map(FieldType::of);
    let first = types.next()?;
    if first != FieldType::String {
        return Some(first);
    }
    Some(types.find(|ty| *ty != FieldType::String).unwrap_or(first))
}

/// Reserves a schema name for `field`, qualifying it with the parent schema
/// name when it is already taken by a schema at a different path.
fn reserve_name(names: &mut HashSet<String>, parent: &str, field: &str) -> String {
    if names.insert(field.to_owned()) {
        return field.to_owned();
    }

    let qualified = format!("{}_{}", parent, field);
    let mut candidate = qualified.clone();
    let mut suffix = 2;
    while !names.insert(candidate.clone()) {
        candidate = format!("{}{}", qualified, suffix);
        suffix += 1;
    }
    candidate
}
