//! AON to JSON decoding.

use crate::{
    error::{Error, Result},
    schema::{Field, FieldType, Schema, Schemas},
    split::split_top_level,
};
use serde_json::{Map, Number, Value};

/// Decodes an AON document into a JSON value.
pub fn decode(aon: &str) -> Result<Value> {
    Document::parse(aon)?.into_value()
}

/// The `count:` header line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Count {
    rows: usize,
    /// `count:[N]`, the document root is an array.
    list: bool,
}

#[derive(Debug)]
struct Document<'a> {
    count: Option<Count>,
    schemas: Schemas,
    rows: Vec<&'a str>,
}

enum Section {
    Header,
    Schemas,
    Data,
}

impl<'a> Document<'a> {
    fn parse(aon: &'a str) -> Result<Self> {
        let mut lines = aon.lines().map(str::trim).skip_while(|line| line.is_empty());
        if lines.next() != Some("!aon") {
            return Err(Error::MissingHeader);
        }

        let mut count = None;
        let mut schemas = Schemas::default();
        let mut rows = Vec::new();
        let mut section = Section::Header;
        let mut ended = false;

        for line in lines {
            match section {
                Section::Header => match line {
                    "" => {}
                    "schemas:{" => section = Section::Schemas,
                    "data:" => section = Section::Data,
                    _ => match line.strip_prefix("count:") {
                        Some(value) => count = Some(parse_count(value)?),
                        None => return Err(Error::UnexpectedLine(line.to_owned())),
                    },
                },
                Section::Schemas => match line {
                    "" => {}
                    "}" => section = Section::Header,
                    _ => {
                        let (name, schema) = parse_schema(line)?;
                        schemas.insert(name, schema);
                    }
                },
                Section::Data => {
                    if line == "end" {
                        ended = true;
                        break;
                    }
                    rows.push(line);
                }
            }
        }

        if schemas.is_empty() {
            return Err(Error::NoSchemas);
        }
        if !ended {
            return Err(Error::MissingEnd);
        }

        Ok(Self {
            count,
            schemas,
            rows,
        })
    }

    fn into_value(self) -> Result<Value> {
        let (_, root) = self.schemas.root().ok_or(Error::NoSchemas)?;

        let mut values = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let parts = split_top_level(row, ',');
            if parts.len() != root.fields.len() {
                return Err(Error::RowSizeMismatch {
                    row: i + 1,
                    expected: root.fields.len(),
                    found: parts.len(),
                });
            }
            values.push(decode_fields(&parts, root, &self.schemas)?);
        }

        match self.count {
            Some(count) if count.rows != values.len() => Err(Error::CountMismatch {
                expected: count.rows,
                found: values.len(),
            }),
            Some(Count { list: true, .. }) => Ok(Value::Array(values)),
            _ if values.len() == 1 => Ok(values.swap_remove(0)),
            _ => Ok(Value::Array(values)),
        }
    }
}

fn parse_count(value: &str) -> Result<Count> {
    let malformed = || Error::MalformedCount(value.to_owned());
    let (digits, list) = match value.strip_prefix('[') {
        Some(rest) => (rest.strip_suffix(']').ok_or_else(malformed)?, true),
        None => (value, false),
    };
    let rows = digits.trim().parse().map_err(|_| malformed())?;

    Ok(Count { rows, list })
}

fn parse_schema(line: &str) -> Result<(String, Schema)> {
    let malformed = || Error::MalformedSchema(line.to_owned());
    let (name, rest) = line.split_once(":(").ok_or_else(malformed)?;
    let body = rest.strip_suffix(')').ok_or_else(malformed)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed());
    }

    let fields = if body.trim().is_empty() {
        Vec::new()
    } else {
        body.split(',')
            .map(|definition| {
                let (field, ty) = definition.split_once(':').ok_or_else(malformed)?;
                Ok(Field {
                    name: field.trim().to_owned(),
                    ty: FieldType::parse(ty),
                })
            })
            .collect::<Result<_>>()?
    };

    Ok((name.to_owned(), Schema { fields }))
}

fn decode_fields(parts: &[&str], schema: &Schema, schemas: &Schemas) -> Result<Value> {
    let mut object = Map::new();
    for (field, part) in schema.fields.iter().zip(parts) {
        object.insert(field.name.clone(), decode_value(part, &field.ty, schemas)?);
    }
    Ok(Value::Object(object))
}

fn decode_value(token: &str, ty: &FieldType, schemas: &Schemas) -> Result<Value> {
    let token = token.trim();
    if token.is_empty() || token == "_" {
        return Ok(Value::Null);
    }
    if token.starts_with('"') {
        let text = serde_json::from_str::<String>(token).unwrap_or_else(|_| token.to_owned());
        return Ok(Value::String(text));
    }

    match ty {
        FieldType::List(inner) => {
            if let Some(body) = enclosed(token, '[', ']') {
                return split_top_level(body, ';')
                    .into_iter()
                    .map(|item| decode_value(item, inner, schemas))
                    .collect::<Result<_>>()
                    .map(Value::Array);
            }
        }
        FieldType::Schema(name) => {
            if let (Some(schema), Some(body)) = (schemas.get(name), enclosed(token, '(', ')')) {
                let parts = split_top_level(body, ',');
                if parts.len() != schema.fields.len() {
                    return Err(Error::ObjectSizeMismatch {
                        schema: name.clone(),
                        expected: schema.fields.len(),
                        found: parts.len(),
                    });
                }
                return decode_fields(&parts, schema, schemas);
            }
        }
        FieldType::String if token.bytes().all(|b| b.is_ascii_digit()) => {
            return Ok(Value::String(token.to_owned()));
        }
        _ => {}
    }

    Ok(decode_bare(token))
}

/// Decodes an unquoted scalar by its shape.
fn decode_bare(token: &str) -> Value {
    match token {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => serde_json::from_str::<Number>(token)
            .map(Value::Number)
            .unwrap_or_else(|_| Value::String(token.to_owned())),
    }
}

fn enclosed(token: &str, open: char, close: char) -> Option<&str> {
    token.strip_prefix(open)?.strip_suffix(close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_single_object() {
        let aon = "!aon\ncount:1\nschemas:{\n  Person:(name:string)\n}\ndata:\n\"x\"\nend\n";
        assert_eq!(decode(aon).unwrap(), json!({ "name": "x" }));
    }

    #[test]
    fn decodes_nested_rows() {
        let aon = r#"
            !aon
            count:[1]
            schemas:{
              users:(id:number,nome:string,profile:profile)
              profile:(idade:number,enderecos:list<enderecos>)
              enderecos:(cep:string,rua:string)
            }
            data:
            1,"Alice",(30,[(06114020,"Rua das Dores") ; (06114021,"Rua Azul")])
            end
        "#;

        assert_eq!(
            decode(aon).unwrap(),
            json!([{
                "id": 1,
                "nome": "Alice",
                "profile": {
                    "idade": 30,
                    "enderecos": [
                        { "cep": "06114020", "rua": "Rua das Dores" },
                        { "cep": "06114021", "rua": "Rua Azul" },
                    ],
                },
            }]),
        );
    }

    #[test]
    fn decodes_values_by_shape_when_types_disagree() {
        let aon = "!aon\nschemas:{\n  R:(a:number,b:string,c:boolean,d:list<number>)\n}\n\
                   data:\n\"x\",true,_,[1 ; _ ; \"y\"]\n2.5,-3,false,[]\nend\n";
        assert_eq!(
            decode(aon).unwrap(),
            json!([
                { "a": "x", "b": true, "c": null, "d": [1, null, "y"] },
                { "a": 2.5, "b": -3, "c": false, "d": [] },
            ]),
        );
    }

    #[test]
    fn zero_field_schemas_have_empty_rows() {
        let aon = "!aon\ncount:[2]\nschemas:{\n  E:()\n}\ndata:\n\n\nend\n";
        assert_eq!(decode(aon).unwrap(), json!([{}, {}]));
    }

    #[test]
    fn rejects_malformed_documents() {
        let cases = [
            ("", "missing !aon header"),
            ("Person{name:\"x\"}", "missing !aon header"),
            ("!aon\ndata:\nend\n", "no schemas found"),
            ("!aon\nschemas:{\n  P(name:string)\n}\n", "malformed schema line 'P(name:string)'"),
            ("!aon\nschemas:{\n  P:(name)\n}\n", "malformed schema line 'P:(name)'"),
            ("!aon\nschemas:{\n  P:(a:number)\n}\ndata:\n1\n", "missing end marker"),
            ("!aon\nversion:2\n", "unexpected line 'version:2'"),
            ("!aon\ncount:x\n", "malformed count line 'count:x'"),
            (
                "!aon\nschemas:{\n  P:(a:number)\n}\ndata:\n1,2\nend\n",
                "data row 1 size mismatch: expected 1, got 2",
            ),
            (
                "!aon\ncount:2\nschemas:{\n  P:(a:number)\n}\ndata:\n1\nend\n",
                "count mismatch: header says 2, found 1",
            ),
            (
                "!aon\nschemas:{\n  P:(a:Q)\n  Q:(x:number,y:number)\n}\ndata:\n(1)\nend\n",
                "object of schema 'Q' size mismatch: expected 2, got 1",
            ),
        ];
        for (aon, message) in &cases {
            assert_eq!(decode(aon).unwrap_err().to_string(), *message);
        }
    }
}
