//! The YAML, JSON and TOML readers. Each converts its parser's value type into a
//! [`Value`] and hands it to [`build`], so all three agree on the tree shape:
//!
//! - a scalar inside a node body is an entry,
//! - a mapping (or an empty value) is a child node tagged with its key; the
//!   configurator reads an empty one whose key names no type as an empty entry,
//! - a sequence yields one child per mapping element and one repeated entry per
//!   scalar element.

use super::{ConfigNode, Document, KEY_SET_KEY, VARIABLES_KEY, Variables};
use crate::error::{Error, Result};

/// Parser-neutral document value. Mappings keep document order and may repeat keys.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Value {
    Null,
    Scalar(String),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "empty value",
            Self::Scalar(_) => "scalar",
            Self::List(_) => "sequence",
            Self::Map(_) => "mapping",
        }
    }
}

/// Structural errors are found after the parser has discarded positions, so they carry
/// line and column 0.
fn shape_error(format: &'static str, message: String) -> Error {
    Error::Parse {
        format,
        line: 0,
        column: 0,
        message,
    }
}

/// Turns a whole-document value into a [`Document`].
pub(super) fn build(format: &'static str, root: Value) -> Result<Document> {
    let entries = match root {
        Value::Null => Vec::new(),
        Value::Map(entries) => entries,
        Value::List(items) => {
            let mut entries = Vec::new();
            for item in items {
                match item {
                    Value::Map(more) => entries.extend(more),
                    other => {
                        return Err(shape_error(
                            format,
                            format!("document sequence holds a {}, expected mappings", other.kind()),
                        ));
                    }
                }
            }
            entries
        }
        Value::Scalar(_) => {
            return Err(shape_error(
                format,
                "document root must be a mapping or a sequence of mappings".to_string(),
            ));
        }
    };

    let mut document = Document::default();
    // Reserved keys first, so variables defined anywhere apply everywhere.
    let mut nodes = Vec::new();
    for (key, value) in entries {
        if key == KEY_SET_KEY || key == VARIABLES_KEY {
            reserved(format, &mut document, &key, value)?;
        } else {
            nodes.push((key, value));
        }
    }

    for (tag, value) in nodes {
        push_nodes(format, &document.variables, tag, value, &mut document.roots)?;
    }
    Ok(document)
}

fn reserved(format: &'static str, document: &mut Document, key: &str, value: Value) -> Result<()> {
    match (key, value) {
        (KEY_SET_KEY, Value::Scalar(text)) => document.key_set = Some(text.parse()?),
        (VARIABLES_KEY, Value::Map(vars)) => {
            for (name, value) in vars {
                match value {
                    Value::Scalar(text) => document.variables.define(name, &text),
                    Value::Null => document.variables.define(name, ""),
                    other => {
                        return Err(shape_error(
                            format,
                            format!("variable '{name}' must be a scalar, found a {}", other.kind()),
                        ));
                    }
                }
            }
        }
        (_, other) => {
            return Err(shape_error(
                format,
                format!("'{key}' cannot be a {}", other.kind()),
            ));
        }
    }
    Ok(())
}

fn push_nodes(
    format: &'static str,
    vars: &Variables,
    tag: String,
    value: Value,
    out: &mut Vec<ConfigNode>,
) -> Result<()> {
    match value {
        Value::Null => out.push(ConfigNode::new(tag)),
        Value::Map(body) => out.push(node(format, vars, tag, body)?),
        Value::List(items) => {
            for item in items {
                match item {
                    Value::Null | Value::Map(_) => push_nodes(format, vars, tag.clone(), item, out)?,
                    other => {
                        return Err(shape_error(
                            format,
                            format!("'{tag}' lists a {}, expected blocks", other.kind()),
                        ));
                    }
                }
            }
        }
        Value::Scalar(_) => {
            return Err(shape_error(
                format,
                format!("top-level '{tag}' must be a block, found a scalar"),
            ));
        }
    }
    Ok(())
}

fn node(
    format: &'static str,
    vars: &Variables,
    tag: String,
    body: Vec<(String, Value)>,
) -> Result<ConfigNode> {
    let mut node = ConfigNode::new(tag);
    for (key, value) in body {
        match value {
            Value::Scalar(text) => node.entries.push((key, vars.expand(&text).into_owned())),
            Value::Null => node.children.push(ConfigNode::new(key)),
            Value::Map(child) => node.children.push(self::node(format, vars, key, child)?),
            Value::List(items) => {
                for item in items {
                    match item {
                        Value::Scalar(text) => {
                            node.entries.push((key.clone(), vars.expand(&text).into_owned()));
                        }
                        Value::Null => node.children.push(ConfigNode::new(key.clone())),
                        Value::Map(child) => {
                            node.children.push(self::node(format, vars, key.clone(), child)?);
                        }
                        Value::List(_) => {
                            return Err(shape_error(
                                format,
                                format!("'{}.{key}' nests a sequence in a sequence", node.tag),
                            ));
                        }
                    }
                }
            }
        }
    }
    Ok(node)
}

/// 1-based line and column of a byte offset.
pub(super) fn position(text: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &text[..end];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before, |idx| &before[idx + 1..])
        .chars()
        .count()
        + 1;
    (line, column)
}

fn yaml_value(value: serde_yaml::Value) -> Result<Value> {
    use serde_yaml::Value as Y;
    Ok(match value {
        Y::Null => Value::Null,
        Y::Bool(b) => Value::Scalar(b.to_string()),
        Y::Number(n) => Value::Scalar(n.to_string()),
        Y::String(s) => Value::Scalar(s),
        Y::Sequence(items) => Value::List(items.into_iter().map(yaml_value).collect::<Result<_>>()?),
        Y::Mapping(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, value) in map {
                let key = match yaml_value(key)? {
                    Value::Scalar(key) => key,
                    other => {
                        return Err(shape_error(
                            "yaml",
                            format!("mapping key must be a scalar, found a {}", other.kind()),
                        ));
                    }
                };
                entries.push((key, yaml_value(value)?));
            }
            Value::Map(entries)
        }
        Y::Tagged(tagged) => yaml_value(tagged.value)?,
    })
}

pub(super) fn read_yaml(text: &str) -> Result<Document> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| {
        let (line, column) = e.location().map_or((0, 0), |l| (l.line(), l.column()));
        Error::Parse {
            format: "yaml",
            line,
            column,
            message: e.to_string(),
        }
    })?;
    build("yaml", yaml_value(value)?)
}

fn json_value(value: serde_json::Value) -> Value {
    use serde_json::Value as J;
    match value {
        J::Null => Value::Null,
        J::Bool(b) => Value::Scalar(b.to_string()),
        J::Number(n) => Value::Scalar(n.to_string()),
        J::String(s) => Value::Scalar(s),
        J::Array(items) => Value::List(items.into_iter().map(json_value).collect()),
        J::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, json_value(v))).collect()),
    }
}

pub(super) fn read_json(text: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| Error::Parse {
        format: "json",
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    build("json", json_value(value))
}

fn toml_value(value: toml::Value) -> Value {
    use toml::Value as T;
    match value {
        T::String(s) => Value::Scalar(s),
        T::Integer(i) => Value::Scalar(i.to_string()),
        T::Float(f) => Value::Scalar(f.to_string()),
        T::Boolean(b) => Value::Scalar(b.to_string()),
        T::Datetime(d) => Value::Scalar(d.to_string()),
        T::Array(items) => Value::List(items.into_iter().map(toml_value).collect()),
        T::Table(table) => {
            Value::Map(table.into_iter().map(|(k, v)| (k, toml_value(v))).collect())
        }
    }
}

pub(super) fn read_toml(text: &str) -> Result<Document> {
    let table: toml::Table = toml::from_str(text).map_err(|e| {
        let (line, column) = e.span().map_or((0, 0), |span| position(text, span.start));
        Error::Parse {
            format: "toml",
            line,
            column,
            message: e.message().to_string(),
        }
    })?;
    build("toml", toml_value(toml::Value::Table(table)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_counts_from_one() {
        let text = "a = 1\nbb = [\n";
        assert_eq!(position(text, 0), (1, 1));
        assert_eq!(position(text, 8), (2, 3));
    }

    #[test]
    fn sequence_of_scalars_repeats_the_entry() {
        let root = Value::Map(vec![(
            "logger".to_string(),
            Value::Map(vec![(
                "tag".to_string(),
                Value::List(vec![
                    Value::Scalar("a".to_string()),
                    Value::Scalar("b".to_string()),
                ]),
            )]),
        )]);
        let doc = build("test", root).unwrap();
        assert_eq!(
            doc.roots[0].entries,
            vec![
                ("tag".to_string(), "a".to_string()),
                ("tag".to_string(), "b".to_string())
            ]
        );
    }
}
