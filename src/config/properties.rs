//! Properties-style documents:
//!
//! ```text
//! # comment
//! key_set = legacy
//! variables.LOG_DIR = /var/log/app
//! logger.main.name = root
//! logger.main.file_writer.out.file_name = ${LOG_DIR}/app.log
//! ```
//!
//! Each `tag.id` pair names one block instance; the last segment is the key. Blocks are
//! ordered by first appearance, which is what fixes a logger's writer order here.

use super::tree::{self, Value};
use super::{Document, KEY_SET_KEY, VARIABLES_KEY};
use crate::configurator::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};

const FORMAT: &str = "properties";

/// Deepest block a path may name; the top-level block is depth 0. Building and
/// dropping the block tree recurses once per level.
const MAX_BLOCK_DEPTH: usize = DEFAULT_MAX_DEPTH as usize;

fn parse_error(line: usize, column: usize, message: impl Into<String>) -> Error {
    Error::Parse {
        format: FORMAT,
        line,
        column,
        message: message.into(),
    }
}

/// One block instance under construction.
#[derive(Debug, Default)]
struct Block {
    tag: String,
    id: String,
    entries: Vec<(String, String)>,
    children: Vec<Block>,
}

impl Block {
    fn child(&mut self, tag: &str, id: &str) -> &mut Self {
        let idx = match self
            .children
            .iter()
            .position(|c| c.tag == tag && c.id == id)
        {
            Some(idx) => idx,
            None => {
                self.children.push(Self {
                    tag: tag.to_string(),
                    id: id.to_string(),
                    ..Self::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    fn into_body(self) -> Vec<(String, Value)> {
        let mut body: Vec<(String, Value)> = self
            .entries
            .into_iter()
            .map(|(k, v)| (k, Value::Scalar(v)))
            .collect();
        body.extend(
            self.children
                .into_iter()
                .map(|c| (c.tag.clone(), Value::Map(c.into_body()))),
        );
        body
    }
}

/// A logical line (continuations joined) and where it started.
struct Logical {
    text: String,
    line: usize,
}

fn logical_lines(text: &str) -> Vec<Logical> {
    let mut out = Vec::new();
    let mut pending: Option<Logical> = None;
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let piece = if pending.is_some() {
            raw.trim_start()
        } else {
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            raw
        };
        let trailing = piece.chars().rev().take_while(|&c| c == '\\').count();
        let continues = trailing % 2 == 1;
        let piece = if continues {
            &piece[..piece.len() - 1]
        } else {
            piece
        };
        let logical = pending.get_or_insert_with(|| Logical {
            text: String::new(),
            line: line_no,
        });
        logical.text.push_str(piece);
        if !continues && let Some(done) = pending.take() {
            out.push(done);
        }
    }
    out.extend(pending);
    out
}

/// Splits at the first `=` or `:`; `::` belongs to the key (qualified type tags).
fn split(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'=' => return Some((&text[..i], &text[i + 1..])),
            b':' if bytes.get(i + 1) == Some(&b':') => i += 2,
            b':' => return Some((&text[..i], &text[i + 1..])),
            _ => i += 1,
        }
    }
    None
}

pub(super) fn read(text: &str) -> Result<Document> {
    let mut root = Block::default();
    let mut reserved: Vec<(String, Value)> = Vec::new();
    let mut variables: Vec<(String, Value)> = Vec::new();

    for logical in logical_lines(text) {
        let indent = logical.text.len() - logical.text.trim_start().len();
        let column = logical.text[..indent].chars().count() + 1;
        let Some((path, value)) = split(&logical.text) else {
            return Err(parse_error(
                logical.line,
                column,
                "expected 'key = value' or 'key: value'",
            ));
        };
        let path = path.trim();
        let value = value.trim().to_string();
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(parse_error(logical.line, column, format!("empty segment in '{path}'")));
        }

        match segments.as_slice() {
            [key] if *key == KEY_SET_KEY => {
                reserved.push(((*key).to_string(), Value::Scalar(value)));
            }
            [head, name] if *head == VARIABLES_KEY => {
                variables.push(((*name).to_string(), Value::Scalar(value)));
            }
            [rest @ .., key] if !rest.is_empty() && rest.len() % 2 == 0 => {
                let depth = rest.len() / 2 - 1;
                if depth > MAX_BLOCK_DEPTH {
                    return Err(Error::NestingTooDeep {
                        depth: u32::try_from(depth).unwrap_or(u32::MAX),
                        max: DEFAULT_MAX_DEPTH,
                    });
                }
                let mut block = &mut root;
                for pair in rest.chunks_exact(2) {
                    block = block.child(pair[0], pair[1]);
                }
                block.entries.push(((*key).to_string(), value));
            }
            _ => {
                return Err(parse_error(
                    logical.line,
                    column,
                    format!("'{path}' is not of the form tag.id(.tag.id)*.key"),
                ));
            }
        }
    }

    if !variables.is_empty() {
        reserved.push((VARIABLES_KEY.to_string(), Value::Map(variables)));
    }
    reserved.extend(root.into_body());
    tree::build(FORMAT, Value::Map(reserved))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_joins_lines() {
        let lines = logical_lines("a.b.c = one \\\n    two\n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "a.b.c = one two");
        assert_eq!(lines[0].line, 1);
    }

    #[test]
    fn deepest_allowed_path_still_reads() {
        let line = format!("{}name = x", "logger.a.".repeat(MAX_BLOCK_DEPTH + 1));
        assert_eq!(read(&line).unwrap().roots[0].depth(), MAX_BLOCK_DEPTH + 1);
    }

    #[test]
    fn qualified_tags_keep_their_colons() {
        assert_eq!(
            split("loomlog::logger.a.name = x"),
            Some(("loomlog::logger.a.name ", " x"))
        );
    }
}
