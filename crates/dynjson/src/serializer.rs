//! Pretty-printing serializer for [`DynamicValue`] trees.
//!
//! Output layout: every table/array opens on the current line, each member
//! sits on its own line indented one level deeper, keys are followed by `": "`,
//! and the closing bracket returns to the parent's indentation. Non-string
//! table keys are coerced with [`DynamicValue::to_key_string`].
//!
//! Before a table is written, [`ensure_no_shared_references`] walks everything
//! reachable from it. Any table or array reached twice is an error, whether
//! the graph is cyclic or merely shares a sub-object between two branches.
//! The check runs per table as it is reached, so ancestors may already be in
//! the sink when it fails; callers must discard partial output on error.

use std::collections::{HashSet, VecDeque};
use std::fmt::Write;

use crate::emitter::Emitter;
use crate::error::{Composite, JsonError, Result};
use crate::limits::Limits;
use crate::value::{Array, DynamicValue, Table};

/// Walks a value tree and drives an [`Emitter`].
pub struct Serializer<W: Write = String> {
    emitter: Emitter<W>,
    limits: Limits,
    depth: usize,
}

impl Serializer<String> {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self::with_emitter(Emitter::new(), limits)
    }
}

impl Default for Serializer<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Serializer<W> {
    pub fn with_emitter(emitter: Emitter<W>, limits: Limits) -> Self {
        Self {
            emitter,
            limits,
            depth: 0,
        }
    }

    /// Consume the serializer and return the sink.
    pub fn into_inner(self) -> W {
        self.emitter.into_inner()
    }

    pub fn serialize_value(&mut self, value: &DynamicValue) -> Result<()> {
        match value {
            DynamicValue::Number(n) => self.emitter.emit_number(*n),
            DynamicValue::String(s) => self.emitter.emit_string(s),
            DynamicValue::Boolean(b) => self.emitter.emit_boolean(*b),
            DynamicValue::TypeCode(t) => self.emitter.emit_number(f64::from(t.code())),
            DynamicValue::Table(table) => {
                ensure_no_shared_references(table)?;
                self.serialize_table(table)
            }
            DynamicValue::Array(array) => self.serialize_array(array),
            DynamicValue::Nil => self.emitter.emit_null(),
        }
    }

    fn serialize_table(&mut self, table: &Table) -> Result<()> {
        self.enter()?;

        self.emitter.emit_left_brace()?;
        self.emitter.emit_newline()?;
        self.emitter.indent();

        let pairs: Vec<_> = table.iter().collect();
        let last = pairs.len().saturating_sub(1);
        for (i, (key, value)) in pairs.iter().enumerate() {
            self.emitter.emit_indentation()?;
            match key {
                DynamicValue::String(s) => self.emitter.emit_key(s)?,
                other => self.emitter.emit_key(&other.to_key_string())?,
            }
            self.emitter.emit_space()?;
            self.serialize_value(value)?;

            if i < last {
                self.emitter.emit_comma()?;
            }
            self.emitter.emit_newline()?;
        }

        self.emitter.unindent();
        self.emitter.emit_indentation()?;
        self.emitter.emit_right_brace()?;

        self.depth -= 1;
        Ok(())
    }

    fn serialize_array(&mut self, array: &Array) -> Result<()> {
        self.enter()?;

        self.emitter.emit_left_bracket()?;
        self.emitter.emit_newline()?;
        self.emitter.indent();

        let items: Vec<_> = array.iter().collect();
        let last = items.len().saturating_sub(1);
        for (i, item) in items.iter().enumerate() {
            self.emitter.emit_indentation()?;
            self.serialize_value(item)?;

            if i < last {
                self.emitter.emit_comma()?;
            }
            self.emitter.emit_newline()?;
        }

        self.emitter.unindent();
        self.emitter.emit_indentation()?;
        self.emitter.emit_right_bracket()?;

        self.depth -= 1;
        Ok(())
    }

    fn enter(&mut self) -> Result<()> {
        if !self.limits.allows(self.depth) {
            return Err(JsonError::SerializeTooDeep {
                max_depth: self.limits.max_depth.unwrap_or(self.depth),
            });
        }
        self.depth += 1;
        Ok(())
    }
}

enum Node {
    Table(Table),
    Array(Array),
}

/// Breadth-first walk over every table and array reachable from `root`
/// through values (keys are not followed).
///
/// A single visited set of object identities is seeded with `root`; reaching
/// any identity a second time fails with [`JsonError::CircularReference`].
/// This rejects true cycles and also acyclic sharing, where one object is
/// reachable along two paths. Structurally equal but distinct objects pass.
pub fn ensure_no_shared_references(root: &Table) -> Result<()> {
    let mut visited: HashSet<usize> = HashSet::new();
    let mut queue: VecDeque<Node> = VecDeque::new();

    visited.insert(root.id());
    queue.push_back(Node::Table(root.clone()));

    while let Some(node) = queue.pop_front() {
        let values = match node {
            Node::Table(table) => table.values(),
            Node::Array(array) => array.iter().collect(),
        };

        for value in values {
            match value {
                DynamicValue::Array(array) => {
                    if !visited.insert(array.id()) {
                        return Err(JsonError::CircularReference {
                            kind: Composite::Array,
                        });
                    }
                    queue.push_back(Node::Array(array));
                }
                DynamicValue::Table(table) => {
                    if !visited.insert(table.id()) {
                        return Err(JsonError::CircularReference {
                            kind: Composite::Table,
                        });
                    }
                    queue.push_back(Node::Table(table));
                }
                _ => {}
            }
        }
    }

    Ok(())
}
