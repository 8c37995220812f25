//! Materialized instances and their read-only projections.
//!
//! An [`Instance`] is a handle: the exact descriptor it was built with (its
//! *dynamic* type, which may be a more specific union member than the
//! declared field type) plus a shared interior node holding the data.
//! Cloning the handle is cheap and shares the node; [`deep_clone`]
//! (crate-internal) materializes a fresh subtree when construction needs
//! exclusively-owned children.
//!
//! [`Instance::as_read_only`] produces the deep read-only projection:
//! read-only status is a property of the handle, not the descriptor, and
//! every child retrieved through a read-only handle is itself read-only.
//! Mutation through such a handle fails with
//! [`MutateError::ReadOnly`](crate::MutateError::ReadOnly) — never a
//! silent no-op — while the underlying data stays shared with the mutable
//! origin.
//!
//! In-place mutation (`set`, `set_at`, `push`) re-runs exactly the
//! validation construction uses; an illegal value leaves the target
//! unmodified.
//!
//! [`deep_clone`]: Instance::deep_clone

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::Value;

use crate::construct::{self, Raw};
use crate::error::MutateError;
use crate::report::{self, Level};
use crate::types::{TypeKind, TypeRef};

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Null,
    Str(String),
    Num(f64),
    Bool(bool),
    Composite(Vec<(String, Instance)>),
    List(Vec<Instance>),
    Map(Vec<(Instance, Instance)>),
    /// A value that failed to resolve against any candidate type, kept in
    /// place unmodified.
    Raw(Value),
}

/// A value conforming to a type descriptor.
#[derive(Debug, Clone)]
pub struct Instance {
    ty: TypeRef,
    node: Arc<RwLock<Node>>,
    read_only: bool,
}

impl Instance {
    pub(crate) fn new(ty: TypeRef, node: Node) -> Self {
        Self {
            ty,
            node: Arc::new(RwLock::new(node)),
            read_only: false,
        }
    }

    pub(crate) fn node(&self) -> RwLockReadGuard<'_, Node> {
        self.node.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn node_mut(&self) -> RwLockWriteGuard<'_, Node> {
        self.node.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The dynamic type this instance was built with.
    pub fn type_of(&self) -> &TypeRef {
        &self.ty
    }

    /// Display name of the dynamic type.
    pub fn type_name(&self) -> String {
        self.ty.display_name()
    }

    /// Whether this handle is a read-only projection.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Deep read-only projection of this instance.
    ///
    /// Shares the underlying data; every descendant retrieved through the
    /// projection is itself read-only, and no path through the projected
    /// subgraph recovers mutability. Idempotent: re-applying to an already
    /// read-only handle is observationally a no-op.
    pub fn as_read_only(&self) -> Instance {
        Instance {
            ty: self.ty.clone(),
            node: self.node.clone(),
            read_only: true,
        }
    }

    /// Whether the value is `null`.
    pub fn is_null(&self) -> bool {
        matches!(&*self.node(), Node::Null)
    }

    /// String value, if this is a string primitive.
    pub fn as_str(&self) -> Option<String> {
        match &*self.node() {
            Node::Str(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Numeric value, if this is a number primitive.
    pub fn as_number(&self) -> Option<f64> {
        match &*self.node() {
            Node::Num(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean primitive.
    pub fn as_bool(&self) -> Option<bool> {
        match &*self.node() {
            Node::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Field value of a composite, by name.
    pub fn get(&self, field: &str) -> Option<Instance> {
        match &*self.node() {
            Node::Composite(fields) => fields
                .iter()
                .find(|(name, _)| name == field)
                .map(|(_, child)| self.propagate(child)),
            _ => None,
        }
    }

    /// Element of a list, by index.
    pub fn at(&self, index: usize) -> Option<Instance> {
        match &*self.node() {
            Node::List(items) => items.get(index).map(|child| self.propagate(child)),
            _ => None,
        }
    }

    /// Number of list elements, map entries, or composite fields.
    pub fn len(&self) -> usize {
        match &*self.node() {
            Node::List(items) => items.len(),
            Node::Map(entries) => entries.len(),
            Node::Composite(fields) => fields.len(),
            _ => 0,
        }
    }

    /// Whether [`len`](Self::len) is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map entries in insertion order.
    pub fn entries(&self) -> Vec<(Instance, Instance)> {
        match &*self.node() {
            Node::Map(entries) => entries
                .iter()
                .map(|(key, value)| (self.propagate(key), self.propagate(value)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Map value for a structurally matching key.
    pub fn entry(&self, key: impl Into<Raw>) -> Option<Instance> {
        let key = key.into();
        match &*self.node() {
            Node::Map(entries) => entries
                .iter()
                .find(|(existing, _)| raw_matches(existing, &key))
                .map(|(_, value)| self.propagate(value)),
            _ => None,
        }
    }

    /// Assigns a composite field, re-running the validation used at
    /// construction. Illegal values are reported and leave the field
    /// unchanged; read-only handles are rejected.
    pub fn set(&self, field: &str, raw: impl Into<Raw>) -> Result<(), MutateError> {
        if self.read_only {
            return Err(self.reject_read_only(&format!("{}.{field}", self.type_name())));
        }
        if self.ty.kind() != TypeKind::Composite {
            return Err(MutateError::Unsupported(self.type_name()));
        }
        let field_def = self
            .ty
            .field(field)
            .cloned()
            .ok_or_else(|| MutateError::UnknownField(field.to_string()))?;

        let resolved = construct::resolve_for_field(&self.ty, &field_def, raw.into());
        if let Some(message) = resolved.error {
            return Err(MutateError::IllegalValue(message));
        }

        if let Node::Composite(fields) = &mut *self.node_mut() {
            if let Some(slot) = fields.iter_mut().find(|(name, _)| name == field) {
                slot.1 = resolved.instance;
            }
        }
        Ok(())
    }

    /// Replaces a list element, re-running element validation.
    pub fn set_at(&self, index: usize, raw: impl Into<Raw>) -> Result<(), MutateError> {
        let resolved = self.resolve_list_element(raw.into())?;
        match &mut *self.node_mut() {
            Node::List(items) => {
                if index >= items.len() {
                    return Err(MutateError::OutOfBounds(index, items.len()));
                }
                items[index] = resolved;
                Ok(())
            }
            _ => Err(MutateError::Unsupported(self.type_name())),
        }
    }

    /// Appends a list element, re-running element validation.
    pub fn push(&self, raw: impl Into<Raw>) -> Result<(), MutateError> {
        let resolved = self.resolve_list_element(raw.into())?;
        match &mut *self.node_mut() {
            Node::List(items) => {
                items.push(resolved);
                Ok(())
            }
            _ => Err(MutateError::Unsupported(self.type_name())),
        }
    }

    fn resolve_list_element(&self, raw: Raw) -> Result<Instance, MutateError> {
        if self.read_only {
            return Err(self.reject_read_only(&self.type_name()));
        }
        if self.ty.kind() != TypeKind::List {
            return Err(MutateError::Unsupported(self.type_name()));
        }
        let resolved = construct::resolve_for_list(&self.ty, raw);
        match resolved.error {
            Some(message) => Err(MutateError::IllegalValue(message)),
            None => Ok(resolved.instance),
        }
    }

    fn reject_read_only(&self, target: &str) -> MutateError {
        report::report(
            Level::Error,
            "core3.Type",
            &format!("Attempt to override a read only value {target}"),
        );
        MutateError::ReadOnly(target.to_string())
    }

    /// Exports the plain data tree.
    ///
    /// Composites become objects, lists become arrays, maps become objects
    /// when every key is a string and `[key, value]` pair arrays otherwise;
    /// unresolved values are passed through verbatim.
    pub fn to_json(&self) -> Value {
        match &*self.node() {
            Node::Null => Value::Null,
            Node::Str(value) => Value::String(value.clone()),
            Node::Num(value) => number_to_json(*value),
            Node::Bool(value) => Value::Bool(*value),
            Node::Composite(fields) => {
                let mut object = serde_json::Map::new();
                for (name, child) in fields {
                    object.insert(name.clone(), child.to_json());
                }
                Value::Object(object)
            }
            Node::List(items) => Value::Array(items.iter().map(Instance::to_json).collect()),
            Node::Map(entries) => {
                let all_string_keys = entries
                    .iter()
                    .all(|(key, _)| matches!(&*key.node(), Node::Str(_)));
                if all_string_keys {
                    let mut object = serde_json::Map::new();
                    for (key, value) in entries {
                        if let Node::Str(name) = &*key.node() {
                            object.insert(name.clone(), value.to_json());
                        }
                    }
                    Value::Object(object)
                } else {
                    Value::Array(
                        entries
                            .iter()
                            .map(|(key, value)| Value::Array(vec![key.to_json(), value.to_json()]))
                            .collect(),
                    )
                }
            }
            Node::Raw(value) => value.clone(),
        }
    }

    /// Fresh, exclusively-owned copy of the whole subtree.
    pub(crate) fn deep_clone(&self) -> Instance {
        let node = match &*self.node() {
            Node::Composite(fields) => Node::Composite(
                fields
                    .iter()
                    .map(|(name, child)| (name.clone(), child.deep_clone()))
                    .collect(),
            ),
            Node::List(items) => Node::List(items.iter().map(Instance::deep_clone).collect()),
            Node::Map(entries) => Node::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.deep_clone(), value.deep_clone()))
                    .collect(),
            ),
            scalar => scalar.clone(),
        };
        Instance::new(self.ty.clone(), node)
    }

    /// JS-style string coercion of the value, used in diagnostics.
    pub(crate) fn coercion_string(&self) -> String {
        match &*self.node() {
            Node::Null => "null".to_string(),
            Node::Str(value) => value.clone(),
            Node::Num(value) => construct::js_number_string(*value),
            Node::Bool(value) => value.to_string(),
            Node::Composite(_) | Node::Map(_) => "[object Object]".to_string(),
            Node::List(items) => items
                .iter()
                .map(Instance::coercion_string)
                .collect::<Vec<_>>()
                .join(","),
            Node::Raw(value) => construct::js_value_string(value),
        }
    }

    fn propagate(&self, child: &Instance) -> Instance {
        Instance {
            ty: child.ty.clone(),
            node: child.node.clone(),
            read_only: child.read_only || self.read_only,
        }
    }
}

fn raw_matches(existing: &Instance, key: &Raw) -> bool {
    match key {
        Raw::Instance(instance) => existing == instance,
        Raw::Json(value) => &existing.to_json() == value,
        _ => false,
    }
}

fn number_to_json(value: f64) -> Value {
    if value.fract() == 0.0 && value.is_finite() && value.abs() <= i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

impl PartialEq for Instance {
    /// Structural equality: same dynamic type name and equal data. Two
    /// handles over the same node are always equal regardless of their
    /// read-only flags.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.node, &other.node) {
            return true;
        }
        self.type_name() == other.type_name() && node_eq(&self.node(), &other.node())
    }
}

fn node_eq(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Null, Node::Null) => true,
        (Node::Str(x), Node::Str(y)) => x == y,
        (Node::Num(x), Node::Num(y)) => x == y,
        (Node::Bool(x), Node::Bool(y)) => x == y,
        (Node::Composite(xs), Node::Composite(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(name, child)| {
                    ys.iter()
                        .find(|(other, _)| other == name)
                        .is_some_and(|(_, peer)| child == peer)
                })
        }
        (Node::List(xs), Node::List(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x == y)
        }
        (Node::Map(xs), Node::Map(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .zip(ys)
                    .all(|((xk, xv), (yk, yv))| xk == yk && xv == yv)
        }
        (Node::Raw(x), Node::Raw(y)) => x == y,
        _ => false,
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coercion_string())
    }
}
