//! Instance construction: composites, containers, and element resolution.
//!
//! Construction is depth-first and permissive: data-level validation
//! failures report an `error` diagnostic and leave the offending value
//! unresolved in place, but the surrounding structure still constructs.
//! Callers that need strict rejection install a scoped reporter and
//! escalate any `error`-level report themselves.
//!
//! Container elements go through a fixed resolution ladder:
//!
//! 1. an already-typed instance is kept by reference iff it is compatible
//!    with the subtype set;
//! 2. plain data with exactly one candidate builds recursively as that
//!    candidate;
//! 3. a primitive picks the first candidate of its primitive kind;
//! 4. an object carrying a `_type` discriminator builds as the named
//!    registered type when it is a candidate member, and is rejected
//!    against that named type when it is not;
//! 5. an undiscriminated object defaults to the first composite candidate
//!    in declaration order.
//!
//! Diagnostic strings follow JS value coercion (`[object Object]`,
//! integral numbers printed without a decimal point); the exact texts are
//! a stable contract.

use std::sync::Arc;

use serde_json::Value;

use crate::compat;
use crate::error::InstanceError;
use crate::instance::{Instance, Node};
use crate::registry;
use crate::report::{self, Level};
use crate::types::{FieldDef, PrimitiveKind, TypeDef, TypeKind, TypeRef, boolean, number, string};

/// Untyped input accepted by construction.
///
/// Lists may mix plain JSON with already-built instances; maps with
/// non-string keys take explicit entry pairs.
#[derive(Debug, Clone)]
pub enum Raw {
    /// Plain JSON data.
    Json(Value),
    /// An already-built instance, kept by reference when compatible.
    Instance(Instance),
    /// List input whose elements may themselves mix kinds.
    Seq(Vec<Raw>),
    /// Map input with complex keys.
    Entries(Vec<(Raw, Raw)>),
}

impl From<Value> for Raw {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Instance> for Raw {
    fn from(instance: Instance) -> Self {
        Self::Instance(instance)
    }
}

impl From<&Instance> for Raw {
    fn from(instance: &Instance) -> Self {
        Self::Instance(instance.clone())
    }
}

impl From<Vec<Raw>> for Raw {
    fn from(elements: Vec<Raw>) -> Self {
        Self::Seq(elements)
    }
}

impl From<Vec<(Raw, Raw)>> for Raw {
    fn from(entries: Vec<(Raw, Raw)>) -> Self {
        Self::Entries(entries)
    }
}

impl From<&str> for Raw {
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<String> for Raw {
    fn from(value: String) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<f64> for Raw {
    fn from(value: f64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i64> for Raw {
    fn from(value: i64) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<i32> for Raw {
    fn from(value: i32) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<bool> for Raw {
    fn from(value: bool) -> Self {
        Self::Json(Value::from(value))
    }
}

impl TypeDef {
    /// Builds an instance of this type from raw input.
    ///
    /// Data-level validation failures are advisory (reported, construction
    /// completes); only structurally impossible constructions — untyped or
    /// poisoned containers, unresolvable references — return `Err`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core3::{list, string};
    /// use serde_json::json;
    ///
    /// let names = list().of(string()).create(json!(["a", "b"])).unwrap();
    /// assert_eq!(names.len(), 2);
    /// assert_eq!(names.at(0).unwrap().as_str().as_deref(), Some("a"));
    /// ```
    pub fn create(self: &Arc<Self>, raw: impl Into<Raw>) -> Result<Instance, InstanceError> {
        build(self, raw.into())
    }

    /// Builds a fully defaulted instance of this type.
    pub fn instantiate(self: &Arc<Self>) -> Result<Instance, InstanceError> {
        let ty = compat::resolve(self)
            .ok_or_else(|| InstanceError::UnknownType(self.name().to_string()))?;
        match ty.kind() {
            TypeKind::Invalid => Err(constructor_failure(&ty)),
            TypeKind::List if ty.subtypes().is_empty() => Err(untyped_list_failure()),
            TypeKind::Map if ty.subtypes().len() != 2 => Err(untyped_map_failure()),
            _ => Ok(default_value(&ty)),
        }
    }
}

pub(crate) fn build(ty: &TypeRef, raw: Raw) -> Result<Instance, InstanceError> {
    let ty =
        compat::resolve(ty).ok_or_else(|| InstanceError::UnknownType(ty.name().to_string()))?;
    match ty.kind() {
        TypeKind::Invalid => Err(constructor_failure(&ty)),
        TypeKind::Composite => Ok(build_composite(&ty, raw)),
        TypeKind::List => {
            if ty.subtypes().is_empty() {
                return Err(untyped_list_failure());
            }
            Ok(build_list(&ty, raw))
        }
        TypeKind::Map => {
            if ty.subtypes().len() != 2 {
                return Err(untyped_map_failure());
            }
            Ok(build_map(&ty, raw))
        }
        TypeKind::Primitive(_) | TypeKind::Union => {
            let candidates = candidate_set(&ty);
            Ok(resolve_element(&candidates, raw, "core3.Type", &ty.display_name()).instance)
        }
        // compat::resolve never returns a bare reference
        TypeKind::Reference => Err(InstanceError::UnknownType(ty.name().to_string())),
    }
}

/// Outcome of resolving one raw value against a candidate type set. The
/// instance is always usable; `error` carries the reported diagnostic when
/// the value did not fit.
pub(crate) struct Resolved {
    pub(crate) instance: Instance,
    pub(crate) error: Option<String>,
}

impl Resolved {
    fn ok(instance: Instance) -> Self {
        Self {
            instance,
            error: None,
        }
    }

    fn failed(instance: Instance, error: String) -> Self {
        Self {
            instance,
            error: Some(error),
        }
    }
}

pub(crate) fn resolve_for_field(owner: &TypeRef, field: &FieldDef, raw: Raw) -> Resolved {
    let label = format!("field {}.{}", owner.name(), field.name);
    match compat::resolve(&field.ty) {
        Some(field_ty) => {
            let candidates = candidate_set(&field_ty);
            resolve_element(&candidates, raw, "core3.Type", &label)
        }
        None => {
            let message = report_illegal(
                "core3.Type",
                &label,
                &raw_coercion_string(&raw),
                &raw_kind(&raw),
                std::slice::from_ref(&field.ty),
            );
            Resolved::failed(unresolved_from_raw(raw), message)
        }
    }
}

pub(crate) fn resolve_for_list(ty: &TypeRef, raw: Raw) -> Resolved {
    resolve_element(ty.subtypes(), raw, "core3.List", "Array")
}

fn candidate_set(ty: &TypeRef) -> Vec<TypeRef> {
    match ty.kind() {
        TypeKind::Union => ty.subtypes().to_vec(),
        _ => vec![ty.clone()],
    }
}

pub(crate) fn resolve_element(
    candidates: &[TypeRef],
    raw: Raw,
    source: &str,
    target: &str,
) -> Resolved {
    match raw {
        Raw::Instance(instance) => {
            if candidates
                .iter()
                .any(|candidate| compat::validate_type(candidate, &instance))
            {
                // kept by reference, not copied
                Resolved::ok(instance)
            } else {
                let message = report_illegal(
                    source,
                    target,
                    &instance.coercion_string(),
                    &instance.type_name(),
                    candidates,
                );
                Resolved::failed(instance, message)
            }
        }
        Raw::Seq(elements) => match first_of_kind(candidates, TypeKind::List) {
            Some(list_ty) => Resolved::ok(build_list(&list_ty, Raw::Seq(elements))),
            None => {
                let raw = Raw::Seq(elements);
                let message = report_illegal(
                    source,
                    target,
                    &raw_coercion_string(&raw),
                    "object",
                    candidates,
                );
                Resolved::failed(unresolved_from_raw(raw), message)
            }
        },
        Raw::Entries(entries) => match first_of_kind(candidates, TypeKind::Map) {
            Some(map_ty) => Resolved::ok(build_map(&map_ty, Raw::Entries(entries))),
            None => {
                let raw = Raw::Entries(entries);
                let message =
                    report_illegal(source, target, "[object Object]", "object", candidates);
                Resolved::failed(unresolved_from_raw(raw), message)
            }
        },
        Raw::Json(value) => resolve_json(candidates, value, source, target),
    }
}

fn resolve_json(candidates: &[TypeRef], value: Value, source: &str, target: &str) -> Resolved {
    // Discriminator lookup comes first: an explicit `_type` tag naming a
    // registered type either selects a candidate member or rejects the
    // value against the named type.
    if let Value::Object(object) = &value {
        if let Some(Value::String(tag)) = object.get("_type") {
            if let Some(tagged) = registry::get(tag) {
                if is_member(candidates, &tagged) {
                    return Resolved::ok(build_composite(&tagged, Raw::Json(value)));
                }
                let message = report_illegal(source, target, "[object Object]", tag, candidates);
                return Resolved::failed(unresolved_instance(value), message);
            }
        }
    }

    if let [only] = candidates {
        return resolve_single(only, value, source, target, candidates);
    }

    match &value {
        Value::Object(_) => match first_of_kind(candidates, TypeKind::Composite) {
            Some(composite) => Resolved::ok(build_composite(&composite, Raw::Json(value))),
            None => {
                let message =
                    report_illegal(source, target, "[object Object]", "object", candidates);
                Resolved::failed(unresolved_instance(value), message)
            }
        },
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            let wanted = json_primitive_kind(&value);
            let matched = candidates.iter().find_map(|candidate| {
                compat::resolve(candidate)
                    .filter(|resolved| resolved.kind() == TypeKind::Primitive(wanted))
            });
            match matched {
                Some(primitive) => Resolved::ok(primitive_instance(&primitive, &value)),
                None => {
                    let message = report_illegal(
                        source,
                        target,
                        &js_value_string(&value),
                        js_value_kind(&value),
                        candidates,
                    );
                    Resolved::failed(natural_instance(value), message)
                }
            }
        }
        Value::Array(_) => match first_of_kind(candidates, TypeKind::List) {
            Some(list_ty) => Resolved::ok(build_list(&list_ty, Raw::Json(value))),
            None => {
                let message = report_illegal(
                    source,
                    target,
                    &js_value_string(&value),
                    "object",
                    candidates,
                );
                Resolved::failed(unresolved_instance(value), message)
            }
        },
        Value::Null => {
            let nullable = candidates
                .iter()
                .find_map(|candidate| compat::resolve(candidate).filter(|r| r.is_nullable()));
            match nullable {
                Some(ty) => Resolved::ok(Instance::new(ty, Node::Null)),
                None => {
                    let message = report_illegal(source, target, "null", "object", candidates);
                    Resolved::failed(unresolved_instance(value), message)
                }
            }
        }
    }
}

fn resolve_single(
    candidate: &TypeRef,
    value: Value,
    source: &str,
    target: &str,
    all: &[TypeRef],
) -> Resolved {
    let Some(ty) = compat::resolve(candidate) else {
        let message = report_illegal(
            source,
            target,
            &js_value_string(&value),
            js_value_kind(&value),
            all,
        );
        return Resolved::failed(unresolved_instance(value), message);
    };

    if matches!(value, Value::Null) && ty.is_nullable() {
        return Resolved::ok(Instance::new(ty, Node::Null));
    }

    let mismatch = |value: Value| {
        let message = report_illegal(
            source,
            target,
            &js_value_string(&value),
            js_value_kind(&value),
            all,
        );
        Resolved::failed(natural_instance(value), message)
    };

    match ty.kind() {
        TypeKind::Primitive(kind) => match (kind, &value) {
            (PrimitiveKind::String, Value::String(text)) => {
                Resolved::ok(Instance::new(ty, Node::Str(text.clone())))
            }
            (PrimitiveKind::Number, Value::Number(num)) => Resolved::ok(Instance::new(
                ty,
                Node::Num(num.as_f64().unwrap_or_default()),
            )),
            (PrimitiveKind::Boolean, Value::Bool(flag)) => {
                Resolved::ok(Instance::new(ty, Node::Bool(*flag)))
            }
            _ => mismatch(value),
        },
        TypeKind::Composite => match value {
            Value::Object(_) => Resolved::ok(build_composite(&ty, Raw::Json(value))),
            _ => mismatch(value),
        },
        TypeKind::List => {
            if ty.subtypes().is_empty() {
                let err = untyped_list_failure();
                return Resolved::failed(unresolved_instance(value), err.to_string());
            }
            match value {
                Value::Array(_) => Resolved::ok(build_list(&ty, Raw::Json(value))),
                _ => mismatch(value),
            }
        }
        TypeKind::Map => {
            if ty.subtypes().len() != 2 {
                let err = untyped_map_failure();
                return Resolved::failed(unresolved_instance(value), err.to_string());
            }
            match value {
                Value::Object(_) => Resolved::ok(build_map(&ty, Raw::Json(value))),
                _ => mismatch(value),
            }
        }
        TypeKind::Union => resolve_json(ty.subtypes(), value, source, target),
        TypeKind::Reference | TypeKind::Invalid => mismatch(value),
    }
}

fn build_composite(ty: &TypeRef, raw: Raw) -> Instance {
    match raw {
        Raw::Instance(source) => {
            if compat::is_assignable_from(ty, source.type_of()) {
                // fresh children; a compatible source instance is copied,
                // never shared between two parents
                let fields = ty
                    .fields()
                    .iter()
                    .map(|field| {
                        let value = source
                            .get(&field.name)
                            .map(|child| child.deep_clone())
                            .unwrap_or_else(|| default_value(&field.ty));
                        (field.name.clone(), value)
                    })
                    .collect();
                Instance::new(ty.clone(), Node::Composite(fields))
            } else {
                report_illegal(
                    "core3.Type",
                    &ty.display_name(),
                    &source.coercion_string(),
                    &source.type_name(),
                    std::slice::from_ref(ty),
                );
                default_value(ty)
            }
        }
        Raw::Json(Value::Object(object)) => {
            let fields = ty
                .fields()
                .iter()
                .map(|field| {
                    let value = match object.get(&field.name) {
                        Some(json) => {
                            let resolved = resolve_for_field(ty, field, Raw::Json(json.clone()));
                            match resolved.error {
                                None => resolved.instance,
                                Some(_) => default_value(&field.ty),
                            }
                        }
                        None => default_value(&field.ty),
                    };
                    (field.name.clone(), value)
                })
                .collect();
            Instance::new(ty.clone(), Node::Composite(fields))
        }
        Raw::Json(Value::Null) => default_value(ty),
        other => {
            report_illegal(
                "core3.Type",
                &ty.display_name(),
                &raw_coercion_string(&other),
                &raw_kind(&other),
                std::slice::from_ref(ty),
            );
            default_value(ty)
        }
    }
}

fn build_list(ty: &TypeRef, raw: Raw) -> Instance {
    let elements: Vec<Raw> = match raw {
        Raw::Seq(elements) => elements,
        Raw::Json(Value::Array(items)) => items.into_iter().map(Raw::Json).collect(),
        Raw::Json(Value::Null) => Vec::new(),
        Raw::Instance(source) => {
            if compat::validate_type(ty, &source) {
                let items = match &*source.node() {
                    Node::List(items) => items.iter().map(Instance::deep_clone).collect(),
                    _ => Vec::new(),
                };
                return Instance::new(ty.clone(), Node::List(items));
            }
            report_illegal(
                "core3.List",
                "Array",
                &source.coercion_string(),
                &source.type_name(),
                ty.subtypes(),
            );
            return Instance::new(ty.clone(), Node::List(Vec::new()));
        }
        other => {
            report_illegal(
                "core3.List",
                "Array",
                &raw_coercion_string(&other),
                &raw_kind(&other),
                ty.subtypes(),
            );
            return Instance::new(ty.clone(), Node::List(Vec::new()));
        }
    };

    let items = elements
        .into_iter()
        .map(|element| resolve_element(ty.subtypes(), element, "core3.List", "Array").instance)
        .collect();
    Instance::new(ty.clone(), Node::List(items))
}

fn build_map(ty: &TypeRef, raw: Raw) -> Instance {
    let (key_ty, value_ty) = match ty.subtypes() {
        [key, value] => (key.clone(), value.clone()),
        _ => return Instance::new(ty.clone(), Node::Map(Vec::new())),
    };

    let entries: Vec<(Raw, Raw)> = match raw {
        Raw::Entries(entries) => entries,
        Raw::Json(Value::Object(object)) => object
            .into_iter()
            .map(|(key, value)| (Raw::Json(Value::String(key)), Raw::Json(value)))
            .collect(),
        Raw::Json(Value::Null) => Vec::new(),
        Raw::Instance(source) => {
            if compat::validate_type(ty, &source) {
                let copied = match &*source.node() {
                    Node::Map(entries) => entries
                        .iter()
                        .map(|(key, value)| (key.deep_clone(), value.deep_clone()))
                        .collect(),
                    _ => Vec::new(),
                };
                return Instance::new(ty.clone(), Node::Map(copied));
            }
            report_illegal(
                "core3.Map",
                "Map",
                &source.coercion_string(),
                &source.type_name(),
                ty.subtypes(),
            );
            return Instance::new(ty.clone(), Node::Map(Vec::new()));
        }
        other => {
            report_illegal(
                "core3.Map",
                "Map",
                &raw_coercion_string(&other),
                &raw_kind(&other),
                ty.subtypes(),
            );
            return Instance::new(ty.clone(), Node::Map(Vec::new()));
        }
    };

    let key_candidates = candidate_set(&key_ty);
    let value_candidates = candidate_set(&value_ty);
    let built = entries
        .into_iter()
        .map(|(key, value)| {
            (
                resolve_element(&key_candidates, key, "core3.Map", "Map").instance,
                resolve_element(&value_candidates, value, "core3.Map", "Map").instance,
            )
        })
        .collect();
    Instance::new(ty.clone(), Node::Map(built))
}

/// Materializes the default value for a type: the attached default if one
/// exists, `null` for nullable types, otherwise the kind's zero value.
/// Always a fresh subtree.
fn default_value(ty: &TypeRef) -> Instance {
    let Some(ty) = compat::resolve(ty) else {
        return Instance::new(TypeDef::unresolved_marker(), Node::Null);
    };

    if let Some(json) = ty.default_json() {
        return default_from_json(&ty, json);
    }
    if ty.is_nullable() {
        return Instance::new(ty, Node::Null);
    }

    match ty.kind() {
        TypeKind::Primitive(PrimitiveKind::String) => Instance::new(ty, Node::Str(String::new())),
        TypeKind::Primitive(PrimitiveKind::Number) => Instance::new(ty, Node::Num(0.0)),
        TypeKind::Primitive(PrimitiveKind::Boolean) => Instance::new(ty, Node::Bool(false)),
        TypeKind::Composite => build_composite(&ty, Raw::Json(Value::Object(Default::default()))),
        TypeKind::List => Instance::new(ty, Node::List(Vec::new())),
        TypeKind::Map => Instance::new(ty, Node::Map(Vec::new())),
        TypeKind::Union => {
            let members = ty.subtypes();
            let pick = members
                .iter()
                .find(|member| {
                    compat::resolve(member)
                        .is_some_and(|resolved| resolved.kind() == TypeKind::Composite)
                })
                .or_else(|| members.first());
            match pick {
                Some(member) => default_value(member),
                None => Instance::new(TypeDef::unresolved_marker(), Node::Null),
            }
        }
        TypeKind::Reference | TypeKind::Invalid => {
            Instance::new(TypeDef::unresolved_marker(), Node::Null)
        }
    }
}

fn default_from_json(ty: &TypeRef, json: Value) -> Instance {
    match ty.kind() {
        TypeKind::Composite => build_composite(ty, Raw::Json(json)),
        TypeKind::List => build_list(ty, Raw::Json(json)),
        TypeKind::Map => build_map(ty, Raw::Json(json)),
        _ => {
            let candidates = candidate_set(ty);
            resolve_element(&candidates, Raw::Json(json), "core3.Type", &ty.display_name())
                .instance
        }
    }
}

fn is_member(candidates: &[TypeRef], tagged: &TypeRef) -> bool {
    candidates.iter().any(|candidate| {
        compat::resolve(candidate).is_some_and(|resolved| {
            Arc::ptr_eq(&resolved, tagged)
                || (resolved.kind() == TypeKind::Composite && resolved.name() == tagged.name())
        })
    })
}

fn first_of_kind(candidates: &[TypeRef], kind: TypeKind) -> Option<TypeRef> {
    candidates
        .iter()
        .filter_map(compat::resolve)
        .find(|resolved| resolved.kind() == kind)
}

fn primitive_instance(ty: &TypeRef, value: &Value) -> Instance {
    let node = match value {
        Value::String(text) => Node::Str(text.clone()),
        Value::Number(num) => Node::Num(num.as_f64().unwrap_or_default()),
        Value::Bool(flag) => Node::Bool(*flag),
        _ => Node::Null,
    };
    Instance::new(ty.clone(), node)
}

/// Keeps a mismatched primitive under its natural primitive type so the
/// raw value stays observable in place.
fn natural_instance(value: Value) -> Instance {
    match value {
        Value::String(text) => Instance::new(string(), Node::Str(text)),
        Value::Number(num) => Instance::new(number(), Node::Num(num.as_f64().unwrap_or_default())),
        Value::Bool(flag) => Instance::new(boolean(), Node::Bool(flag)),
        other => unresolved_instance(other),
    }
}

fn unresolved_instance(value: Value) -> Instance {
    Instance::new(TypeDef::unresolved_marker(), Node::Raw(value))
}

fn unresolved_from_raw(raw: Raw) -> Instance {
    match raw {
        Raw::Instance(instance) => instance,
        other => unresolved_instance(raw_to_json(other)),
    }
}

fn raw_to_json(raw: Raw) -> Value {
    match raw {
        Raw::Json(value) => value,
        Raw::Instance(instance) => instance.to_json(),
        Raw::Seq(elements) => Value::Array(elements.into_iter().map(raw_to_json).collect()),
        Raw::Entries(entries) => Value::Array(
            entries
                .into_iter()
                .map(|(key, value)| Value::Array(vec![raw_to_json(key), raw_to_json(value)]))
                .collect(),
        ),
    }
}

fn json_primitive_kind(value: &Value) -> PrimitiveKind {
    match value {
        Value::Number(_) => PrimitiveKind::Number,
        Value::Bool(_) => PrimitiveKind::Boolean,
        _ => PrimitiveKind::String,
    }
}

fn untyped_list_failure() -> InstanceError {
    let err = InstanceError::UntypedList;
    report::report(Level::Error, "core3.List", &err.to_string());
    err
}

fn untyped_map_failure() -> InstanceError {
    let err = InstanceError::UntypedMap;
    report::report(Level::Error, "core3.Map", &err.to_string());
    err
}

fn constructor_failure(ty: &TypeRef) -> InstanceError {
    match ty.name() {
        "Map" => untyped_map_failure(),
        "List" => untyped_list_failure(),
        other => InstanceError::NotInstantiable(other.to_string()),
    }
}

fn report_illegal(
    source: &str,
    target: &str,
    value: &str,
    kind: &str,
    allowed: &[TypeRef],
) -> String {
    let message = format!(
        "Illegal value {value} of type {kind} for {target} of type {}",
        subtype_summary(allowed)
    );
    report::report(Level::Error, source, &message);
    message
}

fn subtype_summary(types: &[TypeRef]) -> String {
    let names: Vec<String> = types.iter().map(|ty| ty.display_name()).collect();
    format!("<{}>", names.join(","))
}

pub(crate) fn js_value_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(text) => text.clone(),
        Value::Number(num) => js_number_string(num.as_f64().unwrap_or_default()),
        Value::Bool(flag) => flag.to_string(),
        Value::Object(_) => "[object Object]".to_string(),
        Value::Array(items) => items
            .iter()
            .map(js_value_string)
            .collect::<Vec<_>>()
            .join(","),
    }
}

pub(crate) fn js_number_string(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() <= i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn js_value_kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        _ => "object",
    }
}

fn raw_kind(raw: &Raw) -> String {
    match raw {
        Raw::Json(value) => js_value_kind(value).to_string(),
        Raw::Instance(instance) => instance.type_name(),
        Raw::Seq(_) | Raw::Entries(_) => "object".to_string(),
    }
}

fn raw_coercion_string(raw: &Raw) -> String {
    match raw {
        Raw::Json(value) => js_value_string(value),
        Raw::Instance(instance) => instance.coercion_string(),
        Raw::Seq(elements) => elements
            .iter()
            .map(raw_coercion_string)
            .collect::<Vec<_>>()
            .join(","),
        Raw::Entries(_) => "[object Object]".to_string(),
    }
}
