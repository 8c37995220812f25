//! Type descriptors: the immutable data model behind every defined type.
//!
//! A [`TypeDef`] describes one type — a primitive, a composite record, a
//! parametrized list or map container, a union of candidates, or a by-name
//! reference into the registry. Descriptors are immutable once created and
//! shared through [`TypeRef`] handles; every derivation
//! ([`with_default`](TypeDef::with_default), [`nullable`](TypeDef::nullable),
//! [`of`](TypeDef::of)) allocates a new descriptor with its own cloned
//! options, so no derived descriptor can observe changes to its ancestor.
//!
//! The primitive markers [`string`], [`number`] and [`boolean`], the
//! container markers [`list`] and [`map`], the [`either`] union combinator
//! and the [`reference`] forward/circular-schema escape hatch are the
//! building blocks of field specifications passed to
//! [`define`](crate::define).

use std::fmt;
use std::sync::{Arc, LazyLock, OnceLock};

use crate::report::{self, Level};

/// Shared handle to an immutable type descriptor.
pub type TypeRef = Arc<TypeDef>;

pub(crate) type SpecProvider = Arc<dyn Fn() -> FieldSpec + Send + Sync>;
pub(crate) type DefaultFn = Arc<dyn Fn() -> serde_json::Value + Send + Sync>;

/// Kind of primitive value a descriptor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// UTF-8 string.
    String,
    /// Double-precision number.
    Number,
    /// Boolean.
    Boolean,
}

/// Discriminates what a [`TypeDef`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A primitive scalar.
    Primitive(PrimitiveKind),
    /// A named record with declared fields.
    Composite,
    /// An ordered container with a candidate element type set.
    List,
    /// A keyed container with exactly one key type and one value type.
    Map,
    /// An ordered, deduplicated set of candidate member types.
    Union,
    /// A by-name reference resolved through the registry on first use.
    Reference,
    /// A poisoned descriptor produced by an illegal parametrization.
    Invalid,
}

/// One declared field of a composite type.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name; must not start with the reserved `$` prefix.
    pub name: String,
    /// Declared (static) field type.
    pub ty: TypeRef,
}

/// Ordered field specification for a composite type.
///
/// Produced by the spec provider passed to [`define`](crate::define).
///
/// # Examples
///
/// ```
/// use core3::{FieldSpec, number, string};
///
/// let spec = FieldSpec::new()
///     .field("name", string().with_default("leon"))
///     .field("age", number());
/// assert_eq!(spec.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct FieldSpec {
    pub(crate) fields: Vec<FieldDef>,
}

impl FieldSpec {
    /// Creates an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field; declaration order is preserved.
    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
        });
        self
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[derive(Clone)]
pub(crate) enum DefaultSpec {
    Value(serde_json::Value),
    Factory(DefaultFn),
}

impl DefaultSpec {
    /// Produces a fresh raw default value.
    pub(crate) fn produce(&self) -> serde_json::Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Factory(factory) => (**factory)(),
        }
    }
}

/// Per-descriptor options overlaid by derivation operations.
#[derive(Clone, Default)]
pub struct TypeOptions {
    pub(crate) nullable: bool,
    pub(crate) default: Option<DefaultSpec>,
}

impl fmt::Debug for TypeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeOptions")
            .field("nullable", &self.nullable)
            .field("default", &self.default.is_some())
            .finish()
    }
}

/// Immutable descriptor of one type.
///
/// Obtained from the primitive/container markers, from
/// [`define`](crate::define), or by deriving an existing descriptor. All
/// state is fixed at creation; composite fields are produced by a memoized
/// spec provider the first time they are needed.
pub struct TypeDef {
    kind: TypeKind,
    name: String,
    spec: Option<SpecProvider>,
    fields: OnceLock<Vec<FieldDef>>,
    subtypes: Vec<TypeRef>,
    options: TypeOptions,
}

static STRING: LazyLock<TypeRef> =
    LazyLock::new(|| Arc::new(TypeDef::scalar(PrimitiveKind::String, "string")));
static NUMBER: LazyLock<TypeRef> =
    LazyLock::new(|| Arc::new(TypeDef::scalar(PrimitiveKind::Number, "number")));
static BOOLEAN: LazyLock<TypeRef> =
    LazyLock::new(|| Arc::new(TypeDef::scalar(PrimitiveKind::Boolean, "boolean")));
static LIST: LazyLock<TypeRef> =
    LazyLock::new(|| Arc::new(TypeDef::container(TypeKind::List, "List")));
static MAP: LazyLock<TypeRef> =
    LazyLock::new(|| Arc::new(TypeDef::container(TypeKind::Map, "Map")));

/// The `string` primitive marker.
pub fn string() -> TypeRef {
    STRING.clone()
}

/// The `number` primitive marker.
pub fn number() -> TypeRef {
    NUMBER.clone()
}

/// The `boolean` primitive marker.
pub fn boolean() -> TypeRef {
    BOOLEAN.clone()
}

/// The unparametrized list marker; parametrize with [`TypeDef::of`].
pub fn list() -> TypeRef {
    LIST.clone()
}

/// The unparametrized map marker; parametrize with [`TypeDef::of`].
pub fn map() -> TypeRef {
    MAP.clone()
}

/// A by-name reference to a registered (or later-registered) type.
///
/// References make forward and circular schemas legal: the name is looked
/// up in the registry the first time the descriptor is actually used, not
/// at declaration time.
pub fn reference(name: impl Into<String>) -> TypeRef {
    Arc::new(TypeDef {
        kind: TypeKind::Reference,
        name: name.into(),
        spec: None,
        fields: OnceLock::new(),
        subtypes: Vec::new(),
        options: TypeOptions::default(),
    })
}

/// Union combinator: an ordered, deduplicated set of candidate types.
///
/// Nested unions are flattened. The result parametrizes containers
/// (`list().of(either([a, b]))`) or types a composite field directly.
///
/// # Examples
///
/// ```
/// use core3::{either, number, string};
///
/// let u = either([string(), number(), string()]);
/// assert_eq!(u.subtypes().len(), 2); // deduplicated
/// ```
pub fn either(members: impl IntoIterator<Item = TypeRef>) -> TypeRef {
    let mut flat: Vec<TypeRef> = Vec::new();
    for member in members {
        match member.kind {
            TypeKind::Union => {
                for inner in &member.subtypes {
                    push_dedup(&mut flat, inner.clone());
                }
            }
            _ => push_dedup(&mut flat, member),
        }
    }
    Arc::new(TypeDef {
        kind: TypeKind::Union,
        name: String::new(),
        spec: None,
        fields: OnceLock::new(),
        subtypes: flat,
        options: TypeOptions::default(),
    })
}

fn push_dedup(set: &mut Vec<TypeRef>, candidate: TypeRef) {
    if !set.iter().any(|existing| same_type(existing, &candidate)) {
        set.push(candidate);
    }
}

fn same_type(a: &TypeRef, b: &TypeRef) -> bool {
    Arc::ptr_eq(a, b) || (a.kind == b.kind && !a.name.is_empty() && a.name == b.name)
}

/// Ordered candidate set accepted by [`TypeDef::of`].
///
/// Converts from a single type, a union combinator result (flattened to its
/// members), an explicit ordered `Vec`/array, or a `(key, value)` pair for
/// maps. Duplicates are dropped, keeping first-occurrence order.
pub struct SubtypeSet(pub(crate) Vec<TypeRef>);

impl From<TypeRef> for SubtypeSet {
    fn from(ty: TypeRef) -> Self {
        match ty.kind {
            TypeKind::Union => Self(ty.subtypes.clone()),
            _ => Self(vec![ty]),
        }
    }
}

impl From<Vec<TypeRef>> for SubtypeSet {
    fn from(types: Vec<TypeRef>) -> Self {
        let mut set = Vec::new();
        for ty in types {
            push_dedup(&mut set, ty);
        }
        Self(set)
    }
}

impl<const N: usize> From<[TypeRef; N]> for SubtypeSet {
    fn from(types: [TypeRef; N]) -> Self {
        Self::from(types.to_vec())
    }
}

impl From<(TypeRef, TypeRef)> for SubtypeSet {
    fn from((key, value): (TypeRef, TypeRef)) -> Self {
        Self(vec![key, value])
    }
}

impl TypeDef {
    fn scalar(kind: PrimitiveKind, name: &str) -> Self {
        Self {
            kind: TypeKind::Primitive(kind),
            name: name.to_string(),
            spec: None,
            fields: OnceLock::new(),
            subtypes: Vec::new(),
            options: TypeOptions::default(),
        }
    }

    fn container(kind: TypeKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            spec: None,
            fields: OnceLock::new(),
            subtypes: Vec::new(),
            options: TypeOptions::default(),
        }
    }

    pub(crate) fn composite(name: String, spec: SpecProvider) -> Self {
        Self {
            kind: TypeKind::Composite,
            name,
            spec: Some(spec),
            fields: OnceLock::new(),
            subtypes: Vec::new(),
            options: TypeOptions::default(),
        }
    }

    fn poisoned(name: &str) -> Self {
        Self {
            kind: TypeKind::Invalid,
            name: name.to_string(),
            spec: None,
            fields: OnceLock::new(),
            subtypes: Vec::new(),
            options: TypeOptions::default(),
        }
    }

    /// Placeholder descriptor carried by values that failed to resolve
    /// against any candidate type; never assignable.
    pub(crate) fn unresolved_marker() -> TypeRef {
        static UNRESOLVED: LazyLock<TypeRef> =
            LazyLock::new(|| Arc::new(TypeDef::poisoned("object")));
        UNRESOLVED.clone()
    }

    /// What this descriptor describes.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Registered name for composites, primitive name for scalars,
    /// container name for list/map, referent name for references.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidate element types (list), key/value pair (map), or members
    /// (union). Empty for everything else.
    pub fn subtypes(&self) -> &[TypeRef] {
        &self.subtypes
    }

    /// Declared fields in declaration order; composite only.
    ///
    /// The backing spec provider runs at most once; the result is memoized.
    pub fn fields(&self) -> &[FieldDef] {
        match &self.spec {
            Some(provider) => self.fields.get_or_init(|| (**provider)().fields),
            None => &[],
        }
    }

    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields().iter().find(|field| field.name == name)
    }

    /// Whether `null` is a legal value for this type.
    pub fn is_nullable(&self) -> bool {
        self.options.nullable
    }

    /// Whether an explicit default value or producer is attached.
    pub fn has_default(&self) -> bool {
        self.options.default.is_some()
    }

    pub(crate) fn default_json(&self) -> Option<serde_json::Value> {
        self.options.default.as_ref().map(DefaultSpec::produce)
    }

    /// Human-readable type name used in diagnostics.
    pub fn display_name(&self) -> String {
        match self.kind {
            TypeKind::Union => {
                let members: Vec<String> =
                    self.subtypes.iter().map(|m| m.display_name()).collect();
                members.join("|")
            }
            _ => self.name.clone(),
        }
    }

    fn derive_with(&self, options: TypeOptions) -> Self {
        let fields = OnceLock::new();
        if let Some(resolved) = self.fields.get() {
            let _ = fields.set(resolved.clone());
        }
        Self {
            kind: self.kind,
            name: self.name.clone(),
            spec: self.spec.clone(),
            fields,
            subtypes: self.subtypes.clone(),
            options,
        }
    }

    /// Derives a descriptor with an attached default value.
    ///
    /// The returned descriptor is a new allocation with its own options;
    /// the receiver is unaffected. The default is materialized fresh for
    /// every instance it seeds, so containers and composites built from it
    /// are never shared between instances.
    ///
    /// # Examples
    ///
    /// ```
    /// use core3::string;
    ///
    /// let plain = string();
    /// let named = plain.with_default("leon");
    /// assert!(named.has_default());
    /// assert!(!plain.has_default());
    /// ```
    pub fn with_default(&self, value: impl Into<serde_json::Value>) -> TypeRef {
        let mut options = self.options.clone();
        options.default = Some(DefaultSpec::Value(value.into()));
        Arc::new(self.derive_with(options))
    }

    /// Derives a descriptor whose default is produced by a zero-arg factory.
    pub fn with_default_fn(
        &self,
        factory: impl Fn() -> serde_json::Value + Send + Sync + 'static,
    ) -> TypeRef {
        let mut options = self.options.clone();
        options.default = Some(DefaultSpec::Factory(Arc::new(factory)));
        Arc::new(self.derive_with(options))
    }

    /// Derives a descriptor that additionally accepts `null`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core3::number;
    ///
    /// let maybe = number().nullable();
    /// assert!(maybe.is_nullable());
    /// assert!(!number().is_nullable());
    /// ```
    pub fn nullable(&self) -> TypeRef {
        let mut options = self.options.clone();
        options.nullable = true;
        Arc::new(self.derive_with(options))
    }

    /// Parametrizes a container marker with its subtype set.
    ///
    /// Lists accept one type, a union combinator result, or an explicit
    /// ordered candidate list (arity ≥ 1). Maps require exactly a key type
    /// and a value type; any other arity reports an `error` diagnostic and
    /// yields a poisoned descriptor that cannot be instantiated or used in
    /// a field specification.
    ///
    /// # Examples
    ///
    /// ```
    /// use core3::{list, map, number, string};
    ///
    /// let names = list().of(string());
    /// assert_eq!(names.subtypes().len(), 1);
    ///
    /// let scores = map().of((string(), number()));
    /// assert_eq!(scores.subtypes().len(), 2);
    /// ```
    pub fn of(&self, subtypes: impl Into<SubtypeSet>) -> TypeRef {
        let SubtypeSet(members) = subtypes.into();
        match self.kind {
            TypeKind::List => {
                tracing::debug!(subtypes = members.len(), "parametrized list type");
                let mut derived = self.derive_with(self.options.clone());
                derived.subtypes = members;
                Arc::new(derived)
            }
            TypeKind::Map => {
                if members.len() != 2 {
                    report::report(
                        Level::Error,
                        "core3.Map",
                        "Wrong number of types for map. Use Map<SomeType, SomeType>",
                    );
                    return Arc::new(Self::poisoned("Map"));
                }
                tracing::debug!("parametrized map type");
                let mut derived = self.derive_with(self.options.clone());
                derived.subtypes = members;
                Arc::new(derived)
            }
            _ => {
                report::report(
                    Level::Error,
                    "core3.Type",
                    &format!("Type {} does not take type parameters", self.display_name()),
                );
                Arc::new(Self::poisoned(&self.name))
            }
        }
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("subtypes", &self.subtypes)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_primitive_markers_are_shared() {
        assert!(Arc::ptr_eq(&string(), &string()));
        assert_eq!(string().name(), "string");
        assert_eq!(number().kind(), TypeKind::Primitive(PrimitiveKind::Number));
    }

    #[test]
    fn test_with_default_clones_the_descriptor() {
        let original = string();
        let derived = original.with_default("im special!");

        assert!(!Arc::ptr_eq(&original, &derived));
        assert!(derived.has_default());
        assert!(!original.has_default());
    }

    #[test]
    fn test_nullable_clones_options_and_keeps_overlays() {
        let original = string().with_default("x");
        let derived = original.nullable();

        assert!(!Arc::ptr_eq(&original, &derived));
        assert!(derived.is_nullable());
        assert!(derived.has_default());
        assert!(!original.is_nullable());
        assert!(original.has_default());
    }

    #[test]
    fn test_either_flattens_and_deduplicates() {
        let u = either([string(), either([number(), string()])]);
        let names: Vec<String> = u.subtypes().iter().map(|t| t.display_name()).collect();
        assert_eq!(names, vec!["string", "number"]);
        assert_eq!(u.display_name(), "string|number");
    }

    #[test]
    fn test_of_flattens_a_union_argument() {
        let l = list().of(either([string(), number()]));
        assert_eq!(l.subtypes().len(), 2);
        assert_eq!(l.kind(), TypeKind::List);
    }

    #[test]
    fn test_map_of_wrong_arity_is_poisoned() {
        let bad = map().of(vec![string()]);
        assert_eq!(bad.kind(), TypeKind::Invalid);

        let good = map().of((string(), number()));
        assert_eq!(good.kind(), TypeKind::Map);
        assert_eq!(good.subtypes().len(), 2);
    }
}
