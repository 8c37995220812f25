//! Type definition: raw field specifications to registered descriptors.
//!
//! [`define`] runs a field-spec provider, validates every declared field,
//! and registers the resulting composite descriptor under its name. The
//! first invalid field aborts the whole call with a `fatal` diagnostic and
//! nothing is registered.
//!
//! Nested subtype failures carry a positional path suffix: a failure in the
//! second subtype of a list field `zagzag` is reported against `zagzag<1>`,
//! one nested two levels deep against `zagzag<0<0>>`.
//!
//! Forward and circular schemas are expressed with
//! [`reference`](crate::reference) fields, which validate without touching
//! the registry; the referent is resolved the first time the descriptor is
//! used.
//!
//! # Examples
//!
//! ```
//! use core3::{FieldSpec, define, number, string};
//!
//! let user = define("ExampleUser", || {
//!     FieldSpec::new()
//!         .field("name", string().with_default("leon"))
//!         .field("age", number().with_default(10))
//! })
//! .unwrap();
//!
//! let instance = user.instantiate().unwrap();
//! assert_eq!(instance.get("name").unwrap().as_str().as_deref(), Some("leon"));
//! ```

use std::sync::Arc;

use crate::error::DefineError;
use crate::registry;
use crate::report::{self, Level};
use crate::types::{FieldDef, FieldSpec, TypeDef, TypeKind, TypeRef};

/// Defines and registers a composite type.
///
/// `provider` is a zero-argument producer of the field specification; it is
/// memoized on the descriptor and runs at most once. Validation failures
/// are reported at `fatal` level through the active
/// [`Reporter`](crate::Reporter) and returned as [`DefineError`]; in that
/// case no type is registered.
pub fn define<F>(name: impl Into<String>, provider: F) -> Result<TypeRef, DefineError>
where
    F: Fn() -> FieldSpec + Send + Sync + 'static,
{
    let name = name.into();
    let ty: TypeRef = Arc::new(TypeDef::composite(name.clone(), Arc::new(provider)));

    for field in ty.fields() {
        if let Err(err) = validate_field(&name, field) {
            report::report(Level::Fatal, "core3.define", &err.to_string());
            return Err(err);
        }
    }

    registry::register(&name, ty.clone());
    Ok(ty)
}

fn validate_field(owner: &str, field: &FieldDef) -> Result<(), DefineError> {
    let base = format!("{owner}.{}", field.name);
    if field.name.starts_with('$') {
        return Err(DefineError::ReservedField(base));
    }
    check_type(&field.ty).map_err(|violation| violation.into_error(&base))
}

enum ViolationKind {
    Invalid,
    UntypedList,
    UntypedMap,
}

struct Violation {
    kind: ViolationKind,
    /// Subtype indices from the outermost container down to the failure.
    indices: Vec<usize>,
}

impl Violation {
    fn new(kind: ViolationKind) -> Self {
        Self {
            kind,
            indices: Vec::new(),
        }
    }

    fn into_error(self, base: &str) -> DefineError {
        let suffix = self
            .indices
            .iter()
            .rev()
            .fold(String::new(), |inner, index| format!("<{index}{inner}>"));
        let path = format!("{base}{suffix}");
        match self.kind {
            ViolationKind::Invalid => DefineError::InvalidFieldType(path),
            ViolationKind::UntypedList => DefineError::UntypedList(path),
            ViolationKind::UntypedMap => DefineError::UntypedMap(path),
        }
    }
}

fn check_type(ty: &TypeRef) -> Result<(), Violation> {
    match ty.kind() {
        TypeKind::Invalid => Err(Violation::new(ViolationKind::Invalid)),
        TypeKind::List if ty.subtypes().is_empty() => {
            Err(Violation::new(ViolationKind::UntypedList))
        }
        TypeKind::Map if ty.subtypes().is_empty() => Err(Violation::new(ViolationKind::UntypedMap)),
        TypeKind::List | TypeKind::Map | TypeKind::Union => {
            for (index, subtype) in ty.subtypes().iter().enumerate() {
                if let Err(mut violation) = check_type(subtype) {
                    violation.indices.insert(0, index);
                    return Err(violation);
                }
            }
            Ok(())
        }
        TypeKind::Primitive(_) | TypeKind::Composite | TypeKind::Reference => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{list, map, string};

    #[test]
    fn test_nested_path_suffix_is_positional() {
        let v = Violation {
            kind: ViolationKind::Invalid,
            indices: vec![1],
        };
        assert_eq!(
            v.into_error("invalid.zagzag").path(),
            "invalid.zagzag<1>"
        );

        let v = Violation {
            kind: ViolationKind::UntypedList,
            indices: vec![0, 0],
        };
        assert_eq!(
            v.into_error("invalid.zagzag").path(),
            "invalid.zagzag<0<0>>"
        );
    }

    #[test]
    fn test_untyped_list_field_aborts_define() {
        let err = define("DefineUntypedHost", || FieldSpec::new().field("zagzag", list()))
            .unwrap_err();
        assert_eq!(
            err,
            DefineError::UntypedList("DefineUntypedHost.zagzag".into())
        );
        assert!(!registry::is_defined("DefineUntypedHost"));
    }

    #[test]
    fn test_nested_untyped_list_reports_subtype_index() {
        let err = define("DefineNestedHost", || {
            FieldSpec::new().field("zagzag", list().of(vec![string(), list()]))
        })
        .unwrap_err();
        assert_eq!(
            err,
            DefineError::UntypedList("DefineNestedHost.zagzag<1>".into())
        );
    }

    #[test]
    fn test_doubly_nested_failure_reports_nested_path() {
        let err = define("DefineDeepHost", || {
            FieldSpec::new().field("zagzag", list().of(list().of(list())))
        })
        .unwrap_err();
        assert_eq!(
            err,
            DefineError::UntypedList("DefineDeepHost.zagzag<0<0>>".into())
        );
    }

    #[test]
    fn test_reserved_field_aborts_define() {
        let err = define("DefineReservedHost", || {
            FieldSpec::new().field("$asReadOnly", string())
        })
        .unwrap_err();
        assert_eq!(
            err,
            DefineError::ReservedField("DefineReservedHost.$asReadOnly".into())
        );
    }

    #[test]
    fn test_poisoned_map_field_is_an_invalid_field_type() {
        let poisoned = map().of(vec![string()]);
        let err = define("DefinePoisonedHost", move || {
            FieldSpec::new().field("zagzag", poisoned.clone())
        })
        .unwrap_err();
        assert_eq!(
            err,
            DefineError::InvalidFieldType("DefinePoisonedHost.zagzag".into())
        );
    }
}
