//! Structural compatibility between types and instances.
//!
//! [`is_assignable_from`] decides whether a candidate type may be used
//! wherever a target type is expected. The relation is structural: two
//! independently defined composites with identical field schemas are
//! mutually compatible, and a candidate may declare extra fields. Lists
//! compare their candidate subtype sets, maps compare key and value slots,
//! and unions act as their member sets. References resolve through the
//! registry first.
//!
//! Circular schemas are legal, so the walk carries an in-progress pair set
//! and treats a revisited pair as compatible instead of recursing forever.

use std::sync::Arc;

use crate::instance::Instance;
use crate::registry;
use crate::types::{TypeDef, TypeKind, TypeRef};

/// Resolves a by-name reference against the registry; other descriptors
/// pass through unchanged.
pub(crate) fn resolve(ty: &TypeRef) -> Option<TypeRef> {
    match ty.kind() {
        TypeKind::Reference => registry::get(ty.name()),
        _ => Some(ty.clone()),
    }
}

/// Whether `candidate` may be used wherever `target` is expected.
///
/// # Examples
///
/// ```
/// use core3::{is_assignable_from, list, number, string};
///
/// let a = list().of(string());
/// let b = list().of(string());
/// assert!(is_assignable_from(&a, &b)); // same schema, different factory call
/// assert!(!is_assignable_from(&a, &list().of(number())));
/// ```
pub fn is_assignable_from(target: &TypeRef, candidate: &TypeRef) -> bool {
    assignable(target, candidate, &mut Vec::new())
}

/// Whether `instance` satisfies `target`, judged against the instance's
/// *dynamic* descriptor — a union field holding a more specific member
/// still validates.
pub fn validate_type(target: &TypeRef, instance: &Instance) -> bool {
    is_assignable_from(target, instance.type_of())
}

fn assignable(target: &TypeRef, candidate: &TypeRef, in_progress: &mut Vec<(usize, usize)>) -> bool {
    let (Some(target), Some(candidate)) = (resolve(target), resolve(candidate)) else {
        return false;
    };
    if Arc::ptr_eq(&target, &candidate) {
        return true;
    }

    // Coinductive: a pair already on the walk stack is assumed compatible,
    // which is what makes mutually recursive schemas terminate.
    let pair = (
        Arc::as_ptr(&target) as usize,
        Arc::as_ptr(&candidate) as usize,
    );
    if in_progress.contains(&pair) {
        return true;
    }
    in_progress.push(pair);

    let compatible = match (target.kind(), candidate.kind()) {
        (_, TypeKind::Union) => candidate
            .subtypes()
            .iter()
            .all(|member| assignable(&target, member, in_progress)),
        (TypeKind::Union, _) => target
            .subtypes()
            .iter()
            .any(|member| assignable(member, &candidate, in_progress)),
        (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a == b,
        (TypeKind::Composite, TypeKind::Composite) => target.fields().iter().all(|field| {
            candidate
                .field(&field.name)
                .is_some_and(|other| assignable(&field.ty, &other.ty, in_progress))
        }),
        (TypeKind::List, TypeKind::List) => candidate.subtypes().iter().all(|member| {
            target
                .subtypes()
                .iter()
                .any(|allowed| assignable(allowed, member, in_progress))
        }),
        (TypeKind::Map, TypeKind::Map) => {
            target.subtypes().len() == 2
                && candidate.subtypes().len() == 2
                && assignable(&target.subtypes()[0], &candidate.subtypes()[0], in_progress)
                && assignable(&target.subtypes()[1], &candidate.subtypes()[1], in_progress)
        }
        _ => false,
    };

    in_progress.pop();
    compatible
}

impl TypeDef {
    /// Method form of [`is_assignable_from`].
    pub fn is_assignable_from(self: &Arc<Self>, candidate: &TypeRef) -> bool {
        is_assignable_from(self, candidate)
    }

    /// Method form of [`validate_type`].
    pub fn validate_type(self: &Arc<Self>, instance: &Instance) -> bool {
        validate_type(self, instance)
    }
}
