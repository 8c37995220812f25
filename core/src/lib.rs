//! Runtime record types: declare, validate, construct, compare.
//!
//! This crate is a runtime type-definition and validation engine. Callers
//! declare composite record types with named, typed fields, parametrize
//! generic containers (list, map) including union candidate sets, and build
//! instances from untyped JSON-like data with recursive defaults and
//! discriminator-based subtype resolution:
//!
//! - [`define`] — turn a field specification into a registered
//!   [`TypeDef`], rejecting malformed schemas with `fatal` diagnostics.
//! - [`TypeDef::of`] — parametrize the [`list`]/[`map`] container markers;
//!   [`either`] builds union candidate sets.
//! - [`is_assignable_from`] / [`validate_type`] — structural compatibility
//!   over descriptors and instances.
//! - [`TypeDef::create`] — build an [`Instance`] from raw data, resolving
//!   polymorphic subtypes via the `_type` discriminator and applying
//!   defaults recursively.
//! - [`Instance::as_read_only`] — deep read-only projection sharing the
//!   underlying data.
//!
//! Data-level validation is permissive: failures are reported as `error`
//! diagnostics through the active [`Reporter`] while construction of the
//! surrounding structure completes. Schema-definition failures are `fatal`
//! and abort the `define` call.
//!
//! # Example
//!
//! ```
//! use core3::{FieldSpec, define, list, number, string};
//! use serde_json::json;
//!
//! let _address = define("ReadmeAddress", || {
//!     FieldSpec::new()
//!         .field("address", string().with_default(""))
//!         .field("code", number().with_default(10))
//! })
//! .unwrap();
//!
//! let user = define("ReadmeUser", || {
//!     FieldSpec::new()
//!         .field("name", string().with_default("leon"))
//!         .field("addresses", list().of(core3::reference("ReadmeAddress")))
//! })
//! .unwrap();
//!
//! let instance = user
//!     .create(json!({ "addresses": [{ "address": "gaga" }] }))
//!     .unwrap();
//! assert_eq!(instance.get("name").unwrap().as_str().as_deref(), Some("leon"));
//!
//! let first = instance.get("addresses").unwrap().at(0).unwrap();
//! assert_eq!(first.type_name(), "ReadmeAddress");
//! assert_eq!(first.get("code").unwrap().as_number(), Some(10.0));
//! ```

mod compat;
mod construct;
mod define;
mod error;
mod instance;
pub mod registry;
pub mod report;
mod types;

pub use compat::{is_assignable_from, validate_type};
pub use construct::Raw;
pub use define::define;
pub use error::{DefineError, InstanceError, MutateError};
pub use instance::Instance;
pub use report::{Level, Report, Reporter, TracingReporter, set_reporter, with_reporter};
pub use types::{
    FieldDef, FieldSpec, PrimitiveKind, SubtypeSet, TypeDef, TypeKind, TypeOptions, TypeRef,
    boolean, either, list, map, number, reference, string,
};
