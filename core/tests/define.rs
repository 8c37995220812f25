use std::sync::Arc;

use core3::{FieldSpec, Level, Report, define, list, map, number, reference, registry, string};
use core3_testkit::capture;
use serde_json::json;

#[test]
fn test_defining_types_with_primitive_fields() {
    let primitives = define("DefPrimitives", || {
        FieldSpec::new()
            .field("name", string().with_default("leon"))
            .field("child1", string())
            .field("child2", string())
    })
    .unwrap();

    let instance = primitives.instantiate().unwrap();
    assert_eq!(instance.get("name").unwrap().as_str().as_deref(), Some("leon"));
    assert_eq!(instance.get("child1").unwrap().as_str().as_deref(), Some(""));
}

#[test]
fn test_defining_types_with_custom_fields() {
    let primitives = define("DefInnerPrimitives", || {
        FieldSpec::new().field("name", string().with_default("leon"))
    })
    .unwrap();
    let composite = define("DefComposite", move || {
        FieldSpec::new().field("child", primitives.clone())
    })
    .unwrap();

    let instance = composite.instantiate().unwrap();
    assert_eq!(
        instance.get("child").unwrap().get("name").unwrap().as_str().as_deref(),
        Some("leon")
    );
}

#[test]
fn test_reserved_field_reports_fatal_and_aborts() {
    let (result, reports) = capture(|| {
        define("DefReserved", || {
            FieldSpec::new().field("$asReadOnly", string())
        })
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefReserved.$asReadOnly\" is a reserved field."
        )]
    );
    assert!(!registry::is_defined("DefReserved"));
}

#[test]
fn test_invalid_field_type_reports_fatal() {
    let poisoned = map().of(Vec::new());
    let (result, reports) = capture(|| {
        define("DefInvalidField", move || {
            FieldSpec::new().field("zagzag", poisoned.clone())
        })
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefInvalidField.zagzag\" must be a primitive type or extend core3.Type"
        )]
    );
}

#[test]
fn test_untyped_list_field_reports_fatal() {
    let (result, reports) = capture(|| {
        define("DefUntypedList", || FieldSpec::new().field("zagzag", list()))
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefUntypedList.zagzag\" Untyped Lists are not supported please state type of list item in the format core3.List<string>"
        )]
    );
}

#[test]
fn test_untyped_map_field_reports_fatal() {
    let (result, reports) = capture(|| {
        define("DefUntypedMap", || FieldSpec::new().field("zagzag", map()))
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefUntypedMap.zagzag\" Untyped Maps are not supported please state types of key and value in the format core3.Map<string, string>"
        )]
    );
}

#[test]
fn test_invalid_subtype_reports_positional_path() {
    let poisoned = map().of(Vec::new());
    let (result, reports) = capture(|| {
        define("DefBadSubtype", move || {
            FieldSpec::new().field("zagzag", list().of(vec![string(), poisoned.clone()]))
        })
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefBadSubtype.zagzag<1>\" must be a primitive type or extend core3.Type"
        )]
    );
}

#[test]
fn test_untyped_nested_subtype_reports_path() {
    let (result, reports) = capture(|| {
        define("DefNestedUntyped", || {
            FieldSpec::new().field("zagzag", list().of(list()))
        })
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefNestedUntyped.zagzag<0>\" Untyped Lists are not supported please state type of list item in the format core3.List<string>"
        )]
    );
}

#[test]
fn test_doubly_nested_subtype_failure_reports_nested_path() {
    let (result, reports) = capture(|| {
        define("DefDeepUntyped", || {
            FieldSpec::new().field("zagzag", list().of(list().of(list())))
        })
    });

    assert!(result.is_err());
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Fatal,
            "core3.define",
            "Type definition error: \"DefDeepUntyped.zagzag<0<0>>\" Untyped Lists are not supported please state type of list item in the format core3.List<string>"
        )]
    );
}

#[test]
fn test_with_default_clones_the_previous_definition() {
    let original = string();
    let custom = original.with_default("im special!");

    assert!(!Arc::ptr_eq(&original, &custom));
    assert!(custom.has_default());
    assert!(!original.has_default());
}

#[test]
fn test_nullable_clones_the_definition_and_options() {
    let original = string().with_default("x");
    let custom = original.nullable();

    assert!(!Arc::ptr_eq(&original, &custom));
    assert!(custom.is_nullable());
    assert!(custom.has_default());
    assert!(!original.is_nullable());
}

#[test]
fn test_redefining_a_name_warns_and_replaces() {
    let first = define("DefRedefined", || {
        FieldSpec::new().field("v", number().with_default(1))
    })
    .unwrap();
    let survivor = first.instantiate().unwrap();

    let (second, reports) = capture(|| {
        define("DefRedefined", || {
            FieldSpec::new().field("v", string().with_default("x"))
        })
        .unwrap()
    });

    assert_eq!(
        reports,
        vec![Report::new(
            Level::Warn,
            "core3.define",
            "Type DefRedefined is already defined, overriding the previous definition"
        )]
    );
    let registered = registry::get("DefRedefined").unwrap();
    assert!(Arc::ptr_eq(&registered, &second));

    // instances built before the redefinition keep their own descriptor
    assert!(first.validate_type(&survivor));
    assert_eq!(survivor.get("v").unwrap().as_number(), Some(1.0));
}

#[test]
fn test_self_referential_schema_defines_and_instantiates() {
    let (node, reports) = capture(|| {
        define("DefTreeNode", || {
            FieldSpec::new()
                .field("label", string().with_default("root"))
                .field("children", list().of(reference("DefTreeNode")))
        })
        .unwrap()
    });
    assert!(reports.is_empty());

    let tree = node
        .create(json!({ "label": "a", "children": [{ "label": "b" }] }))
        .unwrap();
    let child = tree.get("children").unwrap().at(0).unwrap();
    assert_eq!(child.type_name(), "DefTreeNode");
    assert_eq!(child.get("label").unwrap().as_str().as_deref(), Some("b"));
    assert_eq!(child.get("children").unwrap().len(), 0);
}

#[test]
fn test_forward_reference_resolves_once_the_peer_is_defined() {
    let owner = define("DefForwardOwner", || {
        FieldSpec::new().field("peer", list().of(reference("DefForwardPeer")))
    })
    .unwrap();

    define("DefForwardPeer", || {
        FieldSpec::new().field("tag", string().with_default("peer"))
    })
    .unwrap();

    let instance = owner.create(json!({ "peer": [{}] })).unwrap();
    let peer = instance.get("peer").unwrap().at(0).unwrap();
    assert_eq!(peer.type_name(), "DefForwardPeer");
    assert_eq!(peer.get("tag").unwrap().as_str().as_deref(), Some("peer"));
}
