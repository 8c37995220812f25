use core3::{
    FieldSpec, Level, MutateError, Report, define, either, list, number, string, validate_type,
};
use core3_testkit::{a_number_list, address_type, capture, user_type, user_with_address_type};
use serde_json::json;

#[test]
fn test_isomorphic_types_construct_from_each_other_silently() {
    let ((first, second), reports) = capture(|| {
        let type1 = define("InstIso1", || {
            FieldSpec::new().field("foo", string().with_default(""))
        })
        .unwrap();
        let type2 = define("InstIso2", || {
            FieldSpec::new().field("foo", string().with_default(""))
        })
        .unwrap();

        let source = type1.create(json!({ "foo": "bar" })).unwrap();
        let copy = type2.create(source.clone()).unwrap();
        (source, copy)
    });

    assert!(reports.is_empty(), "unexpected diagnostics: {reports:?}");
    assert_eq!(second.type_name(), "InstIso2");
    assert_eq!(second.get("foo").unwrap().as_str().as_deref(), Some("bar"));
    // fresh children, not shared with the source
    first.set("foo", "changed").unwrap();
    assert_eq!(second.get("foo").unwrap().as_str().as_deref(), Some("bar"));
}

#[test]
fn test_defaults_are_materialized_fresh_per_instance() {
    let host = define("InstDefaultHost", || {
        FieldSpec::new().field("names", list().of(string()).with_default(json!(["a"])))
    })
    .unwrap();

    let one = host.instantiate().unwrap();
    let two = host.instantiate().unwrap();

    one.get("names").unwrap().push("b").unwrap();
    assert_eq!(one.get("names").unwrap().len(), 2);
    assert_eq!(two.get("names").unwrap().len(), 1);
}

#[test]
fn test_set_reruns_construction_validation() {
    let user = user_type().instantiate().unwrap();

    let (result, reports) = capture(|| user.set("age", "not a number"));
    assert!(matches!(result, Err(MutateError::IllegalValue(_))));
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Error,
            "core3.Type",
            "Illegal value not a number of type string for field User.age of type <number>"
        )]
    );
    // rejected assignment leaves the previous value in place
    assert_eq!(user.get("age").unwrap().as_number(), Some(10.0));

    user.set("age", 30).unwrap();
    assert_eq!(user.get("age").unwrap().as_number(), Some(30.0));
}

#[test]
fn test_set_rejects_unknown_fields() {
    let user = user_type().instantiate().unwrap();
    assert_eq!(
        user.set("nope", 1),
        Err(MutateError::UnknownField("nope".into()))
    );
}

#[test]
fn test_list_mutation_revalidates_elements() {
    let numbers = a_number_list();

    let (result, _) = capture(|| numbers.push("x"));
    assert!(matches!(result, Err(MutateError::IllegalValue(_))));
    assert_eq!(numbers.len(), 2);

    numbers.push(3).unwrap();
    assert_eq!(numbers.len(), 3);
    assert_eq!(numbers.at(2).unwrap().as_number(), Some(3.0));

    numbers.set_at(0, 9).unwrap();
    assert_eq!(numbers.at(0).unwrap().as_number(), Some(9.0));
    assert_eq!(numbers.set_at(9, 1), Err(MutateError::OutOfBounds(9, 3)));
}

#[test]
fn test_read_only_projection_is_deep() {
    let host = user_with_address_type().instantiate().unwrap();
    let frozen = host.as_read_only();

    assert!(frozen.is_read_only());
    let (result, reports) = capture(|| frozen.get("user").unwrap().set("name", "x"));
    assert_eq!(result, Err(MutateError::ReadOnly("User.name".into())));
    assert_eq!(
        reports,
        vec![Report::new(
            Level::Error,
            "core3.Type",
            "Attempt to override a read only value User.name"
        )]
    );

    // no path through the projection recovers mutability
    let nested = frozen.get("address").unwrap();
    assert!(nested.is_read_only());
    assert!(matches!(
        nested.set("code", 1),
        Err(MutateError::ReadOnly(_))
    ));
}

#[test]
fn test_read_only_projection_shares_underlying_data() {
    let host = user_with_address_type().instantiate().unwrap();
    let frozen = host.as_read_only();

    host.get("user").unwrap().set("name", "legit").unwrap();
    assert_eq!(
        frozen.get("user").unwrap().get("name").unwrap().as_str().as_deref(),
        Some("legit")
    );
}

#[test]
fn test_read_only_is_idempotent() {
    let numbers = a_number_list();
    let frozen = numbers.as_read_only();
    let again = frozen.as_read_only();

    assert!(again.is_read_only());
    assert_eq!(again, frozen);
    assert!(matches!(again.push(3), Err(MutateError::ReadOnly(_))));
    assert!(matches!(frozen.push(3), Err(MutateError::ReadOnly(_))));
}

#[test]
fn test_read_only_list_elements_are_projected() {
    let users = list()
        .of(user_type())
        .create(json!([{}, { "name": "yossi" }]))
        .unwrap();
    let frozen = users.as_read_only();

    let second = frozen.at(1).unwrap();
    assert!(second.is_read_only());
    assert!(matches!(
        second.set("name", "other"),
        Err(MutateError::ReadOnly(_))
    ));
    assert_eq!(second.get("name").unwrap().as_str().as_deref(), Some("yossi"));
}

#[test]
fn test_to_json_exports_data_with_defaults_applied() {
    let host = user_with_address_type()
        .create(json!({ "user": { "name": "yossi" } }))
        .unwrap();

    assert_eq!(
        host.to_json(),
        json!({
            "user": { "name": "yossi", "age": 10 },
            "address": { "address": "", "code": 10 }
        })
    );
}

#[test]
fn test_validation_runs_against_the_dynamic_type() {
    let mixed = list()
        .of(either([user_type(), address_type()]))
        .create(json!([{ "_type": "User" }]))
        .unwrap();

    let element = mixed.at(0).unwrap();
    assert_eq!(element.type_name(), "User");
    assert!(validate_type(&user_type(), &element));
    assert!(!validate_type(&address_type(), &element));
    // the union field type accepts the more specific member
    assert!(validate_type(&either([user_type(), address_type()]), &element));
}

#[test]
fn test_nullable_fields_accept_and_default_to_null() {
    let host = define("InstNullableHost", || {
        FieldSpec::new()
            .field("note", string().nullable())
            .field("count", number().with_default(2).nullable())
    })
    .unwrap();

    let defaulted = host.instantiate().unwrap();
    assert!(defaulted.get("note").unwrap().is_null());
    assert_eq!(defaulted.get("count").unwrap().as_number(), Some(2.0));

    let explicit = host.create(json!({ "note": null, "count": null })).unwrap();
    assert!(explicit.get("note").unwrap().is_null());
    assert!(explicit.get("count").unwrap().is_null());
}
