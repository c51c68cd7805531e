mod fixtures;

use airmodel::prelude::*;
use airmodel::{FetchParams, FormulaBuilder, StoreErrorKind};
use fixtures::{User, sample_users, user_store};
use serde_json::json;

fn compiled_json(relation: &Relation<User>) -> serde_json::Value {
    serde_json::from_str(&relation.to_json().expect("compile")).expect("valid json")
}

#[test]
fn end_to_end_example_compiles_exactly() {
    let relation = User::filter(conditions! { "role" => "admin" })
        .filter(conditions! { "active" => true })
        .order(("name", SortDirection::Asc))
        .limit(10);

    assert_eq!(
        compiled_json(&relation),
        json!({
            "filter": "AND({Role} = 'admin', {Active} = TRUE())",
            "sort": [{"field": "Name", "direction": "asc"}],
            "max_records": 10
        })
    );
}

#[test]
fn range_example() {
    assert_eq!(
        compiled_json(&User::filter(conditions! { "age" => 18..65 })),
        json!({"filter": "AND({Age} >= 18, {Age} < 65)"})
    );
}

#[test]
fn set_membership_example() {
    assert_eq!(
        compiled_json(&User::filter(
            conditions! { "role" => ["admin", "mod", "guest"] }
        )),
        json!({"filter": "OR({Role} = 'admin', {Role} = 'mod', {Role} = 'guest')"})
    );
}

#[test]
fn zero_conditions_compile_to_empty_object() {
    let all = User::all();
    assert_eq!(compiled_json(&all), json!({}));
    assert_eq!(all.compile().unwrap(), FetchParams::default());

    let store = user_store();
    all.load(&store).unwrap();
    assert_eq!(store.last_params(), Some(FetchParams::default()));
}

#[test]
fn successive_filters_conjoin_whole_groups_in_call_order() {
    let c1 = conditions! { "role" => "admin", "active" => true };
    let c2 = conditions! { "age" => 18..65 };

    let fields = User::field_mapping();
    let b1 = FormulaBuilder::new(fields)
        .build(&[c1.clone().into_condition().unwrap()])
        .unwrap()
        .unwrap();
    let b2 = FormulaBuilder::new(fields)
        .build(&[c2.clone().into_condition().unwrap()])
        .unwrap()
        .unwrap();

    let filter = User::filter(c1).filter(c2).compile().unwrap().filter;
    assert_eq!(filter, Some(format!("AND({b1}, {b2})")));
}

#[test]
fn raw_and_structured_filters_mix() {
    let filter = User::filter("{Age} > 21")
        .filter(conditions! { "first_name" => "Alice" })
        .compile()
        .unwrap()
        .filter;
    assert_eq!(
        filter.as_deref(),
        Some("AND({Age} > 21, {First Name} = 'Alice')")
    );
}

#[test]
fn chain_methods_never_fetch() {
    let store = user_store();
    let relation = User::all()
        .filter(conditions! { "role" => "admin" })
        .order("name")
        .limit(2)
        .offset(1)
        .scope("active")
        .unwrap();
    let _ = relation.compile().unwrap();
    let _ = relation.to_json().unwrap();
    assert_eq!(store.call_count(), 0);
    assert!(!relation.is_loaded());
}

#[test]
fn enumeration_is_idempotent() {
    let store = user_store();
    let relation = User::filter(conditions! { "active" => true });

    let first = relation.load(&store).unwrap();
    let second = relation.load(&store).unwrap();
    let mut seen = 0;
    relation.each(&store, |_| seen += 1).unwrap();

    assert_eq!(first, second);
    assert_eq!(seen, first.len());
    assert_eq!(relation.count(&store).unwrap(), 4);
    assert_eq!(store.call_count(), 1);
}

#[test]
fn extending_a_relation_leaves_the_original_untouched() {
    let r1 = User::filter(conditions! { "role" => "admin" }).order("name");
    let before = r1.compile().unwrap();

    let r2 = r1.filter(conditions! { "active" => true }).order("age").limit(3);
    assert_ne!(r2.compile().unwrap(), before);
    assert_eq!(r1.compile().unwrap(), before);

    let store = user_store();
    r1.load(&store).unwrap();
    r2.load(&store).unwrap();
    assert_eq!(store.call_count(), 2);
}

#[test]
fn escapes_single_and_double_quotes() {
    let filter = User::filter(conditions! { "name" => "O'Reilly" })
        .compile()
        .unwrap()
        .filter
        .unwrap();
    assert_eq!(filter, r"{Name} = 'O\'Reilly'");

    let filter = User::filter(conditions! { "name" => r#"Say "hi""# })
        .compile()
        .unwrap()
        .filter
        .unwrap();
    assert_eq!(filter, r#"{Name} = 'Say \"hi\"'"#);
}

#[test]
fn compiled_output_only_uses_backend_names() {
    let params = User::filter(conditions! { "first_name" => "Ann", "email" => "a@b.c" })
        .order("created_at")
        .compile()
        .unwrap();
    let filter = params.filter.unwrap();
    assert!(filter.contains("{First Name}"));
    assert!(filter.contains("{Email Address}"));
    assert!(!filter.contains("{first_name}"));
    assert_eq!(params.sort[0].field, "Created");
}

#[test]
fn store_receives_table_address() {
    let store = user_store();
    User::all().load(&store).unwrap();
    let call = &store.calls()[0];
    assert_eq!(call.table.table, "Users");
    assert_eq!(call.table.base_key, Some("appUsers123"));
}

#[test]
fn records_are_materialized_through_the_model() {
    let store = user_store();
    let users = User::all().load(&store).unwrap();
    assert_eq!(users.len(), sample_users().len());
    assert_eq!(users[0].name, "Ada");
    assert_eq!(users[0].role.as_deref(), Some("admin"));
    assert!(users[0].active);
    assert_eq!(users[3].age, None);
    assert!(!users[3].active);
}

#[test]
fn conversion_failure_reports_field() {
    let store = StubStore::with_records(vec![Record::new("bad").with_field("Name", 42)]);
    let err = User::all().load(&store).unwrap_err();
    assert!(matches!(err, Error::Type(_)));
    assert!(err.to_string().contains("'name'"));
}

#[test]
fn first_and_last() {
    let store = user_store();

    let first = User::first(&store).unwrap().unwrap();
    assert_eq!(first.id, "rec001");
    let params = store.last_params().unwrap();
    assert_eq!(params.max_records, Some(1));
    assert_eq!(params.sort[0].field, "Created");

    let last_two = User::all().last_n(2, &store).unwrap();
    let ids: Vec<_> = last_two.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["rec003", "rec004"]);

    let ordered_last = User::order("name").last(&store).unwrap();
    assert!(ordered_last.is_some());
    let params = store.last_params().unwrap();
    assert_eq!(params.sort[0].direction, SortDirection::Desc);
    assert_eq!(params.max_records, Some(1));
}

#[test]
fn find_by_and_find_by_or_fail() {
    let store = user_store();
    let found = User::find_by(conditions! { "name" => "Ada" }, &store).unwrap();
    assert_eq!(found.map(|u| u.id).as_deref(), Some("rec001"));
    assert_eq!(
        store.last_params().unwrap().filter.as_deref(),
        Some("{Name} = 'Ada'")
    );

    let empty = StubStore::new();
    assert!(
        User::find_by(conditions! { "name" => "Nobody" }, &empty)
            .unwrap()
            .is_none()
    );
    let err = User::find_by_or_fail(conditions! { "name" => "Nobody" }, &empty).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn pagination_is_forwarded() {
    let store = user_store();
    let page = User::all().offset(1).limit(2).load(&store).unwrap();
    let ids: Vec<_> = page.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["rec002", "rec003"]);
    assert_eq!(
        compiled_json(&User::all().offset(1).limit(2)),
        json!({"max_records": 2, "offset": 1})
    );
}

#[test]
fn store_errors_propagate_unchanged() {
    let store = user_store();
    store.fail_with(StoreErrorKind::RateLimited, "too many requests");

    let relation = User::all();
    let err = relation.count(&store).unwrap_err();
    match err {
        Error::Store(e) => {
            assert_eq!(e.kind, StoreErrorKind::RateLimited);
            assert_eq!(e.message, "too many requests");
        }
        other => panic!("expected store error, got {other:?}"),
    }
    assert!(User::first(&store).is_err());
    assert!(User::find_by("{Name} = 'Ada'", &store).is_err());
}

#[test]
fn invalid_field_is_raised_at_compile_time() {
    let relation = User::filter(Condition::eq("", "x"));
    assert!(matches!(relation.compile(), Err(Error::InvalidField(_))));

    let relation = User::filter(conditions! { "role" => Vec::<String>::new() });
    assert!(matches!(relation.compile(), Err(Error::InvalidField(_))));
}
