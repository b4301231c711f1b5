use schemaform::{
    FormCommand, FormSession, FormStore, MoveDirection, Path, Renderer, WidgetKind,
    WidgetRegistry, parse_form_schema, validate,
};
use serde_json::{Value, json};

#[test]
fn valid_data_reports_no_errors() {
    let schema = json!({
        "type": "object",
        "required": ["name"],
        "properties": {
            "name": {"type": "string", "uiSchema": {"component": "textarea"}},
            "age": {"type": "integer", "minimum": 0},
            "tags": {"type": "array", "items": {"type": "string"}}
        }
    });
    let samples = [
        json!({"name": "a"}),
        json!({"name": "b", "age": 0}),
        json!({"name": "c", "age": 40, "tags": []}),
        json!({"name": "d", "tags": ["x", "y"]}),
    ];
    let keys = vec!["uiSchema".to_string()];
    for data in samples {
        let report = validate(&schema, &data, &keys).expect("schema compiles");
        assert!(report.valid, "{data} should be valid");
        assert!(report.errors.is_empty());
    }
}

#[test]
fn invalid_data_collects_every_violation() {
    let schema = json!({
        "type": "object",
        "required": ["name", "email"],
        "properties": {
            "name": {"type": "string"},
            "email": {"type": "string"},
            "age": {"type": "integer", "minimum": 0}
        }
    });
    let keys = vec!["uiSchema".to_string()];
    let report = validate(&schema, &json!({"age": -1}), &keys).expect("schema compiles");
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 3);
}

#[test]
fn read_after_write() {
    let mut store = FormStore::default();
    let cases = [
        (Path::root().child("name"), json!("John")),
        (Path::root().child("address").child("city"), json!("Oslo")),
        (Path::root().child("tags").child(2usize), json!("c")),
        (
            Path::root().child("people").child(0usize).child("age"),
            json!(31),
        ),
        (Path::root().child("name"), json!(null)),
    ];
    for (path, value) in cases {
        store.set(&path, value.clone());
        assert_eq!(store.get(&path), Some(&value), "read back {path}");
    }
    assert_eq!(
        store.get(&Path::root().child("tags")),
        Some(&json!([null, null, "c"]))
    );
}

#[test]
fn move_is_a_permutation_and_boundaries_are_noops() {
    let schema = json!({"type": "array", "items": {"type": "integer"}});
    let mut session = FormSession::new(&schema, json!([1, 2, 3, 4])).expect("session starts");

    let moved = |session: &mut FormSession, index, direction| {
        session
            .dispatch(FormCommand::MoveItem {
                path: Path::root(),
                index,
                direction,
            })
            .expect("move applies")
    };

    assert!(!moved(&mut session, 0, MoveDirection::Up));
    assert!(!moved(&mut session, 3, MoveDirection::Down));
    assert_eq!(session.form_data(), &json!([1, 2, 3, 4]));

    assert!(moved(&mut session, 1, MoveDirection::Down));
    assert!(moved(&mut session, 3, MoveDirection::Up));
    let mut items: Vec<i64> = session
        .form_data()
        .as_array()
        .expect("array")
        .iter()
        .filter_map(Value::as_i64)
        .collect();
    assert_eq!(items, vec![1, 3, 4, 2]);
    items.sort();
    assert_eq!(items, vec![1, 2, 3, 4]);
}

#[test]
fn remove_shrinks_by_one_and_reindexes() {
    let schema = json!({"type": "array", "items": {"type": "string"}});
    let mut session =
        FormSession::new(&schema, json!(["a", "b", "c", "d"])).expect("session starts");
    assert!(
        session
            .dispatch(FormCommand::RemoveItem {
                path: Path::root(),
                index: 1,
            })
            .expect("remove applies")
    );
    assert_eq!(session.form_data(), &json!(["a", "c", "d"]));
    assert!(
        !session
            .dispatch(FormCommand::RemoveItem {
                path: Path::root(),
                index: 9,
            })
            .expect("out of range is a no-op")
    );
    assert_eq!(session.form_data().as_array().map(Vec::len), Some(3));
}

#[test]
fn dispatch_is_deterministic() {
    let schema = parse_form_schema(&json!({
        "type": "object",
        "properties": {
            "color": {"type": "string", "enum": ["red", "green"]},
            "born": {"type": "string", "format": "date"},
            "bio": {"type": "string", "uiSchema": {"component": "textarea"}},
            "phone": {"type": "string", "uiSchema": {"component": "tel"}},
            "count": {"type": "integer"},
            "agree": {"type": "boolean"},
            "plan": {
                "type": "boolean",
                "oneOf": [{"const": true, "title": "Pro"}, {"const": false, "title": "Free"}],
                "uiSchema": {"component": "radio"}
            }
        }
    }))
    .expect("schema parsed");
    let registry = WidgetRegistry::default();
    let kinds = |data: Value| {
        let store = FormStore::new(data);
        let form = Renderer::new(&schema, &store, &registry)
            .render_form()
            .expect("form renders");
        ["color", "born", "bio", "phone", "count", "agree", "plan"]
            .iter()
            .map(|name| {
                form.root
                    .find(&Path::root().child(*name))
                    .map(|field| field.widget.kind())
            })
            .collect::<Vec<_>>()
    };

    let expected = vec![
        Some(WidgetKind::Select),
        Some(WidgetKind::Date),
        Some(WidgetKind::Textarea),
        Some(WidgetKind::Input),
        Some(WidgetKind::Number),
        Some(WidgetKind::Checkbox),
        Some(WidgetKind::Radio),
    ];
    assert_eq!(kinds(json!({})), expected);
    assert_eq!(kinds(json!({"color": "red", "count": 3, "agree": true})), expected);
}
