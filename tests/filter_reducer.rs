use tcg_browser::filters::{
    FacetEntry, FacetKey, FieldKey, FieldValue, FilterAction, FilterError, FilterReducer,
    FilterState, FilterStore, HpRange, OrderByEntry, OrderByField, RawAction,
};
use tcg_browser::mvi::Reducer;

fn fire() -> FacetEntry {
    FacetEntry::new("t1", "Fire".to_string())
}

fn populated() -> FilterState {
    let actions = vec![
        FilterAction::set(
            FieldKey::OrderBy,
            vec![OrderByEntry::new("o1", OrderByField::Cardmarket).excluded()],
        ),
        FilterAction::set(FieldKey::Hp, HpRange::new(50, 120).unwrap()),
        FilterAction::set(FieldKey::Exclude, true),
        FilterAction::set(FacetKey::Types, vec![fire()]),
        FilterAction::set(
            FacetKey::Rarities,
            vec![
                FacetEntry::new("3", "Common".to_string()),
                FacetEntry::new("5", "X".to_string()),
                FacetEntry::new("7", "Rare".to_string()).excluded(),
            ],
        ),
    ];
    actions.into_iter().fold(FilterState::default(), |state, action| {
        FilterReducer::reduce(&state, action).unwrap()
    })
}

fn raw(kind: &str, key: Option<&str>, value: Option<serde_json::Value>) -> RawAction {
    RawAction {
        kind: kind.to_string(),
        key: key.map(str::to_string),
        value,
        id: None,
    }
}

#[test]
fn set_replaces_target_and_leaves_other_keys() {
    let state = populated();
    let value: FieldValue = vec![FacetEntry::new("sv1", "Scarlet & Violet".to_string())].into();

    let next =
        FilterReducer::reduce(&state, FilterAction::set(FacetKey::Sets, value.clone())).unwrap();

    assert_eq!(next.get(FacetKey::Sets.into()), value);
    for key in FieldKey::all().filter(|k| *k != FieldKey::Facet(FacetKey::Sets)) {
        assert_eq!(next.get(key), state.get(key), "key {key} changed");
    }
}

#[test]
fn set_for_every_key_reads_back() {
    let source = populated();
    for key in FieldKey::all() {
        let value = source.get(key);
        let action = FilterAction::Set {
            key,
            value: value.clone(),
        };
        let next = FilterReducer::reduce(&FilterState::default(), action).unwrap();
        assert_eq!(next.get(key), value);
    }
}

#[test]
fn reset_single_key_restores_its_default() {
    let state = populated();
    let defaults = FilterState::default();
    for key in FieldKey::all() {
        let next = FilterReducer::reduce(&state, FilterAction::reset(key)).unwrap();
        assert_eq!(next.get(key), defaults.get(key));
        assert!(next.is_default(key));
    }
}

#[test]
fn reset_all_restores_defaults() {
    let next = FilterReducer::reduce(&populated(), FilterAction::reset_all()).unwrap();
    assert_eq!(next, FilterState::default());
}

#[test]
fn unknown_key_is_rejected_and_state_kept() {
    let mut store = FilterStore::with_state(populated());
    let before = store.state().clone();
    let generation = store.generation();

    let err = store
        .dispatch_raw(raw("set", Some("not_a_real_facet"), Some(serde_json::json!([]))))
        .unwrap_err();

    assert_eq!(
        err,
        FilterError::InvalidKey {
            key: "not_a_real_facet".to_string()
        }
    );
    assert_eq!(store.state(), &before);
    assert!(store.is_current(generation));
}

#[test]
fn reset_with_unknown_key_is_rejected_too() {
    let mut store = FilterStore::new();
    let err = store.dispatch_raw(raw("reset", Some("colour"), None)).unwrap_err();
    assert!(matches!(err, FilterError::InvalidKey { .. }));
}

#[test]
fn unknown_action_tag_is_rejected() {
    let mut store = FilterStore::new();
    let err = store.dispatch_raw(raw("toggle", Some("types"), None)).unwrap_err();
    assert_eq!(
        err,
        FilterError::UnknownAction {
            action: "toggle".to_string()
        }
    );
}

#[test]
fn delete_on_scalar_keys_is_rejected() {
    for key in ["hp", "exclude"] {
        let mut action = raw("delete", Some(key), None);
        action.id = Some("1".to_string());
        let mut store = FilterStore::new();
        assert!(matches!(
            store.dispatch_raw(action),
            Err(FilterError::InvalidKey { .. })
        ));
    }
}

#[test]
fn delete_removes_exactly_one_entry_preserving_order() {
    let state = populated();
    let next =
        FilterReducer::reduce(&state, FilterAction::delete(FacetKey::Rarities, "5")).unwrap();

    let ids: Vec<&str> = next.facet(FacetKey::Rarities).iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["3", "7"]);
    assert!(next.facet(FacetKey::Rarities)[1].exclude);
    assert_eq!(next.facet(FacetKey::Types), state.facet(FacetKey::Types));
}

#[test]
fn inverted_hp_from_wire_is_invalid_value() {
    let mut store = FilterStore::new();
    let err = store
        .dispatch_raw(raw("set", Some("hp"), Some(serde_json::json!([120, 50]))))
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));
    assert_eq!(store.state().hp(), HpRange::DEFAULT);
}

#[test]
fn wrong_value_shape_is_invalid_value() {
    let mut store = FilterStore::new();
    let err = store
        .dispatch_raw(raw("set", Some("types"), Some(serde_json::json!(true))))
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidValue { .. }));
}

#[test]
fn wire_set_accepts_entry_lists() {
    let mut store = FilterStore::new();
    store
        .dispatch_raw(raw(
            "set",
            Some("types"),
            Some(serde_json::json!([
                {"id": "t1", "name": "Fire"},
                {"id": "t2", "name": "Water", "exclude": true}
            ])),
        ))
        .unwrap();
    let types = store.state().facet(FacetKey::Types);
    assert_eq!(types.len(), 2);
    assert!(!types[0].exclude);
    assert!(types[1].exclude);
    assert_eq!(store.generation(), 1);
}

#[test]
fn select_uses_global_exclude_polarity() {
    let state = populated();
    assert!(state.exclude());

    let next = FilterReducer::reduce(&state, state.select(FacetKey::Types, "t1", "Fire")).unwrap();
    assert_eq!(next.facet(FacetKey::Types), &[fire().excluded()]);

    let next = FilterReducer::reduce(&next, next.select(FacetKey::Types, "t2", "Water")).unwrap();
    assert_eq!(next.facet(FacetKey::Types).len(), 2);
}

#[test]
fn stale_generation_is_detected() {
    let mut store = FilterStore::new();
    let issued = store.generation();
    store.dispatch(FilterAction::set(FacetKey::Types, vec![fire()])).unwrap();
    assert!(!store.is_current(issued));
    assert!(store.is_current(store.generation()));
}
