//! Envelope assembly tests.

#[cfg(test)]
mod tests {
    use crate::*;
    use serde_json::{json, Map, Value};

    fn definition(name: &str, text: &str) -> Node {
        let def = Define::new(name).build().unwrap();
        def.scope(|| Text::new(text).build().map(drop)).unwrap();
        def
    }

    #[test]
    fn test_empty_envelope_is_version_only() {
        let envelope = Envelope::new(None, None, None).unwrap();
        assert_eq!(envelope.to_json().unwrap(), json!({"version": "0.2"}));
        assert_eq!(PROTOCOL_VERSION, "0.2");
    }

    #[test]
    fn test_empty_state_is_kept() {
        let envelope = Envelope::new(None, None, Some(Map::new())).unwrap();
        assert_eq!(envelope.to_json().unwrap(), json!({"version": "0.2", "state": {}}));

        let built = Envelope::builder()
            .state(Vec::<(String, Prop)>::new())
            .build()
            .unwrap();
        assert_eq!(built.state(), Some(&Map::new()));
    }

    #[test]
    fn test_empty_defs_omitted() {
        let envelope = Envelope::new(None, Some(vec![]), None).unwrap();
        assert_eq!(envelope.to_json().unwrap(), json!({"version": "0.2"}));
    }

    #[test]
    fn test_reserved_state_key_rejected_at_construction() {
        let mut state = Map::new();
        state.insert("$foo".to_string(), json!(1));
        let err = Envelope::new(None, None, Some(state)).unwrap_err();
        assert_eq!(err, PrefabError::ReservedStateKey { key: "$foo".into() });
        assert_eq!(err.code(), ERR_RESERVED_STATE_KEY);

        let err = Envelope::builder()
            .state_entry("count", 0)
            .state_entry("$item", 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, PrefabError::ReservedStateKey { .. }));
    }

    #[test]
    fn test_full_envelope() {
        reset_counters();
        let count = Rx::new("count");
        let page = Column::new().prop("gap", 4).build().unwrap();
        page.scope(|| {
            Heading::new("Counter").build()?;
            Text::new(&count).build()?;
            Button::new("Add")
                .prop("on_click", Action::set_state("count", &count + 1)?)
                .build()?;
            Use::new("footer").bind("note", "thanks").build()?;
            Ok(())
        })
        .unwrap();

        let envelope = Envelope::builder()
            .view(page)
            .define(definition("footer", "bye"))
            .state([("count", Prop::from(0)), ("doubled", Prop::from(&count * 2))])
            .build()
            .unwrap();

        assert_eq!(
            envelope.to_json().unwrap(),
            json!({
                "version": "0.2",
                "view": {
                    "type": "Column",
                    "gap": 4,
                    "children": [
                        {"type": "Heading", "content": "Counter"},
                        {"type": "Text", "content": "{{ count }}"},
                        {
                            "type": "Button",
                            "label": "Add",
                            "onClick": {"action": "setState", "key": "count", "value": "{{ count + 1 }}"}
                        },
                        {"$ref": "footer", "let": {"note": "thanks"}}
                    ]
                },
                "defs": {"footer": {"type": "Text", "content": "bye"}},
                "state": {"count": 0, "doubled": "{{ count * 2 }}"}
            })
        );
        assert!(envelope.definition("footer").is_some());
        assert!(envelope.definition("header").is_none());
        assert_eq!(envelope.view().unwrap().child_count(), 4);
    }

    #[test]
    fn test_defs_must_be_definitions() {
        let text = Text::new("x").build().unwrap();
        let err = Envelope::new(None, Some(vec![text]), None).unwrap_err();
        assert_eq!(err, PrefabError::NotADefinition { tag: "Text".into() });

        let err = Envelope::builder()
            .define(definition("card", "a"))
            .define(definition("card", "b"))
            .build()
            .unwrap_err();
        assert_eq!(err, PrefabError::DuplicateDefinition { name: "card".into() });
    }

    #[test]
    fn test_tree_errors_surface_at_serialization() {
        let view = Column::new().build().unwrap();
        view.scope(|| Else::new().build().map(drop)).unwrap();
        let envelope = Envelope::builder().view(view).build().unwrap();
        assert!(envelope.to_json().is_err());
        assert!(serde_json::to_value(&envelope).is_err());

        let empty = Define::new("blank").build().unwrap();
        let envelope = Envelope::new(None, Some(vec![empty]), None).unwrap();
        assert_eq!(
            envelope.to_json().unwrap_err(),
            PrefabError::EmptyDefine { name: "blank".into() }
        );
    }

    #[test]
    fn test_serialize_envelope() {
        let envelope = Envelope::builder()
            .view(Text::new("hi").build().unwrap())
            .state_entry("ready", true)
            .build()
            .unwrap();
        let text = serde_json::to_string(&envelope).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({"version": "0.2", "view": {"type": "Text", "content": "hi"}, "state": {"ready": true}})
        );
    }
}
