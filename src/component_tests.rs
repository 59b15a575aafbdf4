//! Catalog and node-construction tests.

#[cfg(test)]
mod tests {
    use crate::*;
    use serde_json::json;

    const SPARKLINE_FIELDS: &[FieldDef] = &[
        FieldDef::new("data"),
        FieldDef::new("stroke_width").alias("strokeWidth").default_int(2),
        FieldDef::new("smooth").default_bool(true),
    ];

    static SPARKLINE: ComponentDef = ComponentDef::leaf("Sparkline", SPARKLINE_FIELDS);

    #[test]
    fn test_aliases_on_the_wire() {
        reset_counters();
        let input = Input::new()
            .prop("name", "email")
            .prop("input_type", "email")
            .prop("placeholder", "you@example.com")
            .build()
            .unwrap();
        assert_eq!(
            input.to_json().unwrap(),
            json!({
                "type": "Input",
                "name": "email",
                "inputType": "email",
                "placeholder": "you@example.com"
            })
        );
        assert_eq!(input.field("inputType"), Some(json!("email")));
        assert_eq!(input.field("input_type"), None);
    }

    #[test]
    fn test_action_field() {
        let button = Button::new("Toggle")
            .prop("on_click", Action::toggle_state("open").unwrap())
            .build()
            .unwrap();
        assert_eq!(
            button.to_json().unwrap(),
            json!({
                "type": "Button",
                "label": "Toggle",
                "onClick": {"action": "toggleState", "key": "open"}
            })
        );

        let checkbox = Checkbox::new()
            .prop("name", "agree")
            .prop("on_change", vec![Action::show_toast("Thanks")])
            .build()
            .unwrap();
        assert_eq!(
            checkbox.field("onChange"),
            Some(json!([{"action": "showToast", "message": "Thanks"}]))
        );
    }

    #[test]
    fn test_auto_name_appears_on_wire() {
        reset_counters();
        let input = Input::new().build().unwrap();
        assert_eq!(input.to_json().unwrap(), json!({"type": "Input", "name": "input_1"}));
        assert_eq!(input.rx().unwrap().to_string(), "{{ input_1 }}");
        assert_eq!(Text::new("x").build().unwrap().rx(), None);
    }

    #[test]
    fn test_hyphenated_state_key_rejected() {
        let err = Input::new().prop("name", "first-name").build().unwrap_err();
        assert_eq!(err.code(), ERR_INVALID_STATE_KEY);
        assert!(err
            .to_string()
            .contains("hyphens are not valid inside a {{ }} expression"));

        assert!(Checkbox::new().prop("name", "form.agree").build().is_ok());
        assert!(ForEach::new("todo-items").build().is_err());
        assert!(ForEach::new("user.todos").build().is_ok());
    }

    #[test]
    fn test_unknown_field() {
        let err = Text::new("x").prop("colour", "red").build().unwrap_err();
        assert_eq!(
            err,
            PrefabError::UnknownField {
                tag: "Text".into(),
                field: "colour".into()
            }
        );

        // Wire aliases are not accepted as field names.
        assert!(Button::new("Go").prop("onClick", "x").build().is_err());

        let err = If::new("a").prop("when", "b").build().unwrap_err();
        assert!(matches!(err, PrefabError::UnknownField { .. }));
    }

    #[test]
    fn test_leaf_rejects_children_and_bindings() {
        let child = Text::new("inner").build().unwrap();
        let err = Text::new("outer").children(vec![child]).build().unwrap_err();
        assert_eq!(err, PrefabError::NotAContainer { tag: "Text".into() });

        let err = Badge::new("x").bind("item", 1).build().unwrap_err();
        assert_eq!(err.code(), ERR_NOT_A_CONTAINER);
    }

    #[test]
    fn test_structural_nodes_reject_bindings_and_classes() {
        let err = If::new("a").bind("x", 1).build().unwrap_err();
        assert_eq!(
            err,
            PrefabError::UnknownField {
                tag: "If".into(),
                field: "let".into()
            }
        );

        let err = Else::new().css_class("hl").build().unwrap_err();
        assert_eq!(
            err,
            PrefabError::UnknownField {
                tag: "Else".into(),
                field: "css_class".into()
            }
        );

        assert!(Elif::new("b").css_class("hl").build().is_err());
        assert!(Define::new("card").bind("title", "x").build().is_err());
        assert!(Define::new("card").css_class("p-2").build().is_err());
        assert!(If::new("a").css_class(None::<&str>).build().is_ok());
    }

    #[test]
    fn test_reactive_fields_coerced() {
        let user = Rx::new("user");
        let text = Text::new(user.field("name")).build().unwrap();
        assert_eq!(text.field("content"), Some(json!("{{ user.name }}")));

        let heading = Heading::new(Rx::new("title").upper())
            .css_class(Rx::new("dark").then("text-white", "text-black"))
            .build()
            .unwrap();
        assert_eq!(
            heading.to_json().unwrap(),
            json!({
                "type": "Heading",
                "content": "{{ title | upper }}",
                "cssClass": "{{ dark ? 'text-white' : 'text-black' }}"
            })
        );
    }

    #[test]
    fn test_numeric_defaults() {
        assert_eq!(Heading::new("A").prop("level", 1).build().unwrap().field("level"), None);
        assert_eq!(Heading::new("A").prop("level", 1.0).build().unwrap().field("level"), None);
        assert_eq!(
            Heading::new("A").prop("level", 2).build().unwrap().field("level"),
            Some(json!(2))
        );
    }

    #[test]
    fn test_last_prop_wins() {
        let badge = Badge::new("one").prop("label", "two").build().unwrap();
        assert_eq!(badge.field("label"), Some(json!("two")));
    }

    #[test]
    fn test_custom_component() {
        let chart = NodeBuilder::component(&SPARKLINE)
            .prop("data", Rx::new("points"))
            .prop("stroke_width", 2)
            .prop("smooth", false)
            .build()
            .unwrap();
        assert_eq!(
            chart.to_json().unwrap(),
            json!({"type": "Sparkline", "data": "{{ points }}", "smooth": false})
        );
        assert_eq!(SPARKLINE.field_index("stroke_width"), Some(1));
        assert_eq!(SPARKLINE_FIELDS[1].wire_name(), "strokeWidth");
        assert!(!SPARKLINE.container);
    }

    #[test]
    fn test_for_each_template() {
        let list = ForEach::new("todos").build().unwrap();
        list.scope(|| Text::new(Rx::new("$item").field("title")).build().map(drop))
            .unwrap();
        assert_eq!(
            list.to_json().unwrap(),
            json!({
                "type": "ForEach",
                "key": "todos",
                "children": [{"type": "Text", "content": "{{ $item.title }}"}]
            })
        );
    }

    #[test]
    fn test_field_default_matching() {
        assert!(FieldDefault::Str("default").matches(&json!("default")));
        assert!(!FieldDefault::Str("default").matches(&json!("Default")));
        assert!(FieldDefault::Bool(false).matches(&json!(false)));
        assert!(!FieldDefault::Bool(false).matches(&json!(0)));
        assert!(FieldDefault::Int(1).matches(&json!(1.0)));
        assert!(!FieldDefault::None.matches(&json!(null)));
    }
}
