//! Component catalog contract.
//!
//! The serialization engine is generic over [`ComponentDef`]: a wire tag,
//! whether the component owns children, and its declared fields. Each
//! [`FieldDef`] names an external alias and a default; a value equal to the
//! default never reaches the wire.
//!
//! The handful of definitions below cover the common layout, display and
//! form controls. Additional components are plain `static` definitions:
//!
//! ```ignore
//! const SPARKLINE_FIELDS: &[FieldDef] = &[
//!     FieldDef::new("data"),
//!     FieldDef::new("stroke_width").alias("strokeWidth").default_int(2),
//! ];
//! static SPARKLINE: ComponentDef = ComponentDef::leaf("Sparkline", SPARKLINE_FIELDS);
//! let chart = NodeBuilder::component(&SPARKLINE).prop("data", Rx::new("points")).build()?;
//! ```

use serde_json::Value;

use crate::node::NodeBuilder;
use crate::prop::Prop;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    None,
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl FieldDefault {
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldDefault::None, _) => false,
            (FieldDefault::Bool(d), Value::Bool(b)) => d == b,
            (FieldDefault::Int(d), Value::Number(n)) => n.as_f64() == Some(*d as f64),
            (FieldDefault::Str(d), Value::String(s)) => d == s,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub default: FieldDefault,
}

impl FieldDef {
    pub const fn new(name: &'static str) -> Self {
        FieldDef {
            name,
            alias: None,
            default: FieldDefault::None,
        }
    }

    pub const fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn default_bool(mut self, value: bool) -> Self {
        self.default = FieldDefault::Bool(value);
        self
    }

    pub const fn default_int(mut self, value: i64) -> Self {
        self.default = FieldDefault::Int(value);
        self
    }

    pub const fn default_str(mut self, value: &'static str) -> Self {
        self.default = FieldDefault::Str(value);
        self
    }

    pub fn wire_name(&self) -> &'static str {
        self.alias.unwrap_or(self.name)
    }
}

#[derive(Debug)]
pub struct ComponentDef {
    pub tag: &'static str,
    pub container: bool,
    pub fields: &'static [FieldDef],
    /// Prefix for generated `name` values when the author leaves it unset.
    pub auto_name: Option<&'static str>,
    /// Fields whose values are state keys and must be identifier paths.
    pub state_keys: &'static [&'static str],
}

impl ComponentDef {
    pub const fn leaf(tag: &'static str, fields: &'static [FieldDef]) -> Self {
        ComponentDef {
            tag,
            container: false,
            fields,
            auto_name: None,
            state_keys: &[],
        }
    }

    pub const fn container(tag: &'static str, fields: &'static [FieldDef]) -> Self {
        ComponentDef {
            tag,
            container: true,
            fields,
            auto_name: None,
            state_keys: &[],
        }
    }

    pub const fn auto_named(mut self, prefix: &'static str) -> Self {
        self.auto_name = Some(prefix);
        self
    }

    pub const fn state_keys(mut self, keys: &'static [&'static str]) -> Self {
        self.state_keys = keys;
        self
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn builder(&'static self) -> NodeBuilder {
        NodeBuilder::component(self)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

const COLUMN_FIELDS: &[FieldDef] = &[FieldDef::new("gap"), FieldDef::new("align")];

const ROW_FIELDS: &[FieldDef] = &[
    FieldDef::new("gap"),
    FieldDef::new("align"),
    FieldDef::new("justify"),
];

const CARD_FIELDS: &[FieldDef] = &[FieldDef::new("title"), FieldDef::new("description")];

const FOR_EACH_FIELDS: &[FieldDef] = &[FieldDef::new("key")];

pub static COLUMN: ComponentDef = ComponentDef::container("Column", COLUMN_FIELDS);
pub static ROW: ComponentDef = ComponentDef::container("Row", ROW_FIELDS);
pub static CARD: ComponentDef = ComponentDef::container("Card", CARD_FIELDS);
pub static FOR_EACH: ComponentDef =
    ComponentDef::container("ForEach", FOR_EACH_FIELDS).state_keys(&["key"]);

// ═══════════════════════════════════════════════════════════════════════════════
// DISPLAY
// ═══════════════════════════════════════════════════════════════════════════════

const TEXT_FIELDS: &[FieldDef] = &[
    FieldDef::new("content"),
    FieldDef::new("bold").default_bool(false),
    FieldDef::new("italic").default_bool(false),
];

const HEADING_FIELDS: &[FieldDef] = &[
    FieldDef::new("content"),
    FieldDef::new("level").default_int(1),
];

const BADGE_FIELDS: &[FieldDef] = &[
    FieldDef::new("label"),
    FieldDef::new("variant").default_str("default"),
];

pub static TEXT: ComponentDef = ComponentDef::leaf("Text", TEXT_FIELDS);
pub static HEADING: ComponentDef = ComponentDef::leaf("Heading", HEADING_FIELDS);
pub static BADGE: ComponentDef = ComponentDef::leaf("Badge", BADGE_FIELDS);

// ═══════════════════════════════════════════════════════════════════════════════
// FORM CONTROLS
// ═══════════════════════════════════════════════════════════════════════════════

const BUTTON_FIELDS: &[FieldDef] = &[
    FieldDef::new("label"),
    FieldDef::new("variant").default_str("default"),
    FieldDef::new("size").default_str("default"),
    FieldDef::new("disabled").default_bool(false),
    FieldDef::new("on_click").alias("onClick"),
];

const INPUT_FIELDS: &[FieldDef] = &[
    FieldDef::new("name"),
    FieldDef::new("input_type").alias("inputType").default_str("text"),
    FieldDef::new("placeholder"),
    FieldDef::new("value"),
    FieldDef::new("disabled").default_bool(false),
    FieldDef::new("on_change").alias("onChange"),
];

const CHECKBOX_FIELDS: &[FieldDef] = &[
    FieldDef::new("name"),
    FieldDef::new("label"),
    FieldDef::new("value").default_bool(false),
    FieldDef::new("disabled").default_bool(false),
    FieldDef::new("on_change").alias("onChange"),
];

pub static BUTTON: ComponentDef = ComponentDef::leaf("Button", BUTTON_FIELDS);
pub static INPUT: ComponentDef = ComponentDef::leaf("Input", INPUT_FIELDS)
    .auto_named("input")
    .state_keys(&["name"]);
pub static CHECKBOX: ComponentDef = ComponentDef::leaf("Checkbox", CHECKBOX_FIELDS)
    .auto_named("checkbox")
    .state_keys(&["name"]);

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTORS
// ═══════════════════════════════════════════════════════════════════════════════

pub struct Column;

impl Column {
    pub fn new() -> NodeBuilder {
        COLUMN.builder()
    }
}

pub struct Row;

impl Row {
    pub fn new() -> NodeBuilder {
        ROW.builder()
    }
}

pub struct Card;

impl Card {
    pub fn new() -> NodeBuilder {
        CARD.builder()
    }
}

/// Repeats its children once per item of the list stored under `key`.
pub struct ForEach;

impl ForEach {
    pub fn new(key: &str) -> NodeBuilder {
        FOR_EACH.builder().prop("key", key)
    }
}

pub struct Text;

impl Text {
    pub fn new(content: impl Into<Prop>) -> NodeBuilder {
        TEXT.builder().prop("content", content)
    }
}

pub struct Heading;

impl Heading {
    pub fn new(content: impl Into<Prop>) -> NodeBuilder {
        HEADING.builder().prop("content", content)
    }
}

pub struct Badge;

impl Badge {
    pub fn new(label: impl Into<Prop>) -> NodeBuilder {
        BADGE.builder().prop("label", label)
    }
}

pub struct Button;

impl Button {
    pub fn new(label: impl Into<Prop>) -> NodeBuilder {
        BUTTON.builder().prop("label", label)
    }
}

pub struct Input;

impl Input {
    pub fn new() -> NodeBuilder {
        INPUT.builder()
    }
}

pub struct Checkbox;

impl Checkbox {
    pub fn new() -> NodeBuilder {
        CHECKBOX.builder()
    }
}
