//! Structural nodes: conditional branches and named templates.
//!
//! None of these reach the wire under their own tag:
//! - `If` / `Elif` / `Else` siblings fold into one `Condition` node
//! - `Define` serializes as its body and never auto-attaches
//! - `Use` serializes as a `$ref` pointing at a definition
//!
//! ```ignore
//! let page = Column::new().build()?;
//! page.scope(|| {
//!     If::new(inventory.eq_to(0)).build()?.scope(|| Text::new("Sold out").build().map(drop))?;
//!     Elif::new("inventory < 10").build()?.scope(|| Text::new("Low stock").build().map(drop))?;
//!     Else::new().build()?.scope(|| Text::new("In stock").build().map(drop))?;
//!     Ok(())
//! })?;
//! ```

use serde_json::Value;

use crate::node::{Branch, NodeBuilder};
use crate::prop::{coerce, Prop};

/// Condition text as authored; an `Rx` arrives already wrapped in `{{ }}`.
fn condition_text(condition: Prop) -> String {
    match coerce(condition) {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

pub struct If;

impl If {
    pub fn new(condition: impl Into<Prop>) -> NodeBuilder {
        NodeBuilder::branch(Branch::If(condition_text(condition.into())))
    }
}

pub struct Elif;

impl Elif {
    pub fn new(condition: impl Into<Prop>) -> NodeBuilder {
        NodeBuilder::branch(Branch::Elif(condition_text(condition.into())))
    }
}

pub struct Else;

impl Else {
    pub fn new() -> NodeBuilder {
        NodeBuilder::branch(Branch::Else)
    }
}

/// Named template body, registered through an envelope's `defs`.
pub struct Define;

impl Define {
    pub fn new(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::define(name.into())
    }
}

/// Reference to a definition; `bind` supplies its `let` overrides.
pub struct Use;

impl Use {
    pub fn new(name: impl Into<String>) -> NodeBuilder {
        NodeBuilder::use_ref(name.into())
    }
}
