//! # Prefab Component Tree Ground Truth
//!
//! Server-side construction of UI trees that serialize to the JSON wire
//! format consumed by the Prefab renderer.
//!
//! ## Construction Invariants
//!
//! 1. **Implicit Attachment**: a node built while a container is entered is
//!    appended to that container, in construction order. Deferred nodes and
//!    `Define` nodes never auto-attach.
//!
//! 2. **Exclusive Ownership**: a node has at most one parent and is never
//!    its own ancestor. Explicit `children(...)` lists pull their nodes out
//!    of whatever container they were auto-attached to; `insert` refuses a
//!    node that already has one. A `Define` is never anyone's child.
//!
//! 3. **Scoped Stack**: the context stack is thread-local and restored by
//!    RAII guards, so an early `?` or a panic never leaves a container
//!    entered.
//!
//! 4. **Coerce Before Validate**: every `Rx` inside a field value becomes a
//!    `{{ ... }}` string before any other validation runs. State-key fields
//!    must be identifier paths; hyphens are rejected.
//!
//! ## Wire Invariants
//!
//! 1. `null` is never emitted; fields equal to their declared default are
//!    dropped, and so is an empty `children` list.
//! 2. Consecutive `If`/`Elif`/`Else` siblings become one `Condition` node.
//!    An `Elif`/`Else` that does not continue a chain is an error.
//! 3. `Define` serializes as its body; `Use` serializes as `$ref` and has no
//!    `type`.
//! 4. The envelope is `{version, view?, defs?, state?}`; state keys never
//!    start with `$`.
//!
//! ```ignore
//! use prefab_core::*;
//!
//! let count = Rx::new("count");
//! let page = Column::new().prop("gap", 4).build()?;
//! page.scope(|| {
//!     Heading::new("Counter").build()?;
//!     Text::new(count.clone()).build()?;
//!     Button::new("Add")
//!         .prop("on_click", Action::set_state("count", count.clone() + 1)?)
//!         .build()?;
//!     Ok(())
//! })?;
//! let doc = Envelope::builder().view(page).state_entry("count", 0).build()?.to_json()?;
//! ```

mod action;
mod component;
pub mod context;
mod control_flow;
mod envelope;
mod node;
mod options;
mod prop;
mod rx;
mod transform;
mod validate;

#[cfg(test)]
mod component_tests;
#[cfg(test)]
mod envelope_tests;

pub use action::Action;
pub use component::{
    Badge, Button, Card, Checkbox, Column, ComponentDef, FieldDef, FieldDefault, ForEach,
    Heading, Input, Row, Text, BADGE, BUTTON, CARD, CHECKBOX, COLUMN, FOR_EACH, HEADING, INPUT,
    ROW, TEXT,
};
pub use context::{defer, insert, reset_counters, ContextGuard};
pub use control_flow::{Define, Elif, Else, If, Use};
pub use envelope::{Envelope, EnvelopeBuilder, PROTOCOL_VERSION};
pub use node::{Branch, Node, NodeBuilder, NodeKind};
pub use options::PrefabOptions;
pub use prop::{coerce, Prop};
pub use rx::{Operand, Rx};
pub use transform::{bracket_condition, children_to_json, node_to_json, CONDITION_TYPE};
pub use validate::*;
