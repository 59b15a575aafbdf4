//! Envelope Module for Prefab
//!
//! The top-level wire document handed to the renderer:
//!
//! ```text
//! { "version": "0.2", "view"?: Node, "defs"?: { name: Node }, "state"?: {...} }
//! ```
//!
//! Keys are omitted only when their source is absent: an empty state map is
//! still emitted as `"state": {}`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::node::{Node, NodeKind};
use crate::prop::{coerce, Prop};
use crate::transform::node_to_json;
use crate::validate::{validate_top_level_state_key, PrefabError, Result};

/// Wire protocol generation understood by the renderer.
pub const PROTOCOL_VERSION: &str = "0.2";

#[derive(Debug, Clone, Default)]
pub struct Envelope {
    view: Option<Node>,
    defs: Vec<(String, Node)>,
    state: Option<Map<String, Value>>,
}

impl Envelope {
    /// Validates `defs` and `state` up front; serialization only reports
    /// structural errors inside the trees.
    pub fn new(
        view: Option<Node>,
        defs: Option<Vec<Node>>,
        state: Option<Map<String, Value>>,
    ) -> Result<Self> {
        let mut builder = EnvelopeBuilder::default();
        builder.view = view;
        builder.defs = defs.unwrap_or_default();
        builder.state = state.map(|map| {
            map.into_iter()
                .map(|(key, value)| (key, Prop::Json(value)))
                .collect()
        });
        builder.build()
    }

    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::default()
    }

    pub fn view(&self) -> Option<&Node> {
        self.view.as_ref()
    }

    pub fn state(&self) -> Option<&Map<String, Value>> {
        self.state.as_ref()
    }

    pub fn definition(&self, name: &str) -> Option<&Node> {
        self.defs
            .iter()
            .find(|(def_name, _)| def_name == name)
            .map(|(_, node)| node)
    }

    pub fn to_json(&self) -> Result<Value> {
        let mut doc = Map::new();
        doc.insert(
            "version".to_string(),
            Value::String(PROTOCOL_VERSION.to_string()),
        );
        if let Some(view) = &self.view {
            doc.insert("view".to_string(), node_to_json(view)?);
        }
        if !self.defs.is_empty() {
            let mut defs = Map::new();
            for (name, node) in &self.defs {
                defs.insert(name.clone(), node_to_json(node)?);
            }
            doc.insert("defs".to_string(), Value::Object(defs));
        }
        if let Some(state) = &self.state {
            doc.insert("state".to_string(), Value::Object(state.clone()));
        }
        tracing::debug!(
            has_view = self.view.is_some(),
            defs = self.defs.len(),
            has_state = self.state.is_some(),
            "assembled envelope"
        );
        Ok(Value::Object(doc))
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
#[must_use = "an EnvelopeBuilder does nothing until build() is called"]
pub struct EnvelopeBuilder {
    view: Option<Node>,
    defs: Vec<Node>,
    state: Option<Vec<(String, Prop)>>,
}

impl EnvelopeBuilder {
    pub fn view(mut self, view: Node) -> Self {
        self.view = Some(view);
        self
    }

    pub fn define(mut self, definition: Node) -> Self {
        self.defs.push(definition);
        self
    }

    /// Sets the initial state. Values may embed reactive references; an
    /// empty iterator still produces `"state": {}`.
    pub fn state<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Prop>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.state = Some(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    pub fn state_entry(mut self, key: impl Into<String>, value: impl Into<Prop>) -> Self {
        self.state
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<Envelope> {
        let state = match self.state {
            Some(entries) => {
                let mut map = Map::new();
                for (key, value) in entries {
                    validate_top_level_state_key(&key)?;
                    map.insert(key, coerce(value));
                }
                Some(map)
            }
            None => None,
        };

        let mut defs: Vec<(String, Node)> = Vec::with_capacity(self.defs.len());
        for node in self.defs {
            let name = match node.kind() {
                NodeKind::Define(name) => name,
                other => {
                    return Err(PrefabError::NotADefinition {
                        tag: other.tag().to_string(),
                    })
                }
            };
            if defs.iter().any(|(existing, _)| *existing == name) {
                return Err(PrefabError::DuplicateDefinition { name });
            }
            defs.push((name, node));
        }

        Ok(Envelope {
            view: self.view,
            defs,
            state,
        })
    }
}
