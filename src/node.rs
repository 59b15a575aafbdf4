//! Node Model for Prefab
//!
//! A [`Node`] is a shared handle to one element of the UI tree. Handles are
//! cheap to clone and compare by identity: two handles are the same node
//! only if they point at the same allocation.
//!
//! Nodes are created through a [`NodeBuilder`], which runs the construction
//! pipeline in a fixed order:
//!
//! 1. **coerce**: every reactive reference in the raw props becomes its
//!    `{{ ... }}` string
//! 2. **validate**: unknown fields, auto-naming, state-key identifiers
//! 3. **store**: defaults are dropped, explicit children are adopted
//! 4. **attach**: the node joins the active container, unless deferred

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::component::ComponentDef;
use crate::context::{self, ContextGuard};
use crate::prop::{coerce, Prop};
use crate::rx::Rx;
use crate::transform;
use crate::validate::{validate_identifier, validate_state_key, PrefabError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// NODE KINDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Authoring-only conditional branches, folded into `Condition` on output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    If(String),
    Elif(String),
    Else,
}

impl Branch {
    pub fn label(&self) -> &'static str {
        match self {
            Branch::If(_) => "If",
            Branch::Elif(_) => "Elif",
            Branch::Else => "Else",
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Leaf(&'static ComponentDef),
    Container(&'static ComponentDef),
    Branch(Branch),
    Define(String),
    Use(String),
}

impl NodeKind {
    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Leaf(def) | NodeKind::Container(def) => def.tag,
            NodeKind::Branch(branch) => branch.label(),
            NodeKind::Define(_) => "Define",
            NodeKind::Use(_) => "Use",
        }
    }

    /// Containers own children and may be entered.
    pub fn is_container(&self) -> bool {
        !matches!(self, NodeKind::Leaf(_) | NodeKind::Use(_))
    }
}

pub(crate) struct NodeInner {
    pub(crate) kind: NodeKind,
    /// Wire name and value, in declaration order.
    pub(crate) fields: Vec<(String, Value)>,
    pub(crate) css_class: Option<Value>,
    pub(crate) bindings: Map<String, Value>,
    pub(crate) children: Vec<Node>,
    parent: Weak<RefCell<NodeInner>>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeInner>>);

impl Node {
    fn new(inner: NodeInner) -> Self {
        Node(Rc::new(RefCell::new(inner)))
    }

    pub(crate) fn inner(&self) -> Ref<'_, NodeInner> {
        self.0.borrow()
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn kind(&self) -> NodeKind {
        self.inner().kind.clone()
    }

    pub fn tag(&self) -> String {
        self.inner().kind.tag().to_string()
    }

    pub fn is_container(&self) -> bool {
        self.inner().kind.is_container()
    }

    pub fn branch(&self) -> Option<Branch> {
        match &self.inner().kind {
            NodeKind::Branch(branch) => Some(branch.clone()),
            _ => None,
        }
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.inner().children.len()
    }

    /// Field value by wire name, after default omission.
    pub fn field(&self, wire_name: &str) -> Option<Value> {
        self.inner()
            .fields
            .iter()
            .find(|(name, _)| name == wire_name)
            .map(|(_, value)| value.clone())
    }

    pub fn name(&self) -> Option<String> {
        match self.field("name") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        }
    }

    /// Reference to the state key this node writes to, for stateful
    /// controls such as inputs and checkboxes.
    pub fn rx(&self) -> Option<Rx> {
        self.name().map(Rx::new)
    }

    pub fn parent(&self) -> Option<Node> {
        self.inner().parent.upgrade().map(Node)
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    /// Makes this node the current parent until the guard drops.
    pub fn enter(&self) -> Result<ContextGuard> {
        context::enter(self)
    }

    /// Runs `body` with this node as the current parent. The context stack
    /// is restored however `body` exits.
    pub fn scope<T>(&self, body: impl FnOnce() -> Result<T>) -> Result<T> {
        let _guard = context::enter(self)?;
        body()
    }

    pub fn to_json(&self) -> Result<Value> {
        transform::node_to_json(self)
    }

    /// Rejects an adoption that would inline a definition or make `child`
    /// its own ancestor.
    pub(crate) fn check_adoptable(&self, child: &Node) -> Result<()> {
        if let NodeKind::Define(name) = &child.inner().kind {
            return Err(PrefabError::DefineAsChild { name: name.clone() });
        }
        let mut cursor = Some(self.clone());
        while let Some(ancestor) = cursor {
            if ancestor.ptr_eq(child) {
                return Err(PrefabError::CyclicOwnership { tag: child.tag() });
            }
            cursor = ancestor.parent();
        }
        Ok(())
    }

    /// Appends `child` and records this node as its owner.
    pub(crate) fn adopt(&self, child: &Node) -> Result<()> {
        self.check_adoptable(child)?;
        if context::options().eager_branch_check {
            let previous = self.inner().children.last().cloned();
            transform::check_branch_order(previous.as_ref(), child)?;
        }
        self.0.borrow_mut().children.push(child.clone());
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        Ok(())
    }

    /// Removes this node from its owner's children, by identity.
    pub(crate) fn detach(&self) {
        let Some(parent) = self.parent() else { return };
        parent
            .0
            .borrow_mut()
            .children
            .retain(|child| !child.ptr_eq(self));
        self.0.borrow_mut().parent = Weak::new();
        tracing::trace!(
            child = %self.tag(),
            parent = %parent.tag(),
            "detached explicit child from implicit parent"
        );
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner();
        f.debug_struct("Node")
            .field("type", &inner.kind.tag())
            .field("fields", &inner.fields)
            .field("children", &inner.children)
            .finish()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
enum Pending {
    Component(&'static ComponentDef),
    Branch(Branch),
    Define(String),
    Use(String),
}

#[derive(Debug)]
#[must_use = "a NodeBuilder does nothing until build() is called"]
pub struct NodeBuilder {
    pending: Pending,
    props: Vec<(String, Prop)>,
    css_class: Option<Prop>,
    bindings: Vec<(String, Prop)>,
    children: Option<Vec<Node>>,
    deferred: bool,
}

impl NodeBuilder {
    fn from_pending(pending: Pending) -> Self {
        NodeBuilder {
            pending,
            props: Vec::new(),
            css_class: None,
            bindings: Vec::new(),
            children: None,
            deferred: false,
        }
    }

    pub fn component(def: &'static ComponentDef) -> Self {
        Self::from_pending(Pending::Component(def))
    }

    pub(crate) fn branch(branch: Branch) -> Self {
        Self::from_pending(Pending::Branch(branch))
    }

    pub(crate) fn define(name: String) -> Self {
        Self::from_pending(Pending::Define(name))
    }

    pub(crate) fn use_ref(name: String) -> Self {
        Self::from_pending(Pending::Use(name))
    }

    /// Sets a field by its declared (snake_case) name. Setting the same
    /// field twice keeps the last value.
    pub fn prop(mut self, field: &str, value: impl Into<Prop>) -> Self {
        let value = value.into();
        match self.props.iter_mut().find(|(name, _)| name == field) {
            Some(slot) => slot.1 = value,
            None => self.props.push((field.to_string(), value)),
        }
        self
    }

    pub fn css_class(mut self, class: impl Into<Prop>) -> Self {
        self.css_class = Some(class.into());
        self
    }

    /// Adds a scoped `let` binding (or a `Use` override).
    pub fn bind(mut self, key: &str, value: impl Into<Prop>) -> Self {
        self.bindings.push((key.to_string(), value.into()));
        self
    }

    /// Explicit children. They are pulled out of whatever container they
    /// were auto-attached to and owned by this node only.
    pub fn children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    /// Build without attaching to the active container; place it later
    /// with [`crate::context::insert`].
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    pub fn build(self) -> Result<Node> {
        let NodeBuilder {
            pending,
            props,
            css_class,
            bindings,
            children,
            deferred,
        } = self;

        // coerce
        let props: Vec<(String, Value)> = props
            .into_iter()
            .map(|(name, value)| (name, coerce(value)))
            .collect();
        let css_class = css_class.map(coerce).filter(|value| !value.is_null());
        let bindings: Vec<(String, Value)> = bindings
            .into_iter()
            .map(|(key, value)| (key, coerce(value)))
            .collect();

        // validate
        let (kind, fields) = match pending {
            Pending::Component(def) => {
                let fields = resolve_fields(def, props)?;
                let kind = if def.container {
                    NodeKind::Container(def)
                } else {
                    NodeKind::Leaf(def)
                };
                (kind, fields)
            }
            Pending::Branch(branch) => structural(NodeKind::Branch(branch), props)?,
            Pending::Define(name) => structural(NodeKind::Define(name), props)?,
            Pending::Use(name) => structural(NodeKind::Use(name), props)?,
        };

        // Branches and definitions have no wire slot for `let` or `cssClass`.
        let structural_kind = matches!(kind, NodeKind::Branch(_) | NodeKind::Define(_));
        if structural_kind && css_class.is_some() {
            return Err(PrefabError::UnknownField {
                tag: kind.tag().to_string(),
                field: "css_class".to_string(),
            });
        }
        if !bindings.is_empty() {
            if structural_kind {
                return Err(PrefabError::UnknownField {
                    tag: kind.tag().to_string(),
                    field: "let".to_string(),
                });
            }
            if !kind.is_container() && !matches!(kind, NodeKind::Use(_)) {
                return Err(PrefabError::NotAContainer {
                    tag: kind.tag().to_string(),
                });
            }
        }
        let mut binding_map = Map::new();
        for (key, value) in bindings {
            validate_identifier("let binding", &key)?;
            binding_map.insert(key, value);
        }

        if children.is_some() && !kind.is_container() {
            return Err(PrefabError::NotAContainer {
                tag: kind.tag().to_string(),
            });
        }

        // store
        let is_define = matches!(kind, NodeKind::Define(_));
        let node = Node::new(NodeInner {
            kind,
            fields,
            css_class,
            bindings: binding_map,
            children: Vec::new(),
            parent: Weak::new(),
        });
        let children = children.unwrap_or_default();
        let target = if deferred || is_define {
            None
        } else {
            context::current_container()
        };
        // Checked up front so a rejected list leaves every child where it was.
        for child in &children {
            node.check_adoptable(child)?;
            if let Some(target) = &target {
                target.check_adoptable(child)?;
            }
        }
        for child in children {
            child.detach();
            node.adopt(&child)?;
        }

        // attach
        if deferred {
            tracing::trace!(node = %node.tag(), "construction deferred");
        } else if let Some(target) = target {
            tracing::trace!(node = %node.tag(), parent = %target.tag(), "auto-attach");
            target.adopt(&node)?;
        }
        Ok(node)
    }
}

/// Maps declared field names to wire names, applying auto-naming, state-key
/// validation and default omission.
fn resolve_fields(
    def: &'static ComponentDef,
    props: Vec<(String, Value)>,
) -> Result<Vec<(String, Value)>> {
    let mut values: Vec<Option<Value>> = vec![None; def.fields.len()];
    for (name, value) in props {
        let index = def
            .field_index(&name)
            .ok_or_else(|| PrefabError::UnknownField {
                tag: def.tag.to_string(),
                field: name.clone(),
            })?;
        values[index] = Some(value);
    }

    if let (Some(prefix), Some(index)) = (def.auto_name, def.field_index("name")) {
        let unset = values[index].as_ref().map_or(true, Value::is_null);
        if unset {
            values[index] = Some(Value::String(context::next_auto_name(prefix)));
        }
    }

    for key_field in def.state_keys {
        let Some(index) = def.field_index(key_field) else { continue };
        if let Some(Value::String(key)) = &values[index] {
            validate_state_key(key_field, key)?;
        }
    }

    Ok(def
        .fields
        .iter()
        .zip(values)
        .filter_map(|(field, value)| {
            let value = value?;
            if value.is_null() || field.default.matches(&value) {
                None
            } else {
                Some((field.wire_name().to_string(), value))
            }
        })
        .collect())
}

/// Structural kinds declare no fields of their own.
fn structural(
    kind: NodeKind,
    props: Vec<(String, Value)>,
) -> Result<(NodeKind, Vec<(String, Value)>)> {
    if let Some((field, _)) = props.into_iter().next() {
        return Err(PrefabError::UnknownField {
            tag: kind.tag().to_string(),
            field,
        });
    }
    Ok((kind, Vec::new()))
}
