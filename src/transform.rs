//! Serialization Engine for Prefab
//!
//! Turns a node tree into its wire form. Ordinary nodes serialize
//! independently; three kinds depend on their surroundings instead:
//!
//! - **If / Elif / Else** are folded, per sibling list, into a single
//!   `{"type": "Condition", "cases": [...], "else"?: [...]}` node
//! - **Define** emits its body, never a `Define`-tagged node
//! - **Use** emits `{"$ref": name, "let"?, "cssClass"?}` with no `type`
//!
//! Orphaned Elif/Else siblings are reported here, when the sibling list is
//! walked, not when the nodes are built.

use serde_json::{Map, Value};

use crate::context;
use crate::node::{Branch, Node, NodeInner, NodeKind};
use crate::validate::{PrefabError, Result};

pub const CONDITION_TYPE: &str = "Condition";

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

pub fn node_to_json(node: &Node) -> Result<Value> {
    let inner = node.inner();
    match &inner.kind {
        NodeKind::Leaf(def) | NodeKind::Container(def) => component_to_json(def.tag, &inner),
        NodeKind::Branch(_) => {
            // A branch serialized on its own is a one-element sibling list.
            let (condition, _) = fold_branch(std::slice::from_ref(node))?;
            Ok(condition)
        }
        NodeKind::Define(name) => define_body(name, &inner.children),
        NodeKind::Use(name) => Ok(use_to_json(name, &inner)),
    }
}

fn component_to_json(tag: &str, inner: &NodeInner) -> Result<Value> {
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(tag.to_string()));
    for (wire_name, value) in &inner.fields {
        obj.insert(wire_name.clone(), value.clone());
    }
    if let Some(css_class) = &inner.css_class {
        obj.insert("cssClass".to_string(), css_class.clone());
    }
    if !inner.bindings.is_empty() {
        obj.insert("let".to_string(), Value::Object(inner.bindings.clone()));
    }
    if !inner.children.is_empty() {
        obj.insert(
            "children".to_string(),
            Value::Array(children_to_json(&inner.children)?),
        );
    }
    Ok(Value::Object(obj))
}

fn use_to_json(name: &str, inner: &NodeInner) -> Value {
    let mut obj = Map::new();
    obj.insert("$ref".to_string(), Value::String(name.to_string()));
    if !inner.bindings.is_empty() {
        obj.insert("let".to_string(), Value::Object(inner.bindings.clone()));
    }
    if let Some(css_class) = &inner.css_class {
        obj.insert("cssClass".to_string(), css_class.clone());
    }
    Value::Object(obj)
}

/// A single child is the body as-is; several are wrapped in the configured
/// wrapper type.
fn define_body(name: &str, children: &[Node]) -> Result<Value> {
    match children {
        [] => Err(PrefabError::EmptyDefine {
            name: name.to_string(),
        }),
        [only] => node_to_json(only),
        _ => {
            let mut obj = Map::new();
            obj.insert(
                "type".to_string(),
                Value::String(context::options().define_wrapper),
            );
            obj.insert(
                "children".to_string(),
                Value::Array(children_to_json(children)?),
            );
            Ok(Value::Object(obj))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SIBLING GROUPING
// ═══════════════════════════════════════════════════════════════════════════════

/// Serializes a sibling list, folding every If/Elif/Else chain into one
/// `Condition` node.
pub fn children_to_json(siblings: &[Node]) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(siblings.len());
    let mut i = 0;
    while i < siblings.len() {
        let (value, consumed) = fold_branch(&siblings[i..])?;
        out.push(value);
        i += consumed;
    }
    Ok(out)
}

/// Serializes the node at the head of `siblings`, consuming the rest of its
/// conditional chain when it starts one. Returns the value and how many
/// siblings it used.
fn fold_branch(siblings: &[Node]) -> Result<(Value, usize)> {
    let head = &siblings[0];
    let condition = match head.branch() {
        None => return Ok((node_to_json(head)?, 1)),
        Some(Branch::If(condition)) => condition,
        Some(orphan) => {
            return Err(PrefabError::OrphanedBranch {
                kind: orphan.label(),
            })
        }
    };

    let mut cases = vec![case_to_json(&condition, head)?];
    let mut otherwise = None;
    let mut consumed = 1;
    for sibling in &siblings[1..] {
        match sibling.branch() {
            Some(Branch::Elif(condition)) => {
                cases.push(case_to_json(&condition, sibling)?);
                consumed += 1;
            }
            Some(Branch::Else) => {
                otherwise = Some(children_to_json(&sibling.children())?);
                consumed += 1;
                break;
            }
            _ => break,
        }
    }

    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(CONDITION_TYPE.to_string()));
    obj.insert("cases".to_string(), Value::Array(cases));
    if let Some(otherwise) = otherwise {
        obj.insert("else".to_string(), Value::Array(otherwise));
    }
    Ok((Value::Object(obj), consumed))
}

fn case_to_json(condition: &str, branch: &Node) -> Result<Value> {
    let mut case = Map::new();
    case.insert("when".to_string(), Value::String(bracket_condition(condition)));
    let children = branch.children();
    if !children.is_empty() {
        case.insert(
            "children".to_string(),
            Value::Array(children_to_json(&children)?),
        );
    }
    Ok(Value::Object(case))
}

/// Wraps a raw expression in `{{ }}`; already-wrapped text passes through.
pub fn bracket_condition(condition: &str) -> String {
    let trimmed = condition.trim();
    if trimmed.starts_with("{{") && trimmed.ends_with("}}") {
        condition.to_string()
    } else {
        format!("{{{{ {} }}}}", trimmed)
    }
}

/// Append-time form of the orphan check, used when eager checking is on.
pub(crate) fn check_branch_order(previous: Option<&Node>, next: &Node) -> Result<()> {
    let Some(branch @ (Branch::Elif(_) | Branch::Else)) = next.branch() else {
        return Ok(());
    };
    let continues_chain = matches!(
        previous.and_then(Node::branch),
        Some(Branch::If(_) | Branch::Elif(_))
    );
    if continues_chain {
        Ok(())
    } else {
        Err(PrefabError::OrphanedBranch {
            kind: branch.label(),
        })
    }
}
