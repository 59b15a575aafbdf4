//! Construction Context for Prefab
//!
//! Tracks the "current parent" while a tree is being authored. Everything
//! lives in one thread-local session:
//! - the stack of entered containers
//! - per-prefix auto-name counters
//! - the active [`PrefabOptions`]
//!
//! Trees built on different threads never see each other's state.
//!
//! # Pattern: Guarded Push/Pop
//!
//! Entering a container hands back a [`ContextGuard`]; dropping the guard
//! restores the stack to its depth before the push. Early `?` returns and
//! panics both run the guard, so the stack never stays corrupted.
//!
//! ```ignore
//! let page = Column::new().build()?;
//! page.scope(|| {
//!     Heading::new("Inventory").build()?;
//!     let row = Row::new().build()?;
//!     row.scope(|| {
//!         Button::new("Add").build()?;
//!         Ok(())
//!     })
//! })?;
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::node::Node;
use crate::options::PrefabOptions;
use crate::validate::{PrefabError, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// SESSION STATE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Session {
    stack: Vec<Node>,
    counters: HashMap<String, u64>,
    options: PrefabOptions,
}

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT STACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Restores the context stack when dropped.
///
/// The guard only unwinds the stack it pushed onto: if its container is no
/// longer at the recorded depth (a deferred block restored an outer stack
/// in the meantime), dropping it leaves the stack alone.
#[must_use = "dropping the guard immediately leaves the container"]
pub struct ContextGuard {
    depth: usize,
    node: Node,
    // Bound to the thread whose stack it restores.
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let _ = SESSION.try_with(|session| {
            let mut session = session.borrow_mut();
            let ours = session
                .stack
                .get(self.depth)
                .is_some_and(|entry| entry.ptr_eq(&self.node));
            if ours {
                session.stack.truncate(self.depth);
            }
        });
    }
}

/// Pushes `node` as the current parent.
pub fn enter(node: &Node) -> Result<ContextGuard> {
    if !node.is_container() {
        return Err(PrefabError::NotAContainer { tag: node.tag() });
    }
    let depth = SESSION.with(|session| {
        let mut session = session.borrow_mut();
        let depth = session.stack.len();
        session.stack.push(node.clone());
        depth
    });
    Ok(ContextGuard {
        depth,
        node: node.clone(),
        _not_send: PhantomData,
    })
}

pub fn current_container() -> Option<Node> {
    SESSION.with(|session| session.borrow().stack.last().cloned())
}

pub fn depth() -> usize {
    SESSION.with(|session| session.borrow().stack.len())
}

/// Places a previously deferred node into the current parent.
pub fn insert(node: &Node) -> Result<()> {
    let parent = current_container().ok_or(PrefabError::NoActiveContainer)?;
    let on_stack =
        SESSION.with(|session| session.borrow().stack.iter().any(|entry| entry.ptr_eq(node)));
    if node.has_parent() || on_stack {
        return Err(PrefabError::AlreadyInserted { tag: node.tag() });
    }
    tracing::debug!(node = %node.tag(), parent = %parent.tag(), "inserting deferred node");
    parent.adopt(node)
}

// ═══════════════════════════════════════════════════════════════════════════════
// DEFERRED CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Suppresses auto-attachment to every enclosing container until dropped.
/// Containers entered while the guard lives still nest normally.
#[must_use = "dropping the guard immediately ends the deferred block"]
pub(crate) struct DeferGuard {
    saved: Option<Vec<Node>>,
    _not_send: PhantomData<Rc<()>>,
}

impl Drop for DeferGuard {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            let _ = SESSION.try_with(|session| session.borrow_mut().stack = saved);
        }
    }
}

pub(crate) fn deferring() -> DeferGuard {
    let saved = SESSION.with(|session| std::mem::take(&mut session.borrow_mut().stack));
    tracing::debug!(suspended = saved.len(), "deferring attachment");
    DeferGuard {
        saved: Some(saved),
        _not_send: PhantomData,
    }
}

/// Runs `body` with auto-attachment suppressed; nodes built inside stay
/// detached until passed to [`insert`].
pub fn defer<T>(body: impl FnOnce() -> T) -> T {
    let _guard = deferring();
    body()
}

// ═══════════════════════════════════════════════════════════════════════════════
// AUTO-NAMING
// ═══════════════════════════════════════════════════════════════════════════════

/// Next `"{prefix}_{n}"` for this thread, counting from 1 per prefix.
pub fn next_auto_name(prefix: &str) -> String {
    SESSION.with(|session| {
        let mut session = session.borrow_mut();
        let counter = session.counters.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{}_{}", prefix, counter)
    })
}

/// Resets auto-name counters. Never called by the library itself.
pub fn reset_counters() {
    SESSION.with(|session| session.borrow_mut().counters.clear());
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

/// Installs options for this thread, returning the previous ones.
pub fn configure(options: PrefabOptions) -> PrefabOptions {
    SESSION.with(|session| std::mem::replace(&mut session.borrow_mut().options, options))
}

pub fn options() -> PrefabOptions {
    SESSION.with(|session| session.borrow().options.clone())
}
