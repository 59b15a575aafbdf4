//! Validation Module for Prefab
//!
//! Error taxonomy, invariant codes and the identifier rules guarding every
//! name that ends up inside a `{{ }}` expression.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// INVARIANT CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_INVALID_STATE_KEY: &str = "PF001";
pub const ERR_RESERVED_STATE_KEY: &str = "PF002";
pub const ERR_ALREADY_INSERTED: &str = "PF003";
pub const ERR_NO_ACTIVE_CONTAINER: &str = "PF004";
pub const ERR_ORPHANED_BRANCH: &str = "PF005";
pub const ERR_UNKNOWN_FIELD: &str = "PF006";
pub const ERR_NOT_A_CONTAINER: &str = "PF007";
pub const ERR_EMPTY_DEFINE: &str = "PF008";
pub const ERR_NOT_A_DEFINITION: &str = "PF009";
pub const ERR_DUPLICATE_DEFINITION: &str = "PF010";
pub const ERR_INVALID_OPTIONS: &str = "PF011";
pub const ERR_CYCLIC_OWNERSHIP: &str = "PF012";
pub const ERR_DEFINE_AS_CHILD: &str = "PF013";

// ═══════════════════════════════════════════════════════════════════════════════
// GUARANTEES
// ═══════════════════════════════════════════════════════════════════════════════

fn get_guarantee(code: &str) -> &'static str {
    match code {
        ERR_INVALID_STATE_KEY => "Every state key is a valid expression identifier path.",
        ERR_RESERVED_STATE_KEY => "Top-level state keys never use the reserved '$' prefix.",
        ERR_ALREADY_INSERTED => "A node is owned by at most one container.",
        ERR_NO_ACTIVE_CONTAINER => "Manual insertion always has a target container.",
        ERR_ORPHANED_BRANCH => {
            "Elif and Else always continue a chain started by an If among the same siblings."
        }
        ERR_UNKNOWN_FIELD => "Only declared fields reach the wire format.",
        ERR_NOT_A_CONTAINER => "Only containers own children or scoped bindings.",
        ERR_EMPTY_DEFINE => "Every definition has a body.",
        ERR_NOT_A_DEFINITION => "The defs registry only holds Define nodes.",
        ERR_DUPLICATE_DEFINITION => "Definition names are unique within an envelope.",
        ERR_INVALID_OPTIONS => "Options are well-formed before any tree is built.",
        ERR_CYCLIC_OWNERSHIP => "The node graph is a tree: no node is its own ancestor.",
        ERR_DEFINE_AS_CHILD => "Definitions are only reachable through Use references.",
        _ => "Unknown invariant.",
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREFAB ERROR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefabError {
    #[error(
        "invalid {field} '{value}': segment '{segment}' must match [A-Za-z_$][A-Za-z0-9_$]* \
         (hyphens are not valid inside a {{{{ }}}} expression)"
    )]
    InvalidStateKey {
        field: String,
        value: String,
        segment: String,
    },

    #[error("state key '{key}' starts with the reserved '$' prefix")]
    ReservedStateKey { key: String },

    #[error("{tag} node is already a child of a container and cannot be inserted again")]
    AlreadyInserted { tag: String },

    #[error("insert() requires an active container, but none is active")]
    NoActiveContainer,

    #[error("orphaned {kind}: {kind} must immediately follow an If or Elif")]
    OrphanedBranch { kind: &'static str },

    #[error("{tag} has no field named '{field}'")]
    UnknownField { tag: String, field: String },

    #[error("{tag} is not a container and cannot hold children or scoped bindings")]
    NotAContainer { tag: String },

    #[error("Define '{name}' has no children to use as its body")]
    EmptyDefine { name: String },

    #[error("defs entries must be Define nodes, got {tag}")]
    NotADefinition { tag: String },

    #[error("definition '{name}' is declared more than once")]
    DuplicateDefinition { name: String },

    #[error("invalid prefab options: {0}")]
    InvalidOptions(String),

    #[error("{tag} cannot become a descendant of itself")]
    CyclicOwnership { tag: String },

    #[error("Define '{name}' cannot be a child; reference it with Use(\"{name}\")")]
    DefineAsChild { name: String },
}

impl PrefabError {
    pub fn code(&self) -> &'static str {
        match self {
            PrefabError::InvalidStateKey { .. } => ERR_INVALID_STATE_KEY,
            PrefabError::ReservedStateKey { .. } => ERR_RESERVED_STATE_KEY,
            PrefabError::AlreadyInserted { .. } => ERR_ALREADY_INSERTED,
            PrefabError::NoActiveContainer => ERR_NO_ACTIVE_CONTAINER,
            PrefabError::OrphanedBranch { .. } => ERR_ORPHANED_BRANCH,
            PrefabError::UnknownField { .. } => ERR_UNKNOWN_FIELD,
            PrefabError::NotAContainer { .. } => ERR_NOT_A_CONTAINER,
            PrefabError::EmptyDefine { .. } => ERR_EMPTY_DEFINE,
            PrefabError::NotADefinition { .. } => ERR_NOT_A_DEFINITION,
            PrefabError::DuplicateDefinition { .. } => ERR_DUPLICATE_DEFINITION,
            PrefabError::InvalidOptions(_) => ERR_INVALID_OPTIONS,
            PrefabError::CyclicOwnership { .. } => ERR_CYCLIC_OWNERSHIP,
            PrefabError::DefineAsChild { .. } => ERR_DEFINE_AS_CHILD,
        }
    }

    /// The invariant this error protects, phrased for authors.
    pub fn guarantee(&self) -> &'static str {
        get_guarantee(self.code())
    }
}

pub type Result<T, E = PrefabError> = std::result::Result<T, E>;

// ═══════════════════════════════════════════════════════════════════════════════
// IDENTIFIER RULES
// ═══════════════════════════════════════════════════════════════════════════════

lazy_static! {
    static ref IDENTIFIER_RE: Regex = Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").unwrap();
}

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Checks a single identifier, e.g. a `let` binding name.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    if is_identifier(value) {
        return Ok(());
    }
    Err(PrefabError::InvalidStateKey {
        field: field.to_string(),
        value: value.to_string(),
        segment: value.to_string(),
    })
}

/// Checks a dotted state path such as `form.email`; every segment must be
/// an identifier.
pub fn validate_state_key(field: &str, value: &str) -> Result<()> {
    for segment in value.split('.') {
        if !is_identifier(segment) {
            return Err(PrefabError::InvalidStateKey {
                field: field.to_string(),
                value: value.to_string(),
                segment: segment.to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_top_level_state_key(key: &str) -> Result<()> {
    if key.starts_with('$') {
        return Err(PrefabError::ReservedStateKey {
            key: key.to_string(),
        });
    }
    Ok(())
}
