//! Skeleton correspondence resolver.
//!
//! This module provides path rewriting, per-bone resolution, whole-tree
//! mapping with helper synthesis, scale inference, and the degraded-mode
//! resolver over serialized bone references.
//!
//! # Example
//!
//! ```ignore
//! use bonemap_core::resolver::mapper::build_map_with_rules;
//!
//! let result = build_map_with_rules(&source, &destination, &rules);
//! assert!(result.diagnostic.unresolved.is_empty());
//! ```
pub mod diagnostics;
pub mod mapper;
pub mod node;
pub mod rewrite;
pub mod scale;
pub mod serialized;

/// Resolver submodule identifier.
pub fn module_name() -> &'static str {
    "resolver"
}
