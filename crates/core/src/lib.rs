//! Shared domain types: the tip catalog and the context facts that bias
//! which tip gets shown.

pub mod catalog;
mod context;

pub use catalog::{Category, all_tips, category_of};
pub use context::{CommandCategory, ContextFacts, ProjectKind};
