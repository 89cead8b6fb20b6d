pub mod child;
pub mod parent;
pub mod relations;

// Re-export models for easy access
pub use child::{Child, NewChild, ParentRef};
pub use parent::{NewParent, Parent};
pub use relations::{CappedChildren, LoadedParent};
