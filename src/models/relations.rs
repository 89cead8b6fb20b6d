//! Loaded relation collections of a [`Parent`].
//!
//! Relations are only present when the query asked for them. `children_writes`
//! never appears here: it is a write handle on the session, not loaded state.

use serde::Serialize;
use std::ops::Deref;

use super::child::Child;
use super::parent::Parent;
use crate::constants::CHILDREN_CAPPED_COUNT;

/// Read-only view of a parent's newest children, at most [`CHILDREN_CAPPED_COUNT`]
///
/// The collection cannot be pushed to; new children go
/// through [`crate::session::ChildrenWrites`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CappedChildren(Vec<Child>);

impl CappedChildren {
    pub(crate) fn from_ranked(mut rows: Vec<Child>) -> Self {
        // The ranking query already limits the rows; this only guards the invariant
        rows.truncate(CHILDREN_CAPPED_COUNT as usize);
        Self(rows)
    }

    pub fn as_slice(&self) -> &[Child] {
        &self.0
    }
}

impl Deref for CappedChildren {
    type Target = [Child];

    fn deref(&self) -> &[Child] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a CappedChildren {
    type Item = &'a Child;
    type IntoIter = std::slice::Iter<'a, Child>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A parent together with whichever relations were loaded for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadedParent {
    pub parent: Parent,
    pub(crate) children: Option<Vec<Child>>,
    pub(crate) children_capped: Option<CappedChildren>,
}

impl LoadedParent {
    /// All children, newest first; `None` unless the query loaded them
    pub fn children(&self) -> Option<&[Child]> {
        self.children.as_deref()
    }

    /// The capped view, newest first; `None` unless the query loaded it
    pub fn children_capped(&self) -> Option<&CappedChildren> {
        self.children_capped.as_ref()
    }
}

impl Deref for LoadedParent {
    type Target = Parent;

    fn deref(&self) -> &Parent {
        &self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_capped_children_never_exceed_bound() {
        let parent_id = Uuid::new_v4();
        let rows = (0..5)
            .map(|i| Child {
                id: Uuid::new_v4(),
                parent_id,
                txt: Some(i.to_string()),
                created_at: Utc::now(),
            })
            .collect::<Vec<_>>();
        let first = rows[0].id;

        let capped = CappedChildren::from_ranked(rows);
        assert_eq!(capped.len(), CHILDREN_CAPPED_COUNT as usize);
        assert_eq!(capped[0].id, first);
    }

    #[test]
    fn test_empty_capped_children() {
        let capped = CappedChildren::from_ranked(Vec::new());
        assert!(capped.is_empty());
        assert_eq!(capped.iter().count(), 0);
    }
}
