use std::collections::HashMap;
use uuid::Uuid;

use super::query::Relation;
use crate::models::{CappedChildren, Child, LoadedParent, Parent};

#[derive(Debug, Clone)]
struct CachedParent {
    parent: Parent,
    children: Option<Vec<Child>>,
    children_capped: Option<CappedChildren>,
}

/// Per-session cache of parents and the relations loaded for them
///
/// A relation stays as first loaded until a query asks for populate-existing or
/// the parent is evicted; this is what makes reads of derived views stale after
/// a write in the same session.
#[derive(Debug, Default)]
pub(crate) struct IdentityMap {
    parents: HashMap<Uuid, CachedParent>,
}

impl IdentityMap {
    pub fn merge_parent(&mut self, parent: Parent) {
        self.parents
            .entry(parent.id)
            .and_modify(|cached| cached.parent = parent.clone())
            .or_insert(CachedParent {
                parent,
                children: None,
                children_capped: None,
            });
    }

    /// Parents among `ids` whose `relation` has to be fetched from the store
    pub fn needs_load(&self, ids: &[Uuid], relation: Relation, populate_existing: bool) -> Vec<Uuid> {
        ids.iter()
            .copied()
            .filter(|id| {
                populate_existing
                    || self.parents.get(id).map_or(true, |cached| match relation {
                        Relation::Children => cached.children.is_none(),
                        Relation::ChildrenCapped => cached.children_capped.is_none(),
                    })
            })
            .collect()
    }

    pub fn set_children(&mut self, id: Uuid, children: Vec<Child>) {
        if let Some(cached) = self.parents.get_mut(&id) {
            cached.children = Some(children);
        }
    }

    pub fn set_children_capped(&mut self, id: Uuid, children: Vec<Child>) {
        if let Some(cached) = self.parents.get_mut(&id) {
            cached.children_capped = Some(CappedChildren::from_ranked(children));
        }
    }

    pub fn snapshot(&self, id: &Uuid) -> Option<LoadedParent> {
        self.parents.get(id).map(|cached| LoadedParent {
            parent: cached.parent.clone(),
            children: cached.children.clone(),
            children_capped: cached.children_capped.clone(),
        })
    }

    pub fn evict(&mut self, id: &Uuid) {
        self.parents.remove(id);
    }

    pub fn clear(&mut self) {
        self.parents.clear();
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn parent() -> Parent {
        Parent {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_unknown_parent_needs_load() {
        let map = IdentityMap::default();
        let id = Uuid::new_v4();
        assert_eq!(map.needs_load(&[id], Relation::Children, false), vec![id]);
    }

    #[test]
    fn test_loaded_relation_is_reused_unless_populate_existing() {
        let mut map = IdentityMap::default();
        let p = parent();
        let id = p.id;
        map.merge_parent(p);
        map.set_children_capped(id, Vec::new());

        assert!(map.needs_load(&[id], Relation::ChildrenCapped, false).is_empty());
        assert_eq!(map.needs_load(&[id], Relation::ChildrenCapped, true), vec![id]);
        // The other relation is still unloaded
        assert_eq!(map.needs_load(&[id], Relation::Children, false), vec![id]);

        let loaded = map.snapshot(&id).unwrap();
        assert_eq!(loaded.children(), None);
        assert!(loaded.children_capped().unwrap().is_empty());
    }

    #[test]
    fn test_evict_and_clear() {
        let mut map = IdentityMap::default();
        let a = parent();
        let a_id = a.id;
        map.merge_parent(a);
        map.merge_parent(parent());
        assert_eq!(map.len(), 2);

        map.evict(&a_id);
        assert_eq!(map.len(), 1);
        assert!(map.snapshot(&a_id).is_none());

        map.clear();
        assert_eq!(map.len(), 0);
    }
}
