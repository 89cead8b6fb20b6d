use uuid::Uuid;

/// Relations of a parent that a query can load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Children,
    ChildrenCapped,
}

/// Select parents by id, choosing which relations to load with them
///
/// ```rust
/// use pansen_sqla::session::ParentQuery;
/// use uuid::Uuid;
///
/// let query = ParentQuery::by_id(Uuid::new_v4())
///     .with_children_capped()
///     .populate_existing();
/// assert!(query.is_populate_existing());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentQuery {
    pub(crate) ids: Vec<Uuid>,
    pub(crate) relations: Vec<Relation>,
    pub(crate) populate_existing: bool,
}

impl ParentQuery {
    pub fn by_id(id: Uuid) -> Self {
        Self::by_ids([id])
    }

    pub fn by_ids(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let mut ids: Vec<Uuid> = ids.into_iter().collect();
        ids.sort();
        ids.dedup();
        Self {
            ids,
            relations: Vec::new(),
            populate_existing: false,
        }
    }

    pub fn with(mut self, relation: Relation) -> Self {
        if !self.relations.contains(&relation) {
            self.relations.push(relation);
        }
        self
    }

    /// Load the full child collection (batched across all selected parents)
    pub fn with_children(self) -> Self {
        self.with(Relation::Children)
    }

    /// Load the capped view (batched across all selected parents)
    pub fn with_children_capped(self) -> Self {
        self.with(Relation::ChildrenCapped)
    }

    /// Overwrite relations this session already holds instead of reusing them
    pub fn populate_existing(mut self) -> Self {
        self.populate_existing = true;
        self
    }

    pub fn ids(&self) -> &[Uuid] {
        &self.ids
    }

    pub fn loads(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    pub fn is_populate_existing(&self) -> bool {
        self.populate_existing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let id = Uuid::new_v4();
        let query = ParentQuery::by_id(id).with_children().with_children();

        assert_eq!(query.ids(), &[id]);
        assert!(query.loads(Relation::Children));
        assert!(!query.loads(Relation::ChildrenCapped));
        assert_eq!(query.relations.len(), 1);
        assert!(!query.is_populate_existing());
    }
}
