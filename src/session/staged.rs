use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Handle to an entity that has been staged on a session
///
/// The handle is empty until the session flushes; afterwards it holds the row
/// as the server returned it, including generated `id` and `created_at`.
/// Clones share the same slot. When the session rolls back a transaction the
/// rows it wrote in that transaction are gone, and their handles are emptied
/// again.
pub struct Staged<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Staged<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Store the row read back from the server; a second fill is ignored
    pub(crate) fn fill(&self, value: T) {
        let mut slot = self.slot.lock();
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    /// Forget the row after its transaction was rolled back
    pub(crate) fn reset(&self) {
        self.slot.lock().take();
    }

    /// True when both handles point at the same staged entity
    pub fn same_entity(&self, other: &Staged<T>) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T: Clone> Staged<T> {
    /// The persisted row, once flushed
    pub fn get(&self) -> Option<T> {
        self.slot.lock().clone()
    }
}

impl<T> Clone for Staged<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Staged<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot.lock().as_ref() {
            Some(value) => f.debug_tuple("Staged").field(value).finish(),
            None => f.write_str("Staged(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_is_empty_until_filled() {
        let staged: Staged<u32> = Staged::new();
        assert!(!staged.is_persisted());
        assert_eq!(staged.get(), None);
        assert_eq!(format!("{staged:?}"), "Staged(<pending>)");

        staged.fill(7);
        assert!(staged.is_persisted());
        assert_eq!(staged.get(), Some(7));
        assert_eq!(format!("{staged:?}"), "Staged(7)");
    }

    #[test]
    fn test_clones_share_the_slot() {
        let staged: Staged<&str> = Staged::new();
        let clone = staged.clone();
        assert!(staged.same_entity(&clone));
        assert!(!staged.same_entity(&Staged::new()));

        clone.fill("row");
        staged.fill("ignored");
        assert_eq!(staged.get(), Some("row"));
    }

    #[test]
    fn test_reset_empties_every_clone() {
        let staged: Staged<u32> = Staged::new();
        let clone = staged.clone();
        staged.fill(1);

        clone.reset();
        assert!(!staged.is_persisted());

        staged.fill(2);
        assert_eq!(clone.get(), Some(2));
    }
}
