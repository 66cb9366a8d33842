//! `UniqueIdIndexer`: index a random-access container by a 64-bit unique identifier.
//!
//! Ported verbatim in algorithm from `UniqueIdIndexer.h` (see `SPEC_FULL.md` §9.1):
//! a cache from id to index, rebuilt lazily on a miss, with duplicate-id detection
//! folded into the rebuild. The legacy API throws `std::out_of_range` to signal a miss
//! and a separate `Postcondition` exception on duplicates; here both become explicit
//! return values, per the "exceptions for control flow" redesign flag (§9 Design
//! Notes).

use std::collections::HashMap;

use crate::error::{Context, Error, ErrorKind};

const INVALID_ID: u64 = 0;

/// Anything that can report a 64-bit unique identifier, with `0` reserved as "no id
/// assigned".
pub trait UniqueIdInterface {
    /// The unique id of this element, or `0` if none has been assigned.
    fn unique_id(&self) -> u64;
}

/// Whether a unique id is a real, assigned id (i.e. not the `0` sentinel).
pub fn is_valid_unique_id(id: u64) -> bool {
    id != INVALID_ID
}

/// An id-to-index cache over a random-access container of `T: UniqueIdInterface`.
///
/// Mutable-through-shared-reference caches like this one are **not** thread-safe by
/// contract (§5 "Locking discipline"): callers must finish building/rebuilding before
/// releasing the container to worker threads.
#[derive(Debug, Default)]
pub struct UniqueIdIndexer {
    cache: std::cell::RefCell<HashMap<u64, usize>>,
}

impl UniqueIdIndexer {
    /// A fresh, empty indexer.
    pub fn new() -> Self {
        Self {
            cache: std::cell::RefCell::new(HashMap::new()),
        }
    }

    /// Look up the index of the element with the given unique id.
    ///
    /// Returns `None` if no element in `base` currently carries `unique_id`. The
    /// complexity is expected constant on success, linear (one rebuild pass) on a
    /// cache miss.
    pub fn unique_id_to_index<T: UniqueIdInterface>(
        &self,
        base: &[T],
        unique_id: u64,
    ) -> Result<Option<usize>, Error> {
        if let Some(&index) = self.cache.borrow().get(&unique_id) {
            if base.get(index).map(UniqueIdInterface::unique_id) == Some(unique_id) {
                return Ok(Some(index));
            }
        }
        self.update_unique_id_to_index(base)?;
        Ok(self.cache.borrow().get(&unique_id).copied())
    }

    /// Rebuild the cache from scratch.
    ///
    /// # Errors
    /// Returns [`ErrorKind::Postcondition`] if two elements share the same valid unique
    /// id — this is always fatal, never recovered (§7).
    pub fn update_unique_id_to_index<T: UniqueIdInterface>(&self, base: &[T]) -> Result<(), Error> {
        let mut cache = self.cache.borrow_mut();
        let mut num_valid = 0usize;
        for (index, element) in base.iter().enumerate() {
            let id = element.unique_id();
            if is_valid_unique_id(id) {
                cache.insert(id, index);
                num_valid += 1;
            }
        }
        cache.remove(&INVALID_ID);
        cache.retain(|&id, &mut index| {
            base.get(index).map(UniqueIdInterface::unique_id) == Some(id)
        });
        if cache.len() != num_valid {
            return Err(Error::new(
                ErrorKind::Postcondition,
                format!(
                    "duplicate valid unique ids detected: base has {} elements, {num_valid} valid ids, but only {} unique entries",
                    base.len(),
                    cache.len()
                ),
                Context::none(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(u64);
    impl UniqueIdInterface for Item {
        fn unique_id(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn rebuild_then_lookup() {
        let base = vec![Item(10), Item(0), Item(20)];
        let indexer = UniqueIdIndexer::new();
        assert_eq!(indexer.unique_id_to_index(&base, 20).unwrap(), Some(2));
        assert_eq!(indexer.unique_id_to_index(&base, 0).unwrap(), None);
        assert_eq!(indexer.unique_id_to_index(&base, 999).unwrap(), None);
    }

    #[test]
    fn duplicate_ids_are_a_postcondition_violation() {
        let base = vec![Item(10), Item(10)];
        let indexer = UniqueIdIndexer::new();
        let err = indexer.unique_id_to_index(&base, 10).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Postcondition);
    }

    #[test]
    fn stale_cache_entry_triggers_rebuild() {
        let mut base = vec![Item(10), Item(20)];
        let indexer = UniqueIdIndexer::new();
        assert_eq!(indexer.unique_id_to_index(&base, 20).unwrap(), Some(1));
        base.remove(0);
        assert_eq!(indexer.unique_id_to_index(&base, 20).unwrap(), Some(0));
    }
}
