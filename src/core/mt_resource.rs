use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared, lock-protected ownership of a value that several pipeline threads touch.
///
/// Every chunk slot in the pool lives inside one of these. Workers take the write guard
/// for the whole of a load, rebuild or block-update batch; the main thread takes read
/// guards while it builds the render list and answers block queries, and a write guard
/// while it recycles a slot or finalizes an uploaded mesh.
///
/// # Type Parameters
/// - `T`: The protected value, must be `Send + Sync`
///
/// # Examples
///
/// ```
/// use voxel_stream::core::MtResource;
///
/// let pending = MtResource::new(Vec::<u32>::new());
/// pending.get_mut().push(7);
/// assert_eq!(pending.get().len(), 1);
/// ```
///
/// # Performance Considerations
/// - Read guards (`get()`) coexist with each other
/// - Write guards (`get_mut()`) are exclusive and block readers until dropped
/// - Keep write sections to one unit of work so the render thread is never starved
pub struct MtResource<T: Send + Sync> {
    pub resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Wraps `resource` for shared access.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read guard over the contained value.
    ///
    /// # Panics
    /// Panics if a thread panicked while holding the write guard.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns an exclusive guard over the contained value.
    ///
    /// # Panics
    /// Panics if a thread panicked while holding the write guard.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_same_value() {
        let counter = MtResource::new(0u32);
        let clone = counter.clone();

        let handle = thread::spawn(move || {
            for _ in 0..100 {
                *clone.get_mut() += 1;
            }
        });
        for _ in 0..100 {
            *counter.get_mut() += 1;
        }
        handle.join().unwrap();

        assert_eq!(*counter.get(), 200);
    }
}
