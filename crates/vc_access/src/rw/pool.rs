use alloc::rc::Rc;
use core::any::{Any, TypeId, type_name};
use core::cell::{RefCell, RefMut};
use core::ops::{Deref, DerefMut};

use super::ObjectRw;
use crate::declare::Accessible;
use crate::error::{AccessError, AccessResult};
use crate::registry::Registry;
use crate::utils::HashMap;

// -----------------------------------------------------------------------------
// InstancePool

/// Recycles one reader/writer per type, registry and thread.
///
/// A nested checkout while the pooled instance is in use gets a fresh,
/// unpooled instance instead.
pub(crate) struct InstancePool<T: Accessible> {
    registry: &'static Registry,
    idle: RefCell<ObjectRw<T>>,
}

impl<T: Accessible> InstancePool<T> {
    pub fn new(registry: &'static Registry) -> AccessResult<Self> {
        Ok(Self {
            registry,
            idle: RefCell::new(ObjectRw::new_in(registry)?),
        })
    }

    pub fn checkout(&self) -> AccessResult<Pooled<'_, T>> {
        match self.idle.try_borrow_mut() {
            Ok(rw) => Ok(Pooled::Shared(rw)),
            Err(_) => {
                log::trace!(
                    "reentrant checkout of `{}`, using a fresh instance",
                    type_name::<T>(),
                );
                ObjectRw::new_in(self.registry).map(Pooled::Fresh)
            }
        }
    }
}

/// A checked-out reader/writer; a pooled one is cleared on drop.
pub(crate) enum Pooled<'a, T: Accessible> {
    Shared(RefMut<'a, ObjectRw<T>>),
    Fresh(ObjectRw<T>),
}

impl<T: Accessible> Deref for Pooled<'_, T> {
    type Target = ObjectRw<T>;

    #[inline]
    fn deref(&self) -> &ObjectRw<T> {
        match self {
            Self::Shared(rw) => rw,
            Self::Fresh(rw) => rw,
        }
    }
}

impl<T: Accessible> DerefMut for Pooled<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut ObjectRw<T> {
        match self {
            Self::Shared(rw) => rw,
            Self::Fresh(rw) => rw,
        }
    }
}

impl<T: Accessible> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Self::Shared(rw) = self {
            rw.clear();
        }
    }
}

// -----------------------------------------------------------------------------
// Thread-local pools

std::thread_local! {
    static POOLS: RefCell<HashMap<(TypeId, usize), Rc<dyn Any>>> = RefCell::new(HashMap::default());
}

fn pool<T: Accessible>(registry: &'static Registry) -> AccessResult<Rc<InstancePool<T>>> {
    let key = (TypeId::of::<T>(), core::ptr::from_ref(registry).addr());
    POOLS.with_borrow_mut(|pools| {
        let erased = match pools.get(&key) {
            Some(erased) => Rc::clone(erased),
            None => {
                let erased: Rc<dyn Any> = Rc::new(InstancePool::<T>::new(registry)?);
                pools.insert(key, Rc::clone(&erased));
                erased
            }
        };
        erased
            .downcast::<InstancePool<T>>()
            .map_err(|_| AccessError::TypeMismatch {
                expected: type_name::<InstancePool<T>>(),
                found: "a pool of another type",
            })
    })
}

/// Runs `f` with this thread's pooled reader/writer of `T` for `registry`.
pub(crate) fn with_instance<T: Accessible, R>(
    registry: &'static Registry,
    f: impl FnOnce(&mut ObjectRw<T>) -> AccessResult<R>,
) -> AccessResult<R> {
    let pool = pool::<T>(registry)?;
    let mut rw = pool.checkout()?;
    f(&mut rw)
}

#[cfg(test)]
mod tests {
    use super::{InstancePool, Pooled};
    use crate::{Accessible, Registry, RegistryConfig};

    #[derive(Accessible, Default)]
    #[access(default)]
    struct Counter {
        value: u32,
    }

    #[test]
    fn reentrant_checkout_gets_a_fresh_instance() {
        let registry = Registry::new(RegistryConfig::default()).leak();
        let pool = InstancePool::<Counter>::new(registry).unwrap();

        let mut outer = pool.checkout().unwrap();
        assert!(matches!(outer, Pooled::Shared(_)));
        outer.initialize_with(Counter { value: 1 });
        {
            let inner = pool.checkout().unwrap();
            assert!(matches!(inner, Pooled::Fresh(_)));
            assert!(inner.content().is_none());
        }
        assert_eq!(outer.content().unwrap().value, 1);
        drop(outer);

        // The returned instance is cleared.
        let again = pool.checkout().unwrap();
        assert!(matches!(again, Pooled::Shared(_)));
        assert!(again.content().is_none());
    }

    #[test]
    fn with_instance_hands_out_unbound_instances() {
        let registry = Registry::new(RegistryConfig::default()).leak();
        let value = registry
            .with_instance::<Counter, _>(|rw| {
                assert!(rw.content().is_none());
                rw.initialize()?;
                rw.content_mut().unwrap().value = 5;
                Ok(rw.content().unwrap().value)
            })
            .unwrap();
        assert_eq!(value, 5);

        registry
            .with_instance::<Counter, _>(|rw| {
                assert!(rw.content().is_none());
                Ok(())
            })
            .unwrap();
    }
}
