use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::utils::TypeIdMap;
use crate::value::ValueInterface;

type ErasedInterface = Arc<dyn Any + Send + Sync>;

/// Value interface overrides, keyed by the overridden type.
pub(super) struct Interfaces {
    table: RwLock<TypeIdMap<ErasedInterface>>,
    // Lets lookups skip the lock while no override exists.
    count: AtomicUsize,
}

impl Interfaces {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(TypeIdMap::new()),
            count: AtomicUsize::new(0),
        }
    }

    pub fn set<T: 'static>(&self, interface: Arc<dyn ValueInterface<T>>) {
        let mut table = self.table.write();
        table.insert_type::<T>(Arc::new(interface));
        self.count.store(table.len(), Ordering::Release);
    }

    pub fn get<T: 'static>(&self) -> Option<Arc<dyn ValueInterface<T>>> {
        if self.count.load(Ordering::Acquire) == 0 {
            return None;
        }
        self.table
            .read()
            .get_type::<T>()?
            .downcast_ref::<Arc<dyn ValueInterface<T>>>()
            .cloned()
    }

    pub fn contains(&self, type_id: TypeId) -> bool {
        self.count.load(Ordering::Acquire) != 0 && self.table.read().contains(type_id)
    }
}
