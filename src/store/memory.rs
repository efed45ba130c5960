use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::{CarContext, CarStore};
use crate::error::StoreError;
use crate::model::Car;

type Cars = BTreeMap<Uuid, Car>;

/// Process-local store. Each instance is fully isolated from every other,
/// which makes `MemoryCarStore::new()` the per-test database factory.
#[derive(Clone, Default)]
pub struct MemoryCarStore {
    cars: Arc<RwLock<Cars>>,
}

impl MemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> MemoryCarContext {
        MemoryCarContext {
            cars: Arc::clone(&self.cars),
            staged: BTreeMap::new(),
        }
    }
}

#[async_trait]
impl CarStore for MemoryCarStore {
    async fn begin(&self) -> Result<Box<dyn CarContext>, StoreError> {
        Ok(Box::new(self.context()))
    }
}

/// Staged writes keyed by id; `None` marks a removal.
pub struct MemoryCarContext {
    cars: Arc<RwLock<Cars>>,
    staged: BTreeMap<Uuid, Option<Car>>,
}

impl MemoryCarContext {
    fn current(&self, id: Uuid) -> Result<Option<Car>, StoreError> {
        if let Some(staged) = self.staged.get(&id) {
            return Ok(staged.clone());
        }
        let cars = self.cars.read().map_err(|_| StoreError::Poisoned)?;
        Ok(cars.get(&id).cloned())
    }
}

#[async_trait]
impl CarContext for MemoryCarContext {
    async fn insert(&mut self, car: &Car) -> Result<(), StoreError> {
        if self.current(car.id)?.is_some() {
            return Err(StoreError::DuplicateId(car.id));
        }
        self.staged.insert(car.id, Some(car.clone()));
        Ok(())
    }

    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Car>, StoreError> {
        self.current(id)
    }

    async fn find_all(&mut self) -> Result<Vec<Car>, StoreError> {
        let mut merged = self.cars.read().map_err(|_| StoreError::Poisoned)?.clone();
        for (id, change) in &self.staged {
            match change {
                Some(car) => merged.insert(*id, car.clone()),
                None => merged.remove(id),
            };
        }

        let mut cars: Vec<Car> = merged.into_values().collect();
        cars.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(cars)
    }

    async fn update(&mut self, car: &Car) -> Result<(), StoreError> {
        let Some(existing) = self.current(car.id)? else {
            return Err(StoreError::Missing(car.id));
        };
        let updated = Car {
            created_at: existing.created_at,
            ..car.clone()
        };
        self.staged.insert(car.id, Some(updated));
        Ok(())
    }

    async fn remove(&mut self, id: Uuid) -> Result<Option<Car>, StoreError> {
        let existing = self.current(id)?;
        if existing.is_some() {
            self.staged.insert(id, None);
        }
        Ok(existing)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let mut cars = self.cars.write().map_err(|_| StoreError::Poisoned)?;
        for (id, change) in std::mem::take(&mut self.staged) {
            match change {
                Some(car) => cars.insert(id, car),
                None => cars.remove(&id),
            };
        }
        Ok(())
    }
}
