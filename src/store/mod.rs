//! Car persistence. Uncommitted context changes are discarded on drop.

mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::Car;

pub use memory::{MemoryCarContext, MemoryCarStore};
pub use postgres::{PgCarContext, PgCarStore};

#[async_trait]
pub trait CarStore: Send + Sync {
    /// Opens a persistence context scoped to a single request.
    async fn begin(&self) -> Result<Box<dyn CarContext>, StoreError>;
}

#[async_trait]
pub trait CarContext: Send {
    async fn insert(&mut self, car: &Car) -> Result<(), StoreError>;

    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Car>, StoreError>;

    /// All cars, oldest first.
    async fn find_all(&mut self) -> Result<Vec<Car>, StoreError>;

    /// Replaces the car with the same id, keeping its `created_at`. Fails
    /// with [`StoreError::Missing`] if there is none.
    async fn update(&mut self, car: &Car) -> Result<(), StoreError>;

    /// Removes the car and returns its last state, or `None` if absent.
    async fn remove(&mut self, id: Uuid) -> Result<Option<Car>, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;
}
