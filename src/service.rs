use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::{ServiceError, StoreError};
use crate::model::{now, Car, CarDto};
use crate::store::CarContext;

/// Validated replacement values for every mutable field of a car.
struct CarFields {
    name: String,
    model: String,
    engine: String,
    color: String,
    tire_count: i32,
}

impl CarFields {
    fn from_dto(dto: CarDto) -> Result<Self, ServiceError> {
        Ok(CarFields {
            name: required_text("name", dto.name)?,
            model: required_text("model", dto.model)?,
            engine: required_text("engine", dto.engine)?,
            color: required_text("color", dto.color)?,
            tire_count: positive("tire_count", dto.tire_count)?,
        })
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, ServiceError> {
    match value {
        None => Err(ServiceError::validation(field, "is required")),
        Some(value) if value.trim().is_empty() => {
            Err(ServiceError::validation(field, "must not be blank"))
        }
        Some(value) => Ok(value),
    }
}

fn positive(field: &'static str, value: Option<i32>) -> Result<i32, ServiceError> {
    match value {
        None => Err(ServiceError::validation(field, "is required")),
        Some(value) if value <= 0 => Err(ServiceError::validation(field, "must be greater than 0")),
        Some(value) => Ok(value),
    }
}

/// A fresh timestamp strictly after `previous`, even if the clock has not
/// moved on since.
fn next_modified_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Create, read, update and delete for cars within one persistence context.
///
/// Every mutating call validates before writing and commits before it
/// returns.
pub struct CarService {
    ctx: Box<dyn CarContext>,
}

impl CarService {
    pub fn new(ctx: Box<dyn CarContext>) -> Self {
        Self { ctx }
    }

    pub async fn create(&mut self, dto: CarDto) -> Result<Car, ServiceError> {
        let fields = CarFields::from_dto(dto).map_err(log_rejection)?;
        let created_at = now();

        let car = Car {
            id: Uuid::new_v4(),
            name: fields.name,
            model: fields.model,
            engine: fields.engine,
            color: fields.color,
            tire_count: fields.tire_count,
            created_at,
            modified_at: created_at,
        };

        self.ctx.insert(&car).await?;
        self.ctx.commit().await?;

        log::info!("Created car {}", car.id);
        Ok(car)
    }

    pub async fn detail(&mut self, id: Uuid) -> Result<Option<Car>, StoreError> {
        self.ctx.find_by_id(id).await
    }

    /// Returns `Ok(None)` when no car has the given id; nothing is written in
    /// that case.
    pub async fn update(&mut self, dto: CarDto) -> Result<Option<Car>, ServiceError> {
        let id = match dto.id {
            Some(id) => id,
            None => return Err(log_rejection(ServiceError::validation("id", "is required"))),
        };

        let Some(mut car) = self.ctx.find_by_id(id).await? else {
            log::debug!("Update skipped, car {} not found", id);
            return Ok(None);
        };

        let fields = CarFields::from_dto(dto).map_err(log_rejection)?;
        car.name = fields.name;
        car.model = fields.model;
        car.engine = fields.engine;
        car.color = fields.color;
        car.tire_count = fields.tire_count;
        car.modified_at = next_modified_at(car.modified_at);

        self.ctx.update(&car).await?;
        self.ctx.commit().await?;

        log::info!("Updated car {}", car.id);
        Ok(Some(car))
    }

    /// Returns the removed car, or `Ok(None)` if there was nothing to remove.
    pub async fn delete(&mut self, id: Uuid) -> Result<Option<Car>, StoreError> {
        let Some(car) = self.ctx.find_by_id(id).await? else {
            log::debug!("Delete skipped, car {} not found", id);
            return Ok(None);
        };

        let removed = self.ctx.remove(car.id).await?;
        self.ctx.commit().await?;

        log::info!("Deleted car {}", id);
        Ok(removed)
    }
}

fn log_rejection(err: ServiceError) -> ServiceError {
    log::warn!("Rejected car input: {}", err);
    err
}
