use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{CarContext, CarStore};
use crate::error::StoreError;
use crate::model::Car;

const CAR_COLUMNS: &str =
    r#"id, "name", model, engine, color, tire_count, created_at, modified_at"#;

#[derive(Clone)]
pub struct PgCarStore {
    pool: PgPool,
}

impl PgCarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl CarStore for PgCarStore {
    async fn begin(&self) -> Result<Box<dyn CarContext>, StoreError> {
        Ok(Box::new(PgCarContext {
            pool: self.pool.clone(),
            tx: None,
        }))
    }
}

/// Runs every statement inside one transaction, started on first use.
/// Dropping the context before `commit` rolls the transaction back.
pub struct PgCarContext {
    pool: PgPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgCarContext {
    async fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(self.tx.insert(tx))
    }
}

#[async_trait]
impl CarContext for PgCarContext {
    async fn insert(&mut self, car: &Car) -> Result<(), StoreError> {
        let tx = self.tx().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO public.cars
            (id, "name", model, engine, color, tire_count, created_at, modified_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8);
            "#,
        )
        .bind(car.id)
        .bind(&car.name)
        .bind(&car.model)
        .bind(&car.engine)
        .bind(&car.color)
        .bind(car.tire_count)
        .bind(car.created_at)
        .bind(car.modified_at)
        .execute(&mut **tx)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                Err(StoreError::DuplicateId(car.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Car>, StoreError> {
        let tx = self.tx().await?;
        let query = format!("SELECT {CAR_COLUMNS} FROM public.cars WHERE id = $1");
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(car)
    }

    async fn find_all(&mut self) -> Result<Vec<Car>, StoreError> {
        let tx = self.tx().await?;
        let query = format!("SELECT {CAR_COLUMNS} FROM public.cars ORDER BY created_at, id");
        let cars = sqlx::query_as::<_, Car>(&query)
            .fetch_all(&mut **tx)
            .await?;
        Ok(cars)
    }

    async fn update(&mut self, car: &Car) -> Result<(), StoreError> {
        let tx = self.tx().await?;
        let result = sqlx::query(
            r#"
            UPDATE public.cars
            SET "name" = $2, model = $3, engine = $4, color = $5, tire_count = $6,
                modified_at = $7
            WHERE id = $1;
            "#,
        )
        .bind(car.id)
        .bind(&car.name)
        .bind(&car.model)
        .bind(&car.engine)
        .bind(&car.color)
        .bind(car.tire_count)
        .bind(car.modified_at)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(car.id));
        }
        Ok(())
    }

    async fn remove(&mut self, id: Uuid) -> Result<Option<Car>, StoreError> {
        let tx = self.tx().await?;
        let query = format!("DELETE FROM public.cars WHERE id = $1 RETURNING {CAR_COLUMNS}");
        let car = sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(car)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }
}
