use async_trait::async_trait;
use sqlx::PgPool;

use aerodesk_core::repository::{ServiceRepository, StoreResult};
use aerodesk_core::service::{LuggageTier, ServiceRecord};

use crate::error::map_sqlx_err;

pub struct PostgresServiceRepository {
    pool: PgPool,
}

impl PostgresServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ServiceRow {
    boarding_id: i64,
    extra_drink: bool,
    extra_meal: bool,
    suit_center: bool,
    extra_luggage: i32,
    service_description: String,
}

impl From<ServiceRow> for ServiceRecord {
    fn from(row: ServiceRow) -> Self {
        ServiceRecord {
            boarding_id: row.boarding_id,
            extra_drink: row.extra_drink,
            extra_meal: row.extra_meal,
            suit_center: row.suit_center,
            extra_luggage: LuggageTier::from_i32(row.extra_luggage),
            description: row.service_description,
        }
    }
}

#[async_trait]
impl ServiceRepository for PostgresServiceRepository {
    async fn find(&self, boarding_id: i64) -> StoreResult<Option<ServiceRecord>> {
        let row = sqlx::query_as::<_, ServiceRow>(
            r#"
            SELECT boarding_id, extra_drink, extra_meal, suit_center,
                   extra_luggage, service_description
            FROM services WHERE boarding_id = $1
            "#,
        )
        .bind(boarding_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(ServiceRecord::from))
    }

    async fn upsert(&self, record: &ServiceRecord) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO services (boarding_id, extra_drink, extra_meal, suit_center,
                                  extra_luggage, service_description)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (boarding_id) DO UPDATE SET
                extra_drink = EXCLUDED.extra_drink,
                extra_meal = EXCLUDED.extra_meal,
                suit_center = EXCLUDED.suit_center,
                extra_luggage = EXCLUDED.extra_luggage,
                service_description = EXCLUDED.service_description
            "#,
        )
        .bind(record.boarding_id)
        .bind(record.extra_drink)
        .bind(record.extra_meal)
        .bind(record.suit_center)
        .bind(record.extra_luggage.as_i32())
        .bind(&record.description)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }
}
