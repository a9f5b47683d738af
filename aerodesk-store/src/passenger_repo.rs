use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use aerodesk_core::passenger::{Passenger, PassengerUpdate};
use aerodesk_core::repository::{PassengerRepository, StoreResult};
use aerodesk_shared::pii::Masked;

use crate::error::map_sqlx_err;

pub struct PostgresPassengerRepository {
    pool: PgPool,
}

impl PostgresPassengerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    passenger_id: String,
    first_name: String,
    last_name: String,
    gender: String,
    birth_date: NaiveDate,
    phone_number: String,
}

impl From<PassengerRow> for Passenger {
    fn from(row: PassengerRow) -> Self {
        Passenger {
            passenger_id: row.passenger_id,
            first_name: row.first_name,
            last_name: row.last_name,
            gender: row.gender,
            birth_date: row.birth_date,
            phone_number: Masked(row.phone_number),
        }
    }
}

#[async_trait]
impl PassengerRepository for PostgresPassengerRepository {
    async fn find(&self, passenger_id: &str) -> StoreResult<Option<Passenger>> {
        let row = sqlx::query_as::<_, PassengerRow>(
            r#"
            SELECT passenger_id, first_name, last_name, gender, birth_date, phone_number
            FROM passenger WHERE passenger_id = $1
            "#,
        )
        .bind(passenger_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Passenger::from))
    }

    async fn list(&self) -> StoreResult<Vec<Passenger>> {
        let rows = sqlx::query_as::<_, PassengerRow>(
            r#"
            SELECT passenger_id, first_name, last_name, gender, birth_date, phone_number
            FROM passenger ORDER BY passenger_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Passenger::from).collect())
    }

    async fn create(&self, passenger: &Passenger) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO passenger (passenger_id, first_name, last_name, gender, birth_date, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&passenger.passenger_id)
        .bind(&passenger.first_name)
        .bind(&passenger.last_name)
        .bind(&passenger.gender)
        .bind(passenger.birth_date)
        .bind(passenger.phone_number.expose())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn update(&self, passenger_id: &str, update: &PassengerUpdate) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE passenger
            SET first_name = $1, last_name = $2, gender = $3, birth_date = $4, phone_number = $5
            WHERE passenger_id = $6
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.gender)
        .bind(update.birth_date)
        .bind(update.phone_number.expose())
        .bind(passenger_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn delete_cascade(&self, passenger_id: &str) -> StoreResult<()> {
        // Children before parents: services, then boarding, then the passenger.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query(
            r#"
            DELETE FROM services
            WHERE boarding_id IN (SELECT boarding_id FROM boarding WHERE passenger_id = $1)
            "#,
        )
        .bind(passenger_id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM boarding WHERE passenger_id = $1")
            .bind(passenger_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM passenger WHERE passenger_id = $1")
            .bind(passenger_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(())
    }
}
