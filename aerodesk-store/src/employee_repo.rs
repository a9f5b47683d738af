use async_trait::async_trait;
use sqlx::PgPool;

use aerodesk_core::employee::{Employee, EmployeeUpdate};
use aerodesk_core::repository::{EmployeeRepository, StoreResult};
use aerodesk_shared::pii::Masked;

use crate::error::map_sqlx_err;

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    employee_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    password: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role: row.role,
            password: Masked(row.password),
        }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn find(&self, employee_id: i64) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT employee_id, first_name, last_name, email, role, password
            FROM employee WHERE employee_id = $1
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Employee::from))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT employee_id, first_name, last_name, email, role, password
            FROM employee WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Employee::from))
    }

    async fn create(&self, employee: &Employee) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employee (employee_id, first_name, last_name, email, role, password)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(employee.employee_id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.email)
        .bind(&employee.role)
        .bind(employee.password.expose())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }

    async fn update(&self, employee_id: i64, update: &EmployeeUpdate) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE employee
            SET first_name = $1, last_name = $2, email = $3, role = $4, password = $5
            WHERE employee_id = $6
            "#,
        )
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.email)
        .bind(&update.role)
        .bind(update.password.expose())
        .bind(employee_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(())
    }
}
