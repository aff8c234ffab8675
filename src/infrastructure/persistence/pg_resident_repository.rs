//! PostgreSQL implementation of resident repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Resident, ResidentDraft};
use crate::domain::repositories::ResidentRepository;
use crate::error::AppError;
use crate::utils::db_error::{RESIDENT_ACCOUNT_CONSTRAINT, is_foreign_key_violation_on};

#[derive(sqlx::FromRow)]
pub(crate) struct ResidentRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    birth_date: Option<NaiveDate>,
    account_id: Uuid,
}

impl From<ResidentRow> for Resident {
    fn from(r: ResidentRow) -> Self {
        Resident {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            middle_name: r.middle_name,
            birth_date: r.birth_date,
            account_id: r.account_id,
        }
    }
}

/// Maps a missing parent account to a validation error; everything else
/// goes through the generic conversion.
fn map_write_error(e: sqlx::Error, account_id: Uuid) -> AppError {
    if is_foreign_key_violation_on(&e, RESIDENT_ACCOUNT_CONSTRAINT) {
        AppError::bad_request(
            "Referenced account does not exist",
            json!({ "accountId": account_id }),
        )
    } else {
        AppError::from(e)
    }
}

/// PostgreSQL repository for residents.
pub struct PgResidentRepository {
    pool: Arc<PgPool>,
}

impl PgResidentRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResidentRepository for PgResidentRepository {
    async fn create(&self, resident: Resident) -> Result<Resident, AppError> {
        let row = sqlx::query_as::<_, ResidentRow>(
            r#"
            INSERT INTO residents (id, first_name, last_name, middle_name, birth_date, account_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, first_name, last_name, middle_name, birth_date, account_id
            "#,
        )
        .bind(resident.id)
        .bind(&resident.first_name)
        .bind(&resident.last_name)
        .bind(&resident.middle_name)
        .bind(resident.birth_date)
        .bind(resident.account_id)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_write_error(e, resident.account_id))?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Resident>, AppError> {
        let row = sqlx::query_as::<_, ResidentRow>(
            r#"
            SELECT id, first_name, last_name, middle_name, birth_date, account_id
            FROM residents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Resident::from))
    }

    async fn list(&self) -> Result<Vec<Resident>, AppError> {
        let rows = sqlx::query_as::<_, ResidentRow>(
            r#"
            SELECT id, first_name, last_name, middle_name, birth_date, account_id
            FROM residents
            ORDER BY last_name COLLATE "C", first_name COLLATE "C", id
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Resident::from).collect())
    }

    async fn update(&self, id: Uuid, draft: ResidentDraft) -> Result<Resident, AppError> {
        let row = sqlx::query_as::<_, ResidentRow>(
            r#"
            UPDATE residents SET
                first_name  = $2,
                last_name   = $3,
                middle_name = $4,
                birth_date  = $5,
                account_id  = $6
            WHERE id = $1
            RETURNING id, first_name, last_name, middle_name, birth_date, account_id
            "#,
        )
        .bind(id)
        .bind(&draft.first_name)
        .bind(&draft.last_name)
        .bind(&draft.middle_name)
        .bind(draft.birth_date)
        .bind(draft.account_id)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| map_write_error(e, draft.account_id))?;

        row.map(Resident::from)
            .ok_or_else(|| AppError::not_found("Resident not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM residents WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Resident not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM residents")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
