//! PostgreSQL implementation of account repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use super::pg_resident_repository::ResidentRow;
use crate::domain::account_filter::{AccountFilter, SortField};
use crate::domain::entities::{Account, AccountDetails, AccountDraft};
use crate::domain::repositories::AccountRepository;
use crate::error::AppError;
use crate::utils::db_error::{ACCOUNT_NUMBER_CONSTRAINT, is_unique_violation_on};

const ACCOUNT_COLUMNS: &str = "a.id, a.account_number, a.start_date, a.end_date, a.address, a.area";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    account_number: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    address: String,
    area: i32,
}

impl From<AccountRow> for Account {
    fn from(r: AccountRow) -> Self {
        Account::new(
            r.id,
            r.account_number,
            r.start_date,
            r.end_date,
            r.address,
            r.area,
        )
    }
}

/// PostgreSQL repository for accounts.
///
/// Search filters are pushed down into a single SQL statement built with
/// [`QueryBuilder`]; every user-supplied value is bound, and the only
/// interpolated identifiers come from [`SortField::column`].
pub struct PgAccountRepository {
    pool: Arc<PgPool>,
}

impl PgAccountRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Sort expression for a field. Text columns compare bytewise so that the
/// order does not depend on the database locale.
fn order_key(field: SortField) -> &'static str {
    match field {
        SortField::AccountNumber => r#"a.account_number COLLATE "C""#,
        SortField::StartDate => "a.start_date",
        SortField::EndDate => "a.end_date",
        SortField::Address => r#"a.address COLLATE "C""#,
        SortField::Area => "a.area",
    }
}

/// Appends the `WHERE` clause, ordering and paging for a search.
fn push_search_clauses(builder: &mut QueryBuilder<'_, Postgres>, filter: &AccountFilter) {
    builder.push(" WHERE TRUE");

    if filter.has_residents {
        builder.push(" AND EXISTS (SELECT 1 FROM residents r WHERE r.account_id = a.id)");
    }

    if let Some(number) = &filter.number {
        builder
            .push(" AND strpos(a.account_number, ")
            .push_bind(number.clone())
            .push(") > 0");
    }

    if let Some(at) = filter.active_on_date {
        builder
            .push(" AND a.start_date <= ")
            .push_bind(at)
            .push(" AND a.end_date >= ")
            .push_bind(at);
    }

    for (column, value) in [
        ("first_name", &filter.resident_first_name),
        ("last_name", &filter.resident_last_name),
        ("middle_name", &filter.resident_middle_name),
    ] {
        if let Some(value) = value {
            builder
                .push(" AND EXISTS (SELECT 1 FROM residents r WHERE r.account_id = a.id AND strpos(r.")
                .push(column)
                .push(", ")
                .push_bind(value.clone())
                .push(") > 0)");
        }
    }

    if let Some(address) = &filter.address {
        builder
            .push(" AND strpos(a.address, ")
            .push_bind(address.clone())
            .push(") > 0");
    }

    match filter.sort {
        Some(sort) if sort.field != SortField::AccountNumber => {
            builder
                .push(" ORDER BY ")
                .push(order_key(sort.field))
                .push(" ")
                .push(sort.direction.as_sql())
                .push(", ")
                .push(order_key(SortField::AccountNumber))
                .push(" ASC");
        }
        Some(sort) => {
            builder
                .push(" ORDER BY ")
                .push(order_key(SortField::AccountNumber))
                .push(" ")
                .push(sort.direction.as_sql());
        }
        None => {
            builder
                .push(" ORDER BY ")
                .push(order_key(SortField::AccountNumber))
                .push(" ASC");
        }
    }

    builder
        .push(" LIMIT ")
        .push_bind(filter.limit())
        .push(" OFFSET ")
        .push_bind(filter.offset());
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts AS a (id, account_number, start_date, end_date, address, area)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING a.id, a.account_number, a.start_date, a.end_date, a.address, a.area
            "#,
        )
        .bind(account.id)
        .bind(&account.account_number)
        .bind(account.start_date)
        .bind(account.end_date)
        .bind(&account.address)
        .bind(account.area)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on(&e, ACCOUNT_NUMBER_CONSTRAINT) {
                AppError::conflict(
                    "Account number already exists",
                    json!({ "accountNumber": account.account_number }),
                )
            } else {
                AppError::from(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Account::from))
    }

    async fn find_by_number(&self, account_number: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a WHERE a.account_number = $1"
        ))
        .bind(account_number)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Account::from))
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AccountDetails>, AppError> {
        let Some(account) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let residents = sqlx::query_as::<_, ResidentRow>(
            r#"
            SELECT id, first_name, last_name, middle_name, birth_date, account_id
            FROM residents
            WHERE account_id = $1
            ORDER BY last_name COLLATE "C", first_name COLLATE "C", id
            "#,
        )
        .bind(id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(Some(AccountDetails {
            account,
            residents: residents.into_iter().map(Into::into).collect(),
        }))
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r#"SELECT {ACCOUNT_COLUMNS} FROM accounts a ORDER BY a.account_number COLLATE "C""#
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn update(&self, id: Uuid, draft: AccountDraft) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts AS a SET
                start_date = $2,
                end_date   = $3,
                address    = $4,
                area       = $5
            WHERE a.id = $1
            RETURNING a.id, a.account_number, a.start_date, a.end_date, a.address, a.area
            "#,
        )
        .bind(id)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(&draft.address)
        .bind(draft.area)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Account::from)
            .ok_or_else(|| AppError::not_found("Account not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Account not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn search(&self, filter: &AccountFilter) -> Result<Vec<Account>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts a"
        ));
        push_search_clauses(&mut builder, filter);

        tracing::debug!(sql = builder.sql(), "Account search");

        let rows = builder
            .build_query_as::<AccountRow>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account_filter::AccountQuery;

    fn sql_for(query: AccountQuery) -> String {
        let filter = AccountFilter::from_query(query).unwrap();
        let mut builder = QueryBuilder::<Postgres>::new("SELECT a.id FROM accounts a");
        push_search_clauses(&mut builder, &filter);
        builder.sql().to_string()
    }

    #[test]
    fn test_default_search_orders_and_pages() {
        let sql = sql_for(AccountQuery::default());

        assert!(sql.contains("WHERE TRUE"));
        assert!(sql.contains(r#"ORDER BY a.account_number COLLATE "C" ASC"#));
        assert!(sql.contains("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_filters_are_bound_not_interpolated() {
        let sql = sql_for(AccountQuery {
            number: Some("123'; DROP TABLE accounts; --".to_string()),
            address: Some("Main".to_string()),
            ..Default::default()
        });

        assert!(!sql.contains("DROP TABLE"));
        assert!(sql.contains("strpos(a.account_number, $1) > 0"));
        assert!(sql.contains("strpos(a.address, $2) > 0"));
    }

    #[test]
    fn test_resident_filters_use_exists() {
        let sql = sql_for(AccountQuery {
            has_residents: Some(true),
            resident_first_name: Some("Iv".to_string()),
            resident_middle_name: Some("Pet".to_string()),
            ..Default::default()
        });

        assert_eq!(sql.matches("EXISTS").count(), 3);
        assert!(sql.contains("strpos(r.first_name, $1) > 0"));
        assert!(sql.contains("strpos(r.middle_name, $2) > 0"));
    }

    #[test]
    fn test_sort_adds_tie_breaker() {
        let sql = sql_for(AccountQuery {
            sort_by: Some("area".to_string()),
            sort_direction: Some("desc".to_string()),
            ..Default::default()
        });

        assert!(sql.contains(r#"ORDER BY a.area DESC, a.account_number COLLATE "C" ASC"#));
    }

    #[test]
    fn test_text_sort_is_bytewise() {
        let sql = sql_for(AccountQuery {
            sort_by: Some("address".to_string()),
            ..Default::default()
        });

        assert!(sql.contains(r#"ORDER BY a.address COLLATE "C" ASC"#));
    }

    #[test]
    fn test_active_on_date_binds_twice() {
        let sql = sql_for(AccountQuery {
            active_on_date: Some(Utc::now()),
            ..Default::default()
        });

        assert!(sql.contains("a.start_date <= $1 AND a.end_date >= $2"));
    }
}
