//! Dining Table Repository

use std::sync::Arc;

use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use shared::util::{now_millis, snowflake_id};

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::{QueryContext, Store, StoreError};

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_by_id(
        &self,
        ctx: &QueryContext,
        id: i64,
    ) -> RepoResult<Option<DiningTable>> {
        let store = self.base.store();
        Ok(ctx.run(store.find_table(ctx, id)).await?)
    }

    pub async fn find_all(&self, ctx: &QueryContext) -> RepoResult<Vec<DiningTable>> {
        let store = self.base.store();
        Ok(ctx.run(store.list_tables(ctx)).await?)
    }

    /// Create a new dining table
    pub async fn create(
        &self,
        ctx: &QueryContext,
        data: DiningTableCreate,
    ) -> RepoResult<DiningTable> {
        let number_of_guests = data.number_of_guests.unwrap_or(0);
        validate_guests(number_of_guests)?;

        // Check duplicate table number
        let store = self.base.store();
        if ctx
            .run(store.find_table_by_number(ctx, data.table_number))
            .await?
            .is_some()
        {
            return Err(RepoError::TableNumberTaken(data.table_number));
        }

        let now = now_millis();
        let table = DiningTable {
            id: snowflake_id(),
            table_number: data.table_number,
            number_of_guests,
            created_at: now,
            updated_at: now,
        };
        // A concurrent create can still claim the number first
        ctx.run(store.insert_table(table.clone()))
            .await
            .map_err(|e| number_conflict(e, table.table_number))?;
        tracing::info!(table_id = table.id, table_number = table.table_number, "Table created");
        Ok(table)
    }

    /// Update a dining table; absent fields keep their value
    pub async fn update(
        &self,
        ctx: &QueryContext,
        id: i64,
        data: DiningTableUpdate,
    ) -> RepoResult<DiningTable> {
        let existing = self
            .find_by_id(ctx, id)
            .await?
            .ok_or(RepoError::NotFound {
                resource: "table",
                id,
            })?;

        let number_of_guests = data.number_of_guests.unwrap_or(existing.number_of_guests);
        validate_guests(number_of_guests)?;

        let table_number = data.table_number.unwrap_or(existing.table_number);
        let store = self.base.store();
        if table_number != existing.table_number
            && let Some(found) = ctx
                .run(store.find_table_by_number(ctx, table_number))
                .await?
            && found.id != id
        {
            return Err(RepoError::TableNumberTaken(table_number));
        }

        let table = DiningTable {
            table_number,
            number_of_guests,
            updated_at: now_millis(),
            ..existing
        };
        let updated = ctx
            .run(store.update_table(table.clone()))
            .await
            .map_err(|e| number_conflict(e, table_number))?;
        if !updated {
            return Err(RepoError::NotFound {
                resource: "table",
                id,
            });
        }
        tracing::info!(table_id = id, table_number, "Table updated");
        Ok(table)
    }
}

fn validate_guests(number_of_guests: i32) -> RepoResult<()> {
    if number_of_guests < 0 {
        return Err(RepoError::Validation(format!(
            "number_of_guests must be non-negative, got {number_of_guests}"
        )));
    }
    Ok(())
}

fn number_conflict(err: StoreError, table_number: i32) -> RepoError {
    match err {
        StoreError::Conflict { .. } => RepoError::TableNumberTaken(table_number),
        other => other.into(),
    }
}
