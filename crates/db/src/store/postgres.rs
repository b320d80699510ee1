use async_trait::async_trait;
use catalog_core::envelope::Envelope;
use catalog_core::item::{category_code, next_item_id, Item, ItemInput};
use catalog_core::query::QueryPlan;

use super::ItemStore;
use crate::error::StoreError;
use crate::repositories::ItemRepo;
use crate::DbPool;

/// How many times `create` regenerates an id after a unique-key collision.
const CREATE_ATTEMPTS: u32 = 3;

/// PostgreSQL error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// [`ItemStore`] backed by the `items` table.
#[derive(Clone)]
pub struct PgItemStore {
    pool: DbPool,
}

impl PgItemStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list(&self, plan: &QueryPlan) -> Result<Envelope<Item>, StoreError> {
        let total = ItemRepo::count(&self.pool, plan).await?;

        // Past the last page there is nothing to fetch.
        let rows = if plan.offset() >= total {
            Vec::new()
        } else {
            ItemRepo::search(&self.pool, plan).await?
        };

        let items = rows
            .into_iter()
            .map(Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Envelope::new(items, total, plan))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, StoreError> {
        ItemRepo::find_by_id(&self.pool, id)
            .await?
            .map(Item::try_from)
            .transpose()
    }

    async fn create(&self, input: &ItemInput) -> Result<Item, StoreError> {
        let code = category_code(&input.category.main)
            .ok_or_else(|| StoreError::UnknownCategory(input.category.main.clone()))?;

        let mut last_id = String::new();
        for attempt in 1..=CREATE_ATTEMPTS {
            let existing = ItemRepo::ids_with_prefix(&self.pool, code).await?;
            let id = next_item_id(code, &existing)?;

            match ItemRepo::create(&self.pool, &id, input).await {
                Ok(row) => return Item::try_from(row),
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(item_id = %id, attempt, "Generated item id already taken");
                    last_id = id;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(StoreError::Duplicate(last_id))
    }

    async fn update(&self, id: &str, input: &ItemInput) -> Result<Option<Item>, StoreError> {
        ItemRepo::update(&self.pool, id, input)
            .await?
            .map(Item::try_from)
            .transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(ItemRepo::delete(&self.pool, id).await?)
    }

    async fn record_click(&self, id: &str) -> Result<Option<Item>, StoreError> {
        ItemRepo::increment_click(&self.pool, id)
            .await?
            .map(Item::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
