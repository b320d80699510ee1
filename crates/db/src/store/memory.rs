use std::collections::BTreeMap;

use async_trait::async_trait;
use catalog_core::envelope::Envelope;
use catalog_core::item::{category_code, next_item_id, Item, ItemInput};
use catalog_core::query::QueryPlan;
use tokio::sync::RwLock;

use super::ItemStore;
use crate::error::StoreError;

/// [`ItemStore`] kept in process memory.
///
/// Evaluates plans with the same predicate and ordering the SQL path
/// compiles to. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<BTreeMap<String, Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with items, keeping their ids and
    /// timestamps as given. Later duplicates of an id replace earlier ones.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        Self {
            items: RwLock::new(items),
        }
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

/// Copy the input's editable fields onto an item.
fn apply_input(item: &mut Item, input: &ItemInput) {
    item.name = input.name.clone();
    item.category = input.category.clone();
    item.item_type = input.item_type;
    item.metal = input.metal;
    item.carat = input.carat;
    item.weight = input.weight;
    item.stone_weight = input.stone_weight;
    item.gender = input.gender;
    item.image = input.image.clone();
    item.images = input.images.clone();
    item.videos = input.videos.clone();
    item.is_our_design = input.is_our_design;
    item.order_no = input.order_no;
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self, plan: &QueryPlan) -> Result<Envelope<Item>, StoreError> {
        let items = self.items.read().await;

        let mut matching: Vec<&Item> = items
            .values()
            .filter(|item| plan.filter.matches(item))
            .collect();
        matching.sort_by(|a, b| plan.sort.compare(a, b));

        let total = matching.len() as i64;
        let skip = usize::try_from(plan.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(plan.limit()).unwrap_or(0);
        let page = matching
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        Ok(Envelope::new(page, total, plan))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn create(&self, input: &ItemInput) -> Result<Item, StoreError> {
        let code = category_code(&input.category.main)
            .ok_or_else(|| StoreError::UnknownCategory(input.category.main.clone()))?;

        let mut items = self.items.write().await;
        let existing: Vec<String> = items
            .range(code.to_string()..)
            .map(|(id, _)| id)
            .take_while(|id| id.starts_with(code))
            .cloned()
            .collect();
        let id = next_item_id(code, &existing)?;

        let now = chrono::Utc::now();
        let item = Item {
            id: id.clone(),
            name: input.name.clone(),
            category: input.category.clone(),
            item_type: input.item_type,
            metal: input.metal,
            carat: input.carat,
            weight: input.weight,
            stone_weight: input.stone_weight,
            gender: input.gender,
            image: input.image.clone(),
            images: input.images.clone(),
            videos: input.videos.clone(),
            is_our_design: input.is_our_design,
            created_at: now,
            updated_at: now,
            click_count: 0,
            order_no: input.order_no,
        };

        items.insert(id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, input: &ItemInput) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(id) else {
            return Ok(None);
        };
        apply_input(item, input);
        item.updated_at = chrono::Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(id).is_some())
    }

    async fn record_click(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        Ok(items.get_mut(id).map(|item| {
            item.click_count += 1;
            item.clone()
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
