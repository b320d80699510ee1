//! Row struct for the `items` table.

use catalog_core::item::{Carat, Category, Gender, Item, ItemType, Metal};
use catalog_core::types::Timestamp;
use sqlx::FromRow;

use crate::error::StoreError;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub category_main: String,
    pub category_sub: Option<String>,
    pub item_type: String,
    pub metal: String,
    pub carat: i16,
    pub weight: f64,
    pub stone_weight: Option<f64>,
    pub gender: String,
    pub image: Option<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub is_our_design: bool,
    pub click_count: i64,
    pub order_no: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ItemRow> for Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let corrupt = |reason: String| StoreError::Corrupt {
            id: row.id.clone(),
            reason,
        };

        let item_type = row
            .item_type
            .parse::<ItemType>()
            .map_err(|e| corrupt(format!("{e}")))?;
        let metal = row
            .metal
            .parse::<Metal>()
            .map_err(|e| corrupt(format!("{e}")))?;
        let gender = row
            .gender
            .parse::<Gender>()
            .map_err(|e| corrupt(format!("{e}")))?;
        let carat = u8::try_from(row.carat)
            .map_err(|_| corrupt(format!("carat {} out of range", row.carat)))
            .and_then(|c| Carat::try_from(c).map_err(|e| corrupt(format!("{e}"))))?;

        Ok(Item {
            id: row.id,
            name: row.name,
            category: Category {
                main: row.category_main,
                sub: row.category_sub,
            },
            item_type,
            metal,
            carat,
            weight: row.weight,
            stone_weight: row.stone_weight,
            gender,
            image: row.image,
            images: row.images,
            videos: row.videos,
            is_our_design: row.is_our_design,
            created_at: row.created_at,
            updated_at: row.updated_at,
            click_count: row.click_count,
            order_no: row.order_no,
        })
    }
}
