//! Repository for the `items` table.
//!
//! Compiles a [`QueryPlan`] into a parameterized `WHERE` / `ORDER BY` /
//! `LIMIT` query and provides the admin write operations.

use catalog_core::item::ItemInput;
use catalog_core::query::{ItemFilter, QueryPlan, SortField, SortOrder, StonePresence};
use sqlx::PgPool;

use crate::models::item::ItemRow;

/// Column list for `items` queries.
const COLUMNS: &str = "\
    id, name, category_main, category_sub, item_type, metal, carat, \
    weight, stone_weight, gender, image, images, videos, is_our_design, \
    click_count, order_no, created_at, updated_at";

/// Provides CRUD and catalogue search operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item under a pre-generated id.
    pub async fn create(
        pool: &PgPool,
        id: &str,
        input: &ItemInput,
    ) -> Result<ItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (\
                id, name, category_main, category_sub, item_type, metal, carat, \
                weight, stone_weight, gender, image, images, videos, is_our_design, order_no\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category.main)
            .bind(input.category.sub.as_deref())
            .bind(input.item_type.as_str())
            .bind(input.metal.as_str())
            .bind(i16::from(input.carat.value()))
            .bind(input.weight)
            .bind(input.stone_weight)
            .bind(input.gender.as_str())
            .bind(input.image.as_deref())
            .bind(&input.images)
            .bind(&input.videos)
            .bind(input.is_our_design)
            .bind(input.order_no)
            .fetch_one(pool)
            .await
    }

    /// Find an item by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ItemRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every id that starts with a category code.
    pub async fn ids_with_prefix(pool: &PgPool, code: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT id FROM items WHERE id LIKE $1")
            .bind(format!("{}%", escape_like(code)))
            .fetch_all(pool)
            .await
    }

    /// Overwrite every editable field of an item and bump `updated_at`.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &ItemInput,
    ) -> Result<Option<ItemRow>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET \
                name = $2, category_main = $3, category_sub = $4, item_type = $5, \
                metal = $6, carat = $7, weight = $8, stone_weight = $9, gender = $10, \
                image = $11, images = $12, videos = $13, is_our_design = $14, \
                order_no = $15, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category.main)
            .bind(input.category.sub.as_deref())
            .bind(input.item_type.as_str())
            .bind(input.metal.as_str())
            .bind(i16::from(input.carat.value()))
            .bind(input.weight)
            .bind(input.stone_weight)
            .bind(input.gender.as_str())
            .bind(input.image.as_deref())
            .bind(&input.images)
            .bind(&input.videos)
            .bind(input.is_our_design)
            .bind(input.order_no)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item by id. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Increment the click counter. Does not count as an edit.
    pub async fn increment_click(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<ItemRow>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET click_count = click_count + 1 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch one page of items matching the plan's filter, in plan order.
    pub async fn search(pool: &PgPool, plan: &QueryPlan) -> Result<Vec<ItemRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_item_filter(&plan.filter);

        let query = format!(
            "SELECT {COLUMNS} FROM items {where_clause} \
             ORDER BY {order_by} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
            order_by = order_by_clause(plan),
        );

        let q = bind_item_values(sqlx::query_as::<_, ItemRow>(&query), &bind_values);
        q.bind(plan.limit()).bind(plan.offset()).fetch_all(pool).await
    }

    /// Count items matching the plan's filter (for pagination metadata).
    pub async fn count(pool: &PgPool, plan: &QueryPlan) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_item_filter(&plan.filter);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM items {where_clause}");

        let q = bind_item_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }
}

// ---------------------------------------------------------------------------
// Dynamic filter helpers
// ---------------------------------------------------------------------------

/// A typed value bound to a positional parameter.
#[derive(Debug, Clone, PartialEq)]
enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Float(f64),
    Bool(bool),
}

/// Build the `WHERE` clause for an item filter.
///
/// Returns the clause (always non-empty: the weight range is always bound),
/// the values in bind order, and the next free parameter index.
fn build_item_filter(filter: &ItemFilter) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if !filter.categories.is_empty() {
        conditions.push(format!("category_main = ANY(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::TextArray(filter.categories.clone()));
    }

    let exact = [
        ("category_sub", &filter.sub_category),
        ("item_type", &filter.item_type),
        ("gender", &filter.gender),
        ("metal", &filter.metal),
    ];
    for (column, value) in exact {
        if let Some(value) = value {
            conditions.push(format!("{column} = ${bind_idx}"));
            bind_idx += 1;
            bind_values.push(BindValue::Text(value.clone()));
        }
    }

    match filter.stone {
        Some(StonePresence::With) => conditions.push("COALESCE(stone_weight, 0) > 0".into()),
        Some(StonePresence::Without) => conditions.push("COALESCE(stone_weight, 0) <= 0".into()),
        None => {}
    }

    if let Some(design) = filter.design {
        conditions.push(format!("is_our_design = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(design.is_our_design()));
    }

    if let Some(ref search) = filter.search {
        conditions.push(format!("name ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(search))));
    }

    if let Some(ref search_id) = filter.search_id {
        conditions.push(format!("id ILIKE ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(format!("%{}%", escape_like(search_id))));
    }

    conditions.push(format!("weight >= ${bind_idx}"));
    bind_idx += 1;
    bind_values.push(BindValue::Float(filter.weight.min));

    conditions.push(format!("weight <= ${bind_idx}"));
    bind_idx += 1;
    bind_values.push(BindValue::Float(filter.weight.max));

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    (where_clause, bind_values, bind_idx)
}

/// `ORDER BY` body: primary sort key, then `id` as a byte-ordered tie-break.
fn order_by_clause(plan: &QueryPlan) -> String {
    let column = match plan.sort.field {
        SortField::CreatedAt => "created_at",
        SortField::Weight => "weight",
    };
    let direction = match plan.sort.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!("{column} {direction}, id COLLATE \"C\" ASC")
}

/// Escape `LIKE` metacharacters so user input matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_item_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::TextArray(v) => q = q.bind(v.clone()),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_item_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::TextArray(v) => q = q.bind(v.clone()),
            BindValue::Float(v) => q = q.bind(*v),
            BindValue::Bool(v) => q = q.bind(*v),
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::query::{DesignOrigin, Sort, WeightRange};

    #[test]
    fn default_filter_binds_only_weight_range() {
        let (clause, values, next) = build_item_filter(&ItemFilter::default());
        assert_eq!(clause, "WHERE weight >= $1 AND weight <= $2");
        assert_eq!(values, vec![BindValue::Float(0.0), BindValue::Float(200.0)]);
        assert_eq!(next, 3);
    }

    #[test]
    fn full_filter_numbers_parameters_in_order() {
        let filter = ItemFilter {
            categories: vec!["Rings".into(), "Earrings".into()],
            sub_category: None,
            item_type: Some("fancy".into()),
            gender: None,
            metal: Some("gold".into()),
            stone: Some(StonePresence::Without),
            design: Some(DesignOrigin::Others),
            search: Some("50%_off".into()),
            search_id: Some("ear".into()),
            weight: WeightRange { min: 1.0, max: 9.0 },
        };
        let (clause, values, next) = build_item_filter(&filter);
        assert_eq!(
            clause,
            "WHERE category_main = ANY($1) AND item_type = $2 AND metal = $3 \
             AND COALESCE(stone_weight, 0) <= 0 AND is_our_design = $4 \
             AND name ILIKE $5 AND id ILIKE $6 AND weight >= $7 AND weight <= $8"
        );
        assert_eq!(
            values,
            vec![
                BindValue::TextArray(vec!["Rings".into(), "Earrings".into()]),
                BindValue::Text("fancy".into()),
                BindValue::Text("gold".into()),
                BindValue::Bool(false),
                BindValue::Text("%50\\%\\_off%".into()),
                BindValue::Text("%ear%".into()),
                BindValue::Float(1.0),
                BindValue::Float(9.0),
            ]
        );
        assert_eq!(next, 9);
    }

    #[test]
    fn order_by_uses_sort_and_id_tiebreak() {
        let plan = QueryPlan {
            sort: Sort {
                field: SortField::Weight,
                order: SortOrder::Asc,
            },
            ..QueryPlan::default()
        };
        assert_eq!(order_by_clause(&plan), "weight ASC, id COLLATE \"C\" ASC");
        assert_eq!(
            order_by_clause(&QueryPlan::default()),
            "created_at DESC, id COLLATE \"C\" ASC"
        );
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("a_b%c\\d"), "a\\_b\\%c\\\\d");
        assert_eq!(escape_like("EAR"), "EAR");
    }
}
