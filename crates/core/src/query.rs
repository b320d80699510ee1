//! Catalogue query resolution.
//!
//! Turns the raw `/api/jewellery` query parameters into a validated
//! [`QueryPlan`]: a filter predicate, a sort, and a page window. Resolution
//! never fails; malformed or missing values fall back to defaults.
//!
//! The plan is evaluated two ways: compiled to SQL by the storage layer, and
//! directly via [`ItemFilter::matches`] / [`Sort::compare`] for in-memory
//! storage. Both must agree.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::item::Item;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest accepted page size; larger requests are clamped.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Lower bound of the weight domain (grams).
pub const MIN_WEIGHT: f64 = 0.0;

/// Upper bound of the weight domain (grams).
pub const MAX_WEIGHT: f64 = 200.0;

/// Legacy UI placeholder meaning "do not filter on this dimension".
const ALL_SENTINEL: &str = "all";

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Raw query parameters for `GET /api/jewellery`.
///
/// Every field is an optional string so that malformed values reach the
/// resolver (and fall back to defaults) instead of failing extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQueryParams {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub sort_field: Option<String>,
    pub sort_order: Option<String>,
    /// Comma-separated main categories. The wire name keeps its historical
    /// spelling; the corrected spelling is accepted too.
    #[serde(rename = "catagories", alias = "categories")]
    pub categories: Option<String>,
    pub sub_category: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub gender: Option<String>,
    pub metal: Option<String>,
    pub stone: Option<String>,
    pub design: Option<String>,
    pub search: Option<String>,
    pub search_id: Option<String>,
    pub min_weight: Option<String>,
    pub max_weight: Option<String>,
}

impl CatalogQueryParams {
    /// Build parameters from raw query-string pairs.
    ///
    /// The first occurrence of a key wins and later repeats are ignored;
    /// `catagories` and `categories` count as the same key. Unknown keys are
    /// skipped.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut params.page,
                "pageSize" => &mut params.page_size,
                "sortField" => &mut params.sort_field,
                "sortOrder" => &mut params.sort_order,
                "catagories" | "categories" => &mut params.categories,
                "subCategory" => &mut params.sub_category,
                "type" => &mut params.item_type,
                "gender" => &mut params.gender,
                "metal" => &mut params.metal,
                "stone" => &mut params.stone,
                "design" => &mut params.design,
                "search" => &mut params.search,
                "searchId" => &mut params.search_id,
                "minWeight" => &mut params.min_weight,
                "maxWeight" => &mut params.max_weight,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Weight,
}

impl SortField {
    /// Parse a wire value; `date` is accepted as an alias of `createdAt`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim() {
            "createdAt" | "date" => Some(SortField::CreatedAt),
            "weight" => Some(SortField::Weight),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::Weight => "weight",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn from_param(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Primary sort key and direction. Ties always break on `id` ascending so
/// that pages are stable across requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let primary = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::Weight => a.weight.total_cmp(&b.weight),
        };
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

// ---------------------------------------------------------------------------
// Derived boolean filters
// ---------------------------------------------------------------------------

/// Stone presence filter (`stone=with|without`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StonePresence {
    With,
    Without,
}

impl StonePresence {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "with" => Some(StonePresence::With),
            "without" => Some(StonePresence::Without),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            StonePresence::With => "with",
            StonePresence::Without => "without",
        }
    }
}

/// Design provenance filter (`design=inhouse|others`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignOrigin {
    InHouse,
    Others,
}

impl DesignOrigin {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inhouse" => Some(DesignOrigin::InHouse),
            "others" => Some(DesignOrigin::Others),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            DesignOrigin::InHouse => "inhouse",
            DesignOrigin::Others => "others",
        }
    }

    /// The `isOurDesign` value this filter selects.
    pub fn is_our_design(self) -> bool {
        matches!(self, DesignOrigin::InHouse)
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Closed weight interval in grams.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRange {
    pub min: f64,
    pub max: f64,
}

impl Default for WeightRange {
    fn default() -> Self {
        Self {
            min: MIN_WEIGHT,
            max: MAX_WEIGHT,
        }
    }
}

impl WeightRange {
    pub fn contains(&self, weight: f64) -> bool {
        self.min <= weight && weight <= self.max
    }
}

/// Validated filter predicate. `None` / empty means "unfiltered".
///
/// All dimensions are ANDed; `categories` is an OR over `category.main`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    pub categories: Vec<String>,
    pub sub_category: Option<String>,
    pub item_type: Option<String>,
    pub gender: Option<String>,
    pub metal: Option<String>,
    pub stone: Option<StonePresence>,
    pub design: Option<DesignOrigin>,
    /// Case-insensitive substring of `name`.
    pub search: Option<String>,
    /// Case-insensitive substring of `id`.
    pub search_id: Option<String>,
    pub weight: WeightRange,
}

impl ItemFilter {
    /// Evaluate the predicate against one item.
    pub fn matches(&self, item: &Item) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&item.category.main) {
            return false;
        }
        if let Some(ref sub) = self.sub_category {
            if item.category.sub.as_deref() != Some(sub.as_str()) {
                return false;
            }
        }
        if let Some(ref item_type) = self.item_type {
            if item.item_type.as_str() != item_type {
                return false;
            }
        }
        if let Some(ref gender) = self.gender {
            if item.gender.as_str() != gender {
                return false;
            }
        }
        if let Some(ref metal) = self.metal {
            if item.metal.as_str() != metal {
                return false;
            }
        }
        match self.stone {
            Some(StonePresence::With) if !item.has_stone() => return false,
            Some(StonePresence::Without) if item.has_stone() => return false,
            _ => {}
        }
        if let Some(design) = self.design {
            if item.is_our_design != design.is_our_design() {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            if !contains_ignore_case(&item.name, search) {
                return false;
            }
        }
        if let Some(ref search_id) = self.search_id {
            if !contains_ignore_case(&item.id, search_id) {
                return false;
            }
        }
        self.weight.contains(item.weight)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A fully resolved catalogue query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub page: i64,
    pub page_size: i64,
    pub sort: Sort,
    pub filter: ItemFilter,
}

impl Default for QueryPlan {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
            filter: ItemFilter::default(),
        }
    }
}

impl QueryPlan {
    /// Resolve raw parameters into a plan, substituting defaults for
    /// anything missing or malformed.
    pub fn resolve(params: &CatalogQueryParams) -> Self {
        let page = parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive(params.page_size.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE);

        let sort = Sort {
            field: params
                .sort_field
                .as_deref()
                .and_then(SortField::from_param)
                .unwrap_or_default(),
            order: params
                .sort_order
                .as_deref()
                .and_then(SortOrder::from_param)
                .unwrap_or_default(),
        };

        let categories = params
            .categories
            .as_deref()
            .map(split_categories)
            .unwrap_or_default();

        let min = parse_weight(params.min_weight.as_deref()).unwrap_or(MIN_WEIGHT);
        let max = parse_weight(params.max_weight.as_deref()).unwrap_or(MAX_WEIGHT);
        let weight = if min <= max {
            WeightRange { min, max }
        } else {
            WeightRange { min: max, max: min }
        };

        let filter = ItemFilter {
            categories,
            sub_category: normalize_text(params.sub_category.as_deref()),
            item_type: normalize_text(params.item_type.as_deref()),
            gender: normalize_text(params.gender.as_deref()),
            metal: normalize_text(params.metal.as_deref()),
            stone: normalize_text(params.stone.as_deref())
                .and_then(|s| StonePresence::from_param(&s)),
            design: normalize_text(params.design.as_deref())
                .and_then(|s| DesignOrigin::from_param(&s)),
            search: trim_text(params.search.as_deref()),
            search_id: trim_text(params.search_id.as_deref()),
            weight,
        };

        Self {
            page,
            page_size,
            sort,
            filter,
        }
    }

    /// Number of matching items to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Maximum number of items on the page.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Page count for `total` matching items under this plan's page size.
    pub fn total_pages(&self, total: i64) -> i64 {
        total_pages(total, self.page_size)
    }
}

/// `ceil(total / page_size)`, never less than 1.
///
/// An empty result is reported as a single empty page.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 1;
    }
    (total + page_size - 1) / page_size
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok().filter(|v| *v > 0)
}

fn parse_weight(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trim free text; only blank values become `None`.
fn trim_text(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Trim a select parameter; blank values and the "All" sentinel become `None`.
fn normalize_text(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        None
    } else {
        Some(value.to_string())
    }
}

fn split_categories(raw: &str) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim) {
        if name.is_empty() || name.eq_ignore_ascii_case(ALL_SENTINEL) {
            continue;
        }
        if !categories.iter().any(|c| c == name) {
            categories.push(name.to_string());
        }
    }
    categories
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Carat, Category, Gender, ItemType, Metal};
    use chrono::{TimeZone, Utc};

    fn params() -> CatalogQueryParams {
        CatalogQueryParams::default()
    }

    fn item(id: &str, weight: f64) -> Item {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Item {
            id: id.to_string(),
            name: format!("Piece {id}"),
            category: Category {
                main: "Rings".to_string(),
                sub: None,
            },
            item_type: ItemType::Normal,
            metal: Metal::Gold,
            carat: Carat::K22,
            weight,
            stone_weight: None,
            gender: Gender::Unisex,
            image: None,
            images: Vec::new(),
            videos: Vec::new(),
            is_our_design: true,
            created_at: created,
            updated_at: created,
            click_count: 0,
            order_no: None,
        }
    }

    // -- defaults and fallbacks ---------------------------------------------

    #[test]
    fn empty_params_resolve_to_defaults() {
        let plan = QueryPlan::resolve(&params());
        assert_eq!(plan, QueryPlan::default());
        assert_eq!(plan.filter.weight, WeightRange { min: 0.0, max: 200.0 });
    }

    #[test]
    fn malformed_pagination_falls_back() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            page: Some("abc".into()),
            page_size: Some("-5".into()),
            ..params()
        });
        assert_eq!(plan.page, DEFAULT_PAGE);
        assert_eq!(plan.page_size, DEFAULT_PAGE_SIZE);

        let plan = QueryPlan::resolve(&CatalogQueryParams {
            page: Some("0".into()),
            page_size: Some("0".into()),
            ..params()
        });
        assert_eq!(plan.page, DEFAULT_PAGE);
        assert_eq!(plan.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn oversized_page_size_is_clamped() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            page_size: Some("5000".into()),
            ..params()
        });
        assert_eq!(plan.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn sort_mapping_and_fallbacks() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            sort_field: Some("weight".into()),
            sort_order: Some("ASC".into()),
            ..params()
        });
        assert_eq!(plan.sort.field, SortField::Weight);
        assert_eq!(plan.sort.order, SortOrder::Asc);

        let plan = QueryPlan::resolve(&CatalogQueryParams {
            sort_field: Some("date".into()),
            ..params()
        });
        assert_eq!(plan.sort.field, SortField::CreatedAt);

        let plan = QueryPlan::resolve(&CatalogQueryParams {
            sort_field: Some("price".into()),
            sort_order: Some("sideways".into()),
            ..params()
        });
        assert_eq!(plan.sort, Sort::default());
        assert_eq!(plan.sort.order, SortOrder::Desc);
    }

    #[test]
    fn weight_bounds_parse_default_and_swap() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            min_weight: Some("heavy".into()),
            max_weight: Some("50.5".into()),
            ..params()
        });
        assert_eq!(plan.filter.weight, WeightRange { min: 0.0, max: 50.5 });

        let plan = QueryPlan::resolve(&CatalogQueryParams {
            min_weight: Some("80".into()),
            max_weight: Some("20".into()),
            ..params()
        });
        assert_eq!(plan.filter.weight, WeightRange { min: 20.0, max: 80.0 });

        let plan = QueryPlan::resolve(&CatalogQueryParams {
            max_weight: Some("NaN".into()),
            ..params()
        });
        assert_eq!(plan.filter.weight.max, MAX_WEIGHT);
    }

    #[test]
    fn categories_split_trimmed_and_deduplicated() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            categories: Some(" Earrings,Rings,,Earrings ,All".into()),
            ..params()
        });
        assert_eq!(plan.filter.categories, vec!["Earrings", "Rings"]);
    }

    #[test]
    fn sentinels_and_blanks_mean_unfiltered() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            categories: Some("all".into()),
            gender: Some("All".into()),
            metal: Some("  ".into()),
            stone: Some("maybe".into()),
            design: Some("All".into()),
            search: Some("   ".into()),
            ..params()
        });
        assert_eq!(plan.filter, ItemFilter::default());
    }

    #[test]
    fn search_text_keeps_the_word_all() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            search: Some(" all ".into()),
            search_id: Some("ALL".into()),
            ..params()
        });
        assert_eq!(plan.filter.search.as_deref(), Some("all"));
        assert_eq!(plan.filter.search_id.as_deref(), Some("ALL"));

        let mut small = item("EAR001", 2.0);
        small.name = "Small hoops".to_string();
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            search: Some("all".into()),
            ..params()
        });
        assert!(plan.filter.matches(&small));
        assert!(!plan.filter.matches(&item("EAR002", 2.0)));
    }

    #[test]
    fn derived_boolean_filters_parse() {
        let plan = QueryPlan::resolve(&CatalogQueryParams {
            stone: Some("with".into()),
            design: Some("others".into()),
            ..params()
        });
        assert_eq!(plan.filter.stone, Some(StonePresence::With));
        assert_eq!(plan.filter.design, Some(DesignOrigin::Others));
    }

    #[test]
    fn misspelled_and_corrected_category_keys_both_deserialize() {
        let legacy: CatalogQueryParams =
            serde_json::from_value(serde_json::json!({ "catagories": "Rings" })).unwrap();
        let corrected: CatalogQueryParams =
            serde_json::from_value(serde_json::json!({ "categories": "Rings" })).unwrap();
        assert_eq!(legacy.categories.as_deref(), Some("Rings"));
        assert_eq!(corrected.categories.as_deref(), Some("Rings"));
    }

    #[test]
    fn pairs_first_occurrence_wins_and_aliases_share_a_key() {
        let params = CatalogQueryParams::from_pairs([
            ("catagories", "Bangles"),
            ("categories", "Rings"),
            ("page", "2"),
            ("page", "7"),
            ("maxWeight", "1"),
            ("colour", "red"),
        ]);
        assert_eq!(params.categories.as_deref(), Some("Bangles"));
        assert_eq!(params.page.as_deref(), Some("2"));
        assert_eq!(params.max_weight.as_deref(), Some("1"));
        assert_eq!(params.search, None);

        let plan = QueryPlan::resolve(&params);
        assert_eq!(plan.page, 2);
        assert_eq!(plan.filter.categories, vec!["Bangles"]);
        assert_eq!(plan.filter.weight.max, 1.0);
    }

    // -- pagination math -----------------------------------------------------

    #[test]
    fn offset_and_total_pages() {
        let plan = QueryPlan {
            page: 3,
            page_size: 20,
            ..QueryPlan::default()
        };
        assert_eq!(plan.offset(), 40);
        assert_eq!(plan.limit(), 20);
        assert_eq!(plan.total_pages(25), 2);
        assert_eq!(plan.total_pages(40), 2);
        assert_eq!(plan.total_pages(41), 3);
        assert_eq!(plan.total_pages(0), 1);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let plan = QueryPlan {
            page: i64::MAX,
            page_size: 100,
            ..QueryPlan::default()
        };
        assert_eq!(plan.offset(), i64::MAX);
    }

    // -- predicate -----------------------------------------------------------

    #[test]
    fn filter_matches_each_dimension() {
        let mut ring = item("RNG001", 10.0);
        ring.stone_weight = Some(0.5);
        ring.category.sub = Some("Solitaire".into());

        let filter = ItemFilter {
            categories: vec!["Earrings".into(), "Rings".into()],
            sub_category: Some("Solitaire".into()),
            item_type: Some("normal".into()),
            gender: Some("Unisex".into()),
            metal: Some("gold".into()),
            stone: Some(StonePresence::With),
            design: Some(DesignOrigin::InHouse),
            search: Some("PIECE".into()),
            search_id: Some("rng0".into()),
            weight: WeightRange { min: 10.0, max: 10.0 },
        };
        assert!(filter.matches(&ring));

        let miss = |f: ItemFilter| assert!(!f.matches(&ring));
        miss(ItemFilter {
            categories: vec!["Earrings".into()],
            ..ItemFilter::default()
        });
        miss(ItemFilter {
            metal: Some("silver".into()),
            ..ItemFilter::default()
        });
        miss(ItemFilter {
            stone: Some(StonePresence::Without),
            ..ItemFilter::default()
        });
        miss(ItemFilter {
            design: Some(DesignOrigin::Others),
            ..ItemFilter::default()
        });
        miss(ItemFilter {
            search_id: Some("EAR".into()),
            ..ItemFilter::default()
        });
        miss(ItemFilter {
            weight: WeightRange { min: 10.5, max: 20.0 },
            ..ItemFilter::default()
        });
    }

    #[test]
    fn zero_stone_weight_counts_as_without() {
        let mut plain = item("RNG002", 3.0);
        plain.stone_weight = Some(0.0);
        let without = ItemFilter {
            stone: Some(StonePresence::Without),
            ..ItemFilter::default()
        };
        assert!(without.matches(&plain));
    }

    #[test]
    fn search_id_is_substring() {
        let filter = ItemFilter {
            search_id: Some("EAR001".into()),
            ..ItemFilter::default()
        };
        assert!(filter.matches(&item("EAR00123", 5.0)));
    }

    // -- sort ----------------------------------------------------------------

    #[test]
    fn sort_breaks_ties_on_id_ascending() {
        let sort = Sort {
            field: SortField::Weight,
            order: SortOrder::Desc,
        };
        let mut items = vec![item("B", 5.0), item("C", 9.0), item("A", 5.0)];
        items.sort_by(|a, b| sort.compare(a, b));
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }
}
