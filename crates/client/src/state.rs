//! Catalogue query state.
//!
//! [`QueryState`] is an immutable value describing one catalogue request.
//! Every UI interaction becomes a [`QueryAction`]; [`QueryState::apply`]
//! returns the next state. Any action other than [`QueryAction::SetPage`]
//! sends the user back to page 1 so a stale page number is never combined
//! with a new filter set.

use std::collections::BTreeSet;

use catalog_core::item::{Gender, ItemType, Metal};
use catalog_core::query::{
    DesignOrigin, Sort, SortField, SortOrder, StonePresence, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE, MAX_WEIGHT, MIN_WEIGHT,
};

/// Smallest distance kept between the two weight bounds.
pub const MIN_WEIGHT_GAP: f64 = 1.0;

/// One transition of the query state.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryAction {
    /// Jump to a page. The only action that keeps the filters' page.
    SetPage(i64),
    SetPageSize(i64),
    SetSortField(SortField),
    SetSortOrder(SortOrder),
    /// Add the category if absent, remove it if present.
    ToggleCategory(String),
    ClearCategories,
    SetSubCategory(Option<String>),
    SetType(Option<ItemType>),
    SetGender(Option<Gender>),
    SetMetal(Option<Metal>),
    SetStone(Option<StonePresence>),
    SetDesign(Option<DesignOrigin>),
    SetSearch(String),
    SetSearchId(String),
    SetMinWeight(f64),
    SetMaxWeight(f64),
    /// Back to the default state.
    Reset,
}

/// Immutable catalogue query.
///
/// Invariants upheld by [`QueryState::apply`]:
/// - `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`
/// - `MIN_WEIGHT <= min_weight < max_weight <= MAX_WEIGHT`, at least
///   [`MIN_WEIGHT_GAP`] apart
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    page: i64,
    page_size: i64,
    sort: Sort,
    categories: BTreeSet<String>,
    sub_category: Option<String>,
    item_type: Option<ItemType>,
    gender: Option<Gender>,
    metal: Option<Metal>,
    stone: Option<StonePresence>,
    design: Option<DesignOrigin>,
    search: String,
    search_id: String,
    min_weight: f64,
    max_weight: f64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
            categories: BTreeSet::new(),
            sub_category: None,
            item_type: None,
            gender: None,
            metal: None,
            stone: None,
            design: None,
            search: String::new(),
            search_id: String::new(),
            min_weight: MIN_WEIGHT,
            max_weight: MAX_WEIGHT,
        }
    }
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a sequence of actions in order.
    pub fn apply_all(self, actions: impl IntoIterator<Item = QueryAction>) -> Self {
        actions.into_iter().fold(self, Self::apply)
    }

    /// Produce the state that follows `action`.
    pub fn apply(self, action: QueryAction) -> Self {
        if let QueryAction::SetPage(page) = action {
            return Self {
                page: page.max(1),
                ..self
            };
        }

        let mut next = self;
        next.page = DEFAULT_PAGE;

        match action {
            QueryAction::SetPage(_) => {}
            QueryAction::SetPageSize(size) => {
                next.page_size = if size < 1 {
                    DEFAULT_PAGE_SIZE
                } else {
                    size.min(MAX_PAGE_SIZE)
                };
            }
            QueryAction::SetSortField(field) => next.sort.field = field,
            QueryAction::SetSortOrder(order) => next.sort.order = order,
            QueryAction::ToggleCategory(category) => {
                let category = category.trim().to_string();
                if !category.is_empty() && !next.categories.remove(&category) {
                    next.categories.insert(category);
                }
            }
            QueryAction::ClearCategories => next.categories.clear(),
            QueryAction::SetSubCategory(sub) => {
                next.sub_category = sub
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
            }
            QueryAction::SetType(item_type) => next.item_type = item_type,
            QueryAction::SetGender(gender) => next.gender = gender,
            QueryAction::SetMetal(metal) => next.metal = metal,
            QueryAction::SetStone(stone) => next.stone = stone,
            QueryAction::SetDesign(design) => next.design = design,
            QueryAction::SetSearch(search) => next.search = search,
            QueryAction::SetSearchId(search_id) => next.search_id = search_id,
            QueryAction::SetMinWeight(min) => {
                if min.is_finite() {
                    next.min_weight = min.clamp(MIN_WEIGHT, next.max_weight - MIN_WEIGHT_GAP);
                }
            }
            QueryAction::SetMaxWeight(max) => {
                if max.is_finite() {
                    next.max_weight = max.clamp(next.min_weight + MIN_WEIGHT_GAP, MAX_WEIGHT);
                }
            }
            QueryAction::Reset => next = Self::default(),
        }

        next
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }

    /// Selected main categories, in sorted order.
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn sub_category(&self) -> Option<&str> {
        self.sub_category.as_deref()
    }

    pub fn item_type(&self) -> Option<ItemType> {
        self.item_type
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn metal(&self) -> Option<Metal> {
        self.metal
    }

    pub fn stone(&self) -> Option<StonePresence> {
        self.stone
    }

    pub fn design(&self) -> Option<DesignOrigin> {
        self.design
    }

    /// Name search text as typed (untrimmed).
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Id search text as typed (untrimmed).
    pub fn search_id(&self) -> &str {
        &self.search_id
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }
}
