//! Canonical query-string encoding of a [`QueryState`].
//!
//! Keys are emitted in a fixed order so equal states always produce equal
//! strings. Unset dimensions are omitted; paging, sort and the weight range
//! are always present.

use url::form_urlencoded;

use crate::state::QueryState;

/// Wire name of the category list. The misspelling is what the server reads.
pub const CATEGORIES_KEY: &str = "catagories";

/// Key/value pairs for `state`, in canonical order.
pub fn to_query_pairs(state: &QueryState) -> Vec<(&'static str, String)> {
    let sort = state.sort();
    let mut pairs = vec![
        ("page", state.page().to_string()),
        ("pageSize", state.page_size().to_string()),
        ("sortField", sort.field.as_param().to_string()),
        ("sortOrder", sort.order.as_param().to_string()),
    ];

    if !state.categories().is_empty() {
        let joined = state
            .categories()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        pairs.push((CATEGORIES_KEY, joined));
    }
    if let Some(sub) = state.sub_category() {
        pairs.push(("subCategory", sub.to_string()));
    }
    if let Some(item_type) = state.item_type() {
        pairs.push(("type", item_type.as_str().to_string()));
    }
    if let Some(gender) = state.gender() {
        pairs.push(("gender", gender.as_str().to_string()));
    }
    if let Some(metal) = state.metal() {
        pairs.push(("metal", metal.as_str().to_string()));
    }
    if let Some(stone) = state.stone() {
        pairs.push(("stone", stone.as_param().to_string()));
    }
    if let Some(design) = state.design() {
        pairs.push(("design", design.as_param().to_string()));
    }

    let search = state.search().trim();
    if !search.is_empty() {
        pairs.push(("search", search.to_string()));
    }
    let search_id = state.search_id().trim();
    if !search_id.is_empty() {
        pairs.push(("searchId", search_id.to_string()));
    }

    pairs.push(("minWeight", state.min_weight().to_string()));
    pairs.push(("maxWeight", state.max_weight().to_string()));
    pairs
}

/// Percent-encoded query string for `state`, without the leading `?`.
pub fn to_query_string(state: &QueryState) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(to_query_pairs(state))
        .finish()
}
