//! End-to-end tests: the real API router served on an ephemeral port and
//! queried through `CatalogClient`.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use catalog_api::auth::jwt::JwtConfig;
use catalog_api::config::{parse_origins, ServerConfig};
use catalog_api::router::build_app_router;
use catalog_api::state::AppState;
use catalog_client::{CatalogClient, ClientError, QueryAction, QueryState};
use catalog_core::item::{category_code, Carat, Category, Gender, Item, ItemType, Metal};
use catalog_core::query::{SortField, SortOrder, StonePresence};
use catalog_db::MemoryItemStore;
use chrono::{Duration, TimeZone, Utc};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn item(seq: usize, main: &str) -> Item {
    let created = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap() + Duration::hours(seq as i64);
    Item {
        id: format!("{}{:03}", category_code(main).unwrap(), seq),
        name: format!("{main} {seq}"),
        category: Category {
            main: main.to_string(),
            sub: None,
        },
        item_type: ItemType::Normal,
        metal: if seq % 2 == 0 { Metal::Gold } else { Metal::Silver },
        carat: Carat::K22,
        weight: (seq % 9) as f64 * 2.0,
        stone_weight: (seq % 4 == 0).then_some(0.5),
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

fn corpus() -> Vec<Item> {
    let mains = ["Rings", "Chains", "Anklets"];
    (1..=30).map(|seq| item(seq, mains[seq % mains.len()])).collect()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn serve_catalogue(items: Vec<Item>) -> CatalogClient {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: parse_origins("http://localhost:5173").unwrap(),
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "roundtrip-secret".to_string(),
        },
        database_url: None,
    };
    let state = AppState {
        store: Arc::new(MemoryItemStore::with_items(items)),
        config: Arc::new(config.clone()),
    };
    let addr = serve(build_app_router(state, &config)).await;
    CatalogClient::new(&format!("http://{addr}")).unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn filtered_query_round_trips() {
    let client = serve_catalogue(corpus()).await;
    let state = QueryState::new().apply_all([
        QueryAction::ToggleCategory("Rings".into()),
        QueryAction::ToggleCategory("Chains".into()),
        QueryAction::SetMetal(Some(Metal::Gold)),
        QueryAction::SetMaxWeight(10.0),
        QueryAction::SetSortField(SortField::Weight),
        QueryAction::SetSortOrder(SortOrder::Asc),
    ]);

    let envelope = client.fetch(&state).await.unwrap();
    assert!(envelope.total_items > 0);
    assert_eq!(envelope.items.len() as i64, envelope.total_items);
    for item in &envelope.items {
        assert!(item.category.main == "Rings" || item.category.main == "Chains");
        assert_eq!(item.metal, Metal::Gold);
        assert!(item.weight <= 10.0);
    }
    for pair in envelope.items.windows(2) {
        assert!(pair[0].weight <= pair[1].weight);
    }
}

#[tokio::test]
async fn paging_through_all_pages_is_complete() {
    let client = serve_catalogue(corpus()).await;
    let base = QueryState::new().apply_all([
        QueryAction::SetPageSize(7),
        QueryAction::SetSortField(SortField::Weight),
    ]);

    let first = client.fetch(&base).await.unwrap();
    assert_eq!(first.total_items, 30);
    assert_eq!(first.total_pages, 5);

    let mut seen = HashSet::new();
    for page in 1..=first.total_pages {
        let envelope = client
            .fetch(&base.clone().apply(QueryAction::SetPage(page)))
            .await
            .unwrap();
        assert!(envelope.items.len() <= 7);
        for item in envelope.items {
            assert!(seen.insert(item.id), "duplicate item across pages");
        }
    }
    assert_eq!(seen.len(), 30);
}

#[tokio::test]
async fn stone_filter_and_empty_result() {
    let client = serve_catalogue(corpus()).await;

    let with_stone = QueryState::new().apply(QueryAction::SetStone(Some(StonePresence::With)));
    let envelope = client.fetch(&with_stone).await.unwrap();
    assert_eq!(envelope.total_items, 7);
    assert!(envelope.items.iter().all(Item::has_stone));

    let custom = QueryState::new().apply(QueryAction::ToggleCategory("Custom".into()));
    let envelope = client.fetch(&custom).await.unwrap();
    assert!(envelope.items.is_empty());
    assert_eq!(envelope.total_items, 0);
    assert_eq!(envelope.total_pages, 1);
}

#[tokio::test]
async fn fetch_item_by_id() {
    let client = serve_catalogue(corpus()).await;

    let found = client.fetch_item("CHN001").await.unwrap().unwrap();
    assert_eq!(found.category.main, "Chains");
    assert!(client.fetch_item("CHN999").await.unwrap().is_none());
}

#[tokio::test]
async fn bare_array_response_is_normalized() {
    let items = vec![item(1, "Anklets"), item(2, "Anklets"), item(3, "Anklets")];
    let app = Router::new().route(
        "/api/jewellery",
        get(move || {
            let items = items.clone();
            async move { Json(items) }
        }),
    );
    let addr = serve(app).await;
    let client = CatalogClient::new(&format!("http://{addr}")).unwrap();

    let envelope = client.fetch(&QueryState::new()).await.unwrap();
    assert_eq!(envelope.items.len(), 3);
    assert_eq!(envelope.total_items, 3);
    assert_eq!(envelope.total_pages, 1);
    assert_eq!(envelope.page, 1);
}

#[tokio::test]
async fn server_failure_degrades_to_empty_page() {
    let app = Router::new().route(
        "/api/jewellery",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "storage offline") }),
    );
    let addr = serve(app).await;
    let client = CatalogClient::new(&format!("http://{addr}")).unwrap();
    let state = QueryState::new().apply(QueryAction::SetPage(4));

    let err = client.fetch(&state).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 500, .. }));

    let envelope = client.fetch_or_empty(&state).await;
    assert!(envelope.items.is_empty());
    assert_eq!(envelope.total_items, 0);
    assert_eq!(envelope.total_pages, 1);
    assert_eq!(envelope.page, 4);
}
