//! Integration tests: domain services → inventory store → both views.

use chrono::NaiveDate;
use domain::{LineInput, ReceiptInput, ReceiptService, ResourceService, UnitService};
use inventory_store::{
    DocumentId, DocumentQuery, InMemoryInventoryStore, ItemQuery, Resource, Unit,
};
use queries::{ReceiptsView, WarehouseView};
use rust_decimal::Decimal;

struct Fixture {
    receipts: ReceiptService<InMemoryInventoryStore>,
    resources: ResourceService<InMemoryInventoryStore>,
    documents: ReceiptsView<InMemoryInventoryStore>,
    warehouse: WarehouseView<InMemoryInventoryStore>,
    a: Resource,
    b: Resource,
    kg: Unit,
    bag: Unit,
    d1: DocumentId,
    d2: DocumentId,
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// D1 on 2024-01-10 receives A in kg, D2 on 2024-02-15 receives B in bags.
async fn setup() -> Fixture {
    let store = InMemoryInventoryStore::new();
    let resources = ResourceService::new(store.clone());
    let units = UnitService::new(store.clone());
    let receipts = ReceiptService::new(store.clone());

    let a = resources.create("Alpha").await.unwrap();
    let b = resources.create("Beta").await.unwrap();
    let kg = units.create("kg").await.unwrap();
    let bag = units.create("bag").await.unwrap();

    let d1 = receipts
        .create(ReceiptInput::new(
            "D1",
            date(2024, 1, 10),
            vec![LineInput::new(a.id, kg.id, Decimal::from(10))],
        ))
        .await
        .unwrap()
        .id;
    let d2 = receipts
        .create(ReceiptInput::new(
            "D2",
            date(2024, 2, 15),
            vec![LineInput::new(b.id, bag.id, Decimal::from(3))],
        ))
        .await
        .unwrap()
        .id;

    Fixture {
        receipts,
        resources,
        documents: ReceiptsView::new(store.clone()),
        warehouse: WarehouseView::new(store),
        a,
        b,
        kg,
        bag,
        d1,
        d2,
    }
}

async fn listed_ids(fixture: &Fixture, filter: DocumentQuery) -> Vec<DocumentId> {
    fixture
        .documents
        .list_documents(filter)
        .await
        .unwrap()
        .documents
        .iter()
        .map(|d| d.id)
        .collect()
}

#[tokio::test]
async fn test_date_from_keeps_later_documents() {
    let f = setup().await;

    let ids = listed_ids(&f, DocumentQuery::new().date_from(date(2024, 2, 1))).await;
    assert_eq!(ids, vec![f.d2]);

    let ids = listed_ids(&f, DocumentQuery::new().date_to(date(2024, 1, 10))).await;
    assert_eq!(ids, vec![f.d1]);
}

#[tokio::test]
async fn test_resource_filter_matches_any_item() {
    let f = setup().await;

    let ids = listed_ids(&f, DocumentQuery::new().resource_ids([f.a.id])).await;
    assert_eq!(ids, vec![f.d1]);

    let ids = listed_ids(&f, DocumentQuery::new().resource_ids([f.a.id, f.b.id])).await;
    assert_eq!(ids, vec![f.d1, f.d2]);
}

#[tokio::test]
async fn test_filters_combine_with_and() {
    let f = setup().await;

    let ids = listed_ids(
        &f,
        DocumentQuery::new()
            .resource_ids([f.a.id])
            .unit_ids([f.bag.id]),
    )
    .await;
    assert!(ids.is_empty());

    let ids = listed_ids(
        &f,
        DocumentQuery::new()
            .document_numbers(["D1", "D2"])
            .date_from(date(2024, 2, 1)),
    )
    .await;
    assert_eq!(ids, vec![f.d2]);
}

#[tokio::test]
async fn test_options_independent_of_filter() {
    let f = setup().await;

    let unfiltered = f.documents.list_documents(DocumentQuery::new()).await.unwrap();
    let filtered = f
        .documents
        .list_documents(DocumentQuery::new().document_numbers(["nothing"]))
        .await
        .unwrap();

    assert!(filtered.documents.is_empty());
    assert_eq!(filtered.options, unfiltered.options);
    assert_eq!(unfiltered.options.document_numbers, vec!["D1", "D2"]);

    let unit_names: Vec<_> = unfiltered.options.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(unit_names, vec!["bag", "kg"]);
}

#[tokio::test]
async fn test_archived_records_stay_in_filter_options() {
    let f = setup().await;
    f.resources.update(f.a.id, "Alpha", true).await.unwrap();

    let listing = f.warehouse.list_items(ItemQuery::new()).await.unwrap();
    assert_eq!(listing.resources.len(), 2);
    assert!(listing.resources[0].is_archived);
}

#[tokio::test]
async fn test_warehouse_filters_each_item() {
    let f = setup().await;

    let listing = f
        .warehouse
        .list_items(ItemQuery::new().unit_ids([f.kg.id]))
        .await
        .unwrap();

    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].document_number, "D1");
    assert_eq!(listing.items[0].resource_name, "Alpha");
}

#[tokio::test]
async fn test_deleted_document_leaves_warehouse() {
    let f = setup().await;

    f.receipts.delete(f.d1).await.unwrap();

    let listing = f.warehouse.list_items(ItemQuery::new()).await.unwrap();
    let numbers: Vec<_> = listing
        .items
        .iter()
        .map(|i| i.document_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["D2"]);

    f.resources.delete(f.a.id).await.unwrap();
}
