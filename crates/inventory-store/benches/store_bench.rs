use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use inventory_store::{
    DocumentQuery, InMemoryInventoryStore, InventoryStore, ItemQuery, NewReceiptDocument,
    NewReceiptItem, ReferenceKind, ResourceId, UnitId,
};
use rust_decimal::Decimal;

/// 200 documents spread over a year, 5 items each, across 20 resources and 4 units.
fn populated_store(rt: &tokio::runtime::Runtime) -> InMemoryInventoryStore {
    let store = InMemoryInventoryStore::new();

    rt.block_on(async {
        for r in 0..20 {
            store
                .insert_reference(ReferenceKind::Resource, &format!("Resource {r}"))
                .await
                .unwrap();
        }
        for u in 0..4 {
            store
                .insert_reference(ReferenceKind::Unit, &format!("Unit {u}"))
                .await
                .unwrap();
        }

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for d in 0..200i64 {
            let items = (0..5)
                .map(|i| NewReceiptItem {
                    resource_id: ResourceId::new((d + i) % 20 + 1),
                    unit_id: UnitId::new(i % 4 + 1),
                    quantity: Decimal::from(i + 1),
                })
                .collect();
            store
                .insert_document(NewReceiptDocument {
                    number: format!("R-{d:04}"),
                    date: start + chrono::Days::new((d as u64) * 365 / 200),
                    items,
                })
                .await
                .unwrap();
        }
    });

    store
}

fn bench_insert_document(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("inventory_store/insert_document_5_items", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryInventoryStore::new();
                store
                    .insert_reference(ReferenceKind::Resource, "Cement")
                    .await
                    .unwrap();
                store
                    .insert_reference(ReferenceKind::Unit, "kg")
                    .await
                    .unwrap();
                let items = (1..=5)
                    .map(|q| NewReceiptItem {
                        resource_id: ResourceId::new(1),
                        unit_id: UnitId::new(1),
                        quantity: Decimal::from(q),
                    })
                    .collect();
                store
                    .insert_document(NewReceiptDocument {
                        number: "R-1".to_string(),
                        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                        items,
                    })
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_query_documents_unfiltered(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = populated_store(&rt);

    c.bench_function("inventory_store/query_documents_all_200", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.query_documents(&DocumentQuery::new()).await.unwrap();
            });
        });
    });
}

fn bench_query_documents_filtered(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = populated_store(&rt);
    let query = DocumentQuery::new()
        .date_from(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .date_to(NaiveDate::from_ymd_opt(2024, 9, 30).unwrap())
        .resource_ids([ResourceId::new(3), ResourceId::new(7)])
        .unit_ids([UnitId::new(2)]);

    c.bench_function("inventory_store/query_documents_filtered", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.query_documents(&query).await.unwrap();
            });
        });
    });
}

fn bench_query_items(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = populated_store(&rt);
    let query = ItemQuery::new().resource_ids([ResourceId::new(5)]);

    c.bench_function("inventory_store/query_items_by_resource", |b| {
        b.iter(|| {
            rt.block_on(async {
                store.query_items(&query).await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_insert_document,
    bench_query_documents_unfiltered,
    bench_query_documents_filtered,
    bench_query_items,
);
criterion_main!(benches);
