use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::{
    DocumentDetails, DocumentId, DocumentQuery, ItemDetails, ItemId, ItemQuery,
    NewReceiptDocument, NewReceiptItem, ReceiptDocument, ReceiptItem, ReferenceKind,
    ReferenceRecord, ResourceId, Result, StoreError, UnitId, store::InventoryStore,
};

const DOCUMENT: &str = "receipt document";

const ITEM_DETAILS_SELECT: &str = r#"
    SELECT i.id, i.document_id, d.number AS document_number, d.date AS document_date,
           i.resource_id, r.name AS resource_name, i.unit_id, u.name AS unit_name, i.quantity
    FROM receipt_items i
    JOIN receipt_documents d ON d.id = i.document_id
    JOIN resources r ON r.id = i.resource_id
    JOIN units u ON u.id = i.unit_id
"#;

/// PostgreSQL-backed inventory store implementation.
#[derive(Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    /// Creates a new PostgreSQL inventory store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool to `database_url`.
    #[tracing::instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self::new(pool))
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_reference(row: PgRow) -> Result<ReferenceRecord> {
        Ok(ReferenceRecord {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            is_archived: row.try_get("is_archived")?,
        })
    }

    fn row_to_item(row: PgRow) -> Result<ReceiptItem> {
        Ok(ReceiptItem {
            id: ItemId::new(row.try_get("id")?),
            document_id: DocumentId::new(row.try_get("document_id")?),
            resource_id: ResourceId::new(row.try_get("resource_id")?),
            unit_id: UnitId::new(row.try_get("unit_id")?),
            quantity: row.try_get("quantity")?,
        })
    }

    fn row_to_item_details(row: PgRow) -> Result<ItemDetails> {
        Ok(ItemDetails {
            id: ItemId::new(row.try_get("id")?),
            document_id: DocumentId::new(row.try_get("document_id")?),
            document_number: row.try_get("document_number")?,
            document_date: row.try_get("document_date")?,
            resource_id: ResourceId::new(row.try_get("resource_id")?),
            resource_name: row.try_get("resource_name")?,
            unit_id: UnitId::new(row.try_get("unit_id")?),
            unit_name: row.try_get("unit_name")?,
            quantity: row.try_get("quantity")?,
        })
    }

    async fn insert_items(
        tx: &mut Transaction<'_, Postgres>,
        document_id: i64,
        items: &[NewReceiptItem],
    ) -> Result<()> {
        for item in items {
            sqlx::query(
                r#"
                INSERT INTO receipt_items (document_id, resource_id, unit_id, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(document_id)
            .bind(item.resource_id.as_i64())
            .bind(item.unit_id.as_i64())
            .bind(item.quantity)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                // Foreign key violations name the missing reference
                let missing = match violated_constraint(&e) {
                    Some("receipt_items_resource_fk") => {
                        Some((ReferenceKind::Resource, item.resource_id.as_i64()))
                    }
                    Some("receipt_items_unit_fk") => {
                        Some((ReferenceKind::Unit, item.unit_id.as_i64()))
                    }
                    _ => None,
                };
                match missing {
                    Some((kind, id)) => StoreError::MissingReference { kind, id },
                    None => StoreError::Database(e),
                }
            })?;
        }
        Ok(())
    }

    async fn fetch_document(&self, id: DocumentId) -> Result<Option<ReceiptDocument>> {
        let row: Option<PgRow> =
            sqlx::query("SELECT id, number, date FROM receipt_documents WHERE id = $1")
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query(
            r#"
            SELECT id, document_id, resource_id, unit_id, quantity
            FROM receipt_items
            WHERE document_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(id.as_i64())
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(Self::row_to_item)
        .collect::<Result<Vec<_>>>()?;

        Ok(Some(ReceiptDocument {
            id,
            number: row.try_get("number")?,
            date: row.try_get("date")?,
            items,
        }))
    }

    async fn fetch_existing_document(&self, id: DocumentId) -> Result<ReceiptDocument> {
        self.fetch_document(id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: DOCUMENT,
                id: id.as_i64(),
            })
    }
}

fn violated_constraint(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}

fn unique_or_database(e: sqlx::Error, entity: &'static str, value: &str) -> StoreError {
    if is_unique_violation(&e) {
        StoreError::UniqueViolation {
            entity,
            value: value.to_string(),
        }
    } else {
        StoreError::Database(e)
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn list_references(
        &self,
        kind: ReferenceKind,
        include_archived: bool,
        must_include: &[i64],
    ) -> Result<Vec<ReferenceRecord>> {
        let sql = format!(
            r#"
            SELECT id, name, is_archived
            FROM {}
            WHERE $1 OR NOT is_archived OR id = ANY($2)
            ORDER BY LOWER(name) COLLATE "C" ASC, id ASC
            "#,
            kind.table()
        );

        let rows = sqlx::query(&sql)
            .bind(include_archived)
            .bind(must_include)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_reference).collect()
    }

    async fn get_reference(&self, kind: ReferenceKind, id: i64) -> Result<Option<ReferenceRecord>> {
        let sql = format!(
            "SELECT id, name, is_archived FROM {} WHERE id = $1",
            kind.table()
        );

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_reference).transpose()
    }

    async fn reference_name_taken(
        &self,
        kind: ReferenceKind,
        name: &str,
        exclude: Option<i64>,
    ) -> Result<bool> {
        let sql = format!(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM {}
                WHERE LOWER(name) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
            kind.table()
        );

        let taken: bool = sqlx::query_scalar(&sql)
            .bind(name)
            .bind(exclude)
            .fetch_one(&self.pool)
            .await?;
        Ok(taken)
    }

    async fn insert_reference(&self, kind: ReferenceKind, name: &str) -> Result<ReferenceRecord> {
        let sql = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name, is_archived",
            kind.table()
        );

        let row = sqlx::query(&sql)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_or_database(e, kind.label(), name))?;

        Self::row_to_reference(row)
    }

    async fn update_reference(
        &self,
        kind: ReferenceKind,
        record: &ReferenceRecord,
    ) -> Result<ReferenceRecord> {
        let sql = format!(
            r#"
            UPDATE {}
            SET name = $2, is_archived = $3
            WHERE id = $1
            RETURNING id, name, is_archived
            "#,
            kind.table()
        );

        let row = sqlx::query(&sql)
            .bind(record.id)
            .bind(&record.name)
            .bind(record.is_archived)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| unique_or_database(e, kind.label(), &record.name))?;

        match row {
            Some(row) => Self::row_to_reference(row),
            None => Err(StoreError::NotFound {
                entity: kind.label(),
                id: record.id,
            }),
        }
    }

    async fn reference_in_use(&self, kind: ReferenceKind, id: i64) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM receipt_items WHERE {} = $1)",
            kind.item_column()
        );

        let in_use: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(in_use)
    }

    async fn delete_reference(&self, kind: ReferenceKind, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                // ON DELETE RESTRICT from receipt_items
                if is_foreign_key_violation(&e) {
                    StoreError::InUse { kind, id }
                } else {
                    StoreError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: kind.label(),
                id,
            });
        }
        Ok(())
    }

    async fn document_number_taken(
        &self,
        number: &str,
        exclude: Option<DocumentId>,
    ) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM receipt_documents
                WHERE LOWER(number) = LOWER($1) AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(number)
        .bind(exclude.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    async fn insert_document(&self, document: NewReceiptDocument) -> Result<ReceiptDocument> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO receipt_documents (number, date) VALUES ($1, $2) RETURNING id",
        )
        .bind(&document.number)
        .bind(document.date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| unique_or_database(e, DOCUMENT, &document.number))?;

        Self::insert_items(&mut tx, id, &document.items).await?;

        tx.commit().await?;
        self.fetch_existing_document(DocumentId::new(id)).await
    }

    async fn replace_document(
        &self,
        id: DocumentId,
        document: NewReceiptDocument,
    ) -> Result<ReceiptDocument> {
        let mut tx = self.pool.begin().await?;

        let updated =
            sqlx::query("UPDATE receipt_documents SET number = $2, date = $3 WHERE id = $1")
                .bind(id.as_i64())
                .bind(&document.number)
                .bind(document.date)
                .execute(&mut *tx)
                .await
                .map_err(|e| unique_or_database(e, DOCUMENT, &document.number))?;

        // Deleted concurrently; dropping the transaction rolls back
        if updated.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: DOCUMENT,
                id: id.as_i64(),
            });
        }

        sqlx::query("DELETE FROM receipt_items WHERE document_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        Self::insert_items(&mut tx, id.as_i64(), &document.items).await?;

        tx.commit().await?;
        self.fetch_existing_document(id).await
    }

    async fn delete_document(&self, id: DocumentId) -> Result<()> {
        let result = sqlx::query("DELETE FROM receipt_documents WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: DOCUMENT,
                id: id.as_i64(),
            });
        }
        Ok(())
    }

    async fn get_document(&self, id: DocumentId) -> Result<Option<ReceiptDocument>> {
        self.fetch_document(id).await
    }

    async fn query_documents(&self, query: &DocumentQuery) -> Result<Vec<DocumentDetails>> {
        let mut sql =
            String::from("SELECT d.id, d.number, d.date FROM receipt_documents d WHERE 1=1");
        let mut param_count = 0;

        // Build dynamic query
        if query.date_from.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND d.date >= ${param_count}"));
        }
        if query.date_to.is_some() {
            param_count += 1;
            sql.push_str(&format!(" AND d.date <= ${param_count}"));
        }
        if !query.resource_ids.is_empty() {
            param_count += 1;
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM receipt_items i \
                 WHERE i.document_id = d.id AND i.resource_id = ANY(${param_count}))"
            ));
        }
        if !query.unit_ids.is_empty() {
            param_count += 1;
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM receipt_items i \
                 WHERE i.document_id = d.id AND i.unit_id = ANY(${param_count}))"
            ));
        }
        if !query.document_numbers.is_empty() {
            param_count += 1;
            sql.push_str(&format!(" AND d.number = ANY(${param_count})"));
        }

        sql.push_str(" ORDER BY d.id ASC");

        // Bind in the same order the placeholders were numbered
        let mut sqlx_query = sqlx::query(&sql);

        if let Some(from) = query.date_from {
            sqlx_query = sqlx_query.bind(from);
        }
        if let Some(to) = query.date_to {
            sqlx_query = sqlx_query.bind(to);
        }
        if !query.resource_ids.is_empty() {
            let ids: Vec<i64> = query.resource_ids.iter().map(|id| id.as_i64()).collect();
            sqlx_query = sqlx_query.bind(ids);
        }
        if !query.unit_ids.is_empty() {
            let ids: Vec<i64> = query.unit_ids.iter().map(|id| id.as_i64()).collect();
            sqlx_query = sqlx_query.bind(ids);
        }
        if !query.document_numbers.is_empty() {
            sqlx_query = sqlx_query.bind(query.document_numbers.clone());
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::with_capacity(rows.len());
        for row in rows {
            documents.push(DocumentDetails {
                id: DocumentId::new(row.try_get("id")?),
                number: row.try_get("number")?,
                date: row.try_get("date")?,
                items: Vec::new(),
            });
        }

        // Eager-load the items of every matched document in one round trip
        let ids: Vec<i64> = documents.iter().map(|d| d.id.as_i64()).collect();
        let item_rows = sqlx::query(&format!(
            "{ITEM_DETAILS_SELECT} WHERE i.document_id = ANY($1) ORDER BY i.id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_document: HashMap<DocumentId, Vec<ItemDetails>> = HashMap::new();
        for row in item_rows {
            let item = Self::row_to_item_details(row)?;
            by_document.entry(item.document_id).or_default().push(item);
        }
        for document in &mut documents {
            document.items = by_document.remove(&document.id).unwrap_or_default();
        }

        Ok(documents)
    }

    async fn query_items(&self, query: &ItemQuery) -> Result<Vec<ItemDetails>> {
        let mut sql = format!("{ITEM_DETAILS_SELECT} WHERE 1=1");
        let mut param_count = 0;

        if !query.resource_ids.is_empty() {
            param_count += 1;
            sql.push_str(&format!(" AND i.resource_id = ANY(${param_count})"));
        }
        if !query.unit_ids.is_empty() {
            param_count += 1;
            sql.push_str(&format!(" AND i.unit_id = ANY(${param_count})"));
        }

        sql.push_str(" ORDER BY i.id ASC");

        let mut sqlx_query = sqlx::query(&sql);

        if !query.resource_ids.is_empty() {
            let ids: Vec<i64> = query.resource_ids.iter().map(|id| id.as_i64()).collect();
            sqlx_query = sqlx_query.bind(ids);
        }
        if !query.unit_ids.is_empty() {
            let ids: Vec<i64> = query.unit_ids.iter().map(|id| id.as_i64()).collect();
            sqlx_query = sqlx_query.bind(ids);
        }

        let rows = sqlx_query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_item_details).collect()
    }

    async fn document_numbers(&self) -> Result<Vec<String>> {
        let numbers: Vec<String> = sqlx::query_scalar(
            r#"SELECT DISTINCT number FROM receipt_documents ORDER BY number COLLATE "C" ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(numbers)
    }
}
