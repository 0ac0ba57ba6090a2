use async_trait::async_trait;
use models::product;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};
use crate::product::domain::Product;
use crate::repository::CrudRepository;

/// SeaORM-backed repository over the `product` table.
#[derive(Clone)]
pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Insert-or-update on any connection, including an open transaction.
async fn save_on<C: ConnectionTrait>(conn: &C, p: Product) -> Result<Product, ServiceError> {
    let fields = p.fields();
    let row = match p.id {
        None => product::insert(conn, None, &fields).await?,
        Some(id) => match product::find(conn, id).await? {
            Some(existing) => product::update(conn, existing, &fields).await?,
            None => {
                let row = product::insert(conn, Some(id), &fields).await?;
                product::sync_id_sequence(conn).await?;
                row
            }
        },
    };
    Ok(row.into())
}

#[async_trait]
impl CrudRepository<Product> for SeaOrmProductRepository {
    #[instrument(skip(self, entity), fields(id = ?entity.id))]
    async fn save(&self, entity: Product) -> Result<Product, ServiceError> {
        let saved = if entity.id.is_none() {
            // single INSERT, atomic on its own
            save_on(&self.db, entity).await?
        } else {
            self.db
                .transaction::<_, Product, ServiceError>(|txn| Box::pin(async move { save_on(txn, entity).await }))
                .await?
        };
        info!(id = ?saved.id, name = %saved.name, "saved product");
        Ok(saved)
    }

    #[instrument(skip(self, entities), fields(count = entities.len()))]
    async fn save_all(&self, entities: Vec<Product>) -> Result<Vec<Product>, ServiceError> {
        let saved = self
            .db
            .transaction::<_, Vec<Product>, ServiceError>(|txn| {
                Box::pin(async move {
                    let mut saved = Vec::with_capacity(entities.len());
                    for p in entities {
                        saved.push(save_on(txn, p).await?);
                    }
                    Ok(saved)
                })
            })
            .await?;
        info!(count = saved.len(), "saved product batch");
        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        let rows = product::list(&self.db).await?;
        debug!(count = rows.len(), "listed products");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn find_all_by_id(&self, ids: &[i64]) -> Result<Vec<Product>, ServiceError> {
        let rows = product::list_by_ids(&self.db, ids).await?;
        debug!(found = rows.len(), "listed products by id");
        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, ServiceError> {
        let row = product::find(&self.db, id).await?;
        debug!(found = row.is_some(), "looked up product");
        Ok(row.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn find_page(&self, page: Pagination) -> Result<Page<Product>, ServiceError> {
        let (idx, per_page) = page.normalize();
        let (rows, total) = product::page(&self.db, idx, per_page).await?;
        debug!(total, returned = rows.len(), "paged products");
        Ok(Page::new(rows, total, page).map(Product::from))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(product::count(&self.db).await?)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        if product::delete(&self.db, id).await? {
            info!(id, "deleted product");
        } else {
            debug!(id, "delete of missing product ignored");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, ServiceError> {
        let removed = product::delete_all(&self.db).await?;
        info!(removed, "deleted all products");
        Ok(removed)
    }
}
