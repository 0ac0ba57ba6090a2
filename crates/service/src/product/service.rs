use std::sync::Arc;

use tracing::{instrument, warn};

use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};
use crate::product::domain::Product;
use crate::repository::CrudRepository;

/// Caller-facing wrapper that turns absence into `NotFound`.
///
/// The store is handed in once at construction and shared by `Arc`.
pub struct ProductService<R: CrudRepository<Product>> {
    repo: Arc<R>,
}

impl<R: CrudRepository<Product>> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo) }
    }
}

impl<R: CrudRepository<Product>> ProductService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Fetch a product or fail with `NotFound`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::errors::ServiceError;
    /// use service::product::{Product, ProductService};
    /// use service::repository::memory::InMemoryRepository;
    ///
    /// let svc = ProductService::new(Arc::new(InMemoryRepository::<Product>::default()));
    /// let pen = tokio_test::block_on(svc.save(Product::new("Pen", 1.50))).unwrap();
    /// assert_eq!(pen.id, Some(1));
    /// assert_eq!(tokio_test::block_on(svc.get(1)).unwrap().name, "Pen");
    /// assert!(matches!(tokio_test::block_on(svc.get(2)), Err(ServiceError::NotFound(_))));
    /// ```
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Product, ServiceError> {
        match self.repo.find_by_id(id).await? {
            Some(p) => Ok(p),
            None => {
                warn!(id, "product not found");
                Err(ServiceError::not_found("product", id))
            }
        }
    }

    pub async fn find(&self, id: i64) -> Result<Option<Product>, ServiceError> { self.repo.find_by_id(id).await }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> { self.repo.find_all().await }

    pub async fn list_page(&self, page: Pagination) -> Result<Page<Product>, ServiceError> { self.repo.find_page(page).await }

    pub async fn save(&self, product: Product) -> Result<Product, ServiceError> { self.repo.save(product).await }

    /// Replace an existing product's attributes; fails if `id` is not stored.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: i64, changes: Product) -> Result<Product, ServiceError> {
        let current = self.get(id).await?;
        let next = Product { id: current.id, created_at: current.created_at, ..changes };
        self.repo.save(next).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> { self.repo.delete_by_id(id).await }

    pub async fn count(&self) -> Result<u64, ServiceError> { self.repo.count().await }
}
