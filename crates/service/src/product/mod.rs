//! Product store: domain type, SeaORM adapter and fetch-or-fail service.

pub mod domain;
pub mod repo;
pub mod service;

pub use domain::Product;
pub use repo::seaorm::SeaOrmProductRepository;
pub use service::ProductService;
