//! Product persistence layer.
//! - `repository` defines the generic CRUD contract and an in-memory adapter.
//! - `product` binds it to the `product` table through SeaORM.
//! - `runtime` wires config, schema and store together at process start.

pub mod errors;
pub mod pagination;
pub mod repository;
pub mod product;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
