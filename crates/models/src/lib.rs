//! SeaORM entity definitions and database connection helpers.

pub mod errors;
pub mod db;
pub mod product;

#[cfg(test)]
mod tests;
