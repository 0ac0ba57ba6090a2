use chrono::Utc;
use sea_orm::{
    entity::prelude::*, ActiveValue, ConnectionTrait, DbBackend, PaginatorTrait, QueryOrder, Set, Statement,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const NAME_MAX_LEN: usize = 255;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Caller-controlled columns; id and timestamps are owned by the table.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

pub fn validate_name(name: &str) -> Result<String, ModelError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(trimmed.to_string())
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ModelError::Validation("price must be a finite, non-negative number".into()));
    }
    Ok(())
}

pub fn validate_quantity(quantity: i32) -> Result<(), ModelError> {
    if quantity < 0 {
        return Err(ModelError::Validation("quantity must be >= 0".into()));
    }
    Ok(())
}

impl ProductFields {
    /// Validated copy with the name trimmed.
    pub fn validated(&self) -> Result<ProductFields, ModelError> {
        let name = validate_name(&self.name)?;
        validate_price(self.price)?;
        validate_quantity(self.quantity)?;
        Ok(ProductFields { name, description: self.description.clone(), price: self.price, quantity: self.quantity })
    }
}

/// Insert a row. `id = None` lets the table assign the key.
pub async fn insert<C: ConnectionTrait>(db: &C, id: Option<i64>, fields: &ProductFields) -> Result<Model, ModelError> {
    let f = fields.validated()?;
    let now: DateTimeWithTimeZone = Utc::now().into();
    let am = ActiveModel {
        id: match id {
            Some(k) => Set(k),
            None => ActiveValue::NotSet,
        },
        name: Set(f.name),
        description: Set(f.description),
        price: Set(f.price),
        quantity: Set(f.quantity),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

/// Overwrite every caller-controlled column of an existing row; `created_at` is kept.
pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: &ProductFields) -> Result<Model, ModelError> {
    let f = fields.validated()?;
    let mut am: ActiveModel = existing.into();
    am.name = Set(f.name);
    am.description = Set(f.description);
    am.price = Set(f.price);
    am.quantity = Set(f.quantity);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

pub async fn find<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// All rows, ascending by id.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn list_by_ids<C: ConnectionTrait>(db: &C, ids: &[i64]) -> Result<Vec<Model>, ModelError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Ok(Entity::find()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .order_by_asc(Column::Id)
        .all(db)
        .await?)
}

/// One page ordered by id plus the total row count. `page_idx` is 0-based.
pub async fn page<C: ConnectionTrait>(db: &C, page_idx: u64, per_page: u64) -> Result<(Vec<Model>, u64), ModelError> {
    let paginator = Entity::find().order_by_asc(Column::Id).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page_idx).await?;
    Ok((rows, total))
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    Ok(Entity::find().count(db).await?)
}

/// Returns whether a row was removed.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    let res = Entity::delete_many().exec(db).await?;
    Ok(res.rows_affected)
}

/// Advance the Postgres `bigserial` sequence past the largest key.
///
/// Rows inserted under an explicit id do not move the sequence. The new
/// value never drops below `last_value`, so a key `nextval` has already
/// handed out is never reissued.
/// SQLite `AUTOINCREMENT` already tracks the maximum, so this is a no-op there.
pub async fn sync_id_sequence<C: ConnectionTrait>(db: &C) -> Result<(), ModelError> {
    if db.get_database_backend() != DbBackend::Postgres {
        return Ok(());
    }
    let sql = "SELECT setval('product_id_seq', \
               GREATEST((SELECT MAX(id) FROM product), (SELECT last_value FROM product_id_seq)))";
    db.execute(Statement::from_string(DbBackend::Postgres, sql.to_owned())).await?;
    Ok(())
}
