#![cfg(test)]
use models::db::{prepare, DatabaseConfig};

use crate::errors::ServiceError;
use crate::product::SeaOrmProductRepository;

/// Repository over a fresh, migrated in-memory SQLite database.
pub async fn sqlite_repo() -> Result<SeaOrmProductRepository, ServiceError> {
    let db = prepare(&DatabaseConfig::in_memory_sqlite())
        .await
        .map_err(|e| ServiceError::StorageFailure(e.to_string()))?;
    Ok(SeaOrmProductRepository::new(db))
}

/// Behaviour every `CrudRepository<Product>` adapter must share.
pub mod contract {
    use std::future::Future;

    use crate::errors::ServiceError;
    use crate::pagination::Pagination;
    use crate::product::Product;
    use crate::repository::CrudRepository;

    type Res = Result<(), ServiceError>;

    /// Run each scenario against a fresh repository from `make`.
    pub async fn run_all<R, F, Fut>(make: F) -> Res
    where
        R: CrudRepository<Product>,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<R, ServiceError>>,
    {
        pen_lifecycle(&make().await?).await?;
        keyless_saves_get_distinct_ids(&make().await?).await?;
        keyed_save_updates_in_place(&make().await?).await?;
        delete_is_idempotent(&make().await?).await?;
        find_all_matches_live_set(&make().await?).await?;
        caller_assigned_key_does_not_collide(&make().await?).await?;
        save_all_is_all_or_nothing(&make().await?).await?;
        paging_follows_key_order(&make().await?).await?;
        invalid_entity_is_rejected(&make().await?).await?;
        delete_all_empties_the_store(&make().await?).await?;
        Ok(())
    }

    pub async fn pen_lifecycle<R: CrudRepository<Product>>(repo: &R) -> Res {
        let saved = repo.save(Product::new("Pen", 1.50)).await?;
        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.name, "Pen");
        assert_eq!(saved.price, 1.50);

        assert_eq!(repo.find_by_id(1).await?, Some(saved));
        repo.delete_by_id(1).await?;
        assert_eq!(repo.find_by_id(1).await?, None);
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }

    pub async fn keyless_saves_get_distinct_ids<R: CrudRepository<Product>>(repo: &R) -> Res {
        let a = repo.save(Product::new("Pen", 1.0)).await?;
        let b = repo.save(Product::new("Pen", 1.0)).await?;
        assert!(a.id.is_some() && b.id.is_some());
        assert_ne!(a.id, b.id);
        assert_eq!(repo.find_all().await?.len(), 2);
        assert_eq!(repo.count().await?, 2);
        Ok(())
    }

    pub async fn keyed_save_updates_in_place<R: CrudRepository<Product>>(repo: &R) -> Res {
        let saved = repo.save(Product::new("Pen", 1.0)).await?;
        repo.save(Product::new("Ink", 3.0)).await?;
        let id = saved.id.unwrap();

        let changed = Product { name: "Gel Pen".into(), price: 2.25, quantity: 7, ..saved };
        let updated = repo.save(changed).await?;
        assert_eq!(updated.id, Some(id));

        let found = repo.find_by_id(id).await?.unwrap();
        assert_eq!(found, updated);
        assert_eq!(found.name, "Gel Pen");
        assert_eq!(found.price, 2.25);
        assert_eq!(found.quantity, 7);
        assert_eq!(repo.count().await?, 2);
        Ok(())
    }

    pub async fn delete_is_idempotent<R: CrudRepository<Product>>(repo: &R) -> Res {
        repo.delete_by_id(999).await?;
        let saved = repo.save(Product::new("Pen", 1.0)).await?;
        let id = saved.id.unwrap();
        repo.delete_by_id(id).await?;
        repo.delete_by_id(id).await?;
        assert!(!repo.exists_by_id(id).await?);
        assert_eq!(repo.count().await?, 0);
        Ok(())
    }

    pub async fn find_all_matches_live_set<R: CrudRepository<Product>>(repo: &R) -> Res {
        let mut kept = Vec::new();
        for (i, name) in ["A", "B", "C", "D"].into_iter().enumerate() {
            let p = repo.save(Product::new(name, i as f64)).await?;
            if i % 2 == 0 {
                kept.push(p);
            } else {
                repo.delete_by_id(p.id.unwrap()).await?;
            }
        }
        assert_eq!(repo.find_all().await?, kept);
        // restartable: a second read sees the same state
        assert_eq!(repo.find_all().await?, kept);

        let ids: Vec<i64> = kept.iter().filter_map(|p| p.id).collect();
        let by_id = repo.find_all_by_id(&[ids[1], 12345, ids[0]]).await?;
        assert_eq!(by_id, kept);
        Ok(())
    }

    pub async fn caller_assigned_key_does_not_collide<R: CrudRepository<Product>>(repo: &R) -> Res {
        let placed = repo.save(Product::new("Ruler", 2.0).with_id(50)).await?;
        assert_eq!(placed.id, Some(50));
        assert!(repo.exists_by_id(50).await?);

        let next = repo.save(Product::new("Eraser", 0.5)).await?;
        assert!(next.id.unwrap() > 50);
        assert_eq!(repo.find_by_id(50).await?.unwrap().name, "Ruler");
        Ok(())
    }

    pub async fn save_all_is_all_or_nothing<R: CrudRepository<Product>>(repo: &R) -> Res {
        let batch = vec![Product::new("A", 1.0), Product::new("B", 2.0)];
        let saved = repo.save_all(batch).await?;
        assert_eq!(saved.len(), 2);
        assert_ne!(saved[0].id, saved[1].id);

        let bad = vec![Product::new("C", 3.0), Product::new("", 4.0)];
        let err = repo.save_all(bad).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(repo.count().await?, 2);
        Ok(())
    }

    pub async fn paging_follows_key_order<R: CrudRepository<Product>>(repo: &R) -> Res {
        for i in 0..5 {
            repo.save(Product::new(format!("P{i}"), i as f64)).await?;
        }
        let page = repo.find_page(Pagination::new(2, 2)).await?;
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.items.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(), vec!["P2", "P3"]);

        let past_end = repo.find_page(Pagination::new(9, 2)).await?;
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
        Ok(())
    }

    pub async fn invalid_entity_is_rejected<R: CrudRepository<Product>>(repo: &R) -> Res {
        let err = repo.save(Product::new("Pen", f64::INFINITY)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = repo.save(Product::new("Pen", 1.0).with_quantity(-3)).await.unwrap_err();
        assert_eq!(err.code(), 1001);
        assert_eq!(repo.count().await?, 0);
        Ok(())
    }

    pub async fn delete_all_empties_the_store<R: CrudRepository<Product>>(repo: &R) -> Res {
        let seeded = repo
            .save_all(vec![Product::new("A", 1.0), Product::new("B", 2.0), Product::new("C", 3.0)])
            .await?;
        let top = seeded.iter().filter_map(|p| p.id).max().unwrap();

        assert_eq!(repo.delete_all().await?, 3);
        assert_eq!(repo.count().await?, 0);
        assert!(repo.find_all().await?.is_empty());
        assert_eq!(repo.delete_all().await?, 0);

        // keys are never handed out twice, even after a wipe
        let fresh = repo.save(Product::new("D", 4.0)).await?;
        assert!(fresh.id.unwrap() > top);
        assert_eq!(repo.count().await?, 1);
        Ok(())
    }
}
