use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, RelationTrait, Select,
};
use std::collections::HashMap;
use tracing::trace;

use super::error::{ImportError, UnresolvedReference};
use crate::entities::{brand, stack, warehouse};

/// Maps the human-readable names in an upload onto surrogate ids.
///
/// Lookups are exact byte-for-byte matches. Results are memoized for the
/// lifetime of one import, so repeated names cost a single query.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    brands: HashMap<String, i32>,
    warehouses: HashMap<String, i32>,
    stacks: HashMap<(String, String), i32>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn brand_id<C>(&mut self, conn: &C, name: &str) -> Result<i32, ImportError>
    where
        C: ConnectionTrait,
    {
        if let Some(id) = self.brands.get(name) {
            return Ok(*id);
        }
        let query = brand::Entity::find()
            .select_only()
            .column(brand::Column::Id)
            .filter(brand::Column::Name.eq(name));
        let id = single_id(query, conn, || UnresolvedReference::Brand(name.to_owned())).await?;
        self.brands.insert(name.to_owned(), id);
        Ok(id)
    }

    pub async fn warehouse_id<C>(&mut self, conn: &C, name: &str) -> Result<i32, ImportError>
    where
        C: ConnectionTrait,
    {
        if let Some(id) = self.warehouses.get(name) {
            return Ok(*id);
        }
        let query = warehouse::Entity::find()
            .select_only()
            .column(warehouse::Column::Id)
            .filter(warehouse::Column::Name.eq(name));
        let id =
            single_id(query, conn, || UnresolvedReference::Warehouse(name.to_owned())).await?;
        self.warehouses.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Stack lookup is always scoped to the warehouse named in the same row.
    pub async fn stack_id<C>(
        &mut self,
        conn: &C,
        warehouse_name: &str,
        stack_name: &str,
    ) -> Result<i32, ImportError>
    where
        C: ConnectionTrait,
    {
        let key = (warehouse_name.to_owned(), stack_name.to_owned());
        if let Some(id) = self.stacks.get(&key) {
            return Ok(*id);
        }
        let query = stack::Entity::find()
            .select_only()
            .column(stack::Column::Id)
            .join(
                sea_orm::JoinType::InnerJoin,
                stack::Relation::Warehouse.def(),
            )
            .filter(stack::Column::Name.eq(stack_name))
            .filter(warehouse::Column::Name.eq(warehouse_name));
        let id = single_id(query, conn, || UnresolvedReference::Stack {
            warehouse: warehouse_name.to_owned(),
            stack: stack_name.to_owned(),
        })
        .await?;
        self.stacks.insert(key, id);
        Ok(id)
    }

    /// Resolves a measurement row's references, brand first.
    pub async fn brand_and_stack<C>(
        &mut self,
        conn: &C,
        brand_name: &str,
        warehouse_name: &str,
        stack_name: &str,
    ) -> Result<(i32, i32), ImportError>
    where
        C: ConnectionTrait,
    {
        let brand_id = self.brand_id(conn, brand_name).await?;
        let stack_id = self.stack_id(conn, warehouse_name, stack_name).await?;
        Ok((brand_id, stack_id))
    }
}

async fn single_id<E, C, F>(query: Select<E>, conn: &C, reference: F) -> Result<i32, ImportError>
where
    E: EntityTrait,
    C: ConnectionTrait,
    F: FnOnce() -> UnresolvedReference,
{
    let ids: Vec<i32> = query.limit(2).into_tuple().all(conn).await?;
    match ids.as_slice() {
        [id] => Ok(*id),
        [] => Err(ImportError::ReferenceNotFound(reference())),
        _ => {
            let reference = reference();
            trace!(%reference, "lookup matched several rows");
            Err(ImportError::AmbiguousReference(reference))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;
    use assert_matches::assert_matches;
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

    async fn seeded() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        for name in ["W1", "W2"] {
            warehouse::ActiveModel {
                name: Set(name.to_owned()),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
        }
        for warehouse_id in [1, 2] {
            stack::ActiveModel {
                name: Set("5".to_owned()),
                warehouse_id: Set(warehouse_id),
                ..Default::default()
            }
            .insert(&db)
            .await
            .unwrap();
        }
        brand::ActiveModel {
            name: Set("A-1".to_owned()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn stack_is_scoped_to_its_warehouse() {
        let db = seeded().await;
        let mut resolver = IdentityResolver::new();
        assert_eq!(resolver.stack_id(&db, "W2", "5").await.unwrap(), 2);
        assert_eq!(resolver.stack_id(&db, "W1", "5").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn lookups_are_case_sensitive() {
        let db = seeded().await;
        let mut resolver = IdentityResolver::new();
        assert_matches!(
            resolver.brand_id(&db, "a-1").await,
            Err(ImportError::ReferenceNotFound(UnresolvedReference::Brand(name))) if name == "a-1"
        );
        assert_matches!(
            resolver.brand_id(&db, "A-1 ").await,
            Err(ImportError::ReferenceNotFound(_))
        );
        assert_eq!(resolver.brand_id(&db, "A-1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_stack_names_the_pair() {
        let db = seeded().await;
        let mut resolver = IdentityResolver::new();
        let err = resolver
            .brand_and_stack(&db, "A-1", "W3", "5")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "stack '5' in warehouse 'W3' not found");
    }

    #[tokio::test]
    async fn duplicate_warehouse_names_are_ambiguous() {
        let db = seeded().await;
        warehouse::ActiveModel {
            name: Set("W1".to_owned()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let mut resolver = IdentityResolver::new();
        assert_matches!(
            resolver.warehouse_id(&db, "W1").await,
            Err(ImportError::AmbiguousReference(_))
        );
    }

    #[tokio::test]
    async fn memo_answers_repeat_lookups() {
        let db = seeded().await;
        let mut resolver = IdentityResolver::new();
        resolver.brand_and_stack(&db, "A-1", "W2", "5").await.unwrap();
        assert_eq!(resolver.brands.get("A-1"), Some(&1));
        assert_eq!(
            resolver.stacks.get(&("W2".to_owned(), "5".to_owned())),
            Some(&2)
        );
        assert!(resolver.warehouses.is_empty());
    }
}
