use crate::{
    db::DbPool,
    entities::{stack, warehouse},
    errors::ServiceError,
    import::IdentityResolver,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

/// Stack joined with the name of its warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct StackView {
    pub id: i32,
    pub name: String,
    pub warehouse_id: i32,
    pub warehouse_name: String,
}

/// Stacks are addressed by warehouse name, not id.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StackInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub warehouse: String,
}

/// Service for managing stacks
#[derive(Clone)]
pub struct StackService {
    db_pool: Arc<DbPool>,
}

impl StackService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn view_query() -> Select<stack::Entity> {
        stack::Entity::find()
            .select_only()
            .column(stack::Column::Id)
            .column(stack::Column::Name)
            .column(stack::Column::WarehouseId)
            .column_as(warehouse::Column::Name, "warehouse_name")
            .join(JoinType::InnerJoin, stack::Relation::Warehouse.def())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<StackView>, ServiceError> {
        Ok(Self::view_query()
            .order_by_asc(stack::Column::Id)
            .into_model::<StackView>()
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<StackView, ServiceError> {
        Self::view_query()
            .filter(stack::Column::Id.eq(id))
            .into_model::<StackView>()
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("stack {id}")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: StackInput) -> Result<StackView, ServiceError> {
        let warehouse_id = self.warehouse_id(&input.warehouse).await?;
        let model = stack::ActiveModel {
            name: Set(input.name),
            warehouse_id: Set(warehouse_id),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| ServiceError::from_write(e, "stack"))?;
        info!(stack_id = model.id, warehouse_id, "stack created");
        self.get(model.id).await
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: StackInput) -> Result<StackView, ServiceError> {
        let current = stack::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("stack {id}")))?;
        let warehouse_id = self.warehouse_id(&input.warehouse).await?;

        let mut active: stack::ActiveModel = current.into();
        active.name = Set(input.name);
        active.warehouse_id = Set(warehouse_id);
        active
            .update(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "stack"))?;
        self.get(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = stack::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("stack {id}")));
        }
        info!(stack_id = id, "stack deleted");
        Ok(())
    }

    /// Same exact-match rule as uploads: unknown or duplicated names are a 400.
    async fn warehouse_id(&self, name: &str) -> Result<i32, ServiceError> {
        Ok(IdentityResolver::new()
            .warehouse_id(&*self.db_pool, name)
            .await?)
    }
}
