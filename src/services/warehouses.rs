use crate::{db::DbPool, entities::warehouse, errors::ServiceError};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWarehouse {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateWarehouse {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}

/// Service for managing warehouses
#[derive(Clone)]
pub struct WarehouseService {
    db_pool: Arc<DbPool>,
}

impl WarehouseService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<warehouse::Model>, ServiceError> {
        Ok(warehouse::Entity::find()
            .order_by_asc(warehouse::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<warehouse::Model, ServiceError> {
        warehouse::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("warehouse {id}")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateWarehouse) -> Result<warehouse::Model, ServiceError> {
        let model = warehouse::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        info!(warehouse_id = model.id, "warehouse created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateWarehouse,
    ) -> Result<warehouse::Model, ServiceError> {
        let current = self.get(id).await?;
        let Some(name) = input.name else {
            return Ok(current);
        };
        let mut active: warehouse::ActiveModel = current.into();
        active.name = Set(name);
        Ok(active.update(&*self.db_pool).await?)
    }

    /// Deleting a warehouse removes its stacks and everything recorded against them.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = warehouse::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("warehouse {id}")));
        }
        info!(warehouse_id = id, "warehouse deleted");
        Ok(())
    }
}
