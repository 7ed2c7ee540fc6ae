use crate::{db::DbPool, entities::brand, errors::ServiceError};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BrandInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Service for managing coal brands
#[derive(Clone)]
pub struct BrandService {
    db_pool: Arc<DbPool>,
}

impl BrandService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<brand::Model>, ServiceError> {
        Ok(brand::Entity::find()
            .order_by_asc(brand::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<brand::Model, ServiceError> {
        brand::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("brand {id}")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: BrandInput) -> Result<brand::Model, ServiceError> {
        let model = brand::ActiveModel {
            name: Set(input.name),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| ServiceError::from_write(e, "brand"))?;
        info!(brand_id = model.id, "brand created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, input: BrandInput) -> Result<brand::Model, ServiceError> {
        let mut active: brand::ActiveModel = self.get(id).await?.into();
        active.name = Set(input.name);
        Ok(active
            .update(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "brand"))?)
    }

    /// Deleting a brand removes its supplies, temperature and prediction rows.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = brand::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("brand {id}")));
        }
        info!(brand_id = id, "brand deleted");
        Ok(())
    }
}
