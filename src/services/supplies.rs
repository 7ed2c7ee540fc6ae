use crate::{db::DbPool, entities::supplies, errors::ServiceError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

const WEIGHT_SCALE: u32 = 4;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSupplies {
    pub brand_id: i32,
    pub stack_id: i32,
    pub warehouse_date: NaiveDate,
    #[serde(default)]
    pub warehouse_weight: Option<Decimal>,
    #[serde(default)]
    pub ship_date: Option<NaiveDate>,
    #[serde(default)]
    pub ship_weight: Option<Decimal>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSupplies {
    pub brand_id: Option<i32>,
    pub stack_id: Option<i32>,
    pub warehouse_date: Option<NaiveDate>,
    pub warehouse_weight: Option<Decimal>,
    pub ship_date: Option<NaiveDate>,
    pub ship_weight: Option<Decimal>,
}

fn weight(value: Decimal) -> Decimal {
    value.round_dp(WEIGHT_SCALE)
}

/// Service for delivery and shipment records
#[derive(Clone)]
pub struct SuppliesService {
    db_pool: Arc<DbPool>,
    list_limit: u64,
}

impl SuppliesService {
    pub fn new(db_pool: Arc<DbPool>, list_limit: u64) -> Self {
        Self {
            db_pool,
            list_limit,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<supplies::Model>, ServiceError> {
        Ok(supplies::Entity::find()
            .order_by_asc(supplies::Column::Id)
            .limit(self.list_limit)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<supplies::Model, ServiceError> {
        supplies::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("supplies {id}")))
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateSupplies) -> Result<supplies::Model, ServiceError> {
        let model = supplies::ActiveModel {
            brand_id: Set(input.brand_id),
            stack_id: Set(input.stack_id),
            warehouse_date: Set(input.warehouse_date),
            warehouse_weight: Set(input.warehouse_weight.map(weight)),
            ship_date: Set(input.ship_date),
            ship_weight: Set(input.ship_weight.map(weight)),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| ServiceError::from_write(e, "supplies"))?;
        info!(supplies_id = model.id, "supplies created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateSupplies,
    ) -> Result<supplies::Model, ServiceError> {
        let mut active: supplies::ActiveModel = self.get(id).await?.into();
        if let Some(brand_id) = input.brand_id {
            active.brand_id = Set(brand_id);
        }
        if let Some(stack_id) = input.stack_id {
            active.stack_id = Set(stack_id);
        }
        if let Some(date) = input.warehouse_date {
            active.warehouse_date = Set(date);
        }
        if let Some(value) = input.warehouse_weight {
            active.warehouse_weight = Set(Some(weight(value)));
        }
        if let Some(date) = input.ship_date {
            active.ship_date = Set(Some(date));
        }
        if let Some(value) = input.ship_weight {
            active.ship_weight = Set(Some(weight(value)));
        }
        Ok(active
            .update(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "supplies"))?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = supplies::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("supplies {id}")));
        }
        Ok(())
    }
}
