use crate::{db::DbPool, entities::temperature, errors::ServiceError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, QuerySelect, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

const TEMPERATURE_SCALE: u32 = 2;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTemperature {
    pub brand_id: i32,
    pub stack_id: i32,
    #[serde(default)]
    pub max_temperature: Option<Decimal>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub picket: String,
    pub act_date: NaiveDate,
    #[serde(default)]
    pub shift: Option<i32>,
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTemperature {
    pub brand_id: Option<i32>,
    pub stack_id: Option<i32>,
    pub max_temperature: Option<Decimal>,
    #[validate(length(max = 200))]
    pub picket: Option<String>,
    pub act_date: Option<NaiveDate>,
    pub shift: Option<i32>,
}

/// Service for stack temperature readings
#[derive(Clone)]
pub struct TemperatureService {
    db_pool: Arc<DbPool>,
    list_limit: u64,
}

impl TemperatureService {
    pub fn new(db_pool: Arc<DbPool>, list_limit: u64) -> Self {
        Self {
            db_pool,
            list_limit,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<temperature::Model>, ServiceError> {
        Ok(temperature::Entity::find()
            .order_by_asc(temperature::Column::Id)
            .limit(self.list_limit)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<temperature::Model, ServiceError> {
        temperature::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("temperature {id}")))
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        input: CreateTemperature,
    ) -> Result<temperature::Model, ServiceError> {
        let model = temperature::ActiveModel {
            brand_id: Set(input.brand_id),
            stack_id: Set(input.stack_id),
            max_temperature: Set(input
                .max_temperature
                .map(|t| t.round_dp(TEMPERATURE_SCALE))),
            picket: Set(input.picket),
            act_date: Set(input.act_date),
            shift: Set(input.shift),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await
        .map_err(|e| ServiceError::from_write(e, "temperature"))?;
        info!(temperature_id = model.id, "temperature created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateTemperature,
    ) -> Result<temperature::Model, ServiceError> {
        let mut active: temperature::ActiveModel = self.get(id).await?.into();
        if let Some(brand_id) = input.brand_id {
            active.brand_id = Set(brand_id);
        }
        if let Some(stack_id) = input.stack_id {
            active.stack_id = Set(stack_id);
        }
        if let Some(value) = input.max_temperature {
            active.max_temperature = Set(Some(value.round_dp(TEMPERATURE_SCALE)));
        }
        if let Some(picket) = input.picket {
            active.picket = Set(picket);
        }
        if let Some(date) = input.act_date {
            active.act_date = Set(date);
        }
        if let Some(shift) = input.shift {
            active.shift = Set(Some(shift));
        }
        Ok(active
            .update(&*self.db_pool)
            .await
            .map_err(|e| ServiceError::from_write(e, "temperature"))?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = temperature::Entity::delete_by_id(id)
            .exec(&*self.db_pool)
            .await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("temperature {id}")));
        }
        Ok(())
    }
}
