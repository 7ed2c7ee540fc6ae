use crate::{
    db::DbPool,
    entities::{brand, current_predict, predict, stack, warehouse},
    errors::ServiceError,
};
use chrono::{Months, NaiveDate};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Prediction row with the names the dashboard shows next to it.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult, ToSchema)]
pub struct PredictionView {
    pub id: i32,
    pub date: NaiveDate,
    pub weight: Option<f64>,
    pub stack_id: i32,
    pub stack_name: String,
    pub warehouse_name: String,
    pub brand_name: String,
}

/// Half-open `[start, end)` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn month(year: i32, month: u32) -> Result<Self, ServiceError> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            ServiceError::BadRequest(format!("invalid month {year}-{month:02}"))
        })?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or_else(|| ServiceError::BadRequest(format!("month {year}-{month:02} is out of range")))?;
        Ok(Self { start, end })
    }

    pub fn day(year: i32, month: u32, day: u32) -> Result<Self, ServiceError> {
        let start = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ServiceError::BadRequest(format!("invalid date {year}-{month:02}-{day:02}"))
        })?;
        let end = start
            .succ_opt()
            .ok_or_else(|| ServiceError::BadRequest(format!("date {start} is out of range")))?;
        Ok(Self { start, end })
    }
}

/// Read side of the forecast tables. Rows arrive through uploads only.
#[derive(Clone)]
pub struct PredictionService {
    db_pool: Arc<DbPool>,
}

impl PredictionService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn enriched() -> Select<predict::Entity> {
        predict::Entity::find()
            .select_only()
            .column(predict::Column::Id)
            .column(predict::Column::Date)
            .column(predict::Column::Weight)
            .column(predict::Column::StackId)
            .column_as(stack::Column::Name, "stack_name")
            .column_as(warehouse::Column::Name, "warehouse_name")
            .column_as(brand::Column::Name, "brand_name")
            .join(JoinType::InnerJoin, predict::Relation::Stack.def())
            .join(JoinType::InnerJoin, stack::Relation::Warehouse.def())
            .join(JoinType::InnerJoin, predict::Relation::Brand.def())
            .order_by_asc(predict::Column::Date)
            .order_by_asc(predict::Column::Id)
    }

    fn within(query: Select<predict::Entity>, range: DateRange) -> Select<predict::Entity> {
        query
            .filter(predict::Column::Date.gte(range.start))
            .filter(predict::Column::Date.lt(range.end))
    }

    #[instrument(skip(self))]
    pub async fn in_range(&self, range: DateRange) -> Result<Vec<PredictionView>, ServiceError> {
        Ok(Self::within(Self::enriched(), range)
            .into_model::<PredictionView>()
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn for_stack_in_range(
        &self,
        stack_id: i32,
        range: DateRange,
    ) -> Result<Vec<PredictionView>, ServiceError> {
        Ok(Self::within(Self::enriched(), range)
            .filter(predict::Column::StackId.eq(stack_id))
            .into_model::<PredictionView>()
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn for_stack(&self, stack_id: i32) -> Result<Vec<predict::Model>, ServiceError> {
        Ok(predict::Entity::find()
            .filter(predict::Column::StackId.eq(stack_id))
            .order_by_asc(predict::Column::Date)
            .order_by_asc(predict::Column::Id)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<Vec<current_predict::Model>, ServiceError> {
        Ok(current_predict::Entity::find()
            .order_by_asc(current_predict::Column::StackId)
            .order_by_asc(current_predict::Column::Date)
            .all(&*self.db_pool)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn current_for_stack(
        &self,
        stack_id: i32,
    ) -> Result<Vec<current_predict::Model>, ServiceError> {
        Ok(current_predict::Entity::find()
            .filter(current_predict::Column::StackId.eq(stack_id))
            .order_by_asc(current_predict::Column::Date)
            .all(&*self.db_pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_range_is_half_open() {
        let range = DateRange::month(2024, 12).unwrap();
        assert_eq!(range.start, date(2024, 12, 1));
        assert_eq!(range.end, date(2025, 1, 1));
    }

    #[test]
    fn day_range_spans_one_day() {
        let range = DateRange::day(2024, 2, 29).unwrap();
        assert_eq!(range.end, date(2024, 3, 1));
    }

    #[test]
    fn impossible_calendar_values_are_rejected() {
        assert_matches!(DateRange::month(2024, 13), Err(ServiceError::BadRequest(_)));
        assert_matches!(DateRange::day(2024, 4, 31), Err(ServiceError::BadRequest(_)));
        assert_matches!(DateRange::day(2023, 2, 29), Err(ServiceError::BadRequest(_)));
    }
}
