use crate::{db::DbPool, entities::location, errors::ServiceError};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct LocationInput {
    pub latitude: f64,
    pub longitude: f64,
}

fn within(value: f64, bound: f64) -> bool {
    value.is_finite() && value.abs() <= bound
}

impl Validate for LocationInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !within(self.latitude, 90.0) {
            errors.add("latitude", ValidationError::new("range"));
        }
        if !within(self.longitude, 180.0) {
            errors.add("longitude", ValidationError::new("range"));
        }
        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Stores the single site location weather lookups use.
#[derive(Clone)]
pub struct LocationService {
    db_pool: Arc<DbPool>,
}

impl LocationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Replaces whatever location is on file.
    #[instrument(skip(self))]
    pub async fn set(&self, input: LocationInput) -> Result<location::Model, ServiceError> {
        let txn = self.db_pool.begin().await?;
        location::Entity::delete_many().exec(&txn).await?;
        let model = location::ActiveModel {
            latitude: Set(input.latitude),
            longitude: Set(input.longitude),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        info!(
            latitude = model.latitude,
            longitude = model.longitude,
            "location replaced"
        );
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<Option<location::Model>, ServiceError> {
        Ok(location::Entity::find()
            .order_by_asc(location::Column::Id)
            .one(&*self.db_pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;
    use sea_orm::{Database, PaginatorTrait};

    async fn service() -> LocationService {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        LocationService::new(Arc::new(db))
    }

    #[tokio::test]
    async fn setting_a_location_replaces_the_previous_one() {
        let service = service().await;
        assert!(service.get().await.unwrap().is_none());

        service
            .set(LocationInput { latitude: 43.1, longitude: 131.9 })
            .await
            .unwrap();
        service
            .set(LocationInput { latitude: 59.9, longitude: 30.3 })
            .await
            .unwrap();

        let stored = service.get().await.unwrap().unwrap();
        assert_eq!((stored.latitude, stored.longitude), (59.9, 30.3));
        let count = location::Entity::find()
            .count(&*service.db_pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn coordinates_outside_the_globe_fail_validation() {
        assert!(LocationInput { latitude: 91.0, longitude: 0.0 }.validate().is_err());
        assert!(LocationInput { latitude: 0.0, longitude: -181.0 }.validate().is_err());
        assert!(LocationInput { latitude: -90.0, longitude: 180.0 }.validate().is_ok());
    }
}
