use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coal grade. Names are unique and matched exactly by uploads.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "brand")]
#[schema(as = Brand)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::supplies::Entity")]
    Supplies,
    #[sea_orm(has_many = "super::temperature::Entity")]
    Temperature,
    #[sea_orm(has_many = "super::predict::Entity")]
    Predict,
    #[sea_orm(has_many = "super::current_predict::Entity")]
    CurrentPredict,
}

impl Related<super::supplies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplies.def()
    }
}

impl Related<super::temperature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Temperature.def()
    }
}

impl Related<super::predict::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Predict.def()
    }
}

impl Related<super::current_predict::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentPredict.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
