//! `SeaORM` Entity for historical_volumes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "historical_volumes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub region_id: Uuid,
    pub lead_type_id: Uuid,
    pub year: i32,
    pub quarter: i16,
    pub volume: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::regions::Entity",
        from = "Column::RegionId",
        to = "super::regions::Column::Id"
    )]
    Regions,
    #[sea_orm(
        belongs_to = "super::lead_types::Entity",
        from = "Column::LeadTypeId",
        to = "super::lead_types::Column::Id"
    )]
    LeadTypes,
}

impl ActiveModelBehavior for ActiveModel {}
