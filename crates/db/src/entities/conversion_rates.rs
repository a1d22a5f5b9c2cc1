//! `SeaORM` Entity for conversion_rates table.
//!
//! Rates are basis points (10000 = 100%).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "conversion_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub region_id: Uuid,
    pub lead_type_id: Uuid,
    pub coverage_ratio: i64,
    pub win_rate_new: i64,
    pub win_rate_upsell: i64,
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
