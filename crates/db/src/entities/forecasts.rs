//! `SeaORM` Entity for forecasts table.
//!
//! Rows are derived data, replaced wholesale on every recalculation.
//! `predicted_opportunities` is scaled by 100.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "forecasts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub region_id: Uuid,
    pub lead_type_id: Uuid,
    pub year: i32,
    pub quarter: i16,
    pub predicted_leads: i64,
    pub predicted_opportunities: i64,
    pub predicted_revenue_new: i64,
    pub predicted_revenue_upsell: i64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
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

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
