//! `SeaORM` Entity for time_distributions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "time_distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub lead_type_id: Uuid,
    pub same_quarter_pct: i64,
    pub next_quarter_pct: i64,
    pub two_quarter_pct: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lead_types::Entity",
        from = "Column::LeadTypeId",
        to = "super::lead_types::Column::Id"
    )]
    LeadTypes,
}

impl Related<super::lead_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeadTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
