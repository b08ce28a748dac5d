use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_stop_id: String,
    pub name: String,
    pub cost: Decimal,
    pub currency: String,  // ISO code, 'USD' when omitted
    pub duration: i32,     // minutes
    pub start_time: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trip_stop::Entity",
        from = "Column::TripStopId",
        to = "super::trip_stop::Column::Id",
        on_delete = "Cascade"
    )]
    TripStop,
}

impl Related<super::trip_stop::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TripStop.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
