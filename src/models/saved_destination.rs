// ============================================================================
// MODEL : SAVED DESTINATIONS
// ============================================================================
//
// A city bookmarked by a user, independent of any trip.
//
// Columns of saved_destinations:
//   - id (VARCHAR, PRIMARY KEY) - UUID v4
//   - user_id (VARCHAR, NOT NULL, FK users, ON DELETE CASCADE)
//   - city_id / city_name / country (VARCHAR, NOT NULL) - copied from the city catalog
//   - region (VARCHAR, NULL)
//   - created_at (TIMESTAMP, NOT NULL)
//
// Points of attention:
//   - (user_id, city_id) is unique; the index is created by db::sync_schema
//     and the service checks it before inserting
//   - city fields are a snapshot, not a reference: the catalog is static
//
// ============================================================================

use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "saved_destinations")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub city_id: String,
    pub city_name: String,
    pub country: String,
    pub region: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
