// Database connection and schema bootstrap

use sea_orm::sea_query::Index;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};
use tracing::info;

use crate::models::{activity, saved_destination, trip, trip_stop, users};

const SAVED_DESTINATION_UNIQUE_INDEX: &str = "idx_saved_destinations_user_city";

pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);

    // each connection to sqlite::memory: is its own database
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    Database::connect(options).await
}

/// Create every table (parents first) and the saved-destination unique index.
/// Idempotent: statements use IF NOT EXISTS.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_table(db, users::Entity).await?;
    create_table(db, trip::Entity).await?;
    create_table(db, trip_stop::Entity).await?;
    create_table(db, activity::Entity).await?;
    create_table(db, saved_destination::Entity).await?;

    let backend = db.get_database_backend();
    let unique_city = Index::create()
        .name(SAVED_DESTINATION_UNIQUE_INDEX)
        .table(saved_destination::Entity)
        .col(saved_destination::Column::UserId)
        .col(saved_destination::Column::CityId)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(backend.build(&unique_city)).await?;

    info!("database schema is up to date");
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}
