// ============================================================================
// MODELS
// ============================================================================
//
// One SeaORM entity per table, plus the plain structs served as JSON:
//   - users : accounts (PBKDF2 hash, role, pending reset token)
//   - trip : a user's trip with its date range and optional budget
//   - trip_stop : a city visited during a trip, ordered by `order`
//   - activity : something done at a stop, with cost and duration
//   - saved_destination : a city bookmarked by a user
//   - city : a record of the read-only city catalog (not a table)
//   - health : health check payload
//   - dto : response shapes joining several tables
//
// Points of attention:
//   - Ids are UUID v4 strings generated by the services
//   - Foreign keys are declared with ON DELETE CASCADE, but the services also
//     delete children explicitly inside a transaction (SQLite ignores FKs
//     unless PRAGMA foreign_keys is on)
//
// ============================================================================

pub mod activity;
pub mod city;
pub mod dto;
pub mod health;
pub mod saved_destination;
pub mod trip;
pub mod trip_stop;
pub mod users;
