pub mod activity_service;
pub mod admin_service;
pub mod auth_service;
pub mod budget_service;
pub mod calendar_service;
pub mod city_catalog;
pub mod community_service;
pub mod dashboard_service;
pub mod mailer;
pub mod profile_service;
pub mod saved_destination_service;
pub mod seed_service;
pub mod stop_service;
pub mod trip_service;
