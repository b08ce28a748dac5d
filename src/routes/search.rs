use actix_web::{get, web, HttpResponse};

use crate::services::city_catalog::{CityCatalog, CityQuery};

/// GET /api/search/cities?q=&country=&region= - Search the city catalog (PUBLIC)
#[get("/cities")]
pub async fn search_cities(query: web::Query<CityQuery>, catalog: web::Data<CityCatalog>) -> HttpResponse {
    HttpResponse::Ok().json(catalog.search(&query))
}

pub fn search_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/search").service(search_cities));
}
