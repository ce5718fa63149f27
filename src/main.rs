mod cache;
mod config;
mod entities;
mod error;
mod genre;
mod geo;
mod images;
mod maintenance;
mod places;
mod ranking;
mod restaurants;
mod serde_helpers;
mod stations;
mod tags;

#[cfg(test)]
mod test_utils;

use std::{env, sync::Arc};

use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::json;
use tokio::select;

use crate::{
    cache::{get_or_fetch, memory::MemoryCache, sqlite::SqliteCache, ResponseCache},
    config::Config,
    error::{GatsuError, GatsuResult},
    images::{ImageError, ImagesClient},
    places::client::PlacesClient,
    restaurants::RestaurantsQuery,
    stations::{client::StationsClient, entities::Station},
};

#[derive(Clone)]
pub struct ContextData {
    config: Config,
    places_client: PlacesClient,
    stations_client: StationsClient,
    images_client: ImagesClient,
    cache: Arc<dyn ResponseCache>,
}

impl ContextData {
    pub fn new(config: Config, cache: Arc<dyn ResponseCache>) -> GatsuResult<ContextData> {
        Ok(ContextData {
            places_client: PlacesClient::new(config.google_api_key.clone())?,
            stations_client: StationsClient::new()?,
            images_client: ImagesClient::new(
                config.custom_search_api_key.clone(),
                config.custom_search_cx.clone(),
            )?,
            cache,
            config,
        })
    }
}

#[derive(Deserialize)]
struct StationsQuery {
    line: Option<String>,
    name: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
}

#[derive(Deserialize)]
struct StationImageQuery {
    station: Option<String>,
}

#[derive(Deserialize)]
struct RestaurantImageQuery {
    q: Option<String>,
}

fn required(value: &Option<String>, message: &str) -> GatsuResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(GatsuError::BadRequest(message.to_string())),
    }
}

#[get("/ok")]
async fn ok() -> GatsuResult<impl Responder> {
    Ok(HttpResponse::Ok().finish())
}

#[get("/restaurants")]
async fn get_restaurants(
    query: web::Query<RestaurantsQuery>,
    ctx: web::Data<ContextData>,
) -> GatsuResult<impl Responder> {
    let results = restaurants::search_restaurants(&ctx, &query).await?;
    let response = web::Json(json!({
        "results": results,
    }));
    Ok(response)
}

#[get("/prefectures")]
async fn get_prefectures(ctx: web::Data<ContextData>) -> GatsuResult<impl Responder> {
    let prefectures = get_or_fetch(ctx.cache.as_ref(), "prefectures", ctx.config.cache_ttl, || {
        ctx.stations_client.get_prefectures()
    })
    .await?;

    let response = web::Json(json!({
        "prefectures": prefectures,
    }));
    Ok(response)
}

#[get("/prefectures/{prefecture}/lines")]
async fn get_prefecture_lines(
    params: web::Path<(String,)>,
    ctx: web::Data<ContextData>,
) -> GatsuResult<impl Responder> {
    let (prefecture,) = params.into_inner();

    let key = format!("lines:{}", prefecture);
    let lines = get_or_fetch(ctx.cache.as_ref(), &key, ctx.config.cache_ttl, || {
        ctx.stations_client.get_lines(&prefecture)
    })
    .await?;

    let response = web::Json(json!({
        "lines": lines,
    }));
    Ok(response)
}

#[get("/stations")]
async fn get_stations(
    query: web::Query<StationsQuery>,
    ctx: web::Data<ContextData>,
) -> GatsuResult<impl Responder> {
    let client = &ctx.stations_client;

    let stations: Vec<Station> = if let Some(line) = &query.line {
        let key = format!("stations:line:{}", line);
        get_or_fetch(ctx.cache.as_ref(), &key, ctx.config.cache_ttl, || {
            client.get_stations_by_line(line)
        })
        .await?
    } else if let Some(name) = &query.name {
        let key = format!("stations:name:{}", name);
        get_or_fetch(ctx.cache.as_ref(), &key, ctx.config.cache_ttl, || {
            client.get_stations_by_name(name)
        })
        .await?
    } else if let (Some(lat), Some(lng)) = (query.lat, query.lng) {
        // the user's own position, not worth caching
        client.get_nearby_stations(lat, lng).await?
    } else {
        return Err(GatsuError::BadRequest(
            "One of line, name or lat and lng is required".to_string(),
        ));
    };

    let response = web::Json(json!({
        "stations": stations,
    }));
    Ok(response)
}

#[get("/stations/{name}/lines")]
async fn get_station_lines(
    params: web::Path<(String,)>,
    ctx: web::Data<ContextData>,
) -> GatsuResult<impl Responder> {
    let (name,) = params.into_inner();

    let key = format!("station-lines:{}", name);
    let lines = get_or_fetch(ctx.cache.as_ref(), &key, ctx.config.cache_ttl, || {
        ctx.stations_client.get_station_lines(&name)
    })
    .await?;

    let response = web::Json(json!({
        "lines": lines,
    }));
    Ok(response)
}

#[get("/station-image")]
async fn get_station_image(
    query: web::Query<StationImageQuery>,
    ctx: web::Data<ContextData>,
) -> GatsuResult<impl Responder> {
    let station = required(&query.station, "Station is required")?;

    let key = format!("station-image:{}", station);
    let image_url = get_or_fetch(ctx.cache.as_ref(), &key, ctx.config.cache_ttl, || {
        ctx.images_client.get_station_image(&station)
    })
    .await?;

    let response = web::Json(json!({
        "imageUrl": image_url,
    }));
    Ok(response)
}

#[get("/restaurant-image")]
async fn get_restaurant_image(
    query: web::Query<RestaurantImageQuery>,
    ctx: web::Data<ContextData>,
) -> GatsuResult<impl Responder> {
    let q = required(&query.q, "Query is required")?;

    let key = format!("restaurant-image:{}", q);
    let fetched = get_or_fetch(ctx.cache.as_ref(), &key, ctx.config.cache_ttl, || {
        ctx.images_client.get_restaurant_image(&q)
    })
    .await;

    // not cached, the search is asked again next time
    let image_url = match fetched {
        Err(ImageError::Unavailable(_)) => None,
        other => other?,
    };

    let response = web::Json(json!({
        "imageUrl": image_url,
    }));
    Ok(response)
}

fn open_cache(config: &Config) -> GatsuResult<Arc<dyn ResponseCache>> {
    let cache: Arc<dyn ResponseCache> = match &config.cache_path {
        Some(path) => {
            log::info!("Using response cache at {}", path);
            Arc::new(SqliteCache::open(path)?)
        }
        None => {
            log::info!("Using in-memory response cache");
            Arc::new(MemoryCache::new())
        }
    };
    Ok(cache)
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ok)
        .service(get_restaurants)
        .service(get_prefectures)
        .service(get_prefecture_lines)
        .service(get_stations)
        .service(get_station_lines)
        .service(get_station_image)
        .service(get_restaurant_image);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::try_init().ok();

    log::debug!("Debug logging enabled");

    dotenvy::from_filename(".env").ok();

    let config = Config::load().map_err(GatsuError::from)?;
    log::debug!("{:?}", config);

    let cache = open_cache(&config)?;
    let ctx = ContextData::new(config, cache)?;

    let maintenance =
        maintenance::keep_maintained(ctx.cache.clone(), ctx.config.cache_purge_interval);

    let listen_address = ctx.config.listen_address.clone();

    log::info!("Starting server at {}", listen_address);

    let server = HttpServer::new(move || {
        let logger = Logger::default();

        let mut cors = actix_cors::Cors::default()
            .allowed_methods(vec!["GET"])
            .allowed_headers(vec!["accept"]);

        if let Some(allowed_origin) = &ctx.config.allow_origin {
            if allowed_origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(allowed_origin);
            }
        }

        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(web::Data::new(ctx.clone()))
            .configure(configure)
    })
    .bind(listen_address)?
    .run();

    select! {
        res = server => {
            log::info!("Server stopped");
            res?;
            Ok::<_, std::io::Error>(())
        },
        res = maintenance => {
            log::info!("Maintenance loop stopped");
            res.map_err(GatsuError::from)?;
            Ok::<_, std::io::Error>(())
        }
    }?;

    Ok(())
}
