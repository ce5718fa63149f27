use std::sync::Arc;

use crate::{
    cache::memory::MemoryCache,
    config::Config,
    entities::Place,
    ContextData,
};

pub fn init() {
    dotenvy::from_filename(".dev.vars").ok();
    env_logger::builder().is_test(true).try_init().ok();
}

/// A place with no location, rating or types
pub fn place(id: &str, name: &str, review_count: u32) -> Place {
    Place {
        id: id.to_string(),
        name: name.to_string(),
        types: vec![],
        primary_type: None,
        address: "東京都新宿区".to_string(),
        rating: None,
        review_count: Some(review_count),
        location: None,
        summary: None,
    }
}

/// Context with no API keys and an in-memory cache, never reaches a provider
pub fn ctx() -> ContextData {
    init();

    let config = Config::default();
    ContextData::new(config, Arc::new(MemoryCache::new())).unwrap()
}
