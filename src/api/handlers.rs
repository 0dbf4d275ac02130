//! API Handlers
//!
//! HTTP request handlers for each demo service endpoint, plus the loader
//! standing in for the authoritative user backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{BatchCache, MultiLoader};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    EvictAllResponse, EvictResponse, HealthResponse, User, UserResponse, UsersQuery, UsersResponse,
};
use crate::store::MemoryStore;

/// Ids the simulated directory can resolve; everything above is unknown
/// and surfaces as a 404.
const DIRECTORY_POPULATION: u32 = 10_000;

// == User Directory ==
/// Simulated authoritative backend: fabricates a profile for every id it
/// knows, the way a database lookup would.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    population: u32,
}

impl UserDirectory {
    /// Creates a directory resolving ids `1..=population`.
    pub fn new(population: u32) -> Self {
        Self { population }
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new(DIRECTORY_POPULATION)
    }
}

impl MultiLoader<u32, User> for UserDirectory {
    async fn load(&self, keys: &[u32]) -> Result<HashMap<u32, User>> {
        Ok(keys
            .iter()
            .filter(|id| (1..=self.population).contains(*id))
            .map(|id| (*id, User::new(*id, format!("user:{id}"))))
            .collect())
    }
}

// == App State ==
/// Cache wiring used by the demo service.
pub type UserCache = BatchCache<u32, User, MemoryStore<User>, UserDirectory>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The user cache, shared immutably by all callers
    pub cache: Arc<UserCache>,
}

impl AppState {
    /// Creates a new AppState around an already-built cache.
    pub fn new(cache: UserCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration, wiring an in-process
    /// store and the simulated directory behind the cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = BatchCache::builder("user", MemoryStore::new(), UserDirectory::default())
            .time_to_live(Duration::from_secs(config.cache_ttl))
            .build()?;
        Ok(Self::new(cache))
    }
}

// == Handlers ==

/// Handler for GET /users/:id
///
/// Resolves a user through the cache, loading from the directory on a
/// miss.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<UserResponse>> {
    match state.cache.get_or_load(&id).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => Err(CacheError::NotFound(format!("user {id} does not exist"))),
    }
}

/// Handler for GET /users?ids=1,2,3
///
/// Resolves a batch of users through the cache in one pass. Unknown ids
/// are simply absent from the result.
pub async fn get_users_handler(
    State(state): State<AppState>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UsersResponse>> {
    let ids = query.parse_ids().map_err(CacheError::InvalidKey)?;
    let users = state.cache.multi_get_or_load(&ids).await?;
    Ok(Json(UsersResponse::new(users)))
}

/// Handler for DELETE /users/:id
///
/// Evicts a single user from the cache. Evicting an uncached user is a
/// no-op.
pub async fn evict_user_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<EvictResponse>> {
    state.cache.evict(&id).await?;
    Ok(Json(EvictResponse::new(id)))
}

/// Handler for DELETE /users
///
/// Evicts every cached user via the known-keys index.
pub async fn evict_all_handler(State(state): State<AppState>) -> Result<Json<EvictAllResponse>> {
    state.cache.evict_all().await?;
    Ok(Json(EvictAllResponse::new()))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
