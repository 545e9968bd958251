//! Tests against running MongoDB and Redis servers.
//!
//! Ignored by default. Start the services, point `DB_HOST`/`DB_PORT`/`CACHE_URL`
//! at them (or put them in `.env_test`) and run with `--ignored`.
use std::sync::Once;
use std::time::Duration;

use backend_facade::{CacheConfig, CacheFacade, Collection, StoreConfig, StoreFacade};

fn load_test_env() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn redis_set_get_expire_del() {
    load_test_env();
    let cache = CacheFacade::from_config(&CacheConfig::from_env().unwrap()).unwrap();
    assert!(cache.ready().await, "Redis is not reachable");

    let key = format!("backend_facade:live:{}", std::process::id());

    cache.set(&key, "value", 1).await;
    assert_eq!(cache.get(&key).await, Some("value".to_string()));

    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(cache.get(&key).await, None);

    cache.set(&key, "value", 60).await;
    cache.del(&key).await;
    assert_eq!(cache.get(&key).await, None);
    assert_eq!(cache.try_del(&key).await, Ok(()));

    cache.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn mongo_counts() {
    load_test_env();
    let store = StoreFacade::from_config(&StoreConfig::from_env().unwrap());
    assert!(store.ready().await, "MongoDB is not reachable");

    assert!(store.try_count(Collection::Users).await.is_ok());
    assert!(store.try_count(Collection::Files).await.is_ok());

    store.close().await;
    assert!(!store.is_alive());
}
