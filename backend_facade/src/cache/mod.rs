mod facade;
mod memory;
mod redis;
mod types;

pub use self::facade::CacheFacade;
pub use self::memory::InMemoryCacheStore;
pub use self::redis::RedisCacheStore;
pub use self::types::CacheStore;
