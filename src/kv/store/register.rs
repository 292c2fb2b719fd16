use super::registry::Registry;
use super::RedisDriver;

/// 内置 Redis 驱动的注册名
pub const REDIS_DRIVER: &str = "redis";

/// 注册所有内置驱动
///
/// # 注册的驱动
/// - `redis` - 把键值存放在 Redis 的一个 hash 中
///
/// # 示例
/// ```
/// use kvstore::kv::store::{register_default_drivers, Registry};
///
/// let registry = Registry::new();
/// register_default_drivers(&registry);
/// assert!(registry.lookup("redis").is_ok());
/// ```
pub fn register_default_drivers(registry: &Registry) {
    register_redis_driver(registry);
}

/// 注册 Redis 驱动
pub fn register_redis_driver(registry: &Registry) {
    registry.register(REDIS_DRIVER, RedisDriver::new());
}
