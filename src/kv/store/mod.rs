pub mod core;
pub mod facade;
pub mod info;
pub mod redis_client;
pub mod redis_store;
pub mod register;
pub mod registry;

#[cfg(test)]
mod memory_client;

// 重新导出核心类型和 trait
pub use self::core::{Conn, Driver, ErrorKind, StoreError};
pub use facade::Store;
pub use info::{ConnectionInfo, Transport, DEFAULT_NAMESPACE};
// 重新导出具体实现
pub use redis_client::{Command, Dialer, RedisClient, RedisDialer, RemoteClient, Reply};
pub use redis_store::{RedisConn, RedisDriver};
// 重新导出注册表和注册函数
pub use register::{register_default_drivers, register_redis_driver, REDIS_DRIVER};
pub use registry::Registry;
