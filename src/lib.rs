//! kvstore - 可插拔的键值存储抽象
//!
//! 通过名称注册驱动，打开后得到统一的 Set/Get/Delete/Close 门面。
//! 内置的 `redis` 驱动把一个逻辑存储的所有键值放在 Redis 的同一个 hash 中。
//!
//! ## 模块
//!
//! - **cfg**: 时间字符串解析与 StoreOptions 加载
//! - **kv**: 驱动注册表、门面与 Redis 驱动
//!
//! ## 示例
//!
//! ```no_run
//! use kvstore::{Registry, StoreError};
//!
//! let registry = Registry::with_default_drivers();
//! let mut store = registry.open("redis", "tcp://localhost:6379?hash=users&timeout=2s")?;
//!
//! store.set("alice", b"{\"age\":30}")?;
//! match store.get("bob") {
//!     Ok(value) => println!("bob = {:?}", value),
//!     Err(StoreError::NotFound) => println!("bob not found"),
//!     Err(e) => return Err(e),
//! }
//! store.close()?;
//! # Ok::<(), StoreError>(())
//! ```

pub mod cfg;
pub mod kv;

// 重新导出主要的公共 API
pub use cfg::{DurationError, StoreOptions};
pub use kv::store::{ConnectionInfo, RedisDriver, Transport};
pub use kv::{Conn, Driver, ErrorKind, Registry, Store, StoreError};
