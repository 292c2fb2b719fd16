//! KV 存储抽象模块
//!
//! 按名称注册的驱动 + 统一的 Set/Get/Delete/Close 门面

pub mod store;

// 重新导出核心接口
pub use store::{Conn, Driver, ErrorKind, Registry, Store, StoreError};
