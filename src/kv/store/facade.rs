use std::fmt;

use super::core::{Conn, StoreError};

/// 打开成功后返回给调用方的存储
///
/// 只是把调用转发给驱动的连接。同一个 Store 上的调用由 `&mut self`
/// 串行化；需要并发时请为每个使用者各 open 一个。
pub struct Store {
    driver: String,
    conn: Box<dyn Conn>,
}

impl Store {
    pub fn new(driver: impl Into<String>, conn: Box<dyn Conn>) -> Self {
        Self {
            driver: driver.into(),
            conn,
        }
    }

    /// 打开该存储所用的驱动名称
    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// 设置键值，覆盖已有值
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.conn.set(key, value)
    }

    /// 获取键对应的值，键不存在时返回 StoreError::NotFound
    pub fn get(&mut self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.conn.get(key)
    }

    /// 删除键，键不存在时也返回成功
    pub fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn.delete(key)
    }

    /// 关闭存储
    pub fn close(&mut self) -> Result<(), StoreError> {
        tracing::debug!(driver = %self.driver, "closing store");
        self.conn.close()
    }
}

impl Conn for Store {
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        Store::set(self, key, value)
    }

    fn get(&mut self, key: &str) -> Result<Vec<u8>, StoreError> {
        Store::get(self, key)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        Store::delete(self, key)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        Store::close(self)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("driver", &self.driver).finish()
    }
}
