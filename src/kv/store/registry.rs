// 驱动注册表

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::core::{Driver, StoreError};
use super::facade::Store;
use super::register::register_default_drivers;
use crate::cfg::StoreOptions;

/// 驱动名称到驱动实例的映射
///
/// 不是全局变量：由应用入口构造并传递。注册应在 open 之前完成，
/// open 一个未注册的名称返回 `StoreError::UnknownDriver`。
///
/// 重复注册同一名称时后者覆盖前者，`register` 返回被替换的驱动。
///
/// # 示例
/// ```no_run
/// use kvstore::kv::store::Registry;
///
/// let registry = Registry::with_default_drivers();
/// let mut store = registry.open("redis", "tcp://localhost:6379?hash=foo").unwrap();
/// store.set("key", b"value").unwrap();
/// store.close().unwrap();
/// ```
#[derive(Default)]
pub struct Registry {
    drivers: RwLock<HashMap<String, Arc<dyn Driver>>>,
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建注册了内置驱动（"redis"）的注册表
    pub fn with_default_drivers() -> Self {
        let registry = Self::new();
        register_default_drivers(&registry);
        registry
    }

    /// 注册驱动，返回同名的旧驱动（如果有）
    pub fn register(
        &self,
        name: impl Into<String>,
        driver: impl Driver + 'static,
    ) -> Option<Arc<dyn Driver>> {
        self.register_arc(name, Arc::new(driver))
    }

    /// 注册共享的驱动实例
    pub fn register_arc(
        &self,
        name: impl Into<String>,
        driver: Arc<dyn Driver>,
    ) -> Option<Arc<dyn Driver>> {
        let name = name.into();
        let mut drivers = self.drivers.write().unwrap_or_else(PoisonError::into_inner);
        let previous = drivers.insert(name.clone(), driver);
        if previous.is_some() {
            tracing::warn!(driver = %name, "driver registered twice, replacing previous");
        } else {
            tracing::debug!(driver = %name, "driver registered");
        }
        previous
    }

    /// 按名称查找驱动
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Driver>, StoreError> {
        let drivers = self.drivers.read().unwrap_or_else(PoisonError::into_inner);
        drivers
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownDriver(name.to_string()))
    }

    /// 已注册的驱动名称，按字典序
    pub fn drivers(&self) -> Vec<String> {
        let drivers = self.drivers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = drivers.keys().cloned().collect();
        names.sort();
        names
    }

    /// 用指定驱动打开一个存储
    pub fn open(&self, driver: &str, info: &str) -> Result<Store, StoreError> {
        let conn = self.lookup(driver)?.open(info)?;
        tracing::debug!(driver = %driver, "store opened");
        Ok(Store::new(driver, conn))
    }

    /// 根据配置打开存储
    pub fn open_with_options(&self, options: &StoreOptions) -> Result<Store, StoreError> {
        self.open(&options.driver, &options.info)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("drivers", &self.drivers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::store::common_tests;
    use crate::kv::store::core::Conn;
    use crate::kv::store::memory_client::MemoryDialer;
    use crate::kv::store::RedisDriver;

    /// open 总是失败的驱动，错误信息带上自身标记
    struct FailingDriver(&'static str);

    impl Driver for FailingDriver {
        fn open(&self, _info: &str) -> Result<Box<dyn Conn>, StoreError> {
            Err(StoreError::InvalidConnectionInfo(self.0.to_string()))
        }
    }

    fn memory_registry(dialer: &MemoryDialer) -> Registry {
        let registry = Registry::new();
        registry.register("redis", RedisDriver::with_dialer(dialer.clone()));
        registry
    }

    #[test]
    fn test_unknown_driver() {
        let registry = Registry::new();
        let err = registry.open("redis", "tcp://localhost:6379").unwrap_err();
        assert!(matches!(err, StoreError::UnknownDriver(ref name) if name == "redis"));
        assert!(registry.lookup("missing").is_err());
    }

    #[test]
    fn test_default_drivers() {
        let registry = Registry::with_default_drivers();
        assert_eq!(registry.drivers(), vec!["redis".to_string()]);
        assert!(registry.lookup("redis").is_ok());
    }

    #[test]
    fn test_reregister_last_wins() {
        let registry = Registry::new();
        assert!(registry.register("dup", FailingDriver("first")).is_none());
        let previous = registry.register("dup", FailingDriver("second"));
        assert!(previous.is_some());

        // 旧驱动仍可用，但注册表里已是新驱动
        let old = previous.unwrap().open("x").err().unwrap();
        assert_eq!(old.to_string(), "failed to parse info (first)");
        let new = registry.open("dup", "x").unwrap_err();
        assert_eq!(new.to_string(), "failed to parse info (second)");
        assert_eq!(registry.drivers(), vec!["dup".to_string()]);
    }

    #[test]
    fn test_open_errors_pass_through() {
        let registry = memory_registry(&MemoryDialer::new());
        let err = registry
            .open("redis", "tcp://localhost:6379?timeout=notaduration")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTimeout(_)));
    }

    #[test]
    fn test_store_facade() {
        let registry = memory_registry(&MemoryDialer::new());
        let store = registry.open("redis", "tcp://:6379?hash=facade").unwrap();
        assert_eq!(store.driver(), "redis");
        common_tests::test_set_get_delete(store);

        common_tests::test_set_override(registry.open("redis", "tcp://:6379").unwrap());
        common_tests::test_get_not_found(registry.open("redis", "tcp://:6379").unwrap());
        common_tests::test_delete_not_found(registry.open("redis", "tcp://:6379").unwrap());
        common_tests::test_use_after_close(registry.open("redis", "tcp://:6379").unwrap());
    }

    #[test]
    fn test_namespace_isolation_through_registry() {
        let registry = memory_registry(&MemoryDialer::new());
        common_tests::test_namespace_isolation(
            registry.open("redis", "tcp://:6379?hash=one").unwrap(),
            registry.open("redis", "tcp://:6379?hash=two").unwrap(),
        );
    }

    #[test]
    fn test_open_with_options() -> anyhow::Result<()> {
        let registry = memory_registry(&MemoryDialer::new());
        let options = StoreOptions::from_yaml("info: tcp://:6379?hash=from_yaml\n")?;
        let mut store = registry.open_with_options(&options)?;
        store.set("k", b"v")?;
        assert_eq!(store.get("k")?, b"v");
        store.close()?;

        let options = StoreOptions::new("memcached", "tcp://:11211");
        assert!(matches!(
            registry.open_with_options(&options),
            Err(StoreError::UnknownDriver(_))
        ));
        Ok(())
    }

    #[test]
    fn test_concurrent_register_and_open() {
        let dialer = MemoryDialer::new();
        let registry = Arc::new(memory_registry(&dialer));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let dialer = dialer.clone();
                std::thread::spawn(move || {
                    registry.register(format!("redis{}", i), RedisDriver::with_dialer(dialer));
                    let mut store = registry.open("redis", "tcp://:6379?hash=concurrent").unwrap();
                    store.set(&format!("k{}", i), b"v").unwrap();
                    store.close().unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.drivers().len(), 9);
        assert_eq!(dialer.field_count("concurrent"), 8);
    }
}
