// StoreOptions 加载与导出

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::path::Path;

/// 打开一个存储所需的配置
///
/// # 示例
/// ```
/// use kvstore::cfg::StoreOptions;
///
/// let opts = StoreOptions::from_json(r#"{
///     // 支持 JSON5 注释
///     info: "tcp://localhost:6379?hash=users&timeout=2s",
/// }"#).unwrap();
/// assert_eq!(opts.driver, "redis");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, SmartDefault)]
#[serde(default)]
pub struct StoreOptions {
    /// 驱动名称，默认 "redis"
    #[default = "redis"]
    pub driver: String,

    /// 连接信息，如 "tcp://localhost:6379?hash=foo&timeout=5s"
    #[default = "tcp://localhost:6379"]
    pub info: String,
}

impl StoreOptions {
    pub fn new(driver: impl Into<String>, info: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            info: info.into(),
        }
    }

    /// 从 JSON 字符串创建（支持 JSON5 格式）
    pub fn from_json(json_str: &str) -> Result<Self> {
        Ok(json5::from_str(json_str)?)
    }

    /// 从 YAML 字符串创建
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml_str)?)
    }

    /// 从 TOML 字符串创建
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// 从文件加载，根据扩展名选择解析器
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| anyhow!("config file has no extension: {}", path.display()))?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {}", path.display(), e))?;

        match ext.as_str() {
            "json" | "json5" => Self::from_json(&content),
            "yaml" | "yml" => Self::from_yaml(&content),
            "toml" => Self::from_toml(&content),
            _ => Err(anyhow!("unsupported config format: {}", ext)),
        }
    }

    /// 导出为 JSON 字符串
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 导出为 YAML 字符串
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// 导出为 TOML 字符串
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
