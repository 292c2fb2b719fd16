//! cfg 模块 - 配置管理
//!
//! 时间字符串解析，以及 StoreOptions 的多格式加载

pub mod duration;
pub mod options;

pub use duration::{format_duration, parse_duration, DurationError};
pub use options::StoreOptions;
