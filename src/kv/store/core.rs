use thiserror::Error;

use crate::cfg::DurationError;

/// KV 存储相关错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unknown driver {0:?} (forgotten register?)")]
    UnknownDriver(String),

    #[error("failed to parse info ({0})")]
    InvalidConnectionInfo(String),

    #[error("invalid timeout format ({0})")]
    InvalidTimeout(#[source] DurationError),

    #[error("unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("key not found")]
    NotFound,

    #[error("invalid value found for {key:?}: {reply}")]
    InvalidValue { key: String, reply: String },

    #[error("store is not open")]
    NotOpen,

    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// 错误分类，调用方据此决定重试、重连或放弃
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 配置错误，同步地从 open 返回，重试无意义
    Configuration,
    /// 拨号、往返或超时失败
    Transport,
    /// 键不存在
    NotFound,
    /// 远端回复的形态与预期不符
    Protocol,
    /// 连接已关闭
    NotOpen,
}

impl StoreError {
    /// 包装远端客户端的错误
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Transport(Box::new(err))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::UnknownDriver(_)
            | StoreError::InvalidConnectionInfo(_)
            | StoreError::InvalidTimeout(_)
            | StoreError::UnsupportedTransport(_) => ErrorKind::Configuration,
            StoreError::Transport(_) => ErrorKind::Transport,
            StoreError::NotFound => ErrorKind::NotFound,
            StoreError::InvalidValue { .. } => ErrorKind::Protocol,
            StoreError::NotOpen => ErrorKind::NotOpen,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// 一个已打开的连接（驱动适配器契约）
///
/// 每个方法对应一次远端往返。连接本身不可并发使用，`&mut self`
/// 保证同一连接上的调用被串行化；并发场景请为每个使用者单独 open。
pub trait Conn: Send {
    /// 设置键值，覆盖已有值
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// 获取键对应的值，键不存在时返回 StoreError::NotFound
    fn get(&mut self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// 删除键，键不存在时也返回成功
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// 释放连接，之后的任何调用都返回 StoreError::NotOpen
    fn close(&mut self) -> Result<(), StoreError>;
}

/// 可按名称注册的驱动
///
/// 驱动本身不持有连接状态，`open` 每次返回一个独立的新连接，
/// 因此同一个驱动实例可以被多个线程同时 open。
pub trait Driver: Send + Sync {
    fn open(&self, info: &str) -> Result<Box<dyn Conn>, StoreError>;
}
