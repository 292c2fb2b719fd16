//! 远端客户端抽象
//!
//! 适配器只依赖 `RemoteClient` / `Dialer` 两个能力，生产实现基于
//! `redis` crate 的阻塞连接。

use std::fmt;

use super::core::StoreError;
use super::info::{ConnectionInfo, Transport};

/// 发往远端的 hash 命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    HSet {
        hash: &'a str,
        field: &'a str,
        value: &'a [u8],
    },
    HGet {
        hash: &'a str,
        field: &'a str,
    },
    HDel {
        hash: &'a str,
        field: &'a str,
    },
}

impl<'a> Command<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Command::HSet { .. } => "HSET",
            Command::HGet { .. } => "HGET",
            Command::HDel { .. } => "HDEL",
        }
    }

    pub fn hash(&self) -> &'a str {
        match *self {
            Command::HSet { hash, .. } | Command::HGet { hash, .. } | Command::HDel { hash, .. } => {
                hash
            }
        }
    }
}

/// 远端回复，在客户端边界一次性解码
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Nil,
    Bytes(Vec<u8>),
    Integer(i64),
    /// 其它形态的回复，保留其描述用于报错
    Unexpected(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Nil => f.write_str("nil"),
            Reply::Bytes(b) => write!(f, "bytes({})", b.len()),
            Reply::Integer(i) => write!(f, "int({})", i),
            Reply::Unexpected(desc) => f.write_str(desc),
        }
    }
}

impl From<redis::Value> for Reply {
    fn from(value: redis::Value) -> Self {
        match value {
            redis::Value::Nil => Reply::Nil,
            redis::Value::BulkString(bytes) => Reply::Bytes(bytes),
            redis::Value::Int(i) => Reply::Integer(i),
            other => Reply::Unexpected(format!("{:?}", other)),
        }
    }
}

/// 一条已建立的请求/应答连接
pub trait RemoteClient: Send {
    /// 执行一次往返
    fn call(&mut self, command: Command<'_>) -> Result<Reply, StoreError>;

    /// 释放底层连接
    fn close(&mut self) -> Result<(), StoreError>;
}

/// 根据连接信息建立 RemoteClient
pub trait Dialer: Send + Sync {
    fn dial(&self, info: &ConnectionInfo) -> Result<Box<dyn RemoteClient>, StoreError>;
}

/// 基于 redis crate 的拨号器
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisDialer;

impl RedisDialer {
    /// 构建 redis 连接 URL
    ///
    /// 地址省略主机（如 ":6379"）时连接本机。只给密码时用户名为 "default"。
    pub fn connection_url(info: &ConnectionInfo) -> Result<String, StoreError> {
        let username = match (&info.username, &info.password) {
            (Some(username), _) => Some(username.as_str()),
            (None, Some(_)) => Some("default"),
            (None, None) => None,
        };
        match &info.transport {
            Transport::Tcp => {
                let address = if info.address.starts_with(':') {
                    format!("127.0.0.1{}", info.address)
                } else {
                    info.address.clone()
                };
                let credentials = match (username, &info.password) {
                    (Some(username), Some(password)) => format!(
                        "{}:{}@",
                        urlencoding::encode(username),
                        urlencoding::encode(password)
                    ),
                    (Some(username), None) => format!("{}@", urlencoding::encode(username)),
                    _ => String::new(),
                };
                Ok(format!("redis://{}{}", credentials, address))
            }
            Transport::Unix => {
                let mut params = Vec::new();
                if let Some(username) = username {
                    params.push(format!("user={}", urlencoding::encode(username)));
                }
                if let Some(password) = &info.password {
                    params.push(format!("pass={}", urlencoding::encode(password)));
                }
                let path: Vec<_> = info.address.split('/').map(urlencoding::encode).collect();
                if params.is_empty() {
                    Ok(format!("redis+unix://{}", path.join("/")))
                } else {
                    Ok(format!("redis+unix://{}?{}", path.join("/"), params.join("&")))
                }
            }
            Transport::Other(scheme) => Err(StoreError::UnsupportedTransport(scheme.clone())),
        }
    }
}

impl Dialer for RedisDialer {
    fn dial(&self, info: &ConnectionInfo) -> Result<Box<dyn RemoteClient>, StoreError> {
        let url = Self::connection_url(info)?;
        let client = redis::Client::open(url.as_str()).map_err(StoreError::transport)?;

        let con = if info.has_timeout() {
            let con = client
                .get_connection_with_timeout(info.timeout)
                .map_err(StoreError::transport)?;
            con.set_read_timeout(Some(info.timeout))
                .map_err(StoreError::transport)?;
            con.set_write_timeout(Some(info.timeout))
                .map_err(StoreError::transport)?;
            con
        } else {
            client.get_connection().map_err(StoreError::transport)?
        };

        Ok(Box::new(RedisClient { con }))
    }
}

/// 包装 redis::Connection
pub struct RedisClient {
    con: redis::Connection,
}

impl RedisClient {
    pub fn new(con: redis::Connection) -> Self {
        Self { con }
    }
}

impl RemoteClient for RedisClient {
    fn call(&mut self, command: Command<'_>) -> Result<Reply, StoreError> {
        let mut cmd = redis::cmd(command.name());
        match command {
            Command::HSet { hash, field, value } => cmd.arg(hash).arg(field).arg(value),
            Command::HGet { hash, field } | Command::HDel { hash, field } => {
                cmd.arg(hash).arg(field)
            }
        };
        let value: redis::Value = cmd.query(&mut self.con).map_err(StoreError::transport)?;
        Ok(Reply::from(value))
    }

    fn close(&mut self) -> Result<(), StoreError> {
        // 连接在 drop 时断开
        Ok(())
    }
}
