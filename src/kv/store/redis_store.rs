use std::sync::Arc;

use super::core::{Conn, Driver, StoreError};
use super::info::ConnectionInfo;
use super::redis_client::{Command, Dialer, RedisDialer, RemoteClient, Reply};

/// Redis 驱动
///
/// 所有键值存放在一个 hash 中（info 里的 `hash` 参数，默认 "kvstore"）。
/// 驱动本身无状态，每次 open 拨一条新连接。
///
/// # 示例
/// ```no_run
/// use kvstore::kv::store::{Driver, RedisDriver};
///
/// let mut conn = RedisDriver::new()
///     .open("tcp://localhost:6379?hash=foo&timeout=5s")
///     .unwrap();
/// conn.set("key", b"value").unwrap();
/// assert_eq!(conn.get("key").unwrap(), b"value");
/// conn.close().unwrap();
/// ```
#[derive(Clone)]
pub struct RedisDriver {
    dialer: Arc<dyn Dialer>,
}

impl RedisDriver {
    pub fn new() -> Self {
        Self::with_dialer(RedisDialer)
    }

    /// 使用自定义拨号器，便于替换远端实现
    pub fn with_dialer(dialer: impl Dialer + 'static) -> Self {
        Self {
            dialer: Arc::new(dialer),
        }
    }

    /// 打开连接，返回具体类型
    pub fn connect(&self, info: &str) -> Result<RedisConn, StoreError> {
        let info = ConnectionInfo::parse(info)?;
        let client = self.dialer.dial(&info)?;
        tracing::debug!(
            transport = %info.transport,
            address = %info.address,
            namespace = %info.namespace,
            timeout = ?info.timeout,
            "redis connection opened"
        );
        Ok(RedisConn::new(client, info.namespace))
    }
}

impl Default for RedisDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for RedisDriver {
    fn open(&self, info: &str) -> Result<Box<dyn Conn>, StoreError> {
        Ok(Box::new(self.connect(info)?))
    }
}

enum State {
    Open(Box<dyn RemoteClient>),
    Closed,
}

/// 一条 Redis 连接及其 hash 名称
pub struct RedisConn {
    state: State,
    hash: String,
}

impl RedisConn {
    pub fn new(client: Box<dyn RemoteClient>, hash: impl Into<String>) -> Self {
        Self {
            state: State::Open(client),
            hash: hash.into(),
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }
}

/// 执行一次往返，只借用连接状态
fn call(state: &mut State, command: Command<'_>) -> Result<Reply, StoreError> {
    let client = match state {
        State::Open(client) => client,
        State::Closed => return Err(StoreError::NotOpen),
    };
    client.call(command).map_err(|e| {
        tracing::warn!(command = command.name(), hash = command.hash(), error = %e, "redis call failed");
        e
    })
}

impl Conn for RedisConn {
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let RedisConn { state, hash } = self;
        call(
            state,
            Command::HSet {
                hash: hash.as_str(),
                field: key,
                value,
            },
        )?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Vec<u8>, StoreError> {
        let RedisConn { state, hash } = self;
        match call(state, Command::HGet { hash: hash.as_str(), field: key })? {
            Reply::Bytes(value) => Ok(value),
            Reply::Nil => Err(StoreError::NotFound),
            other => Err(StoreError::InvalidValue {
                key: key.to_string(),
                reply: other.to_string(),
            }),
        }
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let RedisConn { state, hash } = self;
        call(state, Command::HDel { hash: hash.as_str(), field: key })?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), StoreError> {
        match std::mem::replace(&mut self.state, State::Closed) {
            State::Open(mut client) => {
                tracing::debug!(hash = %self.hash, "redis connection closed");
                client.close()
            }
            State::Closed => Err(StoreError::NotOpen),
        }
    }
}
