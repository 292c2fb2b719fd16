//! 测试用的内存版远端，语义与 redis hash 一致

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::core::StoreError;
use super::info::ConnectionInfo;
use super::redis_client::{Command, Dialer, RemoteClient, Reply};

type Buckets = Arc<Mutex<HashMap<String, HashMap<String, Reply>>>>;

/// 所有由同一个 MemoryDialer 拨出的连接共享一份数据，模拟同一个远端
#[derive(Clone, Default)]
pub struct MemoryDialer {
    buckets: Buckets,
    refuse: Arc<Mutex<Option<String>>>,
}

impl MemoryDialer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 之后的拨号全部失败
    pub fn refuse(&self, reason: &str) {
        *self.refuse.lock().unwrap() = Some(reason.to_string());
    }

    /// 直接写入任意回复，模拟远端数据被其它客户端写成了非预期类型
    pub fn inject(&self, hash: &str, field: &str, reply: Reply) {
        self.buckets
            .lock()
            .unwrap()
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), reply);
    }

    pub fn field_count(&self, hash: &str) -> usize {
        self.buckets
            .lock()
            .unwrap()
            .get(hash)
            .map_or(0, |bucket| bucket.len())
    }
}

impl Dialer for MemoryDialer {
    fn dial(&self, _info: &ConnectionInfo) -> Result<Box<dyn RemoteClient>, StoreError> {
        if let Some(reason) = self.refuse.lock().unwrap().clone() {
            return Err(StoreError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                reason,
            )));
        }
        Ok(Box::new(MemoryClient {
            buckets: Arc::clone(&self.buckets),
            closed: false,
        }))
    }
}

pub struct MemoryClient {
    buckets: Buckets,
    closed: bool,
}

impl RemoteClient for MemoryClient {
    fn call(&mut self, command: Command<'_>) -> Result<Reply, StoreError> {
        if self.closed {
            return Err(StoreError::transport(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "use of closed connection",
            )));
        }

        let mut buckets = self.buckets.lock().unwrap();
        let reply = match command {
            Command::HSet { hash, field, value } => {
                let bucket = buckets.entry(hash.to_string()).or_default();
                let created = bucket
                    .insert(field.to_string(), Reply::Bytes(value.to_vec()))
                    .is_none();
                Reply::Integer(created as i64)
            }
            Command::HGet { hash, field } => buckets
                .get(hash)
                .and_then(|bucket| bucket.get(field))
                .cloned()
                .unwrap_or(Reply::Nil),
            Command::HDel { hash, field } => {
                let removed = buckets
                    .get_mut(hash)
                    .and_then(|bucket| bucket.remove(field))
                    .is_some();
                if buckets.get(hash).map_or(false, |bucket| bucket.is_empty()) {
                    buckets.remove(hash);
                }
                Reply::Integer(removed as i64)
            }
        };
        Ok(reply)
    }

    fn close(&mut self) -> Result<(), StoreError> {
        self.closed = true;
        Ok(())
    }
}
