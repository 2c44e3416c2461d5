//! 令牌存储端口
//!
//! 会话只通过 `TokenStore` 访问持久化令牌，不直接接触浏览器存储，
//! 从而可以在非浏览器环境中测试。

use std::cell::RefCell;
use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};

use crate::error::{ApiError, ApiResult};

/// 单一令牌槽位
pub trait TokenStore {
    /// 读取令牌；不存在或读取失败时返回 `None`
    fn load(&self) -> Option<String>;

    /// 写入令牌
    fn save(&self, token: &str) -> ApiResult<()>;

    /// 删除令牌（不存在时也视为成功）
    fn clear(&self);
}

/// 基于浏览器 LocalStorage 的实现
#[derive(Debug, Clone)]
pub struct BrowserTokenStore {
    key: String,
}

impl BrowserTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get::<String>(&self.key)
            .ok()
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        LocalStorage::set(&self.key, token).map_err(|e| ApiError::Storage(e.to_string()))
    }

    fn clear(&self) {
        LocalStorage::delete(&self.key);
    }
}

/// 内存实现，克隆后共享同一个槽位
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        *store.slot.borrow_mut() = Some(token.to_string());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn save(&self, token: &str) -> ApiResult<()> {
        *self.slot.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_shares_slot_between_clones() {
        let store = MemoryTokenStore::new();
        let other = store.clone();
        assert_eq!(store.load(), None);

        store.save("abc").unwrap();
        assert_eq!(other.load().as_deref(), Some("abc"));

        other.clear();
        assert_eq!(store.load(), None);
        // 重复清除无副作用
        store.clear();
        assert_eq!(store.load(), None);
    }
}
