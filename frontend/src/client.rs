//! HTTP 客户端封装
//!
//! 所有领域 API 都经过 `ApiClient`：
//! - 自动附加持久化令牌作为 Bearer 凭据
//! - 统一解析 `{data: ...}` 信封
//! - 收到 401 时同步清除令牌，并通知所有订阅者会话已失效
//!
//! 客户端本身不做导航，导航由订阅了失效事件的应用外壳完成。

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use teranga_shared::envelope;
use teranga_shared::protocol::{ApiRequest, HttpMethod};
use teranga_shared::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

use crate::error::{ApiError, ApiResult};
use crate::web::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::web::storage::TokenStore;

const STATUS_UNAUTHORIZED: u16 = 401;

type Listener = Rc<dyn Fn()>;

/// 会话失效事件中心
#[derive(Clone, Default)]
pub struct Invalidation {
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl Invalidation {
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn notify(&self) {
        // 先复制一份，回调中可以再次订阅
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }
}

/// 请求是否携带凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Credentials {
    Bearer,
    Anonymous,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Rc<str>,
    transport: Rc<dyn HttpTransport>,
    store: Rc<dyn TokenStore>,
    invalidation: Invalidation,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Rc<dyn HttpTransport>,
        store: Rc<dyn TokenStore>,
    ) -> Self {
        Self {
            base_url: Rc::from(base_url.trim_end_matches('/')),
            transport,
            store,
            invalidation: Invalidation::default(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_store(&self) -> Rc<dyn TokenStore> {
        self.store.clone()
    }

    /// 订阅会话失效事件（任意带凭据的请求返回 401）
    pub fn on_invalidated(&self, listener: impl Fn() + 'static) {
        self.invalidation.subscribe(listener);
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    // --- 便捷方法 ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let resp = self
            .execute(HttpMethod::Get, path, None, Credentials::Bearer)
            .await?;
        decode(&resp)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = serde_json::to_string(body)?;
        let resp = self
            .execute(HttpMethod::Post, path, Some(body), Credentials::Bearer)
            .await?;
        decode(&resp)
    }

    /// POST 且忽略响应体
    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let body = serde_json::to_string(body)?;
        self.execute(HttpMethod::Post, path, Some(body), Credentials::Bearer)
            .await
            .map(|_| ())
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        let body = serde_json::to_string(body)?;
        let resp = self
            .execute(HttpMethod::Put, path, Some(body), Credentials::Bearer)
            .await?;
        decode(&resp)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute(HttpMethod::Delete, path, None, Credentials::Bearer)
            .await
            .map(|_| ())
    }

    /// 按 `ApiRequest` 的元数据发送请求
    pub async fn send_api<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let body = match R::METHOD {
            HttpMethod::Get | HttpMethod::Delete => None,
            HttpMethod::Post | HttpMethod::Put => Some(serde_json::to_string(req)?),
        };
        let credentials = if R::ANONYMOUS {
            Credentials::Anonymous
        } else {
            Credentials::Bearer
        };
        let resp = self.execute(R::METHOD, R::PATH, body, credentials).await?;
        decode(&resp)
    }

    /// 同 `send_api`，但只关心是否成功（响应体可能为空）
    pub async fn send_api_discarding<R: ApiRequest>(&self, req: &R) -> ApiResult<()> {
        let body = match R::METHOD {
            HttpMethod::Get | HttpMethod::Delete => None,
            HttpMethod::Post | HttpMethod::Put => Some(serde_json::to_string(req)?),
        };
        let credentials = if R::ANONYMOUS {
            Credentials::Anonymous
        } else {
            Credentials::Bearer
        };
        self.execute(R::METHOD, R::PATH, body, credentials)
            .await
            .map(|_| ())
    }

    // --- 核心流程 ---

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        credentials: Credentials,
    ) -> ApiResult<HttpResponse> {
        let mut req = HttpRequest::new(method, self.url(path));

        // 记下本次请求使用的令牌，401 时只作废这一个
        let sent_token = match credentials {
            Credentials::Bearer => self.store.load(),
            Credentials::Anonymous => None,
        };
        if let Some(token) = &sent_token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req
                .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
                .with_body(body);
        }

        log::debug!("[Api] {} {}", method.as_str(), path);
        let resp = self.transport.send(req).await.inspect_err(|e| {
            log::warn!("[Api] {} {} failed: {}", method.as_str(), path, e);
        })?;

        if resp.is_success() {
            return Ok(resp);
        }

        if resp.status == STATUS_UNAUTHORIZED && credentials == Credentials::Bearer {
            // 请求期间令牌已被替换（例如并发登录），新会话不受这次 401 影响
            if self.store.load() != sent_token {
                log::info!(
                    "[Api] {} {} returned 401 for a replaced token, keeping current session",
                    method.as_str(),
                    path
                );
                return Err(ApiError::Unauthorized);
            }
            log::warn!(
                "[Api] {} {} returned 401, invalidating session",
                method.as_str(),
                path
            );
            self.store.clear();
            self.invalidation.notify();
            return Err(ApiError::Unauthorized);
        }

        Err(ApiError::rejected(resp.status, &resp.body))
    }
}

fn decode<T: DeserializeOwned>(resp: &HttpResponse) -> ApiResult<T> {
    envelope::decode(&resp.body).map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::http::tests::MockTransport;
    use crate::web::storage::MemoryTokenStore;
    use std::cell::Cell;
    use teranga_shared::protocol::{LoginRequest, MeRequest};
    use teranga_shared::{Formation, User};

    fn setup(token: Option<&str>) -> (MockTransport, MemoryTokenStore, ApiClient) {
        let transport = MockTransport::new();
        let store = match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        };
        let client = ApiClient::new(
            "https://api.test/api/",
            Rc::new(transport.clone()),
            Rc::new(store.clone()),
        );
        (transport, store, client)
    }

    #[tokio::test]
    async fn test_bearer_attached_when_token_present() {
        let (transport, _, client) = setup(Some("abc"));
        transport.respond(200, "[]");

        let list: Vec<Formation> = client.get("/admin/formations").await.unwrap();
        assert!(list.is_empty());

        let req = transport.last_request().unwrap();
        assert_eq!(req.url, "https://api.test/api/admin/formations");
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.header("Content-Type"), None);
    }

    #[tokio::test]
    async fn test_no_bearer_without_token() {
        let (transport, _, client) = setup(None);
        transport.respond(200, r#"{"data":[]}"#);

        let _: Vec<Formation> = client.get("formations").await.unwrap();
        let req = transport.last_request().unwrap();
        assert_eq!(req.url, "https://api.test/api/formations");
        assert_eq!(req.header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_401_clears_token_and_notifies() {
        let (transport, store, client) = setup(Some("expired"));
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        client.on_invalidated(move || counter.set(counter.get() + 1));

        transport.respond(401, r#"{"message":"Token expired"}"#);
        let result: ApiResult<Vec<User>> = client.get("/admin/users").await;

        assert_eq!(result.unwrap_err(), ApiError::Unauthorized);
        assert_eq!(store.load(), None);
        assert_eq!(fired.get(), 1);
    }

    /// 在响应返回前写入新令牌，模拟请求期间发生的登录
    struct ReplacingTransport {
        store: MemoryTokenStore,
        replacement: &'static str,
    }

    #[async_trait::async_trait(?Send)]
    impl HttpTransport for ReplacingTransport {
        async fn send(&self, _req: HttpRequest) -> ApiResult<HttpResponse> {
            self.store.save(self.replacement)?;
            Ok(HttpResponse::new(401, r#"{"message":"Token invalide"}"#))
        }
    }

    #[tokio::test]
    async fn test_401_for_replaced_token_keeps_new_session() {
        let store = MemoryTokenStore::with_token("stale");
        let client = ApiClient::new(
            "https://api.test/api",
            Rc::new(ReplacingTransport {
                store: store.clone(),
                replacement: "fresh",
            }),
            Rc::new(store.clone()),
        );
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        client.on_invalidated(move || flag.set(true));

        let err = client.send_api(&MeRequest).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(store.load().as_deref(), Some("fresh"));
        assert!(!fired.get());
    }

    #[tokio::test]
    async fn test_other_errors_pass_through() {
        let (transport, store, client) = setup(Some("abc"));
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        client.on_invalidated(move || flag.set(true));

        transport.respond(403, r#"{"message":"Accès refusé"}"#);
        let err = client.delete("/admin/users/u1").await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Rejected {
                status: 403,
                message: "Accès refusé".to_string()
            }
        );
        assert_eq!(store.load().as_deref(), Some("abc"));
        assert!(!fired.get());
    }

    #[tokio::test]
    async fn test_anonymous_request_401_is_plain_rejection() {
        let (transport, store, client) = setup(Some("stale"));
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        client.on_invalidated(move || flag.set(true));

        transport.respond(401, r#"{"message":"Identifiants invalides"}"#);
        let err = client
            .send_api(&LoginRequest {
                phone_number: "+221770000000".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Identifiants invalides");
        assert!(!fired.get());
        assert_eq!(store.load().as_deref(), Some("stale"));

        let req = transport.last_request().unwrap();
        assert_eq!(req.header("Authorization"), None);
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.body.unwrap().contains("\"phoneNumber\""));
    }

    #[tokio::test]
    async fn test_malformed_body_is_reported() {
        let (transport, _, client) = setup(Some("abc"));
        transport.respond(200, "<html>maintenance</html>");

        let err = client.send_api(&MeRequest).await.unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_network_failure_is_not_retried() {
        let (transport, _, client) = setup(Some("abc"));
        transport.fail("connection reset");

        let err = client.send_api(&MeRequest).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(transport.request_count(), 1);
    }
}
