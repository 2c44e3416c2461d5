//! 集成测试共享的测试上下文：脚本化的 HTTP 传输、内存令牌存储与操作日志

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use teranga_console::client::ApiClient;
use teranga_console::error::{ApiError, ApiResult};
use teranga_console::session::{RolePolicy, Session, SessionState};
use teranga_console::web::http::{HttpRequest, HttpResponse, HttpTransport};
use teranga_console::web::storage::{MemoryTokenStore, TokenStore};

pub const BASE_URL: &str = "https://api.teranga.test/api";

pub struct TestContext {
    /// 请求日志，形如 "GET /auth/me"
    pub log: RefCell<Vec<String>>,
    /// 每个 "METHOD path" 的预设响应，按顺序消费
    scripts: RefCell<HashMap<String, VecDeque<ApiResult<HttpResponse>>>>,
    /// 收到的完整请求
    pub requests: RefCell<Vec<HttpRequest>>,
    /// 失效事件次数
    pub invalidations: Cell<usize>,
    /// 会话监听器观察到的快照
    pub snapshots: RefCell<Vec<SessionState>>,
}

impl TestContext {
    fn new() -> Self {
        Self {
            log: RefCell::new(Vec::new()),
            scripts: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            invalidations: Cell::new(0),
            snapshots: RefCell::new(Vec::new()),
        }
    }

    pub fn respond(&self, method: &str, path: &str, status: u16, body: &str) {
        self.scripts
            .borrow_mut()
            .entry(format!("{} {}", method, path))
            .or_default()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn fail(&self, method: &str, path: &str, message: &str) {
        self.scripts
            .borrow_mut()
            .entry(format!("{} {}", method, path))
            .or_default()
            .push_back(Err(ApiError::Network(message.to_string())));
    }

    pub fn calls(&self, entry: &str) -> usize {
        self.log.borrow().iter().filter(|l| *l == entry).count()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

struct ScriptedTransport {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let path = req.url.strip_prefix(BASE_URL).unwrap_or(&req.url).to_string();
        let entry = format!("{} {}", req.method.as_str(), path);
        self.ctx.log.borrow_mut().push(entry.clone());
        self.ctx.requests.borrow_mut().push(req);

        self.ctx
            .scripts
            .borrow_mut()
            .get_mut(&entry)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Err(ApiError::Network(format!("no scripted response for {}", entry))))
    }
}

/// 组装好的被测环境
pub struct Harness {
    pub ctx: Rc<TestContext>,
    pub store: MemoryTokenStore,
    pub client: ApiClient,
    pub session: Session,
}

impl Harness {
    pub fn new(policy: RolePolicy) -> Self {
        Self::build(policy, MemoryTokenStore::new())
    }

    pub fn with_token(policy: RolePolicy, token: &str) -> Self {
        Self::build(policy, MemoryTokenStore::with_token(token))
    }

    fn build(policy: RolePolicy, store: MemoryTokenStore) -> Self {
        let ctx = Rc::new(TestContext::new());
        let client = ApiClient::new(
            BASE_URL,
            Rc::new(ScriptedTransport { ctx: ctx.clone() }),
            Rc::new(store.clone()),
        );

        let counter = ctx.clone();
        client.on_invalidated(move || counter.invalidations.set(counter.invalidations.get() + 1));

        let session = Session::new(client.clone(), policy);
        let observer = ctx.clone();
        session.subscribe(move |state| observer.snapshots.borrow_mut().push(state.clone()));

        Self {
            ctx,
            store,
            client,
            session,
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.load()
    }
}

pub fn user_json(id: &str, full_name: &str, role: &str) -> String {
    format!(
        r#"{{"_id":"{}","fullName":"{}","phoneNumber":"+221771234567","role":"{}","isActive":true}}"#,
        id, full_name, role
    )
}

pub fn login_json(token: &str, id: &str, role: &str) -> String {
    format!(
        r#"{{"token":"{}","user":{}}}"#,
        token,
        user_json(id, "Moussa Diop", role)
    )
}
