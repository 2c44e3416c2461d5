//! 认证模块
//!
//! 把 `Session` 的状态镜像到 Leptos 信号中，供组件与路由服务读取。
//! 路由服务通过注入的 `Access` 信号检查认证状态，与本模块解耦。

use leptos::prelude::*;
use leptos::task::spawn_local;
use teranga_shared::User;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::session::{RegistrationForm, Session, SessionState};
use crate::web::route::Access;

/// 认证状态（会话状态的只读镜像）
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    /// 是否正在进行启动水合
    pub is_loading: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn access(&self) -> Access {
        Access {
            is_loading: self.is_loading,
            role: self.user.as_ref().map(|u| u.role),
        }
    }
}

impl From<&SessionState> for AuthState {
    fn from(state: &SessionState) -> Self {
        Self {
            user: state.current_user.clone(),
            is_loading: state.is_loading,
        }
    }
}

/// 认证上下文
///
/// 包含只读状态信号与会话句柄，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    session: StoredValue<Session, LocalStorage>,
    client: StoredValue<ApiClient, LocalStorage>,
}

impl AuthContext {
    /// 创建认证上下文，并订阅会话的状态变更
    pub fn new(session: Session, client: ApiClient) -> Self {
        let (state, set_state) = signal(AuthState::from(&session.state()));

        // 同步镜像：会话变更在异步操作返回前即可被所有组件观察到
        session.subscribe(move |s| set_state.set(AuthState::from(s)));

        Self {
            state,
            session: StoredValue::new_local(session),
            client: StoredValue::new_local(client),
        }
    }

    /// 获取会话快照信号（用于路由服务注入）
    pub fn access_signal(&self) -> Signal<Access> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.access()))
    }

    pub fn session(&self) -> Session {
        self.session.get_value()
    }

    /// 共享的 API 客户端，供页面构造领域门面
    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态：启动一次性水合
pub fn init_auth(ctx: &AuthContext) {
    let session = ctx.session();
    spawn_local(async move {
        session.rehydrate().await;
    });
}

/// 登录；成功时返回用户，供调用方按角色导航
pub async fn login(ctx: &AuthContext, phone_number: String, password: String) -> ApiResult<User> {
    ctx.session().login(&phone_number, &password).await
}

/// 注册（不会登录）
pub async fn register(ctx: &AuthContext, form: RegistrationForm) -> ApiResult<()> {
    ctx.session().register(&form).await
}

/// 注销并清除状态
///
/// 导航将由路由服务的会话监听自动处理。
pub fn logout(ctx: &AuthContext) {
    ctx.session().logout();
}

pub fn update_user(ctx: &AuthContext, user: User) {
    ctx.session().update_user(user);
}
