//! 会话核心
//!
//! 进程内唯一的"当前调用者是谁"的事实来源。与 UI 框架无关：
//! Leptos 层通过 `subscribe` 把状态镜像到信号中。
//!
//! 不变量：
//! - `is_authenticated` 永远由 `current_user` 推导，不单独存储
//! - 重新水合 (rehydrate) 每个 `Session` 最多执行一次，结束时 `is_loading` 置为 false
//! - 任何状态变更都在触发它的异步操作返回之前同步通知所有订阅者

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use teranga_shared::protocol::{LoginResponse, RegisterRequest};
use teranga_shared::{Role, User};

use crate::api::AuthApi;
use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::web::storage::TokenStore;

const MIN_PASSWORD_LEN: usize = 8;

// =========================================================
// 角色策略
// =========================================================

/// 登录时接受哪些角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RolePolicy {
    /// 面向所有用户：任何角色都可以登录
    #[default]
    AnyRole,
    /// 仅管理后台：只接受 admin / super_admin
    AdminOnly,
}

impl RolePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "any" | "any_role" => Some(RolePolicy::AnyRole),
            "admin_only" | "admin" => Some(RolePolicy::AdminOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RolePolicy::AnyRole => "any",
            RolePolicy::AdminOnly => "admin_only",
        }
    }

    pub fn admits(&self, role: Role) -> bool {
        match self {
            RolePolicy::AnyRole => true,
            RolePolicy::AdminOnly => role.is_admin(),
        }
    }
}

// =========================================================
// 状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub current_user: Option<User>,
    /// 仅在启动水合期间为 true
    pub is_loading: bool,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user.as_ref().map(|u| u.role)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_user: None,
            is_loading: true,
        }
    }
}

// =========================================================
// 注册表单
// =========================================================

/// 注册表单的原始输入
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// 提示性的本地校验；通过后转换为请求体。最终结果以后端为准。
    pub fn validate(&self) -> ApiResult<RegisterRequest> {
        if self.full_name.trim().is_empty() {
            return Err(ApiError::Validation("Le nom complet est requis".into()));
        }
        if self.phone_number.trim().is_empty() {
            return Err(ApiError::Validation(
                "Le numéro de téléphone est requis".into(),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ApiError::Validation(
                "Les mots de passe ne correspondent pas".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Le mot de passe doit contenir au moins {} caractères",
                MIN_PASSWORD_LEN
            )));
        }

        let email = self.email.trim();
        Ok(RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            email: (!email.is_empty()).then(|| email.to_string()),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
        })
    }
}

// =========================================================
// Session
// =========================================================

type Listener = Rc<dyn Fn(&SessionState)>;

struct SessionInner {
    auth: AuthApi,
    store: Rc<dyn TokenStore>,
    policy: RolePolicy,
    state: RefCell<SessionState>,
    listeners: RefCell<Vec<Listener>>,
    rehydration_started: Cell<bool>,
}

/// 可注入的会话句柄；克隆共享同一份状态
#[derive(Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

impl Session {
    /// 基于客户端创建会话，并订阅客户端的 401 失效事件
    pub fn new(client: ApiClient, policy: RolePolicy) -> Self {
        let inner = Rc::new(SessionInner {
            auth: AuthApi::new(client.clone()),
            store: client.token_store(),
            policy,
            state: RefCell::new(SessionState::default()),
            listeners: RefCell::new(Vec::new()),
            rehydration_started: Cell::new(false),
        });

        // 弱引用，避免 client -> listener -> session -> client 的循环
        let weak = Rc::downgrade(&inner);
        client.on_invalidated(move || {
            if let Some(inner) = weak.upgrade() {
                Session { inner }.handle_invalidated();
            }
        });

        Self { inner }
    }

    // --- 读取 ---

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.borrow().current_user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn policy(&self) -> RolePolicy {
        self.inner.policy
    }

    /// 订阅状态变更；回调在变更发生时同步执行
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn mutate(&self, f: impl FnOnce(&mut SessionState)) {
        f(&mut self.inner.state.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.state();
        let listeners: Vec<Listener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }

    // --- 操作 ---

    /// 启动时用持久化令牌恢复用户。只执行一次，不自动重试。
    pub async fn rehydrate(&self) {
        if self.inner.rehydration_started.replace(true) {
            log::debug!("[Session] Rehydration already ran, ignoring.");
            return;
        }

        let Some(token) = self.inner.store.load() else {
            log::info!("[Session] No stored token, starting anonymous.");
            self.mutate(|state| state.is_loading = false);
            return;
        };

        log::info!("[Session] Stored token found, rehydrating principal.");
        match self.inner.auth.me().await {
            Ok(user) => {
                log::info!("[Session] Rehydrated as {} ({}).", user.id, user.role);
                self.mutate(|state| {
                    // 水合期间若已通过登录建立会话，以登录结果为准
                    if state.current_user.is_none() {
                        state.current_user = Some(user);
                    }
                    state.is_loading = false;
                });
            }
            Err(e) => {
                log::warn!("[Session] Rehydration failed: {}", e);
                // 只清除本次使用的令牌，不误删期间新写入的令牌
                if self.inner.store.load().as_deref() == Some(token.as_str()) {
                    self.inner.store.clear();
                }
                self.mutate(|state| state.is_loading = false);
            }
        }
    }

    /// 登录。被拒绝时不修改任何状态。
    pub async fn login(&self, phone_number: &str, password: &str) -> ApiResult<User> {
        let LoginResponse { token, user } = self
            .inner
            .auth
            .login(phone_number, password)
            .await
            .inspect_err(|e| log::info!("[Session] Login rejected by backend: {}", e))?;

        if !self.inner.policy.admits(user.role) {
            log::warn!(
                "[Session] Login refused: role '{}' not allowed under '{}' policy.",
                user.role,
                self.inner.policy.as_str()
            );
            return Err(ApiError::RoleNotAllowed(user.role));
        }
        if token.trim().is_empty() {
            return Err(ApiError::Malformed("login response without token".into()));
        }

        self.inner.store.save(&token)?;
        log::info!("[Session] Logged in as {} ({}).", user.id, user.role);
        let accepted = user.clone();
        self.mutate(|state| state.current_user = Some(accepted));
        Ok(user)
    }

    /// 注册；不会自动登录
    pub async fn register(&self, form: &RegistrationForm) -> ApiResult<()> {
        let req = form.validate()?;
        self.inner.auth.register(&req).await?;
        log::info!("[Session] Account created, awaiting explicit login.");
        Ok(())
    }

    /// 纯本地操作：丢弃令牌与用户，不请求后端
    pub fn logout(&self) {
        self.inner.store.clear();
        self.mutate(|state| state.current_user = None);
        log::info!("[Session] Logged out.");
    }

    /// 资料编辑往返完成后整体替换用户快照，令牌不变
    pub fn update_user(&self, user: User) {
        self.mutate(|state| state.current_user = Some(user));
    }

    fn handle_invalidated(&self) {
        if self.is_authenticated() {
            log::warn!("[Session] Session invalidated by backend, clearing principal.");
            self.mutate(|state| state.current_user = None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            full_name: "  Aïda Ndiaye ".into(),
            phone_number: "+221771234567".into(),
            email: "   ".into(),
            password: "motdepasse".into(),
            confirm_password: "motdepasse".into(),
        }
    }

    #[test]
    fn test_policy_admission() {
        assert!(RolePolicy::AnyRole.admits(Role::User));
        assert!(RolePolicy::AnyRole.admits(Role::SuperAdmin));
        assert!(!RolePolicy::AdminOnly.admits(Role::User));
        assert!(RolePolicy::AdminOnly.admits(Role::Admin));
        assert!(RolePolicy::AdminOnly.admits(Role::SuperAdmin));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(RolePolicy::parse("ANY"), Some(RolePolicy::AnyRole));
        assert_eq!(RolePolicy::parse(" admin_only "), Some(RolePolicy::AdminOnly));
        assert_eq!(RolePolicy::parse("nobody"), None);
    }

    #[test]
    fn test_default_state_is_pending() {
        let state = SessionState::default();
        assert!(state.is_loading);
        assert!(!state.is_authenticated());
        assert_eq!(state.role(), None);
    }

    #[test]
    fn test_registration_form_normalizes() {
        let req = form().validate().unwrap();
        assert_eq!(req.full_name, "Aïda Ndiaye");
        assert_eq!(req.email, None);
    }

    #[test]
    fn test_registration_password_mismatch_checked_first() {
        let mut f = form();
        f.password = "court".into();
        f.confirm_password = "autre".into();
        assert_eq!(
            f.validate().unwrap_err(),
            ApiError::Validation("Les mots de passe ne correspondent pas".into())
        );
    }

    #[test]
    fn test_registration_password_length_counts_chars() {
        let mut f = form();
        // 7 个字符，但 UTF-8 字节数超过 8
        f.password = "éééééé1".into();
        f.confirm_password = f.password.clone();
        assert!(matches!(f.validate(), Err(ApiError::Validation(_))));

        f.password = "éééééé12".into();
        f.confirm_password = f.password.clone();
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_registration_requires_name_and_phone() {
        let mut f = form();
        f.full_name = " ".into();
        assert!(f.validate().is_err());

        let mut f = form();
        f.phone_number = String::new();
        assert!(f.validate().is_err());
    }
}
