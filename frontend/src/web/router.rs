//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 守卫判断委托给 `route::guard_decision`。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Access, AppRoute, GuardDecision, guard_decision};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    Replace,
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；会话快照以信号形式注入，与认证模块解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    access: Signal<Access>,
}

impl RouterService {
    fn new(access: Signal<Access>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            access,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到路径 (pushState)
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), HistoryMode::Push);
    }

    /// 导航到路由 (pushState)
    pub fn go(&self, route: AppRoute) {
        self.navigate_to_route(route, HistoryMode::Push);
    }

    /// 重定向 (replaceState)，已在目标路由时不做任何事
    pub fn redirect(&self, route: AppRoute) {
        if self.current_route.get_untracked() == route {
            return;
        }
        log::info!("[Router] Redirecting to {}.", route);
        self.apply(route, HistoryMode::Replace);
    }

    fn apply(&self, route: AppRoute, mode: HistoryMode) {
        let path = route.to_path();
        match mode {
            HistoryMode::Push => push_history_state(&path),
            HistoryMode::Replace => replace_history_state(&path),
        }
        self.set_route.set(route);
    }

    /// **核心方法：导航与守卫**
    ///
    /// 水合期间 (Pending) 照常切换到目标路由，由页面守卫显示等待状态，
    /// 待会话确定后由 `setup_access_redirect` 重新评估。
    fn navigate_to_route(&self, target: AppRoute, mode: HistoryMode) {
        match guard_decision(&target, self.access.get_untracked()) {
            GuardDecision::Redirect(redirect) => {
                log::info!("[Router] Access to {} denied, redirecting to {}.", target, redirect);
                self.apply(redirect, mode);
            }
            GuardDecision::Pending | GuardDecision::Render => self.apply(target, mode),
        }
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑，浏览器已更新地址，重定向使用 replace
            match guard_decision(&target, router.access.get_untracked()) {
                GuardDecision::Redirect(redirect) => router.apply(redirect, HistoryMode::Replace),
                _ => router.set_route.set(target),
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话快照变化时（水合完成、登录、登出、401 失效）重新评估当前路由
    fn setup_access_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let access = router.access.get();
            let route = router.current_route.get_untracked();
            if let GuardDecision::Redirect(target) = guard_decision(&route, access) {
                log::info!(
                    "[Router] Access changed (authenticated: {}), leaving {}.",
                    access.is_authenticated(),
                    route
                );
                router.redirect(target);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(access: Signal<Access>) -> RouterService {
    let router = RouterService::new(access);

    router.init_popstate_listener();
    router.setup_access_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 会话快照信号
    access: Signal<Access>,
    children: Children,
) -> impl IntoView {
    provide_router(access);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，拦截点击改为客户端导航
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.go(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
