//! Campus Téranga 管理控制台
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫决策（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `client` / `api`: HTTP 客户端封装与领域门面
//! - `session`: 与框架无关的会话核心
//! - `auth`: 会话状态到 Leptos 信号的镜像
//! - `components`: UI 组件层

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod session;
mod components {
    pub mod admin;
    pub mod community;
    pub mod dashboard;
    pub mod home;
    pub mod login;
    pub mod navbar;
    pub mod profile;
    pub mod protected;
    pub mod register;
}

use std::rc::Rc;

use crate::auth::{AuthContext, init_auth, use_auth};
use crate::client::ApiClient;
use crate::components::admin::AdminPage;
use crate::components::community::CommunityPage;
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfileEditPage;
use crate::components::protected::ProtectedRoute;
use crate::components::register::RegisterPage;
use crate::config::AppConfig;
use crate::session::Session;

use leptos::prelude::*;

/// 浏览器能力的轻量封装：HTTP 传输、令牌存储、路由
pub mod web {
    pub mod http;
    pub mod route;
    pub mod router;
    pub mod storage;
}

use web::http::FetchTransport;
use web::route::AppRoute;
use web::router::{Router, RouterOutlet, use_router};
use web::storage::BrowserTokenStore;

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，受保护页面包裹在守卫中。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! {
            <ProtectedRoute route=AppRoute::Dashboard>
                <DashboardPage />
            </ProtectedRoute>
        }
        .into_any(),
        AppRoute::Admin(section) => view! {
            <ProtectedRoute route=AppRoute::Admin(section)>
                <AdminPage section=section />
            </ProtectedRoute>
        }
        .into_any(),
        AppRoute::Home => view! {
            <ProtectedRoute route=AppRoute::Home>
                <HomePage />
            </ProtectedRoute>
        }
        .into_any(),
        AppRoute::ProfileEdit => view! {
            <ProtectedRoute route=AppRoute::ProfileEdit>
                <ProfileEditPage />
            </ProtectedRoute>
        }
        .into_any(),
        AppRoute::Community(id) => {
            let route = AppRoute::Community(id.clone());
            view! {
                <ProtectedRoute route=route>
                    <CommunityPage id=id.clone() />
                </ProtectedRoute>
            }
            .into_any()
        }
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page introuvable"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 路由器内部的外壳：会话被后端判定失效时跳回登录页
#[component]
fn Shell() -> impl IntoView {
    let router = use_router();
    use_auth()
        .client()
        .on_invalidated(move || router.redirect(AppRoute::Login));

    view! { <RouterOutlet matcher=route_matcher /> }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取配置并初始化日志
    let config = AppConfig::from_env();
    logger::init(config.log_level());
    log::info!(
        "[App] {} v{} ({}) -> {}",
        config.app_name,
        config.app_version,
        config.environment,
        config.api_base_url
    );

    // 2. 组装客户端与会话
    let client = ApiClient::new(
        &config.api_base_url,
        Rc::new(FetchTransport),
        Rc::new(BrowserTokenStore::new(config.token_storage_key.clone())),
    );
    let session = Session::new(client.clone(), config.role_policy);

    // 3. 创建认证上下文
    let auth_ctx = AuthContext::new(session, client);
    provide_context(auth_ctx);
    provide_context(config);

    // 4. 启动一次性水合（从 LocalStorage 读取令牌）
    init_auth(&auth_ctx);

    // 5. 获取会话快照信号，用于注入路由服务（解耦！）
    let access = auth_ctx.access_signal();

    view! {
        <Router access=access>
            <Shell />
        </Router>
    }
}
