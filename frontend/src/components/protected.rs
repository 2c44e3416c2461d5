use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::route::{AppRoute, GuardDecision, guard_decision};
use crate::web::router::use_router;

/// 全屏等待状态
#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 受保护页面的守卫
///
/// - 水合中：只显示等待状态，不渲染内容也不重定向
/// - 不满足访问级别：请求路由服务重定向
/// - 满足：渲染子组件
///
/// 会话快照任何变化（例如页面仍挂载时登出）都会重新评估。
#[component]
pub fn ProtectedRoute(route: AppRoute, children: ChildrenFn) -> impl IntoView {
    let access = use_auth().access_signal();
    let router = use_router();

    let decision = Memo::new(move |_| guard_decision(&route, access.get()));

    Effect::new(move |_| {
        if let GuardDecision::Redirect(target) = decision.get() {
            router.redirect(target);
        }
    });

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Pending | GuardDecision::Redirect(_) => view! { <LoadingScreen /> }.into_any(),
    }
}
