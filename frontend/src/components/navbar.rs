use crate::auth::{logout, use_auth};
use crate::config::AppConfig;
use crate::web::route::{AdminSection, AppRoute};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

/// 顶部导航栏：应用名称、当前用户与角色、导航链接与注销
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let app_name = use_context::<AppConfig>()
        .map(|c| c.app_name)
        .unwrap_or_else(|| AppConfig::default().app_name);

    let user_name = move || auth.state.with(|s| s.user.as_ref().map(|u| u.full_name.clone()).unwrap_or_default());
    let initials = move || auth.state.with(|s| s.user.as_ref().map(|u| u.initials()).unwrap_or_default());
    let role_label = move || auth.state.with(|s| s.user.as_ref().map(|u| u.role.label()).unwrap_or_default());
    let is_admin = move || auth.state.with(|s| s.user.as_ref().is_some_and(|u| u.role.is_admin()));

    let on_logout = move |_| {
        logout(&auth);
        router.go(AppRoute::Login);
    };

    view! {
        <div class="navbar bg-base-100 shadow-xl">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Home class="btn btn-ghost text-xl">{app_name}</Link>
                <Show when=is_admin>
                    <Link to=AppRoute::Dashboard class="btn btn-ghost btn-sm">"Tableau de bord"</Link>
                    {AdminSection::ALL
                        .into_iter()
                        .map(|section| view! {
                            <Link to=AppRoute::Admin(section) class="btn btn-ghost btn-sm hidden lg:inline-flex">{section.label()}</Link>
                        })
                        .collect_view()}
                </Show>
            </div>
            <div class="flex-none gap-2">
                <div class="hidden md:flex flex-col items-end mr-2">
                    <span class="font-semibold text-sm">{user_name}</span>
                    <span class="badge badge-neutral badge-sm">{role_label}</span>
                </div>
                <div class="dropdown dropdown-end">
                    <div tabindex="0" role="button" class="btn btn-ghost btn-circle avatar placeholder">
                        <div class="bg-primary text-primary-content rounded-full w-10">
                            <span>{initials}</span>
                        </div>
                    </div>
                    <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                        <li>
                            <Link to=AppRoute::ProfileEdit>"Modifier mon profil"</Link>
                        </li>
                        <li>
                            <a on:click=on_logout class="text-error hover:bg-error/10">"Déconnexion"</a>
                        </li>
                    </ul>
                </div>
            </div>
        </div>
    }
}
