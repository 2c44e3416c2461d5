use crate::api::{CommunityApi, PublicApi, PublicOverview};
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use teranga_shared::Community;

/// 学生首页：展示公开的培训、活动、服务与社区
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    let (overview, set_overview) = signal(PublicOverview::default());
    let (loading, set_loading) = signal(true);

    let api = PublicApi::new(auth.client());
    spawn_local(async move {
        // 单个列表失败时降级为空列表
        let data = api.overview().await;
        let _ = set_overview.try_set(data);
        let _ = set_loading.try_set(false);
    });

    let (communities, set_communities) = signal(Vec::<Community>::new());
    let community_api = CommunityApi::new(auth.client());
    spawn_local(async move {
        match community_api.list().await {
            Ok(list) => {
                let visible = list.into_iter().filter(|c| c.is_approved && c.is_active).collect();
                let _ = set_communities.try_set(visible);
            }
            Err(e) => log::warn!("[Home] Failed to load communities: {}", e),
        }
    });

    let greeting = move || {
        auth.state.with(|s| {
            s.user
                .as_ref()
                .map(|u| format!("Bienvenue, {} !", u.full_name))
                .unwrap_or_else(|| "Bienvenue !".to_string())
        })
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />
            <div class="max-w-7xl mx-auto space-y-8 p-4 md:p-8">
                <div>
                    <h2 class="text-2xl font-bold">{greeting}</h2>
                    <p class="text-base-content/70 text-sm">"Découvrez les formations, événements et services de Campus Téranga."</p>
                </div>

                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                >
                    <section class="space-y-4">
                        <h3 class="text-xl font-semibold">"Formations"</h3>
                        <Show
                            when=move || overview.with(|o| !o.formations.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"Aucune formation disponible."</p> }
                        >
                            <div class="grid gap-4 md:grid-cols-3">
                                <For
                                    each=move || overview.with(|o| o.formations.clone())
                                    key=|f| f.id.clone()
                                    children=|formation| view! {
                                        <div class="card bg-base-100 shadow">
                                            <div class="card-body">
                                                <h4 class="card-title">{formation.title.clone()}</h4>
                                                <p class="text-sm text-base-content/70">{formation.description.clone()}</p>
                                                <div class="card-actions">
                                                    <span class="badge badge-primary badge-outline">{formation.level.clone()}</span>
                                                    <span class="badge badge-ghost">{formation.duration.clone()}</span>
                                                </div>
                                            </div>
                                        </div>
                                    }
                                />
                            </div>
                        </Show>
                    </section>

                    <section class="space-y-4">
                        <h3 class="text-xl font-semibold">"Événements à venir"</h3>
                        <Show
                            when=move || overview.with(|o| !o.events.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"Aucun événement prévu."</p> }
                        >
                            <div class="grid gap-4 md:grid-cols-3">
                                <For
                                    each=move || overview.with(|o| o.events.clone())
                                    key=|e| e.id.clone()
                                    children=|event| view! {
                                        <div class="card bg-base-100 shadow">
                                            <div class="card-body">
                                                <h4 class="card-title">{event.title.clone()}</h4>
                                                <p class="text-sm">{event.date.clone()} " " {event.time.clone()}</p>
                                                <p class="text-sm text-base-content/70">{event.description.clone()}</p>
                                                <div class="card-actions">
                                                    {if event.is_free {
                                                        view! { <span class="badge badge-success">"Gratuit"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge-warning">"Payant"</span> }.into_any()
                                                    }}
                                                </div>
                                            </div>
                                        </div>
                                    }
                                />
                            </div>
                        </Show>
                    </section>

                    <section class="space-y-4">
                        <h3 class="text-xl font-semibold">"Services"</h3>
                        <Show
                            when=move || overview.with(|o| !o.services.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"Aucun service disponible."</p> }
                        >
                            <ul class="menu bg-base-100 rounded-box shadow">
                                <For
                                    each=move || overview.with(|o| o.services.clone())
                                    key=|s| s.id.clone()
                                    children=|service| view! {
                                        <li>
                                            <div class="flex flex-col items-start">
                                                <span class="font-semibold">{service.title.clone()}</span>
                                                <span class="text-sm text-base-content/70">{service.description.clone()}</span>
                                            </div>
                                        </li>
                                    }
                                />
                            </ul>
                        </Show>
                    </section>

                    <section class="space-y-4">
                        <h3 class="text-xl font-semibold">"Communautés"</h3>
                        <Show
                            when=move || communities.with(|c| !c.is_empty())
                            fallback=|| view! { <p class="text-base-content/50">"Aucune communauté pour le moment."</p> }
                        >
                            <div class="grid gap-4 md:grid-cols-3">
                                <For
                                    each=move || communities.get()
                                    key=|c| c.id.clone()
                                    children=|community| view! {
                                        <div class="card bg-base-100 shadow">
                                            <div class="card-body">
                                                <h4 class="card-title">{community.name.clone()}</h4>
                                                <p class="text-sm text-base-content/70">{community.description.clone()}</p>
                                                <div class="card-actions justify-between items-center">
                                                    <span class="badge badge-ghost">{format!("{} membres", community.members.len())}</span>
                                                    <Link to=AppRoute::Community(community.id.clone()) class="btn btn-sm btn-primary">"Voir"</Link>
                                                </div>
                                            </div>
                                        </div>
                                    }
                                />
                            </div>
                        </Show>
                    </section>
                </Show>
            </div>
        </div>
    }
}
