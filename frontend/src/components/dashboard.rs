use crate::api::AdminApi;
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use leptos::prelude::*;
use leptos::task::spawn_local;
use teranga_shared::DashboardStats;

#[component]
fn StatCard(title: &'static str, value: Signal<u64>, #[prop(into)] accent: String) -> impl IntoView {
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class=format!("stat-value {}", accent)>{move || value.get()}</div>
        </div>
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    let (stats, set_stats) = signal(DashboardStats::default());
    let (loading, set_loading) = signal(true);
    let (notification, set_notification) = signal(Option::<String>::None);

    let load_stats = move || {
        let api = AdminApi::new(auth.client());
        set_loading.set(true);
        spawn_local(async move {
            match api.stats().await {
                Ok(data) => {
                    let _ = set_stats.try_set(data);
                }
                Err(e) => {
                    // 失败时保留零值统计
                    log::warn!("[Dashboard] Failed to load stats: {}", e);
                    let _ = set_stats.try_set(DashboardStats::default());
                    let _ = set_notification.try_set(Some(e.user_message()));
                }
            }
            let _ = set_loading.try_set(false);
        });
    };

    // 初始加载
    load_stats();

    let stat = move |pick: fn(&DashboardStats) -> u64| Signal::derive(move || stats.with(pick));

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />
            <div class="max-w-7xl mx-auto space-y-8 p-4 md:p-8">
                <Show when=move || notification.get().is_some()>
                    <div role="alert" class="alert alert-warning shadow-lg">
                        <span>{move || notification.get().unwrap_or_default()}</span>
                        <button class="btn btn-sm btn-ghost" on:click=move |_| set_notification.set(None)>"✕"</button>
                    </div>
                </Show>

                <div class="flex items-center justify-between">
                    <div>
                        <h2 class="text-2xl font-bold">"Tableau de bord"</h2>
                        <p class="text-base-content/70 text-sm">"Vue d'ensemble de la plateforme."</p>
                    </div>
                    <button
                        on:click=move |_| load_stats()
                        disabled=move || loading.get()
                        class="btn btn-ghost"
                    >
                        {move || if loading.get() {
                            view! { <span class="loading loading-spinner loading-sm"></span> }.into_any()
                        } else {
                            "Actualiser".into_any()
                        }}
                    </button>
                </div>

                <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                    <StatCard title="Utilisateurs" value=stat(|s| s.total_users) accent="text-primary" />
                    <StatCard title="Utilisateurs actifs" value=stat(|s| s.active_users) accent="text-success" />
                    <StatCard title="Événements" value=stat(|s| s.total_events) accent="text-secondary" />
                    <StatCard title="Formations" value=stat(|s| s.total_formations) accent="text-accent" />
                    <StatCard title="Services" value=stat(|s| s.total_services) accent="" />
                    <StatCard title="Communautés" value=stat(|s| s.total_communities) accent="" />
                </div>

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="p-6 pb-2">
                            <h3 class="card-title">"Inscriptions récentes"</h3>
                        </div>
                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Nom"</th>
                                        <th>"Téléphone"</th>
                                        <th class="hidden md:table-cell">"Université"</th>
                                        <th>"Rôle"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || !loading.get() && stats.with(|s| s.recent_users.is_empty())>
                                        <tr>
                                            <td colspan="4" class="text-center py-8 text-base-content/50">
                                                "Aucune inscription récente."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || stats.with(|s| s.recent_users.clone())
                                        key=|u| u.id.clone()
                                        children=move |user| {
                                            view! {
                                                <tr>
                                                    <td>
                                                        <div class="flex items-center gap-3">
                                                            <div class="avatar placeholder">
                                                                <div class="bg-neutral text-neutral-content rounded-full w-8">
                                                                    <span class="text-xs">{user.initials()}</span>
                                                                </div>
                                                            </div>
                                                            <span class="font-bold">{user.full_name.clone()}</span>
                                                        </div>
                                                    </td>
                                                    <td class="font-mono text-sm">{user.phone_number.clone()}</td>
                                                    <td class="hidden md:table-cell">
                                                        {user.university.clone().unwrap_or_else(|| "-".to_string())}
                                                    </td>
                                                    <td>
                                                        <div class="badge badge-outline">{user.role.label()}</div>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
