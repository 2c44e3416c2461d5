use std::future::Future;

use crate::api::AdminApi;
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use crate::error::{ApiError, ApiResult};
use crate::web::route::AdminSection;
use leptos::prelude::*;
use leptos::task::spawn_local;
use teranga_shared::protocol::{AdminResource, CommunityFlags};
use teranga_shared::{Community, Event, Formation, Service, User};

/// 管理列表中的一行
trait AdminRow: AdminResource + Clone + Send + Sync + 'static {
    fn row_id(&self) -> &str;
    fn primary(&self) -> String;
    fn secondary(&self) -> String;
    fn is_active(&self) -> bool;
}

impl AdminRow for User {
    fn row_id(&self) -> &str {
        &self.id
    }
    fn primary(&self) -> String {
        self.full_name.clone()
    }
    fn secondary(&self) -> String {
        format!("{} · {}", self.phone_number, self.role.label())
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl AdminRow for Event {
    fn row_id(&self) -> &str {
        &self.id
    }
    fn primary(&self) -> String {
        self.title.clone()
    }
    fn secondary(&self) -> String {
        format!("{} {}", self.date, self.time).trim().to_string()
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl AdminRow for Formation {
    fn row_id(&self) -> &str {
        &self.id
    }
    fn primary(&self) -> String {
        self.title.clone()
    }
    fn secondary(&self) -> String {
        format!("{} · {}", self.level, self.duration)
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl AdminRow for Service {
    fn row_id(&self) -> &str {
        &self.id
    }
    fn primary(&self) -> String {
        self.title.clone()
    }
    fn secondary(&self) -> String {
        self.category.clone()
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl AdminRow for Community {
    fn row_id(&self) -> &str {
        &self.id
    }
    fn primary(&self) -> String {
        self.name.clone()
    }
    fn secondary(&self) -> String {
        self.category.clone()
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
}

/// 用服务端返回的新值替换同 ID 的行；找不到时保持不变
fn replace_row<T: AdminRow>(rows: &mut [T], updated: T) {
    if let Some(slot) = rows.iter_mut().find(|r| r.row_id() == updated.row_id()) {
        *slot = updated;
    }
}

fn remove_row<T: AdminRow>(rows: &mut Vec<T>, id: &str) {
    rows.retain(|r| r.row_id() != id);
}

/// 一个管理列表页的状态
struct AdminList<T: AdminRow> {
    api: StoredValue<AdminApi, LocalStorage>,
    items: RwSignal<Vec<T>>,
    loading: RwSignal<bool>,
    notice: RwSignal<Option<String>>,
}

impl<T: AdminRow> Clone for AdminList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: AdminRow> Copy for AdminList<T> {}

impl<T: AdminRow> AdminList<T> {
    fn new() -> Self {
        Self {
            api: StoredValue::new_local(AdminApi::new(use_auth().client())),
            items: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
            notice: RwSignal::new(None),
        }
    }

    fn fail(self, e: ApiError) {
        log::warn!("[Admin] {} request failed: {}", T::COLLECTION, e);
        let _ = self.notice.try_set(Some(e.user_message()));
    }

    fn reload(self) {
        let api = self.api.get_value();
        self.loading.set(true);
        spawn_local(async move {
            match api.collection::<T>().list().await {
                Ok(rows) => {
                    let _ = self.items.try_set(rows);
                }
                Err(e) => self.fail(e),
            }
            let _ = self.loading.try_set(false);
        });
    }

    /// 执行一次部分更新并把结果写回列表
    fn run_update<F>(self, update: F)
    where
        F: Future<Output = ApiResult<T>> + 'static,
    {
        spawn_local(async move {
            match update.await {
                Ok(updated) => {
                    let _ = self.items.try_update(|rows| replace_row(rows, updated));
                }
                Err(e) => self.fail(e),
            }
        });
    }

    fn toggle_active(self, row: &T) {
        let api = self.api.get_value();
        let id = row.row_id().to_string();
        let next = !row.is_active();
        self.run_update(async move { api.set_active::<T>(&id, next).await });
    }

    fn delete(self, id: String) {
        let confirmed = window()
            .confirm_with_message("Supprimer définitivement cet élément ?")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        let api = self.api.get_value();
        spawn_local(async move {
            match api.collection::<T>().delete(&id).await {
                Ok(()) => {
                    let _ = self.items.try_update(|rows| remove_row(rows, &id));
                }
                Err(e) => self.fail(e),
            }
        });
    }

    fn frame(self, section: AdminSection, table: AnyView) -> impl IntoView {
        view! {
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <div class="max-w-7xl mx-auto space-y-8 p-4 md:p-8">
                    <Show when=move || self.notice.get().is_some()>
                        <div role="alert" class="alert alert-warning shadow-lg">
                            <span>{move || self.notice.get().unwrap_or_default()}</span>
                            <button class="btn btn-sm btn-ghost" on:click=move |_| self.notice.set(None)>"✕"</button>
                        </div>
                    </Show>

                    <div class="flex items-center justify-between">
                        <h2 class="text-2xl font-bold">{section.label()}</h2>
                        <button
                            on:click=move |_| self.reload()
                            disabled=move || self.loading.get()
                            class="btn btn-ghost"
                        >
                            {move || if self.loading.get() {
                                view! { <span class="loading loading-spinner loading-sm"></span> }.into_any()
                            } else {
                                "Actualiser".into_any()
                            }}
                        </button>
                    </div>

                    <div class="card bg-base-100 shadow-xl">
                        <div class="card-body p-0">
                            <div class="overflow-x-auto w-full">{table}</div>
                            <Show when=move || !self.loading.get() && self.items.with(|rows| rows.is_empty())>
                                <p class="text-center py-8 text-base-content/50">"Aucun élément."</p>
                            </Show>
                        </div>
                    </div>
                </div>
            </div>
        }
    }
}

fn status_badge(active: bool) -> AnyView {
    if active {
        view! { <span class="badge badge-success">"Actif"</span> }.into_any()
    } else {
        view! { <span class="badge badge-ghost">"Inactif"</span> }.into_any()
    }
}

/// 用户、活动、培训、服务共用的列表：启用/停用与删除
fn resource_table<T: AdminRow>(section: AdminSection) -> AnyView {
    let list = AdminList::<T>::new();
    list.reload();

    let table = view! {
        <table class="table table-zebra w-full">
            <thead>
                <tr>
                    <th>"Nom"</th>
                    <th class="hidden md:table-cell">"Détails"</th>
                    <th>"Statut"</th>
                    <th class="text-right">"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || list.items.get()
                    key=|row| (row.row_id().to_string(), row.is_active())
                    children=move |row: T| {
                        let id = row.row_id().to_string();
                        let active = row.is_active();
                        let (primary, secondary) = (row.primary(), row.secondary());
                        view! {
                            <tr>
                                <td class="font-bold">{primary}</td>
                                <td class="hidden md:table-cell text-sm text-base-content/70">{secondary}</td>
                                <td>{status_badge(active)}</td>
                                <td class="text-right space-x-2">
                                    <button class="btn btn-xs btn-outline" on:click=move |_| list.toggle_active(&row)>
                                        {if active { "Désactiver" } else { "Activer" }}
                                    </button>
                                    <button class="btn btn-xs btn-error btn-outline" on:click=move |_| list.delete(id.clone())>
                                        "Supprimer"
                                    </button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
    .into_any();

    list.frame(section, table).into_any()
}

/// 社区审核：启用/停用、公开/私有与删除
fn communities_table() -> AnyView {
    let list = AdminList::<Community>::new();
    list.reload();

    let set_flags = move |id: String, flags: CommunityFlags| {
        let api = list.api.get_value();
        list.run_update(async move { api.set_community_flags(&id, &flags).await });
    };

    let table = view! {
        <table class="table table-zebra w-full">
            <thead>
                <tr>
                    <th>"Nom"</th>
                    <th class="hidden md:table-cell">"Catégorie"</th>
                    <th>"Membres"</th>
                    <th>"Statut"</th>
                    <th class="text-right">"Actions"</th>
                </tr>
            </thead>
            <tbody>
                <For
                    each=move || list.items.get()
                    key=|c| (c.id.clone(), c.is_active, c.is_public)
                    children=move |community: Community| {
                        let (active, public) = (community.is_active, community.is_public);
                        let (name, category) = (community.name.clone(), community.category.clone());
                        let member_count = community.members.len();
                        let toggle_id = community.id.clone();
                        let visibility_id = community.id.clone();
                        let delete_id = community.id.clone();
                        view! {
                            <tr>
                                <td class="font-bold">{name}</td>
                                <td class="hidden md:table-cell">{category}</td>
                                <td>{member_count}</td>
                                <td class="space-x-1">
                                    {status_badge(active)}
                                    <span class="badge badge-outline">{if public { "Publique" } else { "Privée" }}</span>
                                </td>
                                <td class="text-right space-x-2">
                                    <button
                                        class="btn btn-xs btn-outline"
                                        on:click=move |_| set_flags(toggle_id.clone(), CommunityFlags { is_active: Some(!active), is_public: None })
                                    >
                                        {if active { "Désactiver" } else { "Activer" }}
                                    </button>
                                    <button
                                        class="btn btn-xs btn-outline"
                                        on:click=move |_| set_flags(visibility_id.clone(), CommunityFlags { is_active: None, is_public: Some(!public) })
                                    >
                                        {if public { "Rendre privée" } else { "Rendre publique" }}
                                    </button>
                                    <button class="btn btn-xs btn-error btn-outline" on:click=move |_| list.delete(delete_id.clone())>
                                        "Supprimer"
                                    </button>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
    .into_any();

    list.frame(AdminSection::Communities, table).into_any()
}

#[component]
pub fn AdminPage(section: AdminSection) -> impl IntoView {
    match section {
        AdminSection::Users => resource_table::<User>(section),
        AdminSection::Events => resource_table::<Event>(section),
        AdminSection::Formations => resource_table::<Formation>(section),
        AdminSection::Services => resource_table::<Service>(section),
        AdminSection::Communities => communities_table(),
    }
}
