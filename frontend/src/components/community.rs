use crate::api::CommunityApi;
use crate::auth::use_auth;
use crate::components::navbar::Navbar;
use leptos::prelude::*;
use leptos::task::spawn_local;
use teranga_shared::Community;

/// 社区未获批准时的提示
const UNAVAILABLE: &str = "Cette communauté n'est pas disponible pour le moment.";

#[derive(Clone, Debug, PartialEq)]
enum Load {
    Loading,
    Ready(Community),
    Failed(String),
}

#[component]
pub fn CommunityPage(id: String) -> impl IntoView {
    let auth = use_auth();
    let api = StoredValue::new_local(CommunityApi::new(auth.client()));
    let id = StoredValue::new(id);

    let (community, set_community) = signal(Load::Loading);
    let (is_joining, set_is_joining) = signal(false);
    let (notice, set_notice) = signal(Option::<String>::None);

    let fetch = move || {
        let api = api.get_value();
        let id = id.get_value();
        spawn_local(async move {
            let next = match api.get(&id).await {
                Ok(c) if !c.is_approved => Load::Failed(UNAVAILABLE.to_string()),
                Ok(c) => Load::Ready(c),
                Err(e) => Load::Failed(e.user_message()),
            };
            let _ = set_community.try_set(next);
        });
    };

    fetch();

    let is_member = move || {
        let user_id = auth.state.with(|s| s.user.as_ref().map(|u| u.id.clone()));
        community.with(|c| match (c, user_id) {
            (Load::Ready(c), Some(uid)) => c.has_member(&uid),
            _ => false,
        })
    };

    let on_join = move |_| {
        if is_joining.get_untracked() {
            return;
        }
        set_is_joining.set(true);
        set_notice.set(None);
        let api = api.get_value();
        let id = id.get_value();
        spawn_local(async move {
            match api.join(&id).await {
                Ok(()) => {
                    let _ = set_notice.try_set(Some("Vous avez rejoint la communauté !".to_string()));
                    fetch();
                }
                Err(e) => {
                    let _ = set_notice.try_set(Some(e.user_message()));
                }
            }
            let _ = set_is_joining.try_set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />
            <div class="max-w-4xl mx-auto p-4 md:p-8">
                {move || match community.get() {
                    Load::Loading => view! {
                        <div class="flex justify-center py-12">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }.into_any(),
                    Load::Failed(message) => view! {
                        <div role="alert" class="alert alert-info">
                            <span>{message}</span>
                        </div>
                    }.into_any(),
                    Load::Ready(c) => {
                        let member_count = c.members.len();
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <div class="flex items-start justify-between gap-4">
                                        <div>
                                            <h2 class="card-title text-2xl">{c.name.clone()}</h2>
                                            <span class="badge badge-outline">{c.category.clone()}</span>
                                        </div>
                                        {move || if is_member() {
                                            view! { <span class="badge badge-success">"Membre"</span> }.into_any()
                                        } else {
                                            view! {
                                                <button class="btn btn-primary" on:click=on_join disabled=move || is_joining.get()>
                                                    {move || if is_joining.get() { "Adhésion..." } else { "Rejoindre" }}
                                                </button>
                                            }.into_any()
                                        }}
                                    </div>
                                    <p class="text-base-content/70">{c.description.clone()}</p>
                                    <p class="text-sm">{format!("{} membre(s)", member_count)}</p>

                                    <Show when=move || notice.get().is_some()>
                                        <div class="alert text-sm py-2">
                                            <span>{move || notice.get().unwrap_or_default()}</span>
                                        </div>
                                    </Show>

                                    <div class="divider">"Publications"</div>
                                    {if c.posts.is_empty() {
                                        view! { <p class="text-base-content/50">"Aucune publication pour le moment."</p> }.into_any()
                                    } else {
                                        c.posts
                                            .iter()
                                            .map(|post| {
                                                let author = post
                                                    .author
                                                    .as_ref()
                                                    .and_then(|a| a.display_name())
                                                    .unwrap_or("Anonyme")
                                                    .to_string();
                                                view! {
                                                    <div class="p-4 rounded-box bg-base-200 mb-2">
                                                        <p class="font-semibold text-sm">{author}</p>
                                                        <p>{post.content.clone()}</p>
                                                    </div>
                                                }
                                            })
                                            .collect_view()
                                            .into_any()
                                    }}
                                </div>
                            </div>
                        }.into_any()
                    }
                }}
            </div>
        </div>
    }
}
