use crate::auth::{login, use_auth};
use crate::components::protected::LoadingScreen;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (phone, set_phone) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_loading = move || auth.state.with(|s| s.is_loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        // 提交中禁止重复提交
        if is_submitting.get_untracked() {
            return;
        }
        if phone.get_untracked().trim().is_empty() || password.get_untracked().is_empty() {
            set_error_msg.set(Some("Veuillez remplir tous les champs".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match login(&auth, phone.get_untracked(), password.get_untracked()).await {
                Ok(user) => router.go(AppRoute::landing_for(user.role)),
                Err(e) => {
                    // 页面可能已卸载，忽略过期结果
                    let _ = set_error_msg.try_set(Some(e.user_message()));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    view! {
        <Show when=move || !is_loading() fallback=|| view! { <LoadingScreen /> }>
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <h1 class="text-3xl font-bold">"Campus Téranga"</h1>
                        <p class="text-base-content/70">"Connectez-vous à votre compte"</p>
                    </div>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <div class="form-control">
                                <label class="label" for="phoneNumber">
                                    <span class="label-text">"Numéro de téléphone"</span>
                                </label>
                                <input
                                    id="phoneNumber"
                                    type="tel"
                                    placeholder="+221 77 123 45 67"
                                    on:input=move |ev| set_phone.set(event_target_value(&ev))
                                    prop:value=phone
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="password">
                                    <span class="label-text">"Mot de passe"</span>
                                </label>
                                <input
                                    id="password"
                                    type="password"
                                    placeholder="••••••••"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered"
                                    required
                                />
                            </div>
                            <div class="form-control mt-6">
                                <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() {
                                        view! { <span class="loading loading-spinner"></span> "Connexion..." }.into_any()
                                    } else {
                                        "Se connecter".into_any()
                                    }}
                                </button>
                            </div>
                            <p class="text-sm text-center mt-2">
                                "Pas encore de compte ? "
                                <Link to=AppRoute::Register class="link link-primary">"Créer un compte"</Link>
                            </p>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
