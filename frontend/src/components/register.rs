use crate::auth::{register, use_auth};
use crate::components::protected::LoadingScreen;
use crate::session::RegistrationForm;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 注册成功后跳转到登录页前的停留时间
const REDIRECT_DELAY_MS: u32 = 2_000;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let form = RwSignal::new(RegistrationForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success, set_success) = signal(false);
    // 待执行的跳转；丢弃 Timeout 即取消
    let redirect_timer = StoredValue::new_local(Option::<Timeout>::None);

    on_cleanup(move || {
        redirect_timer.try_update_value(|timer| timer.take());
    });

    let is_loading = move || auth.state.with(|s| s.is_loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_error_msg.set(None);
        set_is_submitting.set(true);

        let input = form.get_untracked();
        spawn_local(async move {
            match register(&auth, input).await {
                Ok(()) => {
                    let _ = set_success.try_set(true);
                    let timer = Timeout::new(REDIRECT_DELAY_MS, move || router.go(AppRoute::Login));
                    // 页面已卸载时 timer 在这里被丢弃，跳转不会发生
                    redirect_timer.try_update_value(|slot| *slot = Some(timer));
                }
                Err(e) => {
                    let _ = set_error_msg.try_set(Some(e.user_message()));
                }
            }
            let _ = set_is_submitting.try_set(false);
        });
    };

    // 输入变化时清除错误
    let bind = move |apply: fn(&mut RegistrationForm, String)| {
        move |ev: leptos::ev::Event| {
            let value = event_target_value(&ev);
            form.update(|f| apply(f, value));
            set_error_msg.set(None);
        }
    };

    view! {
        <Show when=move || !is_loading() fallback=|| view! { <LoadingScreen /> }>
            <div class="hero min-h-screen bg-base-200">
                <div class="hero-content flex-col w-full max-w-md">
                    <div class="text-center mb-4">
                        <h1 class="text-3xl font-bold">"Créer un compte"</h1>
                        <p class="text-base-content/70">"Commencez votre parcours avec Campus Téranga"</p>
                    </div>

                    <Show when=move || success.get()>
                        <div role="status" class="alert alert-success text-sm">
                            <span>"Inscription réussie ! Redirection vers la connexion..."</span>
                        </div>
                    </Show>

                    <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                        <form class="card-body" on:submit=on_submit>
                            <Show when=move || error_msg.get().is_some()>
                                <div role="alert" class="alert alert-error text-sm py-2">
                                    <span>{move || error_msg.get().unwrap_or_default()}</span>
                                </div>
                            </Show>

                            <input
                                name="fullName"
                                type="text"
                                placeholder="Nom complet"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.full_name.clone())
                                on:input=bind(|f, v| f.full_name = v)
                                required
                            />
                            <input
                                name="phoneNumber"
                                type="tel"
                                placeholder="+221 77 123 45 67"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.phone_number.clone())
                                on:input=bind(|f, v| f.phone_number = v)
                                required
                            />
                            <input
                                name="email"
                                type="email"
                                placeholder="Email (optionnel)"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.email.clone())
                                on:input=bind(|f, v| f.email = v)
                            />
                            <input
                                name="password"
                                type="password"
                                placeholder="Mot de passe (8 caractères min.)"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.password.clone())
                                on:input=bind(|f, v| f.password = v)
                                required
                            />
                            <input
                                name="confirmPassword"
                                type="password"
                                placeholder="Confirmer le mot de passe"
                                class="input input-bordered"
                                prop:value=move || form.with(|f| f.confirm_password.clone())
                                on:input=bind(|f, v| f.confirm_password = v)
                                required
                            />

                            <button class="btn btn-primary mt-4" disabled=move || is_submitting.get() || success.get()>
                                {move || if is_submitting.get() { "Inscription..." } else { "S'inscrire" }}
                            </button>
                            <p class="text-sm text-center mt-2">
                                "Déjà inscrit ? "
                                <Link to=AppRoute::Login class="link link-primary">"Se connecter"</Link>
                            </p>
                        </form>
                    </div>
                </div>
            </div>
        </Show>
    }
}
