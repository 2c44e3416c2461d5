use crate::api::AuthApi;
use crate::auth::{update_user, use_auth};
use crate::components::navbar::Navbar;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use teranga_shared::protocol::ProfileUpdate;

/// 单行文本字段
#[component]
fn TextField(
    label: &'static str,
    name: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    form: RwSignal<ProfileUpdate>,
    read: fn(&ProfileUpdate) -> String,
    write: fn(&mut ProfileUpdate, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=name>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=name
                name=name
                type=input_type
                class="input input-bordered"
                prop:value=move || form.with(read)
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| write(f, value));
                }
            />
        </div>
    }
}

#[component]
pub fn ProfileEditPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    // 以当前用户预填表单
    let initial = auth
        .state
        .with_untracked(|s| s.user.as_ref().map(ProfileUpdate::from_user))
        .unwrap_or_default();
    let form = RwSignal::new(initial);

    let (is_saving, set_is_saving) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if is_saving.get_untracked() {
            return;
        }
        set_is_saving.set(true);
        set_error_msg.set(None);

        let update = form.get_untracked();
        let api = AuthApi::new(auth.client());
        spawn_local(async move {
            match api.update_profile(&update).await {
                Ok(user) => {
                    let role = user.role;
                    update_user(&auth, user);
                    router.go(AppRoute::landing_for(role));
                }
                Err(e) => {
                    let _ = set_error_msg.try_set(Some(e.user_message()));
                }
            }
            let _ = set_is_saving.try_set(false);
        });
    };

    let back = move || {
        auth.state
            .with(|s| s.user.as_ref().map(|u| AppRoute::landing_for(u.role)))
            .unwrap_or(AppRoute::Home)
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <Navbar />
            <div class="max-w-2xl mx-auto p-4 md:p-8">
                <div class="card bg-base-100 shadow-xl">
                    <form class="card-body" on:submit=on_submit>
                        <h2 class="card-title">"Modifier mon profil"</h2>

                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <TextField label="Nom complet" name="fullName" form=form
                            read=|f| f.full_name.clone() write=|f, v| f.full_name = v />
                        <TextField label="Email" name="email" input_type="email" form=form
                            read=|f| f.email.clone() write=|f, v| f.email = v />
                        <TextField label="Téléphone" name="phone" input_type="tel" form=form
                            read=|f| f.phone.clone() write=|f, v| f.phone = v />
                        <TextField label="Date de naissance" name="dateOfBirth" input_type="date" form=form
                            read=|f| f.date_of_birth.clone() write=|f, v| f.date_of_birth = v />
                        <TextField label="Adresse" name="address" form=form
                            read=|f| f.address.clone() write=|f, v| f.address = v />
                        <TextField label="Filière" name="fieldOfStudy" form=form
                            read=|f| f.field_of_study.clone() write=|f, v| f.field_of_study = v />
                        <TextField label="Année d'études" name="yearOfStudy" form=form
                            read=|f| f.year_of_study.clone() write=|f, v| f.year_of_study = v />

                        <div class="form-control">
                            <label class="label" for="bio">
                                <span class="label-text">"Bio"</span>
                            </label>
                            <textarea
                                id="bio"
                                class="textarea textarea-bordered"
                                prop:value=move || form.with(|f| f.bio.clone())
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    form.update(|f| f.bio = value);
                                }
                            ></textarea>
                        </div>

                        <div class="card-actions justify-end mt-4">
                            {move || view! { <Link to=back() class="btn btn-ghost">"Annuler"</Link> }}
                            <button class="btn btn-primary" disabled=move || is_saving.get()>
                                {move || if is_saving.get() { "Enregistrement..." } else { "Enregistrer" }}
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
