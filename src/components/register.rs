use crate::api::PortalApi;
use crate::auth::use_session;
use crate::components::icons::ShieldCheck;
use crate::config;
use crate::session::decode_token;
use crate::web::Timeout;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::time;
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{LoginRequest, RegisterRequest};

/// 密码最短长度，与后端校验一致
const MIN_PASSWORD_LEN: usize = 8;
const VERIFY_OVERLAY_MS: u64 = 1200;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (full_name, set_full_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());

    let (is_submitting, set_is_submitting) = signal(false);
    let (is_verifying, set_is_verifying) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let begin_verification = move |token: String| {
        if let Err(err) = decode_token(&token, time::now()) {
            set_error_msg.set(Some(err.to_string()));
            return;
        }

        set_is_verifying.set(true);
        Timeout::new(VERIFY_OVERLAY_MS, move || {
            if let Err(err) = session.login(token) {
                set_error_msg.set(Some(err.to_string()));
                set_is_verifying.set(false);
            }
        })
        .forget();
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_verifying.get() {
            return;
        }

        // 请求发出前的客户端校验
        let trimmed_username = username.get().trim().to_string();
        let trimmed_email = email.get().trim().to_string();

        if trimmed_username.is_empty() {
            set_error_msg.set(Some("Username is required".to_string()));
            return;
        }
        if trimmed_email.is_empty() {
            set_error_msg.set(Some("Email is required".to_string()));
            return;
        }
        if password.get().len() < MIN_PASSWORD_LEN {
            set_error_msg.set(Some(
                "Password must be at least 8 characters long".to_string(),
            ));
            return;
        }
        if password.get() != confirm_password.get() {
            set_error_msg.set(Some("Passwords do not match".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = PortalApi::new(config::api_base_url());
            let trimmed_full_name = full_name.get_untracked().trim().to_string();
            let request = RegisterRequest {
                username: trimmed_username.clone(),
                password: password.get_untracked(),
                email: trimmed_email,
                full_name: (!trimmed_full_name.is_empty()).then_some(trimmed_full_name),
            };

            // 注册成功后直接用同一组凭据登录
            let result = match api.register(&request).await {
                Ok(_) => {
                    api.login(&LoginRequest {
                        username: trimmed_username,
                        password: password.get_untracked(),
                    })
                    .await
                }
                Err(err) => Err(err),
            };

            match result {
                Ok(response) => begin_verification(response.token),
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let is_form_disabled = move || is_submitting.get() || is_verifying.get();

    view! {
        <Show when=move || is_verifying.get()>
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-base-300/80">
                <div class="card bg-base-100 shadow-2xl p-8 items-center text-center">
                    <div class="text-success mb-2">
                        <ShieldCheck attr:class="h-12 w-12" />
                    </div>
                    <h3 class="text-xl font-bold">"You're verified"</h3>
                    <p class="text-base-content/70">"Redirecting to Orders..."</p>
                </div>
            </div>
        </Show>

        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                    <p class="text-base-content/70">"Join the Puma Printables ordering portal"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="reg-username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="reg-username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                disabled=is_form_disabled
                                required
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="reg-full-name">
                                <span class="label-text">"Full name (optional)"</span>
                            </label>
                            <input
                                id="reg-full-name"
                                type="text"
                                autocomplete="name"
                                on:input=move |ev| set_full_name.set(event_target_value(&ev))
                                prop:value=full_name
                                class="input input-bordered"
                                disabled=is_form_disabled
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="reg-email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="reg-email"
                                type="email"
                                autocomplete="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                disabled=is_form_disabled
                                required
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="reg-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="reg-password"
                                type="password"
                                autocomplete="new-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                disabled=is_form_disabled
                                required
                            />
                        </div>

                        <div class="form-control">
                            <label class="label" for="reg-confirm">
                                <span class="label-text">"Confirm password"</span>
                            </label>
                            <input
                                id="reg-confirm"
                                type="password"
                                autocomplete="new-password"
                                on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                                prop:value=confirm_password
                                class="input input-bordered"
                                disabled=is_form_disabled
                                required
                            />
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_form_disabled>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>

                        <p class="text-sm text-center mt-4 text-base-content/70">
                            "Already registered? "
                            <a class="link link-primary" on:click=move |_| router.navigate_route(AppRoute::Login)>
                                "Sign in"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
