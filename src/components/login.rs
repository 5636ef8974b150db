use crate::auth::use_session;
use crate::components::icons::ShieldCheck;
use crate::config;
use crate::web::Timeout;
use crate::web::google;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use crate::web::time;
use crate::{api::PortalApi, session::decode_token};
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{GoogleLoginRequest, LoginRequest};

/// 凭据校验通过后的过场时长（毫秒）
const VERIFY_OVERLAY_MS: u64 = 1200;

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let (is_google_loading, set_is_google_loading) = signal(false);
    let (is_verifying, set_is_verifying) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let google_client_id = StoredValue::new(config::google_client_id());
    let google_enabled = google_client_id.with_value(|id| id.is_some());

    // 校验凭据可解码后先展示过场动画，再落盘会话；
    // 实际跳转由路由服务的认证状态监听完成
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
        if username.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = PortalApi::new(config::api_base_url());
            let request = LoginRequest {
                username: username.get_untracked().trim().to_string(),
                password: password.get_untracked(),
            };
            match api.login(&request).await {
                Ok(response) => begin_verification(response.token),
                Err(err) => set_error_msg.set(Some(err.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    let on_google_click = move |_| {
        if is_verifying.get() || is_google_loading.get() {
            return;
        }
        let Some(client_id) = google_client_id.get_value() else {
            return;
        };

        set_error_msg.set(None);
        let started = google::prompt_sign_in(&client_id, move |credential| {
            if credential.is_empty() {
                set_error_msg.set(Some(
                    "Google sign-in did not provide a credential".to_string(),
                ));
                return;
            }
            set_is_google_loading.set(true);
            spawn_local(async move {
                let api = PortalApi::new(config::api_base_url());
                match api
                    .login_with_google(&GoogleLoginRequest { credential })
                    .await
                {
                    Ok(response) => begin_verification(response.token),
                    Err(err) => set_error_msg.set(Some(err.to_string())),
                }
                set_is_google_loading.set(false);
            });
        });

        if !started {
            set_error_msg.set(Some(
                "Google sign-in is not available right now. Please try again.".to_string(),
            ));
        }
    };

    let is_form_disabled =
        move || is_submitting.get() || is_verifying.get() || is_google_loading.get();

    view! {
        // 验证通过过场
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
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Puma Printables Portal"</h1>
                        <p class="text-base-content/70">"Sign in to manage orders and logistics"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
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
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <div class="join w-full">
                                <input
                                    id="password"
                                    type=move || if show_password.get() { "text" } else { "password" }
                                    autocomplete="current-password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered join-item w-full"
                                    disabled=is_form_disabled
                                    required
                                />
                                <button
                                    type="button"
                                    class="btn join-item"
                                    on:click=move |_| set_show_password.update(|v| *v = !*v)
                                    disabled=is_form_disabled
                                >
                                    {move || if show_password.get() { "Hide" } else { "Show" }}
                                </button>
                            </div>
                        </div>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_form_disabled>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>

                        <Show when=move || google_enabled>
                            <div class="divider text-base-content/50">"or"</div>
                            <button
                                type="button"
                                class="btn btn-outline"
                                on:click=on_google_click
                                disabled=is_form_disabled
                            >
                                {move || if is_google_loading.get() {
                                    view! { <span class="loading loading-spinner"></span> "Finishing Google sign-in..." }.into_any()
                                } else {
                                    "Sign in with Google".into_any()
                                }}
                            </button>
                        </Show>

                        <p class="text-sm text-center mt-4 text-base-content/70">
                            "Need an account? "
                            <a class="link link-primary" on:click=move |_| router.navigate_route(AppRoute::Register)>
                                "Register now"
                            </a>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
