//! 应用框架组件
//!
//! 已登录页面共用的外壳：顶栏（角色徽章、用户名、购物车、登出）、
//! 侧边导航与页脚。导航走路由服务，管理入口只对管理员渲染。

use crate::auth::use_session;
use crate::cart::use_cart;
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use leptos::prelude::*;
use puma_portal_shared::UserRole;

/// 单个导航项
#[component]
fn NavItem(
    route: AppRoute,
    #[prop(into)] label: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let is_active = move || router.current_route().get() == route;

    view! {
        <li>
            <a
                class=move || if is_active() { "active" } else { "" }
                on:click=move |_| router.navigate_route(route)
            >
                {children()}
                {label}
            </a>
        </li>
    }
}

/// 应用框架
#[component]
pub fn AppLayout(#[prop(into)] title: String, children: Children) -> impl IntoView {
    let session = use_session();
    let cart = use_cart();
    let user = session.user_signal();
    let is_admin = session.is_admin_signal();
    let cart_count = cart.total_quantity();

    let username = move || user.get().map(|u| u.username).unwrap_or_default();
    let role_label = move || {
        user.get()
            .map(|u| u.role.label())
            .unwrap_or(UserRole::StoreUser.label())
    };
    let can_use_cart = move || {
        user.get()
            .map(|u| u.role.can_create_orders())
            .unwrap_or(false)
    };

    let on_logout = move |_| {
        session.logout();
        // 重定向由路由服务的认证监听处理
    };

    view! {
        <div class="min-h-screen bg-base-200 flex flex-col">
            <header class="navbar bg-base-100 shadow-md px-4 gap-2">
                <div class="flex-1 gap-3">
                    <Package attr:class="h-7 w-7 text-primary" />
                    <div>
                        <span class="text-lg font-bold">{title}</span>
                        <p class="text-xs text-base-content/60 hidden md:block">
                            "Manage apparel orders and logistics in one place."
                        </p>
                    </div>
                </div>
                <div class="flex-none items-center gap-2">
                    <span class="badge badge-primary badge-outline">{role_label}</span>
                    <span class="hidden md:inline text-sm">{username}</span>
                    <Show when=can_use_cart>
                        <button
                            class="btn btn-ghost btn-circle indicator"
                            aria-label="Cart"
                            on:click=move |_| cart.toggle_cart()
                        >
                            <Show when=move || (cart_count.get() > 0)>
                                <span class="indicator-item badge badge-secondary badge-sm">
                                    {move || cart_count.get()}
                                </span>
                            </Show>
                            <ShoppingCart attr:class="h-5 w-5" />
                        </button>
                    </Show>
                    <button class="btn btn-outline btn-sm gap-2" on:click=on_logout>
                        <LogOut attr:class="h-4 w-4" /> "Sign out"
                    </button>
                </div>
            </header>

            <div class="flex flex-1">
                <aside class="w-52 bg-base-100 border-r border-base-300 hidden md:block">
                    <nav class="p-4">
                        <h2 class="text-xs uppercase text-base-content/50 mb-2">"Navigation"</h2>
                        <ul class="menu menu-md gap-1 p-0">
                            <NavItem route=AppRoute::Orders label="Orders">
                                <Package attr:class="h-4 w-4" />
                            </NavItem>
                            <NavItem route=AppRoute::Products label="Products">
                                <ShoppingBag attr:class="h-4 w-4" />
                            </NavItem>
                            <NavItem route=AppRoute::Reports label="Reports">
                                <ChartBar attr:class="h-4 w-4" />
                            </NavItem>
                            <NavItem route=AppRoute::Notifications label="Notifications">
                                <Bell attr:class="h-4 w-4" />
                            </NavItem>
                            <Show when=move || is_admin.get()>
                                <NavItem route=AppRoute::AdminUsers label="Admin users">
                                    <Users attr:class="h-4 w-4" />
                                </NavItem>
                            </Show>
                        </ul>
                    </nav>
                </aside>

                <main class="flex-1 p-4 md:p-8 max-w-7xl mx-auto w-full">{children()}</main>
            </div>

            <footer class="footer footer-center bg-base-100 text-base-content/60 p-3 text-sm border-t border-base-300">
                <div class="flex justify-between w-full max-w-7xl px-4">
                    <span>"Puma Printables Platform"</span>
                    <span>"Internal Operations"</span>
                </div>
            </footer>
        </div>
    }
}
