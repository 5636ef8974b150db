//! 会话管理模块 - 响应式外壳
//!
//! 管理会话状态：恢复、持久化、过期定时登出与后台刷新。
//! 纯状态转换在 `session` 模块；路由通过注入的信号检查认证状态，
//! 与本模块解耦。

use crate::api::{ApiError, PortalApi};
use crate::config;
use crate::session::{AuthUser, Session, SessionError, SessionRecord, decode_token};
use crate::web::{Interval, LocalStorage, Timeout, events, time};
use leptos::prelude::*;
use leptos::task::spawn_local;
use puma_portal_shared::{STORAGE_KEY_SESSION, UserRole};

/// 后台会话刷新间隔（毫秒）
const SESSION_REFRESH_INTERVAL_MS: u32 = 5 * 60 * 1000;

/// 会话上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 会话状态（只读）
    pub state: ReadSignal<Session>,
    /// 设置会话状态（写入）
    set_state: WriteSignal<Session>,
}

impl SessionContext {
    /// 创建新的会话上下文（未登录状态）
    pub fn new() -> Self {
        let (state, set_state) = signal(Session::signed_out());
        Self { state, set_state }
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_authenticated()))
    }

    /// 管理员信号（用于路由服务注入）
    pub fn is_admin_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.role().is_some_and(|r| r.is_admin())))
    }

    /// 当前凭据信号（购物车生命周期绑定使用）
    pub fn token_signal(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.token().map(str::to_string)))
    }

    /// 当前用户信号
    pub fn user_signal(&self) -> Signal<Option<AuthUser>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user().cloned()))
    }

    /// 当前角色信号
    pub fn role_signal(&self) -> Signal<Option<UserRole>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.role()))
    }

    /// 用当前凭据构造 API 客户端
    pub fn api(&self) -> PortalApi {
        let token = self.state.with_untracked(|s| s.token().map(str::to_string));
        PortalApi::with_token(config::api_base_url(), token)
    }

    /// 用新凭据登录
    ///
    /// 解码失败会原样抛给调用方（登录页据此展示错误）；
    /// 成功时原子替换整个会话并由持久化 Effect 落盘。
    pub fn login(&self, token: String) -> Result<(), SessionError> {
        let decoded = decode_token(&token, time::now())?;
        self.set_state.set(Session::from_login(token, decoded));
        Ok(())
    }

    /// 登出并清除状态（持久化 Effect 负责删除存储）
    pub fn logout(&self) {
        self.set_state.set(Session::signed_out());
    }

    /// 要求存在可用会话
    ///
    /// 已到过期时刻时顺带清理会话状态，再返回 `SessionExpired`。
    pub fn require_auth(&self) -> Result<(String, AuthUser), SessionError> {
        let now = time::now();
        let result = self.state.with_untracked(|session| {
            session
                .guard(now)
                .map(|(token, user)| (token.to_string(), user.clone()))
        });

        if matches!(result, Err(SessionError::SessionExpired)) {
            self.logout();
        }
        result
    }

    /// 从后端刷新权威用户档案
    ///
    /// 成功时合并服务端字段；401 触发登出；网络/中止错误只记录
    /// 日志、不动当前会话，也不重试。
    pub async fn refresh(self) {
        let Some(token) = self.state.with_untracked(|s| s.token().map(str::to_string)) else {
            return;
        };

        let api = PortalApi::with_token(config::api_base_url(), Some(token.clone()));
        match api.current_session().await {
            Ok(profile) => self.set_state.update(|session| {
                // 刷新期间可能已登出或换号，只在凭据未变时合并
                if session.token() == Some(token.as_str()) {
                    session.merge_profile(&profile);
                }
            }),
            Err(ApiError::Unauthorized(_)) => {
                web_sys::console::log_1(&"[Session] Refresh rejected, signing out.".into());
                self.logout();
            }
            Err(err) if err.is_abort() => {}
            Err(err) => {
                web_sys::console::warn_1(&format!("[Session] Refresh failed: {err}").into());
            }
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

/// 初始化会话状态
///
/// 从 LocalStorage 恢复上次会话；记录损坏或已过期时静默回到
/// 未登录并抹掉存储（恢复路径绝不向外抛错）。随后装好持久化、
/// 过期登出与后台刷新三件套。
pub fn init_session(ctx: &SessionContext) {
    let ctx = *ctx;

    // 1. 恢复持久化的会话
    if let Some(record) = LocalStorage::get_json::<SessionRecord>(STORAGE_KEY_SESSION) {
        match Session::restore(record, time::now()) {
            Some(session) => ctx.set_state.set(session),
            None => {
                web_sys::console::log_1(&"[Session] Stored session unusable, clearing.".into());
                LocalStorage::delete(STORAGE_KEY_SESSION);
            }
        }
    } else if LocalStorage::get(STORAGE_KEY_SESSION).is_some() {
        // 键存在但不是合法 JSON
        LocalStorage::delete(STORAGE_KEY_SESSION);
    }

    // 2. 每次状态变化都持久化
    Effect::new(move |_| {
        match ctx.state.with(|session| session.to_record()) {
            Some(record) => {
                LocalStorage::set_json(STORAGE_KEY_SESSION, &record);
            }
            None => {
                LocalStorage::delete(STORAGE_KEY_SESSION);
            }
        }
    });

    // 3. 过期定时登出：每次凭据变化重排唯一的一只定时器，
    //    上一只随 prev 值 drop 自动取消
    Effect::new(move |_prev: Option<Option<Timeout>>| {
        let deadline = ctx.state.with(|session| session.expires_at())?;
        let remaining = deadline - time::now();
        Some(Timeout::new(remaining.as_millis() as u64, move || {
            web_sys::console::log_1(&"[Session] Token expired, signing out.".into());
            ctx.logout();
        }))
    });

    // 4. 后台刷新：固定周期 + 页面重新可见 + 窗口获得焦点，
    //    及时捕获服务端的角色变更；单次失败不影响后续调度
    let refresh_if_signed_in = move || {
        if ctx.state.with_untracked(|s| s.is_authenticated()) {
            spawn_local(ctx.refresh());
        }
    };

    Interval::new(SESSION_REFRESH_INTERVAL_MS, refresh_if_signed_in).forget();
    events::on_document_visible(refresh_if_signed_in);
    events::on_window_focus(refresh_if_signed_in);
}
