//! 会话领域模型 - 纯逻辑层
//!
//! 不依赖 DOM 或 web_sys；当前时间一律由调用方显式传入，
//! 保证全部状态转换可以在宿主端直接测试。
//! 响应式外壳（信号、持久化、定时登出）见 `auth` 模块。

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use puma_portal_shared::{AuthProvider, CurrentUser, Timestamp, TokenClaims, UserRole};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[cfg(test)]
mod tests;

/// 会话错误类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// 凭据格式错误或缺少必要声明
    InvalidToken,
    /// 凭据在解码时就已过期
    ExpiredToken,
    /// 当前没有会话
    NotAuthenticated,
    /// 会话已到达过期时刻
    SessionExpired,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidToken => write!(f, "Invalid authentication token"),
            SessionError::ExpiredToken => write!(f, "Authentication token has expired"),
            SessionError::NotAuthenticated => write!(f, "Not authenticated"),
            SessionError::SessionExpired => write!(f, "Session expired"),
        }
    }
}

/// 已登录用户的展示信息
///
/// 来源于凭据声明，并在会话刷新时合并服务端档案字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub username: String,
    pub role: UserRole,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub provider: Option<AuthProvider>,
}

impl AuthUser {
    fn from_claims(claims: TokenClaims) -> Self {
        Self {
            username: claims.sub,
            role: claims.role,
            email: None,
            display_name: claims.name,
            avatar_url: claims.avatar,
            provider: claims.provider,
        }
    }
}

/// 凭据解码结果
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub user: AuthUser,
    /// 过期时刻；凭据未携带 `exp` 时为 None，会话不自动过期
    pub expires_at: Option<Timestamp>,
}

/// 解码 Bearer 凭据的负载段
///
/// 仅用于展示；服务端才是授权的最终权威。
///
/// # 返回
/// - `InvalidToken` 如果结构不是三段式、负载不可解析、缺少
///   subject 或角色
/// - `ExpiredToken` 如果 `exp` 已经到期
pub fn decode_token(token: &str, now: Timestamp) -> Result<DecodedToken, SessionError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(SessionError::InvalidToken),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| SessionError::InvalidToken)?;
    let claims: TokenClaims =
        serde_json::from_slice(&bytes).map_err(|_| SessionError::InvalidToken)?;

    if claims.sub.trim().is_empty() {
        return Err(SessionError::InvalidToken);
    }

    let expires_at = claims.exp.map(Timestamp::from_secs);
    if let Some(deadline) = expires_at {
        if deadline <= now {
            return Err(SessionError::ExpiredToken);
        }
    }

    Ok(DecodedToken {
        user: AuthUser::from_claims(claims),
        expires_at,
    })
}

/// 持久化到 LocalStorage 的会话记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub token: String,
    pub user: AuthUser,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// 会话状态
///
/// 不变式：`user` 非空当且仅当 `token` 非空。构造只经过
/// `signed_out` / `from_login` / `restore`，不变式由构造保证。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<AuthUser>,
    expires_at: Option<Timestamp>,
}

impl Session {
    /// 未登录状态
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// 从一次成功的凭据解码创建会话
    pub fn from_login(token: String, decoded: DecodedToken) -> Self {
        Self {
            token: Some(token),
            user: Some(decoded.user),
            expires_at: decoded.expires_at,
        }
    }

    /// 从持久化记录恢复会话
    ///
    /// 重新解码凭据（凭据是权威来源），失败或已过期时返回 None；
    /// 记录中缓存的展示字段用于补全凭据未携带的部分。
    pub fn restore(record: SessionRecord, now: Timestamp) -> Option<Self> {
        let decoded = decode_token(&record.token, now).ok()?;

        let mut user = decoded.user;
        user.email = user.email.or(record.user.email);
        user.display_name = user.display_name.or(record.user.display_name);
        user.avatar_url = user.avatar_url.or(record.user.avatar_url);
        user.provider = user.provider.or(record.user.provider);

        Some(Self {
            token: Some(record.token),
            user: Some(user),
            expires_at: decoded.expires_at,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// 要求存在可用会话
    ///
    /// # 返回
    /// - `(token, user)` 如果会话存在且未过期
    /// - `NotAuthenticated` / `SessionExpired` 否则
    pub fn guard(&self, now: Timestamp) -> Result<(&str, &AuthUser), SessionError> {
        let (token, user) = match (&self.token, &self.user) {
            (Some(token), Some(user)) => (token.as_str(), user),
            _ => return Err(SessionError::NotAuthenticated),
        };

        if let Some(deadline) = self.expires_at {
            if deadline <= now {
                return Err(SessionError::SessionExpired);
            }
        }

        Ok((token, user))
    }

    /// 转换为持久化记录；未登录时返回 None（调用方应删除存储）
    pub fn to_record(&self) -> Option<SessionRecord> {
        match (&self.token, &self.user) {
            (Some(token), Some(user)) => Some(SessionRecord {
                token: token.clone(),
                user: user.clone(),
                expires_at: self.expires_at,
            }),
            _ => None,
        }
    }

    /// 合并服务端返回的权威档案
    ///
    /// 角色与登录方式以服务端为准；展示字段仅在服务端给出时覆盖，
    /// 保留本地已缓存的值。未登录时不做任何事。
    pub fn merge_profile(&mut self, profile: &CurrentUser) {
        let Some(user) = self.user.as_mut() else {
            return;
        };

        user.role = profile.role;
        user.provider = Some(profile.auth_provider);
        if profile.email.is_some() {
            user.email = profile.email.clone();
        }
        if profile.full_name.is_some() {
            user.display_name = profile.full_name.clone();
        }
        if profile.avatar_url.is_some() {
            user.avatar_url = profile.avatar_url.clone();
        }
    }
}
