use super::*;
use serde_json::json;

// =========================================================
// 辅助函数
// =========================================================

/// 用给定负载拼一个三段式凭据（签名随意，客户端不校验）
fn make_token(payload: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{}.{}.signature", header, body)
}

fn now() -> Timestamp {
    Timestamp::new(1_700_000_000_000)
}

fn future_exp() -> i64 {
    now().as_secs() + 3600
}

fn valid_token() -> String {
    make_token(json!({ "sub": "alice", "role": "ADMIN", "exp": future_exp() }))
}

// =========================================================
// decode_token 测试
// =========================================================

#[test]
fn test_decode_valid_token() {
    let decoded = decode_token(&valid_token(), now()).unwrap();

    assert_eq!(decoded.user.username, "alice");
    assert_eq!(decoded.user.role, UserRole::Admin);
    assert_eq!(decoded.expires_at, Some(Timestamp::from_secs(future_exp())));
}

#[test]
fn test_decode_carries_display_claims() {
    let token = make_token(json!({
        "sub": "alice",
        "role": "STORE_USER",
        "exp": future_exp(),
        "name": "Alice Kumar",
        "avatar": "https://cdn.example/a.png",
        "provider": "GOOGLE"
    }));

    let decoded = decode_token(&token, now()).unwrap();
    assert_eq!(decoded.user.display_name.as_deref(), Some("Alice Kumar"));
    assert_eq!(
        decoded.user.avatar_url.as_deref(),
        Some("https://cdn.example/a.png")
    );
    assert_eq!(decoded.user.provider, Some(AuthProvider::Google));
}

#[test]
fn test_decode_without_exp_never_expires() {
    let token = make_token(json!({ "sub": "bob", "role": "APPROVER" }));

    let decoded = decode_token(&token, now()).unwrap();
    assert_eq!(decoded.expires_at, None);
}

#[test]
fn test_decode_rejects_missing_subject() {
    let token = make_token(json!({ "role": "ADMIN", "exp": future_exp() }));

    assert_eq!(decode_token(&token, now()), Err(SessionError::InvalidToken));
}

#[test]
fn test_decode_rejects_blank_subject() {
    let token = make_token(json!({ "sub": "  ", "role": "ADMIN", "exp": future_exp() }));

    assert_eq!(decode_token(&token, now()), Err(SessionError::InvalidToken));
}

#[test]
fn test_decode_rejects_missing_role() {
    let token = make_token(json!({ "sub": "alice", "exp": future_exp() }));

    assert_eq!(decode_token(&token, now()), Err(SessionError::InvalidToken));
}

#[test]
fn test_decode_rejects_unknown_role() {
    let token = make_token(json!({ "sub": "alice", "role": "SUPERVISOR", "exp": future_exp() }));

    assert_eq!(decode_token(&token, now()), Err(SessionError::InvalidToken));
}

#[test]
fn test_decode_rejects_expired_token() {
    // 过期时刻在 10 秒前
    let token = make_token(json!({ "sub": "alice", "role": "ADMIN", "exp": now().as_secs() - 10 }));

    assert_eq!(decode_token(&token, now()), Err(SessionError::ExpiredToken));
}

#[test]
fn test_decode_rejects_malformed_structure() {
    assert_eq!(
        decode_token("not-a-jwt", now()),
        Err(SessionError::InvalidToken)
    );
    assert_eq!(
        decode_token("a.b.c.d", now()),
        Err(SessionError::InvalidToken)
    );
    assert_eq!(
        decode_token("aa.%%%.cc", now()),
        Err(SessionError::InvalidToken)
    );
}

// =========================================================
// Session::guard 测试
// =========================================================

#[test]
fn test_guard_rejects_signed_out() {
    let session = Session::signed_out();

    assert_eq!(
        session.guard(now()).map(|_| ()),
        Err(SessionError::NotAuthenticated)
    );
}

#[test]
fn test_guard_returns_live_session() {
    let token = valid_token();
    let session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());

    let (guarded_token, user) = session.guard(now()).unwrap();
    assert_eq!(guarded_token, token);
    assert_eq!(user.username, "alice");
}

#[test]
fn test_guard_rejects_after_expiry() {
    let token = valid_token();
    let session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());

    let after_deadline = Timestamp::from_secs(future_exp());
    assert_eq!(
        session.guard(after_deadline).map(|_| ()),
        Err(SessionError::SessionExpired)
    );
}

#[test]
fn test_guard_without_exp_stays_live() {
    let token = make_token(json!({ "sub": "bob", "role": "APPROVER" }));
    let session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());

    let far_future = Timestamp::new(i64::MAX / 2);
    assert!(session.guard(far_future).is_ok());
}

// =========================================================
// 持久化与恢复测试
// =========================================================

#[test]
fn test_restore_round_trip() {
    let token = valid_token();
    let session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());

    let record = session.to_record().unwrap();
    let restored = Session::restore(record, now()).unwrap();

    assert!(restored.is_authenticated());
    assert_eq!(restored.token(), Some(token.as_str()));
    assert_eq!(restored.expires_at(), session.expires_at());
}

#[test]
fn test_restore_rejects_expired_record() {
    let token = valid_token();
    let session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());
    let record = session.to_record().unwrap();

    // 重新打开页面时凭据已经过期
    let after_deadline = Timestamp::from_secs(future_exp() + 1);
    assert!(Session::restore(record, after_deadline).is_none());
}

#[test]
fn test_restore_rejects_corrupt_token() {
    let record = SessionRecord {
        token: "garbage".to_string(),
        user: decode_token(&valid_token(), now()).unwrap().user,
        expires_at: None,
    };

    assert!(Session::restore(record, now()).is_none());
}

#[test]
fn test_restore_backfills_cached_display_fields() {
    // 凭据不带 email，记录里有刷新时缓存下来的值
    let token = valid_token();
    let mut user = decode_token(&token, now()).unwrap().user;
    user.email = Some("alice@puma.example".to_string());
    user.display_name = Some("Alice Kumar".to_string());

    let record = SessionRecord {
        token,
        user,
        expires_at: Some(Timestamp::from_secs(future_exp())),
    };

    let restored = Session::restore(record, now()).unwrap();
    let restored_user = restored.user().unwrap();
    assert_eq!(restored_user.email.as_deref(), Some("alice@puma.example"));
    assert_eq!(restored_user.display_name.as_deref(), Some("Alice Kumar"));
}

#[test]
fn test_signed_out_has_no_record() {
    assert!(Session::signed_out().to_record().is_none());
}

// =========================================================
// merge_profile 测试
// =========================================================

fn profile(role: UserRole) -> CurrentUser {
    CurrentUser {
        id: uuid::Uuid::nil(),
        username: "alice".to_string(),
        email: Some("alice@puma.example".to_string()),
        role,
        auth_provider: AuthProvider::Local,
        full_name: Some("Alice Kumar".to_string()),
        avatar_url: None,
    }
}

#[test]
fn test_merge_profile_updates_role_and_identity() {
    let token = valid_token();
    let mut session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());

    session.merge_profile(&profile(UserRole::Approver));

    let user = session.user().unwrap();
    assert_eq!(user.role, UserRole::Approver);
    assert_eq!(user.email.as_deref(), Some("alice@puma.example"));
    assert_eq!(user.display_name.as_deref(), Some("Alice Kumar"));
    assert_eq!(user.provider, Some(AuthProvider::Local));
}

#[test]
fn test_merge_profile_preserves_cached_fields_on_null() {
    let token = make_token(json!({
        "sub": "alice",
        "role": "ADMIN",
        "exp": future_exp(),
        "avatar": "https://cdn.example/a.png"
    }));
    let mut session = Session::from_login(token.clone(), decode_token(&token, now()).unwrap());

    // 服务端档案没有头像，本地缓存的应保留
    session.merge_profile(&profile(UserRole::Admin));

    let user = session.user().unwrap();
    assert_eq!(user.avatar_url.as_deref(), Some("https://cdn.example/a.png"));
}

#[test]
fn test_merge_profile_on_signed_out_is_noop() {
    let mut session = Session::signed_out();
    session.merge_profile(&profile(UserRole::Admin));

    assert!(!session.is_authenticated());
}
