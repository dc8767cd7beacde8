#![allow(clippy::unwrap_used, clippy::expect_used)]

use fga_security::SecurityContext;

#[test]
fn deserialized_context_without_subject_is_anonymous() {
    let ctx: SecurityContext = serde_json::from_str(r#"{"token_scopes":["*"]}"#).unwrap();

    assert!(!ctx.is_authenticated());
    assert_eq!(ctx.subject_id(), None);
    assert_eq!(ctx.token_scopes(), &["*"]);
}

#[test]
fn deserialized_context_keeps_subject_name() {
    let ctx: SecurityContext =
        serde_json::from_str(r#"{"subject_id":"alice","subject_type":"user"}"#).unwrap();

    assert_eq!(ctx.subject_id(), Some("alice"));
    assert_eq!(ctx.subject_type(), Some("user"));
}
