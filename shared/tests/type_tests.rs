/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `policy.rs` and `server_config.rs`).
// ---------------------------------------------------------------------------
// JWT claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod jwt_tests {
    use shared::types::*;

    fn sample_claims() -> JwtClaims {
        JwtClaims {
            name: "alice".to_string(),
            name_identifier: Some("42".to_string()),
            role_id: Some("3".to_string()),
            exp: 9_999_999_999,
            iat: 1_700_000_000,
        }
    }

    #[test]
    fn claims_use_identity_claim_names() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        assert_eq!(json["name"], "alice");
        assert_eq!(json["nameid"], "42");
        assert_eq!(json["RoleId"], "3");
        assert!(json.get("name_identifier").is_none());
    }

    #[test]
    fn missing_role_claim_is_omitted_and_defaults_to_none() {
        let mut c = sample_claims();
        c.role_id = None;
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("RoleId"));

        let back: JwtClaims = serde_json::from_str(&json).unwrap();
        assert!(back.role_id.is_none());
    }

    #[test]
    fn non_numeric_ids_still_deserialize() {
        // Parsing into integers is the middleware's job, not serde's.
        let json = r#"{"name":"bob","nameid":"abc","RoleId":"x","exp":1,"iat":0}"#;
        let c: JwtClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.name_identifier.as_deref(), Some("abc"));
        assert_eq!(c.role_id.as_deref(), Some("x"));
    }

    #[test]
    fn missing_nameid_defaults_to_none() {
        let json = r#"{"name":"alice","exp":1,"iat":0}"#;
        let c: JwtClaims = serde_json::from_str(json).unwrap();
        assert_eq!(c.name, "alice");
        assert!(c.name_identifier.is_none());

        let out = serde_json::to_value(&c).unwrap();
        assert!(out.get("nameid").is_none());
    }
}

// ---------------------------------------------------------------------------
// Access context
// ---------------------------------------------------------------------------

#[cfg(test)]
mod access_tests {
    use shared::policy::{ADMIN_HOME, Role, USER_HOME};
    use shared::types::*;

    #[test]
    fn empty_context_is_anonymous_user() {
        let ctx = AccessContext::default();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.role(), Role::User);
    }

    #[test]
    fn super_admin_flag_drives_role() {
        let ctx = AccessContext {
            user_id: Some(1),
            role_id: Some(1),
            is_super_admin: Some(true),
            project_id: None,
        };
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.role(), Role::SuperAdmin);
    }

    #[test]
    fn session_view_flattens_context_and_adds_home() {
        let view = SessionView::from_context(AccessContext {
            user_id: Some(7),
            role_id: Some(2),
            is_super_admin: Some(false),
            project_id: Some(11),
        });
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["user_id"], 7);
        assert_eq!(json["project_id"], 11);
        assert_eq!(json["home"], USER_HOME);
    }

    #[test]
    fn admin_session_view_points_at_admin_home() {
        let view = SessionView::from_context(AccessContext {
            user_id: Some(1),
            role_id: Some(1),
            is_super_admin: Some(true),
            project_id: None,
        });
        assert_eq!(view.home, ADMIN_HOME);
    }
}

// ---------------------------------------------------------------------------
// Login types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod login_tests {

    use shared::types::*;

    #[test]
    fn login_data_deserializes_username() {
        let json = r#"{"username":"bob","password":"pass123"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.username, "bob");
        assert!(!d.remember_me);
    }

    #[test]
    fn login_data_email_alias_maps_to_username() {
        let json = r#"{"email":"bob@example.com","password":"pass123"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.username, "bob@example.com");
    }

    #[test]
    fn all_error_variants_have_non_empty_messages() {
        let variants = vec![
            LoginError::InvalidCredentials,
            LoginError::UserInactive,
            LoginError::NotSuperAdmin,
            LoginError::MissingField("test".into()),
            LoginError::InvalidRequest,
            LoginError::DatabaseError,
            LoginError::InternalError,
        ];
        for e in variants {
            assert!(!e.to_code().is_empty());
            assert!(!e.to_string().is_empty());
        }
    }

    #[test]
    fn missing_field_names_the_field() {
        let e = LoginError::MissingField("password".into());
        assert_eq!(e.to_string(), "Missing required field: password");
        assert!(!e.is_account_refusal());
        assert!(LoginError::UserInactive.is_account_refusal());
    }

    #[test]
    fn login_error_response_is_serializable() {
        let r = LoginError::NotSuperAdmin.to_response();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "NOT_SUPER_ADMIN");
    }

    #[test]
    fn login_response_success_serializes_all_fields() {
        let r = LoginResponse::Success {
            user_id: 1,
            username: "alice".into(),
            token: "t.o.k".into(),
            expires_in: 3600,
            is_super_admin: false,
            redirect: "/user/dashboard".into(),
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["expires_in"], 3600);
        assert_eq!(json["redirect"], "/user/dashboard");
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use shared::config::{load_config, parse_config};
    use shared::types::server_config::ConfigError;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn config_text(extra: &str) -> String {
        format!(
            r#"
            [server]
            bind = "127.0.0.1"
            port = 8080

            [auth]
            jwt_secret = "{}"
            {}
            "#,
            SECRET, extra
        )
    }

    #[test]
    fn loads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(config_text("").as_bytes()).unwrap();

        let cfg = load_config(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = parse_config("   \n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = parse_config("[server\nbind=").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn short_secret_is_rejected() {
        let text = r#"
            [server]
            bind = "127.0.0.1"

            [auth]
            jwt_secret = "short"
        "#;
        if std::env::var("JWT_SECRET").is_ok() {
            return;
        }
        let err = parse_config(text).unwrap_err();
        assert!(err.to_string().contains("32 characters"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let text = r#"
            [server]
            bind = "127.0.0.1"
            request_timeout_secs = 0

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"
        "#;
        let err = parse_config(text).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn oversized_token_expiry_is_rejected() {
        let err = parse_config(&config_text("token_expiry_minutes = 1000000000"))
            .unwrap_err();
        assert!(err.to_string().contains("token_expiry_minutes"));

        let ok = parse_config(&config_text("token_expiry_minutes = 43200")).unwrap();
        assert_eq!(ok.auth.token_expiry_minutes, 43_200);
    }

    #[test]
    fn empty_bypass_list_is_rejected() {
        let err = parse_config(&config_text("[access]\nbypass_prefixes = []")).unwrap_err();
        assert!(err.to_string().contains("bypass_prefixes"));
    }

    #[test]
    fn relative_bypass_prefix_is_rejected() {
        let err =
            parse_config(&config_text("[access]\nbypass_prefixes = [\"api/auth\"]")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfig(_)));
    }
}

// ---------------------------------------------------------------------------
// Error body
// ---------------------------------------------------------------------------

#[cfg(test)]
mod error_body_tests {
    use shared::types::ErrorBody;

    #[test]
    fn new_sets_error_status() {
        let body = ErrorBody::new("FORBIDDEN", "Insufficient privileges");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "FORBIDDEN");
        assert!(body.is_access_denied());
    }

    #[test]
    fn status_defaults_when_absent() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"code":"NOT_FOUND","message":"Endpoint not found"}"#).unwrap();
        assert_eq!(body.status, "error");
        assert!(!body.is_access_denied());
    }
}
