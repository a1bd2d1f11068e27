use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_cover_a_local_deployment() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.public_addr.port(), DEFAULT_PUBLIC_PORT);
    assert_eq!(
        settings.server.graceful_shutdown,
        Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_SECS)
    );
    assert_eq!(
        settings.database.max_connections.get(),
        DEFAULT_DB_MAX_CONNECTIONS
    );
    assert!(settings.database.url.is_none());
    assert_eq!(settings.site.title, DEFAULT_SITE_TITLE);
    assert_eq!(settings.site.base_url, DEFAULT_SITE_BASE_URL);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_port_is_rejected() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(0);

    let error = Settings::from_raw(raw).expect_err("port 0 must be rejected");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "server.port",
            ..
        }
    ));
}

#[test]
fn relative_base_url_is_rejected() {
    let mut raw = RawSettings::default();
    raw.site.base_url = Some("/blog".to_string());

    let error = Settings::from_raw(raw).expect_err("relative base url must be rejected");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "site.base_url",
            ..
        }
    ));
}

#[test]
fn blank_database_url_counts_as_unset() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn parse_serve_arguments() {
    let args = CliArgs::parse_from([
        "gazette",
        "--database-url",
        "postgres://example",
        "--server-port",
        "8080",
        "--log-json",
        "true",
    ]);

    assert_eq!(
        args.overrides.database_url.as_deref(),
        Some("postgres://example")
    );
    assert_eq!(args.overrides.server_port, Some(8080));
    assert_eq!(args.overrides.log_json, Some(true));
}

#[test]
fn invalid_host_reports_the_offending_key() {
    let mut raw = RawSettings::default();
    raw.server.host = Some("not a host".to_string());

    let error = Settings::from_raw(raw).expect_err("invalid host must be rejected");
    assert!(matches!(
        error,
        LoadError::Invalid {
            key: "server.public_addr",
            ..
        }
    ));
}
