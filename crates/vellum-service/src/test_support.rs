use vellum_core::config::{
    AuthConfig, AuthMethod, BrowseConfig, DatabaseConfig, DeliveryConfig, LoggingConfig,
    SearchConfig, ServerConfig, Settings, SitemapConfig,
};

/// Settings for unit tests: anonymous access and defaults elsewhere.
pub fn settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgres://localhost/vellum_test".to_string(),
            max_connections: 1,
            connect_timeout_secs: 1,
        },
        auth: AuthConfig {
            method: AuthMethod::Anonymous,
            proxy: None,
            single_user: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        delivery: DeliveryConfig {
            disposition_threshold: 2000,
            show_license_bitstreams: true,
            disclose_existence: false,
            assetstore_dir: std::env::temp_dir(),
        },
        sitemap: SitemapConfig {
            dir: std::env::temp_dir(),
        },
        browse: BrowseConfig::default(),
        search: SearchConfig::default(),
    }
}
