#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Seeding an in-memory repository, asset store and sitemap directory
//! - Creating the full Salvo service over them
//! - Making HTTP requests and asserting on responses

use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::http::header::HeaderName;
use salvo::http::{Method, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};

use vellum_test::app::config::ConfigHandler;
use vellum_test::app::store_handler::StoreHandler;
use vellum_test::core::config::{
    AuthConfig, AuthMethod, BrowseConfig, DatabaseConfig, DeliveryConfig, LoggingConfig,
    SearchConfig, ServerConfig, Settings, SitemapConfig,
};
use vellum_test::core::constants::ADMINISTRATOR_GROUP_ID;
use vellum_test::db::assetstore::{AssetStore, MemoryAssetStore};
use vellum_test::db::model::bitstream::Bitstream;
use vellum_test::db::model::container::{Collection, Community};
use vellum_test::db::model::eperson::EPerson;
use vellum_test::db::model::item::Item;
use vellum_test::db::store::RepositoryStore;
use vellum_test::db::store::memory::{MemoryFault, MemoryStore};
use vellum_test::service::auth::casbin::{
    CasbinEnforcerHandler, DEFAULT_POLICIES, enforcer_with_adapter,
};
use vellum_test::service::auth::password::hash_password;
use vellum_test::service::search::{SearchRegistry, SearchRegistryHandler};


/// `Last-Modified` of every seeded object.
pub const SEEDED_LAST_MODIFIED: &str = "Mon, 01 Jan 2024 00:00:00 GMT";

pub const ADMIN_EMAIL: &str = "admin@example.org";
pub const ADMIN_PASSWORD: &str = "correct horse";

fn test_settings(sitemap_dir: PathBuf) -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            connect_timeout_secs: 1,
        },
        auth: AuthConfig {
            method: AuthMethod::BasicAuth,
            proxy: None,
            single_user: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        delivery: DeliveryConfig {
            disposition_threshold: 2000,
            show_license_bitstreams: true,
            disclose_existence: false,
            assetstore_dir: PathBuf::from("unused"),
        },
        sitemap: SitemapConfig { dir: sitemap_dir },
        browse: BrowseConfig::default(),
        search: SearchConfig::default(),
    }
}

/// A small repository: one community holding one collection holding one item.
pub struct SeededTree {
    pub community: Community,
    pub collection: Collection,
    pub item: Item,
}

/// In-memory repository plus configuration, turned into a service at the end.
pub struct TestRepository {
    pub store: MemoryStore,
    pub assets: MemoryAssetStore,
    pub settings: Settings,
    pub policies: String,
    sitemap_dir: PathBuf,
    fault: Option<MemoryFault>,
    admin_group_seeded: bool,
}

impl Default for TestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepository {
    #[must_use]
    pub fn new() -> Self {
        let sitemap_dir =
            std::env::temp_dir().join(format!("vellum-sitemaps-{}", uuid::Uuid::new_v4()));
        Self {
            store: MemoryStore::new(),
            assets: MemoryAssetStore::new(),
            settings: test_settings(sitemap_dir.clone()),
            policies: DEFAULT_POLICIES.to_string(),
            sitemap_dir,
            fault: None,
            admin_group_seeded: false,
        }
    }

    /// Seeds `123456789/1` (community) > `123456789/2` (collection) > `123456789/3` (item).
    pub fn seed_tree(&mut self) -> SeededTree {
        let community = self.store.add_community("123456789/1", "Research");
        let collection = self
            .store
            .add_collection(community.id, "123456789/2", "Theses");
        let item = self.store.add_item(
            collection.id,
            Some("123456789/3"),
            &[
                ("dc.title", "Streams and sinks"),
                ("dc.contributor.author", "Lovelace, Ada"),
                ("dc.date.issued", "2021"),
            ],
        );
        SeededTree {
            community,
            collection,
            item,
        }
    }

    /// Adds a bitstream whose stored bytes are `content`.
    pub fn add_content(
        &mut self,
        item_id: uuid::Uuid,
        bundle: &str,
        name: &str,
        mime_type: &str,
        content: impl Into<Vec<u8>>,
    ) -> Bitstream {
        let content = content.into();
        let size = i64::try_from(content.len()).expect("content length fits in i64");
        let bitstream = self
            .store
            .add_bitstream(item_id, bundle, name, mime_type, size);
        self.assets.insert(bitstream.internal_id.clone(), content);
        bitstream
    }

    /// Adds an e-person in the administrator group.
    pub fn add_admin(&mut self) -> EPerson {
        if !self.admin_group_seeded {
            self.store
                .add_group_with_id(ADMINISTRATOR_GROUP_ID, "Administrator");
            self.admin_group_seeded = true;
        }
        let hash = hash_password(ADMIN_PASSWORD).expect("Failed to hash password");
        let eperson = self.store.add_eperson(ADMIN_EMAIL, "Admin", Some(&hash));
        self.store.add_member(ADMINISTRATOR_GROUP_ID, eperson.id);
        eperson
    }

    /// Writes a file into the sitemap directory.
    pub fn write_sitemap(&self, file_name: &str, content: &[u8]) {
        std::fs::create_dir_all(&self.sitemap_dir).expect("Failed to create sitemap dir");
        std::fs::write(self.sitemap_dir.join(file_name), content)
            .expect("Failed to write sitemap file");
    }

    /// Drops the blanket item read grant; only `readable` items stay public.
    pub fn restrict_items_to(&mut self, readable: &[uuid::Uuid]) {
        let mut policies: String = self
            .policies
            .lines()
            .filter(|line| !line.contains("/items/**"))
            .map(|line| format!("{line}\n"))
            .collect();
        for id in readable {
            policies.push_str(&format!("p, all, /items/{id}, reader\n"));
        }
        self.policies = policies;
    }

    /// Makes every store call fail once the service is running.
    pub fn fail_store(&mut self, fault: MemoryFault) {
        self.fault = Some(fault);
    }

    /// Creates the full service, matching the hoop order in `main.rs`.
    ///
    /// ## Panics
    /// Panics if the enforcer or the routes cannot be created.
    pub async fn service(self) -> Service {
        let enforcer = enforcer_with_adapter(string_adapter::StringAdapter::new(self.policies))
            .await
            .expect("Failed to initialize Casbin enforcer for tests");

        self.store.set_fault(self.fault);
        let store: Arc<dyn RepositoryStore> = Arc::new(self.store);
        let assets: Arc<dyn AssetStore> = Arc::new(self.assets);
        let search = SearchRegistry::default().resolve(&self.settings.search.processor);

        let router = Router::new()
            .hoop(StoreHandler { store, assets })
            .hoop(ConfigHandler {
                settings: Arc::new(self.settings),
            })
            .hoop(CasbinEnforcerHandler {
                enforcer: Arc::new(enforcer),
            })
            .hoop(SearchRegistryHandler {
                registry: Arc::new(search),
            })
            .push(vellum_test::app::app::api::routes().expect("API routes should be valid"));

        Service::new(router)
    }
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
}

impl TestRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn head(path: &str) -> Self {
        Self::new(Method::HEAD, path)
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn if_modified_since(self, date: &str) -> Self {
        self.header("If-Modified-Since", date)
    }

    #[must_use]
    pub fn basic_auth(self, email: &str, password: &str) -> Self {
        let token = STANDARD.encode(format!("{email}:{password}"));
        self.header("Authorization", &format!("Basic {token}"))
    }

    #[must_use]
    pub fn as_admin(self) -> Self {
        self.basic_auth(ADMIN_EMAIL, ADMIN_PASSWORD)
    }

    /// Sends the request to the test service and returns the response.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "HEAD" => TestClient::head(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}; body: {}",
            self.status,
            self.body_string()
        );
        self
    }

    #[must_use]
    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        let value = self
            .get_header(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found in response"));
        assert_eq!(
            value, expected,
            "Header '{name}' expected '{expected}' but got '{value}'"
        );
        self
    }

    #[must_use]
    pub fn assert_header_contains(self, name: &str, expected: &str) -> Self {
        let value = self
            .get_header(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found in response"));
        assert!(
            value.contains(expected),
            "Header '{name}' expected to contain '{expected}' but got '{value}'"
        );
        self
    }

    #[must_use]
    pub fn assert_header_absent(self, name: &str) -> Self {
        assert!(
            self.get_header(name).is_none(),
            "Header '{name}' unexpectedly present"
        );
        self
    }

    #[must_use]
    pub fn assert_body_empty(self) -> Self {
        assert!(
            self.body.is_empty(),
            "Expected empty body but got {} bytes",
            self.body.len()
        );
        self
    }

    #[must_use]
    pub fn assert_body_contains(self, expected: &str) -> Self {
        let body = self.body_string();
        assert!(
            body.contains(expected),
            "Expected body to contain '{expected}' but got:\n{body}"
        );
        self
    }

    /// Asserts the JSON error code and, when given, the echoed path.
    #[must_use]
    pub fn assert_error(self, code: &str) -> Self {
        let json = self.json();
        assert_eq!(json["error"], code, "Unexpected error body: {json}");
        self
    }

    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
