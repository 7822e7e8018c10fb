/// Route component constants shared across crates
pub const RETRIEVE_ROUTE_COMPONENT: &str = "retrieve";
pub const RETRIEVE_ROUTE_PREFIX: &str = const_str::concat!("/", RETRIEVE_ROUTE_COMPONENT);

pub const BITSTREAM_ROUTE_COMPONENT: &str = "bitstream";
pub const BITSTREAM_ROUTE_PREFIX: &str = const_str::concat!("/", BITSTREAM_ROUTE_COMPONENT);

pub const HANDLE_ROUTE_COMPONENT: &str = "handle";
pub const HANDLE_ROUTE_PREFIX: &str = const_str::concat!("/", HANDLE_ROUTE_COMPONENT);

pub const EXPLORE_ROUTE_COMPONENT: &str = "explore";
pub const SITEMAP_ROUTE_COMPONENT: &str = "sitemap";
pub const HTMLMAP_ROUTE_COMPONENT: &str = "htmlmap";
pub const BROWSE_ROUTE_COMPONENT: &str = "browse";
pub const COMMUNITY_LIST_ROUTE_COMPONENT: &str = "community-list";
pub const SIMPLE_SEARCH_ROUTE_COMPONENT: &str = "simple-search";
pub const ADVANCED_SEARCH_ROUTE_COMPONENT: &str = "advanced-search";

/// Query parameter that switches a browse request into "export all" mode.
pub const EXPORT_METADATA_SUBMIT: &str = "submit_export_metadata";

/// Bundle whose bitstreams are deposit licenses.
pub const LICENSE_BUNDLE_NAME: &str = "LICENSE";

/// Multi-value separator used in CSV exports.
pub const CSV_VALUE_SEPARATOR: &str = "||";

pub const DEFAULT_SEARCH_PROCESSOR: &str = "metadata-scan";
pub const DEFAULT_VIEWER_PROVIDER: &str = "download";

/// Seeded `Administrator` group; members hold `admin` on the whole site.
pub const ADMINISTRATOR_GROUP_ID: uuid::Uuid = uuid::Uuid::from_u128(1);
