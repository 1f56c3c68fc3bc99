//! Default values applied when the host leaves an option unset.
//!
//! # Design
//! - Centralize fallbacks so resolution and documentation stay consistent.
//! - Hosted-tenant asset locations are fixed; custom domains serve their own.

/// Domain suffix identifying hosted tenants.
pub const HOSTED_DOMAIN_SUFFIX: &str = ".auth0.com";
/// Asset root used by hosted tenants.
pub const HOSTED_ASSETS_URL: &str = "https://s3.amazonaws.com/assets.auth0.com/";
/// CDN root used by hosted tenants.
pub const HOSTED_CDN_URL: &str = "https://d19p4zemcycm7a.cloudfront.net/w2/";
/// Path appended to a custom domain to form its CDN root.
pub const CUSTOM_CDN_PATH: &str = "w2/";
/// SSO lookup runs unless the host disables it.
pub const SSO_ENABLED: bool = true;
/// Directory (integrated Windows) SSO is requested when a directory connection exists.
pub const INTEGRATED_WINDOWS_LOGIN: bool = true;
/// JSONP stays off unless requested.
pub const FORCE_JSONP: bool = false;
