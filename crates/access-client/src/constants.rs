use std::time::Duration;

/// Upper bound on a single authorization fetch, measured from the start of the request.
pub const AUTHORIZATION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Config field holding the authorization endpoint template.
pub const AUTHORIZATION_FIELD: &str = "authorization";

/// Config field holding the pingback endpoint template.
pub const PINGBACK_FIELD: &str = "pingback";

/// Query parameter carrying the requesting page's origin.
pub const SOURCE_ORIGIN_PARAM: &str = "__amp_source_origin";

/// Response header in which the endpoint must echo the requesting page's origin.
pub const ALLOW_SOURCE_ORIGIN_HEADER: &str = "AMP-Access-Control-Allow-Source-Origin";

/// Content type sent with pingback signals.
pub const PINGBACK_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
