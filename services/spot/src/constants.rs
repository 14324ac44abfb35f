// Env values used in kraken services.
pub const KRAKEN_API_KEY: &str = "KRAKEN_API_KEY";
pub const KRAKEN_API_SECRET: &str = "KRAKEN_API_SECRET";
pub const KRAKEN_BASE_URL: &str = "KRAKEN_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "https://api.kraken.com";
pub const DEFAULT_USER_AGENT: &str = concat!("kraken-rest/", env!("CARGO_PKG_VERSION"));

// Headers managed by the signer, must be lowercase for `HeaderName::from_static`.
pub const API_KEY: &str = "api-key";
pub const API_SIGN: &str = "api-sign";

// Path segment that marks endpoints which must go out unsigned.
pub const PUBLIC_MARKER: &str = "/public/";

// Signed form fields.
pub const NONCE: &str = "nonce";
pub const OTP: &str = "otp";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
pub const CONTENT_TYPE_ZIP: &str = "application/zip";
