// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FILEPATH_ROOT: &str = ".";
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 5000;

// Token constants
pub const TOKEN_ISSUER: &str = "chirpy";
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;
pub const REFRESH_TOKEN_BYTES: usize = 32;

// Header constants
pub const AUTHORIZATION_HEADER: &str = "authorization";
pub const BEARER_SCHEME: &str = "Bearer";
pub const API_KEY_SCHEME: &str = "ApiKey";

// Chirp constants
pub const MAX_CHIRP_LENGTH: usize = 140;
pub const PROFANE_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];
pub const CENSOR_MASK: &str = "****";

// Minimum time a failed login takes, so unknown email and wrong password look alike
pub const MIN_LOGIN_FAILURE_MS: u64 = 100;
