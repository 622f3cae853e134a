pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RUST_LOG: &str = "info,tower_http=info";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_DB_MIN_IDLE: u32 = 2;

// Token lifetimes mirror the conventional 24h access / 7d refresh split.
pub const DEFAULT_ACCESS_TTL_SECS: usize = 24 * 60 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: usize = 7 * 24 * 60 * 60;

// Argon2id cost defaults; tests substitute cheaper ones.
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
