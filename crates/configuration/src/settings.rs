use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: Server,
    pub database: Database,
}

/// Contains parameters for the HTTP server exposing the analytics API.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// The interface the server binds to (e.g., "127.0.0.1").
    pub host: String,
    /// The TCP port the server listens on.
    pub port: u16,
}

/// Contains parameters for the database connection pool. The connection
/// string itself comes from the DATABASE_URL environment variable.
#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long to wait for a pooled connection before giving up.
    pub acquire_timeout_secs: u64,
}
