lazy_static! {
    /// Logging configuration.
    pub static ref RUST_LOG: String =
        dotenvy::var("RUST_LOG").unwrap_or_else(|_| "peer_eval=info,tower_http=info".to_string());

    /// SQLite connection string. Example: `sqlite://peer_eval.db`
    pub static ref DATABASE_URL: String =
        dotenvy::var("DATABASE_URL").expect("missing DATABASE_URL environment variable");

    /// Socket address to listen on.
    pub static ref BIND_ADDRESS: String =
        dotenvy::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    /// Username of the admin account created on first start.
    pub static ref ADMIN_USERNAME: String =
        dotenvy::var("ADMIN_USERNAME").expect("missing ADMIN_USERNAME environment variable");

    /// Password of the admin account created on first start.
    pub static ref ADMIN_PASSWORD: String =
        dotenvy::var("ADMIN_PASSWORD").expect("missing ADMIN_PASSWORD environment variable");

    /// Coin balance given to newly registered users.
    pub static ref STARTER_COIN: i64 = match dotenvy::var("STARTER_COIN") {
        Ok(s) => s.parse().expect("invalid value for STARTER_COIN"),
        Err(_) => 10,
    };
}
