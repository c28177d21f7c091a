//! Runtime configuration from CLI arguments and environment variables.

use clap::Parser;
use std::net::SocketAddr;

/// receptai-server - read API for the receptai recipe site
#[derive(Parser, Debug, Clone)]
#[command(name = "receptai-server")]
#[command(about = "Read API backing the server-rendered recipe site")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "receptai")]
    pub mongodb_db: String,

    /// Public base URL, used for canonical redirects and sitemap entries
    #[arg(long, env = "SITE_BASE_URL", default_value = "https://receptai.lt")]
    pub site_base_url: String,
}
