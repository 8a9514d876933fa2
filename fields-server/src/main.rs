mod api;
mod config;
mod error;
mod extractors;

use std::net::SocketAddr;
use std::process;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Config;

pub const NAME: &str = "fields-server";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        default_value = "/etc/fields-server/config.toml"
    )]
    config: String,
}

fn main() {
    let args = Args::parse();

    let cfg = Config::load(&args.config).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {e}");
        process::exit(1);
    });

    cfg.init_logger().unwrap_or_else(|e| {
        eprintln!("Error initializing logging: {e}");
        process::exit(1);
    });

    let schemas = match cfg.build_schemas() {
        Ok(schemas) => schemas,
        Err(e) => {
            error!("Invalid schema declarations: {e}");
            process::exit(1);
        }
    };
    info!(
        schemas = schemas.len(),
        bind = %cfg.server.bind,
        "starting {NAME} version {VERSION}"
    );

    let app = api::create_router(schemas);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = rt.block_on(server(app, cfg.server.bind)) {
        error!("Server error: {e}");
        process::exit(1);
    }
}

async fn server(app: axum::Router, bind: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("Server running on {}", bind);
    axum::serve(listener, app).await
}
