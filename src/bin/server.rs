//! uartfs Server Binary
//!
//! Serves a host directory over a serial device or a TCP socket.

use std::fs::File;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use uartfs::link::{serve_tcp, Server, StreamLink};
use uartfs::{Config, Engine};

/// uartfs Server
#[derive(Parser, Debug)]
#[command(name = "uartfs-server")]
#[command(about = "Serve a directory over a COBS-framed serial protocol")]
#[command(version)]
struct Args {
    /// Directory served as the device root
    #[arg(short, long, default_value = "./uartfs_root")]
    root: PathBuf,

    /// Serial device to serve (e.g. /dev/ttyUSB0); line settings are not changed
    #[arg(short, long, conflicts_with = "listen")]
    device: Option<PathBuf>,

    /// TCP listen address (host:port), used when no device is given
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Byte read timeout in milliseconds
    #[arg(short = 't', long, default_value = "100")]
    read_timeout_ms: u64,

    /// Maximum frame size in bytes
    #[arg(long, default_value = "8192")]
    max_frame_size: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,uartfs=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("uartfs Server v{}", uartfs::VERSION);
    tracing::info!("Root directory: {}", args.root.display());

    // Build config from args
    let config = Config::builder()
        .root_dir(&args.root)
        .read_timeout_ms(args.read_timeout_ms)
        .max_frame_size(args.max_frame_size)
        .build();

    // Open engine
    let engine = match Engine::open(config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Engine initialized successfully");

    let result = match &args.device {
        Some(device) => {
            tracing::info!("Serial device: {}", device.display());
            StreamLink::<File>::device(device).and_then(|link| Server::new(engine, link).run())
        }
        None => {
            tracing::info!("Listen address: {}", args.listen);
            let shutdown = Arc::new(AtomicBool::new(false));
            TcpListener::bind(&args.listen)
                .map_err(Into::into)
                .and_then(|listener| serve_tcp(engine, listener, shutdown))
        }
    };

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
