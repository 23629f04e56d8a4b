//! uartfs CLI Client
//!
//! Command-line interface for browsing and transferring files on a device.

use std::fs::File;
use std::net::TcpStream;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use uartfs::client::EntryKind;
use uartfs::link::{SerialLink, StreamLink};
use uartfs::{Client, Config, Result};

/// uartfs CLI
#[derive(Parser, Debug)]
#[command(name = "uartfs-cli")]
#[command(about = "CLI for devices speaking the uartfs protocol")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    /// Serial device to use instead of a TCP server
    #[arg(short, long)]
    device: Option<PathBuf>,

    /// Response timeout in milliseconds
    #[arg(short = 't', long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List a directory (default: the device's current directory)
    Ls {
        /// Directory to list
        path: Option<String>,
    },

    /// Change the device's current directory
    Cd {
        /// Directory to change to
        path: String,
    },

    /// Remove a file or an empty directory
    Rm {
        /// Path to remove
        path: String,
    },

    /// Download a file
    Get {
        /// Path on the device
        remote: String,

        /// Local destination (default: stdout)
        local: Option<PathBuf>,
    },

    /// Upload a file
    Put {
        /// Local file to send
        local: PathBuf,

        /// Path on the device
        remote: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let config = Config::builder().response_timeout_ms(args.timeout_ms).build();

    let result = match &args.device {
        Some(device) => StreamLink::<File>::device(device)
            .and_then(|link| run(Client::new(link, config), args.command)),
        None => TcpStream::connect(&args.server)
            .map_err(Into::into)
            .and_then(StreamLink::<TcpStream>::tcp)
            .and_then(|link| run(Client::new(link, config), args.command)),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run<L: SerialLink>(mut client: Client<L>, command: Commands) -> Result<()> {
    match command {
        Commands::Ls { path } => {
            for entry in client.ls(path.as_deref())? {
                let kind = match entry.kind {
                    EntryKind::Directory => 'd',
                    EntryKind::File => '-',
                };
                println!("{} {:>10} {}", kind, entry.size, entry.name);
            }
        }
        Commands::Cd { path } => client.cd(&path)?,
        Commands::Rm { path } => client.rm(&path)?,
        Commands::Get { remote, local } => {
            let contents = client.download(&remote)?;
            match local {
                Some(local) => std::fs::write(local, contents)?,
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&contents)?;
                }
            }
        }
        Commands::Put { local, remote } => {
            let contents = std::fs::read(local)?;
            client.upload(&remote, &contents)?;
        }
    }
    Ok(())
}
