//! irrq CLI
//!
//! Command-line interface for querying IRR servers.

use clap::{Parser, Subcommand};
use irrq::protocol::Command;
use irrq::{Config, IrrClient, ProtocolFamily};
use tracing_subscriber::{fmt, EnvFilter};

/// irrq CLI
#[derive(Parser, Debug)]
#[command(name = "irrq")]
#[command(about = "Query Internet Routing Registry servers")]
#[command(version)]
struct Args {
    /// IRR server host
    #[arg(long, default_value = irrq::config::DEFAULT_HOST)]
    host: String,

    /// IRR server port
    #[arg(short, long, default_value_t = irrq::config::DEFAULT_PORT)]
    port: u16,

    /// Comma separated source databases (e.g. RADB,RIPE)
    #[arg(short, long, value_delimiter = ',')]
    sources: Option<Vec<String>>,

    /// Do not send the keepalive command on connect
    #[arg(long)]
    no_keepalive: bool,

    /// Connect/read/write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "30000")]
    timeout_ms: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand as-sets or route-sets into their members
    Members {
        /// Set names
        #[arg(required = true)]
        objects: Vec<String>,

        /// Only list direct members
        #[arg(long)]
        no_expand: bool,
    },

    /// List routes registered for an object
    Routes {
        /// Object name (aut-num, as-set, route-set)
        object: String,

        /// Protocol family (4 or 6)
        #[arg(short, long, default_value = "4")]
        family: u8,
    },

    /// Build a de-duplicated prefix list for objects
    PrefixList {
        /// Object names
        #[arg(required = true)]
        objects: Vec<String>,

        /// Protocol family (4 or 6)
        #[arg(short, long, default_value = "4")]
        family: u8,
    },

    /// Send a raw command (e.g. '!iAS-EXAMPLE,1') and print the reply
    Raw {
        /// Command text without trailing newline
        command: String,
    },
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,irrq=info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut builder = Config::builder()
        .host(&args.host)
        .port(args.port)
        .keepalive(!args.no_keepalive)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms);
    if let Some(sources) = &args.sources {
        builder = builder.sources(sources.iter().cloned());
    }
    let config = builder.build();

    tracing::debug!("irrq v{} querying {}", irrq::VERSION, config.addr());

    if let Err(e) = run(&config, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> irrq::Result<()> {
    IrrClient::session(config, |client| match command {
        Commands::Members { objects, no_expand } => {
            for member in client.get_set(&objects, !no_expand)? {
                println!("{}", member);
            }
            Ok(())
        }
        Commands::Routes { object, family } => {
            let family = ProtocolFamily::try_from(family)?;
            for prefix in client.routes(&object, family)? {
                println!("{}", prefix);
            }
            Ok(())
        }
        Commands::PrefixList { objects, family } => {
            let family = ProtocolFamily::try_from(family)?;
            print!("{}", client.prefix_list(&objects, family)?);
            Ok(())
        }
        Commands::Raw { command } => {
            match client.connection_mut().execute(&Command::Raw(command))? {
                Some(text) => println!("{}", text),
                None => tracing::info!("no data"),
            }
            Ok(())
        }
    })
}
