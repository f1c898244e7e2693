//! Gadmin - Gluster cluster administration
//!
//! This is the main entry point for the gadmin CLI.

mod cli;

use anyhow::Result;
use cli::commands::{CommandContext, Runnable};
use cli::{Cli, Commands};
use gadmin::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let cli = Cli::parse_args();

    let config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            std::process::exit(gadmin::Error::Config(String::new()).exit_code());
        }
    };

    init_logging(cli.verbosity(), config.logging.level.as_deref(), cli.is_json());

    if cli.verbosity() >= 2 {
        eprintln!("gadmin v{}", VERSION);
    }

    let mut ctx = CommandContext::new(&cli, config);

    let exit_code = match dispatch(&cli, &mut ctx) {
        Ok(code) => code,
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            e.downcast_ref::<gadmin::Error>()
                .map_or(1, gadmin::Error::exit_code)
        }
    };

    std::process::exit(exit_code);
}

fn dispatch(cli: &Cli, ctx: &mut CommandContext) -> Result<i32> {
    match &cli.command {
        Commands::Info => info(ctx),
        Commands::Cluster(command) => command.run(ctx),
        Commands::Hosts(args) => args.run(ctx),
        Commands::Run(args) => args.run(ctx),
    }
}

/// Initialize logging based on verbosity level. Log events go to stderr,
/// as JSON lines when JSON output was requested.
fn init_logging(verbosity: u8, configured: Option<&str>, json: bool) {
    let filter = match verbosity {
        0 => configured.unwrap_or("warn"),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(verbosity >= 3)
    });

    tracing_subscriber::registry()
        .with(json_layer)
        .with(text_layer)
        .with(env_filter)
        .init();
}

/// Show the home directory and inventory summary
fn info(ctx: &mut CommandContext) -> Result<i32> {
    let json = ctx.output.is_json();
    let home = ctx.home()?;

    if json {
        let summary = serde_json::json!({
            "home": home.path(),
            "inventory": home.inventory().dir(),
            "clusters": home.inventory().list_clusters(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", home);
    }
    Ok(0)
}
