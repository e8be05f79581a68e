use std::{env, path::PathBuf};

use clap::Parser;
use cli::{Args, Commands};
use docstore_config::config::{generate_default_config, set_config_path, Config};
use docstore_db::DbConnection;
use error::{ErrorContext, Result};
use logging::setup_logging;
use tracing::debug;

mod cli;
mod commands;
mod error;
mod logging;
mod utils;

fn resolve_config_path(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(env::current_dir()
        .with_context(|| "retrieving current directory".into())?
        .join(path))
}

/// Reads the config file, then layers environment and flag overrides on top.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::new()?;

    if let Some(uri) = &args.uri {
        config.database.uri = uri.clone();
    }
    if let Some(name) = &args.database {
        config.database.name = name.clone();
    }
    config.resolve()?;

    Ok(config)
}

async fn handle_cli() -> Result<()> {
    let args = Args::parse();

    if args.no_color {
        utils::disable_color();
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_config_path(c)?);
    }

    if let Commands::DefConfig = args.command {
        setup_logging(&args, None)?;
        generate_default_config()?;
        return Ok(());
    }

    let config = load_config(&args)?;
    setup_logging(&args, Some(&config.log))?;
    debug!("Connecting to {}", config.database.uri);

    let conn = DbConnection::connect(&config.database).await?;

    match args.command {
        Commands::DefConfig => unreachable!(),
        Commands::Ping => commands::ping(&conn).await?,
        Commands::Find {
            collection,
            filter,
            limit,
        } => commands::find(&conn, &collection, filter.as_deref(), limit).await?,
        Commands::Get {
            collection,
            id,
        } => commands::get(&conn, &collection, &id).await?,
        Commands::Insert {
            collection,
            document,
        } => commands::insert(&conn, &collection, &document).await?,
        Commands::Update {
            collection,
            filter,
            id,
            update,
            many,
        } => {
            commands::update(
                &conn,
                &collection,
                filter.as_deref(),
                id.as_deref(),
                &update,
                many,
            )
            .await?
        }
        Commands::Delete {
            collection,
            filter,
            id,
            many,
        } => commands::delete(&conn, &collection, filter.as_deref(), id.as_deref(), many).await?,
        Commands::Aggregate {
            collection,
            pipeline,
        } => commands::aggregate(&conn, &collection, &pipeline).await?,
        Commands::Count {
            collection,
            filter,
        } => commands::count(&conn, &collection, filter.as_deref()).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
