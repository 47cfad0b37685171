use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jokebox::{CatalogSource, CatalogStore, CatalogSynchronizer, Config, JokeApiClient};

#[derive(Parser, Debug)]
#[command(name = "jokebox")]
#[command(about = "Offline-first joke catalog backed by JokeAPI")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/jokebox/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show the catalog, syncing from the remote service on first run
  Show,
  /// Wipe the local cache and resynchronize from the remote service
  Refresh,
  /// Fetch two more jokes for one category
  More {
    /// Category name as shown by `show`
    category: String,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;

  let client = JokeApiClient::new(&config.api.base_url)?;
  let store = match &config.database {
    Some(path) => CatalogStore::open(path)?,
    None => CatalogStore::open_default()?,
  };
  let mut catalog = CatalogSynchronizer::new(client, store);

  match args.command.unwrap_or(Command::Show) {
    Command::Show => catalog.start().await?,
    Command::Refresh => catalog.refresh().await?,
    Command::More { category } => {
      catalog.start().await?;
      catalog.add_more(&category).await?;
    }
  }

  print_catalog(&catalog);
  Ok(())
}

fn print_catalog<C: CatalogSource>(catalog: &CatalogSynchronizer<C>) {
  for view in catalog.views() {
    match &view.alias {
      Some(alias) => println!("{} (alias: {})", view.name, alias),
      None => println!("{}", view.name),
    }

    if view.jokes.is_empty() {
      println!("  (no jokes cached)");
    }
    for joke in &view.jokes {
      let marker = if joke.is_custom { "+" } else { "-" };
      println!("  {} {}", marker, joke.text.replace('\n', " / "));
    }
    if !view.exhausted {
      println!("  (try `jokebox more {}`)", view.name);
    }
    println!();
  }
}
