//! Handlers for the `favorite` subcommands.

use anyhow::{bail, Context};
use dialoguer::Confirm;
use owo_colors::OwoColorize;
use tabled::{Table, Tabled};

use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteCatalogStore};
use crate::app::Config;
use crate::cli::{Cli, FavoriteAddArgs, FavoriteCommand, FavoriteRemoveArgs};
use crate::domain::{Favorite, SizePreference};
use crate::port::outbound::store::CatalogStore;

/// Execute a favorite subcommand.
pub async fn execute(cli: &Cli, command: &FavoriteCommand) -> anyhow::Result<()> {
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let pool = create_pool(&config.database.url).context("opening database")?;
    run_migrations(&pool).context("running migrations")?;
    let store = SqliteCatalogStore::new(pool);

    match command {
        FavoriteCommand::Add(args) => add(&store, args).await,
        FavoriteCommand::Remove(args) => remove(&store, args).await,
        FavoriteCommand::List => list(&store).await,
    }
}

async fn add(store: &SqliteCatalogStore, args: &FavoriteAddArgs) -> anyhow::Result<()> {
    let terms: Vec<String> = args
        .terms
        .split(',')
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        bail!("at least one non-empty search term is required");
    }

    let size_preference = match args.size.as_deref() {
        Some(size) => Some(
            SizePreference::parse(size)
                .with_context(|| format!("invalid size '{size}' (expected 250g, 1kg or both)"))?,
        ),
        None => None,
    };

    let favorite = Favorite::new(&args.name, terms, size_preference, args.organic);
    store.save_favorite(&favorite).await?;
    println!("{} favorite '{}'", "Saved".green().bold(), favorite.name);
    Ok(())
}

async fn remove(store: &SqliteCatalogStore, args: &FavoriteRemoveArgs) -> anyhow::Result<()> {
    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove favorite '{}'?", args.name))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    if store.delete_favorite(&args.name).await? {
        println!("{} favorite '{}'", "Removed".green().bold(), args.name);
    } else {
        println!("No favorite named '{}'", args.name.yellow());
    }
    Ok(())
}

#[derive(Tabled)]
struct FavoriteLine {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Terms")]
    terms: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Organic only")]
    organic: String,
}

async fn list(store: &SqliteCatalogStore) -> anyhow::Result<()> {
    let favorites = store.list_favorites().await?;
    if favorites.is_empty() {
        println!("No favorites configured");
        return Ok(());
    }

    let lines: Vec<FavoriteLine> = favorites
        .iter()
        .map(|favorite| FavoriteLine {
            name: favorite.name.clone(),
            terms: favorite.terms.join(", "),
            size: favorite
                .size_preference
                .map_or_else(|| "any".to_string(), |p| p.as_str().to_string()),
            organic: if favorite.organic_only { "yes" } else { "no" }.to_string(),
        })
        .collect();

    println!("{}", Table::new(lines));
    Ok(())
}
