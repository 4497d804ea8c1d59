use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokescout_api::PokeApiClient;
use pokescout_core::{
    catalog::{CatalogSource, PokeApiCatalog},
    favorites::FavoritesStore,
    session::{FileSessionStore, SessionStore},
    Config,
};
use pokescout_tui::{run_tui, App};

#[derive(Parser)]
#[command(name = "pokescout")]
#[command(version, about = "Terminal browser for the PokeAPI catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print one page of the pokemon catalog
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,
        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,
    },
    /// Print the detail record for a pokemon
    Show {
        /// Pokemon name or numeric id
        name_or_id: String,
    },
    /// Print the favorites saved in the current session
    Favorites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "pokescout_cli=info,pokescout_core=info,pokescout_api=info,pokescout_tui=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|err| {
        tracing::warn!("Falling back to default config: {err}");
        Config::default()
    });

    let client =
        PokeApiClient::with_base_urls(config.api.base_url.clone(), config.api.sprite_base_url.clone());
    let catalog: Arc<dyn CatalogSource> = Arc::new(PokeApiCatalog::new(client));

    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::session_default());
    let store = FavoritesStore::new(session);

    match cli.command {
        Some(Commands::List { page, page_size }) => {
            let size = page_size.unwrap_or(config.ui.page_size).max(1);
            let listing = catalog.fetch_page(size, page * size).await?;

            println!(
                "Page {} of {} ({} pokemon total)",
                page + 1,
                (listing.total + size - 1) / size,
                listing.total
            );
            for item in listing.items {
                println!("#{:<5} {:<16} {}", item.id, item.name, item.image);
            }
        }
        Some(Commands::Show { name_or_id }) => {
            let query = name_or_id.trim().to_lowercase();
            let details = catalog.fetch_detail(&query).await?;

            println!("{} (#{})", details.name, details.id);
            println!("Species:    {}", details.species);
            println!("Types:      {}", details.types.join(", "));
            println!("Abilities:  {}", details.abilities.join(", "));
            println!(
                "Height: {}  Weight: {}  Base exp: {}  Order: {}",
                details.height, details.weight, details.base_experience, details.order
            );
            println!("Stats:");
            for stat in &details.stats {
                println!("  {:<16} {}", stat.name, stat.value);
            }
            println!(
                "Moves: {}  Forms: {}  Held items: {}",
                details.moves_count, details.forms_count, details.held_items_count
            );
        }
        Some(Commands::Favorites) => {
            let favorites = store.favorites();
            if favorites.is_empty() {
                println!("No favorites in this session.");
            } else {
                for entry in favorites {
                    println!(
                        "{:<16} ({}, #{}) added {}",
                        entry.alias,
                        entry.name,
                        entry.id,
                        entry.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
            }
        }
        None => {
            let app = App::new(
                config.ui.page_size.max(1),
                Duration::from_millis(config.ui.search_debounce_ms),
            );
            run_tui(app, catalog, store, config.ui.mouse_enabled).await?;
        }
    }

    Ok(())
}
