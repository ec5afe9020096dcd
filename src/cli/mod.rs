//! Command line front end.
//!
//! Each subcommand opens the persisted cart, applies one store operation and
//! prints the result, the same way the storefront's cart widget, sidebar and
//! cart page drive the store.

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use tabled::settings::{Alignment, Style, object::Columns};
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::{Cart, NewCartItem},
    catalog::{Catalog, CatalogError, CatalogPage, CatalogQuery, DEFAULT_PER_PAGE, MangaId, YamlCatalog},
    config::AppConfig,
    receipt::{Receipt, ReceiptError},
    storage::FileStorage,
    store::CartStore,
};

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The catalog could not be loaded or queried.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A receipt could not be written.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),

    /// Writing output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    /// The requested manga is not in the catalog.
    #[error("manga {0} is not in the catalog")]
    UnknownManga(MangaId),
}

/// Akihabara Manga Store cart
#[derive(Debug, Parser)]
#[command(name = "akihabara", about = "Akihabara Manga Store cart", long_about = None)]
pub struct Cli {
    /// Configuration shared by every command.
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Browse the catalog
    Catalog {
        /// Page to show
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Results per page
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,

        /// Title filter
        #[arg(long)]
        search: Option<String>,

        /// Genre filter
        #[arg(long)]
        genre: Option<String>,
    },

    /// List the genres available as filters
    Genres,

    /// Add a manga from the catalog to the cart
    Add {
        /// Manga ID
        id: MangaId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set the quantity of a cart line; zero removes it
    Update {
        /// Manga ID
        id: MangaId,

        /// New quantity
        quantity: u32,
    },

    /// Add one unit to a cart line
    Increment {
        /// Manga ID
        id: MangaId,
    },

    /// Take one unit off a cart line
    Decrement {
        /// Manga ID
        id: MangaId,
    },

    /// Remove a line from the cart
    Remove {
        /// Manga ID
        id: MangaId,
    },

    /// Show the cart
    Show,

    /// Empty the cart
    Clear,

    /// Check out (simulated; no payment is taken)
    Checkout,
}

impl Cli {
    /// Parse arguments after loading `.env`, if present.
    pub fn load() -> Self {
        let _env = dotenvy::dotenv();

        Self::parse()
    }

    /// Run the selected command, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns a [`CliError`] if the catalog cannot be used or output cannot be written.
    pub fn run(self, out: &mut impl Write) -> Result<(), CliError> {
        let Cli { config, command } = self;

        let mut store = CartStore::open(config.storage.file_storage(), config.storage.cart_key.clone());
        let catalog = || YamlCatalog::from_file(&config.catalog.catalog);

        debug!(?command, "running command");

        match command {
            Command::Catalog {
                page,
                per_page,
                search,
                genre,
            } => {
                let query = CatalogQuery::new()
                    .page(page)
                    .per_page(per_page)
                    .search(search.unwrap_or_default())
                    .genre(genre.unwrap_or_default());

                write_catalog_page(out, &catalog()?.page(&query)?)?;
            }
            Command::Genres => {
                for genre in catalog()?.genres() {
                    writeln!(out, "{genre}")?;
                }
            }
            Command::Add { id, quantity } => {
                let manga = catalog()?.get(id)?.ok_or(CliError::UnknownManga(id))?;
                let offer = NewCartItem::from(&manga);
                let title = offer.title.clone();

                let added = store.add_item(offer, quantity);

                if added < quantity {
                    writeln!(
                        out,
                        "Only {added} of {quantity} could be added: {} in stock.",
                        manga.stock
                    )?;
                }

                writeln!(out, "Added {added} × {title}.")?;
                write_summary(out, store.cart())?;
            }
            Command::Update { id, quantity } => {
                store.update_quantity(id, quantity);
                write_cart(out, &store)?;
            }
            Command::Increment { id } => {
                store.increment(id);
                write_cart(out, &store)?;
            }
            Command::Decrement { id } => {
                store.decrement(id);
                write_cart(out, &store)?;
            }
            Command::Remove { id } => {
                store.remove_item(id);
                write_cart(out, &store)?;
            }
            Command::Show => write_cart(out, &store)?,
            Command::Clear => {
                store.clear();
                writeln!(out, "Cart cleared.")?;
            }
            Command::Checkout => match store.checkout() {
                Some(receipt) => {
                    receipt.write_to(&mut *out)?;
                    writeln!(
                        out,
                        "\nThank you for your purchase! This is a demo; no payment was processed."
                    )?;
                }
                None => writeln!(out, "Your cart is empty; nothing to check out.")?,
            },
        }

        Ok(())
    }
}

fn write_cart(out: &mut impl Write, store: &CartStore<FileStorage>) -> Result<(), CliError> {
    match Receipt::from_cart(store.cart()) {
        Some(summary) => summary.write_to(&mut *out)?,
        None => writeln!(out, "Your cart is empty.")?,
    }

    Ok(())
}

fn write_summary(out: &mut impl Write, cart: &Cart) -> Result<(), CliError> {
    let count = cart.item_count();
    let label = if count == 1 { "item" } else { "items" };

    writeln!(out, "Cart: {count} {label}, {}", cart.total())?;

    Ok(())
}

fn write_catalog_page(out: &mut impl Write, page: &CatalogPage) -> Result<(), CliError> {
    let info = &page.page_info;

    if page.media.is_empty() {
        writeln!(out, "No manga found.")?;
    } else {
        let mut builder = tabled::builder::Builder::default();

        builder.push_record(["ID", "Title", "Genres", "Score", "Price", "Stock"]);

        for manga in &page.media {
            builder.push_record([
                manga.id.to_string(),
                manga.title.display().to_string(),
                manga.genres.join(", "),
                manga
                    .average_score
                    .map_or_else(|| "-".to_string(), |score| score.to_string()),
                manga.price.to_string(),
                manga.stock.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "{table}")?;
    }

    writeln!(
        out,
        "Page {} of {} ({} results)",
        info.current_page, info.last_page, info.total
    )?;

    Ok(())
}
