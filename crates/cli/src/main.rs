//! `krishna`: browse the catalog and drive a session-backed cart from the shell.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use krishna_cart::{Cart, CartLine, CartSettings};
use krishna_catalog::{Catalog, Category, InMemoryCatalog, Product, Slug};
use krishna_core::{Entity, ProductId};
use krishna_infra::{AppConfig, load_catalog_file, open_session_store};
use krishna_observability::LogFormat;
use krishna_session::{SessionId, SessionStore};

#[derive(Debug, Parser)]
#[command(name = "krishna", about = "Jewellery catalog and cart", version)]
struct Cli {
    /// Log line format on stderr (`json` or `text`).
    #[arg(long, global = true, default_value = "json", value_parser = parse_log_format)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(subcommand)]
    Catalog(CatalogCommands),
    #[command(subcommand)]
    Cart(CartCommands),
}

#[derive(Debug, Subcommand)]
enum CatalogCommands {
    /// List products that are currently available.
    List {
        /// Restrict the listing to one category slug.
        #[arg(long)]
        category: Option<String>,
    },
    /// List every category.
    Categories,
}

#[derive(Debug, Subcommand)]
enum CartCommands {
    /// Show cart lines and totals.
    Show(SessionArgs),
    /// Add a product, or set its quantity with `--override`.
    Add {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long)]
        product: ProductId,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long = "override")]
        override_quantity: bool,
    },
    /// Remove a product's line.
    Remove {
        #[command(flatten)]
        session: SessionArgs,
        #[arg(long)]
        product: ProductId,
    },
    /// Empty the cart.
    Clear(SessionArgs),
}

#[derive(Debug, Clone, Args)]
struct SessionArgs {
    /// Session key; a new one is generated when omitted.
    #[arg(long)]
    session: Option<String>,
}

fn parse_log_format(raw: &str) -> Result<LogFormat, String> {
    LogFormat::parse(raw).ok_or_else(|| format!("unknown log format '{raw}'"))
}

#[derive(Debug, Serialize)]
struct CategoryListing {
    label: &'static str,
    categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
struct CartView {
    session: String,
    lines: Vec<CartLine>,
    skipped: usize,
    item_count: u64,
    total_price: Decimal,
    total_weight: Decimal,
}

struct App {
    config: AppConfig,
    catalog: Arc<InMemoryCatalog>,
    sessions: Arc<dyn SessionStore>,
}

impl App {
    fn initialize() -> Result<Self> {
        let config = AppConfig::from_env().context("failed to load configuration")?;

        let catalog = match &config.catalog_path {
            Some(path) => load_catalog_file(path)
                .with_context(|| format!("failed to load catalog from {}", path.display()))?,
            None => {
                tracing::warn!("CATALOG_PATH not set; starting with an empty catalog");
                InMemoryCatalog::new()
            }
        };

        let sessions = open_session_store(&config).context("failed to open session store")?;

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            sessions,
        })
    }

    fn product(&self, id: ProductId) -> Result<Product> {
        self.catalog
            .find_product_by_id(id)
            .ok_or_else(|| anyhow!("product {id} not found"))
    }

    /// Load the session, run `op` against its cart, then persist any change.
    fn with_cart<T>(&self, args: &SessionArgs, op: impl FnOnce(&SessionId, &mut Cart<'_>) -> Result<T>) -> Result<T> {
        let id = match args.session.as_deref() {
            Some(raw) => SessionId::parse(raw).ok_or_else(|| anyhow!("session key must not be empty"))?,
            None => SessionId::generate(),
        };

        let mut session = self.sessions.load(&id)?;
        let settings = CartSettings::new(self.config.cart_session_key.clone());
        let out = {
            let mut cart = Cart::load(&mut session, &settings);
            op(&id, &mut cart)?
        };
        if self.sessions.save_if_modified(&mut session)? {
            tracing::debug!(session_id = %id, "session saved");
        }
        Ok(out)
    }

    fn view(&self, id: &SessionId, cart: &Cart<'_>) -> CartView {
        let lines = cart.lines(&self.catalog);
        let skipped = lines.skipped();
        CartView {
            session: id.to_string(),
            lines: lines.collect(),
            skipped,
            item_count: cart.item_count(),
            total_price: cart.total_price(),
            total_weight: cart.total_weight(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    krishna_observability::init_with(cli.log_format);
    let app = App::initialize()?;

    match cli.command {
        Commands::Catalog(CatalogCommands::List { category }) => {
            let slug = category
                .map(Slug::parse)
                .transpose()
                .context("invalid category slug")?;
            match &slug {
                Some(slug) if app.catalog.find_category_by_slug(slug).is_none() => {
                    return Err(anyhow!("category '{slug}' not found"));
                }
                _ => {}
            }
            let products = app.catalog.list_available_products(slug.as_ref());
            print_json(&products)?;
        }
        Commands::Catalog(CatalogCommands::Categories) => {
            print_json(&CategoryListing {
                label: Category::VERBOSE_NAME_PLURAL,
                categories: app.catalog.categories(),
            })?;
        }
        Commands::Cart(command) => {
            let view = run_cart_command(&app, command)?;
            print_json(&view)?;
        }
    }

    Ok(())
}

fn run_cart_command(app: &App, command: CartCommands) -> Result<CartView> {
    match command {
        CartCommands::Show(session) => app.with_cart(&session, |id, cart| Ok(app.view(id, cart))),
        CartCommands::Add {
            session,
            product,
            quantity,
            override_quantity,
        } => {
            let product = app.product(product)?;
            app.with_cart(&session, |id, cart| {
                let quantity = cart.add(&product, quantity, override_quantity)?;
                tracing::info!(product_id = %product.id(), quantity, "cart updated");
                Ok(app.view(id, cart))
            })
        }
        CartCommands::Remove { session, product } => app.with_cart(&session, |id, cart| {
            if !cart.remove_id(product) {
                tracing::info!(product_id = %product, "product was not in the cart");
            }
            Ok(app.view(id, cart))
        }),
        CartCommands::Clear(session) => app.with_cart(&session, |id, cart| {
            cart.clear();
            Ok(app.view(id, cart))
        }),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
