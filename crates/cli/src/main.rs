//! Fastrac CLI - storefront driver.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! fastrac products --category mens-shirts --sort price-asc
//! fastrac products --search "leather"
//! fastrac product 83
//!
//! # Manage the cart (persisted under FASTRAC_DATA_DIR)
//! fastrac cart add 83 --quantity 2 --size M --color Black
//! fastrac cart list
//! fastrac cart set 83 3
//! fastrac cart remove 83
//!
//! # Hand the order off to WhatsApp
//! fastrac checkout
//! fastrac buy 83 --quantity 1 --size M --color Black
//!
//! # Session
//! fastrac login -u emilys -p emilyspass
//! fastrac whoami
//! fastrac logout
//! ```
//!
//! # Environment Variables
//!
//! - `FASTRAC_API_URL` - Base URL of the catalog/auth API
//! - `FASTRAC_WHATSAPP_NUMBER` - Order hand-off number
//! - `FASTRAC_APP_NAME`, `FASTRAC_EXCHANGE_RATE`, `FASTRAC_DATA_DIR` - optional

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI's output is its interface
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use fastrac_storefront::catalog::SortKey;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "fastrac")]
#[command(author, version, about = "Fastrac storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the product catalog
    Products {
        /// Restrict to one category slug (e.g. `mens-shirts`)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order
        #[arg(short, long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,

        /// Free-text search across the supported categories
        #[arg(short = 'q', long)]
        search: Option<String>,
    },
    /// Show one product in detail
    Product {
        /// Product id
        id: i64,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Serialize the cart into a WhatsApp order link
    Checkout,
    /// Order a single product directly, bypassing the cart
    Buy {
        /// Product id
        product_id: i64,

        /// Quantity (free-form; corrected against the product's stock)
        #[arg(short = 'n', long, default_value = "1")]
        quantity: String,

        /// Variant size (defaults to the category's first size)
        #[arg(long)]
        size: Option<String>,

        /// Variant color name (defaults to the category's first color)
        #[arg(long)]
        color: Option<String>,
    },
    /// Log in to the storefront
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Show the logged-in user
    Whoami,
    /// Log out and clear the cached session
    Logout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product id
        product_id: i64,

        /// Quantity (free-form; corrected against the product's stock)
        #[arg(short = 'n', long, default_value = "1")]
        quantity: String,

        /// Variant size (defaults to the category's first size)
        #[arg(long)]
        size: Option<String>,

        /// Variant color name (defaults to the category's first color)
        #[arg(long)]
        color: Option<String>,
    },
    /// List the cart's lines and totals
    List,
    /// Remove a product's line
    Remove {
        /// Product id
        product_id: i64,
    },
    /// Set a line's quantity (0 removes the line)
    Set {
        /// Product id
        product_id: i64,

        /// New quantity (free-form; corrected against the product's stock)
        quantity: String,
    },
    /// Empty the cart
    Clear,
}

/// CLI-facing mirror of [`SortKey`] so clap can enumerate values.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum SortArg {
    Newest,
    PriceAsc,
    PriceDesc,
    Rating,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => Self::Newest,
            SortArg::PriceAsc => Self::PriceAsc,
            SortArg::PriceDesc => Self::PriceDesc,
            SortArg::Rating => Self::Rating,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let ctx = Context::load()?;

    match cli.command {
        Commands::Products {
            category,
            sort,
            search,
        } => commands::products::list(&ctx, category, sort.into(), search).await?,
        Commands::Product { id } => commands::products::show(&ctx, id).await?,
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
                size,
                color,
            } => commands::cart::add(&ctx, product_id, &quantity, size, color).await?,
            CartAction::List => commands::cart::list(&ctx),
            CartAction::Remove { product_id } => commands::cart::remove(&ctx, product_id),
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&ctx, product_id, &quantity),
            CartAction::Clear => commands::cart::clear(&ctx),
        },
        Commands::Checkout => commands::cart::checkout(&ctx),
        Commands::Buy {
            product_id,
            quantity,
            size,
            color,
        } => commands::cart::buy_now(&ctx, product_id, &quantity, size, color).await?,
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await?;
        }
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Logout => commands::auth::logout(&ctx),
    }
    Ok(())
}
