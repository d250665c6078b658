//! ShopVista CLI - drive the storefront core from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add to and inspect the cart
//! shopvista cart add p1 "Wireless Headphones" '$79.99'
//! shopvista cart show
//!
//! # Search a catalog
//! shopvista search --catalog crates/cli/catalog.json --text laptop --price 500+
//! shopvista search --catalog crates/cli/catalog.json --nav fiction
//!
//! # Check out and review orders
//! shopvista checkout --first-name Jane --last-name Doe --email jane@example.com \
//!     --address "1 Main St" --city Springfield --state IL --zip 62701
//! shopvista orders
//! ```
//!
//! # Commands
//!
//! - `cart` - Add, remove, clear and show cart items
//! - `wishlist` - Toggle, remove, show and move wishlist entries to the cart
//! - `search` - Filter a catalog by text, category, price band and rating
//! - `checkout` - Place an order for the cart
//! - `orders` - Show order history
//! - `account` - Sign in, sign up, sign out, show the current user
//! - `feedback` - Submit the feedback form
//!
//! State lives in `SHOPVISTA_DATA_DIR` (default `.shopvista`), one JSON file
//! per key.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopvista_storefront::config::StorefrontConfig;
use shopvista_storefront::error::AppError;
use shopvista_storefront::state::AppState;

mod commands;

#[derive(Parser)]
#[command(name = "shopvista")]
#[command(author, version, about = "ShopVista storefront from the command line")]
struct Cli {
    /// Directory for persisted state (overrides `SHOPVISTA_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Search and filter the catalog
    Search(SearchArgs),
    /// Place an order for the current cart
    Checkout(ShippingArgs),
    /// Show order history
    Orders,
    /// Manage the signed-in account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Submit feedback
    Feedback(FeedbackArgs),
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add {
        /// Product ID
        id: String,
        /// Product title
        title: String,
        /// Unit price as displayed, e.g. '$1,299.99'
        price: String,
    },
    /// Remove a product
    Remove {
        /// Product ID
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Show cart contents
    Show,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Save a product, or unsave it if already saved
    Toggle {
        /// Product ID
        id: String,
        /// Product title
        title: String,
        /// Price as displayed, e.g. '$45.00'
        price: String,
        /// Image reference
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Remove a saved product
    Remove {
        /// Product ID
        id: String,
    },
    /// Show saved products
    Show,
    /// Add a saved product to the cart
    ToCart {
        /// Product ID
        id: String,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    /// Catalog JSON file (overrides `SHOPVISTA_CATALOG_PATH`)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Case-insensitive title text
    #[arg(long, default_value = "")]
    text: String,

    /// Category, or "all"
    #[arg(long, default_value = "all")]
    category: String,

    /// Price band: all, 0-50, 50-100, 100-200, 200-500, 500+
    #[arg(long, default_value = "all")]
    price: String,

    /// Minimum rating 0-5, or "all"
    #[arg(long, default_value = "all")]
    rating: String,

    /// Navigation label (e.g. "laptops"), mapped to its broad category
    #[arg(long)]
    nav: Option<String>,
}

#[derive(Args)]
pub struct ShippingArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    state: String,
    #[arg(long)]
    zip: String,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Sign in with email and password (password from `SHOPVISTA_PASSWORD` or stdin)
    SignIn {
        #[arg(short, long)]
        email: String,
    },
    /// Create an account (passwords from `SHOPVISTA_PASSWORD` and
    /// `SHOPVISTA_CONFIRM_PASSWORD`, or stdin)
    SignUp {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
    },
    /// Sign out
    SignOut,
    /// Show the signed-in user
    Show,
}

#[derive(Args)]
pub struct FeedbackArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    message: String,
    /// Agree to the privacy policy
    #[arg(long)]
    consent: bool,
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopvista_storefront=info,shopvista_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        commands::report_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add { id, title, price } => {
                commands::cart::add(&state, &id, &title, &price)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&state, &id)?,
            CartAction::Clear => commands::cart::clear(&state)?,
            CartAction::Show => commands::cart::show(&state),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Toggle {
                id,
                title,
                price,
                image,
            } => commands::wishlist::toggle(&state, &id, &title, &price, &image)?,
            WishlistAction::Remove { id } => commands::wishlist::remove(&state, &id)?,
            WishlistAction::Show => commands::wishlist::show(&state),
            WishlistAction::ToCart { id } => commands::wishlist::to_cart(&state, &id)?,
        },
        Commands::Search(args) => commands::search::run(&state, &args)?,
        Commands::Checkout(args) => commands::checkout::run(&state, args).await?,
        Commands::Orders => commands::orders::show(&state),
        Commands::Account { action } => match action {
            AccountAction::SignIn { email } => {
                commands::account::sign_in(&state, &email).await?;
            }
            AccountAction::SignUp { name, email } => {
                commands::account::sign_up(&state, &name, &email).await?;
            }
            AccountAction::SignOut => commands::account::sign_out(&state)?,
            AccountAction::Show => commands::account::show(&state),
        },
        Commands::Feedback(args) => commands::feedback::run(&state, args).await?,
    }
    Ok(())
}
