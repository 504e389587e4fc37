//! Vitrina CLI - query the Shopify Storefront API from a terminal.
//!
//! # Usage
//!
//! ```bash
//! vitrina menu next-js-frontend-header-menu
//! vitrina products -q rollo --sort price-asc
//! vitrina product bolsa-kraft
//! vitrina collections
//! vitrina collection-products bolsas-papel -q rollo
//! vitrina recommendations gid://shopify/Product/123
//! vitrina cart "gid://shopify/Cart/abc?key=def"
//! ```
//!
//! Reads the same `SHOPIFY_*` environment (and `.env`) as the storefront
//! server and prints pretty JSON.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(author, version, about = "Vitrina Shopify Storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a navigation menu
    Menu {
        /// Menu handle
        handle: String,
    },
    /// Search products
    Products {
        /// Search text
        #[arg(short, long)]
        query: Option<String>,

        /// Sort slug (`trending-desc`, `latest-desc`, `price-asc`, `price-desc`)
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Print one product, hidden or not
    Product {
        /// Product handle
        handle: String,
    },
    /// List collections
    Collections,
    /// List the products of a collection
    CollectionProducts {
        /// Collection handle
        handle: String,

        /// Case-insensitive filter on title, description and tags
        #[arg(short, long)]
        query: Option<String>,

        /// Sort slug
        #[arg(short, long)]
        sort: Option<String>,
    },
    /// Print products recommended alongside a product
    Recommendations {
        /// Product global ID
        product_id: String,
    },
    /// Print a cart
    Cart {
        /// Cart global ID
        cart_id: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = commands::client()?;

    match cli.command {
        Commands::Menu { handle } => commands::catalog::menu(&client, &handle).await,
        Commands::Products { query, sort } => {
            commands::catalog::products(&client, query.as_deref(), sort.as_deref()).await
        }
        Commands::Product { handle } => commands::catalog::product(&client, &handle).await,
        Commands::Collections => commands::catalog::collections(&client).await,
        Commands::CollectionProducts {
            handle,
            query,
            sort,
        } => {
            commands::catalog::collection_products(
                &client,
                &handle,
                query.as_deref(),
                sort.as_deref(),
            )
            .await
        }
        Commands::Recommendations { product_id } => {
            commands::catalog::recommendations(&client, product_id.into()).await
        }
        Commands::Cart { cart_id } => commands::cart::show(&client, cart_id.into()).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_collection_products() {
        let cli = Cli::try_parse_from([
            "vitrina",
            "collection-products",
            "bolsas-papel",
            "-q",
            "rollo",
            "--sort",
            "price-asc",
        ]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::CollectionProducts { handle, query: Some(q), sort: Some(s) })
                if handle == "bolsas-papel" && q == "rollo" && s == "price-asc"
        ));
    }
}
