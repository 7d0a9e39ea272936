//! shoplist - Personal shopping-list manager CLI
//!
//! Catalog CRUD plus Amazon page scraping, price tracking, and xlsx export.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shoplist::commands::{ExportCommand, ManageCommand, RefreshPriceCommand, SubmitLinkCommand};
use shoplist::store::JsonStore;
use shoplist::{Config, LinkSubmission, ProductForm};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shoplist",
    version,
    about = "Personal shopping-list manager",
    long_about = "Manage a product catalog: add entries by hand or by scraping an Amazon \
                  product page, track price changes, and export everything to a spreadsheet."
)]
struct Cli {
    /// Data directory for the catalog and images
    #[arg(long, global = true, env = "SHOPLIST_DATA")]
    data_dir: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "SHOPLIST_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries, newest first
    #[command(alias = "ls")]
    List,

    /// Add a product from a filled-in form
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        brand: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long, default_value = "")]
        description: String,

        /// Image file for the product
        #[arg(long)]
        image: PathBuf,
    },

    /// Scrape a product page and add the result
    #[command(alias = "link")]
    AddLink {
        /// Product page URL
        link: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        description: String,
    },

    /// Edit an existing product
    Edit {
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        brand: String,

        #[arg(long)]
        category: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long, default_value = "")]
        description: String,

        /// Replacement image; omit to keep the current one
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a product and its stored image
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Re-scrape a product's page and update price + trend
    Refresh { id: i64 },

    /// Export the catalog to an xlsx spreadsheet
    Export {
        /// Output path (defaults to ShoppingList.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    let mut store = JsonStore::open(config.data_dir.join("catalog.json"))?;

    match cli.command {
        Commands::List => {
            let manage = ManageCommand::new(&config);
            let records = manage.list(&store)?;

            if records.is_empty() {
                println!("The shopping list is empty.");
                return Ok(());
            }

            println!(
                "{:<5} {:<30} {:<15} {:<12} {:>10} {:<3} {:<10}",
                "Id", "Name", "Brand", "Category", "Price", "", "Created"
            );
            println!("{:-<5} {:-<30} {:-<15} {:-<12} {:-<10} {:-<3} {:-<10}", "", "", "", "", "", "", "");

            for r in records {
                let name = if r.name.chars().count() > 30 {
                    let short: String = r.name.chars().take(27).collect();
                    format!("{short}...")
                } else {
                    r.name.clone()
                };
                println!(
                    "{:<5} {:<30} {:<15} {:<12} {:>10} {:<3} {:<10}",
                    r.id,
                    name,
                    r.brand,
                    r.category,
                    r.price.to_string(),
                    r.price_trend.arrow(),
                    r.created_at.format("%m/%d/%Y")
                );
            }
        }

        Commands::Add { name, brand, category, price, description, image } => {
            let form = ProductForm {
                name,
                brand,
                category,
                price,
                description,
                image_file: Some(image),
            };

            let manage = ManageCommand::new(&config);
            let record = manage.add(&mut store, &form)?;
            println!("Added product {} ('{}')", record.id, record.name);
        }

        Commands::AddLink { link, category, description } => {
            let submission = LinkSubmission { link, category, description };

            let cmd = SubmitLinkCommand::new(config);
            let record = cmd.execute(&mut store, &submission).await?;
            println!(
                "Added product {} ('{}' by {}) at {}",
                record.id, record.name, record.brand, record.price
            );
        }

        Commands::Edit { id, name, brand, category, price, description, image } => {
            let form = ProductForm {
                name,
                brand,
                category,
                price,
                description,
                image_file: image,
            };

            let manage = ManageCommand::new(&config);
            let record = manage.edit(&mut store, id, &form)?;
            println!("Updated product {}", record.id);
        }

        Commands::Delete { id } => {
            let manage = ManageCommand::new(&config);
            manage.delete(&mut store, id)?;
            println!("Deleted product {}", id);
        }

        Commands::Refresh { id } => {
            let cmd = RefreshPriceCommand::new(config);
            let record = cmd.execute(&mut store, id).await?;
            println!(
                "Price for {} is now {} ({})",
                record.id, record.price, record.price_trend
            );
        }

        Commands::Export { output } => {
            let cmd = ExportCommand::new(config);
            let path = cmd.execute(&store, output.as_deref())?;
            println!("Exported to {}", path.display());
        }
    }

    Ok(())
}
