//! Content API CLI binary.
//!
//! A command-line interface for reading items and packages from the
//! Superdesk Content API.

use clap::Parser;
use contentapi::cli::{Cli, Command, Resource};
use contentapi::output::PrettyPrint;
use contentapi::{
    ContentApiSdk, Get, Item, List, Package, PackageListQuery, Page, RequestParameters,
};
use serde::Serialize;
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let mut sdk = match ContentApiSdk::from_env() {
        Ok(sdk) => sdk,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set CONTENT_API_HOST and the CONTENT_API_* credential variables");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut sdk, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(sdk: &mut ContentApiSdk, cli: Cli) -> contentapi::Result<()> {
    match cli.command {
        Command::Get {
            resource,
            id,
            resolve,
        } => handle_get(sdk, resource, &id, resolve, cli.json).await,
        Command::List {
            resource,
            query,
            page,
            max_results,
            resolve,
        } => handle_list(sdk, resource, query, page, max_results, resolve, cli.json).await,
    }
}

async fn handle_get(
    sdk: &mut ContentApiSdk,
    resource: Resource,
    id: &str,
    resolve: bool,
    json: bool,
) -> contentapi::Result<()> {
    // Accept full URIs as well as bare identifiers
    let id = ContentApiSdk::get_id_from_uri(id);

    match resource {
        Resource::Item => {
            let item = Item::get(sdk, id).await?;
            output_single(&item, json)?;
        }
        Resource::Package => {
            let package = sdk.get_package(&id, resolve).await?;
            output_single(&package, json)?;
        }
    }
    Ok(())
}

async fn handle_list(
    sdk: &mut ContentApiSdk,
    resource: Resource,
    query: Option<String>,
    page: Option<u32>,
    max_results: Option<u32>,
    resolve: bool,
    json: bool,
) -> contentapi::Result<()> {
    let page = page.unwrap_or(1);
    let count = max_results.unwrap_or(contentapi::DEFAULT_PAGE_SIZE);
    let mut parameters = RequestParameters::new();
    parameters.query = query;

    match resource {
        Resource::Item => {
            let items = Item::list_page(sdk, &parameters, page, count).await?;
            output_page(&items, json, |i| ItemRow::from(i))?;
        }
        Resource::Package => {
            let query = PackageListQuery {
                parameters,
                resolve_associations: resolve,
            };
            let packages = Package::list_page(sdk, &query, page, count).await?;
            output_page(&packages, json, |p| PackageRow::from(p))?;
        }
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(resource: &T, json: bool) -> contentapi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(resource)?);
    } else {
        println!("{}", resource.pretty_print());
    }
    Ok(())
}

fn output_page<T, R, F>(page: &Page<T>, json: bool, to_row: F) -> contentapi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(&page.items)?);
    } else {
        let rows: Vec<R> = page.items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        if let Some(total) = page.total {
            let total_pages = (total + page.count as u64 - 1) / page.count.max(1) as u64;
            println!("\nPage {}/{} ({} total results)", page.page, total_pages, total);
        } else if page.has_more {
            println!("\nPage {} (more available)", page.page);
        } else {
            println!("\nPage {} (end)", page.page);
        }
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ItemRow {
    id: String,
    #[tabled(rename = "type")]
    item_type: String,
    headline: String,
    created: String,
}

impl From<&Item> for ItemRow {
    fn from(i: &Item) -> Self {
        Self {
            id: i.id(),
            item_type: i.item_type.clone().unwrap_or_default(),
            headline: i.headline.clone().unwrap_or_default(),
            created: i
                .versioncreated
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct PackageRow {
    id: String,
    headline: String,
    associations: usize,
}

impl From<&Package> for PackageRow {
    fn from(p: &Package) -> Self {
        Self {
            id: p.id(),
            headline: p.headline.clone().unwrap_or_default(),
            associations: p.association_count(),
        }
    }
}
