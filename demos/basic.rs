//! Basic example demonstrating the Content API SDK.
//!
//! Run with:
//! ```
//! CONTENT_API_HOST=publicapi CONTENT_API_PORT=5050 CONTENT_API_PROTOCOL=http \
//! CONTENT_API_CLIENT_ID=client CONTENT_API_USERNAME=editor CONTENT_API_PASSWORD=secret \
//!     cargo run --example basic
//! ```

use contentapi::{Association, ContentApiSdk, Item, List, Package, PackageListQuery, RequestParameters};

#[tokio::main]
async fn main() -> contentapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating Content API SDK...");
    let mut sdk = ContentApiSdk::from_env()?;
    println!("Connected to: {}", sdk.host());

    // Search items
    println!("\n--- Searching Items ---");
    let query = RequestParameters::new().with_query("sport");
    let items = Item::list_page(&mut sdk, &query, 1, 10).await?;
    println!("Found {} items (total: {:?})", items.len(), items.total);

    for item in &items {
        println!(
            "  - {} ({})",
            item.headline.as_deref().unwrap_or("untitled"),
            item.id()
        );
    }

    // Packages with their associations resolved
    println!("\n--- Packages ---");
    let query = PackageListQuery {
        parameters: RequestParameters::new(),
        resolve_associations: true,
    };
    let packages = Package::list_page(&mut sdk, &query, 1, 5).await?;

    for package in &packages {
        println!("{}", package.headline.as_deref().unwrap_or("untitled"));
        for (group, entries) in package.associations.iter().flatten() {
            for (name, entry) in entries {
                let kind = match entry {
                    Association::Reference(_) => "unresolved",
                    Association::Item(_) => "item",
                    Association::Package(_) => "package",
                };
                println!("  [{group}] {name}: {kind} {}", entry.uri());
            }
        }
    }

    // Collections can also be sliced directly
    println!("\n--- Item Slice ---");
    let mut collection = sdk.get_items(RequestParameters::new())?;
    println!("{} items in total", collection.total_results().await?);
    for item in collection.slice(0, 3).await? {
        println!("  - {}", item.id());
    }

    Ok(())
}
