//! Catalog search command.

use shopvista_core::category_display_name;
use shopvista_storefront::catalog::{Catalog, FilterQuery};
use shopvista_storefront::error::AppError;
use shopvista_storefront::state::AppState;

use crate::SearchArgs;

/// Filter the catalog and print the matches.
#[allow(clippy::print_stdout)]
pub fn run(state: &AppState, args: &SearchArgs) -> Result<(), AppError> {
    let path = args
        .catalog
        .as_ref()
        .or(state.config().catalog_path.as_ref())
        .ok_or_else(|| {
            AppError::NotFound("catalog (pass --catalog or set SHOPVISTA_CATALOG_PATH)".to_string())
        })?;
    let catalog = Catalog::load(path)?;

    let mut query = FilterQuery::parse(&args.text, &args.category, &args.price, &args.rating)?;
    if let Some(label) = &args.nav {
        query.category = FilterQuery::for_navigation(label).category;
        println!("{}", category_display_name(label));
    }

    let result = catalog.filter(&query);
    println!("{}", result.label());
    for product in &result.matches {
        println!(
            "{:<12} {:<32} {:<14} {:>12}  {}/5",
            product.id, product.title, product.category, product.price, product.rating
        );
    }
    Ok(())
}
