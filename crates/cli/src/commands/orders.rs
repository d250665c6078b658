//! Order history command.

use shopvista_core::format_money;
use shopvista_storefront::orders::order_count_message;
use shopvista_storefront::state::AppState;

/// Print every recorded order.
#[allow(clippy::print_stdout)]
pub fn show(state: &AppState) {
    let orders = state.orders().list_orders();
    println!("{}", order_count_message(orders.len()));
    for order in &orders {
        println!(
            "#{}  {}  {:<9}  {} item(s)  {}",
            order.id,
            order.placed_at.format("%Y-%m-%d %H:%M"),
            order.status,
            order.item_count(),
            format_money(order.total)
        );
    }
}
