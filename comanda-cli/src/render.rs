//! Plain-text rendering of store views

use chrono::{DateTime, Local, Utc};
use comanda_client::Snapshot;
use serde::Serialize;
use shared::Decimal;
use shared::views::{AreaLanes, BoardCard, ProductionBoard, SalesReport, TabOverview};

pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn money(value: Decimal) -> String {
    format!("R$ {:.2}", value)
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

pub fn menu(snapshot: &Snapshot) {
    let sections = snapshot.menu_sections();
    if sections.is_empty() {
        println!("No menu items.");
        return;
    }
    for section in sections {
        println!("{}", section.category);
        for item in section.items {
            println!(
                "  #{:<5} {:<34} {:>10}  {}",
                item.id,
                item.name,
                money(item.price),
                item.description
            );
        }
    }
}

pub fn tabs(overview: &[TabOverview]) {
    if overview.is_empty() {
        println!("No open tabs.");
        return;
    }
    for tab in overview {
        let total = tab.total.map(money).unwrap_or_else(|| "-".to_string());
        println!(
            "Table {} (tab #{}, opened {})  total {}",
            tab.table_number,
            tab.tab_id,
            local_time(tab.opened_at),
            total
        );
        if tab.lines.is_empty() {
            println!("  (no items)");
        }
        for line in &tab.lines {
            println!(
                "  #{:<5} {:>2}x {:<34} {:<15} {:<8} {}",
                line.item_id,
                line.quantity,
                line.name.as_deref().unwrap_or("(removed item)"),
                line.status,
                line.area,
                line.value.map(money).unwrap_or_default()
            );
        }
    }
}

fn card(card: &BoardCard) {
    let next = card
        .next
        .map(|s| format!("-> {}", s))
        .unwrap_or_default();
    println!(
        "    Table {:<4} {:<36} {:<15} {}  (tab #{}, item #{}, {})",
        card.table_number,
        card.title,
        card.status,
        next,
        card.tab_id,
        card.item_id,
        local_time(card.opened_at)
    );
}

fn lanes(title: &str, lanes: &AreaLanes) {
    println!("{}", title);
    if lanes.is_empty() {
        println!("  Nothing to prepare.");
        return;
    }
    println!("  In progress");
    lanes.in_progress.iter().for_each(card);
    println!("  Ready");
    lanes.ready.iter().for_each(card);
}

pub fn board(board: &ProductionBoard) {
    lanes("Kitchen", &board.kitchen);
    lanes("Bar", &board.bar);
}

pub fn report(report: &SalesReport) {
    if report.is_empty() {
        println!("No closed tabs to report on.");
        return;
    }
    println!("Total sales     {}", money(report.total_sales));
    println!("Closed tabs     {}", report.orders);
    println!("Average ticket  {}", money(report.average_ticket));
    println!("Items sold      {}", report.items_sold);

    println!("\nBy hour");
    for (hour, value) in &report.by_hour {
        println!("  {:<5} {:>12}", hour, money(*value));
    }
    println!("\nBy category");
    for (category, value) in &report.by_category {
        println!("  {:<10} {:>12}", category.label(), money(*value));
    }
    println!("\nTop items");
    for (rank, item) in report.top_items.iter().enumerate() {
        println!(
            "  {}. {:<34} {:>4}x {:>12}",
            rank + 1,
            item.name,
            item.units,
            money(item.revenue)
        );
    }
}
