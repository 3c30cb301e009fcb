//! Sales report over closed tabs

use std::collections::{BTreeMap, HashMap};

use chrono::{TimeZone, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::find_menu_item;
use crate::models::{Category, MenuItem, Tab, TabStatus};

/// How many items the ranking keeps
pub const TOP_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub menu_item_id: String,
    pub name: String,
    pub units: u32,
    pub revenue: Decimal,
}

/// Aggregates for the sales screen.
///
/// Revenue is menu price × quantity; lines whose menu item is gone from the
/// catalog do not count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub total_sales: Decimal,
    /// Number of closed tabs
    pub orders: usize,
    /// `total_sales / orders`, two decimal places, zero without orders
    pub average_ticket: Decimal,
    pub items_sold: u32,
    /// Revenue per opening hour, labels like `"19h"`, in hour order
    pub by_hour: Vec<(String, Decimal)>,
    /// Revenue per category, in menu order, categories without sales omitted
    pub by_category: Vec<(Category, Decimal)>,
    /// Best sellers by revenue, at most [`TOP_ITEMS`]
    pub top_items: Vec<TopItem>,
}

impl SalesReport {
    /// Build the report; opening hours are bucketed in `tz`.
    pub fn build<Tz: TimeZone>(tabs: &[Tab], menu: &[MenuItem], tz: &Tz) -> Self {
        let closed: Vec<&Tab> = tabs
            .iter()
            .filter(|t| t.status == TabStatus::Closed)
            .collect();

        let mut total_sales = Decimal::ZERO;
        let mut items_sold = 0u32;
        let mut by_hour: BTreeMap<u32, Decimal> = BTreeMap::new();
        let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
        let mut per_item: HashMap<&str, TopItem> = HashMap::new();

        for tab in &closed {
            let hour = tab.opened_at.with_timezone(tz).hour();
            for line in &tab.items {
                let Some(menu_item) = find_menu_item(menu, &line.menu_item_id) else {
                    continue;
                };
                let value = menu_item.price * Decimal::from(line.quantity);

                total_sales += value;
                items_sold += line.quantity;
                *by_hour.entry(hour).or_default() += value;
                *by_category.entry(menu_item.category).or_default() += value;

                let entry = per_item
                    .entry(menu_item.id.as_str())
                    .or_insert_with(|| TopItem {
                        menu_item_id: menu_item.id.clone(),
                        name: menu_item.name.clone(),
                        units: 0,
                        revenue: Decimal::ZERO,
                    });
                entry.units += line.quantity;
                entry.revenue += value;
            }
        }

        let orders = closed.len();
        let average_ticket = if orders > 0 {
            (total_sales / Decimal::from(orders)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        let mut top_items: Vec<TopItem> = per_item.into_values().collect();
        top_items.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
        top_items.truncate(TOP_ITEMS);

        Self {
            total_sales,
            orders,
            average_ticket,
            items_sold,
            by_hour: by_hour
                .into_iter()
                .map(|(hour, value)| (format!("{hour:02}h"), value))
                .collect(),
            by_category: by_category.into_iter().collect(),
            top_items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemStatus, LineItem, PrepArea};
    use chrono::{FixedOffset, Utc};

    fn menu_item(id: &str, name: &str, cents: i64, category: Category) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price: Decimal::new(cents, 2),
            category,
            area: category.prep_area(),
        }
    }

    fn menu() -> Vec<MenuItem> {
        vec![
            menu_item("1", "Salada Caesar", 2890, Category::Starter),
            menu_item("2", "Filé Mignon ao Molho Madeira", 8990, Category::Main),
            menu_item("3", "Petit Gateau", 2490, Category::Dessert),
            menu_item("4", "Suco Natural de Laranja", 1290, Category::Drink),
        ]
    }

    fn line(menu_item_id: &str, quantity: u32) -> LineItem {
        LineItem {
            id: format!("l-{menu_item_id}-{quantity}"),
            menu_item_id: menu_item_id.into(),
            menu_name: None,
            quantity,
            status: ItemStatus::Delivered,
            area: PrepArea::Kitchen,
            note: None,
        }
    }

    fn tab(id: &str, opened_at: &str, status: TabStatus, items: Vec<LineItem>) -> Tab {
        Tab {
            id: id.into(),
            table_number: id.into(),
            opened_at: opened_at.parse().unwrap(),
            status,
            items,
            total: None,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = SalesReport::build(&[], &menu(), &Utc);
        assert!(report.is_empty());
        assert_eq!(report.total_sales, Decimal::ZERO);
        assert_eq!(report.average_ticket, Decimal::ZERO);
        assert!(report.by_hour.is_empty());
        assert!(report.top_items.is_empty());
    }

    #[test]
    fn test_report_aggregates_closed_tabs_only() {
        let tabs = vec![
            tab(
                "1",
                "2026-10-19T19:10:00Z",
                TabStatus::Closed,
                vec![line("2", 1), line("4", 2)],
            ),
            tab(
                "2",
                "2026-10-19T12:30:00Z",
                TabStatus::Closed,
                vec![line("1", 1), line("99", 3)],
            ),
            tab("3", "2026-10-19T20:00:00Z", TabStatus::Open, vec![line("2", 5)]),
        ];

        let report = SalesReport::build(&tabs, &menu(), &Utc);

        // 89.90 + 2 * 12.90 + 28.90
        assert_eq!(report.total_sales, Decimal::new(14460, 2));
        assert_eq!(report.orders, 2);
        assert_eq!(report.average_ticket, Decimal::new(7230, 2));
        assert_eq!(report.items_sold, 4);

        let hours: Vec<&str> = report.by_hour.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(hours, vec!["12h", "19h"]);
        assert_eq!(report.by_hour[1].1, Decimal::new(11570, 2));

        let categories: Vec<Category> = report.by_category.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec![Category::Starter, Category::Main, Category::Drink]);

        assert_eq!(report.top_items[0].name, "Filé Mignon ao Molho Madeira");
        assert_eq!(report.top_items[1].name, "Salada Caesar");
        assert_eq!(report.top_items[2].units, 2);
    }

    #[test]
    fn test_hours_follow_time_zone() {
        let tabs = vec![tab(
            "1",
            "2026-10-19T22:15:00Z",
            TabStatus::Closed,
            vec![line("3", 1)],
        )];
        let brasilia = FixedOffset::west_opt(3 * 3600).unwrap();
        let report = SalesReport::build(&tabs, &menu(), &brasilia);
        assert_eq!(report.by_hour[0].0, "19h");
    }

    #[test]
    fn test_top_items_capped() {
        let mut items = Vec::new();
        let mut catalog = Vec::new();
        for i in 0..7 {
            let id = format!("m{i}");
            catalog.push(menu_item(&id, &format!("Item {i}"), 1000 + i, Category::Main));
            items.push(line(&id, 1));
        }
        let tabs = vec![tab("1", "2026-10-19T19:00:00Z", TabStatus::Closed, items)];
        let report = SalesReport::build(&tabs, &catalog, &Utc);
        assert_eq!(report.top_items.len(), TOP_ITEMS);
        assert_eq!(report.top_items[0].name, "Item 6");
    }
}
