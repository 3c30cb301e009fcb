//! Open tab list

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::find_menu_item;
use crate::models::{ItemStatus, MenuItem, PrepArea, Tab};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabLine {
    pub item_id: String,
    /// Catalog name, else the name stored with the line
    pub name: Option<String>,
    pub quantity: u32,
    pub status: ItemStatus,
    pub area: PrepArea,
    /// Current menu price × quantity, for display only
    pub value: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabOverview {
    pub tab_id: String,
    pub table_number: String,
    pub opened_at: DateTime<Utc>,
    pub lines: Vec<TabLine>,
    /// Server total as received
    pub total: Option<Decimal>,
}

/// Open tabs with their lines resolved against the catalog.
pub fn open_tab_overview(tabs: &[Tab], menu: &[MenuItem]) -> Vec<TabOverview> {
    tabs.iter()
        .filter(|t| t.is_open())
        .map(|tab| TabOverview {
            tab_id: tab.id.clone(),
            table_number: tab.table_number.clone(),
            opened_at: tab.opened_at,
            lines: tab
                .items
                .iter()
                .map(|line| {
                    let menu_item = find_menu_item(menu, &line.menu_item_id);
                    TabLine {
                        item_id: line.id.clone(),
                        name: menu_item
                            .map(|m| m.name.clone())
                            .or_else(|| line.menu_name.clone()),
                        quantity: line.quantity,
                        status: line.status,
                        area: line.area,
                        value: menu_item.map(|m| m.price * Decimal::from(line.quantity)),
                    }
                })
                .collect(),
            total: tab.total,
        })
        .collect()
}
