//! Immutable view of server state published by the store

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{MenuItem, Tab};
use shared::views::{
    MenuSection, ProductionBoard, SalesReport, TabOverview, menu_sections, open_tab_overview,
};

/// Everything the screens render, replaced wholesale on every refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub menu: Vec<MenuItem>,
    pub open_tabs: Vec<Tab>,
    /// Empty unless closed tabs are fetched (see `ClientConfig::fetch_closed_tabs`)
    pub closed_tabs: Vec<Tab>,
    /// When the last refresh finished; `None` before the first one
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn menu_item(&self, id: &str) -> Option<&MenuItem> {
        self.menu.iter().find(|m| m.id == id)
    }

    pub fn open_tab(&self, id: &str) -> Option<&Tab> {
        self.open_tabs.iter().find(|t| t.id == id)
    }

    /// Open tab for a table number, if any
    pub fn tab_for_table(&self, table_number: &str) -> Option<&Tab> {
        self.open_tabs
            .iter()
            .find(|t| t.table_number == table_number)
    }

    pub fn production_board(&self) -> ProductionBoard {
        ProductionBoard::build(&self.open_tabs, &self.menu)
    }

    pub fn sales_report<Tz: TimeZone>(&self, tz: &Tz) -> SalesReport {
        SalesReport::build(&self.closed_tabs, &self.menu, tz)
    }

    pub fn menu_sections(&self) -> Vec<MenuSection<'_>> {
        menu_sections(&self.menu)
    }

    pub fn tab_overview(&self) -> Vec<TabOverview> {
        open_tab_overview(&self.open_tabs, &self.menu)
    }
}
