//! Kitchen/bar production board (KDS)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::find_menu_item;
use crate::models::{ItemStatus, MenuItem, PrepArea, Tab};

/// One line item as shown on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardCard {
    pub tab_id: String,
    pub item_id: String,
    pub table_number: String,
    pub opened_at: DateTime<Utc>,
    /// `"{quantity}x {menu item name}"`
    pub title: String,
    pub status: ItemStatus,
    /// Status the advance button requests
    pub next: Option<ItemStatus>,
}

/// Cards of one preparation area
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaLanes {
    /// Pending and in preparation
    pub in_progress: Vec<BoardCard>,
    pub ready: Vec<BoardCard>,
}

impl AreaLanes {
    pub fn is_empty(&self) -> bool {
        self.in_progress.is_empty() && self.ready.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionBoard {
    pub kitchen: AreaLanes,
    pub bar: AreaLanes,
}

impl ProductionBoard {
    /// Lines of open tabs, grouped by area and status.
    ///
    /// The title uses the catalog name, or the name stored with the line
    /// once the menu item is deleted. Lines with neither are left out, and
    /// delivered lines have left the board.
    pub fn build(tabs: &[Tab], menu: &[MenuItem]) -> Self {
        let mut board = Self::default();

        for tab in tabs.iter().filter(|t| t.is_open()) {
            for item in &tab.items {
                let Some(name) = find_menu_item(menu, &item.menu_item_id)
                    .map(|m| m.name.as_str())
                    .or(item.menu_name.as_deref())
                else {
                    continue;
                };

                let card = BoardCard {
                    tab_id: tab.id.clone(),
                    item_id: item.id.clone(),
                    table_number: tab.table_number.clone(),
                    opened_at: tab.opened_at,
                    title: format!("{}x {}", item.quantity, name),
                    status: item.status,
                    next: item.status.next(),
                };

                let lanes = board.area_mut(item.area);
                match item.status {
                    ItemStatus::Pending | ItemStatus::InPreparation => lanes.in_progress.push(card),
                    ItemStatus::Ready => lanes.ready.push(card),
                    ItemStatus::Delivered => {}
                }
            }
        }

        board
    }

    pub fn area(&self, area: PrepArea) -> &AreaLanes {
        match area {
            PrepArea::Kitchen => &self.kitchen,
            PrepArea::Bar => &self.bar,
        }
    }

    fn area_mut(&mut self, area: PrepArea) -> &mut AreaLanes {
        match area {
            PrepArea::Kitchen => &mut self.kitchen,
            PrepArea::Bar => &mut self.bar,
        }
    }
}
