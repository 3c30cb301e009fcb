//! Screen derivations
//!
//! Pure functions of already-fetched collections. No I/O, no state.

pub mod board;
pub mod menu;
pub mod sales;
pub mod tabs;

pub use board::{AreaLanes, BoardCard, ProductionBoard};
pub use menu::{MenuSection, menu_sections};
pub use sales::{SalesReport, TopItem};
pub use tabs::{TabLine, TabOverview, open_tab_overview};

use crate::models::MenuItem;

pub(crate) fn find_menu_item<'a>(menu: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    menu.iter().find(|m| m.id == id)
}
