//! Tab (comanda) Model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::menu::{Category, MenuItem, PrepArea};
use crate::client::{OrderEntry, TabDetail, TabSummary};
use crate::input::InputError;

/// Backend status vocabulary for line items
pub const STATUS_PENDING: &str = "PENDENTE";
pub const STATUS_IN_PREPARATION: &str = "EM_PREPARO";
pub const STATUS_READY: &str = "PRONTO";
pub const STATUS_DELIVERED: &str = "ENTREGUE";

// ============================================================================
// Item Status
// ============================================================================

/// Production status of a line item.
///
/// Ordered: `Pending < InPreparation < Ready < Delivered`. The backend owns
/// the transition rules; the client only ever asks for [`ItemStatus::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemStatus {
    Pending,
    InPreparation,
    Ready,
    Delivered,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        Self::Pending,
        Self::InPreparation,
        Self::Ready,
        Self::Delivered,
    ];

    /// Outbound table
    pub fn backend_status(self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::InPreparation => STATUS_IN_PREPARATION,
            Self::Ready => STATUS_READY,
            Self::Delivered => STATUS_DELIVERED,
        }
    }

    /// Inbound table. Unrecognized values read as [`ItemStatus::Pending`]
    /// (logged, never an error).
    pub fn from_backend_status(status: &str) -> Self {
        match status {
            STATUS_PENDING => Self::Pending,
            STATUS_IN_PREPARATION => Self::InPreparation,
            STATUS_READY => Self::Ready,
            STATUS_DELIVERED => Self::Delivered,
            other => {
                tracing::warn!(status = %other, "Unknown backend item status, reading as Pending");
                Self::Pending
            }
        }
    }

    /// Position in the production flow, starting at 0.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The status the UI offers next, `None` once delivered.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::InPreparation),
            Self::InPreparation => Some(Self::Ready),
            Self::Ready => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InPreparation => "In preparation",
            Self::Ready => "Ready",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for ItemStatus {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Self::ALL
            .into_iter()
            .find(|status| {
                let label: String = status.label().chars().filter(|c| *c != ' ').collect();
                label.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| InputError::UnknownValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// Tab Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TabStatus {
    Open,
    Closed,
}

// ============================================================================
// Line Item
// ============================================================================

/// Line item (pedido) of a tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub menu_item_id: String,
    /// Name the backend stored with the line, if it sent one
    pub menu_name: Option<String>,
    pub quantity: u32,
    pub status: ItemStatus,
    /// Fixed when the line was added; survives deletion of the menu item
    pub area: PrepArea,
    pub note: Option<String>,
}

impl LineItem {
    /// Build from the wire entry.
    ///
    /// Area resolution order: explicit backend area, the menu snapshot the
    /// backend stored with the line, the current catalog, then kitchen.
    pub fn from_entry(entry: OrderEntry, catalog: &[MenuItem]) -> Self {
        let area = entry
            .area
            .as_deref()
            .and_then(PrepArea::from_backend_area)
            .or_else(|| {
                entry
                    .menu_item
                    .as_ref()
                    .map(|snapshot| Category::from_backend_type(&snapshot.kind).prep_area())
            })
            .or_else(|| {
                catalog
                    .iter()
                    .find(|m| m.id == entry.menu_item_id)
                    .map(|m| m.area)
            })
            .unwrap_or(PrepArea::Kitchen);

        Self {
            id: entry.id,
            menu_item_id: entry.menu_item_id,
            menu_name: entry.menu_item.map(|snapshot| snapshot.name),
            quantity: entry.quantity,
            status: ItemStatus::from_backend_status(&entry.status),
            area,
            note: entry.note.filter(|n| !n.trim().is_empty()),
        }
    }
}

// ============================================================================
// Tab
// ============================================================================

/// A bill for one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub table_number: String,
    pub opened_at: DateTime<Utc>,
    pub status: TabStatus,
    pub items: Vec<LineItem>,
    /// Server-computed total, never recomputed locally
    pub total: Option<Decimal>,
}

impl Tab {
    /// Join a list row with its detail fetch.
    pub fn assemble(
        summary: TabSummary,
        detail: TabDetail,
        status: TabStatus,
        catalog: &[MenuItem],
    ) -> Self {
        Self {
            id: summary.id,
            table_number: summary.table_number,
            opened_at: summary.created_at,
            status,
            items: detail
                .items
                .into_iter()
                .map(|entry| LineItem::from_entry(entry, catalog))
                .collect(),
            total: detail.total,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TabStatus::Open
    }

    pub fn item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == item_id)
    }
}
