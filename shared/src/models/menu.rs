//! Menu Model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::client::{CatalogCreate, CatalogEntry};
use crate::input::{self, InputError};

/// Backend item type for drinks
pub const TYPE_DRINK: &str = "BEBIDA";
/// Backend item type for everything that is not a drink
pub const TYPE_DISH: &str = "PRATO";

/// Backend area for the kitchen
pub const AREA_KITCHEN: &str = "COZINHA";
/// Backend area for the bar (copa)
pub const AREA_BAR: &str = "COPA";

// ============================================================================
// Category
// ============================================================================

/// Menu category as shown to staff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Starter,
    Main,
    Dessert,
    Drink,
}

impl Category {
    /// Display order of menu sections
    pub const ALL: [Category; 4] = [Self::Starter, Self::Main, Self::Dessert, Self::Drink];

    /// Outbound table. The backend only distinguishes drinks from dishes.
    pub fn backend_type(self) -> &'static str {
        match self {
            Self::Starter => TYPE_DISH,
            Self::Main => TYPE_DISH,
            Self::Dessert => TYPE_DISH,
            Self::Drink => TYPE_DRINK,
        }
    }

    /// Inbound table.
    ///
    /// `PRATO` reads back as [`Category::Main`]; an unrecognized type also
    /// falls back to `Main` and is logged, since it means the backend
    /// vocabulary drifted.
    pub fn from_backend_type(kind: &str) -> Self {
        match kind {
            TYPE_DISH => Self::Main,
            TYPE_DRINK => Self::Drink,
            other => {
                tracing::warn!(kind = %other, "Unknown backend item type, reading as Main");
                Self::Main
            }
        }
    }

    /// Preparation area an item of this category is routed to.
    pub fn prep_area(self) -> PrepArea {
        match self {
            Self::Drink => PrepArea::Bar,
            Self::Starter | Self::Main | Self::Dessert => PrepArea::Kitchen,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Starter => "Starter",
            Self::Main => "Main",
            Self::Dessert => "Dessert",
            Self::Drink => "Drink",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InputError::UnknownValue {
                field: "category",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// Preparation Area
// ============================================================================

/// Where a line item is prepared; decides which board it shows up on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrepArea {
    Kitchen,
    Bar,
}

impl PrepArea {
    pub const ALL: [PrepArea; 2] = [Self::Kitchen, Self::Bar];

    pub fn backend_area(self) -> &'static str {
        match self {
            Self::Kitchen => AREA_KITCHEN,
            Self::Bar => AREA_BAR,
        }
    }

    /// `None` for anything outside the backend vocabulary.
    pub fn from_backend_area(area: &str) -> Option<Self> {
        match area {
            AREA_KITCHEN => Some(Self::Kitchen),
            AREA_BAR => Some(Self::Bar),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Kitchen => "Kitchen",
            Self::Bar => "Bar",
        }
    }
}

impl fmt::Display for PrepArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ============================================================================
// Menu Item
// ============================================================================

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub area: PrepArea,
}

impl From<CatalogEntry> for MenuItem {
    fn from(entry: CatalogEntry) -> Self {
        let category = Category::from_backend_type(&entry.kind);
        Self {
            id: entry.id,
            name: entry.name,
            description: entry.description.unwrap_or_default(),
            price: entry.price,
            category,
            area: category.prep_area(),
        }
    }
}

/// Validated payload for a new catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
}

impl NewMenuItem {
    pub fn to_request(&self) -> CatalogCreate {
        CatalogCreate {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            kind: self.category.backend_type().to_string(),
        }
    }
}

/// Raw menu form as typed by staff
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: Option<Category>,
}

impl MenuItemForm {
    /// Name and price are required; category defaults to starter like the form does.
    pub fn validate(&self) -> Result<NewMenuItem, InputError> {
        let name = input::require("name", &self.name)?;
        let price = input::parse_price(&self.price)?;
        Ok(NewMenuItem {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price,
            category: self.category.unwrap_or(Category::Starter),
        })
    }
}
