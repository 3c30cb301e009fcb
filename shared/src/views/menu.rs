//! Menu sections for the catalog editor

use crate::models::{Category, MenuItem};

/// Items of one category, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct MenuSection<'a> {
    pub category: Category,
    pub items: Vec<&'a MenuItem>,
}

/// Group the catalog by category in menu order, omitting empty sections.
pub fn menu_sections(menu: &[MenuItem]) -> Vec<MenuSection<'_>> {
    Category::ALL
        .into_iter()
        .map(|category| MenuSection {
            category,
            items: menu.iter().filter(|m| m.category == category).collect(),
        })
        .filter(|section| !section.items.is_empty())
        .collect()
}
