//! Summary statistics grouped by category.

use std::collections::BTreeMap;

use crate::item::{Category, InventoryItem};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: Category,
    pub count: u64,
    /// Sum of quantity x price over the category.
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySummary {
    pub total_items: u64,
    pub low_stock_items: u64,
    /// Only categories that currently hold items, in declaration order.
    pub category_stats: Vec<CategoryStats>,
}

impl InventorySummary {
    /// Fold a collection into a summary.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a InventoryItem>,
    {
        let mut summary = InventorySummary::default();
        let mut groups: BTreeMap<Category, CategoryStats> = BTreeMap::new();

        for item in items {
            summary.total_items += 1;
            if item.is_low_stock() {
                summary.low_stock_items += 1;
            }
            let stats = groups.entry(item.category).or_insert(CategoryStats {
                category: item.category,
                count: 0,
                total_value: 0.0,
            });
            stats.count += 1;
            stats.total_value += item.total_value();
        }

        summary.category_stats = groups.into_values().collect();
        summary
    }

    /// Put category rows coming from a store into declaration order.
    pub fn with_category_stats(mut self, mut stats: Vec<CategoryStats>) -> Self {
        stats.sort_by_key(|s| s.category);
        self.category_stats = stats;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::timestamp_now;
    use stockroom_core::ItemId;

    fn item(quantity: i64, price: f64, category: Category) -> InventoryItem {
        let now = timestamp_now();
        InventoryItem {
            id: ItemId::new(),
            sku: format!("S-{quantity}-{category}"),
            name: "Item".into(),
            description: None,
            quantity,
            price,
            category,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_collection() {
        let none: Vec<InventoryItem> = Vec::new();
        let s = InventorySummary::from_items(&none);
        assert_eq!(s, InventorySummary::default());
    }

    #[test]
    fn groups_and_counts() {
        let items = vec![
            item(20, 100.0, Category::Electronics),
            item(5, 50.0, Category::Books),
            item(1, 10.0, Category::Electronics),
        ];
        let s = InventorySummary::from_items(&items);
        assert_eq!(s.total_items, 3);
        assert_eq!(s.low_stock_items, 2);
        assert_eq!(
            s.category_stats,
            vec![
                CategoryStats {
                    category: Category::Electronics,
                    count: 2,
                    total_value: 2010.0,
                },
                CategoryStats {
                    category: Category::Books,
                    count: 1,
                    total_value: 250.0,
                },
            ]
        );
    }

    #[test]
    fn store_rows_are_reordered() {
        let rows = vec![
            CategoryStats { category: Category::Other, count: 1, total_value: 1.0 },
            CategoryStats { category: Category::Food, count: 2, total_value: 2.0 },
        ];
        let s = InventorySummary::default().with_category_stats(rows);
        let order: Vec<_> = s.category_stats.iter().map(|c| c.category).collect();
        assert_eq!(order, vec![Category::Food, Category::Other]);
    }
}
