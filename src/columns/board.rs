//! Column board state.
//!
//! Every item lives in exactly one bucket: Main or the bucket of its own
//! category. The board is only changed through [`ColumnBoard::move_to_category`]
//! and [`ColumnBoard::return_to_main`].

use crate::models::{Bucket, Category, FoodItem};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised by board transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no item named '{0}' on the board")]
    UnknownItem(String),
    #[error("'{0}' is not in the main list")]
    NotInMain(String),
}

/// What a return transition actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnOutcome {
    /// The item was taken out of its category bucket.
    pub removed_from_category: bool,
    /// The item was appended to Main.
    pub added_to_main: bool,
}

impl ReturnOutcome {
    /// True if the board did not change.
    pub fn is_noop(&self) -> bool {
        !self.removed_from_category && !self.added_to_main
    }
}

/// Main list plus one bucket per category.
#[derive(Debug, Clone)]
pub struct ColumnBoard {
    main: Vec<FoodItem>,
    buckets: BTreeMap<Category, Vec<FoodItem>>,
}

impl ColumnBoard {
    /// Create a board with every item in Main, in the given order.
    ///
    /// Items whose name repeats an earlier one are dropped.
    pub fn new(items: impl IntoIterator<Item = FoodItem>) -> Self {
        let mut main: Vec<FoodItem> = Vec::new();
        let mut buckets = BTreeMap::new();

        for item in items {
            if main.iter().any(|f| f.name == item.name) {
                debug!("Skipping duplicate board item: {}", item.name);
                continue;
            }
            buckets.entry(item.category.clone()).or_insert_with(Vec::new);
            main.push(item);
        }

        Self { main, buckets }
    }

    /// Items currently in Main.
    pub fn main(&self) -> &[FoodItem] {
        &self.main
    }

    /// Items currently in the bucket for `category`.
    pub fn bucket(&self, category: &Category) -> &[FoodItem] {
        self.buckets.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Categories in display order.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.buckets.keys()
    }

    /// Find which bucket holds `name`.
    pub fn locate(&self, name: &str) -> Option<Bucket> {
        if self.main.iter().any(|f| f.name == name) {
            return Some(Bucket::Main);
        }

        self.buckets
            .iter()
            .find(|(_, items)| items.iter().any(|f| f.name == name))
            .map(|(category, _)| Bucket::Category(category.clone()))
    }

    /// Look up an item by name wherever it currently is.
    pub fn item(&self, name: &str) -> Option<&FoodItem> {
        self.main
            .iter()
            .chain(self.buckets.values().flatten())
            .find(|f| f.name == name)
    }

    /// Total number of items across all buckets.
    pub fn len(&self) -> usize {
        self.main.len() + self.buckets.values().map(Vec::len).sum::<usize>()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move `name` from Main into its category bucket.
    pub fn move_to_category(&mut self, name: &str) -> Result<FoodItem, BoardError> {
        let index = match self.main.iter().position(|f| f.name == name) {
            Some(index) => index,
            None if self.item(name).is_some() => {
                return Err(BoardError::NotInMain(name.to_string()))
            }
            None => return Err(BoardError::UnknownItem(name.to_string())),
        };

        let item = self.main.remove(index);
        self.buckets
            .entry(item.category.clone())
            .or_default()
            .push(item.clone());

        debug!("Moved {} to {}", item.name, item.category.column_label());
        Ok(item)
    }

    /// Move `item` from its category bucket back to Main.
    ///
    /// Safe to call any number of times: removal is skipped if the item is
    /// not in its bucket, and it is only appended to Main if absent there.
    pub fn return_to_main(&mut self, item: &FoodItem) -> ReturnOutcome {
        let removed_from_category = match self.buckets.get_mut(&item.category) {
            Some(bucket) => {
                let before = bucket.len();
                bucket.retain(|f| f.name != item.name);
                bucket.len() != before
            }
            None => false,
        };

        let added_to_main = if self.main.iter().any(|f| f.name == item.name) {
            false
        } else {
            self.main.push(item.clone());
            true
        };

        ReturnOutcome {
            removed_from_category,
            added_to_main,
        }
    }
}

/// The eleven items of the demo board.
pub fn default_items() -> Vec<FoodItem> {
    vec![
        FoodItem::new("Apple", "Fruit"),
        FoodItem::new("Broccoli", "Vegetable"),
        FoodItem::new("Mushroom", "Vegetable"),
        FoodItem::new("Banana", "Fruit"),
        FoodItem::new("Tomato", "Vegetable"),
        FoodItem::new("Orange", "Fruit"),
        FoodItem::new("Mango", "Fruit"),
        FoodItem::new("Pineapple", "Fruit"),
        FoodItem::new("Cucumber", "Vegetable"),
        FoodItem::new("Watermelon", "Fruit"),
        FoodItem::new("Carrot", "Vegetable"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[FoodItem]) -> Vec<&str> {
        items.iter().map(|f| f.name.as_str()).collect()
    }

    fn fruit() -> Category {
        Category::from("Fruit")
    }

    #[test]
    fn test_new_board_starts_in_main() {
        let board = ColumnBoard::new(default_items());

        assert_eq!(board.main().len(), 11);
        assert_eq!(board.len(), 11);
        assert!(board.bucket(&fruit()).is_empty());
        assert_eq!(
            board.categories().map(Category::as_str).collect::<Vec<_>>(),
            vec!["Fruit", "Vegetable"]
        );
    }

    #[test]
    fn test_new_board_drops_duplicate_names() {
        let board = ColumnBoard::new(vec![
            FoodItem::new("Apple", "Fruit"),
            FoodItem::new("Apple", "Vegetable"),
        ]);

        assert_eq!(board.len(), 1);
        assert_eq!(board.categories().count(), 1);
    }

    #[test]
    fn test_move_to_category() {
        let mut board = ColumnBoard::new(default_items());

        let item = board.move_to_category("Apple").unwrap();

        assert_eq!(item.category, fruit());
        assert!(!names(board.main()).contains(&"Apple"));
        assert_eq!(names(board.bucket(&fruit())), vec!["Apple"]);
        assert_eq!(board.locate("Apple"), Some(Bucket::Category(fruit())));
        assert_eq!(board.len(), 11);
    }

    #[test]
    fn test_move_errors() {
        let mut board = ColumnBoard::new(default_items());

        assert_eq!(
            board.move_to_category("Durian"),
            Err(BoardError::UnknownItem("Durian".to_string()))
        );

        board.move_to_category("Apple").unwrap();
        assert_eq!(
            board.move_to_category("Apple"),
            Err(BoardError::NotInMain("Apple".to_string()))
        );
    }

    #[test]
    fn test_return_to_main() {
        let mut board = ColumnBoard::new(default_items());
        let item = board.move_to_category("Apple").unwrap();

        let outcome = board.return_to_main(&item);

        assert!(outcome.removed_from_category);
        assert!(outcome.added_to_main);
        assert_eq!(board.locate("Apple"), Some(Bucket::Main));
        // Returned items go to the end of Main
        assert_eq!(board.main().last().map(|f| f.name.as_str()), Some("Apple"));
    }

    #[test]
    fn test_return_to_main_is_idempotent() {
        let mut board = ColumnBoard::new(default_items());
        let item = board.move_to_category("Banana").unwrap();

        board.return_to_main(&item);
        let main_after_first = names(board.main()).join(",");

        let outcome = board.return_to_main(&item);
        assert!(outcome.is_noop());
        assert_eq!(names(board.main()).join(","), main_after_first);
        assert_eq!(board.len(), 11);
    }

    #[test]
    fn test_item_never_in_two_buckets() {
        let mut board = ColumnBoard::new(default_items());

        for name in ["Apple", "Carrot", "Mango"] {
            board.move_to_category(name).unwrap();
        }
        let carrot = board.item("Carrot").cloned().unwrap();
        board.return_to_main(&carrot);
        board.return_to_main(&carrot);

        let mut all: Vec<&str> = names(board.main());
        for category in board.categories() {
            all.extend(names(board.bucket(category)));
        }
        all.sort_unstable();
        let before = all.len();
        all.dedup();

        assert_eq!(before, all.len());
        assert_eq!(all.len(), 11);
    }
}
