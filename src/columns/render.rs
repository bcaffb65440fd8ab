//! Plain-text rendering of the column board.

use crate::columns::board::ColumnBoard;
use crate::models::{Bucket, Category, FoodItem};

/// Render every bucket as a labeled group, Main first.
pub fn render_board(board: &ColumnBoard) -> String {
    let mut output = String::new();

    output.push_str(&render_column(&Bucket::Main.to_string(), board.main()));
    for category in board.categories() {
        output.push_str(&render_column(
            &Bucket::Category(category.clone()).to_string(),
            board.bucket(category),
        ));
    }

    output
}

fn render_column(title: &str, items: &[FoodItem]) -> String {
    let mut column = format!("== {} ({}) ==\n", title, items.len());

    if items.is_empty() {
        column.push_str("   (empty)\n");
    }
    for item in items {
        column.push_str(&format!("   [{}]\n", item.name));
    }

    column
}

/// One-line prompt listing what can be selected.
pub fn render_prompt(board: &ColumnBoard) -> String {
    let categories: Vec<&str> = board.categories().map(Category::as_str).collect();
    format!(
        "Columns: {}. Type an item name to select it, empty line to redraw, 'quit' to exit:",
        categories.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::board::default_items;

    #[test]
    fn test_render_board_groups() {
        let mut board = ColumnBoard::new(default_items());
        board.move_to_category("Apple").unwrap();

        let text = render_board(&board);

        let main_at = text.find("== Main List (10) ==").unwrap();
        let fruits_at = text.find("== Fruits (1) ==").unwrap();
        let veg_at = text.find("== Vegetables (0) ==").unwrap();
        assert!(main_at < fruits_at && fruits_at < veg_at);

        let fruits_section = &text[fruits_at..veg_at];
        assert!(fruits_section.contains("[Apple]"));
        assert!(text[veg_at..].contains("(empty)"));
    }

    #[test]
    fn test_render_prompt_lists_categories() {
        let board = ColumnBoard::new(default_items());
        let prompt = render_prompt(&board);
        assert!(prompt.contains("Fruit, Vegetable"));
    }
}
