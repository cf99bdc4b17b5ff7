use crate::commands::Out;
use crate::model::{Category, CategoryInfo};

/// Prints the fixed category table.
pub fn categories() -> Out<Vec<CategoryInfo>> {
    let table = Category::table();
    let message = table
        .iter()
        .map(|c| format!("{} {:<14} {:<14} {}", c.icon, c.key, c.label, c.color))
        .collect::<Vec<_>>()
        .join("\n");
    Out::new(message, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let out = categories();
        assert_eq!(out.structure().unwrap().len(), 8);
        assert_eq!(out.message().lines().count(), 8);
        assert!(out.message().lines().last().unwrap().contains("other"));
    }
}
