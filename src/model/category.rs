use serde::{Deserialize, Serialize};

/// The fixed set of categories a transaction can be filed under.
///
/// Transactions carry their category as a free string. Keys outside this set display as `Other`,
/// but aggregation keeps grouping by the original string so that distinct unknown keys are never
/// merged together.
#[derive(
    Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Shopping,
    Entertainment,
    Salary,
    Business,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

/// Display data for a category: what the presentation layer shows next to a transaction or a
/// chart slice.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct CategoryInfo {
    pub category: Category,
    pub key: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Shopping,
        Category::Entertainment,
        Category::Salary,
        Category::Business,
        Category::Other,
    ];

    /// Maps a stored category key onto the fixed set. Unknown or empty keys become `Other`.
    pub fn from_key(key: impl AsRef<str>) -> Category {
        match key.as_ref().trim() {
            FOOD => Category::Food,
            TRANSPORT => Category::Transport,
            UTILITIES => Category::Utilities,
            SHOPPING => Category::Shopping,
            ENTERTAINMENT => Category::Entertainment,
            SALARY => Category::Salary,
            BUSINESS => Category::Business,
            _ => Category::Other,
        }
    }

    pub fn key(&self) -> &'static str {
        self.info().key
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn info(&self) -> CategoryInfo {
        let (key, label, icon, color) = match self {
            Category::Food => (FOOD, "Food", "🍔", "#f59e0b"),
            Category::Transport => (TRANSPORT, "Transport", "🚕", "#3b82f6"),
            Category::Utilities => (UTILITIES, "Utilities", "💡", "#eab308"),
            Category::Shopping => (SHOPPING, "Shopping", "🛍️", "#ec4899"),
            Category::Entertainment => (ENTERTAINMENT, "Entertainment", "🎬", "#8b5cf6"),
            Category::Salary => (SALARY, "Salary", "💰", "#10b981"),
            Category::Business => (BUSINESS, "Business", "💼", "#06b6d4"),
            Category::Other => (OTHER, "Other", "📝", "#64748b"),
        };
        CategoryInfo {
            category: *self,
            key,
            label,
            icon,
            color,
        }
    }

    /// The full key → label table.
    pub fn table() -> Vec<CategoryInfo> {
        Category::ALL.iter().map(Category::info).collect()
    }
}

/// Returns the display label for a stored category key.
pub fn label_for(key: impl AsRef<str>) -> &'static str {
    Category::from_key(key).label()
}

const FOOD: &str = "food";
const TRANSPORT: &str = "transport";
const UTILITIES: &str = "utilities";
const SHOPPING: &str = "shopping";
const ENTERTAINMENT: &str = "entertainment";
const SALARY: &str = "salary";
const BUSINESS: &str = "business";
const OTHER: &str = "other";

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_key_known() {
        assert_eq!(Category::from_key("food"), Category::Food);
        assert_eq!(Category::from_key("salary"), Category::Salary);
        assert_eq!(Category::from_key(" business "), Category::Business);
    }

    #[test]
    fn test_from_key_unknown_is_other() {
        assert_eq!(Category::from_key("crypto"), Category::Other);
        assert_eq!(Category::from_key(""), Category::Other);
        assert_eq!(Category::from_key("Food"), Category::Other);
        assert_eq!(label_for("crypto"), "Other");
    }

    #[test]
    fn test_key_round_trips_through_serde_plain() {
        for category in Category::ALL {
            assert_eq!(category.to_string(), category.key());
            assert_eq!(Category::from_str(category.key()).unwrap(), category);
            assert_eq!(Category::from_key(category.key()), category);
        }
    }

    #[test]
    fn test_table_covers_every_category() {
        let table = Category::table();
        assert_eq!(table.len(), 8);
        assert_eq!(table[0].label, "Food");
        assert_eq!(table[7].key, "other");
        assert!(table.iter().all(|info| info.color.starts_with('#')));
    }
}
