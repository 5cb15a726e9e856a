use serde::{Deserialize, Serialize};

/// Closed set of topics a link can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Coding,
    Design,
    Fitness,
    Food,
    Travel,
    Finance,
    Science,
    Entertainment,
    News,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Coding,
        Category::Design,
        Category::Fitness,
        Category::Food,
        Category::Travel,
        Category::Finance,
        Category::Science,
        Category::Entertainment,
        Category::News,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Coding => "Coding",
            Category::Design => "Design",
            Category::Fitness => "Fitness",
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Finance => "Finance",
            Category::Science => "Science",
            Category::Entertainment => "Entertainment",
            Category::News => "News",
            Category::Other => "Other",
        }
    }

    /// Map free-form model output onto the enum. Anything unrecognised is `Other`.
    pub fn coerce(value: &str) -> Category {
        let value = value.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
            .unwrap_or(Category::Other)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_is_case_insensitive() {
        assert_eq!(Category::coerce("coding"), Category::Coding);
        assert_eq!(Category::coerce(" TRAVEL "), Category::Travel);
    }

    #[test]
    fn coerce_unknown_to_other() {
        assert_eq!(Category::coerce("Gardening"), Category::Other);
        assert_eq!(Category::coerce(""), Category::Other);
    }

    #[test]
    fn from_str_is_strict() {
        assert_eq!("News".parse::<Category>().unwrap(), Category::News);
        assert!("news".parse::<Category>().is_err());
    }
}
