use serde::{Deserialize, Serialize};

/// A catalog entry with the text attributes used for similarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub sub_category: String,
}

impl Item {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: Option<String>,
        category: impl Into<String>,
        sub_category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description,
            category: category.into(),
            sub_category: sub_category.into(),
        }
    }

    /// Text blob fed to the vectorizer: name, description, category and
    /// sub-category joined by single spaces. A missing description counts as
    /// empty.
    #[must_use]
    pub fn content(&self) -> String {
        let description = self.description.as_deref().unwrap_or("");
        let mut out = String::with_capacity(
            self.name.len() + description.len() + self.category.len() + self.sub_category.len() + 3,
        );
        out.push_str(&self.name);
        out.push(' ');
        out.push_str(description);
        out.push(' ');
        out.push_str(&self.category);
        out.push(' ');
        out.push_str(&self.sub_category);
        out
    }
}
