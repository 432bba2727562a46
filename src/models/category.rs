// src/models/category.rs

use serde::{Deserialize, Serialize};

/// Open Trivia DB category identifier.
pub type CategoryId = u32;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
}

/// Categories offered on the selection screen.
pub static CATEGORIES: [Category; 8] = [
    Category { id: 9, name: "General Knowledge" },
    Category { id: 10, name: "Entertainment: Books" },
    Category { id: 11, name: "Entertainment: Film" },
    Category { id: 12, name: "Entertainment: Music" },
    Category { id: 17, name: "Science & Nature" },
    Category { id: 18, name: "Science: Computers" },
    Category { id: 21, name: "Sports" },
    Category { id: 23, name: "History" },
];

pub fn find_category(id: CategoryId) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// DTO for the "category selected" event.
#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub category: Option<CategoryId>,
}
