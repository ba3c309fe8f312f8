//! Learning-path data model shared by every curation tier, the store and the HTTP layer.

use serde::{Deserialize, Serialize};

/// Hard cap on resources kept per category.
pub const MAX_RESOURCES_PER_CATEGORY: usize = 5;

/// A single learning item. Text fields are trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Free-form, e.g. "Free", "$49.99" or "$29/month".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

impl Resource {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            url: url.into().trim().to_string(),
            description: None,
            platform: None,
            price: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = non_blank(platform.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = non_blank(price.into());
        self
    }

    /// A missing price counts as free, matching how curated sources label courses.
    pub fn is_free(&self) -> bool {
        self.price
            .as_deref()
            .map_or(true, |p| p.to_lowercase().contains("free"))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The five fixed resource buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[serde(alias = "documentation")]
    Docs,
    Blogs,
    #[serde(alias = "youtube")]
    Videos,
    FreeCourses,
    PaidCourses,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Docs,
        Category::Blogs,
        Category::Videos,
        Category::FreeCourses,
        Category::PaidCourses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Docs => "docs",
            Category::Blogs => "blogs",
            Category::Videos => "videos",
            Category::FreeCourses => "free_courses",
            Category::PaidCourses => "paid_courses",
        }
    }
}

/// Category → ordered resources. Every category is always present; unpopulated
/// ones are empty vectors, never null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMap {
    #[serde(default, alias = "documentation")]
    pub docs: Vec<Resource>,
    #[serde(default)]
    pub blogs: Vec<Resource>,
    #[serde(default, alias = "youtube")]
    pub videos: Vec<Resource>,
    #[serde(default)]
    pub free_courses: Vec<Resource>,
    #[serde(default)]
    pub paid_courses: Vec<Resource>,
}

impl CategoryMap {
    pub fn get(&self, category: Category) -> &[Resource] {
        match category {
            Category::Docs => &self.docs,
            Category::Blogs => &self.blogs,
            Category::Videos => &self.videos,
            Category::FreeCourses => &self.free_courses,
            Category::PaidCourses => &self.paid_courses,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut Vec<Resource> {
        match category {
            Category::Docs => &mut self.docs,
            Category::Blogs => &mut self.blogs,
            Category::Videos => &mut self.videos,
            Category::FreeCourses => &mut self.free_courses,
            Category::PaidCourses => &mut self.paid_courses,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Resource])> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn total(&self) -> usize {
        self.iter().map(|(_, resources)| resources.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Keeps the first `max` entries of every category, preserving order.
    pub fn truncate(&mut self, max: usize) {
        for category in Category::ALL {
            self.get_mut(category).truncate(max);
        }
    }
}

/// A topic plus its curated resources. Immutable once built; the constructor
/// enforces [`MAX_RESOURCES_PER_CATEGORY`], including on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawLearningPath")]
pub struct LearningPath {
    topic: String,
    #[serde(rename = "learning_path")]
    categories: CategoryMap,
}

#[derive(Deserialize)]
struct RawLearningPath {
    topic: String,
    #[serde(default, rename = "learning_path")]
    categories: CategoryMap,
}

impl From<RawLearningPath> for LearningPath {
    fn from(raw: RawLearningPath) -> Self {
        LearningPath::new(raw.topic, raw.categories)
    }
}

impl LearningPath {
    pub fn new(topic: impl Into<String>, mut categories: CategoryMap) -> Self {
        categories.truncate(MAX_RESOURCES_PER_CATEGORY);
        Self {
            topic: topic.into().trim().to_string(),
            categories,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    pub fn resource_count(&self) -> usize {
        self.categories.total()
    }
}
