use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One catalog record. `title` doubles as the canonical node identifier in
/// the prerequisite graph; `prerequisites` is the free-text requirement
/// string ("CSC108H5 and CSC148H5", "None", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(default)]
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: String,
}

/// Ordered, immutable course list with a title index. Loaded once at build
/// time; a catalog change means a full engine rebuild.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let by_title = courses
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.title.clone(), idx))
            .collect();
        Self { courses, by_title }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let courses: Vec<Course> = serde_json::from_slice(bytes)?;
        Ok(Self::from_courses(courses))
    }

    pub fn get(&self, title: &str) -> Option<&Course> {
        self.by_title.get(title).map(|&idx| &self.courses[idx])
    }

    pub fn contains(&self, title: &str) -> bool {
        self.by_title.contains_key(title)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.courses.iter()
    }
}
