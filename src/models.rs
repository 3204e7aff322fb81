use serde::{Deserialize, Deserializer, Serialize};

/// Entity id as served by the API
pub type Id = u64;

/// Accepts ids sent either as JSON numbers or numeric strings
fn flexible_id<'de, D>(deserializer: D) -> Result<Id, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(Id),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// User role
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Unknown => "Member",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating_avg: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub lesson_count: u32,
    #[serde(deserialize_with = "flexible_id")]
    pub category_id: Id,
    #[serde(deserialize_with = "flexible_id")]
    pub teacher_id: Id,
    #[serde(default)]
    pub thumbnail: String,
}

impl Course {
    pub fn is_free(&self) -> bool {
        self.price <= 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Id,
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn is_teacher(&self) -> bool {
        self.role == Role::Teacher
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub icon_name: String,
    #[serde(rename = "image_Url", default)]
    pub image_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Id,
    #[serde(deserialize_with = "flexible_id")]
    pub course_id: Id,
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Id,
    #[serde(deserialize_with = "flexible_id")]
    pub section_id: Id,
    pub title: String,
    #[serde(default)]
    pub duration_mins: f64,
    #[serde(default)]
    pub is_free: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(deserialize_with = "flexible_id")]
    pub user_id: Id,
    #[serde(deserialize_with = "flexible_id")]
    pub course_id: Id,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(deserialize_with = "flexible_id")]
    pub id: Id,
    #[serde(deserialize_with = "flexible_id")]
    pub course_id: Id,
    #[serde(deserialize_with = "flexible_id")]
    pub user_id: Id,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One page of a filtered collection
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Remote count of all entities matching the filter
    pub total: usize,
}

/// Curated course lists with their own endpoints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeaturedList {
    Popular,
    Recommended,
    Inspiring,
}

impl FeaturedList {
    pub fn title(&self) -> &'static str {
        match self {
            FeaturedList::Popular => "Popular courses",
            FeaturedList::Recommended => "Recommended for you",
            FeaturedList::Inspiring => "Course that inspires",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            FeaturedList::Popular => "popularCourses",
            FeaturedList::Recommended => "recommendedCourses",
            FeaturedList::Inspiring => "inspiringCourses",
        }
    }
}

/// Finds the teacher of a course among `users`, if any
pub fn find_teacher(users: &[User], teacher_id: Id) -> Option<&User> {
    users.iter().find(|u| u.id == teacher_id && u.is_teacher())
}

/// Display name of a course's teacher, falling back to a placeholder
pub fn teacher_name(users: &[User], course: &Course) -> String {
    find_teacher(users, course.teacher_id)
        .map(|t| t.full_name.clone())
        .unwrap_or_else(|| crate::constants::UNKNOWN_TEACHER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_accepts_string_ids_and_missing_fields() {
        let json = r#"{"id":"7","title":"Rust","category_id":2,"teacher_id":"3"}"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.id, 7);
        assert_eq!(course.teacher_id, 3);
        assert_eq!(course.rating_count, 0);
        assert!(course.is_free());
    }

    #[test]
    fn test_unknown_role_does_not_fail() {
        let json = r#"{"id":1,"full_name":"Ada","role":"ADMIN"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Unknown);
    }

    #[test]
    fn test_category_image_url_field_name() {
        let json = r#"{"id":1,"name":"Design","icon_name":"brush","image_Url":"http://x/y.png"}"#;
        let cat: Category = serde_json::from_str(json).unwrap();
        assert_eq!(cat.image_url, "http://x/y.png");
    }

    #[test]
    fn test_teacher_name_falls_back_when_missing() {
        let users = vec![User {
            id: 3,
            full_name: "Student Sam".into(),
            role: Role::Student,
            avatar_url: String::new(),
            username: None,
            email: None,
        }];
        let course: Course = serde_json::from_str(
            r#"{"id":1,"title":"T","category_id":1,"teacher_id":3}"#,
        )
        .unwrap();
        // user 3 exists but is not a teacher
        assert_eq!(teacher_name(&users, &course), "Unknown");
    }
}
