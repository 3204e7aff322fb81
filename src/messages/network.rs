//! Network messages - communication between App and Network layers

use crate::models::{
    Category, Course, FeaturedList, Favorite, Id, Lesson, Page, Review, Section, User,
};

/// Allocates request ids. Every id doubles as the generation token of the
/// slot that issued it.
#[derive(Debug, Clone)]
pub struct RequestIds {
    next: u64,
}

impl Default for RequestIds {
    fn default() -> Self {
        RequestIds { next: 1 }
    }
}

impl RequestIds {
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Field a paged course list is filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseFilter {
    Category(Id),
    Teacher(Id),
}

impl CourseFilter {
    pub fn param(&self) -> (&'static str, String) {
        match self {
            CourseFilter::Category(id) => ("category_id", id.to_string()),
            CourseFilter::Teacher(id) => ("teacher_id", id.to_string()),
        }
    }
}

/// Everything the app can ask of the API
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Categories,
    Courses,
    Users,
    Lessons,
    Sections { course_id: Id },
    Favorites { user_id: Id },
    Reviews { course_id: Id },
    Featured(FeaturedList),
    Course(Id),
    CoursePage { filter: CourseFilter, page: u32, limit: u32 },
    CurrentUser,
    Login { email: String, password: String },
    Logout,
}

impl Query {
    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Query::Categories => "categories".into(),
            Query::Courses | Query::CoursePage { .. } => "courses".into(),
            Query::Users => "users".into(),
            Query::Lessons => "lessons".into(),
            Query::Sections { .. } => "sections".into(),
            Query::Favorites { .. } => "favorites".into(),
            Query::Reviews { .. } => "reviews".into(),
            Query::Featured(list) => list.path().into(),
            Query::Course(id) => format!("courses/{}", id),
            Query::CurrentUser => "api/auth/me".into(),
            Query::Login { .. } => "api/auth/login".into(),
            Query::Logout => "api/auth/logout".into(),
        }
    }

    /// Filter parameters; pagination parameters are added by the client
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::Sections { course_id } => vec![("course_id", course_id.to_string())],
            Query::Favorites { user_id } => vec![("user_id", user_id.to_string())],
            Query::Reviews { course_id } => vec![("course_id", course_id.to_string())],
            Query::CoursePage { filter, .. } => vec![filter.param()],
            _ => Vec::new(),
        }
    }

    /// Short description for logs; never includes credentials
    pub fn describe(&self) -> String {
        match self {
            Query::CoursePage { filter, page, limit } => {
                let (field, value) = filter.param();
                format!("courses?{}={} page {} limit {}", field, value, page, limit)
            }
            Query::Login { .. } => "login".into(),
            other => other.path(),
        }
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Run a query; the response echoes `id`
    Fetch { id: u64, query: Query },
    /// Shutdown the network actor
    Shutdown,
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Categories(Vec<Category>),
    Courses(Vec<Course>),
    Users(Vec<User>),
    Sections(Vec<Section>),
    Lessons(Vec<Lesson>),
    Favorites(Vec<Favorite>),
    Reviews(Vec<Review>),
    Course(Box<Course>),
    CoursePage(Page<Course>),
    /// Current user after restore/login; `None` means not logged in
    Session(Option<User>),
    LoggedOut,
}

impl Payload {
    /// Variant name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Categories(_) => "categories",
            Payload::Courses(_) => "courses",
            Payload::Users(_) => "users",
            Payload::Sections(_) => "sections",
            Payload::Lessons(_) => "lessons",
            Payload::Favorites(_) => "favorites",
            Payload::Reviews(_) => "reviews",
            Payload::Course(_) => "course",
            Payload::CoursePage(_) => "course page",
            Payload::Session(_) => "session",
            Payload::LoggedOut => "logout",
        }
    }
}

macro_rules! payload_conversion {
    ($target:ty, $variant:ident) => {
        impl TryFrom<Payload> for $target {
            type Error = String;

            fn try_from(payload: Payload) -> Result<Self, String> {
                match payload {
                    Payload::$variant(value) => Ok(value),
                    other => Err(format!("unexpected {} payload", other.kind())),
                }
            }
        }
    };
}

payload_conversion!(Vec<Category>, Categories);
payload_conversion!(Vec<Course>, Courses);
payload_conversion!(Vec<User>, Users);
payload_conversion!(Vec<Section>, Sections);
payload_conversion!(Vec<Lesson>, Lessons);
payload_conversion!(Vec<Favorite>, Favorites);
payload_conversion!(Vec<Review>, Reviews);
payload_conversion!(Page<Course>, CoursePage);
payload_conversion!(Option<User>, Session);

impl TryFrom<Payload> for Option<Course> {
    type Error = String;

    fn try_from(payload: Payload) -> Result<Self, String> {
        match payload {
            Payload::Course(course) => Ok(Some(*course)),
            other => Err(format!("unexpected {} payload", other.kind())),
        }
    }
}

/// Narrow a response to the payload type a slot expects
pub fn expect<T>(result: Result<Payload, String>) -> Result<T, String>
where
    T: TryFrom<Payload, Error = String>,
{
    result.and_then(T::try_from)
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Loaded {
        id: u64,
        payload: Payload,
        time_ms: u64,
    },
    Failed {
        id: u64,
        message: String,
        time_ms: u64,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Loaded { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }

    /// Split into id and outcome
    pub fn into_result(self) -> (u64, Result<Payload, String>) {
        match self {
            NetworkResponse::Loaded { id, payload, .. } => (id, Ok(payload)),
            NetworkResponse::Failed { id, message, .. } => (id, Err(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique_and_increasing() {
        let mut ids = RequestIds::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
    }

    #[test]
    fn test_paths_and_params() {
        assert_eq!(Query::Course(12).path(), "courses/12");
        assert_eq!(Query::Featured(FeaturedList::Popular).path(), "popularCourses");
        assert_eq!(
            Query::Favorites { user_id: 1 }.params(),
            vec![("user_id", "1".to_string())]
        );

        let q = Query::CoursePage {
            filter: CourseFilter::Teacher(4),
            page: 2,
            limit: 6,
        };
        assert_eq!(q.path(), "courses");
        assert_eq!(q.params(), vec![("teacher_id", "4".to_string())]);
        assert_eq!(q.describe(), "courses?teacher_id=4 page 2 limit 6");
    }

    #[test]
    fn test_expect_narrows_payload() {
        let ok: Result<Vec<Category>, String> = expect(Ok(Payload::Categories(vec![])));
        assert_eq!(ok, Ok(vec![]));

        let wrong: Result<Vec<Course>, String> = expect(Ok(Payload::Users(vec![])));
        assert_eq!(wrong, Err("unexpected users payload".to_string()));

        let failed: Result<Vec<Course>, String> = expect(Err("Request timed out".into()));
        assert_eq!(failed, Err("Request timed out".to_string()));
    }

    #[test]
    fn test_login_description_hides_credentials() {
        let q = Query::Login {
            email: "a@b.co".into(),
            password: "hunter2".into(),
        };
        assert!(!q.describe().contains("hunter2"));
        assert!(!q.describe().contains("a@b.co"));
    }
}
