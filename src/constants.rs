//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the course API
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default number of courses per page in paginated lists
pub const DEFAULT_PAGE_LIMIT: u32 = 6;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default log file, relative to the working directory
pub const DEFAULT_LOG_FILE: &str = "coursedeck.log";

/// Directory under $HOME holding `config.yaml`
pub const CONFIG_DIR_NAME: &str = ".coursedeck";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Header carrying the number of entities matching a paged query
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Query parameter names for pagination
pub const PAGE_PARAM: &str = "_page";
pub const LIMIT_PARAM: &str = "_limit";

/// Label shown when a course has no matching teacher
pub const UNKNOWN_TEACHER: &str = "Unknown";

/// Label shown when a review's author is not among the loaded users
pub const UNKNOWN_USER: &str = "Anonymous";

/// Search suggestions shown before anything is typed
pub const HOT_TOPICS: [&str; 7] = [
    "Java",
    "SQL",
    "Javascript",
    "Python",
    "Digital marketing",
    "Photoshop",
    "Watercolor",
];

/// Home screen section sizes
pub const HOME_CATEGORY_COUNT: usize = 6;
pub const HOME_POPULAR_COUNT: usize = 5;
pub const HOME_TEACHER_COUNT: usize = 5;

/// Categories listed on the idle search screen
pub const SEARCH_CATEGORY_COUNT: usize = 5;

/// Courses shown on the teacher overview tab
pub const TEACHER_OVERVIEW_COUNT: usize = 3;

/// Application name
pub const APP_NAME: &str = "CourseDeck";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
