//! Screens - per-screen local state and the composition that turns
//! fetched collections into rows.
//!
//! Screens never perform I/O. They ask for data through [`Ctx`], which
//! collects network commands and navigation effects for the app state to
//! apply once the screen returns.

pub mod category;
pub mod course_detail;
pub mod featured;
pub mod feed;
pub mod home;
pub mod profile;
pub mod search;
pub mod teacher;

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::messages::{NetworkCommand, Payload, Query, RequestIds, UiEvent};
use crate::models::{teacher_name, Course, Id, User};
use crate::session::Session;

pub use category::CategoryScreen;
pub use course_detail::CourseDetailScreen;
pub use featured::FeaturedScreen;
pub use home::HomeScreen;
pub use profile::ProfileScreen;
pub use search::SearchScreen;
pub use teacher::TeacherScreen;

/// Blocking message popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Alert {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Alert::new("Connection error", message)
    }
}

/// Session change requested by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Login { email: String, password: String },
    Logout,
}

/// Side effects a screen produced while handling something
#[derive(Debug, Default)]
pub struct Effects {
    pub commands: Vec<NetworkCommand>,
    pub push: Option<Screen>,
    pub alert: Option<Alert>,
    pub session: Option<SessionAction>,
}

/// What a screen can reach while it handles an event or a response
pub struct Ctx<'a> {
    ids: &'a mut RequestIds,
    session: &'a Session,
    page_limit: u32,
    effects: Effects,
}

impl<'a> Ctx<'a> {
    pub fn new(ids: &'a mut RequestIds, session: &'a Session, page_limit: u32) -> Self {
        Ctx {
            ids,
            session,
            page_limit,
            effects: Effects::default(),
        }
    }

    pub fn next_id(&mut self) -> u64 {
        self.ids.next_id()
    }

    /// Send `query` under an id the caller already holds
    pub fn send(&mut self, id: u64, query: Query) {
        self.effects.commands.push(NetworkCommand::Fetch { id, query });
    }

    /// Send `query` under a fresh id and return it
    pub fn fetch(&mut self, query: Query) -> u64 {
        let id = self.next_id();
        self.send(id, query);
        id
    }

    pub fn push(&mut self, screen: Screen) {
        self.effects.push = Some(screen);
    }

    /// Raise an alert; the first one raised wins
    pub fn alert(&mut self, alert: Alert) {
        if self.effects.alert.is_none() {
            self.effects.alert = Some(alert);
        }
    }

    pub fn login(&mut self, email: String, password: String) {
        self.effects.session = Some(SessionAction::Login { email, password });
    }

    pub fn logout(&mut self) {
        self.effects.session = Some(SessionAction::Logout);
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn into_effects(self) -> Effects {
        self.effects
    }
}

/// Behaviour shared by every screen
pub trait View {
    fn title(&self) -> String;

    /// Issue the screen's initial fetches
    fn mount(&mut self, ctx: &mut Ctx);

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx);

    /// True if the response with `id` belongs to this screen
    fn owns(&self, id: u64) -> bool;

    fn receive(&mut self, id: u64, result: Result<Payload, String>, ctx: &mut Ctx);

    fn is_loading(&self) -> bool;

    /// Whether the screen has a text field the user can edit
    fn accepts_input(&self) -> bool {
        false
    }

    fn session_changed(&mut self, _ctx: &mut Ctx) {}

    /// When the screen's data last arrived
    fn updated_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

/// Most recent of several fetch times
pub fn latest<I>(times: I) -> Option<DateTime<Utc>>
where
    I: IntoIterator<Item = Option<DateTime<Utc>>>,
{
    times.into_iter().flatten().max()
}

#[derive(Debug, Clone)]
pub enum Screen {
    Home(HomeScreen),
    Search(SearchScreen),
    Featured(FeaturedScreen),
    Category(CategoryScreen),
    Teacher(TeacherScreen),
    Course(CourseDetailScreen),
    Profile(ProfileScreen),
}

impl Screen {
    pub fn view(&self) -> &dyn View {
        match self {
            Screen::Home(s) => s,
            Screen::Search(s) => s,
            Screen::Featured(s) => s,
            Screen::Category(s) => s,
            Screen::Teacher(s) => s,
            Screen::Course(s) => s,
            Screen::Profile(s) => s,
        }
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        match self {
            Screen::Home(s) => s,
            Screen::Search(s) => s,
            Screen::Featured(s) => s,
            Screen::Category(s) => s,
            Screen::Teacher(s) => s,
            Screen::Course(s) => s,
            Screen::Profile(s) => s,
        }
    }
}

/// Locally toggled course bookmarks; never persisted
#[derive(Debug, Clone, Default)]
pub struct Bookmarks(HashSet<Id>);

impl Bookmarks {
    pub fn toggle(&mut self, id: Id) -> bool {
        if !self.0.remove(&id) {
            self.0.insert(id);
            return true;
        }
        false
    }

    pub fn contains(&self, id: Id) -> bool {
        self.0.contains(&id)
    }
}

/// A course ready to display
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRow {
    pub course: Course,
    pub teacher: String,
    pub saved: bool,
}

pub fn course_rows(courses: &[Course], users: &[User], saved: &Bookmarks) -> Vec<CourseRow> {
    courses
        .iter()
        .map(|c| CourseRow {
            course: c.clone(),
            teacher: teacher_name(users, c),
            saved: saved.contains(c.id),
        })
        .collect()
}

/// Move a selection within `len` rows, clamping at both ends
pub fn step(selected: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}

/// `items[start..end]`, clamped to what exists
pub fn window<T>(items: &[T], start: usize, end: usize) -> &[T] {
    let end = end.min(items.len());
    let start = start.min(end);
    &items[start..end]
}
