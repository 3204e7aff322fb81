//! Search tab root: suggestions while idle, filtered courses otherwise

use chrono::{DateTime, Utc};

use crate::constants::{HOT_TOPICS, SEARCH_CATEGORY_COUNT};
use crate::messages::network::expect;
use crate::messages::{Payload, Query, UiEvent};
use crate::models::{Category, Course, FeaturedList, User};
use crate::resource::{Resource, Settled};
use crate::screens::{
    course_rows, latest, step, Alert, Bookmarks, CourseDetailScreen, CourseRow, Ctx,
    FeaturedScreen, Screen, View,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PriceFilter {
    #[default]
    All,
    Free,
    Paid,
}

impl PriceFilter {
    pub fn next(&self) -> PriceFilter {
        match self {
            PriceFilter::All => PriceFilter::Free,
            PriceFilter::Free => PriceFilter::Paid,
            PriceFilter::Paid => PriceFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceFilter::All => "All",
            PriceFilter::Free => "Free",
            PriceFilter::Paid => "Paid",
        }
    }

    pub fn matches(&self, course: &Course) -> bool {
        match self {
            PriceFilter::All => true,
            PriceFilter::Free => course.is_free(),
            PriceFilter::Paid => !course.is_free(),
        }
    }
}

/// Courses whose title or category name contains `text`, ignoring case
/// and surrounding whitespace. Blank text matches nothing.
pub fn filter_courses<'a>(
    courses: &'a [Course],
    categories: &[Category],
    text: &str,
    price: PriceFilter,
) -> Vec<&'a Course> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    courses
        .iter()
        .filter(|c| {
            let category = categories
                .iter()
                .find(|cat| cat.id == c.category_id)
                .map(|cat| cat.name.to_lowercase())
                .unwrap_or_default();
            c.title.to_lowercase().contains(&needle) || category.contains(&needle)
        })
        .filter(|c| price.matches(c))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchRow {
    Topic(&'static str),
    Category(Category),
    Course(CourseRow),
    ViewMore(FeaturedList),
}

impl SearchRow {
    pub fn heading(&self) -> &'static str {
        match self {
            SearchRow::Topic(_) => "Hot topics",
            SearchRow::Category(_) => "Categories",
            SearchRow::Course(_) | SearchRow::ViewMore(_) => FeaturedList::Recommended.title(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchScreen {
    categories: Resource<Vec<Category>>,
    courses: Resource<Vec<Course>>,
    recommended: Resource<Vec<Course>>,
    users: Resource<Vec<User>>,
    query: String,
    price: PriceFilter,
    saved: Bookmarks,
    selected: usize,
}

impl Default for SearchScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchScreen {
    pub fn new() -> Self {
        SearchScreen {
            categories: Resource::new("categories"),
            courses: Resource::new("courses"),
            recommended: Resource::new("recommended courses"),
            users: Resource::new("users"),
            query: String::new(),
            price: PriceFilter::All,
            saved: Bookmarks::default(),
            selected: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn price(&self) -> PriceFilter {
        self.price
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Non-blank text switches to the results view
    pub fn is_searching(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn results(&self) -> Vec<CourseRow> {
        let found: Vec<Course> = filter_courses(
            self.courses.data(),
            self.categories.data(),
            &self.query,
            self.price,
        )
        .into_iter()
        .cloned()
        .collect();
        course_rows(&found, self.users.data(), &self.saved)
    }

    pub fn rows(&self) -> Vec<SearchRow> {
        if self.is_searching() {
            return self.results().into_iter().map(SearchRow::Course).collect();
        }
        let mut rows: Vec<SearchRow> = HOT_TOPICS.into_iter().map(SearchRow::Topic).collect();
        rows.extend(
            self.categories
                .data()
                .iter()
                .take(SEARCH_CATEGORY_COUNT)
                .cloned()
                .map(SearchRow::Category),
        );
        rows.extend(
            course_rows(self.recommended.data(), self.users.data(), &self.saved)
                .into_iter()
                .map(SearchRow::Course),
        );
        rows.push(SearchRow::ViewMore(FeaturedList::Recommended));
        rows
    }

    fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        self.selected = 0;
    }

    fn fetch(&mut self, ctx: &mut Ctx) {
        self.categories.begin(ctx.fetch(Query::Categories));
        self.courses.begin(ctx.fetch(Query::Courses));
        self.recommended.begin(ctx.fetch(Query::Featured(FeaturedList::Recommended)));
        self.users.begin(ctx.fetch(Query::Users));
    }

    fn activate(&mut self, ctx: &mut Ctx) {
        let Some(row) = self.rows().into_iter().nth(self.selected) else {
            return;
        };
        match row {
            SearchRow::Topic(topic) => self.set_query(topic),
            SearchRow::Category(category) => self.set_query(&category.name),
            SearchRow::Course(row) => ctx.push(Screen::Course(CourseDetailScreen::new(row.course.id))),
            SearchRow::ViewMore(list) => ctx.push(Screen::Featured(FeaturedScreen::new(list))),
        }
    }
}

impl View for SearchScreen {
    fn title(&self) -> String {
        "Search".into()
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.fetch(ctx);
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        match event {
            UiEvent::SelectPrev => self.selected = step(self.selected, self.rows().len(), false),
            UiEvent::SelectNext => self.selected = step(self.selected, self.rows().len(), true),
            UiEvent::Activate => self.activate(ctx),
            UiEvent::Refresh => self.fetch(ctx),
            UiEvent::CyclePriceFilter => {
                self.price = self.price.next();
                self.selected = 0;
            }
            UiEvent::CharInput(c) => {
                self.query.push(*c);
                self.selected = 0;
            }
            UiEvent::Backspace => {
                self.query.pop();
                self.selected = 0;
            }
            // Esc at the tab root clears the search
            UiEvent::Back => self.set_query(""),
            UiEvent::ToggleSaved => {
                if let Some(SearchRow::Course(row)) = self.rows().into_iter().nth(self.selected) {
                    self.saved.toggle(row.course.id);
                }
            }
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.categories.is_pending(id)
            || self.courses.is_pending(id)
            || self.recommended.is_pending(id)
            || self.users.is_pending(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, ctx: &mut Ctx) {
        let settled = if self.categories.is_pending(id) {
            self.categories.settle(id, expect(result))
        } else if self.courses.is_pending(id) {
            self.courses.settle(id, expect(result))
        } else if self.recommended.is_pending(id) {
            self.recommended.settle(id, expect(result))
        } else if self.users.is_pending(id) {
            self.users.settle(id, expect(result))
        } else {
            Settled::Stale
        };
        if let Settled::Failed(message) = settled {
            ctx.alert(Alert::connection(message));
        }
        self.selected = self.selected.min(self.rows().len().saturating_sub(1));
    }

    fn is_loading(&self) -> bool {
        self.categories.is_loading() || self.courses.is_loading() || self.recommended.is_loading()
    }

    fn accepts_input(&self) -> bool {
        true
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([
            self.categories.fetched_at(),
            self.courses.fetched_at(),
            self.recommended.fetched_at(),
            self.users.fetched_at(),
        ])
    }
}
