//! One curated course list (popular, recommended or inspiring)

use chrono::{DateTime, Utc};

use crate::messages::network::expect;
use crate::messages::{Payload, Query, UiEvent};
use crate::models::{Course, FeaturedList, User};
use crate::resource::Resource;
use crate::screens::{
    course_rows, latest, step, Bookmarks, CourseDetailScreen, CourseRow, Ctx, Screen, View,
};

#[derive(Debug, Clone)]
pub struct FeaturedScreen {
    list: FeaturedList,
    courses: Resource<Vec<Course>>,
    users: Resource<Vec<User>>,
    saved: Bookmarks,
    selected: usize,
}

impl FeaturedScreen {
    pub fn new(list: FeaturedList) -> Self {
        FeaturedScreen {
            list,
            courses: Resource::new("courses"),
            users: Resource::new("users"),
            saved: Bookmarks::default(),
            selected: 0,
        }
    }

    pub fn list(&self) -> FeaturedList {
        self.list
    }

    pub fn rows(&self) -> Vec<CourseRow> {
        course_rows(self.courses.data(), self.users.data(), &self.saved)
    }

    /// Badge count
    pub fn count(&self) -> usize {
        self.courses.data().len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn error(&self) -> Option<&str> {
        self.courses.error().or(self.users.error())
    }

    /// Loaded and nothing to show
    pub fn is_empty(&self) -> bool {
        !self.courses.is_loading() && self.courses.data().is_empty()
    }

    fn fetch(&mut self, ctx: &mut Ctx) {
        self.courses.begin(ctx.fetch(Query::Featured(self.list)));
        self.users.begin(ctx.fetch(Query::Users));
    }
}

impl View for FeaturedScreen {
    fn title(&self) -> String {
        self.list.title().to_string()
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.fetch(ctx);
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        let len = self.count();
        match event {
            UiEvent::SelectPrev => self.selected = step(self.selected, len, false),
            UiEvent::SelectNext => self.selected = step(self.selected, len, true),
            UiEvent::Refresh => self.fetch(ctx),
            UiEvent::Activate => {
                if let Some(course) = self.courses.data().get(self.selected) {
                    ctx.push(Screen::Course(CourseDetailScreen::new(course.id)));
                }
            }
            UiEvent::ToggleSaved => {
                if let Some(course) = self.courses.data().get(self.selected) {
                    self.saved.toggle(course.id);
                }
            }
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.courses.is_pending(id) || self.users.is_pending(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, _ctx: &mut Ctx) {
        if self.courses.is_pending(id) {
            self.courses.settle(id, expect(result));
            self.selected = self.selected.min(self.count().saturating_sub(1));
        } else if self.users.is_pending(id) {
            self.users.settle(id, expect(result));
        }
    }

    fn is_loading(&self) -> bool {
        self.courses.is_loading() || self.users.is_loading()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([self.courses.fetched_at(), self.users.fetched_at()])
    }
}
