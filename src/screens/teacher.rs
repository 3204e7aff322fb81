//! Teacher profile with an overview and a paged course list

use chrono::{DateTime, Utc};

use crate::constants::TEACHER_OVERVIEW_COUNT;
use crate::messages::network::expect;
use crate::messages::{CourseFilter, Payload, Query, UiEvent};
use crate::models::{find_teacher, Course, Id, User};
use crate::paging::PagedList;
use crate::resource::Resource;
use crate::screens::feed::CourseFeed;
use crate::screens::{
    course_rows, latest, step, Bookmarks, CourseDetailScreen, CourseRow, Ctx, Screen, View,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TeacherTab {
    #[default]
    Overview,
    Courses,
}

impl TeacherTab {
    pub fn title(&self) -> &'static str {
        match self {
            TeacherTab::Overview => "OVERVIEW",
            TeacherTab::Courses => "COURSES",
        }
    }
}

/// Whether the profile can be shown yet
#[derive(Debug, PartialEq)]
pub enum TeacherLookup<'a> {
    Loading,
    Found(&'a User),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct TeacherScreen {
    teacher_id: Id,
    users: Resource<Vec<User>>,
    feed: CourseFeed,
    tab: TeacherTab,
    overview_selected: usize,
    saved: Bookmarks,
}

impl TeacherScreen {
    pub fn new(teacher_id: Id, page_limit: u32) -> Self {
        TeacherScreen {
            teacher_id,
            users: Resource::new("users"),
            feed: CourseFeed::new(CourseFilter::Teacher(teacher_id), page_limit),
            tab: TeacherTab::Overview,
            overview_selected: 0,
            saved: Bookmarks::default(),
        }
    }

    pub fn teacher(&self) -> TeacherLookup<'_> {
        if self.users.is_loading() {
            return TeacherLookup::Loading;
        }
        match find_teacher(self.users.data(), self.teacher_id) {
            Some(user) => TeacherLookup::Found(user),
            None => TeacherLookup::NotFound,
        }
    }

    pub fn tab(&self) -> TeacherTab {
        self.tab
    }

    pub fn list(&self) -> &PagedList<Course> {
        self.feed.list()
    }

    /// Courses shown under the active tab
    pub fn rows(&self) -> Vec<CourseRow> {
        let items = self.feed.list().items();
        let shown = match self.tab {
            TeacherTab::Overview => &items[..items.len().min(TEACHER_OVERVIEW_COUNT)],
            TeacherTab::Courses => items,
        };
        course_rows(shown, self.users.data(), &self.saved)
    }

    pub fn selected(&self) -> usize {
        match self.tab {
            TeacherTab::Overview => self.overview_selected,
            TeacherTab::Courses => self.feed.selected(),
        }
    }

    fn selected_course(&self) -> Option<&Course> {
        self.feed.list().items().get(self.selected())
    }
}

impl View for TeacherScreen {
    fn title(&self) -> String {
        "Teacher's Profile".into()
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.users.begin(ctx.fetch(Query::Users));
        self.feed.start(ctx);
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        match (event, self.tab) {
            (UiEvent::NextPane, TeacherTab::Overview) => self.tab = TeacherTab::Courses,
            (UiEvent::NextPane, TeacherTab::Courses) => self.tab = TeacherTab::Overview,
            (UiEvent::SelectPrev, TeacherTab::Overview) => {
                self.overview_selected = step(self.overview_selected, self.rows().len(), false)
            }
            (UiEvent::SelectNext, TeacherTab::Overview) => {
                self.overview_selected = step(self.overview_selected, self.rows().len(), true)
            }
            (UiEvent::SelectPrev, TeacherTab::Courses) => self.feed.select_prev(),
            (UiEvent::SelectNext, TeacherTab::Courses) => self.feed.select_next(ctx),
            (UiEvent::LoadMore, TeacherTab::Courses) => {
                self.feed.scroll_end(ctx);
            }
            (UiEvent::Refresh, _) => {
                self.overview_selected = 0;
                self.feed.refresh(ctx);
            }
            (UiEvent::Activate, _) => {
                if let Some(course) = self.selected_course() {
                    ctx.push(Screen::Course(CourseDetailScreen::new(course.id)));
                }
            }
            (UiEvent::ToggleSaved, _) => {
                if let Some(id) = self.selected_course().map(|c| c.id) {
                    self.saved.toggle(id);
                }
            }
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.users.is_pending(id) || self.feed.owns(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, ctx: &mut Ctx) {
        if self.users.is_pending(id) {
            self.users.settle(id, expect(result));
            if let TeacherLookup::NotFound = self.teacher() {
                tracing::warn!(teacher_id = self.teacher_id, "Teacher not found");
            }
        } else {
            self.feed.receive(id, result, ctx);
        }
    }

    fn is_loading(&self) -> bool {
        let list = self.feed.list();
        self.users.is_loading() || list.is_loading_more() || list.is_refreshing()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([self.feed.list().fetched_at(), self.users.fetched_at()])
    }
}
