//! Courses of one category, loaded a page at a time

use chrono::{DateTime, Utc};

use crate::messages::network::expect;
use crate::messages::{CourseFilter, Payload, Query, UiEvent};
use crate::models::{Category, Course, User};
use crate::paging::PagedList;
use crate::resource::Resource;
use crate::screens::feed::CourseFeed;
use crate::screens::{
    course_rows, latest, Bookmarks, CourseDetailScreen, CourseRow, Ctx, Screen, View,
};

#[derive(Debug, Clone)]
pub struct CategoryScreen {
    category: Category,
    feed: CourseFeed,
    users: Resource<Vec<User>>,
    saved: Bookmarks,
}

impl CategoryScreen {
    pub fn new(category: Category, page_limit: u32) -> Self {
        let filter = CourseFilter::Category(category.id);
        CategoryScreen {
            category,
            feed: CourseFeed::new(filter, page_limit),
            users: Resource::new("users"),
            saved: Bookmarks::default(),
        }
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn list(&self) -> &PagedList<Course> {
        self.feed.list()
    }

    pub fn rows(&self) -> Vec<CourseRow> {
        course_rows(self.feed.list().items(), self.users.data(), &self.saved)
    }

    pub fn selected(&self) -> usize {
        self.feed.selected()
    }
}

impl View for CategoryScreen {
    fn title(&self) -> String {
        self.category.name.clone()
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.feed.start(ctx);
        self.users.begin(ctx.fetch(Query::Users));
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        match event {
            UiEvent::SelectPrev => self.feed.select_prev(),
            UiEvent::SelectNext => self.feed.select_next(ctx),
            UiEvent::LoadMore => {
                self.feed.scroll_end(ctx);
            }
            UiEvent::Refresh => self.feed.refresh(ctx),
            UiEvent::Activate => {
                if let Some(course) = self.feed.selected_course() {
                    ctx.push(Screen::Course(CourseDetailScreen::new(course.id)));
                }
            }
            UiEvent::ToggleSaved => {
                if let Some(course) = self.feed.selected_course() {
                    self.saved.toggle(course.id);
                }
            }
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.feed.owns(id) || self.users.is_pending(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, ctx: &mut Ctx) {
        if self.users.is_pending(id) {
            self.users.settle(id, expect(result));
        } else {
            self.feed.receive(id, result, ctx);
        }
    }

    fn is_loading(&self) -> bool {
        let list = self.feed.list();
        list.is_loading_more() || list.is_refreshing() || self.users.is_loading()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([self.feed.list().fetched_at(), self.users.fetched_at()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use crate::paging::ListPhase;
    use crate::screens::fixtures::{self, fetches, Harness};

    fn page_query(fx: &crate::screens::Effects) -> (u64, Query) {
        fetches(fx)
            .into_iter()
            .find(|(_, q)| matches!(q, Query::CoursePage { .. }))
            .unwrap()
    }

    #[test]
    fn test_six_of_ten_then_load_more() {
        let mut h = Harness::new();
        let mut screen = CategoryScreen::new(fixtures::category(2, "Design"), 6);
        let fx = h.run(|ctx| screen.mount(ctx));
        let (first, query) = page_query(&fx);
        assert_eq!(
            query,
            Query::CoursePage {
                filter: CourseFilter::Category(2),
                page: 1,
                limit: 6
            }
        );

        let page1 = Page {
            items: fixtures::courses(6),
            total: 10,
        };
        h.run(|ctx| screen.receive(first, Ok(Payload::CoursePage(page1)), ctx));
        assert_eq!(screen.rows().len(), 6);

        let fx = h.run(|ctx| screen.handle(&UiEvent::LoadMore, ctx));
        let (second, query) = page_query(&fx);
        assert!(matches!(query, Query::CoursePage { page: 2, .. }));

        let page2 = Page {
            items: (7..=10)
                .map(|i| fixtures::course(i, "More", 2, 100, 10.0))
                .collect(),
            total: 10,
        };
        h.run(|ctx| screen.receive(second, Ok(Payload::CoursePage(page2)), ctx));
        assert_eq!(screen.rows().len(), 10);

        let fx = h.run(|ctx| screen.handle(&UiEvent::LoadMore, ctx));
        assert!(fx.commands.is_empty());
    }

    #[test]
    fn test_empty_category() {
        let mut h = Harness::new();
        let mut screen = CategoryScreen::new(fixtures::category(9, "Empty"), 6);
        let fx = h.run(|ctx| screen.mount(ctx));
        assert_eq!(screen.list().phase(), ListPhase::Loading);

        let (first, _) = page_query(&fx);
        let empty = Page {
            items: vec![],
            total: 0,
        };
        h.run(|ctx| screen.receive(first, Ok(Payload::CoursePage(empty)), ctx));
        assert_eq!(screen.list().phase(), ListPhase::Empty);

        let fx = h.run(|ctx| screen.handle(&UiEvent::SelectNext, ctx));
        assert!(fx.commands.is_empty());
    }
}
