//! A paged course list bound to one filter, with a row selection

use crate::messages::network::expect;
use crate::messages::{CourseFilter, Payload, Query};
use crate::models::Course;
use crate::paging::{Completion, LoadMode, PageRequest, PagedList};
use crate::screens::{step, Alert, Ctx};

#[derive(Debug, Clone)]
pub struct CourseFeed {
    filter: CourseFilter,
    list: PagedList<Course>,
    selected: usize,
}

impl CourseFeed {
    pub fn new(filter: CourseFilter, limit: u32) -> Self {
        CourseFeed {
            filter,
            list: PagedList::new(limit),
            selected: 0,
        }
    }

    pub fn list(&self) -> &PagedList<Course> {
        &self.list
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_course(&self) -> Option<&Course> {
        self.list.items().get(self.selected)
    }

    fn send(&self, ctx: &mut Ctx, request: PageRequest) {
        ctx.send(
            request.token,
            Query::CoursePage {
                filter: self.filter,
                page: request.page,
                limit: request.limit,
            },
        );
    }

    /// Load the first page
    pub fn start(&mut self, ctx: &mut Ctx) {
        let id = ctx.next_id();
        let request = self.list.load(id, 1, LoadMode::Replace);
        self.send(ctx, request);
    }

    /// Ask for the next page; false if nothing was sent
    pub fn scroll_end(&mut self, ctx: &mut Ctx) -> bool {
        let id = ctx.next_id();
        match self.list.on_scroll_end(id) {
            Some(request) => {
                tracing::debug!(page = request.page, "Loading more courses");
                self.send(ctx, request);
                true
            }
            None => false,
        }
    }

    pub fn refresh(&mut self, ctx: &mut Ctx) {
        let id = ctx.next_id();
        let request = self.list.on_refresh(id);
        self.selected = 0;
        self.send(ctx, request);
    }

    pub fn select_prev(&mut self) {
        self.selected = step(self.selected, self.list.items().len(), false);
    }

    /// Move down; reaching the last row loads the next page
    pub fn select_next(&mut self, ctx: &mut Ctx) {
        let len = self.list.items().len();
        self.selected = step(self.selected, len, true);
        if len > 0 && self.selected == len - 1 {
            self.scroll_end(ctx);
        }
    }

    pub fn owns(&self, id: u64) -> bool {
        self.list.is_pending(id)
    }

    /// Feed a response back; failures raise an alert
    pub fn receive(&mut self, id: u64, result: Result<Payload, String>, ctx: &mut Ctx) -> Completion {
        let completion = self.list.complete(id, expect(result));
        match &completion {
            Completion::Failed(message) => {
                ctx.alert(Alert::connection(message.clone()));
            }
            Completion::Stale => tracing::debug!(id, "Discarding stale page"),
            Completion::Loaded { .. } => {
                let len = self.list.items().len();
                if self.selected >= len {
                    self.selected = len.saturating_sub(1);
                }
            }
        }
        completion
    }
}
