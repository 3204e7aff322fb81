//! Course detail: overview, lesson accordion and reviews

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::constants::{UNKNOWN_TEACHER, UNKNOWN_USER};
use crate::messages::network::expect;
use crate::messages::{Payload, Query, UiEvent};
use crate::models::{teacher_name, Course, Id, Lesson, Review, Section, User};
use crate::resource::Resource;
use crate::screens::{latest, step, Ctx, View};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Overview,
    Lessons,
    Reviews,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Overview, DetailTab::Lessons, DetailTab::Reviews];

    pub fn title(&self) -> &'static str {
        match self {
            DetailTab::Overview => "Overview",
            DetailTab::Lessons => "Lessons",
            DetailTab::Reviews => "Reviews",
        }
    }

    pub fn next(&self) -> DetailTab {
        match self {
            DetailTab::Overview => DetailTab::Lessons,
            DetailTab::Lessons => DetailTab::Reviews,
            DetailTab::Reviews => DetailTab::Overview,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            DetailTab::Overview => 0,
            DetailTab::Lessons => 1,
            DetailTab::Reviews => 2,
        }
    }
}

/// A section with the lessons that belong to it
#[derive(Debug, Clone, PartialEq)]
pub struct SectionGroup {
    pub section: Section,
    pub lessons: Vec<Lesson>,
}

/// Groups lessons under their sections, keeping the order of both
pub fn group_lessons(sections: &[Section], lessons: &[Lesson]) -> Vec<SectionGroup> {
    sections
        .iter()
        .map(|section| SectionGroup {
            section: section.clone(),
            lessons: lessons
                .iter()
                .filter(|l| l.section_id == section.id)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Two-digit, 1-based lesson number
pub fn lesson_number(index: usize) -> String {
    format!("{:02}", index + 1)
}

pub fn format_duration(mins: f64) -> String {
    format!("{:.2} mins", mins)
}

/// One line of the lesson accordion
#[derive(Debug, Clone, PartialEq)]
pub enum LessonRow {
    Section {
        id: Id,
        title: String,
        open: bool,
        lesson_count: usize,
    },
    Lesson {
        number: String,
        lesson: Lesson,
    },
}

/// Flattens groups into rows; lessons of closed sections are hidden
pub fn lesson_rows(groups: &[SectionGroup], open: &HashSet<Id>) -> Vec<LessonRow> {
    let mut rows = Vec::new();
    for group in groups {
        let is_open = open.contains(&group.section.id);
        rows.push(LessonRow::Section {
            id: group.section.id,
            title: group.section.title.clone(),
            open: is_open,
            lesson_count: group.lessons.len(),
        });
        if is_open {
            rows.extend(group.lessons.iter().enumerate().map(|(i, lesson)| LessonRow::Lesson {
                number: lesson_number(i),
                lesson: lesson.clone(),
            }));
        }
    }
    rows
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRow {
    pub reviewer: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: Option<String>,
}

pub fn review_rows(reviews: &[Review], users: &[User]) -> Vec<ReviewRow> {
    reviews
        .iter()
        .map(|r| ReviewRow {
            reviewer: users
                .iter()
                .find(|u| u.id == r.user_id)
                .map(|u| u.full_name.clone())
                .unwrap_or_else(|| UNKNOWN_USER.to_string()),
            rating: r.rating,
            comment: r.comment.clone(),
            created_at: r.created_at.clone(),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct CourseDetailScreen {
    course_id: Id,
    course: Resource<Option<Course>>,
    users: Resource<Vec<User>>,
    sections: Resource<Vec<Section>>,
    lessons: Resource<Vec<Lesson>>,
    reviews: Resource<Vec<Review>>,
    tab: DetailTab,
    open_sections: HashSet<Id>,
    sections_seeded: bool,
    selected: usize,
    saved: bool,
}

impl CourseDetailScreen {
    pub fn new(course_id: Id) -> Self {
        CourseDetailScreen {
            course_id,
            course: Resource::new("course"),
            users: Resource::new("users"),
            sections: Resource::new("sections"),
            lessons: Resource::new("lessons"),
            reviews: Resource::new("reviews"),
            tab: DetailTab::Overview,
            open_sections: HashSet::new(),
            sections_seeded: false,
            selected: 0,
            saved: false,
        }
    }

    pub fn course_id(&self) -> Id {
        self.course_id
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.data().as_ref()
    }

    pub fn teacher(&self) -> String {
        self.course()
            .map(|c| teacher_name(self.users.data(), c))
            .unwrap_or_else(|| UNKNOWN_TEACHER.to_string())
    }

    pub fn tab(&self) -> DetailTab {
        self.tab
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn groups(&self) -> Vec<SectionGroup> {
        group_lessons(self.sections.data(), self.lessons.data())
    }

    pub fn lesson_rows(&self) -> Vec<LessonRow> {
        lesson_rows(&self.groups(), &self.open_sections)
    }

    pub fn review_rows(&self) -> Vec<ReviewRow> {
        review_rows(self.reviews.data(), self.users.data())
    }

    /// First error among the fetches, shown inline
    pub fn error(&self) -> Option<&str> {
        self.course
            .error()
            .or(self.sections.error())
            .or(self.lessons.error())
            .or(self.reviews.error())
            .or(self.users.error())
    }

    pub fn toggle_section(&mut self, id: Id) {
        if !self.open_sections.remove(&id) {
            self.open_sections.insert(id);
        }
    }

    fn row_count(&self) -> usize {
        match self.tab {
            DetailTab::Overview => 0,
            DetailTab::Lessons => self.lesson_rows().len(),
            DetailTab::Reviews => self.reviews.data().len(),
        }
    }

    fn fetch(&mut self, ctx: &mut Ctx) {
        let course_id = self.course_id;
        self.course.begin(ctx.fetch(Query::Course(course_id)));
        self.users.begin(ctx.fetch(Query::Users));
        self.sections.begin(ctx.fetch(Query::Sections { course_id }));
        self.lessons.begin(ctx.fetch(Query::Lessons));
        self.reviews.begin(ctx.fetch(Query::Reviews { course_id }));
    }
}

impl View for CourseDetailScreen {
    fn title(&self) -> String {
        self.course()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "Course".into())
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.fetch(ctx);
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        match event {
            UiEvent::NextPane => {
                self.tab = self.tab.next();
                self.selected = 0;
            }
            UiEvent::SelectPrev => self.selected = step(self.selected, self.row_count(), false),
            UiEvent::SelectNext => self.selected = step(self.selected, self.row_count(), true),
            UiEvent::Activate if self.tab == DetailTab::Lessons => {
                if let Some(LessonRow::Section { id, .. }) =
                    self.lesson_rows().into_iter().nth(self.selected)
                {
                    self.toggle_section(id);
                }
            }
            UiEvent::ToggleSaved => self.saved = !self.saved,
            UiEvent::Refresh => self.fetch(ctx),
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.course.is_pending(id)
            || self.users.is_pending(id)
            || self.sections.is_pending(id)
            || self.lessons.is_pending(id)
            || self.reviews.is_pending(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, _ctx: &mut Ctx) {
        if self.course.is_pending(id) {
            self.course.settle(id, expect(result));
        } else if self.users.is_pending(id) {
            self.users.settle(id, expect(result));
        } else if self.sections.is_pending(id) {
            self.sections.settle(id, expect(result));
            if !self.sections_seeded {
                if let Some(first) = self.sections.data().first() {
                    self.open_sections.insert(first.id);
                    self.sections_seeded = true;
                }
            }
        } else if self.lessons.is_pending(id) {
            self.lessons.settle(id, expect(result));
        } else if self.reviews.is_pending(id) {
            self.reviews.settle(id, expect(result));
        }
        self.selected = self.selected.min(self.row_count().saturating_sub(1));
    }

    fn is_loading(&self) -> bool {
        self.course.is_loading()
            || self.users.is_loading()
            || self.sections.is_loading()
            || self.lessons.is_loading()
            || self.reviews.is_loading()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([
            self.course.fetched_at(),
            self.users.fetched_at(),
            self.sections.fetched_at(),
            self.lessons.fetched_at(),
            self.reviews.fetched_at(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::fixtures::{self, id_of, Harness};
    use crate::models::Role;

    fn section(id: Id, title: &str) -> Section {
        Section {
            id,
            course_id: 1,
            title: title.into(),
        }
    }

    fn lesson(id: Id, section_id: Id, mins: f64) -> Lesson {
        Lesson {
            id,
            section_id,
            title: format!("Lesson {}", id),
            duration_mins: mins,
            is_free: id % 2 == 0,
        }
    }

    #[test]
    fn test_group_lessons_keeps_order() {
        let sections = vec![section(9, "Intro"), section(4, "Basics"), section(7, "Empty")];
        let lessons = vec![lesson(1, 4, 3.0), lesson(2, 9, 5.0), lesson(3, 4, 1.5), lesson(4, 99, 2.0)];

        let groups = group_lessons(&sections, &lessons);
        let ids: Vec<(Id, Vec<Id>)> = groups
            .iter()
            .map(|g| (g.section.id, g.lessons.iter().map(|l| l.id).collect()))
            .collect();
        assert_eq!(ids, vec![(9, vec![2]), (4, vec![1, 3]), (7, vec![])]);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(lesson_number(0), "01");
        assert_eq!(lesson_number(11), "12");
        assert_eq!(format_duration(6.1), "6.10 mins");
        assert_eq!(format_duration(12.345), "12.35 mins");
    }

    #[test]
    fn test_accordion_rows() {
        let groups = group_lessons(
            &[section(1, "A"), section(2, "B")],
            &[lesson(10, 1, 1.0), lesson(11, 1, 1.0), lesson(12, 2, 1.0)],
        );
        let mut open = HashSet::new();
        assert_eq!(lesson_rows(&groups, &open).len(), 2);

        open.insert(1);
        let rows = lesson_rows(&groups, &open);
        assert_eq!(rows.len(), 4);
        assert!(matches!(&rows[2], LessonRow::Lesson { number, .. } if number == "02"));
        assert!(matches!(&rows[3], LessonRow::Section { id: 2, open: false, lesson_count: 1, .. }));
    }

    #[test]
    fn test_first_section_opens_and_enter_toggles() {
        let mut h = Harness::new();
        let mut screen = CourseDetailScreen::new(1);
        let fx = h.run(|ctx| screen.mount(ctx));
        assert_eq!(fx.commands.len(), 5);

        let sections_id = id_of(&fx, &Query::Sections { course_id: 1 });
        let lessons_id = id_of(&fx, &Query::Lessons);
        h.run(|ctx| {
            screen.receive(
                sections_id,
                Ok(Payload::Sections(vec![section(5, "A"), section(6, "B")])),
                ctx,
            );
            screen.receive(
                lessons_id,
                Ok(Payload::Lessons(vec![lesson(1, 5, 2.0), lesson(2, 6, 2.0)])),
                ctx,
            );
        });

        // section 5 open: [A, 01, B]
        assert_eq!(screen.lesson_rows().len(), 3);

        h.run(|ctx| {
            screen.handle(&UiEvent::NextPane, ctx);
            screen.handle(&UiEvent::Activate, ctx);
        });
        assert_eq!(screen.tab(), DetailTab::Lessons);
        assert_eq!(screen.lesson_rows().len(), 2);

        h.run(|ctx| {
            screen.handle(&UiEvent::SelectNext, ctx);
            screen.handle(&UiEvent::Activate, ctx);
        });
        // [A, B, 01]
        let rows = screen.lesson_rows();
        assert!(matches!(&rows[1], LessonRow::Section { id: 6, open: true, .. }));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_teacher_and_reviews_resolve_names() {
        let mut h = Harness::new();
        let mut screen = CourseDetailScreen::new(3);
        let fx = h.run(|ctx| screen.mount(ctx));
        let course_id = id_of(&fx, &Query::Course(3));
        let users_id = id_of(&fx, &Query::Users);
        let reviews_id = id_of(&fx, &Query::Reviews { course_id: 3 });

        let review = Review {
            id: 1,
            course_id: 3,
            user_id: 7,
            rating: 5.0,
            comment: "Great".into(),
            created_at: None,
        };
        h.run(|ctx| {
            let course = fixtures::course(3, "Rust", 1, 100, 20.0);
            screen.receive(course_id, Ok(Payload::Course(Box::new(course))), ctx);
            screen.receive(
                users_id,
                Ok(Payload::Users(vec![
                    fixtures::user(100, "Sara", Role::Teacher),
                    fixtures::user(7, "Oxy", Role::Student),
                ])),
                ctx,
            );
            screen.receive(reviews_id, Ok(Payload::Reviews(vec![review])), ctx);
        });

        assert_eq!(screen.title(), "Rust");
        assert_eq!(screen.teacher(), "Sara");
        assert_eq!(screen.review_rows()[0].reviewer, "Oxy");
    }

    #[test]
    fn test_review_from_unknown_user() {
        let review = Review {
            id: 2,
            course_id: 3,
            user_id: 99,
            rating: 3.0,
            comment: "Fine".into(),
            created_at: None,
        };
        let users = vec![fixtures::user(100, "Sara", Role::Teacher)];
        let rows = review_rows(&[review], &users);
        assert_eq!(rows[0].reviewer, UNKNOWN_USER);
        assert_ne!(rows[0].reviewer, UNKNOWN_TEACHER);
    }

    #[test]
    fn test_errors_are_inline() {
        let mut h = Harness::new();
        let mut screen = CourseDetailScreen::new(3);
        let fx = h.run(|ctx| screen.mount(ctx));
        let course_id = id_of(&fx, &Query::Course(3));
        let fx = h.run(|ctx| screen.receive(course_id, Err("Server returned 404".into()), ctx));
        assert!(fx.alert.is_none());
        assert_eq!(screen.error(), Some("Could not load course: Server returned 404"));
    }
}
