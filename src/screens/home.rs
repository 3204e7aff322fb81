//! Home tab root: categories, featured course rows and top teachers

use chrono::{DateTime, Utc};

use crate::constants::{HOME_CATEGORY_COUNT, HOME_POPULAR_COUNT, HOME_TEACHER_COUNT};
use crate::messages::network::expect;
use crate::messages::{Payload, Query, UiEvent};
use crate::models::{Category, Course, FeaturedList, User};
use crate::resource::{Resource, Settled};
use crate::screens::{
    course_rows, latest, step, window, Alert, Bookmarks, CategoryScreen, CourseDetailScreen, CourseRow,
    Ctx, FeaturedScreen, Screen, TeacherScreen, View,
};

/// One selectable line of the home screen
#[derive(Debug, Clone, PartialEq)]
pub enum HomeRow {
    Category(Category),
    ToggleCategories { expanded: bool },
    Course { list: FeaturedList, row: CourseRow },
    ViewMore(FeaturedList),
    Teacher(User),
}

impl HomeRow {
    /// Heading of the group the row belongs to
    pub fn heading(&self) -> &'static str {
        match self {
            HomeRow::Category(_) | HomeRow::ToggleCategories { .. } => "Categories",
            HomeRow::Course { list, .. } | HomeRow::ViewMore(list) => list.title(),
            HomeRow::Teacher(_) => "Top teachers",
        }
    }
}

/// Builds the home rows from the fetched collections
pub fn compose_home(
    categories: &[Category],
    courses: &[Course],
    users: &[User],
    show_all_categories: bool,
    saved: &Bookmarks,
) -> Vec<HomeRow> {
    let mut rows = Vec::new();

    let has_more = categories.len() > HOME_CATEGORY_COUNT;
    let shown = if show_all_categories || !has_more {
        categories
    } else {
        &categories[..HOME_CATEGORY_COUNT]
    };
    rows.extend(shown.iter().cloned().map(HomeRow::Category));
    if has_more {
        rows.push(HomeRow::ToggleCategories {
            expanded: show_all_categories,
        });
    }

    let featured = [
        (FeaturedList::Popular, window(courses, 0, HOME_POPULAR_COUNT)),
        (FeaturedList::Recommended, window(courses, 4, 6)),
        (FeaturedList::Inspiring, window(courses, 6, 9)),
    ];
    for (list, slice) in featured {
        rows.extend(
            course_rows(slice, users, saved)
                .into_iter()
                .map(|row| HomeRow::Course { list, row }),
        );
        rows.push(HomeRow::ViewMore(list));
    }

    rows.extend(
        users
            .iter()
            .filter(|u| u.is_teacher())
            .take(HOME_TEACHER_COUNT)
            .cloned()
            .map(HomeRow::Teacher),
    );
    rows
}

#[derive(Debug, Clone)]
pub struct HomeScreen {
    categories: Resource<Vec<Category>>,
    courses: Resource<Vec<Course>>,
    users: Resource<Vec<User>>,
    show_all_categories: bool,
    saved: Bookmarks,
    selected: usize,
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeScreen {
    pub fn new() -> Self {
        HomeScreen {
            categories: Resource::new("categories"),
            courses: Resource::new("courses"),
            users: Resource::new("users"),
            show_all_categories: false,
            saved: Bookmarks::default(),
            selected: 0,
        }
    }

    pub fn rows(&self) -> Vec<HomeRow> {
        compose_home(
            self.categories.data(),
            self.courses.data(),
            self.users.data(),
            self.show_all_categories,
            &self.saved,
        )
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn fetch_all(&mut self, ctx: &mut Ctx) {
        self.categories.begin(ctx.fetch(Query::Categories));
        self.courses.begin(ctx.fetch(Query::Courses));
        self.users.begin(ctx.fetch(Query::Users));
    }

    fn activate(&mut self, ctx: &mut Ctx) {
        let Some(row) = self.rows().into_iter().nth(self.selected) else {
            return;
        };
        match row {
            HomeRow::Category(category) => {
                ctx.push(Screen::Category(CategoryScreen::new(category, ctx.page_limit())))
            }
            HomeRow::ToggleCategories { expanded } => {
                self.show_all_categories = !expanded;
                self.clamp_selection();
            }
            HomeRow::Course { row, .. } => {
                ctx.push(Screen::Course(CourseDetailScreen::new(row.course.id)))
            }
            HomeRow::ViewMore(list) => ctx.push(Screen::Featured(FeaturedScreen::new(list))),
            HomeRow::Teacher(user) => {
                ctx.push(Screen::Teacher(TeacherScreen::new(user.id, ctx.page_limit())))
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}

impl View for HomeScreen {
    fn title(&self) -> String {
        "Home".into()
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.fetch_all(ctx);
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        match event {
            UiEvent::SelectPrev => self.selected = step(self.selected, self.rows().len(), false),
            UiEvent::SelectNext => self.selected = step(self.selected, self.rows().len(), true),
            UiEvent::Activate => self.activate(ctx),
            UiEvent::Refresh => self.fetch_all(ctx),
            UiEvent::ToggleSaved => {
                if let Some(HomeRow::Course { row, .. }) = self.rows().into_iter().nth(self.selected)
                {
                    self.saved.toggle(row.course.id);
                }
            }
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.categories.is_pending(id) || self.courses.is_pending(id) || self.users.is_pending(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, ctx: &mut Ctx) {
        let settled = if self.categories.is_pending(id) {
            self.categories.settle(id, expect(result))
        } else if self.courses.is_pending(id) {
            self.courses.settle(id, expect(result))
        } else if self.users.is_pending(id) {
            self.users.settle(id, expect(result))
        } else {
            Settled::Stale
        };
        if let Settled::Failed(message) = settled {
            ctx.alert(Alert::connection(message));
        }
        self.clamp_selection();
    }

    fn is_loading(&self) -> bool {
        self.categories.is_loading() || self.courses.is_loading() || self.users.is_loading()
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([
            self.categories.fetched_at(),
            self.courses.fetched_at(),
            self.users.fetched_at(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::screens::fixtures::{self, id_of, Harness};

    fn categories(n: u64) -> Vec<Category> {
        (1..=n).map(|i| fixtures::category(i, &format!("Cat {}", i))).collect()
    }

    fn count(rows: &[HomeRow], f: impl Fn(&HomeRow) -> bool) -> usize {
        rows.iter().filter(|r| f(r)).count()
    }

    #[test]
    fn test_compose_slices_featured_rows() {
        let courses = fixtures::courses(10);
        let rows = compose_home(&[], &courses, &[], false, &Bookmarks::default());

        let ids = |list: FeaturedList| -> Vec<u64> {
            rows.iter()
                .filter_map(|r| match r {
                    HomeRow::Course { list: l, row } if *l == list => Some(row.course.id),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(ids(FeaturedList::Popular), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(FeaturedList::Recommended), vec![5, 6]);
        assert_eq!(ids(FeaturedList::Inspiring), vec![7, 8, 9]);
        assert_eq!(count(&rows, |r| matches!(r, HomeRow::ViewMore(_))), 3);
    }

    #[test]
    fn test_compose_short_course_list() {
        let courses = fixtures::courses(3);
        let rows = compose_home(&[], &courses, &[], false, &Bookmarks::default());
        assert_eq!(count(&rows, |r| matches!(r, HomeRow::Course { .. })), 3);
    }

    #[test]
    fn test_category_toggle() {
        let cats = categories(8);
        let rows = compose_home(&cats, &[], &[], false, &Bookmarks::default());
        assert_eq!(count(&rows, |r| matches!(r, HomeRow::Category(_))), 6);
        assert!(rows.contains(&HomeRow::ToggleCategories { expanded: false }));

        let rows = compose_home(&cats, &[], &[], true, &Bookmarks::default());
        assert_eq!(count(&rows, |r| matches!(r, HomeRow::Category(_))), 8);
        assert!(rows.contains(&HomeRow::ToggleCategories { expanded: true }));

        let rows = compose_home(&categories(6), &[], &[], false, &Bookmarks::default());
        assert_eq!(count(&rows, |r| matches!(r, HomeRow::ToggleCategories { .. })), 0);
    }

    #[test]
    fn test_top_teachers_only_teachers_max_five() {
        let mut users: Vec<User> = (1..=7)
            .map(|i| fixtures::user(i, &format!("T{}", i), Role::Teacher))
            .collect();
        users.insert(0, fixtures::user(99, "Student", Role::Student));
        let rows = compose_home(&[], &[], &users, false, &Bookmarks::default());

        let teachers: Vec<u64> = rows
            .iter()
            .filter_map(|r| match r {
                HomeRow::Teacher(u) => Some(u.id),
                _ => None,
            })
            .collect();
        assert_eq!(teachers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_mount_fetches_and_errors_alert() {
        let mut h = Harness::new();
        let mut home = HomeScreen::new();
        let fx = h.run(|ctx| home.mount(ctx));
        assert_eq!(fx.commands.len(), 3);
        assert!(home.is_loading());

        let users_id = id_of(&fx, &Query::Users);
        assert!(home.owns(users_id));
        let fx = h.run(|ctx| home.receive(users_id, Err("Request timed out".into()), ctx));
        let alert = fx.alert.unwrap();
        assert_eq!(alert.title, "Connection error");
        assert_eq!(alert.message, "Could not load users: Request timed out");
    }

    #[test]
    fn test_activating_view_more_pushes_featured_list() {
        let mut h = Harness::new();
        let mut home = HomeScreen::new();
        let fx = h.run(|ctx| home.mount(ctx));
        let courses_id = id_of(&fx, &Query::Courses);
        h.run(|ctx| home.receive(courses_id, Ok(Payload::Courses(fixtures::courses(2))), ctx));

        // rows: course 1, course 2, view more (popular)
        let fx = h.run(|ctx| {
            home.handle(&UiEvent::SelectNext, ctx);
            home.handle(&UiEvent::SelectNext, ctx);
            home.handle(&UiEvent::Activate, ctx);
        });
        assert!(matches!(fx.push, Some(Screen::Featured(_))));
    }
}
