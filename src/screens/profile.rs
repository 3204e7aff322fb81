//! Profile tab root: login form, or the user's saved courses

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::messages::network::expect;
use crate::messages::{Payload, Query, UiEvent};
use crate::models::{Course, Favorite, Id, User};
use crate::resource::Resource;
use crate::screens::{
    course_rows, latest, step, Alert, Bookmarks, CourseDetailScreen, CourseRow, Ctx, Screen,
    View,
};
use crate::session::validate_credentials;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Courses the user has favorited, in catalogue order
pub fn saved_courses<'a>(courses: &'a [Course], favorites: &[Favorite]) -> Vec<&'a Course> {
    let ids: HashSet<Id> = favorites.iter().map(|f| f.course_id).collect();
    courses.iter().filter(|c| ids.contains(&c.id)).collect()
}

#[derive(Debug, Clone)]
pub struct ProfileScreen {
    email: String,
    password: String,
    field: LoginField,
    courses: Resource<Vec<Course>>,
    favorites: Resource<Vec<Favorite>>,
    users: Resource<Vec<User>>,
    bookmarks: Bookmarks,
    selected: usize,
    logged_in: bool,
}

impl Default for ProfileScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileScreen {
    pub fn new() -> Self {
        ProfileScreen {
            email: String::new(),
            password: String::new(),
            field: LoginField::Email,
            courses: Resource::new("courses"),
            favorites: Resource::new("favorites"),
            users: Resource::new("users"),
            bookmarks: Bookmarks::default(),
            selected: 0,
            logged_in: false,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password as displayed
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }

    pub fn field(&self) -> LoginField {
        self.field
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn saved(&self) -> Vec<CourseRow> {
        let saved: Vec<Course> = saved_courses(self.courses.data(), self.favorites.data())
            .into_iter()
            .cloned()
            .collect();
        course_rows(&saved, self.users.data(), &self.bookmarks)
    }

    pub fn saved_count(&self) -> usize {
        saved_courses(self.courses.data(), self.favorites.data()).len()
    }

    pub fn error(&self) -> Option<&str> {
        self.favorites
            .error()
            .or(self.courses.error())
            .or(self.users.error())
    }

    fn load(&mut self, ctx: &mut Ctx) {
        self.logged_in = ctx.session().is_logged_in();
        match ctx.session().user_id() {
            Some(user_id) => {
                self.courses.begin(ctx.fetch(Query::Courses));
                self.favorites.begin(ctx.fetch(Query::Favorites { user_id }));
                self.users.begin(ctx.fetch(Query::Users));
            }
            None => {
                self.courses.skip();
                self.favorites.skip();
                self.users.skip();
            }
        }
        self.selected = 0;
    }

    fn active_field(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn submit(&mut self, ctx: &mut Ctx) {
        let email = self.email.trim().to_string();
        match validate_credentials(&email, &self.password) {
            Ok(()) => ctx.login(email, self.password.clone()),
            Err(err) => ctx.alert(Alert::new("Error", err.to_string())),
        }
    }
}

impl View for ProfileScreen {
    fn title(&self) -> String {
        "User Profile".into()
    }

    fn mount(&mut self, ctx: &mut Ctx) {
        self.load(ctx);
    }

    fn handle(&mut self, event: &UiEvent, ctx: &mut Ctx) {
        let logged_in = ctx.session().is_logged_in();
        match event {
            UiEvent::CharInput(c) if !logged_in => self.active_field().push(*c),
            UiEvent::Backspace if !logged_in => {
                self.active_field().pop();
            }
            UiEvent::NextField | UiEvent::NextPane if !logged_in => {
                self.field = match self.field {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            UiEvent::Submit if !logged_in => self.submit(ctx),
            UiEvent::Logout if logged_in => ctx.logout(),
            UiEvent::Refresh if logged_in => self.load(ctx),
            UiEvent::SelectPrev => self.selected = step(self.selected, self.saved_count(), false),
            UiEvent::SelectNext => self.selected = step(self.selected, self.saved_count(), true),
            UiEvent::Activate if logged_in => {
                if let Some(row) = self.saved().into_iter().nth(self.selected) {
                    ctx.push(Screen::Course(CourseDetailScreen::new(row.course.id)));
                }
            }
            UiEvent::ToggleSaved if logged_in => {
                if let Some(row) = self.saved().into_iter().nth(self.selected) {
                    self.bookmarks.toggle(row.course.id);
                }
            }
            _ => {}
        }
    }

    fn owns(&self, id: u64) -> bool {
        self.courses.is_pending(id) || self.favorites.is_pending(id) || self.users.is_pending(id)
    }

    fn receive(&mut self, id: u64, result: Result<Payload, String>, _ctx: &mut Ctx) {
        if self.courses.is_pending(id) {
            self.courses.settle(id, expect(result));
        } else if self.favorites.is_pending(id) {
            self.favorites.settle(id, expect(result));
        } else if self.users.is_pending(id) {
            self.users.settle(id, expect(result));
        }
        self.selected = self.selected.min(self.saved_count().saturating_sub(1));
    }

    fn is_loading(&self) -> bool {
        self.courses.is_loading() || self.favorites.is_loading() || self.users.is_loading()
    }

    /// Only the login form takes text
    fn accepts_input(&self) -> bool {
        !self.logged_in
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        latest([
            self.courses.fetched_at(),
            self.favorites.fetched_at(),
            self.users.fetched_at(),
        ])
    }

    fn session_changed(&mut self, ctx: &mut Ctx) {
        self.password.clear();
        self.field = LoginField::Email;
        self.load(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::screens::fixtures::{self, fetches, id_of, Harness};
    use crate::screens::SessionAction;

    fn favorite(course_id: Id) -> Favorite {
        Favorite {
            user_id: 1,
            course_id,
        }
    }

    #[test]
    fn test_saved_courses_join() {
        let courses = fixtures::courses(5);
        let favs = vec![favorite(4), favorite(2), favorite(42)];
        let saved: Vec<Id> = saved_courses(&courses, &favs).iter().map(|c| c.id).collect();
        assert_eq!(saved, vec![2, 4]);
    }

    #[test]
    fn test_logged_out_mount_fetches_nothing() {
        let mut h = Harness::new();
        let mut screen = ProfileScreen::new();
        let fx = h.run(|ctx| screen.mount(ctx));
        assert!(fx.commands.is_empty());
        assert!(!screen.is_loading());
    }

    #[test]
    fn test_logged_in_fetches_favorites_of_session_user() {
        let mut h = Harness::logged_in(fixtures::user(8, "Oxy", Role::Student));
        let mut screen = ProfileScreen::new();
        let fx = h.run(|ctx| screen.mount(ctx));
        let fav_id = id_of(&fx, &Query::Favorites { user_id: 8 });
        let courses_id = id_of(&fx, &Query::Courses);

        h.run(|ctx| {
            screen.receive(courses_id, Ok(Payload::Courses(fixtures::courses(3))), ctx);
            screen.receive(fav_id, Ok(Payload::Favorites(vec![favorite(3)])), ctx);
        });
        assert_eq!(screen.saved_count(), 1);
        assert_eq!(screen.saved()[0].course.id, 3);
        assert!(!screen.accepts_input());

        let fx = h.run(|ctx| screen.handle(&UiEvent::Logout, ctx));
        assert_eq!(fx.session, Some(SessionAction::Logout));
    }

    #[test]
    fn test_login_form_validation() {
        let mut h = Harness::new();
        let mut screen = ProfileScreen::new();
        let fx = h.run(|ctx| {
            for c in "oxy@".chars() {
                screen.handle(&UiEvent::CharInput(c), ctx);
            }
            screen.handle(&UiEvent::Submit, ctx);
        });
        let alert = fx.alert.unwrap();
        assert_eq!(alert.message, "Email is not valid");
        assert!(fx.session.is_none());
    }

    #[test]
    fn test_login_form_submits() {
        let mut h = Harness::new();
        let mut screen = ProfileScreen::new();
        let fx = h.run(|ctx| {
            for c in "oxy@example.com".chars() {
                screen.handle(&UiEvent::CharInput(c), ctx);
            }
            screen.handle(&UiEvent::NextField, ctx);
            for c in "secret".chars() {
                screen.handle(&UiEvent::CharInput(c), ctx);
            }
            screen.handle(&UiEvent::Submit, ctx);
        });
        assert_eq!(screen.masked_password(), "******");
        assert_eq!(
            fx.session,
            Some(SessionAction::Login {
                email: "oxy@example.com".into(),
                password: "secret".into()
            })
        );
        assert!(fetches(&fx).is_empty());
    }
}
