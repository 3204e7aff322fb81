//! App state - pure data structure with no I/O logic
//!
//! Owns the navigation stacks, the session and the popups. Events and
//! responses go in; network commands come out.

use crate::app::navigator::Navigator;
use crate::config::Config;
use crate::messages::network::expect;
use crate::messages::{
    InputMode, NetworkCommand, NetworkResponse, Payload, Query, RenderState, RequestIds, UiEvent,
};
use crate::models::User;
use crate::screens::{
    Alert, Ctx, Effects, HomeScreen, ProfileScreen, Screen, SearchScreen, SessionAction,
};
use crate::session::{Session, SessionOutcome, SessionRequest};

pub struct AppState {
    nav: Navigator,
    session: Session,
    ids: RequestIds,

    pub input_mode: InputMode,
    pub alert: Option<Alert>,
    pub show_help: bool,

    page_limit: u32,
    api_url: String,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            nav: Navigator::new(
                Screen::Home(HomeScreen::new()),
                Screen::Search(SearchScreen::new()),
                Screen::Profile(ProfileScreen::new()),
            ),
            session: Session::new(),
            ids: RequestIds::default(),
            input_mode: InputMode::Normal,
            alert: None,
            show_help: false,
            page_limit: config.page_limit,
            api_url: config.api_url.clone(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Restore the session and mount every tab root
    pub fn start(&mut self) -> Vec<NetworkCommand> {
        let id = self.ids.next_id();
        self.session.begin(id, SessionRequest::Restore);
        let mut commands = vec![NetworkCommand::Fetch {
            id,
            query: Query::CurrentUser,
        }];

        let mut pending = Vec::new();
        for screen in self.nav.screens_mut() {
            let mut ctx = Ctx::new(&mut self.ids, &self.session, self.page_limit);
            screen.view_mut().mount(&mut ctx);
            pending.push(ctx.into_effects());
        }
        for effects in pending {
            commands.extend(self.apply(effects));
        }
        commands
    }

    /// Apply a UI event. Quit is handled by the actor.
    pub fn handle_event(&mut self, event: UiEvent) -> Vec<NetworkCommand> {
        match event {
            UiEvent::Quit => Vec::new(),
            UiEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                Vec::new()
            }
            UiEvent::CloseHelp => {
                self.show_help = false;
                Vec::new()
            }
            UiEvent::DismissAlert => {
                self.alert = None;
                Vec::new()
            }
            UiEvent::SwitchTab(tab) => {
                self.input_mode = InputMode::Normal;
                self.nav.switch(tab);
                Vec::new()
            }
            UiEvent::StartEditing => {
                if self.nav.current().view().accepts_input() {
                    self.input_mode = InputMode::Editing;
                }
                Vec::new()
            }
            UiEvent::StopEditing => {
                self.input_mode = InputMode::Normal;
                Vec::new()
            }
            UiEvent::Back => {
                self.input_mode = InputMode::Normal;
                if self.nav.pop() {
                    Vec::new()
                } else {
                    self.dispatch(&UiEvent::Back)
                }
            }
            UiEvent::Submit => {
                self.input_mode = InputMode::Normal;
                self.dispatch(&UiEvent::Submit)
            }
            other => self.dispatch(&other),
        }
    }

    /// Route a network response to whoever is waiting on it
    pub fn handle_response(&mut self, response: NetworkResponse) -> Vec<NetworkCommand> {
        let (id, result) = response.into_result();
        if self.session.is_pending(id) {
            return self.settle_session(id, result);
        }

        let mut ctx = Ctx::new(&mut self.ids, &self.session, self.page_limit);
        match self.nav.owner_mut(id) {
            Some(screen) => screen.view_mut().receive(id, result, &mut ctx),
            None => {
                tracing::debug!(id, "Dropping response nobody is waiting for");
                return Vec::new();
            }
        }
        let effects = ctx.into_effects();
        self.apply(effects)
    }

    /// Send an event to the screen on top of the active stack
    fn dispatch(&mut self, event: &UiEvent) -> Vec<NetworkCommand> {
        let mut ctx = Ctx::new(&mut self.ids, &self.session, self.page_limit);
        self.nav.current_mut().view_mut().handle(event, &mut ctx);
        let effects = ctx.into_effects();
        self.apply(effects)
    }

    fn apply(&mut self, effects: Effects) -> Vec<NetworkCommand> {
        let Effects {
            mut commands,
            push,
            alert,
            session,
        } = effects;

        if let Some(alert) = alert {
            self.raise(alert);
        }
        if let Some(mut screen) = push {
            tracing::debug!(screen = %screen.view().title(), "Opening screen");
            let mut ctx = Ctx::new(&mut self.ids, &self.session, self.page_limit);
            screen.view_mut().mount(&mut ctx);
            let mounted = ctx.into_effects();
            self.input_mode = InputMode::Normal;
            self.nav.push(screen);
            commands.extend(self.apply(mounted));
        }
        if let Some(action) = session {
            commands.extend(self.apply_session(action));
        }
        commands
    }

    fn apply_session(&mut self, action: SessionAction) -> Vec<NetworkCommand> {
        match action {
            SessionAction::Login { email, password } => {
                let id = self.ids.next_id();
                self.session.begin(id, SessionRequest::Login);
                vec![NetworkCommand::Fetch {
                    id,
                    query: Query::Login { email, password },
                }]
            }
            SessionAction::Logout => {
                tracing::info!("Logging out");
                self.session.clear();
                let id = self.ids.next_id();
                self.session.begin(id, SessionRequest::Logout);
                let mut commands = vec![NetworkCommand::Fetch {
                    id,
                    query: Query::Logout,
                }];
                commands.extend(self.notify_session_changed());
                commands
            }
        }
    }

    fn settle_session(&mut self, id: u64, result: Result<Payload, String>) -> Vec<NetworkCommand> {
        let result = match result {
            Ok(Payload::LoggedOut) => Ok(None),
            other => expect::<Option<User>>(other),
        };
        match self.session.settle(id, result) {
            SessionOutcome::LoggedIn | SessionOutcome::LoggedOut => self.notify_session_changed(),
            SessionOutcome::LoginRejected(message) => {
                self.raise(Alert::new("Login failed", message));
                Vec::new()
            }
            SessionOutcome::Stale | SessionOutcome::Unchanged => Vec::new(),
        }
    }

    fn notify_session_changed(&mut self) -> Vec<NetworkCommand> {
        let mut pending = Vec::new();
        for screen in self.nav.screens_mut() {
            let mut ctx = Ctx::new(&mut self.ids, &self.session, self.page_limit);
            screen.view_mut().session_changed(&mut ctx);
            pending.push(ctx.into_effects());
        }
        pending
            .into_iter()
            .flat_map(|effects| self.apply(effects))
            .collect()
    }

    /// Show `alert` unless one is already up
    fn raise(&mut self, alert: Alert) {
        if self.alert.is_none() {
            tracing::debug!(title = %alert.title, message = %alert.message, "Alert");
            self.alert = Some(alert);
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let screen = self.nav.current();
        RenderState {
            active_tab: self.nav.active(),
            screen: screen.clone(),
            depth: self.nav.depth(),
            user: self.session.user().cloned(),
            session_loading: self.session.is_loading(),
            input_mode: self.input_mode,
            loading: screen.view().is_loading(),
            updated_at: screen.view().updated_at(),
            alert: self.alert.clone(),
            show_help: self.show_help,
            api_url: self.api_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::AppTab;
    use crate::models::{Category, Favorite, Role};

    fn state() -> AppState {
        AppState::new(&Config::default())
    }

    fn fetched(commands: &[NetworkCommand]) -> Vec<(u64, Query)> {
        commands
            .iter()
            .filter_map(|c| match c {
                NetworkCommand::Fetch { id, query } => Some((*id, query.clone())),
                NetworkCommand::Shutdown => None,
            })
            .collect()
    }

    fn id_for(commands: &[NetworkCommand], query: &Query) -> u64 {
        fetched(commands)
            .into_iter()
            .find(|(_, q)| q == query)
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("no fetch for {:?}", query))
    }

    fn loaded(id: u64, payload: Payload) -> NetworkResponse {
        NetworkResponse::Loaded {
            id,
            payload,
            time_ms: 1,
        }
    }

    fn student() -> User {
        User {
            id: 7,
            full_name: "Oxy".into(),
            role: Role::Student,
            avatar_url: String::new(),
            username: None,
            email: Some("oxy@example.com".into()),
        }
    }

    fn logged_in() -> AppState {
        let mut app = state();
        let commands = app.start();
        let me = id_for(&commands, &Query::CurrentUser);
        app.handle_response(loaded(me, Payload::Session(Some(student()))));
        app
    }

    #[test]
    fn test_start_restores_session_and_mounts_roots() {
        let mut app = state();
        let commands = app.start();
        let queries: Vec<Query> = fetched(&commands).into_iter().map(|(_, q)| q).collect();

        assert_eq!(queries[0], Query::CurrentUser);
        assert!(queries.contains(&Query::Categories));
        assert!(queries.contains(&Query::Featured(crate::models::FeaturedList::Recommended)));
        assert!(!queries.iter().any(|q| matches!(q, Query::Favorites { .. })));
        assert!(app.session().is_loading());
    }

    #[test]
    fn test_restored_session_loads_favorites() {
        let mut app = state();
        let commands = app.start();
        let me = id_for(&commands, &Query::CurrentUser);

        let commands = app.handle_response(loaded(me, Payload::Session(Some(student()))));
        assert!(app.session().is_logged_in());
        let fav = id_for(&commands, &Query::Favorites { user_id: 7 });

        let favorites = vec![Favorite {
            user_id: 7,
            course_id: 1,
        }];
        app.handle_response(loaded(fav, Payload::Favorites(favorites)));
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_back_never_leaves_tab_root() {
        let mut app = state();
        app.start();
        app.handle_event(UiEvent::Back);
        app.handle_event(UiEvent::Back);
        assert_eq!(app.to_render_state().depth, 1);
        assert!(matches!(app.to_render_state().screen, Screen::Home(_)));
    }

    #[test]
    fn test_opening_a_category_pushes_and_mounts() {
        let mut app = state();
        let commands = app.start();
        let categories = fetched(&commands)
            .into_iter()
            .find(|(_, q)| *q == Query::Categories)
            .map(|(id, _)| id)
            .unwrap();
        let list = vec![Category {
            id: 3,
            name: "Design".into(),
            icon_name: String::new(),
            image_url: String::new(),
        }];
        app.handle_response(loaded(categories, Payload::Categories(list)));

        let commands = app.handle_event(UiEvent::Activate);
        let (_, query) = &fetched(&commands)[0];
        assert!(matches!(
            query,
            Query::CoursePage {
                page: 1,
                limit: 6,
                ..
            }
        ));
        let render = app.to_render_state();
        assert_eq!(render.depth, 2);
        assert!(render.can_go_back());

        app.handle_event(UiEvent::Back);
        assert_eq!(app.to_render_state().depth, 1);
    }

    #[test]
    fn test_search_editing_and_clear() {
        let mut app = state();
        app.start();
        app.handle_event(UiEvent::SwitchTab(AppTab::Search));
        app.handle_event(UiEvent::StartEditing);
        assert_eq!(app.input_mode, InputMode::Editing);

        app.handle_event(UiEvent::CharInput('s'));
        app.handle_event(UiEvent::StopEditing);
        match &app.to_render_state().screen {
            Screen::Search(search) => assert_eq!(search.query(), "s"),
            other => panic!("unexpected screen {:?}", other.view().title()),
        }

        app.handle_event(UiEvent::Back);
        match &app.to_render_state().screen {
            Screen::Search(search) => assert_eq!(search.query(), ""),
            other => panic!("unexpected screen {:?}", other.view().title()),
        }
    }

    #[test]
    fn test_home_cannot_start_editing() {
        let mut app = state();
        app.start();
        app.handle_event(UiEvent::StartEditing);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_rejected_login_raises_alert() {
        let mut app = state();
        let commands = app.start();
        let me = id_for(&commands, &Query::CurrentUser);
        app.handle_response(loaded(me, Payload::Session(None)));

        app.handle_event(UiEvent::SwitchTab(AppTab::Profile));
        app.handle_event(UiEvent::StartEditing);
        for c in "oxy@example.com".chars() {
            app.handle_event(UiEvent::CharInput(c));
        }
        app.handle_event(UiEvent::NextField);
        for c in "wrong".chars() {
            app.handle_event(UiEvent::CharInput(c));
        }
        let commands = app.handle_event(UiEvent::Submit);
        assert_eq!(app.input_mode, InputMode::Normal);
        let (login, query) = fetched(&commands).remove(0);
        assert!(matches!(query, Query::Login { .. }));

        app.handle_response(loaded(login, Payload::Session(None)));
        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.title, "Login failed");
        assert_eq!(alert.message, "Email or password is incorrect");

        app.handle_event(UiEvent::DismissAlert);
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_logout_clears_session_immediately() {
        let mut app = logged_in();
        app.handle_event(UiEvent::SwitchTab(AppTab::Profile));

        let commands = app.handle_event(UiEvent::Logout);
        assert!(fetched(&commands).iter().any(|(_, q)| *q == Query::Logout));
        assert!(!app.session().is_logged_in());
        assert!(app.to_render_state().user.is_none());

        let logout = id_for(&commands, &Query::Logout);
        let commands = app.handle_response(NetworkResponse::Failed {
            id: logout,
            message: "500".into(),
            time_ms: 1,
        });
        assert!(commands.is_empty());
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_home_failure_raises_connection_alert() {
        let mut app = state();
        let commands = app.start();
        let categories = fetched(&commands)
            .into_iter()
            .find(|(_, q)| *q == Query::Categories)
            .map(|(id, _)| id)
            .unwrap();
        app.handle_response(NetworkResponse::Failed {
            id: categories,
            message: "Connection failed".into(),
            time_ms: 3,
        });
        let alert = app.alert.clone().unwrap();
        assert_eq!(alert.title, "Connection error");
        assert!(alert.message.contains("Connection failed"));
    }

    #[test]
    fn test_render_state_carries_update_time() {
        let mut app = state();
        let commands = app.start();
        assert!(app.to_render_state().updated_at.is_none());

        let categories = id_for(&commands, &Query::Categories);
        app.handle_response(loaded(categories, Payload::Categories(Vec::new())));
        let render = app.to_render_state();
        assert_eq!(render.active_tab, AppTab::Home);
        assert!(render.updated_at.is_some());
    }

    #[test]
    fn test_unknown_response_is_dropped() {
        let mut app = state();
        app.start();
        let commands = app.handle_response(loaded(999, Payload::Users(Vec::new())));
        assert!(commands.is_empty());
        assert!(app.alert.is_none());
    }

    #[test]
    fn test_help_toggle() {
        let mut app = state();
        app.handle_event(UiEvent::ToggleHelp);
        assert!(app.to_render_state().show_help);
        app.handle_event(UiEvent::CloseHelp);
        assert!(!app.to_render_state().show_help);
    }
}
