//! Render state - snapshot sent from the App layer to the UI for drawing

use chrono::{DateTime, Utc};

use crate::messages::ui_events::{AppTab, InputMode};
use crate::models::User;
use crate::screens::{Alert, HomeScreen, Screen};

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone)]
pub struct RenderState {
    pub active_tab: AppTab,

    /// Top of the active tab's stack
    pub screen: Screen,
    /// Screens on the active stack, root included
    pub depth: usize,

    // Session
    pub user: Option<User>,
    pub session_loading: bool,

    pub input_mode: InputMode,
    pub loading: bool,
    /// When the current screen's data last arrived
    pub updated_at: Option<DateTime<Utc>>,

    // Popups
    pub alert: Option<Alert>,
    pub show_help: bool,

    pub api_url: String,
}

impl Default for RenderState {
    fn default() -> Self {
        use crate::constants::DEFAULT_API_URL;
        RenderState {
            active_tab: AppTab::Home,
            screen: Screen::Home(HomeScreen::new()),
            depth: 1,
            user: None,
            session_loading: true,
            input_mode: InputMode::Normal,
            loading: false,
            updated_at: None,
            alert: None,
            show_help: false,
            api_url: String::from(DEFAULT_API_URL),
        }
    }
}

impl RenderState {
    /// Whether Back has somewhere to go
    pub fn can_go_back(&self) -> bool {
        self.depth > 1
    }
}
