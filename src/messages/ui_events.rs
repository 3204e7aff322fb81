//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Bottom tabs, each with its own navigation stack
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AppTab {
    #[default]
    Home,
    Search,
    Profile,
}

impl AppTab {
    pub const ALL: [AppTab; 3] = [AppTab::Home, AppTab::Search, AppTab::Profile];

    pub fn index(&self) -> usize {
        match self {
            AppTab::Home => 0,
            AppTab::Search => 1,
            AppTab::Profile => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppTab::Home => "Home",
            AppTab::Search => "Search",
            AppTab::Profile => "Profile",
        }
    }
}

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Navigation
    SwitchTab(AppTab),
    Back,
    SelectPrev,
    SelectNext,
    Activate,
    NextPane,

    // Lists
    Refresh,
    LoadMore,
    ToggleSaved,
    CyclePriceFilter,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    NextField,
    Submit,

    // Session
    Logout,

    // Popups
    ToggleHelp,
    CloseHelp,
    DismissAlert,

    // System
    Quit,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    input_mode: InputMode,
    show_help: bool,
    alert_visible: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Popups swallow every key
    if alert_visible {
        return Some(UiEvent::DismissAlert);
    }
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => normal_keys(key),
        InputMode::Editing => editing_keys(key),
    }
}

fn normal_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('1') => Some(UiEvent::SwitchTab(AppTab::Home)),
        KeyCode::Char('2') => Some(UiEvent::SwitchTab(AppTab::Search)),
        KeyCode::Char('3') => Some(UiEvent::SwitchTab(AppTab::Profile)),
        KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::SelectPrev),
        KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::SelectNext),
        KeyCode::Enter => Some(UiEvent::Activate),
        KeyCode::Esc => Some(UiEvent::Back),
        KeyCode::Tab => Some(UiEvent::NextPane),
        KeyCode::Char('r') => Some(UiEvent::Refresh),
        KeyCode::Char('n') | KeyCode::PageDown => Some(UiEvent::LoadMore),
        KeyCode::Char('s') => Some(UiEvent::ToggleSaved),
        KeyCode::Char('/') | KeyCode::Char('e') => Some(UiEvent::StartEditing),
        KeyCode::Char('f') => Some(UiEvent::CyclePriceFilter),
        KeyCode::Char('o') => Some(UiEvent::Logout),
        _ => None,
    }
}

fn editing_keys(key: KeyEvent) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Enter => Some(UiEvent::Submit),
        KeyCode::Tab => Some(UiEvent::NextField),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        _ => None,
    }
}
