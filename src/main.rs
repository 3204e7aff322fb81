//! CourseDeck - terminal course browser
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async REST requests

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use coursedeck_tui::app::{AppActor, AppState};
use coursedeck_tui::config::Config;
use coursedeck_tui::constants::{APP_NAME, APP_VERSION, CONFIG_FILE_NAME, DEFAULT_LOG_FILE};
use coursedeck_tui::messages::ui_events::key_to_ui_event;
use coursedeck_tui::messages::{
    AppTab, InputMode, NetworkCommand, NetworkResponse, RenderState, UiEvent,
};
use coursedeck_tui::network::{ApiClient, NetworkActor};
use coursedeck_tui::paging::{ListPhase, PagedList};
use coursedeck_tui::screens::course_detail::{format_duration, DetailTab, LessonRow};
use coursedeck_tui::screens::home::HomeRow;
use coursedeck_tui::screens::profile::LoginField;
use coursedeck_tui::screens::search::SearchRow;
use coursedeck_tui::screens::teacher::{TeacherLookup, TeacherTab};
use coursedeck_tui::screens::{
    CategoryScreen, CourseDetailScreen, CourseRow, FeaturedScreen, HomeScreen, ProfileScreen,
    Screen, SearchScreen, TeacherScreen,
};
use coursedeck_tui::models::{Course, User};
use coursedeck_tui::ui::{
    course_line, format_price, format_rating, placeholder, price_color, render_tabs,
    selectable_list, spinner, updated_label, with_headings,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    // Initialize logging to file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let log_name = config
        .log_file
        .file_name()
        .unwrap_or(OsStr::new(DEFAULT_LOG_FILE));
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(config.tracing_level())
        .init();

    tracing::info!(api_url = %config.api_url, page_limit = config.page_limit, "Starting {} {}", APP_NAME, APP_VERSION);

    let config_path = Config::config_dir().join(CONFIG_FILE_NAME);
    match Config::write_default_if_missing(&config_path) {
        Ok(true) => tracing::info!(path = %config_path.display(), "Wrote default config"),
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(error = %e, path = %config_path.display(), "Could not write default config")
        }
    }

    let client = ApiClient::new(&config).context("building HTTP client")?;

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(AppState::new(&config), net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();
    let mut tick: usize = 0;

    loop {
        terminal.draw(|f| draw_ui(f, &current_state, tick))?;
        tick = tick.wrapping_add(1);

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.input_mode,
                    current_state.show_help,
                    current_state.alert.is_some(),
                ) {
                    let quit = event == UiEvent::Quit;
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState, tick: usize) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_tab_bar(f, state, main_chunks[0]);

    let content = main_chunks[1];
    match &state.screen {
        Screen::Home(s) => draw_home(f, state, s, content),
        Screen::Search(s) => draw_search(f, state, s, content),
        Screen::Featured(s) => draw_featured(f, s, content),
        Screen::Category(s) => draw_category(f, s, content, tick),
        Screen::Teacher(s) => draw_teacher(f, s, content, tick),
        Screen::Course(s) => draw_course(f, s, state.loading, content),
        Screen::Profile(s) => draw_profile(f, state, s, content),
    }

    draw_status_bar(f, state, main_chunks[2], tick);

    // Popups
    if state.show_help {
        draw_help_popup(f, area);
    }
    if let Some(alert) = &state.alert {
        draw_alert_popup(f, &alert.title, &alert.message, area);
    }
}

fn draw_tab_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(40)])
        .split(area);

    f.render_widget(render_tabs(state.active_tab), chunks[0]);

    let crumb = if state.can_go_back() {
        format!("{} ‹ Esc ", state.screen.view().title())
    } else {
        format!("{} ", state.screen.view().title())
    };
    let title = Paragraph::new(crumb)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Right);
    f.render_widget(title, chunks[1]);
}

/// List of rows grouped under headings, with the selection kept in view
fn draw_grouped(
    f: &mut Frame,
    area: Rect,
    title: String,
    headings: &[&str],
    lines: Vec<Line<'static>>,
    selected: usize,
) {
    let (items, positions) = with_headings(headings, lines);
    let mut list_state = ListState::default().with_selected(positions.get(selected).copied());
    f.render_stateful_widget(selectable_list(items, title), area, &mut list_state);
}

fn draw_courses(f: &mut Frame, area: Rect, title: String, rows: &[CourseRow], selected: usize) {
    let items: Vec<ListItem> = rows.iter().map(|r| ListItem::new(course_line(r))).collect();
    let mut list_state = ListState::default().with_selected(if rows.is_empty() {
        None
    } else {
        Some(selected)
    });
    f.render_stateful_widget(selectable_list(items, title), area, &mut list_state);
}

fn draw_home(f: &mut Frame, state: &RenderState, screen: &HomeScreen, area: Rect) {
    let greeting = match &state.user {
        Some(user) => format!(" Hi, {} ", user.full_name),
        None => " Hi there ".to_string(),
    };

    let rows = screen.rows();
    if rows.is_empty() {
        let block = Block::default().borders(Borders::ALL).title(greeting);
        let inner = block.inner(area);
        f.render_widget(block, area);
        let text = if state.loading {
            "Loading..."
        } else {
            "Nothing to show yet. Press r to retry."
        };
        f.render_widget(placeholder(text, Color::DarkGray), inner);
        return;
    }

    let headings: Vec<&str> = rows.iter().map(|r| r.heading()).collect();
    let lines = rows
        .iter()
        .map(|row| match row {
            HomeRow::Category(c) => Line::from(format!("  {}", c.name)),
            HomeRow::ToggleCategories { expanded } => Line::from(Span::styled(
                if *expanded { "  Show less" } else { "  Show more" },
                Style::default().fg(Color::Cyan),
            )),
            HomeRow::Course { row, .. } => course_line(row),
            HomeRow::ViewMore(_) => view_more_line(),
            HomeRow::Teacher(user) => Line::from(Span::styled(
                format!("  {}", user.full_name),
                Style::default().fg(Color::Magenta),
            )),
        })
        .collect();
    draw_grouped(f, area, greeting, &headings, lines, screen.selected());
}

fn view_more_line() -> Line<'static> {
    Line::from(Span::styled(
        "  View more →",
        Style::default().fg(Color::Cyan).italic(),
    ))
}

fn draw_search(f: &mut Frame, state: &RenderState, screen: &SearchScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let editing = state.input_mode == InputMode::Editing;
    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if screen.query().is_empty() && !editing {
        Span::styled("Press / to search courses", Style::default().fg(Color::DarkGray))
    } else if editing {
        Span::raw(format!("{}▏", screen.query()))
    } else {
        Span::raw(screen.query().to_string())
    };
    let search_box = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search ")
            .title_bottom(
                Line::from(format!(" f: price {} ", screen.price().label())).right_aligned(),
            ),
    );
    f.render_widget(search_box, chunks[0]);

    if screen.is_searching() {
        let results = screen.results();
        if results.is_empty() {
            let block = Block::default().borders(Borders::ALL).title(" Results ");
            let inner = block.inner(chunks[1]);
            f.render_widget(block, chunks[1]);
            f.render_widget(
                placeholder("No matching courses", Color::DarkGray),
                inner,
            );
        } else {
            let title = format!(" {} results found ", results.len());
            draw_courses(f, chunks[1], title, &results, screen.selected());
        }
        return;
    }

    let rows = screen.rows();
    if rows.is_empty() {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(chunks[1]);
        f.render_widget(block, chunks[1]);
        let text = if state.loading { "Loading..." } else { "" };
        f.render_widget(placeholder(text, Color::DarkGray), inner);
        return;
    }
    let headings: Vec<&str> = rows.iter().map(|r| r.heading()).collect();
    let lines = rows
        .iter()
        .map(|row| match row {
            SearchRow::Topic(topic) => Line::from(Span::styled(
                format!("  # {}", topic),
                Style::default().fg(Color::LightBlue),
            )),
            SearchRow::Category(c) => Line::from(format!("  {}", c.name)),
            SearchRow::Course(row) => course_line(row),
            SearchRow::ViewMore(_) => view_more_line(),
        })
        .collect();
    draw_grouped(f, chunks[1], " Discover ".into(), &headings, lines, screen.selected());
}

fn draw_featured(f: &mut Frame, screen: &FeaturedScreen, area: Rect) {
    let title = format!(" {} [{}] ", screen.list().title(), screen.count());
    if let Some(error) = screen.error() {
        draw_message(f, area, title, error, Color::Red);
    } else if screen.is_empty() {
        draw_message(f, area, title, "No courses in this list yet", Color::DarkGray);
    } else if screen.rows().is_empty() {
        draw_message(f, area, title, "Loading...", Color::DarkGray);
    } else {
        draw_courses(f, area, title, &screen.rows(), screen.selected());
    }
}

fn draw_message(f: &mut Frame, area: Rect, title: String, text: &str, color: Color) {
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(placeholder(text, color), inner);
}

/// Paged list with its loading footer
#[allow(clippy::too_many_arguments)]
fn draw_feed(
    f: &mut Frame,
    area: Rect,
    title: String,
    list: &PagedList<Course>,
    rows: &[CourseRow],
    selected: usize,
    empty_text: &str,
    tick: usize,
) {
    match list.phase() {
        ListPhase::Loading => draw_message(f, area, title, "Loading courses...", Color::DarkGray),
        ListPhase::Empty => draw_message(f, area, title, empty_text, Color::DarkGray),
        ListPhase::Ready => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            let title = format!("{}({}/{}) ", title, list.items().len(), list.total());
            draw_courses(f, chunks[0], title, rows, selected);

            let footer = if list.is_loading_more() || list.is_refreshing() {
                Span::styled(
                    format!(" {} Loading more...", spinner(tick)),
                    Style::default().fg(Color::Yellow),
                )
            } else if list.can_load_more() {
                Span::styled(" n: load more", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(" End of list", Style::default().fg(Color::DarkGray))
            };
            f.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);
        }
    }
}

fn draw_category(f: &mut Frame, screen: &CategoryScreen, area: Rect, tick: usize) {
    let title = format!(" {} ", screen.category().name);
    draw_feed(
        f,
        area,
        title,
        screen.list(),
        &screen.rows(),
        screen.selected(),
        "No courses in this category",
        tick,
    );
}

fn draw_teacher(f: &mut Frame, screen: &TeacherScreen, area: Rect, tick: usize) {
    let teacher = match screen.teacher() {
        TeacherLookup::Loading => {
            draw_message(f, area, " Teacher ".into(), "Loading...", Color::DarkGray);
            return;
        }
        TeacherLookup::NotFound => {
            draw_message(f, area, " Teacher ".into(), "Teacher not found", Color::Red);
            return;
        }
        TeacherLookup::Found(user) => user,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    f.render_widget(user_card(teacher), chunks[0]);

    let titles = [TeacherTab::Overview, TeacherTab::Courses].map(|t| Line::from(t.title()));
    let index = match screen.tab() {
        TeacherTab::Overview => 0,
        TeacherTab::Courses => 1,
    };
    let tabs = Tabs::new(titles.to_vec())
        .select(index)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|");
    f.render_widget(tabs, chunks[1]);

    match screen.tab() {
        TeacherTab::Overview => {
            if screen.list().phase() == ListPhase::Ready {
                draw_courses(
                    f,
                    chunks[2],
                    " Latest courses ".into(),
                    &screen.rows(),
                    screen.selected(),
                );
            } else {
                draw_feed(
                    f,
                    chunks[2],
                    " Latest courses ".into(),
                    screen.list(),
                    &[],
                    0,
                    "No courses yet",
                    tick,
                );
            }
        }
        TeacherTab::Courses => draw_feed(
            f,
            chunks[2],
            " Courses ".into(),
            screen.list(),
            &screen.rows(),
            screen.selected(),
            "No courses yet",
            tick,
        ),
    }
}

fn user_card(user: &User) -> Paragraph<'static> {
    let mut spans = vec![
        Span::styled(user.full_name.clone(), Style::default().bold()),
        Span::styled(
            format!("  {}", user.role.as_str()),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if let Some(email) = &user.email {
        spans.push(Span::styled(
            format!("  {}", email),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL))
}

fn draw_course(f: &mut Frame, screen: &CourseDetailScreen, loading: bool, area: Rect) {
    if let Some(error) = screen.error() {
        draw_message(f, area, " Course ".into(), error, Color::Red);
        return;
    }
    let Some(course) = screen.course() else {
        let text = if loading { "Loading course..." } else { "Course not found" };
        draw_message(f, area, " Course ".into(), text, Color::DarkGray);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let saved = if screen.is_saved() { "♥ saved" } else { "♡ s: save" };
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(course.title.clone(), Style::default().bold()),
            Span::styled(format!("  {}", saved), Style::default().fg(Color::Red)),
        ]),
        Line::from(vec![
            Span::styled(screen.teacher(), Style::default().fg(Color::Magenta)),
            Span::styled(
                format!("  {}", format_price(course.price)),
                Style::default().fg(price_color(course.price)),
            ),
            Span::styled(
                format!("  {}", format_rating(course.rating_avg, course.rating_count)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let titles: Vec<Line> = DetailTab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(screen.tab().index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|");
    f.render_widget(tabs, chunks[1]);

    match screen.tab() {
        DetailTab::Overview => {
            let groups = screen.groups();
            let lesson_total: usize = groups.iter().map(|g| g.lessons.len()).sum();
            let minutes: f64 = groups
                .iter()
                .flat_map(|g| g.lessons.iter())
                .map(|l| l.duration_mins)
                .sum();
            let lines = vec![
                Line::from(format!("Sections: {}", groups.len())),
                Line::from(format!(
                    "Lessons: {} ({} listed)",
                    course.lesson_count, lesson_total
                )),
                Line::from(format!("Total length: {}", format_duration(minutes))),
                Line::from(format!("Reviews: {}", screen.review_rows().len())),
            ];
            let body = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Overview "))
                .wrap(Wrap { trim: false });
            f.render_widget(body, chunks[2]);
        }
        DetailTab::Lessons => {
            let rows = screen.lesson_rows();
            if rows.is_empty() {
                draw_message(f, chunks[2], " Lessons ".into(), "No lessons yet", Color::DarkGray);
                return;
            }
            let items: Vec<ListItem> = rows
                .iter()
                .map(|row| match row {
                    LessonRow::Section {
                        title,
                        open,
                        lesson_count,
                        ..
                    } => ListItem::new(Line::from(vec![
                        Span::raw(if *open { "▾ " } else { "▸ " }),
                        Span::styled(title.clone(), Style::default().fg(Color::Cyan).bold()),
                        Span::styled(
                            format!("  {} lessons", lesson_count),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])),
                    LessonRow::Lesson { number, lesson } => {
                        let marker = if lesson.is_free {
                            Span::styled("  free", Style::default().fg(Color::Green))
                        } else {
                            Span::styled("  locked", Style::default().fg(Color::DarkGray))
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(
                                format!("    {} ", number),
                                Style::default().fg(Color::Yellow),
                            ),
                            Span::raw(lesson.title.clone()),
                            Span::styled(
                                format!("  {}", format_duration(lesson.duration_mins)),
                                Style::default().fg(Color::Gray),
                            ),
                            marker,
                        ]))
                    }
                })
                .collect();
            let mut list_state = ListState::default().with_selected(Some(screen.selected()));
            f.render_stateful_widget(
                selectable_list(items, " Lessons ".into()),
                chunks[2],
                &mut list_state,
            );
        }
        DetailTab::Reviews => {
            let rows = screen.review_rows();
            if rows.is_empty() {
                draw_message(f, chunks[2], " Reviews ".into(), "No reviews yet", Color::DarkGray);
                return;
            }
            let items: Vec<ListItem> = rows
                .iter()
                .map(|r| {
                    let mut lines = vec![Line::from(vec![
                        Span::styled(r.reviewer.clone(), Style::default().bold()),
                        Span::styled(
                            format!("  ★ {:.1}", r.rating),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::styled(
                            r.created_at
                                .as_deref()
                                .map(|d| format!("  {}", d))
                                .unwrap_or_default(),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])];
                    if !r.comment.is_empty() {
                        lines.push(Line::from(format!("  {}", r.comment)));
                    }
                    ListItem::new(lines)
                })
                .collect();
            let mut list_state = ListState::default().with_selected(Some(screen.selected()));
            f.render_stateful_widget(
                selectable_list(items, format!(" Reviews ({}) ", rows.len())),
                chunks[2],
                &mut list_state,
            );
        }
    }
}

fn draw_profile(f: &mut Frame, state: &RenderState, screen: &ProfileScreen, area: Rect) {
    match &state.user {
        Some(user) => draw_saved_courses(f, user, screen, area),
        None if state.session_loading => {
            draw_message(f, area, " Profile ".into(), "Restoring session...", Color::DarkGray)
        }
        None => draw_login_form(f, state, screen, area),
    }
}

fn draw_saved_courses(f: &mut Frame, user: &User, screen: &ProfileScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);
    f.render_widget(user_card(user), chunks[0]);

    let title = format!(" Saved courses ({}) · o: logout ", screen.saved_count());
    if let Some(error) = screen.error() {
        draw_message(f, chunks[1], title, error, Color::Red);
    } else if screen.saved_count() == 0 {
        draw_message(f, chunks[1], title, "No saved courses yet", Color::DarkGray);
    } else {
        draw_courses(f, chunks[1], title, &screen.saved(), screen.selected());
    }
}

fn draw_login_form(f: &mut Frame, state: &RenderState, screen: &ProfileScreen, area: Rect) {
    let form_area = centered_rect(60, 50, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(form_area);

    let heading = Paragraph::new(Line::from(Span::styled(
        "Log in to see your saved courses",
        Style::default().bold(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[0]);

    let editing = state.input_mode == InputMode::Editing;
    let field = |label: &'static str, value: String, active: bool| {
        let style = if active && editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value = if active && editing {
            format!("{}▏", value)
        } else {
            value
        };
        Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(style)
                .title(label),
        )
    };
    f.render_widget(
        field(" Email ", screen.email().to_string(), screen.field() == LoginField::Email),
        chunks[1],
    );
    f.render_widget(
        field(
            " Password ",
            screen.masked_password(),
            screen.field() == LoginField::Password,
        ),
        chunks[2],
    );

    let hint = if editing {
        "Tab: next field · Enter: log in · Esc: stop editing"
    } else {
        "Press e to fill in the form"
    };
    f.render_widget(placeholder(hint, Color::DarkGray), chunks[3]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect, tick: usize) {
    let status = if state.loading {
        format!(" {} Loading... ", spinner(tick))
    } else if state.input_mode == InputMode::Editing {
        " Esc:stop editing | Tab:next field | Enter:submit ".to_string()
    } else {
        let back = if state.can_go_back() { "Esc:back | " } else { "" };
        let extra = match state.active_tab {
            AppTab::Search => "/:search | f:price | ",
            AppTab::Profile if state.user.is_some() => "o:logout | ",
            AppTab::Profile => "e:log in | ",
            AppTab::Home => "",
        };
        format!(
            " {}{}Enter:open | r:refresh | s:save | ?:help | q:quit ",
            back, extra
        )
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(48)])
        .split(area);
    f.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        chunks[0],
    );
    let server = match state.updated_at {
        Some(at) => format!("{} | {} ", updated_label(&at.with_timezone(&Local)), state.api_url),
        None => format!("{} ", state.api_url),
    };
    f.render_widget(
        Paragraph::new(server)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 COURSEDECK - Keyboard Shortcuts

 NAVIGATION
   1 / 2 / 3          Home / Search / Profile
   ↑ / ↓  k / j       Move selection
   Enter              Open / toggle section
   Esc                Back
   Tab                Switch tab inside a screen

 LISTS
   r                  Refresh
   n / PageDown       Load more
   s                  Toggle saved

 SEARCH & PROFILE
   / or e             Edit search box / login form
   f                  Cycle price filter
   o                  Log out

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_alert_popup(f: &mut Frame, title: &str, message: &str, area: Rect) {
    let popup_area = centered_rect(50, 25, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!(" {} ", title))
        .title_bottom(Line::from(" press any key ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let body = Paragraph::new(message.to_string())
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(body, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
