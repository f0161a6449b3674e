use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use rand::Rng;
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::campus::{AdminStats, Analytics, CampusClient, StatusReply};
use crate::config::Config;
use crate::history::{ConversationEntry, ConversationStore, Role};
use crate::responses::{special_reply, APOLOGY, LOADING_PHRASES, SUGGESTED_QUESTIONS};
use crate::theme::Theme;

/// Pause before a canned website answer appears, so it still reads as
/// "thinking" rather than an instant echo.
const SPECIAL_REPLY_DELAY: Duration = Duration::from_millis(600);

/// Simulated thinking time (ms) added before every backend call.
const THINKING_DELAY_MS: std::ops::Range<u64> = 300..800;

/// How long a notification stays on screen.
const NOTICE_TTL: Duration = Duration::from_millis(4000);

/// How often the input placeholder cycles to the next suggestion.
const PLACEHOLDER_INTERVAL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Warning,
}

/// Transient status message, replaced by the next one and dropped after
/// a fixed display time.
#[derive(Debug)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    raised_at: Instant,
}

impl Notice {
    fn new(kind: NoticeKind, text: String) -> Self {
        Self {
            kind,
            text,
            raised_at: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.raised_at.elapsed() >= NOTICE_TTL
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminView {
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminTab {
    Manage,
    Analytics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionField {
    Category,
    Patterns,
    Answer,
}

/// Everything behind the admin screen: which view is showing, the form
/// contents, and the last numbers fetched from the backend.
pub struct AdminState {
    pub view: AdminView,
    pub tab: AdminTab,
    pub login_focus: LoginField,
    pub username: String,
    pub password: String,
    pub form_focus: QuestionField,
    pub category: String,
    pub patterns: String,
    pub answer: String,
    pub stats: Option<AdminStats>,
    pub analytics: Option<Analytics>,
}

impl AdminState {
    fn new() -> Self {
        Self {
            view: AdminView::Login,
            tab: AdminTab::Manage,
            login_focus: LoginField::Username,
            username: String::new(),
            password: String::new(),
            form_focus: QuestionField::Category,
            category: "admissions".to_string(),
            patterns: String::new(),
            answer: String::new(),
            stats: None,
            analytics: None,
        }
    }
}

/// Result of one background admin call, applied to state when the task
/// is reaped from the event loop.
#[derive(Debug)]
pub enum AdminOutcome {
    AuthChecked(Result<bool>),
    LoginDone(Result<StatusReply>),
    LogoutDone(Result<StatusReply>),
    StatsLoaded(Result<AdminStats>),
    QuestionAdded(Result<StatusReply>),
    AnalyticsLoaded(Result<Analytics>),
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,

    // Chat input
    pub chat_input: String,
    pub chat_cursor: usize, // cursor position in chat_input
    pub placeholder_idx: usize,
    placeholder_rotated: Instant,

    // Transcript state
    pub store: ConversationStore,
    pub transcript_from: usize, // store index where this session's messages start
    pub started_at: DateTime<Local>,
    pub transcript_scroll: u16,
    pub transcript_height: u16, // viewport size for scroll calculations
    pub transcript_width: u16,
    pub total_transcript_lines: u16,
    pub pinned_to_bottom: bool,

    // Pending reply
    pub pending_phrase: Option<&'static str>,
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub reply_task: Option<JoinHandle<Result<String>>>,

    // Quick-question picker
    pub show_quick_questions: bool,
    pub quick_state: ListState,

    // Clear confirmation
    pub confirm_clear: bool,

    // Notification
    pub notice: Option<Notice>,

    // Admin state
    pub admin: AdminState,
    pub admin_tasks: Vec<JoinHandle<AdminOutcome>>,

    // Backend
    pub client: CampusClient,

    // Settings file, written on theme changes
    pub config_path: PathBuf,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, store: ConversationStore) -> Result<Self> {
        let client = CampusClient::new(&config.server_url())?;

        Ok(Self {
            should_quit: false,
            screen: Screen::Chat,
            input_mode: InputMode::Editing,
            theme: config.theme(),

            chat_input: String::new(),
            chat_cursor: 0,
            placeholder_idx: 0,
            placeholder_rotated: Instant::now(),

            transcript_from: store.len(),
            store,
            started_at: Local::now(),
            transcript_scroll: 0,
            transcript_height: 0,
            transcript_width: 0,
            total_transcript_lines: 0,
            pinned_to_bottom: true,

            pending_phrase: None,
            animation_frame: 0,
            reply_task: None,

            show_quick_questions: false,
            quick_state: ListState::default(),

            confirm_clear: false,

            notice: None,

            admin: AdminState::new(),
            admin_tasks: Vec::new(),

            client,

            config_path,
        })
    }

    /// Stamp shown on the greeting bubble, hour and minute only.
    pub fn greeting_stamp(&self) -> String {
        self.started_at.format("%H:%M").to_string()
    }

    pub fn current_placeholder(&self) -> &'static str {
        SUGGESTED_QUESTIONS[self.placeholder_idx % SUGGESTED_QUESTIONS.len()]
    }

    // --- Chat ---

    /// Sends whatever is in the input box. One reply at a time: while a
    /// reply task is in flight further submits only raise a notice, which
    /// keeps question/answer pairs in order.
    pub fn submit_message(&mut self) {
        if self.reply_task.is_some() {
            self.notify(NoticeKind::Warning, "Please wait for the current reply!");
            return;
        }
        let message = self.chat_input.trim().to_string();
        if message.is_empty() {
            return;
        }

        self.chat_input.clear();
        self.chat_cursor = 0;
        self.push_entry(ConversationEntry::new(Role::User, message.clone()));

        self.pending_phrase = Some(pick_loading_phrase());
        self.animation_frame = 0;

        self.reply_task = Some(match special_reply(&message) {
            Some(canned) => tokio::spawn(async move {
                tokio::time::sleep(SPECIAL_REPLY_DELAY).await;
                Ok(canned.to_string())
            }),
            None => {
                let client = self.client.clone();
                let delay = Duration::from_millis(rand::thread_rng().gen_range(THINKING_DELAY_MS));
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    client.ask(&message).await
                })
            }
        });
    }

    /// Lands a finished reply in the transcript. Failures become the
    /// apology message; the cause only goes to the log.
    pub fn apply_reply(&mut self, result: Result<String>) {
        self.pending_phrase = None;
        let text = match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("assistant reply failed: {e:#}");
                APOLOGY.to_string()
            }
        };
        self.push_entry(ConversationEntry::new(Role::Assistant, text));
    }

    fn push_entry(&mut self, entry: ConversationEntry) {
        self.store.append(entry);
        self.refresh_analytics();
        self.pinned_to_bottom = true;
    }

    /// Fire-and-forget analytics poll after every message, mirroring the
    /// per-message usage ping the backend expects. Nothing reads the
    /// result; failures are logged.
    fn refresh_analytics(&self) {
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.analytics().await {
                Ok(a) => tracing::debug!(total_questions = a.total_questions, "analytics poll"),
                Err(e) => tracing::debug!("analytics poll failed: {e:#}"),
            }
        });
    }

    /// Reaps finished background tasks. Called every pass through the
    /// event loop; never blocks on unfinished work.
    pub async fn poll_background(&mut self) {
        if self
            .reply_task
            .as_ref()
            .is_some_and(|task| task.is_finished())
        {
            if let Some(task) = self.reply_task.take() {
                let result = task
                    .await
                    .unwrap_or_else(|e| Err(anyhow::anyhow!("reply task panicked: {e}")));
                self.apply_reply(result);
            }
        }

        if self.admin_tasks.iter().any(|task| task.is_finished()) {
            // Applying an outcome may queue follow-up tasks (a stats
            // reload); iterate an owned list so those land untouched.
            for task in std::mem::take(&mut self.admin_tasks) {
                if task.is_finished() {
                    match task.await {
                        Ok(outcome) => self.apply_admin(outcome),
                        Err(e) => tracing::warn!("admin task panicked: {e}"),
                    }
                } else {
                    self.admin_tasks.push(task);
                }
            }
        }
    }

    // --- Transcript scrolling ---

    fn max_scroll(&self) -> u16 {
        self.total_transcript_lines
            .saturating_sub(self.transcript_height)
    }

    pub fn scroll_up(&mut self) {
        self.pinned_to_bottom = false;
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        let max = self.max_scroll();
        if self.transcript_scroll < max {
            self.transcript_scroll += 1;
        }
        if self.transcript_scroll >= max {
            self.pinned_to_bottom = true;
        }
    }

    pub fn scroll_half_page_up(&mut self) {
        self.pinned_to_bottom = false;
        let half_page = self.transcript_height / 2;
        self.transcript_scroll = self.transcript_scroll.saturating_sub(half_page);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.transcript_height / 2;
        let max = self.max_scroll();
        self.transcript_scroll = (self.transcript_scroll + half_page).min(max);
        if self.transcript_scroll >= max {
            self.pinned_to_bottom = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.pinned_to_bottom = false;
        self.transcript_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.pinned_to_bottom = true;
        self.transcript_scroll = self.max_scroll();
    }

    // --- Clear / export ---

    pub fn request_clear(&mut self) {
        if self.store.len() > 1 {
            self.confirm_clear = true;
        } else {
            self.notify(NoticeKind::Info, "No chat history to clear!");
        }
    }

    pub fn confirm_clear_history(&mut self) {
        self.confirm_clear = false;
        self.store.clear_to_first();
        self.transcript_from = self.store.len();
        self.transcript_scroll = 0;
        self.pinned_to_bottom = true;
        self.notify(NoticeKind::Success, "Chat history cleared successfully!");
    }

    pub fn cancel_clear(&mut self) {
        self.confirm_clear = false;
    }

    /// Writes the full conversation log as plain text into the download
    /// directory (falling back to the working directory).
    pub fn export_transcript(&mut self) {
        if self.store.len() <= 1 {
            self.notify(NoticeKind::Info, "No conversation to download!");
            return;
        }

        let now = Local::now();
        let text = self.store.export_text(now);
        let path = export_path(now);
        match std::fs::write(&path, text) {
            Ok(()) => {
                self.notify(
                    NoticeKind::Success,
                    format!("Chat history saved to {}", path.display()),
                );
            }
            Err(e) => {
                tracing::warn!("could not write transcript to {}: {e}", path.display());
                self.notify(NoticeKind::Error, "Could not save chat history!");
            }
        }
    }

    // --- Theme / notifications ---

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.flipped();
        if let Err(e) = Config::save_theme(&self.config_path, self.theme) {
            tracing::warn!("could not persist theme: {e:#}");
        }
        self.notify(
            NoticeKind::Success,
            format!("Switched to {} theme", self.theme.name()),
        );
    }

    /// Replaces any visible notification; there is no queue.
    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice::new(kind, text.into()));
    }

    /// Advances time-driven state. Called on every tick event.
    pub fn on_tick(&mut self) {
        if self.pending_phrase.is_some() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        if self.notice.as_ref().is_some_and(Notice::expired) {
            self.notice = None;
        }
        if self.placeholder_rotated.elapsed() >= PLACEHOLDER_INTERVAL {
            self.placeholder_idx = (self.placeholder_idx + 1) % SUGGESTED_QUESTIONS.len();
            self.placeholder_rotated = Instant::now();
        }
    }

    // --- Quick-question picker ---

    pub fn open_quick_questions(&mut self) {
        self.show_quick_questions = true;
        self.quick_state.select(Some(0));
    }

    pub fn quick_nav_down(&mut self) {
        let len = SUGGESTED_QUESTIONS.len();
        let i = self.quick_state.selected().unwrap_or(0);
        self.quick_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn quick_nav_up(&mut self) {
        let i = self.quick_state.selected().unwrap_or(0);
        self.quick_state.select(Some(i.saturating_sub(1)));
    }

    /// Sends the highlighted suggestion as if the user had typed it.
    pub fn pick_quick_question(&mut self) {
        if let Some(i) = self.quick_state.selected() {
            if let Some(question) = SUGGESTED_QUESTIONS.get(i) {
                self.chat_input = question.to_string();
                self.chat_cursor = self.chat_input.chars().count();
                self.show_quick_questions = false;
                self.input_mode = InputMode::Editing;
                self.submit_message();
            }
        }
    }

    // --- Admin ---

    /// Opens the admin screen on a blank login form, then asks the
    /// backend whether a session is already live.
    pub fn open_admin(&mut self) {
        self.screen = Screen::Admin;
        self.input_mode = InputMode::Normal;
        self.admin = AdminState::new();

        let client = self.client.clone();
        self.admin_tasks.push(tokio::spawn(async move {
            AdminOutcome::AuthChecked(client.check_auth().await)
        }));
    }

    pub fn close_admin(&mut self) {
        self.screen = Screen::Chat;
        self.input_mode = InputMode::Editing;
    }

    pub fn submit_login(&mut self) {
        if self.admin.username.is_empty() || self.admin.password.is_empty() {
            self.notify(NoticeKind::Error, "Please enter both username and password!");
            return;
        }

        let client = self.client.clone();
        let username = self.admin.username.clone();
        let password = self.admin.password.clone();
        self.admin_tasks.push(tokio::spawn(async move {
            AdminOutcome::LoginDone(client.login(&username, &password).await)
        }));
    }

    pub fn submit_logout(&mut self) {
        let client = self.client.clone();
        self.admin_tasks.push(tokio::spawn(async move {
            AdminOutcome::LogoutDone(client.logout().await)
        }));
    }

    pub fn load_stats(&mut self) {
        let client = self.client.clone();
        self.admin_tasks.push(tokio::spawn(async move {
            AdminOutcome::StatsLoaded(client.stats().await)
        }));
    }

    pub fn load_analytics(&mut self) {
        let client = self.client.clone();
        self.admin_tasks.push(tokio::spawn(async move {
            AdminOutcome::AnalyticsLoaded(client.analytics().await)
        }));
    }

    /// Validates and submits the new-question form.
    pub fn submit_question(&mut self) {
        let category = self.admin.category.trim().to_string();
        let patterns = split_patterns(&self.admin.patterns);
        let answer = self.admin.answer.trim().to_string();

        if category.is_empty() || patterns.is_empty() || answer.is_empty() {
            self.notify(NoticeKind::Error, "Please fill all fields!");
            return;
        }

        let client = self.client.clone();
        self.admin_tasks.push(tokio::spawn(async move {
            AdminOutcome::QuestionAdded(client.add_question(&category, &patterns, &answer).await)
        }));
    }

    /// State transition for a finished admin call.
    pub fn apply_admin(&mut self, outcome: AdminOutcome) {
        match outcome {
            AdminOutcome::AuthChecked(Ok(true)) => self.enter_dashboard(),
            AdminOutcome::AuthChecked(Ok(false)) => {}
            AdminOutcome::AuthChecked(Err(e)) => {
                tracing::warn!("auth check failed: {e:#}");
            }

            AdminOutcome::LoginDone(Ok(reply)) if reply.is_success() => {
                self.notify(NoticeKind::Success, "Admin login successful!");
                self.enter_dashboard();
            }
            AdminOutcome::LoginDone(Ok(_)) => {
                self.notify(NoticeKind::Error, "Invalid admin credentials!");
            }
            AdminOutcome::LoginDone(Err(e)) => {
                tracing::warn!("login failed: {e:#}");
                self.notify(NoticeKind::Error, "Login failed. Please try again.");
            }

            AdminOutcome::LogoutDone(Ok(reply)) if reply.is_success() => {
                self.notify(NoticeKind::Success, "Logged out successfully!");
                self.show_login_form();
            }
            AdminOutcome::LogoutDone(Ok(reply)) => {
                tracing::warn!("logout rejected: {}", reply.message);
            }
            AdminOutcome::LogoutDone(Err(e)) => {
                tracing::warn!("logout failed: {e:#}");
                self.show_login_form();
            }

            AdminOutcome::StatsLoaded(Ok(stats)) => self.admin.stats = Some(stats),
            AdminOutcome::StatsLoaded(Err(e)) => {
                tracing::warn!("loading admin stats failed: {e:#}");
            }

            AdminOutcome::QuestionAdded(Ok(reply)) if reply.is_success() => {
                self.notify(NoticeKind::Success, "Question added successfully!");
                self.admin.patterns.clear();
                self.admin.answer.clear();
                self.load_stats();
            }
            AdminOutcome::QuestionAdded(Ok(reply)) => {
                self.notify(
                    NoticeKind::Error,
                    format!("Error adding question: {}", reply.message),
                );
            }
            AdminOutcome::QuestionAdded(Err(e)) => {
                tracing::warn!("adding question failed: {e:#}");
                self.notify(NoticeKind::Error, "Error adding question!");
            }

            AdminOutcome::AnalyticsLoaded(Ok(analytics)) => {
                self.admin.analytics = Some(analytics);
            }
            AdminOutcome::AnalyticsLoaded(Err(e)) => {
                tracing::warn!("loading analytics failed: {e:#}");
            }
        }
    }

    fn enter_dashboard(&mut self) {
        self.admin.view = AdminView::Dashboard;
        self.admin.tab = AdminTab::Manage;
        // A late auth or login result must not steal the input mode from
        // the chat screen.
        if self.screen == Screen::Admin {
            self.input_mode = InputMode::Normal;
        }
        self.load_stats();
    }

    fn show_login_form(&mut self) {
        self.admin.view = AdminView::Login;
        self.admin.login_focus = LoginField::Username;
        self.admin.username.clear();
        self.admin.password.clear();
    }

    pub fn switch_admin_tab(&mut self, tab: AdminTab) {
        self.admin.tab = tab;
        if tab == AdminTab::Analytics {
            self.load_analytics();
        }
    }

    // --- Admin form focus helpers ---

    pub fn login_focus_next(&mut self) {
        self.admin.login_focus = match self.admin.login_focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn form_focus_next(&mut self) {
        self.admin.form_focus = match self.admin.form_focus {
            QuestionField::Category => QuestionField::Patterns,
            QuestionField::Patterns => QuestionField::Answer,
            QuestionField::Answer => QuestionField::Category,
        };
    }

    pub fn form_focus_prev(&mut self) {
        self.admin.form_focus = match self.admin.form_focus {
            QuestionField::Category => QuestionField::Answer,
            QuestionField::Patterns => QuestionField::Category,
            QuestionField::Answer => QuestionField::Patterns,
        };
    }

    pub fn focused_login_field_mut(&mut self) -> &mut String {
        match self.admin.login_focus {
            LoginField::Username => &mut self.admin.username,
            LoginField::Password => &mut self.admin.password,
        }
    }

    pub fn focused_form_field_mut(&mut self) -> &mut String {
        match self.admin.form_focus {
            QuestionField::Category => &mut self.admin.category,
            QuestionField::Patterns => &mut self.admin.patterns,
            QuestionField::Answer => &mut self.admin.answer,
        }
    }
}

fn pick_loading_phrase() -> &'static str {
    let i = rand::thread_rng().gen_range(0..LOADING_PHRASES.len());
    LOADING_PHRASES[i]
}

/// Comma-separated pattern list to trimmed, non-empty entries.
pub fn split_patterns(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

fn export_path(now: DateTime<Local>) -> PathBuf {
    let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(format!("adtu-chat-{}.txt", now.format("%Y-%m-%d")))
}
