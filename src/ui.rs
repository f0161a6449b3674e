use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};
use regex::Regex;

use crate::app::{
    AdminTab, AdminView, App, InputMode, LoginField, NoticeKind, QuestionField, Screen,
};
use crate::history::Role;
use crate::responses::{GREETING, SUGGESTED_QUESTIONS};
use crate::theme::Palette;

/// Renders the whole frame. Popups paint last so they sit on top of
/// whichever screen is showing.
pub fn render(app: &mut App, frame: &mut Frame) {
    let palette = app.theme.palette();
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.surface).fg(palette.text)),
        area,
    );

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    match app.screen {
        Screen::Chat => render_chat(app, frame, body_area),
        Screen::Admin => render_admin(app, frame, body_area),
    }
    render_footer(app, frame, footer_area);

    if app.confirm_clear {
        render_confirm_clear(frame, area, &palette);
    } else if app.show_quick_questions {
        render_quick_questions(app, frame, area);
    }

    render_notice(app, frame, area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let title = Line::from(vec![
        Span::styled(
            " ADTU Smart Campus Assistant ",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Assam Down Town University ",
            Style::default().fg(palette.highlight_fg),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(palette.highlight_fg),
        ),
    ]);
    let header = Paragraph::new(title).style(Style::default().bg(palette.panel));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let key_style = Style::default().bg(palette.panel).fg(palette.highlight_fg);
    let label_style = Style::default().fg(palette.dim);

    let (mode_text, mode_style) = match (app.screen, app.input_mode) {
        (_, InputMode::Editing) => (
            " TYPING ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        (Screen::Chat, InputMode::Normal) => (
            " NORMAL ",
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        (Screen::Admin, InputMode::Normal) => (
            " ADMIN ",
            Style::default().bg(Color::Magenta).fg(Color::White),
        ),
    };

    let hints: &[(&str, &str)] = if app.confirm_clear {
        &[("y", "clear"), ("n", "keep")]
    } else if app.show_quick_questions {
        &[("j/k", "choose"), ("enter", "send"), ("esc", "close")]
    } else {
        match (app.screen, app.input_mode, app.admin.view, app.admin.tab) {
            (Screen::Chat, InputMode::Editing, ..) => {
                &[("enter", "send"), ("esc", "browse"), ("↑/↓", "scroll")]
            }
            (Screen::Chat, InputMode::Normal, ..) => &[
                ("i", "write"),
                ("p", "questions"),
                ("j/k", "scroll"),
                ("t", "theme"),
                ("s", "save"),
                ("c", "clear"),
                ("a", "admin"),
                ("q", "quit"),
            ],
            (Screen::Admin, _, AdminView::Login, _) => {
                &[("tab", "field"), ("enter", "login"), ("esc", "back")]
            }
            (Screen::Admin, InputMode::Editing, AdminView::Dashboard, _) => {
                &[("tab", "next field"), ("enter", "add"), ("esc", "done")]
            }
            (Screen::Admin, InputMode::Normal, AdminView::Dashboard, AdminTab::Manage) => &[
                ("1/2", "tab"),
                ("i", "edit form"),
                ("r", "refresh"),
                ("l", "logout"),
                ("esc", "back"),
            ],
            (Screen::Admin, InputMode::Normal, AdminView::Dashboard, AdminTab::Analytics) => &[
                ("1/2", "tab"),
                ("r", "refresh"),
                ("l", "logout"),
                ("esc", "back"),
            ],
        }
    };

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    for (key, label) in hints {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(format!(" {label}"), label_style));
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.surface));
    frame.render_widget(footer, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);
    render_transcript(app, frame, transcript_area);
    render_chat_input(app, frame, input_area);
}

/// Draws the conversation. The greeting bubble is a fixed element; only
/// messages from this session are replayed under it.
fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Conversation ");
    let inner = block.inner(area);

    let mut lines: Vec<Line<'static>> = Vec::new();
    push_message(
        &mut lines,
        Role::Assistant,
        &app.greeting_stamp(),
        GREETING,
        &palette,
    );
    for entry in &app.store.entries()[app.transcript_from..] {
        push_message(
            &mut lines,
            entry.role,
            &entry.time_of_day(),
            &entry.text,
            &palette,
        );
    }
    if let Some(phrase) = app.pending_phrase {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        lines.push(Line::from(Span::styled(
            format!("🤖 {}", Role::Assistant.sender_name()),
            Style::default()
                .fg(palette.assistant)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("{}{dots}", phrase.trim_end_matches('.')),
            Style::default()
                .fg(palette.dim)
                .add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::default());
    }

    app.transcript_height = inner.height;
    app.transcript_width = inner.width;
    app.total_transcript_lines = estimate_rows(&lines, inner.width);

    let max_scroll = app
        .total_transcript_lines
        .saturating_sub(app.transcript_height);
    if app.pinned_to_bottom {
        app.transcript_scroll = max_scroll;
    } else {
        app.transcript_scroll = app.transcript_scroll.min(max_scroll);
    }

    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.transcript_scroll, 0));
    frame.render_widget(transcript, area);

    if app.total_transcript_lines > app.transcript_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state = ScrollbarState::new(app.total_transcript_lines as usize)
            .position(app.transcript_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

/// One chat bubble: a sender line with a timestamp, the message body,
/// then a blank separator row.
fn push_message(
    lines: &mut Vec<Line<'static>>,
    role: Role,
    stamp: &str,
    text: &str,
    palette: &Palette,
) {
    let (icon, color) = match role {
        Role::User => ("👤", palette.user),
        Role::Assistant => ("🤖", palette.assistant),
    };
    lines.push(Line::from(vec![
        Span::styled(
            format!("{icon} {}", role.sender_name()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {stamp}"), Style::default().fg(palette.dim)),
    ]));
    lines.extend(format_message(text, Style::default().fg(palette.text)));
    lines.push(Line::default());
}

/// Counts wrapped display rows. Word wrapping can break a hair earlier
/// than a plain character count predicts; close enough to keep the
/// newest message in view.
fn estimate_rows(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let mut rows: u16 = 0;
    for line in lines {
        let chars: usize = line.spans.iter().map(|s| s.content.chars().count()).sum();
        let line_rows = if chars == 0 {
            1
        } else {
            (chars + width - 1) / width
        };
        rows = rows.saturating_add(line_rows as u16);
    }
    rows
}

fn render_chat_input(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let editing = app.input_mode == InputMode::Editing;
    let border = if editing {
        palette.border_active
    } else {
        palette.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Message ");

    // Horizontal scroll keeps the cursor inside the box on long input.
    let inner_width = area.width.saturating_sub(2) as usize;
    let scroll_offset = if inner_width > 0 && app.chat_cursor >= inner_width {
        app.chat_cursor - inner_width + 1
    } else {
        0
    };

    if app.chat_input.is_empty() {
        let placeholder = Paragraph::new(app.current_placeholder())
            .style(
                Style::default()
                    .fg(palette.dim)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(block);
        frame.render_widget(placeholder, area);
    } else {
        let visible: String = app
            .chat_input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        let input = Paragraph::new(visible)
            .style(Style::default().fg(palette.text))
            .block(block);
        frame.render_widget(input, area);
    }

    if editing && !app.confirm_clear && !app.show_quick_questions {
        let cursor_x = (app.chat_cursor - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_admin(app: &mut App, frame: &mut Frame, area: Rect) {
    match app.admin.view {
        AdminView::Login => render_admin_login(app, frame, area),
        AdminView::Dashboard => render_admin_dashboard(app, frame, area),
    }
}

/// Login form, centered. Keys go straight into the focused field.
fn render_admin_login(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let popup = centered_rect(46, 9, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_active))
        .title(" Admin Login ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let [user_area, pass_area, hint_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(inner);

    let on_username = app.admin.login_focus == LoginField::Username;
    render_field(
        frame,
        user_area,
        " Username ",
        &app.admin.username,
        on_username,
        on_username,
        &palette,
    );
    let masked = "*".repeat(app.admin.password.chars().count());
    render_field(
        frame,
        pass_area,
        " Password ",
        &masked,
        !on_username,
        !on_username,
        &palette,
    );

    let hint = Paragraph::new("Authorized staff only").style(Style::default().fg(palette.dim));
    frame.render_widget(hint, hint_area);
}

fn render_admin_dashboard(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let [tabs_area, content_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let active = Style::default()
        .bg(palette.highlight_bg)
        .fg(palette.highlight_fg)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(palette.dim);
    let tabs = Line::from(vec![
        Span::styled(
            " [1] Manage Questions ",
            if app.admin.tab == AdminTab::Manage {
                active
            } else {
                inactive
            },
        ),
        Span::raw(" "),
        Span::styled(
            " [2] Analytics ",
            if app.admin.tab == AdminTab::Analytics {
                active
            } else {
                inactive
            },
        ),
    ]);
    frame.render_widget(Paragraph::new(tabs), tabs_area);

    match app.admin.tab {
        AdminTab::Manage => render_manage_tab(app, frame, content_area),
        AdminTab::Analytics => render_analytics_tab(app, frame, content_area),
    }
}

fn render_manage_tab(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let [stats_area, form_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let stats_line = match &app.admin.stats {
        Some(stats) => Line::from(vec![
            Span::styled("Total Questions: ", Style::default().fg(palette.dim)),
            Span::styled(
                stats.total_questions.to_string(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Categories: ", Style::default().fg(palette.dim)),
            Span::styled(
                stats.total_categories.to_string(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::styled(
            "Loading stats...",
            Style::default()
                .fg(palette.dim)
                .add_modifier(Modifier::ITALIC),
        ),
    };
    let stats = Paragraph::new(stats_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Knowledge Base "),
    );
    frame.render_widget(stats, stats_area);

    let form_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .title(" Add New Question ");
    let form_inner = form_block.inner(form_area);
    frame.render_widget(form_block, form_area);

    let [cat_area, pat_area, ans_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ])
    .areas(form_inner);

    let editing = app.input_mode == InputMode::Editing;
    let fields = [
        (
            cat_area,
            " Category ",
            &app.admin.category,
            QuestionField::Category,
        ),
        (
            pat_area,
            " Patterns (comma separated) ",
            &app.admin.patterns,
            QuestionField::Patterns,
        ),
        (
            ans_area,
            " Answer ",
            &app.admin.answer,
            QuestionField::Answer,
        ),
    ];
    for (field_area, title, value, field) in fields {
        let focused = app.admin.form_focus == field;
        render_field(
            frame,
            field_area,
            title,
            value,
            focused,
            focused && editing,
            &palette,
        );
    }
}

fn render_analytics_tab(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();

    let knowledge = app
        .admin
        .stats
        .as_ref()
        .map(|s| format!("{} questions", s.total_questions));
    let analytics = app.admin.analytics.as_ref();
    let rows = [
        ("Knowledge Base", knowledge),
        (
            "Questions Asked",
            analytics.map(|a| a.total_questions.to_string()),
        ),
        (
            "Success Rate",
            analytics.map(|a| format!("{}%", a.success_rate)),
        ),
        (
            "Avg Response Time",
            analytics.map(|a| format!("{}s", a.avg_response_time)),
        ),
    ];

    let mut lines = vec![Line::default()];
    for (label, value) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<20}"), Style::default().fg(palette.dim)),
            Span::styled(
                value.unwrap_or_else(|| "-".to_string()),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::default());
    }

    let panel = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border))
            .title(" Usage Analytics "),
    );
    frame.render_widget(panel, area);
}

/// Single-line input box. The value keeps its tail in view so the cursor
/// never leaves the frame.
fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    focused: bool,
    show_cursor: bool,
    palette: &Palette,
) {
    let border = if focused {
        palette.border_active
    } else {
        palette.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title.to_string());

    let inner_width = area.width.saturating_sub(2) as usize;
    let count = value.chars().count();
    let skip = if inner_width > 1 {
        count.saturating_sub(inner_width - 1)
    } else {
        count
    };
    let visible: String = value.chars().skip(skip).collect();

    let field = Paragraph::new(visible)
        .style(Style::default().fg(palette.text))
        .block(block);
    frame.render_widget(field, area);

    if show_cursor {
        let cursor_x = (count - skip) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

/// Modal yes/no box for wiping the conversation log.
fn render_confirm_clear(frame: &mut Frame, area: Rect, palette: &Palette) {
    let popup = centered_rect(54, 7, area);
    frame.render_widget(Clear, popup);

    let key_style = Style::default().bg(palette.panel).fg(palette.highlight_fg);
    let body = Text::from(vec![
        Line::default(),
        Line::raw("Are you sure you want to clear the chat history?"),
        Line::default(),
        Line::from(vec![
            Span::styled(" y ", key_style),
            Span::raw(" yes   "),
            Span::styled(" n ", key_style),
            Span::raw(" no"),
        ]),
    ]);
    let confirm = Paragraph::new(body)
        .style(Style::default().bg(palette.surface).fg(palette.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Clear Chat History "),
        );
    frame.render_widget(confirm, popup);
}

fn render_quick_questions(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.theme.palette();
    let longest = SUGGESTED_QUESTIONS
        .iter()
        .map(|q| q.chars().count())
        .max()
        .unwrap_or(0) as u16;
    let width = (longest + 6).max(50);
    let height = SUGGESTED_QUESTIONS.len() as u16 + 2;
    let popup = centered_rect(width, height, area);
    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = SUGGESTED_QUESTIONS
        .iter()
        .map(|q| ListItem::new(*q))
        .collect();
    let list = List::new(items)
        .style(Style::default().bg(palette.surface).fg(palette.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border_active))
                .title(" Quick Questions (Enter to send, Esc to close) "),
        )
        .highlight_style(
            Style::default()
                .bg(palette.highlight_bg)
                .fg(palette.highlight_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, popup, &mut app.quick_state);
}

/// Toast in the top-right corner, colored by kind.
fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };
    if area.width < 12 || area.height < 5 {
        return;
    }
    let palette = app.theme.palette();
    let (glyph, color) = match notice.kind {
        NoticeKind::Success => ("✔", Color::Green),
        NoticeKind::Error => ("✖", Color::Red),
        NoticeKind::Info => ("ℹ", Color::Blue),
        NoticeKind::Warning => ("⚠", Color::Yellow),
    };

    let text = format!(" {glyph} {} ", notice.text);
    let width = (text.chars().count() as u16 + 2).min(area.width.saturating_sub(2));
    let popup = Rect::new(area.x + area.width - width - 1, area.y + 1, width, 3);
    frame.render_widget(Clear, popup);

    let toast = Paragraph::new(text)
        .style(Style::default().fg(color).bg(palette.surface))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(toast, popup);
}

/// Rect of the given size centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn list_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+\)) ").expect("list marker pattern is valid"))
}

/// Splits an answer into display lines: hard newlines, plus breaks before
/// "1)" style markers and "•" bullets that arrive packed into one line.
fn split_message_lines(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect();
    let broken = list_marker_pattern().replace_all(&cleaned, "\n${1} ");
    let broken = broken.replace("• ", "\n• ");
    broken
        .split('\n')
        .skip_while(|line| line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds styled lines for one message body. `**bold**` spans keep the
/// base color with bold added.
pub fn format_message(text: &str, base: Style) -> Vec<Line<'static>> {
    let lines = split_message_lines(text);
    if lines.is_empty() {
        return vec![Line::default()];
    }
    lines.iter().map(|line| styled_line(line, base)).collect()
}

fn styled_line(text: &str, base: Style) -> Line<'static> {
    let bold = base.add_modifier(Modifier::BOLD);
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '*' && chars.peek() == Some(&'*') {
            chars.next();
            let mut inner = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'*') {
                    chars.next();
                    closed = true;
                    break;
                }
                inner.push(c);
            }
            if closed && !inner.is_empty() {
                if !current.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current), base));
                }
                spans.push(Span::styled(inner, bold));
            } else {
                current.push_str("**");
                current.push_str(&inner);
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, base));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn splits_on_hard_newlines() {
        assert_eq!(
            split_message_lines("first\nsecond"),
            vec!["first", "second"]
        );
    }

    #[test]
    fn breaks_before_numbered_markers() {
        assert_eq!(
            split_message_lines("Courses: 1) B.Tech 2) BBA"),
            vec!["Courses: ", "1) B.Tech ", "2) BBA"],
        );
    }

    #[test]
    fn breaks_before_bullets() {
        assert_eq!(
            split_message_lines("Facilities: • Hostel • Gym"),
            vec!["Facilities: ", "• Hostel ", "• Gym"],
        );
    }

    #[test]
    fn leading_marker_adds_no_blank_line() {
        assert_eq!(
            split_message_lines("1) Apply online"),
            vec!["1) Apply online"]
        );
    }

    #[test]
    fn strips_control_characters() {
        assert_eq!(split_message_lines("a\u{7}b\r\nc"), vec!["ab", "c"]);
    }

    #[test]
    fn bold_markers_become_bold_spans() {
        let line = styled_line("visit **www.adtu.in** today", Style::default());
        let texts: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["visit ", "www.adtu.in", " today"]);
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn unclosed_bold_stays_literal() {
        let line = styled_line("50% **off", Style::default());
        assert_eq!(plain(&line), "50% **off");
        assert_eq!(line.spans.len(), 1);
    }

    #[test]
    fn empty_message_still_renders_a_line() {
        assert_eq!(format_message("", Style::default()).len(), 1);
    }

    #[test]
    fn row_estimate_counts_wrapped_lines() {
        let lines = vec![Line::raw("abcdefghij"), Line::default(), Line::raw("abc")];
        // width 5: 2 rows + 1 blank + 1 row
        assert_eq!(estimate_rows(&lines, 5), 4);
    }
}
