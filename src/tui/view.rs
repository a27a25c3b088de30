use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::app::App;
use super::screen::Hint;
use super::theme::Theme;
use crate::process::ProcessOutcome;

/// Compose one frame: breadcrumb, active screen, toast, footer.
pub fn draw(f: &mut Frame<'_>, app: &App) {
    let area = f.size();
    let theme = app.theme();
    let depth = app.depth();
    let toast = app.toast();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if depth > 1 { 1 } else { 0 }), // breadcrumb
            Constraint::Min(1),                                 // main
            Constraint::Length(if toast.is_some() { 1 } else { 0 }),
            Constraint::Length(1), // footer
        ])
        .split(area);

    if depth > 1 {
        draw_breadcrumb(f, &app.titles(), theme, layout[0]);
    }

    let block = Block::default()
        .title(Span::styled(" mypctools ", theme.title))
        .borders(Borders::ALL)
        .border_style(theme.border);
    let inner = block.inner(layout[1]);
    f.render_widget(block, layout[1]);
    app.active().render(f, inner, app.context(), theme);

    if let Some(t) = toast {
        let (icon, style) = if t.is_error {
            ("✗", theme.error)
        } else {
            ("✓", theme.success)
        };
        let text = truncate_to_width(&format!("{} {}", icon, t.text), layout[2].width as usize);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(text, style.add_modifier(Modifier::BOLD)))),
            layout[2],
        );
    }

    draw_footer(f, &app.active().short_help(), depth > 1, theme, layout[3]);
}

fn draw_breadcrumb(f: &mut Frame<'_>, titles: &[String], theme: &Theme, area: Rect) {
    let crumb = titles.join(" › ");
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_to_width(&crumb, area.width as usize),
            theme.muted,
        ))),
        area,
    );
}

fn draw_footer(f: &mut Frame<'_>, hints: &[Hint], can_go_back: bool, theme: &Theme, area: Rect) {
    let back = Hint::new("esc", "back");
    let mut spans = Vec::new();
    for h in hints.iter().chain(can_go_back.then_some(&back)) {
        if !spans.is_empty() {
            spans.push(Span::styled("  ", theme.muted));
        }
        spans.push(Span::styled(h.key, theme.secondary));
        spans.push(Span::styled(format!(" {}", h.desc), theme.muted));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// A selectable row in a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub detail: Option<String>,
}

impl MenuItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub fn menu_lines(items: &[MenuItem], cursor: usize, theme: &Theme) -> Vec<Line<'static>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let selected = idx == cursor;
            let (prefix, style) = if selected {
                ("› ", theme.selected)
            } else {
                ("  ", theme.text)
            };
            let mut spans = vec![
                Span::styled(prefix, theme.cursor),
                Span::styled(item.label.clone(), style),
            ];
            if let Some(d) = &item.detail {
                spans.push(Span::styled(format!("  {}", d), theme.muted));
            }
            Line::from(spans)
        })
        .collect()
}

/// Heading plus menu, the layout most screens use.
pub fn render_menu(f: &mut Frame<'_>, area: Rect, heading: &str, items: &[MenuItem], cursor: usize, theme: &Theme) {
    let mut lines = vec![Line::from(Span::styled(heading.to_string(), theme.title)), Line::from("")];
    lines.extend(menu_lines(items, cursor, theme));
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), padded(area));
}

/// One line describing how a handed-off process ended.
pub fn outcome_line(label: &str, outcome: &ProcessOutcome, theme: &Theme) -> Line<'static> {
    match outcome {
        Ok(()) => Line::from(Span::styled(format!("✓ {}", label), theme.success)),
        Err(e) => Line::from(vec![
            Span::styled(format!("✗ {}: ", label), theme.error),
            Span::styled(e.to_string(), theme.text),
        ]),
    }
}

pub fn any_key_line(theme: &Theme) -> Line<'static> {
    Line::from(Span::styled("Press any key to continue", theme.muted))
}

pub fn dim_line(text: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(text.into(), theme.muted))
}

pub fn badge(text: &str, style: Style) -> Span<'static> {
    Span::styled(format!("[{}]", text), style)
}

/// Inner area with one column of horizontal padding.
pub fn padded(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y,
        width: area.width.saturating_sub(2),
        height: area.height,
    }
}

pub fn truncate_to_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".to_string();
    }

    let mut out = String::new();
    let mut width = 0usize;
    for ch in s.chars() {
        let ch_w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_w > max - 1 {
            break;
        }
        out.push(ch);
        width += ch_w;
    }
    out.push('…');
    out
}
