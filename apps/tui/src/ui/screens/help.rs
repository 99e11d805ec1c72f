use crate::ui::widgets::popup::centered_rect;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const SHORTCUTS: [(&str, &str); 12] = [
    ("Left / Right", "Switch race filter"),
    ("Up / Down", "Select race"),
    ("Enter / d", "Race details"),
    ("b", "Bet slip (demo)"),
    ("a", "AI prediction for the selected race"),
    ("c", "Open or close the AI chat"),
    ("Enter (chat)", "Send question"),
    ("r", "Refresh now"),
    ("Esc", "Close popup or chat"),
    ("F1 / ?", "Toggle this help"),
    ("q", "Quit"),
    ("", "Data refreshes every 10 seconds"),
];

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 70, area);
    f.render_widget(Clear, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let mut lines = vec![
        TextLine::from(Span::styled(
            "Race Dash",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from("Live odds, market movers, predictions and roughies."),
        TextLine::from(""),
    ];
    for (key, action) in SHORTCUTS {
        lines.push(TextLine::from(vec![
            Span::styled(
                format!("{key:<14}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(action),
        ]));
    }

    let help_paragraph = Paragraph::new(Text::from(lines))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press ? or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}
