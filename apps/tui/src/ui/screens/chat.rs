use crate::app::state::{ChatRole, Dashboard};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_chat(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Ask the AI ")
        .title_style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [log_area, input_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let mut lines: Vec<TextLine<'_>> = dashboard
        .chat
        .messages
        .iter()
        .map(|message| {
            let (who, color) = match message.role {
                ChatRole::User => ("You", Color::Yellow),
                ChatRole::Assistant => ("AI", Color::Cyan),
                ChatRole::Error => ("AI", Color::Red),
            };
            TextLine::from(vec![
                Span::styled(
                    format!("{who}: "),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.text.as_str()),
            ])
        })
        .collect();

    if dashboard.chat.pending > 0 {
        lines.push(TextLine::from(Span::styled(
            "AI is thinking...",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Keep the newest messages in view
    let overflow = lines.len().saturating_sub(usize::from(log_area.height));
    let log = Paragraph::new(Text::from(lines.split_off(overflow))).wrap(Wrap { trim: false });
    f.render_widget(log, log_area);

    let input = Paragraph::new(TextLine::from(vec![
        Span::styled("> ", Style::default().fg(Color::Magenta)),
        Span::raw(dashboard.ui.chat_input.as_str()),
        Span::styled("_", Style::default().fg(Color::Gray)),
    ]));
    f.render_widget(input, input_area);
}
