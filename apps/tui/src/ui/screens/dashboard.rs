use crate::app::state::Dashboard;
use crate::ui::view::{
    ConfidenceTier, DashboardView, MoverCard, Movement, PredictionCard, RaceCard, RoughieCard,
    Section,
};
use crate::ui::widgets::cards::visible_cards;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

const RACE_CARD_HEIGHT: u16 = 5;
const CHAT_PANEL_HEIGHT: u16 = 12;

pub fn render_dashboard(dashboard: &mut Dashboard, f: &mut Frame<'_>) {
    let chat_height = if dashboard.ui.chat_open {
        CHAT_PANEL_HEIGHT
    } else {
        0
    };

    let [header, body, chat, status, shortcuts] = Layout::vertical([
        Constraint::Length(3), // Filter tabs and refresh state
        Constraint::Min(8),    // Races and side panels
        Constraint::Length(chat_height),
        Constraint::Length(3), // Status area
        Constraint::Length(1), // Shortcuts hint
    ])
    .areas(f.area().inner(Margin::new(1, 0)));

    render_header(dashboard, f, header);

    let [races_area, side_area] =
        Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)]).areas(body);
    let view = dashboard.view();
    render_races(&view.races, dashboard.ui.selected_race, f, races_area);
    render_side_panels(view, f, side_area);

    if dashboard.ui.chat_open {
        super::chat::render_chat(dashboard, f, chat);
    }

    render_status(&dashboard.ui.status_message, f, status);
    render_shortcuts(dashboard.ui.chat_open, f, shortcuts);
}

fn render_header(dashboard: &mut Dashboard, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Race Dash ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin::new(1, 1));
    let [tabs_area, update_area, spinner_area] = Layout::horizontal([
        Constraint::Min(20),
        Constraint::Length(22),
        Constraint::Length(14),
    ])
    .areas(inner);

    let view = dashboard.view();
    let titles: Vec<String> = view.filter_tabs.iter().map(|tab| tab.label.clone()).collect();
    let tabs = Tabs::new(titles)
        .select(view.active_filter_index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, tabs_area);

    let last_update = view.last_update.as_deref().unwrap_or("--:--:--");
    let update = Paragraph::new(Span::styled(
        format!("Last update: {last_update}"),
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Right);
    f.render_widget(update, update_area);

    if dashboard.is_refreshing() {
        let throbber = Throbber::default()
            .label("Refreshing")
            .style(Style::default().fg(Color::Cyan))
            .throbber_set(BRAILLE_SIX)
            .use_type(WhichUse::Spin);
        f.render_stateful_widget(throbber, spinner_area, &mut dashboard.spinner);
    }
}

fn panel(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Style::default().fg(color))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn placeholder(text: &str, block: Block<'static>) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    ))
    .block(block)
}

fn render_races(races: &Section<RaceCard>, selected: usize, f: &mut Frame<'_>, area: Rect) {
    let block = panel("Races", Color::Green);

    if let Some(text) = races.placeholder() {
        f.render_widget(placeholder(text, block), area);
        return;
    }

    let cards = races.cards();
    let inner_height = area.height.saturating_sub(2);
    let window = visible_cards(cards.len(), inner_height, RACE_CARD_HEIGHT, selected);

    let mut lines = Vec::new();
    for (index, card) in cards.iter().enumerate().take(window.end).skip(window.start) {
        lines.extend(race_card_lines(card, index == selected));
    }

    let paragraph = Paragraph::new(Text::from(lines)).block(block);
    f.render_widget(paragraph, area);
}

fn race_card_lines(card: &RaceCard, selected: bool) -> Vec<TextLine<'static>> {
    let marker = if selected { "> " } else { "  " };
    let name_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };

    let mut title = vec![Span::styled(marker, name_style)];
    if card.featured {
        title.push(Span::styled("★ ", Style::default().fg(Color::Yellow)));
    }
    title.push(Span::styled(card.name.clone(), name_style));
    title.push(Span::styled(
        format!("  {}", card.track),
        Style::default().fg(Color::Gray),
    ));
    title.push(Span::raw(format!("  {} {}", card.trend.icon, card.trend.value)));

    let mut lines = vec![TextLine::from(title)];
    for runner in &card.runners {
        let mut spans = vec![
            Span::raw(format!("    {:<22}", runner.name)),
            Span::styled("Win ", Style::default().fg(Color::Gray)),
            Span::styled(runner.win.clone(), Style::default().fg(Color::Green)),
            Span::styled("  Place ", Style::default().fg(Color::Gray)),
            Span::styled(runner.place.clone(), Style::default().fg(Color::Cyan)),
        ];
        let connections: Vec<String> = [("J", &runner.jockey), ("T", &runner.trainer)]
            .into_iter()
            .filter_map(|(tag, name)| name.as_ref().map(|name| format!("{tag}: {name}")))
            .collect();
        if !connections.is_empty() {
            spans.push(Span::styled(
                format!("  {}", connections.join("  ")),
                Style::default().fg(Color::Gray),
            ));
        }
        lines.push(TextLine::from(spans));
    }
    // title + two runner rows
    while lines.len() < 3 {
        lines.push(TextLine::from(""));
    }

    let details: Vec<&str> = card.details.iter().map(|(_, value)| value.as_str()).collect();
    lines.push(TextLine::from(Span::styled(
        format!("    {}", details.join(" | ")),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(TextLine::from(""));
    lines
}

fn render_side_panels(view: &DashboardView, f: &mut Frame<'_>, area: Rect) {
    let [movers, predictions, roughies] = Layout::vertical([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .areas(area);

    render_section(&view.movers, "Market Movers", Color::Magenta, mover_lines, f, movers);
    render_section(
        &view.predictions,
        "Predictions",
        Color::Blue,
        prediction_lines,
        f,
        predictions,
    );
    render_section(&view.roughies, "Roughies", Color::Yellow, roughie_lines, f, roughies);
}

fn render_section<T>(
    section: &Section<T>,
    title: &str,
    color: Color,
    to_lines: fn(&T) -> Vec<TextLine<'static>>,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let block = panel(title, color);
    if let Some(text) = section.placeholder() {
        f.render_widget(placeholder(text, block), area);
        return;
    }

    let lines: Vec<TextLine<'static>> = section.cards().iter().flat_map(to_lines).collect();
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

const fn movement_color(direction: Movement) -> Color {
    match direction {
        Movement::Up => Color::Green,
        Movement::Down => Color::Red,
        Movement::Flat => Color::Gray,
    }
}

pub const fn tier_color(tier: ConfidenceTier) -> Color {
    match tier {
        ConfidenceTier::Success => Color::Green,
        ConfidenceTier::Info => Color::Cyan,
        ConfidenceTier::Warning => Color::Yellow,
    }
}

fn mover_lines(card: &MoverCard) -> Vec<TextLine<'static>> {
    let color = movement_color(card.direction);
    vec![TextLine::from(vec![
        Span::styled(format!("{:<4}", card.rank), Style::default().fg(Color::Gray)),
        Span::styled(
            card.horse.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({})", card.track), Style::default().fg(Color::Gray)),
        Span::raw(format!("  {}", card.odds)),
        Span::styled(
            format!(" {} {}", card.icon, card.change),
            Style::default().fg(color),
        ),
    ])]
}

fn prediction_lines(card: &PredictionCard) -> Vec<TextLine<'static>> {
    let mut title = vec![Span::styled(
        card.tip.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(horse) = &card.horse {
        title.push(Span::raw(format!(" - {horse}")));
    }
    title.push(Span::styled(
        format!("  [{}]", card.badge),
        Style::default().fg(tier_color(card.tier)),
    ));

    vec![
        TextLine::from(title),
        TextLine::from(Span::styled(
            format!("  {}: {}", card.track, card.reason),
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn roughie_lines(card: &RoughieCard) -> Vec<TextLine<'static>> {
    vec![
        TextLine::from(vec![
            Span::styled(format!("{:<4}", card.rank), Style::default().fg(Color::Gray)),
            Span::styled(
                card.horse.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" ({})", card.track), Style::default().fg(Color::Gray)),
            Span::styled(format!("  @ {}", card.odds), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", card.badge), Style::default().fg(Color::Yellow)),
        ]),
        TextLine::from(Span::styled(
            format!("    {}", card.analysis),
            Style::default().fg(Color::Gray),
        )),
    ]
}

fn render_status(message: &str, f: &mut Frame<'_>, area: Rect) {
    let block = panel("Status", Color::Yellow);

    let style = if message.starts_with("Could not") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let paragraph = Paragraph::new(Span::styled(message.to_string(), style))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_shortcuts(chat_open: bool, f: &mut Frame<'_>, area: Rect) {
    let pairs: &[(&str, &str)] = if chat_open {
        &[("Enter", "Send"), ("Esc", "Close chat"), ("F1", "Help")]
    } else {
        &[
            ("←/→", "Filter"),
            ("↑/↓", "Select"),
            ("Enter", "Details"),
            ("b", "Bet"),
            ("a", "AI tip"),
            ("c", "Chat"),
            ("r", "Refresh"),
            ("?", "Help"),
            ("q", "Quit"),
        ]
    };

    let mut spans = Vec::new();
    for (index, (key, action)) in pairs.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        }
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(": {action}"), Style::default().fg(Color::Gray)));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
