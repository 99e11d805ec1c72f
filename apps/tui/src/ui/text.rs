//! Plain-text rendering of the dashboard for headless output.

use std::fmt::Write as _;

use crate::ui::view::{DashboardView, Section};

/// Renders every section as indented plain text, placeholders included.
pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Race Dash");
    let _ = writeln!(out, "=========");
    let active = view
        .filter_tabs
        .get(view.active_filter_index())
        .map_or("All", |tab| tab.label.as_str());
    let _ = writeln!(out, "Filter: {active}");
    let _ = writeln!(
        out,
        "Last update: {}",
        view.last_update.as_deref().unwrap_or("never")
    );

    write_section(&mut out, "Races", &view.races, |out, card| {
        let star = if card.featured { "* " } else { "" };
        let _ = writeln!(
            out,
            "- {star}{} | {} | {} {}",
            card.name, card.track, card.trend.icon, card.trend.value
        );
        for runner in &card.runners {
            let _ = write!(
                out,
                "    {} | Win {} | Place {}",
                runner.name, runner.win, runner.place
            );
            if let Some(jockey) = &runner.jockey {
                let _ = write!(out, " | J: {jockey}");
            }
            if let Some(trainer) = &runner.trainer {
                let _ = write!(out, " | T: {trainer}");
            }
            out.push('\n');
        }
        if !card.details.is_empty() {
            let details: Vec<String> = card
                .details
                .iter()
                .map(|(label, value)| format!("{label}: {value}"))
                .collect();
            let _ = writeln!(out, "    {}", details.join(", "));
        }
    });

    write_section(&mut out, "Market Movers", &view.movers, |out, card| {
        let _ = writeln!(
            out,
            "- {} {} ({}) {} {} {}",
            card.rank, card.horse, card.track, card.odds, card.icon, card.change
        );
    });

    write_section(&mut out, "Predictions", &view.predictions, |out, card| {
        let _ = writeln!(
            out,
            "- {} [{} {}] {}: {}",
            card.tip,
            card.badge,
            card.tier.as_str(),
            card.track,
            card.reason
        );
    });

    write_section(&mut out, "Roughies", &view.roughies, |out, card| {
        let _ = writeln!(
            out,
            "- {} {} ({}) @ {} [{}] {}",
            card.rank, card.horse, card.track, card.odds, card.badge, card.analysis
        );
    });

    out
}

fn write_section<T>(
    out: &mut String,
    title: &str,
    section: &Section<T>,
    mut write_card: impl FnMut(&mut String, &T),
) {
    let _ = writeln!(out, "\n{title}:");
    match section {
        Section::Placeholder(text) => {
            let _ = writeln!(out, "  {text}");
        }
        Section::Cards(cards) => {
            for card in cards {
                write_card(out, card);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{FeedStore, UiState};
    use crate::domain::{MarketMover, Roughie};
    use crate::ui::view::{build_view, NO_PREDICTIONS, NO_RACES};

    #[test]
    fn empty_view_lists_placeholders() {
        let text = render_text(&DashboardView::default());

        assert!(text.contains("Last update: never"));
        assert!(text.contains(&format!("Races:\n  {NO_RACES}")));
        assert!(text.contains(&format!("Predictions:\n  {NO_PREDICTIONS}")));
    }

    #[test]
    fn cards_render_one_line_each() {
        let feeds = FeedStore {
            movers: vec![MarketMover {
                position: 1,
                horse: "Night Raider".to_string(),
                track: "Flemington".to_string(),
                current_odds: 4.0,
                change: Some("+0.50".to_string()),
                direction: Some("up".to_string()),
            }],
            roughies: vec![Roughie {
                rank: 2,
                horse: "Long Shot".to_string(),
                track: "Doomben".to_string(),
                odds: 21.0,
                confidence: 35.0,
                analysis: "Drawn well".to_string(),
            }],
            ..FeedStore::default()
        };
        let text = render_text(&build_view(&feeds, &UiState::default()));

        assert!(text.contains("- #1 Night Raider (Flemington) 4.00 ▲ +0.50"));
        assert!(text.contains("- #2 Long Shot (Doomben) @ 21.00 [35%] Drawn well"));
        assert!(text.contains("Filter: All"));
    }
}
