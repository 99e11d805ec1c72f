use crate::domain::RaceEvent;

/// Active filter on the races grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterKey {
    #[default]
    All,
    Featured,
    /// Track slug such as `moonee-valley`.
    Track(String),
}

impl FilterKey {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Self::All,
            "featured" => Self::Featured,
            slug => Self::Track(slug.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Featured => "featured",
            Self::Track(slug) => slug,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::All => "All".to_string(),
            Self::Featured => "Featured".to_string(),
            Self::Track(slug) => slug
                .split('-')
                .filter(|word| !word.is_empty())
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn for_track(track: &str) -> Self {
        Self::Track(track_slug(track))
    }

    /// Filter tabs for the current card: all, featured, then each track in first-seen order.
    pub fn available(races: &[RaceEvent]) -> Vec<Self> {
        let mut keys = vec![Self::All, Self::Featured];
        for race in races {
            if race.track.trim().is_empty() {
                continue;
            }
            let key = Self::for_track(&race.track);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    fn matches(&self, race: &RaceEvent) -> bool {
        match self {
            Self::All => true,
            Self::Featured => race.featured,
            Self::Track(slug) => track_slug(&race.track) == track_slug(slug),
        }
    }
}

/// Stable filter over the race list; never reorders.
pub fn filter_races<'a>(races: &'a [RaceEvent], filter: &FilterKey) -> Vec<&'a RaceEvent> {
    races.iter().filter(|race| filter.matches(race)).collect()
}

/// Lowercase, hyphen-joined track key. Hyphens and runs of whitespace are one separator.
pub fn track_slug(track: &str) -> String {
    track
        .to_lowercase()
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn race(id: &str, track: &str, featured: bool) -> RaceEvent {
        RaceEvent {
            id: id.to_string(),
            race: format!("{track} - Race {id}"),
            track: track.to_string(),
            distance: None,
            class: None,
            prize: None,
            going: None,
            featured,
            horses: Vec::new(),
            trend: None,
            trend_value: None,
        }
    }

    fn card() -> Vec<RaceEvent> {
        vec![
            race("1", "Randwick", true),
            race("2", "Moonee Valley", false),
            race("3", "Flemington", true),
            race("4", "Caulfield", false),
            race("5", "MOONEE VALLEY", true),
        ]
    }

    fn ids(races: &[&RaceEvent]) -> Vec<String> {
        races.iter().map(|race| race.id.clone()).collect()
    }

    #[test]
    fn all_is_identity() {
        let races = card();
        let filtered = filter_races(&races, &FilterKey::All);
        assert_eq!(ids(&filtered), vec!["1", "2", "3", "4", "5"]);

        assert!(filter_races(&[], &FilterKey::All).is_empty());
    }

    #[test]
    fn featured_keeps_flagged_races_in_order() {
        let races = card();
        let filtered = filter_races(&races, &FilterKey::Featured);
        assert_eq!(ids(&filtered), vec!["1", "3", "5"]);
    }

    #[test]
    fn track_slug_matches_case_insensitively() {
        let races = card();
        let filtered = filter_races(&races, &FilterKey::parse("moonee-valley"));
        assert_eq!(ids(&filtered), vec!["2", "5"]);

        let filtered = filter_races(&races, &FilterKey::parse("RANDWICK"));
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn unknown_track_yields_nothing() {
        let races = card();
        assert!(filter_races(&races, &FilterKey::parse("eagle-farm")).is_empty());
    }

    #[test]
    fn parse_round_trips_known_keys() {
        assert_eq!(FilterKey::parse("all"), FilterKey::All);
        assert_eq!(FilterKey::parse(" Featured "), FilterKey::Featured);
        assert_eq!(FilterKey::parse(""), FilterKey::All);
        assert_eq!(FilterKey::parse("caulfield").as_str(), "caulfield");
    }

    #[test]
    fn available_lists_each_track_once() {
        let races = card();
        let keys: Vec<String> = FilterKey::available(&races)
            .iter()
            .map(|key| key.as_str().to_string())
            .collect();
        assert_eq!(
            keys,
            vec![
                "all",
                "featured",
                "randwick",
                "moonee-valley",
                "flemington",
                "caulfield"
            ]
        );
    }

    #[test]
    fn every_track_tab_matches_the_races_it_came_from() {
        let races = vec![
            race("1", "Moonee-Valley", false),
            race("2", "Eagle  Farm", false),
            race("3", " Moonee Valley ", true),
        ];

        let keys = FilterKey::available(&races);
        let tracks: Vec<&str> = keys.iter().map(FilterKey::as_str).collect();
        assert_eq!(tracks, vec!["all", "featured", "moonee-valley", "eagle-farm"]);

        let valley = filter_races(&races, &FilterKey::parse("moonee-valley"));
        assert_eq!(ids(&valley), vec!["1", "3"]);
        let eagle = filter_races(&races, &FilterKey::parse("eagle-farm"));
        assert_eq!(ids(&eagle), vec!["2"]);
    }

    #[test]
    fn track_labels_are_title_cased() {
        assert_eq!(FilterKey::for_track("Moonee Valley").label(), "Moonee Valley");
        assert_eq!(FilterKey::Featured.label(), "Featured");
    }
}
