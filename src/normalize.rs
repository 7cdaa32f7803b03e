//! Stage, team and city normalization, one strategy per source era.
//!
//! The eras deliberately do not share alias tables or missing-value
//! sentinels. The historical stage normalizer maps a missing label to `""`
//! while every later era maps it to `"unknown"`; downstream output depends
//! on both behaviors, so each era keeps its own [`FieldNormalizer`].

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::gazetteer::Gazetteer;
use crate::types::Era;

/// Sentinel for missing later-era fields and missing cities.
pub const UNKNOWN: &str = "unknown";

/// Per-era normalization strategy.
pub trait FieldNormalizer {
    fn era(&self) -> Era;
    fn stage(&self, raw: Option<&str>) -> String;
    fn team(&self, raw: Option<&str>) -> String;
    fn city(&self, raw: Option<&str>) -> String;
}

// === Shared text helpers ===

/// Transliterate to ASCII: decompose, drop combining marks, and spell out
/// the few letters that have no decomposition. Anything else non-ASCII is
/// dropped.
pub fn transliterate(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.nfd() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        if is_combining_mark(c) {
            continue;
        }
        let spelled = match c {
            'ø' => "o",
            'Ø' => "O",
            'ß' => "ss",
            'æ' => "ae",
            'Æ' => "AE",
            'œ' => "oe",
            'Œ' => "OE",
            'ł' => "l",
            'Ł' => "L",
            'đ' | 'ð' => "d",
            'Đ' | 'Ð' => "D",
            'ı' => "i",
            'þ' => "th",
            'Þ' => "TH",
            '\u{2013}' | '\u{2014}' => "-",
            '\u{2018}' | '\u{2019}' => "'",
            '\u{a0}' => " ",
            _ => "",
        };
        out.push_str(spelled);
    }
    out
}

/// Blank-aware view of an optional raw field.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Base city normalization shared by every era: transliterate, lowercase,
/// trim, and remove `.` and `_`. Blank input yields [`UNKNOWN`].
pub fn normalize_city(raw: Option<&str>) -> String {
    let Some(city) = non_blank(raw) else {
        return UNKNOWN.to_string();
    };
    let cleaned: String = transliterate(city)
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != '_')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        UNKNOWN.to_string()
    } else {
        cleaned.to_string()
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

// === Historical (1930-2010) ===

/// Case-insensitive aliases for the historical team labels.
pub const HISTORICAL_TEAM_ALIASES: &[(&str, &str)] = &[
    ("USA", "United States"),
    ("FRG", "West Germany"),
    ("GDR", "East Germany"),
    ("Serbia-Montenegro", "Serbia and Montenegro"),
    ("Ireland", "Republic of Ireland"),
];

/// Shared output vocabulary for historical stage labels.
const HISTORICAL_CANONICAL_STAGES: &[(&str, &str)] = &[
    ("group stage", "group"),
    ("quarter-finals", "quarter-final"),
    ("semi-finals", "semi-final"),
    ("third-place match", "play-off for third place"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoricalNormalizer;

impl FieldNormalizer for HistoricalNormalizer {
    fn era(&self) -> Era {
        Era::Historical
    }

    /// Ordered contains-tests; first match wins.
    fn stage(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        let r = raw.trim().to_uppercase();

        let label = if r.contains("GROUP") && r.contains("STAGE") {
            "group stage"
        } else if r.contains("1/8") || r.contains("FIRST") || r.contains("ROUND OF 16") {
            "round of 16"
        } else if r.contains("1/4") || r.contains("QUARTER") {
            "quarter-finals"
        } else if r.contains("1/2") || r.contains("SEMI") {
            "semi-finals"
        } else if r.contains("PLACES_3") || r.contains("3RD") || r.contains("THIRD") {
            "third-place match"
        } else if r.contains("QUARTERFINAL_STAGE") || r.contains("SEMIFINAL_STAGE") {
            "second group stage"
        } else if r.contains("FINAL_ROUND") {
            "final round"
        } else if r == "FINAL" {
            "final"
        } else {
            return r.to_lowercase();
        };
        label.to_string()
    }

    fn team(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        let team = raw.trim();
        let team = team.split('(').next().unwrap_or(team).trim();

        HISTORICAL_TEAM_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(team))
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or_else(|| team.to_string())
    }

    fn city(&self, raw: Option<&str>) -> String {
        normalize_city(raw)
    }
}

impl HistoricalNormalizer {
    /// Map a reconciliation stage label to the shared output vocabulary.
    pub fn canonical_stage(&self, stage: &str) -> String {
        let stage = collapse_whitespace(&stage.to_lowercase());
        lookup(HISTORICAL_CANONICAL_STAGES, &stage)
            .map(str::to_string)
            .unwrap_or(stage)
    }

    /// Output form of a team name: ASCII lowercase, alphanumerics and
    /// single spaces only.
    pub fn canonical_team(&self, team: Option<&str>) -> String {
        let Some(team) = non_blank(team) else {
            return UNKNOWN.to_string();
        };
        let cleaned: String = transliterate(team)
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
            .collect();
        let cleaned = collapse_whitespace(&cleaned);
        if cleaned.is_empty() {
            UNKNOWN.to_string()
        } else {
            cleaned
        }
    }

    /// Output form of a city: letters, spaces and hyphens only.
    pub fn canonical_city(&self, city: Option<&str>) -> String {
        let base = normalize_city(city);
        let cleaned: String = base
            .chars()
            .filter(|c| c.is_ascii_lowercase() || *c == '-' || c.is_whitespace())
            .collect();
        let cleaned = collapse_whitespace(&cleaned);
        if cleaned.is_empty() {
            UNKNOWN.to_string()
        } else {
            cleaned
        }
    }
}

// === 2014 ===

const BRAZIL_2014_STAGES: &[(&str, &str)] = &[
    ("group a", "group"),
    ("group b", "group"),
    ("group c", "group"),
    ("group d", "group"),
    ("group e", "group"),
    ("group f", "group"),
    ("group g", "group"),
    ("group h", "group"),
    ("round16", "round of 16"),
    ("round of 16", "round of 16"),
    ("quarter-finals", "quarter-final"),
    ("quarter-final", "quarter-final"),
    ("semi-finals", "semi-final"),
    ("semi-final", "semi-final"),
    ("final", "final"),
    ("play-off for third place", "play-off for third place"),
];

/// Lowercase-keyed fixes for the 2014 export, including scrape artefacts.
pub const BRAZIL_2014_TEAM_ALIASES: &[(&str, &str)] = &[
    ("rn\">bosnia and herzegovina", "bosnia and herzegovina"),
    ("cote d'ivoire", "ivory coast"),
    ("ir iran", "iran"),
    ("korea republic", "south korea"),
    ("usa", "united states"),
    ("china pr", "china"),
];

/// 2014 strategy; cities are resolved against an injected gazetteer.
#[derive(Debug, Clone, Copy)]
pub struct Brazil2014Normalizer<'g> {
    gazetteer: &'g Gazetteer,
}

impl<'g> Brazil2014Normalizer<'g> {
    pub fn new(gazetteer: &'g Gazetteer) -> Self {
        Self { gazetteer }
    }
}

impl FieldNormalizer for Brazil2014Normalizer<'_> {
    fn era(&self) -> Era {
        Era::Brazil2014
    }

    fn stage(&self, raw: Option<&str>) -> String {
        let Some(stage) = non_blank(raw) else {
            return UNKNOWN.to_string();
        };
        let stage = collapse_whitespace(&stage.to_lowercase().replace('_', " "));
        lookup(BRAZIL_2014_STAGES, &stage)
            .map(str::to_string)
            .unwrap_or(stage)
    }

    fn team(&self, raw: Option<&str>) -> String {
        let Some(team) = non_blank(raw) else {
            return UNKNOWN.to_string();
        };
        let team = transliterate(team).to_lowercase().trim().to_string();
        lookup(BRAZIL_2014_TEAM_ALIASES, &team)
            .map(str::to_string)
            .unwrap_or(team)
    }

    fn city(&self, raw: Option<&str>) -> String {
        let city = normalize_city(raw);
        if city == UNKNOWN {
            return city;
        }
        self.gazetteer
            .resolve(&city)
            .map(str::to_string)
            .unwrap_or(city)
    }
}

// === 2018 and 2022 ===

/// Lowercase-keyed aliases for the 2018 and 2022 sources.
pub const LATER_ERA_TEAM_ALIASES: &[(&str, &str)] = &[
    ("ir iran", "iran"),
    ("korea republic", "south korea"),
];

fn later_era_team(raw: Option<&str>) -> String {
    let Some(team) = non_blank(raw) else {
        return UNKNOWN.to_string();
    };
    let team = team.to_lowercase();
    lookup(LATER_ERA_TEAM_ALIASES, &team)
        .map(str::to_string)
        .unwrap_or(team)
}

const RUSSIA_2018_STAGES: &[(&str, &str)] = &[
    ("round 16", "round of 16"),
    ("round of 16", "round of 16"),
    ("round 8", "quarter-final"),
    ("quarter-finals", "quarter-final"),
    ("quarter-final", "quarter-final"),
    ("round 4", "semi-final"),
    ("semi-finals", "semi-final"),
    ("semi-final", "semi-final"),
    ("round 2 loser", "play-off for third place"),
    ("third place play-off", "play-off for third place"),
    ("play-off for third place", "play-off for third place"),
    ("round 2", "final"),
    ("final", "final"),
];

/// 2018 strategy. Stage input is a group name (`Group A`) or a knockout
/// section key/name (`round_16`, `Quarter-finals`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Russia2018Normalizer;

impl FieldNormalizer for Russia2018Normalizer {
    fn era(&self) -> Era {
        Era::Russia2018
    }

    fn stage(&self, raw: Option<&str>) -> String {
        let Some(stage) = non_blank(raw) else {
            return UNKNOWN.to_string();
        };
        let stage = collapse_whitespace(&stage.to_lowercase().replace('_', " "));
        if stage == "group" || stage.starts_with("group ") {
            return "group".to_string();
        }
        lookup(RUSSIA_2018_STAGES, &stage)
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    fn team(&self, raw: Option<&str>) -> String {
        later_era_team(raw)
    }

    fn city(&self, raw: Option<&str>) -> String {
        normalize_city(raw)
    }
}

const QATAR_2022_STAGES: &[(&str, &str)] = &[
    ("group", "group"),
    ("group a", "group"),
    ("group b", "group"),
    ("group c", "group"),
    ("group d", "group"),
    ("group e", "group"),
    ("group f", "group"),
    ("group g", "group"),
    ("group h", "group"),
    ("round of 16", "round of 16"),
    ("quarter-final", "quarter-final"),
    ("semi-final", "semi-final"),
    ("play-off for third place", "play-off for third place"),
    ("final", "final"),
];

/// 2022 strategy. Unmapped stages become `unknown` rather than passing
/// through.
#[derive(Debug, Clone, Copy, Default)]
pub struct Qatar2022Normalizer;

impl FieldNormalizer for Qatar2022Normalizer {
    fn era(&self) -> Era {
        Era::Qatar2022
    }

    fn stage(&self, raw: Option<&str>) -> String {
        let Some(stage) = non_blank(raw) else {
            return UNKNOWN.to_string();
        };
        lookup(QATAR_2022_STAGES, &stage.to_lowercase())
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    fn team(&self, raw: Option<&str>) -> String {
        later_era_team(raw)
    }

    fn city(&self, raw: Option<&str>) -> String {
        normalize_city(raw)
    }
}
