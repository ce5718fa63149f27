use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    #[serde(rename = "油そば")]
    AburaSoba,
    #[serde(rename = "スープカレー")]
    SoupCurry,
    #[serde(rename = "カツ丼")]
    Katsudon,
    #[serde(rename = "牛丼")]
    Gyudon,
    #[serde(rename = "ラーメン")]
    Ramen,
    #[serde(rename = "中華料理")]
    Chinese,
    #[serde(rename = "カレー")]
    Curry,
    #[serde(rename = "定食")]
    SetMeal,
    #[serde(rename = "スタミナ")]
    Stamina,
    #[serde(rename = "その他")]
    Other,
}

impl Genre {
    pub fn label(&self) -> &'static str {
        match self {
            Genre::AburaSoba => "油そば",
            Genre::SoupCurry => "スープカレー",
            Genre::Katsudon => "カツ丼",
            Genre::Gyudon => "牛丼",
            Genre::Ramen => "ラーメン",
            Genre::Chinese => "中華料理",
            Genre::Curry => "カレー",
            Genre::SetMeal => "定食",
            Genre::Stamina => "スタミナ",
            Genre::Other => "その他",
        }
    }

    /// Genres that are hearty on their own, before looking at reviews
    pub fn is_heavy(&self) -> bool {
        matches!(
            self,
            Genre::Ramen
                | Genre::Gyudon
                | Genre::Katsudon
                | Genre::SetMeal
                | Genre::Curry
                | Genre::Chinese
        )
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub struct GenreRule {
    pub genre: Genre,
    /// Substrings of the display name
    pub keywords: &'static [&'static str],
    /// Place types as reported by the places provider
    pub types: Option<&'static [&'static str]>,
}

impl GenreRule {
    pub fn matches(&self, name: &str, types: &[&str]) -> bool {
        self.keywords.iter().any(|k| name.contains(k))
            || self
                .types
                .is_some_and(|rule_types| rule_types.iter().any(|t| types.contains(t)))
    }
}

// Order is important! Specific genres must come before the broad ones,
// "カツ丼ラーメン" is a katsudon shop.
pub const GENRE_RULES: [GenreRule; 9] = [
    GenreRule {
        genre: Genre::AburaSoba,
        keywords: &["油そば", "まぜそば", "汁なし"],
        types: None,
    },
    GenreRule {
        genre: Genre::SoupCurry,
        keywords: &["スープカレー"],
        types: None,
    },
    GenreRule {
        genre: Genre::Katsudon,
        keywords: &["カツ丼", "かつ丼", "とんかつ", "豚カツ", "かつや"],
        types: None,
    },
    GenreRule {
        genre: Genre::Gyudon,
        keywords: &["牛丼", "吉野家", "すき家", "松屋"],
        types: None,
    },
    GenreRule {
        genre: Genre::Ramen,
        keywords: &["ラーメン", "らーめん", "中華そば", "つけ麺", "家系", "二郎"],
        types: Some(&["ramen_restaurant"]),
    },
    GenreRule {
        genre: Genre::Chinese,
        keywords: &["中華", "餃子", "飯店", "担々麺"],
        types: Some(&["chinese_restaurant"]),
    },
    GenreRule {
        genre: Genre::Curry,
        keywords: &["カレー", "CoCo壱"],
        types: Some(&["indian_restaurant"]),
    },
    GenreRule {
        genre: Genre::SetMeal,
        keywords: &["定食", "食堂", "やよい軒", "大戸屋"],
        types: None,
    },
    GenreRule {
        genre: Genre::Stamina,
        keywords: &["スタミナ", "焼肉", "ステーキ", "ホルモン", "ハンバーグ"],
        types: Some(&["steak_house", "barbecue_restaurant"]),
    },
];

/// Assign exactly one genre to a place, falling back to [`Genre::Other`]
pub fn classify_genre(name: &str, types: &[String], primary_type: &str) -> Genre {
    let all_types = types
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(primary_type))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();

    GENRE_RULES
        .iter()
        .find(|rule| rule.matches(name, &all_types))
        .map(|rule| rule.genre)
        .unwrap_or(Genre::Other)
}
