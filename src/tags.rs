use crate::genre::Genre;

pub struct GatsuTag {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

pub const GATSU_TAGS: [GatsuTag; 6] = [
    GatsuTag {
        label: "🍚 ライス無料",
        keywords: &[
            "ライス無料",
            "ご飯無料",
            "ライスおかわり",
            "ご飯おかわり",
            "ライスサービス",
            "おかわり自由",
        ],
    },
    GatsuTag {
        label: "🍜 大盛り無料",
        keywords: &["大盛り無料", "大盛無料", "麺大盛り無料", "特盛無料", "増量無料"],
    },
    GatsuTag {
        label: "🐷 背脂たっぷり",
        keywords: &["背脂", "アブラ", "ギトギト", "こってり", "チャッチャ系", "背あぶら"],
    },
    GatsuTag {
        label: "🥩 肉厚・爆肉",
        keywords: &[
            "肉厚",
            "チャーシュー厚",
            "肉盛",
            "爆肉",
            "ステーキ",
            "塊肉",
            "肉たっぷり",
        ],
    },
    GatsuTag {
        label: "🔥 ジャンク",
        keywords: &["ジャンキー", "マシマシ", "二郎系", "パンチ", "濃い口", "ガツン"],
    },
    GatsuTag {
        label: "⚖️ デカ盛り",
        keywords: &["デカ盛り", "爆盛り", "メガ盛り", "重量級", "完食困難", "ギガ盛り"],
    },
];

/// Labels of every tag with a keyword somewhere in `text`, in table order
pub fn detect_gatsu_tags(text: &str) -> Vec<&'static str> {
    if text.is_empty() {
        return vec![];
    }

    GATSU_TAGS
        .iter()
        .filter(|tag| tag.keywords.iter().any(|k| text.contains(k)))
        .map(|tag| tag.label)
        .collect()
}

const MAX_GATSU_INDEX: f64 = 99.0;

/// Heartiness score from 0 to 99.
///
/// Heavy genres start higher, well reviewed places get up to `rating * 10`
/// extra (review count saturates at 100), and places a couple of minutes
/// from the station get a bonus. A walk time of 0 means unknown.
pub fn gatsu_index(genre: Genre, rating: f64, review_count: u32, walk_minutes: u32) -> u32 {
    let mut score = if genre.is_heavy() { 50.0 } else { 20.0 };

    score += rating * (review_count.min(100) as f64 / 10.0);

    score += match walk_minutes {
        0 => 0.0,
        1..=2 => 20.0,
        3..=5 => 10.0,
        _ => 0.0,
    };

    score.min(MAX_GATSU_INDEX).floor() as u32
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_detect_tags() {
        let tags = detect_gatsu_tags("ライス無料！背脂たっぷりのこってりラーメン");
        assert_eq!(tags, vec!["🍚 ライス無料", "🐷 背脂たっぷり"]);
    }

    #[test]
    fn test_detect_tags_table_order() {
        let tags = detect_gatsu_tags("メガ盛り 二郎系 肉厚チャーシュー");
        assert_eq!(tags, vec!["🥩 肉厚・爆肉", "🔥 ジャンク", "⚖️ デカ盛り"]);
    }

    #[test]
    fn test_detect_tags_none() {
        assert!(detect_gatsu_tags("").is_empty());
        assert!(detect_gatsu_tags("静かなカフェ").is_empty());
    }

    #[test]
    fn test_gatsu_index_base() {
        assert_eq!(gatsu_index(Genre::Ramen, 0.0, 0, 0), 50);
        assert_eq!(gatsu_index(Genre::Other, 0.0, 0, 0), 20);
        // stamina is hearty but not in the heavy list
        assert_eq!(gatsu_index(Genre::Stamina, 0.0, 0, 0), 20);
    }

    #[test]
    fn test_gatsu_index_popularity() {
        // 3.5 * 40 / 10 = 14
        assert_eq!(gatsu_index(Genre::Other, 3.5, 40, 0), 34);
        // reviews saturate at 100
        assert_eq!(gatsu_index(Genre::Other, 3.0, 100, 0), gatsu_index(Genre::Other, 3.0, 5000, 0));
    }

    #[test]
    fn test_gatsu_index_walk_bonus() {
        assert_eq!(gatsu_index(Genre::Other, 0.0, 0, 1), 40);
        assert_eq!(gatsu_index(Genre::Other, 0.0, 0, 2), 40);
        assert_eq!(gatsu_index(Genre::Other, 0.0, 0, 5), 30);
        assert_eq!(gatsu_index(Genre::Other, 0.0, 0, 6), 20);
    }

    #[test]
    fn test_gatsu_index_capped() {
        assert_eq!(gatsu_index(Genre::Ramen, 5.0, 1000, 1), 99);
    }
}
