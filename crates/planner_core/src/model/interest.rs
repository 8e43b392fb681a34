//! Interest tags chosen on first run and consulted by study tips.

/// Interest that adds the instrumental-music clause to study tips.
pub const INTEREST_MUSIC: &str = "ฟังเพลง";
/// Interest that adds the breathing clause to study tips.
pub const INTEREST_MINDFULNESS: &str = "นั่งสมาธิ/ฝึกสติ";
/// Interest that adds the practice-problem clause to computer study tips.
pub const INTEREST_CODING: &str = "เขียนโค้ด/ทำโปรเจกต์";

/// Catalogue offered when a new account picks its interests.
pub const DEFAULT_INTERESTS: [&str; 18] = [
    "อ่านหนังสือ",
    "เล่นกีฬา",
    INTEREST_MUSIC,
    "วาดรูป",
    INTEREST_CODING,
    "เล่นเกม",
    "ทำอาหาร",
    "อาสา/จิตอาสา",
    "ทำสวน/ปลูกต้นไม้",
    "ฝึกภาษา",
    INTEREST_MINDFULNESS,
    "เต้น",
    "ถ่ายภาพ",
    "โต้วาที",
    "สิ่งประดิษฐ์วิทย์",
    "ละครเวที/การแสดง",
    "ชมรมคณิต",
    "ชมรมดนตรี",
];

/// Normalizes interest input into an ordered, duplicate-free tag list.
///
/// Tags are trimmed, blanks are dropped, and the first occurrence wins.
pub fn normalize_interests<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}

/// Whether `interests` contains `tag` exactly.
pub fn has_interest(interests: &[String], tag: &str) -> bool {
    interests.iter().any(|interest| interest == tag)
}
