use chrono::{DateTime, Utc};

/// Подпись для реестра, который еще ни разу не обновлялся
pub const NEVER_UPDATED: &str = "никогда";

/// Форматирует число с разделителями тысяч (точками)
///
/// `format_number(1234567)` → `"1.234.567"`
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Время последнего обновления для отображения пользователю
pub fn format_last_update(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => NEVER_UPDATED.to_string(),
    }
}
