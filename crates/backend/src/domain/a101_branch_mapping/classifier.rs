use contracts::enums::Branch;

use super::mapping::LocalityMapping;

/// Определяет филиал по населенному пункту.
///
/// 1. Пусто → "Прочие".
/// 2. Точное совпадение (без учета регистра) с первой подходящей записью.
/// 3. Иначе первая по порядку запись, чей населенный пункт входит в строку.
/// 4. Нет совпадения или филиал не из списка → "Прочие".
///
/// Подстрочный поиск — линейный проход по таблице: при совпадении нескольких
/// записей результат определяется порядком строк в файле привязки.
pub fn classify(locality: Option<&str>, mapping: &LocalityMapping) -> Branch {
    let locality = match locality {
        Some(l) if !l.is_empty() => l.to_lowercase(),
        _ => return Branch::Other,
    };

    let entries = mapping.entries();
    let matched = entries
        .iter()
        .find(|e| e.locality == locality)
        .or_else(|| entries.iter().find(|e| locality.contains(e.locality.as_str())));

    match matched {
        Some(entry) => Branch::from_name_or_other(&entry.branch),
        None => Branch::Other,
    }
}
