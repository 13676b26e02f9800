use serde::{Deserialize, Serialize};

/// Филиалы, по которым распределяются закупки.
///
/// Набор фиксирован: последний вариант `Other` ("Прочие") принимает все
/// записи, которые не удалось отнести ни к одному филиалу.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Branch {
    #[serde(rename = "Адыгейские ЭС")]
    Adygei,
    #[serde(rename = "Армавирские ЭС")]
    Armavir,
    #[serde(rename = "Краснодарские ЭС")]
    Krasnodar,
    #[serde(rename = "Лабинские ЭС")]
    Labinsk,
    #[serde(rename = "Ленинградские ЭС")]
    Leningradskaya,
    #[serde(rename = "Славянские ЭС")]
    Slavyansk,
    #[serde(rename = "Сочинские ЭС")]
    Sochi,
    #[serde(rename = "Тимашевские ЭС")]
    Timashevsk,
    #[serde(rename = "Тихорецкие ЭС")]
    Tikhoretsk,
    #[serde(rename = "Усть-Лабинские ЭС")]
    UstLabinsk,
    #[serde(rename = "Юго-Западные ЭС")]
    SouthWest,
    #[serde(rename = "Прочие")]
    Other,
}

impl Branch {
    pub const COUNT: usize = 12;

    /// Все филиалы в порядке отображения
    pub const ALL: [Branch; Branch::COUNT] = [
        Branch::Adygei,
        Branch::Armavir,
        Branch::Krasnodar,
        Branch::Labinsk,
        Branch::Leningradskaya,
        Branch::Slavyansk,
        Branch::Sochi,
        Branch::Timashevsk,
        Branch::Tikhoretsk,
        Branch::UstLabinsk,
        Branch::SouthWest,
        Branch::Other,
    ];

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            Branch::Adygei => "Адыгейские ЭС",
            Branch::Armavir => "Армавирские ЭС",
            Branch::Krasnodar => "Краснодарские ЭС",
            Branch::Labinsk => "Лабинские ЭС",
            Branch::Leningradskaya => "Ленинградские ЭС",
            Branch::Slavyansk => "Славянские ЭС",
            Branch::Sochi => "Сочинские ЭС",
            Branch::Timashevsk => "Тимашевские ЭС",
            Branch::Tikhoretsk => "Тихорецкие ЭС",
            Branch::UstLabinsk => "Усть-Лабинские ЭС",
            Branch::SouthWest => "Юго-Западные ЭС",
            Branch::Other => "Прочие",
        }
    }

    /// Точное совпадение с названием филиала (с учетом регистра)
    pub fn from_name(name: &str) -> Option<Self> {
        Branch::ALL.into_iter().find(|b| b.display_name() == name)
    }

    /// Как `from_name`, но неизвестные названия уходят в "Прочие"
    pub fn from_name_or_other(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Branch::Other)
    }

    /// Все названия филиалов
    pub fn names() -> Vec<&'static str> {
        Branch::ALL.iter().map(|b| b.display_name()).collect()
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
