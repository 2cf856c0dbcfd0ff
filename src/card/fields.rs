use chrono::Datelike;

use crate::foundation::{
    core::Rect,
    error::{CardError, CardResult},
};

/// Server names offered by the server selector. The first entry means "not chosen".
pub const SERVERS: [&str; 18] = [
    "",
    "ブレスト",
    "横須賀",
    "トラック",
    "佐世保",
    "サモア",
    "呉",
    "ルルイエ",
    "舞鶴",
    "ラバウル",
    "大湊",
    "サンディエゴ",
    "鹿児島",
    "マドラス",
    "竹敷",
    "キール",
    "若松",
    "オデッサ",
];

/// First year accepted for the start date.
pub const FIRST_YEAR: u32 = 2017;

/// Last year accepted for the start date: the current local year.
pub fn current_year() -> u32 {
    u32::try_from(chrono::Local::now().year()).unwrap_or(FIRST_YEAR)
}

/// A named text region rendered onto the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    /// Player name.
    Commander,
    /// Server name.
    Server,
    /// Start date, synthesized from year/month/day.
    Date,
    /// Free-form, possibly multi-line comment.
    Comment,
}

impl TextField {
    /// All fields in draw order.
    pub const ALL: [TextField; 4] = [
        TextField::Commander,
        TextField::Server,
        TextField::Date,
        TextField::Comment,
    ];

    /// Fixed bounding box on the card.
    pub fn bounds(self) -> Rect {
        let (x, y, w, h) = match self {
            TextField::Commander => (700.0, 20.0, 185.0, 40.0),
            TextField::Server => (700.0, 73.0, 185.0, 40.0),
            TextField::Date => (700.0, 125.0, 185.0, 40.0),
            TextField::Comment => (577.0, 395.0, 308.0, 95.0),
        };
        Rect::new(x, y, x + w, y + h)
    }

    /// Stable lowercase name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            TextField::Commander => "commander",
            TextField::Server => "server",
            TextField::Date => "date",
            TextField::Comment => "comment",
        }
    }
}

/// A raw user input. Date sub-values are separate inputs joined into [`TextField::Date`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldInput {
    /// Commander name.
    Commander,
    /// Server name (free text; see also [`SERVERS`]).
    Server,
    /// Start year.
    Year,
    /// Start month.
    Month,
    /// Start day.
    Day,
    /// Comment text.
    Comment,
}

/// Year/month/day strings as entered.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateParts {
    /// Year, empty when unset.
    #[serde(default)]
    pub year: String,
    /// Month, empty when unset.
    #[serde(default)]
    pub month: String,
    /// Day, empty when unset.
    #[serde(default)]
    pub day: String,
}

impl DateParts {
    /// Slash-join the parts, stopping before the first empty one.
    ///
    /// An empty year yields an empty string; an empty month hides the day.
    pub fn joined(&self) -> String {
        if self.year.is_empty() {
            return String::new();
        }
        let mut out = self.year.clone();
        if self.month.is_empty() {
            return out;
        }
        out.push('/');
        out.push_str(&self.month);
        if !self.day.is_empty() {
            out.push('/');
            out.push_str(&self.day);
        }
        out
    }
}

/// Check a date sub-value against the selector ranges. Empty means "unset" and is valid.
pub fn validate_date_part(input: FieldInput, value: &str) -> CardResult<()> {
    if value.is_empty() {
        return Ok(());
    }
    let (label, min, max) = match input {
        FieldInput::Year => ("year", FIRST_YEAR, current_year()),
        FieldInput::Month => ("month", 1, 12),
        FieldInput::Day => ("day", 1, 31),
        _ => return Ok(()),
    };
    let n: u32 = value
        .parse()
        .map_err(|_| CardError::validation(format!("{label} must be a number, got '{value}'")))?;
    if n < min || n > max {
        return Err(CardError::validation(format!(
            "{label} {n} is out of range {min}..={max}"
        )));
    }
    Ok(())
}

/// Look up a server name by selector index.
pub fn server_name(index: usize) -> CardResult<&'static str> {
    SERVERS.get(index).copied().ok_or_else(|| {
        CardError::validation(format!(
            "server index {index} out of range (0..{})",
            SERVERS.len()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/card/fields.rs"]
mod tests;
