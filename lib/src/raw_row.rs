use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// One loosely typed spreadsheet cell.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Cell>),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::List(items) => items.iter().all(Cell::is_empty),
            Cell::Bool(_) | Cell::Number(_) => false,
        }
    }

    /// Trimmed text form of the cell, `None` when there is nothing in it.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(text) => {
                let trimmed = text.trim();

                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
            Cell::Number(number) => Some(format_number(*number)),
            Cell::Bool(value) => Some(value.to_string()),
            Cell::List(_) => {
                let items = self.to_list(&[]);

                (!items.is_empty()).then(|| items.join(", "))
            }
        }
    }

    /// Numeric reading of the cell. Text is parsed after trimming, booleans
    /// count as 1 and 0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(number) => Some(*number),
            Cell::Text(text) => text.trim().parse::<f64>().ok(),
            Cell::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            Cell::Empty | Cell::List(_) => None,
        }
    }

    /// Splits the cell into trimmed, non-empty tokens.
    ///
    /// Lists are taken item by item, text is split on any of `separators`,
    /// and any other scalar becomes a single token.
    pub fn to_list(&self, separators: &[char]) -> Vec<String> {
        match self {
            Cell::Empty => Vec::new(),
            Cell::List(items) => items.iter().filter_map(Cell::as_text).collect(),
            Cell::Text(text) => text
                .split(|c: char| separators.contains(&c))
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_owned)
                .collect(),
            scalar => scalar.as_text().into_iter().collect(),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_owned())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(number: f64) -> Self {
        Cell::Number(number)
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// One spreadsheet row keyed by header, in column order.
///
/// Header lookups ignore case and surrounding whitespace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, Cell)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: impl Into<String>, cell: impl Into<Cell>) {
        self.cells.push((header.into(), cell.into()));
    }

    pub fn with(mut self, header: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.push(header, cell);
        self
    }

    pub fn get(&self, header: &str) -> Option<&Cell> {
        let wanted = header.trim();

        self.cells
            .iter()
            .find(|(name, _)| name.trim().eq_ignore_ascii_case(wanted))
            .map(|(_, cell)| cell)
    }

    /// First non-empty cell among `headers`, tried in order.
    pub fn first_non_empty(&self, headers: &[&str]) -> Option<&Cell> {
        headers
            .iter()
            .filter_map(|header| self.get(header))
            .find(|cell| !cell.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(header, cell)| (header.as_str(), cell))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, cell)| cell.is_empty())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, Cell)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, Cell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawRowVisitor;

        impl<'de> Visitor<'de> for RawRowVisitor {
            type Value = RawRow;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping column headers to cell values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut row = RawRow::new();

                while let Some((header, cell)) = map.next_entry::<String, Cell>()? {
                    row.push(header, cell);
                }

                Ok(row)
            }
        }

        deserializer.deserialize_map(RawRowVisitor)
    }
}
