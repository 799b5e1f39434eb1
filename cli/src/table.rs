// SPDX-FileCopyrightText: 2026 daymark contributors
//
// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::fmt;

use unicode_width::UnicodeWidthStr;

/// One renderable column of a table.
pub trait TableColumn<T> {
    fn name(&self) -> Cow<'_, str>;
    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;
    fn padding_direction(&self) -> PaddingDirection;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// Rows of cells separated by two spaces, columns padded to their widest
/// cell. Widths are measured with `unicode-width` so East Asian titles
/// line up.
#[derive(Debug, Clone, Copy)]
pub struct TableStyleBasic {
    separator: &'static str,
}

impl TableStyleBasic {
    pub fn new() -> Self {
        Self { separator: "  " }
    }
}

/// One JSON array of objects, keyed by column name.
#[derive(Debug, Clone, Copy)]
pub struct TableStyleJson;

impl TableStyleJson {
    pub fn new() -> Self {
        Self
    }
}

pub struct Table<'a, S, T, C: TableColumn<T>> {
    style: S,
    columns: &'a [C],
    data: &'a [T],
}

impl<'a, S, T, C: TableColumn<T>> Table<'a, S, T, C> {
    pub fn new(style: S, columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            style,
            columns,
            data,
        }
    }

    fn cells(&self) -> Vec<Vec<Cow<'_, str>>> {
        self.data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect()
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, TableStyleBasic, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.cells();

        let mut widths = vec![0; self.columns.len()];
        for row in &table {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.width());
            }
        }

        for (r, row) in table.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            for (i, (col, cell)) in self.columns.iter().zip(row).enumerate() {
                if i > 0 {
                    write!(f, "{}", self.style.separator)?;
                }
                let last = i == self.columns.len() - 1;
                let pad = widths[i].saturating_sub(cell.width());
                match col.padding_direction() {
                    // Last left-aligned column needs no trailing padding.
                    PaddingDirection::Left if last => write!(f, "{cell}")?,
                    PaddingDirection::Left => write!(f, "{cell}{}", " ".repeat(pad))?,
                    PaddingDirection::Right => write!(f, "{}{cell}", " ".repeat(pad))?,
                }
            }
        }
        Ok(())
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, TableStyleJson, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<serde_json::Map<String, serde_json::Value>> = self
            .data
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|col| {
                        (
                            col.name().into_owned(),
                            serde_json::Value::String(col.format(row).into_owned()),
                        )
                    })
                    .collect()
            })
            .collect();

        let json = serde_json::to_string(&rows).map_err(|_| fmt::Error)?;
        write!(f, "{json}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair(&'static str, &'static str);

    enum PairColumn {
        First,
        Second,
    }

    impl TableColumn<Pair> for PairColumn {
        fn name(&self) -> Cow<'_, str> {
            match self {
                PairColumn::First => "first".into(),
                PairColumn::Second => "second".into(),
            }
        }

        fn format<'a>(&self, data: &'a Pair) -> Cow<'a, str> {
            match self {
                PairColumn::First => data.0.into(),
                PairColumn::Second => data.1.into(),
            }
        }

        fn padding_direction(&self) -> PaddingDirection {
            match self {
                PairColumn::First => PaddingDirection::Right,
                PairColumn::Second => PaddingDirection::Left,
            }
        }
    }

    #[test]
    fn test_basic_style_pads_columns() {
        let columns = [PairColumn::First, PairColumn::Second];
        let data = [Pair("1", "short"), Pair("1234", "longer cell")];
        let table = Table::new(TableStyleBasic::new(), &columns, &data);
        assert_eq!(table.to_string(), "   1  short\n1234  longer cell");
    }

    #[test]
    fn test_json_style_keys_by_column_name() {
        let columns = [PairColumn::First, PairColumn::Second];
        let data = [Pair("a", "b")];
        let table = Table::new(TableStyleJson::new(), &columns, &data);
        assert_eq!(table.to_string(), r#"[{"first":"a","second":"b"}]"#);
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let columns = [PairColumn::First, PairColumn::Second];
        let data: [Pair; 0] = [];
        let table = Table::new(TableStyleBasic::new(), &columns, &data);
        assert_eq!(table.to_string(), "");
    }
}
