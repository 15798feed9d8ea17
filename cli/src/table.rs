// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::{Color, Colorize};
use unicode_width::UnicodeWidthStr;

/// A column of a table over rows of type `T`.
pub trait TableColumn<T> {
    fn name(&self) -> Cow<'_, str>;

    fn format<'a>(&self, data: &'a T) -> Cow<'a, str>;

    fn padding_direction(&self) -> PaddingDirection {
        PaddingDirection::Left
    }

    fn get_color(&self, _data: &T) -> Option<Color> {
        None
    }
}

/// Plain text table with aligned columns.
pub struct Table<'a, T, C: TableColumn<T>> {
    columns: &'a [C],
    data: &'a [T],
    separator: &'a str,
    header: bool,
}

impl<'a, T, C: TableColumn<T>> Table<'a, T, C> {
    pub fn new(columns: &'a [C], data: &'a [T]) -> Self {
        Self {
            columns,
            data,
            separator: " ",
            header: false,
        }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }
}

impl<T, C: TableColumn<T>> fmt::Display for Table<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<Vec<Cow<'_, str>>> = self
            .data
            .iter()
            .map(|row| self.columns.iter().map(|col| col.format(row)).collect())
            .collect();

        let headers: Vec<Cow<'_, str>> = self.columns.iter().map(|col| col.name()).collect();
        let widths = column_widths(self.header.then_some(&headers), &rows, self.columns.len());

        if self.header {
            let cells = headers.iter().enumerate().map(|(i, name)| {
                let cell = self.pad(i, name, widths[i]);
                cell.bold().to_string()
            });
            self.write_row(f, cells)?;
        }

        for (row, data) in rows.iter().zip(self.data) {
            let cells = row.iter().enumerate().map(|(i, cell)| {
                let cell = self.pad(i, cell, widths[i]);
                match self.columns[i].get_color(data) {
                    Some(color) => cell.color(color).to_string(),
                    None => cell,
                }
            });
            self.write_row(f, cells)?;
        }
        Ok(())
    }
}

impl<T, C: TableColumn<T>> Table<'_, T, C> {
    fn pad(&self, i: usize, cell: &str, width: usize) -> String {
        let padding = width.saturating_sub(cell.width());
        let is_last = i + 1 == self.columns.len();
        match self.columns[i].padding_direction() {
            // Last column does not need padding if it's left-aligned
            PaddingDirection::Left if is_last => cell.to_string(),
            PaddingDirection::Left => format!("{cell}{}", " ".repeat(padding)),
            PaddingDirection::Right => format!("{}{cell}", " ".repeat(padding)),
        }
    }

    fn write_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        cells: impl Iterator<Item = String>,
    ) -> fmt::Result {
        for (i, cell) in cells.enumerate() {
            if i > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{cell}")?;
        }
        writeln!(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddingDirection {
    Left,
    Right,
}

fn column_widths<'c>(
    header: Option<&Vec<Cow<'c, str>>>,
    rows: &[Vec<Cow<'c, str>>],
    n: usize,
) -> Vec<usize> {
    let mut widths = vec![0; n];
    for row in header.into_iter().chain(rows) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }
    widths
}
