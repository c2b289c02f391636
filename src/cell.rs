//! Typed spreadsheet cells and their canonical text form.
//!
//! The comparison core only knows text fields. A reader for a typed format hands its
//! cells over as [`CellValue`]s and turns them into a [`Row`] with
//! [`Row::from_cells`], which renders every cell through [`CanonicalCellFormatter`].

use crate::row::Row;

/// Integral numbers below this magnitude are rendered without a decimal point.
const INTEGRAL_LIMIT: f64 = 1e15;
const FRACTION_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    /// A date cell, carried as the string the sheet displays.
    Date(String),
    /// A formula cell, carried as its computed display value.
    Formula(String),
}

pub trait CellVisitor {
    type Output;

    fn visit_empty(&mut self) -> Self::Output;
    fn visit_number(&mut self, value: f64) -> Self::Output;
    fn visit_text(&mut self, value: &str) -> Self::Output;
    fn visit_boolean(&mut self, value: bool) -> Self::Output;
    fn visit_date(&mut self, display: &str) -> Self::Output;
    fn visit_formula(&mut self, display: &str) -> Self::Output;
}

impl CellValue {
    pub fn accept<V: CellVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            CellValue::Empty => visitor.visit_empty(),
            CellValue::Number(value) => visitor.visit_number(*value),
            CellValue::Text(value) => visitor.visit_text(value),
            CellValue::Boolean(value) => visitor.visit_boolean(*value),
            CellValue::Date(display) => visitor.visit_date(display),
            CellValue::Formula(display) => visitor.visit_formula(display),
        }
    }

    pub fn to_field(&self) -> String {
        self.accept(&mut CanonicalCellFormatter)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalCellFormatter;

impl CellVisitor for CanonicalCellFormatter {
    type Output = String;

    fn visit_empty(&mut self) -> String {
        String::new()
    }

    fn visit_number(&mut self, value: f64) -> String {
        if value.is_finite() && value == value.floor() && value.abs() < INTEGRAL_LIMIT {
            return format!("{}", value as i64);
        }
        let mut rendered = format!("{:.*}", FRACTION_DIGITS, value);
        if rendered.contains('.') {
            let trimmed = rendered.trim_end_matches('0').trim_end_matches('.').len();
            rendered.truncate(trimmed);
        }
        rendered
    }

    fn visit_text(&mut self, value: &str) -> String {
        value.to_string()
    }

    fn visit_boolean(&mut self, value: bool) -> String {
        String::from(if value { "true" } else { "false" })
    }

    fn visit_date(&mut self, display: &str) -> String {
        display.to_string()
    }

    fn visit_formula(&mut self, display: &str) -> String {
        display.to_string()
    }
}

impl Row {
    pub fn from_cells<I: IntoIterator<Item = CellValue>>(cells: I) -> Self {
        cells.into_iter().map(|cell| cell.to_field()).collect()
    }
}
