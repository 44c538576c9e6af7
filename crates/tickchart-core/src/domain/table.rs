use serde::{Deserialize, Serialize};

use crate::SessionDate;

/// One weekly row of the price dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: SessionDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Typed dataset rows in exactly the order the source returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeriesTable {
    rows: Vec<PriceRow>,
}

impl TimeSeriesTable {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[PriceRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&PriceRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&PriceRow> {
        self.rows.last()
    }

    /// Earliest date regardless of source ordering.
    pub fn earliest_date(&self) -> Option<SessionDate> {
        self.rows.iter().map(|row| row.date).min()
    }

    pub fn dates(&self) -> impl DoubleEndedIterator<Item = SessionDate> + ExactSizeIterator + '_ {
        self.rows.iter().map(|row| row.date)
    }

    pub fn column(
        &self,
        pick: fn(&PriceRow) -> f64,
    ) -> impl DoubleEndedIterator<Item = f64> + ExactSizeIterator + '_ {
        self.rows.iter().map(pick)
    }
}

impl FromIterator<PriceRow> for TimeSeriesTable {
    fn from_iter<I: IntoIterator<Item = PriceRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, open: f64) -> PriceRow {
        PriceRow {
            date: SessionDate::parse(date).expect("date"),
            open,
            high: open + 1.0,
            low: open - 1.0,
            close: open,
        }
    }

    #[test]
    fn preserves_source_order() {
        let table = TimeSeriesTable::new(vec![row("2020-01-13", 2.0), row("2020-01-06", 1.0)]);

        assert_eq!(table.first().map(|r| r.open), Some(2.0));
        assert_eq!(table.last().map(|r| r.open), Some(1.0));
        assert_eq!(
            table.earliest_date().map(|d| d.to_string()).as_deref(),
            Some("2020-01-06")
        );
    }
}
