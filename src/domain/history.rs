//! Bounded per-instrument history of completed bars.

use crate::domain::bar::Bar;
use std::collections::VecDeque;

/// Completed bars kept per instrument; enough for a 50-period EMA plus
/// generous warm-up for MACD on top.
pub const HISTORY_CAPACITY: usize = 200;

/// FIFO ring of the most recent completed bars, oldest evicted on overflow.
/// Read-only for indicator computation.
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    bars: VecDeque<Bar>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HistoryBuffer {
            bars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, bar: Bar) {
        if self.capacity == 0 {
            return;
        }
        if self.bars.len() == self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar> {
        self.bars.iter()
    }

    pub fn to_vec(&self) -> Vec<Bar> {
        self.bars.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn make_bar(period_start: i64) -> Bar {
        Bar {
            instrument: "TQBR:SBER".into(),
            period_start,
            open: Decimal::from(100),
            high: Decimal::from(101),
            low: Decimal::from(99),
            close: Decimal::from(100),
            volume: 1000,
            complete: true,
        }
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut history = HistoryBuffer::new();
        for i in 0..5 {
            history.push(make_bar(i * 60));
        }

        let starts: Vec<i64> = history.iter().map(|b| b.period_start).collect();
        assert_eq!(starts, vec![0, 60, 120, 180, 240]);
        assert_eq!(history.last().unwrap().period_start, 240);
    }

    #[test]
    fn overflow_evicts_oldest() {
        let mut history = HistoryBuffer::with_capacity(3);
        for i in 0..5 {
            history.push(make_bar(i * 60));
        }

        assert_eq!(history.len(), 3);
        let starts: Vec<i64> = history.iter().map(|b| b.period_start).collect();
        assert_eq!(starts, vec![120, 180, 240]);
    }

    #[test]
    fn default_capacity_is_200() {
        let mut history = HistoryBuffer::new();
        for i in 0..250 {
            history.push(make_bar(i * 60));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next().unwrap().period_start, 50 * 60);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut history = HistoryBuffer::with_capacity(0);
        history.push(make_bar(0));
        assert!(history.is_empty());
    }
}
