//! The calendar widget and its date value type.

use std::{cell::RefCell, collections::BTreeSet, fmt, rc::Rc};

use crate::{
    control::Control,
    error::{Error, Result},
    handler::{Backend, Callback, CalendarHandler, ControlKind},
};

/// A calendar date. Construction validates the day against the month,
/// including leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    /// Year.
    year: i32,
    /// Month, 1 through 12.
    month: u8,
    /// Day of month, 1 through the month's length.
    day: u8,
}

impl Date {
    /// Construct a validated date.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::Invalid(format!("month {month}")));
        }
        if day < 1 || day > Self::days_in_month(year, month) {
            return Err(Error::Invalid(format!("day {day} of {year}-{month:02}")));
        }
        Ok(Self { year, month, day })
    }

    /// The number of days in a month.
    pub fn days_in_month(year: i32, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Gregorian leap-year rule.
    pub fn is_leap_year(year: i32) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    /// Year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1 through 12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of month.
    pub fn day(&self) -> u8 {
        self.day
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Portable calendar state.
struct CalendarState {
    /// The selected date.
    value: Date,
    /// Lower selectable bound, if any.
    min: Option<Date>,
    /// Upper selectable bound, if any.
    max: Option<Date>,
    /// Marked days of the displayed month.
    marked: BTreeSet<u8>,
    /// Value-changed notification.
    on_value_changed: Callback<Date>,
}

/// Shared calendar storage.
struct CalendarInner {
    /// The underlying control.
    ctrl: Control,
    /// Value, range and marks.
    state: RefCell<CalendarState>,
}

/// A date-picker widget.
#[derive(Clone)]
pub struct Calendar {
    /// Shared storage.
    inner: Rc<CalendarInner>,
}

impl Calendar {
    /// Construct a calendar showing `value`.
    pub fn new(backend: Rc<dyn Backend>, value: Date) -> Self {
        Self {
            inner: Rc::new(CalendarInner {
                ctrl: Control::new(backend, ControlKind::Calendar),
                state: RefCell::new(CalendarState {
                    value,
                    min: None,
                    max: None,
                    marked: BTreeSet::new(),
                    on_value_changed: Callback::new(),
                }),
            }),
        }
    }

    /// The underlying control.
    pub fn control(&self) -> &Control {
        &self.inner.ctrl
    }

    /// Run a closure against the backend's calendar capability, if present.
    fn with_calendar_handler<R>(
        &self,
        f: impl FnOnce(&mut dyn CalendarHandler) -> R,
    ) -> Option<R> {
        self.inner
            .ctrl
            .with_handler(|h, _| h.calendar().map(f))
            .flatten()
    }

    /// The selected date.
    pub fn value(&self) -> Date {
        self.inner.state.borrow().value
    }

    /// Select a date. Values outside the range are clamped to it.
    pub fn set_value(&self, value: Date) {
        let clamped = {
            let st = self.inner.state.borrow();
            Self::clamp(value, st.min, st.max)
        };
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if st.value == clamped {
                false
            } else {
                st.value = clamped;
                true
            }
        };
        if changed {
            self.with_calendar_handler(|c| c.value_applied(clamped));
            self.raise_value_changed(clamped);
        }
    }

    /// The selectable range.
    pub fn range(&self) -> (Option<Date>, Option<Date>) {
        let st = self.inner.state.borrow();
        (st.min, st.max)
    }

    /// Set the selectable range, clamping the current value into it.
    pub fn set_range(&self, min: Option<Date>, max: Option<Date>) -> Result<()> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(Error::Invalid(format!("range {min}..{max}")));
            }
        }
        {
            let mut st = self.inner.state.borrow_mut();
            st.min = min;
            st.max = max;
        }
        self.with_calendar_handler(|c| c.range_applied(min, max));
        let value = self.value();
        self.set_value(value);
        Ok(())
    }

    /// Clamp a date into an optional range.
    fn clamp(value: Date, min: Option<Date>, max: Option<Date>) -> Date {
        if let Some(min) = min {
            if value < min {
                return min;
            }
        }
        if let Some(max) = max {
            if value > max {
                return max;
            }
        }
        value
    }

    /// Mark or unmark a day of the displayed month.
    pub fn mark_day(&self, day: u8, marked: bool) -> Result<()> {
        if !(1..=31).contains(&day) {
            return Err(Error::Invalid(format!("day {day}")));
        }
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if marked {
                st.marked.insert(day)
            } else {
                st.marked.remove(&day)
            }
        };
        if changed {
            self.with_calendar_handler(|c| c.day_marked(day, marked));
        }
        Ok(())
    }

    /// The marked days, ascending.
    pub fn marked_days(&self) -> Vec<u8> {
        self.inner.state.borrow().marked.iter().copied().collect()
    }

    /// Raise the value-changed callback, re-entrancy safe.
    fn raise_value_changed(&self, value: Date) {
        let taken = self.inner.state.borrow_mut().on_value_changed.take_slot();
        if let Some(mut f) = taken {
            let mut arg = value;
            f(&mut arg);
            self.inner
                .state
                .borrow_mut()
                .on_value_changed
                .restore_slot(f);
        }
    }

    /// Subscribe to value changes. Single subscriber; replaces.
    pub fn set_on_value_changed(&self, f: impl FnMut(&mut Date) + 'static) {
        self.inner.state.borrow_mut().on_value_changed.set(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pless::PlessBackend;

    fn date(y: i32, m: u8, d: u8) -> Date {
        Date::new(y, m, d).unwrap()
    }

    #[test]
    fn date_validation() {
        assert!(Date::new(2024, 2, 29).is_ok());
        assert!(Date::new(2023, 2, 29).is_err());
        assert!(Date::new(1900, 2, 29).is_err());
        assert!(Date::new(2000, 2, 29).is_ok());
        assert!(Date::new(2024, 0, 1).is_err());
        assert!(Date::new(2024, 13, 1).is_err());
        assert!(Date::new(2024, 4, 31).is_err());
    }

    #[test]
    fn date_ordering_and_display() {
        assert!(date(2024, 1, 31) < date(2024, 2, 1));
        assert_eq!(date(2024, 5, 7).to_string(), "2024-05-07");
    }

    #[test]
    fn value_clamps_to_range() {
        let backend = PlessBackend::new();
        let cal = Calendar::new(backend.clone(), date(2024, 6, 15));
        cal.set_range(Some(date(2024, 6, 1)), Some(date(2024, 6, 30)))
            .unwrap();
        cal.set_value(date(2024, 7, 10));
        assert_eq!(cal.value(), date(2024, 6, 30));
        cal.set_value(date(2024, 5, 1));
        assert_eq!(cal.value(), date(2024, 6, 1));
    }

    #[test]
    fn shrinking_range_clamps_current_value() {
        let backend = PlessBackend::new();
        let cal = Calendar::new(backend.clone(), date(2024, 6, 15));
        cal.set_range(Some(date(2024, 6, 20)), None).unwrap();
        assert_eq!(cal.value(), date(2024, 6, 20));
        assert!(cal.set_range(Some(date(2024, 7, 1)), Some(date(2024, 6, 1))).is_err());
    }

    #[test]
    fn value_changed_fires_on_change_only() {
        let backend = PlessBackend::new();
        let cal = Calendar::new(backend.clone(), date(2024, 6, 15));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        cal.set_on_value_changed(move |d| seen2.borrow_mut().push(*d));
        cal.set_value(date(2024, 6, 16));
        cal.set_value(date(2024, 6, 16));
        assert_eq!(*seen.borrow(), vec![date(2024, 6, 16)]);
    }

    #[test]
    fn marks_forwarded_once() {
        let backend = PlessBackend::new();
        let cal = Calendar::new(backend.clone(), date(2024, 6, 15));
        backend.env().take_log();
        cal.mark_day(5, true).unwrap();
        cal.mark_day(5, true).unwrap();
        cal.mark_day(5, false).unwrap();
        assert!(cal.mark_day(0, true).is_err());
        assert_eq!(
            backend.env().take_log(),
            vec![
                "calendar: day 5 marked".to_string(),
                "calendar: day 5 unmarked".to_string(),
            ]
        );
        assert!(cal.marked_days().is_empty());
    }
}
