//! Dated curve points.

use serde::{Deserialize, Serialize};
use tenor_core::daycounts::DayCount;
use tenor_core::Date;

use crate::error::{CurveError, CurveResult};

/// A single curve point: a date, the solved value and the instrument it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPoint {
    /// Pillar date.
    pub date: Date,
    /// Stored value, in the space of the curve's underlying quantity.
    pub value: f64,
    /// Identifier of the instrument that fixed this point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl TermPoint {
    /// Creates an anonymous point.
    #[must_use]
    pub fn new(date: Date, value: f64) -> Self {
        Self {
            date,
            value,
            id: None,
        }
    }

    /// Tags the point with an instrument identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Points sorted strictly ascending by date.
///
/// Construction either validates ordering ([`from_points`](Self::from_points),
/// [`push`](Self::push)) or establishes it
/// ([`from_unsorted`](Self::from_unsorted)); no other mutation is exposed, so
/// the ordering always holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TermPoint>", into = "Vec<TermPoint>")]
pub struct TermFunction {
    points: Vec<TermPoint>,
}

impl TermFunction {
    /// Creates an empty term function.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from points that must already be strictly ascending.
    pub fn from_points(points: Vec<TermPoint>) -> CurveResult<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(CurveError::validation(format!(
                "term points not strictly ascending: {} then {}",
                pair[0].date, pair[1].date
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(CurveError::validation(format!(
                "non-finite value at {}",
                p.date
            )));
        }
        Ok(Self { points })
    }

    /// Sorts by date and keeps the last point given for each date.
    #[must_use]
    pub fn from_unsorted(mut points: Vec<TermPoint>) -> Self {
        points.reverse();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { points }
    }

    /// Appends a point after the last one.
    pub fn push(&mut self, point: TermPoint) -> CurveResult<()> {
        if let Some(last) = self.points.last() {
            if point.date <= last.date {
                return Err(CurveError::validation(format!(
                    "point at {} does not follow {}",
                    point.date, last.date
                )));
            }
        }
        self.points.push(point);
        Ok(())
    }

    /// The points, ascending.
    #[must_use]
    pub fn points(&self) -> &[TermPoint] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Pillar dates.
    #[must_use]
    pub fn dates(&self) -> Vec<Date> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Stored values.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Pillar times in years from `base` under `day_count`.
    #[must_use]
    pub fn times(&self, base: Date, day_count: &dyn DayCount) -> Vec<f64> {
        self.points
            .iter()
            .map(|p| day_count.year_fraction_f64(base, p.date))
            .collect()
    }

    /// Value stored exactly at `date`.
    #[must_use]
    pub fn value_at(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }

    /// First point.
    #[must_use]
    pub fn first(&self) -> Option<&TermPoint> {
        self.points.first()
    }

    /// Last point.
    #[must_use]
    pub fn last(&self) -> Option<&TermPoint> {
        self.points.last()
    }
}

impl TryFrom<Vec<TermPoint>> for TermFunction {
    type Error = CurveError;

    fn try_from(points: Vec<TermPoint>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<TermFunction> for Vec<TermPoint> {
    fn from(function: TermFunction) -> Self {
        function.points
    }
}
