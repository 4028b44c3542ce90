use serde::{Deserialize, Serialize};

use super::{Clock, Observable, SubscriptionId, SystemClock};
use crate::models::visualization::{VisualizationQuery, VisualizationType};
use crate::types::{Coordinate, DateRange, Units, UnitsPatch};

/// Visualization drawer state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawerState {
    pub is_open: bool,
    pub coordinate: Coordinate,
    pub visualization_type: VisualizationType,
    pub date_range: DateRange,
    pub units: Units,
}

/// Active tab, date window and unit preferences for the data drawer
pub struct DrawerStore {
    inner: Observable<DrawerState>,
    clock: Box<dyn Clock>,
}

impl DrawerStore {
    pub fn new() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let visualization_type = VisualizationType::default();
        let state = DrawerState {
            is_open: false,
            coordinate: Coordinate::berlin(),
            visualization_type,
            date_range: visualization_type.default_date_range(clock.today()),
            units: Units::default(),
        };
        Self {
            inner: Observable::new(state),
            clock,
        }
    }

    pub fn state(&self) -> &DrawerState {
        self.inner.get()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&DrawerState) + 'static) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    pub fn set_open(&mut self, open: bool) {
        self.inner.update(|s| s.is_open = open);
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.inner.update(|s| s.coordinate = coordinate);
    }

    /// Switch tabs; the date range snaps to the new tab's default window
    pub fn set_visualization_type(&mut self, visualization_type: VisualizationType) {
        let range = visualization_type.default_date_range(self.clock.today());
        self.inner.update(|s| {
            s.visualization_type = visualization_type;
            s.date_range = range;
        });
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.inner.update(|s| s.date_range = range);
    }

    pub fn set_units(&mut self, patch: UnitsPatch) {
        self.inner.update(|s| s.units = s.units.merge(patch));
    }

    pub fn reset_date_range(&mut self) {
        let today = self.clock.today();
        self.inner
            .update(|s| s.date_range = s.visualization_type.default_date_range(today));
    }

    /// Open the drawer on a location and tab in one update
    pub fn open_for(&mut self, coordinate: Coordinate, visualization_type: VisualizationType) {
        let range = visualization_type.default_date_range(self.clock.today());
        self.inner.update(|s| {
            s.coordinate = coordinate;
            s.visualization_type = visualization_type;
            s.date_range = range;
            s.is_open = true;
        });
    }

    /// Parameters the active panel fetches with
    pub fn query(&self) -> VisualizationQuery {
        let s = self.inner.get();
        VisualizationQuery {
            coordinate: s.coordinate,
            date_range: s.date_range,
            units: s.units,
            visualization_type: s.visualization_type,
        }
    }
}

impl Default for DrawerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DrawerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerStore")
            .field("state", self.inner.get())
            .finish()
    }
}
