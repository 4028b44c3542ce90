use serde::{Deserialize, Serialize};

use super::{Observable, SubscriptionId};
use crate::types::{Coordinate, ScreenPosition};

/// Map panel state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapState {
    pub coordinate: Coordinate,
    pub user_position: Option<Coordinate>,
    pub context_menu_position: Option<ScreenPosition>,
    pub is_context_menu_open: bool,
    pub center_request: Option<Coordinate>,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            coordinate: Coordinate::san_francisco(),
            user_position: None,
            context_menu_position: None,
            is_context_menu_open: false,
            center_request: None,
        }
    }
}

/// Selected coordinate, geolocation, context menu and center requests
#[derive(Debug, Default)]
pub struct MapStore {
    inner: Observable<MapState>,
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MapState {
        self.inner.get()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&MapState) + 'static) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    pub fn set_coordinate(&mut self, coordinate: Coordinate) {
        self.inner.update(|s| s.coordinate = coordinate);
    }

    pub fn set_user_position(&mut self, position: Option<Coordinate>) {
        self.inner.update(|s| s.user_position = position);
    }

    pub fn open_context_menu(&mut self, x: f64, y: f64) {
        self.inner.update(|s| {
            s.context_menu_position = Some(ScreenPosition { x, y });
            s.is_context_menu_open = true;
        });
    }

    pub fn close_context_menu(&mut self) {
        self.inner.update(|s| {
            s.is_context_menu_open = false;
            s.context_menu_position = None;
        });
    }

    /// Right-click on the map: select the point and open the menu there
    pub fn right_click(&mut self, coordinate: Coordinate, x: f64, y: f64) {
        self.inner.update(|s| {
            s.coordinate = coordinate;
            s.context_menu_position = Some(ScreenPosition { x, y });
            s.is_context_menu_open = true;
        });
    }

    pub fn center_map_to(&mut self, latitude: f64, longitude: f64) {
        self.inner
            .update(|s| s.center_request = Some(Coordinate::new(latitude, longitude)));
    }

    pub fn clear_center_request(&mut self) {
        self.inner.update(|s| s.center_request = None);
    }

    /// Consume the pending center request, if any
    pub fn take_center_request(&mut self) -> Option<Coordinate> {
        let request = self.inner.get().center_request?;
        self.clear_center_request();
        Some(request)
    }
}
