//! WebAssembly bindings for SpatialGPT
//!
//! Exposes the client-side stores to the browser:
//! - Map selection, geolocation and context menu state
//! - Pending coordinate attachments for the chat input
//! - Visualization drawer tab, date window and units
//! - Weather code and AQI descriptions, POI distances
//!
//! State crosses the boundary as JSON strings.

use chrono::NaiveDate;
use serde::Serialize;
use shared::codes::{aqi_level, weather_description};
use shared::geo::distance_meters;
use shared::store::{self, ChatStore, Clock, DrawerStore, MapStore, SubscriptionId};
use shared::{ChatMessage, Coordinate, DateRange, UnitsPatch, VisualizationType};
use wasm_bindgen::prelude::*;

/// Today's date from the browser's clock, in UTC
struct BrowserClock;

impl Clock for BrowserClock {
    fn today(&self) -> NaiveDate {
        let now = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(
            now.get_utc_full_year() as i32,
            now.get_utc_month() + 1,
            now.get_utc_date(),
        )
        .unwrap_or(NaiveDate::MIN)
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_visualization_type(slug: &str) -> Result<VisualizationType, JsValue> {
    VisualizationType::from_slug(slug)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown visualization type: {}", slug)))
}

fn parse_date(value: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date {}: {}", value, e)))
}

/// Wrap a JS callback as a store listener receiving the state as JSON
fn js_listener<S: Serialize + 'static>(callback: js_sys::Function) -> impl Fn(&S) + 'static {
    move |state: &S| {
        let Ok(json) = serde_json::to_string(state) else {
            return;
        };
        if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
            web_sys::console::warn_2(&JsValue::from_str("Store listener failed"), &e);
        }
    }
}

/// Subscriptions handed to JS as small integers
#[derive(Default)]
struct Subscriptions(Vec<Option<SubscriptionId>>);

impl Subscriptions {
    fn add(&mut self, id: SubscriptionId) -> u32 {
        self.0.push(Some(id));
        (self.0.len() - 1) as u32
    }

    fn take(&mut self, handle: u32) -> Option<SubscriptionId> {
        self.0.get_mut(handle as usize).and_then(Option::take)
    }
}

// ============================================================================
// Map store
// ============================================================================

#[wasm_bindgen]
#[derive(Default)]
pub struct MapStoreHandle {
    inner: MapStore,
    subscriptions: Subscriptions,
}

#[wasm_bindgen]
impl MapStoreHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.state())
    }

    pub fn set_coordinate(&mut self, latitude: f64, longitude: f64) {
        self.inner.set_coordinate(Coordinate::new(latitude, longitude));
    }

    pub fn set_user_position(&mut self, latitude: f64, longitude: f64) {
        self.inner
            .set_user_position(Some(Coordinate::new(latitude, longitude)));
    }

    pub fn clear_user_position(&mut self) {
        self.inner.set_user_position(None);
    }

    pub fn open_context_menu(&mut self, x: f64, y: f64) {
        self.inner.open_context_menu(x, y);
    }

    pub fn close_context_menu(&mut self) {
        self.inner.close_context_menu();
    }

    /// Select the clicked coordinate and open the menu at the pixel position
    pub fn right_click(&mut self, latitude: f64, longitude: f64, x: f64, y: f64) {
        self.inner
            .right_click(Coordinate::new(latitude, longitude), x, y);
    }

    pub fn center_map_to(&mut self, latitude: f64, longitude: f64) {
        self.inner.center_map_to(latitude, longitude);
    }

    /// Pending center request as JSON, cleared once read
    pub fn take_center_request(&mut self) -> Result<Option<String>, JsValue> {
        self.inner
            .take_center_request()
            .map(|coordinate| to_json(&coordinate))
            .transpose()
    }

    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(js_listener(callback));
        self.subscriptions.add(id)
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        self.subscriptions
            .take(handle)
            .map(|id| self.inner.unsubscribe(id))
            .unwrap_or(false)
    }
}

// ============================================================================
// Chat store
// ============================================================================

#[wasm_bindgen]
#[derive(Default)]
pub struct ChatStoreHandle {
    inner: ChatStore,
    subscriptions: Subscriptions,
}

#[wasm_bindgen]
impl ChatStoreHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attachments_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.coordinate_attachments())
    }

    pub fn add_coordinate_attachment(&mut self, latitude: f64, longitude: f64) {
        self.inner
            .add_coordinate_attachment(Coordinate::new(latitude, longitude));
    }

    /// Out-of-range indices are ignored
    pub fn remove_coordinate_attachment(&mut self, index: usize) {
        self.inner.remove_coordinate_attachment(index);
    }

    pub fn clear_coordinate_attachments(&mut self) {
        self.inner.clear_coordinate_attachments();
    }

    /// Next user message with the pending attachments moved onto it
    pub fn compose_message(&mut self, content: &str) -> Result<String, JsValue> {
        to_json(&self.inner.compose_message(content))
    }

    /// Body for `POST /api/chat`; `user_position_json` may be omitted
    pub fn build_request(
        &mut self,
        history_json: &str,
        content: &str,
        user_position_json: Option<String>,
    ) -> Result<String, JsValue> {
        let history: Vec<ChatMessage> = serde_json::from_str(history_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid history JSON: {}", e)))?;
        let user_position: Option<Coordinate> = user_position_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| JsValue::from_str(&format!("Invalid position JSON: {}", e)))?;

        to_json(&self.inner.build_request(&history, content, user_position))
    }

    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(js_listener(callback));
        self.subscriptions.add(id)
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        self.subscriptions
            .take(handle)
            .map(|id| self.inner.unsubscribe(id))
            .unwrap_or(false)
    }
}

// ============================================================================
// Drawer store
// ============================================================================

#[wasm_bindgen]
pub struct DrawerStoreHandle {
    inner: DrawerStore,
    subscriptions: Subscriptions,
}

impl DrawerStoreHandle {
    fn with_clock(clock: Box<dyn Clock>) -> Self {
        Self {
            inner: DrawerStore::with_clock(clock),
            subscriptions: Subscriptions::default(),
        }
    }
}

#[wasm_bindgen]
impl DrawerStoreHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_clock(Box::new(BrowserClock))
    }

    /// Drawer whose date defaults are computed from a fixed `YYYY-MM-DD`
    pub fn with_today(today: &str) -> Result<DrawerStoreHandle, JsValue> {
        let today = parse_date(today)?;
        Ok(Self::with_clock(Box::new(store::FixedClock(today))))
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.state())
    }

    /// Fetch parameters of the active panel
    pub fn query_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.query())
    }

    pub fn cache_key(&self) -> String {
        self.inner.query().cache_key()
    }

    pub fn set_open(&mut self, open: bool) {
        self.inner.set_open(open);
    }

    pub fn set_coordinate(&mut self, latitude: f64, longitude: f64) {
        self.inner.set_coordinate(Coordinate::new(latitude, longitude));
    }

    /// Switch tabs; the date window resets to the tab's default
    pub fn set_visualization_type(&mut self, slug: &str) -> Result<(), JsValue> {
        self.inner
            .set_visualization_type(parse_visualization_type(slug)?);
        Ok(())
    }

    pub fn set_date_range(&mut self, from: &str, to: &str) -> Result<(), JsValue> {
        let range = DateRange::new(parse_date(from)?, parse_date(to)?);
        self.inner.set_date_range(range);
        Ok(())
    }

    /// Merge a partial `{temperature?, wind?, precipitation?}` update
    pub fn set_units(&mut self, patch_json: &str) -> Result<(), JsValue> {
        let patch: UnitsPatch = serde_json::from_str(patch_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid units JSON: {}", e)))?;
        self.inner.set_units(patch);
        Ok(())
    }

    pub fn reset_date_range(&mut self) {
        self.inner.reset_date_range();
    }

    pub fn open_for(&mut self, latitude: f64, longitude: f64, slug: &str) -> Result<(), JsValue> {
        let visualization_type = parse_visualization_type(slug)?;
        self.inner
            .open_for(Coordinate::new(latitude, longitude), visualization_type);
        Ok(())
    }

    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.inner.subscribe(js_listener(callback));
        self.subscriptions.add(id)
    }

    pub fn unsubscribe(&mut self, handle: u32) -> bool {
        self.subscriptions
            .take(handle)
            .map(|id| self.inner.unsubscribe(id))
            .unwrap_or(false)
    }
}

// ============================================================================
// Context menu
// ============================================================================

/// Menu labels in display order, as a JSON array
#[wasm_bindgen]
pub fn context_menu_labels() -> Result<String, JsValue> {
    let labels: Vec<&str> = store::context_menu_items()
        .iter()
        .map(|item| item.label())
        .collect();
    to_json(&labels)
}

/// Run the menu entry with the given label; returns the outcome as JSON
#[wasm_bindgen]
pub fn apply_context_menu_action(
    map: &mut MapStoreHandle,
    chat: &mut ChatStoreHandle,
    drawer: &mut DrawerStoreHandle,
    label: &str,
) -> Result<String, JsValue> {
    let action = store::find_context_menu_item(label)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown menu item: {}", label)))?;
    let outcome = store::apply_context_menu_action(
        action,
        &mut map.inner,
        &mut chat.inner,
        &mut drawer.inner,
    );
    to_json(&outcome)
}

// ============================================================================
// Helpers
// ============================================================================

/// Describe a WMO weather code
#[wasm_bindgen]
pub fn describe_weather_code(code: i32) -> String {
    weather_description(code as i64).to_string()
}

/// Describe a European AQI level
#[wasm_bindgen]
pub fn describe_aqi_level(level: i32) -> String {
    aqi_level(level as i64).to_string()
}

/// Default date window for a visualization type, as `{from, to}` JSON
#[wasm_bindgen]
pub fn default_date_range(slug: &str) -> Result<String, JsValue> {
    let visualization_type = parse_visualization_type(slug)?;
    to_json(&visualization_type.default_date_range(BrowserClock.today()))
}

/// Axis date format for a visualization type (e.g. `MMM d, yyyy`)
#[wasm_bindgen]
pub fn visualization_date_format(slug: &str) -> Result<String, JsValue> {
    Ok(parse_visualization_type(slug)?.date_format().to_string())
}

/// `lat, lon` with four decimals, as shown on the map overlay
#[wasm_bindgen]
pub fn coordinate_label(latitude: f64, longitude: f64) -> String {
    Coordinate::new(latitude, longitude).short_label()
}

/// Haversine distance in whole metres
#[wasm_bindgen]
pub fn poi_distance_meters(
    from_latitude: f64,
    from_longitude: f64,
    to_latitude: f64,
    to_longitude: f64,
) -> f64 {
    distance_meters(
        Coordinate::new(from_latitude, from_longitude),
        Coordinate::new(to_latitude, to_longitude),
    ) as f64
}
