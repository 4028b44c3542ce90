use serde::{Deserialize, Serialize};

use super::{ChatStore, DrawerStore, MapStore};
use crate::models::visualization::VisualizationType;

/// Entry in the map's right-click menu
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", content = "visualizationType", rename_all = "kebab-case")]
pub enum ContextMenuAction {
    AddAttachment,
    LocationInfo,
    OpenVisualization(VisualizationType),
}

impl ContextMenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            ContextMenuAction::AddAttachment => "Add location as attachment",
            ContextMenuAction::LocationInfo => "Location info",
            ContextMenuAction::OpenVisualization(t) => t.title(),
        }
    }
}

/// Menu entries in display order
pub fn context_menu_items() -> Vec<ContextMenuAction> {
    let mut items = vec![
        ContextMenuAction::AddAttachment,
        ContextMenuAction::LocationInfo,
    ];
    items.extend(
        VisualizationType::ALL
            .into_iter()
            .map(ContextMenuAction::OpenVisualization),
    );
    items
}

/// Look up a menu entry by its visible label
pub fn find_context_menu_item(label: &str) -> Option<ContextMenuAction> {
    context_menu_items()
        .into_iter()
        .find(|item| item.label() == label)
}

/// What the UI should do after an action ran
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ContextMenuOutcome {
    AttachmentAdded,
    /// Text for an informational popup
    Info { message: String },
    DrawerOpened { visualization_type: VisualizationType },
}

/// Run a menu action against the selected map coordinate and close the menu
pub fn apply_context_menu_action(
    action: ContextMenuAction,
    map: &mut MapStore,
    chat: &mut ChatStore,
    drawer: &mut DrawerStore,
) -> ContextMenuOutcome {
    let coordinate = map.state().coordinate;
    let outcome = match action {
        ContextMenuAction::AddAttachment => {
            chat.add_coordinate_attachment(coordinate);
            ContextMenuOutcome::AttachmentAdded
        }
        ContextMenuAction::LocationInfo => ContextMenuOutcome::Info {
            message: format!(
                "Latitude: {:.4}, Longitude: {:.4}",
                coordinate.latitude, coordinate.longitude
            ),
        },
        ContextMenuAction::OpenVisualization(visualization_type) => {
            drawer.open_for(coordinate, visualization_type);
            ContextMenuOutcome::DrawerOpened { visualization_type }
        }
    };
    map.close_context_menu();
    outcome
}
