use crate::panel::Panel;
use crate::panels::{PanelFactory, PanelSettings};

/// A row header. Rows ignore the horizontal cursor and always span the full grid width.
pub fn row(title: impl Into<String>) -> PanelFactory {
    let title = title.into();
    Box::new(move |settings: &PanelSettings<'_>| Panel::row(title.clone(), settings.grid_pos.y))
}

/// A row folded away with its `panels` nested inside.
pub fn collapsed_row(title: impl Into<String>, panels: Vec<Panel>) -> PanelFactory {
    let title = title.into();
    Box::new(move |settings: &PanelSettings<'_>| {
        Panel::collapsed_row(title.clone(), settings.grid_pos.y, panels.clone())
    })
}
