pub mod annotation_panel;
pub mod edit_popup;
pub mod status_bar;
