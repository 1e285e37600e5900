pub mod app;
pub mod composer;
pub mod fields;
pub mod gestures;
pub mod list_view;
pub mod menu;
