//! The components module contains all shared components for our app. Components are the building blocks of dioxus apps.
pub mod deposit_panel;
pub mod pico;
pub mod value_row;
