#![forbid(unsafe_code)]

//! Overlay widgets: the placeholder badge and its assets.

pub mod badge;
pub mod icon;

pub use badge::{BadgeRenderer, BadgeStyle};
pub use icon::{BadgeAsset, BadgeIcon, IconError};
