//! Process-wide settings (spec §6), serde-round-trippable the way the
//! teacher's `config::schema` structs are, but covering the engine's own
//! knobs rather than a TOML front-end config file.

use crate::geometry::Tightness;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomaticScheme {
    LongestSide,
    Alternate,
    Spiral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_split_ratio")]
    pub split_ratio: f64,

    #[serde(default = "default_border_width")]
    pub border_width: u16,
    #[serde(default = "default_window_gap")]
    pub window_gap: u16,

    #[serde(default)]
    pub top_padding: u16,
    #[serde(default)]
    pub right_padding: u16,
    #[serde(default)]
    pub bottom_padding: u16,
    #[serde(default)]
    pub left_padding: u16,
    #[serde(default)]
    pub monocle_padding: (u16, u16, u16, u16),

    #[serde(default = "default_polarity")]
    pub initial_polarity: Polarity,
    #[serde(default = "default_scheme")]
    pub automatic_scheme: AutomaticScheme,
    #[serde(default = "default_true")]
    pub removal_adjustment: bool,
    #[serde(default = "default_false")]
    pub single_monocle: bool,

    #[serde(default = "default_false")]
    pub borderless_monocle: bool,
    #[serde(default = "default_false")]
    pub borderless_singleton: bool,
    #[serde(default = "default_false")]
    pub gapless_monocle: bool,
    #[serde(default = "default_false")]
    pub center_pseudo_tiled: bool,

    #[serde(default = "default_false")]
    pub honor_size_hints: bool,

    #[serde(default = "default_false")]
    pub focus_follows_pointer: bool,
    #[serde(default = "default_false")]
    pub pointer_follows_focus: bool,
    #[serde(default = "default_false")]
    pub pointer_follows_monitor: bool,

    #[serde(default = "default_tightness")]
    pub directional_focus_tightness: Tightness,

    #[serde(default = "default_false")]
    pub remove_disabled_monitors: bool,
    #[serde(default = "default_false")]
    pub remove_unplugged_monitors: bool,
    #[serde(default = "default_false")]
    pub merge_overlapping_monitors: bool,

    #[serde(default = "default_false")]
    pub hide_sticky: bool,
}

fn default_split_ratio() -> f64 {
    0.5
}
fn default_border_width() -> u16 {
    1
}
fn default_window_gap() -> u16 {
    6
}
fn default_polarity() -> Polarity {
    Polarity::Second
}
fn default_scheme() -> AutomaticScheme {
    AutomaticScheme::LongestSide
}
fn default_tightness() -> Tightness {
    Tightness::High
}
fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            split_ratio: default_split_ratio(),
            border_width: default_border_width(),
            window_gap: default_window_gap(),
            top_padding: 0,
            right_padding: 0,
            bottom_padding: 0,
            left_padding: 0,
            monocle_padding: (0, 0, 0, 0),
            initial_polarity: default_polarity(),
            automatic_scheme: default_scheme(),
            removal_adjustment: default_true(),
            single_monocle: default_false(),
            borderless_monocle: default_false(),
            borderless_singleton: default_false(),
            gapless_monocle: default_false(),
            center_pseudo_tiled: default_false(),
            honor_size_hints: default_false(),
            focus_follows_pointer: default_false(),
            pointer_follows_focus: default_false(),
            pointer_follows_monitor: default_false(),
            directional_focus_tightness: default_tightness(),
            remove_disabled_monitors: default_false(),
            remove_unplugged_monitors: default_false(),
            merge_overlapping_monitors: default_false(),
            hide_sticky: default_false(),
        }
    }
}
