pub mod color;
pub mod config;
pub mod explorer;
pub mod geo;
pub mod geolocation;
pub mod icon;
pub mod layer;
pub mod markers;
pub mod models;
pub mod pointer;
pub mod preview;
pub mod surface;
pub mod tiles;
pub mod view;

#[cfg(test)]
mod test_utils;
