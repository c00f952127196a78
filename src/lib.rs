pub mod background;
pub mod blur;
pub mod cli;
pub mod commands;
pub mod compose;
pub mod composite;
pub mod config;
pub mod crop;
pub mod icon;
pub mod lockfile;
pub mod pipeline;
pub mod pixel;
pub mod plan;
pub mod resample;
pub mod shape;
pub mod silhouette;
pub mod tray;
