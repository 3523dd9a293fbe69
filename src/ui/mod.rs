pub mod app;
pub mod settings;
pub mod settings_io;

mod duo_tab;
mod generator_tab;
mod lore_tab;
mod solo_tab;
