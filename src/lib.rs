pub mod agent;
pub mod app_config;
pub mod domain;
pub mod host;
pub mod hotkey;
pub mod injector;
pub mod marker;
pub mod observer;
pub mod patcher;
pub mod settings_file;
pub mod store;
pub mod store_listener;
