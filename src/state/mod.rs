mod config;

pub use config::{
    resolve_path, Config, PlayerConfig, TooltipConfig, CONFIG_ENV, DEFAULT_CONFIG_FILE,
};
