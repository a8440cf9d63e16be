mod config_mapping;
mod lifecycle;
