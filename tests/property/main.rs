// tests/property/main.rs

mod command_spec;
mod status_text;
mod window_watch;
