rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod audio;
pub mod cloze;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod event;
pub mod pronunciation;
pub mod session;
pub mod store;
pub mod stories;

/// Switches notification and prompt language ("en" or "nb").
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}
