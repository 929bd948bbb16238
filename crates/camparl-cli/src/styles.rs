//! Clap help styling, kept separate from `main.rs` so the `#[command(styles = ...)]`
//! attribute stays readable.

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;

#[must_use]
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default())
}
