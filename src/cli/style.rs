//! CLI styling utilities
//!
//! Semantic styling via the [`Stylize`] trait with automatic terminal color
//! support detection (delegated to `owo-colors`, which respects `NO_COLOR`,
//! `CLICOLOR`, `CLICOLOR_FORCE`, and TTY detection).

use std::fmt::{self, Display};

use owo_colors::{OwoColorize, Stream, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const MUTED: Style = Style::new().dimmed();

/// A value with semantic styling applied.
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Extension trait for semantic terminal styling.
pub trait Stylize: Display {
    /// Accent color (cyan) for primary information: URLs, keys, branches
    fn accent(&self) -> Styled<&Self> {
        Styled {
            value: self,
            style: ACCENT,
            stream: Stream::Stdout,
        }
    }

    /// Muted style (dim) for secondary information
    fn muted(&self) -> Styled<&Self> {
        Styled {
            value: self,
            style: MUTED,
            stream: Stream::Stdout,
        }
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green checkmark for success states.
pub fn check() -> Styled<&'static str> {
    Styled {
        value: "✓",
        style: SUCCESS,
        stream: Stream::Stdout,
    }
}
