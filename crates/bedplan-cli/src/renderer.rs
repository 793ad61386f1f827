//! Markdown output for the terminal.
//!
//! Plan reports, calendars and bed overviews are markdown. On a terminal
//! they are styled with termimad; with `--no-color`, or when stdout is piped,
//! the markdown is written unchanged.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Green);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::DarkGrey);
        skin.inline_code.set_fg(Color::Cyan);
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Styled output only when stdout is a terminal and colors are wanted.
    pub fn for_stdout(no_color: bool) -> Self {
        Self::new(!no_color && io::stdout().is_terminal())
    }

    pub fn render(&self, markdown: &str) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, markdown)?;
        out.flush().context("Failed to flush output")
    }

    fn render_to<W: Write>(&self, out: &mut W, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            write!(out, "{}", self.skin.term_text(markdown))
        } else {
            out.write_all(markdown.as_bytes())
        }
        .context("Failed to write output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "# Lettuce (`lettuce`)\n\n- Beds: **3**\n";

    #[test]
    fn test_plain_output_is_unchanged_markdown() {
        let renderer = TerminalRenderer::new(false);
        let mut out = Vec::new();
        renderer.render_to(&mut out, REPORT).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), REPORT);
    }

    #[test]
    fn test_rich_output_strips_markup() {
        let renderer = TerminalRenderer::new(true);
        let mut out = Vec::new();
        renderer.render_to(&mut out, REPORT).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Lettuce"));
        assert!(!text.contains("**3**"));
    }

    #[test]
    fn test_no_color_forces_plain() {
        assert!(!TerminalRenderer::for_stdout(true).rich_enabled);
    }
}
