//! Markdown output for the terminal.
//!
//! Rich mode styles inline markdown with termimad and colors headers;
//! plain mode (`--no-color`) writes the markdown untouched.

use std::io::{self, Write};

use log::warn;
use termimad::{crossterm::style::Color, MadSkin};

/// Writes markdown to stdout, styled or plain.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { rich_enabled, skin }
    }

    /// Render markdown to stdout. Write failures (a closed pipe, usually)
    /// are logged rather than aborting the command.
    pub fn render(&self, markdown: &str) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = self.render_to(&mut out, markdown) {
            warn!("Failed to write output: {e}");
        }
    }

    fn render_to<W: Write>(&self, out: &mut W, markdown: &str) -> io::Result<()> {
        if !self.rich_enabled {
            return write!(out, "{markdown}");
        }
        for line in markdown.lines() {
            if line.starts_with('#') {
                // Keep the hashes visible so the heading level still reads.
                writeln!(out, "\x1b[34m{line}\x1b[0m")?;
            } else {
                writeln!(out, "{}", self.skin.inline(line))?;
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
