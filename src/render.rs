// Changelog rendering.
// Writes one text block per cached release, plus error notices.

use std::io::Write;

use crossterm::style::{Stylize, style};

use crate::error::{ChangelogError, Result};
use crate::release::ReleaseDetail;

/// Formats release details onto an output stream.
pub struct Renderer<W: Write> {
    out: W,
    /// Emit terminal styling (bold labels, red notices).
    styled: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, styled: bool) -> Self {
        Self { out, styled }
    }

    /// Render every detail in order.
    pub fn render(&mut self, details: &[ReleaseDetail]) -> Result<()> {
        for detail in details {
            self.render_one(detail)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_one(&mut self, detail: &ReleaseDetail) -> Result<()> {
        writeln!(self.out, "{} {}", self.label("Package:"), detail.repository)?;
        writeln!(self.out, "{} {}", self.label("Tag:"), detail.tag_name)?;
        writeln!(self.out, "{}", self.label("Changelog:"))?;
        writeln!(self.out, "{}", detail.body.trim())?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Write a notice for an error that ended a stage early.
    pub fn render_error(&mut self, error: &ChangelogError) -> Result<()> {
        let message = format!("Error: {error}");
        if self.styled {
            writeln!(self.out, "{}", style(message).red())?;
        } else {
            writeln!(self.out, "{message}")?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, text: &str) -> String {
        if self.styled {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }
}
