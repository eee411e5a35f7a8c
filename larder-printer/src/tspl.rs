//! TSPL command builder
//!
//! Provides a fluent API for building TSPL print data for thermal label
//! printers (TSC and compatible). Commands are newline-terminated ASCII
//! except for BITMAP payloads, which carry raw bytes inline.

use std::fmt::Write as _;

/// Print head resolution of the target printers (203 dpi)
pub const DOTS_PER_MM: u32 = 8;

/// Label stock width in millimeters
pub const LABEL_WIDTH_MM: u32 = 58;

/// Label stock height in millimeters
pub const LABEL_HEIGHT_MM: u32 = 40;

/// A pre-rasterized 1-bit image for the BITMAP command
///
/// Bit semantics follow TSPL: 0 prints black, 1 leaves white.
#[derive(Debug, Clone)]
pub struct LogoBitmap {
    /// Row width in bytes (8 pixels per byte)
    pub width_bytes: u32,
    /// Height in dots
    pub height: u32,
    /// `width_bytes * height` packed bytes, row-major
    pub data: Vec<u8>,
}

/// TSPL command builder
///
/// Builds the byte stream for one print job. A job may contain several
/// pages; each page is opened with [`page`](Self::page) and closed with
/// [`print`](Self::print).
pub struct TsplBuilder {
    buf: Vec<u8>,
}

impl TsplBuilder {
    /// Create a new builder for the given label stock (sizes in mm)
    pub fn new(width_mm: u32, height_mm: u32) -> Self {
        let mut builder = Self {
            buf: Vec::with_capacity(4096),
        };
        builder.push_line(&format!("SIZE {} mm,{} mm", width_mm, height_mm));
        builder.push_line("GAP 2 mm,0 mm");
        builder.push_line("DENSITY 8");
        builder.push_line("DIRECTION 1");
        builder
    }

    fn push_line(&mut self, line: &str) {
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    /// Open a new page (clears the image buffer)
    pub fn page(&mut self) -> &mut Self {
        self.push_line("CLS");
        self
    }

    /// Draw text at (x, y) dots with a built-in bitmap font
    ///
    /// `font` is the TSPL font name ("1".."5"). Double quotes in the
    /// content would terminate the command string, so they are rewritten
    /// to single quotes.
    pub fn text(&mut self, x: u32, y: u32, font: &str, content: &str) -> &mut Self {
        let safe = content.replace('"', "'");
        let mut line = String::new();
        let _ = write!(line, "TEXT {},{},\"{}\",0,1,1,\"{}\"", x, y, font, safe);
        self.push_line(&line);
        self
    }

    /// Draw a filled rectangle at (x, y) dots
    pub fn bar(&mut self, x: u32, y: u32, width: u32, height: u32) -> &mut Self {
        self.push_line(&format!("BAR {},{},{},{}", x, y, width, height));
        self
    }

    /// Place a 1-bit bitmap at (x, y) dots (mode 0, overwrite)
    pub fn bitmap(&mut self, x: u32, y: u32, logo: &LogoBitmap) -> &mut Self {
        let mut line = String::new();
        let _ = write!(
            line,
            "BITMAP {},{},{},{},0,",
            x, y, logo.width_bytes, logo.height
        );
        self.buf.extend_from_slice(line.as_bytes());
        self.buf.extend_from_slice(&logo.data);
        self.buf.extend_from_slice(b"\r\n");
        self
    }

    /// Print the current page
    pub fn print(&mut self, copies: u32) -> &mut Self {
        self.push_line(&format!("PRINT {},1", copies.max(1)));
        self
    }

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for TsplBuilder {
    fn default() -> Self {
        Self::new(LABEL_WIDTH_MM, LABEL_HEIGHT_MM)
    }
}
