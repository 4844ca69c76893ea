//! Clipboard access through the terminal (OSC 52)
//!
//! The escape sequence asks the terminal emulator to set the system
//! clipboard, which also works over SSH where no local clipboard exists.

use std::io::{self, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Build the OSC 52 sequence that sets the clipboard to `text`
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Write the clipboard sequence for `text` to `out`
pub fn write_clipboard<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}

/// Copy `text` to the system clipboard via the controlling terminal
pub fn copy_to_clipboard(text: &str) -> io::Result<()> {
    write_clipboard(&mut io::stdout().lock(), text)
}
