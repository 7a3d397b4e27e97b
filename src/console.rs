//! Bounded console input helpers.
//!
//! The username prompt accepts a fixed number of characters; anything beyond
//! the cap is thrown away up to the end of the line rather than buffered or
//! treated as an error.

use std::io::{BufRead, Read};

/// Read one line from `reader`, keeping at most `max_len` bytes.
///
/// Stops at newline or EOF. Carriage returns are dropped, excess input is
/// discarded silently. Never fails on overlong input.
pub fn read_bounded_line<R: BufRead>(reader: &mut R, max_len: usize) -> std::io::Result<String> {
    let mut line = String::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            break;
        }
        match byte[0] {
            b'\n' => break,
            b'\r' => continue,
            b if line.len() < max_len => line.push(char::from(b)),
            // Throw away any additional characters that did not fit.
            _ => continue,
        }
    }
    Ok(line)
}

/// Block until the user presses a key (or stdin reaches EOF).
///
/// Shown before exiting on errors in the zero-argument, double-click launch
/// scenario, so the console window does not vanish with the message.
pub fn wait_for_keypress<R: Read>(reader: &mut R) {
    println!("Press any key to continue...");
    let mut byte = [0u8; 1];
    let _ = reader.read(&mut byte);
}
