#![no_std]

//! Byte-fed command dispatcher for a serial console.
//!
//! The caller feeds received bytes one at a time; the dispatcher buffers a
//! line, handles backspace, and on CR or LF tokenizes the line and looks the
//! first token up in a command table. Handlers follow the classic embedded
//! contract: they get the remaining tokens argv-style and return 0 on
//! success or a negative code for usage errors.
//!
//! A CRLF pair dispatches on the CR and then reports the LF as an empty
//! line, which callers simply ignore.

use heapless::Vec;

/// Longest accepted input line in bytes.
pub const MAX_LINE: usize = 64;

/// Maximum number of whitespace separated tokens per line, command name
/// included.
pub const MAX_ARGS: usize = 8;

/// Command handler: arguments after the command name, 0 on success,
/// negative on usage errors.
pub type Handler<C> = fn(&mut C, &[&str]) -> i8;

/// One entry of a command table.
pub struct Command<C> {
    pub name: &'static str,
    pub handler: Handler<C>,
}

/// Outcome of feeding one byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Line not complete yet.
    Pending,
    /// A terminator arrived on an empty line.
    Empty,
    /// Line exceeded the buffer or the token limit and was discarded.
    Overflow,
    /// First token matched no table entry.
    Unknown,
    /// The matching handler ran and returned this code.
    Done(i8),
}

/// Line buffer plus dispatch state for one console.
pub struct Cli<const N: usize = MAX_LINE> {
    line: Vec<u8, N>,
}

impl<const N: usize> Cli<N> {
    pub const fn new() -> Self {
        Self { line: Vec::new() }
    }

    /// Feeds one received byte, dispatching against `table` when the byte
    /// terminates a line.
    pub fn push<C>(&mut self, byte: u8, table: &[Command<C>], ctx: &mut C) -> Dispatch {
        match byte {
            b'\r' | b'\n' => {
                let result = match core::str::from_utf8(&self.line) {
                    Ok(line) => dispatch_line(line, table, ctx),
                    Err(_) => Dispatch::Unknown,
                };
                self.line.clear();
                result
            }
            // backspace and DEL both rub out the last byte
            0x08 | 0x7F => {
                self.line.pop();
                Dispatch::Pending
            }
            _ => {
                if self.line.push(byte).is_err() {
                    self.line.clear();
                    return Dispatch::Overflow;
                }
                Dispatch::Pending
            }
        }
    }
}

impl<const N: usize> Default for Cli<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenizes one complete line and runs the matching handler.
pub fn dispatch_line<C>(line: &str, table: &[Command<C>], ctx: &mut C) -> Dispatch {
    let mut args: Vec<&str, MAX_ARGS> = Vec::new();
    for token in line.split_ascii_whitespace() {
        if args.push(token).is_err() {
            return Dispatch::Overflow;
        }
    }
    let Some(name) = args.first() else {
        return Dispatch::Empty;
    };
    for command in table {
        if command.name == *name {
            return Dispatch::Done((command.handler)(ctx, &args[1..]));
        }
    }
    Dispatch::Unknown
}
