//! Character-level scanner the parser drives directly.
//!
//! There is no token stream: the parser asks the cursor for the next significant
//! character and, where the grammar calls for one, a number literal or an identifier.

use crate::Real;

/// Read position over an expression string.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Peek at the current character.
    pub fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Advance the position by one character.
    pub fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skips whitespace and returns the next character without consuming it.
    pub fn peek_significant(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek()
    }

    /// Consumes `expected` if it is the next significant character.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek_significant() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek_significant().is_none()
    }

    /// Unread input from the current position.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Reads an unsigned decimal literal: digits, then optionally `.` and more digits.
    ///
    /// Returns `None` without consuming anything unless the next character is a digit.
    /// Exponent notation is not part of the grammar.
    pub fn number(&mut self) -> Option<Real> {
        self.skip_whitespace();
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return None;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        // "12" and "12." and "12.5" all parse; the slice holds nothing else
        self.input[start..self.pos].parse::<Real>().ok()
    }

    /// Reads an identifier `[A-Za-z_][A-Za-z0-9_]*`.
    pub fn identifier(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
            return None;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Some(&self.input[start..self.pos])
    }
}
