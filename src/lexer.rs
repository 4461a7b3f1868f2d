//! Splits a raw command line into an argument vector.
//!
//! Tokens are separated by whitespace. A token that *starts* with a single or
//! double quote extends to the matching quote, whitespace included; the quotes
//! are dropped. Quotes appearing in the middle of a word are ordinary
//! characters. An unterminated quote swallows the rest of the line.
//!
//! The first token is looked up in the alias table and, when found, replaced
//! by the whitespace-split expansion. Spliced tokens are not expanded again.

use crate::alias::AliasTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Start,
    ReadingWord,
    ReadingQuoted(char),
}

struct LexingFSM<'a> {
    input: std::str::Chars<'a>,
    state: LexingState,
    buffer: String,
}

impl<'a> LexingFSM<'a> {
    fn new(line: &'a str) -> Self {
        LexingFSM {
            input: line.chars(),
            state: LexingState::Start,
            buffer: String::new(),
        }
    }

    fn make_tokens(mut self) -> Vec<String> {
        let mut out = Vec::new();

        while let Some(ch) = self.input.next() {
            match self.state {
                LexingState::Start => self.handle_start(ch),
                LexingState::ReadingWord => self.handle_word(ch, &mut out),
                LexingState::ReadingQuoted(quote) => self.handle_quoted(ch, quote, &mut out),
            }
        }

        match self.state {
            LexingState::Start => {}
            // Unclosed quotes are not an error: the token runs to end of line.
            LexingState::ReadingWord | LexingState::ReadingQuoted(_) => {
                out.push(std::mem::take(&mut self.buffer));
            }
        }

        out
    }

    fn handle_start(&mut self, ch: char) {
        match ch {
            c if is_delimiter(c) => {}
            '"' | '\'' => self.state = LexingState::ReadingQuoted(ch),
            c => {
                self.buffer.push(c);
                self.state = LexingState::ReadingWord;
            }
        }
    }

    fn handle_word(&mut self, ch: char, out: &mut Vec<String>) {
        if is_delimiter(ch) {
            out.push(std::mem::take(&mut self.buffer));
            self.state = LexingState::Start;
        } else {
            self.buffer.push(ch);
        }
    }

    fn handle_quoted(&mut self, ch: char, quote: char, out: &mut Vec<String>) {
        if ch == quote {
            out.push(std::mem::take(&mut self.buffer));
            self.state = LexingState::Start;
        } else {
            self.buffer.push(ch);
        }
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '\x07'
}

/// Tokenize `line`, expanding an alias in command position.
///
/// Never fails: malformed quoting degrades to "rest of line is one token".
pub fn tokenize(line: &str, aliases: &AliasTable) -> Vec<String> {
    let mut tokens = LexingFSM::new(line).make_tokens();

    if let Some(expansion) = tokens.first().and_then(|first| aliases.lookup(first)) {
        let mut expanded: Vec<String> = expansion.split_whitespace().map(String::from).collect();
        expanded.extend(tokens.drain(1..));
        tokens = expanded;
    }

    tokens
}
