use crate::exec::ast::{Command, Operator, Redirect, SimpleCommand, Word, WordPart};
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::iter::Peekable;
use std::str::Chars;

const VAR_PATTERN: &str = r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))";

#[derive(Debug, Clone, Copy, PartialEq)]
enum RedirectOp {
    In,         // <
    Out,        // >
    Append,     // >>
    Err,        // 2>
    ErrAppend,  // 2>>
    Both,       // &>
    BothAppend, // &>>
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(Word),
    Op(Operator),
    Redirect(RedirectOp),
}

fn op_symbol(op: Operator) -> &'static str {
    match op {
        Operator::Sequential => ";",
        Operator::Parallel => "&",
        Operator::Pipe => "|",
        Operator::CondOnZero => "&&",
        Operator::CondOnNonZero => "||",
        Operator::None => "",
    }
}

/// Parse one command line into a tree. Blank lines and comments yield `None`.
pub fn parse_command_line(line: &str) -> Result<Option<Command>> {
    let tokens = tokenize(line)?;
    TreeBuilder { tokens, pos: 0 }.build()
}

// Tokenizer

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    var_re: Regex,
    tokens: Vec<Token>,
    current: Word,
    segment: String, // unquoted or double-quoted text, still to be split on $NAME
    token_started: bool,
}

fn tokenize(line: &str) -> Result<Vec<Token>> {
    let var_re = Regex::new(VAR_PATTERN).context("Invalid variable pattern")?;
    let mut lexer = Lexer {
        chars: line.chars().peekable(),
        var_re,
        tokens: Vec::new(),
        current: Word::default(),
        segment: String::new(),
        token_started: false,
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn run(&mut self) -> Result<()> {
        while let Some(c) = self.chars.next() {
            match c {
                '\n' | ';' => self.push_op(Operator::Sequential),
                ' ' | '\t' | '\r' => self.finish_word(),
                '#' if !self.token_started => {
                    // Comment until end of line
                    while let Some(&nc) = self.chars.peek() {
                        if nc == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                '&' => {
                    if self.next_is('&') {
                        self.push_op(Operator::CondOnZero);
                    } else if self.next_is('>') {
                        let op = if self.next_is('>') {
                            RedirectOp::BothAppend
                        } else {
                            RedirectOp::Both
                        };
                        self.push_redirect(op);
                    } else {
                        self.push_op(Operator::Parallel);
                    }
                }
                '|' => {
                    if self.next_is('|') {
                        self.push_op(Operator::CondOnNonZero);
                    } else {
                        self.push_op(Operator::Pipe);
                    }
                }
                '<' => self.push_redirect(RedirectOp::In),
                '>' => {
                    let op = if self.next_is('>') { RedirectOp::Append } else { RedirectOp::Out };
                    self.push_redirect(op);
                }
                '2' if !self.token_started && self.chars.peek() == Some(&'>') => {
                    self.chars.next();
                    let op = if self.next_is('>') {
                        RedirectOp::ErrAppend
                    } else {
                        RedirectOp::Err
                    };
                    self.push_redirect(op);
                }
                '\'' => {
                    self.token_started = true;
                    self.flush_segment();
                    let mut quoted = String::new();
                    loop {
                        match self.chars.next() {
                            Some('\'') => break,
                            Some(qc) => quoted.push(qc),
                            None => bail!("Unterminated single quote"),
                        }
                    }
                    self.current.push(WordPart::Literal(quoted));
                }
                '"' => {
                    // Quoted and unquoted text are split into parts separately
                    self.token_started = true;
                    self.flush_segment();
                    loop {
                        match self.chars.next() {
                            Some('"') => break,
                            Some('\\') if matches!(self.chars.peek(), Some('"' | '\\' | '$')) => {
                                let escaped = self.chars.next().unwrap_or('\\');
                                self.push_literal(escaped);
                            }
                            Some(qc) => self.segment.push(qc),
                            None => bail!("Unterminated double quote"),
                        }
                    }
                    self.flush_segment();
                }
                '\\' => {
                    // Trailing backslash is dropped
                    if let Some(escaped) = self.chars.next() {
                        self.token_started = true;
                        self.push_literal(escaped);
                    }
                }
                _ => {
                    self.segment.push(c);
                    self.token_started = true;
                }
            }
        }
        self.finish_word();
        Ok(())
    }

    fn next_is(&mut self, expected: char) -> bool {
        self.chars.next_if_eq(&expected).is_some()
    }

    fn push_literal(&mut self, c: char) {
        self.flush_segment();
        self.current.push(WordPart::Literal(c.to_string()));
    }

    fn push_op(&mut self, op: Operator) {
        self.finish_word();
        self.tokens.push(Token::Op(op));
    }

    fn push_redirect(&mut self, op: RedirectOp) {
        self.finish_word();
        self.tokens.push(Token::Redirect(op));
    }

    /// Split pending text into literal and $NAME parts.
    fn flush_segment(&mut self) {
        if self.segment.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.segment);
        let mut last = 0;
        for caps in self.var_re.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() > last {
                self.current.push(WordPart::Literal(text[last..whole.start()].to_string()));
            }
            if let Some(name) = caps.get(1).or_else(|| caps.get(2)) {
                self.current.push(WordPart::Variable(name.as_str().to_string()));
            }
            last = whole.end();
        }
        if last < text.len() {
            self.current.push(WordPart::Literal(text[last..].to_string()));
        }
    }

    fn finish_word(&mut self) {
        self.flush_segment();
        if self.token_started {
            let mut word = std::mem::take(&mut self.current);
            if word.is_empty() {
                // "" is an explicit empty argument
                word.push(WordPart::Literal(String::new()));
            }
            self.tokens.push(Token::Word(word));
            self.token_started = false;
        }
    }
}

// Tree construction, loosest binding first: ; then & then && || then |

struct TreeBuilder {
    tokens: Vec<Token>,
    pos: usize,
}

impl TreeBuilder {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_op(&self) -> Option<Operator> {
        match self.peek() {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn build(mut self) -> Result<Option<Command>> {
        let mut root: Option<Command> = None;
        loop {
            // Empty statements
            while self.peek_op() == Some(Operator::Sequential) {
                self.consume();
            }
            if self.peek().is_none() {
                break;
            }
            let next = self.parse_parallel()?;
            root = Some(match root {
                Some(prev) => Command::binary(Operator::Sequential, prev, next),
                None => next,
            });
            match self.peek() {
                None | Some(Token::Op(Operator::Sequential)) => {}
                Some(token) => bail!("Unexpected token {:?}", token),
            }
        }
        Ok(root)
    }

    fn parse_parallel(&mut self) -> Result<Command> {
        let mut left = self.parse_conditional()?;
        while self.peek_op() == Some(Operator::Parallel) {
            self.consume();
            // A trailing & just ends the statement
            if matches!(self.peek(), None | Some(Token::Op(Operator::Sequential))) {
                break;
            }
            let right = self.parse_conditional()?;
            left = Command::binary(Operator::Parallel, left, right);
        }
        Ok(left)
    }

    fn parse_conditional(&mut self) -> Result<Command> {
        let mut left = self.parse_pipeline()?;
        while let Some(op @ (Operator::CondOnZero | Operator::CondOnNonZero)) = self.peek_op() {
            self.consume();
            let right = self.parse_pipeline()?;
            left = Command::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_pipeline(&mut self) -> Result<Command> {
        let mut left = self.parse_simple()?;
        while self.peek_op() == Some(Operator::Pipe) {
            self.consume();
            let right = self.parse_simple()?;
            left = Command::binary(Operator::Pipe, left, right);
        }
        Ok(left)
    }

    fn parse_simple(&mut self) -> Result<Command> {
        let mut cmd = SimpleCommand::default();
        let mut has_redirect = false;

        while let Some(token) = self.peek() {
            match token {
                Token::Op(_) => break,
                Token::Word(_) => {
                    let Some(Token::Word(word)) = self.consume() else { break };
                    if cmd.verb.is_none() {
                        cmd.verb = Some(word);
                    } else {
                        cmd.params.push(word);
                    }
                }
                Token::Redirect(op) => {
                    let op = *op;
                    self.consume();
                    let target = match self.consume() {
                        Some(Token::Word(word)) => word,
                        _ => bail!("Missing redirection target"),
                    };
                    apply_redirect(&mut cmd, op, target);
                    has_redirect = true;
                }
            }
        }

        if cmd.verb.is_none() {
            match self.peek_op() {
                _ if has_redirect => bail!("Missing command before redirection"),
                Some(op) => bail!("Unexpected operator '{}'", op_symbol(op)),
                None => bail!("Expected a command"),
            }
        }
        Ok(Command::Simple(cmd))
    }
}

fn apply_redirect(cmd: &mut SimpleCommand, op: RedirectOp, target: Word) {
    match op {
        RedirectOp::In => cmd.input = Some(Redirect::truncate(target)),
        RedirectOp::Out => cmd.output = Some(Redirect::truncate(target)),
        RedirectOp::Append => cmd.output = Some(Redirect::append(target)),
        RedirectOp::Err => cmd.error = Some(Redirect::truncate(target)),
        RedirectOp::ErrAppend => cmd.error = Some(Redirect::append(target)),
        RedirectOp::Both => {
            cmd.output = Some(Redirect::truncate(target.clone()));
            cmd.error = Some(Redirect::truncate(target));
        }
        RedirectOp::BothAppend => {
            cmd.output = Some(Redirect::append(target.clone()));
            cmd.error = Some(Redirect::append(target));
        }
    }
}
