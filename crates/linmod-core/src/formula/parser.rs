//! Parser for R-style additive formulas
//!
//! Supported syntax:
//! - Response and terms: `y ~ x1 + x2`
//! - Intercept control: `y ~ 0 + x`, `y ~ 1 + x`, `y ~ 1`

use std::iter::Peekable;
use std::str::Chars;

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::Formula;

/// Formula parser
pub struct FormulaParser<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> FormulaParser<'a> {
    /// Create a new parser
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Parse a formula
    pub fn parse(formula: &str) -> FormulaResult<Formula> {
        FormulaParser::new(formula).parse_formula()
    }

    fn parse_formula(&mut self) -> FormulaResult<Formula> {
        self.skip_whitespace();

        if self.peek_char().is_none() {
            return Err(FormulaError::syntax(self.position, "Empty formula"));
        }
        if self.peek_char() == Some('~') {
            return Err(FormulaError::MissingResponse);
        }

        let response = self.parse_identifier()?;
        self.parse_tilde()?;
        let (has_intercept, terms) = self.parse_rhs()?;

        self.skip_whitespace();
        if self.peek_char().is_some() {
            let remaining: String = self.chars.clone().collect();
            return Err(FormulaError::syntax(
                self.position,
                format!("Trailing characters after formula: '{}'", remaining),
            ));
        }

        Ok(Formula {
            response,
            terms,
            has_intercept,
        })
    }

    /// Parse the right-hand side: optional intercept specifier, then
    /// '+'-separated terms
    fn parse_rhs(&mut self) -> FormulaResult<(bool, Vec<String>)> {
        self.skip_whitespace();

        if self.peek_char().is_none() {
            return Err(FormulaError::syntax(
                self.position,
                "Expected at least one term after '~'",
            ));
        }

        let mut has_intercept = true;
        let mut terms: Vec<String> = Vec::new();

        if let Some(c) = self.peek_char() {
            if c == '0' || c == '1' {
                self.advance();
                has_intercept = c == '1';
                self.skip_whitespace();

                match self.peek_char() {
                    None => return Ok((has_intercept, terms)),
                    Some('+') => {
                        self.advance();
                    }
                    Some(other) => {
                        return Err(FormulaError::syntax(
                            self.position,
                            format!(
                                "Expected '+' after intercept specification, found '{}'",
                                other
                            ),
                        ));
                    }
                }
            }
        }

        loop {
            self.skip_whitespace();

            if self.peek_char().is_none() {
                return Err(FormulaError::syntax(self.position, "Expected term"));
            }

            let term = self.parse_identifier()?;
            // duplicated terms contribute nothing to the design matrix
            if !terms.contains(&term) {
                terms.push(term);
            }

            self.skip_whitespace();
            match self.peek_char() {
                Some('+') => {
                    self.advance();
                }
                _ => break,
            }
        }

        Ok((has_intercept, terms))
    }

    /// Parse an identifier: a letter followed by alphanumerics, '_' or '.'
    fn parse_identifier(&mut self) -> FormulaResult<String> {
        self.skip_whitespace();
        let start_pos = self.position;
        let mut ident = String::new();

        match self.chars.next() {
            Some(c) if c.is_alphabetic() => {
                self.position += 1;
                ident.push(c);
            }
            Some(c) => {
                return Err(FormulaError::syntax(
                    start_pos,
                    format!("Identifier must start with a letter, found '{}'", c),
                ));
            }
            None => {
                return Err(FormulaError::syntax(
                    start_pos,
                    "Unexpected end of input, expected identifier",
                ));
            }
        }

        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }

        Ok(ident)
    }

    fn parse_tilde(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        match self.chars.next() {
            Some('~') => {
                self.position += 1;
                Ok(())
            }
            Some(c) => Err(FormulaError::syntax(
                self.position,
                format!("Expected '~', found '{}'", c),
            )),
            None => Err(FormulaError::syntax(
                self.position,
                "Unexpected end of formula, expected '~'",
            )),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn advance(&mut self) {
        self.chars.next();
        self.position += 1;
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }
}
