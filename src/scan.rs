//! Structured scanning of response and URC lines.
//!
//! A [`Scanner`] walks a byte line from left to right. Literal tokens must
//! match exactly and typed fields are parsed in place; the first mismatch
//! fails the whole scan with [`Error::Parse`].

use core::str::FromStr;

use nom::{
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{digit1, one_of},
    combinator::{opt, recognize},
    sequence::pair,
    IResult,
};

use crate::error::Error;

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
}

impl<'a> Scanner<'a> {
    /// Leading line terminators and blanks are skipped.
    pub fn new(input: &'a [u8]) -> Self {
        let start = input
            .iter()
            .position(|c| !c.is_ascii_whitespace())
            .unwrap_or(input.len());
        Self {
            input: &input[start..],
        }
    }

    fn run<O>(
        &mut self,
        mut parser: impl FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
    ) -> Result<O, Error> {
        let (rest, out) = parser(self.input).map_err(|_| Error::Parse)?;
        self.input = rest;
        Ok(out)
    }

    pub fn literal(&mut self, literal: &str) -> Result<(), Error> {
        self.run(tag(literal.as_bytes())).map(drop)
    }

    /// Consume `literal` if it is next, reporting whether it was.
    pub fn optional(&mut self, literal: &str) -> bool {
        self.literal(literal).is_ok()
    }

    /// Signed or unsigned decimal integer.
    pub fn int<T: FromStr>(&mut self) -> Result<T, Error> {
        let digits = self.run(recognize(pair(opt(one_of("+-")), digit1)))?;
        core::str::from_utf8(digits)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(Error::Parse)
    }

    /// Integer field whose value is not needed.
    pub fn skip_int(&mut self) -> Result<(), Error> {
        self.int::<i64>().map(drop)
    }

    pub fn float(&mut self) -> Result<f32, Error> {
        let text = self.run(take_while1(|c: u8| {
            c.is_ascii_digit() || matches!(c, b'.' | b'-' | b'+' | b'e' | b'E')
        }))?;
        core::str::from_utf8(text)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or(Error::Parse)
    }

    /// One or more decimal digits, as text.
    pub fn digits(&mut self) -> Result<&'a str, Error> {
        let digits = self.run(digit1)?;
        core::str::from_utf8(digits).map_err(|_| Error::Parse)
    }

    /// Everything up to, not including, `delimiter` or the end of the line.
    pub fn until(&mut self, delimiter: u8) -> Result<&'a [u8], Error> {
        self.run(take_while(move |c: u8| c != delimiter && c != b'\r' && c != b'\n'))
    }

    /// Skip past the end of the current line.
    pub fn next_line(&mut self) -> Result<(), Error> {
        let end = self
            .input
            .iter()
            .position(|&c| c == b'\n')
            .ok_or(Error::Parse)?;
        self.input = &self.input[end + 1..];
        Ok(())
    }

    /// Take exactly `len` bytes.
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        if self.input.len() < len {
            return Err(Error::Parse);
        }
        let (head, rest) = self.input.split_at(len);
        self.input = rest;
        Ok(head)
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.input
    }
}
