//! Layout strings and the driver that walks them.

use anyhow::{Context, Result, bail};
use tokstream_decoder::{Driver, Resolver, Signal};
use tokstream_wire::{Token, Value};

/// Parse a comma-separated token list such as `u8,bytes:5,skip:2`.
///
/// # Errors
///
/// Returns an error for an empty layout or any unparsable token.
pub fn parse_layout(layout: &str) -> Result<Vec<Token>> {
    let tokens = layout
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.parse::<Token>()
                .with_context(|| format!("bad token {part:?} in layout"))
        })
        .collect::<Result<Vec<_>>>()?;
    if tokens.is_empty() {
        bail!("layout is empty");
    }
    Ok(tokens)
}

/// Parse one value per layout token.
///
/// # Errors
///
/// Returns an error when the counts differ, a value does not parse for its
/// token, or the layout contains a `skip` token.
pub fn parse_values(tokens: &[Token], values: &str) -> Result<Vec<Value>> {
    let raw: Vec<&str> = values.split(',').collect();
    if raw.len() != tokens.len() {
        bail!("layout has {} tokens but {} values were given", tokens.len(), raw.len());
    }
    tokens
        .iter()
        .zip(raw)
        .map(|(token, raw)| parse_value(token, raw).with_context(|| format!("bad value {raw:?} for {token}")))
        .collect()
}

fn parse_value(token: &Token, raw: &str) -> Result<Value> {
    let value = match token {
        Token::Int(_) => {
            let s = raw.trim();
            let (negative, digits) = match s.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, s),
            };
            let magnitude = match digits.strip_prefix("0x") {
                Some(hex) => i64::from_str_radix(hex, 16)?,
                None => digits.parse::<i64>()?,
            };
            Value::Int(if negative { -magnitude } else { magnitude })
        }
        Token::Bytes(_) => match raw.strip_prefix("0x") {
            Some(digits) => Value::Bytes(hex::decode(digits)?),
            None => Value::Bytes(raw.as_bytes().to_vec()),
        },
        Token::Text { .. } => Value::Text(raw.to_string()),
        Token::Ignore(_) => bail!("skip tokens carry no value"),
    };
    token.validate(&value)?;
    Ok(value)
}

/// A [`Driver`] that asks for the layout's tokens in order and records
/// every value it is given.
///
/// With `repeat` set the layout starts over after its last token, so the
/// driver only stops when the input does. Without it the driver is done
/// after one pass.
pub struct LayoutDriver {
    tokens: Vec<Token>,
    repeat: bool,
    next: usize,
    requested: Option<Token>,
    values: Vec<(Token, Value)>,
}

impl LayoutDriver {
    /// # Errors
    ///
    /// A repeating layout must contain a token that consumes bytes and is
    /// not a skip; otherwise it would cycle forever without input.
    pub fn new(tokens: Vec<Token>, repeat: bool) -> Result<Self> {
        if repeat && !tokens.iter().any(|t| !t.is_ignore() && !t.is_empty()) {
            bail!("a repeating layout needs at least one non-empty, non-skip token");
        }
        Ok(Self {
            tokens,
            repeat,
            next: 0,
            requested: None,
            values: Vec::new(),
        })
    }

    /// Values received so far, paired with the token that produced them.
    pub fn values(&self) -> &[(Token, Value)] {
        &self.values
    }
}

impl Driver for LayoutDriver {
    fn next_token(&mut self, value: Option<Value>, _resolver: Resolver) -> Signal {
        if let (Some(token), Some(value)) = (self.requested.take(), value) {
            self.values.push((token, value));
        }
        if self.next == self.tokens.len() {
            if !self.repeat {
                return Signal::Done;
            }
            self.next = 0;
        }
        let token = self.tokens[self.next];
        self.next += 1;
        self.requested = Some(token);
        Signal::Token(token)
    }
}
