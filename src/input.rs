//! REPL line parsing. A line either edits one field or fills the whole form.

use anyhow::{Result, bail};

use crate::form::{ConversionRequest, Field};

/// A parsed, non-command REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// `amount 100`, `from gbp`, `to`, or a bare `100`.
    Field(Field, String),
    /// `100 usd eur` or `100 usd to eur`.
    Form(ConversionRequest),
}

/// Parse a line. Currency codes are upper-cased; amounts are kept verbatim.
pub fn parse_line(line: &str) -> Result<Edit> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        bail!("empty input");
    };

    if let Ok(field) = first.parse::<Field>() {
        let value = tokens[1..].join(" ");
        let value = match field {
            Field::Amount => value,
            Field::From | Field::To => value.to_uppercase(),
        };
        return Ok(Edit::Field(field, value));
    }

    match tokens.as_slice() {
        [amount] => Ok(Edit::Field(Field::Amount, amount.to_string())),
        [amount, from, to] => Ok(whole_form(amount, from, to)),
        [amount, from, connector, to] if is_connector(connector) => {
            Ok(whole_form(amount, from, to))
        }
        _ => bail!("expected `<amount> <from> <to>`, `amount|from|to <value>`, or a /command"),
    }
}

/// `to` or `in`, any case.
fn is_connector(word: &str) -> bool {
    matches!(word.to_ascii_lowercase().as_str(), "to" | "in")
}

fn whole_form(amount: &str, from: &str, to: &str) -> Edit {
    Edit::Form(ConversionRequest {
        amount: amount.to_string(),
        from: from.to_uppercase(),
        to: to.to_uppercase(),
    })
}
