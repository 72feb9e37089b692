//! Action dispatch — parse an invocation line and execute the capability.
//!
//! The grammar is deliberately tiny: a capability name followed by a
//! parenthesized list of literals. Integers, floats, and quoted strings
//! only; `name=value` keyword form binds against the capability's
//! declared signature. Nothing here evaluates expressions — `add_numbers(
//! 2 + 3, 1)` is a parse error the model reads back as an observation.
//!
//! Dispatch never fails out of the loop. Every path — unknown name, bad
//! arguments, capability failure — produces exactly one [`Observation`],
//! error observations included, so the model always gets feedback to
//! correct itself with.

use reagent_core::capability::{ArgValue, CapabilityRegistry, ParamSpec};
use reagent_core::transcript::Observation;
use tracing::{debug, warn};

/// A parsed invocation, before binding keyword arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub name: String,
    pub positional: Vec<ArgValue>,
    pub keyword: Vec<(String, ArgValue)>,
}

/// Execute one action line against the registry.
///
/// `iteration` is the 1-based action count used for `ObservationN`
/// numbering.
pub async fn dispatch(
    registry: &CapabilityRegistry,
    invocation_text: &str,
    iteration: u32,
) -> Observation {
    let invocation = match parse_invocation(invocation_text) {
        Ok(inv) => inv,
        Err(reason) => {
            warn!(invocation = invocation_text, %reason, "Unparseable action");
            return Observation::error(
                iteration,
                format!("Cannot execute {invocation_text}: {reason}"),
            );
        }
    };

    let Some(capability) = registry.get(&invocation.name) else {
        warn!(name = %invocation.name, "Unknown capability requested");
        return Observation::error(
            iteration,
            format!(
                "Capability '{}' is not in the list of available tools",
                invocation.name
            ),
        );
    };

    let args = match bind_arguments(&invocation, &capability.signature()) {
        Ok(args) => args,
        Err(reason) => {
            return Observation::error(
                iteration,
                format!("Cannot execute {invocation_text}: {reason}"),
            );
        }
    };

    debug!(name = %invocation.name, iteration, "Dispatching capability");

    match capability.invoke(&args).await {
        Ok(output) => Observation::success(iteration, output),
        Err(e) => {
            warn!(name = %invocation.name, error = %e, "Capability failed");
            Observation::error(iteration, e.to_string())
        }
    }
}

/// Merge keyword arguments into the positional list using the declared
/// signature. Keywords must name a declared parameter at a position not
/// already filled positionally.
fn bind_arguments(
    invocation: &Invocation,
    signature: &[ParamSpec],
) -> Result<Vec<ArgValue>, String> {
    if invocation.keyword.is_empty() {
        return Ok(invocation.positional.clone());
    }

    let mut slots: Vec<Option<ArgValue>> = vec![None; signature.len()];
    if invocation.positional.len() > signature.len() {
        return Err(format!(
            "too many arguments: expected at most {}, got {}",
            signature.len(),
            invocation.positional.len() + invocation.keyword.len()
        ));
    }
    for (i, value) in invocation.positional.iter().enumerate() {
        slots[i] = Some(value.clone());
    }

    for (key, value) in &invocation.keyword {
        let Some(position) = signature.iter().position(|p| p.name == *key) else {
            return Err(format!("unknown parameter '{key}'"));
        };
        if slots[position].is_some() {
            return Err(format!("parameter '{key}' given more than once"));
        }
        slots[position] = Some(value.clone());
    }

    // Trailing unfilled slots are dropped; the capability decides whether
    // the resulting arity is acceptable. A gap before a filled slot is not.
    let mut args = Vec::new();
    let mut gap = false;
    for (slot, spec) in slots.into_iter().zip(signature) {
        match slot {
            Some(_) if gap => {
                return Err(format!(
                    "parameter '{}' given but an earlier parameter is missing",
                    spec.name
                ));
            }
            Some(value) => args.push(value),
            None => gap = true,
        }
    }
    Ok(args)
}

/// Parse `name(arg, arg, key=arg)` into an [`Invocation`].
pub fn parse_invocation(text: &str) -> Result<Invocation, String> {
    let text = text.trim();
    let open = text.find('(').ok_or("expected 'name(arguments)'")?;

    let name = text[..open].trim();
    if name.is_empty() {
        return Err("missing capability name".into());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(format!("invalid capability name '{name}'"));
    }

    let rest = &text[open + 1..];
    let close = rest.rfind(')').ok_or("missing closing ')'")?;
    if !rest[close + 1..].trim().is_empty() {
        return Err("unexpected text after ')'".into());
    }

    let mut parser = ArgParser::new(&rest[..close]);
    let (positional, keyword) = parser.parse_all()?;

    Ok(Invocation {
        name: name.to_string(),
        positional,
        keyword,
    })
}

/// Recursive-descent parser for the literal argument list.
struct ArgParser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> ArgParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn parse_all(&mut self) -> Result<(Vec<ArgValue>, Vec<(String, ArgValue)>), String> {
        let mut positional = Vec::new();
        let mut keyword = Vec::new();

        self.skip_whitespace();
        if self.chars.peek().is_none() {
            return Ok((positional, keyword));
        }

        loop {
            self.skip_whitespace();
            match self.parse_argument()? {
                (Some(key), value) => keyword.push((key, value)),
                (None, value) => {
                    if !keyword.is_empty() {
                        return Err("positional argument after keyword argument".into());
                    }
                    positional.push(value);
                }
            }
            self.skip_whitespace();

            match self.chars.next() {
                Some(',') => continue,
                None => break,
                Some(c) => return Err(format!("unexpected character '{c}' in argument list")),
            }
        }

        Ok((positional, keyword))
    }

    /// One argument: a literal, or `identifier = literal`.
    fn parse_argument(&mut self) -> Result<(Option<String>, ArgValue), String> {
        match self.chars.peek() {
            Some('"') | Some('\'') => Ok((None, self.parse_string()?)),
            Some(c) if c.is_ascii_digit() || *c == '-' || *c == '+' || *c == '.' => {
                Ok((None, self.parse_number()?))
            }
            Some(c) if c.is_ascii_alphabetic() || *c == '_' => {
                let key = self.parse_identifier();
                self.skip_whitespace();
                match self.chars.next() {
                    Some('=') => {
                        self.skip_whitespace();
                        let value = match self.chars.peek() {
                            Some('"') | Some('\'') => self.parse_string()?,
                            Some(c) if c.is_ascii_digit() || *c == '-' || *c == '+' || *c == '.' => {
                                self.parse_number()?
                            }
                            _ => return Err(format!("expected a literal value for '{key}'")),
                        };
                        Ok((Some(key), value))
                    }
                    _ => Err(format!(
                        "bare word '{key}' is not a literal; string arguments must be quoted"
                    )),
                }
            }
            Some(c) => Err(format!("unexpected character '{c}'")),
            None => Err("expected an argument".into()),
        }
    }

    fn parse_identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        ident
    }

    /// A quoted string. Both quote styles are accepted since models emit
    /// either; `\` escapes the quote character, backslash, `n`, and `t`.
    fn parse_string(&mut self) -> Result<ArgValue, String> {
        let quote = self.chars.next().ok_or("expected a quote")?;
        let mut out = String::new();
        loop {
            match self.chars.next() {
                Some('\\') => match self.chars.next() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err("unterminated escape in string".into()),
                },
                Some(c) if c == quote => return Ok(ArgValue::Str(out)),
                Some(c) => out.push(c),
                None => return Err("unterminated string literal".into()),
            }
        }
    }

    /// An integer or float literal, optionally signed.
    fn parse_number(&mut self) -> Result<ArgValue, String> {
        let mut raw = String::new();
        if let Some(&c) = self.chars.peek()
            && (c == '-' || c == '+')
        {
            raw.push(c);
            self.chars.next();
        }
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' {
                raw.push(c);
                self.chars.next();
                // allow a sign right after an exponent marker
                if (raw.ends_with('e') || raw.ends_with('E'))
                    && let Some(&s) = self.chars.peek()
                    && (s == '-' || s == '+')
                {
                    raw.push(s);
                    self.chars.next();
                }
            } else {
                break;
            }
        }

        if let Ok(i) = raw.parse::<i64>() {
            return Ok(ArgValue::Int(i));
        }
        raw.parse::<f64>()
            .map(ArgValue::Float)
            .map_err(|_| format!("'{raw}' is not a number"))
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }
}
