use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        use Operator::*;

        #[rustfmt::skip]
        let op = match c {
            '+' => Add,
            '-' => Subtract,
            '*' => Multiply,
            '/' => Divide,
            '^' => Power,
            _   => return None,
        };

        Some(op)
    }

    #[rustfmt::skip]
    pub fn symbol(self) -> char {
        use Operator::*;

        match self {
            Add      => '+',
            Subtract => '-',
            Multiply => '*',
            Divide   => '/',
            Power    => '^',
        }
    }

    #[rustfmt::skip]
    pub fn name(self) -> &'static str {
        use Operator::*;

        match self {
            Add      => "add",
            Subtract => "subtract",
            Multiply => "multiply",
            Divide   => "divide",
            Power    => "power",
        }
    }

    /// Compute `a op b`, where `b` was on top of the stack.
    #[rustfmt::skip]
    pub fn apply(self, a: f64, b: f64) -> f64 {
        use Operator::*;

        match self {
            Add      => a + b,
            Subtract => a - b,
            Multiply => a * b,
            Divide   => a / b,
            Power    => a.powf(b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One classified line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quit,
    Clear,
    DeleteLast,
    Flip,
    Negate,
    SaveStack,
    RestoreStack,
    Operator(Operator),
    Number(f64),
    NumberThenOperator(f64, Operator),
    Invalid(String),
}

// Exact matches against the lowercased line. `ss` has to be tried before the
// sign change `s`, which the exact match guarantees.
const KEYWORDS: &[(&str, Command)] = &[
    ("h", Command::Help),
    ("?", Command::Help),
    ("x", Command::Quit),
    ("c", Command::Clear),
    ("d", Command::DeleteLast),
    ("f", Command::Flip),
    ("ss", Command::SaveStack),
    ("rs", Command::RestoreStack),
    ("s", Command::Negate),
];

impl Command {
    /// Classify a line of input. Blank lines produce no command.
    ///
    /// Rules are tried in order: keywords, a lone operator, a number, then a
    /// number followed by an operator. Anything else is `Invalid`.
    pub fn parse(line: &str) -> Option<Self> {
        let text = line.trim();

        if text.is_empty() {
            return None;
        }

        let lowered = text.to_ascii_lowercase();
        if let Some((_, cmd)) = KEYWORDS.iter().find(|(kw, _)| *kw == lowered) {
            return Some(cmd.clone());
        }

        Some(Self::parse_token(text).unwrap_or_else(|| Command::Invalid(text.to_owned())))
    }

    fn parse_token(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let first = chars.next()?;

        if chars.as_str().is_empty() {
            if let Some(op) = Operator::from_char(first) {
                return Some(Command::Operator(op));
            }
        }

        if let Some(value) = parse_number(text) {
            return Some(Command::Number(value));
        }

        let last = text.chars().next_back()?;
        let op = Operator::from_char(last)?;
        let value = parse_number(text[..text.len() - last.len_utf8()].trim_end())?;

        Some(Command::NumberThenOperator(value, op))
    }
}

/// A plain decimal literal: optional leading `-`, digits with at most one
/// `.`, and at least one digit.
fn parse_number(text: &str) -> Option<f64> {
    let body = text.strip_prefix('-').unwrap_or(text);

    let mut seen_digit = false;
    let mut seen_point = false;

    for c in body.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return None,
        }
    }

    if !seen_digit {
        return None;
    }

    text.parse().ok()
}
