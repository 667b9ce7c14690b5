//! Text templates that render a badge value into display text.
//!
//! A template carries exactly one numeric placeholder. Both the Rust style
//! `{}` and printf integer conversions are accepted so style files written
//! for other badge implementations keep working. A printf placeholder is
//! `%[flags][width][.precision][length]conv` with flags from `-+ 0#`, an
//! optional `hh`, `h`, `l`, `ll`, `q`, `j`, `z` or `t` length and a `d`,
//! `i` or `u` conversion. `{{`, `}}` and `%%` are literal.
//!
//! Templates with no placeholder, or with more than one, are a caller
//! error. Rendering is best-effort in that case: the first placeholder gets
//! the value, later ones are emitted as written, and a template without any
//! placeholder renders as plain text.

use std::fmt;

/// How a printf placeholder lays out the decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct IntegerSpec {
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    space_sign: bool,
    /// `d` and `i` are signed; `u` ignores the sign flags.
    signed: bool,
    width: usize,
    precision: Option<usize>,
}

impl IntegerSpec {
    fn render(&self, value: u64) -> String {
        let mut digits = match self.precision {
            // An explicit zero precision prints nothing for zero.
            Some(0) if value == 0 => String::new(),
            _ => value.to_string(),
        };
        if let Some(precision) = self.precision {
            if digits.len() < precision {
                digits.insert_str(0, &"0".repeat(precision - digits.len()));
            }
        }

        let sign = match (self.signed, self.plus_sign, self.space_sign) {
            (true, true, _) => "+",
            (true, false, true) => " ",
            _ => "",
        };

        let len = sign.len() + digits.len();
        if len >= self.width {
            return format!("{}{}", sign, digits);
        }
        let fill = self.width - len;
        if self.left_align {
            format!("{}{}{}", sign, digits, " ".repeat(fill))
        } else if self.zero_pad && self.precision.is_none() {
            format!("{}{}{}", sign, "0".repeat(fill), digits)
        } else {
            format!("{}{}{}", " ".repeat(fill), sign, digits)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Literal(String),
    /// `{}`
    Plain,
    /// A printf conversion and the source text it was parsed from.
    Printf(IntegerSpec, String),
}

impl Piece {
    fn is_placeholder(&self) -> bool {
        !matches!(self, Piece::Literal(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFormat {
    template: String,
    pieces: Vec<Piece>,
}

impl TextFormat {
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let pieces = parse(&template);
        Self { template, pieces }
    }

    /// The template as it was given.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn placeholder_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_placeholder()).count()
    }

    /// True when the template has exactly one numeric placeholder.
    pub fn is_well_formed(&self) -> bool {
        self.placeholder_count() == 1
    }

    pub fn format(&self, value: u64) -> String {
        let mut out = String::with_capacity(self.template.len() + 20);
        let mut substituted = false;
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Plain if !substituted => {
                    out.push_str(&value.to_string());
                    substituted = true;
                }
                Piece::Printf(spec, _) if !substituted => {
                    out.push_str(&spec.render(value));
                    substituted = true;
                }
                Piece::Plain => out.push_str("{}"),
                Piece::Printf(_, raw) => out.push_str(raw),
            }
        }
        out
    }
}

impl Default for TextFormat {
    /// Just the number.
    fn default() -> Self {
        Self::new("{}")
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl From<&str> for TextFormat {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for TextFormat {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

fn parse(template: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix("{{") {
            literal.push('{');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("}}") {
            literal.push('}');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("{}") {
            flush(&mut pieces, &mut literal);
            pieces.push(Piece::Plain);
            rest = after;
        } else if let Some(after) = rest.strip_prefix("%%") {
            literal.push('%');
            rest = after;
        } else if let Some((spec, len)) = parse_printf_integer(rest) {
            flush(&mut pieces, &mut literal);
            pieces.push(Piece::Printf(spec, rest[..len].to_string()));
            rest = &rest[len..];
        } else {
            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    flush(&mut pieces, &mut literal);
    pieces
}

fn flush(pieces: &mut Vec<Piece>, literal: &mut String) {
    if !literal.is_empty() {
        pieces.push(Piece::Literal(std::mem::take(literal)));
    }
}

/// Splits leading ASCII digits off `s`.
fn leading_number(s: &str) -> (Option<usize>, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    (s[..end].parse().ok(), &s[end..])
}

/// Parses a printf integer conversion at the start of `s`, returning the
/// spec and the number of bytes it spans.
fn parse_printf_integer(s: &str) -> Option<(IntegerSpec, usize)> {
    let mut rest = s.strip_prefix('%')?;
    let mut spec = IntegerSpec::default();

    while let Some(flag) = rest.chars().next() {
        match flag {
            '-' => spec.left_align = true,
            '0' => spec.zero_pad = true,
            '+' => spec.plus_sign = true,
            ' ' => spec.space_sign = true,
            '#' => {}
            _ => break,
        }
        rest = &rest[1..];
    }

    let (width, after_width) = leading_number(rest);
    spec.width = width.unwrap_or(0);
    rest = after_width;

    if let Some(after_dot) = rest.strip_prefix('.') {
        let (precision, after_precision) = leading_number(after_dot);
        spec.precision = Some(precision.unwrap_or(0));
        rest = after_precision;
    }

    for modifier in ["hh", "h", "ll", "l", "q", "j", "z", "t"] {
        if let Some(after) = rest.strip_prefix(modifier) {
            rest = after;
            break;
        }
    }

    spec.signed = match rest.chars().next()? {
        'd' | 'i' => true,
        'u' => false,
        _ => return None,
    };
    let len = s.len() - rest.len() + 1;
    Some((spec, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_format_is_plain_decimal() {
        let format = TextFormat::default();
        for value in [0, 1, 9, 10, 999, 1000, 1_234_567, u64::MAX] {
            assert_eq!(format.format(value), value.to_string());
        }
        assert_eq!(format.format(1_000_000), "1000000");
    }

    #[test]
    fn printf_placeholders() {
        assert_eq!(TextFormat::new("%d").format(42), "42");
        assert_eq!(TextFormat::new("%lu new").format(3), "3 new");
        assert_eq!(TextFormat::new("x%llu").format(7), "x7");
        assert_eq!(TextFormat::new("%zu").format(5), "5");
        assert_eq!(TextFormat::new("%i%%").format(50), "50%");
    }

    #[test]
    fn brace_placeholder_with_escapes() {
        let format = TextFormat::new("{{{}}}");
        assert!(format.is_well_formed());
        assert_eq!(format.format(8), "{8}");
    }

    #[test]
    fn plus_suffix() {
        assert_eq!(TextFormat::new("{}+").format(99), "99+");
    }

    #[test]
    fn missing_placeholder_renders_template() {
        let format = TextFormat::new("new");
        assert!(!format.is_well_formed());
        assert_eq!(format.placeholder_count(), 0);
        assert_eq!(format.format(12), "new");
    }

    #[test]
    fn extra_placeholders_are_left_verbatim() {
        let format = TextFormat::new("%d of %d");
        assert_eq!(format.placeholder_count(), 2);
        assert!(!format.is_well_formed());
        assert_eq!(format.format(3), "3 of %d");
    }

    #[test]
    fn unknown_conversions_are_literal() {
        let format = TextFormat::new("%s {}");
        assert_eq!(format.placeholder_count(), 1);
        assert_eq!(format.format(1), "%s 1");
    }

    #[test]
    fn non_ascii_literal_text() {
        assert_eq!(TextFormat::new("№{}").format(4), "№4");
    }

    #[test]
    fn printf_width_and_zero_padding() {
        let zero_padded = TextFormat::new("%02d");
        assert!(zero_padded.is_well_formed());
        assert_eq!(zero_padded.format(5), "05");
        assert_eq!(zero_padded.format(123), "123");
        assert_eq!(TextFormat::new("%3d").format(5), "  5");
        assert_eq!(TextFormat::new("%-3d|").format(5), "5  |");
        assert_eq!(TextFormat::new("%05lu").format(42), "00042");
    }

    #[test]
    fn printf_sign_and_precision() {
        assert_eq!(TextFormat::new("%+d").format(5), "+5");
        assert_eq!(TextFormat::new("% d").format(5), " 5");
        // Sign flags do not apply to unsigned conversions.
        assert_eq!(TextFormat::new("%+u").format(5), "5");
        assert_eq!(TextFormat::new("%.3d").format(5), "005");
        assert_eq!(TextFormat::new("%.0d").format(0), "");
        // Precision wins over the zero flag.
        assert_eq!(TextFormat::new("%06.3d").format(7), "   007");
        assert_eq!(TextFormat::new("%+05d").format(7), "+0007");
    }

    #[test]
    fn unused_printf_placeholders_keep_their_flags() {
        assert_eq!(TextFormat::new("%02d/%02d").format(1), "01/%02d");
    }
}
