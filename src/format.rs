//! `sprintf`-style formatting of translated values.
//!
//! Directives follow the usual layout:
//!
//! ```text
//! %[argnum$][flags][width][.precision]conversion
//! ```

use std::borrow::Cow;
use std::fmt::Display;
use std::iter::Peekable;
use std::str::Chars;

/// A value substituted into a template.
///
/// Numeric conversions read numbers out of any variant, so `%d` applied to a
/// float truncates it and `%s` applied to a number prints it.
///
/// # Examples
/// ```
/// use tg_i18n::format::{Arg, sprintf};
///
/// let args: [Arg<'_>; 2] = ["Ada".into(), 2.7.into()];
/// assert_eq!(sprintf("%s owes %.2f EUR", &args), "Ada owes 2.70 EUR");
/// assert_eq!(sprintf("%s owes %d EUR", &args), "Ada owes 2 EUR");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<'a> {
    Str(Cow<'a, str>),
    Int(i64),
    Float(f64),
}

impl Arg<'static> {
    /// Wraps anything printable as a string argument.
    #[must_use]
    pub fn display(value: &dyn Display) -> Self {
        Self::Str(Cow::Owned(value.to_string()))
    }
}

impl Arg<'_> {
    /// The argument as `%s` prints it.
    fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Str(text) => Cow::Borrowed(text.as_ref()),
            Self::Int(value) => Cow::Owned(value.to_string()),
            Self::Float(value) => Cow::Owned(value.to_string()),
        }
    }

    /// The argument as integer conversions read it.
    ///
    /// Floats are truncated toward zero. Strings contribute their leading
    /// number, or zero.
    fn int(&self) -> i64 {
        match self {
            Self::Str(text) => {
                let number = numeric_prefix(text);
                number.parse().unwrap_or_else(|_| truncate(number.parse().unwrap_or_default()))
            }
            Self::Int(value) => *value,
            Self::Float(value) => truncate(*value),
        }
    }

    /// The argument as float conversions read it.
    fn float(&self) -> f64 {
        match self {
            Self::Str(text) => numeric_prefix(text).parse().unwrap_or_default(),
            Self::Int(value) => widen(*value),
            Self::Float(value) => *value,
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Self::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Arg<'_> {
    fn from(value: String) -> Self {
        Self::Str(Cow::Owned(value))
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Self::Str(Cow::Owned(value.to_string()))
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Arg<'_> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Integers that fit into `i64`.
macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

/// Integers that may not fit into `i64`; out of range values saturate.
macro_rules! impl_from_wide_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    let saturated = if value > 0 { i64::MAX } else { i64::MIN };
                    Self::Int(i64::try_from(value).unwrap_or(saturated))
                }
            }
        )*
    };
}

impl_from_wide_int!(u64, usize, isize);

/// A conversion character and what it does with its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    /// `%s`
    Str,
    /// `%d`, `%i`
    Int,
    /// `%u`: the integer's bits read as unsigned
    Unsigned,
    /// `%f`, `%F`
    Float,
    /// `%e`, `%E`
    Exponent { upper: bool },
    /// `%b`
    Binary,
    /// `%o`
    Octal,
    /// `%x`, `%X`
    Hex { upper: bool },
    /// `%c`: the integer as a character, without padding
    Char,
}

impl Conversion {
    /// Maps a conversion character.
    const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::Str,
            'd' | 'i' => Self::Int,
            'u' => Self::Unsigned,
            'f' | 'F' => Self::Float,
            'e' => Self::Exponent { upper: false },
            'E' => Self::Exponent { upper: true },
            'b' => Self::Binary,
            'o' => Self::Octal,
            'x' => Self::Hex { upper: false },
            'X' => Self::Hex { upper: true },
            'c' => Self::Char,
            _ => return None,
        })
    }
}

/// A parsed directive, everything after the `%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Directive {
    /// 1-based argument number from `N$`.
    position: Option<usize>,
    /// `-`: pad on the right.
    left: bool,
    /// `+`: always print a sign on numbers.
    plus: bool,
    /// Space by default, `0` or any `'c`.
    pad: char,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

/// Substitutes `args` into `template`.
///
/// - `%%` becomes `%`
/// - `%s %d %i %u %f %F %e %E %b %o %x %X %c` take the next argument
/// - `%2$s` takes the second argument without moving the cursor
/// - flags `-`, `+`, `0`, space and `'c` (pad with `c`), then a width and a
///   `.precision`: `%05d`, `%-8s`, `%'*10s`, `%.2f`, `%.3s`
///
/// `%f` and `%e` default to six decimals. Unknown conversions, `%0$s`, and
/// conversions without a matching argument are kept verbatim.
///
/// # Examples
/// ```
/// use tg_i18n::format::sprintf;
///
/// assert_eq!(sprintf("%s has %d new messages", &["Ada".into(), 3.into()]), "Ada has 3 new messages");
/// assert_eq!(sprintf("%2$s, %1$s", &["world".into(), "Hello".into()]), "Hello, world");
/// assert_eq!(sprintf("#%05d", &[42.into()]), "#00042");
/// ```
#[must_use]
pub fn sprintf(template: &str, args: &[Arg<'_>]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            result.push(c);
            continue;
        }

        if chars.next_if_eq(&'%').is_some() {
            result.push('%');
            continue;
        }

        let mut lookahead = chars.clone();
        let Some(directive) = parse_directive(&mut lookahead) else {
            // Not a directive; the rest is copied as plain text.
            result.push('%');
            continue;
        };

        let index = match directive.position {
            Some(0) => {
                tracing::warn!(template, "Argument numbers start at 1");
                None
            }
            Some(position) => Some(position - 1),
            None => {
                next_arg += 1;
                Some(next_arg - 1)
            }
        };

        match index.and_then(|index| args.get(index)) {
            Some(arg) => {
                chars = lookahead;
                result.push_str(&render(&directive, arg));
            }
            None => {
                if directive.position != Some(0) {
                    tracing::warn!(template, ?index, "Missing argument for format conversion");
                }
                result.push('%');
                let consumed = chars.clone().count() - lookahead.count();
                result.extend(chars.by_ref().take(consumed));
            }
        }
    }

    result
}

/// Parses a directive, consuming it from `chars`.
///
/// Returns `None` when no known conversion ends it.
fn parse_directive(chars: &mut Peekable<Chars<'_>>) -> Option<Directive> {
    let position = parse_position(chars);

    let mut left = false;
    let mut plus = false;
    let mut pad = ' ';
    loop {
        match chars.peek() {
            Some('-') => left = true,
            Some('+') => plus = true,
            Some('0') => pad = '0',
            Some(' ') => pad = ' ',
            Some('\'') => {
                chars.next();
                pad = chars.next()?;
                continue;
            }
            _ => break,
        }
        chars.next();
    }

    let width = parse_number(chars).unwrap_or_default();
    let precision = if chars.next_if_eq(&'.').is_some() {
        Some(parse_number(chars).unwrap_or_default())
    } else {
        None
    };
    let conversion = chars.next().and_then(Conversion::from_char)?;

    Some(Directive { position, left, plus, pad, width, precision, conversion })
}

/// Reads an `N$` argument position, leaving the input untouched if there
/// is none.
fn parse_position(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut lookahead = chars.clone();
    let position = parse_number(&mut lookahead)?;
    lookahead.next_if_eq(&'$')?;

    *chars = lookahead;
    Some(position)
}

/// Reads a run of decimal digits.
fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(d) = chars.next_if(char::is_ascii_digit) {
        digits.push(d);
    }
    digits.parse().ok()
}

/// Renders one argument according to its directive.
fn render(directive: &Directive, arg: &Arg<'_>) -> String {
    let plus_sign = if directive.plus { "+" } else { "" };

    match directive.conversion {
        Conversion::Str => {
            let text = arg.text();
            let text = match directive.precision {
                Some(precision) => text.chars().take(precision).collect(),
                None => text.into_owned(),
            };
            pad(directive, "", &text)
        }
        Conversion::Int => {
            let value = arg.int();
            let sign = if value < 0 { "-" } else { plus_sign };
            pad(directive, sign, &value.unsigned_abs().to_string())
        }
        Conversion::Unsigned => pad(directive, "", &bits(arg.int()).to_string()),
        Conversion::Float => {
            let precision = directive.precision.unwrap_or(6);
            let text = format!("{:.precision$}", arg.float());
            signed(directive, plus_sign, &text)
        }
        Conversion::Exponent { upper } => {
            let precision = directive.precision.unwrap_or(6);
            let text = format!("{:.precision$e}", arg.float());
            // `1.5e3` -> `1.5e+3`
            let text = match text.split_once('e') {
                Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                    format!("{mantissa}e+{exponent}")
                }
                _ => text,
            };
            let text = if upper { text.to_uppercase() } else { text };
            signed(directive, plus_sign, &text)
        }
        Conversion::Binary => pad(directive, "", &format!("{:b}", bits(arg.int()))),
        Conversion::Octal => pad(directive, "", &format!("{:o}", bits(arg.int()))),
        Conversion::Hex { upper: false } => pad(directive, "", &format!("{:x}", bits(arg.int()))),
        Conversion::Hex { upper: true } => pad(directive, "", &format!("{:X}", bits(arg.int()))),
        Conversion::Char => u32::try_from(arg.int())
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default(),
    }
}

/// Pads formatted float text, moving a leading `-` in front of any zeros.
fn signed(directive: &Directive, plus_sign: &str, text: &str) -> String {
    match text.strip_prefix('-') {
        Some(digits) => pad(directive, "-", digits),
        None => pad(directive, plus_sign, text),
    }
}

/// Applies width, alignment and the pad character.
///
/// Zero padding on the left goes between the sign and the digits.
fn pad(directive: &Directive, sign: &str, body: &str) -> String {
    let len = sign.chars().count() + body.chars().count();
    let fill: String =
        std::iter::repeat_n(directive.pad, directive.width.saturating_sub(len)).collect();

    if directive.left {
        format!("{sign}{body}{fill}")
    } else if directive.pad == '0' {
        format!("{sign}{fill}{body}")
    } else {
        format!("{fill}{sign}{body}")
    }
}

/// The two's complement bits of `value`, as `%u`, `%b`, `%o` and `%x` print
/// negative numbers.
const fn bits(value: i64) -> u64 {
    u64::from_ne_bytes(value.to_ne_bytes())
}

/// Truncates toward zero, saturating at the `i64` bounds.
#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Converts to the nearest float.
#[allow(clippy::cast_precision_loss)]
const fn widen(value: i64) -> f64 {
    value as f64
}

/// The longest prefix of `text` that reads as a decimal number, after
/// leading whitespace: `"12.5kg"` gives `"12.5"`, `"abc"` gives `""`.
fn numeric_prefix(text: &str) -> &str {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => {
                seen_digit = true;
                end = i + 1;
            }
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }

    if seen_digit { text.get(..end).unwrap_or_default() } else { "" }
}
