use crate::axis::LinearAxis;

use winnow::ascii::digit1;
use winnow::combinator::{alt, fail, opt};
use winnow::token::{literal, take_while};
use winnow::{Parser, Result};

/// Maximum number of axis words in one command.
pub const MAX_AXIS_WORDS: usize = 8;

/// One `<letter><value>` axis word of an M92 command.
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum AxisWord {
    /// Linear axis word, like `X80.5`.
    Linear(LinearAxis, f32),
    /// Extrusion word, like `E500`; the target extruder comes from `T`.
    Extruder(f32),
}

/// A parsed M92 command.
///
/// `target`, `microsteps` and `layer_height` hold the `T`, `H` and `L`
/// parameters. Values are in the user's active units; conversion happens
/// when the command is applied.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Request {
    pub axes: heapless::Vec<AxisWord, MAX_AXIS_WORDS>,
    pub target: Option<u8>,
    pub microsteps: Option<u16>,
    pub layer_height: Option<f32>,
}

impl Request {
    /// True when the command carries no parameters at all.
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
            && self.target.is_none()
            && self.microsteps.is_none()
            && self.layer_height.is_none()
    }
}

/// One word of the argument list.
#[derive(Debug, PartialEq, Copy, Clone)]
enum Word {
    Axis(AxisWord),
    Target(u8),
    Microsteps(u16),
    LayerHeight(f32),
}

/// Parses the argument tail of an M92 command.
///
/// The input is everything following the `M92` word, for example
/// `"X80.5 Y80 T1 H16 L0.2"`. Words may appear in any order; the last
/// occurrence of `T`, `H` or `L` wins, while repeated axis words are all
/// kept and applied in order.
///
/// # Returns
///
/// - `Ok(request)` when the whole input was consumed.
/// - `Err(_)` on malformed input, or when more than [MAX_AXIS_WORDS] axis
///   words are supplied.
pub fn parse_request<'s>(input: &mut &'s str) -> Result<Request> {
    let mut request = Request::default();
    loop {
        skip_ws.parse_next(input)?;
        if input.is_empty() {
            break;
        }
        match parse_word.parse_next(input)? {
            Word::Axis(word) => {
                if request.axes.push(word).is_err() {
                    return fail.parse_next(input);
                }
            }
            Word::Target(t) => request.target = Some(t),
            Word::Microsteps(h) => request.microsteps = Some(h),
            Word::LayerHeight(l) => request.layer_height = Some(l),
        }
    }
    Ok(request)
}

/// Parse a single command word.
fn parse_word<'s>(input: &mut &'s str) -> Result<Word> {
    alt((
        parse_axis_word,
        parse_target,
        parse_microsteps,
        parse_layer_height,
    ))
    .parse_next(input)
}

/// Parse an axis word: axis letter followed by a decimal value.
fn parse_axis_word<'s>(input: &mut &'s str) -> Result<Word> {
    let letter = parse_axis_letter.parse_next(input)?;
    skip_ws.parse_next(input)?;
    let value = parse_decimal.parse_next(input)?;
    Ok(Word::Axis(match letter {
        Some(axis) => AxisWord::Linear(axis, value),
        None => AxisWord::Extruder(value),
    }))
}

/// Parse an axis letter; `None` is the extrusion axis.
fn parse_axis_letter<'s>(input: &mut &'s str) -> Result<Option<LinearAxis>> {
    alt((
        literal("X").map(|_| Some(LinearAxis::X)),
        literal("Y").map(|_| Some(LinearAxis::Y)),
        literal("Z").map(|_| Some(LinearAxis::Z)),
        literal("I").map(|_| Some(LinearAxis::I)),
        literal("J").map(|_| Some(LinearAxis::J)),
        literal("K").map(|_| Some(LinearAxis::K)),
        literal("E").map(|_| None),
    ))
    .parse_next(input)
}

/// Parse a `T<n>` target-extruder word.
fn parse_target<'s>(input: &mut &'s str) -> Result<Word> {
    let _ = literal("T").parse_next(input)?;
    skip_ws.parse_next(input)?;
    let value = parse_digits_u8.parse_next(input)?;
    Ok(Word::Target(value))
}

/// Parse an `H[<n>]` microsteps word. A bare `H` means "use the default".
fn parse_microsteps<'s>(input: &mut &'s str) -> Result<Word> {
    let _ = literal("H").parse_next(input)?;
    skip_ws.parse_next(input)?;
    let value = opt(parse_digits_u16).parse_next(input)?;
    Ok(Word::Microsteps(value.unwrap_or(0)))
}

/// Parse an `L[<f>]` layer-height word. A bare `L` parses as zero, which
/// the handler ignores.
fn parse_layer_height<'s>(input: &mut &'s str) -> Result<Word> {
    let _ = literal("L").parse_next(input)?;
    skip_ws.parse_next(input)?;
    let value = opt(parse_decimal).parse_next(input)?;
    Ok(Word::LayerHeight(value.unwrap_or(0.0)))
}

/// Parses a decimal value, like `80`, `-1.5` or `+0.04`.
///
/// Decimal notation only, no scientific notation, at most 6 digits after
/// the decimal point.
fn parse_decimal<'s>(input: &mut &'s str) -> Result<f32> {
    let sign = {
        match opt(parse_sign).parse_next(input)? {
            None => 1.0,
            Some(sign) => sign.to_f32(),
        }
    };
    let int_part = parse_digits_u32.parse_next(input)?;
    let frac_part = {
        match opt(parse_period).parse_next(input)? {
            None => 0.0,
            Some(()) => parse_fraction.parse_next(input)?,
        }
    };
    Ok(sign * (int_part as f32 + frac_part))
}

/// Represents a sign when parsing numbers.
#[derive(Debug, PartialEq, Copy, Clone)]
enum Sign {
    Plus,
    Minus,
}
impl Sign {
    fn to_f32(&self) -> f32 {
        use Sign::*;
        match self {
            Plus => 1.0,
            Minus => -1.0,
        }
    }
}

/// Parse a sign indicator ("+" or "-").
fn parse_sign<'s>(input: &mut &'s str) -> Result<Sign> {
    alt((
        literal("+").map(|_| Sign::Plus),
        literal("-").map(|_| Sign::Minus),
    ))
    .parse_next(input)
}

/// Parse digits (0-9) as a u8.
fn parse_digits_u8<'s>(input: &mut &'s str) -> Result<u8> {
    digit1.try_map(str::parse).parse_next(input)
}

/// Parse digits (0-9) as a u16.
fn parse_digits_u16<'s>(input: &mut &'s str) -> Result<u16> {
    digit1.try_map(str::parse).parse_next(input)
}

/// Parse digits (0-9) as a u32.
fn parse_digits_u32<'s>(input: &mut &'s str) -> Result<u32> {
    digit1.try_map(str::parse).parse_next(input)
}

/// Parse fractional digits into the value they represent.
fn parse_fraction<'s>(input: &mut &'s str) -> Result<f32> {
    digit1
        .try_map(|s: &str| {
            let n_digits = s.len();
            if n_digits > 6 {
                Err("too many fractional digits")
            } else {
                s.parse::<u32>()
                    .map(|number| {
                        number as f32 / 10u32.pow(n_digits as u32) as f32
                    })
                    .map_err(|_| "could not parse digits as u32")
            }
        })
        .parse_next(input)
}

/// Parse and discard a period (`.`)
fn parse_period<'s>(input: &mut &'s str) -> Result<()> {
    literal(".").map(|_| ()).parse_next(input)
}

/// Skip whitespace when parsing.
fn skip_ws<'s>(input: &mut &'s str) -> Result<()> {
    take_while(0.., char::is_whitespace)
        .parse_next(input)
        .map(|_| ())
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn parse(mut input: &str) -> Result<Request> {
        parse_request(&mut input)
    }

    #[test]
    fn test_parse_empty() {
        let request = parse("").unwrap();
        assert!(request.is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_axis_words() {
        let request = parse("X80 Y80.5 Z400").unwrap();
        assert_eq!(
            &[
                AxisWord::Linear(LinearAxis::X, 80.0),
                AxisWord::Linear(LinearAxis::Y, 80.5),
                AxisWord::Linear(LinearAxis::Z, 400.0),
            ],
            request.axes.as_slice()
        );
        assert_eq!(None, request.target);
    }

    #[test]
    fn test_parse_extruder_word() {
        let request = parse("E500 T1").unwrap();
        assert_eq!(&[AxisWord::Extruder(500.0)], request.axes.as_slice());
        assert_eq!(Some(1), request.target);
    }

    #[test]
    fn test_parse_advisor_words() {
        let request = parse("H16 L0.2").unwrap();
        assert_eq!(Some(16), request.microsteps);
        assert_eq!(Some(0.2), request.layer_height);
        assert!(request.axes.is_empty());
    }

    #[test]
    fn test_parse_bare_h_and_l() {
        let request = parse("H L").unwrap();
        assert_eq!(Some(0), request.microsteps);
        assert_eq!(Some(0.0), request.layer_height);
    }

    #[test]
    fn test_parse_negative_value_is_kept_for_validation() {
        let request = parse("X-5").unwrap();
        assert_eq!(
            &[AxisWord::Linear(LinearAxis::X, -5.0)],
            request.axes.as_slice()
        );
    }

    #[test]
    fn test_parse_whitespace_between_letter_and_value() {
        let request = parse("X 80  T 2").unwrap();
        assert_eq!(
            &[AxisWord::Linear(LinearAxis::X, 80.0)],
            request.axes.as_slice()
        );
        assert_eq!(Some(2), request.target);
    }

    #[test]
    fn test_last_t_wins() {
        let request = parse("T1 T2").unwrap();
        assert_eq!(Some(2), request.target);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse("X80 garbled").is_err());
        assert!(parse("Q10").is_err());
        assert!(parse("X").is_err());
    }

    #[test]
    fn test_too_many_axis_words_fails() {
        assert!(parse("X1 X2 X3 X4 X5 X6 X7 X8 X9").is_err());
    }

    proptest! {
        #[test]
        fn test_parse_decimal_from_parts(
            int_part in 0u32..100_000,
            frac_part in 0u32..1000,
        ) {
            let input = format!("X{}.{:03}", int_part, frac_part);
            let expected = int_part as f32 + frac_part as f32 / 1000.0;

            let request = parse(&input).unwrap();
            let [AxisWord::Linear(LinearAxis::X, value)] =
                request.axes.as_slice()
            else {
                panic!("expected one X word");
            };
            prop_assert!((value - expected).abs() <= expected * 1e-6 + 1e-6);
        }
    }

    proptest! {
        #[test]
        fn test_word_order_irrelevant_for_parameters(
            target in 0u8..10,
            microsteps in 1u16..256,
        ) {
            let forward = format!("T{} H{}", target, microsteps);
            let backward = format!("H{} T{}", microsteps, target);
            let a = parse(&forward).unwrap();
            let b = parse(&backward).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
