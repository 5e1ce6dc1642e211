//! Directive token decoding.
//!
//! | Token          | Directive                    |
//! |----------------|------------------------------|
//! | `tw<dp>`       | `TargetWidth(dp)`            |
//! | `th<dp>`       | `TargetHeight(dp)`           |
//! | `pad<w>x<h>`   | `Pad { width, height }`      |
//! | `bg_<hex>`     | `Background { rrggbb, alpha }` |
//! | `round`        | `Round`                      |
//! | `mipmap`       | `Mipmap`                     |
//!
//! Anything else decodes to `Unknown` and is ignored by the resolver.

use crate::error::DirectiveError;

/// A decoded filename directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Output width in dp, height follows the aspect ratio.
    TargetWidth(u32),
    /// Output height in dp, width follows the aspect ratio.
    TargetHeight(u32),
    /// Final canvas size in dp, image centered on transparency.
    Pad { width: u32, height: u32 },
    /// Flatten onto a fill color. `alpha` is empty or two hex digits.
    Background { rrggbb: String, alpha: String },
    Round,
    Mipmap,
    Unknown(String),
}

impl Directive {
    /// Whether this directive mutates the rasterized output in place.
    pub const fn is_post_process(&self) -> bool {
        matches!(self, Self::Pad { .. } | Self::Background { .. } | Self::Round)
    }
}

/// Decode a single token.
pub fn decode(token: &str) -> Result<Directive, DirectiveError> {
    match token {
        "round" => return Ok(Directive::Round),
        "mipmap" => return Ok(Directive::Mipmap),
        _ => {}
    }

    if let Some(body) = token.strip_prefix("pad") {
        let (w, h) = body.split_once('x').ok_or(DirectiveError::Padding)?;
        if h.contains('x') {
            return Err(DirectiveError::Padding);
        }
        return Ok(Directive::Pad {
            width: parse_uint(w)?,
            height: parse_uint(h)?,
        });
    }

    if let Some(body) = token.strip_prefix("tw") {
        return parse_uint(body).map(Directive::TargetWidth);
    }

    if let Some(body) = token.strip_prefix("th") {
        return parse_uint(body).map(Directive::TargetHeight);
    }

    if let Some(hex) = token.strip_prefix("bg_") {
        return parse_background(hex);
    }

    Ok(Directive::Unknown(token.to_string()))
}

/// `rrggbb` or `aarrggbb`.
fn parse_background(hex: &str) -> Result<Directive, DirectiveError> {
    if !hex.is_ascii() {
        return Err(DirectiveError::ColorDigits(hex.to_string()));
    }
    let (alpha, rrggbb) = match hex.len() {
        6 => ("", hex),
        8 => hex.split_at(2),
        n => return Err(DirectiveError::ColorLength(n)),
    };
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DirectiveError::ColorDigits(hex.to_string()));
    }
    Ok(Directive::Background {
        rrggbb: rrggbb.to_string(),
        alpha: alpha.to_string(),
    })
}

/// Non-empty ASCII digits only: rejects signs, whitespace and overflow.
fn parse_uint(s: &str) -> Result<u32, DirectiveError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DirectiveError::NotAnInteger(s.to_string()));
    }
    s.parse()
        .map_err(|_| DirectiveError::NotAnInteger(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sizes() {
        assert_eq!(decode("tw24"), Ok(Directive::TargetWidth(24)));
        assert_eq!(decode("th0"), Ok(Directive::TargetHeight(0)));
        assert_eq!(decode("tw007"), Ok(Directive::TargetWidth(7)));
    }

    #[test]
    fn test_decode_sizes_invalid() {
        for token in ["tw", "tw-3", "tw+3", "tw3.5", "th 4", "twelve", "th99999999999"] {
            assert!(
                matches!(decode(token), Err(DirectiveError::NotAnInteger(_))),
                "expected error for {token}"
            );
        }
    }

    #[test]
    fn test_decode_pad() {
        assert_eq!(
            decode("pad32x48"),
            Ok(Directive::Pad {
                width: 32,
                height: 48
            })
        );
    }

    #[test]
    fn test_decode_pad_invalid() {
        assert_eq!(decode("pad32"), Err(DirectiveError::Padding));
        assert_eq!(decode("pad1x2x3"), Err(DirectiveError::Padding));
        assert!(matches!(
            decode("padAxB"),
            Err(DirectiveError::NotAnInteger(_))
        ));
        assert!(matches!(
            decode("padx4"),
            Err(DirectiveError::NotAnInteger(_))
        ));
    }

    #[test]
    fn test_decode_background() {
        assert_eq!(
            decode("bg_ff0000"),
            Ok(Directive::Background {
                rrggbb: "ff0000".into(),
                alpha: String::new()
            })
        );
        assert_eq!(
            decode("bg_80ff0000"),
            Ok(Directive::Background {
                rrggbb: "ff0000".into(),
                alpha: "80".into()
            })
        );
    }

    #[test]
    fn test_decode_background_invalid() {
        assert_eq!(decode("bg_fff"), Err(DirectiveError::ColorLength(3)));
        assert_eq!(decode("bg_"), Err(DirectiveError::ColorLength(0)));
        assert!(matches!(
            decode("bg_zzzzzz"),
            Err(DirectiveError::ColorDigits(_))
        ));
        assert!(matches!(
            decode("bg_ééé"),
            Err(DirectiveError::ColorDigits(_))
        ));
    }

    #[test]
    fn test_decode_flags() {
        assert_eq!(decode("round"), Ok(Directive::Round));
        assert_eq!(decode("mipmap"), Ok(Directive::Mipmap));
    }

    #[test]
    fn test_decode_unknown_is_ignored() {
        assert_eq!(decode("hdpi"), Ok(Directive::Unknown("hdpi".into())));
        assert_eq!(decode("rounded"), Ok(Directive::Unknown("rounded".into())));
        assert_eq!(decode("bg"), Ok(Directive::Unknown("bg".into())));
    }

    #[test]
    fn test_decode_deterministic() {
        for token in ["tw24", "pad1x2", "bg_80ff0000", "round", "mipmap", "foo"] {
            assert_eq!(decode(token), decode(token));
        }
    }

    #[test]
    fn test_classification() {
        assert!(!Directive::TargetWidth(1).is_post_process());
        assert!(Directive::Round.is_post_process());
        assert!(!Directive::Mipmap.is_post_process());
        assert!(!Directive::Unknown("x".into()).is_post_process());
    }
}
