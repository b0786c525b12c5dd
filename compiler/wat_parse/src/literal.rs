//! Literal Parser (spec §4.8 C2): converts the verbatim lexeme text
//! carried by `NAT`/`INT`/`FLOAT`/`TEXT` tokens into IR values. Kept as
//! free functions over `&str` rather than methods on the cursor so every
//! grammar module (instructions, limits, offsets, script constants)
//! shares one conversion routine instead of re-parsing ad hoc.

/// Why a literal lexeme failed to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    /// Well-formed number, but it does not fit the requested width.
    OutOfRange,
    /// Not a well-formed number at all (should not happen for lexemes
    /// the lexer already classified as NAT/INT/FLOAT, but the literal
    /// parser does not trust the lexer's classification blindly).
    Malformed,
}

fn strip_underscores(s: &str) -> String {
    s.chars().filter(|&c| c != '_').collect()
}

/// Parse an unsigned magnitude (decimal or `0x`-prefixed hex, `_` digit
/// separators allowed) into a `u128` wide enough to hold any `i64`/`u64`
/// literal before range-checking against the target width.
fn parse_magnitude(s: &str) -> Result<u128, LiteralError> {
    let cleaned = strip_underscores(s);
    let digits = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"));
    match digits {
        Some(hex) if !hex.is_empty() => {
            u128::from_str_radix(hex, 16).map_err(|_| LiteralError::Malformed)
        }
        Some(_) => Err(LiteralError::Malformed),
        None if !cleaned.is_empty() => {
            cleaned.parse::<u128>().map_err(|_| LiteralError::Malformed)
        }
        None => Err(LiteralError::Malformed),
    }
}

/// Parse a `NAT` token: unsigned, no sign prefix permitted.
pub fn parse_nat(lexeme: &str) -> Result<u64, LiteralError> {
    if lexeme.starts_with('+') || lexeme.starts_with('-') {
        return Err(LiteralError::Malformed);
    }
    let magnitude = parse_magnitude(lexeme)?;
    u64::try_from(magnitude).map_err(|_| LiteralError::OutOfRange)
}

/// Parse a `NAT` bounded to 32 bits (memory/table limits, offsets,
/// alignments all fit here).
pub fn parse_nat_u32(lexeme: &str) -> Result<u32, LiteralError> {
    let value = parse_nat(lexeme)?;
    u32::try_from(value).map_err(|_| LiteralError::OutOfRange)
}

/// Parse a `MemArgOffset` token's `offset=N` lexeme into `N`.
pub fn parse_memarg_offset(lexeme: &str) -> Result<u64, LiteralError> {
    let digits = lexeme.strip_prefix("offset=").ok_or(LiteralError::Malformed)?;
    parse_nat(digits)
}

/// Parse a `MemArgAlign` token's `align=N` lexeme into `N`.
pub fn parse_memarg_align(lexeme: &str) -> Result<u32, LiteralError> {
    let digits = lexeme.strip_prefix("align=").ok_or(LiteralError::Malformed)?;
    parse_nat_u32(digits)
}

enum Sign {
    Plus,
    Minus,
    None,
}

fn split_sign(s: &str) -> (Sign, &str) {
    match s.as_bytes().first() {
        Some(b'+') => (Sign::Plus, &s[1..]),
        Some(b'-') => (Sign::Minus, &s[1..]),
        _ => (Sign::None, s),
    }
}

/// Parse an `INT` token (spec: sign optional, magnitude decimal or hex)
/// into the two's-complement bit pattern for a `bits`-wide signed
/// integer. Matches the text format's rule that an unsigned-looking
/// magnitude in the top half of the range (e.g. `0xffffffff` for `i32`)
/// reinterprets as negative rather than overflowing.
fn parse_int_bits(lexeme: &str, bits: u32) -> Result<u64, LiteralError> {
    let (sign, rest) = split_sign(lexeme);
    let magnitude = parse_magnitude(rest)?;
    let modulus: u128 = 1u128 << bits;
    match sign {
        Sign::Minus => {
            let half = modulus / 2;
            if magnitude > half {
                return Err(LiteralError::OutOfRange);
            }
            let wrapped = (modulus - magnitude) % modulus;
            Ok(wrapped as u64)
        }
        Sign::Plus | Sign::None => {
            if magnitude >= modulus {
                return Err(LiteralError::OutOfRange);
            }
            Ok(magnitude as u64)
        }
    }
}

pub fn parse_i32(lexeme: &str) -> Result<i32, LiteralError> {
    parse_int_bits(lexeme, 32).map(|bits| bits as u32 as i32)
}

pub fn parse_i64(lexeme: &str) -> Result<i64, LiteralError> {
    parse_int_bits(lexeme, 64).map(|bits| bits as i64)
}

fn hex_frac_value(digits: &str) -> Result<f64, LiteralError> {
    let mut value = 0.0f64;
    let mut scale = 1.0f64 / 16.0;
    for c in digits.chars() {
        let d = c.to_digit(16).ok_or(LiteralError::Malformed)?;
        value += f64::from(d) * scale;
        scale /= 16.0;
    }
    Ok(value)
}

fn parse_hex_float_body(body: &str) -> Result<f64, LiteralError> {
    let (mantissa, exponent) = match body.split_once(['p', 'P']) {
        Some((m, e)) => (m, e.parse::<i32>().map_err(|_| LiteralError::Malformed)?),
        None => (body, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(LiteralError::Malformed);
    }
    let int_value = if int_part.is_empty() {
        0.0
    } else {
        u128::from_str_radix(int_part, 16)
            .map_err(|_| LiteralError::Malformed)?
            .min(u128::from(u64::MAX)) as f64
    };
    let frac_value = hex_frac_value(frac_part)?;
    Ok((int_value + frac_value) * 2f64.powi(exponent))
}

/// Parse a `FLOAT` token into its IEEE-754 bit pattern, wide enough to
/// later narrow to `f32` or keep as `f64`. Handles decimal floats, `0x`
/// hex floats, `inf`, `nan`, and `nan:0x<payload>`.
pub fn parse_float_bits_f64(lexeme: &str) -> Result<u64, LiteralError> {
    let (sign, rest) = split_sign(lexeme);
    let negative = matches!(sign, Sign::Minus);

    if let Some(payload_hex) = rest.strip_prefix("nan:0x").or_else(|| rest.strip_prefix("nan:0X")) {
        let cleaned = strip_underscores(payload_hex);
        let payload = u64::from_str_radix(&cleaned, 16).map_err(|_| LiteralError::Malformed)?;
        if payload == 0 || payload > 0x000f_ffff_ffff_ffff {
            return Err(LiteralError::OutOfRange);
        }
        let bits = 0x7ff0_0000_0000_0000u64 | payload;
        return Ok(apply_sign_f64(bits, negative));
    }
    if rest == "nan" {
        let bits = 0x7ff8_0000_0000_0000u64;
        return Ok(apply_sign_f64(bits, negative));
    }
    if rest == "inf" {
        let bits = 0x7ff0_0000_0000_0000u64;
        return Ok(apply_sign_f64(bits, negative));
    }

    let cleaned = strip_underscores(rest);
    let magnitude = if let Some(hex_body) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        parse_hex_float_body(hex_body)?
    } else {
        cleaned.parse::<f64>().map_err(|_| LiteralError::Malformed)?
    };
    let bits = magnitude.to_bits();
    Ok(apply_sign_f64(bits, negative))
}

fn apply_sign_f64(bits: u64, negative: bool) -> u64 {
    if negative {
        bits | (1u64 << 63)
    } else {
        bits
    }
}

/// Narrow an `f64` bit pattern produced by [`parse_float_bits_f64`] to
/// an `f32` bit pattern, preserving NaN payload intent where possible.
pub fn narrow_to_f32_bits(lexeme: &str) -> Result<u32, LiteralError> {
    let (sign, rest) = split_sign(lexeme);
    let negative = matches!(sign, Sign::Minus);

    if let Some(payload_hex) = rest.strip_prefix("nan:0x").or_else(|| rest.strip_prefix("nan:0X")) {
        let cleaned = strip_underscores(payload_hex);
        let payload = u32::from_str_radix(&cleaned, 16).map_err(|_| LiteralError::Malformed)?;
        if payload == 0 || payload > 0x007f_ffff {
            return Err(LiteralError::OutOfRange);
        }
        let bits = 0x7f80_0000u32 | payload;
        return Ok(apply_sign_f32(bits, negative));
    }
    if rest == "nan" {
        return Ok(apply_sign_f32(0x7fc0_0000u32, negative));
    }
    if rest == "inf" {
        return Ok(apply_sign_f32(0x7f80_0000u32, negative));
    }

    let cleaned = strip_underscores(rest);
    let magnitude = if let Some(hex_body) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        parse_hex_float_body(hex_body)? as f32
    } else {
        cleaned.parse::<f32>().map_err(|_| LiteralError::Malformed)?
    };
    Ok(apply_sign_f32(magnitude.to_bits(), negative))
}

fn apply_sign_f32(bits: u32, negative: bool) -> u32 {
    if negative {
        bits | (1u32 << 31)
    } else {
        bits
    }
}

/// Unescape a `TEXT` token's lexeme (with its surrounding quotes still
/// attached) into the raw byte string it denotes. WAT string escapes are
/// byte-oriented (`\XX` hex pairs), not Unicode scalar escapes, so this
/// returns `Vec<u8>` rather than `String`.
pub fn parse_text_bytes(lexeme: &str) -> Result<Vec<u8>, LiteralError> {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or(LiteralError::Malformed)?;
    let bytes = inner.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let next = *bytes.get(i + 1).ok_or(LiteralError::Malformed)?;
        match next {
            b'n' => {
                out.push(b'\n');
                i += 2;
            }
            b't' => {
                out.push(b'\t');
                i += 2;
            }
            b'r' => {
                out.push(b'\r');
                i += 2;
            }
            b'\\' => {
                out.push(b'\\');
                i += 2;
            }
            b'\'' => {
                out.push(b'\'');
                i += 2;
            }
            b'"' => {
                out.push(b'"');
                i += 2;
            }
            b'u' => {
                let close = inner[i..]
                    .find('}')
                    .ok_or(LiteralError::Malformed)?;
                let hex = &inner[i + 3..i + close];
                let code = u32::from_str_radix(hex, 16).map_err(|_| LiteralError::Malformed)?;
                let ch = char::from_u32(code).ok_or(LiteralError::Malformed)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                i += close + 1;
            }
            hi if hi.is_ascii_hexdigit() => {
                let lo = *bytes.get(i + 2).ok_or(LiteralError::Malformed)?;
                if !lo.is_ascii_hexdigit() {
                    return Err(LiteralError::Malformed);
                }
                let hex = &inner[i + 1..i + 3];
                let byte = u8::from_str_radix(hex, 16).map_err(|_| LiteralError::Malformed)?;
                out.push(byte);
                i += 3;
            }
            _ => return Err(LiteralError::Malformed),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_nat_parses() {
        assert_eq!(parse_nat("1234"), Ok(1234));
    }

    #[test]
    fn hex_nat_with_underscores_parses() {
        assert_eq!(parse_nat("0x1_00"), Ok(0x100));
    }

    #[test]
    fn nat_rejects_sign() {
        assert_eq!(parse_nat("-1"), Err(LiteralError::Malformed));
    }

    #[test]
    fn negative_i32_parses() {
        assert_eq!(parse_i32("-1"), Ok(-1));
    }

    #[test]
    fn unsigned_hex_reinterprets_as_negative_i32() {
        assert_eq!(parse_i32("0xffffffff"), Ok(-1));
    }

    #[test]
    fn i32_out_of_range_is_rejected() {
        assert_eq!(parse_i32("0x1_0000_0000"), Err(LiteralError::OutOfRange));
    }

    #[test]
    fn i64_min_parses_via_sign() {
        assert_eq!(parse_i64("-9223372036854775808"), Ok(i64::MIN));
    }

    #[test]
    fn decimal_float_round_trips() {
        assert_eq!(parse_float_bits_f64("1.5"), Ok(1.5f64.to_bits()));
    }

    #[test]
    fn hex_float_parses() {
        // 0x1.8p1 == 1.5 * 2 == 3.0
        assert_eq!(parse_float_bits_f64("0x1.8p1"), Ok(3.0f64.to_bits()));
    }

    #[test]
    fn canonical_nan_sets_quiet_bit() {
        let bits = parse_float_bits_f64("nan").unwrap();
        assert_eq!(bits, 0x7ff8_0000_0000_0000);
    }

    #[test]
    fn nan_payload_is_preserved() {
        let bits = parse_float_bits_f64("nan:0x1").unwrap();
        assert_eq!(bits, 0x7ff0_0000_0000_0001);
    }

    #[test]
    fn negative_inf_sets_sign_bit() {
        let bits = parse_float_bits_f64("-inf").unwrap();
        assert_eq!(bits, f64::NEG_INFINITY.to_bits());
    }

    #[test]
    fn text_escapes_decode_to_bytes() {
        assert_eq!(parse_text_bytes("\"a\\tb\"").unwrap(), b"a\tb");
    }

    #[test]
    fn text_hex_escape_decodes_raw_byte() {
        assert_eq!(parse_text_bytes("\"\\00\"").unwrap(), vec![0u8]);
    }

    #[test]
    fn memarg_offset_strips_prefix() {
        assert_eq!(parse_memarg_offset("offset=16"), Ok(16));
    }

    #[test]
    fn memarg_align_strips_prefix() {
        assert_eq!(parse_memarg_align("align=4"), Ok(4));
    }

    #[test]
    fn text_rejects_unterminated_escape() {
        assert!(parse_text_bytes("\"\\\"").is_err());
    }
}
