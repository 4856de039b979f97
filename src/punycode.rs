//! Punycode ([RFC 3492](https://tools.ietf.org/html/rfc3492)) codec for domain labels.
//!
//! `encode` / `decode` work on a single label and add or strip the `xn--`
//! ACE prefix. `encode_domain` / `decode_domain` apply them to every label of
//! a dotted domain and enforce the 255 octet domain limit.
//!
//! ```
//! use tld_extract_r::punycode;
//!
//! assert_eq!(punycode::encode("Bücher").unwrap(), "xn--bcher-kva");
//! assert_eq!(punycode::decode("xn--bcher-kva").unwrap(), "bücher");
//! assert_eq!(punycode::encode_domain("食狮.中国").unwrap(), "xn--85x722f.xn--fiqs8s");
//! ```

use crate::error::{ExtractError, Result};

// Bootstring parameters for Punycode
const BASE: u32 = 36;
const T_MIN: u32 = 1;
const T_MAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;
const DELIMITER: char = '-';

/// ACE prefix marking an encoded label
pub const PREFIX: &str = "xn--";

/// Maximum label length in octets
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum domain length in octets, separators included
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Digit value -> symbol
static ENCODE_TABLE: [u8; BASE as usize] = *b"abcdefghijklmnopqrstuvwxyz0123456789";

const NOT_A_DIGIT: u8 = u8::MAX;

/// ASCII symbol -> digit value, both letter cases accepted
static DECODE_TABLE: [u8; 128] = build_decode_table();

const fn build_decode_table() -> [u8; 128] {
    let mut table = [NOT_A_DIGIT; 128];
    let mut value = 0;
    while value < ENCODE_TABLE.len() {
        let symbol = ENCODE_TABLE[value];
        table[symbol as usize] = value as u8;
        if symbol.is_ascii_lowercase() {
            table[symbol.to_ascii_uppercase() as usize] = value as u8;
        }
        value += 1;
    }
    table
}

#[inline]
fn threshold(k: u32, bias: u32) -> u32 {
    if k <= bias {
        T_MIN
    } else if k >= bias + T_MAX {
        T_MAX
    } else {
        k - bias
    }
}

#[inline]
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - T_MIN) * T_MAX) / 2 {
        delta /= BASE - T_MIN;
        k += BASE;
    }
    k + ((BASE - T_MIN + 1) * delta) / (delta + SKEW)
}

#[inline]
fn digit_to_symbol(digit: u32) -> char {
    ENCODE_TABLE[digit as usize] as char
}

fn symbol_to_digit(byte: u8) -> Result<u32> {
    match DECODE_TABLE.get(byte as usize) {
        Some(&digit) if digit != NOT_A_DIGIT => Ok(digit as u32),
        _ => Err(ExtractError::InvalidEncoding(format!(
            "'{}' is not a base-36 digit",
            byte.escape_ascii()
        ))),
    }
}

fn overflow() -> ExtractError {
    ExtractError::InvalidEncoding("arithmetic overflow".to_string())
}

fn check_label_length(label: &str) -> Result<()> {
    let length = label.len();
    if length == 0 || length > MAX_LABEL_LENGTH {
        return Err(ExtractError::LabelOutOfRange { length });
    }
    Ok(())
}

fn check_domain_length(domain: &str) -> Result<()> {
    let length = domain.len();
    if length > MAX_DOMAIN_LENGTH {
        return Err(ExtractError::DomainOutOfRange { length });
    }
    Ok(())
}

/// Encode a single Unicode label to its ACE form.
///
/// The label is lower-cased first. Pure ASCII labels are returned as they
/// are, without the `xn--` prefix. Both the input (in UTF-8 octets) and the
/// encoded label must fit in 1..=63 octets.
pub fn encode(label: &str) -> Result<String> {
    let label = label.to_lowercase();
    check_label_length(&label)?;

    if label.is_ascii() {
        return Ok(label);
    }

    let code_points: Vec<u32> = label.chars().map(u32::from).collect();

    let mut output = String::with_capacity(MAX_LABEL_LENGTH);
    output.push_str(PREFIX);
    output.extend(label.chars().filter(char::is_ascii));

    let basic = (output.len() - PREFIX.len()) as u32;
    if basic > 0 {
        output.push(DELIMITER);
    }

    let mut non_basic: Vec<u32> = code_points
        .iter()
        .copied()
        .filter(|&c| c >= INITIAL_N)
        .collect();
    non_basic.sort_unstable();
    non_basic.dedup();

    let mut n = INITIAL_N;
    let mut bias = INITIAL_BIAS;
    let mut delta: u32 = 0;
    let mut handled = basic;

    for m in non_basic {
        delta = (m - n)
            .checked_mul(handled + 1)
            .and_then(|step| delta.checked_add(step))
            .ok_or_else(overflow)?;
        n = m;

        for &c in &code_points {
            if c < n {
                delta = delta.checked_add(1).ok_or_else(overflow)?;
            }
            if c == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = threshold(k, bias);
                    if q < t {
                        break;
                    }
                    output.push(digit_to_symbol(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(digit_to_symbol(q));
                bias = adapt(delta, handled + 1, handled == basic);
                delta = 0;
                handled += 1;
            }
        }

        delta += 1;
        n += 1;
    }

    check_label_length(&output)?;
    Ok(output)
}

/// Decode a single ACE label back to Unicode.
///
/// Labels without the `xn--` prefix are returned unchanged. Encoded labels
/// are lower-cased before decoding.
pub fn decode(label: &str) -> Result<String> {
    check_label_length(label)?;

    let has_prefix = label
        .get(..PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(PREFIX));
    if !has_prefix {
        return Ok(label.to_string());
    }

    if !label.is_ascii() {
        return Err(ExtractError::InvalidEncoding(format!(
            "encoded label '{}' contains non-ASCII characters",
            label
        )));
    }

    let encoded = label[PREFIX.len()..].to_ascii_lowercase();
    let (mut output, digits): (Vec<char>, &str) = match encoded.rfind(DELIMITER) {
        Some(position) => (
            encoded[..position].chars().collect(),
            &encoded[position + 1..],
        ),
        None => (Vec::new(), encoded.as_str()),
    };

    let mut n = INITIAL_N;
    let mut bias = INITIAL_BIAS;
    let mut i: u32 = 0;
    let mut bytes = digits.bytes().peekable();

    while bytes.peek().is_some() {
        let previous_i = i;
        let mut weight: u32 = 1;
        let mut k = BASE;

        loop {
            let byte = bytes.next().ok_or_else(|| {
                ExtractError::InvalidEncoding(format!("truncated digit group in '{}'", label))
            })?;
            let digit = symbol_to_digit(byte)?;

            i = digit
                .checked_mul(weight)
                .and_then(|step| i.checked_add(step))
                .ok_or_else(overflow)?;

            let t = threshold(k, bias);
            if digit < t {
                break;
            }

            weight = weight.checked_mul(BASE - t).ok_or_else(overflow)?;
            k += BASE;
        }

        let length = output.len() as u32 + 1;
        bias = adapt(i - previous_i, length, previous_i == 0);
        n = n.checked_add(i / length).ok_or_else(overflow)?;
        i %= length;

        let c = char::from_u32(n).ok_or_else(|| {
            ExtractError::InvalidEncoding(format!("{:#x} is not a valid code point", n))
        })?;
        output.insert(i as usize, c);
        i += 1;
    }

    let decoded: String = output.into_iter().collect();
    check_label_length(&decoded)?;
    Ok(decoded)
}

/// Encode every label of a dotted domain.
pub fn encode_domain(domain: &str) -> Result<String> {
    let encoded = domain
        .split('.')
        .map(encode)
        .collect::<Result<Vec<_>>>()?
        .join(".");
    check_domain_length(&encoded)?;
    Ok(encoded)
}

/// Decode every label of a dotted domain.
pub fn decode_domain(domain: &str) -> Result<String> {
    check_domain_length(domain)?;
    let decoded = domain
        .split('.')
        .map(decode)
        .collect::<Result<Vec<_>>>()?
        .join(".");
    check_domain_length(&decoded)?;
    Ok(decoded)
}

/// Alias of [`encode_domain`]
pub fn to_ascii(domain: &str) -> Result<String> {
    encode_domain(domain)
}

/// Alias of [`decode_domain`]
pub fn to_unicode(domain: &str) -> Result<String> {
    decode_domain(domain)
}
