//! # Number Formats
//!
//! The solver reads numbers exactly as the legacy deck generator printed
//! them, so these helpers reproduce those printf-style forms byte for byte:
//!
//! - `repr` - shortest round-trip form, always with a decimal point
//!   (`1.0`, `-10.9`, `1e-05`, `1e+37`)
//! - `sci` - `%.Ne` with a signed, at least two-digit exponent (`1.00e+37`)
//! - `fixed` - `%.Nf`

/// Shortest round-trip rendering of a float
///
/// Plain notation for decimal exponents in `[-4, 16)`, scientific
/// notation outside of it. Integral values keep a trailing `.0`.
pub fn repr(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let sci = format!("{:e}", value);
    let (mantissa, exp) = match split_exponent(&sci) {
        Some(parts) => parts,
        None => return sci,
    };

    if (-4..16).contains(&exp) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        format!("{}e{}", mantissa, signed_exponent(exp))
    }
}

/// Scientific notation with `precision` mantissa digits
pub fn sci(value: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, value);
    match split_exponent(&raw) {
        Some((mantissa, exp)) => format!("{}e{}", mantissa, signed_exponent(exp)),
        None => raw,
    }
}

/// Fixed-point notation with `precision` decimals
pub fn fixed(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

fn split_exponent(s: &str) -> Option<(&str, i32)> {
    let (mantissa, exp) = s.split_once('e')?;
    let exp = exp.parse::<i32>().ok()?;
    Some((mantissa, exp))
}

fn signed_exponent(exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}{:02}", sign, exp.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repr_integral_values_keep_decimal_point() {
        assert_eq!(repr(1.0), "1.0");
        assert_eq!(repr(-10.0), "-10.0");
        assert_eq!(repr(0.0), "0.0");
        assert_eq!(repr(100000.0), "100000.0");
    }

    #[test]
    fn test_repr_fractions() {
        assert_eq!(repr(-10.9), "-10.9");
        assert_eq!(repr(0.6666667), "0.6666667");
        assert_eq!(repr(-0.700452), "-0.700452");
        assert_eq!(repr(0.0001), "0.0001");
    }

    #[test]
    fn test_repr_switches_to_exponent() {
        assert_eq!(repr(1e-5), "1e-05");
        assert_eq!(repr(1.5e-7), "1.5e-07");
        assert_eq!(repr(1e16), "1e+16");
        assert_eq!(repr(-1e37), "-1e+37");
        assert_eq!(repr(1e15), "1000000000000000.0");
    }

    #[test]
    fn test_sci() {
        assert_eq!(sci(1e37, 2), "1.00e+37");
        assert_eq!(sci(-1e37, 2), "-1.00e+37");
        assert_eq!(sci(0.0, 2), "0.00e+00");
        assert_eq!(sci(12.5, 2), "1.25e+01");
        assert_eq!(sci(0.001, 1), "1.0e-03");
    }

    #[test]
    fn test_fixed() {
        assert_eq!(fixed(1.26, 4), "1.2600");
        assert_eq!(fixed(21.42, 3), "21.420");
        assert_eq!(fixed(-3.0, 2), "-3.00");
    }
}
