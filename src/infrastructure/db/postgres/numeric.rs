use sqlx::error::BoxDynError;
use sqlx::postgres::{PgHasArrayType, PgTypeInfo, PgValueRef};
use sqlx::{Decode, Postgres, Type, TypeInfo};

const SIGN_POSITIVE: u16 = 0x0000;
const SIGN_NEGATIVE: u16 = 0x4000;
const SIGN_NAN: u16 = 0xC000;
const SIGN_INFINITY: u16 = 0xD000;
const SIGN_NEGATIVE_INFINITY: u16 = 0xF000;

/// A NUMERIC value in its exact text form, the way `numeric_out` prints it.
///
/// Covers every value the type can hold: arbitrary precision, `NaN`,
/// `Infinity` and `-Infinity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumericText(pub String);

impl Type<Postgres> for NumericText {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("NUMERIC")
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        ty.name() == "NUMERIC"
    }
}

impl PgHasArrayType for NumericText {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_NUMERIC")
    }

    fn array_compatible(ty: &PgTypeInfo) -> bool {
        ty.name() == "NUMERIC[]"
    }
}

impl<'r> Decode<'r, Postgres> for NumericText {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let bytes = <&'r [u8] as Decode<'r, Postgres>>::decode(value)?;
        Ok(Self(render(bytes)?))
    }
}

/// Render the binary NUMERIC layout: `ndigits`, `weight`, `sign`, `dscale`
/// (all 16-bit big endian) followed by `ndigits` base-10000 digits.
fn render(bytes: &[u8]) -> Result<String, BoxDynError> {
    let ndigits = usize::from(read_u16(bytes, 0)?);
    let weight = i32::from(read_u16(bytes, 2)? as i16);
    let sign = read_u16(bytes, 4)?;
    let dscale = usize::from(read_u16(bytes, 6)?);

    match sign {
        SIGN_NAN => return Ok("NaN".to_string()),
        SIGN_INFINITY => return Ok("Infinity".to_string()),
        SIGN_NEGATIVE_INFINITY => return Ok("-Infinity".to_string()),
        SIGN_POSITIVE | SIGN_NEGATIVE => {}
        other => return Err(format!("invalid numeric sign {other:#06x}").into()),
    }

    let digits = (0..ndigits)
        .map(|i| read_u16(bytes, 8 + 2 * i))
        .collect::<Result<Vec<_>, _>>()?;
    let digit = |position: i32| -> u16 {
        usize::try_from(position)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == SIGN_NEGATIVE {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        out.push_str(&digit(0).to_string());
        for position in 1..=weight {
            out.push_str(&format!("{:04}", digit(position)));
        }
    }

    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut position = weight + 1;
        while fraction.len() < dscale {
            fraction.push_str(&format!("{:04}", digit(position)));
            position += 1;
        }
        fraction.truncate(dscale);
        out.push('.');
        out.push_str(&fraction);
    }

    Ok(out)
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16, BoxDynError> {
    match bytes.get(at..at + 2) {
        Some(&[hi, lo]) => Ok(u16::from_be_bytes([hi, lo])),
        _ => Err("numeric value is truncated".into()),
    }
}
