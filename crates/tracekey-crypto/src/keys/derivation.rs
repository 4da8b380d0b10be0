//! Daily key and proximity identifier derivation using HKDF and HMAC

use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::DerivationError;

type HmacSha256 = Hmac<Sha256>;

/// Size of a tracing key in bytes
pub const TRACING_KEY_SIZE: usize = 32;

/// Size of a daily tracing key in bytes
pub const DAILY_KEY_SIZE: usize = 16;

/// Size of a rolling proximity identifier in bytes
pub const PROXIMITY_IDENTIFIER_SIZE: usize = 16;

/// Number of ten-minute intervals in a day
pub const INTERVALS_PER_DAY: usize = 144;

/// Highest valid time interval number
pub const MAX_INTERVAL: u8 = (INTERVALS_PER_DAY - 1) as u8;

/// Label used for daily tracing key derivation
const DAILY_KEY_LABEL: &[u8] = b"CT-DTK";

/// Label used for proximity identifier derivation
const PROXIMITY_LABEL: &[u8] = b"CT-RPI";

/// Width of the day number field in the HKDF info.
///
/// Only the first 4 bytes carry the little-endian day number, the other 28
/// are zero. Published test vectors depend on this exact width, so it must
/// not be narrowed to 4 bytes.
const DAY_NUMBER_FIELD_SIZE: usize = 32;

const DAILY_KEY_INFO_SIZE: usize = DAILY_KEY_LABEL.len() + DAY_NUMBER_FIELD_SIZE;

const PROXIMITY_MESSAGE_SIZE: usize = PROXIMITY_LABEL.len() + 1;

/// Derive the daily tracing key for `day` from a tracing key.
///
/// HKDF-Expand with SHA-256, using the tracing key directly as the
/// pseudorandom key (no extract step). The info parameter is
/// `"CT-DTK" || le32(day) || [0; 28]`.
///
/// # Security
///
/// - Different days produce unrelated keys
/// - Deterministic: same inputs always produce same output
pub fn derive_daily_key(
    tracing_key: &[u8; TRACING_KEY_SIZE],
    day: u32,
) -> Result<[u8; DAILY_KEY_SIZE], DerivationError> {
    let hkdf = Hkdf::<Sha256>::from_prk(tracing_key)
        .map_err(|_| DerivationError::InvalidPrkLength { length: tracing_key.len() })?;

    let mut info = [0u8; DAILY_KEY_INFO_SIZE];
    info[..DAILY_KEY_LABEL.len()].copy_from_slice(DAILY_KEY_LABEL);
    info[DAILY_KEY_LABEL.len()..DAILY_KEY_LABEL.len() + 4].copy_from_slice(&day.to_le_bytes());

    let mut daily_key = [0u8; DAILY_KEY_SIZE];
    hkdf.expand(&info, &mut daily_key)
        .map_err(|_| DerivationError::InvalidOutputLength { length: DAILY_KEY_SIZE })?;

    Ok(daily_key)
}

/// Derive the rolling proximity identifier for one time interval.
///
/// First 16 bytes of `HMAC-SHA256(daily_key, "CT-RPI" || interval)`.
/// Intervals above [`MAX_INTERVAL`] are not rejected; they simply never occur
/// in a real day.
pub fn derive_proximity_identifier(
    daily_key: &[u8; DAILY_KEY_SIZE],
    interval: u8,
) -> [u8; PROXIMITY_IDENTIFIER_SIZE] {
    proximity_identifier_from(keyed_mac(daily_key), interval)
}

/// Derive the proximity identifiers for every interval of the day.
///
/// Element `i` equals `derive_proximity_identifier(daily_key, i)`. The HMAC
/// key schedule runs once and every interval starts from a copy of the keyed
/// state, which is dropped when this call returns.
pub fn derive_all_proximity_identifiers(
    daily_key: &[u8; DAILY_KEY_SIZE],
) -> [[u8; PROXIMITY_IDENTIFIER_SIZE]; INTERVALS_PER_DAY] {
    let keyed = keyed_mac(daily_key);
    std::array::from_fn(|interval| proximity_identifier_from(keyed.clone(), interval as u8))
}

fn keyed_mac(daily_key: &[u8; DAILY_KEY_SIZE]) -> HmacSha256 {
    let Ok(mac) = HmacSha256::new_from_slice(daily_key) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac
}

fn proximity_identifier_from(mut mac: HmacSha256, interval: u8) -> [u8; PROXIMITY_IDENTIFIER_SIZE] {
    let mut message = [0u8; PROXIMITY_MESSAGE_SIZE];
    message[..PROXIMITY_LABEL.len()].copy_from_slice(PROXIMITY_LABEL);
    message[PROXIMITY_LABEL.len()] = interval;

    mac.update(&message);
    let digest = mac.finalize().into_bytes();

    let mut identifier = [0u8; PROXIMITY_IDENTIFIER_SIZE];
    identifier.copy_from_slice(&digest[..PROXIMITY_IDENTIFIER_SIZE]);
    identifier
}
