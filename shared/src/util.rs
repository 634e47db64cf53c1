//! ID and time utilities

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Alphabet for tracking codes: uppercase alphanumerics minus the
/// ambiguous 0/O/1/I, so codes survive being read over the phone.
const TRACKING_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Length of the random part of a tracking code.
const TRACKING_CODE_LEN: usize = 10;

/// Generate a customer-facing tracking code, e.g. `TRK-7GQ2MNPX4C`.
///
/// The `TRK-` prefix keeps it visually distinct from internal numeric IDs.
/// 32^10 values make collisions rare; the unique index on `tracking_id`
/// is the actual guarantee and callers retry on conflict.
pub fn tracking_code() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(4 + TRACKING_CODE_LEN);
    code.push_str("TRK-");
    for _ in 0..TRACKING_CODE_LEN {
        let idx = rng.gen_range(0..TRACKING_ALPHABET.len());
        code.push(TRACKING_ALPHABET[idx] as char);
    }
    code
}
