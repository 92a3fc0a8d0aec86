//! Room code generation.
//!
//! Room codes are 6-character strings over Crockford's Base32 alphabet,
//! which leaves out I, L, O and U so codes read back unambiguously.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const ROOM_CODE_LEN: usize = 6;

/// Generate a random room code.
///
/// # Example
/// ```
/// use continental::utils::join_code::generate_room_code;
///
/// let code = generate_room_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_room_code() -> String {
    let mut rng = rand::rng();
    (0..ROOM_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}
