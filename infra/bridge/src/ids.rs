use nanoid::nanoid;

/// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

const ID_LENGTH: usize = 12;

const CHANNEL_PREFIX: &str = "patchbay-bridge-";

/// Generates an unambiguous adapter origin id.
pub(crate) fn origin_id() -> String {
    nanoid!(ID_LENGTH, SAFE_ALPHABET)
}

/// Generates a fresh, prefixed broadcast channel id.
pub(crate) fn fresh_channel_id() -> String {
    format!("{CHANNEL_PREFIX}{}", nanoid!(ID_LENGTH, SAFE_ALPHABET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_ids_use_the_safe_alphabet() {
        let id = origin_id();
        assert_eq!(id.len(), ID_LENGTH);
        for ch in id.chars() {
            assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in id: {ch}");
        }
    }

    #[test]
    fn channel_ids_are_prefixed_and_unique() {
        let a = fresh_channel_id();
        let b = fresh_channel_id();
        assert!(a.starts_with(CHANNEL_PREFIX));
        assert_ne!(a, b);
    }
}
