/// Returns `true` if every byte of `bytes` is zero.
///
/// This is the default-value test used by skip-default bulk reads: a
/// primitive is "default" when its in-memory representation is all zero.
/// Sizes 1, 2, 4 and 8 are checked with a single comparison; other sizes
/// are scanned in 8-byte chunks followed by the remaining tail.
///
/// # Examples
///
/// ```
/// use vc_access::value::is_zeroed;
///
/// assert!(is_zeroed(&0_u32.to_ne_bytes()));
/// assert!(!is_zeroed(&1_u64.to_ne_bytes()));
/// assert!(is_zeroed(&[0; 12]));
/// assert!(!is_zeroed(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]));
/// ```
#[inline]
pub fn is_zeroed(bytes: &[u8]) -> bool {
    match *bytes {
        [] => true,
        [a] => a == 0,
        [a, b] => u16::from_ne_bytes([a, b]) == 0,
        [a, b, c, d] => u32::from_ne_bytes([a, b, c, d]) == 0,
        [a, b, c, d, e, f, g, h] => u64::from_ne_bytes([a, b, c, d, e, f, g, h]) == 0,
        _ => scan(bytes),
    }
}

fn scan(bytes: &[u8]) -> bool {
    let chunks = bytes.chunks_exact(8);
    let tail = chunks.remainder();
    for chunk in chunks {
        let mut word = [0_u8; 8];
        word.copy_from_slice(chunk);
        if u64::from_ne_bytes(word) != 0 {
            return false;
        }
    }
    tail.iter().all(|byte| *byte == 0)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::is_zeroed;

    #[test]
    fn fast_sizes() {
        assert!(is_zeroed(&[0]));
        assert!(!is_zeroed(&[3]));
        assert!(is_zeroed(&0_i16.to_ne_bytes()));
        assert!(!is_zeroed(&(-1_i16).to_ne_bytes()));
        assert!(is_zeroed(&0.0_f32.to_ne_bytes()));
        assert!(!is_zeroed(&(-0.0_f64).to_ne_bytes()));
    }

    #[test]
    fn arbitrary_sizes() {
        assert!(is_zeroed(&[]));
        assert!(is_zeroed(&[0; 3]));
        assert!(is_zeroed(&[0; 16]));
        assert!(is_zeroed(&0_u128.to_ne_bytes()));

        for index in 0..23 {
            let mut bytes = [0_u8; 23];
            bytes[index] = 0x80;
            assert!(!is_zeroed(&bytes), "byte {index} was missed");
        }
    }
}
