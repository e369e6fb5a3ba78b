//! Byte-level case folding and classification.
//!
//! Operates on raw UTF-8 bytes without decoding codepoints. Case folding is
//! implemented for ASCII, Latin-1 Supplement, basic Greek and basic Cyrillic;
//! everything else passes through unchanged. This is not a general Unicode
//! case-folding routine.

/// Result of folding one logical character starting at a given byte.
pub enum Fold {
    /// A single output byte was produced, consuming `consumed` input bytes.
    One(u8, usize),
    /// Two output bytes were produced (a multi-byte char with no ASCII fold),
    /// consuming `consumed` input bytes.
    Two(u8, u8, usize),
    /// The input bytes encode a combining mark; drop it entirely.
    Dropped(usize),
}

#[inline]
pub fn is_ascii_alnum(b: u8) -> bool {
    b.is_ascii_alphanumeric()
}

#[inline]
pub fn is_ascii_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
pub fn is_ascii_lower(b: u8) -> bool {
    b.is_ascii_lowercase()
}

#[inline]
pub fn is_ascii_upper(b: u8) -> bool {
    b.is_ascii_uppercase()
}

#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[inline]
pub fn is_delimiter(b: u8) -> bool {
    matches!(b, b'/' | b':' | b';' | b'|')
}

/// Multi-byte lead bytes and continuation bytes count as alphanumeric for
/// word-boundary purposes, since we never decode them to inspect scripts.
#[inline]
pub fn is_continuation(b: u8) -> bool {
    (0x80..=0xBF).contains(&b)
}

#[inline]
fn is_lead(b: u8) -> bool {
    matches!(b, 0xC3 | 0xCC | 0xCD | 0xCE | 0xCF | 0xD0 | 0xD1)
}

/// True if `b` should be treated as alphanumeric for word-boundary detection:
/// ASCII alnum, or any byte belonging to a multi-byte sequence (lead or
/// continuation byte).
#[inline]
pub fn is_alnum_for_boundary(b: u8) -> bool {
    is_ascii_alnum(b) || is_continuation(b) || is_lead(b)
}

/// Folds the ASCII byte `b` to lowercase, leaving non-letters untouched.
#[inline]
pub fn ascii_lower(b: u8) -> u8 {
    if b.is_ascii_uppercase() { b | 0x20 } else { b }
}

/// Latin-1 Supplement fold table for lead byte 0xC3: lowercased second byte
/// (0xA0..0xBF range, already folded to lower via `+0x20` from 0x80..0x9F)
/// mapped to an ASCII base letter, or `None` if it has no ASCII fold.
fn latin1_ascii_fold(lowered_second: u8) -> Option<u8> {
    match lowered_second {
        // à á â ã ä å -> a
        0xA0..=0xA5 => Some(b'a'),
        // ç -> c
        0xA7 => Some(b'c'),
        // è é ê ë -> e
        0xA8..=0xAB => Some(b'e'),
        // ì í î ï -> i
        0xAC..=0xAF => Some(b'i'),
        // ñ -> n
        0xB1 => Some(b'n'),
        // ò ó ô õ ö -> o
        0xB2..=0xB6 => Some(b'o'),
        // ù ú û ü -> u
        0xB9..=0xBC => Some(b'u'),
        // ý -> y
        0xBD => Some(b'y'),
        // ÿ -> y
        0xBF => Some(b'y'),
        _ => None,
    }
}

/// Lowercases a Latin-1 Supplement second byte (lead 0xC3) in place, per
/// spec.md §4.1: 0x80..0x9E adds 0x20, excluding 0x97 (×); 0x9F (ß) is
/// unchanged (no uppercase).
fn latin1_lower_second(second: u8) -> u8 {
    if second == 0x97 || second == 0x9F {
        second
    } else if (0x80..=0x9E).contains(&second) {
        second + 0x20
    } else {
        second
    }
}

/// Folds one logical character starting at `bytes[i]`. Returns the `Fold`
/// outcome and never panics on truncated/invalid multi-byte sequences: any
/// sequence that can't be classified is passed through byte-for-byte.
pub fn fold_one(bytes: &[u8], i: usize) -> Fold {
    let b0 = bytes[i];
    if b0 < 0x80 {
        return Fold::One(ascii_lower(b0), 1);
    }

    let Some(&b1) = bytes.get(i + 1) else {
        // Truncated multi-byte sequence: pass the lone byte through.
        return Fold::One(b0, 1);
    };

    match b0 {
        0xC3 => {
            let lowered = latin1_lower_second(b1);
            if let Some(ascii) = latin1_ascii_fold(lowered) {
                Fold::One(ascii, 2)
            } else {
                Fold::Two(b0, lowered, 2)
            }
        }
        // Combining marks: U+0300-U+036F, lead 0xCC (0x80..=0xBF) or 0xCD (0x80..=0xAF)
        0xCC if (0x80..=0xBF).contains(&b1) => Fold::Dropped(2),
        0xCD if (0x80..=0xAF).contains(&b1) => Fold::Dropped(2),
        // Greek
        0xCE => {
            if (0x91..=0x9F).contains(&b1) {
                Fold::Two(0xCE, b1 + 0x20, 2)
            } else if (0xA0..=0xA9).contains(&b1) {
                Fold::Two(0xCF, b1 - 0x20, 2)
            } else {
                // CE A2 (unassigned) and anything else: passthrough
                Fold::Two(b0, b1, 2)
            }
        }
        0xCF => Fold::Two(b0, b1, 2),
        // Cyrillic
        0xD0 => {
            if (0x90..=0x9F).contains(&b1) {
                Fold::Two(0xD0, b1 + 0x20, 2)
            } else if (0xA0..=0xAF).contains(&b1) {
                Fold::Two(0xD1, b1 - 0x20, 2)
            } else if (0x80..=0x8F).contains(&b1) {
                Fold::Two(0xD1, b1 + 0x10, 2)
            } else {
                Fold::Two(b0, b1, 2)
            }
        }
        0xD1 => Fold::Two(b0, b1, 2),
        _ => Fold::Two(b0, b1, 2),
    }
}

/// Compresses `raw` into `out` (case-folded, combining marks dropped,
/// Latin-1 letters folded to ASCII where they have a fold). `out` is cleared
/// first. Returns the number of bytes written.
pub fn compress_into(raw: &[u8], out: &mut Vec<u8>) -> usize {
    out.clear();
    let mut i = 0;
    while i < raw.len() {
        match fold_one(raw, i) {
            Fold::One(b, consumed) => {
                out.push(b);
                i += consumed;
            }
            Fold::Two(b0, b1, consumed) => {
                out.push(b0);
                out.push(b1);
                i += consumed;
            }
            Fold::Dropped(consumed) => {
                i += consumed;
            }
        }
    }
    out.len()
}

/// Same as `compress_into` but returns a fresh `Vec`.
pub fn compress(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    compress_into(raw, &mut out);
    out
}

/// Same byte-consumption pattern as `fold_one` (so the output stays
/// index-aligned with `compress`'s output), but preserves original ASCII
/// and Latin-1 letter casing instead of lowercasing. Used to compute the
/// word-boundary mask, which must see camelCase transitions (spec.md §4.3).
fn fold_one_keep_case(bytes: &[u8], i: usize) -> Fold {
    let b0 = bytes[i];
    if b0 < 0x80 {
        return Fold::One(b0, 1);
    }
    let Some(&b1) = bytes.get(i + 1) else {
        return Fold::One(b0, 1);
    };
    match b0 {
        0xC3 => {
            if b1 == 0x97 || b1 == 0x9F {
                Fold::Two(b0, b1, 2)
            } else if (0x80..=0x9E).contains(&b1) {
                let lowered = b1 + 0x20;
                match latin1_ascii_fold(lowered) {
                    Some(ascii) => Fold::One(ascii.to_ascii_uppercase(), 2),
                    None => Fold::Two(b0, b1, 2),
                }
            } else {
                match latin1_ascii_fold(b1) {
                    Some(ascii) => Fold::One(ascii, 2),
                    None => Fold::Two(b0, b1, 2),
                }
            }
        }
        0xCC if (0x80..=0xBF).contains(&b1) => Fold::Dropped(2),
        0xCD if (0x80..=0xAF).contains(&b1) => Fold::Dropped(2),
        _ => Fold::Two(b0, b1, 2),
    }
}

/// Case-preserving counterpart to `compress_into`, index-aligned with it.
pub fn compress_keep_case_into(raw: &[u8], out: &mut Vec<u8>) -> usize {
    out.clear();
    let mut i = 0;
    while i < raw.len() {
        match fold_one_keep_case(raw, i) {
            Fold::One(b, consumed) => {
                out.push(b);
                i += consumed;
            }
            Fold::Two(b0, b1, consumed) => {
                out.push(b0);
                out.push(b1);
                i += consumed;
            }
            Fold::Dropped(consumed) => {
                i += consumed;
            }
        }
    }
    out.len()
}

/// Same as `compress_keep_case_into` but returns a fresh `Vec`.
pub fn compress_keep_case(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    compress_keep_case_into(raw, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_lowercases() {
        assert_eq!(compress(b"Hello World"), b"hello world");
    }

    #[test]
    fn latin1_letters_fold_to_ascii() {
        assert_eq!(compress("café".as_bytes()), b"cafe");
        assert_eq!(compress("CAFÉ".as_bytes()), b"cafe");
        assert_eq!(compress("naïve".as_bytes()), b"naive");
    }

    #[test]
    fn latin1_non_letters_do_not_fold() {
        // × (multiplication sign), ÷, ð, þ, ø, æ keep their two bytes
        assert_eq!(compress("×".as_bytes()), "×".as_bytes());
        assert_eq!(compress("æ".as_bytes()), "æ".as_bytes());
        assert_eq!(compress("Ø".as_bytes()), "ø".as_bytes());
    }

    #[test]
    fn combining_marks_are_dropped() {
        // "e" + U+0301 (combining acute accent)
        let raw = "e\u{0301}".as_bytes();
        assert_eq!(compress(raw), b"e");
    }

    #[test]
    fn greek_folds() {
        assert_eq!(compress("Α".as_bytes()), "α".as_bytes());
        assert_eq!(compress("Ω".as_bytes()), "ω".as_bytes());
        // final sigma passes through
        assert_eq!(compress("ς".as_bytes()), "ς".as_bytes());
    }

    #[test]
    fn cyrillic_folds() {
        assert_eq!(compress("А".as_bytes()), "а".as_bytes());
        assert_eq!(compress("Я".as_bytes()), "я".as_bytes());
        assert_eq!(compress("Ё".as_bytes()), "ё".as_bytes());
    }

    #[test]
    fn truncated_sequences_never_panic() {
        let raw = [0xC3u8];
        assert_eq!(compress(&raw), vec![0xC3]);
        let raw2 = [0xCEu8, 0x91, 0xCF];
        // should not panic, last lone lead byte passes through
        let _ = compress(&raw2);
    }
}
