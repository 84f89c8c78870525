//! Deterministic byte-to-glyph rendering of opaque evaluation outputs.
//!
//! A fixed prefix of the raw output bytes is mapped through a constant
//! 256-entry table of distinct printable symbols, producing a short visual
//! fingerprint. The glyph form is a presentation encoding only, reversible
//! via the table but carrying no security property of its own.

/// Total bijection from byte value to glyph: the 256 code points of the
/// Miscellaneous Symbols block, U+2600..U+26FF, one per byte value.
pub const GLYPH_TABLE: [char; 256] = [
    '☀', '☁', '☂', '☃', '☄', '★', '☆', '☇', '☈', '☉', '☊', '☋', '☌', '☍', '☎', '☏',
    '☐', '☑', '☒', '☓', '☔', '☕', '☖', '☗', '☘', '☙', '☚', '☛', '☜', '☝', '☞', '☟',
    '☠', '☡', '☢', '☣', '☤', '☥', '☦', '☧', '☨', '☩', '☪', '☫', '☬', '☭', '☮', '☯',
    '☰', '☱', '☲', '☳', '☴', '☵', '☶', '☷', '☸', '☹', '☺', '☻', '☼', '☽', '☾', '☿',
    '♀', '♁', '♂', '♃', '♄', '♅', '♆', '♇', '♈', '♉', '♊', '♋', '♌', '♍', '♎', '♏',
    '♐', '♑', '♒', '♓', '♔', '♕', '♖', '♗', '♘', '♙', '♚', '♛', '♜', '♝', '♞', '♟',
    '♠', '♡', '♢', '♣', '♤', '♥', '♦', '♧', '♨', '♩', '♪', '♫', '♬', '♭', '♮', '♯',
    '♰', '♱', '♲', '♳', '♴', '♵', '♶', '♷', '♸', '♹', '♺', '♻', '♼', '♽', '♾', '♿',
    '⚀', '⚁', '⚂', '⚃', '⚄', '⚅', '⚆', '⚇', '⚈', '⚉', '⚊', '⚋', '⚌', '⚍', '⚎', '⚏',
    '⚐', '⚑', '⚒', '⚓', '⚔', '⚕', '⚖', '⚗', '⚘', '⚙', '⚚', '⚛', '⚜', '⚝', '⚞', '⚟',
    '⚠', '⚡', '⚢', '⚣', '⚤', '⚥', '⚦', '⚧', '⚨', '⚩', '⚪', '⚫', '⚬', '⚭', '⚮', '⚯',
    '⚰', '⚱', '⚲', '⚳', '⚴', '⚵', '⚶', '⚷', '⚸', '⚹', '⚺', '⚻', '⚼', '⚽', '⚾', '⚿',
    '⛀', '⛁', '⛂', '⛃', '⛄', '⛅', '⛆', '⛇', '⛈', '⛉', '⛊', '⛋', '⛌', '⛍', '⛎', '⛏',
    '⛐', '⛑', '⛒', '⛓', '⛔', '⛕', '⛖', '⛗', '⛘', '⛙', '⛚', '⛛', '⛜', '⛝', '⛞', '⛟',
    '⛠', '⛡', '⛢', '⛣', '⛤', '⛥', '⛦', '⛧', '⛨', '⛩', '⛪', '⛫', '⛬', '⛭', '⛮', '⛯',
    '⛰', '⛱', '⛲', '⛳', '⛴', '⛵', '⛶', '⛷', '⛸', '⛹', '⛺', '⛻', '⛼', '⛽', '⛾', '⛿',
];

/// Maps the `width`-byte prefix of `raw` through [`GLYPH_TABLE`], one glyph
/// per byte, in byte order. Inputs shorter than `width` encode in full.
pub fn encode(raw: &[u8], width: usize) -> String {
    raw.iter()
        .take(width)
        .map(|&byte| GLYPH_TABLE[byte as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_is_a_bijection_over_all_byte_values() {
        let distinct: HashSet<char> = GLYPH_TABLE.iter().copied().collect();
        assert_eq!(distinct.len(), 256);
    }

    #[test]
    fn encodes_bytes_in_order_through_the_table() {
        assert_eq!(encode(&[0x00, 0x01, 0xff], 3), "☀☁⛿");
        assert_eq!(encode(&[0x05], 1), "★");
    }

    #[test]
    fn truncates_to_the_configured_prefix_width() {
        let raw = [0xabu8; 16];
        let encoded = encode(&raw, 8);
        assert_eq!(encoded.chars().count(), 8);
        assert!(encoded.chars().all(|glyph| glyph == GLYPH_TABLE[0xab]));
    }

    #[test]
    fn shorter_input_encodes_in_full() {
        assert_eq!(encode(&[0x10, 0x20], 8).chars().count(), 2);
    }

    #[test]
    fn encoding_is_deterministic() {
        let raw: Vec<u8> = (0..64u8).collect();
        assert_eq!(encode(&raw, 8), encode(&raw, 8));
    }
}
