//! Scancode to character table for a US QWERTY layout.
//!
//! Only the keys a barcode scanner emits for digits, lowercase letters and `-`
//! are mapped. Every other code yields [`UNMAPPED`], so the lookup is total.

/// Character produced for scancodes with no entry in the table.
pub const UNMAPPED: char = '-';

/// Indexed by scancode. `-` marks codes without a key of their own.
static KEYCODE_TABLE: [char; 0x33] = [
    // 0x00 - 0x0f: reserved, esc, digit row, minus, equal, backspace, tab
    '-', '-', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '-', '-', '-',
    // 0x10 - 0x1f: top letter row, brackets, enter, ctrl, a, s
    'q', 'w', 'e', 'r', 't', 'y', 'u', 'i', 'o', 'p', '-', '-', '-', '-', 'a', 's',
    // 0x20 - 0x2f: home row, punctuation, left shift, backslash, z, x, c, v
    'd', 'f', 'g', 'h', 'j', 'k', 'l', '-', '-', '-', '-', '-', 'z', 'x', 'c', 'v',
    // 0x30 - 0x32
    'b', 'n', 'm',
];

/// Map a scancode to its character.
pub fn keycode_to_char(scancode: u16) -> char {
    KEYCODE_TABLE
        .get(usize::from(scancode))
        .copied()
        .unwrap_or(UNMAPPED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_row() {
        let digits: String = (0x02..=0x0b).map(keycode_to_char).collect();
        assert_eq!(digits, "1234567890");
        assert_eq!(keycode_to_char(0x0c), '-');
    }

    #[test]
    fn test_letter_rows() {
        let top: String = (0x10..=0x19).map(keycode_to_char).collect();
        let home: String = (0x1e..=0x26).map(keycode_to_char).collect();
        let bottom: String = (0x2c..=0x32).map(keycode_to_char).collect();
        assert_eq!(top, "qwertyuiop");
        assert_eq!(home, "asdfghjkl");
        assert_eq!(bottom, "zxcvbnm");
    }

    #[test]
    fn test_unknown_codes_map_to_sentinel() {
        for code in [0x00, 0x01, 0x0d, 0x1c, 0x2a, 0x33, 0x39, 0xff, u16::MAX] {
            assert_eq!(keycode_to_char(code), UNMAPPED, "code {:#x}", code);
        }
    }

    #[test]
    fn test_every_mapped_char_is_ascii() {
        for code in 0..=0x200u16 {
            assert!(keycode_to_char(code).is_ascii());
        }
    }
}
