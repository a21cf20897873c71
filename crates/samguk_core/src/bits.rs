//! Bit-field accessors for attributes packed inside record integers.
//!
//! Two numbering conventions exist in the save format and each family of
//! fields was laid out against one of them:
//!
//! * `msb16`: `start` counts from the most significant bit of a 16-bit
//!   container, so `start = 0, length = 3` is the top three bits.
//! * `lsb16` / `lsb32`: `start` names the highest bit of the span counted
//!   from bit 0, and the span extends `length` bits downward, so
//!   `start = 3, length = 4` is the low nibble.
//!
//! Injecting a value wider than `length` bits masks it silently.

fn mask(length: u32) -> u64 {
    if length >= 64 { u64::MAX } else { (1u64 << length) - 1 }
}

fn extract_at(value: u64, shift: u32, length: u32) -> u64 {
    (value >> shift) & mask(length)
}

fn inject_at(container: u64, value: u64, shift: u32, length: u32) -> u64 {
    let m = mask(length) << shift;
    (container & !m) | ((value << shift) & m)
}

fn msb_shift(width: u32, start: u32, length: u32) -> u32 {
    debug_assert!(length > 0 && start + length <= width, "span {start}+{length} exceeds {width} bits");
    width - start - length
}

fn lsb_shift(width: u32, start: u32, length: u32) -> u32 {
    debug_assert!(length > 0 && start < width && start + 1 >= length, "span {start}/{length} exceeds {width} bits");
    start + 1 - length
}

pub fn extract_msb16(value: u16, start: u32, length: u32) -> u16 {
    extract_at(u64::from(value), msb_shift(16, start, length), length) as u16
}

pub fn inject_msb16(container: u16, value: u16, start: u32, length: u32) -> u16 {
    inject_at(u64::from(container), u64::from(value), msb_shift(16, start, length), length) as u16
}

pub fn extract_lsb16(value: u16, start: u32, length: u32) -> u16 {
    extract_at(u64::from(value), lsb_shift(16, start, length), length) as u16
}

pub fn inject_lsb16(container: u16, value: u16, start: u32, length: u32) -> u16 {
    inject_at(u64::from(container), u64::from(value), lsb_shift(16, start, length), length) as u16
}

pub fn extract_lsb32(value: u32, start: u32, length: u32) -> u32 {
    extract_at(u64::from(value), lsb_shift(32, start, length), length) as u32
}

pub fn inject_lsb32(container: u32, value: u32, start: u32, length: u32) -> u32 {
    inject_at(u64::from(container), u64::from(value), lsb_shift(32, start, length), length) as u32
}

/// Largest value a `length`-bit span can hold.
pub fn max_value(length: u32) -> u64 {
    mask(length)
}

/// Names from `table` whose bit is set in `mask`, bit `i` testing `table[i]`.
pub fn flag_names(mask: u32, table: &[&'static str]) -> Vec<&'static str> {
    table
        .iter()
        .enumerate()
        .filter(|(bit, _)| *bit < 32 && mask & (1u32 << bit) != 0)
        .map(|(_, name)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn msb16_counts_from_top_bit() {
        assert_eq!(extract_msb16(0b1110_0000_0000_0000, 0, 3), 0b111);
        assert_eq!(extract_msb16(0b0001_1100_0000_0000, 3, 3), 0b111);
        assert_eq!(extract_msb16(0b0000_0000_0000_0111, 13, 3), 0b111);
        assert_eq!(extract_msb16(0b0000_0010_0000_0000, 6, 1), 1);
    }

    #[test]
    fn lsb_family_counts_down_from_start() {
        assert_eq!(extract_lsb16(0x000F, 3, 4), 0xF);
        assert_eq!(extract_lsb16(0xFF00, 15, 8), 0xFF);
        assert_eq!(extract_lsb32(0x0001_0000, 16, 1), 1);
        assert_eq!(extract_lsb32(0x0000_0030, 5, 2), 0b11);
    }

    #[test]
    fn conventions_differ_for_same_arguments() {
        let v = 0x000F;
        assert_eq!(extract_lsb16(v, 3, 4), 0xF);
        assert_eq!(extract_msb16(v, 3, 4), 0);
    }

    #[test]
    fn inject_preserves_other_bits() {
        assert_eq!(inject_msb16(0xFFFF, 0, 3, 3), 0b1110_0011_1111_1111);
        assert_eq!(inject_lsb16(0xFFFF, 0, 7, 4), 0xFF0F);
        assert_eq!(inject_lsb32(0xFFFF_FFFF, 0, 17, 1), 0xFFFD_FFFF);
    }

    #[test]
    fn inject_masks_oversized_values() {
        assert_eq!(inject_msb16(0, 0xFF, 0, 3), 0b1110_0000_0000_0000);
        assert_eq!(inject_lsb16(0, 0x1F, 3, 4), 0x000F);
        assert_eq!(inject_lsb32(0, 0b111, 16, 1), 0x0001_0000);
        assert_eq!(extract_lsb32(inject_lsb32(0, 9, 5, 2), 5, 2), 9 & 0b11);
    }

    #[test]
    fn full_width_spans() {
        assert_eq!(extract_msb16(0xBEEF, 0, 16), 0xBEEF);
        assert_eq!(extract_lsb16(0xBEEF, 15, 16), 0xBEEF);
        assert_eq!(extract_lsb32(0xDEAD_BEEF, 31, 32), 0xDEAD_BEEF);
        assert_eq!(inject_lsb32(0, 0xDEAD_BEEF, 31, 32), 0xDEAD_BEEF);
    }

    #[test]
    fn flag_names_follow_table_order() {
        let table = ["a", "b", "c", "d"];
        assert_eq!(flag_names(0b1010, &table), vec!["b", "d"]);
        assert!(flag_names(0, &table).is_empty());
        assert_eq!(flag_names(u32::MAX, &table), vec!["a", "b", "c", "d"]);
    }

    fn span16(start: u8, length: u8) -> (u32, u32) {
        let length = u32::from(length % 16) + 1;
        let start = u32::from(start) % (16 - length + 1);
        (start, length)
    }

    #[quickcheck]
    fn msb16_inject_then_extract(container: u16, value: u16, start: u8, length: u8) -> bool {
        let (start, length) = span16(start, length);
        let masked = (u64::from(value) & max_value(length)) as u16;
        let out = inject_msb16(container, value, start, length);
        extract_msb16(out, start, length) == masked
            && inject_msb16(out, extract_msb16(container, start, length), start, length)
                == container
    }

    #[quickcheck]
    fn msb16_reinject_is_identity(container: u16, start: u8, length: u8) -> bool {
        let (start, length) = span16(start, length);
        inject_msb16(container, extract_msb16(container, start, length), start, length)
            == container
    }

    #[quickcheck]
    fn lsb16_inject_then_extract(container: u16, value: u16, start: u8, length: u8) -> bool {
        let length = u32::from(length % 16) + 1;
        let start = length - 1 + u32::from(start) % (16 - length + 1);
        let masked = (u64::from(value) & max_value(length)) as u16;
        let out = inject_lsb16(container, value, start, length);
        extract_lsb16(out, start, length) == masked
            && inject_lsb16(out, extract_lsb16(container, start, length), start, length)
                == container
    }

    #[quickcheck]
    fn lsb32_inject_then_extract(container: u32, value: u32, start: u8, length: u8) -> bool {
        let length = u32::from(length % 32) + 1;
        let start = length - 1 + u32::from(start) % (32 - length + 1);
        let masked = (u64::from(value) & max_value(length)) as u32;
        let out = inject_lsb32(container, value, start, length);
        extract_lsb32(out, start, length) == masked
            && inject_lsb32(container, extract_lsb32(container, start, length), start, length)
                == container
    }
}
