use alloc::{vec, vec::Vec};

use crate::opcode::Opcode;

/// Packed bit map of valid jump destinations in code.
///
/// Bit `i` is set iff byte `i` holds a `JUMPDEST` opcode that is part of the
/// instruction stream, i.e. not inside the immediate bytes of a push
/// instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Valids {
	bits: Vec<u64>,
	len: usize,
}

impl Valids {
	/// Analyze the given code bytes in a single pass, skipping over push
	/// immediates.
	#[must_use]
	pub fn new(code: &[u8]) -> Self {
		let mut valids = Valids {
			bits: vec![0u64; code.len().div_ceil(64)],
			len: code.len(),
		};

		let mut position = 0;
		while let Some(&byte) = code.get(position) {
			let opcode = Opcode(byte);
			if opcode == Opcode::JUMPDEST {
				valids.bits[position / 64] |= 1 << (position % 64);
			}

			position += match opcode.is_push() {
				Some(n) => n as usize + 1,
				None => 1,
			};
		}

		valids
	}

	/// Whether the position can be jumped to.
	#[must_use]
	pub fn is_valid(&self, position: usize) -> bool {
		position < self.len && self.bits[position / 64] & (1 << (position % 64)) != 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn jumpdest_is_valid() {
		// PUSH1 4, JUMP, STOP, JUMPDEST, STOP
		let valids = Valids::new(&[0x60, 0x04, 0x56, 0x00, 0x5b, 0x00]);
		assert!(valids.is_valid(4));
		assert!(!valids.is_valid(0));
		assert!(!valids.is_valid(3));
	}

	#[test]
	fn jumpdest_inside_push_immediate_is_invalid() {
		// PUSH1 0x5b, STOP — position 1 is immediate data.
		let valids = Valids::new(&[0x60, 0x5b, 0x00]);
		assert!(!valids.is_valid(1));
	}

	#[test]
	fn position_past_code_is_invalid() {
		let valids = Valids::new(&[0x5b]);
		assert!(valids.is_valid(0));
		assert!(!valids.is_valid(1));
		assert!(!valids.is_valid(1000));
	}

	#[test]
	fn truncated_push_immediate_skips_to_end() {
		// PUSH3 with only two immediate bytes remaining; the 0x5b bytes are
		// all immediate data.
		let valids = Valids::new(&[0x62, 0x5b, 0x5b]);
		assert!(!valids.is_valid(1));
		assert!(!valids.is_valid(2));
	}

	#[test]
	fn word_boundaries_are_tracked() {
		// JUMPDEST at positions 0, 63, 64 and 100 of a 128-byte program.
		let mut code = vec![0x00u8; 128];
		code[0] = 0x5b;
		code[63] = 0x5b;
		code[64] = 0x5b;
		code[100] = 0x5b;

		let valids = Valids::new(&code);
		assert!(valids.is_valid(0));
		assert!(valids.is_valid(63));
		assert!(valids.is_valid(64));
		assert!(valids.is_valid(100));
		assert!(!valids.is_valid(1));
		assert!(!valids.is_valid(65));
	}
}
