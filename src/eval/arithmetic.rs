use primitive_types::{U256, U512};

use crate::utils::I256;

#[inline]
pub fn div(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		op1 / op2
	}
}

#[inline]
pub fn sdiv(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	let ret = op1 / op2;
	ret.into()
}

#[inline]
pub fn rem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		op1 % op2
	}
}

#[inline]
pub fn srem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		let op1: I256 = op1.into();
		let op2: I256 = op2.into();
		let ret = op1 % op2;
		ret.into()
	}
}

#[inline]
pub fn addmod(op1: U256, op2: U256, op3: U256) -> U256 {
	let op1: U512 = op1.into();
	let op2: U512 = op2.into();
	let op3: U512 = op3.into();

	if op3 == U512::zero() {
		U256::zero()
	} else {
		let v = (op1 + op2) % op3;
		v.try_into()
			.expect("op3 is less than U256::MAX, thus it never overflows; qed")
	}
}

#[inline]
pub fn mulmod(op1: U256, op2: U256, op3: U256) -> U256 {
	let op1: U512 = op1.into();
	let op2: U512 = op2.into();
	let op3: U512 = op3.into();

	if op3 == U512::zero() {
		U256::zero()
	} else {
		let v = (op1 * op2) % op3;
		v.try_into()
			.expect("op3 is less than U256::MAX, thus it never overflows; qed")
	}
}

#[inline]
pub fn exp(op1: U256, op2: U256) -> U256 {
	let mut op1 = op1;
	let mut op2 = op2;
	let mut r: U256 = 1.into();

	while op2 != U256::zero() {
		if op2 & 1.into() != U256::zero() {
			r = r.overflowing_mul(op1).0;
		}
		op2 >>= 1;
		op1 = op1.overflowing_mul(op1).0;
	}

	r
}

#[inline]
pub fn signextend(op1: U256, op2: U256) -> U256 {
	if op1 < U256::from(32) {
		let bit_index = (8 * op1.low_u32() + 7) as usize;
		let bit = op2.bit(bit_index);
		let mask = (U256::one() << bit_index) - U256::one();
		if bit {
			op2 | !mask
		} else {
			op2 & mask
		}
	} else {
		op2
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn min_signed() -> U256 {
		U256::one() << 255
	}

	#[test]
	fn div_by_zero_is_zero() {
		assert_eq!(div(U256::from(100), U256::zero()), U256::zero());
		assert_eq!(rem(U256::from(100), U256::zero()), U256::zero());
		assert_eq!(sdiv(U256::from(100), U256::zero()), U256::zero());
		assert_eq!(srem(U256::from(100), U256::zero()), U256::zero());
	}

	#[test]
	fn sdiv_min_by_minus_one_wraps() {
		let minus_one = U256::max_value();
		assert_eq!(sdiv(min_signed(), minus_one), min_signed());
	}

	#[test]
	fn srem_sign_follows_dividend() {
		// -7 % 3 == -1
		let minus_seven = U256::zero().overflowing_sub(U256::from(7)).0;
		let minus_one = U256::max_value();
		assert_eq!(srem(minus_seven, U256::from(3)), minus_one);

		// 7 % -3 == 1
		let minus_three = U256::zero().overflowing_sub(U256::from(3)).0;
		assert_eq!(srem(U256::from(7), minus_three), U256::one());
	}

	#[test]
	fn modular_ops_with_zero_modulus_are_zero() {
		assert_eq!(
			addmod(U256::from(1), U256::from(2), U256::zero()),
			U256::zero()
		);
		assert_eq!(
			mulmod(U256::from(3), U256::from(4), U256::zero()),
			U256::zero()
		);
	}

	#[test]
	fn addmod_does_not_wrap_at_256_bits() {
		let max = U256::max_value();
		// (2^256 - 1 + 2^256 - 1) % (2^256 - 1) == 0
		assert_eq!(addmod(max, max, max), U256::zero());
		// (2^256 - 1 + 1) % 7: the sum only fits in 512 bits.
		assert_eq!(addmod(max, U256::one(), U256::from(7)), (max % 7) + 1);
	}

	#[test]
	fn exp_wraps_modulo_2_256() {
		assert_eq!(exp(U256::from(2), U256::from(10)), U256::from(1024));
		assert_eq!(exp(U256::from(2), U256::from(256)), U256::zero());
		assert_eq!(exp(U256::from(3), U256::zero()), U256::one());
	}

	#[test]
	fn signextend_from_byte_zero() {
		assert_eq!(
			signextend(U256::zero(), U256::from(0xff)),
			U256::max_value()
		);
		assert_eq!(signextend(U256::zero(), U256::from(0x7f)), U256::from(0x7f));
		assert_eq!(
			signextend(U256::zero(), U256::from(0x17f)),
			U256::from(0x7f)
		);
	}

	#[test]
	fn signextend_past_width_is_identity() {
		let value = U256::from(0xdeadbeefu64);
		assert_eq!(signextend(U256::from(31), value), value);
		assert_eq!(signextend(U256::from(100), value), value);
	}
}
