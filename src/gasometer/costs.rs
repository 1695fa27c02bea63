use primitive_types::{H256, U256};

use super::consts::*;
use crate::{
	config::Config,
	error::{ExitError, ExitException},
};

fn words(len: u64) -> u64 {
	len.div_ceil(32)
}

pub fn memory_gas(words: usize) -> Result<u64, ExitError> {
	let words = words as u64;

	G_MEMORY
		.checked_mul(words)
		.and_then(|linear| {
			words
				.checked_mul(words)
				.map(|quad| (linear, quad / 512))
		})
		.and_then(|(linear, quad)| linear.checked_add(quad))
		.ok_or_else(|| ExitException::OutOfGas.into())
}

pub fn exp_cost(power: U256, config: &Config) -> Result<u64, ExitError> {
	if power == U256::zero() {
		Ok(G_EXP)
	} else {
		let byte_len = (power.bits() as u64).div_ceil(8);
		let gas = G_EXP
			.checked_add(
				config
					.gas_expbyte()
					.checked_mul(byte_len)
					.ok_or(ExitException::OutOfGas)?,
			)
			.ok_or(ExitException::OutOfGas)?;
		Ok(gas)
	}
}

pub fn verylowcopy_cost(len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitException::OutOfGas.into());
	}

	let gas = G_VERYLOW
		.checked_add(
			G_COPY
				.checked_mul(words(len.as_u64()))
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or(ExitException::OutOfGas)?;
	Ok(gas)
}

pub fn extcodecopy_cost(len: U256, target_is_cold: bool, config: &Config) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitException::OutOfGas.into());
	}

	let gas = address_access_cost(target_is_cold, config.gas_ext_code(), config)
		.checked_add(
			G_COPY
				.checked_mul(words(len.as_u64()))
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or(ExitException::OutOfGas)?;
	Ok(gas)
}

pub fn sha3_cost(len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitException::OutOfGas.into());
	}

	let gas = G_SHA3
		.checked_add(
			G_SHA3WORD
				.checked_mul(words(len.as_u64()))
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or(ExitException::OutOfGas)?;
	Ok(gas)
}

pub fn create2_cost(len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitException::OutOfGas.into());
	}

	let gas = G_CREATE
		.checked_add(
			G_SHA3WORD
				.checked_mul(words(len.as_u64()))
				.ok_or(ExitException::OutOfGas)?,
		)
		.ok_or(ExitException::OutOfGas)?;
	Ok(gas)
}

pub fn log_cost(n: u8, len: U256) -> Result<u64, ExitError> {
	if len > U256::from(u64::MAX) {
		return Err(ExitException::OutOfGas.into());
	}

	let gas = G_LOG
		.checked_add(
			G_LOGDATA
				.checked_mul(len.as_u64())
				.ok_or(ExitException::OutOfGas)?,
		)
		.and_then(|gas| gas.checked_add(G_LOGTOPIC * u64::from(n)))
		.ok_or(ExitException::OutOfGas)?;
	Ok(gas)
}

pub fn sload_cost(target_is_cold: bool, config: &Config) -> u64 {
	if config.eip2929_increase_state_access_gas {
		if target_is_cold {
			config.gas_sload_cold()
		} else {
			config.gas_storage_read_warm()
		}
	} else {
		config.gas_sload()
	}
}

pub fn address_access_cost(target_is_cold: bool, regular_value: u64, config: &Config) -> u64 {
	if config.eip2929_increase_state_access_gas {
		if target_is_cold {
			config.gas_account_access_cold()
		} else {
			config.gas_storage_read_warm()
		}
	} else {
		regular_value
	}
}

pub fn call_cost(
	value: U256,
	target_is_cold: bool,
	is_call_or_callcode: bool,
	is_call_or_staticcall: bool,
	new_account: bool,
	config: &Config,
) -> u64 {
	let transfers_value = value != U256::zero();
	address_access_cost(target_is_cold, config.gas_call(), config)
		+ xfer_cost(is_call_or_callcode, transfers_value)
		+ new_cost(is_call_or_staticcall, new_account, transfers_value, config)
}

fn xfer_cost(is_call_or_callcode: bool, transfers_value: bool) -> u64 {
	if is_call_or_callcode && transfers_value {
		G_CALLVALUE
	} else {
		0
	}
}

fn new_cost(
	is_call_or_staticcall: bool,
	new_account: bool,
	transfers_value: bool,
	config: &Config,
) -> u64 {
	if is_call_or_staticcall {
		if config.eip161_empty_check {
			if transfers_value && new_account {
				G_NEWACCOUNT
			} else {
				0
			}
		} else if new_account {
			G_NEWACCOUNT
		} else {
			0
		}
	} else {
		0
	}
}

pub fn call_extra_check(gas: U256, after_gas: u64, config: &Config) -> Result<(), ExitException> {
	if config.eip150_no_err_on_call_with_more_gas {
		Ok(())
	} else if gas > U256::from(after_gas) {
		Err(ExitException::OutOfGas)
	} else {
		Ok(())
	}
}

pub fn selfdestruct_cost(
	value: U256,
	target_is_cold: bool,
	target_exists: bool,
	config: &Config,
) -> u64 {
	let should_charge_topup = if config.eip161_empty_check {
		value != U256::zero() && !target_exists
	} else {
		!target_exists
	};

	let selfdestruct_gas_topup = if should_charge_topup {
		config.gas_selfdestruct_new_account()
	} else {
		0
	};

	let mut gas = config.gas_selfdestruct() + selfdestruct_gas_topup;
	if config.eip2929_increase_state_access_gas && target_is_cold {
		gas += config.gas_account_access_cold();
	}

	gas
}

pub fn selfdestruct_refund(already_removed: bool) -> i64 {
	if already_removed {
		0
	} else {
		R_SELFDESTRUCT
	}
}

pub fn sstore_cost(
	original: H256,
	current: H256,
	new: H256,
	gas: u64,
	target_is_cold: bool,
	config: &Config,
) -> Result<u64, ExitError> {
	if config.eip2200_sstore_revert_under_stipend && gas <= config.call_stipend() {
		return Err(ExitException::OutOfGas.into());
	}

	let zero = H256::default();

	let gas_cost = if config.eip2200_sstore_gas_metering {
		let sload_gas = if config.eip2929_increase_state_access_gas {
			config.gas_storage_read_warm()
		} else {
			config.gas_sload()
		};

		if new == current {
			sload_gas
		} else if original == current {
			if original == zero {
				config.gas_sstore_set()
			} else {
				config.gas_sstore_reset()
			}
		} else {
			sload_gas
		}
	} else if current == zero && new != zero {
		config.gas_sstore_set()
	} else {
		config.gas_sstore_reset()
	};

	Ok(if target_is_cold {
		gas_cost + config.gas_sload_cold()
	} else {
		gas_cost
	})
}

pub fn sstore_refund(original: H256, current: H256, new: H256, config: &Config) -> i64 {
	let zero = H256::default();

	if config.eip2200_sstore_gas_metering {
		let sload_gas = if config.eip2929_increase_state_access_gas {
			config.gas_storage_read_warm()
		} else {
			config.gas_sload()
		} as i64;

		let mut refund = 0i64;

		if current != new {
			if original == current && new == zero {
				refund += config.refund_sstore_clears();
			} else {
				if original != zero {
					if current == zero {
						refund -= config.refund_sstore_clears();
					} else if new == zero {
						refund += config.refund_sstore_clears();
					}
				}

				if original == new {
					if original == zero {
						refund += config.gas_sstore_set() as i64 - sload_gas;
					} else {
						refund += config.gas_sstore_reset() as i64 - sload_gas;
					}
				}
			}
		}

		refund
	} else if current != zero && new == zero {
		config.refund_sstore_clears()
	} else {
		0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn memory_gas_is_quadratic() {
		assert_eq!(memory_gas(0).unwrap(), 0);
		assert_eq!(memory_gas(1).unwrap(), 3);
		assert_eq!(memory_gas(32).unwrap(), 32 * 3 + 32 * 32 / 512);
		assert_eq!(memory_gas(1024).unwrap(), 1024 * 3 + 1024 * 1024 / 512);
	}

	#[test]
	fn exp_cost_counts_exponent_bytes() {
		let config = Config::spurious_dragon();
		assert_eq!(exp_cost(U256::zero(), &config).unwrap(), G_EXP);
		assert_eq!(exp_cost(U256::from(0xff), &config).unwrap(), G_EXP + 50);
		assert_eq!(exp_cost(U256::from(0x100), &config).unwrap(), G_EXP + 100);

		let frontier = Config::frontier();
		assert_eq!(exp_cost(U256::from(0xff), &frontier).unwrap(), G_EXP + 10);
	}

	#[test]
	fn sha3_cost_rounds_up_to_words() {
		assert_eq!(sha3_cost(U256::zero()).unwrap(), 30);
		assert_eq!(sha3_cost(U256::from(1)).unwrap(), 36);
		assert_eq!(sha3_cost(U256::from(32)).unwrap(), 36);
		assert_eq!(sha3_cost(U256::from(33)).unwrap(), 42);
	}

	#[test]
	fn log_cost_includes_topics_and_data() {
		assert_eq!(log_cost(0, U256::zero()).unwrap(), 375);
		assert_eq!(log_cost(2, U256::from(10)).unwrap(), 375 + 2 * 375 + 8 * 10);
	}

	#[test]
	fn sstore_clear_refund() {
		let config = Config::london();
		let zero = H256::default();
		let one = H256::from_low_u64_be(1);

		// Clearing an untouched non-zero slot.
		assert_eq!(sstore_refund(one, one, zero, &config), 4800);
		// Overwriting with the same value refunds nothing.
		assert_eq!(sstore_refund(one, one, one, &config), 0);

		let istanbul = Config::istanbul();
		assert_eq!(sstore_refund(one, one, zero, &istanbul), 15000);
	}

	#[test]
	fn sstore_reset_to_original_refund() {
		let config = Config::istanbul();
		let zero = H256::default();
		let one = H256::from_low_u64_be(1);
		let two = H256::from_low_u64_be(2);

		// original == new != current: dirty slot restored.
		assert_eq!(sstore_refund(one, two, one, &config), 5000 - 800);
		assert_eq!(sstore_refund(zero, two, zero, &config), 20000 - 800);
	}

	#[test]
	fn call_cost_value_transfer() {
		let config = Config::homestead();
		// Non-zero value to an existing account.
		assert_eq!(
			call_cost(U256::one(), false, true, true, false, &config),
			40 + 9000
		);
		// Non-zero value to a new account.
		assert_eq!(
			call_cost(U256::one(), false, true, true, true, &config),
			40 + 9000 + 25000
		);
	}
}
