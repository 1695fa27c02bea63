//! Hard fork configuration.

/// Known hard forks, in activation order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Revision {
	/// Frontier.
	Frontier,
	/// Homestead.
	Homestead,
	/// Tangerine Whistle.
	Tangerine,
	/// Spurious Dragon.
	Spurious,
	/// Byzantium.
	Byzantium,
	/// Constantinople.
	Constantinople,
	/// Petersburg.
	Petersburg,
	/// Istanbul.
	Istanbul,
	/// Berlin.
	Berlin,
	/// London.
	London,
}

impl Revision {
	/// The latest supported revision.
	pub const LATEST: Revision = Revision::London;

	/// Gas and feature configuration of the revision.
	#[must_use]
	pub const fn config(self) -> Config {
		match self {
			Self::Frontier => Config::frontier(),
			Self::Homestead => Config::homestead(),
			Self::Tangerine => Config::tangerine_whistle(),
			Self::Spurious => Config::spurious_dragon(),
			Self::Byzantium => Config::byzantium(),
			Self::Constantinople => Config::constantinople(),
			Self::Petersburg => Config::petersburg(),
			Self::Istanbul => Config::istanbul(),
			Self::Berlin => Config::berlin(),
			Self::London => Config::london(),
		}
	}
}

/// Runtime configuration. Each hard fork pins one value of this struct; the
/// flags gate opcode availability and select between historical gas
/// schedules.
#[derive(Clone, Debug)]
pub struct Config {
	/// Has delegate call.
	pub eip7_delegate_call: bool,
	/// Gas increases of EIP-150.
	pub eip150_gas_increase: bool,
	/// Whether to throw out of gas error when CALL/CALLCODE/DELEGATECALL
	/// requests more than the maximum amount of gas.
	pub eip150_no_err_on_call_with_more_gas: bool,
	/// Take l64 for the call and create gas allowance.
	pub eip150_call_l64_after_gas: bool,
	/// EIP-160: EXP byte cost increase.
	pub eip160_exp_increase: bool,
	/// EIP-161: empty accounts count as non-existing.
	pub eip161_empty_check: bool,
	/// Has revert.
	pub eip140_revert: bool,
	/// Has return data.
	pub eip211_return_data: bool,
	/// Has static call.
	pub eip214_static_call: bool,
	/// Has bitwise shifting.
	pub eip145_bitwise_shifting: bool,
	/// Has create2.
	pub eip1014_create2: bool,
	/// Has ext code hash.
	pub eip1052_ext_code_hash: bool,
	/// Net gas metering for SSTORE.
	pub eip2200_sstore_gas_metering: bool,
	/// SSTORE fails when the gas left is at or below the call stipend.
	pub eip2200_sstore_revert_under_stipend: bool,
	/// EIP-1884: trie repricing.
	pub eip1884_trie_repricing: bool,
	/// Has chain ID.
	pub eip1344_chain_id: bool,
	/// Has self balance.
	pub eip1884_self_balance: bool,
	/// EIP-2929: cold and warm state access costs.
	pub eip2929_increase_state_access_gas: bool,
	/// EIP-3198: has base fee.
	pub eip3198_base_fee: bool,
	/// EIP-3529: reduced refunds, no self destruct refund.
	pub eip3529_decrease_clears_refund: bool,
}

impl Config {
	/// Frontier hard fork configuration.
	pub const fn frontier() -> Config {
		Config {
			eip7_delegate_call: false,
			eip150_gas_increase: false,
			eip150_no_err_on_call_with_more_gas: false,
			eip150_call_l64_after_gas: false,
			eip160_exp_increase: false,
			eip161_empty_check: false,
			eip140_revert: false,
			eip211_return_data: false,
			eip214_static_call: false,
			eip145_bitwise_shifting: false,
			eip1014_create2: false,
			eip1052_ext_code_hash: false,
			eip2200_sstore_gas_metering: false,
			eip2200_sstore_revert_under_stipend: false,
			eip1884_trie_repricing: false,
			eip1344_chain_id: false,
			eip1884_self_balance: false,
			eip2929_increase_state_access_gas: false,
			eip3198_base_fee: false,
			eip3529_decrease_clears_refund: false,
		}
	}

	/// Homestead hard fork configuration.
	pub const fn homestead() -> Config {
		let mut config = Self::frontier();
		config.eip7_delegate_call = true;
		config
	}

	/// Tangerine Whistle hard fork configuration.
	pub const fn tangerine_whistle() -> Config {
		let mut config = Self::homestead();
		config.eip150_gas_increase = true;
		config.eip150_no_err_on_call_with_more_gas = true;
		config.eip150_call_l64_after_gas = true;
		config
	}

	/// Spurious Dragon hard fork configuration.
	pub const fn spurious_dragon() -> Config {
		let mut config = Self::tangerine_whistle();
		config.eip160_exp_increase = true;
		config.eip161_empty_check = true;
		config
	}

	/// Byzantium hard fork configuration.
	pub const fn byzantium() -> Config {
		let mut config = Self::spurious_dragon();
		config.eip140_revert = true;
		config.eip211_return_data = true;
		config.eip214_static_call = true;
		config
	}

	/// Constantinople hard fork configuration.
	pub const fn constantinople() -> Config {
		let mut config = Self::byzantium();
		config.eip145_bitwise_shifting = true;
		config.eip1014_create2 = true;
		config.eip1052_ext_code_hash = true;
		config.eip2200_sstore_gas_metering = true;
		config
	}

	/// Petersburg hard fork configuration. Identical to Constantinople with
	/// net gas metering disabled again.
	pub const fn petersburg() -> Config {
		let mut config = Self::constantinople();
		config.eip2200_sstore_gas_metering = false;
		config
	}

	/// Istanbul hard fork configuration.
	pub const fn istanbul() -> Config {
		let mut config = Self::petersburg();
		config.eip1344_chain_id = true;
		config.eip1884_trie_repricing = true;
		config.eip1884_self_balance = true;
		config.eip2200_sstore_gas_metering = true;
		config.eip2200_sstore_revert_under_stipend = true;
		config
	}

	/// Berlin hard fork configuration.
	pub const fn berlin() -> Config {
		let mut config = Self::istanbul();
		config.eip2929_increase_state_access_gas = true;
		config
	}

	/// London hard fork configuration.
	pub const fn london() -> Config {
		let mut config = Self::berlin();
		config.eip3198_base_fee = true;
		config.eip3529_decrease_clears_refund = true;
		config
	}

	/// Gas paid for EXTCODESIZE and EXTCODECOPY.
	pub const fn gas_ext_code(&self) -> u64 {
		if self.eip150_gas_increase {
			700
		} else {
			20
		}
	}

	/// Gas paid for EXTCODEHASH.
	pub const fn gas_ext_code_hash(&self) -> u64 {
		if self.eip1884_trie_repricing {
			700
		} else {
			400
		}
	}

	/// Gas paid for an SSTORE set.
	pub const fn gas_sstore_set(&self) -> u64 {
		20000
	}

	/// Gas paid for an SSTORE reset.
	pub const fn gas_sstore_reset(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			2900
		} else {
			5000
		}
	}

	/// Refund granted for clearing a storage slot.
	pub const fn refund_sstore_clears(&self) -> i64 {
		if self.eip3529_decrease_clears_refund {
			4800
		} else {
			15000
		}
	}

	/// Gas paid for the BALANCE opcode.
	pub const fn gas_balance(&self) -> u64 {
		if self.eip1884_trie_repricing {
			700
		} else if self.eip150_gas_increase {
			400
		} else {
			20
		}
	}

	/// Gas paid for the SLOAD opcode.
	pub const fn gas_sload(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			100
		} else if self.eip1884_trie_repricing {
			800
		} else if self.eip150_gas_increase {
			200
		} else {
			50
		}
	}

	/// Additional gas paid for a cold SLOAD.
	pub const fn gas_sload_cold(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			2100
		} else {
			0
		}
	}

	/// Gas paid for the SELFDESTRUCT opcode.
	pub const fn gas_selfdestruct(&self) -> u64 {
		if self.eip150_gas_increase {
			5000
		} else {
			0
		}
	}

	/// Gas paid for SELFDESTRUCT when it hits a new account.
	pub const fn gas_selfdestruct_new_account(&self) -> u64 {
		if self.eip150_gas_increase {
			25000
		} else {
			0
		}
	}

	/// Gas paid for a CALL opcode.
	pub const fn gas_call(&self) -> u64 {
		if self.eip150_gas_increase {
			700
		} else {
			40
		}
	}

	/// Gas paid for every byte of the EXP exponent.
	pub const fn gas_expbyte(&self) -> u64 {
		if self.eip160_exp_increase {
			50
		} else {
			10
		}
	}

	/// Gas paid for accessing a cold account.
	pub const fn gas_account_access_cold(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			2600
		} else {
			0
		}
	}

	/// Gas paid for accessing warm storage.
	pub const fn gas_storage_read_warm(&self) -> u64 {
		if self.eip2929_increase_state_access_gas {
			100
		} else {
			0
		}
	}

	/// Stack limit.
	pub const fn stack_limit(&self) -> usize {
		1024
	}

	/// Memory limit, in bytes: 2^32 - 32. Gas bounds memory well below this
	/// in practice because the expansion cost grows quadratically.
	pub const fn memory_limit(&self) -> usize {
		0xffff_ffe0
	}

	/// Call stack limit.
	pub const fn call_stack_limit(&self) -> usize {
		1024
	}

	/// Call stipend.
	pub const fn call_stipend(&self) -> u64 {
		2300
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn revisions_are_ordered() {
		assert!(Revision::Frontier < Revision::Homestead);
		assert!(Revision::Berlin < Revision::London);
		assert!(Revision::LATEST.config().eip3198_base_fee);
	}

	#[test]
	fn petersburg_disables_net_metering() {
		assert!(Config::constantinople().eip2200_sstore_gas_metering);
		assert!(!Config::petersburg().eip2200_sstore_gas_metering);
		assert!(Config::petersburg().eip145_bitwise_shifting);
	}

	#[test]
	fn gas_schedule_changes_per_revision() {
		assert_eq!(Config::frontier().gas_call(), 40);
		assert_eq!(Config::tangerine_whistle().gas_call(), 700);
		assert_eq!(Config::frontier().gas_expbyte(), 10);
		assert_eq!(Config::spurious_dragon().gas_expbyte(), 50);
		assert_eq!(Config::istanbul().gas_sload(), 800);
		assert_eq!(Config::berlin().gas_sload(), 100);
	}
}
