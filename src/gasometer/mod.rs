//! Gas accounting and the per-step requirements check.

pub mod consts;
pub mod costs;

use core::cmp::max;

use primitive_types::{H160, H256, U256};

use crate::{
	config::Config,
	error::{ExitError, ExitException},
	etable::Control,
	opcode::Opcode,
	runtime::{RuntimeBackend, RuntimeState},
	stack::Stack,
	utils::{u256_to_h160, u256_to_h256},
	Machine,
};

/// Strategy for merging a child frame's unused gas back into the parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeStrategy {
	/// The child succeeded: credit unused gas and the refund counter.
	Commit,
	/// The child reverted: credit unused gas only.
	Revert,
	/// The child failed: the whole allowance is consumed.
	Discard,
}

/// Gas state of a single call frame.
pub struct GasometerState<'config> {
	gas_limit: u64,
	memory_gas: u64,
	used_gas: u64,
	refunded_gas: i64,
	/// Whether the frame runs in a static call context.
	pub is_static: bool,
	/// Active hard fork configuration.
	pub config: &'config Config,
}

impl<'config> GasometerState<'config> {
	/// Create a new gasometer with the given gas limit and chain config.
	#[must_use]
	pub const fn new(gas_limit: u64, is_static: bool, config: &'config Config) -> Self {
		Self {
			gas_limit,
			memory_gas: 0,
			used_gas: 0,
			refunded_gas: 0,
			is_static,
			config,
		}
	}

	/// Perform any operation on the gasometer. Set the gasometer to
	/// out-of-gas if the operation fails.
	#[inline]
	pub fn perform<R, F: FnOnce(&mut Self) -> Result<R, ExitError>>(
		&mut self,
		f: F,
	) -> Result<R, ExitError> {
		match f(self) {
			Ok(r) => Ok(r),
			Err(e) => {
				self.oog();
				Err(e)
			}
		}
	}

	/// Set the current gasometer to out-of-gas, consuming everything.
	pub fn oog(&mut self) {
		self.memory_gas = 0;
		self.refunded_gas = 0;
		self.used_gas = self.gas_limit;
	}

	/// Total used gas: explicit costs plus the memory cost.
	#[must_use]
	pub const fn total_used_gas(&self) -> u64 {
		self.used_gas + self.memory_gas
	}

	/// Gas left available to the current frame.
	#[must_use]
	pub const fn gas64(&self) -> u64 {
		self.gas_limit - self.memory_gas - self.used_gas
	}

	/// Gas left available to the current frame, as [U256].
	#[must_use]
	pub fn gas(&self) -> U256 {
		self.gas64().into()
	}

	/// Accumulated refund counter.
	#[must_use]
	pub const fn refunded_gas(&self) -> i64 {
		self.refunded_gas
	}

	/// Record an explicit cost.
	pub fn record_gas64(&mut self, cost: u64) -> Result<(), ExitError> {
		let all_gas_cost = self.total_used_gas().checked_add(cost);
		if let Some(all_gas_cost) = all_gas_cost {
			if self.gas_limit < all_gas_cost {
				Err(ExitException::OutOfGas.into())
			} else {
				self.used_gas += cost;
				Ok(())
			}
		} else {
			Err(ExitException::OutOfGas.into())
		}
	}

	/// Set memory gas usage.
	pub fn set_memory_gas(&mut self, memory_cost: u64) -> Result<(), ExitError> {
		let all_gas_cost = self.used_gas.checked_add(memory_cost);
		if let Some(all_gas_cost) = all_gas_cost {
			if self.gas_limit < all_gas_cost {
				Err(ExitException::OutOfGas.into())
			} else {
				self.memory_gas = memory_cost;
				Ok(())
			}
		} else {
			Err(ExitException::OutOfGas.into())
		}
	}

	/// Merge a finished child frame's remaining gas and refund counter into
	/// this gasometer.
	pub fn merge(&mut self, gas_left: u64, refund: i64, strategy: MergeStrategy) {
		match strategy {
			MergeStrategy::Commit => {
				self.used_gas -= gas_left;
				self.refunded_gas += refund;
			}
			MergeStrategy::Revert => {
				self.used_gas -= gas_left;
			}
			MergeStrategy::Discard => {}
		}
	}
}

/// The requirements-check stage, run for every opcode before its evaluation
/// function: opcode availability under the active revision, stack bounds,
/// and the gas charge.
pub fn eval<'config, S, H, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
	opcode: Opcode,
	_position: usize,
) -> Control<Tr>
where
	S: AsRef<RuntimeState> + AsMut<GasometerState<'config>>,
	H: RuntimeBackend,
{
	match eval_to_result(machine, handler, opcode) {
		Ok(()) => Control::Continue,
		Err(err) => Control::Exit(Err(err)),
	}
}

fn eval_to_result<'config, S, H>(
	machine: &mut Machine<S>,
	handler: &mut H,
	opcode: Opcode,
) -> Result<(), ExitError>
where
	S: AsRef<RuntimeState> + AsMut<GasometerState<'config>>,
	H: RuntimeBackend,
{
	let address = machine.state.as_ref().context.address;

	machine.state.as_mut().perform(|gasometer| {
		let info = consts::STACK_INFO_TABLE[opcode.as_usize()]
			.ok_or(ExitException::InvalidOpcode(opcode))?;

		if !is_defined(opcode, gasometer.config) {
			return Err(ExitException::InvalidOpcode(opcode).into());
		}

		let height = machine.stack.len();
		if height < info.inputs {
			return Err(ExitException::StackUnderflow.into());
		}
		if info.diff > 0 && height + info.diff as usize > machine.stack.limit() {
			return Err(ExitException::StackOverflow.into());
		}

		if let Some(cost) = consts::STATIC_COST_TABLE[opcode.as_usize()] {
			gasometer.record_gas64(cost)?;
		} else {
			let (gas, memory) = dynamic_opcode_cost(
				address,
				opcode,
				&machine.stack,
				gasometer.is_static,
				gasometer.config,
				handler,
			)?;
			let cost = gas.cost(gasometer.gas64(), gasometer.config)?;
			let refund = gas.refund(gasometer.config);

			gasometer.record_gas64(cost)?;
			gasometer.refunded_gas += refund;

			if let Some(memory) = memory {
				if let Some(memory_cost) = memory.cost()? {
					let new_memory_gas = max(gasometer.memory_gas, memory_cost);
					gasometer.set_memory_gas(new_memory_gas)?;
				}
			}

			let after_gas = gasometer.gas64();
			gas.extra_check(after_gas, gasometer.config)?;
		}

		Ok(())
	})
}

/// Whether the opcode is available under the given configuration. Bytes
/// without a table entry at all are rejected earlier.
fn is_defined(opcode: Opcode, config: &Config) -> bool {
	match opcode {
		Opcode::SHL | Opcode::SHR | Opcode::SAR => config.eip145_bitwise_shifting,
		Opcode::REVERT => config.eip140_revert,
		Opcode::RETURNDATASIZE | Opcode::RETURNDATACOPY => config.eip211_return_data,
		Opcode::EXTCODEHASH => config.eip1052_ext_code_hash,
		Opcode::CHAINID => config.eip1344_chain_id,
		Opcode::SELFBALANCE => config.eip1884_self_balance,
		Opcode::BASEFEE => config.eip3198_base_fee,
		Opcode::CREATE2 => config.eip1014_create2,
		Opcode::DELEGATECALL => config.eip7_delegate_call,
		Opcode::STATICCALL => config.eip214_static_call,
		_ => true,
	}
}

/// Classify the dynamic cost of an opcode from its operands.
fn dynamic_opcode_cost<H: RuntimeBackend>(
	address: H160,
	opcode: Opcode,
	stack: &Stack,
	is_static: bool,
	config: &Config,
	handler: &mut H,
) -> Result<(GasCost, Option<MemoryCost>), ExitError> {
	let gas_cost = match opcode {
		Opcode::RETURN | Opcode::REVERT => GasCost::Zero,

		Opcode::MLOAD | Opcode::MSTORE | Opcode::MSTORE8 => GasCost::VeryLow,

		Opcode::SHL | Opcode::SHR | Opcode::SAR => GasCost::VeryLow,

		Opcode::CHAINID | Opcode::BASEFEE | Opcode::RETURNDATASIZE => GasCost::Base,

		Opcode::SELFBALANCE => GasCost::Low,

		Opcode::EXTCODESIZE => {
			let target = u256_to_h160(stack.peek(0)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::ExtCodeSize { target_is_cold }
		}
		Opcode::BALANCE => {
			let target = u256_to_h160(stack.peek(0)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::Balance { target_is_cold }
		}
		Opcode::BLOCKHASH => GasCost::BlockHash,

		Opcode::EXTCODEHASH => {
			let target = u256_to_h160(stack.peek(0)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::ExtCodeHash { target_is_cold }
		}

		Opcode::CALL => {
			let value = stack.peek(2)?;
			if is_static && value != U256::zero() {
				return Err(ExitException::StaticModeViolation.into());
			}

			let target = u256_to_h160(stack.peek(1)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::Call {
				value,
				gas: stack.peek(0)?,
				target_is_cold,
				target_exists: handler.exists(target),
			}
		}
		Opcode::CALLCODE => {
			let target = u256_to_h160(stack.peek(1)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::CallCode {
				value: stack.peek(2)?,
				gas: stack.peek(0)?,
				target_is_cold,
				target_exists: handler.exists(target),
			}
		}
		Opcode::DELEGATECALL => {
			let target = u256_to_h160(stack.peek(1)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::DelegateCall {
				gas: stack.peek(0)?,
				target_is_cold,
				target_exists: handler.exists(target),
			}
		}
		Opcode::STATICCALL => {
			let target = u256_to_h160(stack.peek(1)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::StaticCall {
				gas: stack.peek(0)?,
				target_is_cold,
				target_exists: handler.exists(target),
			}
		}

		Opcode::SHA3 => GasCost::Sha3 {
			len: stack.peek(1)?,
		},
		Opcode::EXTCODECOPY => {
			let target = u256_to_h160(stack.peek(0)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::ExtCodeCopy {
				target_is_cold,
				len: stack.peek(3)?,
			}
		}
		Opcode::CALLDATACOPY | Opcode::CODECOPY => GasCost::VeryLowCopy {
			len: stack.peek(2)?,
		},
		Opcode::RETURNDATACOPY => GasCost::VeryLowCopy {
			len: stack.peek(2)?,
		},
		Opcode::EXP => GasCost::Exp {
			power: stack.peek(1)?,
		},
		Opcode::SLOAD => {
			let index = u256_to_h256(stack.peek(0)?);
			let target_is_cold = handler.is_cold(address, Some(index));
			handler.mark_hot(address, Some(index));

			GasCost::SLoad { target_is_cold }
		}

		Opcode::SSTORE => {
			if is_static {
				return Err(ExitException::StaticModeViolation.into());
			}

			let index = u256_to_h256(stack.peek(0)?);
			let value = u256_to_h256(stack.peek(1)?);
			let target_is_cold = handler.is_cold(address, Some(index));
			handler.mark_hot(address, Some(index));

			GasCost::SStore {
				original: handler.original_storage(address, index),
				current: handler.storage(address, index),
				new: value,
				target_is_cold,
			}
		}
		Opcode::LOG0 | Opcode::LOG1 | Opcode::LOG2 | Opcode::LOG3 | Opcode::LOG4 => {
			if is_static {
				return Err(ExitException::StaticModeViolation.into());
			}

			GasCost::Log {
				n: opcode.as_u8() - Opcode::LOG0.as_u8(),
				len: stack.peek(1)?,
			}
		}
		Opcode::CREATE => {
			if is_static {
				return Err(ExitException::StaticModeViolation.into());
			}

			GasCost::Create
		}
		Opcode::CREATE2 => {
			if is_static {
				return Err(ExitException::StaticModeViolation.into());
			}

			GasCost::Create2 {
				len: stack.peek(2)?,
			}
		}
		Opcode::SELFDESTRUCT => {
			if is_static {
				return Err(ExitException::StaticModeViolation.into());
			}

			let target = u256_to_h160(stack.peek(0)?);
			let target_is_cold = handler.is_cold(target, None);
			handler.mark_hot(target, None);

			GasCost::SelfDestruct {
				value: handler.balance(address),
				target_is_cold,
				target_exists: handler.exists(target),
				already_removed: handler.deleted(address),
			}
		}

		_ => return Err(ExitException::InvalidOpcode(opcode).into()),
	};

	let memory_cost = match opcode {
		Opcode::SHA3
		| Opcode::RETURN
		| Opcode::REVERT
		| Opcode::LOG0
		| Opcode::LOG1
		| Opcode::LOG2
		| Opcode::LOG3
		| Opcode::LOG4 => Some(MemoryCost {
			offset: stack.peek(0)?,
			len: stack.peek(1)?,
		}),

		Opcode::CODECOPY | Opcode::CALLDATACOPY | Opcode::RETURNDATACOPY => Some(MemoryCost {
			offset: stack.peek(0)?,
			len: stack.peek(2)?,
		}),

		Opcode::EXTCODECOPY => Some(MemoryCost {
			offset: stack.peek(1)?,
			len: stack.peek(3)?,
		}),

		Opcode::MLOAD | Opcode::MSTORE => Some(MemoryCost {
			offset: stack.peek(0)?,
			len: U256::from(32),
		}),

		Opcode::MSTORE8 => Some(MemoryCost {
			offset: stack.peek(0)?,
			len: U256::from(1),
		}),

		Opcode::CREATE | Opcode::CREATE2 => Some(MemoryCost {
			offset: stack.peek(1)?,
			len: stack.peek(2)?,
		}),

		Opcode::CALL | Opcode::CALLCODE => Some(
			MemoryCost {
				offset: stack.peek(3)?,
				len: stack.peek(4)?,
			}
			.join(MemoryCost {
				offset: stack.peek(5)?,
				len: stack.peek(6)?,
			}),
		),

		Opcode::DELEGATECALL | Opcode::STATICCALL => Some(
			MemoryCost {
				offset: stack.peek(2)?,
				len: stack.peek(3)?,
			}
			.join(MemoryCost {
				offset: stack.peek(4)?,
				len: stack.peek(5)?,
			}),
		),

		_ => None,
	};

	Ok((gas_cost, memory_cost))
}

/// Gas cost.
#[derive(Debug, Clone, Copy)]
enum GasCost {
	/// Zero gas cost.
	Zero,
	/// Base gas cost.
	Base,
	/// Very low gas cost.
	VeryLow,
	/// Low gas cost.
	Low,

	/// Gas cost for `EXTCODESIZE`.
	ExtCodeSize {
		/// True if the address has not been previously accessed.
		target_is_cold: bool,
	},
	/// Gas cost for `BALANCE`.
	Balance {
		/// True if the address has not been previously accessed.
		target_is_cold: bool,
	},
	/// Gas cost for `BLOCKHASH`.
	BlockHash,
	/// Gas cost for `EXTCODEHASH`.
	ExtCodeHash {
		/// True if the address has not been previously accessed.
		target_is_cold: bool,
	},

	/// Gas cost for `CALL`.
	Call {
		/// Call value.
		value: U256,
		/// Call gas.
		gas: U256,
		/// True if the target has not been previously accessed.
		target_is_cold: bool,
		/// Whether the target exists.
		target_exists: bool,
	},
	/// Gas cost for `CALLCODE`.
	CallCode {
		/// Call value.
		value: U256,
		/// Call gas.
		gas: U256,
		/// True if the target has not been previously accessed.
		target_is_cold: bool,
		/// Whether the target exists.
		target_exists: bool,
	},
	/// Gas cost for `DELEGATECALL`.
	DelegateCall {
		/// Call gas.
		gas: U256,
		/// True if the target has not been previously accessed.
		target_is_cold: bool,
		/// Whether the target exists.
		target_exists: bool,
	},
	/// Gas cost for `STATICCALL`.
	StaticCall {
		/// Call gas.
		gas: U256,
		/// True if the target has not been previously accessed.
		target_is_cold: bool,
		/// Whether the target exists.
		target_exists: bool,
	},
	/// Gas cost for `SELFDESTRUCT`.
	SelfDestruct {
		/// Remaining balance of the executing account.
		value: U256,
		/// True if the beneficiary has not been previously accessed.
		target_is_cold: bool,
		/// Whether the beneficiary exists.
		target_exists: bool,
		/// Whether the executing account has already been removed.
		already_removed: bool,
	},
	/// Gas cost for `SSTORE`.
	SStore {
		/// Original value.
		original: H256,
		/// Current value.
		current: H256,
		/// New value.
		new: H256,
		/// True if the slot has not been previously accessed.
		target_is_cold: bool,
	},
	/// Gas cost for `SHA3`.
	Sha3 {
		/// Length of the data.
		len: U256,
	},
	/// Gas cost for `LOG`.
	Log {
		/// Topic length.
		n: u8,
		/// Data length.
		len: U256,
	},
	/// Gas cost for `EXTCODECOPY`.
	ExtCodeCopy {
		/// True if the address has not been previously accessed.
		target_is_cold: bool,
		/// Length.
		len: U256,
	},
	/// Gas cost for copy opcodes documented as `VERYLOW`.
	VeryLowCopy {
		/// Length.
		len: U256,
	},
	/// Gas cost for `EXP`.
	Exp {
		/// Power of `EXP`.
		power: U256,
	},
	/// Gas cost for `CREATE`.
	Create,
	/// Gas cost for `CREATE2`.
	Create2 {
		/// Length.
		len: U256,
	},
	/// Gas cost for `SLOAD`.
	SLoad {
		/// True if the slot has not been previously accessed.
		target_is_cold: bool,
	},
}

impl GasCost {
	/// The gas cost numerical value.
	fn cost(&self, gas: u64, config: &Config) -> Result<u64, ExitError> {
		Ok(match *self {
			GasCost::Call {
				value,
				target_is_cold,
				target_exists,
				..
			} => costs::call_cost(value, target_is_cold, true, true, !target_exists, config),
			GasCost::CallCode {
				value,
				target_is_cold,
				target_exists,
				..
			} => costs::call_cost(value, target_is_cold, true, false, !target_exists, config),
			GasCost::DelegateCall {
				target_is_cold,
				target_exists,
				..
			} => costs::call_cost(
				U256::zero(),
				target_is_cold,
				false,
				false,
				!target_exists,
				config,
			),
			GasCost::StaticCall {
				target_is_cold,
				target_exists,
				..
			} => costs::call_cost(
				U256::zero(),
				target_is_cold,
				false,
				true,
				!target_exists,
				config,
			),

			GasCost::SelfDestruct {
				value,
				target_is_cold,
				target_exists,
				..
			} => costs::selfdestruct_cost(value, target_is_cold, target_exists, config),
			GasCost::SStore {
				original,
				current,
				new,
				target_is_cold,
			} => costs::sstore_cost(original, current, new, gas, target_is_cold, config)?,
			GasCost::Sha3 { len } => costs::sha3_cost(len)?,
			GasCost::Log { n, len } => costs::log_cost(n, len)?,
			GasCost::VeryLowCopy { len } => costs::verylowcopy_cost(len)?,
			GasCost::ExtCodeCopy {
				target_is_cold,
				len,
			} => costs::extcodecopy_cost(len, target_is_cold, config)?,
			GasCost::Exp { power } => costs::exp_cost(power, config)?,
			GasCost::Create => consts::G_CREATE,
			GasCost::Create2 { len } => costs::create2_cost(len)?,
			GasCost::SLoad { target_is_cold } => costs::sload_cost(target_is_cold, config),

			GasCost::Zero => consts::G_ZERO,
			GasCost::Base => consts::G_BASE,
			GasCost::VeryLow => consts::G_VERYLOW,
			GasCost::Low => consts::G_LOW,

			GasCost::ExtCodeSize { target_is_cold } => {
				costs::address_access_cost(target_is_cold, config.gas_ext_code(), config)
			}
			GasCost::Balance { target_is_cold } => {
				costs::address_access_cost(target_is_cold, config.gas_balance(), config)
			}
			GasCost::BlockHash => consts::G_BLOCKHASH,
			GasCost::ExtCodeHash { target_is_cold } => {
				costs::address_access_cost(target_is_cold, config.gas_ext_code_hash(), config)
			}
		})
	}

	/// Numeric value of the refund.
	fn refund(&self, config: &Config) -> i64 {
		match *self {
			GasCost::SStore {
				original,
				current,
				new,
				..
			} => costs::sstore_refund(original, current, new, config),
			GasCost::SelfDestruct {
				already_removed, ..
			} if !config.eip3529_decrease_clears_refund => {
				costs::selfdestruct_refund(already_removed)
			}
			_ => 0,
		}
	}

	/// Extra check of the cost.
	fn extra_check(&self, after_gas: u64, config: &Config) -> Result<(), ExitException> {
		match *self {
			GasCost::Call { gas, .. } => costs::call_extra_check(gas, after_gas, config),
			GasCost::CallCode { gas, .. } => costs::call_extra_check(gas, after_gas, config),
			GasCost::DelegateCall { gas, .. } => costs::call_extra_check(gas, after_gas, config),
			GasCost::StaticCall { gas, .. } => costs::call_extra_check(gas, after_gas, config),
			_ => Ok(()),
		}
	}
}

/// Memory cost.
#[derive(Debug, Clone, Copy)]
struct MemoryCost {
	/// Affected memory offset.
	pub offset: U256,
	/// Affected length.
	pub len: U256,
}

impl MemoryCost {
	/// Join two memory costs together, keeping the one reaching further.
	pub fn join(self, other: MemoryCost) -> MemoryCost {
		if self.len == U256::zero() {
			return other;
		}

		if other.len == U256::zero() {
			return self;
		}

		let self_end = self.offset.saturating_add(self.len);
		let other_end = other.offset.saturating_add(other.len);

		if self_end >= other_end {
			self
		} else {
			other
		}
	}

	/// Numeric value of the cost, if the region is non-empty.
	pub fn cost(&self) -> Result<Option<u64>, ExitError> {
		let from = self.offset;
		let len = self.len;

		if len == U256::zero() {
			return Ok(None);
		}

		let end = from.checked_add(len).ok_or(ExitException::OutOfGas)?;

		if end > U256::from(usize::MAX) {
			return Err(ExitException::OutOfGas.into());
		}
		let end = end.as_usize();

		let rem = end % 32;
		let new = if rem == 0 { end / 32 } else { end / 32 + 1 };

		Ok(Some(costs::memory_gas(new)?))
	}
}
