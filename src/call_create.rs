//! Call and create trap data.

use alloc::vec::Vec;
use core::cmp::min;

use primitive_types::{H160, H256, U256};

use crate::{
	error::{ExitError, ExitException, ExitResult},
	opcode::Opcode,
	runtime::{Context, RuntimeState, Transfer},
	utils::{u256_to_h160, u256_to_h256, u256_to_usize},
	Machine,
};

/// Call scheme.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CallScheme {
	/// `CALL`
	Call,
	/// `CALLCODE`
	CallCode,
	/// `DELEGATECALL`
	DelegateCall,
	/// `STATICCALL`
	StaticCall,
}

/// Create scheme.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CreateScheme {
	/// Legacy create scheme of `CREATE`.
	Legacy,
	/// Create scheme of `CREATE2`.
	Create2 {
		/// Salt.
		salt: H256,
	},
}

/// Combined call and create trap data.
#[derive(Debug)]
pub enum CallCreateTrapData {
	/// A call trap data.
	Call(CallTrapData),
	/// A create trap data.
	Create(CreateTrapData),
}

impl CallCreateTrapData {
	/// Gas requested on the stack, if any.
	#[must_use]
	pub const fn target_gas(&self) -> Option<U256> {
		match self {
			Self::Call(CallTrapData { gas, .. }) => Some(*gas),
			Self::Create(_) => None,
		}
	}

	/// Whether the nested frame transfers value.
	#[must_use]
	pub fn has_value(&self) -> bool {
		match self {
			Self::Call(call) => call
				.transfer
				.as_ref()
				.map_or(false, |transfer| transfer.value != U256::zero()),
			Self::Create(create) => create.value != U256::zero(),
		}
	}

	/// Create a new trap from the given opcode and the machine state.
	pub fn new_from<S: AsRef<RuntimeState> + AsMut<RuntimeState>>(
		opcode: Opcode,
		machine: &mut Machine<S>,
	) -> Result<Self, ExitError> {
		match opcode {
			Opcode::CREATE => Ok(Self::Create(CreateTrapData::new_create_from(machine)?)),
			Opcode::CREATE2 => Ok(Self::Create(CreateTrapData::new_create2_from(machine)?)),
			Opcode::CALL => Ok(Self::Call(CallTrapData::new_from(
				CallScheme::Call,
				machine,
			)?)),
			Opcode::CALLCODE => Ok(Self::Call(CallTrapData::new_from(
				CallScheme::CallCode,
				machine,
			)?)),
			Opcode::DELEGATECALL => Ok(Self::Call(CallTrapData::new_from(
				CallScheme::DelegateCall,
				machine,
			)?)),
			Opcode::STATICCALL => Ok(Self::Call(CallTrapData::new_from(
				CallScheme::StaticCall,
				machine,
			)?)),
			_ => Err(ExitException::InvalidOpcode(opcode).into()),
		}
	}
}

/// Trap data for a call.
#[derive(Debug)]
pub struct CallTrapData {
	/// Code address of the call target.
	pub target: H160,
	/// Transfer instruction, if any.
	pub transfer: Option<Transfer>,
	/// Input data.
	pub input: Vec<u8>,
	/// Gas requested on the stack.
	pub gas: U256,
	/// Whether it is `STATICCALL`.
	pub is_static: bool,
	/// Out value offset.
	pub out_offset: U256,
	/// Out value length.
	pub out_len: U256,
	/// Call context of the nested frame.
	pub context: Context,
	/// Call scheme.
	pub scheme: CallScheme,
}

impl CallTrapData {
	/// Create a new call trap data from the given call scheme and machine
	/// state. Pops the call arguments and reserves the memory regions for
	/// the input and output windows.
	pub fn new_from<S: AsRef<RuntimeState> + AsMut<RuntimeState>>(
		scheme: CallScheme,
		machine: &mut Machine<S>,
	) -> Result<Self, ExitError> {
		let gas = machine.stack.pop()?;
		let to = machine.stack.pop()?;
		let value = match scheme {
			CallScheme::Call | CallScheme::CallCode => machine.stack.pop()?,
			CallScheme::DelegateCall | CallScheme::StaticCall => U256::zero(),
		};
		let in_offset = machine.stack.pop()?;
		let in_len = machine.stack.pop()?;
		let out_offset = machine.stack.pop()?;
		let out_len = machine.stack.pop()?;

		if in_len != U256::zero() {
			let in_end = in_offset
				.checked_add(in_len)
				.ok_or(ExitException::InvalidRange)?;
			machine.memory.resize_end(in_end)?;
		}
		if out_len != U256::zero() {
			let out_end = out_offset
				.checked_add(out_len)
				.ok_or(ExitException::InvalidRange)?;
			machine.memory.resize_end(out_end)?;
		}

		let input = if in_len == U256::zero() {
			Vec::new()
		} else {
			let in_offset = u256_to_usize(in_offset)?;
			let in_len = u256_to_usize(in_len)?;
			machine.memory.get(in_offset, in_len)
		};

		let to = u256_to_h160(to);
		let state = machine.state.as_mut();

		let context = match scheme {
			CallScheme::Call | CallScheme::StaticCall => Context {
				address: to,
				caller: state.context.address,
				apparent_value: value,
			},
			CallScheme::CallCode => Context {
				address: state.context.address,
				caller: state.context.address,
				apparent_value: value,
			},
			CallScheme::DelegateCall => Context {
				address: state.context.address,
				caller: state.context.caller,
				apparent_value: state.context.apparent_value,
			},
		};

		let transfer = if scheme == CallScheme::Call {
			Some(Transfer {
				source: state.context.address,
				target: to,
				value,
			})
		} else if scheme == CallScheme::CallCode {
			Some(Transfer {
				source: state.context.address,
				target: state.context.address,
				value,
			})
		} else {
			None
		};

		state.retbuf = Vec::new();

		Ok(Self {
			target: to,
			transfer,
			input,
			gas,
			is_static: scheme == CallScheme::StaticCall,
			context,
			out_offset,
			out_len,
			scheme,
		})
	}

	/// Feed the sub-call result back into the parent machine: set the
	/// success flag on the stack, the return buffer, and copy the output
	/// into the reserved memory window.
	pub fn feedback<S: AsRef<RuntimeState> + AsMut<RuntimeState>>(
		&self,
		reason: ExitResult,
		retbuf: Vec<u8>,
		machine: &mut Machine<S>,
	) -> Result<(), ExitError> {
		let target_len = min(self.out_len, U256::from(retbuf.len()));

		let push_result = match reason {
			Ok(_) => {
				match machine.memory.copy_large(
					self.out_offset,
					U256::zero(),
					target_len,
					&retbuf,
				) {
					Ok(()) => machine.stack.push(U256::one()),
					Err(_) => machine.stack.push(U256::zero()),
				}
			}
			Err(ExitError::Reverted) => {
				let _ = machine
					.memory
					.copy_large(self.out_offset, U256::zero(), target_len, &retbuf);
				machine.stack.push(U256::zero())
			}
			Err(ExitError::Exception(_)) => machine.stack.push(U256::zero()),
			Err(ExitError::Fatal(e)) => {
				let _ = machine.stack.push(U256::zero());
				return Err(e.into());
			}
		};

		machine.state.as_mut().retbuf = retbuf;
		push_result.map_err(Into::into)
	}
}

/// Trap data for a create.
#[derive(Debug)]
pub struct CreateTrapData {
	/// Create scheme.
	pub scheme: CreateScheme,
	/// Caller of the create, i.e. the currently executing address.
	pub caller: H160,
	/// Endowment value.
	pub value: U256,
	/// Initialization code.
	pub code: Vec<u8>,
}

impl CreateTrapData {
	/// Create a new `CREATE` trap data from the machine state.
	pub fn new_create_from<S: AsRef<RuntimeState> + AsMut<RuntimeState>>(
		machine: &mut Machine<S>,
	) -> Result<Self, ExitError> {
		let value = machine.stack.pop()?;
		let code_offset = machine.stack.pop()?;
		let code_len = machine.stack.pop()?;

		let code = Self::read_code(machine, code_offset, code_len)?;
		let caller = machine.state.as_ref().context.address;
		machine.state.as_mut().retbuf = Vec::new();

		Ok(Self {
			scheme: CreateScheme::Legacy,
			caller,
			value,
			code,
		})
	}

	/// Create a new `CREATE2` trap data from the machine state.
	pub fn new_create2_from<S: AsRef<RuntimeState> + AsMut<RuntimeState>>(
		machine: &mut Machine<S>,
	) -> Result<Self, ExitError> {
		let value = machine.stack.pop()?;
		let code_offset = machine.stack.pop()?;
		let code_len = machine.stack.pop()?;
		let salt = u256_to_h256(machine.stack.pop()?);

		let code = Self::read_code(machine, code_offset, code_len)?;
		let caller = machine.state.as_ref().context.address;
		machine.state.as_mut().retbuf = Vec::new();

		Ok(Self {
			scheme: CreateScheme::Create2 { salt },
			caller,
			value,
			code,
		})
	}

	fn read_code<S>(
		machine: &mut Machine<S>,
		code_offset: U256,
		code_len: U256,
	) -> Result<Vec<u8>, ExitError> {
		if code_len == U256::zero() {
			return Ok(Vec::new());
		}

		let code_end = code_offset
			.checked_add(code_len)
			.ok_or(ExitException::InvalidRange)?;
		machine.memory.resize_end(code_end)?;

		let code_offset = u256_to_usize(code_offset)?;
		let code_len = u256_to_usize(code_len)?;
		Ok(machine.memory.get(code_offset, code_len))
	}

	/// Feed the create result back into the parent machine: push the new
	/// address or zero, and set the return buffer.
	pub fn feedback<S: AsRef<RuntimeState> + AsMut<RuntimeState>>(
		&self,
		reason: Result<H160, ExitError>,
		retbuf: Vec<u8>,
		machine: &mut Machine<S>,
	) -> Result<(), ExitError> {
		let push_result = match reason {
			Ok(address) => machine.stack.push(crate::utils::h160_to_u256(address)),
			Err(ExitError::Reverted) => machine.stack.push(U256::zero()),
			Err(ExitError::Exception(_)) => machine.stack.push(U256::zero()),
			Err(ExitError::Fatal(e)) => {
				let _ = machine.stack.push(U256::zero());
				return Err(e.into());
			}
		};

		machine.state.as_mut().retbuf = retbuf;
		push_result.map_err(Into::into)
	}
}
