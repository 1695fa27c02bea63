//! Actual opcode evaluation implementations.

#[macro_use]
mod macros;
mod arithmetic;
mod bitwise;
mod misc;
mod system;

use core::ops::{BitAnd, BitOr, BitXor};

use primitive_types::U256;

use crate::{
	call_create::CallCreateTrapData,
	error::{ExitException, ExitSucceed},
	etable::Control,
	opcode::Opcode,
	runtime::{GasState, RuntimeBackend, RuntimeEnvironment, RuntimeState},
	Machine,
};

/// `STOP`
pub fn eval_stop<S, H, Tr>(
	_machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	Control::Exit(ExitSucceed::Stopped.into())
}

/// `ADD`
pub fn eval_add<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_tuple!(machine, overflowing_add)
}

/// `MUL`
pub fn eval_mul<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_tuple!(machine, overflowing_mul)
}

/// `SUB`
pub fn eval_sub<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_tuple!(machine, overflowing_sub)
}

/// `DIV`
pub fn eval_div<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::arithmetic::div)
}

/// `SDIV`
pub fn eval_sdiv<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::arithmetic::sdiv)
}

/// `MOD`
pub fn eval_mod<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::arithmetic::rem)
}

/// `SMOD`
pub fn eval_smod<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::arithmetic::srem)
}

/// `ADDMOD`
pub fn eval_addmod<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op3_u256_fn!(machine, self::arithmetic::addmod)
}

/// `MULMOD`
pub fn eval_mulmod<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op3_u256_fn!(machine, self::arithmetic::mulmod)
}

/// `EXP`
pub fn eval_exp<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::arithmetic::exp)
}

/// `SIGNEXTEND`
pub fn eval_signextend<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::arithmetic::signextend)
}

/// `LT`
pub fn eval_lt<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_bool_ref!(machine, lt)
}

/// `GT`
pub fn eval_gt<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_bool_ref!(machine, gt)
}

/// `SLT`
pub fn eval_slt<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::bitwise::slt)
}

/// `SGT`
pub fn eval_sgt<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::bitwise::sgt)
}

/// `EQ`
pub fn eval_eq<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_bool_ref!(machine, eq)
}

/// `ISZERO`
pub fn eval_iszero<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op1_u256_fn!(machine, self::bitwise::iszero)
}

/// `AND`
pub fn eval_and<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256!(machine, bitand)
}

/// `OR`
pub fn eval_or<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256!(machine, bitor)
}

/// `XOR`
pub fn eval_xor<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256!(machine, bitxor)
}

/// `NOT`
pub fn eval_not<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op1_u256_fn!(machine, self::bitwise::not)
}

/// `BYTE`
pub fn eval_byte<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::bitwise::byte)
}

/// `SHL`
pub fn eval_shl<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::bitwise::shl)
}

/// `SHR`
pub fn eval_shr<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::bitwise::shr)
}

/// `SAR`
pub fn eval_sar<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	op2_u256_fn!(machine, self::bitwise::sar)
}

/// `CODESIZE`
pub fn eval_codesize<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::codesize(machine)
}

/// `CODECOPY`
pub fn eval_codecopy<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::codecopy(machine)
}

/// `CALLDATALOAD`
pub fn eval_calldataload<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::calldataload(machine)
}

/// `CALLDATASIZE`
pub fn eval_calldatasize<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::calldatasize(machine)
}

/// `CALLDATACOPY`
pub fn eval_calldatacopy<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::calldatacopy(machine)
}

/// `POP`
pub fn eval_pop<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::pop(machine)
}

/// `MLOAD`
pub fn eval_mload<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::mload(machine)
}

/// `MSTORE`
pub fn eval_mstore<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::mstore(machine)
}

/// `MSTORE8`
pub fn eval_mstore8<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::mstore8(machine)
}

/// `JUMP`
pub fn eval_jump<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::jump(machine)
}

/// `JUMPI`
pub fn eval_jumpi<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::jumpi(machine)
}

/// `PC`
pub fn eval_pc<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	position: usize,
) -> Control<Tr> {
	self::misc::pc(machine, position)
}

/// `MSIZE`
pub fn eval_msize<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::msize(machine)
}

/// `JUMPDEST`
pub fn eval_jumpdest<S, H, Tr>(
	_machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	Control::Continue
}

macro_rules! eval_push {
    ($($num:expr),*) => {
		$(paste::paste! {
			/// `PUSHn`
			pub fn [<eval_push $num>]<S, H, Tr>(
				machine: &mut Machine<S>,
				_handle: &mut H,
				_opcode: Opcode,
				position: usize,
			) -> Control<Tr> {
				self::misc::push(machine, $num, position)
			}
		})*
	};
}

eval_push! {
	1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16,
	17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32
}

macro_rules! eval_dup {
    ($($num:expr),*) => {
		$(paste::paste! {
			/// `DUPn`
			pub fn [<eval_dup $num>]<S, H, Tr>(
				machine: &mut Machine<S>,
				_handle: &mut H,
				_opcode: Opcode,
				_position: usize,
			) -> Control<Tr> {
				self::misc::dup(machine, $num)
			}
		})*
	};
}

eval_dup! { 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16 }

macro_rules! eval_swap {
    ($($num:expr),*) => {
		$(paste::paste! {
			/// `SWAPn`
			pub fn [<eval_swap $num>]<S, H, Tr>(
				machine: &mut Machine<S>,
				_handle: &mut H,
				_opcode: Opcode,
				_position: usize,
			) -> Control<Tr> {
				self::misc::swap(machine, $num)
			}
		})*
	};
}

eval_swap! { 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16 }

/// `RETURN`
pub fn eval_return<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::ret(machine)
}

/// `REVERT`
pub fn eval_revert<S, H, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::misc::revert(machine)
}

/// `INVALID`
pub fn eval_invalid<S, H, Tr>(
	_machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	Control::Exit(ExitException::DesignatedInvalid.into())
}

/// Any unknown opcode.
pub fn eval_unknown<S, H, Tr>(
	_machine: &mut Machine<S>,
	_handle: &mut H,
	opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	Control::Exit(ExitException::InvalidOpcode(opcode).into())
}

/// `SHA3`
pub fn eval_sha3<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::sha3(machine)
}

/// `ADDRESS`
pub fn eval_address<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::address(machine)
}

/// `BALANCE`
pub fn eval_balance<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::balance(machine, handle)
}

/// `SELFBALANCE`
pub fn eval_selfbalance<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::selfbalance(machine, handle)
}

/// `ORIGIN`
pub fn eval_origin<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::origin(machine)
}

/// `CALLER`
pub fn eval_caller<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::caller(machine)
}

/// `CALLVALUE`
pub fn eval_callvalue<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::callvalue(machine)
}

/// `GASPRICE`
pub fn eval_gasprice<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::gasprice(machine)
}

/// `EXTCODESIZE`
pub fn eval_extcodesize<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::extcodesize(machine, handle)
}

/// `EXTCODEHASH`
pub fn eval_extcodehash<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::extcodehash(machine, handle)
}

/// `EXTCODECOPY`
pub fn eval_extcodecopy<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::extcodecopy(machine, handle)
}

/// `RETURNDATASIZE`
pub fn eval_returndatasize<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::returndatasize(machine)
}

/// `RETURNDATACOPY`
pub fn eval_returndatacopy<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::returndatacopy(machine)
}

/// `BLOCKHASH`
pub fn eval_blockhash<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::blockhash(machine, handle)
}

/// `COINBASE`
pub fn eval_coinbase<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::coinbase(machine, handle)
}

/// `TIMESTAMP`
pub fn eval_timestamp<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::timestamp(machine, handle)
}

/// `NUMBER`
pub fn eval_number<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::number(machine, handle)
}

/// `DIFFICULTY`
pub fn eval_difficulty<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::difficulty(machine, handle)
}

/// `GASLIMIT`
pub fn eval_gaslimit<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::gaslimit(machine, handle)
}

/// `CHAINID`
pub fn eval_chainid<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::chainid(machine, handle)
}

/// `BASEFEE`
pub fn eval_basefee<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::basefee(machine, handle)
}

/// `SLOAD`
pub fn eval_sload<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::sload(machine, handle)
}

/// `SSTORE`
pub fn eval_sstore<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::sstore(machine, handle)
}

/// `GAS`
pub fn eval_gas<S: GasState, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::gas(machine)
}

macro_rules! eval_log {
    ($($num:expr),*) => {
		$(paste::paste! {
			/// `LOGn`
			pub fn [<eval_log $num>]<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
				machine: &mut Machine<S>,
				handle: &mut H,
				_opcode: Opcode,
				_position: usize,
			) -> Control<Tr> {
				self::system::log(machine, $num, handle)
			}
		})*
	};
}

eval_log! { 0, 1, 2, 3, 4 }

/// `SELFDESTRUCT`
pub fn eval_selfdestruct<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handle: &mut H,
	_opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	self::system::selfdestruct(machine, handle)
}

/// `CREATE`, `CREATE2`, `CALL`, `CALLCODE`, `DELEGATECALL`, `STATICCALL`
pub fn eval_call_create_trap<
	S: AsRef<RuntimeState> + AsMut<RuntimeState>,
	H,
	Tr: From<CallCreateTrapData>,
>(
	machine: &mut Machine<S>,
	_handle: &mut H,
	opcode: Opcode,
	_position: usize,
) -> Control<Tr> {
	let trap = match CallCreateTrapData::new_from(opcode, machine) {
		Ok(trap) => trap,
		Err(err) => return Control::Exit(Err(err)),
	};

	Control::Trap(trap.into())
}
