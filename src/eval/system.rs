use alloc::vec::Vec;

use primitive_types::{H256, U256};
use sha3::{Digest, Keccak256};

use crate::{
	error::{ExitException, ExitFatal, ExitSucceed},
	etable::Control,
	runtime::{GasState, Log, RuntimeBackend, RuntimeEnvironment, RuntimeState},
	utils::{h160_to_u256, h256_to_u256, u256_to_h160, u256_to_h256},
	Machine,
};

pub fn sha3<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, from, len);

	try_or_fail!(machine.memory.resize_offset(from, len));
	let data = if len == U256::zero() {
		Vec::new()
	} else {
		let from = as_usize_or_fail!(from);
		let len = as_usize_or_fail!(len);

		machine.memory.get(from, len)
	};

	let ret = Keccak256::digest(data.as_slice());
	push_h256!(machine, H256::from_slice(ret.as_slice()));

	Control::Continue
}

pub fn chainid<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, handler.chain_id());

	Control::Continue
}

pub fn address<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	let ret = h160_to_u256(machine.state.as_ref().context.address);
	push_u256!(machine, ret);

	Control::Continue
}

pub fn balance<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, address);
	push_u256!(machine, handler.balance(u256_to_h160(address)));

	Control::Continue
}

pub fn selfbalance<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(
		machine,
		handler.balance(machine.state.as_ref().context.address)
	);

	Control::Continue
}

pub fn origin<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	let ret = h160_to_u256(machine.state.as_ref().transaction_context.origin);
	push_u256!(machine, ret);

	Control::Continue
}

pub fn caller<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	let ret = h160_to_u256(machine.state.as_ref().context.caller);
	push_u256!(machine, ret);

	Control::Continue
}

pub fn callvalue<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	push_u256!(machine, machine.state.as_ref().context.apparent_value);

	Control::Continue
}

pub fn gasprice<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	push_u256!(machine, machine.state.as_ref().transaction_context.gas_price);

	Control::Continue
}

pub fn basefee<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, handler.block_base_fee_per_gas());

	Control::Continue
}

pub fn extcodesize<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, address);
	let code_size = handler.code_size(u256_to_h160(address));
	push_u256!(machine, code_size);

	Control::Continue
}

pub fn extcodehash<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, address);
	let code_hash = handler.code_hash(u256_to_h160(address));
	push_h256!(machine, code_hash);

	Control::Continue
}

pub fn extcodecopy<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, address);
	pop_u256!(machine, memory_offset, code_offset, len);

	try_or_fail!(machine.memory.resize_offset(memory_offset, len));

	let code = handler.code(u256_to_h160(address));
	match machine
		.memory
		.copy_large(memory_offset, code_offset, len, &code)
	{
		Ok(()) => (),
		Err(e) => return Control::Exit(e.into()),
	};

	Control::Continue
}

pub fn returndatasize<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	let size = U256::from(machine.state.as_ref().retbuf.len());
	push_u256!(machine, size);

	Control::Continue
}

pub fn returndatacopy<S: AsRef<RuntimeState>, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, memory_offset, data_offset, len);

	try_or_fail!(machine.memory.resize_offset(memory_offset, len));
	if data_offset
		.checked_add(len)
		.map_or(true, |l| l > U256::from(machine.state.as_ref().retbuf.len()))
	{
		return Control::Exit(ExitException::OutOfOffset.into());
	}

	let retbuf = machine.state.as_ref().retbuf.clone();
	match machine
		.memory
		.copy_large(memory_offset, data_offset, len, &retbuf)
	{
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn blockhash<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	pop_u256!(machine, number);
	push_h256!(machine, handler.block_hash(number));

	Control::Continue
}

pub fn coinbase<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, h160_to_u256(handler.block_coinbase()));
	Control::Continue
}

pub fn timestamp<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, handler.block_timestamp());
	Control::Continue
}

pub fn number<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, handler.block_number());
	Control::Continue
}

pub fn difficulty<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, handler.block_difficulty());
	Control::Continue
}

pub fn gaslimit<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &H,
) -> Control<Tr> {
	push_u256!(machine, handler.block_gas_limit());
	Control::Continue
}

pub fn sload<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, index);
	let value = handler.storage(
		machine.state.as_ref().context.address,
		u256_to_h256(index),
	);
	push_u256!(machine, h256_to_u256(value));

	Control::Continue
}

pub fn sstore<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, index, value);

	match handler.set_storage(
		machine.state.as_ref().context.address,
		u256_to_h256(index),
		u256_to_h256(value),
	) {
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn gas<S: GasState, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	push_u256!(machine, machine.state.gas());

	Control::Continue
}

pub fn log<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	n: u8,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, offset, len);

	try_or_fail!(machine.memory.resize_offset(offset, len));
	let data = if len == U256::zero() {
		Vec::new()
	} else {
		let offset = as_usize_or_fail!(offset);
		let len = as_usize_or_fail!(len);

		machine.memory.get(offset, len)
	};

	let mut topics = Vec::new();
	for _ in 0..(n as usize) {
		match machine.stack.pop() {
			Ok(value) => {
				topics.push(u256_to_h256(value));
			}
			Err(e) => return Control::Exit(e.into()),
		}
	}

	match handler.log(Log {
		address: machine.state.as_ref().context.address,
		topics,
		data,
	}) {
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

pub fn selfdestruct<S: AsRef<RuntimeState>, H: RuntimeEnvironment + RuntimeBackend, Tr>(
	machine: &mut Machine<S>,
	handler: &mut H,
) -> Control<Tr> {
	pop_u256!(machine, target);

	let address = machine.state.as_ref().context.address;
	match handler.mark_delete(address, u256_to_h160(target)) {
		Ok(()) => Control::Exit(ExitSucceed::SelfDestructed.into()),
		Err(e) => Control::Exit(e.into()),
	}
}
