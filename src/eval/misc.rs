use alloc::vec::Vec;
use core::cmp::min;

use primitive_types::U256;

use crate::{
	error::{ExitError, ExitException, ExitFatal, ExitSucceed},
	etable::Control,
	Machine,
};

#[inline]
pub fn codesize<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	let size = U256::from(machine.code().len());
	push_u256!(machine, size);
	Control::Continue
}

#[inline]
pub fn codecopy<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, memory_offset, code_offset, len);

	try_or_fail!(machine.memory.resize_offset(memory_offset, len));
	let code = machine.code.clone();
	match machine
		.memory
		.copy_large(memory_offset, code_offset, len, &code)
	{
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn calldataload<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, index);

	let mut load = [0u8; 32];
	#[allow(clippy::needless_range_loop)]
	for i in 0..32 {
		if let Some(p) = index.checked_add(U256::from(i)) {
			if p <= U256::from(usize::MAX) {
				let p = p.as_usize();
				if p < machine.data.len() {
					load[i] = machine.data[p];
				}
			}
		}
	}

	push_u256!(machine, U256::from_big_endian(&load));
	Control::Continue
}

#[inline]
pub fn calldatasize<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	let len = U256::from(machine.data.len());
	push_u256!(machine, len);
	Control::Continue
}

#[inline]
pub fn calldatacopy<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, memory_offset, data_offset, len);

	try_or_fail!(machine.memory.resize_offset(memory_offset, len));
	if len == U256::zero() {
		return Control::Continue;
	}

	let data = machine.data.clone();
	match machine
		.memory
		.copy_large(memory_offset, data_offset, len, &data)
	{
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn pop<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, _val);
	Control::Continue
}

#[inline]
pub fn mload<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, index);
	try_or_fail!(machine.memory.resize_offset(index, U256::from(32)));
	let index = as_usize_or_fail!(index);
	let value = machine.memory.get(index, 32);
	push_u256!(machine, U256::from_big_endian(&value));
	Control::Continue
}

#[inline]
pub fn mstore<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, index);
	pop_h256!(machine, value);
	try_or_fail!(machine.memory.resize_offset(index, U256::from(32)));
	let index = as_usize_or_fail!(index);
	match machine.memory.set(index, &value[..], Some(32)) {
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn mstore8<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, index, value);
	try_or_fail!(machine.memory.resize_offset(index, U256::one()));
	let index = as_usize_or_fail!(index);
	let value = (value.low_u32() & 0xff) as u8;
	match machine.memory.set(index, &[value], Some(1)) {
		Ok(()) => Control::Continue,
		Err(e) => Control::Exit(e.into()),
	}
}

#[inline]
pub fn jump<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, dest);
	let dest = as_usize_or_fail!(dest, ExitException::InvalidJump);

	Control::Jump(dest)
}

#[inline]
pub fn jumpi<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, dest);
	pop_u256!(machine, value);

	if value == U256::zero() {
		Control::Continue
	} else {
		let dest = as_usize_or_fail!(dest, ExitException::InvalidJump);
		Control::Jump(dest)
	}
}

#[inline]
pub fn pc<S, Tr>(machine: &mut Machine<S>, position: usize) -> Control<Tr> {
	push_u256!(machine, U256::from(position));
	Control::Continue
}

#[inline]
pub fn msize<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	push_u256!(machine, machine.memory.effective_len());
	Control::Continue
}

#[inline]
pub fn push<S, Tr>(machine: &mut Machine<S>, n: usize, position: usize) -> Control<Tr> {
	let end = min(position + 1 + n, machine.code.len());
	let slice = &machine.code[(position + 1)..end];
	let mut val = [0u8; 32];
	val[(32 - n)..(32 - n + slice.len())].copy_from_slice(slice);

	push_u256!(machine, U256::from_big_endian(&val));
	Control::ContinueN(1 + n)
}

#[inline]
pub fn dup<S, Tr>(machine: &mut Machine<S>, n: usize) -> Control<Tr> {
	let value = match machine.stack.peek(n - 1) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	push_u256!(machine, value);
	Control::Continue
}

#[inline]
pub fn swap<S, Tr>(machine: &mut Machine<S>, n: usize) -> Control<Tr> {
	let val1 = match machine.stack.peek(0) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	let val2 = match machine.stack.peek(n) {
		Ok(value) => value,
		Err(e) => return Control::Exit(e.into()),
	};
	match machine.stack.set(0, val2) {
		Ok(()) => (),
		Err(e) => return Control::Exit(e.into()),
	}
	match machine.stack.set(n, val1) {
		Ok(()) => (),
		Err(e) => return Control::Exit(e.into()),
	}
	Control::Continue
}

#[inline]
pub fn ret<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, start, len);
	try_or_fail!(machine.memory.resize_offset(start, len));

	machine.retval = if len == U256::zero() {
		Vec::new()
	} else {
		let start = as_usize_or_fail!(start);
		let len = as_usize_or_fail!(len);
		machine.memory.get(start, len)
	};

	Control::Exit(ExitSucceed::Returned.into())
}

#[inline]
pub fn revert<S, Tr>(machine: &mut Machine<S>) -> Control<Tr> {
	pop_u256!(machine, start, len);
	try_or_fail!(machine.memory.resize_offset(start, len));

	machine.retval = if len == U256::zero() {
		Vec::new()
	} else {
		let start = as_usize_or_fail!(start);
		let len = as_usize_or_fail!(len);
		machine.memory.get(start, len)
	};

	Control::Exit(ExitError::Reverted.into())
}
