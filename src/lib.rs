//! Baseline interpreter for the Ethereum Virtual Machine.
//!
//! The crate executes a single call frame: it walks the bytecode, checks the
//! per-opcode requirements (availability under the active hard fork, stack
//! bounds, gas), dispatches through an evaluation table, and assembles a
//! structured call result. Blockchain state, nested frames, and everything
//! else that outlives a call belong to the host, reached through a narrow
//! set of backend traits.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod call_create;
mod config;
mod error;
mod etable;
pub mod eval;
pub mod gasometer;
mod interpreter;
mod memory;
mod opcode;
mod runtime;
mod stack;
pub mod utils;
mod valids;

mod invoker;

pub use crate::config::{Config, Revision};
pub use crate::error::{
	Capture, ExitError, ExitException, ExitFatal, ExitResult, ExitSucceed,
};
pub use crate::etable::{Control, Efn, Etable, EtableSet};
pub use crate::gasometer::{GasometerState, MergeStrategy};
pub use crate::interpreter::{EtableInterpreter, Interpreter, StepInterpreter};
pub use crate::invoker::{
	execute, CallCreateBackend, CallKind, CallOutput, ExecutionState, Message,
};
pub use crate::memory::Memory;
pub use crate::opcode::Opcode;
pub use crate::runtime::{
	Context, GasState, Log, RuntimeBackend, RuntimeEnvironment, RuntimeState, TransactionContext,
	Transfer,
};
pub use crate::stack::Stack;
pub use crate::valids::Valids;

use alloc::rc::Rc;
use alloc::vec::Vec;

/// Core execution layer for EVM.
pub struct Machine<S> {
	/// Program data.
	pub data: Rc<Vec<u8>>,
	/// Program code.
	pub code: Rc<Vec<u8>>,
	/// Return value. Holds what is returned by the current machine with
	/// `RETURN` or `REVERT`; the buffer returned by sub-calls lives in the
	/// runtime state instead.
	pub retval: Vec<u8>,
	/// Memory.
	pub memory: Memory,
	/// Stack.
	pub stack: Stack,
	/// Extra state.
	pub state: S,
}

impl<S> Machine<S> {
	/// Create a new machine with given code and data.
	pub fn new(
		code: Rc<Vec<u8>>,
		data: Rc<Vec<u8>>,
		stack_limit: usize,
		memory_limit: usize,
		state: S,
	) -> Self {
		Self {
			data,
			code,
			retval: Vec::new(),
			memory: Memory::new(memory_limit),
			stack: Stack::new(stack_limit),
			state,
		}
	}

	/// Machine code.
	pub fn code(&self) -> &[u8] {
		&self.code
	}

	/// Whether the machine has empty code.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.code.is_empty()
	}
}
