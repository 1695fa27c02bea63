mod etable;

pub use self::etable::EtableInterpreter;

use alloc::vec::Vec;

use crate::{
	error::{Capture, ExitResult},
	Machine,
};

/// An interpreter that can run a machine to completion or to its next trap.
pub trait Interpreter {
	type State;
	type Handle;
	type Trap;

	fn machine(&self) -> &Machine<Self::State>;
	fn machine_mut(&mut self) -> &mut Machine<Self::State>;

	fn deconstruct(self) -> (Self::State, Vec<u8>);
	fn run(&mut self, handle: &mut Self::Handle) -> Capture<ExitResult, Self::Trap>;
	fn advance(&mut self);
}

/// An interpreter that can additionally be driven one instruction at a time.
pub trait StepInterpreter: Interpreter {
	fn step(&mut self, handle: &mut Self::Handle) -> Result<(), Capture<ExitResult, Self::Trap>>;
}
