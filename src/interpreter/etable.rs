use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

use crate::{
	error::{Capture, ExitException, ExitResult, ExitSucceed},
	etable::{Control, EtableSet},
	interpreter::{Interpreter, StepInterpreter},
	opcode::Opcode,
	valids::Valids,
	Machine,
};

/// An interpreter dispatching through an evaluation table.
pub struct EtableInterpreter<'etable, ES: EtableSet> {
	valids: Valids,
	position: usize,
	machine: Machine<ES::State>,
	etable: &'etable ES,
}

impl<'etable, ES: EtableSet> Deref for EtableInterpreter<'etable, ES> {
	type Target = Machine<ES::State>;

	fn deref(&self) -> &Machine<ES::State> {
		&self.machine
	}
}

impl<'etable, ES: EtableSet> DerefMut for EtableInterpreter<'etable, ES> {
	fn deref_mut(&mut self) -> &mut Machine<ES::State> {
		&mut self.machine
	}
}

impl<'etable, ES> EtableInterpreter<'etable, ES>
where
	ES: EtableSet,
{
	/// Create a new interpreter for the machine, analyzing the code for
	/// valid jump destinations.
	pub fn new(machine: Machine<ES::State>, etable: &'etable ES) -> Self {
		let valids = Valids::new(&machine.code[..]);

		Self {
			machine,
			valids,
			position: 0,
			etable,
		}
	}

	/// The current program counter.
	pub const fn position(&self) -> usize {
		self.position
	}

	/// Explicit exit of the machine. Further steps will return
	/// [ExitSucceed::Stopped].
	pub fn exit(&mut self) {
		self.position = self.machine.code.len();
	}

	/// Pick the next opcode.
	pub fn peek_opcode(&self) -> Option<Opcode> {
		self.machine
			.code
			.get(self.position)
			.map(|opcode| Opcode(*opcode))
	}
}

impl<'etable, ES: EtableSet> Interpreter for EtableInterpreter<'etable, ES> {
	type State = ES::State;
	type Handle = ES::Handle;
	type Trap = ES::Trap;

	fn machine(&self) -> &Machine<ES::State> {
		&self.machine
	}

	fn machine_mut(&mut self) -> &mut Machine<ES::State> {
		&mut self.machine
	}

	fn deconstruct(self) -> (ES::State, Vec<u8>) {
		(self.machine.state, self.machine.retval)
	}

	fn run(&mut self, handle: &mut ES::Handle) -> Capture<ExitResult, ES::Trap> {
		loop {
			match self.step(handle) {
				Ok(()) => (),
				Err(res) => return res,
			}
		}
	}

	fn advance(&mut self) {
		if self.position == self.machine.code.len() {
			return;
		}

		self.position += 1;
	}
}

impl<'etable, ES: EtableSet> StepInterpreter for EtableInterpreter<'etable, ES> {
	#[inline]
	fn step(&mut self, handle: &mut ES::Handle) -> Result<(), Capture<ExitResult, ES::Trap>> {
		let position = self.position;
		if position >= self.machine.code.len() {
			return Err(Capture::Exit(ExitSucceed::Stopped.into()));
		}

		let opcode = Opcode(self.machine.code[position]);
		let control = self
			.etable
			.eval(&mut self.machine, handle, opcode, position);

		match control {
			Control::Continue => {
				self.position += 1;
			}
			Control::ContinueN(p) => {
				self.position = position + p;
			}
			Control::Exit(e) => {
				self.position = self.machine.code.len();
				return Err(Capture::Exit(e));
			}
			Control::Jump(p) => {
				if self.valids.is_valid(p) {
					self.position = p;
				} else {
					self.position = self.machine.code.len();
					return Err(Capture::Exit(ExitException::InvalidJump.into()));
				}
			}
			Control::Trap(t) => return Err(Capture::Trap(t)),
		};

		Ok(())
	}
}
