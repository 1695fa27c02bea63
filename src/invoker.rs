//! The per-call entry point, driving an interpreter against a host.

use alloc::{rc::Rc, vec::Vec};
use core::cmp::min;

use primitive_types::{H160, H256, U256};

use crate::{
	call_create::{CallCreateTrapData, CallScheme, CreateScheme},
	config::Config,
	error::{Capture, ExitError, ExitException, ExitResult},
	etable::Etable,
	gasometer::{self, GasometerState, MergeStrategy},
	interpreter::{EtableInterpreter, Interpreter},
	runtime::{
		Context, GasState, RuntimeBackend, RuntimeEnvironment, RuntimeState, TransactionContext,
	},
	Machine,
};

/// Kind of a call frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallKind {
	/// `CALL`.
	Call,
	/// `CALLCODE`.
	CallCode,
	/// `DELEGATECALL`.
	DelegateCall,
	/// `STATICCALL`.
	StaticCall,
	/// `CREATE`.
	Create,
	/// `CREATE2`.
	Create2,
}

/// A call frame request. For create kinds, `input` carries the
/// initialization code and `recipient` the address the host derived for the
/// new contract.
#[derive(Clone, Debug)]
pub struct Message {
	/// Kind of the frame.
	pub kind: CallKind,
	/// Whether the frame executes in a static context. Implied by
	/// [CallKind::StaticCall], and inherited by every nested frame.
	pub is_static: bool,
	/// Call depth of the frame.
	pub depth: usize,
	/// Gas available to the frame.
	pub gas: U256,
	/// Account the frame executes as.
	pub recipient: H160,
	/// Account the code was loaded from. Differs from `recipient` for
	/// `CALLCODE` and `DELEGATECALL` frames.
	pub code_address: H160,
	/// Caller of the frame.
	pub sender: H160,
	/// Input data, or initialization code for create kinds.
	pub input: Vec<u8>,
	/// Apparent value of the frame. Transferred for `CALL` and the create
	/// kinds.
	pub value: U256,
	/// Salt of a `CREATE2` frame.
	pub create2_salt: H256,
}

/// Result of a call frame.
#[derive(Clone, Debug)]
pub struct CallOutput {
	/// Terminal status of the frame.
	pub status: ExitResult,
	/// Gas remaining. Zero unless the frame succeeded or reverted.
	pub gas_left: U256,
	/// Accumulated refund counter. Only reported on success.
	pub gas_refund: i64,
	/// Output bytes of `RETURN` or `REVERT`.
	pub output: Vec<u8>,
	/// Address of the created contract, for successful create frames.
	pub created_address: Option<H160>,
}

impl CallOutput {
	/// A failure output carrying no gas and no output.
	#[must_use]
	pub fn from_status(status: ExitResult) -> Self {
		Self {
			status,
			gas_left: U256::zero(),
			gas_refund: 0,
			output: Vec::new(),
			created_address: None,
		}
	}
}

/// Host side of nested call and create dispatch. The implementation runs
/// the child frame, recursively entering [execute], and owns everything the
/// interpreter does not: value transfer, address derivation and code
/// deployment for creates, the depth limit, and state rollback of failed
/// frames.
pub trait CallCreateBackend {
	/// Execute a nested frame and report its outcome.
	fn call(&mut self, message: Message) -> CallOutput;
}

/// State bundle of a single call frame.
pub struct ExecutionState<'config> {
	/// Runtime state.
	pub runtime: RuntimeState,
	/// Gas state.
	pub gasometer: GasometerState<'config>,
}

impl<'config> AsRef<RuntimeState> for ExecutionState<'config> {
	fn as_ref(&self) -> &RuntimeState {
		&self.runtime
	}
}

impl<'config> AsMut<RuntimeState> for ExecutionState<'config> {
	fn as_mut(&mut self) -> &mut RuntimeState {
		&mut self.runtime
	}
}

impl<'config> AsMut<GasometerState<'config>> for ExecutionState<'config> {
	fn as_mut(&mut self) -> &mut GasometerState<'config> {
		&mut self.gasometer
	}
}

impl<'config> GasState for ExecutionState<'config> {
	fn gas(&self) -> U256 {
		self.gasometer.gas()
	}
}

fn l64(gas: U256) -> U256 {
	gas - gas / U256::from(64)
}

/// Execute a single call frame against the given host, running `code` under
/// the provided configuration until it terminates.
pub fn execute<H>(handler: &mut H, config: &Config, message: Message, code: Vec<u8>) -> CallOutput
where
	H: RuntimeEnvironment + RuntimeBackend + CallCreateBackend,
{
	let Message {
		kind,
		is_static,
		depth,
		gas,
		recipient,
		code_address: _,
		sender,
		input,
		value,
		create2_salt: _,
	} = message;

	let is_static = is_static || kind == CallKind::StaticCall;

	let gas_limit = if gas > U256::from(u64::MAX) {
		return CallOutput::from_status(ExitException::OutOfGas.into());
	} else {
		gas.as_u64()
	};

	let state = ExecutionState {
		runtime: RuntimeState {
			context: Context {
				address: recipient,
				caller: sender,
				apparent_value: value,
			},
			transaction_context: TransactionContext {
				gas_price: handler.gas_price(),
				origin: handler.origin(),
			},
			retbuf: Vec::new(),
		},
		gasometer: GasometerState::new(gas_limit, is_static, config),
	};

	let machine = Machine::new(
		Rc::new(code),
		Rc::new(input),
		config.stack_limit(),
		config.memory_limit(),
		state,
	);

	let gas_etable: Etable<ExecutionState<'_>, H, CallCreateTrapData> =
		Etable::single(gasometer::eval);
	let exec_etable: Etable<ExecutionState<'_>, H, CallCreateTrapData> = Etable::runtime();
	let etable = (gas_etable, exec_etable);

	let mut vm = EtableInterpreter::new(machine, &etable);

	let result = loop {
		match vm.run(handler) {
			Capture::Exit(result) => break result,
			Capture::Trap(trap) => {
				match resolve_call_create(&mut vm, handler, config, is_static, depth, &trap) {
					Ok(()) => (),
					Err(err) => break Err(err),
				}
			}
		}
	};

	let (state, retval) = vm.deconstruct();

	match result {
		Ok(succeed) => CallOutput {
			status: Ok(succeed),
			gas_left: state.gasometer.gas(),
			gas_refund: state.gasometer.refunded_gas(),
			output: retval,
			created_address: match kind {
				CallKind::Create | CallKind::Create2 => Some(recipient),
				_ => None,
			},
		},
		Err(ExitError::Reverted) => CallOutput {
			status: Err(ExitError::Reverted),
			gas_left: state.gasometer.gas(),
			gas_refund: 0,
			output: retval,
			created_address: None,
		},
		Err(err) => CallOutput::from_status(Err(err)),
	}
}

/// Resolve a call or create trap by dispatching the child frame to the
/// host: compute the gas allowance, forward the frame, merge the returned
/// gas, and feed the result back into the parent machine.
fn resolve_call_create<'config, H, ES>(
	vm: &mut EtableInterpreter<'_, ES>,
	handler: &mut H,
	config: &Config,
	is_static: bool,
	depth: usize,
	trap: &CallCreateTrapData,
) -> Result<(), ExitError>
where
	H: RuntimeEnvironment + RuntimeBackend + CallCreateBackend,
	ES: crate::etable::EtableSet<State = ExecutionState<'config>>,
{
	let gasometer = &mut vm.machine_mut().state.gasometer;

	let after_gas = if config.eip150_call_l64_after_gas {
		l64(gasometer.gas())
	} else {
		gasometer.gas()
	};
	let target_gas = trap.target_gas().unwrap_or(after_gas);
	let gas_limit = min(after_gas, target_gas);

	gasometer.record_gas64(gas_limit.as_u64())?;

	let mut call_gas_limit = gas_limit.as_u64();
	if trap.has_value() {
		call_gas_limit = call_gas_limit.saturating_add(config.call_stipend());
	}

	let sub_message = match trap {
		CallCreateTrapData::Call(call) => Message {
			kind: match call.scheme {
				CallScheme::Call => CallKind::Call,
				CallScheme::CallCode => CallKind::CallCode,
				CallScheme::DelegateCall => CallKind::DelegateCall,
				CallScheme::StaticCall => CallKind::StaticCall,
			},
			is_static: is_static || call.is_static,
			depth: depth + 1,
			gas: U256::from(call_gas_limit),
			recipient: call.context.address,
			code_address: call.target,
			sender: call.context.caller,
			input: call.input.clone(),
			value: call.context.apparent_value,
			create2_salt: H256::default(),
		},
		CallCreateTrapData::Create(create) => Message {
			kind: match create.scheme {
				CreateScheme::Legacy => CallKind::Create,
				CreateScheme::Create2 { .. } => CallKind::Create2,
			},
			is_static,
			depth: depth + 1,
			gas: U256::from(call_gas_limit),
			recipient: H160::default(),
			code_address: H160::default(),
			sender: create.caller,
			input: create.code.clone(),
			value: create.value,
			create2_salt: match create.scheme {
				CreateScheme::Create2 { salt } => salt,
				CreateScheme::Legacy => H256::default(),
			},
		},
	};

	let sub_output = handler.call(sub_message);

	let strategy = match &sub_output.status {
		Ok(_) => MergeStrategy::Commit,
		Err(ExitError::Reverted) => MergeStrategy::Revert,
		Err(_) => MergeStrategy::Discard,
	};
	let child_gas_left = min(sub_output.gas_left, U256::from(call_gas_limit)).as_u64();
	vm.machine_mut()
		.state
		.gasometer
		.merge(child_gas_left, sub_output.gas_refund, strategy);

	match trap {
		CallCreateTrapData::Call(call) => {
			call.feedback(sub_output.status, sub_output.output, vm.machine_mut())?;
		}
		CallCreateTrapData::Create(create) => {
			let reason = match sub_output.status {
				Ok(_) => Ok(sub_output.created_address.unwrap_or_default()),
				Err(err) => Err(err),
			};
			create.feedback(reason, sub_output.output, vm.machine_mut())?;
		}
	}

	vm.advance();
	Ok(())
}
