use std::rc::Rc;

use evm_baseline::{
	Capture, Etable, EtableInterpreter, ExitError, ExitException, ExitSucceed, Interpreter,
	Machine, Opcode,
};
use primitive_types::U256;

const CODE1: &str = "60e060020a6000350480632839e92814601e57806361047ff414603457005b602a6004356024356047565b8060005260206000f35b603d6004356099565b8060005260206000f35b600082600014605457605e565b8160010190506093565b81600014606957607b565b60756001840360016047565b90506093565b609060018403608c85600186036047565b6047565b90505b92915050565b6000816000148060a95750816001145b60b05760b7565b81905060cf565b60c1600283036099565b60cb600184036099565b0190505b91905056";
const DATA1: &str = "2839e92800000000000000000000000000000000000000000000000000000000000000030000000000000000000000000000000000000000000000000000000000000001";
const RET1: &str = "000000000000000000000000000000000000000000000000000000000000000d";

static CORE_ETABLE: Etable<(), (), Opcode> = Etable::core();

fn run_core(code: Vec<u8>, data: Vec<u8>) -> (Capture<Result<ExitSucceed, ExitError>, Opcode>, Vec<u8>, Vec<U256>) {
	let machine = Machine::new(Rc::new(code), Rc::new(data), 1024, usize::MAX, ());
	let mut vm = EtableInterpreter::new(machine, &CORE_ETABLE);
	let result = vm.run(&mut ());
	let stack = vm.stack.data().clone();
	let retval = vm.retval.clone();
	(result, retval, stack)
}

#[test]
fn recursive_dispatch_program_returns() {
	let code = hex::decode(CODE1).unwrap();
	let data = hex::decode(DATA1).unwrap();

	let machine = Machine::new(Rc::new(code), Rc::new(data), 1024, usize::MAX, ());
	let mut vm = EtableInterpreter::new(machine, &CORE_ETABLE);
	assert_eq!(vm.peek_opcode(), Some(Opcode::PUSH1));

	let result = vm.run(&mut ()).exit().unwrap();
	assert_eq!(result, Ok(ExitSucceed::Returned));
	assert_eq!(vm.retval, hex::decode(RET1).unwrap());
}

#[test]
fn empty_code_stops() {
	let machine = Machine::new(Rc::new(Vec::new()), Rc::new(Vec::new()), 1024, usize::MAX, ());

	let mut vm = EtableInterpreter::new(machine, &CORE_ETABLE);
	assert!(vm.machine().is_empty());
	assert_eq!(vm.peek_opcode(), None);
	let result = vm.run(&mut ());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Stopped)));
	assert!(vm.retval.is_empty());
}

#[test]
fn explicit_exit_stops_the_machine() {
	let code = hex::decode("6001600101").unwrap();
	let machine = Machine::new(Rc::new(code), Rc::new(Vec::new()), 1024, usize::MAX, ());

	let mut vm = EtableInterpreter::new(machine, &CORE_ETABLE);
	vm.exit();
	assert_eq!(vm.position(), 5);
	let result = vm.run(&mut ());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Stopped)));
	assert!(vm.stack.data().is_empty());
}

#[test]
fn add_program_returns_five() {
	// PUSH1 1, PUSH1 2, PUSH1 3, ADD, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0,
	// RETURN
	let code = hex::decode("6001600260030160005260206000f3").unwrap();

	let (result, retval, _) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Returned)));

	let mut expected = [0u8; 32];
	expected[31] = 5;
	assert_eq!(retval, expected.to_vec());
}

#[test]
fn truncated_push_zero_extends_on_the_right() {
	// PUSH3 with only two immediate bytes remaining.
	let code = hex::decode("62aabb").unwrap();

	let (result, _, stack) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Stopped)));
	assert_eq!(stack, vec![U256::from(0xaabb00)]);
}

#[test]
fn jump_past_code_fails() {
	// PUSH1 8, JUMP, STOP, JUMPDEST, STOP
	let code = hex::decode("600856005b00").unwrap();

	let (result, _, _) = run_core(code, Vec::new());
	assert_eq!(
		result,
		Capture::Exit(Err(ExitException::InvalidJump.into()))
	);
}

#[test]
fn jump_to_jumpdest_succeeds() {
	// PUSH1 4, JUMP, STOP, JUMPDEST, STOP
	let code = hex::decode("600456005b00").unwrap();

	let (result, _, _) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Stopped)));
}

#[test]
fn jumpdest_inside_push_immediate_fails() {
	// PUSH1 4, JUMP, PUSH1 0x5b, STOP; position 4 is immediate data.
	let code = hex::decode("600456605b00").unwrap();

	let (result, _, _) = run_core(code, Vec::new());
	assert_eq!(
		result,
		Capture::Exit(Err(ExitException::InvalidJump.into()))
	);
}

#[test]
fn conditional_jump_falls_through_on_zero() {
	// PUSH1 0, PUSH1 6, JUMPI, PUSH1 1, STOP; the condition is zero so
	// execution falls through and pushes 1.
	let code = hex::decode("6000600657600100").unwrap();

	let (result, _, stack) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Stopped)));
	assert_eq!(stack, vec![U256::from(1)]);
}

#[test]
fn sdiv_min_by_minus_one_yields_min() {
	// PUSH32 -1, PUSH32 MIN_SIGNED, SDIV, PUSH1 0, MSTORE, PUSH1 32,
	// PUSH1 0, RETURN
	let mut code = vec![0x7f];
	code.extend_from_slice(&[0xff; 32]);
	code.push(0x7f);
	code.push(0x80);
	code.extend_from_slice(&[0x00; 31]);
	code.extend_from_slice(&hex::decode("0560005260206000f3").unwrap());

	let (result, retval, _) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Returned)));

	let mut expected = [0u8; 32];
	expected[0] = 0x80;
	assert_eq!(retval, expected.to_vec());
}

#[test]
fn memory_write_read_roundtrip() {
	// PUSH1 0x5a, PUSH1 64, MSTORE, PUSH1 64, MLOAD, PUSH1 0, MSTORE,
	// PUSH1 32, PUSH1 0, RETURN
	let code = hex::decode("605a60405260405160005260206000f3").unwrap();

	let (result, retval, _) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Returned)));

	let mut expected = [0u8; 32];
	expected[31] = 0x5a;
	assert_eq!(retval, expected.to_vec());
}

#[test]
fn msize_reports_word_aligned_growth() {
	// PUSH1 0x5a, PUSH1 33, MSTORE, MSIZE: writing 32 bytes at offset 33
	// grows the memory to 96 bytes.
	let code = hex::decode("605a60215259").unwrap();

	let (result, _, stack) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Ok(ExitSucceed::Stopped)));
	assert_eq!(stack, vec![U256::from(96)]);
}

#[test]
fn revert_carries_the_memory_window() {
	// PUSH1 0xaa, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, REVERT
	let code = hex::decode("60aa60005260206000fd").unwrap();

	let (result, retval, _) = run_core(code, Vec::new());
	assert_eq!(result, Capture::Exit(Err(ExitError::Reverted)));

	let mut expected = [0u8; 32];
	expected[31] = 0xaa;
	assert_eq!(retval, expected.to_vec());
}

#[test]
fn designated_invalid_opcode() {
	let code = vec![0xfe];

	let (result, _, _) = run_core(code, Vec::new());
	assert_eq!(
		result,
		Capture::Exit(Err(ExitException::DesignatedInvalid.into()))
	);
}
