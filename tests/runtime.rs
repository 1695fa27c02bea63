use std::collections::{BTreeMap, BTreeSet};

use evm_baseline::{
	execute, CallCreateBackend, CallKind, CallOutput, Config, ExitError, ExitException,
	ExitSucceed, Log, Message, Opcode, Revision, RuntimeBackend, RuntimeEnvironment,
};
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

#[derive(Default, Clone)]
struct Account {
	balance: U256,
	code: Vec<u8>,
	storage: BTreeMap<H256, H256>,
	original_storage: BTreeMap<H256, H256>,
}

/// An in-memory host. Nested frames are executed recursively; failed frames
/// are not rolled back, which is fine for the scenarios below.
struct MockBackend<'config> {
	config: &'config Config,
	accounts: BTreeMap<H160, Account>,
	logs: Vec<Log>,
	hot: BTreeSet<(H160, Option<H256>)>,
	deleted: BTreeSet<H160>,
	create_counter: u64,
}

impl<'config> MockBackend<'config> {
	fn new(config: &'config Config) -> Self {
		Self {
			config,
			accounts: BTreeMap::new(),
			logs: Vec::new(),
			hot: BTreeSet::new(),
			deleted: BTreeSet::new(),
			create_counter: 0,
		}
	}

	fn insert_account(&mut self, address: H160, account: Account) {
		self.accounts.insert(address, account);
	}

	fn transfer(&mut self, source: H160, target: H160, value: U256) -> Result<(), ExitError> {
		if value == U256::zero() {
			return Ok(());
		}

		let source_balance = self.accounts.entry(source).or_default().balance;
		if source_balance < value {
			return Err(ExitException::OutOfFund.into());
		}

		self.accounts.entry(source).or_default().balance = source_balance - value;
		self.accounts.entry(target).or_default().balance += value;
		Ok(())
	}
}

impl<'config> RuntimeEnvironment for MockBackend<'config> {
	fn block_hash(&self, number: U256) -> H256 {
		H256::from_low_u64_be(number.low_u64() + 1)
	}
	fn block_number(&self) -> U256 {
		U256::from(42)
	}
	fn block_coinbase(&self) -> H160 {
		H160::from_low_u64_be(0xc01d)
	}
	fn block_timestamp(&self) -> U256 {
		U256::from(1_600_000_000u64)
	}
	fn block_difficulty(&self) -> U256 {
		U256::from(2048)
	}
	fn block_gas_limit(&self) -> U256 {
		U256::from(30_000_000u64)
	}
	fn block_base_fee_per_gas(&self) -> U256 {
		U256::from(7)
	}
	fn chain_id(&self) -> U256 {
		U256::one()
	}
	fn gas_price(&self) -> U256 {
		U256::one()
	}
	fn origin(&self) -> H160 {
		H160::from_low_u64_be(0x0816)
	}
}

impl<'config> RuntimeBackend for MockBackend<'config> {
	fn balance(&self, address: H160) -> U256 {
		self.accounts.get(&address).map_or(U256::zero(), |a| a.balance)
	}

	fn code_size(&self, address: H160) -> U256 {
		U256::from(self.accounts.get(&address).map_or(0, |a| a.code.len()))
	}

	fn code_hash(&self, address: H160) -> H256 {
		self.accounts.get(&address).map_or(H256::default(), |a| {
			H256::from_slice(Keccak256::digest(&a.code).as_slice())
		})
	}

	fn code(&self, address: H160) -> Vec<u8> {
		self.accounts
			.get(&address)
			.map_or(Vec::new(), |a| a.code.clone())
	}

	fn storage(&self, address: H160, index: H256) -> H256 {
		self.accounts
			.get(&address)
			.and_then(|a| a.storage.get(&index).copied())
			.unwrap_or_default()
	}

	fn original_storage(&self, address: H160, index: H256) -> H256 {
		self.accounts
			.get(&address)
			.and_then(|a| a.original_storage.get(&index).copied())
			.unwrap_or_default()
	}

	fn exists(&self, address: H160) -> bool {
		self.accounts.contains_key(&address)
	}

	fn deleted(&self, address: H160) -> bool {
		self.deleted.contains(&address)
	}

	fn is_cold(&self, address: H160, index: Option<H256>) -> bool {
		!self.hot.contains(&(address, index))
	}

	fn mark_hot(&mut self, address: H160, index: Option<H256>) {
		self.hot.insert((address, index));
	}

	fn set_storage(&mut self, address: H160, index: H256, value: H256) -> Result<(), ExitError> {
		self.accounts
			.entry(address)
			.or_default()
			.storage
			.insert(index, value);
		Ok(())
	}

	fn log(&mut self, log: Log) -> Result<(), ExitError> {
		self.logs.push(log);
		Ok(())
	}

	fn mark_delete(&mut self, address: H160, target: H160) -> Result<(), ExitError> {
		let balance = self.balance(address);
		if let Some(account) = self.accounts.get_mut(&address) {
			account.balance = U256::zero();
		}
		self.accounts.entry(target).or_default().balance += balance;
		self.deleted.insert(address);
		Ok(())
	}
}

impl<'config> CallCreateBackend for MockBackend<'config> {
	fn call(&mut self, message: Message) -> CallOutput {
		if message.depth > self.config.call_stack_limit() {
			return CallOutput::from_status(ExitException::CallTooDeep.into());
		}

		let config = self.config;

		match message.kind {
			CallKind::Create | CallKind::Create2 => {
				self.create_counter += 1;
				let address = H160::from_low_u64_be(0xc0de_0000 + self.create_counter);

				if let Err(err) = self.transfer(message.sender, address, message.value) {
					return CallOutput::from_status(Err(err));
				}

				let init_code = message.input.clone();
				let mut sub_message = message;
				sub_message.recipient = address;
				sub_message.input = Vec::new();

				let output = execute(self, config, sub_message, init_code);
				match output.status {
					Ok(_) => {
						self.accounts.entry(address).or_default().code = output.output;
						CallOutput {
							output: Vec::new(),
							..output
						}
					}
					Err(_) => output,
				}
			}
			_ => {
				if message.kind == CallKind::Call {
					if let Err(err) =
						self.transfer(message.sender, message.recipient, message.value)
					{
						return CallOutput::from_status(Err(err));
					}
				}

				let code = self.code(message.code_address);
				execute(self, config, message, code)
			}
		}
	}
}

fn call_message(recipient: H160, gas: u64) -> Message {
	Message {
		kind: CallKind::Call,
		is_static: false,
		depth: 0,
		gas: U256::from(gas),
		recipient,
		code_address: recipient,
		sender: H160::from_low_u64_be(0x0816),
		input: Vec::new(),
		value: U256::zero(),
		create2_salt: H256::default(),
	}
}

fn run_code(config: &Config, code: &str, gas: u64) -> CallOutput {
	let mut backend = MockBackend::new(config);
	let recipient = H160::from_low_u64_be(0xaa);
	execute(
		&mut backend,
		config,
		call_message(recipient, gas),
		hex::decode(code).unwrap(),
	)
}

fn be_word(value: u64) -> Vec<u8> {
	let mut ret = [0u8; 32];
	U256::from(value).to_big_endian(&mut ret);
	ret.to_vec()
}

#[test]
fn empty_code_preserves_all_gas() {
	let config = Revision::London.config();
	let output = run_code(&config, "", 1000);

	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	assert_eq!(output.gas_left, U256::from(1000));
	assert!(output.output.is_empty());
}

#[test]
fn add_program_returns_five() {
	let config = Revision::London.config();
	let output = run_code(&config, "6001600260030160005260206000f3", 100_000);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(5));
	// 6 pushes, ADD, MSTORE, one memory word.
	assert_eq!(output.gas_left, U256::from(100_000 - 27));
}

#[test]
fn stack_underflow_consumes_all_gas() {
	let config = Revision::London.config();
	let output = run_code(&config, "01", 1000);

	assert_eq!(
		output.status,
		Err(ExitException::StackUnderflow.into())
	);
	assert_eq!(output.gas_left, U256::zero());
	assert!(output.output.is_empty());
}

#[test]
fn jump_past_code_fails() {
	let config = Revision::London.config();
	let output = run_code(&config, "600856005b00", 100_000);

	assert_eq!(output.status, Err(ExitException::InvalidJump.into()));
	assert_eq!(output.gas_left, U256::zero());
}

#[test]
fn jump_to_jumpdest_succeeds() {
	let config = Revision::London.config();
	let output = run_code(&config, "600456005b00", 100_000);

	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
}

#[test]
fn sdiv_min_by_minus_one_yields_min() {
	let config = Revision::London.config();
	let code = {
		let mut code = vec![0x7f];
		code.extend_from_slice(&[0xff; 32]);
		code.push(0x7f);
		code.push(0x80);
		code.extend_from_slice(&[0x00; 31]);
		code.extend_from_slice(&hex::decode("0560005260206000f3").unwrap());
		hex::encode(code)
	};
	let output = run_code(&config, &code, 100_000);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	let mut expected = [0u8; 32];
	expected[0] = 0x80;
	assert_eq!(output.output, expected.to_vec());
}

#[test]
fn memory_expansion_out_of_gas() {
	// PUSH1 1, PUSH4 0x00100000, MSTORE with a tiny budget.
	let config = Revision::London.config();
	let output = run_code(&config, "6001630010000052", 1000);

	assert_eq!(output.status, Err(ExitException::OutOfGas.into()));
	assert_eq!(output.gas_left, U256::zero());
}

#[test]
fn revert_preserves_gas_and_output() {
	let config = Revision::London.config();
	let output = run_code(&config, "60aa60005260206000fd", 100_000);

	assert_eq!(output.status, Err(ExitError::Reverted));
	assert_eq!(output.gas_left, U256::from(100_000 - 18));
	assert_eq!(output.gas_refund, 0);

	let mut expected = [0u8; 32];
	expected[31] = 0xaa;
	assert_eq!(output.output, expected.to_vec());
}

#[test]
fn designated_invalid_consumes_all_gas() {
	let config = Revision::London.config();
	let output = run_code(&config, "fe", 100_000);

	assert_eq!(
		output.status,
		Err(ExitException::DesignatedInvalid.into())
	);
	assert_eq!(output.gas_left, U256::zero());
}

#[test]
fn unknown_byte_is_an_invalid_opcode() {
	let config = Revision::London.config();
	let output = run_code(&config, "0c", 100_000);

	assert_eq!(
		output.status,
		Err(ExitException::InvalidOpcode(Opcode(0x0c)).into())
	);
	assert_eq!(output.gas_left, U256::zero());
}

#[test]
fn shifts_are_gated_by_revision() {
	// PUSH1 1, PUSH1 1, SHL
	let byzantium = Revision::Byzantium.config();
	let output = run_code(&byzantium, "600160011b", 100_000);
	assert_eq!(
		output.status,
		Err(ExitException::InvalidOpcode(Opcode::SHL).into())
	);

	let constantinople = Revision::Constantinople.config();
	let output = run_code(&constantinople, "600160011b", 100_000);
	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	assert_eq!(output.gas_left, U256::from(100_000 - 9));
}

#[test]
fn chainid_is_gated_by_revision() {
	let petersburg = Revision::Petersburg.config();
	let output = run_code(&petersburg, "4600", 100_000);
	assert_eq!(
		output.status,
		Err(ExitException::InvalidOpcode(Opcode::CHAINID).into())
	);

	let istanbul = Revision::Istanbul.config();
	let output = run_code(&istanbul, "4600", 100_000);
	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
}

#[test]
fn basefee_is_gated_by_revision() {
	let berlin = Revision::Berlin.config();
	let output = run_code(&berlin, "4800", 100_000);
	assert_eq!(
		output.status,
		Err(ExitException::InvalidOpcode(Opcode::BASEFEE).into())
	);

	let london = Revision::London.config();
	let output = run_code(&london, "4800", 100_000);
	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
}

#[test]
fn gas_opcode_observes_its_own_charge() {
	let config = Revision::London.config();
	let output = run_code(&config, "5a60005260206000f3", 100_000);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(100_000 - 2));
}

#[test]
fn sstore_in_static_context_fails() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);
	let recipient = H160::from_low_u64_be(0xaa);

	let mut message = call_message(recipient, 100_000);
	message.kind = CallKind::StaticCall;

	let output = execute(
		&mut backend,
		&config,
		message,
		hex::decode("6001600055").unwrap(),
	);

	assert_eq!(
		output.status,
		Err(ExitException::StaticModeViolation.into())
	);
	assert_eq!(output.gas_left, U256::zero());
}

#[test]
fn sstore_clear_grants_a_refund() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);
	let recipient = H160::from_low_u64_be(0xaa);

	let mut account = Account::default();
	account.storage.insert(H256::default(), H256::from_low_u64_be(1));
	account
		.original_storage
		.insert(H256::default(), H256::from_low_u64_be(1));
	backend.insert_account(recipient, account);

	// PUSH1 0, PUSH1 0, SSTORE
	let output = execute(
		&mut backend,
		&config,
		call_message(recipient, 100_000),
		hex::decode("6000600055").unwrap(),
	);

	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	// Two pushes plus a cold reset write: 3 + 3 + 2900 + 2100.
	assert_eq!(output.gas_left, U256::from(100_000 - 5006));
	assert_eq!(output.gas_refund, 4800);
	assert_eq!(
		backend.storage(recipient, H256::default()),
		H256::default()
	);
}

#[test]
fn balance_cold_and_warm_accesses() {
	let config = Revision::Berlin.config();
	let target = H160::repeat_byte(0xbb);
	let code = {
		let mut code = vec![0x73];
		code.extend_from_slice(target.as_bytes());
		code.push(0x31);
		code.push(0x73);
		code.extend_from_slice(target.as_bytes());
		code.push(0x31);
		code.push(0x00);
		hex::encode(code)
	};

	let output = run_code(&config, &code, 100_000);
	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	// Cold access then warm access: 3 + 2600 + 3 + 100.
	assert_eq!(output.gas_left, U256::from(100_000 - 2706));

	let istanbul = Revision::Istanbul.config();
	let output = run_code(&istanbul, &code, 100_000);
	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	assert_eq!(output.gas_left, U256::from(100_000 - 1406));
}

#[test]
fn log_is_emitted_through_the_host() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);
	let recipient = H160::from_low_u64_be(0xaa);

	// PUSH1 0xaa, PUSH1 0, MSTORE, PUSH1 0x42, PUSH1 32, PUSH1 0, LOG1
	let output = execute(
		&mut backend,
		&config,
		call_message(recipient, 100_000),
		hex::decode("60aa600052604260206000a1").unwrap(),
	);

	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	assert_eq!(backend.logs.len(), 1);
	assert_eq!(backend.logs[0].address, recipient);
	assert_eq!(backend.logs[0].topics, vec![H256::from_low_u64_be(0x42)]);
	assert_eq!(backend.logs[0].data, {
		let mut data = [0u8; 32];
		data[31] = 0xaa;
		data.to_vec()
	});
}

#[test]
fn subcall_output_lands_in_the_memory_window() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let child = H160::from_low_u64_be(0xbb);
	let mut child_account = Account::default();
	// PUSH1 42, PUSH1 0, MSTORE, PUSH1 32, PUSH1 0, RETURN
	child_account.code = hex::decode("602a60005260206000f3").unwrap();
	backend.insert_account(child, child_account);

	let parent = H160::from_low_u64_be(0xaa);
	let code = {
		let mut code = hex::decode("6020600060006000600073").unwrap();
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("61fffff160206000f3").unwrap());
		code
	};

	let output = execute(&mut backend, &config, call_message(parent, 1_000_000), code);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(42));
}

#[test]
fn staticcall_forbids_nested_state_writes() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let child = H160::from_low_u64_be(0xcc);
	let mut child_account = Account::default();
	// PUSH1 1, PUSH1 0, SSTORE, STOP
	child_account.code = hex::decode("600160005500").unwrap();
	backend.insert_account(child, child_account);

	let parent = H160::from_low_u64_be(0xaa);

	// STATICCALL into the child, then return the success flag.
	let static_code = {
		let mut code = hex::decode("600060006000600073").unwrap();
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("61fffffa60005260206000f3").unwrap());
		code
	};
	let output = execute(
		&mut backend,
		&config,
		call_message(parent, 1_000_000),
		static_code,
	);
	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(0));

	// A plain CALL into the same child succeeds.
	let call_code = {
		let mut code = hex::decode("6000600060006000600073").unwrap();
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("61fffff160005260206000f3").unwrap());
		code
	};
	let output = execute(
		&mut backend,
		&config,
		call_message(parent, 1_000_000),
		call_code,
	);
	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(1));
}

#[test]
fn call_transfers_value_through_the_host() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let parent = H160::from_low_u64_be(0xaa);
	let child = H160::from_low_u64_be(0xbb);

	let mut parent_account = Account::default();
	parent_account.balance = U256::from(10);
	backend.insert_account(parent, parent_account);
	backend.insert_account(child, Account::default());

	// CALL child with value 5, then STOP.
	let code = {
		let mut code = hex::decode("6000600060006000600573").unwrap();
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("61fffff100").unwrap());
		code
	};

	let output = execute(&mut backend, &config, call_message(parent, 1_000_000), code);

	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	assert_eq!(backend.balance(parent), U256::from(5));
	assert_eq!(backend.balance(child), U256::from(5));
}

#[test]
fn create_deploys_returned_code() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);
	let parent = H160::from_low_u64_be(0xaa);

	// Init code: PUSH1 0xff, PUSH1 0, MSTORE8, PUSH1 1, PUSH1 0, RETURN.
	// The parent stores it at memory 22..32, creates with value 0, and
	// returns the created address.
	let code = hex::decode(
		"6960ff60005360016000f3600052600a60166000f060005260206000f3",
	)
	.unwrap();

	let output = execute(&mut backend, &config, call_message(parent, 1_000_000), code);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));

	let created = H160::from_low_u64_be(0xc0de_0001);
	let mut expected = [0u8; 32];
	expected[12..].copy_from_slice(created.as_bytes());
	assert_eq!(output.output, expected.to_vec());
	assert_eq!(backend.code(created), vec![0xff]);
}

#[test]
fn selfdestruct_moves_balance_to_beneficiary() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let victim = H160::from_low_u64_be(0xaa);
	let beneficiary = H160::from_low_u64_be(0xbb);

	let mut victim_account = Account::default();
	victim_account.balance = U256::from(7);
	backend.insert_account(victim, victim_account);
	backend.insert_account(beneficiary, Account::default());

	let code = {
		let mut code = vec![0x73];
		code.extend_from_slice(beneficiary.as_bytes());
		code.push(0xff);
		code
	};

	let output = execute(&mut backend, &config, call_message(victim, 100_000), code);

	assert_eq!(output.status, Ok(ExitSucceed::SelfDestructed));
	assert_eq!(output.gas_refund, 0);
	assert_eq!(backend.balance(victim), U256::zero());
	assert_eq!(backend.balance(beneficiary), U256::from(7));
	assert!(backend.deleted(victim));
}

#[test]
fn environment_opcodes_read_the_host() {
	let config = Revision::London.config();

	// NUMBER
	let output = run_code(&config, "4360005260206000f3", 100_000);
	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(42));

	// GASPRICE
	let output = run_code(&config, "3a60005260206000f3", 100_000);
	assert_eq!(output.output, be_word(1));

	// ORIGIN
	let output = run_code(&config, "3260005260206000f3", 100_000);
	assert_eq!(output.output, be_word(0x0816));

	// BLOCKHASH of block 5 is 6 in the mock.
	let output = run_code(&config, "60054060005260206000f3", 100_000);
	assert_eq!(output.output, be_word(6));
}

#[test]
fn codecopy_zero_extends_past_code_end() {
	let config = Revision::London.config();
	// Copy the first 32 bytes of a 12-byte program and return them.
	let code = "601f6000600039601f6000f3";
	let output = run_code(&config, code, 100_000);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	let mut expected = vec![0u8; 31];
	expected[..12].copy_from_slice(&hex::decode(code).unwrap());
	assert_eq!(output.output, expected);
}

#[test]
fn extcodesize_reads_the_target_account() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let child = H160::from_low_u64_be(0xbb);
	let mut child_account = Account::default();
	child_account.code = hex::decode("602a60005260206000f3").unwrap();
	backend.insert_account(child, child_account);

	let parent = H160::from_low_u64_be(0xaa);
	let code = {
		let mut code = vec![0x73];
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("3b60005260206000f3").unwrap());
		code
	};

	let output = execute(&mut backend, &config, call_message(parent, 100_000), code);
	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(10));
}

#[test]
fn delegatecall_writes_to_the_caller_storage() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let child = H160::from_low_u64_be(0xbb);
	let mut child_account = Account::default();
	// PUSH1 1, PUSH1 0, SSTORE, STOP
	child_account.code = hex::decode("600160005500").unwrap();
	backend.insert_account(child, child_account);

	let parent = H160::from_low_u64_be(0xaa);
	let code = {
		let mut code = hex::decode("600060006000600073").unwrap();
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("61fffff400").unwrap());
		code
	};

	let output = execute(&mut backend, &config, call_message(parent, 1_000_000), code);

	assert_eq!(output.status, Ok(ExitSucceed::Stopped));
	assert_eq!(
		backend.storage(parent, H256::default()),
		H256::from_low_u64_be(1)
	);
	assert_eq!(backend.storage(child, H256::default()), H256::default());
}

#[test]
fn returndata_is_visible_after_a_subcall() {
	let config = Revision::London.config();
	let mut backend = MockBackend::new(&config);

	let child = H160::from_low_u64_be(0xbb);
	let mut child_account = Account::default();
	child_account.code = hex::decode("602a60005260206000f3").unwrap();
	backend.insert_account(child, child_account);

	let parent = H160::from_low_u64_be(0xaa);
	// CALL the child with no output window, then return RETURNDATASIZE.
	let code = {
		let mut code = hex::decode("6000600060006000600073").unwrap();
		code.extend_from_slice(child.as_bytes());
		code.extend_from_slice(&hex::decode("61fffff1503d60005260206000f3").unwrap());
		code
	};

	let output = execute(&mut backend, &config, call_message(parent, 1_000_000), code);

	assert_eq!(output.status, Ok(ExitSucceed::Returned));
	assert_eq!(output.output, be_word(32));
}
