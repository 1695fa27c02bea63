use crate::opcode::Opcode;

pub const G_ZERO: u64 = 0;
pub const G_BASE: u64 = 2;
pub const G_VERYLOW: u64 = 3;
pub const G_LOW: u64 = 5;
pub const G_MID: u64 = 8;
pub const G_HIGH: u64 = 10;
pub const G_JUMPDEST: u64 = 1;
pub const G_CREATE: u64 = 32000;
pub const G_CALLVALUE: u64 = 9000;
pub const G_NEWACCOUNT: u64 = 25000;
pub const G_EXP: u64 = 10;
pub const G_MEMORY: u64 = 3;
pub const G_LOG: u64 = 375;
pub const G_LOGDATA: u64 = 8;
pub const G_LOGTOPIC: u64 = 375;
pub const G_SHA3: u64 = 30;
pub const G_SHA3WORD: u64 = 6;
pub const G_COPY: u64 = 3;
pub const G_BLOCKHASH: u64 = 20;
pub const R_SELFDESTRUCT: i64 = 24000;

/// Static stack requirements of an opcode: the number of items popped and
/// the net change of the stack height. An absent entry means the byte is
/// not an opcode under any supported revision.
#[derive(Clone, Copy, Debug)]
pub struct StackInfo {
	/// Stack items consumed.
	pub inputs: usize,
	/// Net stack height change.
	pub diff: isize,
}

const fn info(inputs: usize, diff: isize) -> Option<StackInfo> {
	Some(StackInfo { inputs, diff })
}

/// Per-opcode stack requirements, indexed by the opcode byte.
pub static STACK_INFO_TABLE: [Option<StackInfo>; 256] = stack_info_table();

const fn stack_info_table() -> [Option<StackInfo>; 256] {
	let mut table: [Option<StackInfo>; 256] = [None; 256];

	table[Opcode::STOP.as_usize()] = info(0, 0);
	table[Opcode::ADD.as_usize()] = info(2, -1);
	table[Opcode::MUL.as_usize()] = info(2, -1);
	table[Opcode::SUB.as_usize()] = info(2, -1);
	table[Opcode::DIV.as_usize()] = info(2, -1);
	table[Opcode::SDIV.as_usize()] = info(2, -1);
	table[Opcode::MOD.as_usize()] = info(2, -1);
	table[Opcode::SMOD.as_usize()] = info(2, -1);
	table[Opcode::ADDMOD.as_usize()] = info(3, -2);
	table[Opcode::MULMOD.as_usize()] = info(3, -2);
	table[Opcode::EXP.as_usize()] = info(2, -1);
	table[Opcode::SIGNEXTEND.as_usize()] = info(2, -1);

	table[Opcode::LT.as_usize()] = info(2, -1);
	table[Opcode::GT.as_usize()] = info(2, -1);
	table[Opcode::SLT.as_usize()] = info(2, -1);
	table[Opcode::SGT.as_usize()] = info(2, -1);
	table[Opcode::EQ.as_usize()] = info(2, -1);
	table[Opcode::ISZERO.as_usize()] = info(1, 0);
	table[Opcode::AND.as_usize()] = info(2, -1);
	table[Opcode::OR.as_usize()] = info(2, -1);
	table[Opcode::XOR.as_usize()] = info(2, -1);
	table[Opcode::NOT.as_usize()] = info(1, 0);
	table[Opcode::BYTE.as_usize()] = info(2, -1);
	table[Opcode::SHL.as_usize()] = info(2, -1);
	table[Opcode::SHR.as_usize()] = info(2, -1);
	table[Opcode::SAR.as_usize()] = info(2, -1);

	table[Opcode::SHA3.as_usize()] = info(2, -1);

	table[Opcode::ADDRESS.as_usize()] = info(0, 1);
	table[Opcode::BALANCE.as_usize()] = info(1, 0);
	table[Opcode::ORIGIN.as_usize()] = info(0, 1);
	table[Opcode::CALLER.as_usize()] = info(0, 1);
	table[Opcode::CALLVALUE.as_usize()] = info(0, 1);
	table[Opcode::CALLDATALOAD.as_usize()] = info(1, 0);
	table[Opcode::CALLDATASIZE.as_usize()] = info(0, 1);
	table[Opcode::CALLDATACOPY.as_usize()] = info(3, -3);
	table[Opcode::CODESIZE.as_usize()] = info(0, 1);
	table[Opcode::CODECOPY.as_usize()] = info(3, -3);
	table[Opcode::GASPRICE.as_usize()] = info(0, 1);
	table[Opcode::EXTCODESIZE.as_usize()] = info(1, 0);
	table[Opcode::EXTCODECOPY.as_usize()] = info(4, -4);
	table[Opcode::RETURNDATASIZE.as_usize()] = info(0, 1);
	table[Opcode::RETURNDATACOPY.as_usize()] = info(3, -3);
	table[Opcode::EXTCODEHASH.as_usize()] = info(1, 0);

	table[Opcode::BLOCKHASH.as_usize()] = info(1, 0);
	table[Opcode::COINBASE.as_usize()] = info(0, 1);
	table[Opcode::TIMESTAMP.as_usize()] = info(0, 1);
	table[Opcode::NUMBER.as_usize()] = info(0, 1);
	table[Opcode::DIFFICULTY.as_usize()] = info(0, 1);
	table[Opcode::GASLIMIT.as_usize()] = info(0, 1);
	table[Opcode::CHAINID.as_usize()] = info(0, 1);
	table[Opcode::SELFBALANCE.as_usize()] = info(0, 1);
	table[Opcode::BASEFEE.as_usize()] = info(0, 1);

	table[Opcode::POP.as_usize()] = info(1, -1);
	table[Opcode::MLOAD.as_usize()] = info(1, 0);
	table[Opcode::MSTORE.as_usize()] = info(2, -2);
	table[Opcode::MSTORE8.as_usize()] = info(2, -2);
	table[Opcode::SLOAD.as_usize()] = info(1, 0);
	table[Opcode::SSTORE.as_usize()] = info(2, -2);
	table[Opcode::JUMP.as_usize()] = info(1, -1);
	table[Opcode::JUMPI.as_usize()] = info(2, -2);
	table[Opcode::PC.as_usize()] = info(0, 1);
	table[Opcode::MSIZE.as_usize()] = info(0, 1);
	table[Opcode::GAS.as_usize()] = info(0, 1);
	table[Opcode::JUMPDEST.as_usize()] = info(0, 0);

	let mut i = Opcode::PUSH1.as_usize();
	while i <= Opcode::PUSH32.as_usize() {
		table[i] = info(0, 1);
		i += 1;
	}

	let mut n = 1;
	while n <= 16 {
		table[Opcode::DUP1.as_usize() + n - 1] = info(n, 1);
		table[Opcode::SWAP1.as_usize() + n - 1] = info(n + 1, 0);
		n += 1;
	}

	let mut n = 0;
	while n <= 4 {
		table[Opcode::LOG0.as_usize() + n] = info(2 + n, -(2 + n as isize));
		n += 1;
	}

	table[Opcode::CREATE.as_usize()] = info(3, -2);
	table[Opcode::CALL.as_usize()] = info(7, -6);
	table[Opcode::CALLCODE.as_usize()] = info(7, -6);
	table[Opcode::RETURN.as_usize()] = info(2, -2);
	table[Opcode::DELEGATECALL.as_usize()] = info(6, -5);
	table[Opcode::CREATE2.as_usize()] = info(4, -3);
	table[Opcode::STATICCALL.as_usize()] = info(6, -5);
	table[Opcode::REVERT.as_usize()] = info(2, -2);
	table[Opcode::INVALID.as_usize()] = info(0, 0);
	table[Opcode::SELFDESTRUCT.as_usize()] = info(1, -1);

	table
}

/// Static gas costs, indexed by the opcode byte. Opcodes whose cost depends
/// on operands, state, or the active revision are priced by
/// [super::dynamic_opcode_cost] instead.
pub static STATIC_COST_TABLE: [Option<u64>; 256] = static_cost_table();

const fn static_cost_table() -> [Option<u64>; 256] {
	let mut table: [Option<u64>; 256] = [None; 256];

	table[Opcode::STOP.as_usize()] = Some(G_ZERO);
	table[Opcode::INVALID.as_usize()] = Some(G_ZERO);

	table[Opcode::ADD.as_usize()] = Some(G_VERYLOW);
	table[Opcode::SUB.as_usize()] = Some(G_VERYLOW);
	table[Opcode::LT.as_usize()] = Some(G_VERYLOW);
	table[Opcode::GT.as_usize()] = Some(G_VERYLOW);
	table[Opcode::SLT.as_usize()] = Some(G_VERYLOW);
	table[Opcode::SGT.as_usize()] = Some(G_VERYLOW);
	table[Opcode::EQ.as_usize()] = Some(G_VERYLOW);
	table[Opcode::ISZERO.as_usize()] = Some(G_VERYLOW);
	table[Opcode::AND.as_usize()] = Some(G_VERYLOW);
	table[Opcode::OR.as_usize()] = Some(G_VERYLOW);
	table[Opcode::XOR.as_usize()] = Some(G_VERYLOW);
	table[Opcode::NOT.as_usize()] = Some(G_VERYLOW);
	table[Opcode::BYTE.as_usize()] = Some(G_VERYLOW);
	table[Opcode::CALLDATALOAD.as_usize()] = Some(G_VERYLOW);

	table[Opcode::MUL.as_usize()] = Some(G_LOW);
	table[Opcode::DIV.as_usize()] = Some(G_LOW);
	table[Opcode::SDIV.as_usize()] = Some(G_LOW);
	table[Opcode::MOD.as_usize()] = Some(G_LOW);
	table[Opcode::SMOD.as_usize()] = Some(G_LOW);
	table[Opcode::SIGNEXTEND.as_usize()] = Some(G_LOW);

	table[Opcode::ADDMOD.as_usize()] = Some(G_MID);
	table[Opcode::MULMOD.as_usize()] = Some(G_MID);
	table[Opcode::JUMP.as_usize()] = Some(G_MID);
	table[Opcode::JUMPI.as_usize()] = Some(G_HIGH);

	table[Opcode::ADDRESS.as_usize()] = Some(G_BASE);
	table[Opcode::ORIGIN.as_usize()] = Some(G_BASE);
	table[Opcode::CALLER.as_usize()] = Some(G_BASE);
	table[Opcode::CALLVALUE.as_usize()] = Some(G_BASE);
	table[Opcode::CALLDATASIZE.as_usize()] = Some(G_BASE);
	table[Opcode::CODESIZE.as_usize()] = Some(G_BASE);
	table[Opcode::GASPRICE.as_usize()] = Some(G_BASE);
	table[Opcode::COINBASE.as_usize()] = Some(G_BASE);
	table[Opcode::TIMESTAMP.as_usize()] = Some(G_BASE);
	table[Opcode::NUMBER.as_usize()] = Some(G_BASE);
	table[Opcode::DIFFICULTY.as_usize()] = Some(G_BASE);
	table[Opcode::GASLIMIT.as_usize()] = Some(G_BASE);
	table[Opcode::POP.as_usize()] = Some(G_BASE);
	table[Opcode::PC.as_usize()] = Some(G_BASE);
	table[Opcode::MSIZE.as_usize()] = Some(G_BASE);
	table[Opcode::GAS.as_usize()] = Some(G_BASE);

	table[Opcode::JUMPDEST.as_usize()] = Some(G_JUMPDEST);

	let mut i = Opcode::PUSH1.as_usize();
	while i <= Opcode::SWAP16.as_usize() {
		table[i] = Some(G_VERYLOW);
		i += 1;
	}

	table
}
