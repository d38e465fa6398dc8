pub mod life;
pub mod script_file;

pub use life::{
    Flow, Instruction, LIFE_OPCODE_COUNT, LIFE_OPCODES, Layout, LifeCondition, LifeOpcodeInfo,
    LifeOperator, Operand, OperandKind, ValueWidth, decode_instruction, disassemble,
    format_instruction, opcode_info,
};
pub use script_file::{decode_hex_script, read_script_file};
