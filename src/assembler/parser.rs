// Tue Jan 13 2026 - Alex

use crate::assembler::{
    AssembleError, Mnemonic, Operand, OperandList, Register, EMPTY_OPERAND_LIST, OPERAND_NUM,
};

/// One parsed line, before it is matched against the instruction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub operands: OperandList,
}

/// Lowercases and collapses whitespace; the result is the memo cache key.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn parse_instruction(text: &str) -> Result<Instruction, AssembleError> {
    let normalized = normalize(text);
    let mut segments = normalized.split_whitespace();

    let mnemonic_str = segments.next().ok_or(AssembleError::EmptyInstruction)?;
    let mnemonic = Mnemonic::from_name(mnemonic_str).ok_or_else(|| AssembleError::InvalidMnemonic {
        mnemonic: mnemonic_str.to_string(),
    })?;

    let operand_str: String = segments.collect();
    if operand_str.is_empty() {
        return Ok(Instruction { mnemonic, operands: EMPTY_OPERAND_LIST });
    }

    let tokens: Vec<&str> = operand_str.split(',').collect();
    // stray or trailing comma
    if tokens.iter().any(|token| token.is_empty()) {
        return Err(AssembleError::invalid_operand(&operand_str));
    }
    if tokens.len() > OPERAND_NUM {
        return Err(AssembleError::InstructionTooLarge { count: tokens.len() });
    }

    let mut operands = EMPTY_OPERAND_LIST;
    for (slot, token) in operands.iter_mut().zip(tokens) {
        *slot = Some(tokenize_operand(token)?);
    }

    Ok(Instruction { mnemonic, operands })
}

/// Parses one comma-free operand token.
pub fn tokenize_operand(token: &str) -> Result<Operand, AssembleError> {
    if token.is_empty() {
        return Err(AssembleError::invalid_operand(token));
    }

    if token.contains('(') && token.contains(')') {
        return tokenize_indirect(token);
    }

    if let Some(hex) = token.strip_prefix("0x") {
        return parse_hex(hex, token).map(Operand::immediate);
    }

    if let Some(number) = token.strip_prefix('r') {
        return parse_register(number, token).map(Operand::gpr);
    }

    parse_decimal(token).map(Operand::immediate)
}

fn tokenize_indirect(token: &str) -> Result<Operand, AssembleError> {
    let (offset_str, rest) = token.split_once('(').ok_or_else(|| AssembleError::invalid_operand(token))?;
    let (base_str, trailing) = rest.split_once(')').ok_or_else(|| AssembleError::invalid_operand(token))?;

    if !trailing.is_empty() {
        return Err(AssembleError::invalid_operand(token));
    }

    let base_number = base_str
        .strip_prefix('r')
        .ok_or_else(|| AssembleError::invalid_operand(base_str))?;

    let offset = match offset_str.strip_prefix("0x") {
        Some(hex) => parse_hex(hex, offset_str)?,
        None => parse_decimal(offset_str)?,
    };
    let register = parse_register(base_number, base_str)?;

    Ok(Operand::Indirect { offset, register })
}

fn parse_register(number: &str, token: &str) -> Result<Register, AssembleError> {
    let number: u32 = number.parse().map_err(|_| AssembleError::conversion(number))?;
    Register::from_number(number).ok_or_else(|| AssembleError::invalid_operand(token))
}

fn parse_hex(digits: &str, token: &str) -> Result<u32, AssembleError> {
    u32::from_str_radix(digits, 16).map_err(|_| AssembleError::conversion(token))
}

fn parse_decimal(token: &str) -> Result<u32, AssembleError> {
    token.parse::<u32>().map_err(|_| AssembleError::conversion(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_immediates() {
        assert_eq!(tokenize_operand("0x10").unwrap(), Operand::immediate(0x10));
        assert_eq!(tokenize_operand("42").unwrap(), Operand::immediate(42));
        assert_eq!(
            tokenize_operand("0xZZ"),
            Err(AssembleError::IntegerConversionFailure { integer: "0xZZ".into() })
        );
        assert_eq!(tokenize_operand(""), Err(AssembleError::InvalidOperand { operand: String::new() }));
        assert_eq!(
            tokenize_operand("-4"),
            Err(AssembleError::IntegerConversionFailure { integer: "-4".into() })
        );
    }

    #[test]
    fn test_tokenize_registers() {
        assert_eq!(tokenize_operand("r3").unwrap(), Operand::gpr(Register::R3));
        assert_eq!(tokenize_operand("r32").unwrap(), Operand::gpr(Register::R32));
        assert_eq!(
            tokenize_operand("r33"),
            Err(AssembleError::InvalidOperand { operand: "r33".into() })
        );
        assert_eq!(
            tokenize_operand("rx"),
            Err(AssembleError::IntegerConversionFailure { integer: "x".into() })
        );
    }

    #[test]
    fn test_tokenize_indirect() {
        assert_eq!(tokenize_operand("8(r1)").unwrap(), Operand::indirect(8, Register::R1));
        assert_eq!(tokenize_operand("0x10(r31)").unwrap(), Operand::indirect(0x10, Register::R31));
        assert_eq!(
            tokenize_operand("8(x1)"),
            Err(AssembleError::InvalidOperand { operand: "x1".into() })
        );
        assert_eq!(
            tokenize_operand("8(r40)"),
            Err(AssembleError::InvalidOperand { operand: "r40".into() })
        );
        assert_eq!(
            tokenize_operand("abc(r1)"),
            Err(AssembleError::IntegerConversionFailure { integer: "abc".into() })
        );
        assert_eq!(
            tokenize_operand("0xg(r1)"),
            Err(AssembleError::IntegerConversionFailure { integer: "0xg".into() })
        );
    }

    #[test]
    fn test_parse_instruction() {
        let instruction = parse_instruction("  ORI r3,   r3, 0x10 ").unwrap();
        assert_eq!(instruction.mnemonic, Mnemonic::Ori);
        assert_eq!(
            instruction.operands,
            [
                Some(Operand::gpr(Register::R3)),
                Some(Operand::gpr(Register::R3)),
                Some(Operand::immediate(0x10)),
            ]
        );

        let nop = parse_instruction("nop").unwrap();
        assert_eq!(nop.operands, EMPTY_OPERAND_LIST);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_instruction(""), Err(AssembleError::EmptyInstruction));
        assert_eq!(parse_instruction(" \t "), Err(AssembleError::EmptyInstruction));
        assert_eq!(
            parse_instruction("bogus r1"),
            Err(AssembleError::InvalidMnemonic { mnemonic: "bogus".into() })
        );
        assert_eq!(
            parse_instruction("addi r1, r2, 3, 4"),
            Err(AssembleError::InstructionTooLarge { count: 4 })
        );
        assert_eq!(
            parse_instruction("addi r3, r3, 1,"),
            Err(AssembleError::InvalidOperand { operand: "r3,r3,1,".into() })
        );
        assert_eq!(
            parse_instruction("addi r3,, 1"),
            Err(AssembleError::InvalidOperand { operand: "r3,,1".into() })
        );
        assert_eq!(
            parse_instruction("addi r1, r2, q"),
            Err(AssembleError::IntegerConversionFailure { integer: "q".into() })
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  LWZ  r3, 8(R1)\n"), "lwz r3, 8(r1)");
    }
}
