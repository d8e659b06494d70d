//! Gate-sequence parser
//!
//! Turns text such as `"H 0; CX 0 1"` into an ordered list of [`GateOp`].
//! Operations are separated by `;`, and each operation is an opcode followed
//! by whitespace-separated integer operands. Empty operations are skipped so a
//! trailing `;` is harmless.
//!
//! The parser checks syntax only. Whether an index fits the register is
//! decided by the circuit builder, which knows the qubit count.

use crate::error::ParseError;
use crate::quantum::gate::GateOp;

/// Parse a semicolon-separated gate list
pub fn parse_gate_sequence(text: &str) -> Result<Vec<GateOp>, ParseError> {
    text.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_operation)
        .collect()
}

fn parse_operation(token: &str) -> Result<GateOp, ParseError> {
    let mut parts = token.split_whitespace();
    // token is non-empty after trimming
    let opcode = parts.next().unwrap_or_default();
    let operands: Vec<&str> = parts.collect();

    match opcode {
        "H" => {
            let [q] = operand_indices::<1>(opcode, &operands)?;
            Ok(GateOp::Hadamard(q))
        }
        "X" => {
            let [q] = operand_indices::<1>(opcode, &operands)?;
            Ok(GateOp::PauliX(q))
        }
        "CX" => {
            let [control, target] = operand_indices::<2>(opcode, &operands)?;
            Ok(GateOp::ControlledNot { control, target })
        }
        "SWAP" => {
            let [a, b] = operand_indices::<2>(opcode, &operands)?;
            Ok(GateOp::Swap(a, b))
        }
        other => Err(ParseError::UnknownGate(other.to_string())),
    }
}

fn operand_indices<const N: usize>(gate: &str, operands: &[&str]) -> Result<[usize; N], ParseError> {
    if operands.len() != N {
        return Err(ParseError::OperandCount {
            gate: gate.to_string(),
            expected: N,
            found: operands.len(),
        });
    }

    let mut indices = [0usize; N];
    for (slot, operand) in indices.iter_mut().zip(operands) {
        *slot = operand.parse::<usize>().map_err(|_| ParseError::InvalidOperand {
            gate: gate.to_string(),
            operand: operand.to_string(),
        })?;
    }
    Ok(indices)
}
