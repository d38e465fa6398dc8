//! Second half of every conditional: compare the stored value to a literal.

use log::{debug, warn};
use twine_formats::{LifeOperator, ValueWidth};

use crate::engine::LifeEngine;
use crate::error::LifeResult;

use super::context::LifeContext;

/// Read an operator byte and the literal that follows it. Unknown operators
/// still consume their literal and compare as false.
pub fn evaluate_operator(
    engine: &LifeEngine,
    ctx: &mut LifeContext,
    width: ValueWidth,
) -> LifeResult<bool> {
    let code = ctx.stream.read_u8()?;
    let literal = match width {
        ValueWidth::Byte => i32::from(ctx.stream.read_u8()?),
        ValueWidth::Word => i32::from(ctx.stream.read_i16()?),
    };
    let current = engine.scene.current_script_value;

    match LifeOperator::try_from(code) {
        Ok(operator) => {
            let result = operator.compare(current, literal);
            debug!(
                "LIFE::OPERATOR {current} {} {literal} -> {result}",
                operator.symbol()
            );
            Ok(result)
        }
        Err(code) => {
            warn!(
                "actor {}: unknown operator {code:#04x} at offset {}",
                ctx.actor_idx,
                ctx.stream.pos()
            );
            Ok(false)
        }
    }
}
