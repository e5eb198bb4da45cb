//! HAVING predicates over aggregates.

use crate::criterion::{Operand, Slot, Symbol, render_comparison};
use crate::error::CraftResult;
use crate::fragment::{Fragment, RenderContext};
use crate::selection::Function;

/// `[connector] FN(column) SYMBOL operand`.
#[derive(Debug, Clone, PartialEq)]
pub struct Having {
    slot: Slot,
    function: Function,
    symbol: Symbol,
    operand: Operand,
}

impl Having {
    pub fn new(slot: Slot, function: Function, symbol: Symbol, operand: Operand) -> CraftResult<Self> {
        symbol.check(&operand)?;
        Ok(Self {
            slot,
            function,
            symbol,
            operand,
        })
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }
}

impl Fragment for Having {
    fn render(&self, ctx: &mut RenderContext) -> String {
        let mut out = String::new();
        self.slot.write(&mut out);
        let lhs = self.function.render_expr();
        out.push_str(&render_comparison(&lhs, self.symbol, &self.operand, ctx));
        out
    }
}
