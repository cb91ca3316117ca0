//! Generic evaluation protocol
//!
//!     An [`Environment`] binds symbols to handlers. [`evaluate`] dispatches on the node kind and
//!     [`evaluate_call`] implements list evaluation:
//!
//!     - head is a bound symbol, handler is special: the handler receives the unevaluated tail
//!     - head is a bound symbol, handler is normal: every tail element is evaluated first, in
//!       order, stopping at the first error, and the handler receives the values
//!     - head is an unbound symbol: [`EvalError::UnboundIdentifier`]
//!     - otherwise (empty list, head is a string or list): the list is a plain sequence and every
//!       element is evaluated for its effects; the result is the last value
//!
//!     The lifetime `'n` is the lifetime of the tree. Special handlers may hold on to slices of
//!     it for as long as the environment lives.

use crate::error::EvalError;
use crate::value::{Node, Symbol};

/// How a symbol is bound in an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding<H> {
    /// Called with unevaluated arguments
    Special(H),
    /// Called with evaluated arguments
    Normal(H),
}

pub trait Environment<'n> {
    type Value: Default;
    type Handler: Copy;

    fn lookup(&self, symbol: &Symbol) -> Option<Binding<Self::Handler>>;

    fn apply_special(
        &mut self,
        handler: Self::Handler,
        args: &'n [Node],
    ) -> Result<Self::Value, EvalError>;

    fn apply(
        &mut self,
        handler: Self::Handler,
        args: Vec<Self::Value>,
    ) -> Result<Self::Value, EvalError>;

    fn evaluate_symbol(&mut self, symbol: &'n Symbol) -> Result<Self::Value, EvalError>;

    fn evaluate_string(&mut self, text: &'n str) -> Result<Self::Value, EvalError>;

    fn evaluate_list(&mut self, list: &'n [Node]) -> Result<Self::Value, EvalError> {
        evaluate_call(self, list)
    }
}

/// Evaluate a single node.
pub fn evaluate<'n, E>(env: &mut E, node: &'n Node) -> Result<E::Value, EvalError>
where
    E: Environment<'n> + ?Sized,
{
    match node {
        Node::Symbol(symbol) => env.evaluate_symbol(symbol),
        Node::String(text) => env.evaluate_string(text),
        Node::List(items) => env.evaluate_list(items),
    }
}

/// Evaluate a list as a call or, when its head is not a symbol, as a sequence.
pub fn evaluate_call<'n, E>(env: &mut E, list: &'n [Node]) -> Result<E::Value, EvalError>
where
    E: Environment<'n> + ?Sized,
{
    if let Some((Node::Symbol(symbol), args)) = list.split_first() {
        return match env.lookup(symbol) {
            Some(Binding::Special(handler)) => env.apply_special(handler, args),
            Some(Binding::Normal(handler)) => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(evaluate(env, arg)?);
                }
                env.apply(handler, values)
            }
            None => Err(EvalError::UnboundIdentifier(symbol.name().to_string())),
        };
    }

    let mut last = E::Value::default();
    for item in list {
        last = evaluate(env, item)?;
    }
    Ok(last)
}
