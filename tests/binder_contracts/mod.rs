//! Rendering contracts for built operators.
//!
//! Each submodule covers one operator variant and drives it only through
//! the public API: declare a method, bind it, render calls.

mod batch_contract;
mod query_contract;
mod update_contract;
