// Wed Jan 15 2026 - Alex

use crate::assembler::AssembleError;
use crate::memory::{Address, MemoryError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("assembly failed: {0}")]
    Assemble(#[from] AssembleError),
    #[error("memory access failed: {0}")]
    Memory(#[from] MemoryError),
    #[error("branch from {from} to {to} does not fit a relative branch")]
    BranchOutOfRange { from: Address, to: Address },
    #[error("branch chain starting at {address} did not settle")]
    BranchChainTooDeep { address: Address },
}
