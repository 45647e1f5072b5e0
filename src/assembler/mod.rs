// Tue Jan 13 2026 - Alex

//! Text to machine word translation for a curated PowerPC subset.
//!
//! `assemble` runs parse, match and codegen over one instruction and
//! memoizes the result by normalized text.

pub mod codegen;
pub mod error;
pub mod mask;
pub mod matcher;
pub mod mnemonic;
pub mod operand;
pub mod parser;
pub mod register;
pub mod table;

pub use error::AssembleError;
pub use mask::{Mask, BRANCH_OFFSET_MASK, SHORT_JUMP_LIMIT};
pub use mnemonic::Mnemonic;
pub use operand::{Operand, OperandDef, OperandDefKind, OperandDefList, OperandList, EMPTY_OPERAND_LIST, OPERAND_NUM};
pub use parser::{normalize, parse_instruction, tokenize_operand, Instruction};
pub use register::{Register, RegisterClass};
pub use table::{InstructionDef, INSTRUCTION_TABLE};

use crate::config::Config;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

static GLOBAL_ASSEMBLER: Lazy<Assembler> = Lazy::new(|| Assembler::from_config(&Config::from_env()));

/// Assembles one instruction with the process-wide assembler.
pub fn assemble(text: &str) -> Result<u32, AssembleError> {
    GLOBAL_ASSEMBLER.assemble(text)
}

pub fn global() -> &'static Assembler {
    &GLOBAL_ASSEMBLER
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    pub cache_hits: usize,
    pub pipeline_runs: usize,
    pub cached_entries: usize,
}

pub struct Assembler {
    memo: RwLock<AHashMap<String, u32>>,
    memoize: bool,
    cache_hits: AtomicUsize,
    pipeline_runs: AtomicUsize,
}

impl Assembler {
    pub fn new() -> Self {
        Self {
            memo: RwLock::new(AHashMap::new()),
            memoize: true,
            cache_hits: AtomicUsize::new(0),
            pipeline_runs: AtomicUsize::new(0),
        }
    }

    pub fn without_memo() -> Self {
        Self { memoize: false, ..Self::new() }
    }

    pub fn from_config(config: &Config) -> Self {
        if config.memoize_assembly {
            Self::new()
        } else {
            Self::without_memo()
        }
    }

    pub fn assemble(&self, text: &str) -> Result<u32, AssembleError> {
        let key = normalize(text);

        if self.memoize {
            if let Some(&word) = self.memo.read().get(&key) {
                self.cache_hits.fetch_add(1, Ordering::Relaxed);
                return Ok(word);
            }
        }

        self.pipeline_runs.fetch_add(1, Ordering::Relaxed);
        let word = Self::run_pipeline(&key)?;
        log::debug!("assembled \"{}\" -> {:#010x}", key, word);

        if self.memoize {
            self.memo.write().insert(key, word);
        }
        Ok(word)
    }

    /// Assembles a sequence, stopping at the first failure.
    pub fn assemble_all<S: AsRef<str>>(&self, lines: &[S]) -> Result<Vec<u32>, AssembleError> {
        lines.iter().map(|line| self.assemble(line.as_ref())).collect()
    }

    fn run_pipeline(text: &str) -> Result<u32, AssembleError> {
        let instruction = parse_instruction(text)?;
        let def = matcher::find_definition(INSTRUCTION_TABLE, instruction.mnemonic, &instruction.operands)?;
        codegen::generate(&instruction, def)
    }

    pub fn is_memoizing(&self) -> bool {
        self.memoize
    }

    pub fn stats(&self) -> AssemblerStats {
        AssemblerStats {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            pipeline_runs: self.pipeline_runs.load(Ordering::Relaxed),
            cached_entries: self.memo.read().len(),
        }
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}
