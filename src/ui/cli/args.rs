// Wed Jan 15 2026 - Alex

use crate::memory::Address;
use crate::utils::parse_u32;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Largest number of seed words `trampoline` accepts.
pub const MAX_SEED_WORDS: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "ppc-hook")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "PowerPC assembler and runtime hook builder", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides the configured log level.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// JSON config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode instructions into machine words.
    Assemble(AssembleArgs),
    /// Show the jump a hook would write between two addresses.
    Jump(JumpArgs),
    /// Install a trampoline into simulated memory and dump the result.
    Trampoline(TrampolineArgs),
}

#[derive(Parser, Debug)]
pub struct AssembleArgs {
    #[arg(required = true)]
    pub instructions: Vec<String>,

    #[arg(long)]
    pub no_memo: bool,
}

#[derive(Parser, Debug)]
pub struct JumpArgs {
    #[arg(long, value_parser = parse_address)]
    pub from: Address,

    #[arg(long, value_parser = parse_address)]
    pub to: Address,
}

#[derive(Parser, Debug)]
pub struct TrampolineArgs {
    /// Address of the function to hook.
    #[arg(long, value_parser = parse_address)]
    pub at: Address,

    /// Address of the replacement function.
    #[arg(long, value_parser = parse_address)]
    pub to: Address,

    /// Instruction words seeded at the hooked address, in order.
    #[arg(long = "word", value_parser = parse_word)]
    pub words: Vec<u32>,
}

impl JumpArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.from.is_aligned(4) || !self.to.is_aligned(4) {
            return Err("Jump addresses must be word aligned".to_string());
        }
        Ok(())
    }
}

impl TrampolineArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.at.is_aligned(4) || !self.to.is_aligned(4) {
            return Err("Trampoline addresses must be word aligned".to_string());
        }
        if self.words.len() > MAX_SEED_WORDS {
            return Err(format!("At most {} seed words are supported", MAX_SEED_WORDS));
        }
        if self.at.as_u32().checked_add(0x2000).is_none() {
            return Err(format!("Hook address {} is too close to the top of memory", self.at));
        }
        Ok(())
    }
}

pub fn parse_address(s: &str) -> Result<Address, String> {
    parse_u32(s).map(Address::new).ok_or_else(|| format!("invalid address \"{}\"", s))
}

pub fn parse_word(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(&digits.replace('_', ""), 16).map_err(|_| format!("invalid instruction word \"{}\"", s))
}
