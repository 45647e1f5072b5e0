// Wed Jan 15 2026 - Alex

use super::args::{Args, AssembleArgs, Command, JumpArgs, TrampolineArgs};
use crate::assembler::Assembler;
use crate::config::Config;
use crate::memory::{Address, MemoryRange, PhysicalMemory, SimulatedMemory};
use crate::patch::jump::jump_form;
use crate::patch::{jump, resolve_branch_chain, OriginalFunction, TrampolinePatch};
use crate::utils::{hex_word, hex_words, pluralize, LoggingUtils};
use colored::Colorize;
use std::sync::Arc;

const SIM_CODE_PHYSICAL: Address = Address::new(0x1000_0000);
const SIM_CODE_SIZE: u32 = 0x2000;
const SIM_HEAP_PHYSICAL: Address = Address::new(0x2000_0000);
const SIM_HEAP_SIZE: u32 = 0x1000;
const SIM_HEAP_CANDIDATES: [Address; 2] = [Address::new(0x8000_0000), Address::new(0x0100_0000)];

static ORIGINAL: OriginalFunction = OriginalFunction::new();

pub struct CommandHandler {
    config: Config,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self {
            config: Config::from_env(),
        }
    }

    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        self.apply_args(&args)?;
        self.setup_logging();

        match args.command {
            Command::Assemble(assemble_args) => self.handle_assemble(assemble_args),
            Command::Jump(jump_args) => self.handle_jump(jump_args),
            Command::Trampoline(trampoline_args) => self.handle_trampoline(trampoline_args),
        }
    }

    /// Layers the config file and global flags over the current config.
    pub fn apply_args(&mut self, args: &Args) -> anyhow::Result<()> {
        if let Some(path) = &args.config {
            self.config = Config::load(path)?;
        }
        if let Some(level) = &args.log_level {
            self.config.log_level = level.to_lowercase();
        }
        if args.no_color {
            self.config.color = false;
        }
        self.config.validate().map_err(|e| anyhow::anyhow!(e))
    }

    fn setup_logging(&self) {
        if !self.config.color {
            colored::control::set_override(false);
        }
        LoggingUtils::init(LoggingUtils::level_from_str(&self.config.log_level), self.config.color);
    }

    fn handle_assemble(&self, args: AssembleArgs) -> anyhow::Result<()> {
        let assembler = if args.no_memo {
            Assembler::without_memo()
        } else {
            Assembler::from_config(&self.config)
        };

        let mut failures = 0;
        for instruction in &args.instructions {
            match assembler.assemble(instruction) {
                Ok(word) => println!("  {:<28} {}", instruction, hex_word(word).green()),
                Err(e) => {
                    failures += 1;
                    println!("  {:<28} {}", instruction, e.to_string().red());
                }
            }
        }

        let stats = assembler.stats();
        log::debug!(
            "{} pipeline runs, {} cache hits, {} cached",
            stats.pipeline_runs,
            stats.cache_hits,
            stats.cached_entries
        );

        if failures > 0 {
            return Err(anyhow::anyhow!("{} failed to assemble", pluralize(failures, "instruction", "instructions")));
        }
        Ok(())
    }

    fn handle_jump(&self, args: JumpArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let form = jump_form(args.from, args.to);
        let words = jump(args.from, args.to)?;
        log::debug!("{} -> {}: {}", args.from, args.to, hex_words(&words));

        println!(
            "{} {} jump {} -> {} ({})",
            "[+]".green(),
            form,
            args.from,
            args.to,
            pluralize(words.len(), "word", "words")
        );
        for (i, word) in words.iter().enumerate() {
            println!("  {}  {}", args.from.word(i), hex_word(*word).cyan());
        }
        Ok(())
    }

    fn handle_trampoline(&self, args: TrampolineArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;

        let sim = Arc::new(simulated_target(args.at, &args.words)?);
        let memory: Arc<dyn PhysicalMemory> = sim.clone();

        let entry = resolve_branch_chain(memory.as_ref(), args.at)?;
        if entry != args.at {
            println!("{} {} already jumps to {}", "[*]".blue(), args.at, entry);
        }

        let mut trampoline = TrampolinePatch::create(memory, args.at, &ORIGINAL, args.to)?;
        trampoline.enable()?;

        println!("{} hooked entry at {}:", "[+]".green(), args.at);
        for i in 0..trampoline.hook().len() {
            let addr = args.at.word(i);
            println!("  {}  {}", addr, hex_word(sim.peek_word(addr)?).cyan());
        }

        println!("{} original function relocated to {}:", "[+]".green(), trampoline.block());
        for i in 0..trampoline.block_words().len() {
            let addr = trampoline.block().word(i);
            println!("  {}  {}", addr, hex_word(sim.peek_word(addr)?).cyan());
        }

        let stats = sim.stats();
        log::info!(
            "{} writes, {} icache invalidations, {} allocations",
            stats.writes,
            stats.icache_invalidations,
            stats.allocations
        );
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Maps a code page around `at` seeded with `words`, plus a code heap that
/// does not overlap it.
pub fn simulated_target(at: Address, words: &[u32]) -> anyhow::Result<SimulatedMemory> {
    let code_base = at.align_down(0x1000);
    let code_range = MemoryRange::from_start_size(code_base, SIM_CODE_SIZE);
    let heap = SIM_HEAP_CANDIDATES
        .iter()
        .copied()
        .find(|candidate| !code_range.overlaps(&MemoryRange::from_start_size(*candidate, SIM_HEAP_SIZE)))
        .ok_or_else(|| anyhow::anyhow!("no room for a code heap next to {}", at))?;

    let sim = SimulatedMemory::new();
    sim.map_region(code_base, SIM_CODE_PHYSICAL, SIM_CODE_SIZE)?;
    sim.map_heap(heap, SIM_HEAP_PHYSICAL, SIM_HEAP_SIZE)?;
    for (i, word) in words.iter().enumerate() {
        sim.poke_word(at.word(i), *word)?;
    }
    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_simulated_target_layout() {
        let sim = simulated_target(Address::new(0x0080_0010), &[0x7C08_02A6]).unwrap();
        assert_eq!(sim.peek_word(Address::new(0x0080_0010)).unwrap(), 0x7C08_02A6);
        assert!(sim.allocate_code(4, 4).is_some());
    }

    #[test]
    fn test_simulated_heap_moves_out_of_the_way() {
        let sim = simulated_target(Address::new(0x8000_0100), &[]).unwrap();
        assert_eq!(sim.allocate_code(4, 4), Some(Address::new(0x0100_0000)));
    }

    #[test]
    fn test_global_flags_override_config() {
        let args = Args::try_parse_from(["ppc-hook", "--log-level", "DEBUG", "--no-color", "assemble", "nop"]).unwrap();
        let mut handler = CommandHandler::with_config(Config::default());
        handler.apply_args(&args).unwrap();

        assert_eq!(handler.config().log_level, "debug");
        assert!(!handler.config().color);
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let args = Args::try_parse_from(["ppc-hook", "--log-level", "loud", "assemble", "nop"]).unwrap();
        let mut handler = CommandHandler::with_config(Config::default());
        assert!(handler.apply_args(&args).is_err());
    }
}
