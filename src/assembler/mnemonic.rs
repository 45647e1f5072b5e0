// Tue Jan 13 2026 - Alex

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Addic,
    Addi,
    Addis,
    B,
    Ba,
    Bl,
    Blr,
    Li,
    Lis,
    Ori,
    Nop,
    Mtspr,
    Mtctr,
    Bctr,
    Stw,
    Stwu,
    Stb,
    Lwz,
    Lwzu,
    Lbz,
}

impl Mnemonic {
    pub const ALL: [Mnemonic; 20] = [
        Mnemonic::Addic,
        Mnemonic::Addi,
        Mnemonic::Addis,
        Mnemonic::B,
        Mnemonic::Ba,
        Mnemonic::Bl,
        Mnemonic::Blr,
        Mnemonic::Li,
        Mnemonic::Lis,
        Mnemonic::Ori,
        Mnemonic::Nop,
        Mnemonic::Mtspr,
        Mnemonic::Mtctr,
        Mnemonic::Bctr,
        Mnemonic::Stw,
        Mnemonic::Stwu,
        Mnemonic::Stb,
        Mnemonic::Lwz,
        Mnemonic::Lwzu,
        Mnemonic::Lbz,
    ];

    /// Primary opcode, the top six bits of the instruction word.
    pub fn opcode(self) -> u32 {
        match self {
            Mnemonic::Addic => 12,
            Mnemonic::Addi | Mnemonic::Li => 14,
            Mnemonic::Addis | Mnemonic::Lis => 15,
            Mnemonic::B | Mnemonic::Ba | Mnemonic::Bl => 18,
            Mnemonic::Blr | Mnemonic::Bctr => 19,
            Mnemonic::Ori | Mnemonic::Nop => 24,
            Mnemonic::Mtspr | Mnemonic::Mtctr => 31,
            Mnemonic::Lwz => 32,
            Mnemonic::Lwzu => 33,
            Mnemonic::Lbz => 34,
            Mnemonic::Stw => 36,
            Mnemonic::Stwu => 37,
            Mnemonic::Stb => 38,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Addic => "addic",
            Mnemonic::Addi => "addi",
            Mnemonic::Addis => "addis",
            Mnemonic::B => "b",
            Mnemonic::Ba => "ba",
            Mnemonic::Bl => "bl",
            Mnemonic::Blr => "blr",
            Mnemonic::Li => "li",
            Mnemonic::Lis => "lis",
            Mnemonic::Ori => "ori",
            Mnemonic::Nop => "nop",
            Mnemonic::Mtspr => "mtspr",
            Mnemonic::Mtctr => "mtctr",
            Mnemonic::Bctr => "bctr",
            Mnemonic::Stw => "stw",
            Mnemonic::Stwu => "stwu",
            Mnemonic::Stb => "stb",
            Mnemonic::Lwz => "lwz",
            Mnemonic::Lwzu => "lwzu",
            Mnemonic::Lbz => "lbz",
        }
    }

    /// Looks up an already lowercased mnemonic.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|mnemonic| mnemonic.as_str() == name)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_names() {
        for mnemonic in Mnemonic::ALL {
            assert_eq!(Mnemonic::from_name(mnemonic.as_str()), Some(mnemonic));
        }
        assert_eq!(Mnemonic::from_name("ADDI"), None);
        assert_eq!(Mnemonic::from_name("bogus"), None);
    }

    #[test]
    fn test_opcodes_fit_six_bits() {
        for mnemonic in Mnemonic::ALL {
            assert!(mnemonic.opcode() < 64, "{}", mnemonic);
        }
        assert_eq!(Mnemonic::Ori.opcode(), 24);
        assert_eq!(Mnemonic::Lwz.opcode(), 32);
    }
}
