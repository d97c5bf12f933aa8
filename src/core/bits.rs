// src/core/bits.rs

use super::error::TeleportError;
use std::fmt;

/// The two classical bits carried from sender to receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassicalBit {
    /// Outcome of measuring the message qubit; selects the Z correction.
    Z,
    /// Outcome of measuring the sender's half of the pair; selects the X correction.
    X,
}

impl ClassicalBit {
    /// All bits in register order.
    pub const ALL: [ClassicalBit; 2] = [ClassicalBit::Z, ClassicalBit::X];

    fn slot(self) -> usize {
        match self {
            ClassicalBit::Z => 0,
            ClassicalBit::X => 1,
        }
    }
}

impl fmt::Display for ClassicalBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassicalBit::Z => write!(f, "z"),
            ClassicalBit::X => write!(f, "x"),
        }
    }
}

/// Classical register holding the Z and X bits of one run.
///
/// Every bit starts undefined and can be written exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassicalRegister {
    bits: [Option<u8>; 2],
}

impl ClassicalRegister {
    /// Creates a register with both bits undefined.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` (0 or 1) into `bit`.
    ///
    /// # Errors
    /// `TeleportError::Simulation` if the bit was already written or the value is not a bit.
    pub fn set(&mut self, bit: ClassicalBit, value: u8) -> Result<(), TeleportError> {
        if value > 1 {
            return Err(TeleportError::simulation(format!(
                "cannot store {} in classical bit {}",
                value, bit
            )));
        }
        let slot = &mut self.bits[bit.slot()];
        if slot.is_some() {
            return Err(TeleportError::simulation(format!(
                "classical bit {} was already written",
                bit
            )));
        }
        *slot = Some(value);
        Ok(())
    }

    /// The value of `bit`, or `None` if it has not been written yet.
    pub fn get(&self, bit: ClassicalBit) -> Option<u8> {
        self.bits[bit.slot()]
    }

    /// The value of `bit`, failing if it has not been written yet.
    pub fn read(&self, bit: ClassicalBit) -> Result<u8, TeleportError> {
        self.get(bit).ok_or_else(|| {
            TeleportError::simulation(format!("classical bit {} read before being measured", bit))
        })
    }

    /// Returns `true` once every bit has been written.
    pub fn is_complete(&self) -> bool {
        self.bits.iter().all(Option::is_some)
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, bit) in ClassicalBit::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match self.get(*bit) {
                Some(v) => write!(f, "{}={}", bit, v)?,
                None => write!(f, "{}=?", bit)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_are_write_once() {
        let mut reg = ClassicalRegister::new();
        assert_eq!(reg.get(ClassicalBit::Z), None);
        reg.set(ClassicalBit::Z, 1).unwrap();
        assert_eq!(reg.read(ClassicalBit::Z), Ok(1));
        assert!(reg.set(ClassicalBit::Z, 0).is_err());
        assert!(!reg.is_complete());
        reg.set(ClassicalBit::X, 0).unwrap();
        assert!(reg.is_complete());
        assert_eq!(reg.to_string(), "z=1 x=0");
    }

    #[test]
    fn test_unset_bit_read_fails() {
        let reg = ClassicalRegister::new();
        assert!(reg.read(ClassicalBit::X).is_err());
        assert_eq!(reg.to_string(), "z=? x=?");
    }

    #[test]
    fn test_non_bit_value_rejected() {
        let mut reg = ClassicalRegister::new();
        assert!(reg.set(ClassicalBit::X, 2).is_err());
        assert_eq!(reg.get(ClassicalBit::X), None);
    }
}
