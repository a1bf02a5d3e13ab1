//! # Privilege Levels
//!
//! The CPU compares three numbers on every segment load and every `int n`:
//!
//! | Concept | Stored in | Meaning |
//! |---------|-----------|---------|
//! | [`Ring`] | low bits of the running `CS` | current privilege level (CPL) |
//! | [`Rpl`]  | low 2 bits of a selector | requested privilege level |
//! | [`Dpl`]  | access byte / gate flags | privilege the descriptor demands |
//!
//! Only rings 0 (kernel) and 3 (user) are used by this kernel.

/// Current privilege level of executing code.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Ring {
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    Ring3 = 3,
}

impl Ring {
    #[inline]
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            _ => Self::Ring3,
        }
    }
}

/// Descriptor Privilege Level (lives *in the descriptor*).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Dpl {
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    Ring3 = 3,
}

impl Dpl {
    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[inline]
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0b11 {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            _ => Self::Ring3,
        }
    }

    /// Software `int n` through a gate: allowed iff `CPL ≤ DPL`.
    ///
    /// Hardware interrupts and CPU exceptions ignore the gate DPL.
    #[inline]
    #[must_use]
    pub const fn permits_software_interrupt(self, cpl: Ring) -> bool {
        (cpl as u8) <= (self as u8)
    }

    /// Data segment load: allowed iff `max(CPL, RPL) ≤ DPL`.
    #[inline]
    #[must_use]
    pub const fn permits_data_load(self, cpl: Ring, rpl: Rpl) -> bool {
        let effective = if (rpl as u8) > (cpl as u8) {
            rpl as u8
        } else {
            cpl as u8
        };
        effective <= (self as u8)
    }
}

/// Requested Privilege Level (low two bits of a selector).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Rpl {
    Ring0 = 0,
    Ring1 = 1,
    Ring2 = 2,
    Ring3 = 3,
}

impl Rpl {
    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u16 {
        self as u16
    }

    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_bits(v: u16) -> Self {
        match (v & 0b11) as u8 {
            0 => Self::Ring0,
            1 => Self::Ring1,
            2 => Self::Ring2,
            _ => Self::Ring3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_dpl_vs_cpl() {
        assert!(Dpl::Ring3.permits_software_interrupt(Ring::Ring3));
        assert!(Dpl::Ring3.permits_software_interrupt(Ring::Ring0));
        assert!(!Dpl::Ring0.permits_software_interrupt(Ring::Ring3));
        assert!(Dpl::Ring0.permits_software_interrupt(Ring::Ring0));
    }

    #[test]
    fn data_load_uses_weaker_of_cpl_and_rpl() {
        assert!(Dpl::Ring3.permits_data_load(Ring::Ring0, Rpl::Ring3));
        assert!(!Dpl::Ring0.permits_data_load(Ring::Ring0, Rpl::Ring3));
        assert!(!Dpl::Ring0.permits_data_load(Ring::Ring3, Rpl::Ring0));
    }

    #[test]
    fn bits_are_masked() {
        assert_eq!(Dpl::from_bits(0b111), Dpl::Ring3);
        assert_eq!(Rpl::from_bits(0x1b), Rpl::Ring3);
        assert_eq!(Ring::from_bits(0x08), Ring::Ring0);
    }
}
