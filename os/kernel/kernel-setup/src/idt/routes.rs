//! # Vector routing
//!
//! Which handler serves which vector is decided here, independently of how
//! the gate is encoded:
//!
//! | Vectors      | Route                  | DPL |
//! |--------------|------------------------|-----|
//! | `0..=16`     | dedicated exception    | 0   |
//! | `17..=31`    | shared generic handler | 0   |
//! | `32..=47`    | IRQ `n - 32`           | 0   |
//! | `0x80`       | system call            | 3   |
//! | anything else| not present            |     |

use crate::addresses::LinearAddress;
use crate::privilege::{Dpl, Ring};
use kernel_info::vectors::{
    DEDICATED_EXCEPTIONS, IRQ_BASE, IRQ_LINES, LAST_EXCEPTION, LAST_IRQ, SYSCALL,
};

/// The handler a vector is routed to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Route {
    /// Dedicated CPU exception handler with this number.
    Exception(u8),
    /// Shared handler for the reserved exception range.
    Generic,
    /// Hardware interrupt line (0..16).
    Irq(u8),
    /// `int 0x80`.
    Syscall,
    /// No gate; the entry stays zero.
    Absent,
}

impl Route {
    #[must_use]
    pub const fn for_vector(vector: u8) -> Self {
        match vector {
            0..DEDICATED_EXCEPTIONS => Self::Exception(vector),
            DEDICATED_EXCEPTIONS..=LAST_EXCEPTION => Self::Generic,
            IRQ_BASE..=LAST_IRQ => Self::Irq(vector - IRQ_BASE),
            SYSCALL => Self::Syscall,
            _ => Self::Absent,
        }
    }

    /// Privilege ring 3 code needs to be allowed to raise this vector.
    ///
    /// Only the system call gate is reachable from user mode; everything
    /// else faults with `#GP` when issued as `int n` from ring 3.
    #[must_use]
    pub const fn gate_dpl(self) -> Dpl {
        match self {
            Self::Syscall => Dpl::Ring3,
            _ => Dpl::Ring0,
        }
    }

    /// Whether `int n` from ring 3 gets through the gate.
    #[must_use]
    pub const fn user_invocable(self) -> bool {
        self.gate_dpl().permits_software_interrupt(Ring::Ring3)
    }
}

const _: () = {
    assert!(Route::for_vector(SYSCALL).user_invocable());
    assert!(!Route::Generic.user_invocable());
    assert!(!Route::Exception(3).user_invocable());
    assert!(!Route::Irq(0).user_invocable());
};

/// Entry points of the low-level interrupt stubs.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct HandlerTable {
    /// Handlers for exceptions `0..=16`.
    pub exceptions: [LinearAddress; DEDICATED_EXCEPTIONS as usize],
    /// Handler shared by vectors `17..=31`.
    pub generic: LinearAddress,
    /// Handlers for IRQ lines `0..=15`.
    pub irqs: [LinearAddress; IRQ_LINES as usize],
    pub syscall: LinearAddress,
}

impl HandlerTable {
    /// Address of the handler serving `route`, or `None` for [`Route::Absent`].
    #[must_use]
    pub const fn resolve(&self, route: Route) -> Option<LinearAddress> {
        match route {
            Route::Exception(n) => Some(self.exceptions[n as usize]),
            Route::Generic => Some(self.generic),
            Route::Irq(n) => Some(self.irqs[n as usize]),
            Route::Syscall => Some(self.syscall),
            Route::Absent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        assert_eq!(Route::for_vector(0), Route::Exception(0));
        assert_eq!(Route::for_vector(16), Route::Exception(16));
        assert_eq!(Route::for_vector(17), Route::Generic);
        assert_eq!(Route::for_vector(31), Route::Generic);
        assert_eq!(Route::for_vector(32), Route::Irq(0));
        assert_eq!(Route::for_vector(47), Route::Irq(15));
        assert_eq!(Route::for_vector(48), Route::Absent);
        assert_eq!(Route::for_vector(127), Route::Absent);
        assert_eq!(Route::for_vector(128), Route::Syscall);
        assert_eq!(Route::for_vector(129), Route::Absent);
        assert_eq!(Route::for_vector(255), Route::Absent);
    }

    #[test]
    fn only_syscall_is_user_reachable() {
        for vector in 0..=u8::MAX {
            let route = Route::for_vector(vector);
            assert_eq!(route.user_invocable(), vector == 0x80, "vector {vector}");
            assert!(
                route.gate_dpl().permits_software_interrupt(Ring::Ring0),
                "vector {vector}"
            );
        }
    }

    #[test]
    fn resolve_picks_named_entries() {
        let table = HandlerTable {
            exceptions: core::array::from_fn(|i| LinearAddress::new(0x1000 + i as u32)),
            generic: LinearAddress::new(0x2000),
            irqs: core::array::from_fn(|i| LinearAddress::new(0x3000 + i as u32)),
            syscall: LinearAddress::new(0x4000),
        };

        let addr = LinearAddress::new;
        assert_eq!(table.resolve(Route::Exception(3)), Some(addr(0x1003)));
        assert_eq!(table.resolve(Route::Generic), Some(addr(0x2000)));
        assert_eq!(table.resolve(Route::Irq(15)), Some(addr(0x300F)));
        assert_eq!(table.resolve(Route::Syscall), Some(addr(0x4000)));
        assert_eq!(table.resolve(Route::Absent), None);
    }
}
