// Tue Jan 13 2026 - Alex

use bitflags::bitflags;
use std::fmt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Protection: u32 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        const EXECUTE = 1 << 2;
        const COPY_ON_WRITE = 1 << 3;
        const GUARD = 1 << 4;
    }
}

impl Protection {
    /// Parses the permission column of `/proc/<pid>/maps` (`rwxp`).
    pub fn from_maps_perms(perms: &str) -> Self {
        let mut prot = Self::empty();
        for (i, c) in perms.chars().enumerate() {
            match (i, c) {
                (0, 'r') => prot |= Self::READ,
                (1, 'w') => prot |= Self::WRITE,
                (2, 'x') => prot |= Self::EXECUTE,
                (3, 'p') if prot.contains(Self::WRITE) => prot |= Self::COPY_ON_WRITE,
                _ => {}
            }
        }
        prot
    }

    pub fn can_read(self) -> bool {
        self.contains(Self::READ) && !self.contains(Self::GUARD)
    }

    pub fn can_write(self) -> bool {
        self.contains(Self::WRITE)
    }

    pub fn can_execute(self) -> bool {
        self.contains(Self::EXECUTE)
    }

    /// Regions an emulator can keep its RAM mirror in: readable, and either
    /// writable or not executable.
    pub fn may_hold_ram(self) -> bool {
        self.can_read() && (self.can_write() || !self.can_execute())
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.contains(Self::READ), 'r'),
            flag(self.contains(Self::WRITE), 'w'),
            flag(self.contains(Self::EXECUTE), 'x'),
            flag(self.contains(Self::COPY_ON_WRITE), 'c'),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_maps_perms() {
        let p = Protection::from_maps_perms("rw-p");
        assert_eq!(p, Protection::READ | Protection::WRITE | Protection::COPY_ON_WRITE);
        assert_eq!(Protection::from_maps_perms("r-xp"), Protection::READ | Protection::EXECUTE);
        assert_eq!(p.to_string(), "rw-c");
    }

    #[test]
    fn test_may_hold_ram() {
        assert!(Protection::READ.may_hold_ram());
        assert!((Protection::READ | Protection::WRITE).may_hold_ram());
        assert!((Protection::READ | Protection::WRITE | Protection::EXECUTE).may_hold_ram());
        assert!(!(Protection::READ | Protection::EXECUTE).may_hold_ram());
        assert!(!Protection::WRITE.may_hold_ram());
        assert!(!(Protection::READ | Protection::GUARD).may_hold_ram());
    }
}
