//! Per-master address space allocation.
//!
//! [`AllocMem`] is a bump allocator over a monotonically non-decreasing
//! address line. A slave without an explicit base gets the next multiple of
//! its own window size at or above the high-water mark; a slave with an
//! explicit base keeps it and pushes the high-water mark past its window.
//! Two explicit windows, or an explicit window placed below implicit ones, may
//! overlap: that is reported by [`AllocMem::overlaps`] during validation
//! rather than refused here.
//!
//! A binding of size zero belongs to a bus without addresses. It gets a
//! unique id but no window: it stays out of the map and the high-water mark.
//! A window whose end would not fit in a `u64` is refused.

use serde::{Deserialize, Serialize};

use crate::slave::{InterfaceRef, SlaveBinding};

/// Failure of an allocator operation. The allocator is unchanged on error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    /// An explicit base is not a multiple of the window size.
    #[error("base address {base:#x} is not a multiple of window size {size:#x}")]
    Misaligned {
        /// Requested base.
        base: u64,
        /// Window size.
        size: u64,
    },
    /// The slave already has a window.
    #[error("slave is already bound to this master")]
    AlreadyBound,
    /// The slave has no window.
    #[error("slave is not bound to this master")]
    NotBound,
    /// A base or a new size was given for an unaddressed binding, or a
    /// window was resized to nothing.
    #[error("window size must be positive")]
    ZeroSize,
    /// The window would extend past the last representable address.
    #[error("window of size {size:#x} at {base:#x} does not fit in the address line")]
    OutOfRange {
        /// First byte address.
        base: u64,
        /// Window size.
        size: u64,
    },
}

/// The window of one bound slave.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Window {
    /// Slave and its unique id.
    pub binding: SlaveBinding,
    /// Window size in bytes.
    pub size: u64,
    /// First byte address.
    pub base: u64,
    /// Whether `base` was set by the user rather than allocated.
    pub explicit: bool,
}

impl Window {
    /// One past the last byte address.
    pub fn end(&self) -> u64 {
        self.base.saturating_add(self.size)
    }

    /// Whether the binding occupies addresses at all.
    pub fn is_addressed(&self) -> bool {
        self.size > 0
    }

    /// Whether two windows share at least one address.
    pub fn overlaps(&self, other: &Window) -> bool {
        self.is_addressed()
            && other.is_addressed()
            && self.base < other.end()
            && other.base < self.end()
    }
}

/// Owner of an address range in a memory map.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Owner {
    /// A bound slave.
    Slave(InterfaceRef),
    /// Unallocated gap between two windows.
    Void,
}

/// One row of a master's memory map.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct MapEntry {
    /// First byte address.
    pub address: u64,
    /// Who owns the range.
    pub owner: Owner,
    /// Size in bytes.
    pub size: u64,
    /// Unique id of the slave, `None` for gaps.
    pub id: Option<u32>,
}

/// Address allocator owned by a master interface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllocMem {
    windows: Vec<Window>,
    high_water: u64,
    next_id: u32,
}

impl Default for AllocMem {
    fn default() -> Self {
        Self::new()
    }
}

impl AllocMem {
    /// An empty address space. Unique ids start at 1.
    pub fn new() -> Self {
        Self {
            windows: Vec::new(),
            high_water: 0,
            next_id: 1,
        }
    }

    /// Allocates a window of `size` bytes for `slave`.
    ///
    /// A `size` of zero records an unaddressed binding, which cannot take an
    /// explicit base.
    pub fn bind(
        &mut self,
        slave: InterfaceRef,
        size: u64,
        explicit_base: Option<u64>,
    ) -> Result<Window, AllocError> {
        if self.window(slave).is_some() {
            return Err(AllocError::AlreadyBound);
        }
        if let Some(base) = explicit_base {
            check_alignment(base, size)?;
        }
        let binding = SlaveBinding {
            slave,
            unique_id: self.next_id,
        };
        let window = self.place(binding, size, explicit_base)?;
        self.next_id += 1;
        self.windows.push(window);
        Ok(window)
    }

    /// Releases the window of `slave` and reallocates implicit windows.
    pub fn unbind(&mut self, slave: InterfaceRef) -> Result<Window, AllocError> {
        let pos = self.position(slave)?;
        let mut windows = self.windows.clone();
        let removed = windows.remove(pos);
        *self = self.relaid(windows)?;
        Ok(removed)
    }

    /// Pins the window of `slave` at `base` and reallocates implicit windows.
    pub fn set_base(&mut self, slave: InterfaceRef, base: u64) -> Result<Window, AllocError> {
        let pos = self.position(slave)?;
        let mut windows = self.windows.clone();
        check_alignment(base, windows[pos].size)?;
        windows[pos].base = base;
        windows[pos].explicit = true;
        *self = self.relaid(windows)?;
        Ok(self.windows[pos])
    }

    /// Changes the size of the window of `slave`, e.g. after a generic that
    /// sets its address width was modified.
    pub fn resize(&mut self, slave: InterfaceRef, size: u64) -> Result<(), AllocError> {
        if size == 0 {
            return Err(AllocError::ZeroSize);
        }
        let pos = self.position(slave)?;
        let mut windows = self.windows.clone();
        if !windows[pos].is_addressed() {
            return Err(AllocError::ZeroSize);
        }
        if windows[pos].explicit {
            check_alignment(windows[pos].base, size)?;
        }
        windows[pos].size = size;
        *self = self.relaid(windows)?;
        Ok(())
    }

    /// Window of `slave`, if bound.
    pub fn window(&self, slave: InterfaceRef) -> Option<&Window> {
        self.windows.iter().find(|w| w.binding.slave == slave)
    }

    /// Windows in binding order.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// First address above every window.
    pub fn high_water(&self) -> u64 {
        self.high_water
    }

    /// Memory map ordered by address, with `Void` rows for gaps between
    /// consecutive windows.
    pub fn mapping(&self) -> Vec<MapEntry> {
        let mut sorted: Vec<&Window> = self.windows.iter().filter(|w| w.is_addressed()).collect();
        sorted.sort_by_key(|w| (w.base, w.binding.unique_id));

        let mut entries = Vec::with_capacity(sorted.len() * 2);
        let mut previous_end: Option<u64> = None;
        for window in sorted {
            if let Some(end) = previous_end {
                if window.base > end {
                    entries.push(MapEntry {
                        address: end,
                        owner: Owner::Void,
                        size: window.base - end,
                        id: None,
                    });
                }
            }
            entries.push(MapEntry {
                address: window.base,
                owner: Owner::Slave(window.binding.slave),
                size: window.size,
                id: Some(window.binding.unique_id),
            });
            previous_end = Some(previous_end.map_or(window.end(), |e| e.max(window.end())));
        }
        entries
    }

    /// Pairs of slaves whose windows overlap.
    pub fn overlaps(&self) -> Vec<(InterfaceRef, InterfaceRef)> {
        let mut pairs = Vec::new();
        for (i, a) in self.windows.iter().enumerate() {
            for b in &self.windows[i + 1..] {
                if a.overlaps(b) {
                    pairs.push((a.binding.slave, b.binding.slave));
                }
            }
        }
        pairs
    }

    fn position(&self, slave: InterfaceRef) -> Result<usize, AllocError> {
        self.windows
            .iter()
            .position(|w| w.binding.slave == slave)
            .ok_or(AllocError::NotBound)
    }

    /// Places `windows` in order into a fresh copy of this allocator.
    fn relaid(&self, windows: Vec<Window>) -> Result<AllocMem, AllocError> {
        let mut next = AllocMem {
            windows: Vec::with_capacity(windows.len()),
            high_water: 0,
            next_id: self.next_id,
        };
        for w in windows {
            let placed = next.place(w.binding, w.size, w.explicit.then_some(w.base))?;
            next.windows.push(placed);
        }
        Ok(next)
    }

    fn place(
        &mut self,
        binding: SlaveBinding,
        size: u64,
        explicit_base: Option<u64>,
    ) -> Result<Window, AllocError> {
        if size == 0 {
            return Ok(Window {
                binding,
                size,
                base: 0,
                explicit: false,
            });
        }
        let (base, explicit) = match explicit_base {
            Some(base) => (base, true),
            None => {
                let base = self.high_water.div_ceil(size).checked_mul(size).ok_or(
                    AllocError::OutOfRange {
                        base: self.high_water,
                        size,
                    },
                )?;
                (base, false)
            }
        };
        let end = base
            .checked_add(size)
            .ok_or(AllocError::OutOfRange { base, size })?;
        self.high_water = self.high_water.max(end);
        Ok(Window {
            binding,
            size,
            base,
            explicit,
        })
    }
}

fn check_alignment(base: u64, size: u64) -> Result<(), AllocError> {
    if size == 0 {
        return Err(AllocError::ZeroSize);
    }
    if base % size != 0 {
        return Err(AllocError::Misaligned { base, size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pod_common::Ident;
    use quickcheck_macros::quickcheck;

    fn slave(n: u32) -> InterfaceRef {
        InterfaceRef::new(Ident::from_raw(n), Ident::from_raw(1000))
    }

    #[test]
    fn bump_allocation_rounds_up_to_own_size() {
        let mut mem = AllocMem::new();
        assert_eq!(mem.bind(slave(0), 4, None).unwrap().base, 0);
        assert_eq!(mem.bind(slave(1), 16, None).unwrap().base, 16);
        assert_eq!(mem.bind(slave(2), 4, None).unwrap().base, 32);
        assert_eq!(mem.high_water(), 36);
    }

    #[test]
    fn unique_ids_increase_and_are_not_reused() {
        let mut mem = AllocMem::new();
        let a = mem.bind(slave(0), 4, None).unwrap().binding.unique_id;
        let b = mem.bind(slave(1), 4, None).unwrap().binding.unique_id;
        mem.unbind(slave(1)).unwrap();
        let c = mem.bind(slave(1), 4, None).unwrap().binding.unique_id;
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn explicit_base_must_be_aligned() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 4, None).unwrap();
        mem.bind(slave(1), 4, None).unwrap();
        assert_eq!(
            mem.set_base(slave(1), 6),
            Err(AllocError::Misaligned { base: 6, size: 4 })
        );
        assert_eq!(mem.window(slave(1)).unwrap().base, 4);

        let w = mem.set_base(slave(1), 8).unwrap();
        assert_eq!(w.base, 8);
        assert_eq!(mem.high_water(), 12);
    }

    #[test]
    fn misaligned_bind_leaves_allocator_untouched() {
        let mut mem = AllocMem::new();
        assert!(mem.bind(slave(0), 8, Some(4)).is_err());
        assert!(mem.windows().is_empty());
        assert_eq!(mem.bind(slave(0), 8, None).unwrap().binding.unique_id, 1);
    }

    #[test]
    fn mapping_reports_void_gap() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 16, None).unwrap();
        mem.bind(slave(1), 16, Some(0x20)).unwrap();
        let map = mem.mapping();
        assert_eq!(map.len(), 3);
        assert_eq!(map[0].address, 0x00);
        assert_eq!(
            map[1],
            MapEntry {
                address: 0x10,
                owner: Owner::Void,
                size: 0x10,
                id: None
            }
        );
        assert_eq!(map[2].address, 0x20);
        assert_eq!(map[2].id, Some(2));
    }

    #[test]
    fn unbind_reallocates_implicit_windows() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 4, None).unwrap();
        mem.bind(slave(1), 4, None).unwrap();
        mem.bind(slave(2), 4, None).unwrap();
        mem.unbind(slave(0)).unwrap();
        assert_eq!(mem.window(slave(1)).unwrap().base, 0);
        assert_eq!(mem.window(slave(2)).unwrap().base, 4);
        assert_eq!(mem.unbind(slave(0)), Err(AllocError::NotBound));
    }

    #[test]
    fn explicit_windows_can_overlap_and_are_reported() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 8, None).unwrap();
        mem.bind(slave(1), 4, Some(4)).unwrap();
        assert_eq!(mem.overlaps(), vec![(slave(0), slave(1))]);
    }

    #[test]
    fn resize_moves_following_windows() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 4, None).unwrap();
        mem.bind(slave(1), 4, None).unwrap();
        mem.resize(slave(0), 8).unwrap();
        assert_eq!(mem.window(slave(1)).unwrap().base, 8);
    }

    #[test]
    fn window_past_the_address_line_is_refused() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 64, None).unwrap();
        mem.bind(slave(1), 64, None).unwrap();
        assert_eq!(
            mem.set_base(slave(0), 0xFFFF_FFFF_FFFF_FFC0),
            Err(AllocError::OutOfRange {
                base: 0xFFFF_FFFF_FFFF_FFC0,
                size: 64
            })
        );
        assert_eq!(mem.window(slave(0)).unwrap().base, 0);
        assert!(!mem.window(slave(0)).unwrap().explicit);
        assert_eq!(mem.window(slave(1)).unwrap().base, 64);
        assert_eq!(mem.high_water(), 128);
    }

    #[test]
    fn implicit_window_after_top_explicit_one_is_refused() {
        let mut mem = AllocMem::new();
        mem.bind(slave(0), 0x100, Some(0xFFFF_FFFF_FFFF_FE00)).unwrap();
        let err = mem.bind(slave(1), 0x1000, None).unwrap_err();
        assert!(matches!(err, AllocError::OutOfRange { size: 0x1000, .. }));
        assert_eq!(mem.windows().len(), 1);
        assert_eq!(mem.bind(slave(1), 0x80, None).unwrap().binding.unique_id, 2);
        assert_eq!(mem.window(slave(1)).unwrap().base, 0xFFFF_FFFF_FFFF_FF00);
    }

    #[test]
    fn unaddressed_binding_has_an_id_but_no_window() {
        let mut mem = AllocMem::new();
        let clock = mem.bind(slave(0), 0, None).unwrap();
        assert_eq!(clock.binding.unique_id, 1);
        assert!(!clock.is_addressed());
        mem.bind(slave(1), 16, None).unwrap();
        assert_eq!(mem.window(slave(1)).unwrap().base, 0);
        assert_eq!(mem.windows().len(), 2);
        let map = mem.mapping();
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].owner, Owner::Slave(slave(1)));
        assert!(mem.overlaps().is_empty());
        assert_eq!(mem.set_base(slave(0), 0), Err(AllocError::ZeroSize));
        assert_eq!(mem.bind(slave(2), 0, Some(0)), Err(AllocError::ZeroSize));
        mem.unbind(slave(0)).unwrap();
        assert_eq!(mem.windows().len(), 1);
    }

    #[quickcheck]
    fn implicit_windows_are_aligned_and_disjoint(size_log2: Vec<u8>, drop: Vec<u8>) -> bool {
        let mut mem = AllocMem::new();
        for (i, e) in size_log2.iter().take(40).enumerate() {
            mem.bind(slave(i as u32), 1 << (e % 12), None).unwrap();
        }
        let count = size_log2.len().min(40);
        for d in drop.iter().take(10) {
            if count > 0 {
                let _ = mem.unbind(slave(u32::from(*d) % count as u32));
            }
        }
        mem.overlaps().is_empty() && mem.windows().iter().all(|w| w.base % w.size == 0)
    }

    #[quickcheck]
    fn accepted_explicit_bases_are_aligned(requests: Vec<(u8, Option<u16>)>) -> bool {
        let mut mem = AllocMem::new();
        for (i, (e, base)) in requests.iter().take(40).enumerate() {
            let size = 1u64 << (e % 10);
            let _ = mem.bind(slave(i as u32), size, base.map(u64::from));
        }
        let ids: Vec<u32> = mem.windows().iter().map(|w| w.binding.unique_id).collect();
        mem.windows().iter().all(|w| w.base % w.size == 0) && ids.windows(2).all(|p| p[0] < p[1])
    }
}
