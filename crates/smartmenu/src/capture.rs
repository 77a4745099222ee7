use derive_more::{Display, From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct PointerId(u32);

impl PointerId {
    pub const MOUSE: PointerId = PointerId(0);
    pub const TOUCH: PointerId = PointerId(1);
}

/// Which control owns a captured pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureTarget {
    /// The centre handle or the detail stage: moves reposition the menu.
    MenuHandle,
    /// The volume track: moves set the level.
    VolumeTrack,
}

/// Exclusive claim on a pointer. Not `Clone`: dropping it is the release.
#[derive(Debug)]
pub struct PointerCapture {
    pointer: PointerId,
    target: CaptureTarget,
}

impl PointerCapture {
    pub fn pointer(&self) -> PointerId {
        self.pointer
    }

    pub fn target(&self) -> CaptureTarget {
        self.target
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        log::trace!("pointer {} released from {:?}", self.pointer, self.target);
    }
}

#[derive(Debug, Default)]
pub struct CaptureSlot {
    held: Option<PointerCapture>,
}

impl CaptureSlot {
    /// Fails if some pointer is already captured.
    pub fn acquire(&mut self, pointer: PointerId, target: CaptureTarget) -> bool {
        if self.held.is_some() {
            return false;
        }
        log::trace!("pointer {} captured by {:?}", pointer, target);
        self.held = Some(PointerCapture { pointer, target });
        true
    }

    /// Target receiving events from `pointer`, if it is the captured one.
    pub fn target_for(&self, pointer: PointerId) -> Option<CaptureTarget> {
        self.held
            .as_ref()
            .filter(|c| c.pointer == pointer)
            .map(PointerCapture::target)
    }

    /// Hands the capture to the caller; it is released when that value drops.
    pub fn take(&mut self) -> Option<PointerCapture> {
        self.held.take()
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_capture_at_a_time() {
        let mut slot = CaptureSlot::default();
        assert!(slot.acquire(PointerId::MOUSE, CaptureTarget::MenuHandle));
        assert!(!slot.acquire(PointerId::TOUCH, CaptureTarget::VolumeTrack));
        assert_eq!(
            slot.target_for(PointerId::MOUSE),
            Some(CaptureTarget::MenuHandle)
        );
        assert_eq!(slot.target_for(PointerId::TOUCH), None);
    }

    #[test]
    fn test_take_releases() {
        let mut slot = CaptureSlot::default();
        slot.acquire(PointerId::TOUCH, CaptureTarget::VolumeTrack);
        {
            let capture = slot.take().unwrap();
            assert_eq!(capture.pointer(), PointerId::TOUCH);
        }
        assert!(!slot.is_held());
        assert!(slot.acquire(PointerId::MOUSE, CaptureTarget::MenuHandle));
    }
}
