// 测试：硬件信号量绑定的生命周期

use std::sync::atomic::Ordering;

use super::mock::*;
use crate::errno::constants::*;
use crate::error::GateError;
use crate::gate::Sema4Binding;

#[test]
fn test_assign_creates_handle_for_fixed_gate() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);

    assert!(!binding.is_bound());
    assert_eq!(binding.handle(), None);

    assert_eq!(binding.assign(), Ok(()));
    assert!(binding.is_bound());
    assert_eq!(binding.handle(), Some(FakeHandle(TEST_GATE)));
}

#[test]
fn test_assign_twice_creates_once() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);

    binding.assign().unwrap();
    assert_eq!(binding.assign(), Ok(()));
    assert_eq!(binding.driver().creates.load(Ordering::Acquire), 1);
}

#[test]
fn test_assign_failure_leaves_unbound() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);
    binding.driver().fail_create.store(-EBUSY, Ordering::Release);

    assert_eq!(binding.assign(), Err(GateError::HardwareFault(-EBUSY)));
    assert!(!binding.is_bound());

    // 故障消失后可以重新绑定
    binding.driver().fail_create.store(0, Ordering::Release);
    assert_eq!(binding.assign(), Ok(()));
    assert!(binding.is_bound());
}

#[test]
fn test_deassign_unbound() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);
    assert_eq!(binding.deassign(), Err(GateError::NotInitialized));
    assert_eq!(binding.driver().destroys.load(Ordering::Acquire), 0);
}

#[test]
fn test_deassign_then_rebind() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);

    binding.assign().unwrap();
    assert_eq!(binding.deassign(), Ok(()));
    assert!(!binding.is_bound());
    assert_eq!(binding.deassign(), Err(GateError::NotInitialized));

    assert_eq!(binding.get_or_assign(), Ok(FakeHandle(TEST_GATE)));
    assert_eq!(binding.driver().creates.load(Ordering::Acquire), 2);
}

#[test]
fn test_deassign_failure_keeps_handle() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);
    binding.assign().unwrap();
    binding.driver().fail_destroy.store(-EBUSY, Ordering::Release);

    assert_eq!(binding.deassign(), Err(GateError::HardwareFault(-EBUSY)));
    assert!(binding.is_bound());

    binding.driver().fail_destroy.store(0, Ordering::Release);
    assert_eq!(binding.deassign(), Ok(()));
}

#[test]
fn test_get_or_assign_reuses_handle() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);

    assert_eq!(binding.get_or_assign(), Ok(FakeHandle(TEST_GATE)));
    assert_eq!(binding.get_or_assign(), Ok(FakeHandle(TEST_GATE)));
    assert_eq!(binding.driver().creates.load(Ordering::Acquire), 1);
}

#[test]
fn test_get_or_assign_reports_driver_code() {
    let binding = Sema4Binding::new(FakeSema4::new(), TEST_GATE);
    binding.driver().fail_create.store(-ENODEV, Ordering::Release);

    assert_eq!(binding.get_or_assign(), Err(-ENODEV));
    assert!(!binding.is_bound());
}
