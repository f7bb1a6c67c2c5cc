use super::*;

#[test]
fn enter_and_leave_track_depth() {
    let mut guard = RecursionGuard::new(4);
    assert!(guard.enter(1u32).is_entered());
    assert!(guard.enter(2u32).is_entered());
    assert_eq!(guard.depth(), 2);
    assert!(guard.is_visiting(&1));
    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_active());
}

#[test]
fn reentering_a_key_is_a_cycle() {
    let mut guard = RecursionGuard::new(4);
    assert!(guard.enter(7u32).is_entered());
    assert!(guard.enter(7u32).is_cycle());
    guard.leave(7);
}

#[test]
fn depth_limit_denies_entry() {
    let mut guard = RecursionGuard::new(2);
    assert!(guard.enter(1u32).is_entered());
    assert!(guard.enter(2u32).is_entered());
    assert_eq!(guard.enter(3u32), RecursionResult::DepthExceeded);
    guard.leave(2);
    assert!(guard.enter(3u32).is_entered());
    guard.leave(3);
    guard.leave(1);
}
