//! Integration test: documented buffer and actuator scenarios.
//!
//! Capacity-8 ring walkthroughs (append → commit → claim → pop, rollback slot
//! reuse) and the fan drain / emergency shutdown behavior.

use laser_common::laser::config::LaserConfig;
use laser_control::actuator::{ActuatorFlags, LaserActuator};
use laser_control::output::SimulatedOutputs;
use laser_control::ring::{PowerRing, RingCursors};

#[test]
fn append_commit_claim_pop_in_order() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, mut consumer) = ring.split();

    for p in [10, 20, 30, 40, 50] {
        assert!(writer.append(p));
    }
    assert_eq!(writer.commit_line(), 5);
    assert_eq!(writer.ring().cursors().committed, 5);

    writer.claim_for_move();
    assert_eq!(writer.ring().cursors().unclaimed, 5);

    let popped: Vec<u8> = (0..5).map(|_| consumer.next_power()).collect();
    assert_eq!(popped, vec![10, 20, 30, 40, 50]);

    let before = writer.ring().cursors();
    assert_eq!(consumer.next_power(), 0);
    assert_eq!(writer.ring().cursors(), before);
    assert!(writer.ring().is_empty());
}

#[test]
fn rollback_then_reuse_same_slots() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, mut consumer) = ring.split();

    let start = writer.write_cursor();
    for p in [1, 2, 3] {
        writer.append(p);
    }
    let end = writer.commit_line();
    writer.rollback_if_unclaimed(start, end).unwrap();
    assert_eq!(writer.write_cursor(), start);
    assert_eq!(writer.committed_cursor(), start);

    writer.append(7);
    writer.append(8);
    assert_eq!(writer.write_cursor(), start + 2);
    writer.commit_line();
    writer.claim_for_move();
    assert_eq!(consumer.next_power(), 7);
    assert_eq!(consumer.next_power(), 8);
    assert_eq!(consumer.next_power(), 0);
}

#[test]
fn full_ring_refuses_and_keeps_cursors() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, _consumer) = ring.split();
    for i in 0..7 {
        assert!(writer.append(i));
    }
    let before = writer.ring().cursors();
    assert!(writer.ring().is_full());
    assert!(!writer.append(100));
    assert!(!writer.append_pct(100.0));
    assert_eq!(writer.ring().cursors(), before);
    assert_eq!(writer.ring().dropped(), 2);
}

#[test]
fn consumed_space_is_reusable_after_wrap() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, mut consumer) = ring.split();
    for round in 0..5u8 {
        for i in 0..5 {
            assert!(writer.append(round * 10 + i));
        }
        writer.commit_line();
        writer.claim_for_move();
        for i in 0..5 {
            assert_eq!(consumer.next_power(), round * 10 + i);
        }
        assert!(writer.ring().is_empty());
    }
}

#[test]
fn fan_waits_for_buffer_drain() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, mut consumer) = ring.split();
    let mut act = LaserActuator::new(SimulatedOutputs::new(), LaserConfig::default());

    writer.append(128);
    writer.append(64);
    writer.commit_line();
    writer.claim_for_move();

    act.set_laser(128);
    act.manage_laser(writer.ring());
    assert!(act.is_fan_on());

    // Laser off but power values still pending: fan keeps running.
    act.set_laser(0);
    act.manage_laser(writer.ring());
    assert!(act.is_fan_on());

    consumer.next_power();
    consumer.next_power();
    act.manage_laser(writer.ring());
    assert!(!act.is_fan_on());
    assert_eq!(act.outputs().fan(), 0);
}

#[test]
fn uncommitted_values_also_hold_the_fan() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, _consumer) = ring.split();
    let mut act = LaserActuator::new(SimulatedOutputs::new(), LaserConfig::default());

    act.set_laser(10);
    act.set_laser(0);
    writer.append(5);
    act.manage_laser(writer.ring());
    assert!(act.is_fan_on());

    writer.discard_uncommitted();
    act.manage_laser(writer.ring());
    assert!(!act.is_fan_on());
}

#[test]
fn disable_in_any_state() {
    let mut ring = PowerRing::<8>::new();
    let (mut writer, _consumer) = ring.split();
    writer.append(255);
    writer.commit_line();
    writer.claim_for_move();

    for power in [0u8, 1, 128, 255] {
        let mut act = LaserActuator::new(SimulatedOutputs::new(), LaserConfig::default());
        act.set_laser(power);
        act.disable_laser();
        assert_eq!(act.flags(), ActuatorFlags::empty());
        assert_eq!(act.outputs().laser(), 0);
        assert_eq!(act.outputs().fan(), 0);
    }
    assert!(!writer.ring().is_empty());
}

#[test]
fn reset_after_use() {
    let mut ring = PowerRing::<8>::new();
    {
        let (mut writer, mut consumer) = ring.split();
        for i in 0..4 {
            writer.append(i);
        }
        writer.commit_line();
        writer.claim_for_move();
        consumer.next_power();
    }
    assert!(!ring.is_empty());
    ring.reset();
    assert_eq!(ring.cursors(), RingCursors::ORIGIN);
    assert!(ring.is_empty());
}
