// Integration tests for host-originated characteristic reads and writes.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use motionbridge_core::{
    BlindCommand, BlindConfig, Characteristic, CharacteristicHandler, CharacteristicValue,
    HapStatus, MacAddress, Operation, Perms, RawStatus, WriteRequest,
};
use pretty_assertions::assert_eq;

use common::{FakeGateway, FakeHost, blind, platform, uuid_of};

const MAC: &str = "aa:bb:cc:dd:ee:01";

// ── Helpers ─────────────────────────────────────────────────────────

async fn attached(
    gateway: &Arc<FakeGateway>,
    host: &Arc<FakeHost>,
    cfg: BlindConfig,
) -> Arc<dyn CharacteristicHandler> {
    let status = RawStatus {
        current_position: 40,
        current_angle: 90,
        operation: Operation::Stop,
        ..RawStatus::default()
    };
    gateway.add_device(MAC, status);

    let platform = platform(gateway, host, vec![cfg]);
    platform.discover_devices().await.unwrap();
    host.clear_pushes();
    host.handler(uuid_of(MAC))
}

fn position_write(raw: i32) -> WriteRequest {
    WriteRequest {
        target_position: Some(raw),
        ..WriteRequest::default()
    }
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_target_position_is_written_inverted() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    let mut cfg = blind(MAC);
    cfg.invert = Some(true);
    let handler = attached(&gateway, &host, cfg).await;

    handler
        .set(Characteristic::TargetPosition, CharacteristicValue::Int(75))
        .await
        .unwrap();

    assert_eq!(gateway.writes(), vec![(MAC.to_owned(), position_write(25))]);
    assert_eq!(
        handler.get(Characteristic::TargetPosition).await,
        Ok(CharacteristicValue::Int(75))
    );
    // no optimistic telemetry
    assert!(host.pushes_for(uuid_of(MAC)).is_empty());
    assert_eq!(
        handler.get(Characteristic::CurrentPosition).await,
        Ok(CharacteristicValue::Int(60))
    );
}

#[tokio::test]
async fn test_write_failure_keeps_stored_target() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    gateway.fail_writes.store(true, Ordering::SeqCst);
    let handler = attached(&gateway, &host, blind(MAC)).await;

    let result = handler
        .set(Characteristic::TargetPosition, CharacteristicValue::Int(30))
        .await;

    assert_eq!(result, Err(HapStatus::ServiceCommunicationFailure));
    assert_eq!(gateway.writes(), vec![(MAC.to_owned(), position_write(30))]);
    assert_eq!(
        handler.get(Characteristic::TargetPosition).await,
        Ok(CharacteristicValue::Int(30))
    );
}

#[tokio::test]
async fn test_tilt_target_is_shifted() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    let mut cfg = blind(MAC);
    cfg.tilt = Some(true);
    let handler = attached(&gateway, &host, cfg).await;

    handler
        .set(
            Characteristic::TargetVerticalTiltAngle,
            CharacteristicValue::Int(-30),
        )
        .await
        .unwrap();

    let writes = gateway.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].1.target_angle, Some(60));
    assert_eq!(writes[0].1.target_position, None);
    assert_eq!(
        handler.get(Characteristic::TargetVerticalTiltAngle).await,
        Ok(CharacteristicValue::Int(-30))
    );
}

#[tokio::test]
async fn test_hold_position_is_write_only() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    let handler = attached(&gateway, &host, blind(MAC)).await;

    assert_eq!(
        handler.get(Characteristic::HoldPosition).await,
        Err(HapStatus::WriteOnlyCharacteristic)
    );

    handler
        .set(Characteristic::HoldPosition, CharacteristicValue::Bool(true))
        .await
        .unwrap();
    assert_eq!(gateway.writes()[0].1.operation, Some(Operation::Stop));
    assert_eq!(
        host.binding(uuid_of(MAC), Characteristic::HoldPosition)
            .unwrap()
            .perms,
        Perms::WRITE_ONLY
    );
}

#[tokio::test]
async fn test_malformed_value_is_rejected() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    let handler = attached(&gateway, &host, blind(MAC)).await;

    let result = handler
        .set(Characteristic::TargetPosition, CharacteristicValue::Bool(true))
        .await;
    assert_eq!(result, Err(HapStatus::InvalidValueInRequest));
    assert!(gateway.writes().is_empty());
}

#[tokio::test]
async fn test_unbound_characteristics_do_not_exist() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    let mut cfg = blind(MAC);
    cfg.is_battery_powered = Some(false);
    let handler = attached(&gateway, &host, cfg).await;

    assert_eq!(
        handler.get(Characteristic::CurrentVerticalTiltAngle).await,
        Err(HapStatus::ResourceDoesNotExist)
    );
    assert_eq!(
        handler.get(Characteristic::BatteryLevel).await,
        Err(HapStatus::ResourceDoesNotExist)
    );
}

// ── Read-only gateway ───────────────────────────────────────────────

#[tokio::test]
async fn test_without_key_targets_are_read_only() {
    let gateway = FakeGateway::with_key(false);
    let host = FakeHost::new();
    let mut cfg = blind(MAC);
    cfg.tilt = Some(true);
    let handler = attached(&gateway, &host, cfg).await;
    let uuid = uuid_of(MAC);

    let perms = |c| host.binding(uuid, c).unwrap().perms;
    assert_eq!(perms(Characteristic::TargetPosition), Perms::READ_NOTIFY);
    assert_eq!(perms(Characteristic::TargetVerticalTiltAngle), Perms::READ_NOTIFY);
    assert_eq!(perms(Characteristic::HoldPosition), Perms::NONE);

    for characteristic in [
        Characteristic::TargetPosition,
        Characteristic::TargetVerticalTiltAngle,
        Characteristic::HoldPosition,
    ] {
        let result = handler
            .set(characteristic, CharacteristicValue::Int(10))
            .await;
        assert_eq!(result, Err(HapStatus::ReadOnlyCharacteristic));
    }
    assert!(gateway.writes().is_empty());

    // reads still work
    assert_eq!(
        handler.get(Characteristic::TargetPosition).await,
        Ok(CharacteristicValue::Int(40))
    );
}

#[tokio::test]
async fn test_execute_through_accessory() {
    let gateway = FakeGateway::new();
    let host = FakeHost::new();
    gateway.add_device(MAC, RawStatus::default());

    let platform = platform(&gateway, &host, vec![blind(MAC)]);
    platform.discover_devices().await.unwrap();
    let accessory = platform.accessory(&MacAddress::new(MAC)).unwrap();

    accessory
        .execute(BlindCommand::SetTargetPosition(90))
        .await
        .unwrap();
    assert_eq!(accessory.target().position, Some(90));
    assert_eq!(gateway.writes(), vec![(MAC.to_owned(), position_write(90))]);
}
