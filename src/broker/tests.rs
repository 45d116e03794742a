use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use super::{Broker, BrokerError, ClientId, Hub, Intake, Message, OverflowPolicy};

fn intake(id: u64, capacity: usize) -> (Intake, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(capacity);
    (Intake::new(ClientId(id), tx), rx)
}

#[test]
fn test_message_new_collapses_duplicate_tags() {
    let message = Message::new(["a", "b", "a"], json!({"k": 1}));
    assert_eq!(message.tags.len(), 2);
    assert!(message.has_tag("a"));
    assert!(!message.has_tag("A"));
    assert_eq!(*message.payload, json!({"k": 1}));
}

#[test]
fn test_message_serializes_to_json() {
    let message = Message::new(["x"], json!("hello"));
    let text = serde_json::to_string(&message).unwrap();
    let parsed: Message = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, message);
}

#[test]
fn test_client_id_display() {
    assert_eq!(ClientId(7).to_string(), "client-7");
}

#[test]
fn test_hub_ids_are_unique_and_increasing() {
    let hub = Hub::default();
    let a = hub.next_id();
    let b = hub.next_id();
    assert_eq!(a, ClientId(1));
    assert!(b > a);
}

#[test]
fn test_hub_register_and_deregister() {
    let hub = Hub::default();
    let (intake, _rx) = intake(1, 4);

    hub.register(intake);
    assert!(hub.is_registered(ClientId(1)));
    assert_eq!(hub.client_count(), 1);

    hub.deregister(ClientId(1));
    assert!(!hub.is_registered(ClientId(1)));

    // unknown ids are ignored
    hub.deregister(ClientId(42));
    assert_eq!(hub.client_count(), 0);
}

#[tokio::test]
async fn test_hub_fans_out_to_every_client() {
    let hub = Hub::default();
    let (a, mut rx_a) = intake(1, 4);
    let (b, mut rx_b) = intake(2, 4);
    hub.register(a);
    hub.register(b);

    let message = Message::new(["t"], json!("hi"));
    hub.publish(message.clone()).await.unwrap();

    assert_eq!(rx_a.try_recv().unwrap().id, message.id);
    assert_eq!(rx_b.try_recv().unwrap().id, message.id);
}

#[tokio::test]
async fn test_hub_drop_policy_discards_on_full_intake() {
    let hub = Hub::new(OverflowPolicy::Drop);
    let (a, mut rx) = intake(1, 1);
    hub.register(a);

    hub.publish(Message::new(["t"], json!(1))).await.unwrap();
    hub.publish(Message::new(["t"], json!(2))).await.unwrap();

    assert_eq!(*rx.try_recv().unwrap().payload, json!(1));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_hub_block_policy_waits_for_room() {
    let hub = Arc::new(Hub::new(OverflowPolicy::Block));
    let (a, mut rx) = intake(1, 1);
    hub.register(a);

    hub.publish(Message::new(["t"], json!(1))).await.unwrap();
    let publisher = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.publish(Message::new(["t"], json!(2))).await })
    };

    assert_eq!(*rx.recv().await.unwrap().payload, json!(1));
    assert_eq!(*rx.recv().await.unwrap().payload, json!(2));
    publisher.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_hub_skips_closed_intakes() {
    let hub = Hub::default();
    let (a, rx) = intake(1, 1);
    hub.register(a);
    drop(rx);

    // a gone client is not an error for the publisher
    assert!(hub.publish(Message::new(["t"], json!(null))).await.is_ok());
}

#[tokio::test]
async fn test_hub_shutdown_rejects_publish_and_registration() {
    let hub = Hub::default();
    let (a, _rx_a) = intake(1, 1);
    hub.register(a);

    hub.shutdown();
    assert_eq!(hub.client_count(), 0);
    assert_eq!(
        hub.publish(Message::new(["t"], json!(null))).await,
        Err(BrokerError::ShutDown)
    );

    let (b, _rx_b) = intake(2, 1);
    hub.register(b);
    assert!(!hub.is_registered(ClientId(2)));
}
