//! End-to-end ingestion: host bridges emit batches, the listener merges them.

use solis::host::{Host, ReplayFeed, UdpBridge};
use solis::ingest::{EventHub, IngestionListener, ROW_BATCH_CHANNEL};
use solis::store::{MoveDirection, RawRow, RowStore, MAX_ROWS};
use std::io::Write;
use std::net::UdpSocket;
use std::time::{Duration, Instant};

fn pump_until(
    listener: &mut IngestionListener,
    store: &mut RowStore,
    done: impl Fn(&RowStore) -> bool,
) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        listener.pump(store);
        if done(store) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}

fn row(id: &str, category: &str) -> RawRow {
    RawRow::new(Some(id), Some(category), "{}")
}

fn ids(store: &RowStore, category: &str) -> Vec<String> {
    store.bucket(category).iter().map(|r| r.id.clone()).collect()
}

#[test]
fn batches_are_prepended_in_arrival_order() {
    let hub = EventHub::new();
    let mut listener = IngestionListener::new(&hub);
    let mut store = RowStore::new();

    hub.emit(ROW_BATCH_CHANNEL, vec![row("a", "Events"), row("b", "Events")]);
    hub.emit(ROW_BATCH_CHANNEL, vec![row("c", "Events"), row("a", "Events")]);
    let summary = listener.pump(&mut store);

    assert_eq!(ids(&store, "Events"), vec!["c", "b", "a"]);
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(listener.batches_seen(), 2);
}

#[test]
fn flood_keeps_every_bucket_bounded() {
    let hub = EventHub::new();
    let emitter = hub.emitter(ROW_BATCH_CHANNEL);
    let mut listener = IngestionListener::new(&hub);
    let mut store = RowStore::new();

    for batch in 0..20 {
        let rows = (0..50)
            .map(|i| row(&format!("{}-{}", batch, i), "Car Telemetry"))
            .collect();
        emitter.emit(rows);
    }
    listener.pump(&mut store);

    assert_eq!(store.category_len("Car Telemetry"), MAX_ROWS);
    // Newest row of the last batch sits on top
    assert_eq!(ids(&store, "Car Telemetry")[0], "19-49");
}

#[test]
fn user_edits_interleave_with_merges() {
    let hub = EventHub::new();
    let mut listener = IngestionListener::new(&hub);
    let mut store = RowStore::new();

    hub.emit(ROW_BATCH_CHANNEL, vec![row("a", "Lap Data"), row("b", "Lap Data")]);
    listener.pump(&mut store);
    store.toggle_actions_open("a");
    assert!(store.move_row("Lap Data", "a", MoveDirection::Up));
    assert!(!store.ui().is_actions_open("a"));

    hub.emit(ROW_BATCH_CHANNEL, vec![row("c", "Lap Data")]);
    listener.pump(&mut store);
    assert_eq!(ids(&store, "Lap Data"), vec!["c", "a", "b"]);

    assert!(store.delete_row("Lap Data", "a"));
    assert_eq!(ids(&store, "Lap Data"), vec!["c", "b"]);
}

#[test]
fn released_listener_ignores_queued_batches() {
    let hub = EventHub::new();
    let mut listener = IngestionListener::new(&hub);
    let mut store = RowStore::new();

    hub.emit(ROW_BATCH_CHANNEL, vec![row("late", "Events")]);
    listener.release();
    listener.release();
    listener.pump(&mut store);

    assert_eq!(store.total_rows(), 0);
    assert_eq!(hub.subscriber_count(ROW_BATCH_CHANNEL), 0);
    assert_eq!(hub.emit(ROW_BATCH_CHANNEL, vec![row("later", "Events")]), 0);
}

#[test]
fn udp_datagrams_reach_the_store() {
    let hub = EventHub::new();
    let mut listener = IngestionListener::new(&hub);
    let mut store = RowStore::new();
    let mut bridge = UdpBridge::new(hub.emitter(ROW_BATCH_CHANNEL), Duration::from_millis(10));

    assert!(bridge.start_listener("127.0.0.1", "0").unwrap());
    let target = bridge.local_addr().unwrap();

    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
    let payload = r#"[{"id":"p1","title":"Session Data","rowTitle":"Weather"},
                     42,
                     {"id":"p2","title":"Session Data"}]"#;
    sender.send_to(payload.as_bytes(), target).unwrap();

    assert!(pump_until(&mut listener, &mut store, |s| s
        .category_len("Session Data")
        == 2));
    assert_eq!(ids(&store, "Session Data"), vec!["p2", "p1"]);
    assert_eq!(store.bucket("Session Data")[1].label, "Weather");

    bridge.stop_listener();
    assert!(!bridge.is_listening());
}

#[test]
fn replay_file_feeds_the_store() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"[{{"id":"r1","title":"Events"}}]"#).unwrap();
    writeln!(file).unwrap();
    writeln!(file, "not json").unwrap();
    writeln!(file, r#"{{"id":"r2"}}"#).unwrap();
    file.flush().unwrap();

    let hub = EventHub::new();
    let mut listener = IngestionListener::new(&hub);
    let mut store = RowStore::new();
    let feed = ReplayFeed::start(
        file.path(),
        hub.emitter(ROW_BATCH_CHANNEL),
        Duration::from_millis(1),
    )
    .unwrap();

    assert!(pump_until(&mut listener, &mut store, |s| s.total_rows() == 2));
    assert_eq!(ids(&store, "Events"), vec!["r1"]);
    assert_eq!(ids(&store, "Unknown"), vec!["r2"]);
    drop(feed);
}
