use std::{cell::RefCell, io::Cursor, rc::Rc};

use attitude_link::{ChannelState, Field, TelemetryReader, TelemetrySnapshot};

#[test]
fn emitted_snapshots_are_read_back() {
    let sent = [
        TelemetrySnapshot { yaw: 359.75, pitch: -1.5, roll: 0.0, latitude: -6.914744, longitude: 107.60981 },
        TelemetrySnapshot { yaw: 0.25, pitch: 2.0, roll: -44.125, latitude: 51.5074, longitude: -0.1278 },
    ];
    let mut stream = Vec::new();
    for snap in &sent {
        stream.extend(serde_json::to_vec(snap).unwrap());
        stream.push(b'\n');
    }

    let mut reader = TelemetryReader::with_channel(Cursor::new(stream));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    reader.on_longitude_changed(move |v| s.borrow_mut().push(v));

    assert_eq!(reader.state(), ChannelState::Open);
    assert_eq!(reader.poll().unwrap(), 2);
    assert_eq!(reader.snapshot(), sent[1]);
    assert_eq!(*seen.borrow(), vec![107.60981, -0.1278]);
}

#[test]
fn garbage_between_records_is_skipped() {
    let mut reader = TelemetryReader::with_channel(std::io::empty());

    let accepted = reader.handle_ready_read(
        b"\x00\xff\n{\"yaw\": 45}\nBOOT v1.2\n{\"yaw\": 46, \"pitch\": 1}\n{\"yaw\"",
    );

    assert_eq!(accepted, 2);
    assert_eq!(reader.get(Field::Yaw), 46.0);
    assert_eq!(reader.get(Field::Pitch), 1.0);
}
