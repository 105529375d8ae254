use crate::probe::{PortProbe, TcpPortProbe};
use crate::tests::free_port;

use std::net::TcpListener;
use std::time::{Duration, Instant};

use googletest::assert_that;
use googletest::prelude::{eq, lt};

#[test]
fn given_listener_when_probed_then_listening() {
    // Given
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let probe = TcpPortProbe::new(Duration::from_millis(500));

    // When / Then
    assert_that!(probe.is_listening(port), eq(true));
}

#[test]
fn given_listener_dropped_when_probed_then_not_listening() {
    // Given
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let probe = TcpPortProbe::new(Duration::from_millis(500));
    drop(listener);

    // When / Then
    assert_that!(probe.is_listening(port), eq(false));
}

#[test]
fn given_closed_port_when_probed_then_returns_within_timeout() {
    // Given
    let port = free_port();
    let probe = TcpPortProbe::new(Duration::from_millis(300));

    // When
    let started = Instant::now();
    let listening = probe.is_listening(port);

    // Then
    assert_that!(listening, eq(false));
    assert_that!(started.elapsed(), lt(Duration::from_secs(1)));
}

#[test]
fn given_default_probe_then_one_second_timeout() {
    assert_that!(TcpPortProbe::default().timeout(), eq(Duration::from_secs(1)));
}
