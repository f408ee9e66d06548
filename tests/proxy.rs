mod clock {
    decoy::proxy! {
        pub fn now() -> u64;
        pub fn sleep(millis: u64);
        pub fn format<'a>(stamp: u64, buf: &'a mut String) -> &'a str;
        pub fn shutdown();
    }

    pub fn elapsed(since: u64) -> u64 {
        now() - since
    }
}

mod stubs {
    decoy::function! {
        pub fn now() -> u64;
        pub fn sleep(millis: u64);
    }

    pub fn format<'a>(stamp: u64, buf: &'a mut String) -> &'a str {
        buf.clear();
        buf.push_str(&stamp.to_string());
        buf
    }
}

// tests sharing a proxy are serialized by its connection lock, tests
// reading a subject's binding also isolate it

#[test]
fn forwards_to_the_subject() {
    let _connection = clock::NOW_PROXY.connect(stubs::now);
    let _isolated = stubs::NOW.isolate();
    stubs::NOW.set_result(100);

    assert_eq!(clock::elapsed(40), 60);
    assert_eq!(stubs::NOW.count(), 1);
}

#[test]
fn disconnects_on_drop() {
    let _isolated = stubs::SLEEP.isolate();
    {
        let _connection = clock::SLEEP_PROXY.connect(stubs::sleep);
        assert!(clock::SLEEP_PROXY.is_connected());
        clock::sleep(5);
    }

    assert!(!clock::SLEEP_PROXY.is_connected());
    assert_eq!(stubs::SLEEP.param::<1>(), 5);
}

#[test]
#[should_panic(expected = "() shutdown()")]
fn unconnected_proxy_fails() {
    clock::shutdown();
}

#[test]
fn borrowing_signatures() {
    let _connection = clock::FORMAT_PROXY.connect(stubs::format);
    let mut buf = String::new();

    assert_eq!(clock::format(42, &mut buf), "42");
}

#[test]
fn prototypes() {
    assert_eq!(clock::NOW_PROXY.prototype(), "u64 now()");
    assert_eq!(
        clock::FORMAT_PROXY.prototype(),
        "&'a str format(u64, &'a mut String)"
    );
}

#[test]
fn connections_are_exclusive() {
    use std::sync::mpsc;

    let first = clock::NOW_PROXY.connect(stubs::now);
    let (tx, rx) = mpsc::channel();

    let waiter = std::thread::spawn(move || {
        let _second = clock::NOW_PROXY.connect(stubs::now);
        tx.send(()).unwrap();
    });

    assert!(rx
        .recv_timeout(std::time::Duration::from_millis(100))
        .is_err());
    drop(first);
    rx.recv().unwrap();
    waiter.join().unwrap();
}
