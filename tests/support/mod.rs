// Shared paddle server for every test in one integration binary.
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

/// Starts the server on first use and returns `ws://127.0.0.1:<port>`.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let bound_url = Arc::new(OnceLock::<String>::new());
        let bound_url_writer = Arc::clone(&bound_url);
        // Each #[tokio::test] gets its own runtime, so the server needs one
        // that outlives all of them.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind any free port");
                let addr = listener.local_addr().expect("listener address");
                let _ = bound_url_writer.set(format!("ws://{addr}"));
                paddle_server::run(listener).await.expect("paddle server stopped");
            });
        });
        wait_until_accepting(bound_url);
    });

    SERVER_URL
        .get()
        .expect("server url is set once the server is up")
        .as_str()
}

fn wait_until_accepting(bound_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = bound_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("ws://")
        .expect("base url starts with ws://");

    // Bound is not the same as serving; poll until a plain TCP connect works.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("paddle server never started accepting connections");
}
