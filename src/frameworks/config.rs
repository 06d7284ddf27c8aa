use crate::use_cases::SidePolicy;
use std::{env, net::IpAddr, time::Duration};

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("PADDLE_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000)
}

pub fn http_host() -> IpAddr {
    env::var("PADDLE_SERVER_HOST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

pub fn side_policy() -> SidePolicy {
    parse_side_policy(env::var("SIDE_POLICY").ok().as_deref())
}

/// Fixed seed for serve randomness; unset means seed from entropy.
pub fn serve_seed() -> Option<u64> {
    env::var("SERVE_SEED").ok().and_then(|v| v.parse().ok())
}

fn parse_side_policy(value: Option<&str>) -> SidePolicy {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("exclusive") => SidePolicy::Exclusive,
        _ => SidePolicy::OverflowToLeft,
    }
}

pub const EVENT_CHANNEL_CAPACITY: usize = 1024;
pub const OUTBOUND_CHANNEL_CAPACITY: usize = 8;

// ~60 Hz.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
