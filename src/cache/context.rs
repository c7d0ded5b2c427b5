//! Cache Context Module
//!
//! Per-call network conditions and the glue that derives them from a
//! reachability probe.

// == Cache Context ==
/// Network situation of the caller for a single cache decision.
///
/// Both flags may be set at once, although usually only one is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheContext {
    /// No network connectivity is available
    pub offline: bool,
    /// A request was attempted and failed on the network
    pub network_error: bool,
}

impl CacheContext {
    /// Normal online operation.
    pub fn online() -> Self {
        Self::default()
    }

    /// No connectivity.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// The last request failed on the network.
    pub fn network_error() -> Self {
        Self {
            network_error: true,
            ..Self::default()
        }
    }
}

// == Request Outcome ==
/// How a network-backed request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Request completed
    Ok,
    /// Request failed on the network
    NetworkError,
}

// == Network Probe ==
/// Reachability probe consulted when building a context.
pub trait NetworkProbe {
    /// Whether the network is considered reachable at `now_ms`.
    fn is_online(&self, now_ms: i64) -> bool;
}

impl<F> NetworkProbe for F
where
    F: Fn(i64) -> bool,
{
    fn is_online(&self, now_ms: i64) -> bool {
        self(now_ms)
    }
}

// == Mapper Functions ==
/// Marks the context offline when the probe says so.
pub fn context_from_probe<P: NetworkProbe + ?Sized>(probe: &P, now_ms: i64) -> CacheContext {
    CacheContext {
        offline: !probe.is_online(now_ms),
        network_error: false,
    }
}

/// Like [`context_from_probe`], also flagging a failed request.
pub fn context_from_probe_and_outcome<P: NetworkProbe + ?Sized>(
    probe: &P,
    now_ms: i64,
    outcome: RequestOutcome,
) -> CacheContext {
    let mut ctx = context_from_probe(probe, now_ms);
    if outcome == RequestOutcome::NetworkError {
        ctx.network_error = true;
    }
    ctx
}

pub fn context_online() -> CacheContext {
    CacheContext::online()
}

pub fn context_offline() -> CacheContext {
    CacheContext::offline()
}

pub fn context_network_error() -> CacheContext {
    CacheContext::network_error()
}
