use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use candlestash_core::connector::{ExchangeConnector, OhlcvProvider, OrderBookProvider};
use candlestash_core::{Bar, Capabilities, DepthSnapshot, Interval, StashError, Symbol};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(StashError),
    /// Hang indefinitely (simulate a stalled request).
    Hang,
}

/// One recorded call against the dynamic mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// An OHLCV page request.
    Ohlcv {
        /// Requested symbol.
        symbol: Symbol,
        /// Requested interval.
        interval: Interval,
        /// Cursor passed by the caller.
        since: Option<i64>,
        /// Page size passed by the caller.
        limit: u32,
    },
    /// An order book request.
    OrderBook {
        /// Requested symbol.
        symbol: Symbol,
        /// Depth passed by the caller.
        limit: u32,
    },
}

#[derive(Default)]
struct InternalState {
    ohlcv_pages: HashMap<(Symbol, Interval), VecDeque<MockBehavior<Vec<Bar>>>>,
    depth_rules: HashMap<Symbol, MockBehavior<DepthSnapshot>>,
    calls: Vec<MockCall>,
}

struct Shared {
    state: Mutex<InternalState>,
    capabilities: AtomicU8,
    rate_limit_ms: AtomicU64,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    shared: Arc<Shared>,
}

impl DynamicMockController {
    /// Queue page responses for `(symbol, interval)`, consumed one per call in order.
    ///
    /// Once the queue is drained further calls return an empty page.
    pub async fn push_ohlcv_pages(
        &self,
        symbol: Symbol,
        interval: Interval,
        pages: impl IntoIterator<Item = MockBehavior<Vec<Bar>>>,
    ) {
        let mut guard = self.shared.state.lock().await;
        guard
            .ohlcv_pages
            .entry((symbol, interval))
            .or_default()
            .extend(pages);
    }

    /// Set the behavior for order book calls for a specific symbol.
    pub async fn set_depth_behavior(&self, symbol: Symbol, behavior: MockBehavior<DepthSnapshot>) {
        let mut guard = self.shared.state.lock().await;
        guard.depth_rules.insert(symbol, behavior);
    }

    /// Replace the advertised capability set.
    pub fn set_capabilities(&self, caps: Capabilities) {
        self.shared.capabilities.store(caps.bits(), Ordering::SeqCst);
    }

    /// Replace the advertised request spacing.
    pub fn set_rate_limit(&self, spacing: Duration) {
        let ms = u64::try_from(spacing.as_millis()).unwrap_or(u64::MAX);
        self.shared.rate_limit_ms.store(ms, Ordering::SeqCst);
    }

    /// Return a copy of the call log.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.shared.state.lock().await.calls.clone()
    }

    /// Clear all configured behaviors and the call log.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.shared.state.lock().await;
        guard.ohlcv_pages.clear();
        guard.depth_rules.clear();
        guard.calls.clear();
    }
}

/// A connector that defers all behavior to an external controller.
///
/// Starts with both capabilities advertised and zero request spacing.
pub struct DynamicMockConnector {
    name: &'static str,
    shared: Arc<Shared>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn ExchangeConnector>, DynamicMockController) {
        let shared = Arc::new(Shared {
            state: Mutex::new(InternalState::default()),
            capabilities: AtomicU8::new(Capabilities::all().bits()),
            rate_limit_ms: AtomicU64::new(0),
        });
        let controller = DynamicMockController {
            shared: Arc::clone(&shared),
        };
        let me = Arc::new(Self { name, shared });
        (me as Arc<dyn ExchangeConnector>, controller)
    }

    fn caps(&self) -> Capabilities {
        Capabilities::from_bits_truncate(self.shared.capabilities.load(Ordering::SeqCst))
    }
}

impl ExchangeConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.shared.rate_limit_ms.load(Ordering::SeqCst))
    }

    fn as_ohlcv_provider(&self) -> Option<&dyn OhlcvProvider> {
        self.caps()
            .contains(Capabilities::OHLCV)
            .then_some(self as &dyn OhlcvProvider)
    }

    fn as_order_book_provider(&self) -> Option<&dyn OrderBookProvider> {
        self.caps()
            .contains(Capabilities::ORDER_BOOK)
            .then_some(self as &dyn OrderBookProvider)
    }
}

#[async_trait]
impl OhlcvProvider for DynamicMockConnector {
    async fn fetch_ohlcv(
        &self,
        symbol: &Symbol,
        interval: Interval,
        since: Option<i64>,
        limit: u32,
    ) -> Result<Vec<Bar>, StashError> {
        // Log and pop without holding the lock across await points
        let behavior = {
            let mut guard = self.shared.state.lock().await;
            guard.calls.push(MockCall::Ohlcv {
                symbol: symbol.clone(),
                interval,
                since,
                limit,
            });
            guard
                .ohlcv_pages
                .get_mut(&(symbol.clone(), interval))
                .and_then(VecDeque::pop_front)
        };

        match behavior {
            Some(MockBehavior::Return(bars)) => Ok(bars),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderBookProvider for DynamicMockConnector {
    async fn fetch_order_book(
        &self,
        symbol: &Symbol,
        limit: u32,
    ) -> Result<DepthSnapshot, StashError> {
        let behavior = {
            let mut guard = self.shared.state.lock().await;
            guard.calls.push(MockCall::OrderBook {
                symbol: symbol.clone(),
                limit,
            });
            guard.depth_rules.get(symbol).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(book)) => Ok(book),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(StashError::unsupported("order-book")),
        }
    }
}
