// Not every test crate touches every helper.
#![allow(dead_code)]

//! Shared test support: a scripted driver standing in for the DB2 client.
//!
//! The mock records every executed statement with its bound parameters and
//! replays scripted responses in order. An empty script answers every query
//! with zero rows. Counters expose how often handles were opened, acquired
//! from the pool, and closed.

use async_trait::async_trait;
use db2_adapter::error::AdapterError;
use db2_adapter::{AdapterResult, Connection, Driver, Pool, Row, SqlValue};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// Install a test subscriber once per process; `RUST_LOG` controls the
/// filter as in any other environment.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

type Scripted = Result<Vec<Row>, (String, Option<String>)>;

#[derive(Default)]
pub struct MockState {
    pub opens: AtomicUsize,
    pub pool_opens: AtomicUsize,
    pub acquires: AtomicUsize,
    pub closes: AtomicUsize,
    script: Mutex<VecDeque<Scripted>>,
    executed: Mutex<Vec<(String, Vec<SqlValue>)>>,
    connection_strings: Mutex<Vec<String>>,
}

pub struct MockDriver {
    pub state: Arc<MockState>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }

    /// Script the next response as a row set.
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.state.script.lock().unwrap().push_back(Ok(rows));
    }

    /// Script the next response as a driver error with an optional SQLSTATE.
    pub fn push_error(&self, message: &str, sql_state: Option<&str>) {
        self.state
            .script
            .lock()
            .unwrap()
            .push_back(Err((message.to_string(), sql_state.map(String::from))));
    }

    /// Every executed (sql, params) pair, in order.
    pub fn executed(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.state.executed.lock().unwrap().clone()
    }

    /// Connection strings passed to open/pool, in order.
    pub fn connection_strings(&self) -> Vec<String> {
        self.state.connection_strings.lock().unwrap().clone()
    }
}

struct MockConnection {
    state: Arc<MockState>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> AdapterResult<Vec<Row>> {
        self.state
            .executed
            .lock()
            .unwrap()
            .push((sql.to_string(), params.to_vec()));

        match self.state.script.lock().unwrap().pop_front() {
            None => Ok(Vec::new()),
            Some(Ok(rows)) => Ok(rows),
            Some(Err((message, sql_state))) => Err(AdapterError::database(message, sql_state)),
        }
    }

    async fn close(&self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct MockPool {
    state: Arc<MockState>,
}

#[async_trait]
impl Pool for MockPool {
    async fn acquire(&self) -> AdapterResult<Arc<dyn Connection>> {
        self.state.acquires.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockConnection {
            state: self.state.clone(),
        }))
    }

    async fn close(&self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn open(&self, connection_string: &str) -> AdapterResult<Arc<dyn Connection>> {
        self.state.opens.fetch_add(1, Ordering::SeqCst);
        self.state
            .connection_strings
            .lock()
            .unwrap()
            .push(connection_string.to_string());
        Ok(Arc::new(MockConnection {
            state: self.state.clone(),
        }))
    }

    async fn pool(&self, connection_string: &str) -> AdapterResult<Arc<dyn Pool>> {
        self.state.pool_opens.fetch_add(1, Ordering::SeqCst);
        self.state
            .connection_strings
            .lock()
            .unwrap()
            .push(connection_string.to_string());
        Ok(Arc::new(MockPool {
            state: self.state.clone(),
        }))
    }
}

/// A driver handle that can be scripted after the adapter takes ownership.
pub struct Harness {
    pub driver: Arc<MockDriver>,
    pub adapter: db2_adapter::Db2Adapter,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let driver = Arc::new(MockDriver::new());
        let adapter = db2_adapter::Db2Adapter::new(driver.clone());
        Self { driver, adapter }
    }
}
