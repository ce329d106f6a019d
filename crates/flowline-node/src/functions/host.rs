use std::io::Write as _;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;

use flowline_core::error::{FlowlineError, Result};
use flowline_core::function::{FunctionRequest, FunctionResponse};

/// Process-wide log sink shared by hosted functions. Stdout in the binary, a
/// capture buffer in tests. The mutex serializes writes from concurrent
/// invocations.
pub type LogSink = Arc<Mutex<dyn std::io::Write + Send>>;

/// Write one line to the shared log sink.
pub fn log_line(sink: &LogSink, line: &str) -> Result<()> {
    let mut guard = sink
        .lock()
        .map_err(|_| FlowlineError::Internal("log sink poisoned".into()))?;
    writeln!(guard, "{line}").map_err(|e| FlowlineError::Internal(format!("log write failed: {e}")))
}

/// A hosted function.
#[async_trait]
pub trait FunctionService: Send + Sync {
    fn name(&self) -> &'static str;
    async fn invoke(&self, req: FunctionRequest) -> Result<FunctionResponse>;
}

/// Registry of hosted functions, keyed by name.
#[derive(Default)]
pub struct FunctionRegistry {
    map: DashMap<&'static str, Arc<dyn FunctionService>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, func: Arc<dyn FunctionService>) {
        self.map.insert(func.name(), func);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn FunctionService>> {
        self.map.get(name).map(|e| e.value().clone())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.map.iter().map(|e| *e.key()).collect()
    }
}
